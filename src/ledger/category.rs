use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Fixed set of categories transactions and budgets are filed under.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Salary,
    Freelance,
    Investments,
    OtherIncome,
    Housing,
    Food,
    Transportation,
    Utilities,
    Entertainment,
    Health,
    Education,
    Shopping,
    Subscriptions,
    Gifts,
    Savings,
    Debts,
    OtherExpense,
}

/// Supported category types.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CategoryKind {
    Income,
    Expense,
}

impl Category {
    pub const INCOME: [Category; 4] = [
        Category::Salary,
        Category::Freelance,
        Category::Investments,
        Category::OtherIncome,
    ];

    pub const EXPENSE: [Category; 13] = [
        Category::Housing,
        Category::Food,
        Category::Transportation,
        Category::Utilities,
        Category::Entertainment,
        Category::Health,
        Category::Education,
        Category::Shopping,
        Category::Subscriptions,
        Category::Gifts,
        Category::Savings,
        Category::Debts,
        Category::OtherExpense,
    ];

    pub fn all() -> impl Iterator<Item = Category> {
        Self::INCOME.into_iter().chain(Self::EXPENSE)
    }

    pub fn kind(self) -> CategoryKind {
        if Self::INCOME.contains(&self) {
            CategoryKind::Income
        } else {
            CategoryKind::Expense
        }
    }

    /// Stable identifier used in persisted records.
    pub fn slug(self) -> &'static str {
        match self {
            Category::Salary => "salary",
            Category::Freelance => "freelance",
            Category::Investments => "investments",
            Category::OtherIncome => "other-income",
            Category::Housing => "housing",
            Category::Food => "food",
            Category::Transportation => "transportation",
            Category::Utilities => "utilities",
            Category::Entertainment => "entertainment",
            Category::Health => "health",
            Category::Education => "education",
            Category::Shopping => "shopping",
            Category::Subscriptions => "subscriptions",
            Category::Gifts => "gifts",
            Category::Savings => "savings",
            Category::Debts => "debts",
            Category::OtherExpense => "other-expense",
        }
    }

    /// Display label in the dashboard's locale.
    pub fn label(self) -> &'static str {
        match self {
            Category::Salary => "Salario",
            Category::Freelance => "Freelance",
            Category::Investments => "Inversiones",
            Category::OtherIncome => "Otros Ingresos",
            Category::Housing => "Vivienda",
            Category::Food => "Alimentación",
            Category::Transportation => "Transporte",
            Category::Utilities => "Servicios",
            Category::Entertainment => "Entretenimiento",
            Category::Health => "Salud",
            Category::Education => "Educación",
            Category::Shopping => "Compras",
            Category::Subscriptions => "Suscripciones",
            Category::Gifts => "Regalos",
            Category::Savings => "Ahorro",
            Category::Debts => "Deudas",
            Category::OtherExpense => "Otros Gastos",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let needle = value.trim().to_lowercase();
        Category::all()
            .find(|category| category.slug() == needle)
            .ok_or_else(|| format!("unknown category `{value}`"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_match_serde_names() {
        for category in Category::all() {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.slug()));
            assert_eq!(category.slug().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn kinds_split_income_and_expense() {
        assert_eq!(Category::Freelance.kind(), CategoryKind::Income);
        assert_eq!(Category::Gifts.kind(), CategoryKind::Expense);
        assert_eq!(Category::all().count(), 17);
    }
}
