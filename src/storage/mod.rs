//! Key-value persistence for the ledger.
//!
//! Each collection lives under its own key, mirroring the layout the web
//! application kept in browser storage, so its backups load unchanged.

pub mod export;
pub mod json_backend;
pub mod memory;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::core::validation::validate_ledger;
use crate::errors::{FinanceError, FinanceResult};
use crate::ledger::{AguinaldoProjection, HolidayState, Ledger};

pub use export::ExportSnapshot;
pub use json_backend::JsonStorage;
pub use memory::MemoryStorage;

pub const TRANSACTIONS_KEY: &str = "blackfinance_transactions";
pub const BUDGETS_KEY: &str = "blackfinance_budgets";
pub const SAVINGS_KEY: &str = "blackfinance_savings";
pub const DEBTS_KEY: &str = "blackfinance_debts";
pub const HOLIDAY_KEY: &str = "blackfinance_holiday";
/// Standalone aguinaldo projection. Read as a fallback, never written.
pub const AGUINALDO_KEY: &str = "blackfinance_aguinaldo";

pub const ALL_KEYS: [&str; 6] = [
    TRANSACTIONS_KEY,
    BUDGETS_KEY,
    SAVINGS_KEY,
    DEBTS_KEY,
    HOLIDAY_KEY,
    AGUINALDO_KEY,
];

/// Abstraction over persistence backends storing one JSON document per key.
pub trait StorageBackend: Send + Sync {
    fn read(&self, key: &str) -> FinanceResult<Option<String>>;
    fn write(&self, key: &str, value: &str) -> FinanceResult<()>;
    fn remove(&self, key: &str) -> FinanceResult<()>;

    /// Snapshots every key. Returns the backup's name.
    fn backup(&self, _note: Option<&str>) -> FinanceResult<String> {
        Err(FinanceError::Storage(
            "backups are not supported by this storage".into(),
        ))
    }

    /// Backup names, newest first.
    fn list_backups(&self) -> FinanceResult<Vec<String>> {
        Ok(Vec::new())
    }

    fn restore_backup(&self, name: &str) -> FinanceResult<()> {
        Err(FinanceError::NotFound(format!("backup `{name}`")))
    }
}

fn read_key<T>(storage: &dyn StorageBackend, key: &str, lenient: bool) -> FinanceResult<Option<T>>
where
    T: DeserializeOwned,
{
    let Some(raw) = storage.read(key)? else {
        return Ok(None);
    };
    match serde_json::from_str::<Option<T>>(&raw) {
        Ok(value) => Ok(value),
        Err(err) if lenient => {
            warn!(key, error = %err, "unreadable stored value treated as empty");
            Ok(None)
        }
        Err(err) => Err(FinanceError::Serde(err)),
    }
}

fn write_key<T>(storage: &dyn StorageBackend, key: &str, value: &T) -> FinanceResult<()>
where
    T: Serialize + ?Sized,
{
    let json = serde_json::to_string(value)?;
    storage.write(key, &json)
}

/// Assembles the ledger from storage. Missing keys yield empty collections.
/// With `lenient`, a key that fails to parse is logged and treated as empty;
/// otherwise the parse error is returned.
pub fn load_ledger(storage: &dyn StorageBackend, lenient: bool) -> FinanceResult<Ledger> {
    let mut ledger = Ledger {
        transactions: read_key(storage, TRANSACTIONS_KEY, lenient)?.unwrap_or_default(),
        budgets: read_key(storage, BUDGETS_KEY, lenient)?.unwrap_or_default(),
        savings_goals: read_key(storage, SAVINGS_KEY, lenient)?.unwrap_or_default(),
        debts: read_key(storage, DEBTS_KEY, lenient)?.unwrap_or_default(),
        ..Ledger::default()
    };
    let holiday: HolidayState = read_key(storage, HOLIDAY_KEY, lenient)?.unwrap_or_default();
    ledger.set_holiday_state(holiday);
    if ledger.aguinaldo.is_none() {
        ledger.aguinaldo = read_key::<AguinaldoProjection>(storage, AGUINALDO_KEY, lenient)?;
    }
    validate_ledger(&ledger)?;
    debug!(
        transactions = ledger.transactions.len(),
        budgets = ledger.budgets.len(),
        goals = ledger.savings_goals.len(),
        debts = ledger.debts.len(),
        "ledger loaded"
    );
    Ok(ledger)
}

pub fn save_ledger(storage: &dyn StorageBackend, ledger: &Ledger) -> FinanceResult<()> {
    write_key(storage, TRANSACTIONS_KEY, &ledger.transactions)?;
    write_key(storage, BUDGETS_KEY, &ledger.budgets)?;
    write_key(storage, SAVINGS_KEY, &ledger.savings_goals)?;
    write_key(storage, DEBTS_KEY, &ledger.debts)?;
    write_key(storage, HOLIDAY_KEY, &ledger.holiday_state())?;
    Ok(())
}

/// Removes every key this crate reads.
pub fn clear_all(storage: &dyn StorageBackend) -> FinanceResult<()> {
    ALL_KEYS.iter().try_for_each(|key| storage.remove(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{Budget, Category, MonthPeriod, Transaction};
    use chrono::NaiveDate;

    #[test]
    fn missing_keys_load_as_empty() {
        let storage = MemoryStorage::new();
        let ledger = load_ledger(&storage, false).unwrap();
        assert!(ledger.is_empty());
    }

    #[test]
    fn save_then_load_keeps_every_collection() {
        let storage = MemoryStorage::new();
        let mut ledger = Ledger::new();
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        ledger
            .transactions
            .push(Transaction::expense(10.0, Category::Food, date, "lunch"));
        ledger
            .budgets
            .push(Budget::new(Category::Food, 100.0, MonthPeriod::of(date)));
        save_ledger(&storage, &ledger).unwrap();
        assert_eq!(load_ledger(&storage, false).unwrap(), ledger);
    }

    #[test]
    fn corrupt_key_fails_strict_and_empties_lenient() {
        let storage = MemoryStorage::new();
        storage.write(BUDGETS_KEY, "{not json").unwrap();
        assert!(matches!(
            load_ledger(&storage, false),
            Err(FinanceError::Serde(_))
        ));
        assert!(load_ledger(&storage, true).unwrap().budgets.is_empty());
    }

    #[test]
    fn null_holiday_value_is_empty() {
        let storage = MemoryStorage::new();
        storage.write(HOLIDAY_KEY, "null").unwrap();
        let ledger = load_ledger(&storage, false).unwrap();
        assert!(ledger.holiday_budgets.is_empty());
        assert!(ledger.aguinaldo.is_none());
    }

    #[test]
    fn clear_all_removes_keys() {
        let storage = MemoryStorage::new();
        save_ledger(&storage, &Ledger::new()).unwrap();
        clear_all(&storage).unwrap();
        assert!(storage.read(TRANSACTIONS_KEY).unwrap().is_none());
    }
}
