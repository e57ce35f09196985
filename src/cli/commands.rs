use std::path::PathBuf;

use chrono::{Datelike, NaiveDate};

use crate::core::services::{
    BudgetService, DebtService, HolidayService, SavingsService, SummaryService,
    TransactionService,
};
use crate::ledger::period::flexible_date;
use crate::ledger::{
    amortization, time_series, AguinaldoProjection, AllocationKind, MonthPeriod, RecurringState,
    TransactionType,
};
use crate::utils::PathResolver;

use super::output::{self, money, percent, signed_money};
use super::{CliContext, CliError, CliResult};

pub(crate) fn print_usage() {
    println!(
        "Usage: finance_core_cli <command>\n\
         Commands:\n  \
         summary [YYYY-MM]          monthly balance and top expense categories\n  \
         budgets [YYYY-MM]          planned versus spent per budget\n  \
         goals                      savings goal progress\n  \
         debts                      debt progress\n  \
         schedule <debt-id> [n]     amortization schedule for n periods\n  \
         trend [months]             income and expenses per month\n  \
         recurring                  recurring templates and their state this month\n  \
         holiday                    holiday budgets and their item totals\n  \
         aguinaldo [gross] [date]   show, or project and record, the aguinaldo split\n  \
         materialize                generate due recurring transactions\n  \
         export <file.json>         write a full export\n  \
         import <file.json>         load an export, replacing the collections it contains\n  \
         backup [note]              snapshot the data directory\n  \
         backups                    list snapshots, newest first\n  \
         help"
    );
}

fn period_arg(ctx: &CliContext, raw: Option<&String>) -> CliResult<MonthPeriod> {
    match raw {
        Some(raw) => MonthPeriod::parse(raw)
            .ok_or_else(|| CliError::Usage(format!("expected YYYY-MM, got `{raw}`"))),
        None => Ok(MonthPeriod::of(ctx.today())),
    }
}

/// Parses a count in `0..=max`.
fn count_arg(raw: Option<&String>, default: u32, max: u32) -> CliResult<u32> {
    let count = match raw {
        Some(raw) => raw
            .parse()
            .map_err(|_| CliError::Usage(format!("expected a whole number, got `{raw}`")))?,
        None => default,
    };
    if count > max {
        return Err(CliError::Usage(format!(
            "expected a whole number up to {max}, got {count}"
        )));
    }
    Ok(count)
}

fn amount_arg(raw: &str) -> CliResult<f64> {
    raw.parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
        .ok_or_else(|| CliError::Usage(format!("expected an amount, got `{raw}`")))
}

fn path_arg(raw: Option<&String>, command: &str) -> CliResult<PathBuf> {
    raw.map(PathBuf::from)
        .ok_or_else(|| CliError::Usage(format!("usage: finance_core_cli {command} <file.json>")))
}

pub(crate) fn summary(ctx: &CliContext, month: Option<&String>) -> CliResult<()> {
    let period = period_arg(ctx, month)?;
    let ledger = ctx.manager.ledger();
    let currency = ctx.currency();
    let kpis = SummaryService::kpis(ledger, ctx.config.trend_months, period.first_day());

    output::section(format!("Summary {}", period));
    output::info(format!("Income:       {}", money(kpis.balance.income, currency)));
    output::info(format!("Expenses:     {}", money(kpis.balance.expenses, currency)));
    output::info(format!(
        "Balance:      {}",
        signed_money(kpis.balance.balance, currency)
    ));
    output::info(format!("Savings rate: {}", percent(kpis.savings_rate)));
    output::info(format!(
        "Average over {} months: income {}, expenses {}",
        ctx.config.trend_months,
        money(kpis.average_income, currency),
        money(kpis.average_expenses, currency)
    ));

    let expenses =
        SummaryService::category_breakdown(ledger, Some(period), Some(TransactionType::Expense));
    if !expenses.is_empty() {
        output::section("Expenses by category");
        for group in expenses {
            output::info(format!(
                "{:<18} {:>16}  ({} entries)",
                group.category.label(),
                money(group.total, currency),
                group.count
            ));
        }
    }
    Ok(())
}

pub(crate) fn budgets(ctx: &CliContext, month: Option<&String>) -> CliResult<()> {
    let period = period_arg(ctx, month)?;
    let overview = BudgetService::month_overview(ctx.manager.ledger(), period);
    let currency = ctx.currency();

    output::section(format!("Budgets {}", period));
    if overview.lines.is_empty() {
        output::info("No budgets for this month.");
        return Ok(());
    }
    for line in &overview.lines {
        let row = format!(
            "{:<18} {:>16} of {:>16}  {:>7}",
            line.category.label(),
            money(line.spent, currency),
            money(line.planned, currency),
            percent(line.utilization.percentage)
        );
        if line.utilization.overspent {
            output::warning(format!("{row}  over by {}", money(-line.utilization.remaining, currency)));
        } else {
            output::info(row);
        }
    }
    let total = overview.utilization();
    output::info(format!(
        "Total: {} of {} ({})",
        money(overview.total_spent, currency),
        money(overview.total_planned, currency),
        percent(total.percentage)
    ));
    Ok(())
}

pub(crate) fn goals(ctx: &CliContext) -> CliResult<()> {
    let currency = ctx.currency();
    output::section("Savings goals");
    let rows = SavingsService::overview(ctx.manager.ledger(), ctx.today());
    if rows.is_empty() {
        output::info("No savings goals.");
    }
    for (goal, progress) in rows {
        let deadline = if progress.is_expired() {
            "expired".to_string()
        } else {
            format!("{} days left", progress.days_left)
        };
        output::info(format!(
            "{:<20} {:>16} of {:>16}  {:>7}  {}",
            goal.name,
            money(goal.current_amount, currency),
            money(goal.target_amount, currency),
            percent(progress.percentage),
            deadline
        ));
    }
    Ok(())
}

pub(crate) fn debts(ctx: &CliContext) -> CliResult<()> {
    let currency = ctx.currency();
    let ledger = ctx.manager.ledger();
    output::section("Debts");
    if ledger.debts.is_empty() {
        output::info("No debts.");
    }
    for debt in &ledger.debts {
        let progress = DebtService::progress(debt);
        output::info(format!(
            "{:<20} [{}] {:>16} remaining  {:>7} paid  ~{} months  ({})",
            debt.name,
            format!("{:?}", debt.status).to_lowercase(),
            money(progress.remaining, currency),
            percent(progress.percentage),
            progress.months_left,
            debt.id
        ));
        if !amortization::amortizes(debt) {
            output::warning(format!(
                "{}: the monthly payment does not cover interest",
                debt.name
            ));
        }
    }
    output::info(format!(
        "Outstanding: {}",
        money(DebtService::outstanding(ledger), currency)
    ));
    Ok(())
}

pub(crate) fn schedule(
    ctx: &CliContext,
    debt_id: Option<&String>,
    periods: Option<&String>,
) -> CliResult<()> {
    let debt_id = debt_id.ok_or_else(|| {
        CliError::Usage("usage: finance_core_cli schedule <debt-id> [periods]".into())
    })?;
    let periods = count_arg(
        periods,
        ctx.config.amortization_periods,
        amortization::MAX_PERIODS,
    )?;
    let rows = DebtService::schedule(ctx.manager.ledger(), debt_id, periods)?;
    let currency = ctx.currency();

    output::section(format!("Schedule {}", debt_id));
    output::info(format!(
        "{:>6} {:>16} {:>16} {:>16} {:>16}",
        "period", "payment", "principal", "interest", "balance"
    ));
    for row in rows {
        output::info(format!(
            "{:>6} {:>16} {:>16} {:>16} {:>16}",
            row.period,
            money(row.payment, currency),
            money(row.principal, currency),
            money(row.interest, currency),
            money(row.balance, currency)
        ));
    }
    Ok(())
}

pub(crate) fn trend(ctx: &CliContext, months: Option<&String>) -> CliResult<()> {
    let months = count_arg(months, ctx.config.trend_months, time_series::MAX_MONTHS)?;
    let currency = ctx.currency();
    let series = SummaryService::time_series_with(
        ctx.manager.ledger(),
        months,
        ctx.today(),
        time_series::label_for_locale(&ctx.config.locale),
    );
    output::section(format!("Last {} months", months));
    for point in series {
        output::info(format!(
            "{:<10} income {:>16}  expenses {:>16}",
            point.label,
            money(point.income, currency),
            money(point.expenses, currency)
        ));
    }
    Ok(())
}

pub(crate) fn recurring(ctx: &CliContext) -> CliResult<()> {
    let currency = ctx.currency();
    output::section("Recurring transactions");
    let snapshots = TransactionService::recurring_status(ctx.manager.ledger(), ctx.today());
    if snapshots.is_empty() {
        output::info("No recurring templates.");
    }
    for snap in snapshots {
        let state = match snap.state {
            RecurringState::Pending => "pending",
            RecurringState::Due => "due",
            RecurringState::Materialized => "recorded",
        };
        output::info(format!(
            "{}  {:<20} {:>16}  {}",
            snap.due_date,
            snap.note,
            money(snap.amount, currency),
            state
        ));
    }
    Ok(())
}

pub(crate) fn holiday(ctx: &CliContext) -> CliResult<()> {
    let currency = ctx.currency();
    let ledger = ctx.manager.ledger();
    output::section("Holiday budgets");
    if ledger.holiday_budgets.is_empty() {
        output::info("No holiday budgets.");
    }
    for budget in &ledger.holiday_budgets {
        let usage = HolidayService::utilization(budget);
        let purchased = budget.items.iter().filter(|item| item.purchased).count();
        let row = format!(
            "{:<20} {} {:>16} of {:>16}  {:>7}  {}/{} items bought, {} estimated",
            budget.name,
            budget.year,
            money(budget.spent_amount, currency),
            money(budget.budget_amount, currency),
            percent(usage.percentage),
            purchased,
            budget.items.len(),
            money(usage.estimated_total, currency)
        );
        if usage.remaining < 0.0 {
            output::warning(format!("{row}  over by {}", money(-usage.remaining, currency)));
        } else {
            output::info(row);
        }
    }
    Ok(())
}

/// Without arguments prints the recorded projection. With a gross amount,
/// projects it with the configured tax rate and plan, records it and saves.
pub(crate) fn aguinaldo(
    ctx: &mut CliContext,
    gross: Option<&String>,
    expected: Option<&String>,
) -> CliResult<()> {
    let Some(gross) = gross else {
        match &ctx.manager.ledger().aguinaldo {
            Some(projection) => print_aguinaldo(projection, ctx.currency()),
            None => output::info("No aguinaldo projection recorded."),
        }
        return Ok(());
    };
    let gross = amount_arg(gross)?;
    let expected_date = match expected {
        Some(raw) => flexible_date::parse(raw)
            .ok_or_else(|| CliError::Usage(format!("expected YYYY-MM-DD, got `{raw}`")))?,
        None => default_aguinaldo_date(ctx.today()),
    };
    let tax_rate = ctx.config.aguinaldo_tax_rate;
    let plan = ctx.config.aguinaldo_plan;
    let projection = HolidayService::project_aguinaldo(
        ctx.manager.ledger_mut(),
        gross,
        tax_rate,
        expected_date,
        &plan,
    )?;
    ctx.manager.save()?;
    print_aguinaldo(&projection, ctx.currency());
    output::success("Aguinaldo projection saved.");
    Ok(())
}

/// The second installment is paid mid-December.
fn default_aguinaldo_date(today: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(today.year(), 12, 15).unwrap_or(today)
}

fn print_aguinaldo(projection: &AguinaldoProjection, currency: &str) {
    output::section(format!("Aguinaldo {}", projection.expected_date));
    output::info(format!("Gross:        {}", money(projection.gross_amount, currency)));
    output::info(format!(
        "Tax ({}):  {}",
        percent(projection.tax_rate),
        money(projection.tax_amount(), currency)
    ));
    output::info(format!("Net:          {}", money(projection.net_amount, currency)));
    for kind in AllocationKind::ALL {
        output::info(format!(
            "  {:<12} {:>16}",
            format!("{:?}", kind).to_lowercase(),
            money(projection.allocations.get(kind), currency)
        ));
    }
    let mut unallocated = projection.unallocated();
    if unallocated.abs() < 0.005 {
        unallocated = 0.0;
    }
    let line = format!("Unallocated:  {}", signed_money(unallocated, currency));
    if unallocated < 0.0 {
        output::warning(line);
    } else {
        output::info(line);
    }
}

pub(crate) fn materialize(ctx: &mut CliContext) -> CliResult<()> {
    let created = ctx.manager.materialize_recurring()?;
    if created.is_empty() {
        output::info("No recurring transactions due.");
    } else {
        output::success(format!(
            "Generated {} recurring transaction(s).",
            created.len()
        ));
    }
    Ok(())
}

pub(crate) fn export(ctx: &CliContext, path: Option<&String>) -> CliResult<()> {
    let path = path_arg(path, "export")?;
    ctx.manager.export_to(&path)?;
    output::success(format!("Exported to {}", path.display()));
    Ok(())
}

pub(crate) fn import(ctx: &mut CliContext, path: Option<&String>) -> CliResult<()> {
    let path = path_arg(path, "import")?;
    ctx.manager.import_from(&path)?;
    let ledger = ctx.manager.ledger();
    output::success(format!(
        "Imported {} transactions and {} budgets from {}",
        ledger.transactions.len(),
        ledger.budgets.len(),
        path.display()
    ));
    Ok(())
}

pub(crate) fn backup(ctx: &CliContext, note: &[String]) -> CliResult<()> {
    let note = note.join(" ");
    let note = if note.trim().is_empty() {
        None
    } else {
        Some(note.as_str())
    };
    let name = ctx.manager.backup(note)?;
    output::success(format!("Backup created: {}", name));
    Ok(())
}

pub(crate) fn backups(ctx: &CliContext) -> CliResult<()> {
    let names = ctx.manager.list_backups()?;
    output::section(format!(
        "Backups in {}",
        PathResolver::backup_dir_in(&ctx.base).display()
    ));
    if names.is_empty() {
        output::info("No backups yet.");
    }
    for name in names {
        output::info(name);
    }
    Ok(())
}
