//! Non-interactive report commands over the data directory.

mod commands;
pub mod output;

use std::{env, path::PathBuf, sync::Arc};

use chrono::NaiveDate;

use crate::config::{Config, ConfigManager};
use crate::core::{
    services::ServiceError, Clock, FixedClock, LedgerManager, OpenOptions, SystemClock,
};
use crate::errors::FinanceError;
use crate::ledger::period::flexible_date;
use crate::storage::JsonStorage;
use crate::utils::app_data_dir;

/// Pins the CLI's notion of today (`YYYY-MM-DD`), used by scripted runs.
pub const TODAY_ENV: &str = "FINANCE_CORE_TODAY";

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Finance(#[from] FinanceError),
    #[error(transparent)]
    Service(#[from] ServiceError),
}

pub type CliResult<T> = Result<T, CliError>;

pub(crate) struct CliContext {
    pub manager: LedgerManager,
    pub config: Config,
    pub base: PathBuf,
}

impl CliContext {
    fn open(base: PathBuf, materialize: bool) -> CliResult<Self> {
        let config = ConfigManager::with_base_dir(base.clone())?.load()?;
        let storage = JsonStorage::new(Some(base.clone()), Some(config.backup_retention))?;
        let options = OpenOptions {
            materialize_recurring: materialize && config.materialize_on_open,
            lenient: false,
        };
        let manager = LedgerManager::open(Box::new(storage), resolve_clock()?, options)?;
        Ok(Self {
            manager,
            config,
            base,
        })
    }

    pub fn currency(&self) -> &str {
        &self.config.currency
    }

    pub fn today(&self) -> NaiveDate {
        self.manager.today()
    }
}

fn resolve_clock() -> CliResult<Arc<dyn Clock>> {
    match env::var(TODAY_ENV) {
        Ok(raw) if !raw.trim().is_empty() => {
            let date = flexible_date::parse(&raw)
                .ok_or_else(|| CliError::Usage(format!("{TODAY_ENV} is not a date: `{raw}`")))?;
            Ok(Arc::new(FixedClock::on(date)))
        }
        _ => Ok(Arc::new(SystemClock)),
    }
}

/// Runs one command. `args` excludes the program name.
pub fn run_cli<I>(args: I) -> CliResult<()>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let command = args.next().unwrap_or_else(|| "help".to_string());
    let rest: Vec<String> = args.collect();

    if matches!(command.as_str(), "help" | "--help" | "-h") {
        commands::print_usage();
        return Ok(());
    }

    let base = app_data_dir();
    let materialize = command != "materialize";
    let mut ctx = CliContext::open(base, materialize)?;

    match command.as_str() {
        "summary" => commands::summary(&ctx, rest.first()),
        "budgets" => commands::budgets(&ctx, rest.first()),
        "goals" => commands::goals(&ctx),
        "debts" => commands::debts(&ctx),
        "schedule" => commands::schedule(&ctx, rest.first(), rest.get(1)),
        "trend" => commands::trend(&ctx, rest.first()),
        "recurring" => commands::recurring(&ctx),
        "holiday" => commands::holiday(&ctx),
        "aguinaldo" => commands::aguinaldo(&mut ctx, rest.first(), rest.get(1)),
        "materialize" => commands::materialize(&mut ctx),
        "export" => commands::export(&ctx, rest.first()),
        "import" => commands::import(&mut ctx, rest.first()),
        "backup" => commands::backup(&ctx, &rest),
        "backups" => commands::backups(&ctx),
        other => Err(CliError::Usage(format!(
            "unknown command `{other}`; run `finance_core_cli help`"
        ))),
    }
}
