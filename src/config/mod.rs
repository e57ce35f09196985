use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::info;

use crate::errors::{FinanceError, FinanceResult};
use crate::ledger::Allocations;
use crate::utils::{
    ensure_dir,
    files::{is_plain_file_name, list_backup_names, next_backup_name, write_atomic},
    PathResolver,
};

const BACKUP_PREFIX: &str = "config";

/// User preferences. Missing fields fall back to their defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    /// Months shown by the income/expense trend.
    pub trend_months: u32,
    pub amortization_periods: u32,
    /// Percentage withheld from the aguinaldo.
    pub aguinaldo_tax_rate: f64,
    pub aguinaldo_plan: Allocations,
    pub backup_retention: usize,
    pub materialize_on_open: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "es-AR".into(),
            currency: "ARS".into(),
            trend_months: 6,
            amortization_periods: 12,
            aguinaldo_tax_rate: 13.0,
            aguinaldo_plan: Allocations::default_plan(),
            backup_retention: 5,
            materialize_on_open: true,
        }
    }
}

pub struct ConfigManager {
    path: PathBuf,
    backups_dir: PathBuf,
}

impl ConfigManager {
    pub fn new() -> FinanceResult<Self> {
        Self::with_base_dir(PathResolver::resolve_base(None))
    }

    pub fn with_base_dir(base: PathBuf) -> FinanceResult<Self> {
        ensure_dir(&base)?;
        let backups_dir = PathResolver::config_backup_dir_in(&base);
        ensure_dir(&backups_dir)?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
            backups_dir,
        })
    }

    pub fn load(&self) -> FinanceResult<Config> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> FinanceResult<()> {
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)?;
        Ok(())
    }

    pub fn backup(&self, config: &Config, note: Option<&str>) -> FinanceResult<String> {
        ensure_dir(&self.backups_dir)?;
        let name = next_backup_name(&self.backups_dir, BACKUP_PREFIX, chrono::Utc::now(), note)?;
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.backups_dir.join(&name), &json)?;
        info!(backup = %name, "configuration backup created");
        Ok(name)
    }

    /// Loads a backup and makes it the active configuration.
    pub fn restore(&self, backup_name: &str) -> FinanceResult<Config> {
        if !is_plain_file_name(backup_name) {
            return Err(FinanceError::Validation(format!(
                "configuration backup name `{}` must be a file name",
                backup_name
            )));
        }
        let path = self.backups_dir.join(backup_name);
        if !path.exists() {
            return Err(FinanceError::NotFound(format!(
                "configuration backup `{}`",
                backup_name
            )));
        }
        let data = fs::read_to_string(&path)?;
        let config: Config = serde_json::from_str(&data)?;
        self.save(&config)?;
        Ok(config)
    }

    pub fn list_backups(&self) -> FinanceResult<Vec<String>> {
        Ok(list_backup_names(&self.backups_dir)?)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
