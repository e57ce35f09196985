use std::{fs, path::Path, sync::Arc};

use chrono::NaiveDate;
use tracing::info;

use crate::core::services::TransactionService;
use crate::core::time::Clock;
use crate::errors::FinanceResult;
use crate::ledger::Ledger;
use crate::storage::{self, ExportSnapshot, StorageBackend};
use crate::utils::files::write_atomic;

#[derive(Debug, Clone, Copy)]
pub struct OpenOptions {
    /// Generate this month's due recurring instances right after loading.
    pub materialize_recurring: bool,
    /// Treat unreadable keys as empty instead of failing.
    pub lenient: bool,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self {
            materialize_recurring: true,
            lenient: false,
        }
    }
}

/// Facade that coordinates ledger state, persistence, and backups.
pub struct LedgerManager {
    ledger: Ledger,
    storage: Box<dyn StorageBackend>,
    clock: Arc<dyn Clock>,
    lenient: bool,
    materialized_on_open: Vec<String>,
}

impl LedgerManager {
    /// Loads the ledger from `storage`. When materialization generates new
    /// instances the ledger is saved straight away; otherwise nothing is written.
    pub fn open(
        storage: Box<dyn StorageBackend>,
        clock: Arc<dyn Clock>,
        options: OpenOptions,
    ) -> FinanceResult<Self> {
        let ledger = storage::load_ledger(storage.as_ref(), options.lenient)?;
        let mut manager = Self {
            ledger,
            storage,
            clock,
            lenient: options.lenient,
            materialized_on_open: Vec::new(),
        };
        if options.materialize_recurring {
            manager.materialized_on_open = manager.materialize_recurring()?;
        }
        Ok(manager)
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut Ledger {
        &mut self.ledger
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn storage(&self) -> &dyn StorageBackend {
        self.storage.as_ref()
    }

    /// Identifiers of the instances generated while opening.
    pub fn materialized_on_open(&self) -> &[String] {
        &self.materialized_on_open
    }

    pub fn save(&self) -> FinanceResult<()> {
        storage::save_ledger(self.storage.as_ref(), &self.ledger)?;
        info!(transactions = self.ledger.transactions.len(), "ledger saved");
        Ok(())
    }

    /// Discards in-memory changes and reloads from storage.
    pub fn reload(&mut self) -> FinanceResult<()> {
        self.ledger = storage::load_ledger(self.storage.as_ref(), self.lenient)?;
        Ok(())
    }

    /// Materializes due recurring instances and persists them when any were
    /// generated.
    pub fn materialize_recurring(&mut self) -> FinanceResult<Vec<String>> {
        let created = TransactionService::materialize_recurring(&mut self.ledger, self.clock.as_ref());
        if !created.is_empty() {
            self.save()?;
        }
        Ok(created)
    }

    pub fn export_snapshot(&self) -> ExportSnapshot {
        ExportSnapshot::from_ledger(&self.ledger, self.clock.now())
    }

    pub fn export_to(&self, path: &Path) -> FinanceResult<()> {
        let json = self.export_snapshot().to_json_pretty()?;
        write_atomic(path, &json)?;
        info!(path = %path.display(), "ledger exported");
        Ok(())
    }

    /// Validates the snapshot in full before touching the ledger or storage.
    pub fn import_json(&mut self, json: &str) -> FinanceResult<()> {
        let snapshot = ExportSnapshot::parse(json)?;
        let mut next = self.ledger.clone();
        snapshot.apply_to(&mut next);
        storage::save_ledger(self.storage.as_ref(), &next)?;
        self.ledger = next;
        Ok(())
    }

    pub fn import_from(&mut self, path: &Path) -> FinanceResult<()> {
        let json = fs::read_to_string(path)?;
        self.import_json(&json)
    }

    pub fn backup(&self, note: Option<&str>) -> FinanceResult<String> {
        self.storage.backup(note)
    }

    pub fn list_backups(&self) -> FinanceResult<Vec<String>> {
        self.storage.list_backups()
    }

    pub fn restore_backup(&mut self, name: &str) -> FinanceResult<()> {
        self.storage.restore_backup(name)?;
        self.reload()
    }

    /// Removes every stored key and empties the in-memory ledger.
    pub fn clear_all(&mut self) -> FinanceResult<()> {
        storage::clear_all(self.storage.as_ref())?;
        self.ledger = Ledger::new();
        info!("all data cleared");
        Ok(())
    }
}
