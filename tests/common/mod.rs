#![allow(dead_code)]

use std::{path::PathBuf, sync::Arc, sync::Mutex};

use chrono::NaiveDate;
use finance_core::{
    config::ConfigManager,
    core::{FixedClock, LedgerManager, OpenOptions},
    storage::JsonStorage,
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a fresh data directory that outlives the calling test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// Opens a manager over `base` whose clock is pinned to `today`.
pub fn open_manager(base: &PathBuf, today: NaiveDate) -> LedgerManager {
    let storage = JsonStorage::new(Some(base.clone()), Some(3)).expect("create json storage backend");
    LedgerManager::open(
        Box::new(storage),
        Arc::new(FixedClock::on(today)),
        OpenOptions::default(),
    )
    .expect("open ledger manager")
}

/// Creates isolated managers backed by unique directories for each test.
pub fn setup_test_env(today: NaiveDate) -> (LedgerManager, ConfigManager, PathBuf) {
    let base = temp_base();
    let ledger_manager = open_manager(&base, today);
    let config_manager =
        ConfigManager::with_base_dir(base.clone()).expect("create config manager for temp dir");
    (ledger_manager, config_manager, base)
}
