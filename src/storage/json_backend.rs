use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::Utc;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::{
    errors::{FinanceError, FinanceResult},
    utils::{
        ensure_dir,
        files::{is_plain_file_name, list_backup_names, next_backup_name, write_atomic},
        PathResolver,
    },
};

use super::{StorageBackend, ALL_KEYS};

const DATA_EXTENSION: &str = "json";
const BACKUP_PREFIX: &str = "snapshot";
const DEFAULT_RETENTION: usize = 5;

/// One JSON file per key under `<root>/data`, with full-snapshot backups
/// under `<root>/backups`.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    root: PathBuf,
    data_dir: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>, retention: Option<usize>) -> FinanceResult<Self> {
        let app_root = PathResolver::resolve_base(root);
        ensure_dir(&app_root)?;
        let data_dir = PathResolver::data_dir_in(&app_root);
        let backups_dir = PathResolver::backup_dir_in(&app_root);
        ensure_dir(&data_dir)?;
        ensure_dir(&backups_dir)?;
        Ok(Self {
            root: app_root,
            data_dir,
            backups_dir,
            retention: retention.unwrap_or(DEFAULT_RETENTION).max(1),
        })
    }

    pub fn new_default() -> FinanceResult<Self> {
        Self::new(None, None)
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    pub fn key_path(&self, key: &str) -> PathBuf {
        self.data_dir
            .join(format!("{}.{}", canonical_key(key), DATA_EXTENSION))
    }

    pub fn backup_path(&self, backup_name: &str) -> PathBuf {
        self.backups_dir.join(backup_name)
    }

    fn snapshot(&self) -> FinanceResult<Map<String, Value>> {
        let mut snapshot = Map::new();
        for key in ALL_KEYS {
            if let Some(raw) = self.read(key)? {
                let value = serde_json::from_str(&raw).unwrap_or(Value::String(raw));
                snapshot.insert(key.to_string(), value);
            }
        }
        Ok(snapshot)
    }

    fn apply_keys(&self, values: &[(&str, Option<String>)]) -> FinanceResult<()> {
        for (key, raw) in values {
            match raw {
                Some(raw) => self.write(key, raw)?,
                None => self.remove(key)?,
            }
        }
        Ok(())
    }

    /// Keeps the `retention` newest backups. `created` always survives.
    fn prune_backups(&self, created: &str) -> FinanceResult<()> {
        let backups = list_backup_names(&self.backups_dir)?;
        let older = backups.iter().filter(|name| name.as_str() != created);
        for name in older.skip(self.retention - 1) {
            if let Err(err) = fs::remove_file(self.backup_path(name)) {
                warn!(backup = %name, error = %err, "failed to prune backup");
            }
        }
        Ok(())
    }
}

impl StorageBackend for JsonStorage {
    fn read(&self, key: &str) -> FinanceResult<Option<String>> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn write(&self, key: &str, value: &str) -> FinanceResult<()> {
        let path = self.key_path(key);
        write_atomic(&path, value)?;
        debug!(key, path = %path.display(), "key written");
        Ok(())
    }

    fn remove(&self, key: &str) -> FinanceResult<()> {
        let path = self.key_path(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn backup(&self, note: Option<&str>) -> FinanceResult<String> {
        ensure_dir(&self.backups_dir)?;
        let snapshot = self.snapshot()?;
        let name = next_backup_name(&self.backups_dir, BACKUP_PREFIX, Utc::now(), note)?;
        let json = serde_json::to_string_pretty(&Value::Object(snapshot))?;
        write_atomic(&self.backup_path(&name), &json)?;
        self.prune_backups(&name)?;
        info!(backup = %name, "backup created");
        Ok(name)
    }

    fn list_backups(&self) -> FinanceResult<Vec<String>> {
        Ok(list_backup_names(&self.backups_dir)?)
    }

    /// Replaces every key with the backup's contents. Keys absent from the
    /// backup are removed. A failed write rolls the keys back.
    fn restore_backup(&self, name: &str) -> FinanceResult<()> {
        if !is_plain_file_name(name) {
            return Err(FinanceError::Validation(format!(
                "backup name `{name}` must be a file name"
            )));
        }
        let path = self.backup_path(name);
        if !path.exists() {
            return Err(FinanceError::NotFound(format!("backup `{name}`")));
        }
        let data = fs::read_to_string(&path)?;
        let snapshot: Map<String, Value> = serde_json::from_str(&data)?;
        let staged = ALL_KEYS
            .iter()
            .map(|key| -> FinanceResult<(&'static str, Option<String>)> {
                let raw = snapshot
                    .get(*key)
                    .map(|value| serde_json::to_string(value))
                    .transpose()?;
                Ok((*key, raw))
            })
            .collect::<FinanceResult<Vec<_>>>()?;
        let previous = ALL_KEYS
            .iter()
            .map(|key| self.read(key).map(|raw| (*key, raw)))
            .collect::<FinanceResult<Vec<_>>>()?;
        if let Err(err) = self.apply_keys(&staged) {
            warn!(backup = %name, error = %err, "restore failed, rolling back");
            if let Err(rollback) = self.apply_keys(&previous) {
                warn!(error = %rollback, "rollback after failed restore failed");
            }
            return Err(err);
        }
        info!(backup = %name, "backup restored");
        Ok(())
    }
}

fn canonical_key(key: &str) -> String {
    let sanitized: String = key
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '_' | '-' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "value".into()
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{BUDGETS_KEY, TRANSACTIONS_KEY};
    use tempfile::TempDir;

    fn storage_with_temp_dir(retention: usize) -> (JsonStorage, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let storage = JsonStorage::new(Some(temp.path().to_path_buf()), Some(retention))
            .expect("json storage");
        (storage, temp)
    }

    #[test]
    fn write_and_read_roundtrip() {
        let (storage, _guard) = storage_with_temp_dir(3);
        storage.write(TRANSACTIONS_KEY, "[]").unwrap();
        assert_eq!(storage.read(TRANSACTIONS_KEY).unwrap().as_deref(), Some("[]"));
        assert!(storage
            .key_path(TRANSACTIONS_KEY)
            .ends_with("data/blackfinance_transactions.json"));
        storage.remove(TRANSACTIONS_KEY).unwrap();
        assert!(storage.read(TRANSACTIONS_KEY).unwrap().is_none());
    }

    #[test]
    fn backup_and_restore() {
        let (storage, _guard) = storage_with_temp_dir(3);
        storage.write(BUDGETS_KEY, r#"[{"a":1}]"#).unwrap();
        let name = storage.backup(Some("before change")).unwrap();
        assert!(name.contains("before-change"));

        storage.write(BUDGETS_KEY, "[]").unwrap();
        storage.write(TRANSACTIONS_KEY, "[]").unwrap();
        storage.restore_backup(&name).unwrap();

        assert_eq!(storage.read(BUDGETS_KEY).unwrap().as_deref(), Some(r#"[{"a":1}]"#));
        assert!(storage.read(TRANSACTIONS_KEY).unwrap().is_none());
    }

    #[test]
    fn retention_prunes_oldest_backups() {
        let (storage, _guard) = storage_with_temp_dir(2);
        for _ in 0..4 {
            storage.backup(None).unwrap();
        }
        assert_eq!(storage.list_backups().unwrap().len(), 2);
    }

    #[test]
    fn same_second_backups_keep_the_newest() {
        let (storage, _guard) = storage_with_temp_dir(1);
        storage.write(BUDGETS_KEY, "[1]").unwrap();
        storage.backup(Some("zeta")).unwrap();
        storage.write(BUDGETS_KEY, "[2]").unwrap();
        let newest = storage.backup(Some("alpha")).unwrap();

        assert_eq!(storage.list_backups().unwrap(), vec![newest.clone()]);
        storage.restore_backup(&newest).unwrap();
        assert_eq!(storage.read(BUDGETS_KEY).unwrap().as_deref(), Some("[2]"));
    }

    #[test]
    fn listing_starts_with_last_created() {
        let (storage, _guard) = storage_with_temp_dir(20);
        let created: Vec<String> = (0..11).map(|_| storage.backup(None).unwrap()).collect();
        let listed = storage.list_backups().unwrap();
        assert_eq!(listed.len(), 11);
        assert_eq!(listed.first(), created.last());
        assert_eq!(listed.last(), created.first());
    }

    #[test]
    fn restore_rejects_paths_outside_backups() {
        let (storage, guard) = storage_with_temp_dir(2);
        storage.write(BUDGETS_KEY, "[]").unwrap();
        let outside = guard.path().join("data").join("blackfinance_budgets.json");
        assert!(outside.exists());
        for name in ["../data/blackfinance_budgets.json", "..", "a/b.json"] {
            assert!(matches!(
                storage.restore_backup(name),
                Err(FinanceError::Validation(_))
            ));
        }
        assert_eq!(storage.read(BUDGETS_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn restoring_unknown_backup_fails() {
        let (storage, _guard) = storage_with_temp_dir(2);
        assert!(matches!(
            storage.restore_backup("snapshot_20240101_000000000.json"),
            Err(FinanceError::NotFound(_))
        ));
    }
}
