use std::path::Path;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

use crate::error::{Error, Result};

const SETTINGS: TableDefinition<&str, &str> = TableDefinition::new("settings");

/// Path to a catalog JSON file replacing the bundled one.
pub const CATALOG_PATH: &str = "catalog";
/// Path to a stem JSON file replacing the bundled one.
pub const STEMS_PATH: &str = "stems";
pub const WEIGHT_DIRECT: &str = "weight.direct";
pub const WEIGHT_PARTIAL: &str = "weight.partial";
pub const WEIGHT_STEM: &str = "weight.stem";
pub const MIN_SCORE: &str = "min_score";
pub const STEM_PREFIX_LEN: &str = "stem_prefix_len";

/// Every key `config set` accepts.
pub const KNOWN_SETTINGS: &[&str] = &[
    CATALOG_PATH,
    STEMS_PATH,
    WEIGHT_DIRECT,
    WEIGHT_PARTIAL,
    WEIGHT_STEM,
    MIN_SCORE,
    STEM_PREFIX_LEN,
];

const NUMERIC_SETTINGS: &[&str] = &[
    WEIGHT_DIRECT,
    WEIGHT_PARTIAL,
    WEIGHT_STEM,
    MIN_SCORE,
    STEM_PREFIX_LEN,
];

/// Persistent key/value settings.
pub struct ConfigDb {
    db: Database,
}

impl ConfigDb {
    pub fn open(path: &Path) -> Result<Self> {
        let db = Database::create(path)?;

        // Ensure the table exists so read transactions never miss it.
        let txn = db.begin_write()?;
        txn.open_table(SETTINGS)?;
        txn.commit()?;

        Ok(Self { db })
    }

    /// Store a setting after checking the key and value shape.
    pub fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        validate_setting(key, value)?;

        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(SETTINGS)?;
            table.insert(key, value)?;
        }
        txn.commit()?;
        Ok(())
    }

    pub fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(SETTINGS)?;
        Ok(table.get(key)?.map(|v| v.value().to_string()))
    }

    /// Parse a numeric setting, `None` when unset.
    pub fn get_number<T: std::str::FromStr>(&self, key: &str) -> Result<Option<T>> {
        match self.get_setting(key)? {
            Some(raw) => raw.trim().parse().map(Some).map_err(|_| {
                Error::Config(format!("setting '{key}' is not a number: {raw}"))
            }),
            None => Ok(None),
        }
    }

    pub fn remove_setting(&self, key: &str) -> Result<bool> {
        let txn = self.db.begin_write()?;
        let removed = {
            let mut table = txn.open_table(SETTINGS)?;
            table.remove(key)?.is_some()
        };
        txn.commit()?;
        Ok(removed)
    }

    pub fn list_settings(&self) -> Result<Vec<(String, String)>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(SETTINGS)?;
        let mut result = Vec::new();
        for entry in table.iter()? {
            let (k, v) = entry?;
            result.push((k.value().to_string(), v.value().to_string()));
        }
        Ok(result)
    }
}

fn validate_setting(key: &str, value: &str) -> Result<()> {
    if !KNOWN_SETTINGS.contains(&key) {
        return Err(Error::Config(format!(
            "unknown setting '{key}' (expected one of: {})",
            KNOWN_SETTINGS.join(", ")
        )));
    }
    if NUMERIC_SETTINGS.contains(&key) && value.trim().parse::<u32>().is_err() {
        return Err(Error::Config(format!(
            "setting '{key}' expects a non-negative integer, got '{value}'"
        )));
    }
    if value.trim().is_empty() {
        return Err(Error::Config(format!("setting '{key}' cannot be empty")));
    }
    Ok(())
}

impl std::fmt::Debug for ConfigDb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigDb").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> (tempfile::TempDir, ConfigDb) {
        let tmp = tempfile::tempdir().unwrap();
        let db = ConfigDb::open(&tmp.path().join("config.db")).unwrap();
        (tmp, db)
    }

    #[test]
    fn settings_crud() {
        let (_tmp, db) = test_db();

        assert_eq!(db.get_setting(MIN_SCORE).unwrap(), None);

        db.set_setting(MIN_SCORE, "4").unwrap();
        assert_eq!(db.get_setting(MIN_SCORE).unwrap(), Some("4".to_string()));
        assert_eq!(db.get_number::<u32>(MIN_SCORE).unwrap(), Some(4));

        let settings = db.list_settings().unwrap();
        assert_eq!(settings, vec![(MIN_SCORE.to_string(), "4".to_string())]);

        assert!(db.remove_setting(MIN_SCORE).unwrap());
        assert!(!db.remove_setting(MIN_SCORE).unwrap());
        assert_eq!(db.get_number::<u32>(MIN_SCORE).unwrap(), None);
    }

    #[test]
    fn unknown_key_is_rejected() {
        let (_tmp, db) = test_db();
        let err = db.set_setting("provider", "deepseek").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(db.list_settings().unwrap().is_empty());
    }

    #[test]
    fn numeric_settings_must_parse() {
        let (_tmp, db) = test_db();
        assert!(db.set_setting(WEIGHT_STEM, "two").is_err());
        assert!(db.set_setting(WEIGHT_STEM, "-1").is_err());
        db.set_setting(WEIGHT_STEM, " 2 ").unwrap();
        assert_eq!(db.get_number::<u32>(WEIGHT_STEM).unwrap(), Some(2));
    }

    #[test]
    fn empty_path_is_rejected() {
        let (_tmp, db) = test_db();
        assert!(db.set_setting(CATALOG_PATH, "  ").is_err());
    }

    #[test]
    fn reopen_preserves_data() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.db");

        {
            let db = ConfigDb::open(&path).unwrap();
            db.set_setting(CATALOG_PATH, "/srv/fiqh/catalog.json").unwrap();
        }

        {
            let db = ConfigDb::open(&path).unwrap();
            assert_eq!(
                db.get_setting(CATALOG_PATH).unwrap(),
                Some("/srv/fiqh/catalog.json".to_string())
            );
        }
    }
}
