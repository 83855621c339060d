//! Where fiqh keeps its settings database and user-supplied data files.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "FIQH_DATA_DIR";

const CONFIG_DB_FILE: &str = "config.redb";

#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    /// Pick the data directory and make sure it exists.
    ///
    /// `--data-dir` wins over [`DATA_DIR_ENV`], which wins over
    /// `$XDG_DATA_HOME/fiqh`.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let root = match explicit {
            Some(path) => path.to_path_buf(),
            None => from_env().map_or_else(xdg_data_home, Ok)?,
        };

        std::fs::create_dir_all(&root)
            .map_err(|_| Error::DataDir(root.clone()))?;

        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_db(&self) -> PathBuf {
        self.root.join(CONFIG_DB_FILE)
    }

    /// Path of a replacement catalog or stem table named in the settings.
    ///
    /// Relative names are looked up inside the data directory, so
    /// `fiqh config set catalog my-catalog.json` works from any cwd.
    pub fn asset_path(&self, configured: &str) -> PathBuf {
        let path = Path::new(configured.trim());
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

fn from_env() -> Option<PathBuf> {
    std::env::var_os(DATA_DIR_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn xdg_data_home() -> Result<PathBuf> {
    xdg::BaseDirectories::with_prefix("fiqh")
        .get_data_home()
        .ok_or_else(|| {
            Error::Config("could not determine XDG data home directory".into())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_wins_and_is_created() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("fiqh").join("data");
        let dir = DataDir::resolve(Some(&nested)).unwrap();

        assert!(dir.root().is_dir());
        assert_eq!(dir.config_db(), nested.join("config.redb"));
    }

    #[test]
    fn relative_asset_names_live_in_data_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = DataDir::resolve(Some(tmp.path())).unwrap();

        assert_eq!(
            dir.asset_path("stems.json"),
            tmp.path().join("stems.json")
        );
        assert_eq!(
            dir.asset_path(" custom/catalog.json "),
            tmp.path().join("custom").join("catalog.json")
        );
    }

    #[test]
    fn absolute_asset_paths_are_kept() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = DataDir::resolve(Some(tmp.path())).unwrap();
        let elsewhere = tmp.path().join("elsewhere.json");

        assert_eq!(
            dir.asset_path(elsewhere.to_str().unwrap()),
            elsewhere
        );
    }
}
