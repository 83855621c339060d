use tracing::info;

use crate::{
    catalog::Catalog,
    config_db::{self, ConfigDb},
    data_dir::DataDir,
    error::Result,
    matcher::{Matcher, Weights},
    stems::StemDictionary,
};

/// Immutable knowledge base: catalog, stem table and scoring weights.
///
/// Built once at startup and shared read-only by every request.
#[derive(Debug, Clone)]
pub struct Knowledge {
    pub catalog: Catalog,
    pub stems: StemDictionary,
    pub weights: Weights,
}

impl Knowledge {
    pub fn new(
        catalog: Catalog,
        stems: StemDictionary,
        weights: Weights,
    ) -> Result<Self> {
        weights.validate()?;
        Ok(Self {
            catalog,
            stems,
            weights,
        })
    }

    /// Bundled catalog and stems with default weights.
    pub fn bundled() -> Result<Self> {
        Self::new(
            Catalog::bundled()?,
            StemDictionary::bundled()?,
            Weights::default(),
        )
    }

    /// Load using the persisted settings, falling back to bundled data.
    ///
    /// Relative asset paths are resolved inside `data_dir`.
    pub fn from_settings(
        config_db: &ConfigDb,
        data_dir: &DataDir,
    ) -> Result<Self> {
        let catalog = match config_db.get_setting(config_db::CATALOG_PATH)? {
            Some(name) => {
                let path = data_dir.asset_path(&name);
                info!(path = %path.display(), "loading catalog");
                Catalog::load(&path)?
            }
            None => Catalog::bundled()?,
        };

        let stems = match config_db.get_setting(config_db::STEMS_PATH)? {
            Some(name) => {
                let path = data_dir.asset_path(&name);
                info!(path = %path.display(), "loading stem dictionary");
                StemDictionary::load(&path)?
            }
            None => StemDictionary::bundled()?,
        };

        let defaults = Weights::default();
        let weights = Weights {
            direct: config_db
                .get_number(config_db::WEIGHT_DIRECT)?
                .unwrap_or(defaults.direct),
            partial: config_db
                .get_number(config_db::WEIGHT_PARTIAL)?
                .unwrap_or(defaults.partial),
            stem: config_db
                .get_number(config_db::WEIGHT_STEM)?
                .unwrap_or(defaults.stem),
            min_score: config_db
                .get_number(config_db::MIN_SCORE)?
                .unwrap_or(defaults.min_score),
            stem_prefix_len: config_db
                .get_number(config_db::STEM_PREFIX_LEN)?
                .unwrap_or(defaults.stem_prefix_len),
        };

        info!(
            entries = catalog.len(),
            stems = stems.len(),
            "knowledge base ready"
        );
        Self::new(catalog, stems, weights)
    }

    pub fn matcher(&self) -> Matcher<'_> {
        Matcher::new(&self.catalog, &self.stems, self.weights)
    }
}
