use crate::{AffinitySpec, AffinityTable, Catalog, CatalogError};
use camino::Utf8Path;
use fs_err as fs;
use serde::{Deserialize, Serialize};
use tracing::debug;
use tunewise_types::{Modification, schema};

/// On-disk catalog envelope (JSON or TOML).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default = "default_schema")]
    pub schema: String,

    #[serde(default)]
    pub modifications: Vec<Modification>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affinity: Option<AffinitySpec>,
}

fn default_schema() -> String {
    schema::TUNEWISE_CATALOG_V1.to_string()
}

impl CatalogFile {
    pub fn from_catalog(catalog: &Catalog) -> Self {
        Self {
            schema: default_schema(),
            modifications: catalog.modifications().to_vec(),
            affinity: Some(catalog.affinity().to_spec()),
        }
    }

    pub fn into_catalog(self) -> Result<Catalog, CatalogError> {
        if self.schema != schema::TUNEWISE_CATALOG_V1 {
            return Err(CatalogError::Schema { found: self.schema });
        }
        let affinity = match &self.affinity {
            Some(spec) => AffinityTable::from_spec(spec)?,
            None => AffinityTable::builtin(),
        };
        Catalog::with_affinity(self.modifications, affinity)
    }
}

pub fn parse_catalog_json(text: &str, origin: &str) -> Result<Catalog, CatalogError> {
    let file: CatalogFile = serde_json::from_str(text).map_err(|e| CatalogError::Parse {
        path: origin.to_string(),
        message: e.to_string(),
    })?;
    file.into_catalog()
}

pub fn parse_catalog_toml(text: &str, origin: &str) -> Result<Catalog, CatalogError> {
    let file: CatalogFile = toml::from_str(text).map_err(|e| CatalogError::Parse {
        path: origin.to_string(),
        message: e.to_string(),
    })?;
    file.into_catalog()
}

/// Loads and validates a catalog file. The format follows the extension.
pub fn load_catalog(path: &Utf8Path) -> Result<Catalog, CatalogError> {
    debug!(path = %path, "loading catalog");

    let text = fs::read_to_string(path).map_err(|e| CatalogError::Io {
        path: path.to_string(),
        message: e.to_string(),
    })?;

    let catalog = match path.extension().map(|e| e.to_ascii_lowercase()).as_deref() {
        Some("json") => parse_catalog_json(&text, path.as_str())?,
        Some("toml") => parse_catalog_toml(&text, path.as_str())?,
        _ => {
            return Err(CatalogError::UnsupportedFormat {
                path: path.to_string(),
            });
        }
    };

    debug!(path = %path, modifications = catalog.len(), "catalog loaded");
    Ok(catalog)
}
