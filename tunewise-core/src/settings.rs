//! Clap-free settings for the recommend pipeline.

use camino::Utf8PathBuf;

pub const DEFAULT_ENRICH_TIMEOUT_MS: u64 = 10_000;

/// Settings for the recommend pipeline.
#[derive(Debug, Clone)]
pub struct RecommendSettings {
    /// Catalog file (JSON or TOML). `None` uses the built-in table.
    pub catalog_path: Option<Utf8PathBuf>,

    // Engine
    pub strict_budget: bool,

    // Intake
    pub validate: bool,

    // Enrichment
    pub enrich: bool,
    pub enrich_command: Option<String>,
    pub enrich_args: Vec<String>,
    pub enrich_timeout_ms: u64,

    // Output
    pub out_dir: Option<Utf8PathBuf>,
}

impl Default for RecommendSettings {
    fn default() -> Self {
        Self {
            catalog_path: None,
            strict_budget: false,
            validate: true,
            enrich: false,
            enrich_command: None,
            enrich_args: Vec::new(),
            enrich_timeout_ms: DEFAULT_ENRICH_TIMEOUT_MS,
            out_dir: None,
        }
    }
}
