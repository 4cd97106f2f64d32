//! Configuration file loading for tunewise.
//!
//! Discovers and loads `tunewise.toml` from the working directory (or an
//! explicit `--config` path). Merges config file settings with CLI arguments
//! (CLI takes precedence).

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use serde::Deserialize;
use tracing::debug;
use tunewise_core::settings::{DEFAULT_ENRICH_TIMEOUT_MS, RecommendSettings};

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "tunewise.toml";

/// Top-level configuration from tunewise.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TunewiseConfig {
    /// Catalog source.
    pub catalog: CatalogConfig,

    /// Engine options.
    pub engine: EngineConfig,

    /// External enricher.
    pub enrichment: EnrichmentConfig,

    /// Output defaults.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Catalog file (JSON or TOML), relative to the config file.
    pub path: Option<Utf8PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Reject budgets below the cheapest matching modification.
    pub strict_budget: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    /// Run the enricher on every `recommend`.
    pub enabled: bool,

    /// Program to spawn. Receives the report on stdin.
    pub command: Option<String>,

    /// Arguments passed to `command`.
    pub args: Vec<String>,

    /// Give up after this many milliseconds.
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for report.json, report.md and run.json.
    pub dir: Option<Utf8PathBuf>,

    /// Default stdout format.
    pub format: Option<ReportFormat>,
}

/// Stdout format for a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Markdown,
    Json,
}

/// Discover the tunewise.toml config file.
///
/// Searches for `tunewise.toml` in `dir`. Returns `None` if no config file is found.
pub fn discover_config(dir: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse a tunewise.toml config file.
///
/// Relative paths inside the file are resolved against the file's directory.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<TunewiseConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    let mut config =
        parse_config(&contents).with_context(|| format!("parse config file {}", path))?;

    let base = path.parent().unwrap_or(Utf8Path::new(""));
    config.catalog.path = config.catalog.path.map(|p| resolve(base, p));
    config.output.dir = config.output.dir.map(|p| resolve(base, p));
    Ok(config)
}

fn resolve(base: &Utf8Path, path: Utf8PathBuf) -> Utf8PathBuf {
    if path.is_absolute() || base.as_str().is_empty() {
        path
    } else {
        base.join(path)
    }
}

/// Parse a config file from a string.
pub fn parse_config(contents: &str) -> anyhow::Result<TunewiseConfig> {
    let config: TunewiseConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load the explicit config if given, else discover one in `dir`, else defaults.
pub fn load_or_default(
    explicit: Option<&Utf8Path>,
    dir: &Utf8Path,
) -> anyhow::Result<TunewiseConfig> {
    if let Some(path) = explicit {
        return load_config(path);
    }
    match discover_config(dir) {
        Some(path) => load_config(&path),
        None => Ok(TunewiseConfig::default()),
    }
}

/// Recommend flags that can override the config file.
#[derive(Debug, Clone, Default)]
pub struct RecommendOverrides {
    pub catalog: Option<Utf8PathBuf>,
    pub strict_budget: bool,
    pub enrich: bool,
    pub no_enrich: bool,
    pub no_validate: bool,
    pub out_dir: Option<Utf8PathBuf>,
    pub format: Option<ReportFormat>,
}

/// Merged configuration combining config file and CLI arguments.
///
/// CLI arguments take precedence over config file settings.
#[derive(Debug, Clone)]
pub struct MergedConfig {
    pub settings: RecommendSettings,
    pub format: ReportFormat,
}

/// Builder for merging config file with CLI arguments.
pub struct ConfigMerger {
    config: TunewiseConfig,
}

impl ConfigMerger {
    /// Create a new merger from a loaded config.
    pub fn new(config: TunewiseConfig) -> Self {
        Self { config }
    }

    /// Catalog path for commands that only read the catalog.
    pub fn catalog_path(&self, cli_catalog: Option<Utf8PathBuf>) -> Option<Utf8PathBuf> {
        cli_catalog.or_else(|| self.config.catalog.path.clone())
    }

    /// Merge with recommend command CLI arguments.
    ///
    /// Boolean flags switch features on; `no_enrich` wins over both sources.
    pub fn merge_recommend_args(self, cli: RecommendOverrides) -> MergedConfig {
        let catalog_path = self.catalog_path(cli.catalog);
        let TunewiseConfig {
            engine,
            enrichment,
            output,
            ..
        } = self.config;

        let enrich = !cli.no_enrich && (cli.enrich || enrichment.enabled);

        MergedConfig {
            settings: RecommendSettings {
                catalog_path,
                strict_budget: cli.strict_budget || engine.strict_budget,
                validate: !cli.no_validate,
                enrich,
                enrich_command: enrichment.command,
                enrich_args: enrichment.args,
                enrich_timeout_ms: enrichment.timeout_ms.unwrap_or(DEFAULT_ENRICH_TIMEOUT_MS),
                out_dir: cli.out_dir.or(output.dir),
            },
            format: cli.format.or(output.format).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_config() {
        let contents = r#"
[catalog]
path = "catalog.toml"

[engine]
strict_budget = true

[enrichment]
enabled = true
command = "tunewise-notes"
args = ["--short"]
timeout_ms = 2500

[output]
dir = "out"
format = "markdown"
"#;

        let config = parse_config(contents).unwrap();
        assert_eq!(config.catalog.path.as_deref(), Some(Utf8Path::new("catalog.toml")));
        assert!(config.engine.strict_budget);
        assert!(config.enrichment.enabled);
        assert_eq!(config.enrichment.command.as_deref(), Some("tunewise-notes"));
        assert_eq!(config.enrichment.args, vec!["--short"]);
        assert_eq!(config.enrichment.timeout_ms, Some(2500));
        assert_eq!(config.output.format, Some(ReportFormat::Markdown));
    }

    #[test]
    fn test_parse_empty_config() {
        let config = parse_config("").unwrap();
        assert!(config.catalog.path.is_none());
        assert!(!config.engine.strict_budget);
        assert!(!config.enrichment.enabled);
        assert!(config.output.format.is_none());
    }

    #[test]
    fn test_parse_rejects_unknown_format() {
        assert!(parse_config("[output]\nformat = \"yaml\"\n").is_err());
    }

    #[test]
    fn test_discover_and_resolve_relative_paths() {
        let temp = TempDir::new().unwrap();
        let dir = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        assert!(discover_config(&dir).is_none());

        fs::write(
            dir.join(CONFIG_FILE_NAME),
            "[catalog]\npath = \"cat.json\"\n[output]\ndir = \"/abs/out\"\n",
        )
        .unwrap();
        let found = discover_config(&dir).expect("config");
        let config = load_config(&found).unwrap();
        assert_eq!(config.catalog.path, Some(dir.join("cat.json")));
        assert_eq!(config.output.dir, Some(Utf8PathBuf::from("/abs/out")));
    }

    #[test]
    fn test_load_or_default_without_file() {
        let temp = TempDir::new().unwrap();
        let dir = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        let config = load_or_default(None, &dir).unwrap();
        assert!(config.catalog.path.is_none());

        let missing = dir.join("nope.toml");
        assert!(load_or_default(Some(&missing), &dir).is_err());
    }

    #[test]
    fn test_cli_overrides_config() {
        let config = parse_config(
            r#"
[catalog]
path = "from-config.json"
[enrichment]
enabled = true
command = "notes"
[output]
format = "json"
"#,
        )
        .unwrap();

        let merged = ConfigMerger::new(config.clone()).merge_recommend_args(RecommendOverrides {
            catalog: Some("from-cli.toml".into()),
            format: Some(ReportFormat::Text),
            ..RecommendOverrides::default()
        });
        assert_eq!(
            merged.settings.catalog_path,
            Some(Utf8PathBuf::from("from-cli.toml"))
        );
        assert_eq!(merged.format, ReportFormat::Text);
        assert!(merged.settings.enrich);
        assert_eq!(merged.settings.enrich_command.as_deref(), Some("notes"));
        assert_eq!(merged.settings.enrich_timeout_ms, DEFAULT_ENRICH_TIMEOUT_MS);

        let merged = ConfigMerger::new(config).merge_recommend_args(RecommendOverrides {
            no_enrich: true,
            ..RecommendOverrides::default()
        });
        assert!(!merged.settings.enrich);
        assert_eq!(merged.format, ReportFormat::Json);
        assert_eq!(
            merged.settings.catalog_path,
            Some(Utf8PathBuf::from("from-config.json"))
        );
    }

    #[test]
    fn test_defaults_without_config() {
        let merged = ConfigMerger::new(TunewiseConfig::default())
            .merge_recommend_args(RecommendOverrides::default());
        assert_eq!(merged.format, ReportFormat::Text);
        assert!(merged.settings.validate);
        assert!(!merged.settings.strict_budget);
        assert!(merged.settings.catalog_path.is_none());
        assert!(merged.settings.out_dir.is_none());
    }
}
