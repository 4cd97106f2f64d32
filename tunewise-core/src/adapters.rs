//! Default port implementations.

use crate::ports::{CatalogSource, Enricher, WritePort};
use crate::settings::RecommendSettings;
use anyhow::{Context, bail};
use camino::{Utf8Path, Utf8PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;
use tunewise_catalog::Catalog;
use tunewise_types::{Enrichment, Report};

/// The compiled-in catalog.
#[derive(Debug, Clone, Default)]
pub struct BuiltinCatalogSource;

impl CatalogSource for BuiltinCatalogSource {
    fn load_catalog(&self) -> anyhow::Result<Catalog> {
        Catalog::try_builtin().context("validate built-in catalog")
    }
}

/// Loads a catalog file via `tunewise_catalog::load_catalog`.
#[derive(Debug, Clone)]
pub struct FsCatalogSource {
    pub path: Utf8PathBuf,
}

impl FsCatalogSource {
    pub fn new(path: Utf8PathBuf) -> Self {
        Self { path }
    }
}

impl CatalogSource for FsCatalogSource {
    fn load_catalog(&self) -> anyhow::Result<Catalog> {
        let catalog = tunewise_catalog::load_catalog(&self.path)
            .with_context(|| format!("load catalog from {}", self.path))?;
        debug!(path = %self.path, entries = catalog.len(), "catalog loaded");
        Ok(catalog)
    }
}

/// Pre-built catalog for embedding and testing.
#[derive(Debug, Clone)]
pub struct InMemoryCatalogSource {
    catalog: Catalog,
}

impl InMemoryCatalogSource {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }
}

impl CatalogSource for InMemoryCatalogSource {
    fn load_catalog(&self) -> anyhow::Result<Catalog> {
        Ok(self.catalog.clone())
    }
}

pub fn catalog_source(settings: &RecommendSettings) -> Box<dyn CatalogSource> {
    match &settings.catalog_path {
        Some(path) => Box::new(FsCatalogSource::new(path.clone())),
        None => Box::new(BuiltinCatalogSource),
    }
}

/// Returns no annotations.
#[derive(Debug, Clone, Default)]
pub struct NoopEnricher;

impl Enricher for NoopEnricher {
    fn enrich(&self, _report: &Report) -> anyhow::Result<Enrichment> {
        Ok(Enrichment::default())
    }
}

/// Runs an external program: report JSON on stdin, `Enrichment` JSON on stdout.
#[derive(Debug, Clone)]
pub struct CommandEnricher {
    pub program: String,
    pub args: Vec<String>,
    pub timeout: Duration,
}

impl CommandEnricher {
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }

    async fn run(&self, input: Vec<u8>) -> anyhow::Result<std::process::Output> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("spawn enricher {}", self.program))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(&input)
                .await
                .context("write report to enricher stdin")?;
        }

        child
            .wait_with_output()
            .await
            .context("wait for enricher")
    }
}

impl Enricher for CommandEnricher {
    fn enrich(&self, report: &Report) -> anyhow::Result<Enrichment> {
        let input = serde_json::to_vec(report).context("serialize report for enricher")?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("build enricher runtime")?;

        let output = runtime.block_on(async {
            tokio::time::timeout(self.timeout, self.run(input))
                .await
                .map_err(|_| {
                    anyhow::anyhow!(
                        "enricher {} timed out after {} ms",
                        self.program,
                        self.timeout.as_millis()
                    )
                })?
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "enricher {} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            );
        }

        let mut enrichment: Enrichment =
            serde_json::from_slice(&output.stdout).context("parse enricher output")?;
        if enrichment.source.is_none() {
            enrichment.source = Some(self.program.clone());
        }
        debug!(
            program = %self.program,
            items = enrichment.items.len(),
            "enrichment received"
        );
        Ok(enrichment)
    }
}

/// Command enricher when enabled and configured, otherwise [`NoopEnricher`].
pub fn enricher(settings: &RecommendSettings) -> Box<dyn Enricher> {
    match (&settings.enrich_command, settings.enrich) {
        (Some(program), true) => Box::new(CommandEnricher::new(
            program.clone(),
            settings.enrich_args.clone(),
            Duration::from_millis(settings.enrich_timeout_ms),
        )),
        _ => Box::new(NoopEnricher),
    }
}

/// Filesystem write operations.
#[derive(Debug, Clone, Default)]
pub struct FsWritePort;

impl WritePort for FsWritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create parent dir for {}", path))?;
        }
        std::fs::write(path, contents).with_context(|| format!("write {}", path))
    }

    fn create_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()> {
        std::fs::create_dir_all(path).with_context(|| format!("create_dir_all {}", path))
    }
}
