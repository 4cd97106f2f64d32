//! Port traits abstracting all I/O away from the pipeline.

use camino::Utf8Path;
use tunewise_catalog::Catalog;
use tunewise_types::{Enrichment, Report};

/// Source of the modification catalog.
pub trait CatalogSource {
    fn load_catalog(&self) -> anyhow::Result<Catalog>;
}

/// Produces free-text annotations for a finished report.
///
/// Implementations never see a mutable report; whatever they return is merged
/// by [`apply_enrichment`](crate::enrich::apply_enrichment).
pub trait Enricher {
    fn enrich(&self, report: &Report) -> anyhow::Result<Enrichment>;
}

/// File-system write operations.
pub trait WritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()>;
    fn create_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()>;
}
