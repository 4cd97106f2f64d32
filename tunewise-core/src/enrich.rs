//! Merging enricher output into a finished report.

use crate::ports::Enricher;
use tracing::{debug, warn};
use tunewise_types::{Enrichment, Report};

/// Appends enrichment text to `report`.
///
/// Only annotation fields change: ids, ranks, scores and costs are left as
/// the engine produced them. Items naming an id that is not in the report are
/// dropped. An enrichment with no summary and no usable items is a no-op.
pub fn apply_enrichment(report: &mut Report, enrichment: Enrichment) {
    let Enrichment {
        source,
        summary,
        items,
    } = enrichment;

    let mut kept = Vec::new();
    for item in items {
        let Some(rec) = report
            .recommendations
            .iter_mut()
            .find(|r| r.id == item.id)
        else {
            debug!(id = %item.id, "enrichment names unknown modification; ignored");
            continue;
        };

        if let Some(description) = item.description.as_deref().map(str::trim)
            && !description.is_empty()
        {
            rec.annotations.push(description.to_string());
        }
        rec.annotations
            .extend(item.tips.iter().map(|tip| format!("Tip: {tip}")));
        kept.push(item);
    }

    if summary.is_none() && kept.is_empty() {
        return;
    }
    report.enrichment = Some(Enrichment {
        source,
        summary,
        items: kept,
    });
}

/// Runs `enricher` and merges its output. Any failure keeps the rule-based report.
pub fn enrich_best_effort(mut report: Report, enricher: &dyn Enricher) -> Report {
    match enricher.enrich(&report) {
        Ok(enrichment) => apply_enrichment(&mut report, enrichment),
        Err(err) => warn!(error = %format!("{err:#}"), "enrichment failed; using rule-based report"),
    }
    report
}
