//! The recommend pipeline, extracted from the CLI.
//!
//! These entry points are I/O-agnostic: the catalog, the enricher and every
//! file write go through the port traits.

use crate::enrich::enrich_best_effort;
use crate::intake::{InputValidator, Validation};
use crate::ports::{CatalogSource, Enricher, WritePort};
use crate::settings::RecommendSettings;
use anyhow::Context;
use camino::Utf8Path;
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};
use tunewise_domain::{Engine, EngineError, RecommendOptions, report_digest};
use tunewise_render::render_report_md;
use tunewise_types::{RecommendationRequest, Report, schema};

/// Error type for pipeline results. Exit code 2 = input rejected, 1 = tool error.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("input rejected: {}", .0.join("; "))]
    InputRejected(Vec<String>),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("{0:#}")]
    Internal(#[from] anyhow::Error),
}

impl ToolError {
    pub fn exit_code(&self) -> u8 {
        match self {
            ToolError::InputRejected(_) => 2,
            ToolError::Engine(e) if e.is_input_error() => 2,
            ToolError::Engine(_) | ToolError::Internal(_) => 1,
        }
    }
}

/// Name and version of the running tool, recorded in `run.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

/// Outcome of `run_recommend`.
#[derive(Debug, Clone)]
pub struct RecommendOutcome {
    pub report: Report,
    /// Intake warnings (errors never reach this point).
    pub validation: Validation,
    pub enriched: bool,
}

/// Run the recommend pipeline: validate, load catalog, recommend, enrich.
///
/// The caller is responsible for writing artifacts (via `WritePort`) or the
/// convenience `write_report_artifacts` helper.
pub fn run_recommend(
    settings: &RecommendSettings,
    request: &RecommendationRequest,
    catalogs: &dyn CatalogSource,
    enricher: &dyn Enricher,
) -> Result<RecommendOutcome, ToolError> {
    let validation = if settings.validate {
        InputValidator::new().validate(request)
    } else {
        Validation::default()
    };
    if !validation.is_ok() {
        debug!(errors = validation.errors.len(), "intake rejected request");
        return Err(ToolError::InputRejected(validation.errors));
    }

    let catalog = catalogs.load_catalog()?;
    let engine = Engine::with_options(
        &catalog,
        RecommendOptions {
            strict_budget: settings.strict_budget,
        },
    );
    let mut report = engine.recommend_request(request)?;

    if settings.enrich {
        report = enrich_best_effort(report, enricher);
    }
    let enriched = report.enrichment.is_some();

    info!(
        report_id = %report.report_id,
        recommendations = report.recommendations.len(),
        warnings = validation.warnings.len(),
        "recommendation complete"
    );

    Ok(RecommendOutcome {
        report,
        validation,
        enriched,
    })
}

/// Side file describing one run. Kept apart from `report.json` so the report
/// stays byte-identical across runs.
#[derive(Debug, Clone, Serialize)]
pub struct RunRecord {
    pub schema: String,
    pub tool: ToolInfo,
    pub generated_at: String,
    pub report_id: String,
    pub report_sha256: String,
    pub recommendations: usize,
    pub enriched: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl RunRecord {
    pub fn new(outcome: &RecommendOutcome, tool: &ToolInfo) -> Self {
        Self {
            schema: schema::TUNEWISE_RUN_V1.to_string(),
            tool: tool.clone(),
            generated_at: Utc::now().to_rfc3339(),
            report_id: outcome.report.report_id.clone(),
            report_sha256: report_digest(&outcome.report),
            recommendations: outcome.report.recommendations.len(),
            enriched: outcome.enriched,
            warnings: outcome.validation.warnings.clone(),
        }
    }
}

/// Write `report.json`, `report.md` and `run.json` to the output directory.
pub fn write_report_artifacts(
    outcome: &RecommendOutcome,
    out_dir: &Utf8Path,
    tool: &ToolInfo,
    writer: &dyn WritePort,
) -> anyhow::Result<()> {
    writer.create_dir_all(out_dir)?;

    let report_json =
        serde_json::to_string_pretty(&outcome.report).context("serialize report")?;
    writer.write_file(&out_dir.join("report.json"), report_json.as_bytes())?;

    let report_md = render_report_md(&outcome.report);
    writer.write_file(&out_dir.join("report.md"), report_md.as_bytes())?;

    let run = RunRecord::new(outcome, tool);
    let run_json = serde_json::to_string_pretty(&run).context("serialize run record")?;
    writer.write_file(&out_dir.join("run.json"), run_json.as_bytes())?;

    debug!(out_dir = %out_dir, "artifacts written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryCatalogSource, NoopEnricher};
    use camino::Utf8PathBuf;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tunewise_catalog::Catalog;
    use tunewise_types::{
        BudgetTier, EngineType, Enrichment, ExperienceTier, Goal, ItemEnrichment, Preferences,
        Vehicle,
    };

    #[derive(Default)]
    struct MemWritePort {
        files: Mutex<HashMap<String, Vec<u8>>>,
        dirs: Mutex<Vec<String>>,
    }

    impl WritePort for MemWritePort {
        fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()> {
            let key = path.as_str().replace('\\', "/");
            self.files
                .lock()
                .expect("lock files")
                .insert(key, contents.to_vec());
            Ok(())
        }

        fn create_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()> {
            let key = path.as_str().replace('\\', "/");
            self.dirs.lock().expect("lock dirs").push(key);
            Ok(())
        }
    }

    struct TipEnricher;

    impl Enricher for TipEnricher {
        fn enrich(&self, report: &Report) -> anyhow::Result<Enrichment> {
            Ok(Enrichment {
                source: Some("tips".into()),
                summary: None,
                items: report
                    .recommendations
                    .iter()
                    .map(|r| ItemEnrichment {
                        id: r.id.clone(),
                        description: None,
                        tips: vec!["check torque specs".into()],
                    })
                    .collect(),
            })
        }
    }

    fn tool() -> ToolInfo {
        ToolInfo {
            name: "tunewise".into(),
            version: "0.0.0-test".into(),
        }
    }

    fn request() -> RecommendationRequest {
        RecommendationRequest {
            vehicle: Vehicle {
                make: "BMW".into(),
                model: "3 Series".into(),
                year: 2021,
                engine_type: EngineType::Petrol,
                installed_modifications: vec!["Sport exhaust".into()],
            },
            preferences: Preferences {
                goals: vec![Goal::Performance, Goal::TrackUse],
                budget_tier: BudgetTier::Premium,
                experience: ExperienceTier::Advanced,
                max_budget: Some(15_000.0),
            },
        }
    }

    fn builtin() -> InMemoryCatalogSource {
        InMemoryCatalogSource::new(Catalog::builtin())
    }

    #[test]
    fn recommend_produces_report() {
        let outcome = run_recommend(
            &RecommendSettings::default(),
            &request(),
            &builtin(),
            &NoopEnricher,
        )
        .expect("recommend");
        assert!(!outcome.report.is_empty());
        assert!(outcome.validation.warnings.is_empty());
        assert!(!outcome.enriched);
        assert!(outcome.report.enrichment.is_none());
    }

    #[test]
    fn intake_errors_exit_two() {
        let mut req = request();
        req.vehicle.make = "Yugo".into();
        let err = run_recommend(
            &RecommendSettings::default(),
            &req,
            &builtin(),
            &NoopEnricher,
        )
        .unwrap_err();
        assert!(matches!(err, ToolError::InputRejected(_)));
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.to_string(), "input rejected: unknown make: Yugo");
    }

    #[test]
    fn skipping_intake_lets_free_text_through() {
        let mut req = request();
        req.vehicle.make = "Yugo".into();
        let settings = RecommendSettings {
            validate: false,
            ..RecommendSettings::default()
        };
        let outcome =
            run_recommend(&settings, &req, &builtin(), &NoopEnricher).expect("recommend");
        assert!(!outcome.report.is_empty());
    }

    #[test]
    fn engine_precondition_exits_two_and_empty_catalog_exits_one() {
        // Intake would reject $10 as outside the premium tier first.
        let settings = RecommendSettings {
            strict_budget: true,
            validate: false,
            ..RecommendSettings::default()
        };
        let mut req = request();
        req.preferences.max_budget = Some(10.0);
        let err = run_recommend(&settings, &req, &builtin(), &NoopEnricher).unwrap_err();
        assert!(matches!(
            err,
            ToolError::Engine(EngineError::InvalidPreferences(_))
        ));
        assert_eq!(err.exit_code(), 2);

        let empty = InMemoryCatalogSource::new(Catalog::empty());
        let err = run_recommend(
            &RecommendSettings::default(),
            &request(),
            &empty,
            &NoopEnricher,
        )
        .unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn enrichment_runs_only_when_enabled() {
        let off = run_recommend(
            &RecommendSettings::default(),
            &request(),
            &builtin(),
            &TipEnricher,
        )
        .expect("recommend");
        assert!(off.report.enrichment.is_none());

        let settings = RecommendSettings {
            enrich: true,
            ..RecommendSettings::default()
        };
        let on = run_recommend(&settings, &request(), &builtin(), &TipEnricher).expect("recommend");
        assert!(on.enriched);
        assert_eq!(on.report.ids(), off.report.ids());
        assert!(
            on.report
                .recommendations
                .iter()
                .all(|r| r.annotations == vec!["Tip: check torque specs".to_string()])
        );
    }

    #[test]
    fn enrich_without_output_is_not_recorded_as_enriched() {
        let settings = RecommendSettings {
            enrich: true,
            ..RecommendSettings::default()
        };
        let outcome =
            run_recommend(&settings, &request(), &builtin(), &NoopEnricher).expect("recommend");
        assert!(!outcome.enriched);
        assert!(outcome.report.enrichment.is_none());

        let writer = MemWritePort::default();
        write_report_artifacts(&outcome, Utf8Path::new("out"), &tool(), &writer).expect("write");
        let files = writer.files.lock().expect("lock");
        let run: serde_json::Value =
            serde_json::from_slice(&files["out/run.json"]).expect("run json");
        assert_eq!(run["enriched"], false);
    }

    #[test]
    fn writes_report_markdown_and_run_record() {
        let outcome = run_recommend(
            &RecommendSettings::default(),
            &request(),
            &builtin(),
            &NoopEnricher,
        )
        .expect("recommend");
        let writer = MemWritePort::default();
        let out_dir = Utf8PathBuf::from("out/tunewise");
        write_report_artifacts(&outcome, &out_dir, &tool(), &writer).expect("write");

        let files = writer.files.lock().expect("lock");
        let mut names: Vec<&str> = files.keys().map(String::as_str).collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "out/tunewise/report.json",
                "out/tunewise/report.md",
                "out/tunewise/run.json"
            ]
        );
        assert_eq!(
            writer.dirs.lock().expect("lock").as_slice(),
            &["out/tunewise".to_string()]
        );

        let report: Report =
            serde_json::from_slice(&files["out/tunewise/report.json"]).expect("report json");
        assert_eq!(report, outcome.report);

        let run: serde_json::Value =
            serde_json::from_slice(&files["out/tunewise/run.json"]).expect("run json");
        assert_eq!(run["schema"], "tunewise.run.v1");
        assert_eq!(run["tool"]["name"], "tunewise");
        assert_eq!(run["report_id"], outcome.report.report_id.as_str());
        assert_eq!(run["report_sha256"], report_digest(&outcome.report).as_str());
    }

    #[test]
    fn report_json_is_identical_across_runs() {
        let write = || {
            let outcome = run_recommend(
                &RecommendSettings::default(),
                &request(),
                &builtin(),
                &NoopEnricher,
            )
            .expect("recommend");
            let writer = MemWritePort::default();
            write_report_artifacts(&outcome, Utf8Path::new("out"), &tool(), &writer)
                .expect("write");
            let files = writer.files.lock().expect("lock");
            files["out/report.json"].clone()
        };
        assert_eq!(write(), write());
    }
}
