use crate::assembler::{self, AssemblyContext};
use crate::eligibility::{self, engine_allows, experience_allows};
use crate::error::EngineError;
use crate::resolver;
use sha2::{Digest, Sha256};
use tracing::debug;
use tunewise_catalog::Catalog;
use tunewise_types::model::{YEAR_MAX, YEAR_MIN};
use tunewise_types::{Preferences, RecommendationRequest, Report, Vehicle};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecommendOptions {
    /// Reject a ceiling below the cheapest item that serves the goals instead of
    /// returning an empty report.
    pub strict_budget: bool,
}

/// Recommendation engine bound to one read-only catalog.
#[derive(Debug, Clone, Copy)]
pub struct Engine<'c> {
    catalog: &'c Catalog,
    options: RecommendOptions,
}

impl<'c> Engine<'c> {
    pub fn new(catalog: &'c Catalog) -> Self {
        Self {
            catalog,
            options: RecommendOptions::default(),
        }
    }

    pub fn with_options(catalog: &'c Catalog, options: RecommendOptions) -> Self {
        Self { catalog, options }
    }

    pub fn catalog(&self) -> &'c Catalog {
        self.catalog
    }

    /// Filter, score, resolve, assemble. Errors only on failed preconditions.
    pub fn recommend(&self, vehicle: &Vehicle, prefs: &Preferences) -> Result<Report, EngineError> {
        self.check(vehicle, prefs)?;

        let filtered = eligibility::filter(self.catalog, vehicle, prefs);
        debug!(
            eligible = filtered.eligible.len(),
            excluded = filtered.excluded.len(),
            "eligibility filter"
        );

        let installed = eligibility::installed_ids(self.catalog, vehicle);
        let candidates = resolver::prepare(self.catalog, &filtered.eligible, prefs);
        let resolution = resolver::resolve(self.catalog, candidates, prefs, &installed);
        debug!(
            selected = resolution.selected.len(),
            skipped = resolution.skipped.len(),
            notes = resolution.notes.len(),
            "compatibility resolution"
        );

        let report = assembler::assemble(
            resolution,
            AssemblyContext {
                report_id: report_id(vehicle, prefs).to_string(),
                vehicle,
                preferences: prefs,
                excluded: filtered.excluded,
            },
        );
        debug!(
            recommendations = report.recommendations.len(),
            total_min = report.total_cost.min,
            total_max = report.total_cost.max,
            "report assembled"
        );
        Ok(report)
    }

    pub fn recommend_request(&self, request: &RecommendationRequest) -> Result<Report, EngineError> {
        self.recommend(&request.vehicle, &request.preferences)
    }

    fn check(&self, vehicle: &Vehicle, prefs: &Preferences) -> Result<(), EngineError> {
        if self.catalog.is_empty() {
            return Err(EngineError::EmptyCatalog);
        }

        if !(YEAR_MIN..=YEAR_MAX).contains(&vehicle.year) {
            return Err(EngineError::InvalidVehicle(format!(
                "year {} outside {YEAR_MIN}-{YEAR_MAX}",
                vehicle.year
            )));
        }
        if vehicle.make.trim().is_empty() || vehicle.model.trim().is_empty() {
            return Err(EngineError::InvalidVehicle(
                "make and model are required".to_string(),
            ));
        }

        if prefs.goals.is_empty() {
            return Err(EngineError::InvalidPreferences(
                "at least one goal is required".to_string(),
            ));
        }
        if let Some(max) = prefs.max_budget
            && (!max.is_finite() || max < 0.0)
        {
            return Err(EngineError::InvalidPreferences(format!(
                "max_budget must be a non-negative number, got {max}"
            )));
        }

        if self.options.strict_budget {
            let ceiling = prefs.effective_ceiling();
            if let Some(cheapest) = self.cheapest_for_goals(vehicle, prefs)
                && ceiling < cheapest
            {
                return Err(EngineError::InvalidPreferences(format!(
                    "budget ceiling ${ceiling:.0} is below the cheapest matching modification (${cheapest:.0})"
                )));
            }
        }
        Ok(())
    }

    /// Lowest minimum cost among entries that fit the vehicle and experience and
    /// serve at least one stated goal. Ignores the budget itself.
    fn cheapest_for_goals(&self, vehicle: &Vehicle, prefs: &Preferences) -> Option<f64> {
        let installed = eligibility::installed_ids(self.catalog, vehicle);
        self.catalog
            .iter()
            .filter(|m| engine_allows(vehicle.engine_type, m))
            .filter(|m| !installed.contains(&m.id))
            .filter(|m| experience_allows(prefs.experience, m))
            .filter(|m| self.catalog.affinity().best_for(m.category, &prefs.goals) > 0.0)
            .map(|m| m.cost.min)
            .min_by(f64::total_cmp)
    }
}

/// Runs the engine with default options.
pub fn recommend(
    catalog: &Catalog,
    vehicle: &Vehicle,
    prefs: &Preferences,
) -> Result<Report, EngineError> {
    Engine::new(catalog).recommend(vehicle, prefs)
}

/// Deterministic report id: v5(namespace, canonical request JSON).
pub fn report_id(vehicle: &Vehicle, prefs: &Preferences) -> Uuid {
    const NAMESPACE: Uuid = Uuid::from_bytes([
        0x7a, 0x31, 0xc2, 0x94, 0x5e, 0x0b, 0x4f, 0x6d, 0x9a, 0x17, 0x3e, 0x88, 0x21, 0xd4, 0x6c,
        0x05,
    ]);

    let request = RecommendationRequest {
        vehicle: vehicle.clone(),
        preferences: prefs.clone(),
    };
    let canonical = serde_json::to_string(&request).unwrap_or_default();
    Uuid::new_v5(&NAMESPACE, canonical.as_bytes())
}

/// SHA-256 of the report's compact JSON, hex encoded.
pub fn report_digest(report: &Report) -> String {
    let bytes = serde_json::to_vec(report).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    hex::encode(hasher.finalize())
}
