//! Shared DTOs (schemas-as-code) for the tunewise workspace.
//!
//! # Design constraints
//! - These types cross the CLI/JSON boundary; enumeration tokens are lowercase snake_case.
//! - Be conservative with breaking changes to field names.
//! - Prefer adding optional fields over changing semantics.

pub mod model;
pub mod report;

/// Schema identifiers.
pub mod schema {
    pub const TUNEWISE_REPORT_V1: &str = "tunewise.report.v1";
    pub const TUNEWISE_REQUEST_V1: &str = "tunewise.request.v1";
    pub const TUNEWISE_CATALOG_V1: &str = "tunewise.catalog.v1";
    pub const TUNEWISE_RUN_V1: &str = "tunewise.run.v1";
}

pub use model::{
    BudgetRange, BudgetTier, Category, CostRange, EngineType, ExperienceTier, Goal, LegalDimension,
    LegalFlags, LegalImpact, Modification, Preferences, RecommendationRequest, SafetyLevel,
    Vehicle,
};
pub use report::{
    CompatibilityNote, Enrichment, Exclusion, ExclusionReason, ItemEnrichment, LegalFlagSummary,
    LegalSummary, PrerequisiteGap, Recommendation, Report, SafetySummary, Verdict,
};
