use crate::model::{
    Category, CostRange, ExperienceTier, LegalFlags, LegalImpact, Preferences, SafetyLevel,
    Vehicle,
};
use serde::{Deserialize, Serialize};

/// Final output of one `recommend` call. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub schema: String,

    /// Deterministic id derived from the request.
    pub report_id: String,

    pub vehicle: Vehicle,
    pub preferences: Preferences,
    pub effective_budget: f64,

    #[serde(default)]
    pub recommendations: Vec<Recommendation>,

    pub total_cost: CostRange,
    pub safety_summary: SafetySummary,
    pub legal_summary: LegalSummary,

    #[serde(default)]
    pub compatibility_notes: Vec<CompatibilityNote>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excluded: Vec<Exclusion>,

    pub disclaimer: String,

    /// Free-text annotations from an external enricher. Never affects ranking.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrichment: Option<Enrichment>,
}

impl Report {
    pub fn is_empty(&self) -> bool {
        self.recommendations.is_empty()
    }

    pub fn recommendation(&self, id: &str) -> Option<&Recommendation> {
        self.recommendations.iter().find(|r| r.id == id)
    }

    pub fn ids(&self) -> Vec<&str> {
        self.recommendations.iter().map(|r| r.id.as_str()).collect()
    }
}

/// A ranked, selected modification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub rank: u32,
    pub id: String,
    pub name: String,
    pub category: Category,
    pub description: String,
    pub score: f64,
    pub cost: CostRange,
    pub safety: SafetyLevel,
    pub experience: ExperienceTier,
    pub legal: LegalFlags,
    pub verdict: Verdict,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub benefits: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub safety_warnings: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installation_difficulty: Option<String>,

    #[serde(default)]
    pub professional_required: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<String>,
}

/// Pipeline verdict for a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Passed the eligibility filter, not yet resolved.
    Eligible,
    /// Accepted with every prerequisite satisfied.
    Selected,
    /// Accepted; a prerequisite is recommended alongside it.
    RequiresPrerequisite,
    /// Accepted, but a prerequisite cannot be recommended.
    MissingPrerequisite,
    /// Dropped because an earlier, higher-ranked candidate conflicts with it.
    ConflictSkipped,
}

impl Verdict {
    pub fn is_selected(self) -> bool {
        matches!(
            self,
            Verdict::Selected | Verdict::RequiresPrerequisite | Verdict::MissingPrerequisite
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Eligible => "eligible",
            Verdict::Selected => "selected",
            Verdict::RequiresPrerequisite => "requires_prerequisite",
            Verdict::MissingPrerequisite => "missing_prerequisite",
            Verdict::ConflictSkipped => "conflict_skipped",
        }
    }
}

/// Why a prerequisite could not be recommended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrerequisiteGap {
    /// Filtered out by the eligibility rules.
    Ineligible,
    /// Skipped because it conflicts with a selected item.
    ConflictSkipped,
    /// Not present in the catalog at all.
    Unknown,
}

impl PrerequisiteGap {
    pub fn as_str(self) -> &'static str {
        match self {
            PrerequisiteGap::Ineligible => "ineligible",
            PrerequisiteGap::ConflictSkipped => "conflict_skipped",
            PrerequisiteGap::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CompatibilityNote {
    /// `candidate` was skipped because `conflicts_with` was accepted first.
    Conflict {
        candidate: String,
        conflicts_with: String,
    },
    /// `candidate` needs `prerequisite`, which is recommended too.
    Requires {
        candidate: String,
        prerequisite: String,
    },
    /// `candidate` needs `prerequisite`, which cannot be recommended.
    MissingPrerequisite {
        candidate: String,
        prerequisite: String,
        gap: PrerequisiteGap,
    },
    /// Nothing was selected.
    EmptyResult { reason: String },
}

impl CompatibilityNote {
    pub fn message(&self) -> String {
        match self {
            CompatibilityNote::Conflict {
                candidate,
                conflicts_with,
            } => format!("{candidate} skipped: conflicts with {conflicts_with}"),
            CompatibilityNote::Requires {
                candidate,
                prerequisite,
            } => format!("{candidate} requires: {prerequisite}"),
            CompatibilityNote::MissingPrerequisite {
                candidate,
                prerequisite,
                gap,
            } => format!(
                "{candidate} missing prerequisite: {prerequisite} ({})",
                gap.as_str()
            ),
            CompatibilityNote::EmptyResult { reason } => reason.clone(),
        }
    }
}

/// A catalog entry removed by the eligibility filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exclusion {
    pub id: String,
    pub reason: ExclusionReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    EngineType,
    OverBudget,
    AlreadyInstalled,
    Experience,
}

impl ExclusionReason {
    pub fn as_str(self) -> &'static str {
        match self {
            ExclusionReason::EngineType => "engine_type",
            ExclusionReason::OverBudget => "over_budget",
            ExclusionReason::AlreadyInstalled => "already_installed",
            ExclusionReason::Experience => "experience",
        }
    }
}

/// Safety warnings grouped by risk level, high first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetySummary {
    #[serde(default)]
    pub high: Vec<String>,
    #[serde(default)]
    pub medium: Vec<String>,
    #[serde(default)]
    pub low: Vec<String>,
}

impl SafetySummary {
    pub fn is_empty(&self) -> bool {
        self.high.is_empty() && self.medium.is_empty() && self.low.is_empty()
    }
}

/// Most severe impact seen for one legal dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalFlagSummary {
    pub impact: LegalImpact,

    /// Ids of selected modifications with a non-`none` impact, in rank order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifications: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalSummary {
    pub warranty: LegalFlagSummary,
    pub emissions: LegalFlagSummary,
    pub insurance: LegalFlagSummary,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub considerations: Vec<String>,
}

/// Annotations returned by an external text enricher.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrichment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(default)]
    pub items: Vec<ItemEnrichment>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemEnrichment {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tips: Vec<String>,
}
