use serde::{Deserialize, Serialize};

/// Earliest model year accepted at the engine boundary.
pub const YEAR_MIN: u16 = 1900;
/// Latest model year accepted at the engine boundary.
pub const YEAR_MAX: u16 = 2030;

/// Modification category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    EngineTuning,
    Exhaust,
    Intake,
    Suspension,
    WheelsTires,
    Brakes,
    Cosmetic,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::EngineTuning,
        Category::Exhaust,
        Category::Intake,
        Category::Suspension,
        Category::WheelsTires,
        Category::Brakes,
        Category::Cosmetic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::EngineTuning => "engine_tuning",
            Category::Exhaust => "exhaust",
            Category::Intake => "intake",
            Category::Suspension => "suspension",
            Category::WheelsTires => "wheels_tires",
            Category::Brakes => "brakes",
            Category::Cosmetic => "cosmetic",
        }
    }
}

/// Safety level of a modification. Ordered `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SafetyLevel {
    Low,
    Medium,
    High,
}

impl SafetyLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            SafetyLevel::Low => "low",
            SafetyLevel::Medium => "medium",
            SafetyLevel::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineType {
    Petrol,
    Diesel,
    Hybrid,
    Electric,
}

impl EngineType {
    pub const ALL: [EngineType; 4] = [
        EngineType::Petrol,
        EngineType::Diesel,
        EngineType::Hybrid,
        EngineType::Electric,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EngineType::Petrol => "petrol",
            EngineType::Diesel => "diesel",
            EngineType::Hybrid => "hybrid",
            EngineType::Electric => "electric",
        }
    }
}

/// Experience tier. Ordered `Beginner < Intermediate < Advanced`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceTier {
    Beginner,
    Intermediate,
    Advanced,
}

impl ExperienceTier {
    pub const ALL: [ExperienceTier; 3] = [
        ExperienceTier::Beginner,
        ExperienceTier::Intermediate,
        ExperienceTier::Advanced,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ExperienceTier::Beginner => "beginner",
            ExperienceTier::Intermediate => "intermediate",
            ExperienceTier::Advanced => "advanced",
        }
    }
}

/// Driving goal stated by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    Performance,
    FuelEconomy,
    DailyComfort,
    TrackUse,
    OffRoading,
}

impl Goal {
    pub const ALL: [Goal; 5] = [
        Goal::Performance,
        Goal::FuelEconomy,
        Goal::DailyComfort,
        Goal::TrackUse,
        Goal::OffRoading,
    ];

    /// Goals that chase outright speed or lap time.
    pub fn is_performance(self) -> bool {
        matches!(self, Goal::Performance | Goal::TrackUse)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Goal::Performance => "performance",
            Goal::FuelEconomy => "fuel_economy",
            Goal::DailyComfort => "daily_comfort",
            Goal::TrackUse => "track_use",
            Goal::OffRoading => "off_roading",
        }
    }
}

/// Closed numeric range in USD.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetRange {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetTier {
    Budget,
    Moderate,
    Premium,
    Unlimited,
}

impl BudgetTier {
    pub const ALL: [BudgetTier; 4] = [
        BudgetTier::Budget,
        BudgetTier::Moderate,
        BudgetTier::Premium,
        BudgetTier::Unlimited,
    ];

    pub fn range(self) -> BudgetRange {
        let (min, max) = match self {
            BudgetTier::Budget => (500.0, 2_000.0),
            BudgetTier::Moderate => (2_000.0, 8_000.0),
            BudgetTier::Premium => (8_000.0, 20_000.0),
            BudgetTier::Unlimited => (20_000.0, 100_000.0),
        };
        BudgetRange { min, max }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BudgetTier::Budget => "budget",
            BudgetTier::Moderate => "moderate",
            BudgetTier::Premium => "premium",
            BudgetTier::Unlimited => "unlimited",
        }
    }
}

/// Tri-state legal impact. Ordered by severity: `None < Possible < Likely`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum LegalImpact {
    #[default]
    None,
    Possible,
    Likely,
}

impl LegalImpact {
    pub fn as_str(self) -> &'static str {
        match self {
            LegalImpact::None => "none",
            LegalImpact::Possible => "possible",
            LegalImpact::Likely => "likely",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegalDimension {
    Warranty,
    Emissions,
    Insurance,
}

impl LegalDimension {
    pub const ALL: [LegalDimension; 3] = [
        LegalDimension::Warranty,
        LegalDimension::Emissions,
        LegalDimension::Insurance,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LegalDimension::Warranty => "warranty",
            LegalDimension::Emissions => "emissions",
            LegalDimension::Insurance => "insurance",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegalFlags {
    pub warranty: LegalImpact,
    pub emissions: LegalImpact,
    pub insurance: LegalImpact,
}

impl LegalFlags {
    pub fn get(&self, dimension: LegalDimension) -> LegalImpact {
        match dimension {
            LegalDimension::Warranty => self.warranty,
            LegalDimension::Emissions => self.emissions,
            LegalDimension::Insurance => self.insurance,
        }
    }
}

/// Cost range in USD.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CostRange {
    pub min: f64,
    pub max: f64,
}

impl CostRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    /// Non-negative, finite, and `min <= max`.
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min >= 0.0 && self.min <= self.max
    }
}

/// Catalog entry. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Modification {
    pub id: String,
    pub category: Category,
    pub name: String,
    pub description: String,
    pub cost: CostRange,
    pub safety: SafetyLevel,
    pub engine_types: Vec<EngineType>,
    pub experience: ExperienceTier,

    /// Intermediate users may see this item even when it requires advanced experience.
    #[serde(default)]
    pub guided: bool,

    #[serde(default)]
    pub legal: LegalFlags,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prerequisites: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conflicts: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub benefits: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub safety_warnings: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub legal_considerations: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installation_difficulty: Option<String>,

    #[serde(default)]
    pub professional_required: bool,
}

impl Modification {
    pub fn applies_to(&self, engine: EngineType) -> bool {
        self.engine_types.contains(&engine)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub make: String,
    pub model: String,
    pub year: u16,
    pub engine_type: EngineType,

    /// Catalog ids or free-text descriptions of parts already fitted.
    #[serde(default, alias = "current_modifications")]
    pub installed_modifications: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(alias = "primary_goals")]
    pub goals: Vec<Goal>,

    #[serde(alias = "budget_range")]
    pub budget_tier: BudgetTier,

    #[serde(alias = "experience_level")]
    pub experience: ExperienceTier,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_budget: Option<f64>,
}

impl Preferences {
    /// Explicit `max_budget` when present, else the tier's upper bound.
    pub fn effective_ceiling(&self) -> f64 {
        self.max_budget.unwrap_or(self.budget_tier.range().max)
    }

    pub fn has_performance_goal(&self) -> bool {
        self.goals.iter().any(|g| g.is_performance())
    }
}

/// Request envelope used at the JSON boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    #[serde(alias = "car_info")]
    pub vehicle: Vehicle,

    #[serde(alias = "user_preferences")]
    pub preferences: Preferences,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_are_ordered() {
        assert!(ExperienceTier::Beginner < ExperienceTier::Intermediate);
        assert!(ExperienceTier::Intermediate < ExperienceTier::Advanced);
        assert!(LegalImpact::None < LegalImpact::Possible);
        assert!(LegalImpact::Possible < LegalImpact::Likely);
        assert!(SafetyLevel::Low < SafetyLevel::High);
    }

    #[test]
    fn effective_ceiling_prefers_explicit_max() {
        let mut prefs = Preferences {
            goals: vec![Goal::Performance],
            budget_tier: BudgetTier::Moderate,
            experience: ExperienceTier::Beginner,
            max_budget: None,
        };
        assert_eq!(prefs.effective_ceiling(), 8_000.0);

        prefs.max_budget = Some(3_500.0);
        assert_eq!(prefs.effective_ceiling(), 3_500.0);

        prefs.max_budget = Some(0.0);
        assert_eq!(prefs.effective_ceiling(), 0.0);
    }

    #[test]
    fn cost_range_validity() {
        assert!(CostRange::new(0.0, 0.0).is_valid());
        assert!(CostRange::new(100.0, 400.0).is_valid());
        assert!(!CostRange::new(400.0, 100.0).is_valid());
        assert!(!CostRange::new(-1.0, 100.0).is_valid());
        assert!(!CostRange::new(0.0, f64::NAN).is_valid());
        assert_eq!(CostRange::new(300.0, 800.0).midpoint(), 550.0);
    }

    #[test]
    fn as_str_matches_serde_token() {
        for c in Category::ALL {
            assert_eq!(serde_json::to_value(c).unwrap(), serde_json::json!(c.as_str()));
        }
        for g in Goal::ALL {
            assert_eq!(serde_json::to_value(g).unwrap(), serde_json::json!(g.as_str()));
        }
        for t in BudgetTier::ALL {
            assert_eq!(serde_json::to_value(t).unwrap(), serde_json::json!(t.as_str()));
        }
        for e in EngineType::ALL {
            assert_eq!(serde_json::to_value(e).unwrap(), serde_json::json!(e.as_str()));
        }
        for x in ExperienceTier::ALL {
            assert_eq!(serde_json::to_value(x).unwrap(), serde_json::json!(x.as_str()));
        }
    }
}
