use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tunewise_types::{Category, Goal};

/// Upper bound for any single affinity weight.
pub const MAX_WEIGHT: f64 = 10.0;

/// One row of the affinity table as it appears in catalog files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffinityRow {
    pub category: Category,
    pub goal: Goal,
    pub weight: f64,
}

/// Serialized form of [`AffinityTable`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AffinitySpec {
    #[serde(default)]
    pub weights: Vec<AffinityRow>,

    /// Categories scored from performance-oriented goals only when the user lists one.
    #[serde(default)]
    pub performance_only: Vec<Category>,
}

/// Category × goal base weights (0–10).
///
/// Missing pairs weigh 0. A category listed in `performance_only` ignores
/// non-performance goals whenever the user states at least one performance goal.
#[derive(Debug, Clone, PartialEq)]
pub struct AffinityTable {
    weights: BTreeMap<(Category, Goal), f64>,
    performance_only: BTreeSet<Category>,
}

#[rustfmt::skip]
const BUILTIN_WEIGHTS: &[(Category, [f64; 5])] = &[
    //                       perf  fuel  comfort track offroad
    (Category::EngineTuning, [9.0, 7.0, 1.0, 8.0, 3.0]),
    (Category::Exhaust,      [8.0, 2.0, 2.0, 6.0, 2.0]),
    (Category::Intake,       [7.0, 5.0, 1.0, 5.0, 3.0]),
    (Category::WheelsTires,  [6.0, 4.0, 6.0, 8.0, 8.0]),
    (Category::Brakes,       [5.0, 0.0, 3.0, 9.0, 6.0]),
    (Category::Suspension,   [5.0, 0.0, 7.0, 9.0, 9.0]),
    (Category::Cosmetic,     [1.0, 2.0, 4.0, 1.0, 2.0]),
];

impl AffinityTable {
    pub fn builtin() -> Self {
        let mut weights = BTreeMap::new();
        for (category, row) in BUILTIN_WEIGHTS {
            for (goal, weight) in Goal::ALL.iter().zip(row.iter()) {
                weights.insert((*category, *goal), *weight);
            }
        }
        Self {
            weights,
            performance_only: BTreeSet::from([Category::Cosmetic]),
        }
    }

    /// Builds a table from its serialized form. Rows for the same pair: last one wins.
    pub fn from_spec(spec: &AffinitySpec) -> Result<Self, crate::CatalogError> {
        let mut weights = BTreeMap::new();
        for row in &spec.weights {
            if !row.weight.is_finite() || !(0.0..=MAX_WEIGHT).contains(&row.weight) {
                return Err(crate::CatalogError::InvalidAffinity {
                    category: row.category.as_str().to_string(),
                    goal: row.goal.as_str().to_string(),
                    weight: row.weight,
                });
            }
            weights.insert((row.category, row.goal), row.weight);
        }
        Ok(Self {
            weights,
            performance_only: spec.performance_only.iter().copied().collect(),
        })
    }

    pub fn to_spec(&self) -> AffinitySpec {
        AffinitySpec {
            weights: self
                .weights
                .iter()
                .map(|(&(category, goal), &weight)| AffinityRow {
                    category,
                    goal,
                    weight,
                })
                .collect(),
            performance_only: self.performance_only.iter().copied().collect(),
        }
    }

    pub fn weight(&self, category: Category, goal: Goal) -> f64 {
        self.weights.get(&(category, goal)).copied().unwrap_or(0.0)
    }

    /// Maximum weight over `goals`, honoring the performance-only rule. Empty goals score 0.
    pub fn best_for(&self, category: Category, goals: &[Goal]) -> f64 {
        let restrict = self.performance_only.contains(&category)
            && goals.iter().any(|g| g.is_performance());

        goals
            .iter()
            .filter(|g| !restrict || g.is_performance())
            .map(|g| self.weight(category, *g))
            .fold(0.0, f64::max)
    }
}

impl Default for AffinityTable {
    fn default() -> Self {
        Self::builtin()
    }
}
