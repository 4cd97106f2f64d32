//! Candidate scoring.
//!
//! The base score is the best category/goal affinity over the user's goals. The
//! budget-fit bonus depends on what has already been selected, so the final score
//! is computed by the resolver while it walks the candidates; this module only
//! provides the arithmetic.

use tunewise_catalog::AffinityTable;
use tunewise_types::{ExperienceTier, Modification, Preferences, SafetyLevel};

pub const SCORE_MIN: f64 = 0.0;
pub const SCORE_MAX: f64 = 10.0;

pub const BUDGET_FIT_BONUS: f64 = 1.0;
pub const BUDGET_FIT_RATIO: f64 = 0.7;
pub const HIGH_SAFETY_BEGINNER_PENALTY: f64 = 2.0;
pub const UNMET_PREREQUISITE_PENALTY: f64 = 1.0;

fn clamp(v: f64) -> f64 {
    v.clamp(SCORE_MIN, SCORE_MAX)
}

/// Selection state the score depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreContext {
    pub remaining_budget: f64,
    pub unmet_prerequisites: bool,
}

/// Every step of one score computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub base: f64,
    pub budget_fit: bool,
    pub safety_penalty: bool,
    pub prerequisite_penalty: bool,
    pub total: f64,
}

pub fn base_score(affinity: &AffinityTable, m: &Modification, prefs: &Preferences) -> f64 {
    clamp(affinity.best_for(m.category, &prefs.goals))
}

fn safety_penalized(m: &Modification, prefs: &Preferences) -> bool {
    m.safety == SafetyLevel::High && prefs.experience == ExperienceTier::Beginner
}

/// Ordering key used before selection: base score minus the safety penalty.
pub fn provisional_score(affinity: &AffinityTable, m: &Modification, prefs: &Preferences) -> f64 {
    let base = base_score(affinity, m, prefs);
    if safety_penalized(m, prefs) {
        clamp(base - HIGH_SAFETY_BEGINNER_PENALTY)
    } else {
        base
    }
}

/// Midpoint at or under 70% of what is left.
pub fn fits_budget(m: &Modification, remaining_budget: f64) -> bool {
    m.cost.midpoint() <= BUDGET_FIT_RATIO * remaining_budget
}

/// Final score in `[0, 10]`. Adjustments apply in order budget fit, safety,
/// prerequisite, and the running total is clamped after each one.
pub fn score(
    affinity: &AffinityTable,
    m: &Modification,
    prefs: &Preferences,
    ctx: &ScoreContext,
) -> ScoreBreakdown {
    let base = base_score(affinity, m, prefs);
    let mut total = base;

    let budget_fit = fits_budget(m, ctx.remaining_budget);
    if budget_fit {
        total = clamp(total + BUDGET_FIT_BONUS);
    }

    let safety_penalty = safety_penalized(m, prefs);
    if safety_penalty {
        total = clamp(total - HIGH_SAFETY_BEGINNER_PENALTY);
    }

    let prerequisite_penalty = ctx.unmet_prerequisites;
    if prerequisite_penalty {
        total = clamp(total - UNMET_PREREQUISITE_PENALTY);
    }

    ScoreBreakdown {
        base,
        budget_fit,
        safety_penalty,
        prerequisite_penalty,
        total,
    }
}
