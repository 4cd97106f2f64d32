use crate::resolver::{Candidate, Resolution, rank_order};
use std::collections::{BTreeMap, BTreeSet};
use tunewise_types::{
    CompatibilityNote, CostRange, Exclusion, ExclusionReason, LegalDimension, LegalFlagSummary,
    LegalImpact, LegalSummary, Preferences, Recommendation, Report, SafetyLevel, SafetySummary,
    Vehicle, schema,
};

pub const DISCLAIMER: &str = "These recommendations are informational only. Consult a qualified \
technician before modifying your vehicle, and check local laws, warranty terms and insurance \
requirements.";

/// Inputs to [`assemble`] that are not part of the resolution.
#[derive(Debug, Clone)]
pub struct AssemblyContext<'v> {
    pub report_id: String,
    pub vehicle: &'v Vehicle,
    pub preferences: &'v Preferences,
    pub excluded: Vec<Exclusion>,
}

/// Orders the resolver's survivors and aggregates the report. Never drops a candidate.
pub fn assemble(resolution: Resolution<'_>, ctx: AssemblyContext<'_>) -> Report {
    let Resolution {
        mut selected,
        notes,
        ..
    } = resolution;

    selected.sort_by(|a, b| rank_order(a, b, |c| c.score));

    let safety_summary = summarize_safety(&selected);
    let legal_summary = summarize_legal(&selected);
    let total_cost = selected
        .iter()
        .fold(CostRange::default(), |acc, c| CostRange {
            min: acc.min + c.modification.cost.min,
            max: acc.max + c.modification.cost.max,
        });

    let recommendations: Vec<Recommendation> = selected
        .into_iter()
        .enumerate()
        .map(|(i, c)| to_recommendation(i as u32 + 1, c))
        .collect();

    let ceiling = ctx.preferences.effective_ceiling();
    let mut compatibility_notes = notes;
    if recommendations.is_empty() {
        compatibility_notes.push(CompatibilityNote::EmptyResult {
            reason: empty_reason(&ctx.excluded, ceiling),
        });
    }

    Report {
        schema: schema::TUNEWISE_REPORT_V1.to_string(),
        report_id: ctx.report_id,
        vehicle: ctx.vehicle.clone(),
        preferences: ctx.preferences.clone(),
        effective_budget: ceiling,
        recommendations,
        total_cost,
        safety_summary,
        legal_summary,
        compatibility_notes,
        excluded: ctx.excluded,
        disclaimer: DISCLAIMER.to_string(),
        enrichment: None,
    }
}

fn to_recommendation(rank: u32, c: Candidate<'_>) -> Recommendation {
    let m = c.modification;
    Recommendation {
        rank,
        id: m.id.clone(),
        name: m.name.clone(),
        category: m.category,
        description: m.description.clone(),
        score: c.score,
        cost: m.cost,
        safety: m.safety,
        experience: m.experience,
        legal: m.legal,
        verdict: c.verdict,
        notes: c.notes,
        benefits: m.benefits.clone(),
        safety_warnings: m.safety_warnings.clone(),
        installation_difficulty: m.installation_difficulty.clone(),
        professional_required: m.professional_required,
        annotations: Vec::new(),
    }
}

/// Warnings grouped by the modification's safety level, each prefixed with its name.
fn summarize_safety(ranked: &[Candidate<'_>]) -> SafetySummary {
    let mut out = SafetySummary::default();
    for c in ranked {
        let m = c.modification;
        let bucket = match m.safety {
            SafetyLevel::High => &mut out.high,
            SafetyLevel::Medium => &mut out.medium,
            SafetyLevel::Low => &mut out.low,
        };
        if m.safety_warnings.is_empty() {
            bucket.push(format!("{}: {} risk", m.name, m.safety.as_str()));
        }
        for w in &m.safety_warnings {
            bucket.push(format!("{}: {}", m.name, w));
        }
    }
    out
}

/// Most severe impact per dimension, plus the catalog's legal notes deduplicated in rank order.
fn summarize_legal(ranked: &[Candidate<'_>]) -> LegalSummary {
    let flag = |dim: LegalDimension| {
        let mut summary = LegalFlagSummary::default();
        for c in ranked {
            let impact = c.modification.legal.get(dim);
            summary.impact = summary.impact.max(impact);
            if impact > LegalImpact::None {
                summary.modifications.push(c.modification.id.clone());
            }
        }
        summary
    };

    let mut seen = BTreeSet::new();
    let considerations = ranked
        .iter()
        .flat_map(|c| c.modification.legal_considerations.iter())
        .filter(|text| seen.insert(text.as_str()))
        .cloned()
        .collect();

    LegalSummary {
        warranty: flag(LegalDimension::Warranty),
        emissions: flag(LegalDimension::Emissions),
        insurance: flag(LegalDimension::Insurance),
        considerations,
    }
}

/// Explains why nothing was selected.
pub fn empty_reason(excluded: &[Exclusion], ceiling: f64) -> String {
    if excluded.is_empty() {
        return "no modifications available in the catalog".to_string();
    }
    if excluded.iter().all(|e| e.reason == ExclusionReason::OverBudget) {
        return format!("no modifications match budget ceiling of ${ceiling:.0}");
    }

    let mut counts: BTreeMap<ExclusionReason, usize> = BTreeMap::new();
    for e in excluded {
        *counts.entry(e.reason).or_default() += 1;
    }
    let detail = counts
        .iter()
        .map(|(reason, n)| format!("{} {}", n, reason.as_str()))
        .collect::<Vec<_>>()
        .join(", ");
    format!("no modifications match the vehicle and preferences ({detail})")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{eligibility, resolver};
    use pretty_assertions::assert_eq;
    use tunewise_catalog::Catalog;
    use tunewise_types::{BudgetTier, EngineType, ExperienceTier, Goal};

    fn build(v: &Vehicle, p: &Preferences) -> Report {
        let catalog = Catalog::builtin();
        let filtered = eligibility::filter(&catalog, v, p);
        let installed = eligibility::installed_ids(&catalog, v);
        let candidates = resolver::prepare(&catalog, &filtered.eligible, p);
        let resolution = resolver::resolve(&catalog, candidates, p, &installed);
        assemble(
            resolution,
            AssemblyContext {
                report_id: "test".into(),
                vehicle: v,
                preferences: p,
                excluded: filtered.excluded,
            },
        )
    }

    fn vehicle() -> Vehicle {
        Vehicle {
            make: "BMW".into(),
            model: "M3".into(),
            year: 2021,
            engine_type: EngineType::Petrol,
            installed_modifications: vec![],
        }
    }

    fn prefs(goals: &[Goal], max_budget: Option<f64>) -> Preferences {
        Preferences {
            goals: goals.to_vec(),
            budget_tier: BudgetTier::Premium,
            experience: ExperienceTier::Advanced,
            max_budget,
        }
    }

    #[test]
    fn ranks_are_dense_and_scores_non_increasing() {
        let r = build(&vehicle(), &prefs(&[Goal::Performance], None));
        let ranks: Vec<u32> = r.recommendations.iter().map(|x| x.rank).collect();
        assert_eq!(ranks, (1..=r.recommendations.len() as u32).collect::<Vec<_>>());
        assert!(r.recommendations.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn total_cost_sums_bounds() {
        let r = build(&vehicle(), &prefs(&[Goal::Performance], None));
        let min: f64 = r.recommendations.iter().map(|x| x.cost.min).sum();
        let max: f64 = r.recommendations.iter().map(|x| x.cost.max).sum();
        assert_eq!(r.total_cost, CostRange::new(min, max));
    }

    #[test]
    fn legal_summary_keeps_most_severe_impact() {
        let r = build(&vehicle(), &prefs(&[Goal::Performance], None));
        assert_eq!(r.legal_summary.warranty.impact, LegalImpact::Likely);
        assert_eq!(r.legal_summary.emissions.impact, LegalImpact::Likely);
        assert!(
            r.legal_summary
                .emissions
                .modifications
                .contains(&"stage1_ecu_remap".to_string())
        );

        let mut seen = BTreeSet::new();
        assert!(r.legal_summary.considerations.iter().all(|c| seen.insert(c)));
    }

    #[test]
    fn safety_warnings_are_grouped_by_level() {
        let r = build(&vehicle(), &prefs(&[Goal::TrackUse], None));
        assert!(
            r.safety_summary
                .high
                .iter()
                .any(|w| w.starts_with("Big Brake Kit: "))
        );
        assert!(
            r.safety_summary
                .low
                .iter()
                .all(|w| !w.starts_with("Big Brake Kit"))
        );
    }

    #[test]
    fn empty_result_carries_budget_note() {
        let r = build(&vehicle(), &prefs(&[Goal::Performance], Some(0.0)));
        assert!(r.is_empty());
        assert_eq!(r.total_cost, CostRange::new(0.0, 0.0));
        assert_eq!(
            r.compatibility_notes,
            vec![CompatibilityNote::EmptyResult {
                reason: "no modifications match budget ceiling of $0".into()
            }]
        );
    }

    #[test]
    fn mixed_exclusions_are_counted() {
        let reason = empty_reason(
            &[
                Exclusion {
                    id: "a".into(),
                    reason: ExclusionReason::EngineType,
                },
                Exclusion {
                    id: "b".into(),
                    reason: ExclusionReason::OverBudget,
                },
                Exclusion {
                    id: "c".into(),
                    reason: ExclusionReason::EngineType,
                },
            ],
            100.0,
        );
        assert_eq!(
            reason,
            "no modifications match the vehicle and preferences (2 engine_type, 1 over_budget)"
        );
    }
}
