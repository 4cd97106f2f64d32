use crate::scorer::{self, ScoreContext};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use tunewise_catalog::Catalog;
use tunewise_types::{CompatibilityNote, Modification, Preferences, PrerequisiteGap, Verdict};

/// An eligible modification carried through scoring and resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate<'a> {
    pub modification: &'a Modification,
    /// Catalog insertion index, the final tiebreak.
    pub position: usize,
    pub provisional: f64,
    pub score: f64,
    pub verdict: Verdict,
    /// Prerequisites neither installed nor selected before this candidate.
    pub unmet: Vec<String>,
    pub notes: Vec<String>,
}

impl<'a> Candidate<'a> {
    pub fn id(&self) -> &'a str {
        self.modification.id.as_str()
    }

    pub fn midpoint(&self) -> f64 {
        self.modification.cost.midpoint()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution<'a> {
    /// Accepted candidates in processing order.
    pub selected: Vec<Candidate<'a>>,
    /// Candidates dropped because of a conflict with an earlier selection.
    pub skipped: Vec<Candidate<'a>>,
    pub notes: Vec<CompatibilityNote>,
}

/// Descending by `key`, then lower cost midpoint, then catalog order.
pub fn rank_order(
    a: &Candidate<'_>,
    b: &Candidate<'_>,
    key: impl Fn(&Candidate<'_>) -> f64,
) -> Ordering {
    key(b)
        .total_cmp(&key(a))
        .then_with(|| a.midpoint().total_cmp(&b.midpoint()))
        .then_with(|| a.position.cmp(&b.position))
}

/// Builds candidates with provisional scores, sorted into processing order.
pub fn prepare<'a>(
    catalog: &'a Catalog,
    eligible: &[&'a Modification],
    prefs: &Preferences,
) -> Vec<Candidate<'a>> {
    let mut candidates: Vec<Candidate<'a>> = eligible
        .iter()
        .map(|m| {
            let provisional = scorer::provisional_score(catalog.affinity(), m, prefs);
            Candidate {
                modification: m,
                position: catalog.position(&m.id).unwrap_or(usize::MAX),
                provisional,
                score: provisional,
                verdict: Verdict::Eligible,
                unmet: Vec::new(),
                notes: Vec::new(),
            }
        })
        .collect();

    candidates.sort_by(|a, b| rank_order(a, b, |c| c.provisional));
    candidates
}

/// Single ordered pass: conflict check, incremental scoring against the remaining
/// budget, then classification of the prerequisites that were unmet when each
/// candidate was accepted.
pub fn resolve<'a>(
    catalog: &'a Catalog,
    candidates: Vec<Candidate<'a>>,
    prefs: &Preferences,
    installed: &BTreeSet<String>,
) -> Resolution<'a> {
    let mut out = Resolution::default();
    let mut selected_ids: BTreeSet<&str> = BTreeSet::new();
    let mut remaining = prefs.effective_ceiling().max(0.0);

    for mut cand in candidates {
        let id = cand.id();

        if let Some(winner) = out
            .selected
            .iter()
            .find(|s| catalog.conflicts(s.id(), id))
            .map(|s| s.id())
        {
            let note = CompatibilityNote::Conflict {
                candidate: id.to_string(),
                conflicts_with: winner.to_string(),
            };
            cand.verdict = Verdict::ConflictSkipped;
            cand.notes.push(note.message());
            out.notes.push(note);
            out.skipped.push(cand);
            continue;
        }

        cand.unmet = cand
            .modification
            .prerequisites
            .iter()
            .filter(|p| !installed.contains(p.as_str()) && !selected_ids.contains(p.as_str()))
            .cloned()
            .collect();

        let breakdown = scorer::score(
            catalog.affinity(),
            cand.modification,
            prefs,
            &ScoreContext {
                remaining_budget: remaining,
                unmet_prerequisites: !cand.unmet.is_empty(),
            },
        );
        cand.score = breakdown.total;
        cand.verdict = Verdict::Selected;
        remaining = (remaining - cand.midpoint()).max(0.0);

        selected_ids.insert(id);
        out.selected.push(cand);
    }

    classify_prerequisites(catalog, &mut out);
    out
}

fn classify_prerequisites(catalog: &Catalog, out: &mut Resolution<'_>) {
    let selected: BTreeSet<&str> = out.selected.iter().map(|c| c.id()).collect();
    let skipped: BTreeSet<&str> = out.skipped.iter().map(|c| c.id()).collect();

    for cand in out.selected.iter_mut() {
        for prereq in &cand.unmet {
            let note = if selected.contains(prereq.as_str()) {
                if cand.verdict == Verdict::Selected {
                    cand.verdict = Verdict::RequiresPrerequisite;
                }
                CompatibilityNote::Requires {
                    candidate: cand.id().to_string(),
                    prerequisite: prereq.clone(),
                }
            } else {
                let gap = if skipped.contains(prereq.as_str()) {
                    PrerequisiteGap::ConflictSkipped
                } else if catalog.get(prereq).is_some() {
                    PrerequisiteGap::Ineligible
                } else {
                    PrerequisiteGap::Unknown
                };
                cand.verdict = Verdict::MissingPrerequisite;
                CompatibilityNote::MissingPrerequisite {
                    candidate: cand.id().to_string(),
                    prerequisite: prereq.clone(),
                    gap,
                }
            };
            cand.notes.push(note.message());
            out.notes.push(note);
        }
    }
}
