use std::collections::BTreeSet;
use tunewise_catalog::Catalog;
use tunewise_types::{
    Category, EngineType, Exclusion, ExclusionReason, ExperienceTier, Modification, Preferences,
    Vehicle,
};

#[derive(Debug, Clone, Default)]
pub struct FilterOutcome<'a> {
    /// Eligible entries in catalog order.
    pub eligible: Vec<&'a Modification>,
    /// One entry per removed modification, first failing rule wins.
    pub excluded: Vec<Exclusion>,
}

/// Catalog ids of the vehicle's installed parts. Free text that matches no entry is ignored.
pub fn installed_ids(catalog: &Catalog, vehicle: &Vehicle) -> BTreeSet<String> {
    vehicle
        .installed_modifications
        .iter()
        .filter_map(|raw| catalog.lookup(raw))
        .map(|m| m.id.clone())
        .collect()
}

/// Engine tuning never applies to an electric drivetrain, whatever the entry lists.
pub fn engine_allows(engine: EngineType, m: &Modification) -> bool {
    m.applies_to(engine)
        && !(engine == EngineType::Electric && m.category == Category::EngineTuning)
}

/// Advanced items are hidden from intermediate users unless the entry is guided.
pub fn experience_allows(user: ExperienceTier, m: &Modification) -> bool {
    m.experience <= user
        || (m.guided
            && user == ExperienceTier::Intermediate
            && m.experience == ExperienceTier::Advanced)
}

fn exclusion_reason(
    m: &Modification,
    vehicle: &Vehicle,
    prefs: &Preferences,
    installed: &BTreeSet<String>,
    ceiling: f64,
) -> Option<ExclusionReason> {
    if !engine_allows(vehicle.engine_type, m) {
        return Some(ExclusionReason::EngineType);
    }
    if installed.contains(&m.id) {
        return Some(ExclusionReason::AlreadyInstalled);
    }
    if !experience_allows(prefs.experience, m) {
        return Some(ExclusionReason::Experience);
    }
    if m.cost.min > ceiling {
        return Some(ExclusionReason::OverBudget);
    }
    None
}

pub fn filter<'a>(catalog: &'a Catalog, vehicle: &Vehicle, prefs: &Preferences) -> FilterOutcome<'a> {
    let installed = installed_ids(catalog, vehicle);
    let ceiling = prefs.effective_ceiling();

    let mut out = FilterOutcome::default();
    for m in catalog.iter() {
        match exclusion_reason(m, vehicle, prefs, &installed, ceiling) {
            Some(reason) => out.excluded.push(Exclusion {
                id: m.id.clone(),
                reason,
            }),
            None => out.eligible.push(m),
        }
    }
    out
}
