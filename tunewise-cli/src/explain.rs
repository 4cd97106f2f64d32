//! Modification explanations for the `tunewise explain` command.
//!
//! Looks entries up in the active catalog and describes what they do, their
//! safety level, legal exposure and compatibility constraints.

use tunewise_catalog::Catalog;
use tunewise_types::{Modification, SafetyLevel};

/// Look up a catalog entry by id or display name.
///
/// Matching ignores case and treats `-`, `_` and spaces alike, so
/// `stage1-ecu-remap` and `Stage 1 ECU Remap` both resolve.
pub fn lookup_modification<'c>(catalog: &'c Catalog, query: &str) -> Option<&'c Modification> {
    let wanted = normalize(query);
    catalog
        .iter()
        .find(|m| normalize(&m.id) == wanted || normalize(&m.name) == wanted)
}

fn normalize(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == '-' || c == ' ' { '_' } else { c })
        .collect()
}

/// List all catalog ids in catalog order.
pub fn list_modification_ids(catalog: &Catalog) -> Vec<&str> {
    catalog.iter().map(|m| m.id.as_str()).collect()
}

/// Format a safety level for display.
pub fn format_safety(safety: SafetyLevel) -> &'static str {
    match safety {
        SafetyLevel::Low => "Low",
        SafetyLevel::Medium => "Medium",
        SafetyLevel::High => "High",
    }
}

/// Get a description of what a safety level means.
pub fn safety_meaning(safety: SafetyLevel) -> &'static str {
    match safety {
        SafetyLevel::Low => {
            "LOW risk modifications are bolt-on parts with little effect on how the car\n\
             behaves at the limit. Most owners can install them with basic tools."
        }
        SafetyLevel::Medium => {
            "MEDIUM risk modifications change handling, braking or engine behaviour.\n\
             Beginners get no penalty for them, but professional fitment is advised."
        }
        SafetyLevel::High => {
            "HIGH risk modifications alter safety-critical systems or push the engine\n\
             past factory limits. They score 2 points lower for beginners."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_id() {
        let catalog = Catalog::builtin();
        let m = lookup_modification(&catalog, "big_brake_kit").expect("should find by id");
        assert_eq!(m.id, "big_brake_kit");
    }

    #[test]
    fn test_lookup_by_name() {
        let catalog = Catalog::builtin();
        let m = lookup_modification(&catalog, "cold air intake system").expect("should find by name");
        assert_eq!(m.id, "cold_air_intake");
    }

    #[test]
    fn test_lookup_case_insensitive() {
        let catalog = Catalog::builtin();
        let m = lookup_modification(&catalog, "STAGE1_ECU_REMAP").expect("case insensitive");
        assert_eq!(m.id, "stage1_ecu_remap");
    }

    #[test]
    fn test_lookup_hyphens() {
        let catalog = Catalog::builtin();
        let m = lookup_modification(&catalog, "cat-back-exhaust").expect("hyphens");
        assert_eq!(m.id, "cat_back_exhaust");
    }

    #[test]
    fn test_unknown_modification() {
        let catalog = Catalog::builtin();
        assert!(lookup_modification(&catalog, "nitrous_kit").is_none());
    }

    #[test]
    fn test_all_modifications_listed() {
        let catalog = Catalog::builtin();
        let ids = list_modification_ids(&catalog);
        assert_eq!(ids.len(), 13);
        assert_eq!(ids[0], "stage1_ecu_remap");
        assert!(ids.iter().all(|id| lookup_modification(&catalog, id).is_some()));
    }
}
