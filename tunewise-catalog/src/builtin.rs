//! Built-in modification table.
//!
//! Insertion order is significant: it is the final tiebreak when two candidates share a score
//! and a cost midpoint.

use tunewise_types::{
    Category, CostRange, EngineType, ExperienceTier, LegalFlags, LegalImpact, Modification,
    SafetyLevel,
};

/// Static description of a catalog entry.
struct Entry {
    id: &'static str,
    category: Category,
    name: &'static str,
    description: &'static str,
    cost: CostRange,
    safety: SafetyLevel,
    engines: &'static [EngineType],
    experience: ExperienceTier,
    guided: bool,
    legal: LegalFlags,
    prerequisites: &'static [&'static str],
    conflicts: &'static [&'static str],
    benefits: &'static [&'static str],
    safety_warnings: &'static [&'static str],
    legal_considerations: &'static [&'static str],
    installation_difficulty: &'static str,
    professional_required: bool,
}

const COMBUSTION: &[EngineType] = &[EngineType::Petrol, EngineType::Diesel, EngineType::Hybrid];
const ANY_ENGINE: &[EngineType] = &[
    EngineType::Petrol,
    EngineType::Diesel,
    EngineType::Hybrid,
    EngineType::Electric,
];

const fn legal(warranty: LegalImpact, emissions: LegalImpact, insurance: LegalImpact) -> LegalFlags {
    LegalFlags {
        warranty,
        emissions,
        insurance,
    }
}

const fn cost(min: f64, max: f64) -> CostRange {
    CostRange { min, max }
}

use tunewise_types::LegalImpact::{Likely, Possible};
const NONE: LegalImpact = LegalImpact::None;

static BUILTIN: &[Entry] = &[
    Entry {
        id: "stage1_ecu_remap",
        category: Category::EngineTuning,
        name: "Stage 1 ECU Remap",
        description: "Optimizes fuel injection, ignition timing, and boost pressure for improved performance",
        cost: cost(300.0, 800.0),
        safety: SafetyLevel::Medium,
        engines: COMBUSTION,
        experience: ExperienceTier::Intermediate,
        guided: false,
        legal: legal(Likely, Possible, Possible),
        prerequisites: &[],
        conflicts: &[],
        benefits: &[
            "10-20% power increase",
            "Better throttle response",
            "Improved fuel efficiency",
        ],
        safety_warnings: &["May void warranty", "Ensure professional installation"],
        legal_considerations: &["Check local emissions laws", "May affect insurance"],
        installation_difficulty: "Professional installation required",
        professional_required: true,
    },
    Entry {
        id: "stage2_ecu_remap",
        category: Category::EngineTuning,
        name: "Stage 2 ECU Remap",
        description: "Advanced ECU tuning for modified engines with supporting hardware",
        cost: cost(500.0, 1_200.0),
        safety: SafetyLevel::High,
        engines: COMBUSTION,
        experience: ExperienceTier::Advanced,
        guided: false,
        legal: legal(Likely, Likely, Likely),
        prerequisites: &["stage1_ecu_remap", "cold_air_intake", "performance_exhaust"],
        conflicts: &[],
        benefits: &[
            "20-35% power increase",
            "Enhanced torque delivery",
            "Customizable power curves",
        ],
        safety_warnings: &[
            "High risk of engine damage if not properly tuned",
            "Requires supporting hardware",
        ],
        legal_considerations: &["Likely illegal for road use", "Track use only"],
        installation_difficulty: "Professional installation required",
        professional_required: true,
    },
    Entry {
        id: "performance_exhaust",
        category: Category::Exhaust,
        name: "Performance Exhaust System",
        description: "Replaces stock exhaust with high-flow system for better performance and sound",
        cost: cost(400.0, 2_000.0),
        safety: SafetyLevel::Low,
        engines: COMBUSTION,
        experience: ExperienceTier::Beginner,
        guided: false,
        legal: legal(Possible, Possible, NONE),
        prerequisites: &[],
        conflicts: &["cat_back_exhaust"],
        benefits: &[
            "5-15% power increase",
            "Improved exhaust flow",
            "Enhanced engine sound",
        ],
        safety_warnings: &["Ensure proper fitment", "Check for leaks after installation"],
        legal_considerations: &[
            "Check local noise regulations",
            "May require emissions testing",
        ],
        installation_difficulty: "Moderate - professional recommended",
        professional_required: false,
    },
    Entry {
        id: "cat_back_exhaust",
        category: Category::Exhaust,
        name: "Cat-Back Exhaust System",
        description: "Replaces exhaust from catalytic converter back for improved flow",
        cost: cost(300.0, 1_500.0),
        safety: SafetyLevel::Low,
        engines: COMBUSTION,
        experience: ExperienceTier::Beginner,
        guided: false,
        legal: legal(NONE, NONE, NONE),
        prerequisites: &[],
        conflicts: &["performance_exhaust"],
        benefits: &["3-8% power increase", "Better exhaust flow", "Sportier sound"],
        safety_warnings: &["Ensure proper fitment", "Check for leaks"],
        legal_considerations: &["Generally street legal", "Check local regulations"],
        installation_difficulty: "Moderate",
        professional_required: false,
    },
    Entry {
        id: "cold_air_intake",
        category: Category::Intake,
        name: "Cold Air Intake System",
        description: "Replaces stock air filter with high-flow system for better air delivery",
        cost: cost(150.0, 500.0),
        safety: SafetyLevel::Low,
        engines: COMBUSTION,
        experience: ExperienceTier::Beginner,
        guided: false,
        legal: legal(NONE, NONE, NONE),
        prerequisites: &[],
        conflicts: &["performance_air_filter"],
        benefits: &[
            "3-8% power increase",
            "Improved throttle response",
            "Better engine breathing",
        ],
        safety_warnings: &["Ensure proper fitment", "Check for air leaks"],
        legal_considerations: &["Generally street legal", "May require CARB approval"],
        installation_difficulty: "Easy to moderate",
        professional_required: false,
    },
    Entry {
        id: "performance_air_filter",
        category: Category::Intake,
        name: "Performance Air Filter",
        description: "High-flow air filter for improved air flow",
        cost: cost(50.0, 200.0),
        safety: SafetyLevel::Low,
        engines: COMBUSTION,
        experience: ExperienceTier::Beginner,
        guided: false,
        legal: legal(NONE, NONE, NONE),
        prerequisites: &[],
        conflicts: &["cold_air_intake"],
        benefits: &["1-3% power increase", "Better air flow", "Reusable"],
        safety_warnings: &["Ensure proper fitment", "Regular cleaning required"],
        legal_considerations: &["Generally street legal"],
        installation_difficulty: "Easy",
        professional_required: false,
    },
    Entry {
        id: "lowering_springs",
        category: Category::Suspension,
        name: "Lowering Springs",
        description: "Lower ride height and improve handling with stiffer springs",
        cost: cost(200.0, 800.0),
        safety: SafetyLevel::Medium,
        engines: ANY_ENGINE,
        experience: ExperienceTier::Intermediate,
        guided: false,
        legal: legal(Possible, NONE, NONE),
        prerequisites: &[],
        conflicts: &["coilover_suspension"],
        benefits: &[
            "Improved handling",
            "Lower center of gravity",
            "Sportier appearance",
        ],
        safety_warnings: &["May affect ride quality", "Check ground clearance"],
        legal_considerations: &[
            "Check local height restrictions",
            "May affect safety inspections",
        ],
        installation_difficulty: "Moderate - professional recommended",
        professional_required: false,
    },
    Entry {
        id: "coilover_suspension",
        category: Category::Suspension,
        name: "Coilover Suspension",
        description: "Adjustable suspension system for maximum handling and ride height control",
        cost: cost(800.0, 3_000.0),
        safety: SafetyLevel::Medium,
        engines: ANY_ENGINE,
        experience: ExperienceTier::Advanced,
        guided: true,
        legal: legal(Likely, NONE, Possible),
        prerequisites: &[],
        conflicts: &["lowering_springs"],
        benefits: &[
            "Fully adjustable ride height",
            "Improved handling",
            "Customizable damping",
        ],
        safety_warnings: &["Professional installation required", "Proper setup critical"],
        legal_considerations: &[
            "Check local height restrictions",
            "May require certification",
        ],
        installation_difficulty: "Professional installation required",
        professional_required: true,
    },
    Entry {
        id: "performance_tires",
        category: Category::WheelsTires,
        name: "Performance Tires",
        description: "High-performance tires for improved grip and handling",
        cost: cost(400.0, 1_200.0),
        safety: SafetyLevel::Low,
        engines: ANY_ENGINE,
        experience: ExperienceTier::Beginner,
        guided: false,
        legal: legal(NONE, NONE, NONE),
        prerequisites: &[],
        conflicts: &[],
        benefits: &[
            "Better grip",
            "Improved handling",
            "Shorter braking distances",
        ],
        safety_warnings: &["Shorter tread life", "May affect ride quality"],
        legal_considerations: &["Must meet DOT standards", "Check local regulations"],
        installation_difficulty: "Professional installation recommended",
        professional_required: false,
    },
    Entry {
        id: "lightweight_wheels",
        category: Category::WheelsTires,
        name: "Lightweight Wheels",
        description: "Lightweight alloy wheels for reduced unsprung weight",
        cost: cost(600.0, 2_000.0),
        safety: SafetyLevel::Low,
        engines: ANY_ENGINE,
        experience: ExperienceTier::Beginner,
        guided: false,
        legal: legal(NONE, NONE, NONE),
        prerequisites: &[],
        conflicts: &[],
        benefits: &[
            "Reduced unsprung weight",
            "Improved handling",
            "Better acceleration",
        ],
        safety_warnings: &["Ensure proper fitment", "Check load rating"],
        legal_considerations: &["Must meet safety standards", "Check local regulations"],
        installation_difficulty: "Professional installation recommended",
        professional_required: false,
    },
    Entry {
        id: "performance_brake_pads",
        category: Category::Brakes,
        name: "Performance Brake Pads",
        description: "High-performance brake pads for improved stopping power",
        cost: cost(100.0, 400.0),
        safety: SafetyLevel::Medium,
        engines: ANY_ENGINE,
        experience: ExperienceTier::Intermediate,
        guided: false,
        legal: legal(Possible, NONE, NONE),
        prerequisites: &[],
        conflicts: &[],
        benefits: &[
            "Better stopping power",
            "Improved fade resistance",
            "Better pedal feel",
        ],
        safety_warnings: &["May produce more dust", "Bed-in procedure required"],
        legal_considerations: &["Must meet safety standards"],
        installation_difficulty: "Moderate - professional recommended",
        professional_required: false,
    },
    Entry {
        id: "big_brake_kit",
        category: Category::Brakes,
        name: "Big Brake Kit",
        description: "Larger brake rotors and calipers for maximum stopping power",
        cost: cost(1_500.0, 5_000.0),
        safety: SafetyLevel::High,
        engines: ANY_ENGINE,
        experience: ExperienceTier::Advanced,
        guided: false,
        legal: legal(Likely, NONE, Possible),
        prerequisites: &["lightweight_wheels"],
        conflicts: &[],
        benefits: &[
            "Maximum stopping power",
            "Better heat dissipation",
            "Improved fade resistance",
        ],
        safety_warnings: &[
            "Professional installation required",
            "Proper bleeding critical",
        ],
        legal_considerations: &["Must meet safety standards", "May require certification"],
        installation_difficulty: "Professional installation required",
        professional_required: true,
    },
    Entry {
        id: "body_kit",
        category: Category::Cosmetic,
        name: "Body Kit",
        description: "Aesthetic modifications for improved appearance",
        cost: cost(500.0, 3_000.0),
        safety: SafetyLevel::Low,
        engines: ANY_ENGINE,
        experience: ExperienceTier::Beginner,
        guided: false,
        legal: legal(NONE, NONE, Possible),
        prerequisites: &[],
        conflicts: &[],
        benefits: &[
            "Improved appearance",
            "Better aerodynamics",
            "Personalization",
        ],
        safety_warnings: &["Ensure proper fitment", "Check for sharp edges"],
        legal_considerations: &["Check local regulations", "May require certification"],
        installation_difficulty: "Moderate - professional recommended",
        professional_required: false,
    },
];

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Entry {
    fn to_modification(&self) -> Modification {
        Modification {
            id: self.id.to_string(),
            category: self.category,
            name: self.name.to_string(),
            description: self.description.to_string(),
            cost: self.cost,
            safety: self.safety,
            engine_types: self.engines.to_vec(),
            experience: self.experience,
            guided: self.guided,
            legal: self.legal,
            prerequisites: strings(self.prerequisites),
            conflicts: strings(self.conflicts),
            benefits: strings(self.benefits),
            safety_warnings: strings(self.safety_warnings),
            legal_considerations: strings(self.legal_considerations),
            installation_difficulty: Some(self.installation_difficulty.to_string()),
            professional_required: self.professional_required,
        }
    }
}

/// The built-in modifications, in catalog order.
pub fn builtin_modifications() -> Vec<Modification> {
    BUILTIN.iter().map(Entry::to_modification).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn ids_are_unique() {
        let ids: BTreeSet<_> = BUILTIN.iter().map(|e| e.id).collect();
        assert_eq!(ids.len(), BUILTIN.len());
    }

    #[test]
    fn builtin_conflicts_are_listed_on_both_sides() {
        for entry in BUILTIN {
            for other in entry.conflicts {
                let peer = BUILTIN
                    .iter()
                    .find(|e| e.id == *other)
                    .expect("conflict target exists");
                assert!(
                    peer.conflicts.contains(&entry.id),
                    "{} lists {} but not vice versa",
                    entry.id,
                    other
                );
            }
        }
    }

    #[test]
    fn no_engine_tuning_for_electric() {
        for entry in BUILTIN.iter().filter(|e| e.category == Category::EngineTuning) {
            assert!(!entry.engines.contains(&EngineType::Electric), "{}", entry.id);
        }
    }

    #[test]
    fn cost_ranges_are_valid() {
        for entry in BUILTIN {
            assert!(entry.cost.is_valid(), "{}", entry.id);
        }
    }
}
