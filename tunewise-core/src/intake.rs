//! Input checks that run before a request reaches the engine.
//!
//! Errors block the request; warnings are reported alongside the result.
//! The engine itself tolerates any make, model or installed-part text, so
//! embedders that want free-form input can skip this step.

use serde::Serialize;
use tunewise_types::model::{YEAR_MAX, YEAR_MIN};
use tunewise_types::{
    BudgetTier, EngineType, ExperienceTier, Goal, Preferences, RecommendationRequest, Vehicle,
};

pub const MAX_SUGGESTIONS: usize = 5;
pub const INSTALLED_TEXT_MIN: usize = 3;
pub const INSTALLED_TEXT_MAX: usize = 100;

const MAKES: &[&str] = &[
    "Toyota",
    "Honda",
    "Ford",
    "Chevrolet",
    "Nissan",
    "BMW",
    "Mercedes-Benz",
    "Audi",
    "Volkswagen",
    "Hyundai",
    "Kia",
    "Mazda",
    "Subaru",
    "Mitsubishi",
    "Lexus",
    "Infiniti",
    "Acura",
    "Volvo",
    "Saab",
    "Peugeot",
    "Renault",
    "Fiat",
    "Alfa Romeo",
    "Ferrari",
    "Lamborghini",
    "Porsche",
    "Aston Martin",
    "Bentley",
    "Rolls-Royce",
    "McLaren",
    "Bugatti",
    "Koenigsegg",
    "Pagani",
    "Tesla",
    "Rivian",
    "Lucid",
    "Polestar",
    "NIO",
    "BYD",
    "Rimac",
];

const MODELS: &[(&str, &[&str])] = &[
    (
        "Toyota",
        &["Camry", "Corolla", "Prius", "RAV4", "Highlander", "Tacoma", "Tundra", "Supra", "86"],
    ),
    (
        "Honda",
        &["Civic", "Accord", "CR-V", "Pilot", "Ridgeline", "NSX", "S2000"],
    ),
    (
        "Ford",
        &["F-150", "Mustang", "Focus", "Fusion", "Escape", "Explorer", "Bronco", "GT"],
    ),
    (
        "BMW",
        &["3 Series", "5 Series", "7 Series", "X3", "X5", "M3", "M5", "i3", "i8"],
    ),
    (
        "Mercedes-Benz",
        &["C-Class", "E-Class", "S-Class", "GLC", "GLE", "AMG GT", "EQS"],
    ),
    (
        "Audi",
        &["A3", "A4", "A6", "Q3", "Q5", "Q7", "RS3", "RS6", "e-tron"],
    ),
    (
        "Tesla",
        &["Model S", "Model 3", "Model X", "Model Y", "Cybertruck", "Roadster"],
    ),
    (
        "Porsche",
        &["911", "Cayman", "Boxster", "Cayenne", "Macan", "Panamera", "Taycan"],
    ),
];

const ENGINE_MAKES: &[(EngineType, &[&str])] = &[
    (
        EngineType::Petrol,
        &["Toyota", "Honda", "Ford", "BMW", "Mercedes-Benz", "Audi", "Porsche"],
    ),
    (
        EngineType::Diesel,
        &["BMW", "Mercedes-Benz", "Audi", "Volkswagen", "Volvo"],
    ),
    (
        EngineType::Hybrid,
        &["Toyota", "Honda", "Ford", "BMW", "Mercedes-Benz", "Audi"],
    ),
    (
        EngineType::Electric,
        &["Tesla", "BMW", "Mercedes-Benz", "Audi", "Porsche", "Rivian", "Lucid"],
    ),
];

/// Mass-market makes offered with every engine type.
const COMMON_MAKES: &[&str] = &[
    "Toyota",
    "Honda",
    "Ford",
    "BMW",
    "Mercedes-Benz",
    "Audi",
    "Volkswagen",
    "Hyundai",
    "Kia",
];

const LUXURY_MAKES: &[&str] = &[
    "BMW",
    "Mercedes-Benz",
    "Audi",
    "Porsche",
    "Ferrari",
    "Lamborghini",
];

const BLOCKED_WORDS: &[&str] = &["illegal", "unsafe", "dangerous", "void"];

fn contains_ci(list: &[&str], value: &str) -> bool {
    list.iter().any(|item| item.eq_ignore_ascii_case(value.trim()))
}

/// Result of validating one request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Validation {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl Validation {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    fn merge(&mut self, other: Validation) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InputValidator;

impl InputValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn makes(&self) -> &'static [&'static str] {
        MAKES
    }

    /// Canonical spelling of a known make.
    pub fn canonical_make(&self, make: &str) -> Option<&'static str> {
        MAKES
            .iter()
            .copied()
            .find(|m| m.eq_ignore_ascii_case(make.trim()))
    }

    /// Known models for a make. Makes without a model list return `None`.
    pub fn models(&self, make: &str) -> Option<&'static [&'static str]> {
        MODELS
            .iter()
            .find(|(m, _)| m.eq_ignore_ascii_case(make.trim()))
            .map(|(_, models)| *models)
    }

    pub fn model_table(&self) -> &'static [(&'static str, &'static [&'static str])] {
        MODELS
    }

    pub fn validate(&self, request: &RecommendationRequest) -> Validation {
        let mut out = self.validate_vehicle(&request.vehicle);
        out.merge(self.validate_preferences(&request.preferences));

        if out.is_ok() {
            out.errors
                .extend(self.cross_check(&request.vehicle, &request.preferences));
        }
        out
    }

    pub fn validate_vehicle(&self, vehicle: &Vehicle) -> Validation {
        let mut out = Validation::default();

        let known_make = self.canonical_make(&vehicle.make);
        if known_make.is_none() {
            out.errors
                .push(format!("unknown make: {}", vehicle.make.trim()));
        }

        if let Some(models) = self.models(&vehicle.make)
            && !contains_ci(models, &vehicle.model)
        {
            out.errors.push(format!(
                "unknown model '{}' for make '{}'",
                vehicle.model.trim(),
                vehicle.make.trim()
            ));
        }

        if !(YEAR_MIN..=YEAR_MAX).contains(&vehicle.year) {
            out.errors.push(format!(
                "year {} outside {YEAR_MIN}-{YEAR_MAX}",
                vehicle.year
            ));
        }

        if known_make.is_some() && !self.engine_plausible(&vehicle.make, vehicle.engine_type) {
            out.warnings.push(format!(
                "engine type '{}' is unusual for {}",
                vehicle.engine_type.as_str(),
                vehicle.make.trim()
            ));
        }

        for text in &vehicle.installed_modifications {
            if !installed_text_ok(text) {
                out.errors
                    .push(format!("invalid installed modification: {text}"));
            }
        }

        out
    }

    pub fn validate_preferences(&self, prefs: &Preferences) -> Validation {
        let mut out = Validation::default();

        if prefs.goals.is_empty() {
            out.errors.push("at least one goal is required".to_string());
        }

        if let Some(max) = prefs.max_budget {
            let range = prefs.budget_tier.range();
            if !max.is_finite() || max < 0.0 {
                out.errors
                    .push(format!("max_budget must be a non-negative number, got {max}"));
            } else if max < range.min || max > range.max {
                out.errors.push(format!(
                    "max_budget ${max:.0} is outside the {} tier (${:.0}-${:.0})",
                    prefs.budget_tier.as_str(),
                    range.min,
                    range.max
                ));
            }
        }

        out
    }

    /// Vehicle/preference combinations that are rejected even though each
    /// half is valid on its own. Only run once both halves pass.
    pub fn cross_check(&self, vehicle: &Vehicle, prefs: &Preferences) -> Vec<String> {
        let mut errors = Vec::new();
        let wants = |g: Goal| prefs.goals.contains(&g);

        if vehicle.engine_type == EngineType::Electric {
            if wants(Goal::FuelEconomy) {
                errors.push("fuel economy goal does not apply to electric vehicles".to_string());
            }
            if wants(Goal::TrackUse) {
                errors.push(
                    "track use options are limited for electric vehicles".to_string(),
                );
            }
        }

        if prefs.budget_tier == BudgetTier::Budget && contains_ci(LUXURY_MAKES, &vehicle.make) {
            errors.push("budget tier may be too low for luxury vehicle modifications".to_string());
        }

        if prefs.experience == ExperienceTier::Beginner && wants(Goal::TrackUse) {
            errors.push("track use modifications may be too complex for beginners".to_string());
        }

        errors
    }

    fn engine_plausible(&self, make: &str, engine: EngineType) -> bool {
        contains_ci(COMMON_MAKES, make)
            || ENGINE_MAKES
                .iter()
                .any(|(e, makes)| *e == engine && contains_ci(makes, make))
    }

    /// Engine types commonly offered by a make.
    pub fn compatible_engine_types(&self, make: &str) -> Vec<EngineType> {
        ENGINE_MAKES
            .iter()
            .filter(|(_, makes)| contains_ci(makes, make))
            .map(|(engine, _)| *engine)
            .collect()
    }

    pub fn suggest_makes(&self, partial: &str) -> Vec<&'static str> {
        suggest(MAKES, partial)
    }

    pub fn suggest_models(&self, make: &str, partial: &str) -> Vec<&'static str> {
        self.models(make)
            .map(|models| suggest(models, partial))
            .unwrap_or_default()
    }
}

fn suggest(candidates: &'static [&'static str], partial: &str) -> Vec<&'static str> {
    let needle = partial.trim().to_lowercase();
    candidates
        .iter()
        .copied()
        .filter(|c| c.to_lowercase().contains(&needle))
        .take(MAX_SUGGESTIONS)
        .collect()
}

fn installed_text_ok(text: &str) -> bool {
    let len = text.chars().count();
    if !(INSTALLED_TEXT_MIN..=INSTALLED_TEXT_MAX).contains(&len) {
        return false;
    }
    let lower = text.to_lowercase();
    !BLOCKED_WORDS.iter().any(|w| lower.contains(w))
}
