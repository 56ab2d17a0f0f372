//! Static catalog of workout templates.
//!
//! The catalog is built once at startup and never mutated. Order matters:
//! the recommendation fallback breaks score ties in favor of the
//! earliest-listed template, so templates are stored in a `Vec` rather than
//! a map.

use crate::types::{TemplateKind, WorkoutTemplate};
use once_cell::sync::Lazy;

/// Template names referenced directly by the recommendation rules.
///
/// If any of these is missing from the catalog the engine fails loudly;
/// a broken catalog is a programmer error, not a runtime condition to mask.
pub const RECOVERY_TEMPLATE: &str = "Active Recovery / Yoga";
pub const HYPERTROPHY_TEMPLATE: &str = "Hypertrophy / Strength";
pub const HIIT_TEMPLATE: &str = "HIIT Session";
pub const CARDIO_CORE_TEMPLATE: &str = "Core & Cardio";

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

/// The complete ordered set of workout templates
#[derive(Clone, Debug)]
pub struct Catalog {
    pub templates: Vec<WorkoutTemplate>,
}

impl Catalog {
    /// Look up a template by its unique name
    pub fn by_name(&self, name: &str) -> Option<&WorkoutTemplate> {
        self.templates.iter().find(|t| t.name == name)
    }

    /// First template of the given kind, in catalog order
    pub fn first_of_kind(&self, kind: TemplateKind) -> Option<&WorkoutTemplate> {
        self.templates.iter().find(|t| t.kind == kind)
    }

    /// Validate the catalog for consistency and completeness
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.templates.is_empty() {
            errors.push("Catalog has no templates".to_string());
        }

        let mut seen = std::collections::HashSet::new();
        for template in &self.templates {
            if template.name.is_empty() {
                errors.push("Template has empty name".to_string());
            }
            if !seen.insert(template.name.as_str()) {
                errors.push(format!("Duplicate template name '{}'", template.name));
            }
            if template.category.is_empty() {
                errors.push(format!("Template '{}' has empty category", template.name));
            }
            if template.exercises.is_empty() {
                errors.push(format!("Template '{}' has no exercises", template.name));
            }
            for muscle in &template.muscles {
                if muscle.trim().is_empty() || muscle.trim().to_lowercase() != *muscle {
                    errors.push(format!(
                        "Template '{}' has non-canonical muscle key '{}'",
                        template.name, muscle
                    ));
                }
            }
        }

        // Every template name the decision rules reference must exist
        for name in [
            RECOVERY_TEMPLATE,
            HYPERTROPHY_TEMPLATE,
            HIIT_TEMPLATE,
            CARDIO_CORE_TEMPLATE,
        ] {
            if self.by_name(name).is_none() {
                errors.push(format!("Rule-referenced template '{}' is missing", name));
            }
        }

        // The recovery-needed rule picks any flexibility template
        if self.first_of_kind(TemplateKind::Flexibility).is_none() {
            errors.push("Catalog has no flexibility templates".to_string());
        }

        errors
    }
}

fn template(
    name: &str,
    muscles: &[&str],
    kind: TemplateKind,
    category: &str,
    exercises: &[&str],
) -> WorkoutTemplate {
    WorkoutTemplate {
        name: name.into(),
        muscles: muscles.iter().map(|m| m.to_string()).collect(),
        kind,
        category: category.into(),
        exercises: exercises.iter().map(|e| e.to_string()).collect(),
    }
}

/// Builds the default catalog of workout templates
pub fn build_default_catalog() -> Catalog {
    let templates = vec![
        template(
            "Full Body Strength",
            &["chest", "back", "legs", "core"],
            TemplateKind::Strength,
            "strength",
            &["Squats", "Deadlifts", "Bench Press", "Rows", "Planks"],
        ),
        template(
            "Upper Body Push",
            &["chest", "shoulders", "triceps"],
            TemplateKind::Strength,
            "push",
            &[
                "Bench Press",
                "Overhead Press",
                "Dips",
                "Lateral Raises",
                "Tricep Extensions",
            ],
        ),
        template(
            "Upper Body Pull",
            &["back", "biceps"],
            TemplateKind::Strength,
            "pull",
            &[
                "Pull-ups",
                "Barbell Rows",
                "Face Pulls",
                "Bicep Curls",
                "Lat Pulldowns",
            ],
        ),
        template(
            "Leg Day",
            &["quads", "hamstrings", "glutes", "calves"],
            TemplateKind::Strength,
            "legs",
            &[
                "Squats",
                "Romanian Deadlifts",
                "Leg Press",
                "Lunges",
                "Calf Raises",
            ],
        ),
        template(
            CARDIO_CORE_TEMPLATE,
            &["core"],
            TemplateKind::Cardio,
            "cardio",
            &[
                "Running",
                "Burpees",
                "Mountain Climbers",
                "Bicycle Crunches",
                "Jump Rope",
            ],
        ),
        template(
            RECOVERY_TEMPLATE,
            &[],
            TemplateKind::Flexibility,
            "recovery",
            &[
                "Sun Salutations",
                "Cat-Cow Stretch",
                "Pigeon Pose",
                "Child's Pose",
                "Foam Rolling",
            ],
        ),
        template(
            HIIT_TEMPLATE,
            &["legs", "core"],
            TemplateKind::Cardio,
            "hiit",
            &[
                "Sprint Intervals",
                "Box Jumps",
                "Kettlebell Swings",
                "Battle Ropes",
                "Burpees",
            ],
        ),
        template(
            HYPERTROPHY_TEMPLATE,
            &["chest", "back", "shoulders"],
            TemplateKind::Strength,
            "hypertrophy",
            &[
                "Heavy Squats",
                "Bench Press 5x5",
                "Barbell Rows",
                "Overhead Press",
                "Deadlifts",
            ],
        ),
    ];

    Catalog { templates }
}

/// Muscle-group synonym table for heatmap display: `(source, target)`.
///
/// A source score propagates to the target key only when the target has no
/// directly-observed score of its own.
pub fn muscle_aliases() -> &'static [(&'static str, &'static str)] {
    &[("abs", "core"), ("legs", "quads")]
}

/// Target muscle keys for an advice category.
///
/// Categories absent from the table (including "cardio" and "recovery",
/// which match on session tags instead) resolve to an empty set.
pub fn category_muscles(category: &str) -> &'static [&'static str] {
    match category {
        "push" => &["chest", "shoulders", "triceps"],
        "pull" => &["back", "biceps"],
        "legs" => &["quads", "hamstrings", "glutes", "calves"],
        "strength" => &["chest", "back", "legs"],
        "hiit" => &["legs", "core"],
        "hypertrophy" => &["chest", "back", "shoulders"],
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_loads() {
        let catalog = build_default_catalog();
        assert_eq!(catalog.templates.len(), 8);
    }

    #[test]
    fn test_default_catalog_validates() {
        let catalog = build_default_catalog();
        let errors = catalog.validate();
        assert!(
            errors.is_empty(),
            "Default catalog has validation errors: {:?}",
            errors
        );
    }

    #[test]
    fn test_rule_templates_present() {
        let catalog = build_default_catalog();
        for name in [
            RECOVERY_TEMPLATE,
            HYPERTROPHY_TEMPLATE,
            HIIT_TEMPLATE,
            CARDIO_CORE_TEMPLATE,
        ] {
            assert!(catalog.by_name(name).is_some(), "{} missing", name);
        }
    }

    #[test]
    fn test_first_of_kind_respects_order() {
        let catalog = build_default_catalog();
        // Core & Cardio is listed before HIIT Session
        let first_cardio = catalog.first_of_kind(TemplateKind::Cardio).unwrap();
        assert_eq!(first_cardio.name, CARDIO_CORE_TEMPLATE);
    }

    #[test]
    fn test_validate_catches_missing_rule_template() {
        let mut catalog = build_default_catalog();
        catalog.templates.retain(|t| t.name != HIIT_TEMPLATE);
        let errors = catalog.validate();
        assert!(errors.iter().any(|e| e.contains(HIIT_TEMPLATE)));
    }

    #[test]
    fn test_category_muscles_unknown_is_empty() {
        assert!(category_muscles("cardio").is_empty());
        assert!(category_muscles("recovery").is_empty());
        assert!(category_muscles("nonsense").is_empty());
    }
}
