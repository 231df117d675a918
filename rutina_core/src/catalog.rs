//! Built-in catalog of exercises by muscle group.
//!
//! The catalog only feeds selection inputs: pick a group, then pick one of
//! its exercises. Group lookups are case and accent insensitive.

use crate::types::normalize_key;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Muscle group used to filter the exercise catalog
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MuscleGroup {
    Pecho,
    Espalda,
    Hombros,
    Biceps,
    Triceps,
    Piernas,
    Abdominales,
}

/// Normalized label or alias -> group, built once
static GROUP_INDEX: Lazy<HashMap<String, MuscleGroup>> = Lazy::new(|| {
    let mut index = HashMap::new();
    for group in MuscleGroup::ALL {
        index.insert(normalize_key(group.label()), group);
    }
    for (alias, group) in [
        ("pectorales", MuscleGroup::Pecho),
        ("hombro", MuscleGroup::Hombros),
        ("pierna", MuscleGroup::Piernas),
        ("abdomen", MuscleGroup::Abdominales),
        ("abs", MuscleGroup::Abdominales),
    ] {
        index.insert(normalize_key(alias), group);
    }
    index
});

impl MuscleGroup {
    /// Groups in the order they are offered for selection
    pub const ALL: [MuscleGroup; 7] = [
        MuscleGroup::Pecho,
        MuscleGroup::Espalda,
        MuscleGroup::Hombros,
        MuscleGroup::Biceps,
        MuscleGroup::Triceps,
        MuscleGroup::Piernas,
        MuscleGroup::Abdominales,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MuscleGroup::Pecho => "Pecho",
            MuscleGroup::Espalda => "Espalda",
            MuscleGroup::Hombros => "Hombros",
            MuscleGroup::Biceps => "Bíceps",
            MuscleGroup::Triceps => "Tríceps",
            MuscleGroup::Piernas => "Piernas",
            MuscleGroup::Abdominales => "Abdominales",
        }
    }

    /// Look up a group by label or alias, ignoring case and accents
    pub fn parse(raw: &str) -> Option<MuscleGroup> {
        GROUP_INDEX.get(&normalize_key(raw)).copied()
    }

    /// Fixed, ordered exercise names for this group
    pub fn exercises(self) -> &'static [&'static str] {
        match self {
            MuscleGroup::Pecho => &[
                "Press banca",
                "Press inclinado con mancuernas",
                "Aperturas con mancuernas",
                "Fondos en paralelas",
                "Cruce de poleas",
                "Flexiones",
            ],
            MuscleGroup::Espalda => &[
                "Dominadas",
                "Remo con barra",
                "Jalón al pecho",
                "Remo con mancuerna",
                "Peso muerto",
                "Remo en polea baja",
            ],
            MuscleGroup::Hombros => &[
                "Press militar",
                "Elevaciones laterales",
                "Elevaciones frontales",
                "Pájaros",
                "Face pull",
                "Press Arnold",
            ],
            MuscleGroup::Biceps => &[
                "Curl con barra",
                "Curl con mancuernas",
                "Curl martillo",
                "Curl predicador",
                "Curl concentrado",
            ],
            MuscleGroup::Triceps => &[
                "Press francés",
                "Extensión en polea",
                "Fondos entre bancos",
                "Patada de tríceps",
                "Press cerrado",
            ],
            MuscleGroup::Piernas => &[
                "Sentadilla",
                "Prensa",
                "Zancadas",
                "Peso muerto rumano",
                "Extensión de cuádriceps",
                "Curl femoral",
                "Elevación de talones",
            ],
            MuscleGroup::Abdominales => &[
                "Crunch",
                "Plancha",
                "Elevación de piernas",
                "Rueda abdominal",
                "Russian twist",
            ],
        }
    }
}

impl fmt::Display for MuscleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Exercises for a raw group label; empty when the label is unknown
pub fn exercises_for(raw_group: &str) -> &'static [&'static str] {
    MuscleGroup::parse(raw_group)
        .map(MuscleGroup::exercises)
        .unwrap_or(&[])
}

/// The group a catalog exercise belongs to, matched exactly by name
pub fn find_group(exercise_name: &str) -> Option<MuscleGroup> {
    MuscleGroup::ALL
        .into_iter()
        .find(|group| group.exercises().contains(&exercise_name))
}

/// Validate the catalog for consistency
///
/// Returns a list of validation errors, or empty Vec if valid.
pub fn validate() -> Vec<String> {
    let mut errors = Vec::new();

    for group in MuscleGroup::ALL {
        let exercises = group.exercises();
        if exercises.is_empty() {
            errors.push(format!("Muscle group '{}' has no exercises", group));
        }

        let mut seen = HashSet::new();
        for name in exercises {
            if name.trim().is_empty() {
                errors.push(format!("Muscle group '{}' has an empty exercise name", group));
            }
            if !seen.insert(*name) {
                errors.push(format!(
                    "Muscle group '{}' lists '{}' more than once",
                    group, name
                ));
            }
        }

        if MuscleGroup::parse(group.label()) != Some(group) {
            errors.push(format!("Muscle group '{}' does not resolve by its label", group));
        }
    }

    errors
}
