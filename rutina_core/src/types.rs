//! Core domain types for the Rutina system.
//!
//! This module defines the fundamental types used throughout the system:
//! - Weekdays and the canonical day order
//! - Exercises and routines
//! - Body-weight observations
//! - The opaque ownership key threaded through every store call

use crate::{Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Label normalization
// ============================================================================

/// Normalize a user-facing label for lookup.
///
/// Trims, lowercases and folds Spanish accents, so `"Bíceps"`, `"biceps"`
/// and `" BICEPS "` all map to `"biceps"`. Every label lookup in the crate
/// (weekdays, muscle groups) goes through this function.
pub fn normalize_key(raw: &str) -> String {
    raw.trim()
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'ä' | 'â' => 'a',
            'é' | 'è' | 'ë' | 'ê' => 'e',
            'í' | 'ì' | 'ï' | 'î' => 'i',
            'ó' | 'ò' | 'ö' | 'ô' => 'o',
            'ú' | 'ù' | 'ü' | 'û' => 'u',
            other => other,
        })
        .collect()
}

// ============================================================================
// Weekday
// ============================================================================

/// Day of the week an exercise is scheduled on
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Weekday {
    Lunes,
    Martes,
    #[serde(rename = "Miércoles")]
    Miercoles,
    Jueves,
    Viernes,
    #[serde(rename = "Sábado")]
    Sabado,
    Domingo,
}

impl Weekday {
    /// Canonical day order, Monday first.
    pub const ALL: [Weekday; 7] = [
        Weekday::Lunes,
        Weekday::Martes,
        Weekday::Miercoles,
        Weekday::Jueves,
        Weekday::Viernes,
        Weekday::Sabado,
        Weekday::Domingo,
    ];

    /// Localized display label, also the value stored in `Exercise::day`
    pub fn label(self) -> &'static str {
        match self {
            Weekday::Lunes => "Lunes",
            Weekday::Martes => "Martes",
            Weekday::Miercoles => "Miércoles",
            Weekday::Jueves => "Jueves",
            Weekday::Viernes => "Viernes",
            Weekday::Sabado => "Sábado",
            Weekday::Domingo => "Domingo",
        }
    }

    /// Parse a weekday label, ignoring case and accents
    pub fn parse(raw: &str) -> Option<Weekday> {
        let key = normalize_key(raw);
        Weekday::ALL
            .into_iter()
            .find(|day| normalize_key(day.label()) == key)
    }

    /// Position in the canonical order (Lunes = 0)
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        Weekday::ALL[day.num_days_from_monday() as usize]
    }
}

// ============================================================================
// Routine Types
// ============================================================================

/// One planned set scheme for one movement on one day
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Exercise {
    pub name: String,
    pub sets: u32,
    pub reps: u32,
    /// Load in kilograms
    pub weight: f64,
    /// Weekday label. Kept as text so rows with an unknown label survive a
    /// round trip through storage and still group under their literal value.
    pub day: String,
}

impl Exercise {
    pub fn new(name: impl Into<String>, day: Weekday, sets: u32, reps: u32, weight: f64) -> Self {
        Self {
            name: name.into(),
            sets,
            reps,
            weight,
            day: day.label().to_string(),
        }
    }

    /// The scheduled weekday, or None if the stored label is not one of the seven
    pub fn weekday(&self) -> Option<Weekday> {
        Weekday::parse(&self.day)
    }

    /// `"<sets> series × <reps> reps - <weight>kg"`
    pub fn scheme(&self) -> String {
        format!(
            "{} series × {} reps - {}kg",
            self.sets,
            self.reps,
            format_weight(self.weight)
        )
    }

    /// One export line: `"<name> - <sets> series × <reps> reps - <weight>kg"`
    pub fn summary_line(&self) -> String {
        format!("{} - {}", self.name, self.scheme())
    }
}

/// A named, described collection of exercises owned by one user
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Routine {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
    pub created_at: DateTime<Utc>,
}

/// Validated routine payload used for both create and full update
#[derive(Clone, Debug, PartialEq)]
pub struct NewRoutine {
    pub name: String,
    pub description: String,
    pub exercises: Vec<Exercise>,
}

// ============================================================================
// Weight Log Types
// ============================================================================

/// One body-weight observation
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WeightLog {
    pub id: Uuid,
    pub user_id: UserId,
    pub date: NaiveDate,
    /// Body weight in kilograms
    pub weight: f64,
}

/// Validated weight observation ready to be stored
#[derive(Clone, Debug, PartialEq)]
pub struct NewWeightLog {
    pub date: NaiveDate,
    pub weight: f64,
}

// ============================================================================
// Ownership
// ============================================================================

/// Opaque ownership key supplied by whoever authenticated the user
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Build a key from raw input; blank input is rejected
    pub fn new(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(Error::Identity("user id must not be empty".into()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Render a load without a trailing `.0` (`60`, `62.5`)
pub fn format_weight(weight: f64) -> String {
    format!("{}", weight)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekday_parse_ignores_case_and_accents() {
        assert_eq!(Weekday::parse("Miércoles"), Some(Weekday::Miercoles));
        assert_eq!(Weekday::parse("miercoles"), Some(Weekday::Miercoles));
        assert_eq!(Weekday::parse("  SABADO "), Some(Weekday::Sabado));
        assert_eq!(Weekday::parse("Monday"), None);
        assert_eq!(Weekday::parse(""), None);
    }

    #[test]
    fn test_weekday_order_and_labels() {
        let labels: Vec<_> = Weekday::ALL.iter().map(|d| d.label()).collect();
        assert_eq!(
            labels,
            vec!["Lunes", "Martes", "Miércoles", "Jueves", "Viernes", "Sábado", "Domingo"]
        );
        for (i, day) in Weekday::ALL.iter().enumerate() {
            assert_eq!(day.index(), i);
        }
    }

    #[test]
    fn test_weekday_from_chrono() {
        assert_eq!(Weekday::from(chrono::Weekday::Mon), Weekday::Lunes);
        assert_eq!(Weekday::from(chrono::Weekday::Sun), Weekday::Domingo);
    }

    #[test]
    fn test_weekday_serializes_as_label() {
        let json = serde_json::to_string(&Weekday::Sabado).unwrap();
        assert_eq!(json, "\"Sábado\"");
    }

    #[test]
    fn test_summary_line_format() {
        let exercise = Exercise::new("Press banca", Weekday::Lunes, 4, 10, 60.0);
        assert_eq!(exercise.summary_line(), "Press banca - 4 series × 10 reps - 60kg");

        let exercise = Exercise::new("Sentadilla", Weekday::Martes, 5, 5, 62.5);
        assert_eq!(exercise.summary_line(), "Sentadilla - 5 series × 5 reps - 62.5kg");
    }

    #[test]
    fn test_exercise_with_unknown_day() {
        let exercise = Exercise {
            name: "Remo".into(),
            sets: 3,
            reps: 12,
            weight: 40.0,
            day: "Feriado".into(),
        };
        assert_eq!(exercise.weekday(), None);
    }

    #[test]
    fn test_user_id_rejects_blank() {
        assert!(UserId::new("   ").is_err());
        assert_eq!(UserId::new(" ana ").unwrap().as_str(), "ana");
    }

    #[test]
    fn test_routine_missing_optional_fields_deserialize() {
        let json = r#"{
            "id": "5f0c6d5e-8d1c-4b8e-9a55-0b6f3f8f6c11",
            "name": "Fuerza",
            "created_at": "2024-03-05T10:00:00Z"
        }"#;
        let routine: Routine = serde_json::from_str(json).unwrap();
        assert!(routine.description.is_empty());
        assert!(routine.exercises.is_empty());
    }
}
