//! Editable drafts for exercises, routines and weight logs.
//!
//! Input arrives as raw text (CLI arguments, form fields). A draft collects
//! it and `commit` validates everything at once, producing an immutable
//! record or a `Validation` error with a user-facing message.

use crate::catalog::MuscleGroup;
use crate::types::{Exercise, NewRoutine, NewWeightLog, Routine, Weekday};
use crate::{Error, Result};
use chrono::NaiveDate;

const MISSING_EXERCISE_FIELDS: &str = "Por favor completa todos los campos del ejercicio";
const MISSING_ROUTINE_FIELDS: &str = "Por favor completa todos los campos requeridos";
const MISSING_WEIGHT_FIELDS: &str = "Por favor ingresa el peso y la fecha";

/// Raw exercise fields waiting to be committed
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExerciseDraft {
    pub name: Option<String>,
    pub day: Option<String>,
    pub sets: Option<String>,
    pub reps: Option<String>,
    pub weight: Option<String>,
}

impl ExerciseDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preselect the `index`-th (0-based) catalog exercise of `group`
    pub fn from_catalog(group: MuscleGroup, index: usize) -> Result<Self> {
        let name = group.exercises().get(index).ok_or_else(|| {
            Error::Validation(format!(
                "{} has {} exercises, no entry {}",
                group,
                group.exercises().len(),
                index + 1
            ))
        })?;
        Ok(Self::new().name(*name))
    }

    pub fn name(mut self, value: impl Into<String>) -> Self {
        self.name = Some(value.into());
        self
    }

    pub fn day(mut self, value: impl Into<String>) -> Self {
        self.day = Some(value.into());
        self
    }

    pub fn sets(mut self, value: impl Into<String>) -> Self {
        self.sets = Some(value.into());
        self
    }

    pub fn reps(mut self, value: impl Into<String>) -> Self {
        self.reps = Some(value.into());
        self
    }

    pub fn weight(mut self, value: impl Into<String>) -> Self {
        self.weight = Some(value.into());
        self
    }

    /// Validate every field and build the exercise
    pub fn commit(&self) -> Result<Exercise> {
        let (Some(name), Some(day), Some(sets), Some(reps), Some(weight)) = (
            filled(&self.name),
            filled(&self.day),
            filled(&self.sets),
            filled(&self.reps),
            filled(&self.weight),
        ) else {
            return Err(Error::Validation(MISSING_EXERCISE_FIELDS.into()));
        };

        let day = Weekday::parse(day)
            .ok_or_else(|| Error::Validation(format!("Día inválido: {}", day)))?;
        let sets = parse_positive("series", sets)?;
        let reps = parse_positive("repeticiones", reps)?;
        let weight = parse_non_negative("peso", weight)?;

        Ok(Exercise::new(name, day, sets, reps, weight))
    }
}

/// A routine being created or edited
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RoutineDraft {
    pub name: String,
    pub description: String,
    exercises: Vec<Exercise>,
}

impl RoutineDraft {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            exercises: Vec::new(),
        }
    }

    /// Start editing an existing routine
    pub fn from_routine(routine: &Routine) -> Self {
        Self {
            name: routine.name.clone(),
            description: routine.description.clone(),
            exercises: routine.exercises.clone(),
        }
    }

    pub fn exercises(&self) -> &[Exercise] {
        &self.exercises
    }

    /// Commit the exercise draft and append it
    pub fn add_exercise(&mut self, draft: &ExerciseDraft) -> Result<&Exercise> {
        let exercise = draft.commit()?;
        self.exercises.push(exercise);
        Ok(&self.exercises[self.exercises.len() - 1])
    }

    /// Remove the exercise at `index` (0-based, creation order)
    pub fn remove_exercise(&mut self, index: usize) -> Result<Exercise> {
        if index >= self.exercises.len() {
            return Err(Error::Validation(format!(
                "No existe el ejercicio {} (la rutina tiene {})",
                index + 1,
                self.exercises.len()
            )));
        }
        Ok(self.exercises.remove(index))
    }

    /// Validate and produce the payload for create or update
    pub fn commit(&self) -> Result<NewRoutine> {
        let name = self.name.trim();
        if name.is_empty() || self.exercises.is_empty() {
            return Err(Error::Validation(MISSING_ROUTINE_FIELDS.into()));
        }

        Ok(NewRoutine {
            name: name.to_string(),
            description: self.description.trim().to_string(),
            exercises: self.exercises.clone(),
        })
    }
}

/// Raw body-weight observation waiting to be committed
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WeightLogDraft {
    pub weight: Option<String>,
    pub date: Option<NaiveDate>,
}

impl WeightLogDraft {
    pub fn new(weight: Option<String>, date: Option<NaiveDate>) -> Self {
        Self { weight, date }
    }

    /// Validate against `today`; observations from the future are rejected
    pub fn commit(&self, today: NaiveDate) -> Result<NewWeightLog> {
        let (Some(weight), Some(date)) = (filled(&self.weight), self.date) else {
            return Err(Error::Validation(MISSING_WEIGHT_FIELDS.into()));
        };

        let weight = parse_non_negative("peso", weight)?;
        if date > today {
            return Err(Error::Validation(format!(
                "La fecha {} es posterior a hoy",
                date
            )));
        }

        Ok(NewWeightLog { date, weight })
    }
}

fn filled(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn parse_positive(field: &str, raw: &str) -> Result<u32> {
    match raw.parse::<u32>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(Error::Validation(format!(
            "El campo {} debe ser un entero positivo: {}",
            field, raw
        ))),
    }
}

fn parse_non_negative(field: &str, raw: &str) -> Result<f64> {
    match raw.replace(',', ".").parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(Error::Validation(format!(
            "El campo {} debe ser un número no negativo: {}",
            field, raw
        ))),
    }
}
