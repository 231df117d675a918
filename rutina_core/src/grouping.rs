//! Partitioning a routine's exercises by weekday.
//!
//! Groups keep the order in which each day first appears in the input, and
//! each group keeps the input order of its exercises. Callers that want the
//! calendar order ask for it explicitly with [`DayOrder::Canonical`].

use crate::types::{Exercise, Weekday};
use serde::{Deserialize, Serialize};

/// Order in which day groups are presented
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DayOrder {
    /// Lunes through Domingo, then unrecognized labels by first appearance
    #[default]
    Canonical,
    /// Order in which each day first appears among the exercises
    Appearance,
}

impl DayOrder {
    /// Parse a CLI/config value (`canonical`, `appearance`)
    pub fn parse(raw: &str) -> Option<DayOrder> {
        match raw.trim().to_lowercase().as_str() {
            "canonical" | "week" => Some(DayOrder::Canonical),
            "appearance" | "first_appearance" | "first-appearance" => Some(DayOrder::Appearance),
            _ => None,
        }
    }
}

/// Exercises grouped under their day label
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DayGroups<'a> {
    groups: Vec<(&'a str, Vec<&'a Exercise>)>,
}

/// Group exercises by their `day` label.
///
/// Days without exercises are absent from the result. Labels outside the
/// seven weekdays are not validated; each becomes its own group.
pub fn group_by_day(exercises: &[Exercise]) -> DayGroups<'_> {
    let mut groups: Vec<(&str, Vec<&Exercise>)> = Vec::new();

    for exercise in exercises {
        match groups.iter_mut().find(|(day, _)| *day == exercise.day) {
            Some((_, members)) => members.push(exercise),
            None => groups.push((exercise.day.as_str(), vec![exercise])),
        }
    }

    DayGroups { groups }
}

impl<'a> DayGroups<'a> {
    /// Exercises scheduled under `day`, or None when that day has none
    pub fn get(&self, day: &str) -> Option<&[&'a Exercise]> {
        self.groups
            .iter()
            .find(|(label, _)| *label == day)
            .map(|(_, members)| members.as_slice())
    }

    /// Exercises scheduled on a canonical weekday
    pub fn for_weekday(&self, day: Weekday) -> Option<&[&'a Exercise]> {
        self.get(day.label())
    }

    /// Number of distinct days
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Groups in first-appearance order
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &[&'a Exercise])> + '_ {
        self.groups
            .iter()
            .map(|(day, members)| (*day, members.as_slice()))
    }

    /// Groups in the requested order
    pub fn ordered(&self, order: DayOrder) -> Vec<(&'a str, &[&'a Exercise])> {
        let mut groups: Vec<_> = self.iter().collect();
        if order == DayOrder::Canonical {
            // Stable sort: unknown labels keep their relative first-appearance order.
            groups.sort_by_key(|(day, _)| {
                Weekday::parse(day)
                    .filter(|weekday| weekday.label() == *day)
                    .map_or(Weekday::ALL.len(), Weekday::index)
            });
        }
        groups
    }
}
