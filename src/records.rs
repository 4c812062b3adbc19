//! Views derived on every load from stored workouts and diet entries. Nothing here is persisted.

use crate::models::{DietEntry, Exercise, Workout};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const STRENGTH_KEYWORDS: [&str; 6] = ["weight", "strength", "lift", "push", "pull", "leg"];

/// Titles that mark a workout as a lifting session.
pub fn is_strength_workout(title: &str) -> bool {
    let title = title.to_lowercase();
    STRENGTH_KEYWORDS.iter().any(|kw| title.contains(kw))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalRecord {
    pub name: String,
    pub weight: f64,
    pub sets: i64,
    pub reps: i64,
    pub date: DateTime<Utc>,
}

/// Heaviest exercise per name across `sessions`, in order of first appearance.
/// Exercises without weight are skipped; on ties the earlier one is kept.
pub fn personal_records(sessions: &[(Workout, Vec<Exercise>)]) -> Vec<PersonalRecord> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut records: Vec<PersonalRecord> = Vec::new();

    for (workout, exercises) in sessions {
        for ex in exercises.iter().filter(|ex| ex.weight > 0.0) {
            let candidate = PersonalRecord {
                name: ex.name.clone(),
                weight: ex.weight,
                sets: ex.sets,
                reps: ex.reps,
                date: workout.date,
            };
            match index.get(ex.name.as_str()) {
                Some(&i) => {
                    if ex.weight > records[i].weight {
                        records[i] = candidate;
                    }
                }
                None => {
                    index.insert(ex.name.as_str(), records.len());
                    records.push(candidate);
                }
            }
        }
    }

    records
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

impl MacroTotals {
    pub fn from_entries(entries: &[DietEntry]) -> Self {
        entries.iter().fold(Self::default(), |acc, e| Self {
            calories: acc.calories + e.calories,
            protein: acc.protein + e.protein,
            carbs: acc.carbs + e.carbs,
            fats: acc.fats + e.fats,
        })
    }
}

/// Daily targets. Held by the caller; never stored server side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroGoal {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

impl Default for MacroGoal {
    fn default() -> Self {
        Self {
            calories: 2000.0,
            protein: 150.0,
            carbs: 250.0,
            fats: 65.0,
        }
    }
}

/// `min(100, 100 * current / goal)`; a non-positive goal reads as 0%.
pub fn progress(current: f64, goal: f64) -> f64 {
    if goal <= 0.0 {
        return 0.0;
    }
    (current / goal * 100.0).min(100.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroProgress {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

impl MacroProgress {
    pub fn compute(totals: &MacroTotals, goal: &MacroGoal) -> Self {
        Self {
            calories: progress(totals.calories, goal.calories),
            protein: progress(totals.protein, goal.protein),
            carbs: progress(totals.carbs, goal.carbs),
            fats: progress(totals.fats, goal.fats),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailySummary {
    pub totals: MacroTotals,
    pub goal: MacroGoal,
    pub progress: MacroProgress,
    pub entries: Vec<DietEntry>,
}

impl DailySummary {
    pub fn new(entries: Vec<DietEntry>, goal: MacroGoal) -> Self {
        let totals = MacroTotals::from_entries(&entries);
        Self {
            progress: MacroProgress::compute(&totals, &goal),
            totals,
            goal,
            entries,
        }
    }
}
