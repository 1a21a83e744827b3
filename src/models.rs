use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Calories and protein logged for one day
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutritionEntry {
    /// Energy intake in kcal
    pub calories: u32,

    /// Protein intake in grams
    pub protein: u32,
}

/// Sleep duration and subjective energy for one night
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SleepEntry {
    /// Hours slept
    pub hours: f64,

    /// Morning energy rating, 1 (drained) to 5 (fresh)
    pub energy: u8,
}

/// One working set of an exercise
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SetLog {
    /// Load in kilograms
    pub weight: f64,

    /// Completed repetitions
    pub reps: u32,
}

impl SetLog {
    pub fn new(weight: f64, reps: u32) -> Self {
        SetLog { weight, reps }
    }
}

/// All sets of one exercise within a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseLog {
    pub name: String,
    pub sets: Vec<SetLog>,
}

/// A completed resistance-training session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSession {
    /// Day the session was performed
    pub date: NaiveDate,

    /// Routine name, e.g. "A – Push"
    pub name: String,

    /// Exercises in the order they were performed
    pub exercises: Vec<ExerciseLog>,
}

impl WorkoutSession {
    /// Find an exercise by name
    pub fn exercise(&self, name: &str) -> Option<&ExerciseLog> {
        self.exercises.iter().find(|e| e.name == name)
    }
}

/// The full set of dated logs
///
/// This is the persisted shape: five top-level fields, dates as `YYYY-MM-DD`.
/// Missing top-level fields deserialize to empty collections so older payloads
/// keep loading; nested records are not merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dataset {
    /// Body weight in kilograms by day
    pub weights: BTreeMap<NaiveDate, f64>,

    /// Training sessions in the order they were logged
    pub workouts: Vec<WorkoutSession>,

    /// Nutrition by day
    pub nutrition: BTreeMap<NaiveDate, NutritionEntry>,

    /// Sleep by day (keyed by the morning the user woke up)
    pub sleep: BTreeMap<NaiveDate, SleepEntry>,

    /// Step count by day
    pub steps: BTreeMap<NaiveDate, u32>,
}

impl Dataset {
    /// True when nothing has been logged
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
            && self.workouts.is_empty()
            && self.nutrition.is_empty()
            && self.sleep.is_empty()
            && self.steps.is_empty()
    }

    /// Insert or overwrite the weight for a day
    pub fn upsert_weight(&mut self, date: NaiveDate, kg: f64) {
        self.weights.insert(date, kg);
    }

    /// Insert or overwrite the nutrition entry for a day
    pub fn upsert_nutrition(&mut self, date: NaiveDate, entry: NutritionEntry) {
        self.nutrition.insert(date, entry);
    }

    /// Insert or overwrite the sleep entry for a day
    pub fn upsert_sleep(&mut self, date: NaiveDate, entry: SleepEntry) {
        self.sleep.insert(date, entry);
    }

    /// Insert or overwrite the step count for a day
    pub fn upsert_steps(&mut self, date: NaiveDate, steps: u32) {
        self.steps.insert(date, steps);
    }

    /// Append a session; sessions are never merged
    pub fn append_workout(&mut self, session: WorkoutSession) {
        self.workouts.push(session);
    }

    /// Whether any session was logged on `date`
    pub fn trained_on(&self, date: NaiveDate) -> bool {
        self.workouts.iter().any(|w| w.date == date)
    }

    /// Sessions of one routine, in append order
    pub fn sessions_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a WorkoutSession> {
        self.workouts.iter().filter(move |w| w.name == name)
    }

    /// Distinct routine names in order of first appearance
    pub fn routine_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for session in &self.workouts {
            if !names.contains(&session.name.as_str()) {
                names.push(&session.name);
            }
        }
        names
    }
}
