//! Session controller: owns the dataset and turns user commands into updates
//!
//! Every accepted command updates exactly one entry, then saves the whole
//! dataset. Derived values are never cached; [`SessionController::insights`]
//! recomputes them from the current snapshot.

use chrono::NaiveDate;
use serde::Serialize;

use crate::alerts::{Alert, AlertEngine};
use crate::dates::Clock;
use crate::error::TrackerError;
use crate::metrics::{
    fat_mass, lean_mass, DailyTarget, GoalSummary, MetricsEngine, VolumeComparison,
};
use crate::models::{Dataset, ExerciseLog, NutritionEntry, SleepEntry, WorkoutSession};
use crate::profile::Profile;
use crate::recovery::{RecoveryScore, RecoveryScorer};
use crate::store::DataStore;

/// Result of a log command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogOutcome {
    /// Entry written and a save attempted
    Recorded,
    /// Input refused; the dataset is unchanged
    Rejected(String),
}

impl LogOutcome {
    pub fn is_recorded(&self) -> bool {
        matches!(self, LogOutcome::Recorded)
    }
}

/// Everything the presentation layer shows for one day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insights {
    pub date: NaiveDate,
    pub current_weight: f64,
    pub week_average_weight: f64,
    pub body_fat_pct: f64,
    pub lean_mass: f64,
    pub fat_mass: f64,
    pub today_nutrition: NutritionEntry,
    pub today_steps: u32,
    pub today_sleep: Option<SleepEntry>,
    pub protein: DailyTarget,
    pub steps: DailyTarget,
    pub week_calorie_average: Option<u32>,
    pub goals: Vec<GoalSummary>,
    pub recovery: Option<RecoveryScore>,
    pub alerts: Vec<Alert>,
}

/// Owner of the dataset for the lifetime of a session
pub struct SessionController<S: DataStore, C: Clock> {
    store: S,
    clock: C,
    profile: Profile,
    dataset: Dataset,
}

impl<S: DataStore, C: Clock> SessionController<S, C> {
    /// Load the dataset from `store`, falling back to an empty one
    pub fn open(store: S, clock: C, profile: Profile) -> Self {
        let dataset = match store.load() {
            Ok(Some(dataset)) => {
                tracing::info!(
                    weights = dataset.weights.len(),
                    workouts = dataset.workouts.len(),
                    "Dataset loaded"
                );
                dataset
            }
            Ok(None) => {
                tracing::info!("No saved dataset, starting empty");
                Dataset::default()
            }
            Err(e) => {
                TrackerError::from(e).log("Failed to load dataset, starting empty");
                Dataset::default()
            }
        };

        SessionController {
            store,
            clock,
            profile,
            dataset,
        }
    }

    /// Read-only snapshot of the current dataset
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn log_weight(&mut self, kg: f64) -> LogOutcome {
        self.log_weight_on(self.today(), kg)
    }

    pub fn log_weight_on(&mut self, date: NaiveDate, kg: f64) -> LogOutcome {
        if !(kg.is_finite() && kg > 0.0) {
            return self.reject(format!("weight must be a positive number, got {}", kg));
        }
        self.dataset.upsert_weight(date, kg);
        self.commit("weight", date)
    }

    pub fn log_nutrition(&mut self, calories: u32, protein: u32) -> LogOutcome {
        self.log_nutrition_on(self.today(), calories, protein)
    }

    pub fn log_nutrition_on(&mut self, date: NaiveDate, calories: u32, protein: u32) -> LogOutcome {
        self.dataset
            .upsert_nutrition(date, NutritionEntry { calories, protein });
        self.commit("nutrition", date)
    }

    pub fn log_sleep(&mut self, hours: f64, energy: u8) -> LogOutcome {
        self.log_sleep_on(self.today(), hours, energy)
    }

    pub fn log_sleep_on(&mut self, date: NaiveDate, hours: f64, energy: u8) -> LogOutcome {
        if !(hours.is_finite() && hours >= 0.0) {
            return self.reject(format!("sleep hours must not be negative, got {}", hours));
        }
        if !(1..=5).contains(&energy) {
            return self.reject(format!("energy must be between 1 and 5, got {}", energy));
        }
        self.dataset.upsert_sleep(date, SleepEntry { hours, energy });
        self.commit("sleep", date)
    }

    pub fn log_steps(&mut self, steps: u32) -> LogOutcome {
        self.log_steps_on(self.today(), steps)
    }

    pub fn log_steps_on(&mut self, date: NaiveDate, steps: u32) -> LogOutcome {
        self.dataset.upsert_steps(date, steps);
        self.commit("steps", date)
    }

    /// Append a finished session dated today
    pub fn save_workout(&mut self, name: &str, exercises: Vec<ExerciseLog>) -> LogOutcome {
        self.save_workout_on(self.today(), name, exercises)
    }

    pub fn save_workout_on(
        &mut self,
        date: NaiveDate,
        name: &str,
        exercises: Vec<ExerciseLog>,
    ) -> LogOutcome {
        let name = routine_key(name);
        if name.is_empty() {
            return self.reject("workout name must not be empty".to_string());
        }
        let bad_set = exercises
            .iter()
            .flat_map(|e| e.sets.iter())
            .any(|s| !(s.weight.is_finite() && s.weight >= 0.0));
        if bad_set {
            return self.reject("set weights must not be negative".to_string());
        }

        self.dataset.append_workout(WorkoutSession {
            date,
            name: name.to_string(),
            exercises,
        });
        self.commit("workout", date)
    }

    /// Compare each exercise with the latest saved session of the same routine
    ///
    /// The routine name is normalised the same way [`Self::save_workout_on`]
    /// stores it, so call this before saving.
    pub fn compare_workout(
        &self,
        name: &str,
        exercises: &[ExerciseLog],
    ) -> Vec<VolumeComparison> {
        let metrics = MetricsEngine::new(&self.profile);
        let name = routine_key(name);
        exercises
            .iter()
            .map(|e| metrics.compare_to_previous(&self.dataset, name, &e.name, &e.sets))
            .collect()
    }

    /// Drop every log, in the store and in memory
    pub fn reset_all(&mut self) {
        if let Err(e) = self.store.clear() {
            TrackerError::from(e).log("Failed to clear stored dataset");
        }
        self.dataset = Dataset::default();
        tracing::info!("All data cleared");
    }

    /// Recompute every derived value for today
    pub fn insights(&self) -> Insights {
        let today = self.today();
        let metrics = MetricsEngine::new(&self.profile);

        let current_weight = metrics.current_weight(&self.dataset);
        let body_fat_pct = metrics.body_fat_percent(current_weight);
        let today_nutrition = self
            .dataset
            .nutrition
            .get(&today)
            .copied()
            .unwrap_or_default();
        let today_steps = self.dataset.steps.get(&today).copied().unwrap_or(0);
        let week_calorie_average = metrics.week_calorie_average(&self.dataset, today);

        Insights {
            date: today,
            current_weight,
            week_average_weight: metrics.week_average_weight(&self.dataset, today),
            body_fat_pct,
            lean_mass: lean_mass(current_weight, body_fat_pct),
            fat_mass: fat_mass(current_weight, body_fat_pct),
            today_nutrition,
            today_steps,
            today_sleep: self.dataset.sleep.get(&today).copied(),
            protein: metrics.protein_progress(&today_nutrition),
            steps: metrics.steps_progress(today_steps),
            week_calorie_average,
            goals: metrics.goal_summaries(&self.dataset, today),
            recovery: RecoveryScorer::new(&self.profile).score(today, &self.dataset),
            alerts: AlertEngine::new(&self.profile).evaluate(
                &self.dataset,
                today,
                week_calorie_average,
            ),
        }
    }

    fn reject(&self, reason: String) -> LogOutcome {
        tracing::debug!(%reason, "Log rejected");
        LogOutcome::Rejected(reason)
    }

    /// Persist after a mutation; failures leave the in-memory dataset in charge
    fn commit(&mut self, field: &str, date: NaiveDate) -> LogOutcome {
        tracing::info!(field, %date, "Entry recorded");
        if let Err(e) = self.store.save(&self.dataset) {
            TrackerError::from(e).log("Failed to save dataset, continuing in memory");
        }
        LogOutcome::Recorded
    }
}

/// Stored form of a routine name
fn routine_key(name: &str) -> &str {
    name.trim()
}
