//! Body-composition and trend metrics
//!
//! Everything here is a pure function of a `Dataset` snapshot, the `Profile`
//! and, where a trailing window applies, an explicit `today`.
//!
//! # Body composition
//!
//! Lean mass is held constant for the duration of a cut, so body fat is
//! estimated from scale weight alone:
//!
//! ```text
//! BF% = (1 - lean_mass / weight) × 100
//! ```
//!
//! Goal projections assume a fixed weekly fat-loss rate from the profile.

use chrono::NaiveDate;
use serde::Serialize;

use crate::dates::{days_after, format_day_month, last_n_days};
use crate::models::{Dataset, NutritionEntry, SetLog, WorkoutSession};
use crate::profile::Profile;

/// Trailing window used for weekly averages (days)
pub const WEEK_DAYS: u32 = 7;

/// Default window for the weight chart (days)
pub const WEIGHT_HISTORY_DAYS: u32 = 30;

/// Default window for the sleep chart (days)
pub const SLEEP_HISTORY_DAYS: u32 = 14;

/// Total load of a set sequence: Σ weight × reps
pub fn exercise_volume(sets: &[SetLog]) -> f64 {
    sets.iter().map(|s| s.weight * s.reps as f64).sum()
}

/// Total load of every exercise in a session
pub fn session_volume(session: &WorkoutSession) -> f64 {
    session
        .exercises
        .iter()
        .map(|e| exercise_volume(&e.sets))
        .sum()
}

/// Arithmetic mean, zero for an empty slice
///
/// Zero is not "no data"; callers that need to tell the two apart must check
/// for emptiness first.
pub fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Lean mass for a weight at a given body-fat percentage
pub fn lean_mass(weight: f64, body_fat_pct: f64) -> f64 {
    weight * (1.0 - body_fat_pct / 100.0)
}

/// Fat mass for a weight at a given body-fat percentage
pub fn fat_mass(weight: f64, body_fat_pct: f64) -> f64 {
    weight * (body_fat_pct / 100.0)
}

/// Estimated time to reach a target weight
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GoalProjection {
    /// Whole weeks remaining, rounded up
    pub weeks: u32,

    /// Projected arrival date, `None` once the target is reached
    pub target_date: Option<NaiveDate>,

    /// Current weight is at or below the target
    pub reached: bool,
}

impl GoalProjection {
    /// Day/month label, or "Reached!" once the goal is met
    pub fn display_date(&self) -> String {
        match self.target_date {
            Some(date) if !self.reached => format_day_month(date),
            _ => "Reached!".to_string(),
        }
    }
}

/// Progress and projection for one body-fat target
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalSummary {
    pub label: &'static str,
    pub target_weight: f64,
    pub progress_pct: f64,
    pub projection: GoalProjection,
    /// Kilograms still to lose, never negative
    pub remaining_kg: f64,
}

/// A logged weight on the chart
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeightPoint {
    pub date: NaiveDate,
    pub kg: f64,
}

/// A logged night on the chart
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SleepPoint {
    pub date: NaiveDate,
    pub hours: f64,
    pub energy: u8,
}

/// Volume of one lift in one session
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StrengthPoint {
    pub date: NaiveDate,
    pub volume: f64,
}

/// Volume history of one tracked lift
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiftTrend {
    pub lift: String,
    pub points: Vec<StrengthPoint>,
}

/// Current exercise volume against the last session of the same routine
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VolumeComparison {
    pub previous_volume: Option<f64>,
    pub current_volume: f64,
    /// Percentage change, `None` when either side is missing or zero
    pub change_pct: Option<f64>,
    /// Change is worse than the profile's strength drop threshold
    pub strength_drop: bool,
}

/// Progress toward a daily target
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyTarget {
    pub value: u32,
    pub goal: u32,
    pub percent: f64,
    pub reached: bool,
}

impl DailyTarget {
    fn new(value: u32, goal: u32) -> Self {
        let percent = if goal == 0 {
            100.0
        } else {
            value as f64 / goal as f64 * 100.0
        };
        DailyTarget {
            value,
            goal,
            percent,
            reached: value >= goal,
        }
    }
}

/// Metrics engine bound to a profile
pub struct MetricsEngine<'a> {
    profile: &'a Profile,
}

impl<'a> MetricsEngine<'a> {
    pub fn new(profile: &'a Profile) -> Self {
        MetricsEngine { profile }
    }

    /// Latest-dated positive weight, or the profile start weight when none is logged
    pub fn current_weight(&self, dataset: &Dataset) -> f64 {
        dataset
            .weights
            .values()
            .rev()
            .copied()
            .find(|w| *w > 0.0)
            .unwrap_or(self.profile.start_weight)
    }

    /// Mean logged weight over the trailing week, today inclusive
    ///
    /// Days without an entry are skipped. With no entries in the window this
    /// is the current weight.
    pub fn week_average_weight(&self, dataset: &Dataset, today: NaiveDate) -> f64 {
        let values: Vec<f64> = last_n_days(today, WEEK_DAYS)
            .iter()
            .filter_map(|d| dataset.weights.get(d).copied())
            .filter(|w| *w > 0.0)
            .collect();

        if values.is_empty() {
            self.current_weight(dataset)
        } else {
            average(&values)
        }
    }

    /// Estimated body fat; not finite for a zero weight
    pub fn body_fat_percent(&self, weight: f64) -> f64 {
        (1.0 - self.profile.lean_mass / weight) * 100.0
    }

    /// Linear progress from the start weight (0%) to `target` (100%), clamped
    pub fn goal_progress_percent(&self, current_weight: f64, target_weight: f64) -> f64 {
        let total_to_lose = self.profile.start_weight - target_weight;
        if total_to_lose <= 0.0 {
            return 100.0;
        }
        let lost_so_far = self.profile.start_weight - current_weight;
        (lost_so_far / total_to_lose * 100.0).clamp(0.0, 100.0)
    }

    /// Weeks and calendar date at which `target_weight` is reached
    pub fn goal_projection(
        &self,
        current_weight: f64,
        target_weight: f64,
        today: NaiveDate,
    ) -> GoalProjection {
        let remaining = current_weight - target_weight;
        if remaining <= 0.0 {
            return GoalProjection {
                weeks: 0,
                target_date: None,
                reached: true,
            };
        }

        let weeks = remaining / self.profile.weekly_loss_rate;
        let days = (weeks * 7.0).round() as u64;

        GoalProjection {
            weeks: weeks.ceil() as u32,
            target_date: Some(days_after(today, days)),
            reached: false,
        }
    }

    /// Mean calories over the trailing week, rounded to whole kcal
    ///
    /// Only days with a logged, non-zero calorie count are included. `None`
    /// means no such day exists, which is distinct from an average of zero.
    pub fn week_calorie_average(&self, dataset: &Dataset, today: NaiveDate) -> Option<u32> {
        let values: Vec<f64> = last_n_days(today, WEEK_DAYS)
            .iter()
            .filter_map(|d| dataset.nutrition.get(d))
            .filter(|n| n.calories > 0)
            .map(|n| n.calories as f64)
            .collect();

        if values.is_empty() {
            None
        } else {
            Some(average(&values).round() as u32)
        }
    }

    /// Progress, projection and remaining weight for each body-fat target
    pub fn goal_summaries(&self, dataset: &Dataset, today: NaiveDate) -> Vec<GoalSummary> {
        let current = self.current_weight(dataset);
        tracing::debug!(current_weight = current, "Computing goal summaries");

        self.profile
            .targets()
            .iter()
            .map(|target| GoalSummary {
                label: target.label,
                target_weight: target.weight,
                progress_pct: self.goal_progress_percent(current, target.weight),
                projection: self.goal_projection(current, target.weight, today),
                remaining_kg: (current - target.weight).max(0.0),
            })
            .collect()
    }

    /// Logged weights in the trailing window, oldest first
    pub fn weight_history(&self, dataset: &Dataset, today: NaiveDate, days: u32) -> Vec<WeightPoint> {
        last_n_days(today, days)
            .into_iter()
            .filter_map(|date| {
                dataset
                    .weights
                    .get(&date)
                    .map(|&kg| WeightPoint { date, kg })
            })
            .collect()
    }

    /// Logged nights in the trailing window, oldest first
    pub fn sleep_history(&self, dataset: &Dataset, today: NaiveDate, days: u32) -> Vec<SleepPoint> {
        last_n_days(today, days)
            .into_iter()
            .filter_map(|date| {
                dataset.sleep.get(&date).map(|s| SleepPoint {
                    date,
                    hours: s.hours,
                    energy: s.energy,
                })
            })
            .collect()
    }

    /// Per-lift volume history across every session containing the lift
    pub fn strength_trend(&self, dataset: &Dataset, lifts: &[&str]) -> Vec<LiftTrend> {
        lifts
            .iter()
            .map(|&lift| {
                let mut points: Vec<StrengthPoint> = dataset
                    .workouts
                    .iter()
                    .filter_map(|session| {
                        session.exercise(lift).map(|e| StrengthPoint {
                            date: session.date,
                            volume: exercise_volume(&e.sets),
                        })
                    })
                    .collect();
                points.sort_by_key(|p| p.date);
                LiftTrend {
                    lift: lift.to_string(),
                    points,
                }
            })
            .collect()
    }

    /// Compare the sets being performed now with the last session of `routine`
    pub fn compare_to_previous(
        &self,
        dataset: &Dataset,
        routine: &str,
        exercise: &str,
        current_sets: &[SetLog],
    ) -> VolumeComparison {
        let previous_volume = dataset
            .sessions_named(routine)
            .last()
            .and_then(|s| s.exercise(exercise))
            .map(|e| exercise_volume(&e.sets));
        let current_volume = exercise_volume(current_sets);

        let change_pct = match previous_volume {
            Some(prev) if prev > 0.0 && current_volume > 0.0 => {
                Some((current_volume - prev) / prev * 100.0)
            }
            _ => None,
        };
        let strength_drop = change_pct
            .map(|pct| pct < -self.profile.strength_drop_pct)
            .unwrap_or(false);

        VolumeComparison {
            previous_volume,
            current_volume,
            change_pct,
            strength_drop,
        }
    }

    /// Protein eaten against the daily protein goal
    pub fn protein_progress(&self, entry: &NutritionEntry) -> DailyTarget {
        DailyTarget::new(entry.protein, self.profile.protein_goal)
    }

    /// Steps walked against the daily step goal
    pub fn steps_progress(&self, steps: u32) -> DailyTarget {
        DailyTarget::new(steps, self.profile.steps_goal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExerciseLog;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn session(date: NaiveDate, name: &str, exercise: &str, sets: Vec<SetLog>) -> WorkoutSession {
        WorkoutSession {
            date,
            name: name.to_string(),
            exercises: vec![ExerciseLog {
                name: exercise.to_string(),
                sets,
            }],
        }
    }

    #[test]
    fn test_exercise_volume() {
        assert_eq!(exercise_volume(&[]), 0.0);
        let sets = [SetLog::new(10.0, 5), SetLog::new(20.0, 3)];
        assert_eq!(exercise_volume(&sets), 110.0);
    }

    #[test]
    fn test_average() {
        assert_eq!(average(&[]), 0.0);
        assert_eq!(average(&[2.0, 4.0, 6.0]), 4.0);
    }

    #[test]
    fn test_current_weight_falls_back_to_start() {
        let profile = Profile::default();
        let engine = MetricsEngine::new(&profile);
        let mut data = Dataset::default();
        assert_eq!(engine.current_weight(&data), 60.1);

        data.upsert_weight(day(10), 59.4);
        data.upsert_weight(day(2), 59.9);
        assert_eq!(engine.current_weight(&data), 59.4);
    }

    #[test]
    fn test_current_weight_skips_non_positive_entries() {
        let profile = Profile::default();
        let engine = MetricsEngine::new(&profile);
        let mut data = Dataset::default();
        data.upsert_weight(day(3), 0.0);
        assert_eq!(engine.current_weight(&data), 60.1);

        data.upsert_weight(day(1), 59.4);
        data.upsert_weight(day(2), -1.0);
        let current = engine.current_weight(&data);
        assert_eq!(current, 59.4);
        assert!(engine.body_fat_percent(current).is_finite());
    }

    #[test]
    fn test_week_average_skips_missing_days() {
        let profile = Profile::default();
        let engine = MetricsEngine::new(&profile);
        let mut data = Dataset::default();
        data.upsert_weight(day(1), 70.0); // outside the window
        data.upsert_weight(day(5), 59.0);
        data.upsert_weight(day(8), 59.6);

        assert!((engine.week_average_weight(&data, day(8)) - 59.3).abs() < 1e-9);
    }

    #[test]
    fn test_week_average_without_entries_uses_current_weight() {
        let profile = Profile::default();
        let engine = MetricsEngine::new(&profile);
        let mut data = Dataset::default();
        data.upsert_weight(day(1), 59.2);

        assert_eq!(engine.week_average_weight(&data, day(20)), 59.2);
    }

    #[test]
    fn test_body_composition() {
        let profile = Profile::default();
        let engine = MetricsEngine::new(&profile);
        let bf = engine.body_fat_percent(60.1);

        assert!((bf - (1.0 - 48.7 / 60.1) * 100.0).abs() < 1e-9);
        assert!((lean_mass(60.1, bf) - 48.7).abs() < 1e-9);
        assert!((fat_mass(60.1, bf) - 11.4).abs() < 1e-9);
        assert!(!engine.body_fat_percent(0.0).is_finite());
    }

    #[test]
    fn test_goal_progress_is_clamped() {
        let profile = Profile::default();
        let engine = MetricsEngine::new(&profile);

        assert_eq!(engine.goal_progress_percent(60.1, 57.3), 0.0);
        assert_eq!(engine.goal_progress_percent(61.0, 57.3), 0.0);
        assert_eq!(engine.goal_progress_percent(57.3, 57.3), 100.0);
        assert_eq!(engine.goal_progress_percent(56.0, 57.3), 100.0);
        assert!((engine.goal_progress_percent(58.7, 57.3) - 50.0).abs() < 1e-9);
        // Nothing to lose
        assert_eq!(engine.goal_progress_percent(60.0, 61.0), 100.0);
    }

    #[test]
    fn test_goal_projection() {
        let profile = Profile::default();
        let engine = MetricsEngine::new(&profile);

        let reached = engine.goal_projection(57.0, 57.3, day(1));
        assert!(reached.reached);
        assert_eq!(reached.weeks, 0);
        assert_eq!(reached.display_date(), "Reached!");

        // 1.0 kg at 0.35 kg/week = 2.857 weeks = 20 days
        let projection = engine.goal_projection(58.3, 57.3, day(1));
        assert!(!projection.reached);
        assert_eq!(projection.weeks, 3);
        assert_eq!(projection.target_date, Some(day(21)));
        assert_eq!(projection.display_date(), "21 Mar");
    }

    #[test]
    fn test_week_calorie_average() {
        let profile = Profile::default();
        let engine = MetricsEngine::new(&profile);
        let mut data = Dataset::default();
        assert_eq!(engine.week_calorie_average(&data, day(10)), None);

        data.upsert_nutrition(day(9), NutritionEntry { calories: 0, protein: 0 });
        assert_eq!(engine.week_calorie_average(&data, day(10)), None);

        data.upsert_nutrition(day(8), NutritionEntry { calories: 1700, protein: 120 });
        data.upsert_nutrition(day(10), NutritionEntry { calories: 1801, protein: 140 });
        assert_eq!(engine.week_calorie_average(&data, day(10)), Some(1751));
    }

    #[test]
    fn test_goal_summaries() {
        let profile = Profile::default();
        let engine = MetricsEngine::new(&profile);
        let mut data = Dataset::default();
        data.upsert_weight(day(1), 57.0);

        let goals = engine.goal_summaries(&data, day(1));
        assert_eq!(goals.len(), 3);
        assert_eq!(goals[0].label, "15%");
        assert!(goals[0].projection.reached);
        assert_eq!(goals[0].remaining_kg, 0.0);
        assert!((goals[2].remaining_kg - 1.0).abs() < 1e-9);
        assert!(!goals[2].projection.reached);
    }

    #[test]
    fn test_histories_are_chronological_and_windowed() {
        let profile = Profile::default();
        let engine = MetricsEngine::new(&profile);
        let mut data = Dataset::default();
        data.upsert_weight(day(3), 59.0);
        data.upsert_weight(day(1), 59.5);
        data.upsert_sleep(day(2), crate::models::SleepEntry { hours: 7.0, energy: 4 });

        let weights = engine.weight_history(&data, day(3), 2);
        assert_eq!(weights, vec![WeightPoint { date: day(3), kg: 59.0 }]);

        let sleep = engine.sleep_history(&data, day(3), SLEEP_HISTORY_DAYS);
        assert_eq!(sleep.len(), 1);
        assert_eq!(sleep[0].energy, 4);
    }

    #[test]
    fn test_strength_trend() {
        let profile = Profile::default();
        let engine = MetricsEngine::new(&profile);
        let mut data = Dataset::default();
        data.append_workout(session(day(4), "C – Legs", "Squat", vec![SetLog::new(60.0, 5)]));
        data.append_workout(session(day(1), "C – Legs", "Squat", vec![SetLog::new(50.0, 5)]));
        data.append_workout(session(day(2), "A – Push", "Flat DB Press", vec![SetLog::new(20.0, 8)]));

        let trend = engine.strength_trend(&data, &["Squat", "Deadlift / RDL"]);
        assert_eq!(trend[0].points.len(), 2);
        assert_eq!(trend[0].points[0].date, day(1));
        assert_eq!(trend[0].points[1].volume, 300.0);
        assert!(trend[1].points.is_empty());
    }

    #[test]
    fn test_compare_to_previous_flags_drop() {
        let profile = Profile::default();
        let engine = MetricsEngine::new(&profile);
        let mut data = Dataset::default();
        data.append_workout(session(day(1), "C – Legs", "Squat", vec![SetLog::new(60.0, 10)]));

        let drop = engine.compare_to_previous(&data, "C – Legs", "Squat", &[SetLog::new(60.0, 9)]);
        assert_eq!(drop.previous_volume, Some(600.0));
        assert!((drop.change_pct.unwrap() + 10.0).abs() < 1e-9);
        assert!(drop.strength_drop);

        let small = engine.compare_to_previous(&data, "C – Legs", "Squat", &[SetLog::new(58.0, 10)]);
        assert!(!small.strength_drop);

        let none = engine.compare_to_previous(&data, "C – Legs", "Squat", &[]);
        assert_eq!(none.change_pct, None);

        let other = engine.compare_to_previous(&data, "A – Push", "Squat", &[SetLog::new(60.0, 9)]);
        assert_eq!(other.previous_volume, None);
        assert!(!other.strength_drop);
    }

    #[test]
    fn test_daily_targets() {
        let profile = Profile::default();
        let engine = MetricsEngine::new(&profile);

        let protein = engine.protein_progress(&NutritionEntry { calories: 1800, protein: 65 });
        assert_eq!(protein.percent, 50.0);
        assert!(!protein.reached);

        let steps = engine.steps_progress(12_000);
        assert!(steps.reached);
        assert_eq!(steps.goal, 10_000);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_body_fat_round_trips_lean_mass(weight in 49.0f64..200.0f64) {
                let profile = Profile::default();
                let engine = MetricsEngine::new(&profile);
                let bf = engine.body_fat_percent(weight);

                prop_assert!((bf - (1.0 - profile.lean_mass / weight) * 100.0).abs() < 1e-9);
                prop_assert!((lean_mass(weight, bf) - profile.lean_mass).abs() < 1e-9);
                prop_assert!((lean_mass(weight, bf) + fat_mass(weight, bf) - weight).abs() < 1e-9);
            }

            #[test]
            fn test_goal_progress_monotone_and_clamped(
                a in 40.0f64..80.0f64,
                b in 40.0f64..80.0f64,
            ) {
                let profile = Profile::default();
                let engine = MetricsEngine::new(&profile);
                let (lighter, heavier) = if a <= b { (a, b) } else { (b, a) };

                let p_light = engine.goal_progress_percent(lighter, profile.target_15);
                let p_heavy = engine.goal_progress_percent(heavier, profile.target_15);

                prop_assert!(p_light >= p_heavy);
                prop_assert!((0.0..=100.0).contains(&p_light));
                prop_assert!((0.0..=100.0).contains(&p_heavy));
            }
        }
    }
}
