//! Daily recovery score
//!
//! A 0-100 composite readiness estimate for one calendar day, used to pick a
//! training intensity.
//!
//! # Components
//!
//! | Component | Points | Input |
//! |-----------|--------|-------|
//! | Sleep     | 0-40   | hours slept against the ideal |
//! | Energy    | 0-25   | morning energy rating 1-5 |
//! | Nutrition | 0-20   | previous day's calories against the goal |
//! | Rest      | 0/8/15 | training on the two preceding days |
//!
//! Sleep is mandatory: without a sleep entry for the day there is no score.
//! Every other input degrades to a neutral value when missing.
//!
//! # Bands
//!
//! - **Green** (`>= recovery_green_min`): train hard
//! - **Amber** (`>= recovery_amber_min`): train light
//! - **Red**: rest day

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::dates::previous_day;
use crate::models::Dataset;
use crate::profile::Profile;

/// Upper bound of the total score
pub const MAX_SCORE: u8 = 100;

const SLEEP_POINTS: f64 = 40.0;
const ENERGY_POINTS: f64 = 25.0;

/// Nutrition points when the previous day has no usable entry
const NUTRITION_NEUTRAL: u8 = 10;

/// Training-intensity recommendation band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryBand {
    Green,
    Amber,
    Red,
}

impl RecoveryBand {
    /// Classify a score against the profile thresholds
    pub fn from_score(score: u8, profile: &Profile) -> Self {
        if score >= profile.recovery_green_min {
            RecoveryBand::Green
        } else if score >= profile.recovery_amber_min {
            RecoveryBand::Amber
        } else {
            RecoveryBand::Red
        }
    }

    /// Short recommendation shown next to the score
    pub fn label(&self) -> &'static str {
        match self {
            RecoveryBand::Green => "Train Hard",
            RecoveryBand::Amber => "Train Light",
            RecoveryBand::Red => "Rest Day",
        }
    }
}

impl fmt::Display for RecoveryBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecoveryBand::Green => write!(f, "green"),
            RecoveryBand::Amber => write!(f, "amber"),
            RecoveryBand::Red => write!(f, "red"),
        }
    }
}

/// Points contributed by each component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryBreakdown {
    pub sleep: u8,
    pub energy: u8,
    pub nutrition: u8,
    pub rest: u8,
}

impl RecoveryBreakdown {
    pub fn total(&self) -> u8 {
        (self.sleep as u16 + self.energy as u16 + self.nutrition as u16 + self.rest as u16)
            .min(MAX_SCORE as u16) as u8
    }
}

/// Recovery score for one day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryScore {
    pub date: NaiveDate,
    pub score: u8,
    pub band: RecoveryBand,
    pub breakdown: RecoveryBreakdown,
}

impl RecoveryScore {
    pub fn label(&self) -> &'static str {
        self.band.label()
    }
}

/// Recovery scorer bound to a profile
pub struct RecoveryScorer<'a> {
    profile: &'a Profile,
}

impl<'a> RecoveryScorer<'a> {
    pub fn new(profile: &'a Profile) -> Self {
        RecoveryScorer { profile }
    }

    /// Score `date`, or `None` when no sleep was logged for it
    pub fn score(&self, date: NaiveDate, dataset: &Dataset) -> Option<RecoveryScore> {
        let sleep = dataset.sleep.get(&date)?;

        let yesterday = previous_day(date);
        let breakdown = RecoveryBreakdown {
            sleep: self.sleep_points(sleep.hours),
            energy: Self::energy_points(sleep.energy),
            nutrition: self.nutrition_points(dataset, yesterday),
            rest: Self::rest_points(dataset, yesterday),
        };
        let score = breakdown.total();
        let band = RecoveryBand::from_score(score, self.profile);

        tracing::debug!(%date, score, %band, ?breakdown, "Recovery score computed");

        Some(RecoveryScore {
            date,
            score,
            band,
            breakdown,
        })
    }

    /// Linear in hours up to the ideal; no bonus for oversleeping
    fn sleep_points(&self, hours: f64) -> u8 {
        let points = (hours / self.profile.sleep_ideal_hours * SLEEP_POINTS).round();
        points.clamp(0.0, SLEEP_POINTS) as u8
    }

    /// 1 maps to 0 and 5 maps to 25
    fn energy_points(energy: u8) -> u8 {
        let energy = energy.clamp(1, 5) as f64;
        ((energy - 1.0) / 4.0 * ENERGY_POINTS).round() as u8
    }

    /// Previous day's calorie adequacy
    ///
    /// The ladder is applied in order and the overeating check runs last, so a
    /// ratio in (1.1, 1.2] falls through to the 0.8 rung.
    fn nutrition_points(&self, dataset: &Dataset, yesterday: NaiveDate) -> u8 {
        let calories = match dataset.nutrition.get(&yesterday) {
            Some(entry) if entry.calories > 0 => entry.calories,
            _ => return NUTRITION_NEUTRAL,
        };

        let ratio = calories as f64 / self.profile.cal_goal as f64;
        let mut points = if (0.9..=1.1).contains(&ratio) {
            20
        } else if ratio >= 0.8 {
            15
        } else if ratio >= 0.7 {
            10
        } else {
            5
        };
        if ratio > 1.2 {
            points = 12;
        }
        points
    }

    /// Training on the scored day itself is not considered
    fn rest_points(dataset: &Dataset, yesterday: NaiveDate) -> u8 {
        if !dataset.trained_on(yesterday) {
            15
        } else if !dataset.trained_on(previous_day(yesterday)) {
            8
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NutritionEntry, SleepEntry, WorkoutSession};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, d).unwrap()
    }

    fn trained(data: &mut Dataset, date: NaiveDate) {
        data.append_workout(WorkoutSession {
            date,
            name: "A – Push".to_string(),
            exercises: Vec::new(),
        });
    }

    fn ate(data: &mut Dataset, date: NaiveDate, calories: u32) {
        data.upsert_nutrition(date, NutritionEntry { calories, protein: 130 });
    }

    #[test]
    fn test_perfect_day() {
        let profile = Profile::default();
        let mut data = Dataset::default();
        data.upsert_sleep(day(19), SleepEntry { hours: 8.0, energy: 5 });
        ate(&mut data, day(18), profile.cal_goal);

        let result = RecoveryScorer::new(&profile).score(day(19), &data).unwrap();
        assert_eq!(
            result.breakdown,
            RecoveryBreakdown {
                sleep: 40,
                energy: 25,
                nutrition: 20,
                rest: 15
            }
        );
        assert_eq!(result.score, 100);
        assert_eq!(result.band, RecoveryBand::Green);
        assert_eq!(result.label(), "Train Hard");
    }

    #[test]
    fn test_no_sleep_entry_means_no_score() {
        let profile = Profile::default();
        let mut data = Dataset::default();
        data.upsert_sleep(day(18), SleepEntry { hours: 8.0, energy: 5 });

        assert!(RecoveryScorer::new(&profile).score(day(19), &data).is_none());
    }

    #[test]
    fn test_sleep_points_cap_at_ideal() {
        let profile = Profile::default();
        let scorer = RecoveryScorer::new(&profile);
        assert_eq!(scorer.sleep_points(10.0), 40);
        assert_eq!(scorer.sleep_points(6.0), 30);
        assert_eq!(scorer.sleep_points(0.0), 0);
    }

    #[test]
    fn test_energy_points() {
        assert_eq!(RecoveryScorer::energy_points(1), 0);
        assert_eq!(RecoveryScorer::energy_points(2), 6);
        assert_eq!(RecoveryScorer::energy_points(3), 13);
        assert_eq!(RecoveryScorer::energy_points(5), 25);
    }

    #[test]
    fn test_nutrition_ladder() {
        let profile = Profile::default();
        let scorer = RecoveryScorer::new(&profile);
        let cases = [
            (1800, 20), // 1.0
            (1620, 20), // 0.9
            (1980, 20), // 1.1
            (2070, 15), // 1.15 falls through to the 0.8 rung
            (2160, 15), // exactly 1.2 is not overeating
            (2200, 12), // > 1.2
            (1500, 15), // 0.83
            (1300, 10), // 0.72
            (1000, 5),  // 0.56
        ];

        for (calories, expected) in cases {
            let mut data = Dataset::default();
            ate(&mut data, day(18), calories);
            assert_eq!(
                scorer.nutrition_points(&data, day(18)),
                expected,
                "calories {}",
                calories
            );
        }
    }

    #[test]
    fn test_nutrition_neutral_without_data() {
        let profile = Profile::default();
        let scorer = RecoveryScorer::new(&profile);
        let mut data = Dataset::default();
        assert_eq!(scorer.nutrition_points(&data, day(18)), 10);

        ate(&mut data, day(18), 0);
        assert_eq!(scorer.nutrition_points(&data, day(18)), 10);
    }

    #[test]
    fn test_rest_points() {
        let mut data = Dataset::default();
        assert_eq!(RecoveryScorer::rest_points(&data, day(18)), 15);

        trained(&mut data, day(17));
        assert_eq!(RecoveryScorer::rest_points(&data, day(18)), 15);

        trained(&mut data, day(18));
        assert_eq!(RecoveryScorer::rest_points(&data, day(18)), 0);

        let mut data = Dataset::default();
        trained(&mut data, day(18));
        assert_eq!(RecoveryScorer::rest_points(&data, day(18)), 8);
    }

    #[test]
    fn test_training_on_scored_day_is_ignored() {
        let profile = Profile::default();
        let mut data = Dataset::default();
        data.upsert_sleep(day(19), SleepEntry { hours: 8.0, energy: 5 });
        trained(&mut data, day(19));

        let result = RecoveryScorer::new(&profile).score(day(19), &data).unwrap();
        assert_eq!(result.breakdown.rest, 15);
    }

    #[test]
    fn test_bands() {
        let profile = Profile::default();
        assert_eq!(RecoveryBand::from_score(70, &profile), RecoveryBand::Green);
        assert_eq!(RecoveryBand::from_score(69, &profile), RecoveryBand::Amber);
        assert_eq!(RecoveryBand::from_score(40, &profile), RecoveryBand::Amber);
        assert_eq!(RecoveryBand::from_score(39, &profile), RecoveryBand::Red);
        assert_eq!(RecoveryBand::Red.label(), "Rest Day");
        assert_eq!(RecoveryBand::Amber.to_string(), "amber");
    }

    #[test]
    fn test_poor_night_after_back_to_back_training() {
        let profile = Profile::default();
        let mut data = Dataset::default();
        data.upsert_sleep(day(19), SleepEntry { hours: 4.0, energy: 2 });
        ate(&mut data, day(18), 1000);
        trained(&mut data, day(17));
        trained(&mut data, day(18));

        let result = RecoveryScorer::new(&profile).score(day(19), &data).unwrap();
        // 20 + 6 + 5 + 0
        assert_eq!(result.score, 31);
        assert_eq!(result.band, RecoveryBand::Red);
    }
}
