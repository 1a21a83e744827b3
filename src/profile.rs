//! Static user profile: body-composition anchors, daily goals and alert thresholds.
//!
//! The profile never changes while the process runs. It is read from the
//! `[profile]` table of the configuration file; any key left out of that
//! table takes the default below.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackerError};

/// User goals and alert thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    /// Age in years (informational)
    pub age: u8,

    /// Weight at the start of the cut in kilograms (0% progress)
    pub start_weight: f64,

    /// Estimated lean mass in kilograms, held constant during the cut
    pub lean_mass: f64,

    /// Weight at 15% body fat
    pub target_15: f64,

    /// Weight at 14% body fat
    pub target_14: f64,

    /// Weight at 13% body fat
    pub target_13: f64,

    /// Daily calorie target (kcal)
    pub cal_goal: u32,

    /// Daily protein target (grams)
    pub protein_goal: u32,

    /// Daily step target
    pub steps_goal: u32,

    /// Assumed fat loss in kilograms per week
    pub weekly_loss_rate: f64,

    /// Low end of the daily deficit (kcal)
    pub deficit_low: u32,

    /// High end of the daily deficit (kcal)
    pub deficit_high: u32,

    /// Warn when the weekly calorie average falls below this (kcal)
    pub cal_warning_min: u32,

    /// Consecutive days of poor sleep before the deficit alert fires
    pub sleep_warning_days: u32,

    /// Nights shorter than this count as poor sleep (hours)
    pub sleep_min_hours: f64,

    /// Seven-day average sleep below this suggests a deload (hours)
    pub sleep_deload_hours: f64,

    /// Exercise volume drop versus the previous session that gets flagged (%)
    pub strength_drop_pct: f64,

    /// Default rest period between sets (seconds)
    pub rest_period_secs: u32,

    /// Recovery scores at or above this are green
    pub recovery_green_min: u8,

    /// Recovery scores at or above this (and below green) are amber
    pub recovery_amber_min: u8,

    /// Sleep duration that earns the full sleep sub-score (hours)
    pub sleep_ideal_hours: f64,
}

impl Default for Profile {
    fn default() -> Self {
        Profile {
            age: 40,
            start_weight: 60.1,
            lean_mass: 48.7,
            target_15: 57.3,
            target_14: 56.6,
            target_13: 56.0,
            cal_goal: 1800,
            protein_goal: 130,
            steps_goal: 10_000,
            weekly_loss_rate: 0.35,
            deficit_low: 300,
            deficit_high: 400,
            cal_warning_min: 1700,
            sleep_warning_days: 3,
            sleep_min_hours: 6.0,
            sleep_deload_hours: 5.0,
            strength_drop_pct: 5.0,
            rest_period_secs: 90,
            recovery_green_min: 70,
            recovery_amber_min: 40,
            sleep_ideal_hours: 8.0,
        }
    }
}

/// A named body-fat target weight
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BodyFatTarget {
    /// Display label, e.g. "15%"
    pub label: &'static str,
    /// Target body-fat percentage
    pub body_fat_pct: u8,
    /// Weight at which the target is reached (kg)
    pub weight: f64,
}

impl Profile {
    /// The three body-fat targets, leanest last
    pub fn targets(&self) -> [BodyFatTarget; 3] {
        [
            BodyFatTarget {
                label: "15%",
                body_fat_pct: 15,
                weight: self.target_15,
            },
            BodyFatTarget {
                label: "14%",
                body_fat_pct: 14,
                weight: self.target_14,
            },
            BodyFatTarget {
                label: "13%",
                body_fat_pct: 13,
                weight: self.target_13,
            },
        ]
    }

    /// Check that the thresholds describe a usable profile
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("start_weight", self.start_weight),
            ("lean_mass", self.lean_mass),
            ("weekly_loss_rate", self.weekly_loss_rate),
            ("sleep_ideal_hours", self.sleep_ideal_hours),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(TrackerError::Configuration(format!(
                    "{} must be a positive number, got {}",
                    field, value
                )));
            }
        }

        if self.cal_goal == 0 {
            return Err(TrackerError::Configuration(
                "cal_goal must be greater than zero".to_string(),
            ));
        }

        if self.recovery_amber_min > self.recovery_green_min {
            return Err(TrackerError::Configuration(format!(
                "recovery_amber_min ({}) must not exceed recovery_green_min ({})",
                self.recovery_amber_min, self.recovery_green_min
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_is_valid() {
        let profile = Profile::default();
        assert!(profile.validate().is_ok());
        assert_eq!(profile.targets()[0].weight, 57.3);
        assert_eq!(profile.targets()[2].label, "13%");
    }

    #[test]
    fn test_rejects_non_positive_loss_rate() {
        let profile = Profile {
            weekly_loss_rate: 0.0,
            ..Profile::default()
        };
        let err = profile.validate().unwrap_err();
        assert!(err.to_string().contains("weekly_loss_rate"));
    }

    #[test]
    fn test_rejects_inverted_recovery_bands() {
        let profile = Profile {
            recovery_amber_min: 80,
            recovery_green_min: 70,
            ..Profile::default()
        };
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_partial_table_fills_defaults() {
        let profile: Profile = toml::from_str("start_weight = 82.0\ncal_goal = 2300\n").unwrap();
        assert_eq!(profile.start_weight, 82.0);
        assert_eq!(profile.cal_goal, 2300);
        assert_eq!(profile.lean_mass, 48.7);
        assert_eq!(profile.sleep_warning_days, 3);
    }
}
