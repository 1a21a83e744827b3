//! Rule-based advisory alerts
//!
//! Every rule is evaluated independently against the dataset and all matches
//! are returned, in rule order. Severity never reorders the list.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::dates::last_n_days;
use crate::metrics::{average, session_volume, WEEK_DAYS};
use crate::models::Dataset;
use crate::profile::Profile;

/// Window inspected for a weight plateau (days)
pub const PLATEAU_WINDOW_DAYS: u32 = 14;

/// Minimum logged weights before a plateau can be called
pub const PLATEAU_MIN_POINTS: usize = 4;

/// Half-to-half mean change below which weight counts as stable (kg)
pub const PLATEAU_TOLERANCE_KG: f64 = 0.15;

/// Sessions per routine compared for a strength decline
pub const DECLINE_SESSIONS: usize = 3;

/// Average assumed when no sleep was logged in the week, so the deload rule
/// cannot fire on missing data
const NO_DATA_SLEEP_HOURS: f64 = 8.0;

/// Alert severity, named after its display colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    /// Informational
    Blue,
    /// Warning
    Amber,
    /// Critical
    Red,
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertLevel::Blue => write!(f, "blue"),
            AlertLevel::Amber => write!(f, "amber"),
            AlertLevel::Red => write!(f, "red"),
        }
    }
}

/// Which rule produced an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    SleepDeficit,
    DeloadSuggested,
    WeightPlateau,
    LowCalories,
    StrengthDecline,
}

impl AlertKind {
    /// Alerts shown on the sleep screen
    pub fn is_sleep_related(&self) -> bool {
        matches!(self, AlertKind::SleepDeficit | AlertKind::DeloadSuggested)
    }
}

/// One advisory message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub level: AlertLevel,
    pub kind: AlertKind,
    pub message: String,
}

impl Alert {
    fn new(level: AlertLevel, kind: AlertKind, message: String) -> Self {
        Alert {
            level,
            kind,
            message,
        }
    }
}

/// Alert rules engine bound to a profile
pub struct AlertEngine<'a> {
    profile: &'a Profile,
}

impl<'a> AlertEngine<'a> {
    pub fn new(profile: &'a Profile) -> Self {
        AlertEngine { profile }
    }

    /// Run every rule and collect the matches in rule order
    ///
    /// `week_calorie_average` is the value from
    /// [`MetricsEngine::week_calorie_average`](crate::metrics::MetricsEngine::week_calorie_average).
    pub fn evaluate(
        &self,
        dataset: &Dataset,
        today: NaiveDate,
        week_calorie_average: Option<u32>,
    ) -> Vec<Alert> {
        let rules = [
            self.sleep_deficit(dataset, today),
            self.deload(dataset, today),
            self.weight_plateau(dataset, today),
            self.low_calories(week_calorie_average),
            self.strength_decline(dataset),
        ];
        let alerts: Vec<Alert> = rules.into_iter().flatten().collect();

        tracing::debug!(%today, count = alerts.len(), "Alert rules evaluated");
        alerts
    }

    /// Every one of the last `sleep_warning_days` nights logged and short
    fn sleep_deficit(&self, dataset: &Dataset, today: NaiveDate) -> Option<Alert> {
        let required = self.profile.sleep_warning_days;
        let hours: Vec<f64> = last_n_days(today, required)
            .iter()
            .filter_map(|d| dataset.sleep.get(d).map(|s| s.hours))
            .collect();

        if hours.len() < required as usize
            || !hours.iter().all(|&h| h < self.profile.sleep_min_hours)
        {
            return None;
        }

        Some(Alert::new(
            AlertLevel::Amber,
            AlertKind::SleepDeficit,
            format!(
                "Sleep under {}hrs for {}+ days. Reduce volume by 1 set per exercise this week.",
                self.profile.sleep_min_hours, required
            ),
        ))
    }

    /// Weekly average sleep below the deload threshold
    fn deload(&self, dataset: &Dataset, today: NaiveDate) -> Option<Alert> {
        let hours: Vec<f64> = last_n_days(today, WEEK_DAYS)
            .iter()
            .filter_map(|d| dataset.sleep.get(d).map(|s| s.hours))
            .collect();
        let avg = if hours.is_empty() {
            NO_DATA_SLEEP_HOURS
        } else {
            average(&hours)
        };

        if avg >= self.profile.sleep_deload_hours {
            return None;
        }

        Some(Alert::new(
            AlertLevel::Red,
            AlertKind::DeloadSuggested,
            format!(
                "Average sleep under {} hours. Consider taking a deload week.",
                self.profile.sleep_deload_hours
            ),
        ))
    }

    /// Earlier and later halves of two weeks of weigh-ins have the same mean
    fn weight_plateau(&self, dataset: &Dataset, today: NaiveDate) -> Option<Alert> {
        let weights: Vec<f64> = last_n_days(today, PLATEAU_WINDOW_DAYS)
            .iter()
            .filter_map(|d| dataset.weights.get(d).copied())
            .filter(|w| *w > 0.0)
            .collect();

        if weights.len() < PLATEAU_MIN_POINTS {
            return None;
        }

        let (earlier, later) = weights.split_at(weights.len() / 2);
        if (average(later) - average(earlier)).abs() >= PLATEAU_TOLERANCE_KG {
            return None;
        }

        Some(Alert::new(
            AlertLevel::Blue,
            AlertKind::WeightPlateau,
            "Weight has been stable for ~2 weeks. Consider reducing carbs by 25g/day.".to_string(),
        ))
    }

    /// Weekly calorie average below the warning floor
    fn low_calories(&self, week_calorie_average: Option<u32>) -> Option<Alert> {
        let avg = week_calorie_average.filter(|&avg| avg > 0)?;
        if avg >= self.profile.cal_warning_min {
            return None;
        }

        Some(Alert::new(
            AlertLevel::Amber,
            AlertKind::LowCalories,
            format!(
                "Weekly calorie average is {} kcal, which is too aggressive. Increase toward {} kcal.",
                avg, self.profile.cal_goal
            ),
        ))
    }

    /// Any routine whose last three sessions lost volume each time
    ///
    /// Sessions are compared in append order, which is chronological by
    /// construction.
    fn strength_decline(&self, dataset: &Dataset) -> Option<Alert> {
        let declining = dataset.routine_names().into_iter().find(|name| {
            let volumes: Vec<f64> = dataset.sessions_named(name).map(session_volume).collect();
            if volumes.len() < DECLINE_SESSIONS {
                return false;
            }
            let recent = &volumes[volumes.len() - DECLINE_SESSIONS..];
            recent.windows(2).all(|pair| pair[1] < pair[0])
        })?;

        tracing::debug!(routine = declining, "Strength decline detected");

        Some(Alert::new(
            AlertLevel::Amber,
            AlertKind::StrengthDecline,
            "Strength has been declining. Consider increasing carbs slightly.".to_string(),
        ))
    }
}
