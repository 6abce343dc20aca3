// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Progress aggregation over the logs.
//!
//! Everything here is recomputed from the logs on every request; nothing
//! is cached or stored.

use crate::models::{EnergyTargets, Exercise, FoodLog, Macros, User, WeightEntry};
use crate::services::logs::filter_food_log;
use crate::time_utils::utc_date;
use chrono::NaiveDate;
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Exercises whose timestamp falls on `date` (UTC).
pub fn exercises_on(exercises: &[Exercise], date: NaiveDate) -> Vec<Exercise> {
    exercises
        .iter()
        .filter(|e| utc_date(&e.timestamp) == date)
        .cloned()
        .collect()
}

/// Total kcal burned across exercises logged on `date` (UTC).
pub fn calories_burned_on(exercises: &[Exercise], date: NaiveDate) -> f64 {
    exercises
        .iter()
        .filter(|e| utc_date(&e.timestamp) == date)
        .map(|e| e.calories_burned)
        .sum()
}

/// Summed calories and macros over every meal of a food log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct FoodTotals {
    pub calories: f64,
    pub carbs: f64,
    pub protein: f64,
    pub fat: f64,
}

impl FoodTotals {
    /// Sum a (usually date-filtered) food log. Missing macros count as zero.
    pub fn from_log(log: &FoodLog) -> Self {
        log.values()
            .flatten()
            .fold(FoodTotals::default(), |mut totals, entry| {
                totals.calories += entry.calories;
                totals.carbs += entry.carbs.unwrap_or(0.0);
                totals.protein += entry.protein.unwrap_or(0.0);
                totals.fat += entry.fat.unwrap_or(0.0);
                totals
            })
    }
}

/// Percent of the gap between the first logged weight and the target that
/// has been closed by the latest logged weight.
///
/// Zero when there is no target, no log, or no gap to begin with. The value
/// is not clamped: it goes negative when moving away from the target and
/// exceeds 100 when overshooting.
pub fn weight_progress(target_weight: Option<f64>, weight_log: &[WeightEntry]) -> f64 {
    let (target, start, current) = match (target_weight, weight_log.first(), weight_log.last()) {
        (Some(target), Some(first), Some(last)) => (target, first.weight, last.weight),
        _ => return 0.0,
    };

    let initial_gap = (start - target).abs();
    if initial_gap == 0.0 {
        return 0.0;
    }

    let remaining_gap = (current - target).abs();
    (initial_gap - remaining_gap) / initial_gap * 100.0
}

/// Dashboard view for one day.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub date: NaiveDate,
    pub tdee: Option<f64>,
    pub macros: Option<Macros>,
    pub food: FoodTotals,
    pub calories_burned: f64,
    pub weight_progress: f64,
    pub start_weight: Option<f64>,
    pub current_weight: Option<f64>,
    pub target_weight: Option<f64>,
}

impl DailySummary {
    pub fn build(user: &User, exercises: &[Exercise], date: NaiveDate) -> Self {
        let targets: Option<EnergyTargets> = user.targets;
        let food = FoodTotals::from_log(&filter_food_log(&user.food_log, date));

        Self {
            date,
            tdee: targets.map(|t| t.tdee),
            macros: targets.map(|t| Macros::from_tdee(t.tdee)),
            food,
            calories_burned: calories_burned_on(exercises, date),
            weight_progress: weight_progress(user.target_weight, &user.weight_log),
            start_weight: user.weight_log.first().map(|w| w.weight),
            current_weight: user.weight_log.last().map(|w| w.weight),
            target_weight: user.target_weight,
        }
    }
}
