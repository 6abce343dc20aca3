// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! MET-based calorie estimate for a free-text activity description.

use crate::error::{AppError, Result};

/// Weight assumed when the caller has no profile.
pub const DEFAULT_WEIGHT_KG: f64 = 70.0;
/// Session length assumed when none is given.
pub const DEFAULT_DURATION_MIN: f64 = 30.0;

/// Metabolic equivalents, longest key first so that the most specific
/// phrase wins.
const MET_TABLE: &[(&str, f64)] = &[
    ("stair machine", 8.8),
    ("swimming", 6.0),
    ("running", 9.8),
    ("cycling", 7.5),
    ("walking", 3.8),
    ("yoga", 3.0),
];

#[derive(Debug, Clone, PartialEq)]
pub struct Estimate {
    pub exercise_name: String,
    /// Minutes
    pub duration: f64,
    /// kcal
    pub calories_burned: f64,
}

/// MET value for the first table key contained in `activity`.
pub fn lookup(activity: &str) -> Option<(&'static str, f64)> {
    let activity = activity.to_lowercase();
    MET_TABLE
        .iter()
        .find(|(name, _)| activity.contains(name))
        .copied()
}

/// kcal burned: MET * kg * 3.5 / 200 per minute.
pub fn estimate(activity: &str, weight_kg: f64, duration_min: f64) -> Result<Estimate> {
    if !weight_kg.is_finite() || weight_kg <= 0.0 {
        return Err(AppError::Validation(
            "weight must be greater than 0".to_string(),
        ));
    }
    if !duration_min.is_finite() || duration_min <= 0.0 {
        return Err(AppError::Validation(
            "duration must be greater than 0".to_string(),
        ));
    }

    let (name, met) = lookup(activity).ok_or_else(|| {
        AppError::NotFound(format!("No calorie estimate for activity '{}'", activity.trim()))
    })?;

    Ok(Estimate {
        exercise_name: name.to_string(),
        duration: duration_min,
        calories_burned: met * weight_kg * 3.5 / 200.0 * duration_min,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_defaults() {
        let e = estimate("Went Running this morning", DEFAULT_WEIGHT_KG, DEFAULT_DURATION_MIN)
            .unwrap();
        assert_eq!(e.exercise_name, "running");
        assert_eq!(e.duration, 30.0);
        assert!((e.calories_burned - 360.15).abs() < 1e-9);
    }

    #[test]
    fn test_longest_key_wins() {
        assert_eq!(
            lookup("walking up the stair machine").map(|(n, _)| n),
            Some("stair machine")
        );
        assert_eq!(lookup("YOGA").map(|(_, met)| met), Some(3.0));
    }

    #[test]
    fn test_unknown_activity() {
        assert!(matches!(
            estimate("underwater basket weaving", 70.0, 30.0),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_scales_with_weight_and_duration() {
        let base = estimate("cycling", 70.0, 30.0).unwrap().calories_burned;
        let heavier = estimate("cycling", 140.0, 30.0).unwrap().calories_burned;
        let longer = estimate("cycling", 70.0, 60.0).unwrap().calories_burned;
        assert!((heavier - 2.0 * base).abs() < 1e-9);
        assert!((longer - 2.0 * base).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_non_positive_inputs() {
        assert!(matches!(
            estimate("yoga", 0.0, 30.0),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            estimate("yoga", 70.0, -5.0),
            Err(AppError::Validation(_))
        ));
    }
}
