// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Energy model: BMR, TDEE and macro targets from a biometric profile.
//!
//! BMR uses the Mifflin-St Jeor equation. TDEE scales BMR by a fixed
//! activity multiplier and is then shifted by the goal rate. Macros split
//! TDEE 50/30/20 by calories across carbs/protein/fat.

use crate::error::{AppError, Result};
use crate::models::{EnergyTargets, Gender, Goal, Macros, Profile};

const CARB_CALORIE_SHARE: f64 = 0.5;
const PROTEIN_CALORIE_SHARE: f64 = 0.3;
const FAT_CALORIE_SHARE: f64 = 0.2;

const KCAL_PER_GRAM_CARB: f64 = 4.0;
const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
const KCAL_PER_GRAM_FAT: f64 = 9.0;

/// Basal metabolic rate in kcal/day.
pub fn bmr(profile: &Profile) -> f64 {
    let s = match profile.gender {
        Gender::Male => 5.0,
        Gender::Female => -161.0,
    };
    10.0 * profile.weight + 6.25 * profile.height - 5.0 * f64::from(profile.age) + s
}

/// Compute BMR and goal-adjusted TDEE for a profile.
///
/// Deterministic and side-effect free. Fails when the goal needs a rate
/// and none was given, or when a biometric value is not positive.
pub fn compute_targets(profile: &Profile) -> Result<EnergyTargets> {
    if profile.age == 0 || profile.height <= 0.0 || profile.weight <= 0.0 {
        return Err(AppError::Validation(
            "age, height and weight must be greater than 0".to_string(),
        ));
    }

    let bmr = bmr(profile);
    let tdee = bmr * profile.activity_level.multiplier();

    let tdee = match profile.goal {
        Goal::Maintain => tdee,
        Goal::Lose | Goal::Gain => {
            let rate = profile.rate.ok_or_else(|| {
                AppError::Validation("rate is required unless goal is maintain".to_string())
            })?;
            let delta = tdee * (rate / 100.0);
            if profile.goal == Goal::Lose {
                tdee - delta
            } else {
                tdee + delta
            }
        }
    };

    Ok(EnergyTargets { bmr, tdee })
}

impl Macros {
    /// Daily gram targets for a TDEE, rounded to whole grams.
    pub fn from_tdee(tdee: f64) -> Self {
        Self {
            carbs: (tdee * CARB_CALORIE_SHARE / KCAL_PER_GRAM_CARB).round() as i64,
            protein: (tdee * PROTEIN_CALORIE_SHARE / KCAL_PER_GRAM_PROTEIN).round() as i64,
            fat: (tdee * FAT_CALORIE_SHARE / KCAL_PER_GRAM_FAT).round() as i64,
        }
    }
}
