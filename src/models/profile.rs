// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Biometric profile, goal settings and computed energy targets.

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

/// Self-reported activity level, mapped to a fixed TDEE multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    LightlyActive,
    ModeratelyActive,
    VeryActive,
    ExtraActive,
}

impl ActivityLevel {
    pub fn multiplier(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::LightlyActive => 1.375,
            ActivityLevel::ModeratelyActive => 1.55,
            ActivityLevel::VeryActive => 1.725,
            ActivityLevel::ExtraActive => 1.9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    Lose,
    Maintain,
    Gain,
}

/// Completed profile stored on the user record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Age in years
    pub age: u32,
    /// Height in centimetres
    pub height: f64,
    /// Body weight in kilograms at setup time
    pub weight: f64,
    pub gender: Gender,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
    /// Weekly adjustment rate in percent; ignored when the goal is maintain
    #[serde(default)]
    pub rate: Option<f64>,
}

/// Daily energy targets, recomputed only when setup is submitted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct EnergyTargets {
    /// Basal metabolic rate (kcal/day)
    pub bmr: f64,
    /// Goal-adjusted total daily energy expenditure (kcal/day)
    pub tdee: f64,
}

/// Daily macro targets in grams, derived from TDEE on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Macros {
    pub carbs: i64,
    pub protein: i64,
    pub fat: i64,
}

/// Setup form as submitted by the caller. Every field is optional here so
/// that a missing value surfaces as a validation error naming the field.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInput {
    #[validate(range(min = 1, message = "age must be greater than 0"))]
    pub age: Option<u32>,
    #[validate(range(exclusive_min = 0.0, message = "height must be greater than 0"))]
    pub height: Option<f64>,
    #[validate(range(exclusive_min = 0.0, message = "weight must be greater than 0"))]
    pub weight: Option<f64>,
    pub gender: Option<Gender>,
    pub activity_level: Option<ActivityLevel>,
    pub goal: Option<Goal>,
    #[validate(range(
        exclusive_min = 0.0,
        exclusive_max = 100.0,
        message = "rate must be between 0 and 100 percent"
    ))]
    pub rate: Option<f64>,
}

fn required<T>(value: Option<T>, field: &str) -> Result<T> {
    value.ok_or_else(|| AppError::Validation(format!("{} is required", field)))
}

impl ProfileInput {
    /// Convert into a complete profile, rejecting any missing field.
    pub fn into_profile(self) -> Result<Profile> {
        let goal = required(self.goal, "goal")?;
        if goal != Goal::Maintain && self.rate.is_none() {
            return Err(AppError::Validation(
                "rate is required unless goal is maintain".to_string(),
            ));
        }

        Ok(Profile {
            age: required(self.age, "age")?,
            height: required(self.height, "height")?,
            weight: required(self.weight, "weight")?,
            gender: required(self.gender, "gender")?,
            activity_level: required(self.activity_level, "activityLevel")?,
            goal,
            rate: self.rate,
        })
    }
}
