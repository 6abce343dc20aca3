// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Entries of the per-user weight and food logs.
//!
//! Entry ids are opaque tokens: they are compared for equality only and
//! never interpreted as positions, so removing one entry leaves the ids of
//! the others untouched.

use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Generate a fresh opaque entry id.
pub fn new_entry_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// A single body-weight measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WeightEntry {
    pub id: String,
    /// Weight in kilograms
    pub weight: f64,
    #[serde(rename = "date")]
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub timestamp: DateTime<Utc>,
}

/// A food item logged against a meal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct FoodEntry {
    pub id: String,
    pub name: String,
    pub calories: f64,
    #[serde(default)]
    pub carbs: Option<f64>,
    #[serde(default)]
    pub protein: Option<f64>,
    #[serde(default)]
    pub fat: Option<f64>,
    #[serde(rename = "date")]
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub timestamp: DateTime<Utc>,
}

/// Meal a food entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Meal {
    Breakfast,
    Lunch,
    Dinner,
    #[serde(alias = "snacks")]
    Snack,
}

impl Meal {
    pub const ALL: [Meal; 4] = [Meal::Breakfast, Meal::Lunch, Meal::Dinner, Meal::Snack];

    pub fn as_str(self) -> &'static str {
        match self {
            Meal::Breakfast => "breakfast",
            Meal::Lunch => "lunch",
            Meal::Dinner => "dinner",
            Meal::Snack => "snack",
        }
    }
}

impl fmt::Display for Meal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Meal {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "breakfast" => Ok(Meal::Breakfast),
            "lunch" => Ok(Meal::Lunch),
            "dinner" => Ok(Meal::Dinner),
            "snack" | "snacks" => Ok(Meal::Snack),
            other => Err(AppError::Validation(format!(
                "unknown meal '{}': expected breakfast, lunch, dinner or snack",
                other
            ))),
        }
    }
}

/// Food log keyed by meal name.
///
/// Stored with string keys so the document shape stays a plain map.
pub type FoodLog = BTreeMap<String, Vec<FoodEntry>>;

/// Copy of `log` that contains every meal key, empty where nothing was logged.
pub fn with_all_meals(log: &FoodLog) -> FoodLog {
    let mut complete = log.clone();
    for meal in Meal::ALL {
        complete.entry(meal.as_str().to_string()).or_default();
    }
    complete
}
