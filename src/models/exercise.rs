// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Exercise session model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Stored exercise record in the `exercises` collection.
///
/// Owned by reference rather than embedded in the user document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    /// Exercise id (also used as document ID)
    pub id: String,
    /// Owning user id; never changes after creation
    pub user_id: String,
    pub exercise_name: String,
    /// Duration in minutes
    pub duration: f64,
    /// Energy burned in kcal
    pub calories_burned: f64,
    /// When the session happened; never changes after creation
    #[serde(rename = "date")]
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub timestamp: DateTime<Utc>,
}
