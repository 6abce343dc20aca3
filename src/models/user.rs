//! User model for storage.

use crate::models::log::{FoodLog, WeightEntry};
use crate::models::profile::{EnergyTargets, Profile};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User record stored in the `users` collection.
///
/// The weight and food logs are embedded and share the record's lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Opaque user id (also used as document ID)
    pub id: String,
    /// Unique login handle
    pub username: String,
    /// Unique email address
    pub email: String,
    /// Argon2id PHC string
    pub password_hash: String,
    /// Whether the profile setup form has been submitted
    #[serde(default)]
    pub setup_complete: bool,
    #[serde(default)]
    pub profile: Option<Profile>,
    /// Computed at setup, never elsewhere
    #[serde(default)]
    pub targets: Option<EnergyTargets>,
    /// Goal weight in kilograms
    #[serde(default)]
    pub target_weight: Option<f64>,
    /// Weight measurements in insertion order
    #[serde(default)]
    pub weight_log: Vec<WeightEntry>,
    #[serde(default)]
    pub food_log: FoodLog,
    /// When the account was registered
    pub created_at: DateTime<Utc>,
}

impl User {
    /// New account with an empty profile and empty logs.
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            username,
            email,
            password_hash,
            setup_complete: false,
            profile: None,
            targets: None,
            target_weight: None,
            weight_log: Vec::new(),
            food_log: FoodLog::new(),
            created_at: Utc::now(),
        }
    }
}
