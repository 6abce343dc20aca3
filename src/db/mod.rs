// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer.
//!
//! `Database` is a cheap, cloneable handle over one of the storage
//! backends. All reads and writes are whole-document: a user record is
//! fetched, mutated in memory and written back in one call.

pub mod firestore;
pub mod memory;

pub use self::firestore::FirestoreStore;
pub use self::memory::MemoryStore;

use crate::config::{Config, StorageBackend};
use crate::error::{AppError, Result};
use crate::models::{Exercise, User};
use std::sync::Arc;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const EXERCISES: &str = "exercises";
}

/// User fields that must be globally unique.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Username,
    Email,
}

impl UniqueField {
    /// Stored field name.
    pub fn field_name(self) -> &'static str {
        match self {
            UniqueField::Username => "username",
            UniqueField::Email => "email",
        }
    }

    pub fn value_of(self, user: &User) -> &str {
        match self {
            UniqueField::Username => &user.username,
            UniqueField::Email => &user.email,
        }
    }
}

#[derive(Clone)]
enum Backend {
    Firestore(FirestoreStore),
    Memory(Arc<MemoryStore>),
    /// Every operation fails; used to exercise storage-failure handling.
    Offline,
}

/// Database handle.
#[derive(Clone)]
pub struct Database {
    backend: Backend,
}

fn offline() -> AppError {
    AppError::Database("Database not connected (offline mode)".to_string())
}

impl Database {
    /// Connect to the backend selected in configuration.
    pub async fn connect(config: &Config) -> Result<Self> {
        match config.storage {
            StorageBackend::Memory => {
                tracing::info!("Using in-memory storage");
                Ok(Self::new_in_memory())
            }
            StorageBackend::Firestore => {
                let project_id = config.gcp_project_id.as_deref().ok_or_else(|| {
                    AppError::Database("GCP_PROJECT_ID is required for Firestore".to_string())
                })?;
                let store = FirestoreStore::new(project_id).await?;
                Ok(Self {
                    backend: Backend::Firestore(store),
                })
            }
        }
    }

    /// Fresh, empty in-memory database.
    pub fn new_in_memory() -> Self {
        Self {
            backend: Backend::Memory(Arc::new(MemoryStore::default())),
        }
    }

    /// Create a mock database for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self {
            backend: Backend::Offline,
        }
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by id.
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        match &self.backend {
            Backend::Firestore(store) => store.get_user(user_id).await,
            Backend::Memory(store) => Ok(store.get_user(user_id)),
            Backend::Offline => Err(offline()),
        }
    }

    /// Find the user whose unique `field` equals `value`.
    pub async fn find_user_by(&self, field: UniqueField, value: &str) -> Result<Option<User>> {
        match &self.backend {
            Backend::Firestore(store) => store.find_user_by(field, value).await,
            Backend::Memory(store) => Ok(store.find_user_by(field, value)),
            Backend::Offline => Err(offline()),
        }
    }

    /// Create or replace a user record.
    pub async fn save_user(&self, user: &User) -> Result<()> {
        match &self.backend {
            Backend::Firestore(store) => store.save_user(user).await,
            Backend::Memory(store) => {
                store.save_user(user);
                Ok(())
            }
            Backend::Offline => Err(offline()),
        }
    }

    /// Delete a user record together with its embedded logs.
    pub async fn delete_user(&self, user_id: &str) -> Result<()> {
        match &self.backend {
            Backend::Firestore(store) => store.delete_user(user_id).await,
            Backend::Memory(store) => {
                store.delete_user(user_id);
                Ok(())
            }
            Backend::Offline => Err(offline()),
        }
    }

    // ─── Exercise Operations ─────────────────────────────────────

    /// Get an exercise by id.
    pub async fn get_exercise(&self, exercise_id: &str) -> Result<Option<Exercise>> {
        match &self.backend {
            Backend::Firestore(store) => store.get_exercise(exercise_id).await,
            Backend::Memory(store) => Ok(store.get_exercise(exercise_id)),
            Backend::Offline => Err(offline()),
        }
    }

    /// All exercises owned by a user, oldest first.
    pub async fn list_exercises_for_user(&self, user_id: &str) -> Result<Vec<Exercise>> {
        let mut exercises = match &self.backend {
            Backend::Firestore(store) => store.list_exercises_for_user(user_id).await?,
            Backend::Memory(store) => store.list_exercises_for_user(user_id),
            Backend::Offline => return Err(offline()),
        };

        // The Firestore query filters only; ordering happens here
        exercises.sort_by(|a, b| {
            a.timestamp
                .cmp(&b.timestamp)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(exercises)
    }

    /// Create or replace an exercise.
    pub async fn save_exercise(&self, exercise: &Exercise) -> Result<()> {
        match &self.backend {
            Backend::Firestore(store) => store.save_exercise(exercise).await,
            Backend::Memory(store) => {
                store.save_exercise(exercise);
                Ok(())
            }
            Backend::Offline => Err(offline()),
        }
    }

    /// Delete an exercise. Deleting a missing id succeeds.
    pub async fn delete_exercise(&self, exercise_id: &str) -> Result<()> {
        match &self.backend {
            Backend::Firestore(store) => store.delete_exercise(exercise_id).await,
            Backend::Memory(store) => {
                store.delete_exercise(exercise_id);
                Ok(())
            }
            Backend::Offline => Err(offline()),
        }
    }
}
