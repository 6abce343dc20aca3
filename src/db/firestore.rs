// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (credentials, profile, embedded weight and food logs)
//! - Exercises (one document per logged session)

use crate::db::{collections, UniqueField};
use crate::error::{AppError, Result};
use crate::models::{Exercise, User};

/// Firestore-backed document store.
#[derive(Clone)]
pub struct FirestoreStore {
    client: ::firestore::FirestoreDb,
}

impl FirestoreStore {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self> {
        // The emulator does not check credentials
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = ::firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self { client })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = ::firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = ::firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self { client })
    }

    // ─── User Operations ─────────────────────────────────────────

    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        self.client
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn find_user_by(&self, field: UniqueField, value: &str) -> Result<Option<User>> {
        let value = value.to_string();
        let field_name = field.field_name();

        let mut users: Vec<User> = self
            .client
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(move |q| q.for_all([q.field(field_name).eq(value.clone())]))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(users.pop())
    }

    /// Write the whole user document.
    pub async fn save_user(&self, user: &User) -> Result<()> {
        let _: () = self
            .client
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&user.id)
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    pub async fn delete_user(&self, user_id: &str) -> Result<()> {
        self.client
            .fluent()
            .delete()
            .from(collections::USERS)
            .document_id(user_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::debug!(user_id, "Deleted user document");
        Ok(())
    }

    // ─── Exercise Operations ─────────────────────────────────────

    pub async fn get_exercise(&self, exercise_id: &str) -> Result<Option<Exercise>> {
        self.client
            .fluent()
            .select()
            .by_id_in(collections::EXERCISES)
            .obj()
            .one(exercise_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn list_exercises_for_user(&self, user_id: &str) -> Result<Vec<Exercise>> {
        let user_id = user_id.to_string();

        self.client
            .fluent()
            .select()
            .from(collections::EXERCISES)
            .filter(move |q| q.for_all([q.field("userId").eq(user_id.clone())]))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn save_exercise(&self, exercise: &Exercise) -> Result<()> {
        let _: () = self
            .client
            .fluent()
            .update()
            .in_col(collections::EXERCISES)
            .document_id(&exercise.id)
            .object(exercise)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    pub async fn delete_exercise(&self, exercise_id: &str) -> Result<()> {
        self.client
            .fluent()
            .delete()
            .from(collections::EXERCISES)
            .document_id(exercise_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
