// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Exercise log routes. The caller always owns what they create or see.

use crate::error::{AppError, Result};
use crate::extract::ValidJson;
use crate::middleware::auth::AuthUser;
use crate::models::Exercise;
use crate::services::{met, ExerciseFields};
use crate::time_utils::{parse_timestamp, today_utc};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/exercise-log", get(list_exercises).post(create_exercise))
        .route("/exercise-log/today", get(today))
        .route("/exercise-log/estimate", post(estimate))
        .route(
            "/exercise-log/{id}",
            get(get_exercise)
                .put(update_exercise)
                .delete(delete_exercise),
        )
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateExerciseRequest {
    /// Optional; must be the caller's own id when present
    pub user_id: Option<String>,
    #[validate(length(min = 1, message = "exerciseName is required"))]
    pub exercise_name: String,
    #[validate(range(exclusive_min = 0.0, message = "duration must be greater than 0"))]
    pub duration: f64,
    #[validate(range(min = 0.0, message = "caloriesBurned must not be negative"))]
    pub calories_burned: f64,
    /// When the session happened; defaults to now
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExerciseRequest {
    #[validate(length(min = 1, message = "exerciseName is required"))]
    pub exercise_name: String,
    #[validate(range(exclusive_min = 0.0, message = "duration must be greater than 0"))]
    pub duration: f64,
    #[validate(range(min = 0.0, message = "caloriesBurned must not be negative"))]
    pub calories_burned: f64,
}

async fn create_exercise(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ValidJson(body): ValidJson<CreateExerciseRequest>,
) -> Result<(StatusCode, Json<Exercise>)> {
    if let Some(owner) = body.user_id.as_deref() {
        if owner != user.user_id {
            tracing::warn!(
                user_id = %user.user_id,
                requested_owner = owner,
                "Attempt to log exercise for another user"
            );
            return Err(AppError::Forbidden(
                "Cannot log exercise for another user".to_string(),
            ));
        }
    }

    let timestamp = body.date.as_deref().map(parse_timestamp).transpose()?;
    let fields = ExerciseFields {
        exercise_name: body.exercise_name,
        duration: body.duration,
        calories_burned: body.calories_burned,
    };

    let exercise = state
        .exercises
        .create(&user.user_id, fields, timestamp)
        .await?;

    Ok((StatusCode::CREATED, Json(exercise)))
}

async fn list_exercises(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Exercise>>> {
    Ok(Json(state.exercises.list_for_user(&user.user_id).await?))
}

async fn get_exercise(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(exercise_id): Path<String>,
) -> Result<Json<Exercise>> {
    Ok(Json(state.exercises.get(&user.user_id, &exercise_id).await?))
}

async fn update_exercise(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(exercise_id): Path<String>,
    ValidJson(body): ValidJson<UpdateExerciseRequest>,
) -> Result<Json<Exercise>> {
    let fields = ExerciseFields {
        exercise_name: body.exercise_name,
        duration: body.duration,
        calories_burned: body.calories_burned,
    };

    Ok(Json(
        state
            .exercises
            .update(&user.user_id, &exercise_id, fields)
            .await?,
    ))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DeleteExerciseResponse {
    pub message: String,
    pub id: String,
}

async fn delete_exercise(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(exercise_id): Path<String>,
) -> Result<Json<DeleteExerciseResponse>> {
    state.exercises.delete(&user.user_id, &exercise_id).await?;

    Ok(Json(DeleteExerciseResponse {
        message: "Exercise deleted".to_string(),
        id: exercise_id,
    }))
}

// ─── Today ───────────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct TodayResponse {
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub date: NaiveDate,
    pub calories_burned: f64,
    pub exercises: Vec<Exercise>,
}

/// Calories burned today (UTC), recomputed on every request.
async fn today(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<TodayResponse>> {
    let day = state.exercises.on_day(&user.user_id, today_utc()).await?;

    Ok(Json(TodayResponse {
        date: day.date,
        calories_burned: day.calories_burned,
        exercises: day.exercises,
    }))
}

// ─── Estimate ────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct EstimateRequest {
    #[validate(length(min = 1, message = "activity is required"))]
    pub activity: String,
    /// Kilograms; defaults to the profile weight
    #[validate(range(exclusive_min = 0.0, message = "weight must be greater than 0"))]
    pub weight: Option<f64>,
    /// Minutes
    #[validate(range(exclusive_min = 0.0, message = "duration must be greater than 0"))]
    pub duration: Option<f64>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct EstimateResponse {
    pub exercise_name: String,
    pub duration: f64,
    pub calories_burned: f64,
}

/// Estimate calories for a described activity. Nothing is stored.
async fn estimate(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ValidJson(body): ValidJson<EstimateRequest>,
) -> Result<Json<EstimateResponse>> {
    let weight = match body.weight {
        Some(weight) => weight,
        None => state
            .logs
            .get_user(&user.user_id)
            .await?
            .profile
            .map(|p| p.weight)
            .unwrap_or(met::DEFAULT_WEIGHT_KG),
    };
    let duration = body.duration.unwrap_or(met::DEFAULT_DURATION_MIN);

    let estimate = met::estimate(&body.activity, weight, duration)?;
    tracing::debug!(
        user_id = %user.user_id,
        activity = %estimate.exercise_name,
        calories = estimate.calories_burned,
        "Estimated exercise calories"
    );

    Ok(Json(EstimateResponse {
        exercise_name: estimate.exercise_name,
        duration: estimate.duration,
        calories_burned: estimate.calories_burned,
    }))
}
