// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile, target weight, weight log, food log and summary routes.
//!
//! All routes here require authentication and act on the caller's own record.

use crate::error::Result;
use crate::extract::ValidJson;
use crate::middleware::auth::AuthUser;
use crate::models::{FoodLog, Goal, Macros, Meal, ProfileInput, WeightEntry};
use crate::services::{DailySummary, FoodTotals, NewFood};
use crate::time_utils::{parse_date_param, today_utc};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, put},
    Extension, Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// User routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/user/setup", put(complete_setup))
        .route("/user/profile", get(get_profile))
        .route(
            "/user/target-weight",
            get(get_target_weight).put(set_target_weight),
        )
        .route("/user/weight-log", get(list_weight).post(add_weight))
        .route(
            "/user/weight-log/{id}",
            put(update_weight).delete(delete_weight),
        )
        .route("/user/food-log", get(list_food).post(add_food))
        .route("/user/food-log/{meal}/{id}", delete(delete_food))
        .route("/user/summary", get(get_summary))
        .route("/user/account", delete(delete_account))
}

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    /// `YYYY-MM-DD` or RFC3339; defaults to today (UTC)
    date: Option<String>,
}

// ─── Profile ─────────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SetupResponse {
    pub message: String,
    pub bmr: f64,
    pub tdee: f64,
}

async fn complete_setup(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ValidJson(input): ValidJson<ProfileInput>,
) -> Result<Json<SetupResponse>> {
    let profile = input.into_profile()?;
    let targets = state.logs.complete_setup(&user.user_id, profile).await?;

    Ok(Json(SetupResponse {
        message: "Profile setup complete".to_string(),
        bmr: targets.bmr,
        tdee: targets.tdee,
    }))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub username: String,
    pub setup_complete: bool,
    pub bmr: Option<f64>,
    pub tdee: Option<f64>,
    /// Null until setup completes
    pub macros: Option<Macros>,
    pub goal: Option<Goal>,
    pub rate: Option<f64>,
    pub target_weight: Option<f64>,
}

async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ProfileResponse>> {
    let record = state.logs.get_user(&user.user_id).await?;

    Ok(Json(ProfileResponse {
        username: record.username,
        setup_complete: record.setup_complete,
        bmr: record.targets.map(|t| t.bmr),
        tdee: record.targets.map(|t| t.tdee),
        macros: record.targets.map(|t| Macros::from_tdee(t.tdee)),
        goal: record.profile.as_ref().map(|p| p.goal),
        rate: record.profile.as_ref().and_then(|p| p.rate),
        target_weight: record.target_weight,
    }))
}

// ─── Target Weight ───────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TargetWeightRequest {
    #[validate(range(exclusive_min = 0.0, message = "targetWeight must be greater than 0"))]
    pub target_weight: f64,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct TargetWeightResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub target_weight: Option<f64>,
}

async fn set_target_weight(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ValidJson(body): ValidJson<TargetWeightRequest>,
) -> Result<Json<TargetWeightResponse>> {
    let target_weight = state
        .logs
        .set_target_weight(&user.user_id, body.target_weight)
        .await?;

    Ok(Json(TargetWeightResponse {
        message: Some("Target weight updated".to_string()),
        target_weight: Some(target_weight),
    }))
}

async fn get_target_weight(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<TargetWeightResponse>> {
    Ok(Json(TargetWeightResponse {
        message: None,
        target_weight: state.logs.get_target_weight(&user.user_id).await?,
    }))
}

// ─── Weight Log ──────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct WeightRequest {
    #[validate(range(exclusive_min = 0.0, message = "weight must be greater than 0"))]
    pub weight: f64,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct WeightLogResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub weight_log: Vec<WeightEntry>,
}

impl WeightLogResponse {
    fn new(weight_log: Vec<WeightEntry>) -> Self {
        Self {
            message: None,
            weight_log,
        }
    }
}

async fn list_weight(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<WeightLogResponse>> {
    let weight_log = state.logs.list_weight(&user.user_id).await?;
    Ok(Json(WeightLogResponse::new(weight_log)))
}

async fn add_weight(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ValidJson(body): ValidJson<WeightRequest>,
) -> Result<(StatusCode, Json<WeightLogResponse>)> {
    let weight_log = state.logs.add_weight(&user.user_id, body.weight).await?;

    Ok((
        StatusCode::CREATED,
        Json(WeightLogResponse {
            message: Some("Weight logged".to_string()),
            weight_log,
        }),
    ))
}

async fn update_weight(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(entry_id): Path<String>,
    ValidJson(body): ValidJson<WeightRequest>,
) -> Result<Json<WeightLogResponse>> {
    let weight_log = state
        .logs
        .update_weight(&user.user_id, &entry_id, body.weight)
        .await?;
    Ok(Json(WeightLogResponse::new(weight_log)))
}

async fn delete_weight(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(entry_id): Path<String>,
) -> Result<Json<WeightLogResponse>> {
    let weight_log = state.logs.delete_weight(&user.user_id, &entry_id).await?;
    Ok(Json(WeightLogResponse::new(weight_log)))
}

// ─── Food Log ────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct FoodRequest {
    pub meal: Meal,
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(range(min = 0.0, message = "calories must not be negative"))]
    pub calories: f64,
    #[validate(range(min = 0.0, message = "carbs must not be negative"))]
    pub carbs: Option<f64>,
    #[validate(range(min = 0.0, message = "protein must not be negative"))]
    pub protein: Option<f64>,
    #[validate(range(min = 0.0, message = "fat must not be negative"))]
    pub fat: Option<f64>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct FoodDayResponse {
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub date: NaiveDate,
    pub food_log: FoodLog,
    pub totals: FoodTotals,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct FoodLogResponse {
    pub message: String,
    pub food_log: FoodLog,
}

async fn list_food(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<DateQuery>,
) -> Result<Json<FoodDayResponse>> {
    let date = parse_date_param(query.date.as_deref(), today_utc())?;
    let food_log = state.logs.list_food(&user.user_id, date).await?;
    let totals = FoodTotals::from_log(&food_log);

    Ok(Json(FoodDayResponse {
        date,
        food_log,
        totals,
    }))
}

async fn add_food(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ValidJson(body): ValidJson<FoodRequest>,
) -> Result<(StatusCode, Json<FoodLogResponse>)> {
    let food = NewFood {
        name: body.name,
        calories: body.calories,
        carbs: body.carbs,
        protein: body.protein,
        fat: body.fat,
    };
    let food_log = state.logs.add_food(&user.user_id, body.meal, food).await?;

    Ok((
        StatusCode::CREATED,
        Json(FoodLogResponse {
            message: format!("Food added to {}", body.meal),
            food_log,
        }),
    ))
}

async fn delete_food(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path((meal, entry_id)): Path<(String, String)>,
) -> Result<Json<FoodLogResponse>> {
    let meal: Meal = meal.parse()?;
    let food_log = state
        .logs
        .delete_food(&user.user_id, meal, &entry_id)
        .await?;

    Ok(Json(FoodLogResponse {
        message: "Food entry removed".to_string(),
        food_log,
    }))
}

// ─── Summary ─────────────────────────────────────────────────

async fn get_summary(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<DateQuery>,
) -> Result<Json<DailySummary>> {
    let date = parse_date_param(query.date.as_deref(), today_utc())?;
    let record = state.logs.get_user(&user.user_id).await?;
    let exercises = state.exercises.list_for_user(&user.user_id).await?;

    Ok(Json(DailySummary::build(&record, &exercises, date)))
}

// ─── Account ─────────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DeleteAccountResponse {
    pub message: String,
}

/// Delete the caller's account, profile and embedded logs.
async fn delete_account(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<DeleteAccountResponse>> {
    tracing::info!(user_id = %user.user_id, "User-initiated account deletion");
    state.logs.delete_user(&user.user_id).await?;

    Ok(Json(DeleteAccountResponse {
        message: "Account deleted".to_string(),
    }))
}
