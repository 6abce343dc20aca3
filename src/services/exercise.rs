// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Exercise log: one stored document per session, owned by reference.

use crate::db::Database;
use crate::error::{AppError, Result};
use crate::models::log::new_entry_id;
use crate::models::Exercise;
use crate::services::progress::{calories_burned_on, exercises_on};
use crate::time_utils::format_utc_rfc3339;
use chrono::{DateTime, NaiveDate, Utc};

/// Fields a caller may set on an exercise.
#[derive(Debug, Clone)]
pub struct ExerciseFields {
    pub exercise_name: String,
    pub duration: f64,
    pub calories_burned: f64,
}

impl ExerciseFields {
    fn validate(&self) -> Result<()> {
        if self.exercise_name.trim().is_empty() {
            return Err(AppError::Validation(
                "exerciseName is required".to_string(),
            ));
        }
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(AppError::Validation(
                "duration must be greater than 0".to_string(),
            ));
        }
        if !self.calories_burned.is_finite() || self.calories_burned < 0.0 {
            return Err(AppError::Validation(
                "caloriesBurned must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Sessions logged on one day.
#[derive(Debug, Clone)]
pub struct DayExercises {
    pub date: NaiveDate,
    pub calories_burned: f64,
    pub exercises: Vec<Exercise>,
}

#[derive(Clone)]
pub struct ExerciseService {
    db: Database,
}

impl ExerciseService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Log a session for `owner`, stamped now unless `timestamp` is given.
    pub async fn create(
        &self,
        owner: &str,
        fields: ExerciseFields,
        timestamp: Option<DateTime<Utc>>,
    ) -> Result<Exercise> {
        fields.validate()?;

        let exercise = Exercise {
            id: new_entry_id(),
            user_id: owner.to_string(),
            exercise_name: fields.exercise_name.trim().to_string(),
            duration: fields.duration,
            calories_burned: fields.calories_burned,
            timestamp: timestamp.unwrap_or_else(Utc::now),
        };
        self.db.save_exercise(&exercise).await?;

        tracing::info!(
            user_id = owner,
            exercise_id = %exercise.id,
            timestamp = %format_utc_rfc3339(exercise.timestamp),
            "Exercise logged"
        );
        Ok(exercise)
    }

    pub async fn list_for_user(&self, owner: &str) -> Result<Vec<Exercise>> {
        let exercises = self.db.list_exercises_for_user(owner).await?;
        tracing::debug!(user_id = owner, count = exercises.len(), "Fetched exercises");
        Ok(exercises)
    }

    /// Look up an exercise, treating other users' sessions as absent.
    pub async fn get(&self, owner: &str, exercise_id: &str) -> Result<Exercise> {
        self.db
            .get_exercise(exercise_id)
            .await?
            .filter(|exercise| exercise.user_id == owner)
            .ok_or_else(|| AppError::NotFound(format!("Exercise {} not found", exercise_id)))
    }

    /// Replace name, duration and calories. Owner and timestamp never change.
    pub async fn update(
        &self,
        owner: &str,
        exercise_id: &str,
        fields: ExerciseFields,
    ) -> Result<Exercise> {
        fields.validate()?;

        let mut exercise = self.get(owner, exercise_id).await?;
        exercise.exercise_name = fields.exercise_name.trim().to_string();
        exercise.duration = fields.duration;
        exercise.calories_burned = fields.calories_burned;
        self.db.save_exercise(&exercise).await?;

        tracing::info!(user_id = owner, exercise_id, "Exercise updated");
        Ok(exercise)
    }

    /// Delete one of the caller's exercises. Missing ids succeed.
    pub async fn delete(&self, owner: &str, exercise_id: &str) -> Result<()> {
        match self.db.get_exercise(exercise_id).await? {
            None => {
                tracing::debug!(user_id = owner, exercise_id, "Exercise already absent");
                Ok(())
            }
            Some(exercise) if exercise.user_id != owner => Err(AppError::NotFound(format!(
                "Exercise {} not found",
                exercise_id
            ))),
            Some(_) => {
                self.db.delete_exercise(exercise_id).await?;
                tracing::info!(user_id = owner, exercise_id, "Exercise deleted");
                Ok(())
            }
        }
    }

    /// Sessions and total kcal burned on `date` (UTC).
    pub async fn on_day(&self, owner: &str, date: NaiveDate) -> Result<DayExercises> {
        let all = self.db.list_exercises_for_user(owner).await?;
        Ok(DayExercises {
            date,
            calories_burned: calories_burned_on(&all, date),
            exercises: exercises_on(&all, date),
        })
    }
}
