// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile setup and the logs embedded in the user record.
//!
//! Every mutation is a read-modify-write of the whole user document. To
//! keep concurrent requests for the same user from overwriting each
//! other's changes, mutations take a per-user lock for the duration of
//! the fetch → mutate → save cycle. Different users never contend.

use crate::db::Database;
use crate::error::{AppError, Result};
use crate::models::log::{new_entry_id, with_all_meals};
use crate::models::{EnergyTargets, FoodEntry, FoodLog, Meal, Profile, User, WeightEntry};
use crate::services::energy::compute_targets;
use crate::time_utils::utc_date;
use chrono::{NaiveDate, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Per-user mutation locks, shared by every service that writes user records.
pub type UserLocks = Arc<DashMap<String, Arc<Mutex<()>>>>;

/// Food item as submitted for logging.
#[derive(Debug, Clone)]
pub struct NewFood {
    pub name: String,
    pub calories: f64,
    pub carbs: Option<f64>,
    pub protein: Option<f64>,
    pub fat: Option<f64>,
}

/// Food log restricted to entries whose UTC calendar date is `date`.
///
/// Keeps the meal-keyed shape, with every meal present even when empty.
pub fn filter_food_log(log: &FoodLog, date: NaiveDate) -> FoodLog {
    with_all_meals(log)
        .into_iter()
        .map(|(meal, entries)| {
            let entries = entries
                .into_iter()
                .filter(|entry| utc_date(&entry.timestamp) == date)
                .collect();
            (meal, entries)
        })
        .collect()
}

fn require_positive(value: f64, field: &str) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "{} must be greater than 0",
            field
        )))
    }
}

fn require_non_negative(value: Option<f64>, field: &str) -> Result<()> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(AppError::Validation(format!(
            "{} must not be negative",
            field
        ))),
        _ => Ok(()),
    }
}

/// Profile, target weight, weight log and food log operations.
#[derive(Clone)]
pub struct LogService {
    db: Database,
    user_locks: UserLocks,
}

impl LogService {
    pub fn new(db: Database, user_locks: UserLocks) -> Self {
        Self { db, user_locks }
    }

    /// Fetch a user or fail with `NotFound`.
    pub async fn get_user(&self, user_id: &str) -> Result<User> {
        self.db
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))
    }

    /// Run `mutate` against the stored user and persist the result.
    ///
    /// If `mutate` fails nothing is written. If the write fails the stored
    /// record is left as it was.
    async fn update_user<T, F>(&self, user_id: &str, mutate: F) -> Result<T>
    where
        F: FnOnce(&mut User) -> Result<T>,
    {
        let lock = self
            .user_locks
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        let _guard = lock.lock().await;

        let mut user = self.get_user(user_id).await?;
        let output = mutate(&mut user)?;
        self.db.save_user(&user).await?;
        Ok(output)
    }

    // ─── Profile ─────────────────────────────────────────────────

    /// Store a completed profile and its freshly computed targets.
    ///
    /// Re-submission is allowed and replaces the previous targets.
    pub async fn complete_setup(&self, user_id: &str, profile: Profile) -> Result<EnergyTargets> {
        let targets = compute_targets(&profile)?;

        self.update_user(user_id, |user| {
            user.profile = Some(profile);
            user.targets = Some(targets);
            user.setup_complete = true;
            Ok(())
        })
        .await?;

        tracing::info!(
            user_id,
            bmr = targets.bmr,
            tdee = targets.tdee,
            "Profile setup completed"
        );
        Ok(targets)
    }

    pub async fn set_target_weight(&self, user_id: &str, target_weight: f64) -> Result<f64> {
        require_positive(target_weight, "targetWeight")?;

        self.update_user(user_id, |user| {
            user.target_weight = Some(target_weight);
            Ok(())
        })
        .await?;

        tracing::info!(user_id, target_weight, "Target weight updated");
        Ok(target_weight)
    }

    pub async fn get_target_weight(&self, user_id: &str) -> Result<Option<f64>> {
        Ok(self.get_user(user_id).await?.target_weight)
    }

    // ─── Weight Log ──────────────────────────────────────────────

    pub async fn list_weight(&self, user_id: &str) -> Result<Vec<WeightEntry>> {
        let user = self.get_user(user_id).await?;
        tracing::debug!(user_id, count = user.weight_log.len(), "Fetched weight log");
        Ok(user.weight_log)
    }

    /// Append a measurement stamped with the current time.
    pub async fn add_weight(&self, user_id: &str, weight: f64) -> Result<Vec<WeightEntry>> {
        require_positive(weight, "weight")?;

        let entry = WeightEntry {
            id: new_entry_id(),
            weight,
            timestamp: Utc::now(),
        };
        let entry_id = entry.id.clone();

        let log = self
            .update_user(user_id, |user| {
                user.weight_log.push(entry);
                Ok(user.weight_log.clone())
            })
            .await?;

        tracing::info!(user_id, entry_id = %entry_id, weight, "Weight logged");
        Ok(log)
    }

    /// Change the weight of an existing entry. Id and timestamp are kept.
    pub async fn update_weight(
        &self,
        user_id: &str,
        entry_id: &str,
        weight: f64,
    ) -> Result<Vec<WeightEntry>> {
        require_positive(weight, "weight")?;

        let log = self
            .update_user(user_id, |user| {
                let entry = user
                    .weight_log
                    .iter_mut()
                    .find(|entry| entry.id == entry_id)
                    .ok_or_else(|| {
                        AppError::NotFound(format!("Weight entry {} not found", entry_id))
                    })?;
                entry.weight = weight;
                Ok(user.weight_log.clone())
            })
            .await?;

        tracing::info!(user_id, entry_id, weight, "Weight entry updated");
        Ok(log)
    }

    /// Remove an entry. Removing an id that is not present is not an error.
    pub async fn delete_weight(&self, user_id: &str, entry_id: &str) -> Result<Vec<WeightEntry>> {
        let (log, removed) = self
            .update_user(user_id, |user| {
                let before = user.weight_log.len();
                user.weight_log.retain(|entry| entry.id != entry_id);
                Ok((user.weight_log.clone(), before - user.weight_log.len()))
            })
            .await?;

        tracing::info!(user_id, entry_id, removed, "Weight entry deleted");
        Ok(log)
    }

    // ─── Food Log ────────────────────────────────────────────────

    /// Food log for one calendar day (UTC).
    pub async fn list_food(&self, user_id: &str, date: NaiveDate) -> Result<FoodLog> {
        let user = self.get_user(user_id).await?;
        tracing::debug!(user_id, date = %date, "Fetched food log");
        Ok(filter_food_log(&user.food_log, date))
    }

    /// Append a food item to a meal, stamped with the current time.
    ///
    /// Returns the complete (unfiltered) food log.
    pub async fn add_food(&self, user_id: &str, meal: Meal, food: NewFood) -> Result<FoodLog> {
        if food.name.trim().is_empty() {
            return Err(AppError::Validation("name is required".to_string()));
        }
        if !food.calories.is_finite() || food.calories < 0.0 {
            return Err(AppError::Validation(
                "calories must not be negative".to_string(),
            ));
        }
        require_non_negative(food.carbs, "carbs")?;
        require_non_negative(food.protein, "protein")?;
        require_non_negative(food.fat, "fat")?;

        let entry = FoodEntry {
            id: new_entry_id(),
            name: food.name.trim().to_string(),
            calories: food.calories,
            carbs: food.carbs,
            protein: food.protein,
            fat: food.fat,
            timestamp: Utc::now(),
        };
        let entry_id = entry.id.clone();

        let log = self
            .update_user(user_id, |user| {
                user.food_log
                    .entry(meal.as_str().to_string())
                    .or_default()
                    .push(entry);
                Ok(with_all_meals(&user.food_log))
            })
            .await?;

        tracing::info!(user_id, meal = %meal, entry_id = %entry_id, "Food logged");
        Ok(log)
    }

    /// Remove a food entry from a meal. Missing ids are not an error.
    pub async fn delete_food(&self, user_id: &str, meal: Meal, entry_id: &str) -> Result<FoodLog> {
        let (log, removed) = self
            .update_user(user_id, |user| {
                let removed = match user.food_log.get_mut(meal.as_str()) {
                    Some(entries) => {
                        let before = entries.len();
                        entries.retain(|entry| entry.id != entry_id);
                        before - entries.len()
                    }
                    None => 0,
                };
                Ok((with_all_meals(&user.food_log), removed))
            })
            .await?;

        tracing::info!(user_id, meal = %meal, entry_id, removed, "Food entry deleted");
        Ok(log)
    }

    // ─── Account ─────────────────────────────────────────────────

    /// Delete the user record and its embedded logs.
    ///
    /// Holds the user's lock so no in-flight mutation can write the record
    /// back after it is gone.
    pub async fn delete_user(&self, user_id: &str) -> Result<()> {
        let lock = self
            .user_locks
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        {
            let _guard = lock.lock().await;
            self.get_user(user_id).await?;
            self.db.delete_user(user_id).await?;
        }

        self.user_locks.remove(user_id);
        tracing::info!(user_id, "User account deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActivityLevel, Gender, Goal};
    use chrono::{Duration, TimeZone};

    async fn service_with_user() -> (LogService, String) {
        let db = Database::new_in_memory();
        let user = User::new("pat".into(), "pat@example.com".into(), "hash".into());
        db.save_user(&user).await.unwrap();
        (LogService::new(db, UserLocks::default()), user.id)
    }

    fn apple() -> NewFood {
        NewFood {
            name: "Apple".into(),
            calories: 95.0,
            carbs: Some(25.0),
            protein: None,
            fat: None,
        }
    }

    #[tokio::test]
    async fn test_add_then_list_weight() {
        let (service, user_id) = service_with_user().await;

        let first = service.add_weight(&user_id, 82.5).await.unwrap();
        let second = service.add_weight(&user_id, 81.0).await.unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 2);
        assert_ne!(second[0].id, second[1].id);

        let listed = service.list_weight(&user_id).await.unwrap();
        assert_eq!(listed, second);
        assert_eq!(listed[1].weight, 81.0);
    }

    #[tokio::test]
    async fn test_weight_must_be_positive() {
        let (service, user_id) = service_with_user().await;
        for bad in [0.0, -3.0, f64::NAN] {
            assert!(matches!(
                service.add_weight(&user_id, bad).await,
                Err(AppError::Validation(_))
            ));
        }
        assert!(service.list_weight(&user_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_weight_keeps_identity() {
        let (service, user_id) = service_with_user().await;
        let log = service.add_weight(&user_id, 90.0).await.unwrap();
        let original = log[0].clone();

        let updated = service
            .update_weight(&user_id, &original.id, 89.2)
            .await
            .unwrap();
        assert_eq!(updated[0].id, original.id);
        assert_eq!(updated[0].timestamp, original.timestamp);
        assert_eq!(updated[0].weight, 89.2);
    }

    #[tokio::test]
    async fn test_update_missing_weight_entry_not_found() {
        let (service, user_id) = service_with_user().await;
        let err = service
            .update_weight(&user_id, "no-such-entry", 70.0)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_weight_is_idempotent_and_keeps_other_ids() {
        let (service, user_id) = service_with_user().await;
        service.add_weight(&user_id, 80.0).await.unwrap();
        service.add_weight(&user_id, 79.0).await.unwrap();
        let log = service.add_weight(&user_id, 78.0).await.unwrap();
        let ids: Vec<String> = log.iter().map(|e| e.id.clone()).collect();

        let after = service.delete_weight(&user_id, &ids[0]).await.unwrap();
        assert_eq!(after.len(), 2);
        assert_eq!(after[0].id, ids[1]);
        assert_eq!(after[1].id, ids[2]);

        let again = service.delete_weight(&user_id, &ids[0]).await.unwrap();
        assert_eq!(again, after);
    }

    #[tokio::test]
    async fn test_unknown_user_not_found() {
        let (service, _) = service_with_user().await;
        assert!(matches!(
            service.add_weight("ghost", 70.0).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.list_food("ghost", Utc::now().date_naive()).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_concurrent_appends_are_not_lost() {
        let (service, user_id) = service_with_user().await;

        let mut handles = vec![];
        for i in 0..20 {
            let service = service.clone();
            let user_id = user_id.clone();
            handles.push(tokio::spawn(async move {
                service.add_weight(&user_id, 70.0 + i as f64).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(service.list_weight(&user_id).await.unwrap().len(), 20);
    }

    #[tokio::test]
    async fn test_food_logged_today_is_listed_today_only() {
        let (service, user_id) = service_with_user().await;
        let full = service
            .add_food(&user_id, Meal::Breakfast, apple())
            .await
            .unwrap();
        assert_eq!(full.len(), 4);
        assert_eq!(full["breakfast"].len(), 1);

        let today = Utc::now().date_naive();
        let listed = service.list_food(&user_id, today).await.unwrap();
        assert_eq!(listed["breakfast"].len(), 1);
        assert!(listed["lunch"].is_empty());

        let yesterday = today - Duration::days(1);
        let listed = service.list_food(&user_id, yesterday).await.unwrap();
        assert!(listed.values().all(|entries| entries.is_empty()));
        assert_eq!(listed.len(), 4);
    }

    #[tokio::test]
    async fn test_add_food_validation() {
        let (service, user_id) = service_with_user().await;
        let nameless = NewFood {
            name: "   ".into(),
            ..apple()
        };
        assert!(matches!(
            service.add_food(&user_id, Meal::Lunch, nameless).await,
            Err(AppError::Validation(_))
        ));

        let negative = NewFood {
            fat: Some(-1.0),
            ..apple()
        };
        assert!(matches!(
            service.add_food(&user_id, Meal::Lunch, negative).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_food_by_meal() {
        let (service, user_id) = service_with_user().await;
        service
            .add_food(&user_id, Meal::Dinner, apple())
            .await
            .unwrap();
        let log = service
            .add_food(&user_id, Meal::Dinner, apple())
            .await
            .unwrap();
        let first_id = log["dinner"][0].id.clone();
        let second_id = log["dinner"][1].id.clone();

        // Wrong meal: nothing removed
        let log = service
            .delete_food(&user_id, Meal::Lunch, &first_id)
            .await
            .unwrap();
        assert_eq!(log["dinner"].len(), 2);

        let log = service
            .delete_food(&user_id, Meal::Dinner, &first_id)
            .await
            .unwrap();
        assert_eq!(log["dinner"].len(), 1);
        assert_eq!(log["dinner"][0].id, second_id);
    }

    #[test]
    fn test_filter_food_log_uses_utc_date() {
        let mut log = FoodLog::new();
        let late = Utc.with_ymd_and_hms(2024, 1, 15, 23, 59, 59).unwrap();
        let early_next = Utc.with_ymd_and_hms(2024, 1, 16, 0, 0, 0).unwrap();
        log.insert(
            "snack".into(),
            vec![
                FoodEntry {
                    id: "a".into(),
                    name: "Chips".into(),
                    calories: 150.0,
                    carbs: None,
                    protein: None,
                    fat: None,
                    timestamp: late,
                },
                FoodEntry {
                    id: "b".into(),
                    name: "Nuts".into(),
                    calories: 200.0,
                    carbs: None,
                    protein: None,
                    fat: None,
                    timestamp: early_next,
                },
            ],
        );

        let day = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let filtered = filter_food_log(&log, day);
        assert_eq!(filtered["snack"].len(), 1);
        assert_eq!(filtered["snack"][0].id, "a");
        assert!(filtered["breakfast"].is_empty());
    }

    #[tokio::test]
    async fn test_setup_resubmission_overwrites_targets() {
        let (service, user_id) = service_with_user().await;
        let mut profile = Profile {
            age: 30,
            height: 180.0,
            weight: 80.0,
            gender: Gender::Male,
            activity_level: ActivityLevel::Sedentary,
            goal: Goal::Maintain,
            rate: None,
        };

        let first = service.complete_setup(&user_id, profile.clone()).await.unwrap();
        profile.activity_level = ActivityLevel::ExtraActive;
        let second = service.complete_setup(&user_id, profile).await.unwrap();
        assert!(second.tdee > first.tdee);

        let user = service.get_user(&user_id).await.unwrap();
        assert!(user.setup_complete);
        assert_eq!(user.targets, Some(second));
    }

    #[tokio::test]
    async fn test_failed_setup_leaves_user_untouched() {
        let (service, user_id) = service_with_user().await;
        let profile = Profile {
            age: 30,
            height: 180.0,
            weight: 80.0,
            gender: Gender::Female,
            activity_level: ActivityLevel::Sedentary,
            goal: Goal::Lose,
            rate: None,
        };
        assert!(service.complete_setup(&user_id, profile).await.is_err());

        let user = service.get_user(&user_id).await.unwrap();
        assert!(!user.setup_complete);
        assert!(user.targets.is_none());
    }

    #[tokio::test]
    async fn test_target_weight_round_trip() {
        let (service, user_id) = service_with_user().await;
        assert_eq!(service.get_target_weight(&user_id).await.unwrap(), None);
        service.set_target_weight(&user_id, 72.5).await.unwrap();
        assert_eq!(
            service.get_target_weight(&user_id).await.unwrap(),
            Some(72.5)
        );
        assert!(matches!(
            service.set_target_weight(&user_id, 0.0).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_user() {
        let (service, user_id) = service_with_user().await;
        service.add_weight(&user_id, 70.0).await.unwrap();
        service.delete_user(&user_id).await.unwrap();
        assert!(matches!(
            service.list_weight(&user_id).await,
            Err(AppError::NotFound(_))
        ));
    }
}
