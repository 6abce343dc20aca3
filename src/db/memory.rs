// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Process-local document store.
//!
//! Documents are cloned in and out, so callers see the same
//! whole-record semantics as with Firestore.

use crate::db::UniqueField;
use crate::models::{Exercise, User};
use dashmap::DashMap;

#[derive(Default)]
pub struct MemoryStore {
    users: DashMap<String, User>,
    exercises: DashMap<String, Exercise>,
}

impl MemoryStore {
    pub fn get_user(&self, user_id: &str) -> Option<User> {
        self.users.get(user_id).map(|user| user.clone())
    }

    pub fn find_user_by(&self, field: UniqueField, value: &str) -> Option<User> {
        self.users
            .iter()
            .find(|entry| field.value_of(entry.value()) == value)
            .map(|entry| entry.value().clone())
    }

    pub fn save_user(&self, user: &User) {
        self.users.insert(user.id.clone(), user.clone());
    }

    pub fn delete_user(&self, user_id: &str) {
        self.users.remove(user_id);
    }

    pub fn get_exercise(&self, exercise_id: &str) -> Option<Exercise> {
        self.exercises
            .get(exercise_id)
            .map(|exercise| exercise.clone())
    }

    pub fn list_exercises_for_user(&self, user_id: &str) -> Vec<Exercise> {
        self.exercises
            .iter()
            .filter(|entry| entry.value().user_id == user_id)
            .map(|entry| entry.value().clone())
            .collect()
    }

    pub fn save_exercise(&self, exercise: &Exercise) {
        self.exercises
            .insert(exercise.id.clone(), exercise.clone());
    }

    pub fn delete_exercise(&self, exercise_id: &str) {
        self.exercises.remove(exercise_id);
    }
}
