// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod accounts;
pub mod energy;
pub mod exercise;
pub mod logs;
pub mod met;
pub mod progress;

pub use accounts::{AccountService, LoginOutcome};
pub use exercise::{DayExercises, ExerciseFields, ExerciseService};
pub use logs::{LogService, NewFood, UserLocks};
pub use progress::{DailySummary, FoodTotals};
