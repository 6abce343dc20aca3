// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod exercise;
pub mod log;
pub mod profile;
pub mod user;

pub use exercise::Exercise;
pub use log::{FoodEntry, FoodLog, Meal, WeightEntry};
pub use profile::{ActivityLevel, EnergyTargets, Gender, Goal, Macros, Profile, ProfileInput};
pub use user::User;
