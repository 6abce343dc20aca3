// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fitto-Tracker: personal nutrition and fitness tracking backend.
//!
//! This crate provides the HTTP API for account management, energy target
//! computation and the weight, food and exercise logs.

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::Database;
use middleware::auth::{AuthGate, JwtAuthGate};
use services::{AccountService, ExerciseService, LogService, UserLocks};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub auth_gate: Arc<dyn AuthGate>,
    pub accounts: AccountService,
    pub logs: LogService,
    pub exercises: ExerciseService,
}

impl AppState {
    /// Wire up services over `db` with JWT authentication.
    pub fn new(config: Config, db: Database) -> Self {
        let auth_gate: Arc<dyn AuthGate> = Arc::new(JwtAuthGate::new(&config.jwt_signing_key));
        Self::with_auth_gate(config, db, auth_gate)
    }

    pub fn with_auth_gate(config: Config, db: Database, auth_gate: Arc<dyn AuthGate>) -> Self {
        let user_locks = UserLocks::default();

        Self {
            accounts: AccountService::new(
                db.clone(),
                &config.jwt_signing_key,
                config.jwt_ttl_secs,
            ),
            logs: LogService::new(db.clone(), user_locks),
            exercises: ExerciseService::new(db.clone()),
            auth_gate,
            db,
            config,
        }
    }
}
