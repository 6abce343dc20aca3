// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account registration and password login.

use crate::db::{Database, UniqueField};
use crate::error::{AppError, Result};
use crate::middleware::auth::create_jwt;
use crate::models::User;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Hash a password using Argon2.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored hash. An unparseable hash never matches.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub setup_complete: bool,
}

#[derive(Clone)]
pub struct AccountService {
    db: Database,
    signing_key: Arc<[u8]>,
    token_ttl_secs: u64,
    /// Held across the uniqueness check and insert
    registration_lock: Arc<Mutex<()>>,
}

impl AccountService {
    pub fn new(db: Database, signing_key: &[u8], token_ttl_secs: u64) -> Self {
        Self {
            db,
            signing_key: Arc::from(signing_key),
            token_ttl_secs,
            registration_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Create an account. Returns the new user id.
    ///
    /// Field syntax is checked by the caller; this enforces uniqueness.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<String> {
        let username = username.trim();
        let email = email.trim().to_ascii_lowercase();

        let password_hash = hash_password(password)?;

        let _guard = self.registration_lock.lock().await;

        if self
            .db
            .find_user_by(UniqueField::Username, username)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("Username is already taken".to_string()));
        }
        if self
            .db
            .find_user_by(UniqueField::Email, &email)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "Email is already registered".to_string(),
            ));
        }

        let user = User::new(username.to_string(), email, password_hash);
        self.db.save_user(&user).await?;

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");
        Ok(user.id)
    }

    /// Check credentials and issue a session token.
    ///
    /// Unknown usernames and wrong passwords fail identically.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome> {
        let user = self
            .db
            .find_user_by(UniqueField::Username, username.trim())
            .await?;

        let user = match user {
            Some(user) if verify_password(password, &user.password_hash) => user,
            _ => {
                tracing::warn!(username = username.trim(), "Login failed");
                return Err(AppError::InvalidCredential);
            }
        };

        let token = create_jwt(&user, &self.signing_key, self.token_ttl_secs)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;

        tracing::info!(user_id = %user.id, "User logged in");
        Ok(LoginOutcome {
            token,
            setup_complete: user.setup_complete,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::auth::{AuthGate, JwtAuthGate};

    const KEY: &[u8] = b"accounts_test_signing_key_32byte";

    fn service() -> AccountService {
        AccountService::new(Database::new_in_memory(), KEY, 3600)
    }

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("wrong horse", &hash));
        assert!(!verify_password("correct horse", "not-a-phc-string"));
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let service = service();
        let user_id = service
            .register("jordan", "Jordan@Example.com", "password123")
            .await
            .unwrap();

        let outcome = service.login("jordan", "password123").await.unwrap();
        assert!(!outcome.setup_complete);

        let resolved = JwtAuthGate::new(KEY).resolve(Some(&outcome.token)).unwrap();
        assert_eq!(resolved.user_id, user_id);
    }

    #[tokio::test]
    async fn test_duplicate_username_or_email_conflicts() {
        let service = service();
        service
            .register("jordan", "jordan@example.com", "password123")
            .await
            .unwrap();

        assert!(matches!(
            service
                .register("jordan", "other@example.com", "password123")
                .await,
            Err(AppError::Conflict(_))
        ));
        assert!(matches!(
            service
                .register("someone", "JORDAN@example.com", "password123")
                .await,
            Err(AppError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_concurrent_registration_of_same_name() {
        let service = service();
        let mut handles = vec![];
        for i in 0..5 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                service
                    .register("racer", &format!("racer{}@example.com", i), "password123")
                    .await
            }));
        }

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                created += 1;
            }
        }
        assert_eq!(created, 1);
    }

    #[tokio::test]
    async fn test_bad_login_is_invalid_credential() {
        let service = service();
        service
            .register("jordan", "jordan@example.com", "password123")
            .await
            .unwrap();

        assert!(matches!(
            service.login("jordan", "nope-nope").await,
            Err(AppError::InvalidCredential)
        ));
        assert!(matches!(
            service.login("nobody", "password123").await,
            Err(AppError::InvalidCredential)
        ));
    }
}
