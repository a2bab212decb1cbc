//! Login against the plant user table

use bcrypt::verify;
use std::sync::Arc;

use shared::{LoginRequest, UserProfile};

use crate::error::{AppError, AppResult};
use crate::store::DataStore;

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn DataStore>,
}

impl AuthService {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    /// Check username and password, returning the user's profile.
    ///
    /// Unknown users, inactive users and wrong passwords all fail with
    /// [`AppError::InvalidCredentials`].
    pub async fn login(&self, input: LoginRequest) -> AppResult<UserProfile> {
        let username = input.username.ok_or_else(|| AppError::missing_field("Username"))?;
        let password = input.password.ok_or_else(|| AppError::missing_field("Password"))?;

        let user = self
            .store
            .find_user(&username)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !user.activo {
            tracing::debug!("Login rejected for inactive user {}", user.username);
            return Err(AppError::InvalidCredentials);
        }

        let valid = verify(&password, &user.password_hash).unwrap_or_else(|e| {
            tracing::warn!("Stored password hash of {} is unusable: {}", user.username, e);
            false
        });
        if !valid {
            return Err(AppError::InvalidCredentials);
        }

        tracing::info!("User {} logged in", user.username);
        Ok(user.profile)
    }
}
