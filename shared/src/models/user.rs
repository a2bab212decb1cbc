//! Plant users

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of `POST /login`
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "PascalCase")]
pub struct LoginRequest {
    #[validate(required, length(min = 1, max = 100))]
    pub username: Option<String>,

    #[validate(required, length(min = 1))]
    pub password: Option<String>,
}

/// Profile returned after a successful login
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct UserProfile {
    pub nombre: String,
    pub correo: Option<String>,
    pub plan_activo: bool,
}

/// Stored credentials of a user
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub username: String,
    /// bcrypt hash (salt embedded)
    pub password_hash: String,
    pub activo: bool,
    pub profile: UserProfile,
}
