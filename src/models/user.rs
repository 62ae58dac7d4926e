// src/models/user.rs

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, types::Json};
use validator::Validate;

/// Label used when no better display name can be derived.
pub const DEFAULT_DISPLAY_NAME: &str = "Anonymous";

/// Represents the 'users' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,

    /// Unique username.
    pub username: String,

    /// Argon2 password hash.
    /// Skipped during serialization to prevent leaking sensitive data.
    #[serde(skip)]
    pub password: String,

    pub email: Option<String>,

    /// Free-form profile fields (e.g. "first_name").
    pub user_metadata: Json<HashMap<String, String>>,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// The signed-in quiz taker, passed explicitly into session start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub user_id: i64,
    pub email: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl UserIdentity {
    /// Name recorded next to each answer.
    ///
    /// Fallback order: `first_name`, `firstName`, the local part of the email,
    /// then [`DEFAULT_DISPLAY_NAME`].
    pub fn display_name(&self) -> String {
        ["first_name", "firstName"]
            .iter()
            .filter_map(|key| self.metadata.get(*key))
            .map(|v| v.trim())
            .find(|v| !v.is_empty())
            .map(str::to_string)
            .or_else(|| {
                self.email
                    .as_deref()
                    .and_then(|e| e.split('@').next())
                    .map(str::trim)
                    .filter(|local| !local.is_empty())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_string())
    }
}

/// DTO for creating a new user (Registration).
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(
        min = 3,
        max = 50,
        message = "Username length must be between 3 and 50 characters."
    ))]
    pub username: String,
    #[validate(length(
        min = 4,
        max = 128,
        message = "Password length must be between 4 and 128 characters."
    ))]
    pub password: String,
    #[validate(email(message = "Email address is not valid."))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
}

/// DTO for user login.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 50))]
    pub username: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// Aggregate counters for the current user.
#[derive(Debug, Serialize, Deserialize)]
pub struct MeResponse {
    pub user_id: i64,
    pub display_name: String,
    pub questions_answered: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(email: Option<&str>, meta: &[(&str, &str)]) -> UserIdentity {
        UserIdentity {
            user_id: 1,
            email: email.map(str::to_string),
            metadata: meta
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn display_name_prefers_first_name() {
        let id = identity(
            Some("ruth@example.com"),
            &[("first_name", "Ruth"), ("firstName", "Naomi")],
        );
        assert_eq!(id.display_name(), "Ruth");
    }

    #[test]
    fn display_name_falls_back_to_camel_case_key() {
        let id = identity(Some("ruth@example.com"), &[("firstName", "Naomi")]);
        assert_eq!(id.display_name(), "Naomi");
    }

    #[test]
    fn display_name_uses_email_local_part() {
        let id = identity(Some("boaz@example.com"), &[("first_name", "  ")]);
        assert_eq!(id.display_name(), "boaz");
    }

    #[test]
    fn display_name_defaults() {
        assert_eq!(identity(None, &[]).display_name(), DEFAULT_DISPLAY_NAME);
        assert_eq!(identity(Some("@example.com"), &[]).display_name(), DEFAULT_DISPLAY_NAME);
    }
}
