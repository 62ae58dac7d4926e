// src/handlers/auth.rs

use std::collections::HashMap;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use sqlx::{PgPool, types::Json as SqlJson};
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::user::{CreateUserRequest, LoginRequest, User},
    utils::{
        hash::{hash_password, verify_password},
        jwt::sign_jwt,
    },
};

/// Registers a new quiz account.
///
/// Hashes the password using Argon2 before storing it.
/// The optional first name is kept in the profile metadata and used as the display name.
/// Returns 201 Created and the user object (excluding password).
pub async fn register(
    State(pool): State<PgPool>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let hashed_password = hash_password(&payload.password)?;

    let mut metadata = HashMap::new();
    if let Some(first_name) = payload
        .first_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
    {
        metadata.insert("first_name".to_string(), first_name.to_string());
    }

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, password, email, user_metadata)
        VALUES ($1, $2, $3, $4)
        RETURNING id, username, password, email, user_metadata, created_at
        "#,
    )
    .bind(&payload.username)
    .bind(&hashed_password)
    .bind(&payload.email)
    .bind(SqlJson(&metadata))
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        // Postgres error code for unique violation is 23505
        if e.to_string().contains("unique constraint") || e.to_string().contains("23505") {
            AppError::Conflict(format!("Username '{}' already exists", payload.username))
        } else {
            tracing::error!("Failed to register user: {:?}", e);
            AppError::from(e)
        }
    })?;

    tracing::info!("Registered user {} ({})", user.id, user.username);
    Ok((StatusCode::CREATED, Json(user)))
}

/// Authenticates a user and returns a JWT token.
///
/// The token carries the identity used to attribute quiz answers.
pub async fn login(
    State(pool): State<PgPool>,
    State(config): State<Config>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, password, email, user_metadata, created_at
        FROM users
        WHERE username = $1
        "#,
    )
    .bind(&payload.username)
    .fetch_optional(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Login DB error: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    let user = user.ok_or(AppError::AuthError("User not found".to_string()))?;

    let is_valid = verify_password(&payload.password, &user.password)?;

    if !is_valid {
        return Err(AppError::AuthError("Invalid password".to_string()));
    }

    let token = sign_jwt(&user, &config.jwt_secret, config.jwt_expiration)?;

    Ok(Json(json!({
        "token": token,
        "type": "Bearer",
    })))
}
