// src/utils/jwt.rs

use std::{
    collections::HashMap,
    time::{SystemTime, UNIX_EPOCH},
};

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{
    config::Config,
    error::AppError,
    models::user::{User, UserIdentity},
};

/// JWT Claims structure.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Claims {
    /// Subject - Stores the User ID (as string).
    pub sub: String,
    /// Expiration time as Unix timestamp.
    pub exp: usize,
    #[serde(default)]
    pub email: Option<String>,
    /// Profile fields used to derive a display name.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl Claims {
    pub fn user_id(&self) -> Result<i64, AppError> {
        self.sub
            .parse::<i64>()
            .map_err(|_| AppError::AuthError("Invalid token subject".to_string()))
    }

    pub fn identity(&self) -> Result<UserIdentity, AppError> {
        Ok(UserIdentity {
            user_id: self.user_id()?,
            email: self.email.clone(),
            metadata: self.metadata.clone(),
        })
    }
}

/// Identity of the caller on routes where signing in is optional.
/// Always present in request extensions after `identity_middleware`.
#[derive(Debug, Clone, Default)]
pub struct Viewer(pub Option<UserIdentity>);

/// Signs a new JWT for the user.
pub fn sign_jwt(user: &User, secret: &str, expiration_seconds: u64) -> Result<String, AppError> {
    // Calculate expiration: current time + expiration_seconds
    let expiration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .as_secs() as usize
        + expiration_seconds as usize;

    let claims = Claims {
        sub: user.id.to_string(), // Store User ID in 'sub' claim
        exp: expiration,
        email: user.email.clone(),
        metadata: user.user_metadata.0.clone(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(e.to_string()))
}

/// Verifies and decodes a JWT string.
///
/// Returns the `Claims` if valid, otherwise returns an `AppError`.
pub fn verify_jwt(token: &str, secret: &str) -> Result<Claims, AppError> {
    let token_data = decode(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::AuthError("Invalid token".to_string()))?;

    Ok(token_data.claims)
}

/// What the `Authorization` header of a request carries.
#[derive(Debug, PartialEq, Eq)]
enum Credentials<'a> {
    Missing,
    Bearer(&'a str),
    Malformed,
}

/// Reads the `Authorization` header. The scheme is matched case-insensitively.
fn credentials(req: &Request<Body>) -> Credentials<'_> {
    let Some(value) = req.headers().get(header::AUTHORIZATION) else {
        return Credentials::Missing;
    };
    let Ok(value) = value.to_str() else {
        return Credentials::Malformed;
    };
    match value.trim().split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") => {
            let token = token.trim();
            if token.is_empty() {
                Credentials::Malformed
            } else {
                Credentials::Bearer(token)
            }
        }
        _ => Credentials::Malformed,
    }
}

/// Axum Middleware: Authentication.
///
/// Intercepts requests, validates the 'Authorization: Bearer <token>' header.
/// If valid, injects `Claims` into the request extensions for handlers to use.
/// If invalid, returns 401 Unauthorized.
pub async fn auth_middleware(
    State(config): State<Config>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let Credentials::Bearer(token) = credentials(&req) else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    match verify_jwt(token, &config.jwt_secret) {
        Ok(claims) => {
            req.extensions_mut().insert(claims);
            Ok(next.run(req).await)
        }
        Err(_) => Err(StatusCode::UNAUTHORIZED),
    }
}

/// Axum Middleware: Optional authentication.
///
/// Only a request without an `Authorization` header plays anonymously (`Viewer(None)`).
/// Any other scheme, an empty token or an invalid token is rejected with 401.
pub async fn identity_middleware(
    State(config): State<Config>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let viewer = match credentials(&req) {
        Credentials::Missing => Viewer(None),
        Credentials::Malformed => return Err(StatusCode::UNAUTHORIZED),
        Credentials::Bearer(token) => {
            let identity = verify_jwt(token, &config.jwt_secret)
                .and_then(|claims| claims.identity())
                .map_err(|_| StatusCode::UNAUTHORIZED)?;
            Viewer(Some(identity))
        }
    };

    req.extensions_mut().insert(viewer);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use sqlx::types::Json;

    use super::*;

    fn user() -> User {
        User {
            id: 42,
            username: "ezra".to_string(),
            password: String::new(),
            email: Some("ezra@example.com".to_string()),
            user_metadata: Json(HashMap::from([(
                "first_name".to_string(),
                "Ezra".to_string(),
            )])),
            created_at: None,
        }
    }

    #[test]
    fn token_round_trips_identity() {
        let token = sign_jwt(&user(), "secret", 60).unwrap();
        let claims = verify_jwt(&token, "secret").unwrap();
        let identity = claims.identity().unwrap();

        assert_eq!(identity.user_id, 42);
        assert_eq!(identity.email.as_deref(), Some("ezra@example.com"));
        assert_eq!(identity.display_name(), "Ezra");
    }

    fn request_with(authorization: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/api/quiz/daniel/sessions");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn authorization_header_is_classified() {
        assert_eq!(credentials(&request_with(None)), Credentials::Missing);
        assert_eq!(
            credentials(&request_with(Some("Bearer abc.def"))),
            Credentials::Bearer("abc.def")
        );
        assert_eq!(
            credentials(&request_with(Some("bearer abc.def"))),
            Credentials::Bearer("abc.def")
        );
        assert_eq!(
            credentials(&request_with(Some("Basic Zm9vOmJhcg=="))),
            Credentials::Malformed
        );
        assert_eq!(credentials(&request_with(Some("Bearer"))), Credentials::Malformed);
        assert_eq!(credentials(&request_with(Some("Bearer   "))), Credentials::Malformed);
        assert_eq!(credentials(&request_with(Some("abc.def"))), Credentials::Malformed);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = sign_jwt(&user(), "secret", 60).unwrap();
        assert!(matches!(
            verify_jwt(&token, "other"),
            Err(AppError::AuthError(_))
        ));
    }
}
