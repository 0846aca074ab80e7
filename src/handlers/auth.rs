//! Authentication handlers

use axum::{extract::{rejection::JsonRejection, State}, Json};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;

use crate::middleware::auth::{issue_token, UserContext};
use crate::models::{AuthResponse, CredentialsRequest, User};
use crate::{AppError, AppResult, AppState};

fn credentials(payload: Result<Json<CredentialsRequest>, JsonRejection>) -> AppResult<(String, String)> {
    let Json(req) = payload?;
    req.into_parts()
        .ok_or_else(|| AppError::ValidationError("Username and password required".to_string()))
}

fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::InternalError(e.to_string()))
}

/// Signup endpoint
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> AppResult<Json<AuthResponse>> {
    let (username, password) = credentials(payload)?;
    let password_hash = hash_password(&password)?;

    let user = User::create(&state.pool, &username, &password_hash)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::AlreadyExists("Username taken".to_string())
            }
            other => other.into(),
        })?;

    tracing::info!("New user registered: {} ({})", user.username, user.id);

    let token = issue_token(&user, &state.config.jwt_secret, state.config.jwt_expiration_hours)?;

    Ok(Json(AuthResponse {
        message: "Signup successful",
        token,
    }))
}

/// Login endpoint
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> AppResult<Json<AuthResponse>> {
    let (username, password) = credentials(payload)?;

    // Find user by username
    let user = User::find_by_username(&state.pool, &username)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    // Verify password
    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| AppError::InternalError("Invalid password hash".to_string()))?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AppError::InvalidCredentials)?;

    let token = issue_token(&user, &state.config.jwt_secret, state.config.jwt_expiration_hours)?;

    tracing::info!("User logged in: {}", user.username);

    Ok(Json(AuthResponse {
        message: "Login successful",
        token,
    }))
}

/// Current user profile
pub async fn me(
    State(state): State<AppState>,
    user: UserContext,
) -> AppResult<Json<User>> {
    let user = User::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;
    Ok(Json(user))
}

#[cfg(test)]
mod tests {
    use crate::test_support::{json_request, send, test_state, with_bearer, StubChatbot, StubClassifier};
    use axum::http::StatusCode;
    use serde_json::json;

    async fn app() -> axum::Router {
        let state = test_state(StubClassifier::fault("Healthy", 0.9), StubChatbot::silent()).await;
        crate::create_router(state)
    }

    fn creds(username: &str, password: &str) -> serde_json::Value {
        json!({"username": username, "password": password})
    }

    #[tokio::test]
    async fn test_signup_then_login() {
        let app = app().await;

        let (status, body) = send(&app, json_request("POST", "/api/auth/signup", creds("op", "pw"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Signup successful");
        assert!(body["token"].as_str().is_some());

        let (status, body) = send(&app, json_request("POST", "/api/auth/login", creds("op", "pw"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Login successful");

        let token = body["token"].as_str().unwrap();
        let (status, body) = send(&app, with_bearer(crate::test_support::get_request("/api/auth/me"), token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["username"], "op");
        assert!(body.get("password_hash").is_none());
    }

    #[tokio::test]
    async fn test_duplicate_signup_conflicts() {
        let app = app().await;
        send(&app, json_request("POST", "/api/auth/signup", creds("op", "pw"))).await;

        let (status, body) = send(&app, json_request("POST", "/api/auth/signup", creds("op", "other"))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "Username taken");
    }

    #[tokio::test]
    async fn test_missing_fields_are_bad_request() {
        let app = app().await;
        for uri in ["/api/auth/signup", "/api/auth/login"] {
            let (status, body) = send(&app, json_request("POST", uri, json!({"username": "op"}))).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"], "Username and password required");
        }
    }

    #[tokio::test]
    async fn test_bad_credentials_are_unauthorized() {
        let app = app().await;
        send(&app, json_request("POST", "/api/auth/signup", creds("op", "pw"))).await;

        let (status, _) = send(&app, json_request("POST", "/api/auth/login", creds("op", "wrong"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(&app, json_request("POST", "/api/auth/login", creds("ghost", "pw"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_me_requires_token() {
        let app = app().await;
        let (status, body) = send(&app, crate::test_support::get_request("/api/auth/me")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Authentication required");
    }
}
