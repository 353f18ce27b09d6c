//! Registration, login, and user profile endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use chrono::{DateTime, Utc};
use common::UserId;
use doc_store::DocumentStore;
use domain::{NewUser, User};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::auth::{self, MIN_PASSWORD_LENGTH, RequireAuth};
use crate::error::ApiError;

// -- Request types --

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// -- Response types --

/// User representation returned by the API. Never carries the password hash.
#[derive(Serialize)]
pub struct UserResponse {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user_id: String,
    pub expires_at: DateTime<Utc>,
}

// -- Handlers --

/// POST /api/v1/register — create a new user account.
#[tracing::instrument(skip(state, req), fields(email = %req.email))]
pub async fn register<D: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<D>>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    if req.password.len() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    let password_hash = auth::hash_password(&req.password)?;
    let user = state
        .users
        .create_user(NewUser {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            password_hash,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(user.doc.into())))
}

/// POST /api/v1/login — exchange credentials for a session token.
#[tracing::instrument(skip(state, req), fields(email = %req.email))]
pub async fn login<D: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<D>>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    // One message for both unknown email and wrong password, so the
    // response does not reveal which accounts exist.
    let invalid = || ApiError::Unauthorized("invalid email or password".to_string());

    let user = state
        .users
        .user_by_email(&req.email)
        .await?
        .ok_or_else(invalid)?;

    if !auth::verify_password(&req.password, &user.doc.password_hash) {
        return Err(invalid());
    }

    let session = state
        .sessions
        .create_session(user.doc.id, state.config.session_ttl())
        .await?;

    Ok(Json(LoginResponse {
        token: session.token,
        user_id: user.doc.id.to_string(),
        expires_at: session.expires_at,
    }))
}

/// POST /api/v1/logout — invalidate the presented session token.
pub async fn logout<D: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<D>>>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let Some(token) = auth::bearer_token(&headers) else {
        return Err(ApiError::Unauthorized("missing bearer token".to_string()));
    };

    state.sessions.delete_session(token).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/users/{id} — fetch a user profile.
#[tracing::instrument(skip(state), fields(requester = %requester))]
pub async fn get<D: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<D>>>,
    RequireAuth(requester): RequireAuth,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let user_id = parse_user_id(&id)?;
    let user = state
        .users
        .user_by_id(user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User {id} not found")))?;

    Ok(Json(user.doc.into()))
}

fn parse_user_id(id: &str) -> Result<UserId, ApiError> {
    let uuid = uuid::Uuid::parse_str(id)
        .map_err(|e| ApiError::BadRequest(format!("Invalid ID format: {e}")))?;
    Ok(UserId::from_uuid(uuid))
}
