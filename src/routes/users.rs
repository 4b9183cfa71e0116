//! Account route handlers (`/auth`)
//!
//! Login, the one-time admin seed and account management. Account changes
//! name the acting admin in `adminUsername`; the server checks that account
//! really is an admin.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db;
use crate::error::{AppError, Result};
use crate::models::{UserResponse, UserRole, UserRow};
use crate::password;
use crate::AppState;

/// Account created by the seed endpoint
pub const SEED_USERNAME: &str = "admin";
/// Initial password of the seeded admin; meant to be changed right away
pub const SEED_PASSWORD: &str = "123";

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Opaque session token for the app
    pub token: String,
    pub username: String,
    pub role: UserRole,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<UserRole>,
    #[serde(default)]
    pub admin_username: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub username: Option<String>,
    pub password: Option<String>,
    pub role: Option<UserRole>,
    #[serde(default)]
    pub admin_username: String,
}

fn required(field: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(format!("Missing {}", field)));
    }
    Ok(value.to_string())
}

/// Whether a change would leave the agency without any admin
fn removes_last_admin(target_is_admin: bool, stays_admin: bool, admin_count: i64) -> bool {
    target_is_admin && !stays_admin && admin_count <= 1
}

/// The acting account, which must exist and be an admin
async fn require_admin(pool: &PgPool, admin_username: &str) -> Result<UserRow> {
    match db::find_user_by_username(pool, admin_username.trim()).await? {
        Some(user) if user.is_admin() => Ok(user),
        _ => {
            tracing::warn!("Account change refused for {:?}", admin_username);
            Err(AppError::Forbidden("Only an admin can manage accounts".to_string()))
        }
    }
}

async fn ensure_admin_remains(pool: &PgPool, target: &UserRow, stays_admin: bool) -> Result<()> {
    if !target.is_admin() || stays_admin {
        return Ok(());
    }
    if removes_last_admin(true, false, db::count_admins(pool).await?) {
        return Err(AppError::Forbidden("The last admin cannot be removed".to_string()));
    }
    Ok(())
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let username = payload.username.trim();
    tracing::info!("Login attempt for {:?}", username);

    let user = db::find_user_by_username(&state.db, username)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !password::verify(payload.password, user.password_hash.clone()).await? {
        tracing::info!("Login failed for {:?}", username);
        return Err(AppError::Unauthorized);
    }

    tracing::info!("Login succeeded for {} ({})", user.username, user.role);
    Ok(Json(LoginResponse {
        token: Uuid::new_v4().simple().to_string(),
        role: user.role(),
        username: user.username,
    }))
}

/// Create the first admin; refused once any account exists
pub async fn seed(State(state): State<AppState>) -> Result<Json<MessageResponse>> {
    let hash = password::hash(SEED_PASSWORD.to_string()).await?;

    match db::seed_admin(&state.db, SEED_USERNAME, &hash).await? {
        Some(admin) => {
            tracing::info!("Seeded admin account {}", admin.username);
            Ok(Json(MessageResponse {
                message: format!("Admin account created: {} / {}", SEED_USERNAME, SEED_PASSWORD),
            }))
        }
        None => Err(AppError::Forbidden("Accounts already exist".to_string())),
    }
}

/// All accounts, admins first
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<UserResponse>>> {
    let users = db::list_users(&state.db).await?;
    Ok(Json(users.into_iter().map(UserRow::into_response).collect()))
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<NewUser>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    let admin = require_admin(&state.db, &payload.admin_username).await?;

    let username = required("username", &payload.username)?;
    let secret = required("password", &payload.password)?;
    let role = payload.role.unwrap_or_default();

    let hash = password::hash(secret).await?;
    let user = db::insert_user(&state.db, &username, &hash, role).await?;
    tracing::info!("Account {} ({}) created by {}", user.username, user.role, admin.username);

    Ok((StatusCode::CREATED, Json(user.into_response())))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UserUpdate>,
) -> Result<Json<UserResponse>> {
    let admin = require_admin(&state.db, &payload.admin_username).await?;
    let target = db::get_user(&state.db, id).await?;

    let username = payload
        .username
        .as_deref()
        .map(|u| required("username", u))
        .transpose()?;
    let hash = match payload.password.as_deref() {
        Some(secret) => Some(password::hash(required("password", secret)?).await?),
        None => None,
    };

    let stays_admin = payload.role.map_or(target.is_admin(), |r| r == UserRole::Admin);
    ensure_admin_remains(&state.db, &target, stays_admin).await?;

    let user = db::update_user(
        &state.db,
        id,
        username.as_deref(),
        hash.as_deref(),
        payload.role,
    )
    .await?;
    tracing::info!("Account {} updated by {}", user.id, admin.username);

    Ok(Json(user.into_response()))
}

pub async fn remove(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode> {
    let target = db::get_user(&state.db, id).await?;
    ensure_admin_remains(&state.db, &target, false).await?;

    db::delete_user(&state.db, id).await?;
    tracing::info!("Account {} deleted", target.username);

    Ok(StatusCode::NO_CONTENT)
}
