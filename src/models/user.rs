//! Agency accounts (admins and sellers)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Manages prices, hotels and accounts
    Admin,
    /// Seller: creates quotes
    #[default]
    User,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::User => "user",
        }
    }

    /// Read a stored role; the column is constrained to the two values
    pub fn from_stored(value: &str) -> Self {
        if value == "admin" {
            UserRole::Admin
        } else {
            UserRole::User
        }
    }
}

/// Account from the `users` table
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl UserRow {
    pub fn role(&self) -> UserRole {
        UserRole::from_stored(&self.role)
    }

    pub fn is_admin(&self) -> bool {
        self.role() == UserRole::Admin
    }

    pub fn into_response(self) -> UserResponse {
        UserResponse {
            role: self.role(),
            id: self.id,
            username: self.username,
            created_at: self.created_at,
        }
    }
}

/// Account as listed to admins; never carries the password hash
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}
