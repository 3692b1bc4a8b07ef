//! User account models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// User role enum matching PostgreSQL user_role type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Staff,
    #[default]
    Customer,
}

/// User record from the users table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: Uuid,

    /// Login email, unique
    pub email: String,

    /// Display name
    pub display_name: String,

    /// Role for access control
    pub role: UserRole,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}
