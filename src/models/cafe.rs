//! Cafe and counter models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Cafe record from the cafes table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Cafe {
    /// Unique cafe identifier
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Street address
    pub address: String,

    /// Contact phone number
    pub phone: Option<String>,

    /// Whether the cafe is currently operating
    pub is_active: bool,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Service counter within a cafe (register, bar, kitchen pass)
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Counter {
    /// Unique counter identifier
    pub id: Uuid,

    /// Cafe this counter belongs to
    pub cafe_id: Uuid,

    /// Display name (e.g. "Register 1")
    pub name: String,

    /// Whether the counter is open for orders
    pub is_active: bool,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}
