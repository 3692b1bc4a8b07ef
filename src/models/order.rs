//! Order and order item models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Order status enum matching PostgreSQL order_status type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "order_status", rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Preparing,
    Ready,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Returns whether the order is still in the kitchen pipeline
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Pending | Self::Preparing | Self::Ready)
    }
}

/// Order record from the orders table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Order {
    /// Unique order identifier
    pub id: Uuid,

    /// Cafe the order was placed at
    pub cafe_id: Uuid,

    /// Customer account, if the order was not anonymous
    pub customer_id: Option<Uuid>,

    /// Counter the order was taken at
    pub counter_id: Option<Uuid>,

    /// Daily order number shown on the kitchen display
    pub order_number: i32,

    /// Current status
    pub status: OrderStatus,

    /// Total in minor currency units (cents)
    pub total_cents: i64,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Line item on an order
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct OrderItem {
    /// Unique item identifier
    pub id: Uuid,

    /// Order this item belongs to
    pub order_id: Uuid,

    /// Menu item name as ordered
    pub name: String,

    /// Quantity ordered
    pub quantity: i32,

    /// Unit price in minor currency units (cents)
    pub unit_price_cents: i64,

    /// Preparation notes ("no onions")
    pub notes: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl OrderItem {
    /// Line total in cents
    pub fn line_total_cents(&self) -> i64 {
        self.unit_price_cents * i64::from(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_is_open() {
        assert!(OrderStatus::Pending.is_open());
        assert!(OrderStatus::Preparing.is_open());
        assert!(OrderStatus::Ready.is_open());
        assert!(!OrderStatus::Completed.is_open());
        assert!(!OrderStatus::Cancelled.is_open());
    }

    #[test]
    fn test_order_item_line_total() {
        let item = OrderItem {
            id: Uuid::new_v4(),
            order_id: Uuid::new_v4(),
            name: "Espresso".to_string(),
            quantity: 3,
            unit_price_cents: 350,
            notes: None,
            created_at: Utc::now(),
        };
        assert_eq!(item.line_total_cents(), 1050);
    }
}
