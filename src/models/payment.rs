//! Payment models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Payment method enum matching PostgreSQL payment_method type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_method", rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    Mobile,
    Voucher,
}

/// Payment status enum matching PostgreSQL payment_status type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_status", rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Completed,
    Refunded,
    Failed,
}

/// Payment record from the payments table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Payment {
    /// Unique payment identifier
    pub id: Uuid,

    /// Order this payment settles
    pub order_id: Uuid,

    /// How the payment was made
    pub method: PaymentMethod,

    /// Current status
    pub status: PaymentStatus,

    /// Amount in minor currency units (cents)
    pub amount_cents: i64,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Payment {
    /// Returns whether this payment counts toward the order total
    pub fn is_settled(&self) -> bool {
        self.status == PaymentStatus::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_completed_payments_are_settled() {
        let mut payment = Payment {
            id: Uuid::new_v4(),
            order_id: Uuid::new_v4(),
            method: PaymentMethod::Card,
            status: PaymentStatus::Completed,
            amount_cents: 1200,
            created_at: Utc::now(),
        };
        assert!(payment.is_settled());

        payment.status = PaymentStatus::Refunded;
        assert!(!payment.is_settled());
    }
}
