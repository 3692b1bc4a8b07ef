//! Employee and time sheet models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Employee role enum matching PostgreSQL employee_role type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "employee_role", rename_all = "lowercase")]
pub enum EmployeeRole {
    Manager,
    #[default]
    Barista,
    Cook,
    Cashier,
}

/// Employee record from the employees table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Employee {
    /// Unique employee identifier
    pub id: Uuid,

    /// Cafe this employee works at
    pub cafe_id: Uuid,

    /// Linked user account, if the employee can log in
    pub user_id: Option<Uuid>,

    /// Display name
    pub name: String,

    /// Role within the cafe
    pub role: EmployeeRole,

    /// Hourly rate in minor currency units (cents)
    pub hourly_rate_cents: Option<i64>,

    /// Whether the employee is currently on payroll
    pub is_active: bool,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Time sheet record: one clock-in/clock-out span for an employee
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TimeSheet {
    /// Unique time sheet identifier
    pub id: Uuid,

    /// Employee this shift belongs to
    pub employee_id: Uuid,

    /// Clock-in time
    pub start_time: DateTime<Utc>,

    /// Clock-out time; null while the shift is still open
    pub end_time: Option<DateTime<Utc>>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl TimeSheet {
    /// Returns whether the shift is still open
    pub fn is_active(&self) -> bool {
        self.end_time.is_none()
    }

    /// Worked minutes, if the shift has ended
    pub fn worked_minutes(&self) -> Option<i64> {
        self.end_time
            .map(|end| (end - self.start_time).num_minutes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn create_test_shift() -> TimeSheet {
        TimeSheet {
            id: Uuid::new_v4(),
            employee_id: Uuid::new_v4(),
            start_time: Utc::now() - Duration::hours(4),
            end_time: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_open_shift_is_active() {
        let shift = create_test_shift();
        assert!(shift.is_active());
        assert_eq!(shift.worked_minutes(), None);
    }

    #[test]
    fn test_closed_shift_reports_worked_minutes() {
        let mut shift = create_test_shift();
        shift.end_time = Some(shift.start_time + Duration::minutes(95));
        assert!(!shift.is_active());
        assert_eq!(shift.worked_minutes(), Some(95));
    }
}
