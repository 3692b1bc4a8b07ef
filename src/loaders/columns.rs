//! Shared SQL column constants for loader queries
//!
//! These constants define the SELECT column lists for each entity type,
//! reducing duplication and ensuring consistency across queries.

/// SQL columns for cafe queries
pub const CAFE_COLUMNS: &str = r#"
    id, name, address, phone, is_active,
    created_at, updated_at
"#;

/// SQL columns for counter queries
pub const COUNTER_COLUMNS: &str = r#"
    id, cafe_id, name, is_active, created_at
"#;

/// SQL columns for user queries
pub const USER_COLUMNS: &str = r#"
    id, email, display_name, role, created_at
"#;

/// SQL columns for order queries
pub const ORDER_COLUMNS: &str = r#"
    id, cafe_id, customer_id, counter_id,
    order_number, status, total_cents,
    created_at, updated_at
"#;

/// SQL columns for order item queries
pub const ORDER_ITEM_COLUMNS: &str = r#"
    id, order_id, name, quantity, unit_price_cents, notes, created_at
"#;

/// SQL columns for payment queries
pub const PAYMENT_COLUMNS: &str = r#"
    id, order_id, method, status, amount_cents, created_at
"#;

/// SQL columns for employee queries
pub const EMPLOYEE_COLUMNS: &str = r#"
    id, cafe_id, user_id, name, role, hourly_rate_cents, is_active,
    created_at, updated_at
"#;

/// SQL columns for time sheet queries
pub const TIME_SHEET_COLUMNS: &str = r#"
    id, employee_id, start_time, end_time, created_at
"#;

/// SQL columns for inventory item queries
pub const INVENTORY_ITEM_COLUMNS: &str = r#"
    id, cafe_id, name, unit, current_stock, minimum_stock,
    created_at, updated_at
"#;
