//! Database models for Comanda
//!
//! This module contains the SQLx models the loaders fetch:
//! - Cafes and their service counters
//! - Orders, order items, and payments
//! - Users (customers and staff accounts)
//! - Employees and time sheets
//! - Inventory items and stock levels

pub mod cafe;
pub mod employee;
pub mod inventory;
pub mod order;
pub mod payment;
pub mod user;

pub use cafe::{Cafe, Counter};
pub use employee::{Employee, EmployeeRole, TimeSheet};
pub use inventory::InventoryItem;
pub use order::{Order, OrderItem, OrderStatus};
pub use payment::{Payment, PaymentMethod, PaymentStatus};
pub use user::{User, UserRole};
