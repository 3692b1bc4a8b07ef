//! Employee DataLoader for batched fetching

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::columns::EMPLOYEE_COLUMNS;
use crate::dataloader::Loader;
use crate::error::{LoadError, LoadResult};
use crate::models::Employee;

/// DataLoader for batching employee queries
#[derive(Clone)]
pub struct EmployeeLoader {
    pool: PgPool,
}

impl EmployeeLoader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Loader for EmployeeLoader {
    type Key = Uuid;
    type Value = Employee;

    const RELATION: &'static str = "employee";

    async fn load(&self, keys: &[Uuid]) -> LoadResult<HashMap<Uuid, Employee>> {
        let sql = format!(
            "SELECT {} FROM employees WHERE id = ANY($1)",
            EMPLOYEE_COLUMNS
        );
        let employees: Vec<Employee> = sqlx::query_as(&sql)
            .bind(keys)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| LoadError::query(Self::RELATION, e))?;

        Ok(employees.into_iter().map(|e| (e.id, e)).collect())
    }
}
