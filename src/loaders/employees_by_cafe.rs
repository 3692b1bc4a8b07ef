//! Employees-by-cafe DataLoader for batched fetching

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::columns::EMPLOYEE_COLUMNS;
use crate::dataloader::Loader;
use crate::error::{LoadError, LoadResult};
use crate::group::group_by_key;
use crate::models::Employee;

/// DataLoader for batching employees-by-cafe queries
#[derive(Clone)]
pub struct EmployeesByCafeLoader {
    pool: PgPool,
}

impl EmployeesByCafeLoader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Loader for EmployeesByCafeLoader {
    type Key = Uuid;
    type Value = Vec<Employee>;

    const RELATION: &'static str = "employeesByCafe";

    async fn load(&self, keys: &[Uuid]) -> LoadResult<HashMap<Uuid, Vec<Employee>>> {
        let sql = format!(
            "SELECT {} FROM employees WHERE cafe_id = ANY($1) ORDER BY name ASC",
            EMPLOYEE_COLUMNS
        );
        let employees: Vec<Employee> = sqlx::query_as(&sql)
            .bind(keys)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| LoadError::query(Self::RELATION, e))?;

        Ok(group_by_key(employees, |e| Some(e.cafe_id)))
    }

    fn on_missing(&self, _key: &Uuid) -> LoadResult<Vec<Employee>> {
        Ok(Vec::new())
    }
}
