use std::{collections::HashMap, error::Error};

use async_trait::async_trait;

use crate::types::{Employee, EmployeeID};

#[async_trait]
pub trait EmployeeDirectory: Send + Sync + 'static {
    /// Store the employee. Returns `false` without touching the stored record
    /// if an employee with the same id already exists.
    async fn insert_employee(
        &mut self,
        employee: &Employee,
    ) -> Result<bool, Box<dyn Error + Send + Sync>>;

    /// Look up an employee by external id.
    async fn retrieve_employee(
        &self,
        emp_id: &EmployeeID,
    ) -> Result<Option<Employee>, Box<dyn Error + Send + Sync>>;
}

/// Directory kept in process memory, keyed by external id.
#[derive(Default)]
pub struct InMemoryDirectory {
    storage: HashMap<String, Employee>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EmployeeDirectory for InMemoryDirectory {
    async fn insert_employee(
        &mut self,
        employee: &Employee,
    ) -> Result<bool, Box<dyn Error + Send + Sync>> {
        if self.storage.contains_key(&employee.emp_id) {
            return Ok(false);
        }

        self.storage
            .insert(employee.emp_id.clone(), employee.clone());
        Ok(true)
    }

    async fn retrieve_employee(
        &self,
        emp_id: &EmployeeID,
    ) -> Result<Option<Employee>, Box<dyn Error + Send + Sync>> {
        Ok(self.storage.get(&emp_id.0).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::jane;

    #[tokio::test]
    async fn keeps_first_record_for_an_id() {
        let mut directory = InMemoryDirectory::new();
        assert!(directory.insert_employee(&jane()).await.unwrap());

        let impostor = Employee {
            name: "Someone Else".into(),
            ..jane()
        };
        assert!(!directory.insert_employee(&impostor).await.unwrap());

        let stored = directory
            .retrieve_employee(&EmployeeID("E100".into()))
            .await
            .unwrap();
        assert_eq!(stored, Some(jane()));
        assert_eq!(
            directory
                .retrieve_employee(&EmployeeID("E999".into()))
                .await
                .unwrap(),
            None
        );
    }
}
