//! Test factories for generating test data
//!
//! Factories create randomized records, useful when a test needs unique
//! data and does not care about the exact values.

use std::sync::atomic::{AtomicU64, Ordering};

use fake::faker::company::en::Industry;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;

use hrms_portal::models::{Department, Manager, RecordStatus, User};

/// Factory for creating test departments
pub struct DepartmentFactory {
    counter: AtomicU64,
}

impl Default for DepartmentFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl DepartmentFactory {
    pub fn new() -> Self {
        Self {
            counter: AtomicU64::new(100),
        }
    }

    /// Create a unique test department
    pub fn create(&self) -> DepartmentBuilder {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        let name: String = Industry().fake();
        DepartmentBuilder {
            serial_no: n as u32,
            id: n.to_string(),
            code: code_for(&name, n),
            name,
            employee_count: (0u32..250).fake::<u32>(),
            status: RecordStatus::Active,
            manager: None,
        }
    }

    /// `count` unique departments
    pub fn batch(&self, count: usize) -> Vec<Department> {
        (0..count).map(|_| self.create().build()).collect()
    }
}

fn code_for(name: &str, n: u64) -> String {
    let prefix: String = name
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .take(3)
        .collect::<String>()
        .to_uppercase();
    format!("{}{}", prefix, n)
}

/// Builder for test departments
pub struct DepartmentBuilder {
    pub serial_no: u32,
    pub id: String,
    pub code: String,
    pub name: String,
    pub employee_count: u32,
    pub status: RecordStatus,
    pub manager: Option<Manager>,
}

impl DepartmentBuilder {
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn with_code(mut self, code: &str) -> Self {
        self.code = code.to_string();
        self
    }

    pub fn inactive(mut self) -> Self {
        self.status = RecordStatus::Inactive;
        self
    }

    pub fn managed_by(mut self, user: &User) -> Self {
        self.manager = Some(Manager {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
        });
        self
    }

    pub fn build(self) -> Department {
        Department {
            serial_no: self.serial_no,
            id: self.id,
            department_code: self.code,
            name: self.name,
            employee_count: self.employee_count,
            status: self.status,
            manager: self.manager,
        }
    }
}

/// Factory for creating test users
pub struct UserFactory {
    counter: AtomicU64,
}

impl Default for UserFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl UserFactory {
    pub fn new() -> Self {
        Self {
            counter: AtomicU64::new(500),
        }
    }

    pub fn create(&self) -> User {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        User {
            id: n.to_string(),
            name: Name().fake(),
            email: Some(SafeEmail().fake()),
            role: Some("EMPLOYEE".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_department_factory_unique_ids() {
        let factory = DepartmentFactory::new();
        let batch = factory.batch(5);
        let mut ids: Vec<_> = batch.iter().map(|d| d.id.clone()).collect();
        ids.dedup();
        assert_eq!(ids.len(), 5);
    }
}
