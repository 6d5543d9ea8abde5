//! Test fixtures for common test data
//!
//! Fixtures provide pre-defined records that can be used across multiple tests.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::Utc;
use serde_json::{json, Value};

use hrms_portal::models::{Department, Manager, RecordStatus, User};

/// Fixed identifiers for testing (reproducible tests)
pub mod ids {
    pub const ENGINEERING_ID: &str = "1";
    pub const SALES_ID: &str = "2";
    pub const MANAGER_ID: &str = "9";
}

/// Department fixtures
pub struct DepartmentFixtures;

impl DepartmentFixtures {
    /// Active department without a manager
    pub fn engineering() -> Department {
        Department {
            serial_no: 1,
            id: ids::ENGINEERING_ID.to_string(),
            department_code: "ENG".to_string(),
            name: "Engineering".to_string(),
            employee_count: 12,
            status: RecordStatus::Active,
            manager: None,
        }
    }

    /// Inactive department managed by [`UserFixtures::bob`]
    pub fn sales() -> Department {
        let bob = UserFixtures::bob();
        Department {
            serial_no: 2,
            id: ids::SALES_ID.to_string(),
            department_code: "SAL".to_string(),
            name: "Sales".to_string(),
            employee_count: 4,
            status: RecordStatus::Inactive,
            manager: Some(Manager {
                id: bob.id,
                name: bob.name,
                email: bob.email,
            }),
        }
    }

    /// Both fixtures as the backend lists them
    pub fn listing() -> Vec<Department> {
        vec![Self::engineering(), Self::sales()]
    }

    pub fn listing_json() -> Value {
        serde_json::to_value(Self::listing()).expect("fixtures serialize")
    }
}

/// User fixtures
pub struct UserFixtures;

impl UserFixtures {
    pub fn bob() -> User {
        User {
            id: ids::MANAGER_ID.to_string(),
            name: "Bob Stone".to_string(),
            email: Some("bob@example.com".to_string()),
            role: Some("SUPERVISOR".to_string()),
        }
    }

    pub fn alice() -> User {
        User {
            id: "10".to_string(),
            name: "Alice Grant".to_string(),
            email: Some("alice@example.com".to_string()),
            role: Some("EMPLOYEE".to_string()),
        }
    }

    pub fn directory_json() -> Value {
        json!([Self::bob(), Self::alice()])
    }
}

/// Unsigned JWT whose `exp` claim is `exp_offset_secs` from now
pub fn jwt_expiring_in(exp_offset_secs: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let claims = json!({
        "sub": ids::MANAGER_ID,
        "exp": Utc::now().timestamp() + exp_offset_secs,
    });
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{}.{}.signature", header, payload)
}
