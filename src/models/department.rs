//! Department model

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::{ListResource, RecordStatus};

/// Manager assigned to a department
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manager {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Department as listed by `GET /departments`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    /// Position in the backend's listing
    #[serde(default)]
    pub serial_no: u32,

    /// Opaque identifier
    pub id: String,

    /// Short display code (e.g. `ENG`)
    #[serde(default)]
    pub department_code: String,

    pub name: String,

    #[serde(default)]
    pub employee_count: u32,

    pub status: RecordStatus,

    #[serde(default)]
    pub manager: Option<Manager>,
}

impl Department {
    /// Manager name for table cells
    pub fn manager_name(&self) -> &str {
        self.manager.as_ref().map(|m| m.name.as_str()).unwrap_or("-")
    }
}

/// Editable copy of a department held while the form is open
#[derive(Debug, Clone, PartialEq, Eq, Default, Validate)]
pub struct DepartmentDraft {
    #[validate(
        custom(function = "validate_not_blank"),
        length(max = 100, message = "Department name must be at most 100 characters")
    )]
    pub name: String,

    pub status: RecordStatus,

    /// Selected manager's user id; empty means no manager
    pub manager_id: String,
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("Department name is required".into());
        return Err(err);
    }
    Ok(())
}

/// Body of `POST /departments` and `PUT /departments/{id}`.
///
/// `PUT` replaces all three fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentPayload {
    pub name: String,
    pub status: RecordStatus,
    /// Serialized as `null` when no manager is selected
    pub manager_id: Option<String>,
}

impl From<&DepartmentDraft> for DepartmentPayload {
    fn from(draft: &DepartmentDraft) -> Self {
        let manager_id = draft.manager_id.trim();
        Self {
            name: draft.name.trim().to_string(),
            status: draft.status,
            manager_id: if manager_id.is_empty() {
                None
            } else {
                Some(manager_id.to_string())
            },
        }
    }
}

impl ListResource for Department {
    type Draft = DepartmentDraft;
    type Payload = DepartmentPayload;

    const COLLECTION: &'static str = "departments";
    const LABEL: &'static str = "department";

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn code(&self) -> &str {
        &self.department_code
    }

    fn status(&self) -> RecordStatus {
        self.status
    }

    fn to_draft(&self) -> DepartmentDraft {
        DepartmentDraft {
            name: self.name.clone(),
            status: self.status,
            manager_id: self
                .manager
                .as_ref()
                .map(|m| m.id.clone())
                .unwrap_or_default(),
        }
    }

    fn payload(draft: &DepartmentDraft) -> DepartmentPayload {
        DepartmentPayload::from(draft)
    }

    fn draft_reference(draft: &DepartmentDraft) -> Option<&str> {
        let id = draft.manager_id.trim();
        (!id.is_empty()).then_some(id)
    }
}
