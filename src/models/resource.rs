//! Contract between a record type and the list screen that manages it

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use validator::Validate;

/// Lifecycle status shared by managed records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RecordStatus {
    #[default]
    Active,
    Inactive,
}

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Active => "Active",
            RecordStatus::Inactive => "Inactive",
        }
    }
}

impl std::fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RecordStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(RecordStatus::Active),
            "inactive" => Ok(RecordStatus::Inactive),
            _ => Err(format!("Invalid status: {} (expected Active or Inactive)", s)),
        }
    }
}

/// A record exposed through `GET/POST /{collection}` and
/// `PUT/DELETE /{collection}/{id}`.
pub trait ListResource: Clone + DeserializeOwned + Send + Sync + 'static {
    /// Editable subset of the record held while the form is open
    type Draft: Clone + Default + PartialEq + Validate + Send + Sync;
    /// Body sent on create and update
    type Payload: Serialize + Send + Sync;

    /// Collection path segment, e.g. `departments`
    const COLLECTION: &'static str;
    /// Singular, lower-case label used in messages, e.g. `department`
    const LABEL: &'static str;

    fn id(&self) -> &str;
    fn name(&self) -> &str;
    /// Short display code matched by searches alongside the name
    fn code(&self) -> &str;
    fn status(&self) -> RecordStatus;

    /// Copy the editable fields into a fresh draft
    fn to_draft(&self) -> Self::Draft;

    /// Build the request body from a draft
    fn payload(draft: &Self::Draft) -> Self::Payload;

    /// Id of the lookup record the draft points at, if any
    fn draft_reference(_draft: &Self::Draft) -> Option<&str> {
        None
    }
}

/// Capitalise a label for the start of a sentence
pub(crate) fn capitalized(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
