//! Resource list screens
//!
//! A list screen is three independent state machines composed by
//! [`ResourceListController`]:
//! - [`loader::CollectionLoader`] holds the fetched collection
//! - [`filter`] narrows it by search term and status
//! - [`modal::FormModal`] tracks the create/edit overlay and its draft

pub mod filter;
pub mod list;
pub mod loader;
pub mod modal;
pub mod notify;

pub use filter::{entries_summary, filter_records, ListQuery, StatusFilter};
pub use list::{DeleteOutcome, ResourceListController};
pub use loader::{CollectionLoader, LoadOutcome, LoadTicket};
pub use modal::{FormMode, FormModal};
pub use notify::{
    AssumeNo, AssumeYes, Confirm, Notification, NotificationLevel, Notifier, RecordingNotifier,
    TracingNotifier,
};
