//! List screen controller
//!
//! Composes the collection loader, the filter and the form overlay around
//! one [`ApiClient`]. Every mutation is followed by a full reload; the local
//! collection is never patched in place.

use std::sync::Arc;

use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use validator::Validate;

use crate::controller::filter::{entries_summary, filter_records, ListQuery, StatusFilter};
use crate::controller::loader::{CollectionLoader, LoadOutcome};
use crate::controller::modal::{FormMode, FormModal};
use crate::controller::notify::{Confirm, Notifier};
use crate::models::{capitalized, ListResource, User};
use crate::services::api_client::ApiClient;
use crate::utils::error::{ApiError, ApiResult};
use crate::utils::validation::validate_record_id;

/// Lookup collection fetched alongside the main one (manager candidates)
#[derive(Debug, Clone)]
struct Lookup {
    path: String,
    label: String,
}

/// Result of a delete request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The user declined the confirmation; nothing was sent
    Declined,
}

/// Controller for one list screen of `R` records
pub struct ResourceListController<R: ListResource> {
    client: ApiClient,
    notifier: Arc<dyn Notifier>,
    collection: RwLock<CollectionLoader<R>>,
    query: RwLock<ListQuery>,
    modal: RwLock<FormModal<R::Draft>>,
    lookup: Option<Lookup>,
    lookup_records: RwLock<Option<Vec<User>>>,
    cancel: CancellationToken,
}

impl<R: ListResource> ResourceListController<R> {
    pub fn new(client: ApiClient, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            client,
            notifier,
            collection: RwLock::new(CollectionLoader::new()),
            query: RwLock::new(ListQuery::default()),
            modal: RwLock::new(FormModal::default()),
            lookup: None,
            lookup_records: RwLock::new(None),
            cancel: CancellationToken::new(),
        }
    }

    /// Also fetch a user lookup list from `path` on mount.
    ///
    /// Draft references are checked against it on submit; `label` names the
    /// reference in validation messages.
    pub fn with_user_lookup(mut self, path: impl Into<String>, label: impl Into<String>) -> Self {
        self.lookup = Some(Lookup {
            path: path.into(),
            label: label.into(),
        });
        self
    }

    fn collection_path() -> String {
        format!("/{}", R::COLLECTION)
    }

    fn item_path(id: &str) -> ApiResult<String> {
        if !validate_record_id(id) {
            return Err(ApiError::Validation(format!(
                "Invalid {} id: '{}'",
                R::LABEL,
                id
            )));
        }
        Ok(format!("/{}/{}", R::COLLECTION, urlencoding::encode(id)))
    }

    // ==================== Loading ====================

    /// Initial fetch: the collection plus the background lookup
    pub async fn mount(&self) -> LoadOutcome {
        let (outcome, _) = tokio::join!(self.load(), self.load_lookup());
        outcome
    }

    /// Fetch the whole collection and replace the local copy.
    ///
    /// A failure notifies once and keeps the previous records. Responses
    /// overtaken by a newer load, or arriving after [`Self::unmount`], are
    /// dropped without notification.
    pub async fn load(&self) -> LoadOutcome {
        let ticket = self.collection.write().await.begin();
        if self.cancel.is_cancelled() {
            return self.collection.write().await.abandon(ticket);
        }

        let path = Self::collection_path();
        let result = tokio::select! {
            _ = self.cancel.cancelled() => None,
            result = self.client.get_json::<Vec<R>>(&path) => Some(result),
        };

        let Some(result) = result else {
            debug!("{} load #{} cancelled", R::COLLECTION, ticket.sequence());
            return self.collection.write().await.abandon(ticket);
        };

        match result {
            Ok(records) => {
                let count = records.len();
                let outcome = self.collection.write().await.complete(ticket, records);
                match outcome {
                    LoadOutcome::Applied => debug!("Loaded {} {}", count, R::COLLECTION),
                    _ => debug!(
                        "Dropping stale {} response for load #{}",
                        R::COLLECTION,
                        ticket.sequence()
                    ),
                }
                outcome
            }
            Err(e) => {
                let outcome = self.collection.write().await.fail(ticket);
                if outcome == LoadOutcome::Failed {
                    warn!("Failed to fetch {}: {}", R::COLLECTION, e);
                    self.notifier
                        .error(&format!("Failed to fetch {}", R::COLLECTION));
                }
                outcome
            }
        }
    }

    /// Fetch the lookup list. Failures are logged, never notified.
    pub async fn load_lookup(&self) {
        let Some(ref lookup) = self.lookup else {
            return;
        };

        let result = tokio::select! {
            _ = self.cancel.cancelled() => return,
            result = self.client.get_json::<Vec<User>>(&lookup.path) => result,
        };

        match result {
            Ok(users) => {
                debug!("Loaded {} {} candidates", users.len(), lookup.label);
                *self.lookup_records.write().await = Some(users);
            }
            Err(e) => warn!("Failed to fetch {}: {}", lookup.path, e),
        }
    }

    /// Stop accepting responses; in-flight loads resolve as cancelled
    pub fn unmount(&self) {
        self.cancel.cancel();
    }

    pub async fn records(&self) -> Vec<R> {
        self.collection.read().await.records().to_vec()
    }

    pub async fn is_loading(&self) -> bool {
        self.collection.read().await.is_loading()
    }

    pub async fn find(&self, id: &str) -> Option<R> {
        self.collection
            .read()
            .await
            .records()
            .iter()
            .find(|r| r.id() == id)
            .cloned()
    }

    /// Lookup records, if the lookup fetch succeeded
    pub async fn lookup_records(&self) -> Option<Vec<User>> {
        self.lookup_records.read().await.clone()
    }

    // ==================== Filtering ====================

    pub async fn set_search(&self, term: impl Into<String>) {
        self.query.write().await.search = term.into();
    }

    pub async fn set_status_filter(&self, status: StatusFilter) {
        self.query.write().await.status = status;
    }

    pub async fn query(&self) -> ListQuery {
        self.query.read().await.clone()
    }

    /// Records matching the current search and status filter
    pub async fn filtered(&self) -> Vec<R> {
        let query = self.query.read().await.clone();
        let collection = self.collection.read().await;
        filter_records(collection.records(), &query)
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn summary(&self) -> String {
        entries_summary(self.filtered().await.len())
    }

    // ==================== Form overlay ====================

    pub async fn open_create(&self) {
        self.modal.write().await.open_create();
    }

    pub async fn open_edit(&self, record: &R) {
        self.modal
            .write()
            .await
            .open_edit(record.id(), record.to_draft());
    }

    /// Open the edit form for a loaded record; `false` if it is not loaded
    pub async fn open_edit_by_id(&self, id: &str) -> bool {
        match self.find(id).await {
            Some(record) => {
                self.open_edit(&record).await;
                true
            }
            None => false,
        }
    }

    /// Apply `edit` to the open draft; `false` when no form is open
    pub async fn update_draft<F>(&self, edit: F) -> bool
    where
        F: FnOnce(&mut R::Draft),
    {
        match self.modal.write().await.draft_mut() {
            Some(draft) => {
                edit(draft);
                true
            }
            None => false,
        }
    }

    pub async fn close(&self) {
        self.modal.write().await.close();
    }

    pub async fn modal(&self) -> FormModal<R::Draft> {
        self.modal.read().await.clone()
    }

    pub async fn is_modal_open(&self) -> bool {
        self.modal.read().await.is_open()
    }

    async fn validate_draft(&self, draft: &R::Draft) -> ApiResult<()> {
        draft.validate()?;

        if let (Some(reference), Some(lookup)) = (R::draft_reference(draft), self.lookup.as_ref()) {
            if let Some(ref users) = *self.lookup_records.read().await {
                if !users.iter().any(|u| u.id == reference) {
                    return Err(ApiError::Validation(format!(
                        "Selected {} does not exist",
                        lookup.label
                    )));
                }
            }
        }

        Ok(())
    }

    /// Send the open draft.
    ///
    /// On success the form closes, unless it was reopened or edited while
    /// the request was in flight, and the collection reloads. On failure the
    /// error is notified and the form stays open with its draft intact.
    pub async fn submit(&self) -> ApiResult<()> {
        let Some((mode, draft)) = self.modal.read().await.snapshot() else {
            return Err(ApiError::Validation("No form is open".to_string()));
        };

        let fallback = format!("Failed to save {}", R::LABEL);

        if let Err(e) = self.validate_draft(&draft).await {
            self.notifier.error(&e.user_message(&fallback));
            return Err(e);
        }

        let payload = R::payload(&draft);
        let result = match mode {
            FormMode::Edit(ref id) => match Self::item_path(id) {
                Ok(path) => self.client.put(&path, &payload).await.map(|_| "updated"),
                Err(e) => Err(e),
            },
            FormMode::Create => self
                .client
                .post(&Self::collection_path(), &payload)
                .await
                .map(|_| "created"),
        };

        match result {
            Ok(verb) => {
                info!("{} {}", capitalized(R::LABEL), verb);
                self.notifier.success(&format!(
                    "{} {} successfully",
                    capitalized(R::LABEL),
                    verb
                ));
                if !self.modal.write().await.close_if_showing(&mode, &draft) {
                    debug!("{} form changed during save, leaving it open", R::LABEL);
                }
                self.load().await;
                Ok(())
            }
            Err(e) => {
                self.notifier.error(&e.user_message(&fallback));
                Err(e)
            }
        }
    }

    /// Delete a record after the user confirms
    pub async fn delete(
        &self,
        id: &str,
        display_name: &str,
        confirm: &dyn Confirm,
    ) -> ApiResult<DeleteOutcome> {
        let prompt = format!(
            "Are you sure you want to delete the {} {}?",
            display_name,
            R::LABEL
        );
        if !confirm.confirm(&prompt).await {
            debug!("Delete of {} '{}' declined", R::LABEL, id);
            return Ok(DeleteOutcome::Declined);
        }

        let fallback = format!("Failed to delete {}", R::LABEL);
        let result = match Self::item_path(id) {
            Ok(path) => self.client.delete(&path).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(_) => {
                info!("{} '{}' deleted", capitalized(R::LABEL), id);
                self.notifier
                    .success(&format!("{} deleted successfully", capitalized(R::LABEL)));
                self.load().await;
                Ok(DeleteOutcome::Deleted)
            }
            Err(e) => {
                self.notifier.error(&e.user_message(&fallback));
                Err(e)
            }
        }
    }
}
