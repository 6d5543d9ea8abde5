//! Collection loading state with stale-response protection
//!
//! Every load takes a [`LoadTicket`] from a monotonically increasing
//! sequence. Only the newest ticket may change the collection; responses
//! that arrive for an older ticket are dropped, so the list always reflects
//! the most recent request no matter in which order responses land.

/// Sequence tag of one load request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

/// What happened to a finished load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The response replaced the collection
    Applied,
    /// The request failed; the previous collection was kept
    Failed,
    /// A newer load was started in the meantime; the response was dropped
    Stale,
    /// The owning screen went away; the response was dropped
    Cancelled,
}

/// In-memory copy of a server collection
#[derive(Debug, Clone)]
pub struct CollectionLoader<T> {
    records: Vec<T>,
    loading: bool,
    issued: u64,
}

impl<T> Default for CollectionLoader<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            loading: false,
            issued: 0,
        }
    }
}

impl<T> CollectionLoader<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a load and mark the collection as loading
    pub fn begin(&mut self) -> LoadTicket {
        self.issued += 1;
        self.loading = true;
        LoadTicket(self.issued)
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.issued
    }

    /// Replace the whole collection with a successful response
    pub fn complete(&mut self, ticket: LoadTicket, records: Vec<T>) -> LoadOutcome {
        if !self.is_current(ticket) {
            return LoadOutcome::Stale;
        }
        self.records = records;
        self.loading = false;
        LoadOutcome::Applied
    }

    /// Record a failed load; the previous collection stays as it was
    pub fn fail(&mut self, ticket: LoadTicket) -> LoadOutcome {
        if !self.is_current(ticket) {
            return LoadOutcome::Stale;
        }
        self.loading = false;
        LoadOutcome::Failed
    }

    /// Give up on a load without touching the collection
    pub fn abandon(&mut self, ticket: LoadTicket) -> LoadOutcome {
        if self.is_current(ticket) {
            self.loading = false;
        }
        LoadOutcome::Cancelled
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }
}
