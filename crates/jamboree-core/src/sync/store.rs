use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::api::ApiError;

/// Handle for one in-flight list request.
///
/// Tickets are numbered per store; only the most recently issued ticket may
/// replace the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshTicket(u64);

/// What happened when a list response was applied.
#[derive(Debug)]
pub enum RefreshOutcome {
    /// Snapshot replaced with this many rows
    Replaced(usize),
    /// A newer request was issued after this one; the response was dropped
    Superseded,
    /// The request failed; the previous snapshot is still in place
    Failed(ApiError),
}

impl RefreshOutcome {
    pub fn is_replaced(&self) -> bool {
        matches!(self, RefreshOutcome::Replaced(_))
    }
}

/// In-memory snapshot of one backend collection.
#[derive(Debug)]
pub struct Store<T> {
    label: &'static str,
    rows: Vec<T>,
    fetched_at: Option<DateTime<Utc>>,
    issued: u64,
}

impl<T> Store<T> {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            rows: Vec::new(),
            fetched_at: None,
            issued: 0,
        }
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// True until the first successful fetch.
    pub fn is_loading(&self) -> bool {
        self.fetched_at.is_none()
    }

    /// Register a new list request. Any earlier ticket is now stale.
    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.issued += 1;
        RefreshTicket(self.issued)
    }

    /// Apply a list response. Replaces the snapshot wholesale on success.
    pub fn apply(&mut self, ticket: RefreshTicket, result: Result<Vec<T>, ApiError>) -> RefreshOutcome {
        if ticket.0 != self.issued {
            debug!(
                collection = self.label,
                seq = ticket.0,
                latest = self.issued,
                "Dropping superseded response"
            );
            return RefreshOutcome::Superseded;
        }

        match result {
            Ok(rows) => {
                let count = rows.len();
                self.rows = rows;
                self.fetched_at = Some(Utc::now());
                debug!(collection = self.label, count, "Snapshot replaced");
                RefreshOutcome::Replaced(count)
            }
            Err(e) => {
                warn!(collection = self.label, error = %e, "Refresh failed, keeping previous snapshot");
                RefreshOutcome::Failed(e)
            }
        }
    }

    /// Age of the snapshot for the status bar.
    pub fn age_display(&self) -> String {
        let Some(fetched_at) = self.fetched_at else {
            return "never".to_string();
        };
        let seconds = (Utc::now() - fetched_at).num_seconds();
        if seconds < 60 {
            // Also covers clock skew (negative ages)
            "just now".to_string()
        } else if seconds < 3600 {
            format!("{}m ago", seconds / 60)
        } else {
            format!("{}h ago", seconds / 3600)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_replaces_snapshot() {
        let mut store: Store<i32> = Store::new("numbers");
        assert!(store.is_loading());

        let ticket = store.begin_refresh();
        assert!(store.apply(ticket, Ok(vec![1, 2, 3])).is_replaced());
        assert_eq!(store.rows(), &[1, 2, 3]);

        let ticket = store.begin_refresh();
        store.apply(ticket, Ok(vec![9]));
        assert_eq!(store.rows(), &[9]);
        assert!(!store.is_loading());
        assert_eq!(store.age_display(), "just now");
    }

    #[test]
    fn test_failure_keeps_previous_snapshot() {
        let mut store: Store<i32> = Store::new("numbers");
        let ticket = store.begin_refresh();
        store.apply(ticket, Ok(vec![1, 2]));

        let ticket = store.begin_refresh();
        let outcome = store.apply(ticket, Err(ApiError::ServerError("boom".into())));
        assert!(matches!(outcome, RefreshOutcome::Failed(ApiError::ServerError(_))));
        assert_eq!(store.rows(), &[1, 2]);
    }

    #[test]
    fn test_stale_response_is_dropped() {
        let mut store: Store<&str> = Store::new("items");
        let first = store.begin_refresh();
        let second = store.begin_refresh();
        assert!(second > first);

        // Newer request resolves first, then the older one arrives late
        assert!(store.apply(second, Ok(vec!["te"])).is_replaced());
        assert!(matches!(store.apply(first, Ok(vec!["t"])), RefreshOutcome::Superseded));
        assert_eq!(store.rows(), &["te"]);
    }

    #[test]
    fn test_stale_failure_is_dropped_quietly() {
        let mut store: Store<i32> = Store::new("numbers");
        let first = store.begin_refresh();
        let _second = store.begin_refresh();
        let outcome = store.apply(first, Err(ApiError::NotFound("gone".into())));
        assert!(matches!(outcome, RefreshOutcome::Superseded));
        assert!(store.is_loading());
    }

    #[test]
    fn test_age_display_never() {
        let store: Store<i32> = Store::new("numbers");
        assert_eq!(store.age_display(), "never");
    }
}
