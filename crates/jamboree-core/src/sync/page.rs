use tracing::debug;

use super::dispatcher::{ConfirmedDelete, DeleteRequest};
use super::edit::EditSession;
use super::store::{RefreshOutcome, RefreshTicket, Store};
use crate::api::ApiError;
use crate::models::{Deletable, Resource};

/// Everything one page of the client owns: the snapshot, its filter, the
/// create form, the inline edit session and a pending delete.
pub struct Page<T: Resource> {
    pub store: Store<T>,
    pub query: T::Query,
    pub form: T::Draft,
    pub edit: EditSession<T::Patch>,
    pending_delete: Option<DeleteRequest<T>>,
}

impl<T: Resource> Default for Page<T> {
    fn default() -> Self {
        Self {
            store: Store::new(T::LABEL),
            query: T::Query::default(),
            form: T::Draft::default(),
            edit: EditSession::default(),
            pending_delete: None,
        }
    }
}

impl<T: Resource> Page<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket and capture the query to fetch with.
    pub fn begin_refresh(&mut self) -> (RefreshTicket, T::Query) {
        (self.store.begin_refresh(), self.query.clone())
    }

    /// Apply a list response. An edit session whose row is gone is closed.
    pub fn apply_refresh(&mut self, ticket: RefreshTicket, result: Result<Vec<T>, ApiError>) -> RefreshOutcome {
        let outcome = self.store.apply(ticket, result);
        if outcome.is_replaced() {
            let rows = self.store.rows();
            if self.edit.close_if_missing(|id| rows.iter().any(|r| r.id() == id)) {
                debug!(collection = T::LABEL, "Closed edit session for a row that no longer exists");
            }
            if let Some(request) = &self.pending_delete {
                let id = request.id();
                if !rows.iter().any(|r| r.id() == id) {
                    self.pending_delete = None;
                }
            }
        }
        outcome
    }

    /// Rows to show for the current query.
    pub fn visible(&self) -> Vec<&T> {
        T::visible(self.store.rows(), &self.query)
    }

    /// Replace the query. Returns true when the list must be refetched,
    /// i.e. when the request parameters changed.
    pub fn set_query(&mut self, query: T::Query) -> bool {
        let refetch = T::query_params(&self.query) != T::query_params(&query);
        self.query = query;
        refetch
    }

    /// Start an inline edit seeded from `row`.
    pub fn begin_edit(&mut self, row: &T) {
        self.edit.begin(row.id(), row.edit_draft());
    }

    /// The edit draft to send, with its row id.
    pub fn edit_payload(&self) -> Option<(i64, T::Patch)> {
        let id = self.edit.editing_id()?;
        self.edit.draft().map(|draft| (id, draft.clone()))
    }

    /// Close the session after a successful save of `id`.
    pub fn finish_edit(&mut self, id: i64) {
        if self.edit.is_editing(id) {
            self.edit.cancel();
        }
    }

    pub fn reset_form(&mut self) {
        self.form = T::Draft::default();
    }

    pub fn find(&self, id: i64) -> Option<&T> {
        self.store.rows().iter().find(|r| r.id() == id)
    }
}

impl<T: Deletable> Page<T> {
    /// Ask to delete `id`. Replaces any earlier unconfirmed request.
    pub fn request_delete(&mut self, id: i64) {
        self.pending_delete = Some(DeleteRequest::new(id));
    }

    pub fn pending_delete(&self) -> Option<i64> {
        self.pending_delete.as_ref().map(DeleteRequest::id)
    }

    /// Confirm the pending request, if any.
    pub fn confirm_delete(&mut self) -> Option<ConfirmedDelete<T>> {
        self.pending_delete.take().map(DeleteRequest::confirm)
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Item, ItemStatus, Leader, Scout};
    use crate::sync::dispatcher::Dispatcher;
    use crate::sync::filter::{GroupFilter, ItemQuery, RosterFilter, StatusFilter};
    use crate::testing::MemoryBackend;

    async fn loaded<T: Resource>(dispatcher: &Dispatcher<MemoryBackend>) -> Page<T> {
        let mut page = Page::<T>::new();
        let (ticket, query) = page.begin_refresh();
        let result = dispatcher.fetch::<T>(&query).await;
        assert!(page.apply_refresh(ticket, result).is_replaced());
        page
    }

    #[tokio::test]
    async fn test_edit_one_field_changes_only_that_field() {
        let dispatcher = Dispatcher::new(MemoryBackend::seeded());
        let mut page = loaded::<Scout>(&dispatcher).await;
        let before = page.store.rows().to_vec();
        let target = before[0].clone();

        page.begin_edit(&target);
        page.edit.draft_mut().unwrap().patrol = Some("Falcon".into());
        let (id, patch) = page.edit_payload().unwrap();
        dispatcher.update::<Scout>(id, &patch).await.unwrap();
        page.finish_edit(id);
        assert!(!page.edit.is_active());

        let (ticket, query) = page.begin_refresh();
        page.apply_refresh(ticket, dispatcher.fetch::<Scout>(&query).await);

        for row in page.store.rows() {
            if row.id == id {
                assert_eq!(row.patrol, "Falcon");
                assert_eq!(Scout { patrol: target.patrol.clone(), ..row.clone() }, target);
            } else {
                assert!(before.contains(row));
            }
        }
    }

    #[tokio::test]
    async fn test_cancelled_edit_changes_nothing() {
        let dispatcher = Dispatcher::new(MemoryBackend::seeded());
        let mut page = loaded::<Leader>(&dispatcher).await;
        let before = page.store.rows().to_vec();

        page.begin_edit(&before[0]);
        page.edit.draft_mut().unwrap().name = Some("Someone else".into());
        page.edit.cancel();
        assert!(page.edit_payload().is_none());

        let after = dispatcher.fetch::<Leader>(&RosterFilter::default()).await.unwrap();
        assert_eq!(after, before);
    }

    #[tokio::test]
    async fn test_refresh_closes_edit_for_vanished_row() {
        let dispatcher = Dispatcher::new(MemoryBackend::seeded());
        let mut page = loaded::<Item>(&dispatcher).await;
        let victim = page.store.rows()[0].clone();

        page.begin_edit(&victim);
        page.edit.draft_mut().unwrap().quantity = Some(9);

        dispatcher.delete(DeleteRequest::<Item>::new(victim.id).confirm()).await.unwrap();
        let (ticket, query) = page.begin_refresh();
        page.apply_refresh(ticket, dispatcher.fetch::<Item>(&query).await);

        assert!(!page.edit.is_active());
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_rows_and_edit() {
        let backend = MemoryBackend::seeded();
        let dispatcher = Dispatcher::new(backend);
        let mut page = loaded::<Item>(&dispatcher).await;
        let rows = page.store.len();
        let first = page.store.rows()[0].clone();
        page.begin_edit(&first);

        dispatcher.backend().fail_next(ApiError::ServerError("down".into()));
        let (ticket, query) = page.begin_refresh();
        let outcome = page.apply_refresh(ticket, dispatcher.fetch::<Item>(&query).await);

        assert!(matches!(outcome, RefreshOutcome::Failed(ApiError::ServerError(_))));
        assert_eq!(page.store.len(), rows);
        assert!(page.edit.is_editing(first.id));
    }

    #[tokio::test]
    async fn test_failed_save_keeps_session_open() {
        let dispatcher = Dispatcher::new(MemoryBackend::seeded());
        let mut page = loaded::<Item>(&dispatcher).await;
        let first = page.store.rows()[0].clone();
        page.begin_edit(&first);

        dispatcher.backend().fail_next(ApiError::Rejected("quantity".into()));
        let (id, patch) = page.edit_payload().unwrap();
        assert!(dispatcher.update::<Item>(id, &patch).await.is_err());

        assert!(page.edit.is_editing(first.id));
    }

    #[test]
    fn test_item_query_change_requests_refetch_only_when_params_change() {
        let mut page = Page::<Item>::new();
        assert!(!page.set_query(ItemQuery::default()));

        let query = ItemQuery { search: "tent".into(), status: StatusFilter::All };
        assert!(page.set_query(query.clone()));
        assert!(!page.set_query(query));

        let query = ItemQuery { search: "tent".into(), status: StatusFilter::Only(ItemStatus::Borrowed) };
        assert!(page.set_query(query));
    }

    #[test]
    fn test_roster_query_never_refetches() {
        let mut page = Page::<Leader>::new();
        assert!(!page.set_query(RosterFilter { query: "aoki".into(), group: GroupFilter::Only(1) }));
    }

    #[tokio::test]
    async fn test_roster_visible_applies_filter() {
        let dispatcher = Dispatcher::new(MemoryBackend::seeded());
        let mut page = loaded::<Scout>(&dispatcher).await;
        let total = page.visible().len();
        assert_eq!(total, page.store.len());

        page.set_query(RosterFilter { query: String::new(), group: GroupFilter::Only(2) });
        assert!(page.visible().iter().all(|s| s.group_id == 2));
        assert!(page.visible().len() < total);
    }

    #[test]
    fn test_delete_request_lifecycle() {
        let mut page = Page::<Item>::new();
        assert!(page.confirm_delete().is_none());

        page.request_delete(4);
        assert_eq!(page.pending_delete(), Some(4));
        page.cancel_delete();
        assert!(page.confirm_delete().is_none());

        page.request_delete(5);
        let confirmed = page.confirm_delete().unwrap();
        assert_eq!(confirmed.id(), 5);
        assert_eq!(page.pending_delete(), None);
    }

    #[tokio::test]
    async fn test_refresh_drops_pending_delete_for_vanished_row() {
        let dispatcher = Dispatcher::new(MemoryBackend::seeded());
        let mut page = loaded::<Item>(&dispatcher).await;
        let victim = page.store.rows()[0].id;
        let survivor = page.store.rows()[1].id;

        page.request_delete(survivor);
        let (ticket, query) = page.begin_refresh();
        page.apply_refresh(ticket, dispatcher.fetch::<Item>(&query).await);
        assert_eq!(page.pending_delete(), Some(survivor));

        page.request_delete(victim);
        dispatcher.delete(DeleteRequest::<Item>::new(victim).confirm()).await.unwrap();
        let (ticket, query) = page.begin_refresh();
        page.apply_refresh(ticket, dispatcher.fetch::<Item>(&query).await);
        assert_eq!(page.pending_delete(), None);
    }

    #[test]
    fn test_reset_form() {
        let mut page = Page::<Item>::new();
        page.form.name = "Tent".into();
        page.form.quantity = 4;
        page.reset_form();
        assert_eq!(page.form, Default::default());
    }
}
