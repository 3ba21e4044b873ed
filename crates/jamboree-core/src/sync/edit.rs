/// Inline edit of at most one row.
///
/// The draft is detached from the snapshot: refreshes never touch it, and it
/// is only sent when the caller saves.
#[derive(Debug, Clone)]
pub struct EditSession<P> {
    active: Option<(i64, P)>,
}

impl<P> Default for EditSession<P> {
    fn default() -> Self {
        Self { active: None }
    }
}

impl<P> EditSession<P> {
    /// Start editing `id`. An edit already in progress is discarded.
    pub fn begin(&mut self, id: i64, draft: P) {
        self.active = Some((id, draft));
    }

    /// Drop the draft without sending anything.
    pub fn cancel(&mut self) {
        self.active = None;
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn editing_id(&self) -> Option<i64> {
        self.active.as_ref().map(|(id, _)| *id)
    }

    pub fn is_editing(&self, id: i64) -> bool {
        self.editing_id() == Some(id)
    }

    pub fn draft(&self) -> Option<&P> {
        self.active.as_ref().map(|(_, draft)| draft)
    }

    pub fn draft_mut(&mut self) -> Option<&mut P> {
        self.active.as_mut().map(|(_, draft)| draft)
    }

    /// Close the session after its row has left the snapshot.
    /// Returns true if a session was closed.
    pub fn close_if_missing(&mut self, present: impl Fn(i64) -> bool) -> bool {
        match self.editing_id() {
            Some(id) if !present(id) => {
                self.active = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_and_cancel() {
        let mut session: EditSession<String> = EditSession::default();
        assert!(!session.is_active());

        session.begin(3, "draft".to_string());
        assert!(session.is_editing(3));
        session.draft_mut().unwrap().push('!');
        assert_eq!(session.draft().map(String::as_str), Some("draft!"));

        session.cancel();
        assert!(!session.is_active());
        assert_eq!(session.draft(), None);
    }

    #[test]
    fn test_second_begin_replaces_first() {
        let mut session = EditSession::default();
        session.begin(1, "one");
        session.begin(2, "two");
        assert!(!session.is_editing(1));
        assert_eq!(session.editing_id(), Some(2));
        assert_eq!(session.draft(), Some(&"two"));
    }

    #[test]
    fn test_close_if_missing() {
        let mut session = EditSession::default();
        session.begin(5, ());
        assert!(!session.close_if_missing(|id| id == 5));
        assert!(session.is_active());
        assert!(session.close_if_missing(|_| false));
        assert!(!session.is_active());
    }
}
