//! Client-side state kept in step with the backend.

pub mod dispatcher;
pub mod edit;
pub mod filter;
pub mod page;
pub mod stats;
pub mod store;

pub use dispatcher::{ConfirmedDelete, DeleteRequest, Dispatcher, MutationError, UploadReport};
pub use edit::EditSession;
pub use filter::{filter_roster, group_name, GroupFilter, ItemQuery, RosterEntry, RosterFilter, StatusFilter};
pub use page::Page;
pub use stats::{leaders_by_group, scouts_by_grade, Breakdown, ItemStats};
pub use store::{RefreshOutcome, RefreshTicket, Store};
