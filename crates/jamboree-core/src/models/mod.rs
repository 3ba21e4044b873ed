//! Data models for the inventory backend.
//!
//! - `Item`: a piece of equipment with status, quantity and owning group
//! - `Leader`, `Scout`: roster members belonging to a group
//! - `Group`, `Category`: read-only lookups
//!
//! Each editable entity comes with a create payload (`*Draft`) and an update
//! payload (`*Patch`). The `Collection`/`Resource` traits tell the sync layer
//! where an entity lives on the backend and how it is edited.

pub mod form;
pub mod item;
pub mod leader;
pub mod lookup;
pub mod resource;
pub mod scout;

pub use form::{FieldError, FieldKind, FieldSpec, FormFields};
pub use item::{Item, ItemDraft, ItemPatch, ItemStatus};
pub use leader::{Leader, LeaderDraft, LeaderPatch};
pub use lookup::{active_categories, Category, Group};
pub use resource::{Collection, Deletable, Resource, ValidationError};
pub use scout::{Scout, ScoutDraft, ScoutPatch};
