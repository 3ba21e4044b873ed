use std::fmt;

use serde::{Deserialize, Serialize};

use super::form::{flag_text, optional_text, parse_flag, parse_number, FieldError, FieldKind, FieldSpec, FormFields};
use super::resource::{require, require_group, require_if_set};
use super::{Collection, Deletable, Group, Resource, ValidationError};
use crate::sync::filter::ItemQuery;
use crate::utils::PLACEHOLDER;

// ============================================================================
// Status
// ============================================================================

/// Storage status of an item.
///
/// The backend stores status as free text; values outside the known set are
/// kept verbatim in `Other` so they survive an edit round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ItemStatus {
    Stored,
    Borrowed,
    NeedsMaintenance,
    Other(String),
}

impl ItemStatus {
    /// The statuses offered in choice fields and filters, in display order.
    pub const CHOICES: [ItemStatus; 3] = [
        ItemStatus::Stored,
        ItemStatus::Borrowed,
        ItemStatus::NeedsMaintenance,
    ];

    /// Wire value
    pub fn as_str(&self) -> &str {
        match self {
            ItemStatus::Stored => "stored",
            ItemStatus::Borrowed => "borrowed",
            ItemStatus::NeedsMaintenance => "needs-maintenance",
            ItemStatus::Other(s) => s,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ItemStatus::Stored => "Stored",
            ItemStatus::Borrowed => "Borrowed",
            ItemStatus::NeedsMaintenance => "Needs maintenance",
            ItemStatus::Other(s) => s,
        }
    }

    /// Next status in `CHOICES`, wrapping. Unknown statuses move to the first.
    pub fn next(&self) -> Self {
        match self {
            ItemStatus::Stored => ItemStatus::Borrowed,
            ItemStatus::Borrowed => ItemStatus::NeedsMaintenance,
            ItemStatus::NeedsMaintenance | ItemStatus::Other(_) => ItemStatus::Stored,
        }
    }
}

impl Default for ItemStatus {
    fn default() -> Self {
        ItemStatus::Stored
    }
}

impl From<String> for ItemStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "stored" => ItemStatus::Stored,
            "borrowed" => ItemStatus::Borrowed,
            "needs-maintenance" => ItemStatus::NeedsMaintenance,
            _ => ItemStatus::Other(value),
        }
    }
}

impl From<ItemStatus> for String {
    fn from(value: ItemStatus) -> Self {
        match value {
            ItemStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ============================================================================
// Item
// ============================================================================

fn default_quantity() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub status: ItemStatus,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default, alias = "bring_to_jamboree")]
    pub bring_to_event: bool,
    pub location: String,
    pub owner_group_id: i64,
    #[serde(default)]
    pub approved_leader_id: Option<i64>,
    #[serde(default)]
    pub responsible_scout_id: Option<i64>,
    #[serde(default)]
    pub note: Option<String>,
    /// Owning group, when the backend embeds it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<Group>,
}

impl Item {
    /// Owning group's name from the lookup table, then the embedded group, then `-`
    pub fn group_label<'a>(&'a self, groups: &'a [Group]) -> &'a str {
        groups
            .iter()
            .chain(self.group.as_ref())
            .find(|g| g.id == self.owner_group_id)
            .map(|g| g.name.as_str())
            .unwrap_or(PLACEHOLDER)
    }

    /// Note for display, `-` when empty
    pub fn note_display(&self) -> &str {
        self.note.as_deref().filter(|n| !n.is_empty()).unwrap_or("-")
    }
}

impl Collection for Item {
    const PATH: &'static str = "/api/items";
    const LABEL: &'static str = "items";
    type Query = ItemQuery;

    fn query_params(query: &ItemQuery) -> Vec<(&'static str, String)> {
        query.params()
    }
}

impl Resource for Item {
    type Draft = ItemDraft;
    type Patch = ItemPatch;

    fn id(&self) -> i64 {
        self.id
    }

    fn validate(draft: &ItemDraft) -> Result<(), ValidationError> {
        require(&draft.name, "Name")?;
        require(&draft.category, "Category")?;
        require(&draft.location, "Location")?;
        if draft.quantity < 1 {
            return Err(ValidationError::Quantity);
        }
        require_group(draft.owner_group_id)
    }

    fn validate_patch(patch: &ItemPatch) -> Result<(), ValidationError> {
        require_if_set(&patch.name, "Name")?;
        require_if_set(&patch.category, "Category")?;
        require_if_set(&patch.location, "Location")?;
        if patch.quantity.is_some_and(|q| q < 1) {
            return Err(ValidationError::Quantity);
        }
        patch.owner_group_id.map_or(Ok(()), require_group)
    }

    /// Inline edits cover the fields that change while gear moves around.
    fn edit_draft(&self) -> ItemPatch {
        ItemPatch {
            category: Some(self.category.clone()),
            status: Some(self.status.clone()),
            quantity: Some(self.quantity),
            bring_to_event: Some(self.bring_to_event),
            ..Default::default()
        }
    }
}

impl Deletable for Item {}

// ============================================================================
// Payloads
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDraft {
    pub name: String,
    pub category: String,
    pub status: ItemStatus,
    pub quantity: u32,
    pub bring_to_event: bool,
    pub location: String,
    pub owner_group_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Default for ItemDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            category: String::new(),
            status: ItemStatus::Stored,
            quantity: 1,
            bring_to_event: false,
            location: String::new(),
            owner_group_id: 0,
            note: None,
        }
    }
}

const ITEM_DRAFT_FIELDS: [FieldSpec; 8] = [
    FieldSpec::new("Name", FieldKind::Text),
    FieldSpec::new("Category", FieldKind::Category),
    FieldSpec::new("Status", FieldKind::Status),
    FieldSpec::new("Quantity", FieldKind::Number),
    FieldSpec::new("Bring to event", FieldKind::Flag),
    FieldSpec::new("Location", FieldKind::Text),
    FieldSpec::new("Owner group", FieldKind::Group),
    FieldSpec::new("Note", FieldKind::Text),
];

impl FormFields for ItemDraft {
    fn fields() -> &'static [FieldSpec] {
        &ITEM_DRAFT_FIELDS
    }

    fn value(&self, index: usize) -> String {
        match index {
            0 => self.name.clone(),
            1 => self.category.clone(),
            2 => self.status.as_str().to_string(),
            3 => self.quantity.to_string(),
            4 => flag_text(self.bring_to_event),
            5 => self.location.clone(),
            6 => self.owner_group_id.to_string(),
            7 => self.note.clone().unwrap_or_default(),
            _ => String::new(),
        }
    }

    fn set_value(&mut self, index: usize, value: &str) -> Result<(), FieldError> {
        match index {
            0 => self.name = value.to_string(),
            1 => self.category = value.to_string(),
            2 => self.status = ItemStatus::from(value.to_string()),
            3 => self.quantity = parse_number(value, "Quantity")?,
            4 => self.bring_to_event = parse_flag(value),
            5 => self.location = value.to_string(),
            6 => self.owner_group_id = parse_number(value, "Owner group")?,
            7 => self.note = optional_text(value),
            _ => return Err(FieldError::OutOfRange(index)),
        }
        Ok(())
    }
}

/// Partial update for an item. Unset fields are left alone by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ItemStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bring_to_event: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_group_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

const ITEM_PATCH_FIELDS: [FieldSpec; 4] = [
    FieldSpec::new("Category", FieldKind::Category),
    FieldSpec::new("Status", FieldKind::Status),
    FieldSpec::new("Quantity", FieldKind::Number),
    FieldSpec::new("Bring to event", FieldKind::Flag),
];

impl FormFields for ItemPatch {
    fn fields() -> &'static [FieldSpec] {
        &ITEM_PATCH_FIELDS
    }

    fn value(&self, index: usize) -> String {
        match index {
            0 => self.category.clone().unwrap_or_default(),
            1 => self.status.as_ref().map(|s| s.as_str().to_string()).unwrap_or_default(),
            2 => self.quantity.map(|q| q.to_string()).unwrap_or_default(),
            3 => flag_text(self.bring_to_event.unwrap_or(false)),
            _ => String::new(),
        }
    }

    fn set_value(&mut self, index: usize, value: &str) -> Result<(), FieldError> {
        match index {
            0 => self.category = Some(value.to_string()),
            1 => self.status = Some(ItemStatus::from(value.to_string())),
            2 => self.quantity = Some(parse_number(value, "Quantity")?),
            3 => self.bring_to_event = Some(parse_flag(value)),
            _ => return Err(FieldError::OutOfRange(index)),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_values() {
        assert_eq!(ItemStatus::from("needs-maintenance".to_string()), ItemStatus::NeedsMaintenance);
        assert_eq!(String::from(ItemStatus::Borrowed), "borrowed");
        assert_eq!(
            ItemStatus::from("on loan to district".to_string()),
            ItemStatus::Other("on loan to district".to_string())
        );
    }

    #[test]
    fn test_group_label_falls_back_to_embedded_group() {
        let mut item: Item = serde_json::from_str(
            r#"{"id": 1, "name": "Tent", "category": "Camping", "status": "stored",
                "location": "Shed A", "owner_group_id": 2,
                "group": {"id": 2, "name": "Troop 12", "description": null}}"#,
        )
        .unwrap();
        let groups = vec![Group { id: 1, name: "Troop 7".into(), description: None }];
        assert_eq!(item.group_label(&groups), "Troop 12");
        assert_eq!(item.group_label(&[]), "Troop 12");

        item.owner_group_id = 1;
        assert_eq!(item.group_label(&groups), "Troop 7");

        item.group = None;
        item.owner_group_id = 5;
        assert_eq!(item.group_label(&groups), "-");
    }

    #[test]
    fn test_status_next_wraps() {
        assert_eq!(ItemStatus::Stored.next(), ItemStatus::Borrowed);
        assert_eq!(ItemStatus::NeedsMaintenance.next(), ItemStatus::Stored);
        assert_eq!(ItemStatus::Other("x".into()).next(), ItemStatus::Stored);
    }

    #[test]
    fn test_item_decodes_legacy_flag_and_defaults() {
        let json = r#"{
            "id": 3, "name": "Tent", "category": "Camping", "status": "stored",
            "bring_to_jamboree": true, "location": "Shed A", "owner_group_id": 1,
            "group": {"id": 1, "name": "Troop 7", "description": null}
        }"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert!(item.bring_to_event);
        assert_eq!(item.quantity, 1);
        assert_eq!(item.note_display(), "-");
        assert_eq!(item.group.map(|g| g.name), Some("Troop 7".to_string()));
    }

    #[test]
    fn test_validate_item_draft() {
        let mut draft = ItemDraft {
            name: "Tent".into(),
            category: "Camping".into(),
            location: "Shed A".into(),
            owner_group_id: 1,
            quantity: 2,
            ..Default::default()
        };
        assert_eq!(Item::validate(&draft), Ok(()));

        draft.category.clear();
        assert_eq!(Item::validate(&draft), Err(ValidationError::Required("Category")));

        draft.category = "Camping".into();
        draft.quantity = 0;
        assert_eq!(Item::validate(&draft), Err(ValidationError::Quantity));

        draft.quantity = 1;
        draft.owner_group_id = 0;
        assert_eq!(Item::validate(&draft), Err(ValidationError::Required("Group")));
    }

    #[test]
    fn test_validate_item_patch_checks_set_fields_only() {
        assert_eq!(Item::validate_patch(&ItemPatch::default()), Ok(()));

        // A cleared quantity parses to zero
        let mut patch = ItemPatch { category: Some("Camping".into()), ..Default::default() };
        patch.set_value(2, "").unwrap();
        assert_eq!(Item::validate_patch(&patch), Err(ValidationError::Quantity));

        patch.quantity = Some(3);
        assert_eq!(Item::validate_patch(&patch), Ok(()));

        patch.category = Some("  ".into());
        assert_eq!(Item::validate_patch(&patch), Err(ValidationError::Required("Category")));

        let patch = ItemPatch { owner_group_id: Some(0), ..Default::default() };
        assert_eq!(Item::validate_patch(&patch), Err(ValidationError::Required("Group")));
    }

    #[test]
    fn test_patch_serializes_only_set_fields() {
        let patch = ItemPatch { quantity: Some(4), ..Default::default() };
        assert_eq!(serde_json::to_value(&patch).unwrap(), serde_json::json!({"quantity": 4}));
    }

    #[test]
    fn test_edit_draft_covers_movable_fields() {
        let item = Item {
            id: 9,
            name: "Stove".into(),
            category: "Cooking".into(),
            status: ItemStatus::Borrowed,
            quantity: 2,
            bring_to_event: true,
            location: "Shed B".into(),
            owner_group_id: 1,
            approved_leader_id: None,
            responsible_scout_id: None,
            note: None,
            group: None,
        };
        let patch = item.edit_draft();
        assert_eq!(patch.status, Some(ItemStatus::Borrowed));
        assert_eq!(patch.quantity, Some(2));
        assert_eq!(patch.name, None);
        assert_eq!(patch.location, None);
    }

    #[test]
    fn test_draft_form_fields() {
        let mut draft = ItemDraft::default();
        draft.set_value(3, "12").unwrap();
        draft.set_value(4, "yes").unwrap();
        draft.set_value(6, "2").unwrap();
        assert_eq!(draft.quantity, 12);
        assert!(draft.bring_to_event);
        assert_eq!(draft.value(6), "2");
        assert!(draft.set_value(3, "twelve").is_err());
        assert_eq!(draft.set_value(99, ""), Err(FieldError::OutOfRange(99)));
    }
}
