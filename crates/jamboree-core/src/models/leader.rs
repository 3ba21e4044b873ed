use serde::{Deserialize, Serialize};

use super::form::{optional_text, parse_number, FieldError, FieldKind, FieldSpec, FormFields};
use super::resource::{require, require_group, require_if_set};
use super::{Collection, Resource, ValidationError};
use crate::sync::filter::{filter_roster, RosterEntry, RosterFilter};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leader {
    pub id: i64,
    pub name: String,
    pub group_id: i64,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Soft-delete flag. Displayed, never toggled from this client.
    #[serde(default)]
    pub is_deleted: bool,
}

impl RosterEntry for Leader {
    fn names(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }

    fn group_id(&self) -> i64 {
        self.group_id
    }
}

impl Collection for Leader {
    const PATH: &'static str = "/api/leaders";
    const LABEL: &'static str = "leaders";
    type Query = RosterFilter;

    fn visible<'a>(rows: &'a [Self], query: &RosterFilter) -> Vec<&'a Self> {
        filter_roster(rows, query)
    }
}

impl Resource for Leader {
    type Draft = LeaderDraft;
    type Patch = LeaderPatch;

    fn id(&self) -> i64 {
        self.id
    }

    fn validate(draft: &LeaderDraft) -> Result<(), ValidationError> {
        require(&draft.name, "Name")?;
        require_group(draft.group_id)
    }

    fn validate_patch(patch: &LeaderPatch) -> Result<(), ValidationError> {
        require_if_set(&patch.name, "Name")?;
        patch.group_id.map_or(Ok(()), require_group)
    }

    fn edit_draft(&self) -> LeaderPatch {
        LeaderPatch {
            name: Some(self.name.clone()),
            group_id: Some(self.group_id),
            role: self.role.clone(),
            gender: self.gender.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeaderDraft {
    pub name: String,
    pub group_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeaderPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

const LEADER_FIELDS: [FieldSpec; 6] = [
    FieldSpec::new("Name", FieldKind::Text),
    FieldSpec::new("Group", FieldKind::Group),
    FieldSpec::new("Role", FieldKind::Text),
    FieldSpec::new("Gender", FieldKind::Text),
    FieldSpec::new("Phone", FieldKind::Text),
    FieldSpec::new("Email", FieldKind::Text),
];

impl FormFields for LeaderDraft {
    fn fields() -> &'static [FieldSpec] {
        &LEADER_FIELDS
    }

    fn value(&self, index: usize) -> String {
        match index {
            0 => self.name.clone(),
            1 => self.group_id.to_string(),
            2 => self.role.clone().unwrap_or_default(),
            3 => self.gender.clone().unwrap_or_default(),
            4 => self.phone.clone().unwrap_or_default(),
            5 => self.email.clone().unwrap_or_default(),
            _ => String::new(),
        }
    }

    fn set_value(&mut self, index: usize, value: &str) -> Result<(), FieldError> {
        match index {
            0 => self.name = value.to_string(),
            1 => self.group_id = parse_number(value, "Group")?,
            2 => self.role = optional_text(value),
            3 => self.gender = optional_text(value),
            4 => self.phone = optional_text(value),
            5 => self.email = optional_text(value),
            _ => return Err(FieldError::OutOfRange(index)),
        }
        Ok(())
    }
}

impl FormFields for LeaderPatch {
    fn fields() -> &'static [FieldSpec] {
        &LEADER_FIELDS
    }

    fn value(&self, index: usize) -> String {
        match index {
            0 => self.name.clone().unwrap_or_default(),
            1 => self.group_id.map(|g| g.to_string()).unwrap_or_default(),
            2 => self.role.clone().unwrap_or_default(),
            3 => self.gender.clone().unwrap_or_default(),
            4 => self.phone.clone().unwrap_or_default(),
            5 => self.email.clone().unwrap_or_default(),
            _ => String::new(),
        }
    }

    fn set_value(&mut self, index: usize, value: &str) -> Result<(), FieldError> {
        match index {
            0 => self.name = Some(value.to_string()),
            1 => self.group_id = Some(parse_number(value, "Group")?),
            // Cleared contact fields are sent as empty strings so the
            // backend actually blanks them.
            2 => self.role = Some(value.to_string()),
            3 => self.gender = Some(value.to_string()),
            4 => self.phone = Some(value.to_string()),
            5 => self.email = Some(value.to_string()),
            _ => return Err(FieldError::OutOfRange(index)),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_leader_patch() {
        let mut patch = LeaderPatch { name: Some("Aoki Hiro".into()), group_id: Some(1), ..Default::default() };
        assert_eq!(Leader::validate_patch(&patch), Ok(()));

        patch.set_value(0, "   ").unwrap();
        assert_eq!(Leader::validate_patch(&patch), Err(ValidationError::Required("Name")));

        patch.name = Some("Aoki Hiro".into());
        patch.group_id = Some(0);
        assert_eq!(Leader::validate_patch(&patch), Err(ValidationError::Required("Group")));

        // Contact fields may be blanked
        let patch = LeaderPatch { phone: Some(String::new()), ..Default::default() };
        assert_eq!(Leader::validate_patch(&patch), Ok(()));
    }

    #[test]
    fn test_leader_decodes_without_optional_fields() {
        let leader: Leader = serde_json::from_str(r#"{"id": 1, "name": "Aoki", "group_id": 2}"#).unwrap();
        assert_eq!(leader.role, None);
        assert!(!leader.is_deleted);
    }

    #[test]
    fn test_validate_leader_draft() {
        let mut draft = LeaderDraft { name: "Aoki".into(), group_id: 2, ..Default::default() };
        assert_eq!(Leader::validate(&draft), Ok(()));
        draft.name = "  ".into();
        assert_eq!(Leader::validate(&draft), Err(ValidationError::Required("Name")));
    }

    #[test]
    fn test_draft_omits_empty_contact_fields() {
        let mut draft = LeaderDraft { name: "Aoki".into(), group_id: 2, ..Default::default() };
        draft.set_value(4, "").unwrap();
        draft.set_value(2, "Scoutmaster").unwrap();
        assert_eq!(
            serde_json::to_value(&draft).unwrap(),
            serde_json::json!({"name": "Aoki", "group_id": 2, "role": "Scoutmaster"})
        );
    }

    #[test]
    fn test_edit_draft_copies_row() {
        let leader = Leader {
            id: 4,
            name: "Aoki".into(),
            group_id: 2,
            role: Some("Scoutmaster".into()),
            gender: None,
            phone: Some("5551234567".into()),
            email: None,
            is_deleted: false,
        };
        let patch = leader.edit_draft();
        assert_eq!(patch.name.as_deref(), Some("Aoki"));
        assert_eq!(patch.role.as_deref(), Some("Scoutmaster"));
        assert_eq!(patch.value(4), "5551234567");
    }
}
