use serde::{Deserialize, Serialize};

use super::form::{parse_number, FieldError, FieldKind, FieldSpec, FormFields};
use super::resource::{require, require_group, require_if_set};
use super::{Collection, Resource, ValidationError};
use crate::sync::filter::{filter_roster, RosterEntry, RosterFilter};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scout {
    pub id: i64,
    pub name: String,
    /// Phonetic reading of the name, searched alongside it
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name_kana: String,
    pub group_id: i64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub grade: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub rank: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub gender: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub patrol: String,
    /// Soft-delete flag. Displayed, never toggled from this client.
    #[serde(default)]
    pub is_deleted: bool,
}

/// The backend sends `null` for unset optional text.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}

impl RosterEntry for Scout {
    fn names(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.name_kana.as_str()]
    }

    fn group_id(&self) -> i64 {
        self.group_id
    }
}

impl Collection for Scout {
    const PATH: &'static str = "/api/scouts";
    const LABEL: &'static str = "scouts";
    type Query = RosterFilter;

    fn visible<'a>(rows: &'a [Self], query: &RosterFilter) -> Vec<&'a Self> {
        filter_roster(rows, query)
    }
}

impl Resource for Scout {
    type Draft = ScoutDraft;
    type Patch = ScoutPatch;

    fn id(&self) -> i64 {
        self.id
    }

    fn validate(draft: &ScoutDraft) -> Result<(), ValidationError> {
        require(&draft.name, "Name")?;
        require(&draft.name_kana, "Reading")?;
        require_group(draft.group_id)
    }

    fn validate_patch(patch: &ScoutPatch) -> Result<(), ValidationError> {
        require_if_set(&patch.name, "Name")?;
        require_if_set(&patch.name_kana, "Reading")?;
        patch.group_id.map_or(Ok(()), require_group)
    }

    fn edit_draft(&self) -> ScoutPatch {
        ScoutPatch {
            name: Some(self.name.clone()),
            name_kana: Some(self.name_kana.clone()),
            group_id: Some(self.group_id),
            grade: Some(self.grade.clone()),
            rank: Some(self.rank.clone()),
            gender: Some(self.gender.clone()),
            patrol: Some(self.patrol.clone()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoutDraft {
    pub name: String,
    pub name_kana: String,
    pub group_id: i64,
    pub grade: String,
    pub rank: String,
    pub gender: String,
    pub patrol: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoutPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_kana: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patrol: Option<String>,
}

const SCOUT_FIELDS: [FieldSpec; 7] = [
    FieldSpec::new("Name", FieldKind::Text),
    FieldSpec::new("Reading", FieldKind::Text),
    FieldSpec::new("Group", FieldKind::Group),
    FieldSpec::new("Grade", FieldKind::Text),
    FieldSpec::new("Rank", FieldKind::Text),
    FieldSpec::new("Gender", FieldKind::Text),
    FieldSpec::new("Patrol", FieldKind::Text),
];

impl FormFields for ScoutDraft {
    fn fields() -> &'static [FieldSpec] {
        &SCOUT_FIELDS
    }

    fn value(&self, index: usize) -> String {
        match index {
            0 => self.name.clone(),
            1 => self.name_kana.clone(),
            2 => self.group_id.to_string(),
            3 => self.grade.clone(),
            4 => self.rank.clone(),
            5 => self.gender.clone(),
            6 => self.patrol.clone(),
            _ => String::new(),
        }
    }

    fn set_value(&mut self, index: usize, value: &str) -> Result<(), FieldError> {
        match index {
            0 => self.name = value.to_string(),
            1 => self.name_kana = value.to_string(),
            2 => self.group_id = parse_number(value, "Group")?,
            3 => self.grade = value.to_string(),
            4 => self.rank = value.to_string(),
            5 => self.gender = value.to_string(),
            6 => self.patrol = value.to_string(),
            _ => return Err(FieldError::OutOfRange(index)),
        }
        Ok(())
    }
}

impl FormFields for ScoutPatch {
    fn fields() -> &'static [FieldSpec] {
        &SCOUT_FIELDS
    }

    fn value(&self, index: usize) -> String {
        let value = match index {
            0 => self.name.clone(),
            1 => self.name_kana.clone(),
            2 => self.group_id.map(|g| g.to_string()),
            3 => self.grade.clone(),
            4 => self.rank.clone(),
            5 => self.gender.clone(),
            6 => self.patrol.clone(),
            _ => None,
        };
        value.unwrap_or_default()
    }

    fn set_value(&mut self, index: usize, value: &str) -> Result<(), FieldError> {
        match index {
            0 => self.name = Some(value.to_string()),
            1 => self.name_kana = Some(value.to_string()),
            2 => self.group_id = Some(parse_number(value, "Group")?),
            3 => self.grade = Some(value.to_string()),
            4 => self.rank = Some(value.to_string()),
            5 => self.gender = Some(value.to_string()),
            6 => self.patrol = Some(value.to_string()),
            _ => return Err(FieldError::OutOfRange(index)),
        }
        Ok(())
    }
}
