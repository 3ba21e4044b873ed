use thiserror::Error;

/// How a form field is edited and displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text
    Text,
    /// Non-negative integer
    Number,
    /// Yes/no toggle
    Flag,
    /// Group id chosen from the group lookup
    Group,
    /// Category name chosen from the active categories
    Category,
    /// Item status chosen from the fixed list
    Status,
}

impl FieldKind {
    /// Choice fields are cycled rather than typed into.
    pub fn is_choice(&self) -> bool {
        matches!(self, FieldKind::Flag | FieldKind::Group | FieldKind::Category | FieldKind::Status)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub label: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn new(label: &'static str, kind: FieldKind) -> Self {
        Self { label, kind }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("{0} must be a number")]
    NotANumber(&'static str),

    #[error("No field at position {0}")]
    OutOfRange(usize),
}

/// Field-by-field access to a create or update payload.
///
/// Values cross this boundary as text: numbers in decimal, flags as
/// `yes`/`no`, groups as their id. The terminal form editor only ever sees
/// this interface.
pub trait FormFields {
    fn fields() -> &'static [FieldSpec];

    fn value(&self, index: usize) -> String;

    fn set_value(&mut self, index: usize, value: &str) -> Result<(), FieldError>;
}

pub(crate) fn flag_text(value: bool) -> String {
    let text = if value { "yes" } else { "no" };
    text.to_string()
}

pub(crate) fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "yes" | "y" | "true" | "1")
}

/// Empty input clears a number back to zero.
pub(crate) fn parse_number<T: std::str::FromStr + Default>(
    value: &str,
    label: &'static str,
) -> Result<T, FieldError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(T::default());
    }
    trimmed.parse().map_err(|_| FieldError::NotANumber(label))
}

pub(crate) fn optional_text(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
