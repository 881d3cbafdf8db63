use std::collections::BTreeMap;
use std::fmt::Debug;
use std::hash::Hash;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use warden_core::{AppError, AppResult};

/// Per-field validation messages keyed by the field's transport name.
pub type FieldErrors = BTreeMap<String, String>;

/// Declared value type of a scalar field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// Free-form text stored verbatim.
    Text,
    /// Checkbox-style flag.
    Boolean,
}

impl ValueKind {
    /// Returns a stable transport value for this kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Boolean => "boolean",
        }
    }
}

/// Scalar value held by a record field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Boolean flag value.
    Flag(bool),
    /// Text value.
    Text(String),
}

impl FieldValue {
    /// Converts a raw input value according to the declared kind.
    ///
    /// Boolean values are `true` only when the raw input equals `"true"`
    /// ignoring ASCII case; anything else is `false`.
    #[must_use]
    pub fn coerce(raw_value: &str, kind: ValueKind) -> Self {
        match kind {
            ValueKind::Boolean => Self::Flag(raw_value.eq_ignore_ascii_case("true")),
            ValueKind::Text => Self::Text(raw_value.to_owned()),
        }
    }

    /// Returns the text value, if this is a text field.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value.as_str()),
            Self::Flag(_) => None,
        }
    }

    /// Returns the flag value, if this is a boolean field.
    #[must_use]
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(value) => Some(*value),
            Self::Text(_) => None,
        }
    }

    /// Returns the kind this value was stored as.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Text(_) => ValueKind::Text,
            Self::Flag(_) => ValueKind::Boolean,
        }
    }

    /// Returns true when the value is missing content for a required field.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(value) => value.trim().is_empty(),
            Self::Flag(_) => false,
        }
    }
}

/// Closed set of scalar field names recognised by one record type.
pub trait RecordField:
    Copy + Ord + Hash + Debug + Send + Sync + Serialize + DeserializeOwned + 'static
{
    /// Returns every recognised field in declaration order.
    fn all() -> &'static [Self];

    /// Returns the stable transport name of this field.
    fn as_str(&self) -> &'static str;

    /// Returns the declared value kind.
    fn kind(&self) -> ValueKind;

    /// Returns true when commits must carry a non-blank value for this field.
    fn is_required(&self) -> bool {
        false
    }

    /// Returns true when no two stored records may share this field's value.
    fn is_unique(&self) -> bool {
        false
    }

    /// Parses a transport name into a recognised field.
    fn parse(value: &str) -> AppResult<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|field| field.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown field name '{value}'")))
    }
}
