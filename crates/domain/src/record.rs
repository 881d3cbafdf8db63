use std::collections::BTreeMap;
use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::field::{FieldErrors, FieldValue, RecordField};

/// Nested entry owned by a record and located by a composite identity key.
pub trait ChildItem:
    Clone + Debug + PartialEq + Send + Sync + Serialize + DeserializeOwned + 'static
{
    /// Identity key used to locate this item among its siblings.
    type Key: PartialEq + Debug;

    /// Returns the identity key of this item.
    fn key(&self) -> Self::Key;
}

/// Type-level description of an editable record: its fields and children.
pub trait RecordType: Clone + Copy + Debug + Default + PartialEq + Send + Sync + 'static {
    /// Recognised scalar fields.
    type Field: RecordField;
    /// Nested child item type.
    type Child: ChildItem;

    /// Human-readable record type label used in logs and messages.
    const LABEL: &'static str;
}

/// Parent entity being edited, holding scalar fields and ordered children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "", deserialize = ""), rename_all = "camelCase")]
pub struct Record<T: RecordType> {
    #[serde(default)]
    identifier: String,
    #[serde(default)]
    scalar_fields: BTreeMap<T::Field, FieldValue>,
    #[serde(default)]
    children: Vec<T::Child>,
}

impl<T: RecordType> Default for Record<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: RecordType> Record<T> {
    /// Creates an empty, not yet persisted record.
    #[must_use]
    pub fn new() -> Self {
        Self {
            identifier: String::new(),
            scalar_fields: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Returns a copy of this record carrying the given identifier.
    #[must_use]
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = identifier.into();
        self
    }

    /// Returns a copy of this record with one scalar field set.
    #[must_use]
    pub fn with_field(mut self, field: T::Field, value: FieldValue) -> Self {
        self.scalar_fields.insert(field, value);
        self
    }

    /// Returns a copy of this record with the given children.
    #[must_use]
    pub fn with_children(mut self, children: Vec<T::Child>) -> Self {
        self.children = children;
        self
    }

    /// Returns the persisted identifier, empty while new.
    #[must_use]
    pub fn identifier(&self) -> &str {
        self.identifier.as_str()
    }

    /// Returns true when this record has not been persisted yet.
    #[must_use]
    pub fn is_new(&self) -> bool {
        self.identifier.is_empty()
    }

    /// Returns all staged scalar fields.
    #[must_use]
    pub fn scalar_fields(&self) -> &BTreeMap<T::Field, FieldValue> {
        &self.scalar_fields
    }

    /// Returns one scalar field value.
    #[must_use]
    pub fn field(&self, field: T::Field) -> Option<&FieldValue> {
        self.scalar_fields.get(&field)
    }

    /// Returns one text field value.
    #[must_use]
    pub fn text(&self, field: T::Field) -> Option<&str> {
        self.field(field).and_then(FieldValue::as_text)
    }

    /// Returns one boolean field value.
    #[must_use]
    pub fn flag(&self, field: T::Field) -> Option<bool> {
        self.field(field).and_then(FieldValue::as_flag)
    }

    /// Returns the ordered children.
    #[must_use]
    pub fn children(&self) -> &[T::Child] {
        self.children.as_slice()
    }

    /// Sets one scalar field value.
    pub fn set_field(&mut self, field: T::Field, value: FieldValue) {
        self.scalar_fields.insert(field, value);
    }

    /// Appends a child without checking for an existing identity key.
    pub fn add_child(&mut self, item: T::Child) {
        self.children.push(item);
    }

    /// Replaces the first child sharing the item's identity key in place.
    ///
    /// Returns false and leaves the children untouched when no key matches.
    pub fn update_child(&mut self, item: T::Child) -> bool {
        match self.position_of(&item.key()) {
            Some(index) => {
                self.children[index] = item;
                true
            }
            None => false,
        }
    }

    /// Removes the first child sharing the item's identity key.
    ///
    /// Returns false and leaves the children untouched when no key matches.
    pub fn remove_child(&mut self, item: &T::Child) -> bool {
        match self.position_of(&item.key()) {
            Some(index) => {
                self.children.remove(index);
                true
            }
            None => false,
        }
    }

    /// Merges an existing record into this working copy.
    ///
    /// A working copy that already carries an identifier is left as is.
    /// Otherwise identifier and children come from `existing`, and scalar
    /// fields not staged yet are filled in from it.
    pub fn merge_from(&mut self, existing: &Self) {
        if !self.identifier.is_empty() {
            return;
        }

        self.identifier = existing.identifier.clone();
        self.children = existing.children.clone();
        for (field, value) in &existing.scalar_fields {
            self.scalar_fields
                .entry(*field)
                .or_insert_with(|| value.clone());
        }
    }

    /// Returns a new working copy with the same settings as this record.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        Self {
            identifier: String::new(),
            scalar_fields: self.scalar_fields.clone(),
            children: self.children.clone(),
        }
    }

    /// Checks every staged value against its field's declared kind, then
    /// checks required fields. Returns one message per offending field.
    #[must_use]
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        for field in T::Field::all() {
            let name = field.as_str();
            match self.field(*field) {
                Some(value) if value.kind() != field.kind() => {
                    errors.insert(
                        name.to_owned(),
                        format!("{name} must be a {} value", field.kind().as_str()),
                    );
                }
                Some(value) if field.is_required() && value.is_blank() => {
                    errors.insert(name.to_owned(), format!("{name} is required"));
                }
                None if field.is_required() => {
                    errors.insert(name.to_owned(), format!("{name} is required"));
                }
                _ => {}
            }
        }

        errors
    }

    fn position_of(&self, key: &<T::Child as ChildItem>::Key) -> Option<usize> {
        self.children.iter().position(|child| &child.key() == key)
    }
}
