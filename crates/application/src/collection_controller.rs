use std::sync::Arc;

use warden_domain::{FieldValue, Record, RecordType, ValueKind};

use crate::collection_ports::{CollaboratorState, RecordCollaborator};


/// Controller for one edit session over a record and its nested children.
///
/// Holds the working copy of a record while the user edits it. Every
/// operation returns an owned snapshot of the working copy for re-render.
/// Persistence goes through the injected collaborator; the controller never
/// waits for or interprets its outcome.
pub struct EditableCollectionController<T: RecordType> {
    record: Record<T>,
    collaborator: Arc<dyn RecordCollaborator<T>>,
}

impl<T: RecordType> EditableCollectionController<T> {
    /// Creates a controller with an empty working copy.
    #[must_use]
    pub fn new(collaborator: Arc<dyn RecordCollaborator<T>>) -> Self {
        Self {
            record: Record::new(),
            collaborator,
        }
    }

    /// Returns a snapshot of the working copy.
    #[must_use]
    pub fn record(&self) -> Record<T> {
        self.record.clone()
    }

    /// Returns a snapshot of the collaborator-owned state.
    #[must_use]
    pub fn collaborator_state(&self) -> CollaboratorState<T> {
        self.collaborator.state()
    }

    /// Sets one scalar field from raw user input.
    pub fn set_scalar_field(
        &mut self,
        field: T::Field,
        raw_value: &str,
        value_kind: ValueKind,
    ) -> Record<T> {
        self.record
            .set_field(field, FieldValue::coerce(raw_value, value_kind));
        self.record()
    }

    /// Starts editing, optionally seeded from an existing record.
    pub fn begin_edit(&mut self, existing: Option<&Record<T>>) -> Record<T> {
        if let Some(existing) = existing {
            self.record.merge_from(existing);
        }
        self.record()
    }

    /// Starts a new record with the same settings as an existing one.
    pub fn begin_copy(&mut self, existing: &Record<T>) -> Record<T> {
        self.record = existing.duplicate();
        self.record()
    }

    /// Appends a child item without checking for a matching key.
    pub fn add_child(&mut self, item: T::Child) -> Record<T> {
        self.record.add_child(item);
        self.record()
    }

    /// Replaces the child sharing the item's key; ignored when none matches.
    pub fn update_child(&mut self, item: T::Child) -> Record<T> {
        self.record.update_child(item);
        self.record()
    }

    /// Removes the child sharing the item's key; ignored when none matches.
    pub fn remove_child(&mut self, item: &T::Child) -> Record<T> {
        self.record.remove_child(item);
        self.record()
    }

    /// Hands the working copy to the collaborator and resets it.
    ///
    /// New records are created, records with an identifier are updated.
    pub fn commit(&mut self) -> Record<T> {
        let record = std::mem::take(&mut self.record);
        if record.is_new() {
            self.collaborator.create(record);
        } else {
            self.collaborator.update(record);
        }
        self.collaborator.fetch_all();
        self.record()
    }

    /// Drops the working copy and clears field-level errors.
    pub fn discard(&mut self) -> Record<T> {
        self.record = Record::new();
        self.collaborator.clear_field_errors();
        self.record()
    }

    /// Requests deletion of each identifier, then a refreshed list.
    pub fn delete_records<I, S>(&mut self, identifiers: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for identifier in identifiers {
            self.collaborator.delete(identifier.as_ref());
        }
        self.collaborator.fetch_all();
    }

    /// Requests a refreshed canonical list.
    pub fn refresh(&self) {
        self.collaborator.fetch_all();
    }
}
