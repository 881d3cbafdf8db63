use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use warden_core::AppResult;
use warden_domain::{FieldErrors, Record, RecordType};

/// Collaborator-owned state a view reads after every controller operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(bound(serialize = ""))]
pub struct CollaboratorState<T: RecordType> {
    /// Canonical record list from the last completed fetch.
    pub records: Vec<Record<T>>,
    /// Validation messages keyed by field name.
    pub field_errors: FieldErrors,
    /// Indicates a fetch is in flight.
    pub fetching: bool,
    /// Last persistence failure, if any.
    pub error_message: Option<String>,
    /// Completion time of the last successful fetch.
    pub last_fetched_at: Option<DateTime<Utc>>,
}

impl<T: RecordType> Default for CollaboratorState<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            field_errors: FieldErrors::new(),
            fetching: false,
            error_message: None,
            last_fetched_at: None,
        }
    }
}

impl<T: RecordType> CollaboratorState<T> {
    /// Returns the canonical record with the given identifier.
    #[must_use]
    pub fn find_record(&self, identifier: &str) -> Option<&Record<T>> {
        self.records
            .iter()
            .find(|record| record.identifier() == identifier)
    }

    /// Returns true when any field-level validation message is present.
    #[must_use]
    pub fn has_field_errors(&self) -> bool {
        !self.field_errors.is_empty()
    }
}

/// Persistence collaborator consumed by editable collection controllers.
///
/// Every request is fire-and-forget: implementations enqueue the work and
/// return immediately. Completion is observed through [`Self::state`].
pub trait RecordCollaborator<T: RecordType>: Send + Sync {
    /// Requests a refresh of the canonical record list.
    fn fetch_all(&self);

    /// Requests creation of a new record.
    fn create(&self, record: Record<T>);

    /// Requests an update of an existing record by identifier.
    fn update(&self, record: Record<T>);

    /// Requests deletion of the record with the given identifier.
    fn delete(&self, identifier: &str);

    /// Requests that field-level validation messages be cleared.
    fn clear_field_errors(&self);

    /// Returns the latest collaborator-owned state.
    fn state(&self) -> CollaboratorState<T>;
}

/// Repository port for durable record storage.
#[async_trait]
pub trait RecordRepository<T: RecordType>: Send + Sync {
    /// Lists all stored records.
    async fn list_records(&self) -> AppResult<Vec<Record<T>>>;

    /// Stores a new record and returns it with its assigned identifier.
    async fn create_record(&self, record: Record<T>) -> AppResult<Record<T>>;

    /// Replaces a stored record matched by identifier.
    async fn update_record(&self, record: Record<T>) -> AppResult<Record<T>>;

    /// Deletes a stored record by identifier.
    async fn delete_record(&self, identifier: &str) -> AppResult<()>;
}
