use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use warden_application::RecordRepository;
use warden_core::{AppError, AppResult};
use warden_domain::{Record, RecordField, RecordType};


/// In-memory record repository implementation.
#[derive(Debug, Default)]
pub struct InMemoryRecordRepository<T: RecordType> {
    records: RwLock<Vec<Record<T>>>,
}

impl<T: RecordType> InMemoryRecordRepository<T> {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    /// Creates a repository holding seed records.
    ///
    /// Seed records without an identifier are assigned one.
    #[must_use]
    pub fn with_records(records: Vec<Record<T>>) -> Self {
        let records = records
            .into_iter()
            .map(|record| {
                if record.is_new() {
                    record.with_identifier(Uuid::new_v4().to_string())
                } else {
                    record
                }
            })
            .collect();

        Self {
            records: RwLock::new(records),
        }
    }
}

/// Rejects a record whose unique field values collide with another stored record.
fn ensure_unique<T: RecordType>(records: &[Record<T>], candidate: &Record<T>) -> AppResult<()> {
    for field in T::Field::all().iter().filter(|field| field.is_unique()) {
        let Some(value) = candidate.text(*field).map(str::trim) else {
            continue;
        };

        let collides = records.iter().any(|stored| {
            stored.identifier() != candidate.identifier()
                && stored.text(*field).map(str::trim) == Some(value)
        });
        if collides {
            return Err(AppError::Conflict(format!(
                "{} with {} '{value}' already exists",
                T::LABEL,
                field.as_str()
            )));
        }
    }

    Ok(())
}

#[async_trait]
impl<T: RecordType> RecordRepository<T> for InMemoryRecordRepository<T> {
    async fn list_records(&self) -> AppResult<Vec<Record<T>>> {
        Ok(self.records.read().await.clone())
    }

    async fn create_record(&self, record: Record<T>) -> AppResult<Record<T>> {
        if !record.is_new() {
            return Err(AppError::Validation(format!(
                "new {} must not carry identifier '{}'",
                T::LABEL,
                record.identifier()
            )));
        }

        let mut records = self.records.write().await;
        let created = record.with_identifier(Uuid::new_v4().to_string());
        ensure_unique(records.as_slice(), &created)?;
        records.push(created.clone());

        Ok(created)
    }

    async fn update_record(&self, record: Record<T>) -> AppResult<Record<T>> {
        let mut records = self.records.write().await;
        ensure_unique(records.as_slice(), &record)?;

        let stored = records
            .iter_mut()
            .find(|stored| stored.identifier() == record.identifier())
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "{} '{}' does not exist",
                    T::LABEL,
                    record.identifier()
                ))
            })?;
        *stored = record.clone();

        Ok(record)
    }

    async fn delete_record(&self, identifier: &str) -> AppResult<()> {
        let mut records = self.records.write().await;
        let index = records
            .iter()
            .position(|stored| stored.identifier() == identifier)
            .ok_or_else(|| {
                AppError::NotFound(format!("{} '{identifier}' does not exist", T::LABEL))
            })?;
        records.remove(index);

        Ok(())
    }
}
