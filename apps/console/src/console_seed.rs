use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::info;

use warden_core::{AppError, AppResult};
use warden_domain::{Record, RecordType};

/// Reads a JSON array from a seed file; a missing path yields no items.
pub fn load_seed<I: DeserializeOwned>(path: Option<&Path>, label: &str) -> AppResult<Vec<I>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };

    let contents = fs::read_to_string(path).map_err(|error| {
        AppError::Internal(format!(
            "failed to read {label} seed file '{}': {error}",
            path.display()
        ))
    })?;
    let items: Vec<I> = serde_json::from_str(contents.as_str()).map_err(|error| {
        AppError::Validation(format!(
            "invalid {label} seed file '{}': {error}",
            path.display()
        ))
    })?;

    info!(path = %path.display(), count = items.len(), label, "seed file loaded");
    Ok(items)
}

/// Reads seed records and rejects any that fail field validation.
pub fn load_record_seed<T: RecordType>(path: Option<&Path>) -> AppResult<Vec<Record<T>>> {
    let records: Vec<Record<T>> = load_seed(path, T::LABEL)?;
    for (index, record) in records.iter().enumerate() {
        let field_errors = record.validate();
        if !field_errors.is_empty() {
            let messages: Vec<&str> = field_errors.values().map(String::as_str).collect();
            return Err(AppError::Validation(format!(
                "{} seed entry {index} is invalid: {}",
                T::LABEL,
                messages.join(", ")
            )));
        }
    }

    Ok(records)
}
