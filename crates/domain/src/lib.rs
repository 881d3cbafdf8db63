//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod field;
mod job;
mod project;
mod record;
mod role;

pub use field::{FieldErrors, FieldValue, RecordField, ValueKind};
pub use job::{DistributionJob, JobField, JobProject};
pub use project::{ProviderProject, SelectableRow};
pub use record::{ChildItem, Record, RecordType};
pub use role::{AccessFlags, PermissionGrant, PermissionKey, Role, RoleField};
