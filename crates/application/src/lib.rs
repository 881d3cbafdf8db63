//! Application services and ports.

#![forbid(unsafe_code)]

mod collection_controller;
mod collection_ports;
pub mod row_selection;

pub use collection_controller::EditableCollectionController;
pub use collection_ports::{CollaboratorState, RecordCollaborator, RecordRepository};
pub use row_selection::{Page, RowSelection, SelectionSnapshot};
