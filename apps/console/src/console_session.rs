use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use warden_application::{EditableCollectionController, RowSelection, SelectionSnapshot};
use warden_core::{AppError, AppResult};
use warden_domain::{
    ChildItem, DistributionJob, FieldErrors, JobProject, ProviderProject, Record, RecordField,
    RecordType,
};
use warden_infrastructure::{ChannelRecordCollaborator, InMemoryRecordRepository};

use crate::console_event::{ConsoleEvent, raw_input};

#[cfg(test)]
mod tests;

/// Maps provider project rows onto record children.
pub struct ProjectBinding<T: RecordType> {
    to_child: fn(&ProviderProject) -> AppResult<T::Child>,
    child_key: fn(&T::Child) -> String,
}

impl ProjectBinding<DistributionJob> {
    pub fn job_projects() -> Self {
        Self {
            to_child: JobProject::from_provider_project,
            child_key: <JobProject as ChildItem>::key,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisibleProjects {
    pub rows: Vec<ProviderProject>,
    pub page: usize,
    pub page_count: usize,
    pub total_rows: usize,
}

/// State printed after every console event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(bound(serialize = ""))]
pub struct SessionSnapshot<T: RecordType> {
    pub record: Record<T>,
    pub records: Vec<Record<T>>,
    pub field_errors: FieldErrors,
    pub fetching: bool,
    pub error_message: Option<String>,
    pub selection: SelectionSnapshot,
    pub visible_projects: VisibleProjects,
}

/// One interactive edit session over a single record type.
pub struct ConsoleSession<T: RecordType> {
    controller: EditableCollectionController<T>,
    collaborator: Arc<ChannelRecordCollaborator<T>>,
    selection: RowSelection,
    projects: Vec<ProviderProject>,
    project_binding: Option<ProjectBinding<T>>,
}

impl<T: RecordType> ConsoleSession<T> {
    /// Spawns the persistence worker over seeded in-memory storage.
    pub fn new(
        seed: Vec<Record<T>>,
        projects: Vec<ProviderProject>,
        selection: RowSelection,
        project_binding: Option<ProjectBinding<T>>,
    ) -> Self {
        let repository = Arc::new(InMemoryRecordRepository::with_records(seed));
        let collaborator = Arc::new(ChannelRecordCollaborator::<T>::spawn(repository));
        let controller = EditableCollectionController::new(collaborator.clone());

        Self {
            controller,
            collaborator,
            selection,
            projects,
            project_binding,
        }
    }

    /// Loads the canonical list and returns the first snapshot.
    pub async fn start(&mut self) -> SessionSnapshot<T> {
        self.controller.refresh();
        self.collaborator.flush().await;
        self.snapshot()
    }

    /// Applies one event and returns the state once persistence settles.
    pub async fn handle(&mut self, event: ConsoleEvent) -> AppResult<SessionSnapshot<T>> {
        let name = event.name();
        self.apply(event)?;
        self.collaborator.flush().await;
        debug!(record_type = T::LABEL, event = name, "console event applied");

        Ok(self.snapshot())
    }

    fn apply(&mut self, event: ConsoleEvent) -> AppResult<()> {
        match event {
            ConsoleEvent::SetField { field, value } => {
                let field = T::Field::parse(field.as_str())?;
                self.controller
                    .set_scalar_field(field, raw_input(&value).as_str(), field.kind());
            }
            ConsoleEvent::BeginEdit { identifier } => {
                let existing = identifier
                    .map(|identifier| self.canonical_record(identifier.as_str()))
                    .transpose()?;
                self.controller.begin_edit(existing.as_ref());
            }
            ConsoleEvent::BeginCopy { identifier } => {
                let existing = self.canonical_record(identifier.as_str())?;
                self.controller.begin_copy(&existing);
            }
            ConsoleEvent::AddChild { item } => {
                self.controller.add_child(parse_child::<T>(item)?);
            }
            ConsoleEvent::UpdateChild { item } => {
                self.controller.update_child(parse_child::<T>(item)?);
            }
            ConsoleEvent::RemoveChild { item } => {
                self.controller.remove_child(&parse_child::<T>(item)?);
            }
            ConsoleEvent::Commit => {
                self.controller.commit();
            }
            ConsoleEvent::Discard => {
                self.controller.discard();
            }
            ConsoleEvent::Delete { identifiers } => self.controller.delete_records(identifiers),
            ConsoleEvent::Refresh => self.controller.refresh(),
            ConsoleEvent::OpenPicker => self.selection.open_picker(),
            ConsoleEvent::ClosePicker => self.selection.close_picker(),
            ConsoleEvent::SelectRow { key, selected } => {
                let row = self
                    .projects
                    .iter()
                    .find(|project| project.name() == key.as_str())
                    .ok_or_else(|| AppError::NotFound(format!("project '{key}' does not exist")))?;
                self.selection.on_row_selected(row, selected);
            }
            ConsoleEvent::SelectAll { selected } => {
                let already_selected = self.already_selected();
                let page = self
                    .selection
                    .visible_page(self.projects.as_slice(), already_selected.as_slice());
                self.selection
                    .on_row_selected_all(selected, Some(page.rows.as_slice()));
            }
            ConsoleEvent::ClearSelection => {
                self.selection
                    .on_row_selected_all::<ProviderProject>(false, None);
            }
            ConsoleEvent::Search { text } => self.selection.set_search(text),
            ConsoleEvent::Page { page } => self.selection.set_page(page),
            ConsoleEvent::PageSize { page_size } => self.selection.set_page_size(page_size),
            ConsoleEvent::AttachSelectedProjects => self.attach_selected_projects()?,
        }

        Ok(())
    }

    /// Appends every selected project not yet attached, then closes the picker.
    ///
    /// Nothing is attached when any selected project fails to convert.
    fn attach_selected_projects(&mut self) -> AppResult<()> {
        let binding = self.project_binding.as_ref().ok_or_else(|| {
            AppError::Validation(format!("{} records do not hold projects", T::LABEL))
        })?;

        let attached = self.already_selected();
        let mut pending: Vec<&str> = Vec::new();
        for key in self.selection.selected() {
            if !attached.contains(key) && !pending.contains(&key.as_str()) {
                pending.push(key.as_str());
            }
        }
        let children = pending
            .into_iter()
            .filter_map(|key| self.projects.iter().find(|project| project.name() == key))
            .map(binding.to_child)
            .collect::<AppResult<Vec<_>>>()?;

        for child in children {
            self.controller.add_child(child);
        }
        self.selection.close_picker();

        Ok(())
    }

    fn already_selected(&self) -> Vec<String> {
        let Some(binding) = self.project_binding.as_ref() else {
            return Vec::new();
        };

        self.controller
            .record()
            .children()
            .iter()
            .map(binding.child_key)
            .collect()
    }

    fn canonical_record(&self, identifier: &str) -> AppResult<Record<T>> {
        self.controller
            .collaborator_state()
            .find_record(identifier)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("{} '{identifier}' does not exist", T::LABEL)))
    }

    fn snapshot(&self) -> SessionSnapshot<T> {
        let state = self.controller.collaborator_state();
        let already_selected = self.already_selected();
        let page = self
            .selection
            .visible_page(self.projects.as_slice(), already_selected.as_slice());

        SessionSnapshot {
            record: self.controller.record(),
            records: state.records,
            field_errors: state.field_errors,
            fetching: state.fetching,
            error_message: state.error_message,
            selection: self.selection.snapshot(),
            visible_projects: VisibleProjects {
                rows: page.rows.into_iter().cloned().collect(),
                page: page.page,
                page_count: page.page_count,
                total_rows: page.total_rows,
            },
        }
    }
}

fn parse_child<T: RecordType>(item: serde_json::Value) -> AppResult<T::Child> {
    serde_json::from_value(item)
        .map_err(|error| AppError::Validation(format!("invalid {} child: {error}", T::LABEL)))
}
