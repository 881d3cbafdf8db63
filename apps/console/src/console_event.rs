use serde::Deserialize;
use serde_json::Value;

use warden_core::{AppError, AppResult};

/// One line of console input.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ConsoleEvent {
    SetField {
        field: String,
        value: Value,
    },
    BeginEdit {
        #[serde(default)]
        identifier: Option<String>,
    },
    BeginCopy {
        identifier: String,
    },
    AddChild {
        item: Value,
    },
    UpdateChild {
        item: Value,
    },
    RemoveChild {
        item: Value,
    },
    Commit,
    Discard,
    Delete {
        identifiers: Vec<String>,
    },
    Refresh,
    OpenPicker,
    ClosePicker,
    SelectRow {
        key: String,
        #[serde(default = "selected_by_default")]
        selected: bool,
    },
    SelectAll {
        #[serde(default = "selected_by_default")]
        selected: bool,
    },
    ClearSelection,
    Search {
        #[serde(default)]
        text: String,
    },
    Page {
        page: usize,
    },
    PageSize {
        page_size: usize,
    },
    AttachSelectedProjects,
}

impl ConsoleEvent {
    pub fn parse(line: &str) -> AppResult<Self> {
        serde_json::from_str(line)
            .map_err(|error| AppError::Validation(format!("invalid console event: {error}")))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::SetField { .. } => "set_field",
            Self::BeginEdit { .. } => "begin_edit",
            Self::BeginCopy { .. } => "begin_copy",
            Self::AddChild { .. } => "add_child",
            Self::UpdateChild { .. } => "update_child",
            Self::RemoveChild { .. } => "remove_child",
            Self::Commit => "commit",
            Self::Discard => "discard",
            Self::Delete { .. } => "delete",
            Self::Refresh => "refresh",
            Self::OpenPicker => "open_picker",
            Self::ClosePicker => "close_picker",
            Self::SelectRow { .. } => "select_row",
            Self::SelectAll { .. } => "select_all",
            Self::ClearSelection => "clear_selection",
            Self::Search { .. } => "search",
            Self::Page { .. } => "page",
            Self::PageSize { .. } => "page_size",
            Self::AttachSelectedProjects => "attach_selected_projects",
        }
    }
}

/// Renders a JSON input value the way a form control reports it.
pub fn raw_input(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn selected_by_default() -> bool {
    true
}
