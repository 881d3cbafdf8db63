use std::env;
use std::path::PathBuf;

use tracing_subscriber::EnvFilter;
use warden_core::{AppError, AppResult};

/// Record type edited by a console session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Roles,
    Jobs,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub record_kind: RecordKind,
    pub seed_file: Option<PathBuf>,
    pub projects_file: Option<PathBuf>,
    pub page_size: usize,
    pub selector_read_only: bool,
}

impl ConsoleConfig {
    pub fn load() -> AppResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let record_kind = match lookup("WARDEN_RECORD_TYPE")
            .unwrap_or_else(|| "roles".to_owned())
            .trim()
        {
            "roles" => RecordKind::Roles,
            "jobs" => RecordKind::Jobs,
            other => {
                return Err(AppError::Validation(format!(
                    "WARDEN_RECORD_TYPE must be either 'roles' or 'jobs', got '{other}'"
                )));
            }
        };

        let page_size = match lookup("WARDEN_PAGE_SIZE") {
            Some(value) => value.trim().parse::<usize>().map_err(|error| {
                AppError::Validation(format!("invalid WARDEN_PAGE_SIZE: {error}"))
            })?,
            None => 10,
        };
        if page_size == 0 {
            return Err(AppError::Validation(
                "WARDEN_PAGE_SIZE must be greater than zero".to_owned(),
            ));
        }

        let selector_read_only = lookup("WARDEN_SELECTOR_READ_ONLY")
            .unwrap_or_else(|| "false".to_owned())
            .eq_ignore_ascii_case("true");

        Ok(Self {
            record_kind,
            seed_file: optional_path(&lookup, "WARDEN_SEED_FILE"),
            projects_file: optional_path(&lookup, "WARDEN_PROJECTS_FILE"),
            page_size,
            selector_read_only,
        })
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn optional_path(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<PathBuf> {
    lookup(name)
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}
