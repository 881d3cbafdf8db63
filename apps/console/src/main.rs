//! Warden console: drives an editable collection over JSON lines.

#![forbid(unsafe_code)]

mod console_config;
mod console_event;
mod console_seed;
mod console_session;

use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};

use warden_application::RowSelection;
use warden_core::{AppError, AppResult};
use warden_domain::{DistributionJob, ProviderProject, RecordType, Role};

use crate::console_config::{ConsoleConfig, RecordKind, init_tracing};
use crate::console_event::ConsoleEvent;
use crate::console_seed::{load_record_seed, load_seed};
use crate::console_session::{ConsoleSession, ProjectBinding};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ConsoleConfig::load()?;
    let projects: Vec<ProviderProject> =
        load_seed(config.projects_file.as_deref(), "project")?;
    let selection = if config.selector_read_only {
        RowSelection::read_only(config.page_size)
    } else {
        RowSelection::new(config.page_size)
    };

    info!(
        record_kind = ?config.record_kind,
        page_size = config.page_size,
        projects = projects.len(),
        "warden console starting"
    );

    match config.record_kind {
        RecordKind::Roles => {
            let seed = load_record_seed::<Role>(config.seed_file.as_deref())?;
            run(ConsoleSession::new(seed, projects, selection, None)).await
        }
        RecordKind::Jobs => {
            let seed = load_record_seed::<DistributionJob>(config.seed_file.as_deref())?;
            let binding = Some(ProjectBinding::job_projects());
            run(ConsoleSession::new(seed, projects, selection, binding)).await
        }
    }
}

async fn run<T: RecordType>(mut session: ConsoleSession<T>) -> AppResult<()> {
    let mut stdout = tokio::io::stdout();
    let initial = session.start().await;
    write_line(&mut stdout, &initial).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|error| AppError::Internal(format!("failed to read stdin: {error}")))?
    {
        if line.trim().is_empty() {
            continue;
        }

        let outcome = match ConsoleEvent::parse(line.as_str()) {
            Ok(event) => session.handle(event).await,
            Err(error) => Err(error),
        };
        match outcome {
            Ok(snapshot) => write_line(&mut stdout, &snapshot).await?,
            Err(error) => {
                warn!(error = %error, "console event rejected");
                write_line(&mut stdout, &serde_json::json!({ "error": error.to_string() }))
                    .await?;
            }
        }
    }

    info!("stdin closed, warden console stopping");
    Ok(())
}

async fn write_line(stdout: &mut tokio::io::Stdout, value: &impl Serialize) -> AppResult<()> {
    let mut line = serde_json::to_string(value)
        .map_err(|error| AppError::Internal(format!("failed to encode snapshot: {error}")))?;
    line.push('\n');

    stdout
        .write_all(line.as_bytes())
        .await
        .map_err(|error| AppError::Internal(format!("failed to write stdout: {error}")))?;
    stdout
        .flush()
        .await
        .map_err(|error| AppError::Internal(format!("failed to flush stdout: {error}")))
}
