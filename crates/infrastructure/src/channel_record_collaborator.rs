use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, warn};

use warden_application::{CollaboratorState, RecordCollaborator, RecordRepository};
use warden_domain::{Record, RecordType};


enum PersistenceRequest<T: RecordType> {
    FetchAll,
    Create(Record<T>),
    Update(Record<T>),
    Delete(String),
    ClearFieldErrors,
    Flush(oneshot::Sender<()>),
}

impl<T: RecordType> PersistenceRequest<T> {
    fn name(&self) -> &'static str {
        match self {
            Self::FetchAll => "fetch_all",
            Self::Create(_) => "create",
            Self::Update(_) => "update",
            Self::Delete(_) => "delete",
            Self::ClearFieldErrors => "clear_field_errors",
            Self::Flush(_) => "flush",
        }
    }
}

/// A queued request tagged with its position in the collaborator's queue.
struct Envelope<T: RecordType> {
    sequence: u64,
    request: PersistenceRequest<T>,
}

/// Record collaborator that queues requests for a background worker task.
///
/// Requests are enqueued and the call returns at once. A single worker task
/// drains the queue against the repository and publishes the resulting
/// [`CollaboratorState`] through a watch channel.
pub struct ChannelRecordCollaborator<T: RecordType> {
    sender: mpsc::UnboundedSender<Envelope<T>>,
    state: watch::Receiver<CollaboratorState<T>>,
    next_sequence: AtomicU64,
}

impl<T: RecordType> ChannelRecordCollaborator<T> {
    /// Spawns the worker task on the current Tokio runtime.
    #[must_use]
    pub fn spawn(repository: Arc<dyn RecordRepository<T>>) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let (state_sender, state) = watch::channel(CollaboratorState::default());

        tokio::spawn(run_worker(repository, receiver, state_sender));

        Self {
            sender,
            state,
            next_sequence: AtomicU64::new(1),
        }
    }

    /// Returns a receiver notified on every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CollaboratorState<T>> {
        self.state.clone()
    }

    /// Waits until every previously enqueued request has been processed.
    pub async fn flush(&self) {
        let (done_sender, done_receiver) = oneshot::channel();
        if !self.dispatch(PersistenceRequest::Flush(done_sender)) {
            return;
        }

        if done_receiver.await.is_err() {
            warn!(record_type = T::LABEL, "persistence worker dropped flush request");
        }
    }

    fn dispatch(&self, request: PersistenceRequest<T>) -> bool {
        let sequence = self.next_sequence.fetch_add(1, Ordering::Relaxed);
        let name = request.name();
        match self.sender.send(Envelope { sequence, request }) {
            Ok(()) => {
                debug!(
                    record_type = T::LABEL,
                    sequence,
                    request = name,
                    "persistence request enqueued"
                );
                true
            }
            Err(_) => {
                warn!(
                    record_type = T::LABEL,
                    sequence,
                    request = name,
                    "persistence worker is not running, request dropped"
                );
                false
            }
        }
    }
}

impl<T: RecordType> RecordCollaborator<T> for ChannelRecordCollaborator<T> {
    fn fetch_all(&self) {
        self.dispatch(PersistenceRequest::FetchAll);
    }

    fn create(&self, record: Record<T>) {
        self.dispatch(PersistenceRequest::Create(record));
    }

    fn update(&self, record: Record<T>) {
        self.dispatch(PersistenceRequest::Update(record));
    }

    fn delete(&self, identifier: &str) {
        self.dispatch(PersistenceRequest::Delete(identifier.to_owned()));
    }

    fn clear_field_errors(&self) {
        self.dispatch(PersistenceRequest::ClearFieldErrors);
    }

    fn state(&self) -> CollaboratorState<T> {
        self.state.borrow().clone()
    }
}

async fn run_worker<T: RecordType>(
    repository: Arc<dyn RecordRepository<T>>,
    mut receiver: mpsc::UnboundedReceiver<Envelope<T>>,
    state: watch::Sender<CollaboratorState<T>>,
) {
    while let Some(Envelope { sequence, request }) = receiver.recv().await {
        match request {
            PersistenceRequest::FetchAll => {
                state.send_modify(|current| current.fetching = true);
                match repository.list_records().await {
                    Ok(records) => {
                        debug!(
                            record_type = T::LABEL,
                            sequence,
                            count = records.len(),
                            "records fetched"
                        );
                        state.send_modify(|current| {
                            current.records = records;
                            current.fetching = false;
                            current.last_fetched_at = Some(Utc::now());
                        });
                    }
                    Err(error) => {
                        warn!(
                            record_type = T::LABEL,
                            sequence,
                            error = %error,
                            "failed to fetch records"
                        );
                        state.send_modify(|current| {
                            current.fetching = false;
                            current.error_message = Some(error.to_string());
                        });
                    }
                }
            }
            PersistenceRequest::Create(record) => {
                if reject_invalid(&state, &record, sequence) {
                    continue;
                }
                let outcome = repository
                    .create_record(record)
                    .await
                    .map(|created| created.identifier().to_owned());
                publish_write_outcome(&state, "create", sequence, outcome);
            }
            PersistenceRequest::Update(record) => {
                if reject_invalid(&state, &record, sequence) {
                    continue;
                }
                let outcome = repository
                    .update_record(record)
                    .await
                    .map(|updated| updated.identifier().to_owned());
                publish_write_outcome(&state, "update", sequence, outcome);
            }
            PersistenceRequest::Delete(identifier) => {
                let outcome = repository
                    .delete_record(identifier.as_str())
                    .await
                    .map(|()| identifier);
                publish_write_outcome(&state, "delete", sequence, outcome);
            }
            PersistenceRequest::ClearFieldErrors => {
                state.send_modify(|current| {
                    current.field_errors.clear();
                    current.error_message = None;
                });
            }
            PersistenceRequest::Flush(done) => {
                let _ = done.send(());
            }
        }
    }

    debug!(record_type = T::LABEL, "persistence worker stopped");
}

/// Publishes field errors for an invalid record; returns true when rejected.
fn reject_invalid<T: RecordType>(
    state: &watch::Sender<CollaboratorState<T>>,
    record: &Record<T>,
    sequence: u64,
) -> bool {
    let field_errors = record.validate();
    if field_errors.is_empty() {
        return false;
    }

    info!(
        record_type = T::LABEL,
        sequence,
        fields = ?field_errors.keys().collect::<Vec<_>>(),
        "record rejected by field validation"
    );
    state.send_modify(|current| current.field_errors = field_errors);
    true
}

fn publish_write_outcome<T: RecordType>(
    state: &watch::Sender<CollaboratorState<T>>,
    action: &'static str,
    sequence: u64,
    outcome: warden_core::AppResult<String>,
) {
    match outcome {
        Ok(identifier) => {
            info!(
                record_type = T::LABEL,
                sequence,
                identifier = %identifier,
                action,
                "record persisted"
            );
            state.send_modify(|current| {
                current.field_errors.clear();
                current.error_message = None;
            });
        }
        Err(error) => {
            warn!(
                record_type = T::LABEL,
                sequence,
                error = %error,
                action,
                "record persistence failed"
            );
            state.send_modify(|current| current.error_message = Some(error.to_string()));
        }
    }
}
