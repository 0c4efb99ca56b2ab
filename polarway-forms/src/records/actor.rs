//! RecordActor — single writer in front of the record spreadsheet
//!
//! Appends and reads run one at a time on the blocking pool. Transient I/O
//! failures are retried with exponential backoff; anything else, or the
//! final failed attempt, drops the record and reports `StorageWriteFailure`.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tracing::{info, warn};

use crate::config::FormsConfig;
use crate::error::{FormsError, Result};
use crate::schema::{Record, RecordTable};
use crate::store::RecordStore;

// ─── Messages ───

enum RecordMsg {
    Append {
        record: Record,
        reply: oneshot::Sender<Result<usize>>,
    },
    LoadAll {
        reply: oneshot::Sender<Result<Option<RecordTable>>>,
    },
}

// ─── Actor ───

pub struct RecordActor {
    store: RecordStore,
    write_retries: u32,
    retry_backoff: Duration,
    rx: mpsc::Receiver<RecordMsg>,
}

impl RecordActor {
    /// Spawn the record actor and return a handle for sending messages
    pub fn spawn(config: &FormsConfig) -> RecordHandle {
        let store = RecordStore::new(config.records_path(), config.sheet_name.clone());
        let (tx, rx) = mpsc::channel(config.channel_capacity);
        let actor = Self {
            store,
            write_retries: config.write_retries,
            retry_backoff: config.retry_backoff,
            rx,
        };

        tokio::spawn(actor.run());
        info!(path = %config.records_path().display(), "RecordActor spawned");
        RecordHandle { tx }
    }

    async fn run(mut self) {
        while let Some(msg) = self.rx.recv().await {
            match msg {
                RecordMsg::Append { record, reply } => {
                    let _ = reply.send(self.handle_append(record).await);
                }
                RecordMsg::LoadAll { reply } => {
                    let store = self.store.clone();
                    let _ = reply.send(blocking(move || store.load_all()).await);
                }
            }
        }
        info!("RecordActor stopped");
    }

    async fn handle_append(&self, record: Record) -> Result<usize> {
        let mut attempt = 0;
        loop {
            let store = self.store.clone();
            let pending = record.clone();
            match blocking(move || store.append(&pending)).await {
                Ok(rows) => return Ok(rows),
                Err(e) if e.is_transient() && attempt < self.write_retries => {
                    let delay = self.retry_backoff * 2u32.saturating_pow(attempt);
                    attempt += 1;
                    warn!(error = %e, attempt, ?delay, "Record append failed, retrying");
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    warn!(
                        error = %e,
                        name = %record.name,
                        attempts = attempt + 1,
                        "Record append failed, record discarded"
                    );
                    return Err(FormsError::StorageWriteFailure(e.to_string()));
                }
            }
        }
    }
}

async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| FormsError::Internal(format!("blocking task failed: {e}")))?
}

// ─── Handle (client-facing API) ───

/// Thread-safe handle to communicate with the RecordActor
#[derive(Clone)]
pub struct RecordHandle {
    tx: mpsc::Sender<RecordMsg>,
}

impl RecordHandle {
    /// Append a record; returns the number of data rows after the write
    pub async fn append(&self, record: Record) -> Result<usize> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(RecordMsg::Append { record, reply })
            .await
            .map_err(|_| FormsError::ActorUnavailable("RecordActor".into()))?;
        rx.await
            .map_err(|_| FormsError::ActorUnavailable("RecordActor dropped".into()))?
    }

    /// Whole first sheet, or `None` before the first submission
    pub async fn load_all(&self) -> Result<Option<RecordTable>> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(RecordMsg::LoadAll { reply })
            .await
            .map_err(|_| FormsError::ActorUnavailable("RecordActor".into()))?;
        rx.await
            .map_err(|_| FormsError::ActorUnavailable("RecordActor dropped".into()))?
    }
}
