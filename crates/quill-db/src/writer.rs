//! Single-writer queue.
//!
//! All writes to the audit tables go through one worker task draining a
//! bounded channel, so the store never sees concurrent writers. Persistence
//! failures are logged and dropped; they never reach the caller.

use std::sync::Arc;

use chrono::Utc;
use quill_core::EntryCreationContext;
use quill_render::EntryGenerator;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::QuillDb;
use crate::error::WriterError;

enum WriteTask {
    Create {
        username: Option<String>,
        context: Box<EntryCreationContext>,
    },
    Flush(oneshot::Sender<()>),
}

/// Handle to the worker task that owns every write.
pub struct EntryWriter {
    sender: mpsc::Sender<WriteTask>,
    worker: JoinHandle<()>,
}

impl EntryWriter {
    /// Spawn the worker on the current tokio runtime.
    #[must_use]
    pub fn spawn(db: Arc<QuillDb>, generator: EntryGenerator, capacity: usize) -> Self {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let worker = tokio::spawn(run(db, generator, receiver));
        Self { sender, worker }
    }

    /// Queue an entry for creation. Waits only while the queue is full.
    ///
    /// # Errors
    ///
    /// Returns `WriterError::Closed` if the worker has stopped.
    pub async fn submit(
        &self,
        username: Option<String>,
        context: EntryCreationContext,
    ) -> Result<(), WriterError> {
        self.sender
            .send(WriteTask::Create {
                username,
                context: Box::new(context),
            })
            .await
            .map_err(|_| WriterError::Closed)
    }

    /// Resolve once every task queued before this call has been processed.
    ///
    /// # Errors
    ///
    /// Returns `WriterError::Closed` if the worker has stopped.
    pub async fn flush(&self) -> Result<(), WriterError> {
        let (done, wait) = oneshot::channel();
        self.sender
            .send(WriteTask::Flush(done))
            .await
            .map_err(|_| WriterError::Closed)?;
        wait.await.map_err(|_| WriterError::Closed)
    }

    /// Close the queue and wait for the worker to drain it.
    ///
    /// # Errors
    ///
    /// Returns `WriterError::Worker` if the worker panicked.
    pub async fn shutdown(self) -> Result<(), WriterError> {
        drop(self.sender);
        self.worker.await?;
        Ok(())
    }
}

async fn run(db: Arc<QuillDb>, generator: EntryGenerator, mut receiver: mpsc::Receiver<WriteTask>) {
    debug!("audit log writer started");
    while let Some(task) = receiver.recv().await {
        match task {
            WriteTask::Create { username, context } => {
                persist(&db, &generator, username.as_deref(), &context).await;
            }
            WriteTask::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    debug!("audit log writer stopped");
}

async fn persist(
    db: &QuillDb,
    generator: &EntryGenerator,
    username: Option<&str>,
    context: &EntryCreationContext,
) {
    let Some(entry) = generator.render_entry(context, username, Utc::now()) else {
        return;
    };
    match db.append_entry(&entry).await {
        Ok(id) => debug!(id, entity = %entry.entity, action = %entry.action, "audit log entry created"),
        Err(e) => error!(
            entity = %entry.entity,
            action = %entry.action,
            entry = %entry.text,
            error = %e,
            "could not create audit log entry"
        ),
    }
}
