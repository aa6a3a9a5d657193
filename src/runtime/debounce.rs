use std::sync::Arc;
use std::time::Duration;
use anyhow::{Result, anyhow};
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{Instant, sleep};
use tracing::{debug, error};
use crate::runtime::orchestrator::Orchestrator;

/// Turns a stream of prompt edits into generation attempts.
///
/// An attempt is scheduled once no edit arrived for the quiet period; every
/// edit inside that window replaces the scheduled prompt. Attempts that have
/// already started keep running and are settled by the orchestrator's
/// staleness guard.
pub struct Debouncer {
    sender: mpsc::Sender<String>,
    worker: JoinHandle<()>,
}

impl Debouncer {
    pub fn spawn(orchestrator: Arc<Orchestrator>, quiet: Duration) -> Self {
        let (tx, rx) = mpsc::channel(100);
        let worker = tokio::spawn(run(orchestrator, quiet, rx));
        Self { sender: tx, worker }
    }

    pub async fn edit(&self, prompt: impl Into<String>) -> Result<()> {
        self.sender.send(prompt.into()).await
            .map_err(|e| anyhow!("Debouncer stopped: {}", e))
    }

    /// Stops accepting edits. A pending edit still fires after its quiet
    /// period; returns once every started attempt has finished.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.sender);
        self.worker.await.map_err(|e| anyhow!("Debouncer worker failed: {}", e))
    }
}

async fn run(orchestrator: Arc<Orchestrator>, quiet: Duration, mut rx: mpsc::Receiver<String>) {
    let mut in_flight = JoinSet::new();

    while let Some(mut prompt) = rx.recv().await {
        let deadline = sleep(quiet);
        tokio::pin!(deadline);
        let mut closed = false;

        loop {
            tokio::select! {
                () = &mut deadline => break,
                next = rx.recv(), if !closed => match next {
                    Some(edit) => {
                        debug!("Prompt edited, rescheduling");
                        prompt = edit;
                        deadline.as_mut().reset(Instant::now() + quiet);
                    }
                    None => closed = true,
                },
            }
        }

        // Whitespace-only edits cancel the pending attempt without replacing it.
        if prompt.trim().is_empty() {
            debug!("Skipping empty prompt");
        } else {
            let orchestrator = orchestrator.clone();
            in_flight.spawn(async move {
                orchestrator.generate(&prompt).await;
            });
        }

        while let Some(done) = in_flight.try_join_next() {
            if let Err(e) = done {
                error!("Generation attempt panicked: {}", e);
            }
        }

        if closed {
            break;
        }
    }

    while let Some(done) = in_flight.join_next().await {
        if let Err(e) = done {
            error!("Generation attempt panicked: {}", e);
        }
    }
}
