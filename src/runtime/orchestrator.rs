use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use serde_json::{Value, json};
use tokio::sync::{RwLock, broadcast};
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, warn};
use crate::client::{AutomationApi, NodeCatalogEntry};
use crate::config::PipelineConfig;
use crate::dsl::WorkflowDocument;
use crate::error::{GenerationError, Result};
use crate::interpreter::PromptInterpreter;
use crate::runtime::attempt::{Attempt, AttemptSeq, AttemptState, GenerationResult};
use crate::runtime::session::SessionGate;

pub const EMPTY_PROMPT_MESSAGE: &str = "Please enter a workflow description first";

/// User-facing notification emitted once per live attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    Success { attempt: AttemptSeq, name: String },
    Failure { attempt: AttemptSeq, message: String, retryable: bool },
    /// The request never became an attempt (empty prompt, no session).
    Rejected { message: String },
}

/// What the viewer currently shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayState {
    pub document: Option<WorkflowDocument>,
    pub error: Option<String>,
    /// Attempt that last changed this state.
    pub attempt: Option<AttemptSeq>,
}

impl DisplayState {
    /// Payload for the graph translator. A prior document wins over a later
    /// failure; with no document the failure becomes an error payload.
    pub fn payload(&self) -> Option<Value> {
        if let Some(document) = &self.document {
            return serde_json::to_value(document).ok();
        }
        self.error.as_ref().map(|e| json!({ "error": e }))
    }
}

/// Runs the fetch-catalog → interpret → submit pipeline and owns which
/// attempt's result is live.
pub struct Orchestrator {
    api: Arc<dyn AutomationApi>,
    interpreter: Arc<PromptInterpreter>,
    session: Arc<dyn SessionGate>,
    config: PipelineConfig,
    latest: AtomicU64,
    /// Numbers detached requests; independent of `latest`.
    requests: AtomicU64,
    display: RwLock<DisplayState>,
    notifications: broadcast::Sender<Notification>,
}

impl Orchestrator {
    pub fn new(
        api: Arc<dyn AutomationApi>,
        interpreter: Arc<PromptInterpreter>,
        session: Arc<dyn SessionGate>,
        config: PipelineConfig,
    ) -> Self {
        let (notifications, _) = broadcast::channel(64);
        Self {
            api,
            interpreter,
            session,
            config,
            latest: AtomicU64::new(0),
            requests: AtomicU64::new(0),
            display: RwLock::new(DisplayState::default()),
            notifications,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.notifications.subscribe()
    }

    pub async fn snapshot(&self) -> DisplayState {
        self.display.read().await.clone()
    }

    /// Sequence number of the most recently started attempt (0 before the first).
    pub fn latest_attempt(&self) -> AttemptSeq {
        self.latest.load(Ordering::SeqCst)
    }

    /// Clears the display and supersedes every attempt still in flight.
    pub async fn reset(&self) {
        let mut display = self.display.write().await;
        let seq = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        *display = DisplayState::default();
        info!(superseded_by = seq, "Display reset");
    }

    pub async fn list_catalog(&self) -> Result<Vec<NodeCatalogEntry>> {
        self.bounded("list_nodes", self.api.list_nodes()).await
    }

    /// Runs one attempt immediately. The returned result belongs to this
    /// attempt; it is published only if no newer attempt has started since.
    pub async fn generate(&self, prompt: &str) -> GenerationResult {
        if let Err(error) = self.admit(prompt) {
            warn!(error = %error, "Generation request rejected");
            let _ = self.notifications.send(Notification::Rejected { message: error.to_string() });
            return GenerationResult::Failure { error };
        }

        let seq = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let mut attempt = Attempt::new(seq, prompt);
        info!(attempt = seq, trace_id = %attempt.trace_id, prompt = %attempt.prompt, "Starting generation attempt");

        let result = GenerationResult::from(self.run(&mut attempt, true).await);
        attempt.transition(AttemptState::Completed);
        self.publish(&attempt, &result).await;
        result
    }

    /// Runs one request outside the prompt field: no debounce target, no
    /// staleness guard, and the display is left alone. Concurrent callers
    /// each get their own workflow.
    pub async fn run_once(&self, prompt: &str) -> GenerationResult {
        if let Err(error) = self.admit(prompt) {
            warn!(error = %error, "Generation request rejected");
            return GenerationResult::Failure { error };
        }

        let seq = self.requests.fetch_add(1, Ordering::SeqCst) + 1;
        let mut attempt = Attempt::new(seq, prompt);
        info!(request = seq, trace_id = %attempt.trace_id, prompt = %attempt.prompt, "Starting detached generation");

        let result = GenerationResult::from(self.run(&mut attempt, false).await);
        attempt.transition(AttemptState::Completed);
        match &result {
            GenerationResult::Success { document } => {
                info!(request = seq, name = %document.name, "Workflow generated");
            }
            GenerationResult::Failure { error } => {
                error!(request = seq, error = %error, "Workflow generation failed");
            }
        }
        result
    }

    fn admit(&self, prompt: &str) -> Result<()> {
        if prompt.trim().is_empty() {
            return Err(GenerationError::InvalidPrompt(EMPTY_PROMPT_MESSAGE.to_string()));
        }
        if !self.session.is_active() {
            return Err(GenerationError::Unauthenticated);
        }
        Ok(())
    }

    fn is_live(&self, seq: AttemptSeq) -> bool {
        self.latest.load(Ordering::SeqCst) == seq
    }

    /// A detached run never supersedes and is never superseded.
    fn is_superseded(&self, seq: AttemptSeq, guarded: bool) -> bool {
        guarded && !self.is_live(seq)
    }

    async fn run(&self, attempt: &mut Attempt, guarded: bool) -> Result<WorkflowDocument> {
        attempt.transition(AttemptState::FetchingCatalog);
        let catalog = self.fetch_catalog(attempt.seq, guarded).await?;

        attempt.transition(AttemptState::Interpreting);
        let draft = self.interpreter.interpret(&attempt.prompt, &catalog);
        let dangling = draft.dangling_references();
        if !dangling.is_empty() {
            warn!(attempt = attempt.seq, nodes = ?dangling, "Draft references unknown nodes");
        }
        debug!(attempt = attempt.seq, nodes = draft.nodes.len(), connections = draft.connection_count(), "Draft assembled");

        // Last point where dropping the attempt costs no remote write.
        if self.is_superseded(attempt.seq, guarded) {
            info!(attempt = attempt.seq, "Attempt superseded before submission");
            return Err(GenerationError::Superseded(attempt.seq));
        }

        attempt.transition(AttemptState::Submitting);
        self.bounded("create_workflow", self.api.create_workflow(&draft)).await
    }

    /// Catalog reads are idempotent, so transport failures are retried here.
    async fn fetch_catalog(&self, seq: AttemptSeq, guarded: bool) -> Result<Vec<NodeCatalogEntry>> {
        let mut retries = 0;
        loop {
            match self.bounded("list_nodes", self.api.list_nodes()).await {
                Err(e) if e.is_retryable() && retries < self.config.retries && !self.is_superseded(seq, guarded) => {
                    retries += 1;
                    warn!(attempt = seq, retry = retries, error = %e, "Catalog fetch failed, retrying");
                    sleep(self.config.retry_backoff).await;
                }
                other => return other,
            }
        }
    }

    async fn bounded<T>(&self, operation: &str, call: impl Future<Output = Result<T>>) -> Result<T> {
        match timeout(self.config.call_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(GenerationError::Transport(format!(
                "{} timed out after {:?}",
                operation, self.config.call_timeout
            ))),
        }
    }

    async fn publish(&self, attempt: &Attempt, result: &GenerationResult) {
        let mut display = self.display.write().await;
        if !self.is_live(attempt.seq) {
            warn!(attempt = attempt.seq, latest = self.latest_attempt(), "Discarding stale attempt result");
            return;
        }

        let notification = match result {
            GenerationResult::Success { document } => {
                info!(attempt = attempt.seq, name = %document.name, nodes = document.nodes.len(), "Workflow generated");
                display.document = Some(document.clone());
                display.error = None;
                Notification::Success { attempt: attempt.seq, name: document.name.clone() }
            }
            GenerationResult::Failure { error } => {
                error!(attempt = attempt.seq, error = %error, "Workflow generation failed");
                display.error = Some(error.to_string());
                Notification::Failure {
                    attempt: attempt.seq,
                    message: error.to_string(),
                    retryable: error.is_retryable(),
                }
            }
        };
        display.attempt = Some(attempt.seq);
        let _ = self.notifications.send(notification);
    }
}
