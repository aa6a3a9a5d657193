#![allow(dead_code)]

use async_trait::async_trait;
use flowgen::client::{AutomationApi, NodeCatalogEntry};
use flowgen::config::PipelineConfig;
use flowgen::dsl::WorkflowDocument;
use flowgen::error::{GenerationError, Result};
use flowgen::interpreter::PromptInterpreter;
use flowgen::runtime::orchestrator::Orchestrator;
use flowgen::runtime::session::{SessionGate, StaticSession};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn catalog() -> Vec<NodeCatalogEntry> {
    vec![
        NodeCatalogEntry {
            name: "n8n-nodes-base.start".to_string(),
            display_name: "Start".to_string(),
            description: "Starts the workflow execution".to_string(),
            icon: None,
        },
        NodeCatalogEntry {
            name: "n8n-nodes-base.httpRequest".to_string(),
            display_name: "HTTP Request".to_string(),
            description: "Makes an HTTP request and returns the response data".to_string(),
            icon: Some("fa:at".to_string()),
        },
        NodeCatalogEntry {
            name: "n8n-nodes-base.slack".to_string(),
            display_name: "Slack".to_string(),
            description: "Consume the Slack API".to_string(),
            icon: None,
        },
    ]
}

/// In-memory automation API with scripted failures and delays.
#[derive(Debug, Default)]
pub struct ScriptedApi {
    catalog: Vec<NodeCatalogEntry>,
    list_calls: AtomicUsize,
    create_calls: AtomicUsize,
    list_failures: Mutex<VecDeque<GenerationError>>,
    list_delays: Mutex<VecDeque<Duration>>,
    create_failure: Mutex<Option<GenerationError>>,
    /// (substring of the document name, delay)
    create_delays: Vec<(String, Duration)>,
    submitted: Mutex<Vec<WorkflowDocument>>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self { catalog: catalog(), ..Self::default() }
    }

    pub fn failing_list(self, failures: Vec<GenerationError>) -> Self {
        *self.list_failures.lock().unwrap() = failures.into();
        self
    }

    /// Delays consumed one per catalog call, in order.
    pub fn slow_list(self, delays: Vec<Duration>) -> Self {
        *self.list_delays.lock().unwrap() = delays.into();
        self
    }

    pub fn slow_create(mut self, name_contains: &str, delay: Duration) -> Self {
        self.create_delays.push((name_contains.to_string(), delay));
        self
    }

    pub fn set_create_failure(&self, failure: Option<GenerationError>) {
        *self.create_failure.lock().unwrap() = failure;
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn submitted(&self) -> Vec<WorkflowDocument> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl AutomationApi for ScriptedApi {
    async fn list_nodes(&self) -> Result<Vec<NodeCatalogEntry>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.list_delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let failure = self.list_failures.lock().unwrap().pop_front();
        match failure {
            Some(error) => Err(error),
            None => Ok(self.catalog.clone()),
        }
    }

    async fn create_workflow(&self, document: &WorkflowDocument) -> Result<WorkflowDocument> {
        let n = self.create_calls.fetch_add(1, Ordering::SeqCst) + 1;
        let delay = self.create_delays.iter()
            .find(|(needle, _)| document.name.contains(needle.as_str()))
            .map(|(_, d)| *d);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let failure = self.create_failure.lock().unwrap().clone();
        if let Some(error) = failure {
            return Err(error);
        }
        self.submitted.lock().unwrap().push(document.clone());
        let mut canonical = document.clone();
        canonical.id = Some(format!("wf-{}", n));
        Ok(canonical)
    }
}

pub fn pipeline() -> PipelineConfig {
    PipelineConfig {
        debounce: Duration::from_millis(500),
        retries: 1,
        retry_backoff: Duration::from_millis(10),
        call_timeout: Duration::from_secs(5),
    }
}

pub fn orchestrator(api: Arc<ScriptedApi>) -> Orchestrator {
    orchestrator_with_session(api, Arc::new(StaticSession::signed_in()))
}

pub fn orchestrator_with_session(api: Arc<ScriptedApi>, session: Arc<dyn SessionGate>) -> Orchestrator {
    Orchestrator::new(
        api,
        Arc::new(PromptInterpreter::with_builtin_rules()),
        session,
        pipeline(),
    )
}
