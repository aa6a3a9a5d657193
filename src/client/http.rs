use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use std::sync::Arc;
use tracing::{debug, error, info};
use crate::client::{AutomationApi, NodeCatalogEntry};
use crate::config::AutomationConfig;
use crate::dsl::WorkflowDocument;
use crate::error::{GenerationError, Result};

/// reqwest-backed client for the automation API.
#[derive(Debug, Clone)]
pub struct HttpAutomationClient {
    client: Client,
    config: Arc<AutomationConfig>,
}

impl HttpAutomationClient {
    pub fn new(config: Arc<AutomationConfig>) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GenerationError::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &AutomationConfig {
        &self.config
    }

    /// Configuration is checked here, before the request is built, so a
    /// misconfigured client never reaches the network.
    fn request(&self, method: reqwest::Method, path: &str) -> Result<RequestBuilder> {
        let url = self.config.endpoint(path)?;
        let key = self.config.credential()?;
        Ok(self.client
            .request(method, url)
            .header(self.config.api_key_header.as_str(), key))
    }
}

/// Maps non-success statuses to `Remote` with the body text attached.
async fn check_status(response: Response, operation: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    error!(status = status.as_u16(), body = %body, "{} failed", operation);
    Err(GenerationError::Remote {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl AutomationApi for HttpAutomationClient {
    async fn list_nodes(&self) -> Result<Vec<NodeCatalogEntry>> {
        let builder = self.request(reqwest::Method::GET, "nodes")?;
        debug!("Fetching node catalog");

        let response = builder.send().await?;
        let response = check_status(response, "Fetching node catalog").await?;
        let entries: Vec<NodeCatalogEntry> = response.json().await
            .map_err(|e| GenerationError::Decode(e.to_string()))?;

        info!(entries = entries.len(), "Fetched node catalog");
        Ok(entries)
    }

    async fn create_workflow(&self, document: &WorkflowDocument) -> Result<WorkflowDocument> {
        let builder = self.request(reqwest::Method::POST, "workflows")?;
        debug!(name = %document.name, nodes = document.nodes.len(), "Creating workflow");

        let response = builder.json(document).send().await?;
        let response = check_status(response, "Creating workflow").await?;
        let created: WorkflowDocument = response.json().await
            .map_err(|e| GenerationError::Decode(e.to_string()))?;

        info!(id = ?created.id, name = %created.name, "Workflow created");
        Ok(created)
    }
}
