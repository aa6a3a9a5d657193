use std::net::SocketAddr;
use std::sync::Arc;
use anyhow::{Result, Context as AnyhowContext};
use axum::{Json, Router};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use serde::{Serialize, Deserialize};
use tokio::net::TcpListener;
use tracing::info;
use crate::client::{NodeCatalogEntry, filter_catalog};
use crate::dsl::WorkflowDocument;
use crate::error::GenerationError;
use crate::runtime::attempt::GenerationResult;
use crate::runtime::orchestrator::Orchestrator;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerateResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<WorkflowDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerateResponse {
    fn failure(error: &GenerationError) -> Self {
        Self { success: false, data: None, error: Some(error.to_string()) }
    }
}

impl From<&GenerationResult> for GenerateResponse {
    fn from(result: &GenerationResult) -> Self {
        match result {
            GenerationResult::Success { document } => Self {
                success: true,
                data: Some(document.clone()),
                error: None,
            },
            GenerationResult::Failure { error } => Self::failure(error),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CatalogQuery {
    search: Option<String>,
}

fn status_for(error: &GenerationError) -> StatusCode {
    match error {
        GenerationError::InvalidPrompt(_) => StatusCode::BAD_REQUEST,
        GenerationError::Unauthenticated => StatusCode::UNAUTHORIZED,
        GenerationError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        GenerationError::Superseded(_) => StatusCode::CONFLICT,
        GenerationError::Remote { .. }
        | GenerationError::Transport(_)
        | GenerationError::Decode(_) => StatusCode::BAD_GATEWAY,
    }
}

pub fn router(orchestrator: Arc<Orchestrator>) -> Router {
    Router::new()
        .route("/api/generate", post(generate))
        .route("/api/nodes", get(nodes))
        .with_state(orchestrator)
}

async fn generate(
    State(orchestrator): State<Arc<Orchestrator>>,
    Json(request): Json<GenerateRequest>,
) -> (StatusCode, Json<GenerateResponse>) {
    let result = orchestrator.run_once(&request.prompt).await;
    let status = match &result {
        GenerationResult::Success { .. } => StatusCode::OK,
        GenerationResult::Failure { error } => status_for(error),
    };
    (status, Json(GenerateResponse::from(&result)))
}

async fn nodes(
    State(orchestrator): State<Arc<Orchestrator>>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<Vec<NodeCatalogEntry>>, (StatusCode, Json<GenerateResponse>)> {
    let catalog = orchestrator.list_catalog().await
        .map_err(|e| (status_for(&e), Json(GenerateResponse::failure(&e))))?;
    let filtered = filter_catalog(&catalog, query.search.as_deref().unwrap_or(""))
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(filtered))
}

pub async fn serve(addr: SocketAddr, orchestrator: Arc<Orchestrator>) -> Result<()> {
    let listener = TcpListener::bind(addr).await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!(addr = %addr, "Generation endpoint listening");
    axum::serve(listener, router(orchestrator)).await
        .context("Generation endpoint stopped")
}
