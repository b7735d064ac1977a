//! HTTP endpoint that receives SOP documents from an external sync job.

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info, instrument, warn};

use crate::{
    base::{config::Config, types::Void},
    sop::{RawDocument, SopStore},
};

// Types.

/// One file in a sync payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncFile {
    pub filename: String,
    pub content: String,
}

/// Body of `POST /sync-sops`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncRequest {
    pub files: Option<Vec<SyncFile>>,
}

/// Successful response of `POST /sync-sops`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncResponse {
    pub message: String,
    pub documents: usize,
    pub sections: usize,
}

// Router.

/// Build the sync router over the given store.
pub fn create_router(store: SopStore, max_payload_bytes: usize) -> Router {
    Router::new()
        .route("/sync-sops", post(sync_sops))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(max_payload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}

/// Bind the configured address and serve the sync endpoint until the process exits.
#[instrument(skip_all)]
pub async fn serve(config: &Config, store: SopStore) -> Void {
    let listener = TcpListener::bind(&config.sync_bind_address).await?;

    info!("SOP sync endpoint listening on {}.", listener.local_addr()?);

    axum::serve(listener, create_router(store, config.sync_max_payload_bytes)).await?;

    Ok(())
}

// Handlers.

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

#[instrument(skip_all)]
async fn sync_sops(State(store): State<SopStore>, payload: Result<Json<SyncRequest>, JsonRejection>) -> Result<Json<SyncResponse>, (StatusCode, Json<Value>)> {
    let files = match payload {
        Ok(Json(SyncRequest { files: Some(files) })) => files,
        Ok(_) => return Err(invalid_file_data("missing `files`")),
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            warn!("Rejected SOP sync: {}", rejection.body_text());
            return Err((StatusCode::PAYLOAD_TOO_LARGE, Json(json!({ "error": "Payload too large" }))));
        }
        Err(rejection) => return Err(invalid_file_data(&rejection.body_text())),
    };

    let documents = files.into_iter().map(|f| RawDocument::new(f.filename, f.content)).collect::<Vec<_>>();
    let received = documents.len();

    // Indexing is CPU-bound.
    let index = tokio::task::spawn_blocking(move || store.reindex(documents)).await.map_err(|err| {
        error!("SOP reindex task failed: {}", err);
        (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "Failed to sync SOPs" })))
    })?;

    info!("Received {} SOP files.", received);

    Ok(Json(SyncResponse {
        message: "SOPs synced successfully".to_string(),
        documents: index.document_count(),
        sections: index.section_count(),
    }))
}

fn invalid_file_data(reason: &str) -> (StatusCode, Json<Value>) {
    warn!("Rejected SOP sync: {}", reason);
    (StatusCode::BAD_REQUEST, Json(json!({ "error": "Invalid file data" })))
}

// Tests.
