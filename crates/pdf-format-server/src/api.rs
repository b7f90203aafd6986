//! HTTP surface: `POST /format`, `GET /health` and `GET /files/*key`.

use crate::error::{Result, ServiceError};
use crate::form::FormatRequest;
use crate::scratch::Scratch;
use crate::state::AppState;
use crate::storage::{StorageError, put_with_retry};
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{HeaderValue, Method, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use pdf_manuscript::Manuscript;
use serde_json::{Value, json};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use uuid::Uuid;

/// Build the router with all endpoints
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server.allowed_origins);
    let body_limit = state.config.max_upload_bytes();

    Router::new()
        .route("/health", get(health))
        .route("/format", post(format_manuscript))
        .route("/files/*key", get(fetch_file))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .with_state(state)
}

/// Bind and serve until the process exits
pub async fn start_server(addr: &str, state: AppState) -> std::io::Result<()> {
    log::info!("Starting server on {}", addr);

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    if origins.iter().any(|o| o == "*") {
        return base.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                log::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();
    base.allow_origin(AllowOrigin::list(allowed))
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "fonts": state.fonts.names().len(),
    }))
}

/// Extract, typeset and upload one manuscript, answering with its URL
async fn format_manuscript(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Value>> {
    let request_id = Uuid::new_v4();
    let request = FormatRequest::from_multipart(multipart, &state.config.layout).await?;
    log::info!(
        "[{}] Formatting {} manuscript ({} trim)",
        request_id,
        if request.source.is_structured() { "docx" } else { "pasted" },
        request.options.trim_size
    );

    let scratch = Scratch::new(request_id)?;

    let manuscript = Manuscript::extract(request.source, request.extract).await?;
    let book = pdf_typeset::typeset(manuscript, request.options, state.fonts.clone()).await?;
    for (requested, drawn) in &book.statistics.substituted_fonts {
        log::warn!("[{}] Requested font {} drawn with {}", request_id, requested, drawn);
    }
    let local_copy = scratch.write("book.pdf", &book.pdf).await?;
    log::debug!("[{}] Wrote {}", request_id, local_copy.display());

    let key = state.config.storage.object_key(request_id);
    let policy = state.config.storage.retry_policy();
    let pdf_url = put_with_retry(state.store.as_ref(), &key, &book.pdf, policy).await?;

    log::info!(
        "[{}] Done: {} pages, {} words -> {}",
        request_id,
        book.statistics.page_count,
        book.statistics.word_count,
        pdf_url
    );

    Ok(Json(json!({ "pdf_url": pdf_url })))
}

async fn fetch_file(State(state): State<AppState>, Path(key): Path<String>) -> Result<Response> {
    match state.store.get(&key).await {
        Ok(bytes) => Ok(([(header::CONTENT_TYPE, "application/pdf")], bytes).into_response()),
        Err(StorageError::NotFound(_) | StorageError::Unsupported | StorageError::InvalidKey(_)) => {
            Err(ServiceError::NotFound(key))
        }
        Err(e) => Err(e.into()),
    }
}
