use axum::{
    routing::{get, post},
    Router,
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tower_http::cors::{CorsLayer, Any};
use chrono::Utc;
use tracing::info;

use crate::api::models::{RewriteRequest, RunSummary};
use crate::api::response;
use crate::extract::HttpArticleSource;
use crate::llm::{OpenAiClient, RetryingRewriter};
use crate::pipeline;
use crate::prompt::Category;
use crate::AppState;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/rewrite", post(rewrite_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state)
}

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn rewrite_handler(
    State(state): State<AppState>,
    Json(req): Json<RewriteRequest>,
) -> Response {
    let category = match req.category.parse::<Category>() {
        Ok(category) => category,
        Err(err) => return response::error(StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
    };

    let urls: Vec<String> = req
        .urls
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect();
    if urls.is_empty() {
        return response::error(
            StatusCode::BAD_REQUEST,
            "Please provide at least one URL".to_string(),
        );
    }

    info!(%category, urls = urls.len(), "Starting rewrite run");
    let start_time = std::time::Instant::now();

    let source = HttpArticleSource;
    let rewriter = RetryingRewriter::new(OpenAiClient::new(&state.config));

    let report = match pipeline::run(&source, &rewriter, category, &urls, |done, total| {
        info!(done, total, "Progress");
    })
    .await
    {
        Ok(report) => report,
        Err(err) => return err.into_response(),
    };

    info!(
        succeeded = report.succeeded,
        total = report.total,
        elapsed = ?start_time.elapsed(),
        "Rewrite run finished"
    );

    match report.archive {
        Some(bytes) => response::archive_download(bytes, report.succeeded, report.total),
        None => {
            let summary = RunSummary {
                category,
                total: report.total,
                succeeded: report.succeeded,
                results: report.outcomes,
                finished_at: Utc::now(),
            };
            response::error_with(
                StatusCode::UNPROCESSABLE_ENTITY,
                "No articles could be processed. Please check your URLs".to_string(),
                Some(summary),
            )
        }
    }
}
