use serde::Serialize;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Utc;

const ARCHIVE_FILENAME: &str = "rewritten_articles.zip";

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    pub meta: ResponseMeta,
}

#[derive(Serialize)]
pub struct ResponseMeta {
    pub status: String,
    pub status_code: u16,
    pub timestamp: String,
    pub message: Option<String>,
}

pub fn error(status: StatusCode, message: String) -> Response {
    error_with::<()>(status, message, None)
}

/// Error envelope carrying extra context, e.g. the per-URL outcome list of
/// a run that produced nothing.
pub fn error_with<T: Serialize>(status: StatusCode, message: String, data: Option<T>) -> Response {
    let meta = ResponseMeta {
        status: "error".to_string(),
        status_code: status.as_u16(),
        timestamp: Utc::now().to_rfc3339(),
        message: Some(message),
    };

    (status, Json(ApiResponse { data, meta })).into_response()
}

/// Serves the finished archive as a download, with the run totals in
/// response headers.
pub fn archive_download(bytes: Vec<u8>, succeeded: usize, total: usize) -> Response {
    (
        StatusCode::OK,
        [
            ("content-type", "application/zip".to_string()),
            (
                "content-disposition",
                format!("attachment; filename=\"{}\"", ARCHIVE_FILENAME),
            ),
            ("x-rewrite-succeeded", succeeded.to_string()),
            ("x-rewrite-total", total.to_string()),
        ],
        bytes,
    )
        .into_response()
}
