//! Application errors and their HTML rendering.
//!
//! Check failures are not errors here: the prober reports them inside a
//! `HealthCheckResult`. `AppError` covers what can go wrong around it.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::middleware::RequestId;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// An `AppError` tagged with the request it occurred in.
#[derive(Debug)]
pub struct AppErrorResponse {
    pub error: AppError,
    pub request_id: Option<RequestId>,
}

impl From<AppError> for AppErrorResponse {
    fn from(error: AppError) -> Self {
        Self {
            error,
            request_id: None,
        }
    }
}

/// Attaches the current request ID to an error result.
pub trait ResultExt<T> {
    fn with_request_id(self, request_id: &RequestId) -> Result<T, AppErrorResponse>;
}

impl<T, E: Into<AppError>> ResultExt<T> for Result<T, E> {
    fn with_request_id(self, request_id: &RequestId) -> Result<T, AppErrorResponse> {
        self.map_err(|e| AppErrorResponse {
            error: e.into(),
            request_id: Some(request_id.clone()),
        })
    }
}

impl IntoResponse for AppErrorResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::INTERNAL_SERVER_ERROR;
        let request_id = self
            .request_id
            .map(|id| id.0.to_string())
            .unwrap_or_else(|| "-".to_string());

        tracing::error!(error = ?self.error, request_id = %request_id, "Request failed");

        let body = format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <title>Error {status}</title>
    <link rel="stylesheet" href="/static/css/style.css">
</head>
<body>
    <div class="container">
        <div class="error-page">
            <h1>Error {status}</h1>
            <p>Internal server error</p>
            <p class="request-id">Request ID: {request_id}</p>
            <a href="/supabase-check">Return to the connection check</a>
        </div>
    </div>
</body>
</html>"#,
            status = status.as_u16(),
            request_id = request_id,
        );

        (status, Html(body)).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        AppErrorResponse::from(self).into_response()
    }
}
