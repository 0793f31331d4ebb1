//! JSON check endpoint.
//!
//! `POST` probes with the credentials in the body, `GET` with the configured
//! defaults. The response status is 200 when the check passed and the
//! result's own status otherwise.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::instrument;

use crate::probe::{HealthCheckInput, HealthCheckResult};
use crate::state::AppState;

/// HTTP status for a check result.
pub fn response_status(result: &HealthCheckResult) -> StatusCode {
    if result.ok {
        StatusCode::OK
    } else {
        StatusCode::from_u16(result.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

fn respond(result: HealthCheckResult) -> Response {
    (response_status(&result), Json(result)).into_response()
}

/// POST handler. A body that is not a valid input object counts as empty.
#[instrument(name = "api::check", skip_all)]
pub async fn check(State(state): State<AppState>, body: Bytes) -> Response {
    let input = HealthCheckInput::from_json_lenient(&body);
    respond(state.prober.probe(input).await)
}

/// GET handler, always using the configured defaults.
#[instrument(name = "api::check_defaults", skip_all)]
pub async fn check_defaults(State(state): State<AppState>) -> Response {
    respond(state.prober.probe(HealthCheckInput::default()).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(ok: bool, status: u16) -> HealthCheckResult {
        HealthCheckResult {
            ok,
            status,
            message: String::new(),
            url: String::new(),
        }
    }

    #[test]
    fn test_response_status_mirrors_result() {
        assert_eq!(response_status(&result(true, 200)), StatusCode::OK);
        assert_eq!(response_status(&result(true, 204)), StatusCode::OK);
        assert_eq!(response_status(&result(false, 400)), StatusCode::BAD_REQUEST);
        assert_eq!(response_status(&result(false, 401)), StatusCode::UNAUTHORIZED);
        assert_eq!(response_status(&result(false, 500)), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response_status(&result(false, 503)), StatusCode::SERVICE_UNAVAILABLE);
    }
}
