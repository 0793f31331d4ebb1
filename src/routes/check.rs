//! Connection check page.
//!
//! `GET` is the first render: a form prefilled from the defaults runs its
//! single automatic check before the page is returned. `POST` is an explicit
//! submit of the form fields.

use axum::{extract::State, response::Html, Extension, Form};
use serde::Deserialize;
use tracing::instrument;

use super::API_CHECK_PATH;
use crate::error::{AppError, AppErrorResponse, ResultExt};
use crate::form::CheckForm;
use crate::middleware::RequestId;
use crate::probe::HealthCheckInput;
use crate::state::AppState;

/// Fields posted by the check form
#[derive(Debug, Default, Deserialize)]
pub struct CheckFormFields {
    #[serde(rename = "supabase-url", default)]
    pub url: String,
    #[serde(rename = "supabase-key", default)]
    pub key: String,
}

/// Runs the form's pending check, if any, against the prober.
async fn run_pending(state: &AppState, form: &mut CheckForm, pending: Option<HealthCheckInput>) {
    if let Some(input) = pending {
        let result = state.prober.probe(input).await;
        form.complete(result);
    }
}

fn render(
    state: &AppState,
    form: &CheckForm,
    request_id: &RequestId,
) -> Result<Html<String>, AppErrorResponse> {
    let mut context = tera::Context::new();
    context.insert("config", &state.config.ui);
    context.insert("form", form);
    context.insert("is_configured", &form.is_configured());
    context.insert("can_submit", &form.can_submit());
    context.insert("api_path", API_CHECK_PATH);

    let html = state
        .tera
        .render("check.html", &context)
        .map_err(AppError::from)
        .with_request_id(request_id)?;
    Ok(Html(html))
}

#[instrument(name = "check::page", skip_all)]
pub async fn page(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> Result<Html<String>, AppErrorResponse> {
    let mut form = CheckForm::from_defaults(state.prober.defaults());

    let pending = form.auto_run();
    if pending.is_some() {
        tracing::debug!("Defaults configured, running automatic check");
    }
    run_pending(&state, &mut form, pending).await;

    render(&state, &form, &request_id)
}

#[instrument(name = "check::submit", skip_all)]
pub async fn submit(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Form(fields): Form<CheckFormFields>,
) -> Result<Html<String>, AppErrorResponse> {
    let mut form = CheckForm::new(fields.url, fields.key);

    let pending = form.submit();
    run_pending(&state, &mut form, pending).await;

    render(&state, &form, &request_id)
}
