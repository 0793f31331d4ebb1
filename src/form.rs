//! State machine behind the connection check form.
//!
//! The page handlers drive a [`CheckForm`] through mount, submit and
//! completion, then render it. `static/js/check.js` continues from the
//! rendered state in the browser, where fields can also be edited and the
//! request to the JSON endpoint can fail; `tests/browser_tests.rs` covers that side.

use serde::Serialize;

use crate::probe::{HealthCheckInput, HealthCheckResult, ProbeDefaults};

/// Error shown when a failed response carries no message.
pub const FALLBACK_ERROR_MESSAGE: &str = "Unable to connect to Supabase.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckPhase {
    #[default]
    Idle,
    Checking,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckForm {
    pub project_url: String,
    pub anon_key: String,
    phase: CheckPhase,
    result: Option<HealthCheckResult>,
    error: Option<String>,
    has_auto_run: bool,
}

impl CheckForm {
    pub fn new(project_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            project_url: project_url.into(),
            anon_key: anon_key.into(),
            ..Self::default()
        }
    }

    /// Form prefilled from the configured defaults.
    pub fn from_defaults(defaults: ProbeDefaults) -> Self {
        Self::new(
            defaults.url.unwrap_or_default(),
            defaults.api_key.unwrap_or_default(),
        )
    }

    pub fn is_configured(&self) -> bool {
        !self.project_url.is_empty() && !self.anon_key.is_empty()
    }

    pub fn is_checking(&self) -> bool {
        self.phase == CheckPhase::Checking
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        self.is_configured() && !self.is_checking()
    }

    pub fn phase(&self) -> CheckPhase {
        self.phase
    }

    pub fn result(&self) -> Option<&HealthCheckResult> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn has_auto_run(&self) -> bool {
        self.has_auto_run
    }

    /// Starts the automatic check if it is due. Returns the input to probe with.
    pub fn auto_run(&mut self) -> Option<HealthCheckInput> {
        if !self.is_configured() {
            self.has_auto_run = false;
            return None;
        }

        if self.has_auto_run || self.is_checking() {
            return None;
        }

        self.has_auto_run = true;
        Some(self.start())
    }

    /// Starts a check on explicit user action, unless the submit control is disabled.
    pub fn submit(&mut self) -> Option<HealthCheckInput> {
        if !self.can_submit() {
            return None;
        }

        self.has_auto_run = true;
        Some(self.start())
    }

    fn start(&mut self) -> HealthCheckInput {
        self.phase = CheckPhase::Checking;
        self.error = None;
        HealthCheckInput::new(self.project_url.clone(), self.anon_key.clone())
    }

    /// Records the result of the in-flight check.
    ///
    /// The result is shown either way. A failed one also sets the error message.
    pub fn complete(&mut self, result: HealthCheckResult) {
        if result.ok {
            self.error = None;
            self.phase = CheckPhase::Succeeded;
        } else {
            self.error = Some(if result.message.is_empty() {
                FALLBACK_ERROR_MESSAGE.to_string()
            } else {
                result.message.clone()
            });
            self.phase = CheckPhase::Failed;
        }
        self.result = Some(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(ok: bool, status: u16, message: &str) -> HealthCheckResult {
        HealthCheckResult {
            ok,
            status,
            message: message.to_string(),
            url: "https://abc.supabase.co".to_string(),
        }
    }

    #[test]
    fn test_prefilled_form_auto_runs_once() {
        let mut form = CheckForm::new("https://abc.supabase.co", "key");
        assert_eq!(form.phase(), CheckPhase::Idle);
        assert!(form.auto_run().is_some());
        assert!(form.is_checking());
        assert!(!form.can_submit());
        assert!(form.auto_run().is_none());

        form.complete(result(true, 200, r#"{"status":"ok"}"#));
        assert_eq!(form.phase(), CheckPhase::Succeeded);
        assert!(form.auto_run().is_none());
    }

    #[test]
    fn test_partial_form_never_auto_runs() {
        let mut form = CheckForm::new("https://abc.supabase.co", "");
        assert!(!form.is_configured());
        assert!(form.auto_run().is_none());
        assert!(!form.can_submit());
        assert!(form.submit().is_none());
        assert_eq!(form.phase(), CheckPhase::Idle);
    }

    #[test]
    fn test_submit_marks_auto_run_done() {
        let mut form = CheckForm::new("https://abc.supabase.co", "key");
        let input = form.submit().unwrap();
        assert_eq!(input, HealthCheckInput::new("https://abc.supabase.co", "key"));
        assert!(form.has_auto_run());
        assert!(form.auto_run().is_none());
    }

    #[test]
    fn test_submit_runs_again_after_auto_run() {
        let mut form = CheckForm::new("https://abc.supabase.co", "key");
        form.auto_run();
        form.complete(result(true, 200, "ok"));
        assert!(form.submit().is_some());
    }

    #[test]
    fn test_failed_response_keeps_result_and_shows_error() {
        let mut form = CheckForm::new("https://abc.supabase.co", "key");
        form.submit();
        form.complete(result(false, 401, "unauthorized"));
        assert_eq!(form.phase(), CheckPhase::Failed);
        assert_eq!(form.error(), Some("unauthorized"));
        assert_eq!(form.result().map(|r| r.status), Some(401));
    }

    #[test]
    fn test_failed_response_without_message_uses_fallback() {
        let mut form = CheckForm::new("https://abc.supabase.co", "key");
        form.submit();
        form.complete(result(false, 502, ""));
        assert_eq!(form.error(), Some(FALLBACK_ERROR_MESSAGE));
    }

    #[test]
    fn test_success_clears_previous_error() {
        let mut form = CheckForm::new("https://abc.supabase.co", "key");
        form.submit();
        form.complete(result(false, 503, "refused"));
        form.submit();
        form.complete(result(true, 200, "ok"));
        assert!(form.error().is_none());
        assert_eq!(form.phase(), CheckPhase::Succeeded);
    }
}
