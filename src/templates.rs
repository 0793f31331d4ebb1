use std::collections::HashMap;

use tera::Tera;

use crate::config::UiConfig;
use crate::error::AppError;
use crate::probe::display_endpoint;

/// Initialize the Tera template engine
pub fn init_templates(ui: &UiConfig) -> Result<Tera, AppError> {
    let mut tera = Tera::new(&ui.template_glob())?;

    tera.register_filter("probe_endpoint", probe_endpoint_filter);

    Ok(tera)
}

/// Turn a project URL into the health endpoint that was probed
fn probe_endpoint_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let url = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("probe_endpoint filter expects a string"))?;

    Ok(tera::Value::String(display_endpoint(url)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_endpoint_filter() {
        let value = tera::Value::String("https://abc.supabase.co/rest/v1".to_string());
        let out = probe_endpoint_filter(&value, &HashMap::new()).unwrap();
        assert_eq!(out, "https://abc.supabase.co/auth/v1/health");
    }

    #[test]
    fn test_probe_endpoint_filter_rejects_non_string() {
        let value = tera::Value::Bool(true);
        assert!(probe_endpoint_filter(&value, &HashMap::new()).is_err());
    }

    #[test]
    fn test_bundled_templates_load() {
        let ui = UiConfig {
            templates_dir: concat!(env!("CARGO_MANIFEST_DIR"), "/templates").to_string(),
            ..UiConfig::default()
        };
        let tera = init_templates(&ui).unwrap();
        assert!(tera.get_template_names().any(|name| name == "check.html"));
    }
}
