//! Shared application state for request handlers.

use std::sync::Arc;
use tera::Tera;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::probe::HealthProber;
use crate::templates::init_templates;

/// Shared application state, cloneable across handlers via Arc-wrapped fields.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tera: Arc<Tera>,
    pub prober: HealthProber,
}

impl AppState {
    pub fn new(config: AppConfig, tera: Tera, prober: HealthProber) -> Self {
        Self {
            config: Arc::new(config),
            tera: Arc::new(tera),
            prober,
        }
    }

    /// Builds the prober and templates described by the configuration.
    pub fn from_config(config: AppConfig) -> Result<Self, AppError> {
        let prober = HealthProber::from_config(&config.supabase)?;
        let tera = init_templates(&config.ui)?;
        Ok(Self::new(config, tera, prober))
    }
}
