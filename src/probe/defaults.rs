//! Default project credentials for checks that omit them.
//!
//! Defaults are looked up every time a check runs, so changing the
//! environment of a running process takes effect on the next check.

use crate::config::{SupabaseConfig, ENV_SUPABASE_ANON_KEY, ENV_SUPABASE_URL};

/// Credentials applied to absent fields of a [`HealthCheckInput`](super::HealthCheckInput).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeDefaults {
    pub url: Option<String>,
    pub api_key: Option<String>,
}

/// Source of [`ProbeDefaults`], consulted at call time.
pub trait DefaultsSource: Send + Sync {
    fn defaults(&self) -> ProbeDefaults;
}

/// Reads `SUPABASE_URL` / `SUPABASE_ANON_KEY`, falling back to the config file.
#[derive(Debug, Clone, Default)]
pub struct EnvDefaults {
    file: SupabaseConfig,
}

impl EnvDefaults {
    pub fn new(file: SupabaseConfig) -> Self {
        Self { file }
    }
}

impl DefaultsSource for EnvDefaults {
    fn defaults(&self) -> ProbeDefaults {
        ProbeDefaults {
            url: env_var(ENV_SUPABASE_URL).or_else(|| self.file.url.clone()),
            api_key: env_var(ENV_SUPABASE_ANON_KEY).or_else(|| self.file.anon_key.clone()),
        }
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

/// Fixed defaults, independent of the environment.
#[derive(Debug, Clone, Default)]
pub struct StaticDefaults(pub ProbeDefaults);

impl StaticDefaults {
    pub fn new(url: Option<&str>, api_key: Option<&str>) -> Self {
        Self(ProbeDefaults {
            url: url.map(str::to_string),
            api_key: api_key.map(str::to_string),
        })
    }
}

impl DefaultsSource for StaticDefaults {
    fn defaults(&self) -> ProbeDefaults {
        self.0.clone()
    }
}
