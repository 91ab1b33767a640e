//! Backend configuration parsed from environment variables.

use std::time::Duration;

use crate::retry::RetryPolicy;

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_RETRY_MAX: u32 = 3;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {var}")]
    Missing { var: &'static str },

    #[error("invalid value for {var}: {value}")]
    Invalid { var: &'static str, value: String },
}

/// Connection settings for the hosted backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
    /// Privileged key; only present in server-side contexts.
    pub service_role_key: Option<String>,
    pub retry: RetryPolicy,
}

impl SupabaseConfig {
    /// Build a config from explicit values, without touching the environment.
    #[must_use]
    pub fn new(url: &str, anon_key: &str) -> Self {
        Self {
            url: url.trim_end_matches('/').to_owned(),
            anon_key: anon_key.to_owned(),
            service_role_key: None,
            retry: RetryPolicy::default(),
        }
    }

    /// Build typed config from environment variables.
    ///
    /// Required:
    /// - `SUPABASE_URL`
    /// - `SUPABASE_ANON_KEY`
    ///
    /// Optional:
    /// - `SUPABASE_SERVICE_ROLE_KEY`: enables the compensating account deletion
    /// - `MAYFLY_RETRY_MAX`: default 3
    /// - `MAYFLY_RETRY_DELAY_MS`: default 1000
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is unset or empty, or if a
    /// numeric variable does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = required(&lookup, "SUPABASE_URL")?;
        let anon_key = required(&lookup, "SUPABASE_ANON_KEY")?;
        let service_role_key = lookup("SUPABASE_SERVICE_ROLE_KEY").filter(|v| !v.trim().is_empty());

        let max_retries = parse_or(&lookup, "MAYFLY_RETRY_MAX", DEFAULT_RETRY_MAX)?;
        let delay_ms = parse_or(&lookup, "MAYFLY_RETRY_DELAY_MS", DEFAULT_RETRY_DELAY_MS)?;

        let mut config = Self::new(&url, &anon_key);
        config.service_role_key = service_role_key;
        config.retry = RetryPolicy::new(max_retries, Duration::from_millis(delay_ms));
        Ok(config)
    }
}

fn required<F>(lookup: &F, var: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(var)
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing { var })
}

fn parse_or<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { var, value: raw }),
    }
}
