use anyhow::{bail, Result};

use crate::store::supabase::{SupabaseCredentials, DEFAULT_TABLE};

/// Application configuration loaded from environment variables.
/// Supabase credentials are optional: without both, the server runs on the
/// built-in fallback dataset.
#[derive(Debug, Clone)]
pub struct Config {
    pub supabase_url: Option<String>,
    pub supabase_key: Option<String>,
    pub supabase_table: String,
    pub debug: bool,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let supabase_table =
            non_empty("SUPABASE_TABLE").unwrap_or_else(|| DEFAULT_TABLE.to_string());
        if !supabase_table
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            bail!("SUPABASE_TABLE must be a plain table name, got '{supabase_table}'");
        }

        Ok(Config {
            supabase_url: non_empty("SUPABASE_URL"),
            supabase_key: non_empty("SUPABASE_KEY"),
            supabase_table,
            debug: non_empty("DEBUG").is_some(),
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Both credentials, or `None` when either is missing.
    pub fn supabase_credentials(&self) -> Option<SupabaseCredentials> {
        match (&self.supabase_url, &self.supabase_key) {
            (Some(url), Some(key)) => {
                Some(SupabaseCredentials::new(url, key).with_table(&self.supabase_table))
            }
            _ => None,
        }
    }

    /// Log level for this crate's targets. `DEBUG` forces `debug`.
    pub fn log_level(&self) -> &str {
        if self.debug {
            "debug"
        } else {
            &self.rust_log
        }
    }
}
