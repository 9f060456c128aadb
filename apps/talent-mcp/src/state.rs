use std::sync::Arc;

use crate::config::Config;
use crate::talents::TalentService;

/// Shared application state handed to the MCP handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Store-backed when Supabase is configured and initialized, fallback-only otherwise.
    pub talents: Arc<TalentService>,
}

impl AppState {
    pub fn new(config: Config, talents: TalentService) -> Self {
        Self {
            config,
            talents: Arc::new(talents),
        }
    }
}
