#![allow(dead_code)]

//! Talent stores, the single seam between the server and persisted profiles.
//!
//! `TalentStore` is carried as `Arc<dyn TalentStore>` so the hosted Supabase
//! backend and the in-process store are interchangeable behind the query
//! service.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{NewTalent, Talent, TalentPatch};
use crate::talents::criteria::Criteria;

pub mod memory;
pub mod supabase;

pub use memory::InMemoryStore;
pub use supabase::SupabaseStore;

/// Credentials were missing or could not be turned into a client.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Supabase URL and key must be provided as environment variables")]
    MissingCredentials,

    #[error("Invalid Supabase URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Any failure talking to a talent store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("{context}: {source}")]
    Transport {
        context: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{context}: {message}")]
    Api {
        context: String,
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("{context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{context}: no row with id {id}")]
    Missing { context: String, id: String },
}

impl StoreError {
    /// Store-reported error code, when the backend supplied one.
    pub fn code(&self) -> Option<&str> {
        match self {
            StoreError::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

/// CRUD and filtered reads over talent profiles.
#[async_trait]
pub trait TalentStore: Send + Sync {
    /// Short backend label for diagnostics.
    fn backend(&self) -> &'static str;

    async fn fetch_all(&self) -> Result<Vec<Talent>, StoreError>;

    /// `Ok(None)` when no row has this id.
    async fn fetch_by_id(&self, id: &str) -> Result<Option<Talent>, StoreError>;

    async fn query(&self, criteria: &Criteria) -> Result<Vec<Talent>, StoreError>;

    async fn create(&self, talent: NewTalent) -> Result<Talent, StoreError>;

    async fn update(&self, id: &str, patch: TalentPatch) -> Result<Talent, StoreError>;

    /// Succeeds whether or not the row existed.
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}
