#![allow(dead_code)]

//! In-process talent store.
//!
//! Holds rows in memory and evaluates criteria with the same predicates the
//! Supabase store sends to PostgREST. Ids are UUIDv4 and timestamps are
//! assigned on create/update, mirroring the hosted table's defaults.

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::models::{NewTalent, Talent, TalentPatch};
use crate::store::{StoreError, TalentStore};
use crate::talents::criteria::Criteria;

#[derive(Default)]
pub struct InMemoryStore {
    rows: RwLock<Vec<Talent>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store. Later rows with a duplicate id are dropped.
    pub fn with_talents(talents: impl IntoIterator<Item = Talent>) -> Self {
        let mut rows: Vec<Talent> = Vec::new();
        for talent in talents {
            if rows.iter().any(|t| t.id == talent.id) {
                debug!("Skipping duplicate seed row {}", talent.id);
                continue;
            }
            rows.push(talent);
        }
        Self {
            rows: RwLock::new(rows),
        }
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[async_trait]
impl TalentStore for InMemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn fetch_all(&self) -> Result<Vec<Talent>, StoreError> {
        Ok(self.rows.read().await.clone())
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Option<Talent>, StoreError> {
        Ok(self.rows.read().await.iter().find(|t| t.id == id).cloned())
    }

    async fn query(&self, criteria: &Criteria) -> Result<Vec<Talent>, StoreError> {
        Ok(criteria.filter(self.rows.read().await.iter()))
    }

    async fn create(&self, talent: NewTalent) -> Result<Talent, StoreError> {
        let created = talent.into_talent(Uuid::new_v4().to_string(), now());
        self.rows.write().await.push(created.clone());
        debug!("Created talent {}", created.id);
        Ok(created)
    }

    async fn update(&self, id: &str, patch: TalentPatch) -> Result<Talent, StoreError> {
        let mut rows = self.rows.write().await;
        let row = rows
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| StoreError::Missing {
                context: format!("Error updating talent with ID {id}"),
                id: id.to_string(),
            })?;

        row.apply(patch);
        row.updated_at = now();
        Ok(row.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.rows.write().await.retain(|t| t.id != id);
        Ok(())
    }
}
