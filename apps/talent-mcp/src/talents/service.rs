//! Talent service: answers reads from the configured store or the fallback dataset.
//!
//! `try_*` methods report store failures as `Err` so callers can pick their own
//! policy. The plain `list` / `get` / `query` methods apply the server's policy:
//! log the failure and answer from the fallback dataset.

use std::sync::Arc;

use tracing::{debug, error};

use crate::models::Talent;
use crate::store::{StoreError, TalentStore};
use crate::talents::criteria::Criteria;
use crate::talents::fallback::fallback_talents;

#[derive(Clone)]
pub struct TalentService {
    store: Option<Arc<dyn TalentStore>>,
    fallback: &'static [Talent],
}

impl TalentService {
    pub fn new(store: Option<Arc<dyn TalentStore>>) -> Self {
        Self {
            store,
            fallback: fallback_talents(),
        }
    }

    /// Service with no store: every read is served from the fallback dataset.
    pub fn fallback_only() -> Self {
        Self::new(None)
    }

    /// Label of the active source.
    pub fn source(&self) -> &'static str {
        self.store.as_ref().map_or("fallback", |s| s.backend())
    }

    pub fn store(&self) -> Option<&Arc<dyn TalentStore>> {
        self.store.as_ref()
    }

    // ── Fallible primitives ────────────────────────────────────────────────

    pub async fn try_list(&self) -> Result<Vec<Talent>, StoreError> {
        match &self.store {
            Some(store) => store.fetch_all().await,
            None => Ok(self.fallback.to_vec()),
        }
    }

    pub async fn try_get(&self, id: &str) -> Result<Option<Talent>, StoreError> {
        match &self.store {
            Some(store) => store.fetch_by_id(id).await,
            None => Ok(self.fallback_get(id)),
        }
    }

    pub async fn try_query(&self, criteria: &Criteria) -> Result<Vec<Talent>, StoreError> {
        match &self.store {
            Some(store) => store.query(criteria).await,
            None => Ok(self.fallback_query(criteria)),
        }
    }

    // ── Fallback dataset ───────────────────────────────────────────────────

    pub fn fallback_get(&self, id: &str) -> Option<Talent> {
        self.fallback.iter().find(|t| t.id == id).cloned()
    }

    pub fn fallback_query(&self, criteria: &Criteria) -> Vec<Talent> {
        criteria.filter(self.fallback)
    }

    // ── Degrade-to-fallback policy ─────────────────────────────────────────

    pub async fn list(&self) -> Vec<Talent> {
        self.try_list().await.unwrap_or_else(|e| {
            error!("Error fetching talents from {}: {e}", self.source());
            self.fallback.to_vec()
        })
    }

    pub async fn get(&self, id: &str) -> Option<Talent> {
        self.try_get(id).await.unwrap_or_else(|e| {
            error!("Error fetching talent with ID {id} from {}: {e}", self.source());
            self.fallback_get(id)
        })
    }

    pub async fn query(&self, criteria: &Criteria) -> Vec<Talent> {
        debug!("Querying {} with {} criteria", self.source(), criteria.len());
        self.try_query(criteria).await.unwrap_or_else(|e| {
            error!("Error querying talents from {}: {e}", self.source());
            self.fallback_query(criteria)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewTalent, TalentPatch};
    use crate::store::InMemoryStore;
    use async_trait::async_trait;
    use serde_json::json;

    /// Store whose every call fails the way an unreachable backend would.
    struct DownStore;

    fn down(context: &str) -> StoreError {
        StoreError::Api {
            context: context.to_string(),
            status: 503,
            code: None,
            message: "Service Unavailable".to_string(),
        }
    }

    #[async_trait]
    impl TalentStore for DownStore {
        fn backend(&self) -> &'static str {
            "down"
        }
        async fn fetch_all(&self) -> Result<Vec<Talent>, StoreError> {
            Err(down("Error fetching talents"))
        }
        async fn fetch_by_id(&self, _id: &str) -> Result<Option<Talent>, StoreError> {
            Err(down("Error fetching talent"))
        }
        async fn query(&self, _criteria: &Criteria) -> Result<Vec<Talent>, StoreError> {
            Err(down("Error querying talents"))
        }
        async fn create(&self, _talent: NewTalent) -> Result<Talent, StoreError> {
            Err(down("Error creating talent"))
        }
        async fn update(&self, _id: &str, _patch: TalentPatch) -> Result<Talent, StoreError> {
            Err(down("Error updating talent"))
        }
        async fn delete(&self, _id: &str) -> Result<(), StoreError> {
            Err(down("Error deleting talent"))
        }
    }

    fn ids(talents: &[Talent]) -> Vec<String> {
        let mut ids: Vec<String> = talents.iter().map(|t| t.id.clone()).collect();
        ids.sort();
        ids
    }

    fn seeded() -> TalentService {
        let store = InMemoryStore::with_talents(fallback_talents().to_vec());
        TalentService::new(Some(Arc::new(store)))
    }

    #[tokio::test]
    async fn test_store_and_fallback_agree_on_seeded_data() {
        let service = seeded();
        let cases = [
            Criteria::new(),
            Criteria::new().with("type", "designer"),
            Criteria::new().with("keywords", "vibrant"),
            Criteria::new().with("keywords", "VIBRANT"),
            Criteria::new().with("name", "gray"),
            Criteria::new().with("description", "profile for"),
            Criteria::new().with("aesthetic", "contemporary"),
            Criteria::new().with("type", "designer").with("keywords", "cool"),
            Criteria::new().with("title", "anything"),
            Criteria::new().with("keywords", json!(7)),
            Criteria::new().with("name", "_"),
            Criteria::new().with("name", "%"),
        ];

        for criteria in cases {
            let from_store = service.try_query(&criteria).await.unwrap();
            let from_fallback = service.fallback_query(&criteria);
            assert_eq!(ids(&from_store), ids(&from_fallback), "{criteria:?}");
        }
    }

    #[tokio::test]
    async fn test_fallback_mode_reports_source() {
        assert_eq!(TalentService::fallback_only().source(), "fallback");
        assert_eq!(seeded().source(), "memory");
    }

    #[tokio::test]
    async fn test_list_without_store_is_non_empty() {
        let talents = TalentService::fallback_only().list().await;
        assert_eq!(talents.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_criteria_return_all_from_active_source() {
        let service = seeded();
        service
            .store()
            .unwrap()
            .delete("olivia-gray")
            .await
            .unwrap();
        let rows = service.query(&Criteria::new()).await;
        assert_eq!(ids(&rows), vec!["maya-chen".to_string()]);
    }

    #[tokio::test]
    async fn test_try_methods_surface_store_failures() {
        let service = TalentService::new(Some(Arc::new(DownStore)));
        assert!(service.try_list().await.is_err());
        assert!(service.try_get("maya-chen").await.is_err());
        assert!(service.try_query(&Criteria::new()).await.is_err());
    }

    #[tokio::test]
    async fn test_query_falls_back_when_store_fails() {
        let service = TalentService::new(Some(Arc::new(DownStore)));
        let rows = service
            .query(&Criteria::new().with("keywords", "vibrant"))
            .await;
        assert_eq!(ids(&rows), vec!["maya-chen".to_string()]);
    }

    #[tokio::test]
    async fn test_get_and_list_fall_back_when_store_fails() {
        let service = TalentService::new(Some(Arc::new(DownStore)));
        assert_eq!(service.list().await.len(), 2);
        assert_eq!(service.get("olivia-gray").await.unwrap().name, "Olivia Gray");
        assert!(service.get("ghost").await.is_none());
    }

    #[tokio::test]
    async fn test_get_absent_id_is_none_not_error() {
        let service = seeded();
        assert!(service.try_get("ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_is_byte_stable_without_writes() {
        let service = seeded();
        let first = serde_json::to_string(&service.get("maya-chen").await).unwrap();
        let second = serde_json::to_string(&service.get("maya-chen").await).unwrap();
        assert_eq!(first, second);
    }
}
