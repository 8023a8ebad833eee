//! Quarantine adjudication
//!
//! Unresolved inputs sit in the quarantine queue until an administrator
//! either resolves them to a target identity (optionally minting a new
//! alias from the original raw input) or ignores them. Both transitions
//! are terminal; acting on an already-closed record reports `false`
//! instead of silently succeeding twice.

use crate::error::StoreResult;
use crate::normalize::normalize;
use crate::store::{AliasStore, QuarantineStore};
use crate::types::{IdentityId, QuarantineId, QuarantineStatus, UnresolvedEntity};
use std::sync::Arc;
use tracing::{info, warn};

/// Alias source tag for aliases minted by quarantine resolution
const QUARANTINE_ALIAS_SOURCE: &str = "quarantine";

pub struct QuarantineManager {
    quarantine: Arc<dyn QuarantineStore>,
    aliases: Arc<dyn AliasStore>,
}

impl QuarantineManager {
    pub fn new(quarantine: Arc<dyn QuarantineStore>, aliases: Arc<dyn AliasStore>) -> Self {
        Self { quarantine, aliases }
    }

    /// Resolve a quarantined input to a target identity.
    ///
    /// When `create_alias` is set, the record's original raw input is
    /// normalized and stored as a new alias of the target, so the same raw
    /// name resolves through the alias tier from then on. Returns false if
    /// the record is missing or already closed.
    pub async fn resolve_entity(
        &self,
        entity_id: QuarantineId,
        identity_id: IdentityId,
        create_alias: bool,
    ) -> StoreResult<bool> {
        let Some(entity) = self.quarantine.get(entity_id).await? else {
            return Ok(false);
        };
        if entity.status != QuarantineStatus::Open {
            return Ok(false);
        }

        let updated = self
            .quarantine
            .update_status(entity_id, QuarantineStatus::Resolved, Some(identity_id))
            .await?;
        if !updated {
            return Ok(false);
        }

        if create_alias {
            let key = normalize(&entity.raw_name);
            if !key.is_empty() {
                // the record is already resolved at this point; a failed
                // alias write is logged and left for a manual retry
                if let Err(e) = self
                    .aliases
                    .insert_alias(identity_id, &entity.raw_name, &key, QUARANTINE_ALIAS_SOURCE)
                    .await
                {
                    warn!(
                        entity_id,
                        identity_id,
                        error = %e,
                        "alias creation failed during quarantine resolution"
                    );
                }
            }
        }

        info!(entity_id, identity_id, raw_name = %entity.raw_name, "quarantined entity resolved");
        Ok(true)
    }

    /// Mark a quarantined input as ignored, with no alias created. Returns
    /// false if the record is missing or already closed.
    pub async fn ignore_entity(&self, entity_id: QuarantineId) -> StoreResult<bool> {
        let ignored =
            self.quarantine.update_status(entity_id, QuarantineStatus::Ignored, None).await?;
        if ignored {
            info!(entity_id, "quarantined entity ignored");
        }
        Ok(ignored)
    }

    /// List quarantine records by status for the adjudication queue
    pub async fn list_entities(
        &self,
        status: QuarantineStatus,
        limit: usize,
    ) -> StoreResult<Vec<UnresolvedEntity>> {
        self.quarantine.list(status, limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryIndex;
    use crate::types::{Identity, NewUnresolved, PlayerStatus};

    async fn index_with_open_record() -> (Arc<MemoryIndex>, QuarantineId) {
        let index = Arc::new(MemoryIndex::new());
        index
            .insert_identity(Identity {
                id: 3,
                display_name: "Lamar Jackson".to_string(),
                position: "QB".to_string(),
                team: Some("BAL".to_string()),
                status: PlayerStatus::Active,
            })
            .await;

        let id = index
            .insert_unresolved(&NewUnresolved {
                raw_name: "L. Jax".to_string(),
                position: Some("QB".to_string()),
                team: None,
                source: "html_scrape".to_string(),
                suggestions: Vec::new(),
            })
            .await
            .unwrap();
        (index, id)
    }

    #[tokio::test]
    async fn test_resolve_mints_alias_from_raw_input() {
        let (index, entity_id) = index_with_open_record().await;
        let manager = QuarantineManager::new(index.clone(), index.clone());

        assert!(manager.resolve_entity(entity_id, 3, true).await.unwrap());

        let hit = index.find_by_normalized_alias("ljax").await.unwrap().unwrap();
        assert_eq!(hit.identity.id, 3);
        assert_eq!(hit.alias, "L. Jax");

        let entity = index.get(entity_id).await.unwrap().unwrap();
        assert_eq!(entity.status, QuarantineStatus::Resolved);
        assert_eq!(entity.resolved_identity_id, Some(3));
    }

    #[tokio::test]
    async fn test_resolve_without_alias_creation() {
        let (index, entity_id) = index_with_open_record().await;
        let manager = QuarantineManager::new(index.clone(), index.clone());

        assert!(manager.resolve_entity(entity_id, 3, false).await.unwrap());
        assert_eq!(index.alias_count().await, 0);
    }

    #[tokio::test]
    async fn test_closed_records_reject_further_transitions() {
        let (index, entity_id) = index_with_open_record().await;
        let manager = QuarantineManager::new(index.clone(), index.clone());

        assert!(manager.resolve_entity(entity_id, 3, false).await.unwrap());
        assert!(!manager.resolve_entity(entity_id, 3, true).await.unwrap());
        assert!(!manager.ignore_entity(entity_id).await.unwrap());
    }

    #[tokio::test]
    async fn test_ignore_is_terminal_with_no_alias() {
        let (index, entity_id) = index_with_open_record().await;
        let manager = QuarantineManager::new(index.clone(), index.clone());

        assert!(manager.ignore_entity(entity_id).await.unwrap());
        assert_eq!(index.alias_count().await, 0);

        let entity = index.get(entity_id).await.unwrap().unwrap();
        assert_eq!(entity.status, QuarantineStatus::Ignored);
        assert!(entity.resolved_identity_id.is_none());
    }

    #[tokio::test]
    async fn test_missing_record_reports_false() {
        let (index, _) = index_with_open_record().await;
        let manager = QuarantineManager::new(index.clone(), index);

        assert!(!manager.resolve_entity(999, 3, true).await.unwrap());
        assert!(!manager.ignore_entity(999).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_filters_by_status() {
        let (index, entity_id) = index_with_open_record().await;
        let manager = QuarantineManager::new(index.clone(), index.clone());

        assert_eq!(manager.list_entities(QuarantineStatus::Open, 10).await.unwrap().len(), 1);
        manager.resolve_entity(entity_id, 3, false).await.unwrap();
        assert!(manager.list_entities(QuarantineStatus::Open, 10).await.unwrap().is_empty());
        assert_eq!(manager.list_entities(QuarantineStatus::Resolved, 10).await.unwrap().len(), 1);
    }
}
