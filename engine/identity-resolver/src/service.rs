//! Resolution service facade
//!
//! Composes the matcher and the quarantine manager into the single surface
//! the rest of the product calls: resolve, batch resolve, manual alias
//! attachment, and quarantine adjudication.

use crate::batch::{BatchInput, BatchOptions};
use crate::config::ResolverConfig;
use crate::error::StoreResult;
use crate::matcher::{PlayerResolver, ResolveRequest};
use crate::quarantine::QuarantineManager;
use crate::store::{AliasStore, IdentityLookup, QuarantineStore};
use crate::types::{
    IdentityId, QuarantineId, QuarantineStatus, ResolveResult, UnresolvedEntity,
};
use std::collections::HashMap;
use std::sync::Arc;

pub struct ResolutionService {
    resolver: PlayerResolver,
    quarantine: QuarantineManager,
}

impl ResolutionService {
    pub fn new(
        identities: Arc<dyn IdentityLookup>,
        aliases: Arc<dyn AliasStore>,
        quarantine: Arc<dyn QuarantineStore>,
        config: ResolverConfig,
    ) -> Self {
        Self {
            resolver: PlayerResolver::new(
                identities,
                aliases.clone(),
                quarantine.clone(),
                config,
            ),
            quarantine: QuarantineManager::new(quarantine, aliases),
        }
    }

    /// Resolve one free-text name (plus optional hints) to at most one
    /// canonical identity
    pub async fn resolve(&self, request: &ResolveRequest) -> ResolveResult {
        self.resolver.resolve(request).await
    }

    /// Resolve a list of inputs, one independent result per input
    pub async fn resolve_batch(
        &self,
        inputs: Vec<BatchInput>,
        options: &BatchOptions,
    ) -> HashMap<String, ResolveResult> {
        self.resolver.resolve_batch(inputs, options).await
    }

    /// Attach a manually adjudicated alias to an identity
    pub async fn add_manual_alias(
        &self,
        identity_id: IdentityId,
        alias_text: &str,
        source: &str,
    ) -> StoreResult<bool> {
        self.resolver.add_manual_alias(identity_id, alias_text, source).await
    }

    /// Close a quarantined input as resolved, optionally minting an alias
    pub async fn resolve_quarantined_entity(
        &self,
        entity_id: QuarantineId,
        identity_id: IdentityId,
        create_alias: bool,
    ) -> StoreResult<bool> {
        self.quarantine.resolve_entity(entity_id, identity_id, create_alias).await
    }

    /// Close a quarantined input as ignored
    pub async fn ignore_quarantined_entity(&self, entity_id: QuarantineId) -> StoreResult<bool> {
        self.quarantine.ignore_entity(entity_id).await
    }

    /// Adjudication queue listing
    pub async fn get_unresolved_entities(
        &self,
        status: QuarantineStatus,
        limit: usize,
    ) -> StoreResult<Vec<UnresolvedEntity>> {
        self.quarantine.list_entities(status, limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryIndex;
    use crate::types::{Identity, MatchTier, PlayerStatus};

    async fn service_over(index: Arc<MemoryIndex>) -> ResolutionService {
        index
            .insert_identity(Identity {
                id: 1,
                display_name: "Marquise Brown".to_string(),
                position: "WR".to_string(),
                team: Some("KC".to_string()),
                status: PlayerStatus::Active,
            })
            .await;
        ResolutionService::new(
            index.clone(),
            index.clone(),
            index,
            ResolverConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_alias_round_trip_after_quarantine_resolution() {
        let index = Arc::new(MemoryIndex::new());
        let service = service_over(index.clone()).await;

        // "Hollywood" shares no key or token with the display name, so it
        // quarantines with no suggestions
        let first = service.resolve(&ResolveRequest::new("Hollywood")).await;
        assert!(!first.success);
        let quarantine_id = first.quarantine_id.expect("quarantine id");

        assert!(service.resolve_quarantined_entity(quarantine_id, 1, true).await.unwrap());

        // the same raw name now resolves through the alias tier
        let second = service.resolve(&ResolveRequest::new("Hollywood")).await;
        assert!(second.success);
        assert_eq!(second.player_id, Some(1));
        let matched = second.matched.unwrap();
        assert_eq!(matched.match_type, MatchTier::Alias);
        assert_eq!(matched.score, 95);
    }

    #[tokio::test]
    async fn test_adjudication_queue_drains() {
        let index = Arc::new(MemoryIndex::new());
        let service = service_over(index).await;

        service.resolve(&ResolveRequest::new("Nobody Anywhere")).await;
        let open = service.get_unresolved_entities(QuarantineStatus::Open, 50).await.unwrap();
        assert_eq!(open.len(), 1);

        assert!(service.ignore_quarantined_entity(open[0].id).await.unwrap());
        assert!(service
            .get_unresolved_entities(QuarantineStatus::Open, 50)
            .await
            .unwrap()
            .is_empty());
    }
}
