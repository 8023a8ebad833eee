//! In-memory index implementing the capability traits.
//!
//! Backs engine tests and small tools that run without a database. Keeps
//! the same lookup shape as the production store: identities indexed by
//! normalized display-name key, aliases by normalized alias key.

use crate::error::StoreResult;
use crate::normalize::normalize;
use crate::store::{AliasHit, AliasStore, IdentityLookup, QuarantineStore};
use crate::types::{
    Alias, Identity, IdentityId, NewUnresolved, PlayerStatus, QuarantineId, QuarantineStatus,
    UnresolvedEntity,
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct Inner {
    identities: HashMap<IdentityId, Identity>,

    /// normalized display-name key -> identity ids sharing it
    identities_by_key: HashMap<String, Vec<IdentityId>>,

    aliases: Vec<Alias>,

    unresolved: HashMap<QuarantineId, UnresolvedEntity>,
    next_quarantine_id: QuarantineId,
}

/// In-memory identity/alias/quarantine index
#[derive(Default)]
pub struct MemoryIndex {
    inner: RwLock<Inner>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self { inner: RwLock::new(Inner { next_quarantine_id: 1, ..Inner::default() }) }
    }

    /// Add an identity, indexing it by its normalized display-name key
    pub async fn insert_identity(&self, identity: Identity) {
        let key = normalize(&identity.display_name);
        let mut inner = self.inner.write().await;
        inner.identities_by_key.entry(key).or_default().push(identity.id);
        inner.identities.insert(identity.id, identity);
    }

    pub async fn identity_count(&self) -> usize {
        self.inner.read().await.identities.len()
    }

    pub async fn alias_count(&self) -> usize {
        self.inner.read().await.aliases.len()
    }
}

#[async_trait]
impl IdentityLookup for MemoryIndex {
    async fn find_by_normalized_key(
        &self,
        key: &str,
        position: Option<&str>,
    ) -> StoreResult<Option<Identity>> {
        let inner = self.inner.read().await;
        let Some(ids) = inner.identities_by_key.get(key) else {
            return Ok(None);
        };

        let hit = ids
            .iter()
            .filter_map(|id| inner.identities.get(id))
            .find(|identity| match position {
                Some(pos) => identity.position.eq_ignore_ascii_case(pos),
                None => true,
            })
            .cloned();
        Ok(hit)
    }

    async fn list_candidates(
        &self,
        position: Option<&str>,
        statuses: &[PlayerStatus],
    ) -> StoreResult<Vec<Identity>> {
        let inner = self.inner.read().await;
        let mut candidates: Vec<Identity> = inner
            .identities
            .values()
            .filter(|identity| statuses.contains(&identity.status))
            .filter(|identity| match position {
                Some(pos) => identity.position.eq_ignore_ascii_case(pos),
                None => true,
            })
            .cloned()
            .collect();
        candidates.sort_by_key(|identity| identity.id);
        Ok(candidates)
    }
}

#[async_trait]
impl AliasStore for MemoryIndex {
    async fn find_by_normalized_alias(&self, key: &str) -> StoreResult<Option<AliasHit>> {
        let inner = self.inner.read().await;
        let hit = inner.aliases.iter().find(|alias| alias.normalized_key == key).and_then(|alias| {
            inner.identities.get(&alias.identity_id).map(|identity| AliasHit {
                identity: identity.clone(),
                alias: alias.alias.clone(),
            })
        });
        Ok(hit)
    }

    async fn insert_alias(
        &self,
        identity_id: IdentityId,
        alias_text: &str,
        normalized_key: &str,
        source: &str,
    ) -> StoreResult<bool> {
        let mut inner = self.inner.write().await;
        let duplicate = inner
            .aliases
            .iter()
            .any(|alias| alias.identity_id == identity_id && alias.normalized_key == normalized_key);
        if !duplicate {
            inner.aliases.push(Alias {
                identity_id,
                alias: alias_text.to_string(),
                normalized_key: normalized_key.to_string(),
                source: source.to_string(),
            });
        }
        Ok(!duplicate)
    }
}

#[async_trait]
impl QuarantineStore for MemoryIndex {
    async fn insert_unresolved(&self, record: &NewUnresolved) -> StoreResult<QuarantineId> {
        let mut inner = self.inner.write().await;
        let id = inner.next_quarantine_id;
        inner.next_quarantine_id += 1;

        let now = Utc::now();
        inner.unresolved.insert(
            id,
            UnresolvedEntity {
                id,
                raw_name: record.raw_name.clone(),
                position: record.position.clone(),
                team: record.team.clone(),
                source: record.source.clone(),
                suggestions: record.suggestions.clone(),
                status: QuarantineStatus::Open,
                resolved_identity_id: None,
                created_at: now,
                updated_at: now,
            },
        );
        Ok(id)
    }

    async fn get(&self, id: QuarantineId) -> StoreResult<Option<UnresolvedEntity>> {
        Ok(self.inner.read().await.unresolved.get(&id).cloned())
    }

    async fn update_status(
        &self,
        id: QuarantineId,
        status: QuarantineStatus,
        resolved_identity_id: Option<IdentityId>,
    ) -> StoreResult<bool> {
        let mut inner = self.inner.write().await;
        match inner.unresolved.get_mut(&id) {
            Some(entity) if entity.status == QuarantineStatus::Open => {
                entity.status = status;
                entity.resolved_identity_id = resolved_identity_id;
                entity.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn list(
        &self,
        status: QuarantineStatus,
        limit: usize,
    ) -> StoreResult<Vec<UnresolvedEntity>> {
        let inner = self.inner.read().await;
        let mut entities: Vec<UnresolvedEntity> =
            inner.unresolved.values().filter(|e| e.status == status).cloned().collect();
        entities.sort_by_key(|e| e.id);
        entities.truncate(limit);
        Ok(entities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(id: IdentityId, name: &str, position: &str) -> Identity {
        Identity {
            id,
            display_name: name.to_string(),
            position: position.to_string(),
            team: None,
            status: PlayerStatus::Active,
        }
    }

    #[tokio::test]
    async fn test_key_lookup_with_position_filter() {
        let index = MemoryIndex::new();
        index.insert_identity(identity(1, "Josh Allen", "QB")).await;
        index.insert_identity(identity(2, "Josh Allen", "WR")).await;

        let qb = index.find_by_normalized_key("joshallen", Some("qb")).await.unwrap().unwrap();
        assert_eq!(qb.id, 1);

        let any = index.find_by_normalized_key("joshallen", None).await.unwrap().unwrap();
        assert_eq!(any.id, 1);

        assert!(index.find_by_normalized_key("joshallen", Some("TE")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_alias_insert_is_noop() {
        let index = MemoryIndex::new();
        index.insert_identity(identity(1, "Josh Allen", "QB")).await;

        assert!(index.insert_alias(1, "J. Allen", "jallen", "generated").await.unwrap());
        // same key again: no new row, reported as such
        assert!(!index.insert_alias(1, "J Allen", "jallen", "manual").await.unwrap());

        assert_eq!(index.alias_count().await, 1);
        let hit = index.find_by_normalized_alias("jallen").await.unwrap().unwrap();
        assert_eq!(hit.alias, "J. Allen");
    }

    #[tokio::test]
    async fn test_quarantine_lifecycle() {
        let index = MemoryIndex::new();
        let record = NewUnresolved {
            raw_name: "Jon Smith".to_string(),
            position: None,
            team: None,
            source: "csv".to_string(),
            suggestions: Vec::new(),
        };

        let id = index.insert_unresolved(&record).await.unwrap();
        assert_eq!(index.list(QuarantineStatus::Open, 10).await.unwrap().len(), 1);

        assert!(index.update_status(id, QuarantineStatus::Resolved, Some(5)).await.unwrap());
        // already closed: second transition reports false
        assert!(!index.update_status(id, QuarantineStatus::Ignored, None).await.unwrap());

        let entity = index.get(id).await.unwrap().unwrap();
        assert_eq!(entity.status, QuarantineStatus::Resolved);
        assert_eq!(entity.resolved_identity_id, Some(5));
    }
}
