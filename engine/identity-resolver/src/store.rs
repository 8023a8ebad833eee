//! Capability interfaces the resolution engine consumes.
//!
//! The engine does not own storage: the identity, alias, and quarantine
//! tables belong to external collaborators. These traits are the typed seam
//! between the engine and whatever backs them (Postgres in production, the
//! in-memory index in tests and tools).

use crate::error::StoreResult;
use crate::types::{
    Identity, IdentityId, NewUnresolved, PlayerStatus, QuarantineId, QuarantineStatus,
    UnresolvedEntity,
};
use async_trait::async_trait;

pub mod memory;

/// An alias-table hit: the owning identity plus the alias text that matched
#[derive(Debug, Clone)]
pub struct AliasHit {
    pub identity: Identity,
    pub alias: String,
}

/// Read access to canonical identities
#[async_trait]
pub trait IdentityLookup: Send + Sync {
    /// Look up an identity whose canonical search key equals `key`,
    /// optionally restricted to a position (compared case-insensitively)
    async fn find_by_normalized_key(
        &self,
        key: &str,
        position: Option<&str>,
    ) -> StoreResult<Option<Identity>>;

    /// List the candidate pool for fuzzy matching, restricted to the given
    /// lifecycle statuses and, if supplied, an exact position
    async fn list_candidates(
        &self,
        position: Option<&str>,
        statuses: &[PlayerStatus],
    ) -> StoreResult<Vec<Identity>>;
}

/// Read/write access to the alias table
#[async_trait]
pub trait AliasStore: Send + Sync {
    async fn find_by_normalized_alias(&self, key: &str) -> StoreResult<Option<AliasHit>>;

    /// Insert an alias for an identity. Returns true when a new row was
    /// written; duplicate (identity, key) pairs are a tolerated no-op
    /// reporting false, not an error.
    async fn insert_alias(
        &self,
        identity_id: IdentityId,
        alias_text: &str,
        normalized_key: &str,
        source: &str,
    ) -> StoreResult<bool>;
}

/// Read/write access to the unresolved-entity table
#[async_trait]
pub trait QuarantineStore: Send + Sync {
    async fn insert_unresolved(&self, record: &NewUnresolved) -> StoreResult<QuarantineId>;

    async fn get(&self, id: QuarantineId) -> StoreResult<Option<UnresolvedEntity>>;

    /// Transition a record out of `open`. Returns false when the record does
    /// not exist or is already closed, so repeat administrative actions are
    /// visible no-ops.
    async fn update_status(
        &self,
        id: QuarantineId,
        status: QuarantineStatus,
        resolved_identity_id: Option<IdentityId>,
    ) -> StoreResult<bool>;

    async fn list(
        &self,
        status: QuarantineStatus,
        limit: usize,
    ) -> StoreResult<Vec<UnresolvedEntity>>;
}
