//! Player identity resolution engine
//!
//! Maps free-text player names arriving from heterogeneous sources (CSV
//! exports, HTML-scraped tables, third-party feeds, user input) to exactly
//! one canonical identity in the system of record, or quarantines them for
//! manual adjudication.
//!
//! Resolution runs three ordered tiers: exact normalized-key lookup, alias
//! table lookup, then scored fuzzy search over a filtered candidate pool.
//! Storage is behind the capability traits in [`store`]; production uses
//! the Postgres implementations in the `identity-store` crate, tests and
//! small tools use [`store::memory::MemoryIndex`].

pub mod alias;
pub mod batch;
pub mod cache;
pub mod config;
pub mod error;
pub mod matcher;
pub mod normalize;
pub mod quarantine;
pub mod scoring;
pub mod service;
pub mod store;
pub mod types;

pub use alias::generate_aliases;
pub use batch::{BatchInput, BatchOptions};
pub use cache::{CandidatePoolCache, Clock, ManualClock, SystemClock};
pub use config::ResolverConfig;
pub use error::{ResolveError, StoreError, StoreResult};
pub use matcher::{PlayerResolver, ResolveRequest};
pub use normalize::normalize;
pub use quarantine::QuarantineManager;
pub use scoring::{score, token_overlap};
pub use service::ResolutionService;
pub use store::{AliasHit, AliasStore, IdentityLookup, QuarantineStore};
pub use types::{
    Alias, Identity, IdentityId, MatchInfo, MatchTier, NewUnresolved, PlayerStatus, QuarantineId,
    QuarantineStatus, Resolution, ResolveResult, Suggestion, UnresolvedEntity,
};
