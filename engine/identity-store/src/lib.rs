//! Postgres-backed stores for the identity resolution engine
//!
//! Implements the engine's capability traits (`IdentityLookup`,
//! `AliasStore`, `QuarantineStore`) over Postgres, and owns the schema
//! migrations for the identity, alias, and unresolved-entity tables.
//! Every database error is mapped into the engine's `StoreError` so the
//! resolver never sees a `sqlx` type.

mod pg;

pub use pg::PgStore;
