//! Configuration for the resolution engine

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunables for the resolution engine.
///
/// Per-request overrides on `ResolveRequest` take precedence; these values
/// are the deployment-wide defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Minimum token overlap for a fuzzy candidate to enter the suggestion
    /// pool
    pub fuzzy_threshold: f64,

    /// Score at or above which a candidate enters the pool even below the
    /// overlap threshold
    pub fuzzy_floor: u32,

    /// Score a sole fuzzy candidate must reach to be auto-accepted
    pub fuzzy_auto_accept: u32,

    /// Maximum suggestions kept on ambiguous results and quarantine records
    pub max_suggestions: usize,

    /// Whether failed resolutions write a quarantine record by default
    pub auto_quarantine: bool,

    /// Bound on concurrent store calls during batch resolution
    pub batch_concurrency: usize,

    /// TTL for the fuzzy-tier candidate pool cache
    pub candidate_ttl: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: 0.7,
            fuzzy_floor: 70,
            fuzzy_auto_accept: 85,
            max_suggestions: 5,
            auto_quarantine: true,
            batch_concurrency: 8,
            candidate_ttl: Duration::from_secs(300), // 5 minutes
        }
    }
}

/// Read an env var, falling back to `default` when unset. A set but
/// malformed value is an error, never a silent fallback.
fn env_or<T>(var: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(var) {
        Ok(raw) => raw.parse().with_context(|| format!("invalid value for {var}: {raw:?}")),
        Err(_) => Ok(default),
    }
}

impl ResolverConfig {
    /// Create configuration from environment variables, falling back to
    /// defaults for anything unset
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            fuzzy_threshold: env_or("RESOLVER_FUZZY_THRESHOLD", defaults.fuzzy_threshold)?,
            fuzzy_floor: env_or("RESOLVER_FUZZY_FLOOR", defaults.fuzzy_floor)?,
            fuzzy_auto_accept: env_or("RESOLVER_FUZZY_AUTO_ACCEPT", defaults.fuzzy_auto_accept)?,
            max_suggestions: env_or("RESOLVER_MAX_SUGGESTIONS", defaults.max_suggestions)?,
            auto_quarantine: env_or("RESOLVER_AUTO_QUARANTINE", defaults.auto_quarantine)?,
            batch_concurrency: env_or("RESOLVER_BATCH_CONCURRENCY", defaults.batch_concurrency)?,
            candidate_ttl: Duration::from_secs(env_or(
                "RESOLVER_CANDIDATE_TTL_SECS",
                defaults.candidate_ttl.as_secs(),
            )?),
        })
    }
}
