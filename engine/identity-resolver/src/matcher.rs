//! Three-tier resolution
//!
//! `PlayerResolver` drives a single resolution call through the ordered
//! tiers: exact normalized-key lookup, alias-table lookup, then scored
//! fuzzy search over the filtered candidate pool. The first tier to
//! produce a confident unique match wins; anything else lands in the
//! ambiguous or no-match branch, optionally writing a quarantine record.
//!
//! Store failures on reads degrade to the next tier (or to no-match)
//! instead of propagating, so a flaky dependency never takes resolution
//! down with it.

use crate::config::ResolverConfig;
use crate::normalize::normalize;
use crate::scoring::{score, token_overlap};
use crate::store::{AliasStore, IdentityLookup, QuarantineStore};
use crate::types::{
    Identity, IdentityId, NewUnresolved, PlayerStatus, QuarantineId, Resolution, ResolveResult,
    Suggestion,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Exact-tier accept score
const EXACT_SCORE: u32 = 100;
/// Alias-tier accept score
const ALIAS_SCORE: u32 = 95;

/// A single resolution request.
///
/// Threshold/limit/quarantine fields override the resolver's configured
/// defaults when set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolveRequest {
    pub name: String,
    pub position: Option<String>,
    pub team: Option<String>,
    pub source: Option<String>,
    pub fuzzy_threshold: Option<f64>,
    pub max_suggestions: Option<usize>,
    pub auto_quarantine: Option<bool>,
}

impl ResolveRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    pub fn with_position(mut self, position: impl Into<String>) -> Self {
        self.position = Some(position.into());
        self
    }

    pub fn with_team(mut self, team: impl Into<String>) -> Self {
        self.team = Some(team.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// The resolution engine's matcher: three ordered tiers over the
/// capability stores
pub struct PlayerResolver {
    identities: Arc<dyn IdentityLookup>,
    aliases: Arc<dyn AliasStore>,
    quarantine: Arc<dyn QuarantineStore>,
    config: ResolverConfig,
}

impl PlayerResolver {
    pub fn new(
        identities: Arc<dyn IdentityLookup>,
        aliases: Arc<dyn AliasStore>,
        quarantine: Arc<dyn QuarantineStore>,
        config: ResolverConfig,
    ) -> Self {
        Self { identities, aliases, quarantine, config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve a single input to at most one canonical identity.
    ///
    /// Never returns an error: every failure mode is expressed through the
    /// result's `success`/`error` fields.
    pub async fn resolve(&self, request: &ResolveRequest) -> ResolveResult {
        let key = normalize(&request.name);
        if key.is_empty() {
            debug!(name = %request.name, "input normalized to empty key");
            return ResolveResult::invalid_input();
        }

        let resolution = self.run_tiers(request, &key).await;
        ResolveResult::from(resolution)
    }

    async fn run_tiers(&self, request: &ResolveRequest, key: &str) -> Resolution {
        let position = request.position.as_deref();

        // Tier 1: exact normalized-key lookup
        match self.identities.find_by_normalized_key(key, position).await {
            Ok(Some(identity)) => {
                debug!(name = %request.name, identity_id = identity.id, "exact match");
                return Resolution::Exact { identity, score: EXACT_SCORE };
            }
            Ok(None) => {}
            Err(e) => warn!(name = %request.name, error = %e, "exact tier degraded"),
        }

        // Tier 2: alias-table lookup. Shared normalized keys make position
        // disambiguation mandatory before accepting an alias hit.
        match self.aliases.find_by_normalized_alias(key).await {
            Ok(Some(hit)) => {
                let position_ok = match position {
                    Some(pos) => hit.identity.position.eq_ignore_ascii_case(pos),
                    None => true,
                };
                if position_ok {
                    debug!(name = %request.name, identity_id = hit.identity.id, "alias match");
                    return Resolution::Alias {
                        identity: hit.identity,
                        alias: hit.alias,
                        score: ALIAS_SCORE,
                    };
                }
            }
            Ok(None) => {}
            Err(e) => warn!(name = %request.name, error = %e, "alias tier degraded"),
        }

        // Tier 3: scored fuzzy search
        self.fuzzy_tier(request).await
    }

    async fn fuzzy_tier(&self, request: &ResolveRequest) -> Resolution {
        let threshold = request.fuzzy_threshold.unwrap_or(self.config.fuzzy_threshold);
        let limit = request.max_suggestions.unwrap_or(self.config.max_suggestions);
        let auto_quarantine = request.auto_quarantine.unwrap_or(self.config.auto_quarantine);
        let position = request.position.as_deref();

        let pool = match self.identities.list_candidates(position, &PlayerStatus::MATCHABLE).await
        {
            Ok(pool) => pool,
            Err(e) => {
                warn!(name = %request.name, error = %e, "fuzzy tier degraded to empty pool");
                Vec::new()
            }
        };

        let mut scored: Vec<(Identity, u32)> = pool
            .into_iter()
            .filter_map(|candidate| {
                let overlap = token_overlap(&request.name, &candidate.display_name);
                let candidate_score = score(
                    &request.name,
                    &candidate.display_name,
                    Some(&candidate.position),
                    candidate.team.as_deref(),
                    position,
                    request.team.as_deref(),
                );
                if overlap >= threshold || candidate_score >= self.config.fuzzy_floor {
                    Some((candidate, candidate_score))
                } else {
                    None
                }
            })
            .collect();

        scored.sort_by(|(a, score_a), (b, score_b)| {
            score_b.cmp(score_a).then_with(|| a.display_name.cmp(&b.display_name))
        });
        scored.truncate(limit);

        if scored.len() == 1 && scored[0].1 >= self.config.fuzzy_auto_accept {
            let (identity, candidate_score) = scored.remove(0);
            debug!(
                name = %request.name,
                identity_id = identity.id,
                score = candidate_score,
                "fuzzy auto-accept"
            );
            return Resolution::Fuzzy { identity, score: candidate_score };
        }

        let suggestions: Vec<Suggestion> = scored
            .into_iter()
            .map(|(identity, candidate_score)| Suggestion {
                identity_id: identity.id,
                display_name: identity.display_name,
                position: identity.position,
                team: identity.team,
                score: candidate_score,
            })
            .collect();

        let (quarantined, quarantine_id) =
            self.maybe_quarantine(request, &suggestions, auto_quarantine).await;

        if suggestions.is_empty() {
            Resolution::NoMatch { quarantined, quarantine_id }
        } else {
            Resolution::Ambiguous { suggestions, quarantined, quarantine_id }
        }
    }

    /// Write the quarantine record for a failed resolution. A store failure
    /// here degrades to "not quarantined" so persistence problems never
    /// upgrade a resolution failure into a fatal error.
    async fn maybe_quarantine(
        &self,
        request: &ResolveRequest,
        suggestions: &[Suggestion],
        auto_quarantine: bool,
    ) -> (bool, Option<QuarantineId>) {
        if !auto_quarantine {
            return (false, None);
        }

        let record = NewUnresolved {
            raw_name: request.name.clone(),
            position: request.position.clone(),
            team: request.team.clone(),
            source: request.source.clone().unwrap_or_else(|| "unknown".to_string()),
            suggestions: suggestions.to_vec(),
        };

        match self.quarantine.insert_unresolved(&record).await {
            Ok(id) => {
                debug!(name = %request.name, quarantine_id = id, "quarantined unresolved input");
                (true, Some(id))
            }
            Err(e) => {
                warn!(name = %request.name, error = %e, "quarantine write failed");
                (false, None)
            }
        }
    }

    /// Attach a manually adjudicated alias to an identity. Returns false
    /// when the alias text normalizes to nothing or the identity already
    /// carries an alias with the same key.
    pub async fn add_manual_alias(
        &self,
        identity_id: IdentityId,
        alias_text: &str,
        source: &str,
    ) -> crate::error::StoreResult<bool> {
        let key = normalize(alias_text);
        if key.is_empty() {
            return Ok(false);
        }

        self.aliases.insert_alias(identity_id, alias_text, &key, source).await
    }
}
