//! Core types for the identity resolution engine

use crate::error::ResolveError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a canonical player identity
pub type IdentityId = i64;

/// Identifier of a quarantined (unresolved) input record
pub type QuarantineId = i64;

/// Lifecycle status of a player identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerStatus {
    Active,
    Rookie,
    PracticeSquad,
    InjuredReserve,
    FreeAgent,
    Retired,
    Unknown,
}

impl PlayerStatus {
    /// Statuses eligible for the fuzzy-tier candidate pool
    pub const MATCHABLE: [PlayerStatus; 5] = [
        PlayerStatus::Active,
        PlayerStatus::Rookie,
        PlayerStatus::PracticeSquad,
        PlayerStatus::InjuredReserve,
        PlayerStatus::FreeAgent,
    ];

    pub fn is_matchable(self) -> bool {
        Self::MATCHABLE.contains(&self)
    }

    /// Parse the heterogeneous status strings real feeds emit.
    ///
    /// Unrecognized input maps to `Unknown` rather than failing, since
    /// upstream feeds are not consistent about status vocabulary.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "active" => PlayerStatus::Active,
            "rookie" => PlayerStatus::Rookie,
            "ps" | "practice squad" | "practice_squad" => PlayerStatus::PracticeSquad,
            "ir" | "injured reserve" | "injured_reserve" => PlayerStatus::InjuredReserve,
            "fa" | "free agent" | "free_agent" => PlayerStatus::FreeAgent,
            "retired" => PlayerStatus::Retired,
            _ => PlayerStatus::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PlayerStatus::Active => "active",
            PlayerStatus::Rookie => "rookie",
            PlayerStatus::PracticeSquad => "practice_squad",
            PlayerStatus::InjuredReserve => "injured_reserve",
            PlayerStatus::FreeAgent => "free_agent",
            PlayerStatus::Retired => "retired",
            PlayerStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for PlayerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A canonical player identity, owned by the external identity store.
///
/// The resolution engine only reads identities; the sole write path touching
/// an identity is alias attachment through the alias store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub id: IdentityId,

    /// Display name (e.g., "Lamar Jackson")
    pub display_name: String,

    /// Position (e.g., "QB", "RB", "WR", "TE")
    pub position: String,

    /// Team abbreviation (e.g., "BAL"); players between teams have none
    pub team: Option<String>,

    pub status: PlayerStatus,
}

/// An alternate text rendering of an identity's name, keyed for lookup.
///
/// Normalized keys are not globally unique across identities (common
/// surnames reduce to the same key), so alias hits still pass position
/// disambiguation before acceptance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alias {
    pub identity_id: IdentityId,
    pub alias: String,
    pub normalized_key: String,
    pub source: String,
}

/// Status of a quarantined input: `open -> resolved` or `open -> ignored`,
/// both terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuarantineStatus {
    Open,
    Resolved,
    Ignored,
}

impl QuarantineStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            QuarantineStatus::Open => "open",
            QuarantineStatus::Resolved => "resolved",
            QuarantineStatus::Ignored => "ignored",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "open" => Some(QuarantineStatus::Open),
            "resolved" => Some(QuarantineStatus::Resolved),
            "ignored" => Some(QuarantineStatus::Ignored),
            _ => None,
        }
    }
}

impl fmt::Display for QuarantineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A ranked candidate carried on quarantine records and failure results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    pub identity_id: IdentityId,
    pub display_name: String,
    pub position: String,
    pub team: Option<String>,
    pub score: u32,
}

/// An input the engine could not confidently resolve, held for manual
/// adjudication
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnresolvedEntity {
    pub id: QuarantineId,
    pub raw_name: String,
    pub position: Option<String>,
    pub team: Option<String>,
    pub source: String,
    pub suggestions: Vec<Suggestion>,
    pub status: QuarantineStatus,
    pub resolved_identity_id: Option<IdentityId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for a new quarantine record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUnresolved {
    pub raw_name: String,
    pub position: Option<String>,
    pub team: Option<String>,
    pub source: String,
    pub suggestions: Vec<Suggestion>,
}

/// Which resolution tier produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchTier {
    Exact,
    Alias,
    Fuzzy,
}

/// Details of an accepted match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchInfo {
    pub identity_id: IdentityId,
    pub display_name: String,
    pub match_type: MatchTier,
    pub score: u32,
}

/// Outcome of a single resolution call, exhaustively matchable by tier.
///
/// Collapses onto the flat [`ResolveResult`] contract for callers that only
/// care about success/failure fields.
#[derive(Debug, Clone)]
pub enum Resolution {
    Exact { identity: Identity, score: u32 },
    Alias { identity: Identity, alias: String, score: u32 },
    Fuzzy { identity: Identity, score: u32 },
    Ambiguous { suggestions: Vec<Suggestion>, quarantined: bool, quarantine_id: Option<QuarantineId> },
    NoMatch { quarantined: bool, quarantine_id: Option<QuarantineId> },
}

/// Flat per-input result returned to callers and ingestion jobs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveResult {
    pub success: bool,

    /// Resolved identity id, present only on success
    pub player_id: Option<IdentityId>,

    /// Match details, present only on success
    #[serde(rename = "match")]
    pub matched: Option<MatchInfo>,

    /// Ranked candidates, present on ambiguous failures
    pub suggestions: Vec<Suggestion>,

    /// Whether a quarantine record was written for this input
    pub quarantined: bool,

    pub quarantine_id: Option<QuarantineId>,

    pub error: Option<String>,
}

impl ResolveResult {
    /// Failure result for input the normalizer reduced to an empty key.
    /// Empty input is never quarantined.
    pub fn invalid_input() -> Self {
        Self {
            success: false,
            player_id: None,
            matched: None,
            suggestions: Vec::new(),
            quarantined: false,
            quarantine_id: None,
            error: Some(ResolveError::InvalidInput.to_string()),
        }
    }
}

impl From<Resolution> for ResolveResult {
    fn from(resolution: Resolution) -> Self {
        let accepted = |identity: Identity, match_type: MatchTier, score: u32| Self {
            success: true,
            player_id: Some(identity.id),
            matched: Some(MatchInfo {
                identity_id: identity.id,
                display_name: identity.display_name,
                match_type,
                score,
            }),
            suggestions: Vec::new(),
            quarantined: false,
            quarantine_id: None,
            error: None,
        };

        match resolution {
            Resolution::Exact { identity, score } => accepted(identity, MatchTier::Exact, score),
            Resolution::Alias { identity, score, .. } => accepted(identity, MatchTier::Alias, score),
            Resolution::Fuzzy { identity, score } => accepted(identity, MatchTier::Fuzzy, score),
            Resolution::Ambiguous { suggestions, quarantined, quarantine_id } => Self {
                success: false,
                player_id: None,
                matched: None,
                suggestions,
                quarantined,
                quarantine_id,
                error: Some(ResolveError::AmbiguousMatch.to_string()),
            },
            Resolution::NoMatch { quarantined, quarantine_id } => Self {
                success: false,
                player_id: None,
                matched: None,
                suggestions: Vec::new(),
                quarantined,
                quarantine_id,
                error: Some(ResolveError::NoMatch.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parsing() {
        assert_eq!(PlayerStatus::parse("Active"), PlayerStatus::Active);
        assert_eq!(PlayerStatus::parse("IR"), PlayerStatus::InjuredReserve);
        assert_eq!(PlayerStatus::parse("Injured Reserve"), PlayerStatus::InjuredReserve);
        assert_eq!(PlayerStatus::parse("PS"), PlayerStatus::PracticeSquad);
        assert_eq!(PlayerStatus::parse("Free Agent"), PlayerStatus::FreeAgent);
        assert_eq!(PlayerStatus::parse("???"), PlayerStatus::Unknown);
    }

    #[test]
    fn test_matchable_statuses_exclude_retired_and_unknown() {
        assert!(PlayerStatus::Active.is_matchable());
        assert!(PlayerStatus::InjuredReserve.is_matchable());
        assert!(!PlayerStatus::Retired.is_matchable());
        assert!(!PlayerStatus::Unknown.is_matchable());
    }

    #[test]
    fn test_resolution_collapses_onto_result() {
        let identity = Identity {
            id: 7,
            display_name: "Josh Allen".to_string(),
            position: "QB".to_string(),
            team: Some("BUF".to_string()),
            status: PlayerStatus::Active,
        };

        let result = ResolveResult::from(Resolution::Alias {
            identity,
            alias: "J. Allen".to_string(),
            score: 95,
        });

        assert!(result.success);
        assert_eq!(result.player_id, Some(7));
        let matched = result.matched.unwrap();
        assert_eq!(matched.match_type, MatchTier::Alias);
        assert_eq!(matched.score, 95);
        assert!(result.error.is_none());
    }

    #[test]
    fn test_no_match_result_carries_quarantine_id() {
        let result =
            ResolveResult::from(Resolution::NoMatch { quarantined: true, quarantine_id: Some(42) });

        assert!(!result.success);
        assert!(result.suggestions.is_empty());
        assert_eq!(result.quarantine_id, Some(42));
        assert_eq!(result.error.as_deref(), Some("No match found"));
    }
}
