//! Postgres store implementation

use async_trait::async_trait;
use identity_resolver::{
    normalize, AliasHit, AliasStore, Identity, IdentityId, IdentityLookup, NewUnresolved,
    PlayerStatus, QuarantineId, QuarantineStatus, QuarantineStore, StoreError, StoreResult,
    Suggestion, UnresolvedEntity,
};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use std::time::Duration;
use tracing::info;

/// Postgres-backed identity, alias, and quarantine store
pub struct PgStore {
    pool: PgPool,
}

fn db_err(e: sqlx::Error) -> StoreError {
    match e {
        sqlx::Error::PoolTimedOut => StoreError::Timeout("connection pool".to_string()),
        other => StoreError::Unavailable(other.to_string()),
    }
}

fn identity_from_row(row: &PgRow) -> Result<Identity, sqlx::Error> {
    let status: String = row.try_get("status")?;
    Ok(Identity {
        id: row.try_get("id")?,
        display_name: row.try_get("display_name")?,
        position: row.try_get("position")?,
        team: row.try_get("team")?,
        status: PlayerStatus::parse(&status),
    })
}

fn unresolved_from_row(row: &PgRow) -> Result<UnresolvedEntity, sqlx::Error> {
    let status: String = row.try_get("status")?;
    let suggestions: Json<Vec<Suggestion>> = row.try_get("suggestions")?;
    Ok(UnresolvedEntity {
        id: row.try_get("id")?,
        raw_name: row.try_get("raw_name")?,
        position: row.try_get("position")?,
        team: row.try_get("team")?,
        source: row.try_get("source")?,
        suggestions: suggestions.0,
        status: QuarantineStatus::parse(&status).unwrap_or(QuarantineStatus::Open),
        resolved_identity_id: row.try_get("resolved_identity_id")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

impl PgStore {
    /// Connect to Postgres and run the schema migrations
    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await
            .map_err(db_err)?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        info!("connected to identity store and applied migrations");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Insert a canonical identity, indexing it under its normalized
    /// display-name key. Used by ingestion jobs; the resolution engine
    /// itself never writes identities.
    pub async fn insert_identity(
        &self,
        display_name: &str,
        position: &str,
        team: Option<&str>,
        status: PlayerStatus,
    ) -> StoreResult<IdentityId> {
        let key = normalize(display_name);
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO identities (display_name, normalized_key, "position", team, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(display_name)
        .bind(&key)
        .bind(position)
        .bind(team)
        .bind(status.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(id)
    }
}

#[async_trait]
impl IdentityLookup for PgStore {
    async fn find_by_normalized_key(
        &self,
        key: &str,
        position: Option<&str>,
    ) -> StoreResult<Option<Identity>> {
        let row = match position {
            Some(pos) => {
                sqlx::query(
                    r#"
                    SELECT id, display_name, "position", team, status
                    FROM identities
                    WHERE normalized_key = $1 AND UPPER("position") = UPPER($2)
                    ORDER BY id
                    LIMIT 1
                    "#,
                )
                .bind(key)
                .bind(pos)
                .fetch_optional(&self.pool)
                .await
            }
            None => {
                sqlx::query(
                    r#"
                    SELECT id, display_name, "position", team, status
                    FROM identities
                    WHERE normalized_key = $1
                    ORDER BY id
                    LIMIT 1
                    "#,
                )
                .bind(key)
                .fetch_optional(&self.pool)
                .await
            }
        }
        .map_err(db_err)?;

        row.as_ref().map(identity_from_row).transpose().map_err(db_err)
    }

    async fn list_candidates(
        &self,
        position: Option<&str>,
        statuses: &[PlayerStatus],
    ) -> StoreResult<Vec<Identity>> {
        let status_strs: Vec<String> =
            statuses.iter().map(|s| s.as_str().to_string()).collect();

        let rows = match position {
            Some(pos) => {
                sqlx::query(
                    r#"
                    SELECT id, display_name, "position", team, status
                    FROM identities
                    WHERE status = ANY($1) AND UPPER("position") = UPPER($2)
                    ORDER BY id
                    "#,
                )
                .bind(&status_strs)
                .bind(pos)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(
                    r#"
                    SELECT id, display_name, "position", team, status
                    FROM identities
                    WHERE status = ANY($1)
                    ORDER BY id
                    "#,
                )
                .bind(&status_strs)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(db_err)?;

        rows.iter().map(identity_from_row).collect::<Result<_, _>>().map_err(db_err)
    }
}

#[async_trait]
impl AliasStore for PgStore {
    async fn find_by_normalized_alias(&self, key: &str) -> StoreResult<Option<AliasHit>> {
        let row = sqlx::query(
            r#"
            SELECT i.id, i.display_name, i."position", i.team, i.status, a.alias
            FROM player_aliases a
            JOIN identities i ON i.id = a.identity_id
            WHERE a.normalized_key = $1
            ORDER BY a.id
            LIMIT 1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        match row {
            Some(row) => {
                let identity = identity_from_row(&row).map_err(db_err)?;
                let alias: String = row.try_get("alias").map_err(db_err)?;
                Ok(Some(AliasHit { identity, alias }))
            }
            None => Ok(None),
        }
    }

    async fn insert_alias(
        &self,
        identity_id: IdentityId,
        alias_text: &str,
        normalized_key: &str,
        source: &str,
    ) -> StoreResult<bool> {
        // duplicate (identity, key) pairs from concurrent ingestion are a
        // tolerated no-op; rows_affected distinguishes them from new rows
        let result = sqlx::query(
            r#"
            INSERT INTO player_aliases (identity_id, alias, normalized_key, source)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (identity_id, normalized_key) DO NOTHING
            "#,
        )
        .bind(identity_id)
        .bind(alias_text)
        .bind(normalized_key)
        .bind(source)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl QuarantineStore for PgStore {
    async fn insert_unresolved(&self, record: &NewUnresolved) -> StoreResult<QuarantineId> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO unresolved_entities (raw_name, "position", team, source, suggestions)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&record.raw_name)
        .bind(&record.position)
        .bind(&record.team)
        .bind(&record.source)
        .bind(Json(&record.suggestions))
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(id)
    }

    async fn get(&self, id: QuarantineId) -> StoreResult<Option<UnresolvedEntity>> {
        let row = sqlx::query(
            r#"
            SELECT id, raw_name, "position", team, source, suggestions, status,
                   resolved_identity_id, created_at, updated_at
            FROM unresolved_entities
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.as_ref().map(unresolved_from_row).transpose().map_err(db_err)
    }

    async fn update_status(
        &self,
        id: QuarantineId,
        status: QuarantineStatus,
        resolved_identity_id: Option<IdentityId>,
    ) -> StoreResult<bool> {
        // only open records transition; repeat administrative actions are
        // visible no-ops
        let result = sqlx::query(
            r#"
            UPDATE unresolved_entities
            SET status = $2, resolved_identity_id = $3, updated_at = NOW()
            WHERE id = $1 AND status = 'open'
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .bind(resolved_identity_id)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(
        &self,
        status: QuarantineStatus,
        limit: usize,
    ) -> StoreResult<Vec<UnresolvedEntity>> {
        let rows = sqlx::query(
            r#"
            SELECT id, raw_name, "position", team, source, suggestions, status,
                   resolved_identity_id, created_at, updated_at
            FROM unresolved_entities
            WHERE status = $1
            ORDER BY id
            LIMIT $2
            "#,
        )
        .bind(status.as_str())
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.iter().map(unresolved_from_row).collect::<Result<_, _>>().map_err(db_err)
    }
}
