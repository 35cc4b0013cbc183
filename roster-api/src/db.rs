//! Database Connection Pool Module
//!
//! PostgreSQL connection pooling using deadpool-postgres, plus the
//! [`AgentStore`] implementation backed by the `agents` table.

use crate::error::{ApiError, ApiResult};
use async_trait::async_trait;
use deadpool_postgres::{Config, ManagerConfig, Pool, PoolError, RecyclingMethod, Runtime};
use roster_core::{StorageError, StorageResult};
use roster_storage::{AgentRow, AgentStore};
use std::time::Duration;
use tokio_postgres::error::SqlState;
use tokio_postgres::{NoTls, Row};

// ============================================================================
// CONNECTION POOL CONFIGURATION
// ============================================================================

/// Database connection pool configuration.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// PostgreSQL host
    pub host: String,
    /// PostgreSQL port
    pub port: u16,
    /// Database name
    pub dbname: String,
    /// Database user
    pub user: String,
    /// Database password
    pub password: String,
    /// Maximum pool size
    pub max_size: usize,
    /// Connection wait timeout
    pub timeout: Duration,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            dbname: "roster".to_string(),
            user: "postgres".to_string(),
            password: "".to_string(),
            max_size: 16,
            timeout: Duration::from_secs(30),
        }
    }
}

impl DbConfig {
    /// Create a new database configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("ROSTER_DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: std::env::var("ROSTER_DB_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5432),
            dbname: std::env::var("ROSTER_DB_NAME").unwrap_or_else(|_| "roster".to_string()),
            user: std::env::var("ROSTER_DB_USER").unwrap_or_else(|_| "postgres".to_string()),
            password: std::env::var("ROSTER_DB_PASSWORD").unwrap_or_default(),
            max_size: std::env::var("ROSTER_DB_POOL_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(16),
            timeout: Duration::from_secs(
                std::env::var("ROSTER_DB_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
        }
    }

    /// Create a connection pool from this configuration.
    pub fn create_pool(&self) -> ApiResult<Pool> {
        let mut cfg = Config::new();
        cfg.host = Some(self.host.clone());
        cfg.port = Some(self.port);
        cfg.dbname = Some(self.dbname.clone());
        cfg.user = Some(self.user.clone());
        cfg.password = Some(self.password.clone());

        cfg.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });

        let mut pool_cfg = deadpool_postgres::PoolConfig::new(self.max_size);
        pool_cfg.timeouts.wait = Some(self.timeout);
        cfg.pool = Some(pool_cfg);

        let pool = cfg
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| ApiError::internal_error(format!("Failed to create pool: {}", e)))?;

        Ok(pool)
    }
}

// ============================================================================
// SCHEMA
// ============================================================================

/// Idempotent DDL for the `agents` table.
pub const AGENTS_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS agents (
    id                UUID PRIMARY KEY,
    source            TEXT NOT NULL,
    name              VARCHAR(50) NOT NULL,
    tags              TEXT NOT NULL DEFAULT '[]',
    icon_url          TEXT,
    description       VARCHAR(500) NOT NULL,
    category          TEXT NOT NULL,
    target_system_url TEXT NOT NULL,
    visibility_kind   TEXT NOT NULL,
    visibility_values TEXT NOT NULL DEFAULT '[]',
    creator           TEXT NOT NULL,
    created_at        TIMESTAMPTZ NOT NULL,
    CONSTRAINT agents_name_key UNIQUE (name)
)
"#;

const AGENT_COLUMNS: &str = "id, source, name, tags, icon_url, description, category, \
     target_system_url, visibility_kind, visibility_values, creator, created_at";

// ============================================================================
// DATABASE CLIENT WRAPPER
// ============================================================================

/// Database client that wraps a connection pool.
#[derive(Clone)]
pub struct DbClient {
    pool: Pool,
}

impl DbClient {
    /// Create a new database client with the given pool.
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Create a new database client from configuration.
    pub fn from_config(config: &DbConfig) -> ApiResult<Self> {
        let pool = config.create_pool()?;
        Ok(Self::new(pool))
    }

    /// Get the current pool size for observability.
    pub fn pool_size(&self) -> usize {
        self.pool.status().size
    }

    /// Get a connection from the pool.
    pub async fn get_conn(&self) -> ApiResult<deadpool_postgres::Object> {
        self.pool.get().await.map_err(ApiError::from)
    }

    /// Create the `agents` table if it does not exist.
    pub async fn migrate(&self) -> ApiResult<()> {
        let conn = self.get_conn().await?;
        conn.batch_execute(AGENTS_DDL).await?;
        tracing::info!("Agents schema ready");
        Ok(())
    }

    async fn storage_conn(&self) -> StorageResult<deadpool_postgres::Object> {
        self.pool.get().await.map_err(classify_pool_error)
    }
}

#[async_trait]
impl AgentStore for DbClient {
    async fn exists_by_name(&self, name: &str) -> StorageResult<bool> {
        let conn = self.storage_conn().await?;
        let row = conn
            .query_one(
                "SELECT EXISTS(SELECT 1 FROM agents WHERE name = $1)",
                &[&name],
            )
            .await
            .map_err(classify_db_error)?;
        Ok(row.get(0))
    }

    async fn save(&self, row: AgentRow) -> StorageResult<AgentRow> {
        let conn = self.storage_conn().await?;
        let sql = format!(
            "INSERT INTO agents ({AGENT_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING {AGENT_COLUMNS}"
        );
        let stored = conn
            .query_one(
                sql.as_str(),
                &[
                    &row.id,
                    &row.source,
                    &row.name,
                    &row.tags,
                    &row.icon_url,
                    &row.description,
                    &row.category,
                    &row.target_system_url,
                    &row.visibility_kind,
                    &row.visibility_values,
                    &row.creator,
                    &row.created_at,
                ],
            )
            .await
            .map_err(classify_db_error)?;
        agent_row_from_pg(&stored)
    }

    async fn ping(&self) -> StorageResult<()> {
        let conn = self.storage_conn().await?;
        conn.query_one("SELECT 1", &[])
            .await
            .map_err(classify_db_error)?;
        Ok(())
    }
}

fn agent_row_from_pg(row: &Row) -> StorageResult<AgentRow> {
    let backend = |e: tokio_postgres::Error| StorageError::Backend {
        reason: format!("unexpected agents row shape: {}", e),
    };
    Ok(AgentRow {
        id: row.try_get("id").map_err(backend)?,
        source: row.try_get("source").map_err(backend)?,
        name: row.try_get("name").map_err(backend)?,
        tags: row.try_get("tags").map_err(backend)?,
        icon_url: row.try_get("icon_url").map_err(backend)?,
        description: row.try_get("description").map_err(backend)?,
        category: row.try_get("category").map_err(backend)?,
        target_system_url: row.try_get("target_system_url").map_err(backend)?,
        visibility_kind: row.try_get("visibility_kind").map_err(backend)?,
        visibility_values: row.try_get("visibility_values").map_err(backend)?,
        creator: row.try_get("creator").map_err(backend)?,
        created_at: row.try_get("created_at").map_err(backend)?,
    })
}

// ============================================================================
// ERROR CLASSIFICATION
// ============================================================================

/// Classify a database error by SQLSTATE.
///
/// `23505` becomes [`StorageError::UniqueViolation`]; any other class 23
/// (integrity constraint) code becomes [`StorageError::ConstraintViolation`].
pub fn classify_db_error(err: tokio_postgres::Error) -> StorageError {
    let Some(db_err) = err.as_db_error() else {
        tracing::error!("Database error: {:?}", err);
        return StorageError::Backend {
            reason: err.to_string(),
        };
    };
    classify_sql_state(
        db_err.code(),
        db_err.constraint(),
        db_err.message(),
    )
}

fn classify_sql_state(code: &SqlState, constraint: Option<&str>, message: &str) -> StorageError {
    if *code == SqlState::UNIQUE_VIOLATION {
        return StorageError::UniqueViolation {
            constraint: constraint.unwrap_or("unknown").to_string(),
        };
    }
    if code.code().starts_with("23") {
        return StorageError::ConstraintViolation {
            constraint: constraint.map(str::to_string),
            reason: message.to_string(),
        };
    }
    StorageError::Backend {
        reason: format!("{}: {}", code.code(), message),
    }
}

fn classify_pool_error(err: PoolError) -> StorageError {
    tracing::error!("Connection pool error: {:?}", err);
    match err {
        PoolError::Closed | PoolError::Timeout(_) => StorageError::Unavailable {
            reason: err.to_string(),
        },
        PoolError::Backend(e) => classify_db_error(e),
        other => StorageError::Backend {
            reason: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_storage::AGENT_NAME_CONSTRAINT;

    #[test]
    fn test_default_config() {
        let config = DbConfig::default();
        assert_eq!(config.port, 5432);
        assert_eq!(config.dbname, "roster");
        assert_eq!(config.max_size, 16);
    }

    #[test]
    fn test_unique_violation_keeps_constraint_name() {
        let err = classify_sql_state(&SqlState::UNIQUE_VIOLATION, Some("agents_name_key"), "dup");
        assert_eq!(
            err,
            StorageError::UniqueViolation {
                constraint: "agents_name_key".to_string()
            }
        );
    }

    #[test]
    fn test_unnamed_unique_violation_is_not_the_name_constraint() {
        let err = classify_sql_state(&SqlState::UNIQUE_VIOLATION, None, "dup");
        assert!(matches!(
            err,
            StorageError::UniqueViolation { ref constraint } if constraint != AGENT_NAME_CONSTRAINT
        ));
    }

    #[test]
    fn test_other_integrity_codes_are_constraint_violations() {
        let err = classify_sql_state(&SqlState::NOT_NULL_VIOLATION, None, "null name");
        assert!(matches!(
            err,
            StorageError::ConstraintViolation { constraint: None, .. }
        ));

        let err = classify_sql_state(
            &SqlState::CHECK_VIOLATION,
            Some("agents_category_check"),
            "bad",
        );
        assert!(matches!(
            err,
            StorageError::ConstraintViolation { constraint: Some(c), .. } if c == "agents_category_check"
        ));
    }

    #[test]
    fn test_non_integrity_codes_are_backend_errors() {
        let err = classify_sql_state(&SqlState::UNDEFINED_TABLE, None, "no agents");
        assert!(matches!(err, StorageError::Backend { .. }));
    }

    #[test]
    fn test_ddl_names_unique_constraint() {
        assert!(AGENTS_DDL.contains(AGENT_NAME_CONSTRAINT));
        assert!(AGENTS_DDL.contains("VARCHAR(50)"));
        assert!(AGENTS_DDL.contains("VARCHAR(500)"));
    }

    #[tokio::test]
    async fn test_pool_creation_is_lazy() -> ApiResult<()> {
        // No connection is attempted until the first checkout.
        let client = DbClient::from_config(&DbConfig::default())?;
        assert_eq!(client.pool_size(), 0);
        Ok(())
    }
}
