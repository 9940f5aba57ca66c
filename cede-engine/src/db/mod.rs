//! Manifest persistence
//!
//! One SQLite record per job id holding the full edit manifest; analysis,
//! context, and variation history are JSON columns.

pub mod manifests;

pub use manifests::{ManifestRepository, SqliteManifestRepository};

use cede_common::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use tracing::info;

/// Manifest table schema
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS manifests (
    job_id TEXT PRIMARY KEY,
    source_path TEXT NOT NULL,
    source_duration REAL NOT NULL,
    context TEXT NOT NULL,
    analysis TEXT,
    variations TEXT NOT NULL,
    selected TEXT,
    status TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
"#;

/// Open (creating if missing) the manifest database and ensure the schema
pub async fn init_pool(path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    sqlx::query(SCHEMA).execute(&pool).await?;
    info!(path = %path.display(), "manifest database ready");

    Ok(pool)
}

/// In-memory pool for tests
pub async fn init_memory_pool() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    sqlx::query(SCHEMA).execute(&pool).await?;
    Ok(pool)
}
