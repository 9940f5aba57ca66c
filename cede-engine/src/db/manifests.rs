//! Manifest repository
//!
//! The store talks to persistence through `ManifestRepository`, so tests
//! and embedders can swap the backing without touching the lifecycle
//! logic. The shipped implementation is SQLite via sqlx.

use cede_common::{Error, Result};
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

use crate::models::{ClipAnalysis, ClipContext, EditManifest, EditStatus, SourceClip, Variation};

/// Persistence seam for edit manifests
#[async_trait::async_trait]
pub trait ManifestRepository: Send + Sync {
    /// Insert a new manifest; fails `AlreadyExists` on a duplicate job id
    async fn insert(&self, manifest: &EditManifest) -> Result<()>;

    /// Load a manifest by job id
    async fn load(&self, job_id: &str) -> Result<Option<EditManifest>>;

    /// Persist the current state of an existing manifest
    async fn save(&self, manifest: &EditManifest) -> Result<()>;

    /// All known job ids, in creation order
    async fn list_ids(&self) -> Result<Vec<String>>;
}

/// SQLite-backed manifest repository
pub struct SqliteManifestRepository {
    pool: SqlitePool,
}

impl SqliteManifestRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ManifestRepository for SqliteManifestRepository {
    async fn insert(&self, manifest: &EditManifest) -> Result<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO manifests (
                job_id, source_path, source_duration, context, analysis,
                variations, selected, status, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&manifest.job_id)
        .bind(manifest.source.path.to_string_lossy().into_owned())
        .bind(manifest.source.duration)
        .bind(to_json(&manifest.context)?)
        .bind(manifest.analysis.as_ref().map(to_json).transpose()?)
        .bind(to_json(&manifest.variations)?)
        .bind(manifest.selected.as_deref())
        .bind(manifest.status.as_str())
        .bind(manifest.created_at.to_rfc3339())
        .bind(manifest.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(dbe))
                if matches!(dbe.kind(), sqlx::error::ErrorKind::UniqueViolation) =>
            {
                Err(Error::AlreadyExists(format!(
                    "manifest for job {}",
                    manifest.job_id
                )))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn load(&self, job_id: &str) -> Result<Option<EditManifest>> {
        let row = sqlx::query("SELECT * FROM manifests WHERE job_id = ?")
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(row_to_manifest).transpose()
    }

    async fn save(&self, manifest: &EditManifest) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE manifests SET
                analysis = ?,
                variations = ?,
                selected = ?,
                status = ?,
                updated_at = ?
            WHERE job_id = ?
            "#,
        )
        .bind(manifest.analysis.as_ref().map(to_json).transpose()?)
        .bind(to_json(&manifest.variations)?)
        .bind(manifest.selected.as_deref())
        .bind(manifest.status.as_str())
        .bind(manifest.updated_at.to_rfc3339())
        .bind(&manifest.job_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("manifest for job {}", manifest.job_id)));
        }
        Ok(())
    }

    async fn list_ids(&self) -> Result<Vec<String>> {
        let rows = sqlx::query("SELECT job_id FROM manifests ORDER BY created_at, job_id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(|r| r.get::<String, _>("job_id")).collect())
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| Error::Internal(format!("manifest encode: {}", e)))
}

fn from_json<T: serde::de::DeserializeOwned>(value: &str) -> Result<T> {
    serde_json::from_str(value).map_err(|e| Error::Internal(format!("manifest decode: {}", e)))
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Internal(format!("manifest timestamp: {}", e)))
}

fn row_to_manifest(row: sqlx::sqlite::SqliteRow) -> Result<EditManifest> {
    let status_str: String = row.get("status");
    let status = EditStatus::parse(&status_str)
        .ok_or_else(|| Error::Internal(format!("unknown manifest status {:?}", status_str)))?;

    let context: ClipContext = from_json(&row.get::<String, _>("context"))?;
    let variations: Vec<Variation> = from_json(&row.get::<String, _>("variations"))?;
    let analysis: Option<ClipAnalysis> = row
        .get::<Option<String>, _>("analysis")
        .as_deref()
        .map(from_json)
        .transpose()?;

    Ok(EditManifest {
        job_id: row.get("job_id"),
        source: SourceClip {
            path: row.get::<String, _>("source_path").into(),
            duration: row.get("source_duration"),
        },
        context,
        analysis,
        variations,
        selected: row.get("selected"),
        status,
        created_at: parse_timestamp(&row.get::<String, _>("created_at"))?,
        updated_at: parse_timestamp(&row.get::<String, _>("updated_at"))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_memory_pool;

    fn manifest(job_id: &str) -> EditManifest {
        EditManifest::new(
            job_id,
            SourceClip::new("/clips/take.mp4", 8.0),
            ClipContext::default(),
        )
    }

    #[tokio::test]
    async fn test_insert_load_roundtrip() {
        let repo = SqliteManifestRepository::new(init_memory_pool().await.unwrap());
        let m = manifest("job-rt");
        repo.insert(&m).await.unwrap();
        let loaded = repo.load("job-rt").await.unwrap().unwrap();
        assert_eq!(loaded.job_id, m.job_id);
        assert_eq!(loaded.source, m.source);
        assert_eq!(loaded.status, EditStatus::Pending);
        assert!(loaded.variations.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_insert_already_exists() {
        let repo = SqliteManifestRepository::new(init_memory_pool().await.unwrap());
        repo.insert(&manifest("job-dup")).await.unwrap();
        let err = repo.insert(&manifest("job-dup")).await.unwrap_err();
        assert!(matches!(err, Error::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_load_unknown_is_none() {
        let repo = SqliteManifestRepository::new(init_memory_pool().await.unwrap());
        assert!(repo.load("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_unknown_is_not_found() {
        let repo = SqliteManifestRepository::new(init_memory_pool().await.unwrap());
        let err = repo.save(&manifest("ghost")).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_save_persists_mutation() {
        let repo = SqliteManifestRepository::new(init_memory_pool().await.unwrap());
        let mut m = manifest("job-mut");
        repo.insert(&m).await.unwrap();

        m.status = EditStatus::InProgress;
        m.touch();
        repo.save(&m).await.unwrap();

        let loaded = repo.load("job-mut").await.unwrap().unwrap();
        assert_eq!(loaded.status, EditStatus::InProgress);
    }

    #[tokio::test]
    async fn test_list_ids() {
        let repo = SqliteManifestRepository::new(init_memory_pool().await.unwrap());
        repo.insert(&manifest("job-a")).await.unwrap();
        repo.insert(&manifest("job-b")).await.unwrap();
        let ids = repo.list_ids().await.unwrap();
        assert_eq!(ids, vec!["job-a", "job-b"]);
    }
}
