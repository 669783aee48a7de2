//! PostgreSQL album store.

use async_trait::async_trait;
use sqlx::PgPool;

use famvault_core::error::{AppError, ErrorKind};
use famvault_core::result::AppResult;
use famvault_core::types::{AlbumId, FamilyId, FileId};
use famvault_entity::album::Album;
use famvault_entity::file::StoredFile;

use crate::traits::AlbumStore;

/// Album store backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgAlbumStore {
    pool: PgPool,
}

impl PgAlbumStore {
    /// Create a new album store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AlbumStore for PgAlbumStore {
    async fn insert(&self, album: &Album) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO albums (id, family_id, name, cover_file_id, created_by, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(album.id)
        .bind(album.family_id)
        .bind(&album.name)
        .bind(album.cover_file_id)
        .bind(album.created_by)
        .bind(album.created_at)
        .bind(album.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert album", e))?;
        Ok(())
    }

    async fn find_by_id(&self, id: AlbumId) -> AppResult<Option<Album>> {
        sqlx::query_as::<_, Album>("SELECT * FROM albums WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find album", e))
    }

    async fn list_by_family(&self, family_id: FamilyId) -> AppResult<Vec<Album>> {
        sqlx::query_as::<_, Album>("SELECT * FROM albums WHERE family_id = $1 ORDER BY name ASC")
            .bind(family_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list albums", e))
    }

    async fn rename(&self, id: AlbumId, new_name: &str) -> AppResult<Album> {
        sqlx::query_as::<_, Album>(
            "UPDATE albums SET name = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(new_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to rename album", e))?
        .ok_or_else(|| AppError::not_found(format!("Album {id} not found")))
    }

    async fn remove(&self, id: AlbumId) -> AppResult<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM album_files WHERE album_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM albums WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn add_file(&self, album_id: AlbumId, file_id: FileId) -> AppResult<bool> {
        let result = sqlx::query(
            "INSERT INTO album_files (album_id, file_id, added_at) VALUES ($1, $2, NOW()) \
             ON CONFLICT (album_id, file_id) DO NOTHING",
        )
        .bind(album_id)
        .bind(file_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to add file to album", e)
        })?;
        Ok(result.rows_affected() > 0)
    }

    async fn remove_file(&self, album_id: AlbumId, file_id: FileId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM album_files WHERE album_id = $1 AND file_id = $2")
            .bind(album_id)
            .bind(file_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to remove file from album", e)
            })?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_cover(&self, id: AlbumId, cover: Option<FileId>) -> AppResult<Album> {
        sqlx::query_as::<_, Album>(
            "UPDATE albums SET cover_file_id = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(cover)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to set album cover", e))?
        .ok_or_else(|| AppError::not_found(format!("Album {id} not found")))
    }

    async fn list_files(&self, album_id: AlbumId) -> AppResult<Vec<StoredFile>> {
        sqlx::query_as::<_, StoredFile>(
            "SELECT f.* FROM files f \
             INNER JOIN album_files af ON af.file_id = f.id \
             WHERE af.album_id = $1 ORDER BY af.added_at ASC",
        )
        .bind(album_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list album files", e))
    }
}
