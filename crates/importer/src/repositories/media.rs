use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{DomainResult, Media, MediaCollection, MediaRepository};
use sqlx::SqlitePool;

use super::post::db_error;

/// Common SELECT fields for media queries
const SELECT_MEDIA: &str = r#"
    SELECT post_id, collection, file_path, source_url, content_type, created_at
    FROM post_media
"#;

pub struct SqliteMediaRepository {
    pool: SqlitePool,
}

impl SqliteMediaRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MediaRepository for SqliteMediaRepository {
    async fn find(&self, post_id: i64, collection: MediaCollection) -> DomainResult<Option<Media>> {
        let query = format!("{} WHERE post_id = $1 AND collection = $2", SELECT_MEDIA);
        let row = sqlx::query_as::<_, MediaRow>(&query)
            .bind(post_id)
            .bind(collection.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        row.map(Media::try_from).transpose()
    }

    async fn replace(&self, media: Media) -> DomainResult<Option<Media>> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let query = format!("{} WHERE post_id = $1 AND collection = $2", SELECT_MEDIA);
        let previous = sqlx::query_as::<_, MediaRow>(&query)
            .bind(media.post_id)
            .bind(media.collection.as_str())
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_error)?;

        sqlx::query(
            r#"
            INSERT INTO post_media (post_id, collection, file_path, source_url, content_type, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (post_id, collection) DO UPDATE SET
                file_path = excluded.file_path,
                source_url = excluded.source_url,
                content_type = excluded.content_type,
                created_at = excluded.created_at
            "#,
        )
        .bind(media.post_id)
        .bind(media.collection.as_str())
        .bind(&media.file_path)
        .bind(&media.source_url)
        .bind(&media.content_type)
        .bind(media.created_at)
        .execute(&mut *tx)
        .await
        .map_err(db_error)?;

        tx.commit().await.map_err(db_error)?;

        previous.map(Media::try_from).transpose()
    }

    async fn clear(&self, post_id: i64, collection: MediaCollection) -> DomainResult<Option<Media>> {
        let row = sqlx::query_as::<_, MediaRow>(
            r#"
            DELETE FROM post_media
            WHERE post_id = $1 AND collection = $2
            RETURNING post_id, collection, file_path, source_url, content_type, created_at
            "#,
        )
        .bind(post_id)
        .bind(collection.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.map(Media::try_from).transpose()
    }
}

/// Internal row type for mapping SQLite results
#[derive(Debug, sqlx::FromRow)]
struct MediaRow {
    post_id: i64,
    collection: String,
    file_path: String,
    source_url: String,
    content_type: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<MediaRow> for Media {
    type Error = domain::DomainError;

    fn try_from(row: MediaRow) -> Result<Self, Self::Error> {
        Ok(Self {
            post_id: row.post_id,
            collection: row.collection.parse()?,
            file_path: row.file_path,
            source_url: row.source_url,
            content_type: row.content_type,
            created_at: row.created_at,
        })
    }
}
