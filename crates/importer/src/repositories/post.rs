use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{
    AuthorRef, DerivedMeta, DomainError, DomainResult, LocalizedText, MetaKey, MetaValue, Post,
    PostRepository,
};
use serde::{de::DeserializeOwned, Serialize};
use sqlx::SqlitePool;

/// Common SELECT fields for post queries
const SELECT_POST: &str = r#"
    SELECT
        id, created_at, updated_at, slug,
        title, body, short_description, keywords,
        type, is_published, published_at,
        meta_url, meta_redirect, author_type, author_id,
        meta, deleted_at
    FROM post
"#;

pub struct SqlitePostRepository {
    pool: SqlitePool,
}

impl SqlitePostRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Load the derived metadata of a post
    async fn load_meta(&self, post_id: i64) -> Result<DerivedMeta, sqlx::Error> {
        let rows = sqlx::query_as::<_, (String, String)>(
            "SELECT key, value FROM post_meta WHERE post_id = $1",
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(key, value)| {
                let key = match key.parse::<MetaKey>() {
                    Ok(key) => key,
                    Err(_) => {
                        tracing::debug!("Ignoring unknown meta key '{}' on post {}", key, post_id);
                        return None;
                    }
                };
                match serde_json::from_str::<MetaValue>(&value) {
                    Ok(value) => Some((key, value)),
                    Err(e) => {
                        tracing::warn!("Invalid meta value for {} on post {}: {}", key, post_id, e);
                        None
                    }
                }
            })
            .collect())
    }

    async fn hydrate(&self, row: Option<PostRow>) -> Result<Option<Post>, sqlx::Error> {
        let Some(row) = row else {
            return Ok(None);
        };
        let mut post: Post = row.into();
        post.derived_meta = self.load_meta(post.id).await?;
        Ok(Some(post))
    }

    async fn insert(&self, post: &mut Post) -> DomainResult<()> {
        let fields = PostFields::encode(post)?;
        let now = Utc::now();

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO post (
                created_at, updated_at, slug,
                title, body, short_description, keywords,
                type, is_published, published_at,
                meta_url, meta_redirect, author_type, author_id,
                meta, deleted_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING id
            "#,
        )
        .bind(now)
        .bind(now)
        .bind(&post.slug)
        .bind(&fields.title)
        .bind(&fields.body)
        .bind(&fields.short_description)
        .bind(&fields.keywords)
        .bind(&post.post_type)
        .bind(post.is_published)
        .bind(post.published_at)
        .bind(&post.source_url)
        .bind(&post.source_redirect)
        .bind(post.author.as_ref().map(|a| a.kind.as_str()))
        .bind(post.author.as_ref().map(|a| a.id))
        .bind(&fields.meta)
        .bind(post.deleted_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        post.id = id;
        post.created_at = now;
        post.updated_at = now;
        Ok(())
    }

    async fn update(&self, post: &mut Post) -> DomainResult<()> {
        let fields = PostFields::encode(post)?;
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE post SET
                updated_at = $1,
                slug = $2,
                title = $3,
                body = $4,
                short_description = $5,
                keywords = $6,
                type = $7,
                is_published = $8,
                published_at = $9,
                meta_url = $10,
                meta_redirect = $11,
                author_type = $12,
                author_id = $13,
                meta = $14,
                deleted_at = $15
            WHERE id = $16
            "#,
        )
        .bind(now)
        .bind(&post.slug)
        .bind(&fields.title)
        .bind(&fields.body)
        .bind(&fields.short_description)
        .bind(&fields.keywords)
        .bind(&post.post_type)
        .bind(post.is_published)
        .bind(post.published_at)
        .bind(&post.source_url)
        .bind(&post.source_redirect)
        .bind(post.author.as_ref().map(|a| a.kind.as_str()))
        .bind(post.author.as_ref().map(|a| a.id))
        .bind(&fields.meta)
        .bind(post.deleted_at)
        .bind(post.id)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound {
                entity_type: "post",
                id: post.id.to_string(),
            });
        }

        post.updated_at = now;
        Ok(())
    }
}

#[async_trait]
impl PostRepository for SqlitePostRepository {
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Post>> {
        let query = format!("{} WHERE id = $1", SELECT_POST);
        let row = sqlx::query_as::<_, PostRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        self.hydrate(row).await.map_err(db_error)
    }

    async fn find_by_slug_with_trashed(&self, slug: &str) -> DomainResult<Option<Post>> {
        let query = format!("{} WHERE slug = $1", SELECT_POST);
        let row = sqlx::query_as::<_, PostRow>(&query)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        self.hydrate(row).await.map_err(db_error)
    }

    async fn find_refreshable(&self, post_type: &str) -> DomainResult<Vec<Post>> {
        let query = format!(
            "{} WHERE type = $1 AND meta_url IS NOT NULL AND meta_url != '' AND deleted_at IS NULL ORDER BY id ASC",
            SELECT_POST
        );
        let rows = sqlx::query_as::<_, PostRow>(&query)
            .bind(post_type)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

        let mut posts = Vec::with_capacity(rows.len());
        for row in rows {
            if let Some(post) = self.hydrate(Some(row)).await.map_err(db_error)? {
                posts.push(post);
            }
        }
        Ok(posts)
    }

    async fn save(&self, post: &mut Post) -> DomainResult<()> {
        if post.is_new() {
            self.insert(post).await
        } else {
            self.update(post).await
        }
    }

    async fn restore(&self, post: &mut Post) -> DomainResult<()> {
        let result = sqlx::query("UPDATE post SET deleted_at = NULL, updated_at = $1 WHERE id = $2")
            .bind(Utc::now())
            .bind(post.id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound {
                entity_type: "post",
                id: post.id.to_string(),
            });
        }

        post.restore();
        Ok(())
    }

    async fn save_meta(&self, post_id: i64, meta: &DerivedMeta) -> DomainResult<()> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        for (key, value) in meta.iter() {
            let value = to_json(value)?;
            sqlx::query(
                r#"
                INSERT INTO post_meta (post_id, key, value)
                VALUES ($1, $2, $3)
                ON CONFLICT (post_id, key) DO UPDATE SET value = excluded.value
                "#,
            )
            .bind(post_id)
            .bind(key.as_str())
            .bind(value)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;
        }

        tx.commit().await.map_err(db_error)
    }

    async fn get_meta(&self, post_id: i64, key: MetaKey) -> DomainResult<Option<MetaValue>> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM post_meta WHERE post_id = $1 AND key = $2")
                .bind(post_id)
                .bind(key.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error)?;

        value
            .map(|v| serde_json::from_str(&v))
            .transpose()
            .map_err(|e| DomainError::Persistence(e.to_string()))
    }
}

pub(crate) fn db_error(e: sqlx::Error) -> DomainError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => DomainError::Conflict(e.to_string()),
        _ => DomainError::Persistence(e.to_string()),
    }
}

/// JSON-encoded columns of a post
struct PostFields {
    title: String,
    body: String,
    short_description: String,
    keywords: String,
    meta: String,
}

impl PostFields {
    fn encode(post: &Post) -> DomainResult<Self> {
        Ok(Self {
            title: to_json(&post.title)?,
            body: to_json(&post.body)?,
            short_description: to_json(&post.short_description)?,
            keywords: to_json(&post.keywords)?,
            meta: to_json(&post.raw_meta)?,
        })
    }
}

fn to_json<T: Serialize>(value: &T) -> DomainResult<String> {
    serde_json::to_string(value).map_err(|e| DomainError::Persistence(e.to_string()))
}

/// Internal row type for mapping SQLite results
#[derive(Debug, sqlx::FromRow)]
struct PostRow {
    id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    slug: Option<String>,
    title: String,
    body: String,
    short_description: String,
    keywords: String,
    #[sqlx(rename = "type")]
    post_type: String,
    is_published: bool,
    published_at: Option<DateTime<Utc>>,
    meta_url: Option<String>,
    meta_redirect: Option<String>,
    author_type: Option<String>,
    author_id: Option<i64>,
    meta: String,
    deleted_at: Option<DateTime<Utc>>,
}

fn decode_or_default<T: DeserializeOwned + Default>(column: &str, id: i64, raw: &str) -> T {
    serde_json::from_str(raw).unwrap_or_else(|e| {
        tracing::warn!("Failed to parse {} of post {}: {}", column, id, e);
        T::default()
    })
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        let author = match (row.author_type, row.author_id) {
            (Some(kind), Some(id)) => Some(AuthorRef { kind, id }),
            _ => None,
        };

        Self {
            id: row.id,
            created_at: row.created_at,
            updated_at: row.updated_at,
            slug: row.slug,
            title: decode_or_default::<LocalizedText>("title", row.id, &row.title),
            body: decode_or_default::<LocalizedText>("body", row.id, &row.body),
            short_description: decode_or_default::<LocalizedText>(
                "short_description",
                row.id,
                &row.short_description,
            ),
            keywords: decode_or_default::<LocalizedText>("keywords", row.id, &row.keywords),
            post_type: row.post_type,
            is_published: row.is_published,
            published_at: row.published_at,
            source_url: row.meta_url,
            source_redirect: row.meta_redirect,
            author,
            raw_meta: decode_or_default::<serde_json::Value>("meta", row.id, &row.meta),
            derived_meta: DerivedMeta::new(),
            deleted_at: row.deleted_at,
        }
    }
}
