use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

/// Schema statements, applied in order on every start
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS post (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
        slug TEXT UNIQUE,
        title TEXT NOT NULL DEFAULT '{}',
        body TEXT NOT NULL DEFAULT '{}',
        short_description TEXT NOT NULL DEFAULT '{}',
        keywords TEXT NOT NULL DEFAULT '{}',
        type TEXT NOT NULL DEFAULT 'post',
        is_published BOOLEAN NOT NULL DEFAULT FALSE,
        published_at DATETIME,
        meta_url TEXT,
        meta_redirect TEXT,
        author_type TEXT,
        author_id INTEGER,
        meta TEXT NOT NULL DEFAULT 'null',
        deleted_at DATETIME
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_post_type_meta_url ON post (type, meta_url)",
    r#"
    CREATE TABLE IF NOT EXISTS post_meta (
        post_id INTEGER NOT NULL REFERENCES post (id) ON DELETE CASCADE,
        key TEXT NOT NULL,
        value TEXT NOT NULL,
        PRIMARY KEY (post_id, key)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS post_media (
        post_id INTEGER NOT NULL REFERENCES post (id) ON DELETE CASCADE,
        collection TEXT NOT NULL,
        file_path TEXT NOT NULL,
        source_url TEXT NOT NULL,
        content_type TEXT,
        created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
        PRIMARY KEY (post_id, collection)
    )
    "#,
];

pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    run_migrations(&pool).await?;

    Ok(pool)
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

/// Single-connection in-memory pool with the schema applied.
///
/// Every connection to `sqlite::memory:` opens its own database, so the pool
/// is pinned to one connection that is never recycled.
#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    run_migrations(&pool).await.unwrap();
    pool
}
