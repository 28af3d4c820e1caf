use crate::gate::{ContentStore, PostId};
use anyhow::{anyhow, Context, Result};
use secrecy::{ExposeSecret, SecretString};
use sqlx::{postgres::PgPoolOptions, Connection, PgPool};
use tokio::time::{timeout, Duration};
use tracing::{info_span, Instrument};

const PING_TIMEOUT_SECONDS: u64 = 2;

/// One published post in random order, id only.
const RANDOM_PUBLISHED_POST: &str = "SELECT id FROM posts \
     WHERE post_type = 'post' AND post_status = 'publish' \
     ORDER BY random() LIMIT 1";

#[derive(Debug, Clone)]
pub struct PgContentStore {
    pool: PgPool,
}

impl PgContentStore {
    /// # Errors
    /// Returns an error if the database cannot be reached.
    pub async fn connect(dsn: &SecretString) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .min_connections(1)
            .max_connections(5)
            .max_lifetime(Duration::from_secs(60 * 2))
            .test_before_acquire(true)
            .connect(dsn.expose_secret())
            .await
            .context("Failed to connect to database")?;

        Ok(Self { pool })
    }

    /// Store over an existing pool.
    #[must_use]
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl ContentStore for PgContentStore {
    async fn random_published(&self) -> Result<Option<PostId>> {
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT"
        );

        let id: Option<i64> = sqlx::query_scalar::<_, i64>(RANDOM_PUBLISHED_POST)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .context("Failed to select a random published post")?;

        Ok(id.map(PostId::new))
    }

    async fn ping(&self) -> Result<()> {
        let span = info_span!("db.ping", db.system = "postgresql", db.operation = "PING");

        timeout(Duration::from_secs(PING_TIMEOUT_SECONDS), async {
            let mut conn = self
                .pool
                .acquire()
                .await
                .context("Failed to acquire database connection")?;

            conn.ping().await.context("Failed to ping database")
        })
        .instrument(span)
        .await
        .map_err(|_| anyhow!("Database ping timed out"))?
    }
}
