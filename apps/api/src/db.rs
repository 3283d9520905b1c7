use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use crate::store::PgStore;

/// Owned handle to the PostgreSQL pool. Constructed once in `main`,
/// handed to the repositories, and closed on shutdown.
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connects and brings the schema up to date.
    pub async fn connect(database_url: &str) -> Result<Self> {
        info!("Connecting to PostgreSQL...");

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(std::time::Duration::from_secs(5))
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        info!("PostgreSQL connection pool established");
        Ok(Self { pool })
    }

    pub fn store(&self) -> PgStore {
        PgStore::new(self.pool.clone())
    }

    pub async fn close(self) {
        self.pool.close().await;
        info!("PostgreSQL connection pool closed");
    }
}
