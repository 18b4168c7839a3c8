use std::time::Duration;

#[cfg(feature = "postgres")]
use sea_orm::{ConnectOptions, Database, DbConn, DbErr};

/// Configuration for the posts database.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Connection pool for the posts database.
///
/// # Example
/// ```ignore
/// let pool = DatabasePool::init(&config).await?;
/// let repo = PostgresPostRepository::new(pool.conn.clone());
/// ```
#[cfg(feature = "postgres")]
pub struct DatabasePool {
    pub conn: DbConn,
}

#[cfg(feature = "postgres")]
impl DatabasePool {
    /// Open the pool and verify the database answers.
    pub async fn init(config: &DatabaseConfig) -> Result<Self, DbErr> {
        tracing::info!("Initializing database connection pool...");

        let opts = ConnectOptions::new(&config.url)
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(config.connect_timeout)
            .idle_timeout(Duration::from_secs(300))
            .sqlx_logging(true)
            .to_owned();

        let conn = Database::connect(opts).await?;
        conn.ping().await?;

        tracing::info!(
            max_connections = config.max_connections,
            "Database connected"
        );

        Ok(Self { conn })
    }
}
