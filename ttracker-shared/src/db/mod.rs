/// Database layer
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool creation and shutdown
/// - `schema`: Idempotent creation of the tables the store expects
///
/// Queries live in [`crate::storage::postgres`].
///
/// # Example
///
/// ```no_run
/// use ttracker_shared::db::{pool::{create_pool, DatabaseConfig}, schema::ensure_schema};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig {
///     url: std::env::var("DATABASE_URL")?,
///     ..Default::default()
/// })
/// .await?;
/// ensure_schema(&pool).await?;
/// # Ok(())
/// # }
/// ```

pub mod pool;
pub mod schema;
