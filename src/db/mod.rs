pub mod pool;
pub mod progress;
pub mod routines;
pub mod users;

use sqlx::SqlitePool;

pub use pool::create_pool;

/// Database handle type (the pool is internally reference counted)
pub type Db = SqlitePool;

/// Open the database at `database_url` and bring its schema up to date
///
/// Migrations are embedded in the binary at compile time.
pub async fn open_database(database_url: &str, max_connections: u32) -> Result<Db, sqlx::Error> {
    let pool = create_pool(database_url, max_connections).await?;

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Migrations complete");

    Ok(pool)
}
