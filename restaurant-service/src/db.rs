use std::time::Duration;

use diesel::{
    connection::SimpleConnection,
    r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection},
    SqliteConnection,
};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::{debug, info};

use crate::{config::Config, error::StoreError};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub type SqlitePool = Pool<ConnectionManager<SqliteConnection>>;
pub type SqlitePooledConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

/// Applied to every connection the pool opens.
#[derive(Debug)]
struct ConnectionOptions {
    busy_timeout: Duration,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA foreign_keys = ON; PRAGMA busy_timeout = {};",
            self.busy_timeout.as_millis()
        ))
        .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Pooled access to the SQLite store.
///
/// Diesel connections are blocking, so [`Database::run`] moves each unit of
/// work onto tokio's blocking thread pool.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub fn connect(config: &Config) -> Result<Self, StoreError> {
        let manager = ConnectionManager::<SqliteConnection>::new(&config.database_url);
        let builder = SqlitePool::builder().connection_customizer(Box::new(ConnectionOptions {
            busy_timeout: BUSY_TIMEOUT,
        }));

        // Every in-memory connection is its own database, so keep exactly one alive.
        let builder = if config.is_in_memory() {
            builder.max_size(1).idle_timeout(None).max_lifetime(None)
        } else {
            builder.max_size(config.pool_size)
        };

        let pool = builder.build(manager)?;
        debug!(
            database_url = %config.database_url,
            max_size = pool.max_size(),
            "opened connection pool"
        );

        Ok(Self { pool })
    }

    pub fn connection(&self) -> Result<SqlitePooledConnection, StoreError> {
        Ok(self.pool.get()?)
    }

    pub fn migrate(&self) -> Result<(), StoreError> {
        let mut conn = self.connection()?;
        let conn: &mut SqliteConnection = &mut conn;
        let applied = conn.run_pending_migrations(MIGRATIONS)?;
        info!(count = applied.len(), "applied pending migrations");
        Ok(())
    }

    /// Runs `f` with a pooled connection on the blocking thread pool.
    pub async fn run<F, T, E>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: Into<StoreError>,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> Result<T, StoreError> {
            let mut conn = pool.get()?;
            f(&mut conn).map_err(Into::into)
        })
        .await?
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        self.run(|conn| conn.batch_execute("SELECT 1")).await
    }

    pub fn close(self) {
        let state = self.pool.state();
        info!(
            connections = state.connections,
            idle = state.idle_connections,
            "closing connection pool"
        );
    }
}

/// Drops every table and recreates the schema from the embedded migrations.
pub fn reset_schema(conn: &mut SqliteConnection) -> Result<(), StoreError> {
    let reverted = conn.revert_all_migrations(MIGRATIONS)?.len();
    let applied = conn.run_pending_migrations(MIGRATIONS)?.len();
    info!(reverted, applied, "recreated schema");
    Ok(())
}
