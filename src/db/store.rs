use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{Connection, SqliteConnection};
use tracing::{error, warn};

use crate::error::AppError;

pub const COLLECTION: &str = "lists";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection settings for the document store.
///
/// Holds no open handles: every repository call acquires its own connection
/// with [`DocumentStore::connect`] and hands it back to
/// [`DocumentStore::release`] once done.
#[derive(Clone, Debug)]
pub struct DocumentStore {
    options: SqliteConnectOptions,
}

impl DocumentStore {
    pub fn new(options: SqliteConnectOptions) -> Self {
        Self { options }
    }

    pub fn from_url(url: &str) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(url).map_err(|e| {
            error!("invalid database url: {}", e);
            AppError::database()
        })?;
        Ok(Self::new(options))
    }

    pub async fn connect(&self) -> Result<SqliteConnection, AppError> {
        match tokio::time::timeout(CONNECT_TIMEOUT, SqliteConnection::connect_with(&self.options))
            .await
        {
            Ok(Ok(conn)) => Ok(conn),
            Ok(Err(e)) => {
                error!("database connection error: {}", e);
                Err(AppError::database())
            }
            Err(_) => {
                error!("database connection timed out after {:?}", CONNECT_TIMEOUT);
                Err(AppError::database())
            }
        }
    }

    pub async fn release(&self, conn: SqliteConnection) {
        if let Err(e) = conn.close().await {
            warn!("error closing database connection: {}", e);
        }
    }

    /// Creates the collection if it does not exist yet.
    pub async fn ensure_collection(&self) -> Result<(), AppError> {
        let mut conn = self.connect().await?;
        let result = sqlx::query(&format!(
            "CREATE TABLE IF NOT EXISTS {} (id BLOB PRIMARY KEY NOT NULL, document TEXT NOT NULL)",
            COLLECTION
        ))
        .execute(&mut conn)
        .await;
        self.release(conn).await;

        result.map(|_| ()).map_err(|e| {
            error!("error creating collection {}: {}", COLLECTION, e);
            AppError::database()
        })
    }
}
