use async_trait::async_trait;
use shared::models::Character;
use std::sync::Arc;
use thiserror::Error;

pub mod local;
pub mod postgres;

pub use local::LocalDatabase;
pub use postgres::PostgresDatabase;

pub type DbResult<T> = Result<T, DbError>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DatabaseConfig {
    Local { url: String },
    Postgres { url: String },
}

impl DatabaseConfig {
    /// Picks the backend from the URL scheme. Anything that is not Postgres is
    /// handed to SQLite.
    pub fn from_url(url: &str) -> Self {
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            DatabaseConfig::Postgres {
                url: url.to_string(),
            }
        } else {
            DatabaseConfig::Local {
                url: url.to_string(),
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlx(sqlx::Error),
    #[error("Entity not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                DbError::Conflict(db_err.message().to_string())
            }
            _ => DbError::Sqlx(err),
        }
    }
}

/// Durable storage for characters, keyed by normalized name.
///
/// Implementations enforce name uniqueness themselves and report a duplicate
/// create as [`DbError::Conflict`].
#[async_trait]
pub trait Database: Send + Sync {
    async fn find_by_name(&self, name: &str) -> DbResult<Option<Character>>;
    async fn create(&self, character: Character) -> DbResult<Character>;
    async fn update_image_url(&self, name: &str, image_url: &str) -> DbResult<Character>;
}

pub async fn connect(config: &DatabaseConfig) -> DbResult<Arc<dyn Database>> {
    match config {
        DatabaseConfig::Local { url } => Ok(Arc::new(LocalDatabase::new(url).await?)),
        DatabaseConfig::Postgres { url } => Ok(Arc::new(PostgresDatabase::new(url).await?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_backend_from_scheme() {
        assert!(matches!(
            DatabaseConfig::from_url("postgres://localhost/mythos"),
            DatabaseConfig::Postgres { .. }
        ));
        assert!(matches!(
            DatabaseConfig::from_url("postgresql://localhost/mythos"),
            DatabaseConfig::Postgres { .. }
        ));
        assert_eq!(
            DatabaseConfig::from_url("sqlite://mythos.db?mode=rwc"),
            DatabaseConfig::Local {
                url: "sqlite://mythos.db?mode=rwc".to_string()
            }
        );
    }
}
