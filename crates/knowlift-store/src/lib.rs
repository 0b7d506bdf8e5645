//! Knowlift Storage Layer
//!
//! SQLite schema for player accounts and the countries they belong to.
//! Game rounds are never stored; they travel with the client.
//!
//! # Examples
//!
//! ```no_run
//! use knowlift_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Schema is created, store is ready
//! store.ping().unwrap();
//! ```

#![warn(missing_docs)]

use rusqlite::{Connection, ErrorCode, OpenFlags};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(rusqlite::Error),

    /// A UNIQUE, NOT NULL, CHECK or FOREIGN KEY constraint was violated
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// The database exists but its tables have not been created
    #[error("Schema not initialized: missing table {0}")]
    MissingSchema(&'static str),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        match &e {
            rusqlite::Error::SqliteFailure(failure, message)
                if failure.code == ErrorCode::ConstraintViolation =>
            {
                StoreError::Constraint(message.clone().unwrap_or_else(|| failure.to_string()))
            }
            _ => StoreError::Database(e),
        }
    }
}

const TABLES: [&str; 2] = ["country", "user"];

/// SQLite-backed store for users and countries
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Open one store per request or
/// per thread.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and ensure the schema exists
    ///
    /// Use `:memory:` for an in-memory database (useful for testing). Safe to
    /// call repeatedly on the same file; existing tables are left untouched.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path.as_ref())?;
        let mut store = Self { conn };
        store.initialize_schema()?;
        debug!(path = %path.as_ref().display(), "Opened database");
        Ok(store)
    }

    /// Open a database that must already exist, without touching its schema
    ///
    /// Fails when the file is missing instead of creating an empty one.
    pub fn open_existing<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open_with_flags(
            path.as_ref(),
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self { conn })
    }

    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    /// Check that the connection answers queries and every table exists
    pub fn ping(&self) -> Result<(), StoreError> {
        for table in TABLES {
            let present: bool = self.conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
                [table],
                |row| row.get(0),
            )?;
            if !present {
                return Err(StoreError::MissingSchema(table));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::params;

    fn insert_country(
        store: &SqliteStore,
        name: &str,
        a2: &str,
        a3: &str,
    ) -> Result<i64, StoreError> {
        store.conn.execute(
            "INSERT INTO country (english_short_name, alpha2_code, alpha3_code) VALUES (?1, ?2, ?3)",
            params![name, a2, a3],
        )?;
        Ok(store.conn.last_insert_rowid())
    }

    fn insert_user(
        store: &SqliteStore,
        username: &str,
        email: &str,
        country_id: i64,
    ) -> Result<i64, StoreError> {
        store.conn.execute(
            "INSERT INTO user (username, email, password, country_id, date_created, last_updated)
             VALUES (?1, ?2, 'hashed', ?3, 0, 0)",
            params![username, email, country_id],
        )?;
        Ok(store.conn.last_insert_rowid())
    }

    #[test]
    fn test_schema_is_idempotent() {
        let mut store = SqliteStore::new(":memory:").unwrap();
        store.initialize_schema().unwrap();
        store.ping().unwrap();
    }

    #[test]
    fn test_ping_reports_missing_schema() {
        let store = SqliteStore {
            conn: Connection::open_in_memory().unwrap(),
        };
        assert!(matches!(store.ping(), Err(StoreError::MissingSchema("country"))));
    }

    #[test]
    fn test_country_unique_fields() {
        let store = SqliteStore::new(":memory:").unwrap();
        insert_country(&store, "Romania", "RO", "ROU").unwrap();

        for (name, a2, a3) in [
            ("Romania", "RX", "RXX"),
            ("Other", "RO", "RXX"),
            ("Other", "RX", "ROU"),
        ] {
            let result = insert_country(&store, name, a2, a3);
            assert!(matches!(result, Err(StoreError::Constraint(_))), "{} {} {}", name, a2, a3);
        }
    }

    #[test]
    fn test_country_code_lengths() {
        let store = SqliteStore::new(":memory:").unwrap();
        assert!(matches!(
            insert_country(&store, "Romania", "ROM", "ROU"),
            Err(StoreError::Constraint(_))
        ));
        assert!(matches!(
            insert_country(&store, "Romania", "RO", "RO"),
            Err(StoreError::Constraint(_))
        ));
        assert!(insert_country(&store, "Romania", "RO", "ROU").is_ok());
    }

    #[test]
    fn test_user_defaults() {
        let store = SqliteStore::new(":memory:").unwrap();
        let country = insert_country(&store, "Romania", "RO", "ROU").unwrap();
        let id = insert_user(&store, "alice", "alice@example.com", country).unwrap();

        let (is_active, is_staff, last_login): (bool, bool, Option<i64>) = store
            .conn
            .query_row(
                "SELECT is_active, is_staff, last_login FROM user WHERE id = ?1",
                [id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .unwrap();
        assert!(!is_active);
        assert!(!is_staff);
        assert_eq!(last_login, None);
    }

    #[test]
    fn test_user_unique_fields() {
        let store = SqliteStore::new(":memory:").unwrap();
        let country = insert_country(&store, "Romania", "RO", "ROU").unwrap();
        insert_user(&store, "alice", "alice@example.com", country).unwrap();

        assert!(matches!(
            insert_user(&store, "alice", "other@example.com", country),
            Err(StoreError::Constraint(_))
        ));
        assert!(matches!(
            insert_user(&store, "other", "alice@example.com", country),
            Err(StoreError::Constraint(_))
        ));
    }

    #[test]
    fn test_user_requires_existing_country() {
        let store = SqliteStore::new(":memory:").unwrap();
        assert!(matches!(
            insert_user(&store, "alice", "alice@example.com", 99),
            Err(StoreError::Constraint(_))
        ));
    }

    #[test]
    fn test_user_field_lengths() {
        let store = SqliteStore::new(":memory:").unwrap();
        let country = insert_country(&store, "Romania", "RO", "ROU").unwrap();

        assert!(matches!(
            insert_user(&store, &"a".repeat(256), "alice@example.com", country),
            Err(StoreError::Constraint(_))
        ));

        let id = insert_user(&store, &"a".repeat(255), "alice@example.com", country).unwrap();
        let result = store.conn.execute(
            "UPDATE user SET last_name = ?1 WHERE id = ?2",
            params!["b".repeat(151), id],
        );
        assert!(matches!(
            result.map_err(StoreError::from),
            Err(StoreError::Constraint(_))
        ));
    }
}
