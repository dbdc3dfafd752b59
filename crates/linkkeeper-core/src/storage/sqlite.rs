use rusqlite::{Connection, Result};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

const SCHEMA_VERSION: i64 = 1;

/// SQLite-backed bookmark store. The connection sits behind a mutex so the
/// store can be shared with the concurrent bundling applicator.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Database {
            conn: Mutex::new(conn),
        };
        db.configure_pragmas()?;
        db.migrate_schema()?;
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Database {
            conn: Mutex::new(conn),
        };
        db.configure_pragmas()?;
        db.migrate_schema()?;
        Ok(db)
    }

    fn configure_pragmas(&self) -> Result<()> {
        self.connection().execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA busy_timeout = 5000;",
        )?;
        debug!("SQLite pragmas configured (WAL mode)");
        Ok(())
    }

    /// Applies the schema script to a fresh or older database. A database
    /// already at the current version is left untouched.
    fn migrate_schema(&self) -> Result<()> {
        let conn = self.connection();
        let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

        if version >= SCHEMA_VERSION {
            debug!("SQLite schema is current (version {})", version);
            return Ok(());
        }

        debug!(
            "Schema version {} < {}, applying schema",
            version, SCHEMA_VERSION
        );
        conn.execute_batch(include_str!("schema.sql"))?;
        Ok(())
    }

    pub fn schema_version(&self) -> Result<i64> {
        self.connection()
            .query_row("PRAGMA user_version", [], |row| row.get(0))
    }

    pub fn connection(&self) -> MutexGuard<'_, Connection> {
        self.conn
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn truncate_all(&self) -> Result<()> {
        self.connection().execute_batch(
            "DELETE FROM bookmark;
             DELETE FROM sqlite_sequence WHERE name = 'bookmark';",
        )?;
        debug!("All tables truncated");
        Ok(())
    }
}
