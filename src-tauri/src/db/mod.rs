use rusqlite::{params, Connection, OptionalExtension, Result};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Keyed client-side store. Holds settings only; chat turns and checklist
/// status are never written here.
pub struct Database {
    pub conn: Mutex<Connection>,
}

impl Database {
    pub fn new(app_dir: &std::path::Path) -> Result<Self> {
        std::fs::create_dir_all(app_dir).ok();
        let db_path = app_dir.join("home-scanner.db");
        let conn = Connection::open(db_path)?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.migrate()?;
        Ok(db)
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn migrate(&self) -> Result<()> {
        let conn = self.lock();
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            ",
        )?;
        Ok(())
    }

    // ── Settings ──

    pub fn get_setting(&self, key: &str) -> Result<Option<String>> {
        self.lock()
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
    }

    /// Every stored row, ordered by key.
    pub fn all_settings(&self) -> Result<Vec<(String, String)>> {
        let conn = self.lock();
        let mut stmt = conn.prepare("SELECT key, value FROM settings ORDER BY key")?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        rows.collect()
    }

    pub fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        self.lock().execute(
            "INSERT INTO settings (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn delete_setting(&self, key: &str) -> Result<()> {
        self.lock()
            .execute("DELETE FROM settings WHERE key = ?1", params![key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setting_roundtrip_and_delete() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.get_setting("member_id").unwrap(), None);

        db.set_setting("member_id", "42").unwrap();
        db.set_setting("member_id", "43").unwrap();
        assert_eq!(db.get_setting("member_id").unwrap().as_deref(), Some("43"));

        db.delete_setting("member_id").unwrap();
        assert_eq!(db.get_setting("member_id").unwrap(), None);
    }

    #[test]
    fn test_all_settings_ordered_by_key() {
        let db = Database::open_in_memory().unwrap();
        db.set_setting("rag_base_url", "http://b").unwrap();
        db.set_setting("log_level", "warn").unwrap();
        assert_eq!(
            db.all_settings().unwrap(),
            vec![
                ("log_level".to_string(), "warn".to_string()),
                ("rag_base_url".to_string(), "http://b".to_string()),
            ]
        );
    }

    #[test]
    fn test_settings_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let db = Database::new(dir.path()).unwrap();
            db.set_setting("rag_base_url", "http://rag.local").unwrap();
        }
        let db = Database::new(dir.path()).unwrap();
        assert_eq!(
            db.get_setting("rag_base_url").unwrap().as_deref(),
            Some("http://rag.local")
        );
    }
}
