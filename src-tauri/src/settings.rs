use crate::db::Database;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The settings this app reads. Anything else is refused at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SettingKey {
    RagBaseUrl,
    ChecklistBaseUrl,
    MemberId,
    LogLevel,
}

impl SettingKey {
    pub const ALL: [SettingKey; 4] = [
        SettingKey::RagBaseUrl,
        SettingKey::ChecklistBaseUrl,
        SettingKey::MemberId,
        SettingKey::LogLevel,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SettingKey::RagBaseUrl => "rag_base_url",
            SettingKey::ChecklistBaseUrl => "checklist_base_url",
            SettingKey::MemberId => "member_id",
            SettingKey::LogLevel => "log_level",
        }
    }

    /// Check a raw value and return the form that gets stored.
    pub fn normalize(self, raw: &str) -> Result<String, SettingsError> {
        let value = raw.trim();
        let invalid = |reason: &str| SettingsError::InvalidValue {
            key: self,
            reason: reason.to_string(),
        };
        match self {
            SettingKey::RagBaseUrl | SettingKey::ChecklistBaseUrl => {
                if !(value.starts_with("http://") || value.starts_with("https://")) {
                    return Err(invalid("expected an http(s) URL"));
                }
                Ok(value.trim_end_matches('/').to_string())
            }
            SettingKey::MemberId => value
                .parse::<i64>()
                .map(|id| id.to_string())
                .map_err(|_| invalid("expected an integer")),
            SettingKey::LogLevel => value
                .parse::<log::LevelFilter>()
                .map(|level| level.to_string().to_lowercase())
                .map_err(|_| invalid("expected off, error, warn, info, debug or trace")),
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingKey {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SettingKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| SettingsError::UnknownKey(s.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Unknown setting key: {0}")]
    UnknownKey(String),
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: SettingKey, reason: String },
    #[error("Settings store error: {0}")]
    Store(#[from] rusqlite::Error),
}

/// Stored value for `key`. Store errors read as unset.
pub fn read(db: &Database, key: SettingKey) -> Option<String> {
    match db.get_setting(key.as_str()) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("[settings] reading {} failed: {}", key, e);
            None
        }
    }
}

/// Every known setting that has a value. Unknown rows are skipped.
pub fn read_all(db: &Database) -> Result<BTreeMap<String, String>, SettingsError> {
    Ok(db
        .all_settings()?
        .into_iter()
        .filter(|(key, _)| key.parse::<SettingKey>().is_ok())
        .collect())
}

pub fn write(db: &Database, key: &str, raw: &str) -> Result<String, SettingsError> {
    let key: SettingKey = key.parse()?;
    let value = key.normalize(raw)?;
    db.set_setting(key.as_str(), &value)?;
    log::info!("[settings] {} updated", key);
    Ok(value)
}

pub fn remove(db: &Database, key: &str) -> Result<(), SettingsError> {
    let key: SettingKey = key.parse()?;
    db.delete_setting(key.as_str())?;
    log::info!("[settings] {} cleared", key);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_keys_parse_by_name() {
        for key in SettingKey::ALL {
            assert_eq!(key.as_str().parse::<SettingKey>().unwrap(), key);
        }
        assert!(matches!(
            "openai_api_key".parse::<SettingKey>(),
            Err(SettingsError::UnknownKey(_))
        ));
    }

    #[test]
    fn test_values_are_normalized_before_storing() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(
            write(&db, "rag_base_url", " https://rag.local/ ").unwrap(),
            "https://rag.local"
        );
        assert_eq!(write(&db, "member_id", "007").unwrap(), "7");
        assert_eq!(write(&db, "log_level", "DEBUG").unwrap(), "debug");
        assert_eq!(read(&db, SettingKey::LogLevel).as_deref(), Some("debug"));
    }

    #[test]
    fn test_invalid_values_leave_store_untouched() {
        let db = Database::open_in_memory().unwrap();
        write(&db, "member_id", "12").unwrap();

        assert!(matches!(
            write(&db, "member_id", "guest"),
            Err(SettingsError::InvalidValue {
                key: SettingKey::MemberId,
                ..
            })
        ));
        assert!(write(&db, "checklist_base_url", "localhost:8080").is_err());
        assert!(write(&db, "log_level", "loud").is_err());
        assert!(write(&db, "theme", "dark").is_err());

        assert_eq!(read(&db, SettingKey::MemberId).as_deref(), Some("12"));
        assert_eq!(read(&db, SettingKey::ChecklistBaseUrl), None);
    }

    #[test]
    fn test_read_all_skips_foreign_rows() {
        let db = Database::open_in_memory().unwrap();
        write(&db, "member_id", "3").unwrap();
        db.set_setting("legacy_theme", "dark").unwrap();

        let all = read_all(&db).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all["member_id"], "3");

        remove(&db, "member_id").unwrap();
        assert!(read_all(&db).unwrap().is_empty());
        assert!(remove(&db, "legacy_theme").is_err());
    }
}
