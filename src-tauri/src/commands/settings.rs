use crate::auth::{self, LoginGate};
use crate::db::Database;
use crate::settings;
use std::collections::BTreeMap;
use tauri::State;

#[tauri::command]
pub fn check_login(db: State<'_, Database>) -> LoginGate {
    auth::check_login(&db)
}

#[tauri::command]
pub fn get_settings(db: State<'_, Database>) -> Result<BTreeMap<String, String>, String> {
    settings::read_all(&db).map_err(|e| e.to_string())
}

/// Returns the stored, normalized value. Backend URLs are read once at
/// startup; changes apply after a restart.
#[tauri::command]
pub fn set_setting(db: State<'_, Database>, key: String, value: String) -> Result<String, String> {
    settings::write(&db, &key, &value).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn delete_setting(db: State<'_, Database>, key: String) -> Result<(), String> {
    settings::remove(&db, &key).map_err(|e| e.to_string())
}
