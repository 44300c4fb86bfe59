pub mod chat;
pub mod checklist;
pub mod settings;

use log::{error, info, warn};

#[tauri::command]
pub fn log_from_frontend(level: String, message: String) {
    match level.as_str() {
        "error" => error!("[frontend] {}", message),
        "warn" => warn!("[frontend] {}", message),
        _ => info!("[frontend] {}", message),
    }
}
