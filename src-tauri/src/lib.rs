pub mod api;
pub mod auth;
pub mod chat;
pub mod checklist;
pub mod db;
pub mod instances;
pub mod settings;

#[cfg(feature = "desktop")]
mod commands;

#[cfg(feature = "desktop")]
pub use desktop::run;

#[cfg(feature = "desktop")]
mod desktop {
    use crate::api::checklist::ChecklistClient;
    use crate::api::rag::RagClient;
    use crate::api::ApiConfig;
    use crate::chat::ChatHub;
    use crate::checklist::ChecklistHub;
    use crate::commands;
    use crate::db::Database;
    use crate::settings::{self, SettingKey};
    use log::info;
    use tauri::Manager;

    fn level_from_setting(db: &Database) -> log::LevelFilter {
        settings::read(db, SettingKey::LogLevel)
            .and_then(|v| v.parse().ok())
            .unwrap_or(log::LevelFilter::Info)
    }

    #[cfg_attr(mobile, tauri::mobile_entry_point)]
    pub fn run() {
        tauri::Builder::default()
            .plugin(tauri_plugin_dialog::init())
            .plugin(
                tauri_plugin_log::Builder::new()
                    .target(tauri_plugin_log::Target::new(
                        tauri_plugin_log::TargetKind::LogDir {
                            file_name: Some("home-scanner.log".into()),
                        },
                    ))
                    .target(tauri_plugin_log::Target::new(
                        tauri_plugin_log::TargetKind::Stdout,
                    ))
                    .level(log::LevelFilter::Trace)
                    .build(),
            )
            .setup(|app| {
                let app_dir = app.path().app_data_dir()?;
                let database = Database::new(&app_dir)?;
                log::set_max_level(level_from_setting(&database));

                let config = ApiConfig::from_settings(&database);
                info!(
                    "[startup] rag backend {}, checklist backend {}",
                    config.rag_base_url, config.checklist_base_url
                );
                app.manage(ChatHub::new(RagClient::new(config.rag_base_url)));
                app.manage(ChecklistHub::new(ChecklistClient::new(
                    config.checklist_base_url,
                )));
                app.manage(database);
                Ok(())
            })
            .invoke_handler(tauri::generate_handler![
                commands::log_from_frontend,
                commands::settings::check_login,
                commands::settings::get_settings,
                commands::settings::set_setting,
                commands::settings::delete_setting,
                commands::chat::chat_mount,
                commands::chat::chat_unmount,
                commands::chat::chat_view,
                commands::chat::chat_toggle_open,
                commands::chat::chat_set_draft,
                commands::chat::chat_key,
                commands::chat::chat_submit,
                commands::chat::chat_toggle_references,
                commands::checklist::checklist_mount,
                commands::checklist::checklist_unmount,
                commands::checklist::checklist_view,
                commands::checklist::checklist_set_done,
                commands::checklist::checklist_set_not_done,
                commands::checklist::checklist_reset,
                commands::checklist::checklist_save,
            ])
            .run(tauri::generate_context!())
            .expect("error while running tauri application");
    }
}
