pub mod config;
pub mod dashboard;
pub mod metrics;
pub mod models;
pub mod session;
pub mod settings;
pub mod store;

#[cfg(feature = "desktop")]
use session::SessionController;

/// File under the app data directory holding the remembered identity.
pub const SETTINGS_FILENAME: &str = "settings.json";

#[cfg(feature = "desktop")]
pub struct AppState {
    pub session: SessionController,
}

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use std::sync::Arc;

    use config::AppConfig;
    use session::{commands::*, SessionOptions};
    use settings::JsonFileStore;
    use tauri::Manager;

    // Reads RUST_LOG, defaulting to info.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Callboard starting up...");

    tauri::Builder::default()
        .setup(|app| {
            let result = (|| -> anyhow::Result<()> {
                let app_data_dir = app
                    .path()
                    .app_data_dir()
                    .map_err(|err| anyhow::anyhow!(err))?;
                std::fs::create_dir_all(&app_data_dir)?;

                let config = AppConfig::from_env();
                let store = store::from_config(&config)?;
                let identity_store = JsonFileStore::new(app_data_dir.join(SETTINGS_FILENAME))?;

                let controller = SessionController::new(
                    store,
                    Arc::new(identity_store),
                    Arc::new(app.handle().clone()),
                    SessionOptions {
                        remote_timeout: config.remote_timeout,
                        ..SessionOptions::default()
                    },
                );

                // Load the remembered user's data without blocking window creation.
                let restorer = controller.clone();
                tauri::async_runtime::spawn(async move {
                    restorer.restore().await;
                });

                app.manage(AppState {
                    session: controller,
                });

                Ok(())
            })();

            result.map_err(|err| err.into())
        })
        .invoke_handler(tauri::generate_handler![
            get_dashboard,
            request_edit,
            submit_email,
            cancel_email_capture,
            edit_field,
            cancel_edit,
            request_save,
            confirm_overwrite,
            cancel_overwrite,
            dismiss_notification,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    fn shell_json(contents: &str) -> Value {
        serde_json::from_str(contents).unwrap()
    }

    #[test]
    fn webview_runs_under_restrictive_csp() {
        let config = shell_json(include_str!("../tauri.conf.json"));
        let csp = config["app"]["security"]["csp"].as_str().unwrap();

        assert!(csp.contains("default-src 'self'"));
        assert!(csp.contains("script-src 'self'"));
        assert!(!csp.contains("unsafe-inline"));
    }

    #[test]
    fn main_window_may_listen_for_session_events() {
        let config = shell_json(include_str!("../tauri.conf.json"));
        let capability = shell_json(include_str!("../capabilities/default.json"));

        assert_eq!(config["app"]["windows"][0]["label"], "main");
        assert_eq!(capability["windows"][0], "main");
        let permissions = capability["permissions"].as_array().unwrap();
        assert!(permissions.iter().any(|p| p == "core:default"));
    }
}
