use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

use chame_bridge::api;
use chame_bridge::demo::MemoryBackend;
use chame_bridge::events::{LogLevel, UiEvent};
use chame_bridge::paths;
use chame_bridge::reverse::UiLink;
use chame_bridge::state::AppState;

fn level_label(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Debug => "debug",
        LogLevel::Info => "info",
        LogLevel::Warn => "warn",
        LogLevel::Error => "error",
    }
}

#[tokio::main]
async fn main() {
    let app_config_dir = paths::app_config_dir();
    if let Err(e) = std::fs::create_dir_all(&app_config_dir) {
        eprintln!(
            "[Chame] failed to create config dir {}: {e}",
            app_config_dir.display()
        );
    }

    let (ui, mut ui_events) = UiLink::channel();
    let state = Arc::new(AppState::new(
        Box::new(MemoryBackend::new()),
        ui,
        app_config_dir.clone(),
    ));

    match api::start_api_server(state.clone()).await {
        Ok(port) => {
            state.api_port.store(port, Ordering::Relaxed);

            // Write port file to app config dir for external tool discovery
            let port_file = paths::port_file_path(&app_config_dir);
            let _ = std::fs::write(&port_file, port.to_string());

            eprintln!("[Chame] API server listening on http://127.0.0.1:{port}");
        }
        Err(e) => {
            eprintln!("[Chame] {e}");
            std::process::exit(1);
        }
    }

    // UI main loop: the single consumer of the reverse channel, so UI state
    // is only ever touched from here.
    while let Some(event) = ui_events.recv().await {
        match event {
            UiEvent::Log { level, message } => {
                eprintln!("[Chame] {}: {message}", level_label(level));
            }
            UiEvent::Progress {
                operation,
                progress,
                detail,
            } => {
                let percent = (progress * 100.0).round();
                match detail {
                    Some(detail) => eprintln!("[Chame] {operation}: {percent}% ({detail})"),
                    None => eprintln!("[Chame] {operation}: {percent}%"),
                }
            }
            UiEvent::Notification { text, kind } => {
                state.with_notifications_mut(|host| {
                    host.show(text.clone(), kind, Instant::now());
                });
                eprintln!("[Chame] notification ({kind:?}): {text}");
            }
        }
    }
}
