use tauri::Manager;

mod app;
mod bridge;
mod config;
mod error;
mod links;
mod logging;
mod notifications;

use bridge::Bridge;
use notifications::SharedHostState;

pub fn run() {
    tauri::Builder::default()
        // Must be registered first so a second launch exits before doing any work.
        .plugin(tauri_plugin_single_instance::init(|app, _argv, _cwd| {
            app::window::show_main(app);
        }))
        .plugin(tauri_plugin_store::Builder::default().build())
        .plugin(tauri_plugin_opener::init())
        .manage(Bridge::new())
        .manage(SharedHostState::default())
        .on_window_event(app::events::handle_window_event)
        .invoke_handler(tauri::generate_handler![bridge::relay::bridge_message])
        .setup(|app| {
            if let Err(e) = logging::init_logging(app.handle()) {
                eprintln!("Failed to initialize logging: {}", e);
            }

            config::load_from_store(app.handle());
            notifications::native::init(app.handle());

            let bridge = app.state::<Bridge>();
            app::window::create_main_window(app.handle(), bridge.inner())?;
            app::tray::init(app)?;

            Ok(())
        })
        .build(tauri::generate_context!())
        .expect("error while building tauri application")
        .run(app::events::handle_run_event);
}
