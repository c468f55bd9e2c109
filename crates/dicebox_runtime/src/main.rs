//! Dicebox Runtime
//!
//! Boots the settings menu: logging, configuration, window, preferences.
//!
//! Keys: Up/Down music volume, Left/Right effects volume, PageUp/PageDown
//! resolution, Q quality, F fullscreen, R reset, S save, Escape save & close.

mod app;
mod config;
mod menu;

use anyhow::Result;
use app::SettingsApp;
use config::RuntimeConfig;
use dicebox_render::window::create_event_loop;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    tracing::info!("Dicebox v{}", dicebox_services::VERSION);

    let config = RuntimeConfig::from_env();
    tracing::info!(path = %config.prefs_path.display(), "preferences file");

    let event_loop = create_event_loop()?;
    let mut app = SettingsApp::new(config);
    event_loop.run_app(&mut app)?;

    tracing::info!("Runtime shut down cleanly");
    Ok(())
}
