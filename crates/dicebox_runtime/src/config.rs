//! Runtime configuration

use dicebox_render::window::WindowConfig;
use std::ffi::OsString;
use std::path::PathBuf;

/// Overrides where preferences are stored
pub const PREFS_PATH_ENV: &str = "DICEBOX_PREFS_PATH";

pub struct RuntimeConfig {
    pub prefs_path: PathBuf,
    pub window: WindowConfig,
}

impl RuntimeConfig {
    pub fn from_env() -> Self {
        Self::with_prefs_override(std::env::var_os(PREFS_PATH_ENV))
    }

    fn with_prefs_override(prefs_override: Option<OsString>) -> Self {
        let prefs_path = prefs_override
            .filter(|path| !path.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_prefs_path);

        Self {
            prefs_path,
            window: WindowConfig::default(),
        }
    }
}

/// `<config dir>/dicebox/prefs.json`, or `./prefs.json` without a config dir
pub fn default_prefs_path() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("dicebox"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("prefs.json")
}
