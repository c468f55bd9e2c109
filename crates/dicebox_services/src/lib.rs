//! Dicebox Services Layer
//!
//! Platform-facing services for the game: persisted user preferences and the
//! adapters they are applied through.
//!
//! ```ignore
//! use dicebox_services::{JsonFileBackend, PreferenceKey, PreferenceStore};
//!
//! let mut prefs = PreferenceStore::builder(JsonFileBackend::open("prefs.json"))
//!     .audio(mixer.clone())
//!     .display(display)
//!     .quality(quality.clone())
//!     .build();
//! prefs.load();
//! prefs.set(PreferenceKey::MusicVolume, 0.5f32);
//! prefs.save();
//! ```

pub mod adapters;
pub mod backend;
pub mod error;
pub mod settings;
pub mod store;

pub use adapters::{AudioSink, DisplayAdapter, QualityAdapter};
pub use backend::{JsonFileBackend, MemoryBackend, PrefsBackend, StoredValue};
pub use error::{AdapterError, StorageError, ValidationError};
pub use settings::{
    volume_percent, PreferenceKey, PreferenceValue, ResolutionOption, Settings, DEFAULT_FULLSCREEN,
    DEFAULT_VOLUME,
};
pub use store::{ObserverId, PreferenceStore, PreferenceStoreBuilder};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
