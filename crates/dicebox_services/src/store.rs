//! Preference store
//!
//! Single source of truth for user preferences. Every change goes through
//! [`PreferenceStore::set`], which validates the value, updates the cache,
//! applies it to the owning subsystem and writes it through to the backend.
//!
//! ## Lifecycle
//!
//! 1. [`PreferenceStore::builder`] wires the backend and adapters and snapshots
//!    the platform's resolution and quality lists.
//! 2. [`PreferenceStore::load`] runs once, before any UI binds to the values.
//! 3. [`PreferenceStore::save`] is called from an explicit "apply & close";
//!    nothing is autosaved.

use crate::adapters::{AudioSink, DisplayAdapter, QualityAdapter};
use crate::backend::{PrefsBackend, StoredValue};
use crate::error::ValidationError;
use crate::settings::{
    detect_resolution_index, Domain, PreferenceKey, PreferenceValue, ResolutionOption, Settings,
    ValueKind,
};

/// Handle returned by [`PreferenceStore::observe`]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Observer = Box<dyn FnMut(PreferenceKey, PreferenceValue)>;

/// Wires a backend and the dependent subsystems into a [`PreferenceStore`].
pub struct PreferenceStoreBuilder {
    backend: Box<dyn PrefsBackend>,
    audio: Option<Box<dyn AudioSink>>,
    display: Option<Box<dyn DisplayAdapter>>,
    quality: Option<Box<dyn QualityAdapter>>,
}

impl PreferenceStoreBuilder {
    pub fn audio(mut self, audio: impl AudioSink + 'static) -> Self {
        self.audio = Some(Box::new(audio));
        self
    }

    pub fn display(mut self, display: impl DisplayAdapter + 'static) -> Self {
        self.display = Some(Box::new(display));
        self
    }

    pub fn quality(mut self, quality: impl QualityAdapter + 'static) -> Self {
        self.quality = Some(Box::new(quality));
        self
    }

    pub fn build(self) -> PreferenceStore {
        let (resolutions, detected) = match &self.display {
            Some(display) => {
                let resolutions = display.list_resolutions();
                let detected = detect_resolution_index(
                    &resolutions,
                    display.current_width(),
                    display.current_height(),
                );
                (resolutions, detected)
            }
            None => (Vec::new(), 0),
        };

        let (tier_names, active_tier) = match &self.quality {
            Some(quality) => (quality.tier_names(), quality.current_tier()),
            None => (Vec::new(), 0),
        };
        let active_tier = if active_tier < tier_names.len() {
            active_tier
        } else {
            if !tier_names.is_empty() {
                tracing::warn!(
                    tier = active_tier,
                    tiers = tier_names.len(),
                    "platform reports an unknown quality tier; defaulting to 0"
                );
            }
            0
        };

        let domain = Domain::new(resolutions.len(), tier_names.len());
        let defaults = Settings::platform_defaults(detected, active_tier);

        tracing::debug!(
            resolutions = resolutions.len(),
            tiers = tier_names.len(),
            default_resolution = detected,
            default_tier = active_tier,
            "preference store built"
        );

        PreferenceStore {
            backend: self.backend,
            audio: self.audio,
            display: self.display,
            quality: self.quality,
            resolutions,
            tier_names,
            domain,
            cache: defaults.clone(),
            defaults,
            loaded: false,
            observers: Vec::new(),
            next_observer: 0,
        }
    }
}

/// Process-wide user preferences, passed by reference to whoever needs them.
pub struct PreferenceStore {
    backend: Box<dyn PrefsBackend>,
    audio: Option<Box<dyn AudioSink>>,
    display: Option<Box<dyn DisplayAdapter>>,
    quality: Option<Box<dyn QualityAdapter>>,
    resolutions: Vec<ResolutionOption>,
    tier_names: Vec<String>,
    domain: Domain,
    defaults: Settings,
    cache: Settings,
    loaded: bool,
    observers: Vec<(ObserverId, Observer)>,
    next_observer: u64,
}

impl PreferenceStore {
    pub fn builder(backend: impl PrefsBackend + 'static) -> PreferenceStoreBuilder {
        PreferenceStoreBuilder {
            backend: Box::new(backend),
            audio: None,
            display: None,
            quality: None,
        }
    }

    /// Read every key from the backend and apply it to its subsystem.
    ///
    /// Missing, unreadable and out-of-domain values silently become defaults.
    /// Only the first call per store has any effect.
    pub fn load(&mut self) {
        if self.loaded {
            tracing::warn!("preferences already loaded; ignoring repeated load");
            return;
        }
        self.loaded = true;

        // Cache everything first so the display sees a consistent
        // resolution/fullscreen pair when it is applied.
        for key in PreferenceKey::ALL {
            let value = self
                .read_persisted(key)
                .unwrap_or_else(|| self.defaults.get(key));
            if let Err(err) = self.cache.put(key, value) {
                tracing::warn!(error = %err, "keeping default");
            }
        }

        for key in PreferenceKey::ALL {
            self.apply(key);
        }

        tracing::info!(settings = ?self.cache, "preferences loaded");
    }

    /// Validate, cache, apply and write through a single preference.
    ///
    /// Volumes are clamped to 0.0..=1.0. NaN volumes and out-of-range indices
    /// are replaced by the key's default. A value of the wrong kind for the
    /// key is ignored.
    pub fn set(&mut self, key: PreferenceKey, value: impl Into<PreferenceValue>) {
        let value = match self.domain.sanitize(key, value.into()) {
            Ok(value) => value,
            Err(err @ ValidationError::WrongKind { .. }) => {
                tracing::warn!(error = %err, "ignoring preference change");
                return;
            }
            Err(err) => {
                let fallback = self.defaults.get(key);
                tracing::warn!(error = %err, %fallback, "replacing invalid preference with default");
                fallback
            }
        };

        if let Err(err) = self.cache.put(key, value) {
            tracing::warn!(error = %err, "ignoring preference change");
            return;
        }
        self.apply(key);
        self.write_through(key, value);

        for (_, observer) in &mut self.observers {
            observer(key, value);
        }
    }

    /// Current cached value. Never touches the backend.
    pub fn get(&self, key: PreferenceKey) -> PreferenceValue {
        self.cache.get(key)
    }

    /// Set every key back to its default, one `set` at a time.
    pub fn reset_to_defaults(&mut self) {
        tracing::info!("resetting preferences to defaults");
        for key in PreferenceKey::ALL {
            let value = self.defaults.get(key);
            self.set(key, value);
        }
    }

    /// Flush the backend. Failures are logged; the cache stays authoritative.
    pub fn save(&mut self) {
        match self.backend.flush() {
            Ok(()) => tracing::debug!("preferences saved"),
            Err(err) => tracing::warn!(error = %err, "failed to save preferences"),
        }
    }

    /// Register a callback run after every committed `set`.
    pub fn observe(&mut self, observer: impl FnMut(PreferenceKey, PreferenceValue) + 'static) -> ObserverId {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Returns false when `id` was not registered.
    pub fn unobserve(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    pub fn music_volume(&self) -> f32 {
        self.cache.audio.music_volume
    }

    pub fn sfx_volume(&self) -> f32 {
        self.cache.audio.sfx_volume
    }

    pub fn resolution_index(&self) -> usize {
        self.cache.graphics.resolution_index
    }

    pub fn quality_level(&self) -> usize {
        self.cache.graphics.quality_level
    }

    pub fn fullscreen(&self) -> bool {
        self.cache.graphics.fullscreen
    }

    /// The selected display mode, if the display reported any
    pub fn resolution(&self) -> Option<&ResolutionOption> {
        self.resolutions.get(self.cache.graphics.resolution_index)
    }

    pub fn resolutions(&self) -> &[ResolutionOption] {
        &self.resolutions
    }

    pub fn quality_names(&self) -> &[String] {
        &self.tier_names
    }

    pub fn settings(&self) -> &Settings {
        &self.cache
    }

    pub fn defaults(&self) -> &Settings {
        &self.defaults
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn backend(&self) -> &dyn PrefsBackend {
        self.backend.as_ref()
    }

    /// Tear the store down, keeping its backend (e.g. to build a fresh store on it).
    pub fn into_backend(self) -> Box<dyn PrefsBackend> {
        self.backend
    }

    fn read_persisted(&self, key: PreferenceKey) -> Option<PreferenceValue> {
        let name = key.storage_key();
        let stored = match key.kind() {
            ValueKind::Volume => self
                .backend
                .get_float(name)
                .map(|v| v.map(StoredValue::Float)),
            ValueKind::Index | ValueKind::Flag => {
                self.backend.get_int(name).map(|v| v.map(StoredValue::Int))
            }
        };

        match stored {
            Ok(Some(stored)) => match self.domain.decode(key, stored) {
                Ok(value) => Some(value),
                Err(err) => {
                    tracing::warn!(error = %err, "discarding persisted preference");
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                tracing::warn!(%key, error = %err, "failed to read preference; using default");
                None
            }
        }
    }

    fn write_through(&mut self, key: PreferenceKey, value: PreferenceValue) {
        let name = key.storage_key();
        let result = match value.to_stored() {
            StoredValue::Float(v) => self.backend.set_float(name, v),
            StoredValue::Int(v) => self.backend.set_int(name, v),
        };
        if let Err(err) = result {
            tracing::warn!(%key, error = %err, "failed to persist preference");
        }
    }

    fn apply(&mut self, key: PreferenceKey) {
        match key {
            PreferenceKey::MusicVolume => match self.audio.as_mut() {
                Some(audio) => audio.set_music_volume(self.cache.audio.music_volume),
                None => tracing::debug!(%key, "no audio sink; skipping apply"),
            },
            PreferenceKey::SfxVolume => match self.audio.as_mut() {
                Some(audio) => audio.set_effects_volume(self.cache.audio.sfx_volume),
                None => tracing::debug!(%key, "no audio sink; skipping apply"),
            },
            PreferenceKey::ResolutionIndex | PreferenceKey::Fullscreen => {
                let Some(display) = self.display.as_mut() else {
                    tracing::debug!(%key, "no display adapter; skipping apply");
                    return;
                };
                if self.resolutions.is_empty() {
                    tracing::debug!(%key, "display reported no resolutions; skipping apply");
                    return;
                }
                let graphics = &self.cache.graphics;
                if let Err(err) = display.apply_resolution(graphics.resolution_index, graphics.fullscreen) {
                    tracing::warn!(%key, error = %err, "display rejected preference");
                }
            }
            PreferenceKey::QualityLevel => {
                let Some(quality) = self.quality.as_mut() else {
                    tracing::debug!(%key, "no quality adapter; skipping apply");
                    return;
                };
                if self.tier_names.is_empty() {
                    tracing::debug!(%key, "platform reported no quality tiers; skipping apply");
                    return;
                }
                if let Err(err) = quality.apply_tier(self.cache.graphics.quality_level) {
                    tracing::warn!(%key, error = %err, "quality adapter rejected preference");
                }
            }
        }
    }
}
