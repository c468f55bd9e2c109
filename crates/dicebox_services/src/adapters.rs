//! Subsystems the preference store applies values to
//!
//! The store owns none of these; each is a narrow capability implemented by
//! the audio and render crates (or by test doubles).

use crate::error::AdapterError;
use crate::settings::ResolutionOption;

/// Audio output volumes
pub trait AudioSink {
    fn set_music_volume(&mut self, volume: f32);

    /// Players still read the effects volume from the store when they start
    /// a clip; this only keeps voices already playing in step.
    fn set_effects_volume(&mut self, volume: f32);
}

/// Display mode control
pub trait DisplayAdapter {
    /// Modes available on the current display, in the platform's order
    fn list_resolutions(&self) -> Vec<ResolutionOption>;

    fn apply_resolution(&mut self, index: usize, fullscreen: bool) -> Result<(), AdapterError>;

    fn current_width(&self) -> u32;

    fn current_height(&self) -> u32;
}

/// Render quality tiers
pub trait QualityAdapter {
    fn tier_names(&self) -> Vec<String>;

    fn apply_tier(&mut self, index: usize) -> Result<(), AdapterError>;

    fn current_tier(&self) -> usize;
}
