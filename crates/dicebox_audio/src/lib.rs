//! Dicebox Audio
//!
//! Music and effects channel volumes, and playback of the menu's sound cues.
//!
//! [`AudioMixer`] is a cheap cloneable handle: one clone is handed to the
//! preference store as its [`AudioSink`](dicebox_services::AudioSink), the
//! others drive playback.

pub mod mixer;
pub mod sfx;

pub use mixer::{AudioMixer, ClipId, Voice};
pub use sfx::{SfxCue, SoundBank, SoundEffects};
