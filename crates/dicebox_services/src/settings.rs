//! Settings management
//!
//! Preference keys, their typed values, and the domain each key accepts on
//! the current platform.

use crate::backend::StoredValue;
use crate::error::ValidationError;
use std::fmt;
use std::str::FromStr;

/// Default music and effects volume
pub const DEFAULT_VOLUME: f32 = 0.75;
/// Default fullscreen flag
pub const DEFAULT_FULLSCREEN: bool = true;

/// Identifier of a single persisted user setting
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PreferenceKey {
    MusicVolume,
    SfxVolume,
    ResolutionIndex,
    QualityLevel,
    Fullscreen,
}

impl PreferenceKey {
    /// Every key, in load and apply order
    pub const ALL: [PreferenceKey; 5] = [
        PreferenceKey::MusicVolume,
        PreferenceKey::SfxVolume,
        PreferenceKey::ResolutionIndex,
        PreferenceKey::QualityLevel,
        PreferenceKey::Fullscreen,
    ];

    /// Name of the key in the persisted key/value store
    pub const fn storage_key(self) -> &'static str {
        match self {
            PreferenceKey::MusicVolume => "MusicVolume",
            PreferenceKey::SfxVolume => "SFXVolume",
            PreferenceKey::ResolutionIndex => "ResolutionIndex",
            PreferenceKey::QualityLevel => "QualityLevel",
            PreferenceKey::Fullscreen => "Fullscreen",
        }
    }

    pub const fn kind(self) -> ValueKind {
        match self {
            PreferenceKey::MusicVolume | PreferenceKey::SfxVolume => ValueKind::Volume,
            PreferenceKey::ResolutionIndex | PreferenceKey::QualityLevel => ValueKind::Index,
            PreferenceKey::Fullscreen => ValueKind::Flag,
        }
    }
}

impl fmt::Display for PreferenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.storage_key())
    }
}

impl FromStr for PreferenceKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PreferenceKey::ALL
            .into_iter()
            .find(|key| key.storage_key() == s)
            .ok_or_else(|| ValidationError::UnknownKey(s.to_string()))
    }
}

/// Shape of the values a key accepts
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ValueKind {
    /// Float in 0.0..=1.0
    Volume,
    /// Index into a platform-provided list
    Index,
    Flag,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValueKind::Volume => "volume",
            ValueKind::Index => "index",
            ValueKind::Flag => "flag",
        })
    }
}

/// Typed preference value
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PreferenceValue {
    Volume(f32),
    Index(usize),
    Flag(bool),
}

impl PreferenceValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            PreferenceValue::Volume(_) => ValueKind::Volume,
            PreferenceValue::Index(_) => ValueKind::Index,
            PreferenceValue::Flag(_) => ValueKind::Flag,
        }
    }

    pub fn as_volume(&self) -> Option<f32> {
        match *self {
            PreferenceValue::Volume(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_index(&self) -> Option<usize> {
        match *self {
            PreferenceValue::Index(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match *self {
            PreferenceValue::Flag(b) => Some(b),
            _ => None,
        }
    }

    /// Encoding used by the persisted store: floats for volumes, ints otherwise
    pub fn to_stored(self) -> StoredValue {
        match self {
            PreferenceValue::Volume(v) => StoredValue::Float(v),
            PreferenceValue::Index(i) => StoredValue::Int(i64::try_from(i).unwrap_or(i64::MAX)),
            PreferenceValue::Flag(b) => StoredValue::Int(i64::from(b)),
        }
    }
}

impl From<f32> for PreferenceValue {
    fn from(v: f32) -> Self {
        PreferenceValue::Volume(v)
    }
}

impl From<usize> for PreferenceValue {
    fn from(i: usize) -> Self {
        PreferenceValue::Index(i)
    }
}

impl From<bool> for PreferenceValue {
    fn from(b: bool) -> Self {
        PreferenceValue::Flag(b)
    }
}

impl fmt::Display for PreferenceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreferenceValue::Volume(v) => write!(f, "{}%", volume_percent(*v)),
            PreferenceValue::Index(i) => write!(f, "#{i}"),
            PreferenceValue::Flag(b) => write!(f, "{b}"),
        }
    }
}

/// Volume as a whole percentage, the way the settings sliders label it
pub fn volume_percent(volume: f32) -> u32 {
    (volume.clamp(0.0, 1.0) * 100.0).round() as u32
}

/// Display mode reported by the platform
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ResolutionOption {
    pub width: u32,
    pub height: u32,
    pub refresh_rate_hz: u32,
}

impl ResolutionOption {
    pub const fn new(width: u32, height: u32, refresh_rate_hz: u32) -> Self {
        Self {
            width,
            height,
            refresh_rate_hz,
        }
    }

    pub fn matches_size(&self, width: u32, height: u32) -> bool {
        self.width == width && self.height == height
    }
}

impl fmt::Display for ResolutionOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {} @ {}Hz", self.width, self.height, self.refresh_rate_hz)
    }
}

/// Index of the last option with the given size, or 0 when none matches.
///
/// Platforms list modes in ascending refresh order, so the last match is the
/// fastest mode at that size.
pub fn detect_resolution_index(options: &[ResolutionOption], width: u32, height: u32) -> usize {
    options
        .iter()
        .rposition(|option| option.matches_size(width, height))
        .unwrap_or(0)
}

/// In-memory snapshot of every preference
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub graphics: GraphicsSettings,
    pub audio: AudioSettings,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphicsSettings {
    pub resolution_index: usize,
    pub quality_level: usize,
    pub fullscreen: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AudioSettings {
    pub music_volume: f32,
    pub sfx_volume: f32,
}

impl Settings {
    /// Documented defaults, given the platform's detected resolution and active tier
    pub fn platform_defaults(resolution_index: usize, quality_level: usize) -> Self {
        Self {
            graphics: GraphicsSettings {
                resolution_index,
                quality_level,
                fullscreen: DEFAULT_FULLSCREEN,
            },
            audio: AudioSettings {
                music_volume: DEFAULT_VOLUME,
                sfx_volume: DEFAULT_VOLUME,
            },
        }
    }

    pub fn get(&self, key: PreferenceKey) -> PreferenceValue {
        match key {
            PreferenceKey::MusicVolume => PreferenceValue::Volume(self.audio.music_volume),
            PreferenceKey::SfxVolume => PreferenceValue::Volume(self.audio.sfx_volume),
            PreferenceKey::ResolutionIndex => PreferenceValue::Index(self.graphics.resolution_index),
            PreferenceKey::QualityLevel => PreferenceValue::Index(self.graphics.quality_level),
            PreferenceKey::Fullscreen => PreferenceValue::Flag(self.graphics.fullscreen),
        }
    }

    /// Store `value` under `key`. Only the kind is checked here; range checks
    /// belong to [`Domain`].
    pub fn put(&mut self, key: PreferenceKey, value: PreferenceValue) -> Result<(), ValidationError> {
        match (key, value) {
            (PreferenceKey::MusicVolume, PreferenceValue::Volume(v)) => self.audio.music_volume = v,
            (PreferenceKey::SfxVolume, PreferenceValue::Volume(v)) => self.audio.sfx_volume = v,
            (PreferenceKey::ResolutionIndex, PreferenceValue::Index(i)) => {
                self.graphics.resolution_index = i
            }
            (PreferenceKey::QualityLevel, PreferenceValue::Index(i)) => self.graphics.quality_level = i,
            (PreferenceKey::Fullscreen, PreferenceValue::Flag(b)) => self.graphics.fullscreen = b,
            (key, _) => {
                return Err(ValidationError::WrongKind {
                    key,
                    expected: key.kind(),
                })
            }
        }
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::platform_defaults(0, 0)
    }
}

/// Valid values per key for the current platform
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Domain {
    pub resolution_count: usize,
    pub tier_count: usize,
}

impl Domain {
    pub fn new(resolution_count: usize, tier_count: usize) -> Self {
        Self {
            resolution_count,
            tier_count,
        }
    }

    /// Length of the list an index key points into
    pub fn index_len(&self, key: PreferenceKey) -> usize {
        match key {
            PreferenceKey::ResolutionIndex => self.resolution_count,
            PreferenceKey::QualityLevel => self.tier_count,
            _ => 0,
        }
    }

    fn check_index(&self, key: PreferenceKey, index: i64) -> Result<usize, ValidationError> {
        let len = self.index_len(key);
        // An empty list still admits the placeholder index 0.
        usize::try_from(index)
            .ok()
            .filter(|i| *i < len.max(1))
            .ok_or(ValidationError::IndexOutOfRange { key, index, len })
    }

    /// Check a value coming from a UI control. Volumes are clamped; anything
    /// else outside the domain is rejected.
    pub fn sanitize(
        &self,
        key: PreferenceKey,
        value: PreferenceValue,
    ) -> Result<PreferenceValue, ValidationError> {
        if value.kind() != key.kind() {
            return Err(ValidationError::WrongKind {
                key,
                expected: key.kind(),
            });
        }
        match value {
            PreferenceValue::Volume(v) if v.is_nan() => Err(ValidationError::NotFinite { key }),
            PreferenceValue::Volume(v) => Ok(PreferenceValue::Volume(v.clamp(0.0, 1.0))),
            PreferenceValue::Index(i) => self
                .check_index(key, i64::try_from(i).unwrap_or(i64::MAX))
                .map(PreferenceValue::Index),
            PreferenceValue::Flag(_) => Ok(value),
        }
    }

    /// Decode a persisted value. Nothing is clamped: out-of-domain values are
    /// rejected so the caller can fall back to the default.
    pub fn decode(
        &self,
        key: PreferenceKey,
        stored: StoredValue,
    ) -> Result<PreferenceValue, ValidationError> {
        match (key.kind(), stored) {
            (ValueKind::Volume, StoredValue::Float(v)) if (0.0..=1.0).contains(&v) => {
                Ok(PreferenceValue::Volume(v))
            }
            (ValueKind::Volume, StoredValue::Float(v)) if v.is_nan() => {
                Err(ValidationError::NotFinite { key })
            }
            (ValueKind::Volume, StoredValue::Float(v)) => {
                Err(ValidationError::VolumeOutOfRange { key, value: v })
            }
            (ValueKind::Index, StoredValue::Int(i)) => {
                self.check_index(key, i).map(PreferenceValue::Index)
            }
            (ValueKind::Flag, StoredValue::Int(0)) => Ok(PreferenceValue::Flag(false)),
            (ValueKind::Flag, StoredValue::Int(1)) => Ok(PreferenceValue::Flag(true)),
            (ValueKind::Flag, StoredValue::Int(value)) => {
                Err(ValidationError::InvalidFlag { key, value })
            }
            (expected, _) => Err(ValidationError::WrongKind { key, expected }),
        }
    }
}
