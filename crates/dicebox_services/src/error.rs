//! Error taxonomy for the preference subsystem
//!
//! None of these reach callers of [`PreferenceStore`](crate::PreferenceStore):
//! the store logs them and degrades to defaults or in-memory-only behaviour.

use crate::settings::{PreferenceKey, ValueKind};
use std::path::PathBuf;
use thiserror::Error;

/// Failures of the persistent key/value store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read preferences from {}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write preferences to {}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("preferences file {} is corrupt", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to serialize preferences")]
    Serialize(#[from] serde_json::Error),

    #[error("preference '{key}' is not stored as {expected}")]
    TypeMismatch { key: String, expected: &'static str },

    #[error("preference storage unavailable: {0}")]
    Unavailable(String),
}

/// A value outside the domain of its key.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{key} must be a number, got NaN")]
    NotFinite { key: PreferenceKey },

    #[error("{key} volume {value} is outside 0.0..=1.0")]
    VolumeOutOfRange { key: PreferenceKey, value: f32 },

    #[error("{key} index {index} is outside 0..{len}")]
    IndexOutOfRange {
        key: PreferenceKey,
        index: i64,
        len: usize,
    },

    #[error("{key} flag must be 0 or 1, got {value}")]
    InvalidFlag { key: PreferenceKey, value: i64 },

    #[error("{key} expects a {expected} value")]
    WrongKind {
        key: PreferenceKey,
        expected: ValueKind,
    },

    #[error("unknown preference '{0}'")]
    UnknownKey(String),
}

/// A dependent subsystem refused to apply a preference.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdapterError {
    #[error("resolution index {index} out of range ({available} available)")]
    NoSuchResolution { index: usize, available: usize },

    #[error("quality tier {index} out of range ({available} available)")]
    NoSuchTier { index: usize, available: usize },

    #[error("window is not on any monitor")]
    NoMonitor,
}
