//! Dicebox Render System
//!
//! Window setup plus the display and quality adapters the preference store
//! applies graphics settings through.

pub mod display;
pub mod quality;
pub mod window;

pub use display::WinitDisplay;
pub use quality::{QualityPreset, QualitySettings};
pub use winit;
