//! Render quality tiers

use dicebox_services::{AdapterError, QualityAdapter};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Renderer parameters for one quality tier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityPreset {
    pub name: &'static str,
    pub msaa_samples: u32,
    pub shadow_map_size: u32,
    pub render_scale: f32,
    pub max_anisotropy: u16,
}

impl QualityPreset {
    const fn new(
        name: &'static str,
        msaa_samples: u32,
        shadow_map_size: u32,
        render_scale: f32,
        max_anisotropy: u16,
    ) -> Self {
        Self {
            name,
            msaa_samples,
            shadow_map_size,
            render_scale,
            max_anisotropy,
        }
    }
}

/// Built-in tiers, lowest first
pub const PRESETS: [QualityPreset; 6] = [
    QualityPreset::new("Very Low", 1, 0, 0.5, 1),
    QualityPreset::new("Low", 1, 512, 0.75, 1),
    QualityPreset::new("Medium", 2, 1024, 1.0, 2),
    QualityPreset::new("High", 4, 2048, 1.0, 4),
    QualityPreset::new("Very High", 4, 4096, 1.0, 8),
    QualityPreset::new("Ultra", 8, 4096, 1.0, 16),
];

/// Tier active before any preference is applied ("High")
pub const DEFAULT_TIER: usize = 3;

/// Shared handle to the active quality tier.
///
/// Clones see the same tier, so the renderer can hold one while the
/// preference store applies changes through another.
#[derive(Debug, Clone)]
pub struct QualitySettings {
    presets: Arc<[QualityPreset]>,
    active: Arc<AtomicUsize>,
}

impl QualitySettings {
    pub fn new() -> Self {
        Self::with_presets(PRESETS.to_vec(), DEFAULT_TIER)
    }

    /// `active` is clamped into the preset list.
    pub fn with_presets(presets: Vec<QualityPreset>, active: usize) -> Self {
        let active = active.min(presets.len().saturating_sub(1));
        Self {
            presets: presets.into(),
            active: Arc::new(AtomicUsize::new(active)),
        }
    }

    pub fn presets(&self) -> &[QualityPreset] {
        &self.presets
    }

    /// `None` only when there are no presets at all
    pub fn active_preset(&self) -> Option<QualityPreset> {
        self.presets.get(self.active.load(Ordering::Relaxed)).copied()
    }
}

impl Default for QualitySettings {
    fn default() -> Self {
        Self::new()
    }
}

impl QualityAdapter for QualitySettings {
    fn tier_names(&self) -> Vec<String> {
        self.presets.iter().map(|p| p.name.to_string()).collect()
    }

    fn apply_tier(&mut self, index: usize) -> Result<(), AdapterError> {
        let preset = self.presets.get(index).ok_or(AdapterError::NoSuchTier {
            index,
            available: self.presets.len(),
        })?;
        self.active.store(index, Ordering::Relaxed);
        tracing::info!(tier = preset.name, msaa = preset.msaa_samples, "quality tier applied");
        Ok(())
    }

    fn current_tier(&self) -> usize {
        self.active.load(Ordering::Relaxed)
    }
}
