//! Settings menu controls
//!
//! Maps key presses to preference changes. All state lives in the store; the
//! menu only computes the next value and calls `set`.

use dicebox_audio::SfxCue;
use dicebox_services::{PreferenceKey, PreferenceStore};
use winit::keyboard::{Key, NamedKey};

/// How far one key press moves a volume slider
pub const VOLUME_STEP: f32 = 0.05;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MenuAction {
    MusicUp,
    MusicDown,
    EffectsUp,
    EffectsDown,
    NextResolution,
    PreviousResolution,
    CycleQuality,
    ToggleFullscreen,
    Reset,
    Save,
    SaveAndClose,
}

/// Whether the menu stays open after an action
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Flow {
    Stay,
    Close,
}

impl MenuAction {
    pub fn from_key(key: &Key) -> Option<Self> {
        match key {
            Key::Named(NamedKey::ArrowUp) => Some(MenuAction::MusicUp),
            Key::Named(NamedKey::ArrowDown) => Some(MenuAction::MusicDown),
            Key::Named(NamedKey::ArrowRight) => Some(MenuAction::EffectsUp),
            Key::Named(NamedKey::ArrowLeft) => Some(MenuAction::EffectsDown),
            Key::Named(NamedKey::PageUp) => Some(MenuAction::NextResolution),
            Key::Named(NamedKey::PageDown) => Some(MenuAction::PreviousResolution),
            Key::Named(NamedKey::Escape) => Some(MenuAction::SaveAndClose),
            Key::Character(c) => match c.to_ascii_lowercase().as_str() {
                "q" => Some(MenuAction::CycleQuality),
                "f" => Some(MenuAction::ToggleFullscreen),
                "r" => Some(MenuAction::Reset),
                "s" => Some(MenuAction::Save),
                _ => None,
            },
            _ => None,
        }
    }

    /// Cue the menu plays in response
    pub fn cue(self) -> SfxCue {
        match self {
            MenuAction::Reset | MenuAction::SaveAndClose => SfxCue::Cancel,
            MenuAction::Save => SfxCue::Play,
            _ => SfxCue::Click,
        }
    }

    pub fn apply(self, prefs: &mut PreferenceStore) -> Flow {
        match self {
            MenuAction::MusicUp => {
                prefs.set(PreferenceKey::MusicVolume, prefs.music_volume() + VOLUME_STEP)
            }
            MenuAction::MusicDown => {
                prefs.set(PreferenceKey::MusicVolume, prefs.music_volume() - VOLUME_STEP)
            }
            MenuAction::EffectsUp => {
                prefs.set(PreferenceKey::SfxVolume, prefs.sfx_volume() + VOLUME_STEP)
            }
            MenuAction::EffectsDown => {
                prefs.set(PreferenceKey::SfxVolume, prefs.sfx_volume() - VOLUME_STEP)
            }
            MenuAction::NextResolution => {
                let next = step(prefs.resolution_index(), prefs.resolutions().len(), true);
                prefs.set(PreferenceKey::ResolutionIndex, next);
            }
            MenuAction::PreviousResolution => {
                let next = step(prefs.resolution_index(), prefs.resolutions().len(), false);
                prefs.set(PreferenceKey::ResolutionIndex, next);
            }
            MenuAction::CycleQuality => {
                let next = step(prefs.quality_level(), prefs.quality_names().len(), true);
                prefs.set(PreferenceKey::QualityLevel, next);
            }
            MenuAction::ToggleFullscreen => {
                prefs.set(PreferenceKey::Fullscreen, !prefs.fullscreen())
            }
            MenuAction::Reset => prefs.reset_to_defaults(),
            MenuAction::Save => prefs.save(),
            MenuAction::SaveAndClose => {
                prefs.save();
                return Flow::Close;
            }
        }
        Flow::Stay
    }
}

/// Wrapping dropdown step; an empty list stays on 0.
fn step(current: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if forward {
        (current + 1) % len
    } else {
        (current + len - 1) % len
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dicebox_services::MemoryBackend;
    use winit::keyboard::SmolStr;

    fn prefs() -> PreferenceStore {
        let mut prefs = PreferenceStore::builder(MemoryBackend::new()).build();
        prefs.load();
        prefs
    }

    #[test]
    fn keys_map_to_actions() {
        assert_eq!(
            MenuAction::from_key(&Key::Named(NamedKey::Escape)),
            Some(MenuAction::SaveAndClose)
        );
        assert_eq!(
            MenuAction::from_key(&Key::Character(SmolStr::new("F"))),
            Some(MenuAction::ToggleFullscreen)
        );
        assert_eq!(MenuAction::from_key(&Key::Character(SmolStr::new("z"))), None);
    }

    #[test]
    fn volume_nudges_stop_at_bounds() {
        let mut prefs = prefs();
        for _ in 0..10 {
            MenuAction::MusicUp.apply(&mut prefs);
        }
        assert_eq!(prefs.music_volume(), 1.0);

        for _ in 0..30 {
            MenuAction::EffectsDown.apply(&mut prefs);
        }
        assert_eq!(prefs.sfx_volume(), 0.0);
    }

    #[test]
    fn toggles_and_closes() {
        let mut prefs = prefs();
        assert_eq!(MenuAction::ToggleFullscreen.apply(&mut prefs), Flow::Stay);
        assert!(!prefs.fullscreen());
        assert_eq!(MenuAction::Reset.apply(&mut prefs), Flow::Stay);
        assert!(prefs.fullscreen());
        assert_eq!(MenuAction::SaveAndClose.apply(&mut prefs), Flow::Close);
    }

    #[test]
    fn stepping_wraps() {
        assert_eq!(step(2, 3, true), 0);
        assert_eq!(step(0, 3, false), 2);
        assert_eq!(step(0, 0, true), 0);
    }
}
