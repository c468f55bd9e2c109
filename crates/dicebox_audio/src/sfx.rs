//! Menu sound cues
//!
//! The effects volume is read from the preference store at the moment a cue
//! starts, never cached here.

use crate::mixer::{AudioMixer, ClipId};
use dicebox_services::PreferenceStore;
use std::collections::HashMap;

/// Sounds the menus and dice table trigger
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SfxCue {
    Hover,
    Click,
    DiceRoll,
    Cancel,
    Play,
    NameField,
}

impl SfxCue {
    pub const ALL: [SfxCue; 6] = [
        SfxCue::Hover,
        SfxCue::Click,
        SfxCue::DiceRoll,
        SfxCue::Cancel,
        SfxCue::Play,
        SfxCue::NameField,
    ];

    /// The dice keep rattling until stopped; everything else plays once.
    pub fn is_looping(self) -> bool {
        matches!(self, SfxCue::DiceRoll)
    }
}

/// Which clip each cue plays. Cues without a clip are silent.
#[derive(Debug, Clone, Default)]
pub struct SoundBank {
    clips: HashMap<SfxCue, ClipId>,
}

impl SoundBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clips 0..6 in [`SfxCue::ALL`] order, the layout of the menu's clip table
    pub fn menu_defaults() -> Self {
        SfxCue::ALL
            .into_iter()
            .zip(0u32..)
            .fold(Self::new(), |bank, (cue, id)| bank.with_clip(cue, ClipId(id)))
    }

    pub fn with_clip(mut self, cue: SfxCue, clip: ClipId) -> Self {
        self.clips.insert(cue, clip);
        self
    }

    pub fn clip(&self, cue: SfxCue) -> Option<ClipId> {
        self.clips.get(&cue).copied()
    }
}

/// Plays cues on the effects channel at the current effects volume
#[derive(Debug, Clone)]
pub struct SoundEffects {
    bank: SoundBank,
    mixer: AudioMixer,
}

impl SoundEffects {
    pub fn new(bank: SoundBank, mixer: AudioMixer) -> Self {
        Self { bank, mixer }
    }

    /// Returns false when the cue has no clip assigned.
    pub fn play(&self, cue: SfxCue, prefs: &PreferenceStore) -> bool {
        let Some(clip) = self.bank.clip(cue) else {
            tracing::debug!(?cue, "no clip for cue");
            return false;
        };

        let volume = prefs.sfx_volume();
        if cue.is_looping() {
            self.mixer.play_looping(clip, volume);
        } else {
            self.mixer.play_one_shot(clip, volume);
        }
        true
    }

    pub fn stop_dice(&self) {
        self.mixer.stop_loop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dicebox_services::{MemoryBackend, PreferenceKey};

    fn prefs_with_mixer(mixer: &AudioMixer) -> PreferenceStore {
        let mut prefs = PreferenceStore::builder(MemoryBackend::new())
            .audio(mixer.clone())
            .build();
        prefs.load();
        prefs
    }

    #[test]
    fn one_shots_use_volume_at_play_time() {
        let mixer = AudioMixer::new();
        let mut prefs = prefs_with_mixer(&mixer);
        let sfx = SoundEffects::new(SoundBank::menu_defaults(), mixer.clone());

        assert!(sfx.play(SfxCue::Click, &prefs));
        prefs.set(PreferenceKey::SfxVolume, 0.2f32);
        assert!(sfx.play(SfxCue::Hover, &prefs));

        let gains: Vec<_> = mixer.take_one_shots().iter().map(|v| (v.clip, v.gain)).collect();
        assert_eq!(gains, vec![(ClipId(1), 0.75), (ClipId(0), 0.2)]);
    }

    #[test]
    fn dice_roll_loops_until_stopped() {
        let mixer = AudioMixer::new();
        let prefs = prefs_with_mixer(&mixer);
        let sfx = SoundEffects::new(SoundBank::menu_defaults(), mixer.clone());

        sfx.play(SfxCue::DiceRoll, &prefs);
        let voice = mixer.looping().unwrap();
        assert_eq!(voice.clip, ClipId(2));
        assert!(voice.looping);
        assert!(mixer.take_one_shots().is_empty());

        sfx.stop_dice();
        assert!(mixer.looping().is_none());
    }

    #[test]
    fn store_pushes_volumes_to_mixer() {
        let mixer = AudioMixer::new();
        let mut prefs = prefs_with_mixer(&mixer);
        assert_eq!(mixer.music_volume(), 0.75);

        prefs.set(PreferenceKey::MusicVolume, 0.1f32);
        assert_eq!(mixer.music_volume(), 0.1);
    }

    #[test]
    fn missing_clip_is_silent() {
        let mixer = AudioMixer::new();
        let prefs = prefs_with_mixer(&mixer);
        let sfx = SoundEffects::new(SoundBank::new().with_clip(SfxCue::Play, ClipId(9)), mixer.clone());

        assert!(!sfx.play(SfxCue::NameField, &prefs));
        assert!(sfx.play(SfxCue::Play, &prefs));
        assert_eq!(mixer.take_one_shots().len(), 1);
    }
}
