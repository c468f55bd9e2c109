//! Channel volumes and active voices

use dicebox_services::AudioSink;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// One-shots not yet picked up by the output stage are dropped oldest-first
/// beyond this many.
pub const MAX_QUEUED_ONE_SHOTS: usize = 32;

/// Opaque id of a loaded audio clip
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ClipId(pub u32);

/// A clip scheduled on the effects channel
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Voice {
    pub clip: ClipId,
    pub gain: f32,
    pub looping: bool,
}

#[derive(Debug)]
struct MixerState {
    music_volume: f32,
    effects_volume: f32,
    music: Option<ClipId>,
    looped: Option<Voice>,
    one_shots: VecDeque<Voice>,
}

impl Default for MixerState {
    fn default() -> Self {
        Self {
            music_volume: 1.0,
            effects_volume: 1.0,
            music: None,
            looped: None,
            one_shots: VecDeque::new(),
        }
    }
}

/// Shared handle to the mixer state
#[derive(Debug, Clone, Default)]
pub struct AudioMixer {
    state: Arc<Mutex<MixerState>>,
}

impl AudioMixer {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MixerState> {
        // A panic elsewhere must not take the audio down with it.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn music_volume(&self) -> f32 {
        self.state().music_volume
    }

    pub fn effects_volume(&self) -> f32 {
        self.state().effects_volume
    }

    /// Start the background track, replacing the current one
    pub fn play_music(&self, clip: ClipId) {
        tracing::debug!(?clip, "playing music");
        self.state().music = Some(clip);
    }

    pub fn music(&self) -> Option<ClipId> {
        self.state().music
    }

    /// Queue a clip that plays once at `volume`
    pub fn play_one_shot(&self, clip: ClipId, volume: f32) {
        let mut state = self.state();
        if state.one_shots.len() == MAX_QUEUED_ONE_SHOTS {
            state.one_shots.pop_front();
        }
        state.one_shots.push_back(Voice {
            clip,
            gain: volume.clamp(0.0, 1.0),
            looping: false,
        });
    }

    /// Start a looping effect, replacing any loop already playing
    pub fn play_looping(&self, clip: ClipId, volume: f32) {
        self.state().looped = Some(Voice {
            clip,
            gain: volume.clamp(0.0, 1.0),
            looping: true,
        });
    }

    pub fn stop_loop(&self) {
        self.state().looped = None;
    }

    pub fn looping(&self) -> Option<Voice> {
        self.state().looped
    }

    /// Hand queued one-shots to the output stage
    pub fn take_one_shots(&self) -> Vec<Voice> {
        self.state().one_shots.drain(..).collect()
    }
}

impl AudioSink for AudioMixer {
    fn set_music_volume(&mut self, volume: f32) {
        self.state().music_volume = volume;
    }

    fn set_effects_volume(&mut self, volume: f32) {
        let mut state = self.state();
        state.effects_volume = volume;
        if let Some(voice) = state.looped.as_mut() {
            voice.gain = volume;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let mixer = AudioMixer::new();
        let mut sink = mixer.clone();
        sink.set_music_volume(0.4);
        assert_eq!(mixer.music_volume(), 0.4);
    }

    #[test]
    fn effects_volume_follows_running_loop() {
        let mut mixer = AudioMixer::new();
        mixer.play_looping(ClipId(2), 0.8);
        mixer.set_effects_volume(0.3);
        assert_eq!(mixer.looping().map(|v| v.gain), Some(0.3));

        mixer.stop_loop();
        assert!(mixer.looping().is_none());
    }

    #[test]
    fn one_shot_queue_is_bounded() {
        let mixer = AudioMixer::new();
        for i in 0..(MAX_QUEUED_ONE_SHOTS as u32 + 5) {
            mixer.play_one_shot(ClipId(i), 1.0);
        }
        let voices = mixer.take_one_shots();
        assert_eq!(voices.len(), MAX_QUEUED_ONE_SHOTS);
        assert_eq!(voices[0].clip, ClipId(5));
        assert!(mixer.take_one_shots().is_empty());
    }
}
