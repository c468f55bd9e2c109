//! Settings menu application
//!
//! Owns the window, the preference store and the audio handles, and routes
//! window events into menu actions.

use crate::config::RuntimeConfig;
use crate::menu::{Flow, MenuAction};
use dicebox_audio::{AudioMixer, ClipId, SfxCue, SoundBank, SoundEffects};
use dicebox_render::window::window_attributes;
use dicebox_render::{QualitySettings, WinitDisplay};
use dicebox_services::{volume_percent, JsonFileBackend, PreferenceStore};
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, WindowEvent},
    event_loop::ActiveEventLoop,
    window::{Window, WindowId},
};

/// Background track of the menu scene
const MENU_MUSIC: ClipId = ClipId(100);

pub struct SettingsApp {
    config: RuntimeConfig,
    window: Option<Arc<Window>>,
    prefs: Option<PreferenceStore>,
    mixer: AudioMixer,
    quality: QualitySettings,
    sfx: SoundEffects,
}

impl SettingsApp {
    pub fn new(config: RuntimeConfig) -> Self {
        let mixer = AudioMixer::new();
        let sfx = SoundEffects::new(SoundBank::menu_defaults(), mixer.clone());
        Self {
            config,
            window: None,
            prefs: None,
            mixer,
            quality: QualitySettings::new(),
            sfx,
        }
    }

    fn start(&mut self, window: Arc<Window>) {
        let display = WinitDisplay::new(Arc::clone(&window));
        let mut prefs = PreferenceStore::builder(JsonFileBackend::open(&self.config.prefs_path))
            .audio(self.mixer.clone())
            .display(display)
            .quality(self.quality.clone())
            .build();

        prefs.observe(|key, value| tracing::info!(%key, %value, "preference changed"));
        prefs.load();

        for (index, option) in prefs.resolutions().iter().enumerate() {
            tracing::debug!(index, %option, "resolution");
        }
        tracing::info!(
            music = volume_percent(prefs.music_volume()),
            effects = volume_percent(prefs.sfx_volume()),
            resolution = %prefs.resolution().map(ToString::to_string).unwrap_or_default(),
            quality = prefs.quality_names().get(prefs.quality_level()).map(String::as_str).unwrap_or("-"),
            fullscreen = prefs.fullscreen(),
            "settings menu ready"
        );

        self.mixer.play_music(MENU_MUSIC);
        self.window = Some(window);
        self.prefs = Some(prefs);
    }

    fn close(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(prefs) = self.prefs.as_mut() {
            prefs.save();
        }
        event_loop.exit();
    }
}

impl ApplicationHandler for SettingsApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        match event_loop.create_window(window_attributes(&self.config.window)) {
            Ok(window) => self.start(Arc::new(window)),
            Err(err) => {
                tracing::error!(error = %err, "failed to create window");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(prefs) = self.prefs.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("Close requested, shutting down...");
                self.close(event_loop);
            }
            WindowEvent::CursorEntered { .. } => {
                self.sfx.play(SfxCue::Hover, prefs);
            }
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed && !event.repeat =>
            {
                let Some(action) = MenuAction::from_key(&event.logical_key) else {
                    return;
                };
                let flow = action.apply(prefs);
                self.sfx.play(action.cue(), prefs);
                if flow == Flow::Close {
                    self.close(event_loop);
                }
            }
            _ => {}
        }
    }
}
