//! Recording adapters shared by the store integration tests

#![allow(dead_code)]

use dicebox_services::{
    AdapterError, AudioSink, DisplayAdapter, PreferenceStore, PrefsBackend, QualityAdapter,
    ResolutionOption,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Music(f32),
    Effects(f32),
    Resolution(usize, bool),
    Tier(usize),
}

pub type CallLog = Rc<RefCell<Vec<Call>>>;

pub struct RecordingAudio(pub CallLog);

impl AudioSink for RecordingAudio {
    fn set_music_volume(&mut self, volume: f32) {
        self.0.borrow_mut().push(Call::Music(volume));
    }

    fn set_effects_volume(&mut self, volume: f32) {
        self.0.borrow_mut().push(Call::Effects(volume));
    }
}

pub struct RecordingDisplay {
    pub log: CallLog,
    pub modes: Vec<ResolutionOption>,
    pub current: (u32, u32),
    pub reject: bool,
}

impl DisplayAdapter for RecordingDisplay {
    fn list_resolutions(&self) -> Vec<ResolutionOption> {
        self.modes.clone()
    }

    fn apply_resolution(&mut self, index: usize, fullscreen: bool) -> Result<(), AdapterError> {
        self.log.borrow_mut().push(Call::Resolution(index, fullscreen));
        if self.reject {
            return Err(AdapterError::NoMonitor);
        }
        if let Some(mode) = self.modes.get(index) {
            self.current = (mode.width, mode.height);
        }
        Ok(())
    }

    fn current_width(&self) -> u32 {
        self.current.0
    }

    fn current_height(&self) -> u32 {
        self.current.1
    }
}

pub struct RecordingQuality {
    pub log: CallLog,
    pub names: Vec<String>,
    pub active: Rc<Cell<usize>>,
}

impl QualityAdapter for RecordingQuality {
    fn tier_names(&self) -> Vec<String> {
        self.names.clone()
    }

    fn apply_tier(&mut self, index: usize) -> Result<(), AdapterError> {
        self.log.borrow_mut().push(Call::Tier(index));
        self.active.set(index);
        Ok(())
    }

    fn current_tier(&self) -> usize {
        self.active.get()
    }
}

/// 1280x720@60, 1920x1080@60, 1920x1080@144, 2560x1440@60
pub fn desktop_modes() -> Vec<ResolutionOption> {
    vec![
        ResolutionOption::new(1280, 720, 60),
        ResolutionOption::new(1920, 1080, 60),
        ResolutionOption::new(1920, 1080, 144),
        ResolutionOption::new(2560, 1440, 60),
    ]
}

pub fn tier_names() -> Vec<String> {
    ["Low", "Medium", "High"].iter().map(|s| s.to_string()).collect()
}

/// Store on a 1920x1080 desktop with "Medium" quality active.
pub fn desktop_store(backend: impl PrefsBackend + 'static) -> (PreferenceStore, CallLog) {
    desktop_store_with(backend, false)
}

pub fn desktop_store_with(
    backend: impl PrefsBackend + 'static,
    reject_display: bool,
) -> (PreferenceStore, CallLog) {
    let log = CallLog::default();
    let store = PreferenceStore::builder(backend)
        .audio(RecordingAudio(Rc::clone(&log)))
        .display(RecordingDisplay {
            log: Rc::clone(&log),
            modes: desktop_modes(),
            current: (1920, 1080),
            reject: reject_display,
        })
        .quality(RecordingQuality {
            log: Rc::clone(&log),
            names: tier_names(),
            active: Rc::new(Cell::new(1)),
        })
        .build();
    (store, log)
}

pub fn count(log: &CallLog, pred: impl Fn(&Call) -> bool) -> usize {
    log.borrow().iter().filter(|call| pred(call)).count()
}
