//! Display modes of the monitor the game window is on

use dicebox_services::{AdapterError, DisplayAdapter, ResolutionOption};
use std::cmp::Reverse;
use std::sync::Arc;
use winit::monitor::{MonitorHandle, VideoModeHandle};
use winit::window::{Fullscreen, Window};

/// [`DisplayAdapter`] over the window's current monitor.
///
/// The mode list is captured once at construction; moving the window to
/// another monitor does not change it.
pub struct WinitDisplay {
    window: Arc<Window>,
    modes: Vec<VideoModeHandle>,
}

impl WinitDisplay {
    pub fn new(window: Arc<Window>) -> Self {
        let modes = window
            .current_monitor()
            .map(|monitor| sorted_modes(&monitor))
            .unwrap_or_default();

        if modes.is_empty() {
            tracing::warn!("current monitor reports no video modes; resolution changes disabled");
        } else {
            tracing::debug!(count = modes.len(), "display modes detected");
        }

        Self { window, modes }
    }

    /// Native size of the current monitor, or the window's size off-monitor
    fn current_size(&self) -> (u32, u32) {
        let size = self
            .window
            .current_monitor()
            .map(|monitor| monitor.size())
            .unwrap_or_else(|| self.window.inner_size());
        (size.width, size.height)
    }
}

/// Ascending by size then refresh rate, one entry per size and rate
/// (the deepest colour mode wins).
fn sorted_modes(monitor: &MonitorHandle) -> Vec<VideoModeHandle> {
    let mut modes: Vec<VideoModeHandle> = monitor.video_modes().collect();
    modes.sort_by_key(|mode| {
        let size = mode.size();
        (
            size.width,
            size.height,
            refresh_hz(mode.refresh_rate_millihertz()),
            Reverse(mode.bit_depth()),
        )
    });
    modes.dedup_by_key(|mode| resolution_option(mode));
    modes
}

fn refresh_hz(millihertz: u32) -> u32 {
    (millihertz + 500) / 1000
}

fn resolution_option(mode: &VideoModeHandle) -> ResolutionOption {
    let size = mode.size();
    ResolutionOption::new(size.width, size.height, refresh_hz(mode.refresh_rate_millihertz()))
}

impl DisplayAdapter for WinitDisplay {
    fn list_resolutions(&self) -> Vec<ResolutionOption> {
        self.modes.iter().map(resolution_option).collect()
    }

    fn apply_resolution(&mut self, index: usize, fullscreen: bool) -> Result<(), AdapterError> {
        let mode = self.modes.get(index).ok_or(AdapterError::NoSuchResolution {
            index,
            available: self.modes.len(),
        })?;

        if fullscreen {
            self.window
                .set_fullscreen(Some(Fullscreen::Exclusive(mode.clone())));
        } else {
            self.window.set_fullscreen(None);
            // The platform may pick a different size; the next Resized event reports it.
            let _ = self.window.request_inner_size(mode.size());
        }

        tracing::info!(mode = %resolution_option(mode), fullscreen, "display mode applied");
        Ok(())
    }

    fn current_width(&self) -> u32 {
        self.current_size().0
    }

    fn current_height(&self) -> u32 {
        self.current_size().1
    }
}
