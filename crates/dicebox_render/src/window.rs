//! Window management
//!
//! Cross-platform window creation via winit

use winit::{
    error::EventLoopError,
    event_loop::EventLoop,
    window::{Window, WindowAttributes},
};

pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Dicebox".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

/// Create window attributes from config
pub fn window_attributes(config: &WindowConfig) -> WindowAttributes {
    Window::default_attributes()
        .with_title(config.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height))
}

/// In winit 0.30+, windows must be created inside `ApplicationHandler::resumed`;
/// this only builds the loop that will drive it.
pub fn create_event_loop() -> Result<EventLoop<()>, EventLoopError> {
    EventLoop::new()
}
