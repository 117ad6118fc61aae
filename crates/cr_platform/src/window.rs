use std::sync::Arc;
use winit::dpi::LogicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowAttributes};

/// Smallest window the letterboxed canvas still reads well in.
const MIN_WINDOW: (u32, u32) = (320, 240);

#[derive(Debug, Clone, PartialEq)]
pub struct PlatformConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            title: "Cloud Runner".to_string(),
            width: 1024,
            height: 768,
            resizable: true,
        }
    }
}

impl PlatformConfig {
    /// Window sized to the game's logical viewport, clamped to the minimum.
    pub fn for_viewport(width: u32, height: u32) -> Self {
        Self {
            width: width.max(MIN_WINDOW.0),
            height: height.max(MIN_WINDOW.1),
            ..Self::default()
        }
    }

    fn attributes(&self) -> WindowAttributes {
        WindowAttributes::default()
            .with_title(&self.title)
            .with_inner_size(LogicalSize::new(self.width, self.height))
            .with_min_inner_size(LogicalSize::new(MIN_WINDOW.0, MIN_WINDOW.1))
            .with_resizable(self.resizable)
    }
}

pub fn create_window(
    event_loop: &ActiveEventLoop,
    config: &PlatformConfig,
) -> Result<Arc<Window>, String> {
    let window = event_loop
        .create_window(config.attributes())
        .map_err(|e| format!("Failed to create window '{}': {e}", config.title))?;
    log::info!(
        "Window created: '{}' {}x{}",
        config.title,
        config.width,
        config.height
    );
    Ok(Arc::new(window))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_sizes_pass_through() {
        let config = PlatformConfig::for_viewport(1024, 768);
        assert_eq!((config.width, config.height), (1024, 768));
        assert_eq!(config.title, "Cloud Runner");
    }

    #[test]
    fn tiny_viewport_is_clamped() {
        let config = PlatformConfig::for_viewport(100, 50);
        assert_eq!((config.width, config.height), MIN_WINDOW);
    }
}
