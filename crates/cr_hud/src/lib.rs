pub mod text_overlay;

pub use text_overlay::{HudText, OverlayStats, TextOverlay};
