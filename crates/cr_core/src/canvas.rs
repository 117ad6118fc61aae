//! Drawing interface between game rules and the renderer.
//!
//! Scene code only ever talks to a `Canvas`. The GPU frame batch implements it
//! for the window; tests implement it with a recorder. Coordinates are logical
//! screen pixels with the origin at the top-left and y growing downward.

use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Images the game blits. The renderer owns the mapping to files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageId {
    Cloud,
    Player,
}

impl ImageId {
    pub fn key(self) -> &'static str {
        match self {
            Self::Cloud => "cloud",
            Self::Player => "player",
        }
    }
}

pub trait Canvas {
    fn clear(&mut self, color: Color);

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color);

    fn fill_triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, color: Color);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);

    /// Blit an image stretched to `width` x `height`. A missing image draws nothing.
    fn draw_image(&mut self, image: ImageId, x: f32, y: f32, width: f32, height: f32, tint: Color);

    /// Native pixel size of a loaded image, `None` when it failed to load.
    fn image_size(&self, image: ImageId) -> Option<Vec2>;

    /// `y` is the text baseline.
    fn draw_text(&mut self, text: &str, x: f32, y: f32, color: Color);
}
