//! CPU-side mesh for one frame.
//!
//! Scene code draws through the `Canvas` trait; every primitive is tessellated
//! into a shared vertex/index list. Consecutive primitives that sample the same
//! texture collapse into one draw call, so a frame of solid shapes plus two
//! image blits is typically three or four `draw_indexed` calls. Text is not
//! tessellated here; it is queued for the HUD overlay.

use std::collections::HashMap;
use std::f32::consts::TAU;
use std::sync::Arc;

use cr_core::canvas::{Canvas, Color, ImageId};
use glam::Vec2;

use crate::vertex::CanvasVertex;

pub const WHITE_TEXTURE_KEY: &str = "__white";
const CIRCLE_SEGMENTS: u32 = 32;

/// A contiguous run of indices that share the same texture binding.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub texture_key: Arc<str>,
    pub index_start: u32,
    pub index_count: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub text: String,
    pub position: Vec2,
    pub color: Color,
}

pub struct FrameBatch {
    pub vertices: Vec<CanvasVertex>,
    pub indices: Vec<u32>,
    pub draw_calls: Vec<DrawCall>,
    pub labels: Vec<TextLabel>,
    pub clear_color: Color,
    image_sizes: HashMap<ImageId, Vec2>,
    white_key: Arc<str>,
}

impl FrameBatch {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
            draw_calls: Vec::new(),
            labels: Vec::new(),
            clear_color: Color::BLACK,
            image_sizes: HashMap::new(),
            white_key: Arc::from(WHITE_TEXTURE_KEY),
        }
    }

    /// Record that an image is available for blitting at its native size.
    pub fn register_image(&mut self, image: ImageId, size: Vec2) {
        self.image_sizes.insert(image, size);
    }

    /// Reset per-frame geometry; registered images are kept.
    pub fn begin(&mut self) {
        self.vertices.clear();
        self.indices.clear();
        self.draw_calls.clear();
        self.labels.clear();
        self.clear_color = Color::BLACK;
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    fn push_quad(&mut self, texture_key: Arc<str>, x: f32, y: f32, w: f32, h: f32, color: Color) {
        let base = self.vertices.len() as u32;
        let color = color.to_array();
        self.vertices.extend_from_slice(&[
            CanvasVertex {
                position: [x, y],
                tex_coords: [0.0, 0.0],
                color,
            },
            CanvasVertex {
                position: [x + w, y],
                tex_coords: [1.0, 0.0],
                color,
            },
            CanvasVertex {
                position: [x + w, y + h],
                tex_coords: [1.0, 1.0],
                color,
            },
            CanvasVertex {
                position: [x, y + h],
                tex_coords: [0.0, 1.0],
                color,
            },
        ]);
        let start = self.indices.len() as u32;
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        push_draw_call(&mut self.draw_calls, texture_key, start, 6);
    }
}

impl Default for FrameBatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas for FrameBatch {
    fn clear(&mut self, color: Color) {
        self.clear_color = color;
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        self.push_quad(self.white_key.clone(), x, y, width, height, color);
    }

    fn fill_triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, color: Color) {
        let base = self.vertices.len() as u32;
        let color = color.to_array();
        for p in [a, b, c] {
            self.vertices.push(CanvasVertex::solid(p.to_array(), color));
        }
        let start = self.indices.len() as u32;
        self.indices.extend_from_slice(&[base, base + 1, base + 2]);
        push_draw_call(&mut self.draw_calls, self.white_key.clone(), start, 3);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        if radius <= 0.0 {
            return;
        }
        let base = self.vertices.len() as u32;
        let color = color.to_array();
        self.vertices
            .push(CanvasVertex::solid(center.to_array(), color));
        for i in 0..CIRCLE_SEGMENTS {
            let angle = TAU * i as f32 / CIRCLE_SEGMENTS as f32;
            let p = center + Vec2::new(angle.cos(), angle.sin()) * radius;
            self.vertices.push(CanvasVertex::solid(p.to_array(), color));
        }
        let start = self.indices.len() as u32;
        for i in 0..CIRCLE_SEGMENTS {
            let next = (i + 1) % CIRCLE_SEGMENTS;
            self.indices
                .extend_from_slice(&[base, base + 1 + i, base + 1 + next]);
        }
        push_draw_call(
            &mut self.draw_calls,
            self.white_key.clone(),
            start,
            CIRCLE_SEGMENTS * 3,
        );
    }

    fn draw_image(&mut self, image: ImageId, x: f32, y: f32, width: f32, height: f32, tint: Color) {
        if !self.image_sizes.contains_key(&image) || width <= 0.0 || height <= 0.0 {
            return;
        }
        self.push_quad(Arc::from(image.key()), x, y, width, height, tint);
    }

    fn image_size(&self, image: ImageId) -> Option<Vec2> {
        self.image_sizes.get(&image).copied()
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, color: Color) {
        self.labels.push(TextLabel {
            text: text.to_string(),
            position: Vec2::new(x, y),
            color,
        });
    }
}

/// Append a draw call, merging with the previous one when the texture matches
/// and the index range is contiguous.
fn push_draw_call(
    draw_calls: &mut Vec<DrawCall>,
    texture_key: Arc<str>,
    index_start: u32,
    index_count: u32,
) {
    if let Some(last) = draw_calls.last_mut() {
        let contiguous = last.index_start + last.index_count == index_start;
        if *last.texture_key == *texture_key && contiguous {
            last.index_count += index_count;
            return;
        }
    }
    draw_calls.push(DrawCall {
        texture_key,
        index_start,
        index_count,
    });
}
