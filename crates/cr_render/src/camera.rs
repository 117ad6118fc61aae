use glam::{Mat4, Vec2};

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

/// Maps the game's fixed logical screen (y-down pixels) onto the window.
///
/// The logical area is scaled uniformly to fit and centred; the leftover
/// band on the long axis shows whatever the clear colour is.
pub struct ScreenCamera {
    pub logical: Vec2,
    pub viewport: (u32, u32),
}

impl ScreenCamera {
    pub fn new(logical_width: f32, logical_height: f32, viewport: (u32, u32)) -> Self {
        Self {
            logical: Vec2::new(logical_width, logical_height),
            viewport,
        }
    }

    /// Physical pixels per logical pixel.
    pub fn scale(&self) -> f32 {
        let sx = self.viewport.0.max(1) as f32 / self.logical.x;
        let sy = self.viewport.1.max(1) as f32 / self.logical.y;
        sx.min(sy)
    }

    /// Logical rectangle visible in the window: (left, top, right, bottom).
    fn visible_bounds(&self) -> (f32, f32, f32, f32) {
        let scale = self.scale();
        let visible_w = self.viewport.0.max(1) as f32 / scale;
        let visible_h = self.viewport.1.max(1) as f32 / scale;
        let left = (self.logical.x - visible_w) * 0.5;
        let top = (self.logical.y - visible_h) * 0.5;
        (left, top, left + visible_w, top + visible_h)
    }

    pub fn build_uniform(&self) -> CameraUniform {
        let (left, top, right, bottom) = self.visible_bounds();
        // bottom/top swapped so +y points down the screen
        let proj = Mat4::orthographic_rh(left, right, bottom, top, -1.0, 1.0);

        CameraUniform {
            view_proj: proj.to_cols_array_2d(),
        }
    }

    /// Convert a logical point to physical window pixels.
    pub fn logical_to_physical(&self, point: Vec2) -> Vec2 {
        let (left, top, _, _) = self.visible_bounds();
        (point - Vec2::new(left, top)) * self.scale()
    }
}
