//! Text and stats overlay rendered with egui on top of the scene.
//!
//! All in-game text (lives counter, game-over screen, rankings) is queued by
//! the scene as `HudText` and painted here on egui's foreground layer. F3 adds
//! a small stats window.
//!
//! egui-wgpu needs a `RenderPass<'static>` while `begin_render_pass` borrows the
//! encoder, so rendering is split into phases:
//!
//!   1. `prepare()` -- run egui, tessellate shapes
//!   2. `upload()`  -- update textures and buffers (borrows encoder mutably)
//!   3. `paint()`   -- draw into a pass created with `forget_lifetime()`
//!   4. `cleanup()` -- free textures egui dropped

use cr_core::canvas::Color;
use cr_core::time::TimeState;
use winit::window::Window;

/// A line of text in physical window pixels; `y` is the baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct HudText {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub color: Color,
    pub font_px: f32,
}

#[derive(Debug, Clone, Default)]
pub struct OverlayStats {
    pub draw_calls: u32,
    pub triangles: u32,
    pub obstacles: u32,
    pub obstacle_speed: f32,
    pub lives: u32,
    pub game_over: bool,
}

pub struct TextOverlay {
    pub egui_ctx: egui::Context,
    pub egui_winit_state: egui_winit::State,
    pub egui_renderer: egui_wgpu::Renderer,
    pub stats_visible: bool,
}

impl TextOverlay {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        window: &Window,
    ) -> Self {
        let egui_ctx = egui::Context::default();
        let egui_winit_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            window,
            None,
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(device, surface_format, None, 1, false);

        Self {
            egui_ctx,
            egui_winit_state,
            egui_renderer,
            stats_visible: false,
        }
    }

    pub fn handle_window_event(
        &mut self,
        window: &Window,
        event: &winit::event::WindowEvent,
    ) -> bool {
        self.egui_winit_state.on_window_event(window, event).consumed
    }

    pub fn toggle_stats(&mut self) {
        self.stats_visible = !self.stats_visible;
        log::info!(
            "Stats overlay: {}",
            if self.stats_visible { "ON" } else { "OFF" }
        );
    }

    pub fn prepare(
        &mut self,
        window: &Window,
        labels: &[HudText],
        time: &TimeState,
        stats: &OverlayStats,
    ) -> (Vec<egui::ClippedPrimitive>, egui::TexturesDelta) {
        let raw_input = self.egui_winit_state.take_egui_input(window);
        let stats_visible = self.stats_visible;
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            let ppp = ctx.pixels_per_point();
            let painter = ctx.layer_painter(egui::LayerId::new(
                egui::Order::Foreground,
                egui::Id::new("hud_text"),
            ));
            for label in labels {
                painter.text(
                    egui::pos2(label.x / ppp, label.y / ppp),
                    egui::Align2::LEFT_BOTTOM,
                    &label.text,
                    egui::FontId::monospace(label.font_px / ppp),
                    to_color32(label.color),
                );
            }

            if stats_visible {
                egui::Window::new("Stats")
                    .default_pos([10.0, 40.0])
                    .resizable(false)
                    .show(ctx, |ui| {
                        ui.label(format!("FPS: {:.1}", time.smoothed_fps));
                        ui.label(format!("Frame time: {:.2} ms", time.smoothed_frame_time_ms));
                        ui.label(format!("Steps this frame: {}", time.steps_this_frame));
                        ui.label(format!("Game clock: {:.2} s", time.total_time));
                        ui.separator();
                        ui.label(format!("Draw calls: {}", stats.draw_calls));
                        ui.label(format!("Triangles: {}", stats.triangles));
                        ui.label(format!("Obstacles: {}", stats.obstacles));
                        ui.label(format!("Obstacle speed: {:.2}", stats.obstacle_speed));
                        ui.label(format!("Lives: {}", stats.lives));
                        if stats.game_over {
                            ui.label("GAME OVER");
                        }
                    });
            }
        });

        self.egui_winit_state
            .handle_platform_output(window, full_output.platform_output);

        let primitives = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        (primitives, full_output.textures_delta)
    }

    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        primitives: &[egui::ClippedPrimitive],
        textures_delta: &egui::TexturesDelta,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        for (id, image_delta) in &textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.egui_renderer
            .update_buffers(device, queue, encoder, primitives, screen_descriptor);
    }

    pub fn paint(
        &self,
        render_pass: &mut wgpu::RenderPass<'static>,
        primitives: &[egui::ClippedPrimitive],
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        self.egui_renderer
            .render(render_pass, primitives, screen_descriptor);
    }

    pub fn cleanup(&mut self, textures_delta: &egui::TexturesDelta) {
        for id in &textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}

fn to_color32(color: Color) -> egui::Color32 {
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    egui::Color32::from_rgba_unmultiplied(
        channel(color.r),
        channel(color.g),
        channel(color.b),
        channel(color.a),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_conversion_rounds_and_clamps() {
        let c = to_color32(Color::rgba(1.0, 0.5, -1.0, 2.0));
        assert_eq!(c, egui::Color32::from_rgba_unmultiplied(255, 128, 0, 255));
    }
}
