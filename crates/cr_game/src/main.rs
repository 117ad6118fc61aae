//! Cloud Runner -- main loop and application entry point.
//!
//! winit drives the event loop via `ApplicationHandler`. All simulation runs
//! inside `RedrawRequested` on a fixed timestep (see `TimeState`):
//!
//!   1. `begin_frame()` -- measure wall-clock delta, feed accumulator
//!   2. `while should_step()` -- one `World::update` per fixed slice
//!   3. Redraw the scene into a `FrameBatch` through the `Canvas` trait
//!   4. Upload mesh + camera uniform, issue draw calls, composite the text overlay
//!
//! The world reads the game clock (`TimeState::total_time`), so spawn cadence,
//! invincibility and survival time stay consistent with the simulation even
//! when frames stall.

mod collision;
mod config;
mod obstacle;
mod player;
mod ranking;
#[cfg(test)]
mod replay;
mod scene;
mod spawner;
mod world;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use wgpu::util::DeviceExt;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use config::GameConfig;
use cr_core::canvas::{Color, ImageId};
use cr_core::input::{InputState, Key};
use cr_core::time::TimeState;
use cr_hud::{HudText, OverlayStats, TextOverlay};
use cr_platform::window::PlatformConfig;
use cr_render::{
    CanvasPipeline, CanvasVertex, FrameBatch, GpuContext, ScreenCamera, Texture,
    WHITE_TEXTURE_KEY,
};
use ranking::{RankingStore, Rankings};
use world::World;

const CONFIG_PATH: &str = "assets/config/game.json";
const CLOUD_IMAGE_PATH: &str = "assets/cloud.png";
const PLAYER_IMAGE_PATH: &str = "assets/kirby.png";
/// Text size in logical pixels, scaled with the window.
const HUD_FONT_PX: f32 = 13.0;

struct GpuTexture {
    // Held so the texture lives as long as its bind group.
    _texture: Texture,
    bind_group: wgpu::BindGroup,
}

/// All mutable app state. Constructed lazily in `ApplicationHandler::resumed`
/// once the window and GPU surface are available.
struct EngineState {
    window: Arc<Window>,
    gpu: GpuContext,
    time: TimeState,
    input: InputState,
    camera: ScreenCamera,
    pipeline: CanvasPipeline,
    overlay: TextOverlay,
    textures: HashMap<Arc<str>, GpuTexture>,

    world: World,
    store: RankingStore,
    rng: StdRng,

    // The mesh is rebuilt on the CPU each frame, then streamed into these
    // buffers. Buffers grow (power-of-two) but never shrink.
    batch: FrameBatch,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    mesh_vertex_capacity: usize,
    mesh_index_capacity: usize,
}

impl EngineState {
    fn new(window: Arc<Window>, config: GameConfig) -> Self {
        let gpu = GpuContext::new(window.clone()).unwrap_or_else(|err| panic!("{err}"));
        let time = TimeState::new();
        let input = InputState::new();
        let pipeline = CanvasPipeline::new(&gpu.device, gpu.surface_format);
        let overlay = TextOverlay::new(&gpu.device, gpu.surface_format, &window);
        let camera = ScreenCamera::new(config.viewport_width, config.viewport_height, gpu.size);

        let mut batch = FrameBatch::new();
        let mut textures = HashMap::new();
        let white = Texture::white_pixel(&gpu.device, &gpu.queue);
        textures.insert(
            Arc::from(WHITE_TEXTURE_KEY),
            upload_texture(&gpu.device, &pipeline, white),
        );
        for (image, path) in [
            (ImageId::Cloud, CLOUD_IMAGE_PATH),
            (ImageId::Player, PLAYER_IMAGE_PATH),
        ] {
            match Texture::from_path(&gpu.device, &gpu.queue, Path::new(path)) {
                Ok(texture) => {
                    log::info!(
                        "Loaded image '{}' ({}x{})",
                        path,
                        texture.width,
                        texture.height
                    );
                    batch.register_image(
                        image,
                        glam::Vec2::new(texture.width as f32, texture.height as f32),
                    );
                    textures.insert(
                        Arc::from(image.key()),
                        upload_texture(&gpu.device, &pipeline, texture),
                    );
                }
                // Missing art draws nothing; the game still runs.
                Err(err) => log::warn!("{err}"),
            }
        }

        let store = RankingStore::new(config.ranking_path.clone(), config.ranking_capacity);
        let rankings = store.load().unwrap_or_else(|err| {
            log::error!("{err}; starting with an empty board");
            Rankings::new(config.ranking_capacity)
        });
        log::info!(
            "Loaded {} ranking entries from '{}'",
            rankings.len(),
            store.path().display()
        );
        let world = World::new(config, rankings, time.elapsed_secs());

        let camera_uniform = camera.build_uniform();
        let camera_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Uniform Buffer"),
                contents: bytemuck::cast_slice(&[camera_uniform]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let camera_bind_group = pipeline.create_camera_bind_group(&gpu.device, &camera_buffer);
        let vertex_buffer = create_vertex_buffer(&gpu.device, 1);
        let index_buffer = create_index_buffer(&gpu.device, 1);

        Self {
            window,
            gpu,
            time,
            input,
            camera,
            pipeline,
            overlay,
            textures,
            world,
            store,
            rng: StdRng::from_entropy(),
            batch,
            vertex_buffer,
            index_buffer,
            camera_buffer,
            camera_bind_group,
            mesh_vertex_capacity: 0,
            mesh_index_capacity: 0,
        }
    }

    fn save_rankings(&self) {
        match self.store.save(self.world.rankings()) {
            Ok(()) => log::info!("Saved rankings to '{}'", self.store.path().display()),
            Err(err) => log::error!("{err}"),
        }
    }

    fn ensure_mesh_capacity(&mut self, vertex_count: usize, index_count: usize) {
        let needed_vertices = vertex_count.max(1);
        if needed_vertices > self.mesh_vertex_capacity {
            self.mesh_vertex_capacity = needed_vertices.next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(&self.gpu.device, self.mesh_vertex_capacity);
        }

        let needed_indices = index_count.max(1);
        if needed_indices > self.mesh_index_capacity {
            self.mesh_index_capacity = needed_indices.next_power_of_two();
            self.index_buffer = create_index_buffer(&self.gpu.device, self.mesh_index_capacity);
        }
    }

    /// Redraw the world into the batch and stream it to the GPU.
    fn rebuild_mesh(&mut self) {
        self.batch.begin();
        scene::draw_world(&self.world, &mut self.batch);

        let vertex_count = self.batch.vertices.len();
        let index_count = self.batch.indices.len();
        self.ensure_mesh_capacity(vertex_count, index_count);
        if vertex_count > 0 {
            self.gpu.queue.write_buffer(
                &self.vertex_buffer,
                0,
                bytemuck::cast_slice(&self.batch.vertices),
            );
        }
        if index_count > 0 {
            self.gpu.queue.write_buffer(
                &self.index_buffer,
                0,
                bytemuck::cast_slice(&self.batch.indices),
            );
        }
    }

    /// Scene text, moved from logical to physical pixels for the overlay.
    fn hud_labels(&self) -> Vec<HudText> {
        let font_px = HUD_FONT_PX * self.camera.scale();
        self.batch
            .labels
            .iter()
            .map(|label| {
                let physical = self.camera.logical_to_physical(label.position);
                HudText {
                    text: label.text.clone(),
                    x: physical.x,
                    y: physical.y,
                    color: label.color,
                    font_px,
                }
            })
            .collect()
    }

    /// Drain the accumulator one world step at a time. Returns `false` when
    /// the player asked to quit.
    fn run_fixed_steps(&mut self) -> bool {
        self.time.begin_frame();
        while self.time.should_step() {
            if self.input.is_just_pressed(Key::Escape) {
                return false;
            }
            if self.input.is_just_pressed(Key::F3) {
                self.overlay.toggle_stats();
            }

            self.world.handle_input(&self.input);
            let outcome = self.world.update(self.time.elapsed_secs(), &mut self.rng);
            if outcome.game_over.is_some() {
                self.save_rankings();
            }
            // Edges are consumed by the first step that sees them; a frame
            // with no steps keeps them for the next one.
            self.input.end_frame();
        }
        true
    }

    fn render(&mut self) {
        self.gpu.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[self.camera.build_uniform()]),
        );

        let Some((output, view)) = self.gpu.begin_frame() else {
            return;
        };

        let labels = self.hud_labels();
        let stats = self.overlay_stats();
        let (hud_primitives, hud_textures_delta) =
            self.overlay
                .prepare(&self.window, &labels, &self.time, &stats);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.gpu.size.0, self.gpu.size.1],
            pixels_per_point: self.window.scale_factor() as f32,
        };

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        self.draw_scene(&mut encoder, &view);

        self.overlay.upload(
            &self.gpu.device,
            &self.gpu.queue,
            &mut encoder,
            &hud_primitives,
            &hud_textures_delta,
            &screen_descriptor,
        );
        {
            let mut hud_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("HUD Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            self.overlay
                .paint(&mut hud_pass, &hud_primitives, &screen_descriptor);
        }
        self.overlay.cleanup(&hud_textures_delta);

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }

    /// Clear to the scene's background and replay the batch's draw calls,
    /// rebinding textures only when the key changes.
    fn draw_scene(&self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Canvas Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(to_wgpu_color(self.batch.clear_color)),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            ..Default::default()
        });

        pass.set_pipeline(&self.pipeline.render_pipeline);
        pass.set_bind_group(0, &self.camera_bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

        let mut bound: Option<&str> = None;
        for draw in &self.batch.draw_calls {
            let Some(texture) = self.textures.get(&draw.texture_key) else {
                continue;
            };
            if bound != Some(&*draw.texture_key) {
                pass.set_bind_group(1, &texture.bind_group, &[]);
                bound = Some(&*draw.texture_key);
            }
            pass.draw_indexed(draw.index_start..draw.index_start + draw.index_count, 0, 0..1);
        }
    }

    fn overlay_stats(&self) -> OverlayStats {
        OverlayStats {
            draw_calls: self.batch.draw_calls.len() as u32,
            triangles: self.batch.triangle_count() as u32,
            obstacles: self.world.obstacles.len() as u32,
            obstacle_speed: self.world.obstacle_speed(),
            lives: self.world.lives(),
            game_over: self.world.is_game_over(),
        }
    }
}

struct App {
    config: GameConfig,
    state: Option<EngineState>,
}

impl App {
    fn new(config: GameConfig) -> Self {
        Self {
            config,
            state: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let platform = PlatformConfig::for_viewport(
            self.config.viewport_width as u32,
            self.config.viewport_height as u32,
        );
        match cr_platform::window::create_window(event_loop, &platform) {
            Ok(window) => self.state = Some(EngineState::new(window, self.config.clone())),
            Err(err) => {
                log::error!("{err}");
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = self.state.as_mut() else {
            return;
        };

        let egui_consumed = state.overlay.handle_window_event(&state.window, &event);

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting.");
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                let w = physical_size.width;
                let h = physical_size.height;
                if w > 0 && h > 0 {
                    state.gpu.resize(w, h);
                    state.camera.viewport = (w, h);
                    log::info!("Resized to {}x{}", w, h);
                }
            }

            WindowEvent::KeyboardInput { event, .. } if !egui_consumed => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    if let Some(key) = map_key(key_code) {
                        match event.state {
                            ElementState::Pressed => state.input.key_down(key),
                            ElementState::Released => state.input.key_up(key),
                        }
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                if state.gpu.size.0 == 0 || state.gpu.size.1 == 0 {
                    return;
                }
                if !state.run_fixed_steps() {
                    log::info!("Escape pressed, exiting.");
                    event_loop.exit();
                    return;
                }
                state.rebuild_mesh();
                state.render();
            }

            _ => {}
        }
    }
}

fn upload_texture(
    device: &wgpu::Device,
    pipeline: &CanvasPipeline,
    texture: Texture,
) -> GpuTexture {
    let bind_group = pipeline.create_texture_bind_group(device, &texture);
    GpuTexture {
        _texture: texture,
        bind_group,
    }
}

fn create_vertex_buffer(device: &wgpu::Device, vertex_capacity: usize) -> wgpu::Buffer {
    let byte_len = (vertex_capacity * std::mem::size_of::<CanvasVertex>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Scene Vertex Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_index_buffer(device: &wgpu::Device, index_capacity: usize) -> wgpu::Buffer {
    let byte_len = (index_capacity * std::mem::size_of::<u32>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Scene Index Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn to_wgpu_color(color: Color) -> wgpu::Color {
    wgpu::Color {
        r: color.r as f64,
        g: color.g as f64,
        b: color.b as f64,
        a: color.a as f64,
    }
}

fn map_key(key_code: KeyCode) -> Option<Key> {
    match key_code {
        KeyCode::ArrowUp => Some(Key::Up),
        KeyCode::Space => Some(Key::Space),
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::F3 => Some(Key::F3),
        _ => None,
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Cloud Runner starting...");

    let config = config::load_or_default(Path::new(CONFIG_PATH));

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app).expect("Event loop error");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jump_and_system_keys_are_mapped() {
        assert_eq!(map_key(KeyCode::ArrowUp), Some(Key::Up));
        assert_eq!(map_key(KeyCode::Space), Some(Key::Space));
        assert_eq!(map_key(KeyCode::Escape), Some(Key::Escape));
        assert_eq!(map_key(KeyCode::F3), Some(Key::F3));
        assert_eq!(map_key(KeyCode::ArrowLeft), None);
    }

    #[test]
    fn clear_color_converts_channel_for_channel() {
        let c = to_wgpu_color(Color::rgba(0.25, 0.5, 0.75, 1.0));
        assert_eq!((c.r, c.g, c.b, c.a), (0.25, 0.5, 0.75, 1.0));
    }
}
