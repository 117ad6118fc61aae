//! Frame clock for the game loop.
//!
//! The window drives `begin_frame()` once per redraw. Wall-clock delta feeds an
//! accumulator that is drained in fixed 60 Hz slices by `should_step()`, so the
//! per-frame physics constants (gravity, jump impulse, scroll speed) behave the
//! same regardless of display refresh rate.
//!
//! `total_time` is the game clock: seconds of simulated time since start. Spawn
//! intervals, invincibility windows and survival times are all measured against
//! it. It tracks wall-clock time except when a long stall trips the cap below.

use std::time::Instant;

const FPS_SAMPLE_COUNT: usize = 60;
pub const DEFAULT_FIXED_DT: f64 = 1.0 / 60.0;

pub struct TimeState {
    pub fixed_dt: f64,
    pub max_frame_dt: f64,
    accumulator: f64,
    pub total_time: f64,
    pub fixed_step_count: u64,
    pub frame_count: u64,
    pub steps_this_frame: u32,
    pub real_dt: f64,
    last_instant: Instant,

    fps_samples: [f64; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f64,
    pub smoothed_frame_time_ms: f64,
}

impl TimeState {
    pub fn new() -> Self {
        Self {
            fixed_dt: DEFAULT_FIXED_DT,
            max_frame_dt: 0.25,
            accumulator: 0.0,
            total_time: 0.0,
            fixed_step_count: 0,
            frame_count: 0,
            steps_this_frame: 0,
            real_dt: 0.0,
            last_instant: Instant::now(),
            fps_samples: [DEFAULT_FIXED_DT; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: 60.0,
            smoothed_frame_time_ms: 16.667,
        }
    }

    /// Measure the wall-clock delta since the previous frame and feed it in.
    pub fn begin_frame(&mut self) {
        let now = Instant::now();
        let real_dt = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;
        self.advance(real_dt);
    }

    /// Feed an explicit frame delta. `begin_frame` calls this with the measured
    /// delta; headless callers use it directly.
    pub fn advance(&mut self, real_dt: f64) {
        self.real_dt = real_dt.max(0.0);

        if self.real_dt > self.max_frame_dt {
            log::warn!(
                "Frame took {:.1}ms, capping to {:.0}ms",
                self.real_dt * 1000.0,
                self.max_frame_dt * 1000.0
            );
            self.real_dt = self.max_frame_dt;
        }

        self.accumulator += self.real_dt;
        self.steps_this_frame = 0;
        self.frame_count += 1;

        self.fps_samples[self.fps_sample_index] = self.real_dt;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt: f64 = self.fps_samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
        self.smoothed_frame_time_ms = avg_dt * 1000.0;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };
    }

    pub fn should_step(&mut self) -> bool {
        if self.accumulator >= self.fixed_dt {
            self.accumulator -= self.fixed_dt;
            self.total_time += self.fixed_dt;
            self.fixed_step_count += 1;
            self.steps_this_frame += 1;
            true
        } else {
            false
        }
    }

    /// Game clock in seconds, as the simulation consumes it.
    pub fn elapsed_secs(&self) -> f32 {
        self.total_time as f32
    }
}

impl Default for TimeState {
    fn default() -> Self {
        Self::new()
    }
}
