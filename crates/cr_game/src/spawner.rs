//! Obstacle generation and difficulty ramp.
//!
//! Spawning is timer-gated on the game clock rather than counted in frames,
//! so the cadence holds even when the loop runs several fixed steps at once.

use glam::Vec2;
use rand::Rng;

use crate::config::GameConfig;
use crate::obstacle::{Obstacle, ObstacleShape};

#[derive(Debug, Clone)]
pub struct ObstacleSpawner {
    pub interval: f32,
    pub last_spawn: f32,
    pub min_size: f32,
    pub max_size: f32,
}

impl ObstacleSpawner {
    pub fn new(interval: f32, min_size: f32, max_size: f32) -> Self {
        Self {
            interval,
            last_spawn: 0.0,
            min_size,
            max_size,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(
            config.obstacle_spawn_interval,
            config.obstacle_min_size,
            config.obstacle_max_size,
        )
    }

    /// Produce one obstacle at `(spawn_x, ground_y)` once more than `interval`
    /// seconds have passed since the previous spawn.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        now: f32,
        spawn_x: f32,
        ground_y: f32,
        rng: &mut R,
    ) -> Option<Obstacle> {
        if now - self.last_spawn <= self.interval {
            return None;
        }
        self.last_spawn = now;

        let size = Vec2::new(
            rng.gen_range(self.min_size..self.max_size),
            rng.gen_range(self.min_size..self.max_size),
        );
        let shape = ObstacleShape::ALL[rng.gen_range(0..ObstacleShape::ALL.len())];
        log::debug!(
            "Spawned {:?} {:.0}x{:.0} at t={:.2}",
            shape,
            size.x,
            size.y,
            now
        );
        Some(Obstacle {
            position: Vec2::new(spawn_x, ground_y),
            size,
            shape,
        })
    }
}

/// Obstacle scroll speed as a step function of elapsed play time.
///
/// Each `interval` boundary crossed adds `step` exactly once, however many
/// frames fall inside the boundary second.
#[derive(Debug, Clone)]
pub struct SpeedSchedule {
    pub base: f32,
    pub step: f32,
    pub interval: f32,
    steps_applied: u32,
}

impl SpeedSchedule {
    pub fn new(base: f32, step: f32, interval: f32) -> Self {
        Self {
            base,
            step,
            interval,
            steps_applied: 0,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(
            config.obstacle_base_speed,
            config.obstacle_speed_step,
            config.speed_up_interval,
        )
    }

    /// Advance to `elapsed` seconds of play and return the current speed.
    /// Never decreases, even if `elapsed` goes backwards.
    pub fn update(&mut self, elapsed: f32) -> f32 {
        let boundaries = if elapsed > 0.0 {
            (elapsed / self.interval).floor() as u32
        } else {
            0
        };
        if boundaries > self.steps_applied {
            self.steps_applied = boundaries;
            log::debug!(
                "Obstacle speed up to {:.2} at {:.1}s",
                self.speed(),
                elapsed
            );
        }
        self.speed()
    }

    pub fn speed(&self) -> f32 {
        self.base + self.step * self.steps_applied as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn nothing_spawns_before_interval_elapses() {
        let mut spawner = ObstacleSpawner::new(2.0, 50.0, 150.0);
        let mut rng = StdRng::seed_from_u64(7);
        assert!(spawner.tick(1.0, 1024.0, 400.0, &mut rng).is_none());
        assert!(spawner.tick(2.0, 1024.0, 400.0, &mut rng).is_none());
        assert!(spawner.tick(2.01, 1024.0, 400.0, &mut rng).is_some());
    }

    #[test]
    fn spawn_resets_the_timer() {
        let mut spawner = ObstacleSpawner::new(2.0, 50.0, 150.0);
        let mut rng = StdRng::seed_from_u64(7);
        assert!(spawner.tick(2.5, 1024.0, 400.0, &mut rng).is_some());
        assert_eq!(spawner.last_spawn, 2.5);
        assert!(spawner.tick(4.0, 1024.0, 400.0, &mut rng).is_none());
        assert!(spawner.tick(4.6, 1024.0, 400.0, &mut rng).is_some());
    }

    #[test]
    fn spawned_obstacles_sit_at_right_edge_within_size_range() {
        let mut spawner = ObstacleSpawner::new(0.5, 50.0, 150.0);
        let mut rng = StdRng::seed_from_u64(42);
        let mut shapes_seen = Vec::new();
        for i in 1..=200 {
            let obstacle = spawner
                .tick(i as f32, 1024.0, 400.0, &mut rng)
                .expect("interval elapsed");
            assert_eq!(obstacle.position, Vec2::new(1024.0, 400.0));
            assert!((50.0..150.0).contains(&obstacle.size.x));
            assert!((50.0..150.0).contains(&obstacle.size.y));
            if !shapes_seen.contains(&obstacle.shape) {
                shapes_seen.push(obstacle.shape);
            }
        }
        assert_eq!(shapes_seen.len(), 3, "all shapes should appear");
    }

    #[test]
    fn same_seed_spawns_same_sequence() {
        let run = |seed| {
            let mut spawner = ObstacleSpawner::new(1.0, 50.0, 150.0);
            let mut rng = StdRng::seed_from_u64(seed);
            (2..20)
                .filter_map(|t| spawner.tick(t as f32, 1024.0, 400.0, &mut rng))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(9), run(9));
    }

    #[test]
    fn speed_steps_once_per_boundary() {
        let mut schedule = SpeedSchedule::new(5.0, 0.1, 10.0);
        assert_eq!(schedule.update(0.0), 5.0);
        assert_eq!(schedule.update(9.99), 5.0);
        // Many frames inside second 10 still count once.
        for i in 0..60 {
            schedule.update(10.0 + i as f32 / 60.0);
        }
        assert!((schedule.speed() - 5.1).abs() < 1e-6);
        assert!((schedule.update(25.0) - 5.2).abs() < 1e-6);
    }

    #[test]
    fn speed_never_decreases() {
        let mut schedule = SpeedSchedule::new(5.0, 0.1, 10.0);
        let mut last = schedule.update(0.0);
        for t in [3.0, 12.0, 11.0, 31.0, 0.0, 45.0] {
            let speed = schedule.update(t);
            assert!(speed >= last);
            last = speed;
        }
        assert!((last - 5.4).abs() < 1e-6);
    }
}
