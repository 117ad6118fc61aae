//! Per-frame game rules.
//!
//! `World` owns all mutable game state and is driven by the app loop once per
//! fixed step with the current game-clock time. Nothing here touches the
//! window, the GPU or the filesystem, so every rule can be exercised in tests
//! by feeding explicit timestamps and a seeded RNG.
//!
//! Frame order matters and is fixed:
//!   1. difficulty ramp from elapsed play time
//!   2. gravity + integration, then platform landing
//!   3. spawner tick
//!   4. scroll obstacles, then player-vs-obstacle hit test
//!   5. prune obstacles that left the screen
//!   6. expire invincibility
//!
//! Hits are tested before invincibility expires, so a hit on the very frame
//! the window would close is still ignored.

use rand::Rng;

use crate::collision::{first_obstacle_hit, resolve_platforms, Rect};
use crate::config::GameConfig;
use crate::obstacle::Obstacle;
use crate::player::Player;
use crate::ranking::Rankings;
use crate::spawner::{ObstacleSpawner, SpeedSchedule};
use cr_core::input::InputState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Playing,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameOverSummary {
    pub survival_time: f32,
    /// 0-based slot on the board, `None` if the run did not place.
    pub rank: Option<usize>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameOutcome {
    pub landed: bool,
    pub spawned: bool,
    pub hit: bool,
    pub game_over: Option<GameOverSummary>,
}

pub struct World {
    config: GameConfig,
    pub player: Player,
    pub platforms: Vec<Rect>,
    pub obstacles: Vec<Obstacle>,
    spawner: ObstacleSpawner,
    speed: SpeedSchedule,
    obstacle_speed: f32,
    lives: u32,
    phase: Phase,
    invincible_since: Option<f32>,
    start_time: f32,
    end_time: Option<f32>,
    rankings: Rankings,
    last_rank: Option<usize>,
}

impl World {
    pub fn new(config: GameConfig, rankings: Rankings, now: f32) -> Self {
        let ground = Rect::new(
            0.0,
            config.ground_y,
            config.viewport_width,
            config.ground_thickness,
        );
        let mut spawner = ObstacleSpawner::from_config(&config);
        spawner.last_spawn = now;
        let speed = SpeedSchedule::from_config(&config);

        Self {
            player: Player::new(config.player_start()),
            platforms: vec![ground],
            obstacles: Vec::new(),
            spawner,
            obstacle_speed: speed.speed(),
            speed,
            lives: config.starting_lives,
            phase: Phase::Playing,
            invincible_since: None,
            start_time: now,
            end_time: None,
            rankings,
            last_rank: None,
            config,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Apply this step's jump edges. A tap that both presses and releases
    /// within one step jumps, then cuts the jump.
    pub fn handle_input(&mut self, input: &InputState) {
        if input.jump_just_pressed() {
            self.jump_pressed();
        }
        if input.jump_just_released() {
            self.jump_released();
        }
    }

    pub fn jump_pressed(&mut self) {
        if self.phase == Phase::Playing {
            self.player.press_jump(self.config.jump_force);
        }
    }

    pub fn jump_released(&mut self) {
        if self.phase == Phase::Playing {
            self.player.release_jump();
        }
    }

    pub fn update<R: Rng + ?Sized>(&mut self, now: f32, rng: &mut R) -> FrameOutcome {
        let mut outcome = FrameOutcome::default();
        if self.phase == Phase::GameOver {
            return outcome;
        }

        self.obstacle_speed = self.speed.update(now - self.start_time);

        let size = self.config.player_size;
        self.player.integrate(self.config.gravity);
        outcome.landed = resolve_platforms(&mut self.player, &self.platforms, size);

        if let Some(obstacle) =
            self.spawner
                .tick(now, self.config.viewport_width, self.config.ground_y, rng)
        {
            self.obstacles.push(obstacle);
            outcome.spawned = true;
        }

        for obstacle in &mut self.obstacles {
            obstacle.scroll(self.obstacle_speed);
        }
        if self.invincible_since.is_none() {
            let hitbox = self.player.hitbox(size);
            if first_obstacle_hit(&hitbox, &self.obstacles).is_some() {
                outcome.hit = true;
                outcome.game_over = self.register_hit(now);
            }
        }

        self.obstacles.retain(|obstacle| !obstacle.is_off_screen());

        if let Some(since) = self.invincible_since {
            if now - since > self.config.invincibility_duration {
                self.invincible_since = None;
                log::debug!("Invincibility ended at t={:.2}", now);
            }
        }

        outcome
    }

    fn register_hit(&mut self, now: f32) -> Option<GameOverSummary> {
        self.lives = self.lives.saturating_sub(1);
        self.invincible_since = Some(now);
        log::debug!("Hit at t={:.2}, lives left: {}", now, self.lives);

        if self.lives > 0 {
            return None;
        }

        self.phase = Phase::GameOver;
        self.end_time = Some(now);
        let survival_time = now - self.start_time;
        let rank = self.rankings.insert(survival_time);
        self.last_rank = rank;
        log::info!(
            "Game over after {:.2}s (rank: {})",
            survival_time,
            rank.map_or_else(|| "unranked".to_string(), |r| (r + 1).to_string())
        );
        Some(GameOverSummary {
            survival_time,
            rank,
        })
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible_since.is_some()
    }

    pub fn obstacle_speed(&self) -> f32 {
        self.obstacle_speed
    }

    /// Final survival time once the game is over.
    pub fn survival_time(&self) -> Option<f32> {
        self.end_time.map(|end| end - self.start_time)
    }

    pub fn rankings(&self) -> &Rankings {
        &self.rankings
    }

    /// 1-based board position of this run, if it placed.
    pub fn player_rank(&self) -> Option<usize> {
        self.last_rank.map(|rank| rank + 1)
    }
}
