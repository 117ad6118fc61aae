use crate::config::GameConfig;
use crate::ranking::Rankings;
use crate::world::{FrameOutcome, World};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Scripted jump input for deterministic runs of the world.
#[derive(Debug, Deserialize, Clone)]
pub struct ReplaySequence {
    #[serde(default = "default_dt")]
    pub fixed_dt: f32,
    #[serde(default)]
    pub seed: u64,
    pub frames: Vec<ReplayFrame>,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct ReplayFrame {
    #[serde(default)]
    pub jump_pressed: bool,
    #[serde(default)]
    pub jump_released: bool,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

pub struct ReplayResult {
    pub world: World,
    pub outcomes: Vec<FrameOutcome>,
    /// Player top edge after each frame (y-down).
    pub player_y: Vec<f32>,
}

impl ReplayResult {
    /// Highest point the player reached; smallest y on screen.
    pub fn peak_y(&self) -> Option<f32> {
        self.player_y.iter().copied().reduce(f32::min)
    }
}

impl ReplaySequence {
    pub fn expanded_frames(&self) -> Vec<ReplayFrame> {
        let mut out = Vec::new();
        for frame in &self.frames {
            for _ in 0..frame.repeat.max(1) {
                out.push(*frame);
            }
        }
        out
    }

    pub fn run(&self, config: GameConfig) -> ReplayResult {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut world = World::new(config, Rankings::default(), 0.0);
        let mut outcomes = Vec::new();
        let mut player_y = Vec::new();
        for (i, frame) in self.expanded_frames().iter().enumerate() {
            if frame.jump_pressed {
                world.jump_pressed();
            }
            if frame.jump_released {
                world.jump_released();
            }
            let now = (i + 1) as f32 * self.fixed_dt;
            outcomes.push(world.update(now, &mut rng));
            player_y.push(world.player.position.y);
        }
        ReplayResult {
            world,
            outcomes,
            player_y,
        }
    }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplaySequence, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let replay: ReplaySequence = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse replay JSON {}: {e}", path.display()))?;
    validate_replay(&replay)?;
    Ok(replay)
}

fn validate_replay(replay: &ReplaySequence) -> Result<(), String> {
    if replay.fixed_dt <= 0.0 {
        return Err("Replay validation failed: fixed_dt must be > 0".to_string());
    }
    if replay.frames.is_empty() {
        return Err("Replay validation failed: frames list is empty".to_string());
    }
    Ok(())
}

const fn default_dt() -> f32 {
    1.0 / 60.0
}

const fn default_repeat() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_replay(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(json.as_bytes()).expect("write replay");
        file
    }

    #[test]
    fn replay_file_parses_and_expands() {
        let file = write_replay(
            r#"{
              "frames": [
                { "repeat": 3 },
                { "jump_pressed": true },
                { "jump_released": true, "repeat": 2 }
              ]
            }"#,
        );

        let replay = load_replay_from_path(file.path()).expect("replay should load");
        let expanded = replay.expanded_frames();
        assert_eq!(expanded.len(), 6);
        assert!(expanded[3].jump_pressed);
        assert!(expanded[5].jump_released);
        assert_eq!(replay.seed, 0);
    }

    #[test]
    fn empty_frames_are_rejected() {
        let file = write_replay(r#"{ "frames": [] }"#);
        let err = load_replay_from_path(file.path()).expect_err("empty replay should fail");
        assert!(err.contains("frames list is empty"));
    }

    #[test]
    fn replay_run_is_deterministic() {
        let file = write_replay(
            r#"{
              "seed": 77,
              "frames": [
                { "repeat": 90 },
                { "jump_pressed": true },
                { "repeat": 12 },
                { "jump_released": true },
                { "repeat": 400 },
                { "jump_pressed": true },
                { "repeat": 300 }
              ]
            }"#,
        );
        let replay = load_replay_from_path(file.path()).expect("replay should load");

        let a = replay.run(GameConfig::default());
        let b = replay.run(GameConfig::default());

        assert_eq!(a.outcomes, b.outcomes);
        assert_eq!(a.world.player, b.world.player);
        assert_eq!(a.world.obstacles, b.world.obstacles);
        assert_eq!(a.world.lives(), b.world.lives());
        assert!(a.outcomes.iter().any(|o| o.spawned));
    }

    #[test]
    fn short_tap_jumps_lower_than_held_jump() {
        let config = GameConfig {
            obstacle_spawn_interval: 10_000.0,
            ..GameConfig::default()
        };
        let peak = |hold_frames: u32| {
            let replay = ReplaySequence {
                fixed_dt: default_dt(),
                seed: 1,
                frames: vec![
                    ReplayFrame {
                        jump_pressed: false,
                        jump_released: false,
                        repeat: 30,
                    },
                    ReplayFrame {
                        jump_pressed: true,
                        jump_released: false,
                        repeat: 1,
                    },
                    ReplayFrame {
                        jump_pressed: false,
                        jump_released: false,
                        repeat: hold_frames,
                    },
                    ReplayFrame {
                        jump_pressed: false,
                        jump_released: true,
                        repeat: 1,
                    },
                    ReplayFrame {
                        jump_pressed: false,
                        jump_released: false,
                        repeat: 120,
                    },
                ],
            };
            let result = replay.run(config.clone());
            assert_eq!(result.player_y.len(), replay.expanded_frames().len());
            // Back on the ground either way.
            assert_eq!(result.world.player.position.y, 320.0);
            result.peak_y().expect("frames were played")
        };

        let tap = peak(3);
        let held = peak(40);
        assert!(tap > held, "tap peak {tap} should be lower than held {held}");
    }
}
