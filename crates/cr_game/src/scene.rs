//! Turns world state into canvas draw calls. Two screens: the running game
//! and the game-over board.

use cr_core::canvas::{Canvas, Color, ImageId};
use glam::Vec2;

use crate::obstacle::{Obstacle, ObstacleShape};
use crate::world::World;

/// Fixed cloud anchors across the top of the sky.
pub const CLOUD_POSITIONS: [Vec2; 5] = [
    Vec2::new(50.0, 3.0),
    Vec2::new(200.0, 10.0),
    Vec2::new(450.0, 15.0),
    Vec2::new(600.0, 5.0),
    Vec2::new(850.0, 10.0),
];
const CLOUD_SCALE: f32 = 0.5;
/// Top edge of the dirt band drawn under the ground platform.
const DIRT_TOP: f32 = 420.0;

fn sky() -> Color {
    Color::from_rgb8(135, 206, 235)
}

fn dirt() -> Color {
    Color::from_rgb8(139, 69, 19)
}

fn obstacle_red() -> Color {
    Color::from_rgb8(255, 0, 0)
}

pub fn draw_world(world: &World, canvas: &mut dyn Canvas) {
    if world.is_game_over() {
        draw_game_over(world, canvas);
    } else {
        draw_playing(world, canvas);
    }
}

fn draw_playing(world: &World, canvas: &mut dyn Canvas) {
    let config = world.config();
    canvas.clear(sky());

    canvas.fill_rect(
        0.0,
        DIRT_TOP,
        config.viewport_width,
        config.viewport_height - DIRT_TOP,
        dirt(),
    );

    let tint = if world.is_invincible() {
        obstacle_red()
    } else {
        Color::WHITE
    };
    canvas.draw_image(
        ImageId::Player,
        world.player.position.x,
        world.player.position.y,
        config.player_size,
        config.player_size,
        tint,
    );

    for platform in &world.platforms {
        canvas.fill_rect(
            platform.x,
            platform.y,
            platform.width,
            platform.height,
            dirt(),
        );
    }

    for obstacle in &world.obstacles {
        draw_obstacle(obstacle, canvas);
    }

    if let Some(cloud_size) = canvas.image_size(ImageId::Cloud) {
        let size = cloud_size * CLOUD_SCALE;
        for cloud in CLOUD_POSITIONS {
            canvas.draw_image(ImageId::Cloud, cloud.x, cloud.y, size.x, size.y, Color::WHITE);
        }
    }

    canvas.draw_text(&format!("Lives: {}", world.lives()), 10.0, 20.0, Color::WHITE);
}

fn draw_obstacle(obstacle: &Obstacle, canvas: &mut dyn Canvas) {
    let Vec2 { x, y } = obstacle.position;
    let Vec2 { x: w, y: h } = obstacle.size;
    match obstacle.shape {
        ObstacleShape::Rectangle => canvas.fill_rect(x, y - h, w, h, obstacle_red()),
        ObstacleShape::Triangle => canvas.fill_triangle(
            Vec2::new(x, y),
            Vec2::new(x + w / 2.0, y - h),
            Vec2::new(x + w, y),
            obstacle_red(),
        ),
        // Radius follows the width; tall narrow boxes draw a short circle.
        ObstacleShape::Circle => {
            canvas.fill_circle(Vec2::new(x + w / 2.0, y - h / 2.0), w / 2.0, obstacle_red())
        }
    }
}

fn draw_game_over(world: &World, canvas: &mut dyn Canvas) {
    let config = world.config();
    let cx = config.viewport_width / 2.0;
    let cy = config.viewport_height / 2.0;
    let left = cx - 80.0;
    canvas.clear(Color::BLACK);

    canvas.draw_text("Game Over!", cx - 40.0, cy - 20.0, Color::WHITE);
    let survived = world.survival_time().unwrap_or_default();
    canvas.draw_text(
        &format!("Time Survived: {survived:.2} seconds"),
        left,
        cy,
        Color::WHITE,
    );

    let rankings = world.rankings();
    canvas.draw_text(
        &format!("Top {} Rankings:", rankings.capacity()),
        left,
        cy + 40.0,
        Color::WHITE,
    );
    for (i, time) in rankings.times().iter().enumerate() {
        canvas.draw_text(
            &format!("{}: {time:.2} seconds", i + 1),
            left,
            cy + 60.0 + i as f32 * 20.0,
            Color::WHITE,
        );
    }

    if let Some(rank) = world.player_rank() {
        canvas.draw_text(
            &format!("Your Rank: {rank}"),
            left,
            cy + 60.0 + rankings.capacity() as f32 * 20.0 + 20.0,
            Color::WHITE,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::ranking::Rankings;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        Clear(Color),
        Rect(f32, f32, f32, f32),
        Triangle([Vec2; 3]),
        Circle(Vec2, f32),
        Image(ImageId, f32, f32, f32, f32, Color),
        Text(String, f32, f32),
    }

    #[derive(Default)]
    struct Recorder {
        ops: Vec<Op>,
        cloud_size: Option<Vec2>,
    }

    impl Recorder {
        fn texts(&self) -> Vec<&str> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    Op::Text(text, _, _) => Some(text.as_str()),
                    _ => None,
                })
                .collect()
        }

        fn images(&self, id: ImageId) -> Vec<&Op> {
            self.ops
                .iter()
                .filter(|op| matches!(op, Op::Image(image, ..) if *image == id))
                .collect()
        }
    }

    impl Canvas for Recorder {
        fn clear(&mut self, color: Color) {
            self.ops.push(Op::Clear(color));
        }
        fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, _color: Color) {
            self.ops.push(Op::Rect(x, y, width, height));
        }
        fn fill_triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, _color: Color) {
            self.ops.push(Op::Triangle([a, b, c]));
        }
        fn fill_circle(&mut self, center: Vec2, radius: f32, _color: Color) {
            self.ops.push(Op::Circle(center, radius));
        }
        fn draw_image(&mut self, image: ImageId, x: f32, y: f32, w: f32, h: f32, tint: Color) {
            self.ops.push(Op::Image(image, x, y, w, h, tint));
        }
        fn image_size(&self, image: ImageId) -> Option<Vec2> {
            match image {
                ImageId::Cloud => self.cloud_size,
                ImageId::Player => Some(Vec2::splat(64.0)),
            }
        }
        fn draw_text(&mut self, text: &str, x: f32, y: f32, _color: Color) {
            self.ops.push(Op::Text(text.to_string(), x, y));
        }
    }

    fn quiet_world(lives: u32, rankings: Rankings) -> World {
        let config = GameConfig {
            starting_lives: lives,
            obstacle_spawn_interval: 10_000.0,
            ..GameConfig::default()
        };
        World::new(config, rankings, 0.0)
    }

    fn obstacle(shape: ObstacleShape) -> Obstacle {
        Obstacle {
            position: Vec2::new(500.0, 400.0),
            size: Vec2::new(80.0, 60.0),
            shape,
        }
    }

    #[test]
    fn playing_screen_draws_sky_ground_player_and_lives() {
        let world = quiet_world(3, Rankings::default());
        let mut canvas = Recorder::default();
        draw_world(&world, &mut canvas);

        assert_eq!(canvas.ops[0], Op::Clear(sky()));
        assert!(canvas.ops.contains(&Op::Rect(0.0, 420.0, 1024.0, 348.0)));
        assert!(canvas.ops.contains(&Op::Rect(0.0, 400.0, 1024.0, 20.0)));
        assert_eq!(
            canvas.images(ImageId::Player),
            vec![&Op::Image(ImageId::Player, 100.0, 300.0, 80.0, 80.0, Color::WHITE)]
        );
        assert_eq!(canvas.texts(), vec!["Lives: 3"]);
    }

    #[test]
    fn obstacles_draw_by_shape_from_ground_line() {
        let mut world = quiet_world(3, Rankings::default());
        world.obstacles = vec![
            obstacle(ObstacleShape::Rectangle),
            obstacle(ObstacleShape::Triangle),
            obstacle(ObstacleShape::Circle),
        ];
        let mut canvas = Recorder::default();
        draw_world(&world, &mut canvas);

        assert!(canvas.ops.contains(&Op::Rect(500.0, 340.0, 80.0, 60.0)));
        assert!(canvas.ops.contains(&Op::Triangle([
            Vec2::new(500.0, 400.0),
            Vec2::new(540.0, 340.0),
            Vec2::new(580.0, 400.0),
        ])));
        assert!(canvas
            .ops
            .contains(&Op::Circle(Vec2::new(540.0, 370.0), 40.0)));
    }

    #[test]
    fn clouds_scale_with_image_and_skip_when_missing() {
        let world = quiet_world(3, Rankings::default());

        let mut without = Recorder::default();
        draw_world(&world, &mut without);
        assert!(without.images(ImageId::Cloud).is_empty());

        let mut with = Recorder {
            cloud_size: Some(Vec2::new(200.0, 120.0)),
            ..Recorder::default()
        };
        draw_world(&world, &mut with);
        let clouds = with.images(ImageId::Cloud);
        assert_eq!(clouds.len(), CLOUD_POSITIONS.len());
        assert_eq!(
            clouds[0],
            &Op::Image(ImageId::Cloud, 50.0, 3.0, 100.0, 60.0, Color::WHITE)
        );
    }

    #[test]
    fn invincible_player_is_tinted_red() {
        let mut world = quiet_world(3, Rankings::default());
        let mut rng = StdRng::seed_from_u64(5);
        world.obstacles.push(Obstacle {
            position: Vec2::new(150.0, 400.0),
            ..obstacle(ObstacleShape::Circle)
        });
        world.update(0.5, &mut rng);
        assert!(world.is_invincible());

        let mut canvas = Recorder::default();
        draw_world(&world, &mut canvas);
        let player = canvas.images(ImageId::Player);
        assert!(matches!(player[0], Op::Image(_, _, _, _, _, tint) if *tint == obstacle_red()));
        assert!(canvas.texts().contains(&"Lives: 2"));
    }

    #[test]
    fn game_over_screen_lists_rankings_and_rank() {
        let mut world = quiet_world(1, Rankings::from_unsorted([20.0, 3.0], 10));
        let mut rng = StdRng::seed_from_u64(5);
        world.obstacles.push(Obstacle {
            position: Vec2::new(150.0, 400.0),
            ..obstacle(ObstacleShape::Rectangle)
        });
        world.update(12.5, &mut rng);
        assert!(world.is_game_over());

        let mut canvas = Recorder::default();
        draw_world(&world, &mut canvas);
        assert_eq!(canvas.ops[0], Op::Clear(Color::BLACK));
        assert_eq!(
            canvas.texts(),
            vec![
                "Game Over!",
                "Time Survived: 12.50 seconds",
                "Top 10 Rankings:",
                "1: 20.00 seconds",
                "2: 12.50 seconds",
                "3: 3.00 seconds",
                "Your Rank: 2",
            ]
        );
        assert!(canvas
            .ops
            .contains(&Op::Text("Your Rank: 2".to_string(), 432.0, 664.0)));
    }
}
