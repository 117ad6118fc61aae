//! Axis-aligned box overlap tests.
//!
//! Everything collides as a rectangle: the player is a fixed square, platforms
//! are rectangles, and obstacles use their bounding box whatever shape they are
//! drawn as. There is no broad phase; a frame tests one ground platform and the
//! handful of obstacles currently on screen.

use crate::obstacle::Obstacle;
use crate::player::Player;

/// Rectangle with a top-left origin in y-down screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Strict overlap: boxes that only share an edge do not collide.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.right() > other.x
            && self.x < other.right()
            && self.bottom() > other.y
            && self.y < other.bottom()
    }
}

/// Stand the player on every platform it overlaps, in order. With several
/// overlapping platforms the last one wins. Returns whether any landing
/// happened this frame.
pub fn resolve_platforms(player: &mut Player, platforms: &[Rect], player_size: f32) -> bool {
    let mut landed = false;
    for platform in platforms {
        if player.hitbox(player_size).overlaps(platform) {
            player.land_on(platform.y, player_size);
            landed = true;
        }
    }
    landed
}

/// Index of the first obstacle whose bounds overlap `hitbox`.
pub fn first_obstacle_hit(hitbox: &Rect, obstacles: &[Obstacle]) -> Option<usize> {
    obstacles
        .iter()
        .position(|obstacle| hitbox.overlaps(&obstacle.bounds()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::obstacle::ObstacleShape;
    use glam::Vec2;

    const GROUND: Rect = Rect::new(0.0, 400.0, 1024.0, 20.0);

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        let c = Rect::new(0.0, 10.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
        assert!(!a.overlaps(&c));
        assert!(a.overlaps(&Rect::new(9.9, 9.9, 1.0, 1.0)));
    }

    #[test]
    fn falling_into_ground_lands_on_top() {
        let mut player = Player::new(Vec2::new(100.0, 325.0));
        player.velocity.y = 6.0;
        player.jumping = true;

        assert!(resolve_platforms(&mut player, &[GROUND], 80.0));
        assert_eq!(player.velocity.y, 0.0);
        assert_eq!(player.position.y, GROUND.y - 80.0);
        assert!(!player.jumping);
    }

    #[test]
    fn player_above_ground_is_untouched() {
        let mut player = Player::new(Vec2::new(100.0, 200.0));
        player.velocity.y = 3.0;
        assert!(!resolve_platforms(&mut player, &[GROUND], 80.0));
        assert_eq!(player.velocity.y, 3.0);
        assert_eq!(player.position.y, 200.0);
    }

    #[test]
    fn player_past_platform_edge_falls_through() {
        let mut player = Player::new(Vec2::new(1100.0, 330.0));
        assert!(!resolve_platforms(&mut player, &[GROUND], 80.0));
    }

    #[test]
    fn last_overlapping_platform_wins() {
        let low = Rect::new(0.0, 400.0, 500.0, 20.0);
        let high = Rect::new(0.0, 390.0, 500.0, 40.0);
        let mut player = Player::new(Vec2::new(100.0, 330.0));
        assert!(resolve_platforms(&mut player, &[low, high], 80.0));
        assert_eq!(player.position.y, 390.0 - 80.0);
    }

    #[test]
    fn circle_obstacle_hits_by_bounding_box_corner() {
        // The drawn circle would miss this corner; the box does not.
        let obstacle = Obstacle {
            position: Vec2::new(200.0, 400.0),
            size: Vec2::new(100.0, 100.0),
            shape: ObstacleShape::Circle,
        };
        let hitbox = Rect::new(125.0, 225.0, 80.0, 80.0);
        assert_eq!(first_obstacle_hit(&hitbox, &[obstacle]), Some(0));
    }

    #[test]
    fn first_hit_reports_earliest_index() {
        let far = Obstacle {
            position: Vec2::new(900.0, 400.0),
            size: Vec2::new(60.0, 60.0),
            shape: ObstacleShape::Rectangle,
        };
        let near = Obstacle {
            position: Vec2::new(150.0, 400.0),
            size: Vec2::new(60.0, 60.0),
            shape: ObstacleShape::Triangle,
        };
        let hitbox = Rect::new(100.0, 320.0, 80.0, 80.0);
        assert_eq!(first_obstacle_hit(&hitbox, &[far, near]), Some(1));
        assert_eq!(first_obstacle_hit(&hitbox, &[far]), None);
    }
}
