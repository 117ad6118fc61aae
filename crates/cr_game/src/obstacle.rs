use glam::Vec2;

use crate::collision::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleShape {
    Rectangle,
    Triangle,
    Circle,
}

impl ObstacleShape {
    pub const ALL: [ObstacleShape; 3] = [
        ObstacleShape::Rectangle,
        ObstacleShape::Triangle,
        ObstacleShape::Circle,
    ];
}

/// Obstacles stand on the ground line. `position` is the bottom-left corner:
/// x is the left edge, y the line the shape rests on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub position: Vec2,
    pub size: Vec2,
    pub shape: ObstacleShape,
}

impl Obstacle {
    /// Collision box, identical for every shape.
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y - self.size.y,
            self.size.x,
            self.size.y,
        )
    }

    pub fn scroll(&mut self, speed: f32) {
        self.position.x -= speed;
    }

    /// Entirely past the left edge of the screen.
    pub fn is_off_screen(&self) -> bool {
        self.position.x + self.size.x < 0.0
    }
}
