use glam::Vec2;

use crate::collision::Rect;

/// The runner. Position is the top-left of its square hitbox, y grows downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Player {
    pub position: Vec2,
    pub velocity: Vec2,
    pub jumping: bool,
}

impl Player {
    pub fn new(start: Vec2) -> Self {
        Self {
            position: start,
            velocity: Vec2::ZERO,
            jumping: false,
        }
    }

    /// One frame of explicit Euler: gravity into velocity, velocity into position.
    pub fn integrate(&mut self, gravity: f32) {
        self.velocity.y += gravity;
        self.position += self.velocity;
    }

    /// Jump is only legal while not already airborne from a jump.
    pub fn press_jump(&mut self, jump_force: f32) -> bool {
        if self.jumping {
            return false;
        }
        self.velocity.y = jump_force;
        self.jumping = true;
        true
    }

    /// Releasing the key kills vertical velocity outright, cutting the arc short.
    pub fn release_jump(&mut self) {
        self.velocity.y = 0.0;
    }

    pub fn hitbox(&self, size: f32) -> Rect {
        Rect::new(self.position.x, self.position.y, size, size)
    }

    /// Put the player's feet on `surface_y` and clear vertical motion.
    pub fn land_on(&mut self, surface_y: f32, size: f32) {
        self.velocity.y = 0.0;
        self.position.y = surface_y - size;
        self.jumping = false;
    }
}
