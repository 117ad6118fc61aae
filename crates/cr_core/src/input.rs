//! Keyboard state with both level-triggered and edge-triggered queries.
//!
//! Jump needs both edges: a press starts a jump, a release cuts the arc. The
//! window layer records transitions as they arrive; the game loop reads them
//! during fixed steps and calls `end_frame()` only after at least one step has
//! consumed them, so a tap that lands on a zero-step frame is not lost.

use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Space,
    Escape,
    F3,
}

/// Keys that act as the jump button.
pub const JUMP_KEYS: [Key; 2] = [Key::Up, Key::Space];

#[derive(Debug, Default)]
pub struct InputState {
    held: HashSet<Key>,
    just_pressed: HashSet<Key>,
    just_released: HashSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        // OS key repeat arrives as extra presses; only the first one is an edge.
        if self.held.insert(key) {
            self.just_pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        if self.held.remove(&key) {
            self.just_released.insert(key);
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    pub fn is_just_released(&self, key: Key) -> bool {
        self.just_released.contains(&key)
    }

    pub fn jump_just_pressed(&self) -> bool {
        JUMP_KEYS.iter().any(|&key| self.is_just_pressed(key))
    }

    pub fn jump_just_released(&self) -> bool {
        JUMP_KEYS.iter().any(|&key| self.is_just_released(key))
    }

    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }
}
