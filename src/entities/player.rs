use glam::Vec2;

use super::projectile::Projectile;
use crate::collision::Bounds;
use crate::consts::{PLAYER_BOTTOM_MARGIN, PLAYER_SPEED, PLAYER_TILT};
use crate::world::{InputState, Playfield};

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Tilt in radians, follows the direction of travel
    pub rotation: f32,
    pub size: Vec2,
}

impl Player {
    /// Centered horizontally, resting just above the bottom edge
    pub fn new(playfield: Playfield, size: Vec2) -> Self {
        Self {
            position: Vec2::new(
                playfield.width / 2.0 - size.x / 2.0,
                playfield.height - size.y - PLAYER_BOTTOM_MARGIN,
            ),
            velocity: Vec2::ZERO,
            rotation: 0.0,
            size,
        }
    }

    /// Steers from the held keys and advances. Left wins when both are held.
    pub fn update(&mut self, input: &InputState, playfield_width: f32) {
        let max_x = (playfield_width - self.size.x).max(0.0);

        if input.left && self.position.x > 0.0 {
            self.velocity.x = -PLAYER_SPEED;
            self.rotation = -PLAYER_TILT;
        } else if input.right && self.position.x < max_x {
            self.velocity.x = PLAYER_SPEED;
            self.rotation = PLAYER_TILT;
        } else {
            self.velocity.x = 0.0;
            self.rotation = 0.0;
        }

        self.position.x = (self.position.x + self.velocity.x).clamp(0.0, max_x);
    }

    /// Shot leaving the middle of the sprite's top edge
    pub fn fire(&self) -> Projectile {
        Projectile::upward(Vec2::new(
            self.position.x + self.size.x / 2.0,
            self.position.y,
        ))
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::from_position_size(self.position, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.position + self.size / 2.0
    }
}
