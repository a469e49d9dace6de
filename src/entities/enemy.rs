use glam::Vec2;

use super::projectile::EnemyProjectile;
use crate::collision::Bounds;

/// One fire in a formation. It has no motion of its own.
#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub position: Vec2,
    pub size: Vec2,
}

impl Enemy {
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self { position, size }
    }

    /// Follow the owning formation
    pub fn update(&mut self, parent_velocity: Vec2) {
        self.position += parent_velocity;
    }

    /// Shot dropped from the lower-center of the sprite
    pub fn emit_projectile(&self) -> EnemyProjectile {
        EnemyProjectile::new(Vec2::new(
            self.position.x + self.size.x / 2.0,
            self.position.y + self.size.y,
        ))
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::from_position_size(self.position, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.position + self.size / 2.0
    }
}
