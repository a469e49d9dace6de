use glam::Vec2;

use crate::collision::Bounds;
use crate::consts::{
    ENEMY_PROJECTILE_HEIGHT, ENEMY_PROJECTILE_SPEED, ENEMY_PROJECTILE_WIDTH, PROJECTILE_RADIUS,
    PROJECTILE_SPEED,
};

/// Shot fired upward by the player
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
}

impl Projectile {
    pub fn new(position: Vec2, velocity: Vec2) -> Self {
        Self {
            position,
            velocity,
            radius: PROJECTILE_RADIUS,
        }
    }

    /// Straight-up shot at the standard speed
    pub fn upward(position: Vec2) -> Self {
        Self::new(position, Vec2::new(0.0, -PROJECTILE_SPEED))
    }

    pub fn update(&mut self) {
        self.position += self.velocity;
    }

    /// True once the whole circle is above the playfield
    pub fn is_off_playfield(&self) -> bool {
        self.position.y + self.radius <= 0.0
    }
}

/// Shot dropped by an enemy
#[derive(Debug, Clone, PartialEq)]
pub struct EnemyProjectile {
    pub position: Vec2,
    pub velocity: Vec2,
    pub size: Vec2,
}

impl EnemyProjectile {
    /// Falls straight down; enemy shots never drift sideways
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::new(0.0, ENEMY_PROJECTILE_SPEED),
            size: Vec2::new(ENEMY_PROJECTILE_WIDTH, ENEMY_PROJECTILE_HEIGHT),
        }
    }

    pub fn update(&mut self) {
        self.position += self.velocity;
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::from_position_size(self.position, self.size)
    }

    /// True once the top edge has passed the bottom of the playfield
    pub fn is_off_playfield(&self, playfield_height: f32) -> bool {
        self.position.y >= playfield_height
    }
}
