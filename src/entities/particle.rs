use glam::Vec2;

use crate::world::Playfield;

/// Debris speed in pixels per frame
const BURST_SPEED: f32 = 4.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub lifetime: u8,
    pub char: char,
}

impl Particle {
    pub fn new(position: Vec2, velocity: Vec2, lifetime: u8, char: char) -> Self {
        Self {
            position,
            velocity,
            lifetime,
            char,
        }
    }

    pub fn update(&mut self) {
        self.lifetime = self.lifetime.saturating_sub(1);
        self.position += self.velocity;
    }

    pub fn is_dead(&self) -> bool {
        self.lifetime == 0
    }

    pub fn is_out_of_bounds(&self, playfield: Playfield) -> bool {
        self.position.x < 0.0
            || self.position.y < 0.0
            || self.position.x >= playfield.width
            || self.position.y >= playfield.height
    }
}

/// Creates an explosion particle effect at the given position
pub fn create_explosion_particles(center: Vec2) -> Vec<Particle> {
    // 8 directions (cardinal + diagonal)
    let directions = [
        Vec2::new(0.0, -1.0),
        Vec2::new(1.0, -1.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(0.0, 1.0),
        Vec2::new(-1.0, 1.0),
        Vec2::new(-1.0, 0.0),
        Vec2::new(-1.0, -1.0),
    ];

    let mut particles: Vec<Particle> = directions
        .iter()
        .map(|dir| Particle::new(center, dir.normalize() * BURST_SPEED, 12, '*'))
        .collect();

    // Brief flash in the middle
    particles.push(Particle::new(center, Vec2::ZERO, 6, 'o'));

    particles
}
