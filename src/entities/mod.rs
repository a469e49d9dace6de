mod enemy;
mod formation;
mod game_state;
mod particle;
mod player;
mod projectile;

// Re-export all public types
pub use enemy::Enemy;
pub use formation::Formation;
pub use game_state::GameState;
pub use particle::{Particle, create_explosion_particles};
pub use player::Player;
pub use projectile::{EnemyProjectile, Projectile};
