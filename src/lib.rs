// Library exports for testing
pub use entities::{
    Enemy, EnemyProjectile, Formation, GameState, Particle, Player, Projectile,
    create_explosion_particles,
};
pub use world::{InputState, Playfield, SpriteSizes, World, WorldEvent};

pub mod app;
pub mod assets;
pub mod audio;
pub mod collision;
pub mod entities;
pub mod input;
pub mod logging;
pub mod renderer;
pub mod settings;
pub mod world;

/// Gameplay tuning, in playfield pixels and frames
pub mod consts {
    /// Horizontal speed of the player while a direction key is held
    pub const PLAYER_SPEED: f32 = 5.0;
    /// Tilt applied to the player sprite while moving (radians)
    pub const PLAYER_TILT: f32 = 0.25;
    /// Gap between the player and the bottom of the playfield
    pub const PLAYER_BOTTOM_MARGIN: f32 = 10.0;

    pub const PROJECTILE_SPEED: f32 = 10.0;
    pub const PROJECTILE_RADIUS: f32 = 3.0;

    pub const ENEMY_PROJECTILE_SPEED: f32 = 5.0;
    pub const ENEMY_PROJECTILE_WIDTH: f32 = 3.0;
    pub const ENEMY_PROJECTILE_HEIGHT: f32 = 10.0;

    /// Grid pitch between formation members
    pub const GRID_PITCH_X: f32 = 40.0;
    pub const GRID_PITCH_Y: f32 = 50.0;
    /// Column count range (half-open)
    pub const FORMATION_COLUMNS: std::ops::Range<usize> = 5..13;
    /// Row count range (half-open)
    pub const FORMATION_ROWS: std::ops::Range<usize> = 2..5;
    pub const FORMATION_SPEED: f32 = 2.0;
    /// Downward step applied once per edge bounce
    pub const FORMATION_DROP: f32 = 40.0;

    /// Frames between enemy volleys
    pub const ENEMY_FIRE_PERIOD: u64 = 100;
    /// Frames between formation spawns, redrawn after every spawn (half-open)
    pub const SPAWN_INTERVAL: std::ops::Range<u32> = 500..1000;

    pub const POINTS_PER_ENEMY: u32 = 100;

    /// Sprite scale factors applied to the source images
    pub const PLAYER_SCALE: f32 = 0.20;
    pub const ENEMY_SCALE: f32 = 0.10;
}
