//! The owned simulation state and the per-frame tick
//!
//! Every collection is mutated synchronously inside [`World::tick`]. Collision
//! sweeps only mark what they hit; a single compaction pass afterwards removes
//! the marked projectiles and enemies, so nothing visited in a sweep changes
//! under it.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::collision::circle_hits_box;
use crate::consts::{ENEMY_FIRE_PERIOD, POINTS_PER_ENEMY, SPAWN_INTERVAL};
use crate::entities::{
    EnemyProjectile, Formation, GameState, Particle, Player, Projectile,
    create_explosion_particles,
};

/// Visible bounds of the simulation, in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

/// Collision sizes taken from the loaded sprites
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteSizes {
    pub player: Vec2,
    pub enemy: Vec2,
}

/// Level-triggered movement keys for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
}

/// Things that happened during a frame, drained by the app for sound and logging
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorldEvent {
    PlayerFired,
    EnemyFired,
    EnemyDestroyed { position: Vec2 },
    FormationSpawned { id: u32, enemies: usize },
    FormationCleared { id: u32 },
    PlayerDefeated,
}

pub struct World {
    pub state: GameState,
    pub player: Player,
    pub projectiles: Vec<Projectile>,
    pub enemy_projectiles: Vec<EnemyProjectile>,
    pub formations: Vec<Formation>,
    pub particles: Vec<Particle>,
    pub score: u32,
    pub frame_count: u64,
    playfield: Playfield,
    sprites: SpriteSizes,
    /// Ticks left before the next formation spawns
    frames_until_spawn: u32,
    next_formation_id: u32,
    rng: Pcg32,
    events: Vec<WorldEvent>,
}

impl World {
    pub fn new(playfield: Playfield, sprites: SpriteSizes, seed: u64) -> Self {
        Self {
            state: GameState::Running,
            player: Player::new(playfield, sprites.player),
            projectiles: Vec::new(),
            enemy_projectiles: Vec::new(),
            formations: Vec::new(),
            particles: Vec::new(),
            score: 0,
            frame_count: 0,
            playfield,
            sprites,
            // First tick spawns immediately
            frames_until_spawn: 0,
            next_formation_id: 0,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    pub fn playfield(&self) -> Playfield {
        self.playfield
    }

    pub fn sprites(&self) -> SpriteSizes {
        self.sprites
    }

    pub fn frames_until_spawn(&self) -> u32 {
        self.frames_until_spawn
    }

    pub fn enemy_count(&self) -> usize {
        self.formations.iter().map(Formation::len).sum()
    }

    /// Events recorded since the last call
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.events)
    }

    /// Fresh world on the same playfield, seeded from this one's RNG
    pub fn restart(&mut self) {
        let seed = self.rng.random();
        *self = Self::new(self.playfield, self.sprites, seed);
    }

    pub fn toggle_pause(&mut self) {
        self.state = self.state.toggled_pause();
    }

    /// Edge-triggered shot. Ignored unless the game is running.
    pub fn fire(&mut self) -> bool {
        if !self.state.is_running() {
            return false;
        }

        self.projectiles.push(self.player.fire());
        self.events.push(WorldEvent::PlayerFired);
        true
    }

    /// Advance the simulation by one frame
    pub fn tick(&mut self, input: &InputState) {
        match self.state {
            GameState::Running => {}
            GameState::Paused => return,
            // Only the explosions play out behind the defeat screen
            GameState::PlayerDefeated => {
                self.update_particles();
                return;
            }
        }

        self.frame_count += 1;

        self.player.update(input, self.playfield.width);
        self.update_projectiles();
        self.update_formations();
        self.update_particles();

        self.resolve_projectile_hits();
        self.resolve_player_hits();

        if !self.state.is_running() {
            return;
        }

        if self.frame_count.is_multiple_of(ENEMY_FIRE_PERIOD) {
            self.enemy_volley();
        }

        self.advance_spawn_timer();
    }

    fn update_projectiles(&mut self) {
        for projectile in &mut self.projectiles {
            projectile.update();
        }
        self.projectiles.retain(|p| !p.is_off_playfield());

        for projectile in &mut self.enemy_projectiles {
            projectile.update();
        }
        let height = self.playfield.height;
        self.enemy_projectiles
            .retain(|p| !p.is_off_playfield(height));
    }

    fn update_formations(&mut self) {
        for formation in &mut self.formations {
            formation.update(self.playfield.width);
        }

        // Formations that sank below the playfield are gone for good
        let height = self.playfield.height;
        self.formations.retain(|f| {
            let below = f.position.y >= height;
            if below {
                log::debug!("formation {} left the playfield", f.id);
            }
            !below
        });
    }

    fn update_particles(&mut self) {
        for particle in &mut self.particles {
            particle.update();
        }

        let playfield = self.playfield;
        self.particles
            .retain(|p| !p.is_dead() && !p.is_out_of_bounds(playfield));
    }

    /// Player shots against formation members: mark, then compact
    fn resolve_projectile_hits(&mut self) {
        let mut spent = vec![false; self.projectiles.len()];
        let mut hit: Vec<Vec<bool>> = self
            .formations
            .iter()
            .map(|f| vec![false; f.len()])
            .collect();
        let mut any_hit = false;

        for (p_idx, projectile) in self.projectiles.iter().enumerate() {
            'formations: for (f_idx, formation) in self.formations.iter().enumerate() {
                if !circle_hits_box(projectile.position, projectile.radius, &formation.bounds()) {
                    continue;
                }

                for (e_idx, enemy) in formation.enemies.iter().enumerate() {
                    // Each enemy absorbs at most one shot per tick
                    if hit[f_idx][e_idx] {
                        continue;
                    }

                    if circle_hits_box(projectile.position, projectile.radius, &enemy.bounds()) {
                        hit[f_idx][e_idx] = true;
                        spent[p_idx] = true;
                        any_hit = true;
                        break 'formations;
                    }
                }
            }
        }

        if !any_hit {
            return;
        }

        let mut idx = 0;
        self.projectiles.retain(|_| {
            let keep = !spent[idx];
            idx += 1;
            keep
        });

        for (formation, marked) in self.formations.iter_mut().zip(&hit) {
            for enemy in formation.remove_marked(marked) {
                let center = enemy.center();
                self.score += POINTS_PER_ENEMY;
                self.particles.extend(create_explosion_particles(center));
                self.events
                    .push(WorldEvent::EnemyDestroyed { position: center });
            }
        }

        let events = &mut self.events;
        self.formations.retain(|f| {
            if f.is_empty() {
                log::debug!("formation {} cleared", f.id);
                events.push(WorldEvent::FormationCleared { id: f.id });
                false
            } else {
                true
            }
        });
    }

    /// Enemy shots against the player. Any overlap ends the game.
    fn resolve_player_hits(&mut self) {
        let player_bounds = self.player.bounds();
        let before = self.enemy_projectiles.len();
        self.enemy_projectiles
            .retain(|p| !p.bounds().overlaps(&player_bounds));

        if self.enemy_projectiles.len() < before {
            self.defeat_player();
        }
    }

    fn defeat_player(&mut self) {
        if self.state.is_terminal() {
            return;
        }

        log::info!(
            "player defeated on frame {} with score {}",
            self.frame_count,
            self.score
        );
        self.state = GameState::PlayerDefeated;
        self.particles
            .extend(create_explosion_particles(self.player.center()));
        self.events.push(WorldEvent::PlayerDefeated);
    }

    /// One shot per formation, from a random surviving member
    fn enemy_volley(&mut self) {
        for formation in &self.formations {
            if formation.is_empty() {
                continue;
            }

            let shooter = self.rng.random_range(0..formation.len());
            self.enemy_projectiles
                .push(formation.enemies[shooter].emit_projectile());
            self.events.push(WorldEvent::EnemyFired);
        }
    }

    fn advance_spawn_timer(&mut self) {
        if self.frames_until_spawn == 0 {
            self.spawn_formation();
            self.frames_until_spawn = self.rng.random_range(SPAWN_INTERVAL);
        }
        self.frames_until_spawn -= 1;
    }

    fn spawn_formation(&mut self) {
        let id = self.next_formation_id;
        self.next_formation_id += 1;

        let formation = Formation::random(id, &mut self.rng, self.sprites.enemy);
        log::debug!(
            "spawned formation {} ({}x{})",
            id,
            formation.columns,
            formation.rows
        );
        self.events.push(WorldEvent::FormationSpawned {
            id,
            enemies: formation.len(),
        });
        self.formations.push(formation);
    }
}
