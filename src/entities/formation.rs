use glam::Vec2;
use rand::Rng;

use super::enemy::Enemy;
use crate::collision::Bounds;
use crate::consts::{
    FORMATION_COLUMNS, FORMATION_DROP, FORMATION_ROWS, FORMATION_SPEED, GRID_PITCH_X, GRID_PITCH_Y,
};

/// A rigid grid of enemies that sweeps side to side and steps down on every bounce
#[derive(Debug, Clone, PartialEq)]
pub struct Formation {
    pub id: u32,
    /// Top-left corner of the surviving members' bounds
    pub position: Vec2,
    pub velocity: Vec2,
    /// Extent of the surviving members, recomputed on every removal
    pub width: f32,
    pub height: f32,
    pub columns: usize,
    pub rows: usize,
    /// Column-major: every row of column 0, then column 1, ...
    pub enemies: Vec<Enemy>,
}

impl Formation {
    /// Builds a `columns` x `rows` grid anchored at the playfield's top-left corner
    pub fn new(id: u32, columns: usize, rows: usize, enemy_size: Vec2) -> Self {
        let mut enemies = Vec::with_capacity(columns * rows);
        for col in 0..columns {
            for row in 0..rows {
                enemies.push(Enemy::new(
                    Vec2::new(col as f32 * GRID_PITCH_X, row as f32 * GRID_PITCH_Y),
                    enemy_size,
                ));
            }
        }

        let mut formation = Self {
            id,
            position: Vec2::ZERO,
            velocity: Vec2::new(FORMATION_SPEED, 0.0),
            width: 0.0,
            height: 0.0,
            columns,
            rows,
            enemies,
        };
        formation.recompute_bounds();
        formation
    }

    /// Grid with a random number of columns and rows
    pub fn random<R: Rng>(id: u32, rng: &mut R, enemy_size: Vec2) -> Self {
        let columns = rng.random_range(FORMATION_COLUMNS);
        let rows = rng.random_range(FORMATION_ROWS);
        Self::new(id, columns, rows, enemy_size)
    }

    /// Advances one frame. Returns true when the formation bounced off an edge.
    pub fn update(&mut self, playfield_width: f32) -> bool {
        self.advance(self.velocity);

        let hit_right = self.velocity.x > 0.0 && self.position.x + self.width >= playfield_width;
        let hit_left = self.velocity.x < 0.0 && self.position.x <= 0.0;

        if hit_right || hit_left {
            self.velocity.x = -self.velocity.x;
            self.advance(Vec2::new(0.0, FORMATION_DROP));
            return true;
        }

        false
    }

    fn advance(&mut self, delta: Vec2) {
        self.position += delta;
        for enemy in &mut self.enemies {
            enemy.update(delta);
        }
    }

    /// Removes every member whose index is flagged and recomputes the bounds
    /// before returning. Returns the removed members in their original order.
    pub fn remove_marked(&mut self, marked: &[bool]) -> Vec<Enemy> {
        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.enemies.len());

        for (idx, enemy) in self.enemies.drain(..).enumerate() {
            if marked.get(idx).copied().unwrap_or(false) {
                removed.push(enemy);
            } else {
                kept.push(enemy);
            }
        }

        self.enemies = kept;
        if !removed.is_empty() {
            self.recompute_bounds();
        }
        removed
    }

    /// Snaps position and extent to the leftmost/rightmost and top/bottom members
    pub fn recompute_bounds(&mut self) {
        if let Some(bounds) = self.member_bounds() {
            self.position = bounds.min;
            self.width = bounds.width();
            self.height = bounds.height();
        } else {
            self.width = 0.0;
            self.height = 0.0;
        }
    }

    fn member_bounds(&self) -> Option<Bounds> {
        self.enemies
            .iter()
            .map(Enemy::bounds)
            .reduce(|acc, b| acc.union(&b))
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::from_position_size(self.position, Vec2::new(self.width, self.height))
    }

    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }

    pub fn len(&self) -> usize {
        self.enemies.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const ENEMY: Vec2 = Vec2::new(30.0, 30.0);

    #[test]
    fn test_formation_new_grid_positions() {
        let formation = Formation::new(0, 5, 2, ENEMY);
        assert_eq!(formation.len(), 10);

        let mut idx = 0;
        for col in 0..5 {
            for row in 0..2 {
                assert_eq!(
                    formation.enemies[idx].position,
                    Vec2::new(col as f32 * 40.0, row as f32 * 50.0)
                );
                idx += 1;
            }
        }
    }

    #[test]
    fn test_formation_new_bounds() {
        let formation = Formation::new(0, 5, 2, ENEMY);
        assert_eq!(formation.position, Vec2::ZERO);
        assert_eq!(formation.velocity, Vec2::new(2.0, 0.0));
        // 4 pitches plus one enemy width
        assert_eq!(formation.width, 190.0);
        assert_eq!(formation.height, 80.0);
    }

    #[test]
    fn test_formation_random_dimensions_in_range() {
        let mut rng = Pcg32::seed_from_u64(7);
        for id in 0..50 {
            let formation = Formation::random(id, &mut rng, ENEMY);
            assert!((5..13).contains(&formation.columns));
            assert!((2..5).contains(&formation.rows));
            assert_eq!(formation.len(), formation.columns * formation.rows);
        }
    }

    #[test]
    fn test_formation_random_is_reproducible() {
        let a = Formation::random(0, &mut Pcg32::seed_from_u64(99), ENEMY);
        let b = Formation::random(0, &mut Pcg32::seed_from_u64(99), ENEMY);
        assert_eq!(a.columns, b.columns);
        assert_eq!(a.rows, b.rows);
        assert_eq!(a.enemies, b.enemies);
    }

    #[test]
    fn test_formation_update_moves_members() {
        let mut formation = Formation::new(0, 5, 2, ENEMY);
        assert!(!formation.update(800.0));
        assert_eq!(formation.position, Vec2::new(2.0, 0.0));
        assert_eq!(formation.enemies[0].position, Vec2::new(2.0, 0.0));
        assert_eq!(formation.enemies[9].position, Vec2::new(162.0, 50.0));
    }

    #[test]
    fn test_formation_reverses_at_right_edge_with_one_drop() {
        let mut formation = Formation::new(0, 5, 2, ENEMY);
        // width 190: touching 800 once x reaches 610
        formation.position.x = 606.0;
        for enemy in &mut formation.enemies {
            enemy.position.x += 606.0;
        }

        assert!(!formation.update(800.0));
        assert_eq!(formation.velocity.x, 2.0);

        assert!(formation.update(800.0));
        assert_eq!(formation.velocity.x, -2.0);
        assert_eq!(formation.position, Vec2::new(610.0, 40.0));
        assert_eq!(formation.enemies[0].position, Vec2::new(610.0, 40.0));

        // Moving away from the edge does not bounce again
        assert!(!formation.update(800.0));
        assert_eq!(formation.velocity.x, -2.0);
        assert_eq!(formation.position.y, 40.0);
    }

    #[test]
    fn test_formation_reverses_at_left_edge() {
        let mut formation = Formation::new(0, 5, 2, ENEMY);
        formation.velocity.x = -2.0;
        formation.position.x = 2.0;
        for enemy in &mut formation.enemies {
            enemy.position.x += 2.0;
        }

        assert!(formation.update(800.0));
        assert_eq!(formation.velocity.x, 2.0);
        assert_eq!(formation.position, Vec2::new(0.0, 40.0));
    }

    #[test]
    fn test_remove_marked_recomputes_width_from_survivors() {
        let mut formation = Formation::new(0, 5, 2, ENEMY);
        // Drop the whole first and last column
        let mut marked = vec![false; 10];
        marked[0] = true;
        marked[1] = true;
        marked[8] = true;
        marked[9] = true;

        let removed = formation.remove_marked(&marked);
        assert_eq!(removed.len(), 4);
        assert_eq!(formation.len(), 6);
        assert_eq!(formation.position, Vec2::new(40.0, 0.0));
        // columns 1..=3: 120 - 40 + 30
        assert_eq!(formation.width, 110.0);
    }

    #[test]
    fn test_remove_marked_keeps_order() {
        let mut formation = Formation::new(0, 3, 1, ENEMY);
        formation.remove_marked(&[false, true, false]);
        assert_eq!(formation.enemies[0].position.x, 0.0);
        assert_eq!(formation.enemies[1].position.x, 80.0);
    }

    #[test]
    fn test_remove_all_leaves_empty_formation() {
        let mut formation = Formation::new(0, 5, 2, ENEMY);
        formation.remove_marked(&[true; 10]);
        assert!(formation.is_empty());
        assert_eq!(formation.width, 0.0);
    }

    #[test]
    fn test_remove_nothing_is_a_no_op() {
        let mut formation = Formation::new(0, 5, 2, ENEMY);
        let removed = formation.remove_marked(&[]);
        assert!(removed.is_empty());
        assert_eq!(formation.len(), 10);
        assert_eq!(formation.width, 190.0);
    }

    // Property-based tests
    #[cfg(test)]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_width_matches_survivors_after_any_removal(
                columns in 5usize..13,
                rows in 2usize..5,
                seed in any::<u64>(),
            ) {
                let mut formation = Formation::new(0, columns, rows, ENEMY);
                let mut rng = Pcg32::seed_from_u64(seed);
                let marked: Vec<bool> = (0..formation.len()).map(|_| rng.random_bool(0.4)).collect();
                formation.remove_marked(&marked);

                if let (Some(left), Some(right)) = (
                    formation.enemies.iter().map(|e| e.position.x).reduce(f32::min),
                    formation.enemies.iter().map(|e| e.position.x + e.size.x).reduce(f32::max),
                ) {
                    prop_assert_eq!(formation.width, right - left);
                    prop_assert_eq!(formation.position.x, left);
                } else {
                    prop_assert!(formation.is_empty());
                }
            }

            #[test]
            fn test_formation_flips_only_at_edges(
                columns in 5usize..13,
                rows in 2usize..5,
            ) {
                let width = 800.0;
                let mut formation = Formation::new(0, columns, rows, ENEMY);
                for _ in 0..2000 {
                    let before = formation.velocity.x;
                    let y_before = formation.position.y;
                    let bounced = formation.update(width);
                    let at_edge = formation.position.x <= 0.0
                        || formation.position.x + formation.width >= width;

                    if bounced {
                        prop_assert!(at_edge);
                        prop_assert_eq!(formation.velocity.x, -before);
                        prop_assert_eq!(formation.position.y, y_before + 40.0);
                    } else {
                        prop_assert_eq!(formation.velocity.x, before);
                        prop_assert_eq!(formation.position.y, y_before);
                    }
                }
            }
        }
    }
}
