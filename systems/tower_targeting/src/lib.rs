#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that selects the enemy a tower should shoot at.
//!
//! Among the enemies that are alive, still on the path, and within range,
//! the one furthest along the route (highest path index) wins. Ties go to
//! the enemy that spawned first.

use tower_defense_core::{EnemyId, EnemyView, TowerSnapshot, TowerTarget, Vector2D};

/// Tower targeting system that reuses a scratch buffer between calls.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    candidates: Vec<Candidate>,
}

impl TowerTargeting {
    /// Creates a new tower targeting system with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects the target of `tower` among `enemies`, if any is in range.
    pub fn handle(&mut self, tower: &TowerSnapshot, enemies: &EnemyView) -> Option<TowerTarget> {
        self.prepare_candidates(tower, enemies);

        let mut best: Option<Candidate> = None;
        for candidate in &self.candidates {
            match &mut best {
                Some(existing) => {
                    if candidate.precedes(existing) {
                        *existing = *candidate;
                    }
                }
                None => best = Some(*candidate),
            }
        }

        best.map(|candidate| TowerTarget {
            tower: tower.id,
            enemy: candidate.enemy,
            enemy_position: candidate.position,
        })
    }

    fn prepare_candidates(&mut self, tower: &TowerSnapshot, enemies: &EnemyView) {
        self.candidates.clear();
        let range = tower.range as f32;

        for snapshot in enemies.iter() {
            if !snapshot.is_active() {
                continue;
            }
            if tower.position.distance_to(snapshot.position) > range {
                continue;
            }
            self.candidates.push(Candidate {
                enemy: snapshot.id,
                path_index: snapshot.path_index,
                position: snapshot.position,
            });
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Candidate {
    enemy: EnemyId,
    path_index: usize,
    position: Vector2D,
}

impl Candidate {
    fn precedes(&self, other: &Self) -> bool {
        if self.path_index != other.path_index {
            return self.path_index > other.path_index;
        }
        self.enemy < other.enemy
    }
}

#[cfg(test)]
mod tests {
    use super::TowerTargeting;
    use tower_defense_core::{
        CellCoord, EnemyId, EnemyKind, EnemySnapshot, EnemyView, TowerId, TowerKind,
        TowerSnapshot, Vector2D,
    };

    fn tower_at(x: f32, y: f32) -> TowerSnapshot {
        let stats = TowerKind::Basic.stats();
        TowerSnapshot {
            id: TowerId::new(1),
            kind: TowerKind::Basic,
            cell: CellCoord::new(0, 0),
            position: Vector2D::new(x, y),
            damage: stats.damage,
            range: stats.range,
            cooldown_ticks: stats.cooldown_ticks,
            cost: stats.cost,
            level: 0,
            last_attack_tick: 0,
            target: None,
            projectiles: Vec::new(),
        }
    }

    fn enemy(id: u32, x: f32, y: f32, path_index: usize) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(id),
            kind: EnemyKind::Basic,
            position: Vector2D::new(x, y),
            path_index,
            health: 100,
            max_health: 100,
            alive: true,
            reached_end: false,
        }
    }

    #[test]
    fn targets_enemy_within_range() {
        let mut system = TowerTargeting::new();
        let enemies = EnemyView::from_snapshots(vec![enemy(2, 150.0, 100.0, 0)]);

        let target = system
            .handle(&tower_at(100.0, 100.0), &enemies)
            .expect("enemy is in range");

        assert_eq!(target.tower, TowerId::new(1));
        assert_eq!(target.enemy, EnemyId::new(2));
        assert_eq!(target.enemy_position, Vector2D::new(150.0, 100.0));
    }

    #[test]
    fn range_boundary_is_inclusive() {
        let mut system = TowerTargeting::new();
        let on_edge = EnemyView::from_snapshots(vec![enemy(0, 180.0, 100.0, 0)]);
        let outside = EnemyView::from_snapshots(vec![enemy(0, 181.0, 100.0, 0)]);

        assert!(system.handle(&tower_at(100.0, 100.0), &on_edge).is_some());
        assert!(system.handle(&tower_at(100.0, 100.0), &outside).is_none());
    }

    #[test]
    fn furthest_progressed_enemy_wins_over_nearest() {
        let mut system = TowerTargeting::new();
        let enemies = EnemyView::from_snapshots(vec![
            enemy(0, 101.0, 100.0, 1),
            enemy(1, 170.0, 100.0, 3),
            enemy(2, 120.0, 100.0, 2),
        ]);

        let target = system
            .handle(&tower_at(100.0, 100.0), &enemies)
            .expect("enemies in range");
        assert_eq!(target.enemy, EnemyId::new(1));
    }

    #[test]
    fn earlier_spawn_is_preferred_when_progress_matches() {
        let mut system = TowerTargeting::new();
        let enemies = EnemyView::from_snapshots(vec![
            enemy(20, 110.0, 100.0, 2),
            enemy(10, 160.0, 100.0, 2),
        ]);

        let target = system
            .handle(&tower_at(100.0, 100.0), &enemies)
            .expect("enemies in range");
        assert_eq!(target.enemy, EnemyId::new(10));
    }

    #[test]
    fn dead_and_escaped_enemies_are_ignored() {
        let mut system = TowerTargeting::new();
        let mut dead = enemy(0, 110.0, 100.0, 5);
        dead.alive = false;
        dead.health = 0;
        let mut escaped = enemy(1, 110.0, 100.0, 9);
        escaped.reached_end = true;
        let enemies = EnemyView::from_snapshots(vec![dead, escaped, enemy(2, 130.0, 100.0, 0)]);

        let target = system
            .handle(&tower_at(100.0, 100.0), &enemies)
            .expect("one active enemy in range");
        assert_eq!(target.enemy, EnemyId::new(2));
    }

    #[test]
    fn empty_view_produces_no_target() {
        let mut system = TowerTargeting::new();
        assert!(system
            .handle(&tower_at(0.0, 0.0), &EnemyView::default())
            .is_none());
    }
}
