//! Authoritative tower state, projectiles, and the registry that owns them.

use std::collections::BTreeMap;

use tower_defense_core::{
    CellCoord, EnemyId, ProjectileSnapshot, TowerCooldownSnapshot, TowerId, TowerKind,
    TowerSnapshot, Vector2D, COLLISION_MARGIN, ENEMY_RADIUS, MIN_UPGRADED_COOLDOWN_TICKS,
    PROJECTILE_RANGE_BONUS,
};

use crate::enemies::Enemy;

/// A shot travelling in a straight line from its launch point.
#[derive(Clone, Debug)]
pub struct Projectile {
    start: Vector2D,
    position: Vector2D,
    velocity: Vector2D,
    damage: u32,
    max_range: f32,
    alive: bool,
}

impl Projectile {
    /// Launches a projectile from `start` towards `target`.
    ///
    /// The heading is fixed at launch; the projectile does not home in on
    /// the enemy it was aimed at.
    #[must_use]
    pub fn launch(start: Vector2D, target: Vector2D, damage: u32, speed: f32, max_range: f32) -> Self {
        Self {
            start,
            position: start,
            velocity: (target - start).normalize() * speed,
            damage,
            max_range,
            alive: true,
        }
    }

    /// Moves the projectile one tick and expires it once it flew past its range.
    pub fn advance(&mut self) {
        if !self.alive {
            return;
        }
        self.position = self.position + self.velocity;
        if self.distance_travelled() > self.max_range {
            self.alive = false;
        }
    }

    /// Distance between the launch point and the current position.
    #[must_use]
    pub fn distance_travelled(&self) -> f32 {
        self.start.distance_to(self.position)
    }

    /// Current position.
    #[must_use]
    pub const fn position(&self) -> Vector2D {
        self.position
    }

    /// Whether the projectile is still in flight.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.alive
    }

    /// Damage applied on impact.
    #[must_use]
    pub const fn damage(&self) -> u32 {
        self.damage
    }

    /// Captures an immutable copy of the projectile's state.
    #[must_use]
    pub fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            start: self.start,
            position: self.position,
            velocity: self.velocity,
            damage: self.damage,
        }
    }
}

/// Damage dealt by one projectile during collision resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProjectileImpact {
    /// Enemy that was struck.
    pub enemy: EnemyId,
    /// Damage applied to the enemy.
    pub damage: u32,
}

/// A placed tower together with the projectiles it has in flight.
#[derive(Clone, Debug)]
pub struct Tower {
    id: TowerId,
    kind: TowerKind,
    cell: CellCoord,
    position: Vector2D,
    damage: u32,
    range: u32,
    cooldown_ticks: u64,
    cost: u32,
    projectile_speed: u32,
    level: u32,
    last_attack_tick: u64,
    target: Option<EnemyId>,
    projectiles: Vec<Projectile>,
}

impl Tower {
    /// Builds a tower of `kind` centred on `position`.
    #[must_use]
    pub fn new(id: TowerId, kind: TowerKind, cell: CellCoord, position: Vector2D) -> Self {
        let stats = kind.stats();
        Self {
            id,
            kind,
            cell,
            position,
            damage: stats.damage,
            range: stats.range,
            cooldown_ticks: stats.cooldown_ticks,
            cost: stats.cost,
            projectile_speed: stats.projectile_speed,
            level: 0,
            last_attack_tick: 0,
            target: None,
            projectiles: Vec::new(),
        }
    }

    /// Whether enough ticks elapsed since the last shot.
    #[must_use]
    pub const fn can_attack(&self, tick: u64) -> bool {
        self.cooldown_snapshot().is_ready(tick)
    }

    /// Records the enemy the tower currently aims at.
    pub fn acquire(&mut self, target: Option<EnemyId>) {
        self.target = target;
    }

    /// Fires at `target_position` if the cooldown allows it.
    ///
    /// Returns `true` when a projectile was launched.
    pub fn attack(&mut self, target_position: Vector2D, tick: u64) -> bool {
        if !self.can_attack(tick) {
            return false;
        }
        self.projectiles.push(Projectile::launch(
            self.position,
            target_position,
            self.damage,
            self.projectile_speed as f32,
            self.range as f32 + PROJECTILE_RANGE_BONUS,
        ));
        self.last_attack_tick = tick;
        true
    }

    /// Advances every projectile and applies hits to `enemies`.
    ///
    /// A projectile that expires this tick is dropped before collision is
    /// tested. Otherwise it strikes the first active enemy, in slice order,
    /// whose centre lies within the collision radius, and is consumed.
    pub fn resolve_projectiles(&mut self, enemies: &mut [Enemy], impacts: &mut Vec<ProjectileImpact>) {
        let collision_radius = ENEMY_RADIUS + COLLISION_MARGIN;

        self.projectiles.retain_mut(|projectile| {
            projectile.advance();
            if !projectile.is_alive() {
                return false;
            }

            let struck = enemies.iter_mut().find(|enemy| {
                enemy.is_active() && projectile.position().distance_to(enemy.position()) < collision_radius
            });

            match struck {
                Some(enemy) => {
                    enemy.apply_damage(projectile.damage());
                    impacts.push(ProjectileImpact {
                        enemy: enemy.id(),
                        damage: projectile.damage(),
                    });
                    false
                }
                None => true,
            }
        });
    }

    /// Price of the next upgrade: half of everything invested so far.
    #[must_use]
    pub const fn upgrade_cost(&self) -> u32 {
        self.cost / 2
    }

    /// Improves damage, range, and fire rate, and folds the price into the
    /// tower's accumulated cost.
    pub fn upgrade(&mut self) {
        let price = self.upgrade_cost();
        self.damage = self.damage.saturating_mul(3) / 2;
        self.range = self.range.saturating_mul(11) / 10;
        self.cooldown_ticks = (self.cooldown_ticks * 4 / 5).max(MIN_UPGRADED_COOLDOWN_TICKS);
        self.cost = self.cost.saturating_add(price);
        self.level += 1;
    }

    /// Identifier assigned by the world.
    #[must_use]
    pub const fn id(&self) -> TowerId {
        self.id
    }

    /// Centre of the tower.
    #[must_use]
    pub const fn position(&self) -> Vector2D {
        self.position
    }

    /// Grid cell the tower occupies.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Detection radius.
    #[must_use]
    pub const fn range(&self) -> u32 {
        self.range
    }

    /// Projectiles currently in flight.
    #[must_use]
    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// Captures an immutable copy of the tower's state.
    #[must_use]
    pub fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            kind: self.kind,
            cell: self.cell,
            position: self.position,
            damage: self.damage,
            range: self.range,
            cooldown_ticks: self.cooldown_ticks,
            cost: self.cost,
            level: self.level,
            last_attack_tick: self.last_attack_tick,
            target: self.target,
            projectiles: self.projectiles.iter().map(Projectile::snapshot).collect(),
        }
    }

    pub(crate) const fn cooldown_snapshot(&self) -> TowerCooldownSnapshot {
        TowerCooldownSnapshot {
            tower: self.id,
            last_attack_tick: self.last_attack_tick,
            cooldown_ticks: self.cooldown_ticks,
        }
    }
}

/// Registry that stores towers and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, Tower>,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_tower_id: TowerId::new(0),
        }
    }

    /// Builds and stores a tower, returning its freshly allocated identifier.
    pub(crate) fn insert(&mut self, kind: TowerKind, cell: CellCoord, position: Vector2D) -> TowerId {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().saturating_add(1));
        let _ = self.entries.insert(id, Tower::new(id, kind, cell, position));
        id
    }

    pub(crate) fn get(&self, id: TowerId) -> Option<&Tower> {
        self.entries.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: TowerId) -> Option<&mut Tower> {
        self.entries.get_mut(&id)
    }

    pub(crate) fn remove(&mut self, id: TowerId) -> Option<Tower> {
        self.entries.remove(&id)
    }

    /// Towers in placement order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &Tower> {
        self.entries.values()
    }
}
