//! Enemies walking the path.

use tower_defense_core::{EnemyId, EnemyKind, EnemySnapshot, Vector2D};

/// A single enemy travelling from the first waypoint to the last.
#[derive(Clone, Debug)]
pub struct Enemy {
    id: EnemyId,
    kind: EnemyKind,
    position: Vector2D,
    path_index: usize,
    target_waypoint: Vector2D,
    health: u32,
    max_health: u32,
    speed: f32,
    reward: u32,
    alive: bool,
    reached_end: bool,
}

impl Enemy {
    /// Spawns an enemy at the first waypoint, heading for the second.
    #[must_use]
    pub fn spawn(id: EnemyId, kind: EnemyKind, waypoints: &[Vector2D]) -> Self {
        let stats = kind.stats();
        let position = waypoints.first().copied().unwrap_or_default();
        let target_waypoint = waypoints.get(1).copied().unwrap_or(position);
        Self {
            id,
            kind,
            position,
            path_index: 0,
            target_waypoint,
            health: stats.health,
            max_health: stats.health,
            speed: stats.speed,
            reward: stats.reward,
            alive: true,
            reached_end: waypoints.len() < 2,
        }
    }

    /// Moves the enemy one tick along the path.
    ///
    /// When the remaining distance to the current target waypoint is shorter
    /// than one step the enemy snaps onto the waypoint instead of moving, so
    /// each waypoint costs at least one tick. Dead or escaped enemies stay put.
    pub fn advance(&mut self, waypoints: &[Vector2D]) {
        if !self.is_active() {
            return;
        }

        let direction = self.target_waypoint - self.position;
        let distance = direction.magnitude();

        if distance < self.speed {
            self.position = self.target_waypoint;
            self.path_index += 1;

            match waypoints.get(self.path_index + 1) {
                Some(next) => self.target_waypoint = *next,
                None => self.reached_end = true,
            }
        } else {
            self.position = self.position + direction.normalize() * self.speed;
        }
    }

    /// Subtracts `amount` from the enemy's health, killing it at zero.
    ///
    /// Damage dealt to an enemy that is already dead is ignored.
    pub fn apply_damage(&mut self, amount: u32) {
        if !self.alive {
            return;
        }
        self.health = self.health.saturating_sub(amount);
        if self.health == 0 {
            self.alive = false;
        }
    }

    /// Identifier assigned at spawn.
    #[must_use]
    pub const fn id(&self) -> EnemyId {
        self.id
    }

    /// Kind of the enemy.
    #[must_use]
    pub const fn kind(&self) -> EnemyKind {
        self.kind
    }

    /// Current position.
    #[must_use]
    pub const fn position(&self) -> Vector2D {
        self.position
    }

    /// Index of the last waypoint reached.
    #[must_use]
    pub const fn path_index(&self) -> usize {
        self.path_index
    }

    /// Remaining health.
    #[must_use]
    pub const fn health(&self) -> u32 {
        self.health
    }

    /// Bounty paid out on death.
    #[must_use]
    pub const fn reward(&self) -> u32 {
        self.reward
    }

    /// Whether the enemy still has health left.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.alive
    }

    /// Whether the enemy walked off the end of the path.
    #[must_use]
    pub const fn reached_end(&self) -> bool {
        self.reached_end
    }

    /// Alive and still on the path.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.alive && !self.reached_end
    }

    /// Captures an immutable copy of the enemy's state.
    #[must_use]
    pub fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            path_index: self.path_index,
            health: self.health,
            max_health: self.max_health,
            alive: self.alive,
            reached_end: self.reached_end,
        }
    }
}
