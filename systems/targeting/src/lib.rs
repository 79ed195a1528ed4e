#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that selects tower targets and queues firing commands.
//!
//! Targets are computed from immutable world snapshots with deterministic
//! tie-breaks: when two enemies score equally under the active priority, the
//! earlier-spawned enemy wins. Only towers whose cooldown elapsed emit a
//! [`Command::FireProjectile`].

use rampart_defence_core::{
    Command, EnemyId, EnemyView, SessionPhase, TargetMode, TowerId, TowerView, WorldPoint,
};

/// Tower targeting system that reuses scratch buffers to avoid repeated
/// allocations.
#[derive(Debug, Default)]
pub struct Targeting {
    tower_workspace: Vec<TowerCandidate>,
    enemy_workspace: Vec<EnemyCandidate>,
}

impl Targeting {
    /// Creates a new targeting system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes targets for every ready tower and queues firing commands.
    pub fn handle(
        &mut self,
        phase: SessionPhase,
        towers: &TowerView,
        enemies: &EnemyView,
        out: &mut Vec<Command>,
    ) {
        if phase != SessionPhase::Playing {
            return;
        }

        self.prepare_tower_workspace(towers);
        if self.tower_workspace.is_empty() {
            return;
        }

        self.prepare_enemy_workspace(enemies);
        if self.enemy_workspace.is_empty() {
            return;
        }

        for tower in &self.tower_workspace {
            let mut best: Option<&EnemyCandidate> = None;
            for candidate in &self.enemy_workspace {
                if candidate.position.distance_to(tower.position) > tower.range {
                    continue;
                }
                match best {
                    Some(current) if !candidate.outranks(current, tower.mode) => {}
                    _ => best = Some(candidate),
                }
            }

            if let Some(target) = best {
                out.push(Command::FireProjectile {
                    tower: tower.id,
                    target: target.id,
                });
            }
        }
    }

    fn prepare_tower_workspace(&mut self, towers: &TowerView) {
        self.tower_workspace.clear();
        for snapshot in towers.iter() {
            if !snapshot.ready {
                continue;
            }
            self.tower_workspace.push(TowerCandidate {
                id: snapshot.id,
                position: snapshot.position,
                range: snapshot.range,
                mode: snapshot.target_mode,
            });
        }
    }

    fn prepare_enemy_workspace(&mut self, enemies: &EnemyView) {
        self.enemy_workspace.clear();
        for snapshot in enemies.iter() {
            self.enemy_workspace.push(EnemyCandidate {
                id: snapshot.id,
                position: snapshot.position,
                hp: snapshot.hp,
                distance: snapshot.distance,
            });
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct TowerCandidate {
    id: TowerId,
    position: WorldPoint,
    range: f32,
    mode: TargetMode,
}

#[derive(Clone, Copy, Debug)]
struct EnemyCandidate {
    id: EnemyId,
    position: WorldPoint,
    hp: f32,
    distance: f32,
}

impl EnemyCandidate {
    /// Strict preference under the provided priority; candidates are visited
    /// in ascending identifier order, so ties keep the earlier enemy.
    fn outranks(&self, other: &EnemyCandidate, mode: TargetMode) -> bool {
        match mode {
            TargetMode::First => self.distance > other.distance,
            TargetMode::Strongest => self.hp > other.hp,
        }
    }
}
