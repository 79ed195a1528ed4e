//! Projectile movement and impact resolution against the enemy field.

use std::time::Duration;

use rampart_defence_core::{EnemyId, Event, TowerArchetype};

use crate::{Enemy, Projectile, World};

/// Fixed radius within which a projectile registers a hit.
pub(crate) const HIT_RADIUS: f32 = 12.0;

/// Outcome of routing one hit through armor and weaken rules.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct DamageRouting {
    /// Damage applied, armor absorption included.
    pub(crate) routed: f32,
    /// Portion of the routed damage the armor pool absorbed.
    pub(crate) absorbed: f32,
    /// Whether this hit depleted the armor pool for good.
    pub(crate) armor_broke: bool,
}

/// Routes a single hit into the enemy.
///
/// While a boss armor pool holds, damage is first reduced by the source
/// archetype's armor multiplier and then absorbed entirely by the pool; the
/// hit that empties the pool does not spill into hit points. Weakening
/// amplifies the routed amount in either case.
pub(crate) fn route_damage(
    enemy: &mut Enemy,
    source: TowerArchetype,
    base_damage: f32,
    now: Duration,
) -> DamageRouting {
    let mut amount = base_damage;
    let armored = enemy.has_live_armor();
    if armored {
        amount *= source.armor_multiplier();
    }
    amount *= enemy.status.damage_factor(now);

    let mut absorbed = 0.0;
    let mut armor_broke = false;
    if armored {
        if let Some(armor) = enemy.armor.as_mut() {
            armor.hp = (armor.hp - amount).max(0.0);
            absorbed = amount;
            if armor.hp <= 0.0 && !armor.broken {
                armor.broken = true;
                armor_broke = true;
            }
        }
    } else {
        enemy.hp -= amount;
    }

    DamageRouting {
        routed: amount,
        absorbed,
        armor_broke,
    }
}

/// Advances every projectile by the step and resolves triggered impacts.
pub(crate) fn advance_projectiles(world: &mut World, dt: Duration, out: &mut Vec<Event>) {
    let mut projectiles = std::mem::take(&mut world.projectiles);
    let mut kept = Vec::with_capacity(projectiles.len());

    for mut projectile in projectiles.drain(..) {
        match fly(&mut projectile, world, dt) {
            Flight::Impact { enemy } => {
                out.push(Event::ProjectileImpact {
                    projectile: projectile.id,
                    position: projectile.position,
                });
                resolve_impact(world, &projectile, enemy, out);
            }
            Flight::Spent => {}
            Flight::Cruising => kept.push(projectile),
        }
    }

    world.projectiles = kept;
}

enum Flight {
    /// The projectile came within the hit radius of an enemy.
    Impact {
        /// Enemy that triggered the impact.
        enemy: EnemyId,
    },
    /// The projectile exhausted its travel budget without hitting.
    Spent,
    /// The projectile keeps flying next step.
    Cruising,
}

/// Moves a projectile through the step in substeps no longer than the hit
/// radius so fast projectiles cannot tunnel through an enemy.
fn fly(projectile: &mut Projectile, world: &World, dt: Duration) -> Flight {
    // Homing: track the target while it lives, keep the last heading after.
    if let Some(target) = projectile.target {
        match world.enemies.iter().find(|enemy| enemy.id == target) {
            Some(enemy) => projectile.aim_at(enemy.position),
            None => projectile.target = None,
        }
    }

    let step = projectile.speed * dt.as_secs_f32();
    let substeps = (step / HIT_RADIUS).ceil().max(1.0) as u32;
    let advance = step / substeps as f32;

    for _ in 0..substeps {
        projectile.position = projectile.advanced(advance);
        projectile.traveled += advance;

        if let Some(enemy) = nearest_enemy_in_radius(world, projectile, HIT_RADIUS) {
            return Flight::Impact { enemy };
        }

        if projectile.traveled >= projectile.max_travel {
            return Flight::Spent;
        }
    }

    Flight::Cruising
}

/// Nearest live enemy within the radius of the projectile; ties break toward
/// the earliest-spawned enemy.
fn nearest_enemy_in_radius(world: &World, projectile: &Projectile, radius: f32) -> Option<EnemyId> {
    let mut best: Option<(f32, EnemyId)> = None;
    for enemy in &world.enemies {
        let distance = enemy.position.distance_to(projectile.position);
        if distance > radius {
            continue;
        }
        match best {
            Some((closest, _)) if distance >= closest => {}
            _ => best = Some((distance, enemy.id)),
        }
    }
    best.map(|(_, id)| id)
}

/// Applies the projectile's damage and status payload to the target set.
fn resolve_impact(world: &mut World, projectile: &Projectile, trigger: EnemyId, out: &mut Vec<Event>) {
    let now = world.clock;
    let targets: Vec<EnemyId> = if projectile.area > 0.0 {
        world
            .enemies
            .iter()
            .filter(|enemy| enemy.position.distance_to(projectile.position) <= projectile.area)
            .map(|enemy| enemy.id)
            .collect()
    } else {
        vec![trigger]
    };

    let mut dead = Vec::new();
    for id in targets {
        let Some(enemy) = world.enemies.iter_mut().find(|enemy| enemy.id == id) else {
            continue;
        };

        let routing = route_damage(enemy, projectile.source, projectile.damage, now);
        out.push(Event::DamageDealt {
            enemy: id,
            source: projectile.source,
            amount: routing.routed,
            absorbed: routing.absorbed,
        });
        if routing.armor_broke {
            out.push(Event::BossArmorBroken { enemy: id });
        }

        if projectile.applies_weaken {
            enemy.status.apply_weaken(now);
        }
        if projectile.applies_burn {
            enemy.status.apply_burn(enemy.max_hp, now);
        }
        if projectile.source.applies_slow() {
            enemy.status.apply_slow(enemy.kind, now);
        }

        if enemy.hp <= 0.0 {
            dead.push(id);
        }
    }

    for id in dead {
        world.settle_enemy_death(id, projectile.source, out);
    }
}
