//! Enemy AI: a shared state machine parameterized by stat profiles.
//!
//! Every live enemy is evaluated exactly once per tick, in roster (insertion)
//! order, so outcomes are reproducible given identical input history. The
//! machine is `Idle -> Aggro -> Attacking -> Retreating -> Dead`; `Dead` is
//! terminal and overrides every other transition the moment health reaches
//! zero.

use hivebreak_common::EntityId;
use serde::{Deserialize, Serialize};

use crate::boss::BossAbility;
use crate::enemy::{Enemy, EnemyKind, SpecialAbility};
use crate::input::Vec2;
use crate::physics::Bounds;
use crate::spawn::SpawnRng;

/// Contact distance used by ranged kinds, whose `attack_range` is their
/// firing band rather than a reach.
const CONTACT_FALLBACK_RANGE: f32 = 40.0;

/// AI state of an enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AiState {
    /// Unaware of the player
    #[default]
    Idle,
    /// Player detected, closing in
    Aggro,
    /// In range and attacking
    Attacking,
    /// Fleeing at low health
    Retreating,
    /// Terminal
    Dead,
}

impl AiState {
    /// Whether the enemy is actively engaged with the player.
    #[must_use]
    pub const fn is_engaged(self) -> bool {
        matches!(self, Self::Aggro | Self::Attacking)
    }

    /// Whether this state is terminal.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Dead)
    }
}

/// Shape of a single attack produced by the AI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttackKind {
    /// Direct hit on the player
    Contact {
        /// Damage dealt
        damage: i32,
    },
    /// Blast around `origin` with linear distance falloff
    Area {
        /// Damage at the center
        damage: i32,
        /// Effect radius
        radius: f32,
    },
    /// Projectile spawned at `origin` towards the player
    Ranged {
        /// Damage per hit
        damage: i32,
        /// Projectile speed in units per tick
        speed: f32,
        /// Projectile collision radius
        radius: f32,
        /// Unit direction of travel
        dir: Vec2,
    },
}

/// An attack the combat resolver should apply this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackIntent {
    /// Attacking enemy
    pub attacker: EntityId,
    /// Attack origin (the attacker's position)
    pub origin: Vec2,
    /// What kind of attack
    pub kind: AttackKind,
}

/// A brood the wave director should place this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummonRequest {
    /// Kind to summon
    pub kind: EnemyKind,
    /// Number summoned
    pub count: u32,
    /// Summoner position
    pub origin: Vec2,
}

/// Everything the AI pass produced for one tick.
#[derive(Debug, Clone, Default)]
pub struct AiReport {
    /// Attacks to resolve
    pub intents: Vec<AttackIntent>,
    /// Summons to place
    pub summons: Vec<SummonRequest>,
    /// Boss phases entered this tick (enemy, phase name)
    pub phases_entered: Vec<(EntityId, &'static str)>,
}

/// Advances every enemy in the roster by one tick.
///
/// Iteration order is the roster's insertion order; callers must not reorder
/// the slice between ticks.
pub fn update_room(
    enemies: &mut [Enemy],
    player_pos: Vec2,
    player_alive: bool,
    bounds: &Bounds,
    rng: &mut SpawnRng,
) -> AiReport {
    let mut report = AiReport::default();
    for enemy in enemies.iter_mut() {
        step_enemy(enemy, player_pos, player_alive, bounds, rng, &mut report);
    }
    report
}

/// Runs one enemy's state evaluation for this tick.
fn step_enemy(
    enemy: &mut Enemy,
    player_pos: Vec2,
    player_alive: bool,
    bounds: &Bounds,
    rng: &mut SpawnRng,
    report: &mut AiReport,
) {
    // Death overrides everything, immediately.
    if !enemy.is_alive() {
        if enemy.ai != AiState::Dead {
            tracing::debug!(id = enemy.entity.id().raw(), "enemy entered terminal state");
            enemy.ai = AiState::Dead;
        }
        return;
    }

    enemy.tick_cooldowns();

    let profile = enemy.profile();
    let dist = enemy.entity.distance_to(player_pos);

    // Low-health flee, for kinds that have one.
    if let Some(threshold) = profile.flee_below {
        if enemy.ai.is_engaged() && enemy.entity.health.fraction() < threshold {
            tracing::debug!(id = enemy.entity.id().raw(), "enemy breaking off");
            enemy.ai = AiState::Retreating;
        }
    }

    enemy.ai = next_state(enemy.ai, &profile, dist, player_alive);

    match enemy.ai {
        AiState::Idle | AiState::Dead => {}
        AiState::Aggro => {
            pursue(enemy, player_pos, dist, bounds, rng);
        }
        AiState::Attacking => {
            if let Some(facing) = crate::entity::Facing::from_dx(player_pos.x - enemy.entity.pos.x)
            {
                enemy.entity.facing = facing;
            }
            attack(enemy, player_pos, dist, report);
        }
        AiState::Retreating => {
            let away = (enemy.entity.pos - player_pos).normalized();
            enemy
                .entity
                .translate_clamped(away * profile.speed, bounds);
        }
    }
}

/// Pure transition function of the state machine.
fn next_state(state: AiState, profile: &crate::enemy::StatProfile, dist: f32, player_alive: bool) -> AiState {
    match state {
        AiState::Dead => AiState::Dead,
        AiState::Idle => {
            if player_alive && dist <= profile.detection_radius {
                AiState::Aggro
            } else {
                AiState::Idle
            }
        }
        AiState::Aggro => {
            if !player_alive {
                AiState::Idle
            } else if dist <= profile.attack_range {
                AiState::Attacking
            } else if dist > profile.detection_radius && !profile.never_disengage {
                AiState::Idle
            } else {
                AiState::Aggro
            }
        }
        AiState::Attacking => {
            if !player_alive {
                AiState::Idle
            } else if dist > profile.attack_range {
                if dist <= profile.detection_radius || profile.never_disengage {
                    AiState::Aggro
                } else {
                    AiState::Idle
                }
            } else {
                AiState::Attacking
            }
        }
        AiState::Retreating => {
            if !player_alive || dist > profile.detection_radius {
                AiState::Idle
            } else {
                AiState::Retreating
            }
        }
    }
}

/// Closes in on the player, applying movement specials.
fn pursue(enemy: &mut Enemy, player_pos: Vec2, dist: f32, bounds: &Bounds, rng: &mut SpawnRng) {
    let profile = enemy.profile();
    let toward = enemy.entity.direction_to(player_pos);
    let mut step = profile.speed * boss_speed_mult(enemy);

    match profile.special {
        Some(SpecialAbility::Leap { chance, speed_mult }) => {
            if rng.chance(chance) {
                step *= speed_mult;
            }
        }
        Some(SpecialAbility::Stealth { cooldown, .. }) => {
            if !enemy.stealthed && enemy.special_cooldown == 0 {
                enemy.stealthed = true;
                enemy.special_cooldown = cooldown;
            }
        }
        Some(SpecialAbility::Burrow {
            cooldown,
            emerge_range,
        }) => {
            if enemy.special_cooldown == 0 && dist > profile.attack_range * 2.0 {
                // Re-emerge on the near side of the player.
                let approach = (enemy.entity.pos - player_pos).normalized();
                enemy.entity.pos =
                    bounds.clamp_center(player_pos + approach * emerge_range, 1.0, 1.0);
                enemy.special_cooldown = cooldown;
                tracing::debug!(id = enemy.entity.id().raw(), "enemy burrowed");
                return;
            }
        }
        _ => {}
    }

    // Don't walk through the player; stop at attack range.
    let step = step.min((dist - profile.attack_range * 0.5).max(0.0));
    enemy.entity.translate_clamped(toward * step, bounds);
}

/// Produces attack intents while in range.
fn attack(enemy: &mut Enemy, player_pos: Vec2, dist: f32, report: &mut AiReport) {
    let profile = enemy.profile();
    let id = enemy.entity.id();
    let origin = enemy.entity.pos;
    let damage_mult = boss_damage_mult(enemy);

    // Boss ability rotation, nested inside the attacking state.
    if let Some(boss) = enemy.boss.as_mut() {
        let health_fraction = enemy.entity.health.fraction();
        let tick = boss.advance(health_fraction);
        if let Some(phase) = tick.phase_entered {
            report.phases_entered.push((id, phase));
        }
        match tick.fired {
            Some(BossAbility::AreaBlast { damage, radius, .. }) => {
                report.intents.push(AttackIntent {
                    attacker: id,
                    origin,
                    kind: AttackKind::Area {
                        damage: scaled(damage, damage_mult),
                        radius,
                    },
                });
            }
            Some(BossAbility::Summon { kind, count, .. }) => {
                report.summons.push(SummonRequest {
                    kind,
                    count,
                    origin,
                });
            }
            Some(BossAbility::Rest) | None => {}
        }
    }

    // Ranged kinds fire across their whole attack band.
    if let Some(spec) = profile.ranged {
        if enemy.ranged_cooldown == 0 && dist <= profile.attack_range {
            enemy.ranged_cooldown = spec.cooldown;
            report.intents.push(AttackIntent {
                attacker: id,
                origin,
                kind: AttackKind::Ranged {
                    damage: scaled(spec.damage, damage_mult),
                    speed: spec.speed,
                    radius: spec.radius,
                    dir: enemy.entity.direction_to(player_pos),
                },
            });
        }
    }

    // Ground slam replaces the contact attack while available.
    if let Some(SpecialAbility::GroundPound { radius, cooldown }) = profile.special {
        if enemy.special_cooldown == 0 && dist <= radius {
            enemy.special_cooldown = cooldown;
            enemy.attack_cooldown = profile.attack_cooldown;
            report.intents.push(AttackIntent {
                attacker: id,
                origin,
                kind: AttackKind::Area {
                    damage: scaled(profile.contact_damage, damage_mult),
                    radius,
                },
            });
            return;
        }
    }

    let contact_range = if profile.ranged.is_some() {
        profile.attack_range.min(CONTACT_FALLBACK_RANGE)
    } else {
        profile.attack_range
    };

    if enemy.attack_cooldown == 0 && dist <= contact_range {
        enemy.attack_cooldown = profile.attack_cooldown;
        let mut damage = scaled(profile.contact_damage, damage_mult);
        if enemy.stealthed {
            // The ambush attack breaks concealment for bonus damage.
            if let Some(SpecialAbility::Stealth { damage_mult, .. }) = profile.special {
                damage = scaled(damage, damage_mult);
            }
            enemy.stealthed = false;
        }
        report.intents.push(AttackIntent {
            attacker: id,
            origin,
            kind: AttackKind::Contact { damage },
        });
    }
}

fn boss_damage_mult(enemy: &Enemy) -> f32 {
    enemy.boss.as_ref().map_or(1.0, |b| b.phase().damage_mult)
}

fn boss_speed_mult(enemy: &Enemy) -> f32 {
    enemy.boss.as_ref().map_or(1.0, |b| b.phase().speed_mult)
}

fn scaled(damage: i32, mult: f32) -> i32 {
    (damage as f32 * mult).round() as i32
}
