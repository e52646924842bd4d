//! The enemy bestiary: kinds, stat profiles, and runtime enemy state.
//!
//! Every kind is a configuration record, not a separate implementation: the
//! shared state machine in [`crate::ai`] reads the profile and behaves
//! accordingly. Adding or disabling a kind is a data change.

use hivebreak_common::RoomId;
use serde::{Deserialize, Serialize};

use crate::ai::AiState;
use crate::boss::BossState;
use crate::entity::{Entity, Faction};
use crate::input::Vec2;

/// Specification of an enemy's ranged attack.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangedSpec {
    /// Damage per projectile hit
    pub damage: i32,
    /// Projectile speed in units per tick
    pub speed: f32,
    /// Projectile collision radius
    pub radius: f32,
    /// Ticks between shots
    pub cooldown: u32,
}

/// A special ability carried as data on the stat profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SpecialAbility {
    /// Chance-gated burst of movement towards the player while chasing.
    Leap {
        /// Per-tick trigger chance in [0, 1]
        chance: f32,
        /// Speed multiplier for the burst
        speed_mult: f32,
    },
    /// Cooldown-gated concealment; the attack that breaks it deals bonus damage.
    Stealth {
        /// Ticks between cloaks
        cooldown: u32,
        /// Damage multiplier for the ambush attack
        damage_mult: f32,
    },
    /// Area slam replacing the contact attack, with linear distance falloff.
    GroundPound {
        /// Effect radius
        radius: f32,
        /// Ticks between slams
        cooldown: u32,
    },
    /// Cooldown-gated tunnel: re-emerges next to a distant player.
    Burrow {
        /// Ticks between burrows
        cooldown: u32,
        /// Distance from the player at which the enemy emerges
        emerge_range: f32,
    },
}

/// Per-kind configuration record.
///
/// Dimensions are native sprite sizes; the asset catalog may override them
/// with scaled values at spawn time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatProfile {
    /// Maximum health
    pub max_health: i32,
    /// Damage per contact attack
    pub contact_damage: i32,
    /// Movement speed in units per tick
    pub speed: f32,
    /// Range at which the contact attack connects
    pub attack_range: f32,
    /// Ticks between contact attacks
    pub attack_cooldown: u32,
    /// Range at which the player is noticed
    pub detection_radius: f32,
    /// Hitbox width
    pub width: f32,
    /// Hitbox height
    pub height: f32,
    /// Ranged attack, if the kind has one
    pub ranged: Option<RangedSpec>,
    /// Health fraction below which the kind flees, if it ever does
    pub flee_below: Option<f32>,
    /// Whether the kind keeps pursuing after the player leaves detection range
    pub never_disengage: bool,
    /// Special ability, if any
    pub special: Option<SpecialAbility>,
}

/// Kind of enemy in the bestiary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Fast melee ambusher with a leap
    Genestealer,
    /// Balanced fighter with a bio-projectile ranged attack
    Warrior,
    /// Weak, fast, numerous; breaks and flees at low health
    Gaunt,
    /// Stealth predator with an ambush bonus
    Lictor,
    /// Slow heavy with an area ground slam
    Carnifex,
    /// Long-range psychic artillery
    Zoanthrope,
    /// Tunneler that emerges beneath distant prey
    Mawloc,
    /// Boss: psychic warlord with summoning phases
    HiveTyrant,
    /// Boss: blade tyrant with escalating sweep phases
    Swarmlord,
}

impl EnemyKind {
    /// Get display name.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Genestealer => "Genestealer",
            Self::Warrior => "Warrior",
            Self::Gaunt => "Gaunt",
            Self::Lictor => "Lictor",
            Self::Carnifex => "Carnifex",
            Self::Zoanthrope => "Zoanthrope",
            Self::Mawloc => "Mawloc",
            Self::HiveTyrant => "Hive Tyrant",
            Self::Swarmlord => "Swarmlord",
        }
    }

    /// Check if this kind is a boss.
    #[must_use]
    pub const fn is_boss(self) -> bool {
        matches!(self, Self::HiveTyrant | Self::Swarmlord)
    }

    /// Get the stat profile for this kind.
    #[must_use]
    pub fn profile(self) -> StatProfile {
        match self {
            Self::Genestealer => StatProfile {
                max_health: 50,
                contact_damage: 15,
                speed: 3.5,
                attack_range: 40.0,
                attack_cooldown: 48,
                detection_radius: 280.0,
                width: 40.0,
                height: 40.0,
                ranged: None,
                flee_below: None,
                never_disengage: false,
                special: Some(SpecialAbility::Leap {
                    chance: 0.05,
                    speed_mult: 3.0,
                }),
            },
            Self::Warrior => StatProfile {
                max_health: 100,
                contact_damage: 20,
                speed: 2.0,
                attack_range: 150.0,
                attack_cooldown: 72,
                detection_radius: 320.0,
                width: 50.0,
                height: 70.0,
                ranged: Some(RangedSpec {
                    damage: 10,
                    speed: 5.0,
                    radius: 5.0,
                    cooldown: 72,
                }),
                flee_below: None,
                never_disengage: false,
                special: None,
            },
            Self::Gaunt => StatProfile {
                max_health: 30,
                contact_damage: 8,
                speed: 3.0,
                attack_range: 30.0,
                attack_cooldown: 60,
                detection_radius: 220.0,
                width: 30.0,
                height: 30.0,
                ranged: None,
                flee_below: Some(0.25),
                never_disengage: false,
                special: None,
            },
            Self::Lictor => StatProfile {
                max_health: 80,
                contact_damage: 25,
                speed: 2.5,
                attack_range: 60.0,
                attack_cooldown: 90,
                detection_radius: 240.0,
                width: 45.0,
                height: 70.0,
                ranged: None,
                flee_below: None,
                never_disengage: false,
                special: Some(SpecialAbility::Stealth {
                    cooldown: 300,
                    damage_mult: 1.5,
                }),
            },
            Self::Carnifex => StatProfile {
                max_health: 200,
                contact_damage: 30,
                speed: 1.0,
                attack_range: 70.0,
                attack_cooldown: 120,
                detection_radius: 200.0,
                width: 80.0,
                height: 80.0,
                ranged: None,
                flee_below: None,
                never_disengage: false,
                special: Some(SpecialAbility::GroundPound {
                    radius: 100.0,
                    cooldown: 120,
                }),
            },
            Self::Zoanthrope => StatProfile {
                max_health: 70,
                contact_damage: 15,
                speed: 1.5,
                attack_range: 200.0,
                attack_cooldown: 180,
                detection_radius: 400.0,
                width: 40.0,
                height: 60.0,
                ranged: Some(RangedSpec {
                    damage: 30,
                    speed: 6.0,
                    radius: 6.0,
                    cooldown: 480,
                }),
                flee_below: None,
                never_disengage: false,
                special: None,
            },
            Self::Mawloc => StatProfile {
                max_health: 160,
                contact_damage: 28,
                speed: 1.2,
                attack_range: 60.0,
                attack_cooldown: 110,
                detection_radius: 260.0,
                width: 70.0,
                height: 70.0,
                ranged: None,
                flee_below: None,
                never_disengage: false,
                special: Some(SpecialAbility::Burrow {
                    cooldown: 600,
                    emerge_range: 80.0,
                }),
            },
            Self::HiveTyrant => StatProfile {
                max_health: 1000,
                contact_damage: 50,
                speed: 3.0,
                attack_range: 80.0,
                attack_cooldown: 90,
                detection_radius: 1000.0,
                width: 100.0,
                height: 100.0,
                ranged: None,
                flee_below: None,
                never_disengage: true,
                special: None,
            },
            Self::Swarmlord => StatProfile {
                max_health: 1500,
                contact_damage: 75,
                speed: 4.0,
                attack_range: 90.0,
                attack_cooldown: 90,
                detection_radius: 1000.0,
                width: 100.0,
                height: 100.0,
                ranged: None,
                flee_below: None,
                never_disengage: true,
                special: None,
            },
        }
    }

    /// Get all enemy kinds.
    #[must_use]
    pub const fn all() -> [Self; 9] {
        [
            Self::Genestealer,
            Self::Warrior,
            Self::Gaunt,
            Self::Lictor,
            Self::Carnifex,
            Self::Zoanthrope,
            Self::Mawloc,
            Self::HiveTyrant,
            Self::Swarmlord,
        ]
    }
}

/// Runtime state for one enemy.
#[derive(Debug, Clone, Serialize)]
pub struct Enemy {
    /// Shared entity body
    pub entity: Entity,
    kind: EnemyKind,
    /// Current AI state
    pub ai: AiState,
    /// Ticks until the next contact attack is allowed
    pub attack_cooldown: u32,
    /// Ticks until the next ranged shot is allowed
    pub ranged_cooldown: u32,
    /// Ticks until the special ability is available again
    pub special_cooldown: u32,
    /// Whether the enemy is currently concealed (stealth kinds only)
    pub stealthed: bool,
    /// Boss phase state, present for boss kinds only
    pub boss: Option<BossState>,
}

impl Enemy {
    /// Creates an enemy of the given kind at a position, using profile
    /// dimensions for the hitbox.
    #[must_use]
    pub fn new(kind: EnemyKind, pos: Vec2, room: RoomId) -> Self {
        let profile = kind.profile();
        let entity = Entity::new(
            Faction::Hive,
            pos,
            profile.width,
            profile.height,
            profile.max_health,
            room,
        );
        Self {
            entity,
            kind,
            ai: AiState::Idle,
            attack_cooldown: 0,
            ranged_cooldown: 0,
            special_cooldown: 0,
            stealthed: false,
            boss: if kind.is_boss() {
                Some(BossState::for_kind(kind))
            } else {
                None
            },
        }
    }

    /// Creates an enemy with hitbox dimensions supplied by the asset catalog.
    #[must_use]
    pub fn with_size(kind: EnemyKind, pos: Vec2, room: RoomId, width: f32, height: f32) -> Self {
        let mut enemy = Self::new(kind, pos, room);
        enemy.entity.set_size(width, height);
        enemy
    }

    /// Returns the enemy kind.
    #[must_use]
    pub const fn kind(&self) -> EnemyKind {
        self.kind
    }

    /// Returns the kind's stat profile.
    #[must_use]
    pub fn profile(&self) -> StatProfile {
        self.kind.profile()
    }

    /// Returns whether the enemy is alive.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.entity.is_alive()
    }

    /// Ticks down all ability cooldowns.
    pub fn tick_cooldowns(&mut self) {
        self.attack_cooldown = self.attack_cooldown.saturating_sub(1);
        self.ranged_cooldown = self.ranged_cooldown.saturating_sub(1);
        self.special_cooldown = self.special_cooldown.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names() {
        assert_eq!(EnemyKind::Genestealer.display_name(), "Genestealer");
        assert_eq!(EnemyKind::HiveTyrant.display_name(), "Hive Tyrant");
    }

    #[test]
    fn test_all_kinds_have_positive_stats() {
        for kind in EnemyKind::all() {
            let p = kind.profile();
            assert!(p.max_health > 0, "{kind:?}");
            assert!(p.speed > 0.0, "{kind:?}");
            assert!(p.attack_range > 0.0, "{kind:?}");
            assert!(p.detection_radius >= p.attack_range, "{kind:?}");
        }
    }

    #[test]
    fn test_boss_flags() {
        assert!(EnemyKind::HiveTyrant.is_boss());
        assert!(EnemyKind::Swarmlord.is_boss());
        assert!(!EnemyKind::Gaunt.is_boss());
    }

    #[test]
    fn test_bosses_never_disengage() {
        for kind in EnemyKind::all() {
            if kind.is_boss() {
                assert!(kind.profile().never_disengage, "{kind:?}");
            }
        }
    }

    #[test]
    fn test_spawn_uses_profile() {
        let enemy = Enemy::new(EnemyKind::Carnifex, Vec2::new(400.0, 300.0), RoomId::new(1));
        let profile = EnemyKind::Carnifex.profile();

        assert_eq!(enemy.entity.health.max(), profile.max_health);
        assert_eq!(enemy.entity.width(), profile.width);
        assert_eq!(enemy.ai, AiState::Idle);
        assert!(enemy.boss.is_none());
    }

    #[test]
    fn test_boss_spawn_carries_phase_state() {
        let boss = Enemy::new(EnemyKind::HiveTyrant, Vec2::ZERO, RoomId::new(1));
        assert!(boss.boss.is_some());
    }

    #[test]
    fn test_with_size_overrides_hitbox() {
        let enemy = Enemy::with_size(
            EnemyKind::Gaunt,
            Vec2::ZERO,
            RoomId::new(0),
            60.0,
            60.0,
        );
        assert_eq!(enemy.entity.width(), 60.0);
        assert_eq!(enemy.entity.height(), 60.0);
    }

    #[test]
    fn test_cooldowns_saturate() {
        let mut enemy = Enemy::new(EnemyKind::Gaunt, Vec2::ZERO, RoomId::new(0));
        enemy.attack_cooldown = 1;
        enemy.tick_cooldowns();
        enemy.tick_cooldowns();
        assert_eq!(enemy.attack_cooldown, 0);
    }
}
