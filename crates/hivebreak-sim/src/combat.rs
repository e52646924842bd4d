//! Combat resolution: ranged fire, melee swings, and projectile hits.
//!
//! Every operation here is a guarded no-op rather than an error: firing on an
//! empty magazine, swinging mid-cooldown, and hitting the already-dead all
//! resolve to "nothing happened" outcomes within the same tick.

use hivebreak_common::{EntityId, ProjectileId};
use serde::{Deserialize, Serialize};

use crate::ai::{AttackIntent, AttackKind};
use crate::enemy::Enemy;
use crate::entity::Faction;
use crate::input::Vec2;
use crate::physics::{Bounds, AABB};
use crate::player::Player;

/// Player weapon kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weapon {
    /// Workhorse rifle
    Bolter = 0,
    /// Higher damage, smaller magazine
    Plasma = 1,
    /// Double damage, tiny magazine
    Melta = 2,
}

impl Weapon {
    /// Get display name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Bolter => "Bolter",
            Self::Plasma => "Plasma",
            Self::Melta => "Melta",
        }
    }

    /// Magazine capacity.
    #[must_use]
    pub const fn capacity(self) -> u32 {
        match self {
            Self::Bolter => 30,
            Self::Plasma => 10,
            Self::Melta => 5,
        }
    }

    /// Damage multiplier applied to the base projectile damage.
    #[must_use]
    pub const fn damage_mult(self) -> f32 {
        match self {
            Self::Bolter => 1.0,
            Self::Plasma => 1.5,
            Self::Melta => 2.0,
        }
    }

    /// Next weapon in the cycle order.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Bolter => Self::Plasma,
            Self::Plasma => Self::Melta,
            Self::Melta => Self::Bolter,
        }
    }

    /// All weapons in cycle order.
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::Bolter, Self::Plasma, Self::Melta]
    }
}

/// Tuning for the player's attacks, part of the configuration surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatTuning {
    /// Base projectile damage before the weapon multiplier
    pub bullet_damage: i32,
    /// Projectile speed in units per tick
    pub bullet_speed: f32,
    /// Projectile collision radius
    pub bullet_radius: f32,
    /// Ticks between shots
    pub fire_cooldown: u32,
    /// Melee damage at point-blank range
    pub melee_damage: i32,
    /// Melee reach
    pub melee_range: f32,
    /// Ticks between melee swings
    pub melee_cooldown: u32,
    /// Ticks a reload takes
    pub reload_ticks: u32,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            bullet_damage: 20,
            bullet_speed: 10.0,
            bullet_radius: 5.0,
            fire_cooldown: 30,
            melee_damage: 25,
            melee_range: 60.0,
            melee_cooldown: 18,
            reload_ticks: 90,
        }
    }
}

/// A live projectile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Projectile {
    id: ProjectileId,
    faction: Faction,
    /// Position of the projectile center
    pub pos: Vec2,
    /// Velocity in units per tick
    pub vel: Vec2,
    damage: i32,
    radius: f32,
}

impl Projectile {
    /// Returns the projectile's ID.
    #[must_use]
    pub const fn id(&self) -> ProjectileId {
        self.id
    }

    /// Returns the owning faction.
    #[must_use]
    pub const fn faction(&self) -> Faction {
        self.faction
    }

    /// Returns the damage dealt on hit.
    #[must_use]
    pub const fn damage(&self) -> i32 {
        self.damage
    }

    /// Returns the collision radius.
    #[must_use]
    pub const fn radius(&self) -> f32 {
        self.radius
    }

    /// Collision box of the projectile.
    #[must_use]
    pub fn hitbox(&self) -> AABB {
        AABB::from_center(self.pos, self.radius, self.radius)
    }
}

/// Result of a ranged fire request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireOutcome {
    /// A projectile was spawned
    Fired(Weapon),
    /// The magazine is empty; nothing changed
    OutOfAmmo(Weapon),
    /// The fire cooldown is still running
    CoolingDown,
    /// A reload is in progress
    Reloading,
}

/// One enemy struck by a melee swing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeleeHit {
    /// Struck enemy
    pub target: EntityId,
    /// Damage applied
    pub damage: i32,
    /// Whether the hit was lethal
    pub fatal: bool,
}

/// Result of a melee swing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeleeOutcome {
    /// The swing happened; every hit in one call
    Swung(Vec<MeleeHit>),
    /// The melee cooldown is still running; no damage was applied
    CoolingDown,
}

/// What a projectile hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    /// An enemy was struck
    Enemy(EntityId),
    /// The player was struck
    Player,
}

/// A resolved projectile hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitRecord {
    /// The projectile that connected
    pub projectile: ProjectileId,
    /// What it hit
    pub target: HitTarget,
    /// Damage applied after any reduction
    pub damage: i32,
    /// Whether the hit was lethal
    pub fatal: bool,
}

/// Damage the player suffered from applied attack intents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerHits {
    /// Total damage applied this call
    pub damage: i32,
    /// Whether the player died
    pub fatal: bool,
}

/// The combat resolver: owns live projectiles and applies damage.
#[derive(Debug)]
pub struct CombatSystem {
    tuning: CombatTuning,
    projectiles: Vec<Projectile>,
    next_projectile_id: u64,
}

impl CombatSystem {
    /// Creates a resolver with the given tuning.
    #[must_use]
    pub fn new(tuning: CombatTuning) -> Self {
        Self {
            tuning,
            projectiles: Vec::new(),
            next_projectile_id: 1,
        }
    }

    /// The tuning in effect.
    #[must_use]
    pub const fn tuning(&self) -> &CombatTuning {
        &self.tuning
    }

    /// Live projectiles, in spawn (= id) order.
    #[must_use]
    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// Fires the player's active weapon.
    ///
    /// Out of ammo is a pure no-op: position, cooldowns, and ammo are left
    /// untouched and no projectile is created.
    pub fn fire_ranged(&mut self, player: &mut Player) -> FireOutcome {
        if player.is_reloading() {
            return FireOutcome::Reloading;
        }
        if player.fire_cooldown > 0 {
            return FireOutcome::CoolingDown;
        }
        let weapon = player.weapon();
        if !player.try_consume_round() {
            return FireOutcome::OutOfAmmo(weapon);
        }

        player.fire_cooldown = self.tuning.fire_cooldown;
        let dir = Vec2::new(player.entity.facing.dir_x(), 0.0);
        let damage = (self.tuning.bullet_damage as f32 * weapon.damage_mult()).round() as i32;
        self.spawn_projectile(
            Faction::Player,
            player.entity.pos,
            dir * self.tuning.bullet_speed,
            damage,
            self.tuning.bullet_radius,
        );
        tracing::debug!(weapon = weapon.display_name(), "shot fired");
        FireOutcome::Fired(weapon)
    }

    /// Starts a reload on the player using the configured delay.
    pub fn start_reload(&self, player: &mut Player) -> bool {
        player.try_start_reload(self.tuning.reload_ticks)
    }

    /// Swings the player's melee attack.
    ///
    /// Strikes every living enemy within reach on the facing side in a single
    /// call, with linear distance falloff. No effect while on cooldown.
    pub fn melee_attack(&self, player: &mut Player, enemies: &mut [Enemy]) -> MeleeOutcome {
        if player.melee_cooldown > 0 {
            return MeleeOutcome::CoolingDown;
        }
        player.melee_cooldown = self.tuning.melee_cooldown;

        let origin = player.entity.pos;
        let facing = player.entity.facing;
        let range = self.tuning.melee_range;
        let mut hits = Vec::new();

        for enemy in enemies.iter_mut() {
            if !enemy.is_alive() {
                continue;
            }
            let delta = enemy.entity.pos - origin;
            let dist = delta.length();
            let in_front = delta.x * facing.dir_x() >= 0.0;
            if dist >= range || !in_front {
                continue;
            }
            let falloff = 1.0 - dist / range;
            let damage = ((self.tuning.melee_damage as f32 * falloff) as i32).max(1);
            let fatal = enemy.entity.apply_damage(damage);
            hits.push(MeleeHit {
                target: enemy.entity.id(),
                damage,
                fatal,
            });
        }
        MeleeOutcome::Swung(hits)
    }

    /// Applies the AI's attack intents: contact and area damage to the player,
    /// ranged intents become hostile projectiles.
    pub fn apply_intents(&mut self, intents: &[AttackIntent], player: &mut Player) -> PlayerHits {
        let mut result = PlayerHits::default();
        for intent in intents {
            match intent.kind {
                AttackKind::Contact { damage } => {
                    result.absorb(player, damage);
                }
                AttackKind::Area { damage, radius } => {
                    let dist = player.entity.distance_to(intent.origin);
                    if dist < radius {
                        let falloff = 1.0 - dist / radius;
                        let scaled = ((damage as f32 * falloff) as i32).max(1);
                        result.absorb(player, scaled);
                    }
                }
                AttackKind::Ranged {
                    damage,
                    speed,
                    radius,
                    dir,
                } => {
                    self.spawn_projectile(
                        Faction::Hive,
                        intent.origin,
                        dir * speed,
                        damage,
                        radius,
                    );
                }
            }
        }
        result
    }

    /// Advances projectiles and despawns those leaving the room bounds.
    pub fn step_projectiles(&mut self, bounds: &Bounds) {
        for projectile in &mut self.projectiles {
            projectile.pos += projectile.vel;
        }
        self.projectiles.retain(|p| {
            p.pos.x + p.radius >= 0.0
                && p.pos.x - p.radius <= bounds.width
                && p.pos.y + p.radius >= 0.0
                && p.pos.y - p.radius <= bounds.height
        });
    }

    /// Resolves projectile collisions.
    ///
    /// Projectiles process in ascending id order. A projectile overlapping
    /// several enemies hits the closest one, ties broken by ascending entity
    /// id; projectiles are non-piercing and despawn on first hit. Dead
    /// targets are skipped entirely.
    pub fn resolve_hits(&mut self, enemies: &mut [Enemy], player: &mut Player) -> Vec<HitRecord> {
        let mut records = Vec::new();
        let mut spent = Vec::new();

        for (index, projectile) in self.projectiles.iter().enumerate() {
            let hitbox = projectile.hitbox();
            match projectile.faction {
                Faction::Player => {
                    let target = enemies
                        .iter_mut()
                        .filter(|e| e.is_alive() && e.entity.hitbox().overlaps(&hitbox))
                        .min_by(|a, b| {
                            let da = a.entity.distance_to(projectile.pos);
                            let db = b.entity.distance_to(projectile.pos);
                            da.total_cmp(&db).then(a.entity.id().cmp(&b.entity.id()))
                        });
                    if let Some(enemy) = target {
                        let fatal = enemy.entity.apply_damage(projectile.damage);
                        records.push(HitRecord {
                            projectile: projectile.id,
                            target: HitTarget::Enemy(enemy.entity.id()),
                            damage: projectile.damage,
                            fatal,
                        });
                        spent.push(index);
                    }
                }
                Faction::Hive => {
                    if player.is_alive() && player.entity.hitbox().overlaps(&hitbox) {
                        let before = player.entity.health.current();
                        let fatal = player.take_damage(projectile.damage);
                        records.push(HitRecord {
                            projectile: projectile.id,
                            target: HitTarget::Player,
                            damage: before - player.entity.health.current(),
                            fatal,
                        });
                        spent.push(index);
                    }
                }
                Faction::Imperial => {}
            }
        }

        for index in spent.into_iter().rev() {
            self.projectiles.remove(index);
        }
        records
    }

    /// Despawns all projectiles (room transitions).
    pub fn clear_projectiles(&mut self) {
        self.projectiles.clear();
    }

    fn spawn_projectile(&mut self, faction: Faction, pos: Vec2, vel: Vec2, damage: i32, radius: f32) {
        let id = ProjectileId::new(self.next_projectile_id);
        self.next_projectile_id += 1;
        self.projectiles.push(Projectile {
            id,
            faction,
            pos,
            vel,
            damage,
            radius,
        });
    }
}

impl PlayerHits {
    fn absorb(&mut self, player: &mut Player, damage: i32) {
        let before = player.entity.health.current();
        let fatal = player.take_damage(damage);
        self.damage += before - player.entity.health.current();
        self.fatal |= fatal;
    }
}

impl Default for CombatSystem {
    fn default() -> Self {
        Self::new(CombatTuning::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enemy::EnemyKind;
    use crate::player::PlayerTuning;
    use hivebreak_common::RoomId;

    fn player_at(x: f32, y: f32) -> Player {
        Player::new(Vec2::new(x, y), RoomId::new(0), &PlayerTuning::default())
    }

    fn gaunt_at(x: f32, y: f32) -> Enemy {
        Enemy::new(EnemyKind::Gaunt, Vec2::new(x, y), RoomId::new(0))
    }

    #[test]
    fn test_weapon_cycle_covers_all() {
        let mut weapon = Weapon::Bolter;
        for expected in [Weapon::Plasma, Weapon::Melta, Weapon::Bolter] {
            weapon = weapon.next();
            assert_eq!(weapon, expected);
        }
    }

    #[test]
    fn test_fire_spawns_projectile_and_spends_round() {
        let mut combat = CombatSystem::default();
        let mut player = player_at(100.0, 100.0);

        let outcome = combat.fire_ranged(&mut player);
        assert_eq!(outcome, FireOutcome::Fired(Weapon::Bolter));
        assert_eq!(player.active_ammo(), Weapon::Bolter.capacity() - 1);
        assert_eq!(combat.projectiles().len(), 1);
        assert!(player.fire_cooldown > 0);
    }

    #[test]
    fn test_fire_with_empty_magazine_is_pure_noop() {
        let mut combat = CombatSystem::default();
        let mut player = player_at(100.0, 100.0);
        while player.try_consume_round() {}

        let pos = player.entity.pos;
        let outcome = combat.fire_ranged(&mut player);

        assert_eq!(outcome, FireOutcome::OutOfAmmo(Weapon::Bolter));
        assert_eq!(player.active_ammo(), 0);
        assert_eq!(player.entity.pos, pos);
        assert_eq!(player.fire_cooldown, 0);
        assert!(combat.projectiles().is_empty());
    }

    #[test]
    fn test_fire_during_cooldown_refused() {
        let mut combat = CombatSystem::default();
        let mut player = player_at(100.0, 100.0);

        combat.fire_ranged(&mut player);
        let outcome = combat.fire_ranged(&mut player);
        assert_eq!(outcome, FireOutcome::CoolingDown);
        assert_eq!(combat.projectiles().len(), 1);
    }

    #[test]
    fn test_fire_while_reloading_refused() {
        let mut combat = CombatSystem::default();
        let mut player = player_at(100.0, 100.0);
        player.try_consume_round();
        combat.start_reload(&mut player);

        assert_eq!(combat.fire_ranged(&mut player), FireOutcome::Reloading);
    }

    #[test]
    fn test_weapon_multiplier_applied() {
        let mut combat = CombatSystem::default();
        let mut player = player_at(100.0, 100.0);
        player.cycle_weapon(); // Plasma
        player.cycle_weapon(); // Melta

        combat.fire_ranged(&mut player);
        assert_eq!(combat.projectiles()[0].damage(), 40);
    }

    #[test]
    fn test_melee_hits_all_in_reach_one_call() {
        let combat = CombatSystem::default();
        let mut player = player_at(100.0, 100.0);
        let mut enemies = vec![
            gaunt_at(130.0, 100.0),
            gaunt_at(140.0, 110.0),
            gaunt_at(400.0, 100.0), // out of reach
            gaunt_at(60.0, 100.0),  // behind the player
        ];

        let outcome = combat.melee_attack(&mut player, &mut enemies);
        match outcome {
            MeleeOutcome::Swung(hits) => {
                assert_eq!(hits.len(), 2);
            }
            MeleeOutcome::CoolingDown => panic!("swing expected"),
        }
    }

    #[test]
    fn test_melee_during_cooldown_applies_no_damage() {
        let combat = CombatSystem::default();
        let mut player = player_at(100.0, 100.0);
        let mut enemies = vec![gaunt_at(130.0, 100.0)];

        combat.melee_attack(&mut player, &mut enemies);
        let health_after_first = enemies[0].entity.health.current();

        let outcome = combat.melee_attack(&mut player, &mut enemies);
        assert_eq!(outcome, MeleeOutcome::CoolingDown);
        assert_eq!(enemies[0].entity.health.current(), health_after_first);
    }

    #[test]
    fn test_melee_damage_falls_off_with_distance() {
        let combat = CombatSystem::default();
        let mut player = player_at(100.0, 100.0);
        let mut enemies = vec![gaunt_at(110.0, 100.0), gaunt_at(150.0, 100.0)];

        let MeleeOutcome::Swung(hits) = combat.melee_attack(&mut player, &mut enemies) else {
            panic!("swing expected");
        };
        assert!(hits[0].damage > hits[1].damage);
    }

    #[test]
    fn test_projectile_hits_closest_enemy() {
        let mut combat = CombatSystem::default();
        let mut player = player_at(100.0, 100.0);

        combat.fire_ranged(&mut player);
        // Walk the projectile into a cluster where both gaunts overlap it.
        let mut enemies = vec![gaunt_at(128.0, 100.0), gaunt_at(120.0, 100.0)];
        let far_id = enemies[0].entity.id();
        let near_id = enemies[1].entity.id();

        combat.step_projectiles(&Bounds::default());
        let records = combat.resolve_hits(&mut enemies, &mut player);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].target, HitTarget::Enemy(near_id));
        assert!(combat.projectiles().is_empty()); // non-piercing
        assert_eq!(
            enemies
                .iter()
                .find(|e| e.entity.id() == far_id)
                .map(|e| e.entity.health.current()),
            Some(EnemyKind::Gaunt.profile().max_health)
        );
    }

    #[test]
    fn test_equidistant_tie_breaks_by_entity_id() {
        let mut combat = CombatSystem::default();
        let mut player = player_at(100.0, 100.0);
        combat.fire_ranged(&mut player);

        // Two enemies at the same spot: the earlier-spawned (lower id) wins.
        let mut enemies = vec![gaunt_at(121.0, 100.0), gaunt_at(121.0, 100.0)];
        let first_id = enemies[0].entity.id();
        assert!(first_id < enemies[1].entity.id());

        combat.step_projectiles(&Bounds::default());
        let records = combat.resolve_hits(&mut enemies, &mut player);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].target, HitTarget::Enemy(first_id));
    }

    #[test]
    fn test_projectile_skips_dead_enemies() {
        let mut combat = CombatSystem::default();
        let mut player = player_at(100.0, 100.0);
        combat.fire_ranged(&mut player);

        let mut enemies = vec![gaunt_at(112.0, 100.0)];
        enemies[0].entity.apply_damage(1000);

        combat.step_projectiles(&Bounds::default());
        let records = combat.resolve_hits(&mut enemies, &mut player);
        assert!(records.is_empty());
        assert_eq!(combat.projectiles().len(), 1);
    }

    #[test]
    fn test_hostile_projectile_hits_player_through_armor() {
        let mut combat = CombatSystem::default();
        let mut player = player_at(100.0, 100.0);
        let mut enemies = Vec::new();

        let intent = AttackIntent {
            attacker: EntityId::new(),
            origin: Vec2::new(160.0, 100.0),
            kind: AttackKind::Ranged {
                damage: 10,
                speed: 6.0,
                radius: 5.0,
                dir: Vec2::LEFT,
            },
        };
        combat.apply_intents(&[intent], &mut player);
        assert_eq!(combat.projectiles().len(), 1);

        let mut records = Vec::new();
        for _ in 0..20 {
            combat.step_projectiles(&Bounds::default());
            records.extend(combat.resolve_hits(&mut enemies, &mut player));
        }
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].target, HitTarget::Player);
        // 20 armor: 10 damage lands as 8.
        assert_eq!(records[0].damage, 8);
        assert_eq!(player.entity.health.current(), 92);
    }

    #[test]
    fn test_area_intent_falloff_and_miss() {
        let mut combat = CombatSystem::default();
        let mut player = player_at(100.0, 100.0);

        // Outside the radius: no damage at all.
        let miss = AttackIntent {
            attacker: EntityId::new(),
            origin: Vec2::new(500.0, 100.0),
            kind: AttackKind::Area {
                damage: 40,
                radius: 100.0,
            },
        };
        let hits = combat.apply_intents(&[miss], &mut player);
        assert_eq!(hits.damage, 0);

        // Inside: reduced by falloff, then armor.
        let hit = AttackIntent {
            attacker: EntityId::new(),
            origin: Vec2::new(150.0, 100.0),
            kind: AttackKind::Area {
                damage: 40,
                radius: 100.0,
            },
        };
        let hits = combat.apply_intents(&[hit], &mut player);
        assert!(hits.damage > 0);
        assert!(hits.damage < 40);
    }

    #[test]
    fn test_projectiles_despawn_off_bounds() {
        let mut combat = CombatSystem::default();
        let mut player = player_at(790.0, 100.0);

        combat.fire_ranged(&mut player);
        for _ in 0..5 {
            combat.step_projectiles(&Bounds::default());
        }
        assert!(combat.projectiles().is_empty());
    }

    #[test]
    fn test_clear_projectiles() {
        let mut combat = CombatSystem::default();
        let mut player = player_at(100.0, 100.0);
        combat.fire_ranged(&mut player);

        combat.clear_projectiles();
        assert!(combat.projectiles().is_empty());
    }
}
