//! The player character: armor, ammunition, and action timers.

use hivebreak_common::RoomId;
use serde::{Deserialize, Serialize};

use crate::combat::Weapon;
use crate::entity::{Entity, Faction};
use crate::input::Vec2;
use crate::physics::Bounds;

/// Startup tuning for the player, part of the configuration surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerTuning {
    /// Maximum health
    pub max_health: i32,
    /// Starting armor
    pub armor: i32,
    /// Armor ceiling
    pub max_armor: i32,
    /// Movement speed in units per tick
    pub speed: f32,
    /// Hitbox width
    pub width: f32,
    /// Hitbox height
    pub height: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            max_health: 100,
            armor: 20,
            max_armor: 100,
            speed: 5.0,
            width: 50.0,
            height: 70.0,
        }
    }
}

/// The player character.
#[derive(Debug, Clone, Serialize)]
pub struct Player {
    /// Shared entity body
    pub entity: Entity,
    armor: i32,
    max_armor: i32,
    weapon: Weapon,
    ammo: [u32; 3],
    /// Ticks until the next shot is allowed
    pub fire_cooldown: u32,
    /// Ticks until the next melee swing is allowed
    pub melee_cooldown: u32,
    reload_remaining: Option<u32>,
    speed: f32,
}

impl Player {
    /// Creates the player at a position with the given tuning.
    ///
    /// All weapons start at full capacity, bolter selected.
    #[must_use]
    pub fn new(pos: Vec2, room: RoomId, tuning: &PlayerTuning) -> Self {
        let entity = Entity::new(
            Faction::Player,
            pos,
            tuning.width,
            tuning.height,
            tuning.max_health,
            room,
        );
        let mut ammo = [0u32; 3];
        for weapon in Weapon::all() {
            ammo[weapon as usize] = weapon.capacity();
        }
        Self {
            entity,
            armor: tuning.armor.min(tuning.max_armor),
            max_armor: tuning.max_armor,
            weapon: Weapon::Bolter,
            ammo,
            fire_cooldown: 0,
            melee_cooldown: 0,
            reload_remaining: None,
            speed: tuning.speed,
        }
    }

    /// Returns whether the player is alive.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.entity.is_alive()
    }

    /// Current armor value.
    #[must_use]
    pub const fn armor(&self) -> i32 {
        self.armor
    }

    /// Adds armor, clamped to the ceiling. Returns the amount actually added.
    pub fn add_armor(&mut self, amount: i32) -> i32 {
        let before = self.armor;
        self.armor = (self.armor + amount.max(0)).min(self.max_armor);
        self.armor - before
    }

    /// Heals, clamped to max health. Returns the amount actually restored.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.entity.health.current();
        self.entity.health.heal(amount);
        self.entity.health.current() - before
    }

    /// Takes damage through armor reduction.
    ///
    /// Armor absorbs one percent per point, capped at 80%; at least one point
    /// of damage always lands. Returns `true` when this kills the player.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        if amount <= 0 || !self.is_alive() {
            return false;
        }
        let raw = amount as f32;
        let reduction = (raw * 0.01 * self.armor as f32).min(raw * 0.8);
        let actual = (raw - reduction).max(1.0) as i32;
        self.entity.apply_damage(actual)
    }

    /// Currently selected weapon.
    #[must_use]
    pub const fn weapon(&self) -> Weapon {
        self.weapon
    }

    /// Rounds loaded for a weapon.
    #[must_use]
    pub fn ammo(&self, weapon: Weapon) -> u32 {
        self.ammo[weapon as usize]
    }

    /// Rounds loaded for the active weapon.
    #[must_use]
    pub fn active_ammo(&self) -> u32 {
        self.ammo(self.weapon)
    }

    /// Adds rounds to a weapon, clamped to capacity. Returns rounds added.
    pub fn add_ammo(&mut self, weapon: Weapon, rounds: u32) -> u32 {
        let slot = &mut self.ammo[weapon as usize];
        let before = *slot;
        *slot = (*slot + rounds).min(weapon.capacity());
        *slot - before
    }

    /// Consumes one round from the active weapon if any is loaded.
    pub fn try_consume_round(&mut self) -> bool {
        let slot = &mut self.ammo[self.weapon as usize];
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }

    /// Whether a reload is in progress.
    #[must_use]
    pub const fn is_reloading(&self) -> bool {
        self.reload_remaining.is_some()
    }

    /// Starts a reload unless one is already running or the magazine is full.
    pub fn try_start_reload(&mut self, reload_ticks: u32) -> bool {
        if self.is_reloading() || self.active_ammo() == self.weapon.capacity() {
            return false;
        }
        self.reload_remaining = Some(reload_ticks.max(1));
        tracing::debug!(weapon = self.weapon.display_name(), "reload started");
        true
    }

    /// Cycles to the next weapon, cancelling any reload in progress.
    pub fn cycle_weapon(&mut self) -> Weapon {
        self.weapon = self.weapon.next();
        self.reload_remaining = None;
        self.weapon
    }

    /// Advances all timers by one tick.
    ///
    /// Returns the weapon whose reload completed this tick, if any.
    pub fn tick_timers(&mut self) -> Option<Weapon> {
        self.fire_cooldown = self.fire_cooldown.saturating_sub(1);
        self.melee_cooldown = self.melee_cooldown.saturating_sub(1);

        if let Some(remaining) = self.reload_remaining {
            let remaining = remaining.saturating_sub(1);
            if remaining == 0 {
                self.reload_remaining = None;
                self.ammo[self.weapon as usize] = self.weapon.capacity();
                return Some(self.weapon);
            }
            self.reload_remaining = Some(remaining);
        }
        None
    }

    /// Moves along the given axis at the player's speed, clamped to bounds.
    pub fn move_along(&mut self, axis: Vec2, bounds: &Bounds) {
        if axis == Vec2::ZERO {
            return;
        }
        self.entity.translate_clamped(axis * self.speed, bounds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn player() -> Player {
        Player::new(
            Vec2::new(400.0, 300.0),
            RoomId::new(0),
            &PlayerTuning::default(),
        )
    }

    #[test]
    fn test_starts_with_full_magazines() {
        let p = player();
        for weapon in Weapon::all() {
            assert_eq!(p.ammo(weapon), weapon.capacity());
        }
        assert_eq!(p.weapon(), Weapon::Bolter);
    }

    #[test]
    fn test_armor_reduces_damage() {
        let mut p = player();
        // 20 armor: 20% reduction. 10 damage -> 8.
        p.take_damage(10);
        assert_eq!(p.entity.health.current(), 92);
    }

    #[test]
    fn test_armor_reduction_capped_at_80_percent() {
        let mut p = player();
        p.add_armor(100); // clamps to 100 armor; formula would give 100%
        p.take_damage(10);
        // Capped at 80%: 2 damage.
        assert_eq!(p.entity.health.current(), 98);
    }

    #[test]
    fn test_minimum_one_damage() {
        let mut p = player();
        p.add_armor(100);
        p.take_damage(1);
        assert_eq!(p.entity.health.current(), 99);
    }

    #[test]
    fn test_heal_clamps_and_reports() {
        let mut p = player();
        p.take_damage(13); // 13 -> 10 after 20% reduction and truncation
        assert_eq!(p.entity.health.current(), 90);
        let restored = p.heal(500);
        assert_eq!(p.entity.health.current(), 100);
        assert_eq!(restored, 10);
    }

    #[test]
    fn test_add_ammo_clamps_to_capacity() {
        let mut p = player();
        p.try_consume_round();
        p.try_consume_round();
        assert_eq!(p.active_ammo(), Weapon::Bolter.capacity() - 2);

        let added = p.add_ammo(Weapon::Bolter, 500);
        assert_eq!(added, 2);
        assert_eq!(p.active_ammo(), Weapon::Bolter.capacity());
    }

    #[test]
    fn test_consume_round_stops_at_zero() {
        let mut p = player();
        for _ in 0..Weapon::Bolter.capacity() {
            assert!(p.try_consume_round());
        }
        assert!(!p.try_consume_round());
        assert_eq!(p.active_ammo(), 0);
    }

    #[test]
    fn test_reload_restores_capacity_after_delay() {
        let mut p = player();
        while p.try_consume_round() {}
        assert!(p.try_start_reload(3));

        assert_eq!(p.tick_timers(), None);
        assert_eq!(p.tick_timers(), None);
        assert_eq!(p.tick_timers(), Some(Weapon::Bolter));
        assert_eq!(p.active_ammo(), Weapon::Bolter.capacity());
        assert!(!p.is_reloading());
    }

    #[test]
    fn test_reload_cannot_be_retriggered() {
        let mut p = player();
        p.try_consume_round();
        assert!(p.try_start_reload(10));
        assert!(!p.try_start_reload(10));
    }

    #[test]
    fn test_reload_refused_when_full() {
        let mut p = player();
        assert!(!p.try_start_reload(10));
    }

    #[test]
    fn test_cycle_weapon_cancels_reload() {
        let mut p = player();
        p.try_consume_round();
        p.try_start_reload(10);

        assert_eq!(p.cycle_weapon(), Weapon::Plasma);
        assert!(!p.is_reloading());
    }

    #[test]
    fn test_move_respects_bounds() {
        let bounds = Bounds::new(800.0, 600.0);
        let mut p = player();
        for _ in 0..500 {
            p.move_along(Vec2::RIGHT, &bounds);
        }
        assert_eq!(p.entity.pos.x, 800.0 - p.entity.width() / 2.0);
    }

    proptest! {
        /// Ammo can never exceed capacity or go negative through any
        /// interleaving of consumption and resupply.
        #[test]
        fn prop_ammo_stays_in_range(ops in prop::collection::vec(0u8..3, 0..200)) {
            let mut p = player();
            for op in ops {
                match op {
                    0 => { p.try_consume_round(); }
                    1 => { p.add_ammo(p.weapon(), 7); }
                    _ => { p.cycle_weapon(); }
                }
                for weapon in Weapon::all() {
                    prop_assert!(p.ammo(weapon) <= weapon.capacity());
                }
            }
        }
    }
}
