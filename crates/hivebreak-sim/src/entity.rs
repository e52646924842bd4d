//! Shared entity model: position, hitbox, health, faction, life state.

use hivebreak_common::{EntityId, RoomId};
use serde::{Deserialize, Serialize};

use crate::input::Vec2;
use crate::physics::{Bounds, AABB};

/// Faction an entity belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    /// The player character
    Player,
    /// Hostile swarm creatures
    Hive,
    /// Friendly non-combatants
    Imperial,
}

impl Faction {
    /// Returns whether this faction is hostile to the given one.
    #[must_use]
    pub const fn is_hostile_to(self, other: Self) -> bool {
        matches!(
            (self, other),
            (Faction::Hive, Faction::Player) | (Faction::Player, Faction::Hive)
        )
    }
}

/// Life state tag of an entity.
///
/// `Dead` is terminal: the room orchestrator purges dead entities from the
/// active roster within one tick of the transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LifeState {
    /// Participating in the simulation
    #[default]
    Alive,
    /// Terminal state, pending removal
    Dead,
}

/// Horizontal facing of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Facing {
    /// Facing left
    Left,
    /// Facing right (default)
    #[default]
    Right,
}

impl Facing {
    /// Facing derived from a horizontal delta; `None` when the delta is zero.
    #[must_use]
    pub fn from_dx(dx: f32) -> Option<Self> {
        if dx > 0.0 {
            Some(Facing::Right)
        } else if dx < 0.0 {
            Some(Facing::Left)
        } else {
            None
        }
    }

    /// Unit direction along the X axis.
    #[must_use]
    pub const fn dir_x(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// Health component for entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    /// Current health
    current: i32,
    /// Maximum health
    max: i32,
}

impl Health {
    /// Creates a new health component at full health.
    #[must_use]
    pub const fn new(max: i32) -> Self {
        Self { current: max, max }
    }

    /// Returns current health.
    #[must_use]
    pub const fn current(&self) -> i32 {
        self.current
    }

    /// Returns maximum health.
    #[must_use]
    pub const fn max(&self) -> i32 {
        self.max
    }

    /// Applies damage, clamping at zero.
    pub fn damage(&mut self, amount: i32) {
        self.current = (self.current - amount.max(0)).max(0);
    }

    /// Applies healing, clamping at max.
    pub fn heal(&mut self, amount: i32) {
        self.current = (self.current + amount.max(0)).min(self.max);
    }

    /// Checks if health is exhausted.
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.current <= 0
    }

    /// Remaining health as a fraction of the maximum.
    #[must_use]
    pub fn fraction(&self) -> f32 {
        if self.max <= 0 {
            0.0
        } else {
            self.current as f32 / self.max as f32
        }
    }
}

/// A simulated actor: identity, body, health, faction, life state.
///
/// The position is the hitbox center. Movement always goes through
/// [`Entity::translate_clamped`], which keeps the hitbox inside the owning
/// room's bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    id: EntityId,
    faction: Faction,
    /// Hitbox center in room coordinates.
    pub pos: Vec2,
    /// Velocity in units per tick.
    pub vel: Vec2,
    half_width: f32,
    half_height: f32,
    /// Current health.
    pub health: Health,
    life: LifeState,
    room: RoomId,
    /// Horizontal facing, used for melee arcs and projectile direction.
    pub facing: Facing,
}

impl Entity {
    /// Creates a new entity.
    #[must_use]
    pub fn new(faction: Faction, pos: Vec2, width: f32, height: f32, max_health: i32, room: RoomId) -> Self {
        Self {
            id: EntityId::new(),
            faction,
            pos,
            vel: Vec2::ZERO,
            half_width: width / 2.0,
            half_height: height / 2.0,
            health: Health::new(max_health),
            life: LifeState::Alive,
            room,
            facing: Facing::Right,
        }
    }

    /// Returns the entity's unique ID.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Returns the entity's faction.
    #[must_use]
    pub const fn faction(&self) -> Faction {
        self.faction
    }

    /// Returns the owning room.
    #[must_use]
    pub const fn room(&self) -> RoomId {
        self.room
    }

    /// Moves the entity to another room (transition only).
    pub fn set_room(&mut self, room: RoomId) {
        self.room = room;
    }

    /// Returns the life state tag.
    #[must_use]
    pub const fn life(&self) -> LifeState {
        self.life
    }

    /// Returns whether the entity is alive.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.life == LifeState::Alive
    }

    /// Returns the hitbox as an AABB.
    #[must_use]
    pub fn hitbox(&self) -> AABB {
        AABB::from_center(self.pos, self.half_width, self.half_height)
    }

    /// Hitbox width.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.half_width * 2.0
    }

    /// Hitbox height.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.half_height * 2.0
    }

    /// Replaces the hitbox dimensions (asset catalog override).
    pub fn set_size(&mut self, width: f32, height: f32) {
        self.half_width = width / 2.0;
        self.half_height = height / 2.0;
    }

    /// Applies damage, flipping to the terminal `Dead` state at zero health.
    ///
    /// Damaging an already-dead entity is a no-op. Returns `true` when this
    /// call killed the entity.
    pub fn apply_damage(&mut self, amount: i32) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.health.damage(amount);
        debug_assert!(self.health.current() >= 0);
        if self.health.is_dead() {
            self.life = LifeState::Dead;
            tracing::debug!(id = self.id.raw(), "entity died");
            return true;
        }
        false
    }

    /// Moves the entity by `delta`, clamping the hitbox inside `bounds`.
    ///
    /// Updates facing from the horizontal component of the movement.
    pub fn translate_clamped(&mut self, delta: Vec2, bounds: &Bounds) {
        self.pos = bounds.clamp_center(self.pos + delta, self.half_width, self.half_height);
        if let Some(facing) = Facing::from_dx(delta.x) {
            self.facing = facing;
        }
    }

    /// AABB intersection test against another entity.
    #[must_use]
    pub fn overlaps(&self, other: &Entity) -> bool {
        self.hitbox().overlaps(&other.hitbox())
    }

    /// Distance between hitbox centers.
    #[must_use]
    pub fn distance_to(&self, pos: Vec2) -> f32 {
        self.pos.distance(pos)
    }

    /// Unit direction from this entity towards a position.
    #[must_use]
    pub fn direction_to(&self, pos: Vec2) -> Vec2 {
        (pos - self.pos).normalized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn test_entity() -> Entity {
        Entity::new(
            Faction::Hive,
            Vec2::new(100.0, 100.0),
            40.0,
            40.0,
            50,
            RoomId::new(0),
        )
    }

    #[test]
    fn test_health_clamps() {
        let mut health = Health::new(100);
        health.damage(150);
        assert_eq!(health.current(), 0);
        assert!(health.is_dead());

        health.heal(20);
        assert_eq!(health.current(), 20);
        health.heal(500);
        assert_eq!(health.current(), 100);
    }

    #[test]
    fn test_health_ignores_negative_amounts() {
        let mut health = Health::new(100);
        health.damage(-50);
        assert_eq!(health.current(), 100);
        health.heal(-50);
        assert_eq!(health.current(), 100);
    }

    #[test]
    fn test_apply_damage_kills_at_zero() {
        let mut entity = test_entity();

        assert!(!entity.apply_damage(49));
        assert!(entity.is_alive());

        assert!(entity.apply_damage(1));
        assert_eq!(entity.life(), LifeState::Dead);
        assert_eq!(entity.health.current(), 0);
    }

    #[test]
    fn test_exact_lethal_damage() {
        let mut entity = test_entity();
        assert!(entity.apply_damage(50));
        assert_eq!(entity.health.current(), 0);
        assert_eq!(entity.life(), LifeState::Dead);
    }

    #[test]
    fn test_damage_on_dead_is_noop() {
        let mut entity = test_entity();
        entity.apply_damage(50);

        assert!(!entity.apply_damage(10));
        assert_eq!(entity.health.current(), 0);
        assert_eq!(entity.life(), LifeState::Dead);
    }

    #[test]
    fn test_translate_clamped_respects_bounds() {
        let bounds = Bounds::new(800.0, 600.0);
        let mut entity = test_entity();

        entity.translate_clamped(Vec2::new(-500.0, 0.0), &bounds);
        assert_eq!(entity.pos.x, 20.0); // half width
        assert_eq!(entity.facing, Facing::Left);

        entity.translate_clamped(Vec2::new(2000.0, 0.0), &bounds);
        assert_eq!(entity.pos.x, 780.0);
        assert_eq!(entity.facing, Facing::Right);
    }

    #[test]
    fn test_facing_unchanged_on_vertical_move() {
        let bounds = Bounds::new(800.0, 600.0);
        let mut entity = test_entity();
        entity.facing = Facing::Left;

        entity.translate_clamped(Vec2::new(0.0, 10.0), &bounds);
        assert_eq!(entity.facing, Facing::Left);
    }

    #[test]
    fn test_overlap() {
        let a = test_entity();
        let mut b = test_entity();
        assert!(a.overlaps(&b));

        b.pos = Vec2::new(500.0, 500.0);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_faction_hostility() {
        assert!(Faction::Hive.is_hostile_to(Faction::Player));
        assert!(Faction::Player.is_hostile_to(Faction::Hive));
        assert!(!Faction::Imperial.is_hostile_to(Faction::Player));
        assert!(!Faction::Hive.is_hostile_to(Faction::Hive));
    }

    proptest! {
        /// Health never goes negative after any sequence of damage calls.
        #[test]
        fn prop_health_never_negative(amounts in prop::collection::vec(-100i32..500, 0..64)) {
            let mut entity = test_entity();
            for amount in amounts {
                entity.apply_damage(amount);
                prop_assert!(entity.health.current() >= 0);
            }
        }

        /// Dead is terminal regardless of subsequent damage.
        #[test]
        fn prop_dead_is_terminal(amounts in prop::collection::vec(0i32..200, 1..32)) {
            let mut entity = test_entity();
            entity.apply_damage(1000);
            prop_assert_eq!(entity.life(), LifeState::Dead);
            for amount in amounts {
                entity.apply_damage(amount);
                prop_assert_eq!(entity.life(), LifeState::Dead);
                prop_assert_eq!(entity.health.current(), 0);
            }
        }
    }
}
