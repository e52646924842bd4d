//! Pickups: timed supply drops consumed on player overlap.

use hivebreak_common::PickupId;
use serde::{Deserialize, Serialize};

use crate::input::Vec2;
use crate::physics::AABB;
use crate::player::Player;
use crate::spawn::SpawnRng;

/// Kind of pickup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickupKind {
    /// Restores health
    Health,
    /// Refills rounds for the active weapon
    Ammo,
    /// Adds armor
    Armor,
}

impl PickupKind {
    /// Get display name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Health => "Medkit",
            Self::Ammo => "Ammo Crate",
            Self::Armor => "Armor Plate",
        }
    }

    /// Default value carried by this kind.
    #[must_use]
    pub const fn default_value(self) -> i32 {
        match self {
            Self::Health => 20,
            Self::Ammo => 15,
            Self::Armor => 10,
        }
    }
}

/// What consuming a pickup actually did to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupEffect {
    /// Health restored (clamped amount actually applied)
    Healed(i32),
    /// Rounds added to a weapon (clamped amount actually added)
    AmmoRestored(u32),
    /// Armor added (clamped amount actually added)
    ArmorAdded(i32),
    /// The pickup was inactive or nothing could be applied
    None,
}

/// A pickup in the world.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pickup {
    id: PickupId,
    /// Kind of pickup
    pub kind: PickupKind,
    /// Position of the pickup center
    pub pos: Vec2,
    /// Value applied on consumption
    pub value: i32,
    active: bool,
    age: u32,
}

/// Pickup hitbox half-extent.
const PICKUP_HALF_SIZE: f32 = 20.0;

impl Pickup {
    /// Returns the pickup's ID.
    #[must_use]
    pub const fn id(&self) -> PickupId {
        self.id
    }

    /// Whether the pickup can still be consumed.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Collision box of the pickup.
    #[must_use]
    pub fn hitbox(&self) -> AABB {
        AABB::from_center(self.pos, PICKUP_HALF_SIZE, PICKUP_HALF_SIZE)
    }
}

/// Manager for the current room's pickups.
///
/// Pickups are transient: the session clears them on every room transition.
#[derive(Debug)]
pub struct PickupManager {
    pickups: Vec<Pickup>,
    next_id: u64,
    /// Concurrent active pickup cap
    max_active: usize,
    /// Ticks before an unconsumed pickup expires
    lifetime: u32,
}

impl PickupManager {
    /// Creates a manager with a concurrency cap and expiry.
    #[must_use]
    pub fn new(max_active: usize, lifetime: u32) -> Self {
        Self {
            pickups: Vec::new(),
            next_id: 1,
            max_active,
            lifetime: lifetime.max(1),
        }
    }

    /// All pickups, active and not yet purged.
    #[must_use]
    pub fn pickups(&self) -> &[Pickup] {
        &self.pickups
    }

    /// Number of currently active pickups.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.pickups.iter().filter(|p| p.is_active()).count()
    }

    /// Spawns a pickup at one of the given spawn points.
    ///
    /// Denied (returns `None`) when the concurrency cap is reached or no
    /// spawn point is free of an active pickup.
    pub fn try_spawn(
        &mut self,
        kind: PickupKind,
        spawn_points: &[Vec2],
        rng: &mut SpawnRng,
    ) -> Option<PickupId> {
        if self.active_count() >= self.max_active {
            tracing::debug!(kind = kind.display_name(), "pickup denied, cap reached");
            return None;
        }
        let free: Vec<Vec2> = spawn_points
            .iter()
            .copied()
            .filter(|point| {
                !self
                    .pickups
                    .iter()
                    .any(|p| p.is_active() && p.pos.distance(*point) < PICKUP_HALF_SIZE)
            })
            .collect();
        let pos = *rng.choose(&free)?;

        let id = PickupId::new(self.next_id);
        self.next_id += 1;
        self.pickups.push(Pickup {
            id,
            kind,
            pos,
            value: kind.default_value(),
            active: true,
            age: 0,
        });
        tracing::debug!(kind = kind.display_name(), "pickup spawned");
        Some(id)
    }

    /// Ages pickups, expiring those past their lifetime.
    pub fn update(&mut self) {
        let lifetime = self.lifetime;
        for pickup in &mut self.pickups {
            if !pickup.active {
                continue;
            }
            pickup.age += 1;
            if pickup.age >= lifetime {
                pickup.active = false;
            }
        }
    }

    /// Consumes a specific pickup, applying its value to the player.
    ///
    /// Idempotent: an inactive or unknown pickup yields `PickupEffect::None`
    /// and changes nothing.
    pub fn consume(&mut self, id: PickupId, player: &mut Player) -> PickupEffect {
        let Some(pickup) = self
            .pickups
            .iter_mut()
            .find(|p| p.id() == id && p.is_active())
        else {
            return PickupEffect::None;
        };
        pickup.active = false;
        let effect = match pickup.kind {
            PickupKind::Health => PickupEffect::Healed(player.heal(pickup.value)),
            PickupKind::Ammo => {
                PickupEffect::AmmoRestored(player.add_ammo(player.weapon(), pickup.value.max(0) as u32))
            }
            PickupKind::Armor => PickupEffect::ArmorAdded(player.add_armor(pickup.value)),
        };
        tracing::debug!(kind = pickup.kind.display_name(), ?effect, "pickup consumed");
        effect
    }

    /// Consumes every active pickup the player currently overlaps.
    pub fn consume_overlapping(&mut self, player: &mut Player) -> Vec<(PickupId, PickupKind, PickupEffect)> {
        let player_box = player.entity.hitbox();
        let overlapping: Vec<PickupId> = self
            .pickups
            .iter()
            .filter(|p| p.is_active() && p.hitbox().overlaps(&player_box))
            .map(Pickup::id)
            .collect();

        overlapping
            .into_iter()
            .map(|id| {
                let kind = self
                    .pickups
                    .iter()
                    .find(|p| p.id() == id)
                    .map(|p| p.kind)
                    .unwrap_or(PickupKind::Health);
                (id, kind, self.consume(id, player))
            })
            .collect()
    }

    /// Drops pickups that are no longer active.
    pub fn purge_inactive(&mut self) {
        self.pickups.retain(Pickup::is_active);
    }

    /// Removes everything (room transitions).
    pub fn clear(&mut self) {
        self.pickups.clear();
    }
}

impl Default for PickupManager {
    fn default() -> Self {
        Self::new(5, 1800)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::PlayerTuning;
    use hivebreak_common::RoomId;

    fn player_at(x: f32, y: f32) -> Player {
        Player::new(Vec2::new(x, y), RoomId::new(0), &PlayerTuning::default())
    }

    fn points() -> Vec<Vec2> {
        vec![
            Vec2::new(100.0, 100.0),
            Vec2::new(300.0, 100.0),
            Vec2::new(500.0, 100.0),
        ]
    }

    #[test]
    fn test_spawn_and_cap() {
        let mut manager = PickupManager::new(2, 100);
        let mut rng = SpawnRng::new(5);
        let points = points();

        assert!(manager.try_spawn(PickupKind::Health, &points, &mut rng).is_some());
        assert!(manager.try_spawn(PickupKind::Ammo, &points, &mut rng).is_some());
        // Cap of two.
        assert!(manager.try_spawn(PickupKind::Armor, &points, &mut rng).is_none());
        assert_eq!(manager.active_count(), 2);
    }

    #[test]
    fn test_spawn_requires_free_point() {
        let mut manager = PickupManager::new(10, 100);
        let mut rng = SpawnRng::new(5);
        let single = vec![Vec2::new(100.0, 100.0)];

        assert!(manager.try_spawn(PickupKind::Health, &single, &mut rng).is_some());
        assert!(manager.try_spawn(PickupKind::Health, &single, &mut rng).is_none());
    }

    #[test]
    fn test_health_pickup_clamps_at_max() {
        let mut manager = PickupManager::default();
        let mut rng = SpawnRng::new(5);
        let mut player = player_at(100.0, 100.0);
        player.take_damage(13); // 90/100 after armor

        let id = manager
            .try_spawn(PickupKind::Health, &points()[..1], &mut rng)
            .expect("spawn");
        let effect = manager.consume(id, &mut player);

        // Value 20 at 90/100: only 10 applies.
        assert_eq!(effect, PickupEffect::Healed(10));
        assert_eq!(player.entity.health.current(), 100);
    }

    #[test]
    fn test_consume_is_idempotent() {
        let mut manager = PickupManager::default();
        let mut rng = SpawnRng::new(5);
        let mut player = player_at(100.0, 100.0);
        player.take_damage(50);

        let id = manager
            .try_spawn(PickupKind::Health, &points()[..1], &mut rng)
            .expect("spawn");
        let first = manager.consume(id, &mut player);
        assert_ne!(first, PickupEffect::None);

        let health = player.entity.health.current();
        let second = manager.consume(id, &mut player);
        assert_eq!(second, PickupEffect::None);
        assert_eq!(player.entity.health.current(), health);
    }

    #[test]
    fn test_consume_unknown_id_is_none() {
        let mut manager = PickupManager::default();
        let mut player = player_at(100.0, 100.0);
        assert_eq!(
            manager.consume(PickupId::new(999), &mut player),
            PickupEffect::None
        );
    }

    #[test]
    fn test_overlap_consumption() {
        let mut manager = PickupManager::default();
        let mut rng = SpawnRng::new(5);
        let mut player = player_at(100.0, 100.0);
        player.try_consume_round();

        manager
            .try_spawn(PickupKind::Ammo, &[Vec2::new(110.0, 100.0)], &mut rng)
            .expect("spawn");
        // A distant one stays untouched.
        manager
            .try_spawn(PickupKind::Ammo, &[Vec2::new(700.0, 100.0)], &mut rng)
            .expect("spawn");

        let consumed = manager.consume_overlapping(&mut player);
        assert_eq!(consumed.len(), 1);
        assert_eq!(consumed[0].1, PickupKind::Ammo);
        assert_eq!(manager.active_count(), 1);
    }

    #[test]
    fn test_expiry() {
        let mut manager = PickupManager::new(5, 3);
        let mut rng = SpawnRng::new(5);
        manager
            .try_spawn(PickupKind::Health, &points()[..1], &mut rng)
            .expect("spawn");

        manager.update();
        manager.update();
        assert_eq!(manager.active_count(), 1);
        manager.update();
        assert_eq!(manager.active_count(), 0);

        manager.purge_inactive();
        assert!(manager.pickups().is_empty());
    }

    #[test]
    fn test_ammo_pickup_respects_capacity() {
        let mut manager = PickupManager::default();
        let mut rng = SpawnRng::new(5);
        let mut player = player_at(100.0, 100.0);

        let id = manager
            .try_spawn(PickupKind::Ammo, &points()[..1], &mut rng)
            .expect("spawn");
        // Full magazine: nothing to add, but the pickup is still spent.
        let effect = manager.consume(id, &mut player);
        assert_eq!(effect, PickupEffect::AmmoRestored(0));
        assert_eq!(manager.active_count(), 0);
    }
}
