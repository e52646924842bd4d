//! Rooms, doors, and the room/encounter orchestrator.
//!
//! The [`RoomManager`] owns the authoritative per-room rosters. A transition
//! happens at a single step of the frame pipeline and completes within that
//! tick; no partial transition state is ever observable.

use ahash::AHashMap;
use hivebreak_common::{EntityId, RoomId, RoomTopologyError};
use serde::Serialize;

use crate::enemy::{Enemy, EnemyKind};
use crate::input::Vec2;
use crate::npc::Npc;
use crate::physics::{Bounds, AABB};
use crate::player::Player;

/// Ticks a door stays inert after a transition, so the player is not bounced
/// straight back through the reverse door.
const DOOR_COOLDOWN: u32 = 60;

/// A transition trigger between rooms.
#[derive(Debug, Clone, Serialize)]
pub struct Door {
    trigger: AABB,
    target: RoomId,
    entry_point: Vec2,
    locked: bool,
    key: Option<String>,
    requires_clear: bool,
    cooldown_left: u32,
}

impl Door {
    /// Creates an unlocked, ungated door.
    ///
    /// `entry_point` is where the player appears in the target room.
    #[must_use]
    pub fn new(trigger: AABB, target: RoomId, entry_point: Vec2) -> Self {
        Self {
            trigger,
            target,
            entry_point,
            locked: false,
            key: None,
            requires_clear: false,
            cooldown_left: 0,
        }
    }

    /// Locks the door behind a named key.
    #[must_use]
    pub fn locked_with(mut self, key: impl Into<String>) -> Self {
        self.locked = true;
        self.key = Some(key.into());
        self
    }

    /// Gates the door on the room being cleared of enemies.
    #[must_use]
    pub fn gated(mut self) -> Self {
        self.requires_clear = true;
        self
    }

    /// Target room of the door.
    #[must_use]
    pub const fn target(&self) -> RoomId {
        self.target
    }

    /// Player entry position in the target room.
    #[must_use]
    pub const fn entry_point(&self) -> Vec2 {
        self.entry_point
    }

    /// Trigger area of the door.
    #[must_use]
    pub const fn trigger(&self) -> AABB {
        self.trigger
    }

    /// Whether the door is locked.
    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.locked
    }

    /// Whether the door requires the room to be cleared.
    #[must_use]
    pub const fn requires_clear(&self) -> bool {
        self.requires_clear
    }

    /// Unlocks with the given key. A door locked without a named key opens to
    /// any key; a named lock needs the matching one.
    pub fn unlock(&mut self, key: Option<&str>) -> bool {
        if !self.locked {
            return true;
        }
        let matches = match (self.key.as_deref(), key) {
            (None, _) => true,
            (Some(required), Some(offered)) => required == offered,
            (Some(_), None) => false,
        };
        if matches {
            self.locked = false;
        }
        matches
    }

    /// Whether the door fires for the given player box right now.
    #[must_use]
    pub fn can_activate(&self, player_box: &AABB, room_cleared: bool) -> bool {
        if self.locked || self.cooldown_left > 0 {
            return false;
        }
        if self.requires_clear && !room_cleared {
            return false;
        }
        self.trigger.overlaps(player_box)
    }

    /// Arms the re-activation cooldown.
    pub fn arm_cooldown(&mut self) {
        self.cooldown_left = DOOR_COOLDOWN;
    }

    /// Advances the cooldown by one tick.
    pub fn tick(&mut self) {
        self.cooldown_left = self.cooldown_left.saturating_sub(1);
    }
}

/// A bounded area owning a subset of entities and its door triggers.
#[derive(Debug, Serialize)]
pub struct Room {
    id: RoomId,
    name: String,
    background: String,
    bounds: Bounds,
    spawn_points: Vec<Vec2>,
    /// Enemy roster, in insertion order
    pub enemies: Vec<Enemy>,
    /// Resident NPCs; these persist across transitions
    pub npcs: Vec<Npc>,
    doors: Vec<Door>,
    visited: bool,
    objective: String,
}

impl Room {
    /// Creates an empty room.
    #[must_use]
    pub fn new(
        id: RoomId,
        name: impl Into<String>,
        background: impl Into<String>,
        bounds: Bounds,
        objective: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            background: background.into(),
            bounds,
            spawn_points: Vec::new(),
            enemies: Vec::new(),
            npcs: Vec::new(),
            doors: Vec::new(),
            visited: false,
            objective: objective.into(),
        }
    }

    /// Room identity.
    #[must_use]
    pub const fn id(&self) -> RoomId {
        self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Background asset key.
    #[must_use]
    pub fn background(&self) -> &str {
        &self.background
    }

    /// Playable bounds.
    #[must_use]
    pub const fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Objective text installed when the player enters.
    #[must_use]
    pub fn objective(&self) -> &str {
        &self.objective
    }

    /// Whether the player has entered this room before.
    #[must_use]
    pub const fn is_visited(&self) -> bool {
        self.visited
    }

    /// Marks the room visited (startup, for the room the player begins in).
    pub fn mark_visited(&mut self) {
        self.visited = true;
    }

    /// Pickup/entity spawn points.
    #[must_use]
    pub fn spawn_points(&self) -> &[Vec2] {
        &self.spawn_points
    }

    /// Adds a spawn point.
    pub fn add_spawn_point(&mut self, point: Vec2) {
        self.spawn_points.push(point);
    }

    /// Adds a door.
    pub fn add_door(&mut self, door: Door) {
        self.doors.push(door);
    }

    /// The room's doors.
    #[must_use]
    pub fn doors(&self) -> &[Door] {
        &self.doors
    }

    /// Mutable access to the room's doors (for unlocking).
    pub fn doors_mut(&mut self) -> &mut [Door] {
        &mut self.doors
    }

    /// Number of living enemies.
    #[must_use]
    pub fn alive_enemies(&self) -> usize {
        self.enemies.iter().filter(|e| e.is_alive()).count()
    }

    /// Whether every enemy in the room is dead (or none ever spawned).
    #[must_use]
    pub fn is_cleared(&self) -> bool {
        self.enemies.iter().all(|e| !e.is_alive())
    }

    /// Removes dead enemies from the roster, returning who fell.
    pub fn purge_dead(&mut self) -> Vec<(EntityId, EnemyKind)> {
        let mut killed = Vec::new();
        self.enemies.retain(|enemy| {
            if enemy.is_alive() {
                true
            } else {
                killed.push((enemy.entity.id(), enemy.kind()));
                false
            }
        });
        killed
    }

    /// Ticks door cooldowns.
    pub fn tick_doors(&mut self) {
        for door in &mut self.doors {
            door.tick();
        }
    }
}

/// A transition the orchestrator is ready to perform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionRequest {
    /// Room to enter
    pub target: RoomId,
    /// Player position in the target room
    pub entry_point: Vec2,
}

/// Owns the room registry, the current-room pointer, and transitions.
#[derive(Debug, Default)]
pub struct RoomManager {
    rooms: AHashMap<RoomId, Room>,
    current: Option<RoomId>,
}

impl RoomManager {
    /// Creates an empty manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a room. The first room registered becomes current.
    pub fn add_room(&mut self, room: Room) -> Result<(), RoomTopologyError> {
        let id = room.id();
        if self.rooms.contains_key(&id) {
            return Err(RoomTopologyError::AlreadyRegistered(id));
        }
        self.rooms.insert(id, room);
        if self.current.is_none() {
            self.current = Some(id);
        }
        Ok(())
    }

    /// Verifies every door targets a registered room.
    pub fn validate(&self) -> Result<(), RoomTopologyError> {
        for room in self.rooms.values() {
            for door in room.doors() {
                if !self.rooms.contains_key(&door.target()) {
                    return Err(RoomTopologyError::DanglingDoor {
                        from: room.id(),
                        target: door.target(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Number of registered rooms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Whether no room is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Looks up a room by id.
    #[must_use]
    pub fn get(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(&id)
    }

    /// The current room.
    pub fn current(&self) -> Result<&Room, RoomTopologyError> {
        let id = self.current.ok_or(RoomTopologyError::NoCurrentRoom)?;
        self.rooms.get(&id).ok_or(RoomTopologyError::NotFound(id))
    }

    /// The current room, mutably.
    pub fn current_mut(&mut self) -> Result<&mut Room, RoomTopologyError> {
        let id = self.current.ok_or(RoomTopologyError::NoCurrentRoom)?;
        self.rooms
            .get_mut(&id)
            .ok_or(RoomTopologyError::NotFound(id))
    }

    /// Forces the current-room pointer (startup only).
    pub fn set_current(&mut self, id: RoomId) -> Result<(), RoomTopologyError> {
        if !self.rooms.contains_key(&id) {
            return Err(RoomTopologyError::NotFound(id));
        }
        self.current = Some(id);
        Ok(())
    }

    /// Returns the transition to perform if the player overlaps an eligible
    /// door of the current room.
    ///
    /// Doors are checked in definition order; the first eligible door wins.
    #[must_use]
    pub fn check_transition(&self, player_box: &AABB) -> Option<TransitionRequest> {
        let room = self.current().ok()?;
        let cleared = room.is_cleared();
        room.doors()
            .iter()
            .find(|door| door.can_activate(player_box, cleared))
            .map(|door| TransitionRequest {
                target: door.target(),
                entry_point: door.entry_point(),
            })
    }

    /// Performs a transition atomically: moves the player to the target's
    /// entry point, marks the target visited, and arms its door cooldowns.
    ///
    /// The caller (the frame loop) is responsible for purging session-owned
    /// transients (projectiles, pickups) in the same tick. NPCs and surviving
    /// enemies stay with their rooms.
    pub fn transition(
        &mut self,
        request: TransitionRequest,
        player: &mut Player,
    ) -> Result<&Room, RoomTopologyError> {
        if !self.rooms.contains_key(&request.target) {
            return Err(RoomTopologyError::NotFound(request.target));
        }

        self.current = Some(request.target);
        let room = self
            .rooms
            .get_mut(&request.target)
            .ok_or(RoomTopologyError::NotFound(request.target))?;

        room.visited = true;
        for door in &mut room.doors {
            door.arm_cooldown();
        }

        player.entity.set_room(request.target);
        player.entity.pos = room.bounds.clamp_center(
            request.entry_point,
            player.entity.width() / 2.0,
            player.entity.height() / 2.0,
        );

        tracing::info!(room = %room.name, "room entered");
        Ok(&self.rooms[&request.target])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::PlayerTuning;

    const HALL: RoomId = RoomId::new(0);
    const CHAMBER: RoomId = RoomId::new(1);

    fn player() -> Player {
        Player::new(Vec2::new(400.0, 300.0), HALL, &PlayerTuning::default())
    }

    fn hall_with_door() -> Room {
        let mut hall = Room::new(HALL, "Main Hall", "gothic_hall", Bounds::default(), "Explore");
        hall.add_door(Door::new(
            AABB::new(750.0, 250.0, 800.0, 350.0),
            CHAMBER,
            Vec2::new(80.0, 300.0),
        ));
        hall
    }

    fn chamber() -> Room {
        Room::new(CHAMBER, "Side Chamber", "gothic_hall", Bounds::default(), "Clear it")
    }

    fn manager() -> RoomManager {
        let mut m = RoomManager::new();
        m.add_room(hall_with_door()).expect("register hall");
        m.add_room(chamber()).expect("register chamber");
        m
    }

    fn boxed_at(x: f32, y: f32) -> AABB {
        AABB::from_center(Vec2::new(x, y), 25.0, 35.0)
    }

    #[test]
    fn test_duplicate_room_rejected() {
        let mut m = manager();
        assert!(matches!(
            m.add_room(hall_with_door()),
            Err(RoomTopologyError::AlreadyRegistered(_))
        ));
    }

    #[test]
    fn test_validate_catches_dangling_door() {
        let mut m = RoomManager::new();
        m.add_room(hall_with_door()).expect("register hall");
        assert!(matches!(
            m.validate(),
            Err(RoomTopologyError::DanglingDoor { .. })
        ));

        let m = manager();
        assert!(m.validate().is_ok());
    }

    #[test]
    fn test_first_room_becomes_current() {
        let m = manager();
        assert_eq!(m.current().expect("current").id(), HALL);
    }

    #[test]
    fn test_no_transition_away_from_door() {
        let m = manager();
        assert!(m.check_transition(&boxed_at(400.0, 300.0)).is_none());
    }

    #[test]
    fn test_transition_on_door_overlap() {
        let mut m = manager();
        let mut p = player();

        let request = m
            .check_transition(&boxed_at(770.0, 300.0))
            .expect("door overlap");
        assert_eq!(request.target, CHAMBER);

        m.transition(request, &mut p).expect("transition");
        assert_eq!(m.current().expect("current").id(), CHAMBER);
        assert_eq!(p.entity.room(), CHAMBER);
        assert_eq!(p.entity.pos, Vec2::new(80.0, 300.0));
        assert!(m.get(CHAMBER).expect("chamber").is_visited());
    }

    #[test]
    fn test_gated_door_needs_cleared_room() {
        let mut m = RoomManager::new();
        let mut hall = hall_with_door();
        hall.doors_mut()[0] = Door::new(
            AABB::new(750.0, 250.0, 800.0, 350.0),
            CHAMBER,
            Vec2::new(80.0, 300.0),
        )
        .gated();
        hall.enemies.push(Enemy::new(
            EnemyKind::Gaunt,
            Vec2::new(200.0, 200.0),
            HALL,
        ));
        m.add_room(hall).expect("register hall");
        m.add_room(chamber()).expect("register chamber");

        // Living enemy blocks the gated door.
        assert!(m.check_transition(&boxed_at(770.0, 300.0)).is_none());

        // Kill it: door opens.
        m.current_mut().expect("current").enemies[0]
            .entity
            .apply_damage(1000);
        assert!(m.check_transition(&boxed_at(770.0, 300.0)).is_some());
    }

    #[test]
    fn test_locked_door_blocks_until_unlocked() {
        let mut m = RoomManager::new();
        let mut hall = hall_with_door();
        hall.doors_mut()[0] = Door::new(
            AABB::new(750.0, 250.0, 800.0, 350.0),
            CHAMBER,
            Vec2::new(80.0, 300.0),
        )
        .locked_with("reliquary_key");
        m.add_room(hall).expect("register hall");
        m.add_room(chamber()).expect("register chamber");

        assert!(m.check_transition(&boxed_at(770.0, 300.0)).is_none());

        // Wrong key fails, right key opens.
        let door = &mut m.current_mut().expect("current").doors_mut()[0];
        assert!(!door.unlock(Some("rusty_key")));
        assert!(door.unlock(Some("reliquary_key")));
        assert!(m.check_transition(&boxed_at(770.0, 300.0)).is_some());
    }

    #[test]
    fn test_transition_to_unknown_room_is_error() {
        let mut m = manager();
        let mut p = player();
        let request = TransitionRequest {
            target: RoomId::new(99),
            entry_point: Vec2::ZERO,
        };
        assert!(matches!(
            m.transition(request, &mut p),
            Err(RoomTopologyError::NotFound(_))
        ));
    }

    #[test]
    fn test_entered_room_doors_on_cooldown() {
        let mut m = RoomManager::new();
        let mut hall = hall_with_door();
        hall.add_spawn_point(Vec2::new(100.0, 100.0));
        let mut side = chamber();
        // Reverse door right where the player enters.
        side.add_door(Door::new(
            AABB::new(0.0, 250.0, 100.0, 350.0),
            HALL,
            Vec2::new(700.0, 300.0),
        ));
        m.add_room(hall).expect("register hall");
        m.add_room(side).expect("register chamber");

        let mut p = player();
        let request = m
            .check_transition(&boxed_at(770.0, 300.0))
            .expect("door overlap");
        m.transition(request, &mut p).expect("transition");

        // Standing on the reverse door, but its cooldown holds it shut.
        assert!(m.check_transition(&p.entity.hitbox()).is_none());

        for _ in 0..60 {
            m.current_mut().expect("current").tick_doors();
        }
        assert!(m.check_transition(&p.entity.hitbox()).is_some());
    }

    #[test]
    fn test_purge_dead_reports_kinds() {
        let mut room = hall_with_door();
        room.enemies.push(Enemy::new(EnemyKind::Gaunt, Vec2::ZERO, HALL));
        room.enemies.push(Enemy::new(EnemyKind::Warrior, Vec2::ZERO, HALL));
        room.enemies[0].entity.apply_damage(1000);

        let killed = room.purge_dead();
        assert_eq!(killed.len(), 1);
        assert_eq!(killed[0].1, EnemyKind::Gaunt);
        assert_eq!(room.enemies.len(), 1);
        assert!(!room.is_cleared());
    }

    #[test]
    fn test_empty_room_counts_as_cleared() {
        let room = chamber();
        assert!(room.is_cleared());
    }
}
