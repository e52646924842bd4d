//! The immutable per-tick snapshot consumed by presentation layers.
//!
//! Views are plain data copied out of the simulation at the end of a tick;
//! the renderer and HUD read them and write nothing back.

use hivebreak_common::{EntityId, PickupId, ProjectileId, RoomId};
use serde::Serialize;

use crate::ai::AiState;
use crate::combat::Weapon;
use crate::dialogue::LineKind;
use crate::enemy::EnemyKind;
use crate::entity::{Faction, Facing};
use crate::input::Vec2;
use crate::npc::NpcKind;
use crate::pickup::PickupKind;
use crate::session::SessionPhase;

/// The player as presentation sees it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    /// Position of the hitbox center
    pub pos: Vec2,
    /// Hitbox width
    pub width: f32,
    /// Hitbox height
    pub height: f32,
    /// Facing direction
    pub facing: Facing,
    /// Current health
    pub health: i32,
    /// Maximum health
    pub max_health: i32,
    /// Current armor
    pub armor: i32,
    /// Selected weapon
    pub weapon: Weapon,
    /// Rounds loaded in the selected weapon
    pub ammo: u32,
    /// Magazine capacity of the selected weapon
    pub capacity: u32,
    /// Whether a reload is in progress
    pub reloading: bool,
}

/// One enemy as presentation sees it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnemyView {
    /// Entity identity
    pub id: EntityId,
    /// Kind of enemy
    pub kind: EnemyKind,
    /// Position of the hitbox center
    pub pos: Vec2,
    /// Hitbox width
    pub width: f32,
    /// Hitbox height
    pub height: f32,
    /// Facing direction
    pub facing: Facing,
    /// Current health
    pub health: i32,
    /// Maximum health
    pub max_health: i32,
    /// AI state
    pub ai: AiState,
    /// Whether the enemy is concealed
    pub stealthed: bool,
    /// Active boss phase name, for boss kinds
    pub boss_phase: Option<String>,
}

/// One projectile as presentation sees it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectileView {
    /// Projectile identity
    pub id: ProjectileId,
    /// Owning faction
    pub faction: Faction,
    /// Position of the center
    pub pos: Vec2,
    /// Velocity in units per tick
    pub vel: Vec2,
    /// Collision radius
    pub radius: f32,
}

/// One pickup as presentation sees it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PickupView {
    /// Pickup identity
    pub id: PickupId,
    /// Kind of pickup
    pub kind: PickupKind,
    /// Position of the center
    pub pos: Vec2,
    /// Value applied on consumption
    pub value: i32,
}

/// One NPC as presentation sees it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NpcView {
    /// Entity identity
    pub id: EntityId,
    /// Kind of NPC
    pub kind: NpcKind,
    /// Display name
    pub name: String,
    /// Position of the hitbox center
    pub pos: Vec2,
    /// Whether the interaction prompt should show
    pub can_interact: bool,
    /// Whether an undelivered quest marker should show
    pub quest_pending: bool,
}

/// The open dialogue line, if any.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DialogueView {
    /// Speaker name
    pub speaker: String,
    /// Line text
    pub text: String,
    /// Kind of line
    pub kind: LineKind,
}

/// Boss health bar contents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BossView {
    /// Boss display name
    pub name: String,
    /// Current health
    pub health: i32,
    /// Maximum health
    pub max_health: i32,
    /// Active phase name
    pub phase: String,
}

/// HUD contents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudView {
    /// Running kill total
    pub kills: u32,
    /// Kills needed for victory
    pub victory_kills: u32,
    /// Active objective text
    pub objective: String,
    /// Current room display name
    pub room_name: String,
    /// Open dialogue, if any
    pub dialogue: Option<DialogueView>,
    /// Boss bar, when a boss is alive in the room
    pub boss: Option<BossView>,
}

/// An immutable copy of the simulation state for one tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    /// Tick this snapshot was taken at
    pub tick: u64,
    /// Session phase
    pub phase: SessionPhase,
    /// Current room identity
    pub room: RoomId,
    /// The player
    pub player: PlayerView,
    /// Enemies in the current room, roster order
    pub enemies: Vec<EnemyView>,
    /// Live projectiles, id order
    pub projectiles: Vec<ProjectileView>,
    /// Active pickups
    pub pickups: Vec<PickupView>,
    /// NPCs in the current room
    pub npcs: Vec<NpcView>,
    /// HUD contents
    pub hud: HudView,
}
