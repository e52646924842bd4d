//! # Hivebreak Sim
//!
//! The simulation core of Hivebreak, a 2D side-scrolling action game:
//! - Shared entity model (position, hitbox, health, faction, life state)
//! - Combat resolution: ranged fire, melee swings, projectile hits
//! - Enemy AI state machines parameterized by per-kind stat profiles
//! - Boss encounters with health-threshold phases and fixed ability rotations
//! - Progress-based enemy waves and pickup drops
//! - Rooms, doors, and atomic room transitions
//! - NPC dialogue
//! - The fixed-order frame update loop emitting per-tick snapshots
//!
//! The crate is headless and deterministic: all timers are tick counters, all
//! randomness flows from one seeded generator, and presentation consumes only
//! the immutable [`snapshot::Snapshot`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod ai;
pub mod assets;
pub mod boss;
pub mod combat;
pub mod config;
pub mod dialogue;
pub mod enemy;
pub mod entity;
pub mod events;
pub mod input;
pub mod npc;
pub mod physics;
pub mod pickup;
pub mod player;
pub mod room;
pub mod session;
pub mod snapshot;
pub mod spawn;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::ai::{AiState, AttackIntent, AttackKind};
    pub use crate::assets::{PlaceholderCatalog, SpriteCatalog, SpriteInfo, SpriteKey};
    pub use crate::boss::{BossAbility, BossPhase, BossState};
    pub use crate::combat::{CombatSystem, CombatTuning, FireOutcome, MeleeOutcome, Weapon};
    pub use crate::config::GameConfig;
    pub use crate::dialogue::{DialogueBox, DialogueLine, DialogueScript, LineKind};
    pub use crate::enemy::{Enemy, EnemyKind, StatProfile};
    pub use crate::entity::{Entity, Faction, Facing, Health, LifeState};
    pub use crate::events::{EventBus, GameEvent};
    pub use crate::input::{InputEvent, InputQueue, PlayerIntent, Vec2};
    pub use crate::npc::{Npc, NpcKind};
    pub use crate::physics::{Bounds, AABB};
    pub use crate::pickup::{Pickup, PickupEffect, PickupKind, PickupManager};
    pub use crate::player::{Player, PlayerTuning};
    pub use crate::room::{Door, Room, RoomManager};
    pub use crate::session::{GameSession, SessionPhase};
    pub use crate::snapshot::Snapshot;
    pub use crate::spawn::{SpawnRng, WaveDirector, WaveRule};
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_campaign_session_boots() {
        let mut session = GameSession::with_campaign(7).expect("session");
        let snapshot = session.tick();
        assert_eq!(snapshot.phase, SessionPhase::Running);
        assert!(!snapshot.enemies.is_empty());
    }

    #[test]
    fn test_config_round_trips_through_ron() {
        let config = GameConfig::campaign();
        let text = config.to_ron_string().expect("serialize");
        let restored = GameConfig::from_ron_str(&text).expect("parse");
        let mut session = GameSession::new(restored, 7).expect("session");
        session.tick();
    }

    #[test]
    fn test_bestiary_covers_boss_and_swarm() {
        let kinds = EnemyKind::all();
        assert!(kinds.iter().any(|k| k.is_boss()));
        assert!(kinds.iter().any(|k| !k.is_boss()));
    }
}
