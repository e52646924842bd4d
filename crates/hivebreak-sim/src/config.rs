//! The configuration surface: tunables and room definitions, loaded once at
//! startup and immutable for the session.

use serde::{Deserialize, Serialize};

use hivebreak_common::{RoomId, SimError};

use crate::combat::CombatTuning;
use crate::enemy::EnemyKind;
use crate::input::Vec2;
use crate::npc::NpcKind;
use crate::physics::{Bounds, AABB};
use crate::player::PlayerTuning;
use crate::spawn::{WaveDirector, WaveRule};

/// Definition of a door between rooms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoorConfig {
    /// Trigger area in the owning room
    pub trigger: AABB,
    /// Target room
    pub target: RoomId,
    /// Player position in the target room after the transition
    pub entry_point: Vec2,
    /// Key name if the door starts locked
    pub locked_key: Option<String>,
    /// Whether the door requires the room cleared of enemies
    pub requires_clear: bool,
}

/// Definition of a resident NPC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcConfig {
    /// Kind of NPC
    pub kind: NpcKind,
    /// Display name
    pub name: String,
    /// Position in the room
    pub pos: Vec2,
    /// Quest briefing delivered on first interaction, if any
    pub quest: Option<String>,
}

/// An enemy present when the session starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemySeed {
    /// Kind of enemy
    pub kind: EnemyKind,
    /// Position in the room
    pub pos: Vec2,
}

/// Definition of one room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Room identity
    pub id: RoomId,
    /// Display name
    pub name: String,
    /// Background asset key
    pub background: String,
    /// Objective text installed on entry
    pub objective: String,
    /// Pickup spawn points
    pub spawn_points: Vec<Vec2>,
    /// Resident NPCs
    pub npcs: Vec<NpcConfig>,
    /// Initial enemies
    pub enemies: Vec<EnemySeed>,
    /// Doors to adjacent rooms
    pub doors: Vec<DoorConfig>,
}

/// Wave pacing tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveTuning {
    /// The wave table
    pub rules: Vec<WaveRule>,
    /// Kills between reinforcement waves
    pub spawn_every_kills: u32,
    /// Kills between pickup drops
    pub pickup_every_kills: u32,
    /// Live-enemy cap per room
    pub max_alive_per_room: usize,
    /// Wave size range
    pub batch_size: (u32, u32),
}

impl Default for WaveTuning {
    fn default() -> Self {
        Self {
            rules: WaveDirector::default_rules(),
            spawn_every_kills: 2,
            pickup_every_kills: 5,
            max_alive_per_room: 5,
            batch_size: (1, 3),
        }
    }
}

/// Pickup lifecycle tunables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickupTuning {
    /// Concurrent active pickup cap
    pub max_active: usize,
    /// Ticks before an unconsumed pickup expires
    pub lifetime_ticks: u32,
}

impl Default for PickupTuning {
    fn default() -> Self {
        Self {
            max_active: 5,
            lifetime_ticks: 1800,
        }
    }
}

/// Complete startup configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Playable bounds shared by all rooms
    pub bounds: Bounds,
    /// Global sprite/hitbox scale factor
    pub sprite_scale: f32,
    /// Simulation ticks per second (informational; all timers are in ticks)
    pub tick_rate: u32,
    /// Player tuning
    pub player: PlayerTuning,
    /// Combat tuning
    pub combat: CombatTuning,
    /// Wave pacing
    pub waves: WaveTuning,
    /// Pickup lifecycle
    pub pickups: PickupTuning,
    /// Kills required to win
    pub victory_kills: u32,
    /// Room the session starts in
    pub start_room: RoomId,
    /// Player spawn position in the start room
    pub player_spawn: Vec2,
    /// All rooms
    pub rooms: Vec<RoomConfig>,
}

impl GameConfig {
    /// The built-in campaign: a gothic hall, a side chamber, an armory, and a
    /// gated reliquary boss room.
    #[must_use]
    pub fn campaign() -> Self {
        let hall = RoomId::new(0);
        let chamber = RoomId::new(1);
        let armory = RoomId::new(2);
        let reliquary = RoomId::new(3);

        Self {
            bounds: Bounds::new(800.0, 600.0),
            sprite_scale: 1.0,
            tick_rate: 60,
            player: PlayerTuning::default(),
            combat: CombatTuning::default(),
            waves: WaveTuning::default(),
            pickups: PickupTuning::default(),
            victory_kills: 20,
            start_room: hall,
            player_spawn: Vec2::new(400.0, 300.0),
            rooms: vec![
                RoomConfig {
                    id: hall,
                    name: "Main Hall".into(),
                    background: "gothic_hall".into(),
                    objective: "Explore the gothic hall and eliminate the hive threat".into(),
                    spawn_points: vec![
                        Vec2::new(150.0, 150.0),
                        Vec2::new(650.0, 450.0),
                        Vec2::new(400.0, 200.0),
                        Vec2::new(200.0, 400.0),
                    ],
                    npcs: vec![
                        NpcConfig {
                            kind: NpcKind::Soldier,
                            name: "Sergeant Tarkus".into(),
                            pos: Vec2::new(100.0, 300.0),
                            quest: None,
                        },
                        NpcConfig {
                            kind: NpcKind::TechPriest,
                            name: "Magos Drakk".into(),
                            pos: Vec2::new(700.0, 300.0),
                            quest: None,
                        },
                    ],
                    enemies: vec![
                        EnemySeed {
                            kind: EnemyKind::Genestealer,
                            pos: Vec2::new(600.0, 100.0),
                        },
                        EnemySeed {
                            kind: EnemyKind::Warrior,
                            pos: Vec2::new(200.0, 500.0),
                        },
                    ],
                    doors: vec![
                        DoorConfig {
                            trigger: AABB::new(750.0, 250.0, 800.0, 350.0),
                            target: chamber,
                            entry_point: Vec2::new(80.0, 300.0),
                            locked_key: None,
                            requires_clear: false,
                        },
                        DoorConfig {
                            trigger: AABB::new(0.0, 250.0, 50.0, 350.0),
                            target: armory,
                            entry_point: Vec2::new(720.0, 300.0),
                            locked_key: None,
                            requires_clear: false,
                        },
                    ],
                },
                RoomConfig {
                    id: chamber,
                    name: "Side Chamber".into(),
                    background: "gothic_hall".into(),
                    objective: "Clear the side chamber of the infestation".into(),
                    spawn_points: vec![
                        Vec2::new(200.0, 150.0),
                        Vec2::new(600.0, 450.0),
                        Vec2::new(400.0, 500.0),
                    ],
                    npcs: Vec::new(),
                    enemies: vec![
                        EnemySeed {
                            kind: EnemyKind::Carnifex,
                            pos: Vec2::new(400.0, 300.0),
                        },
                        EnemySeed {
                            kind: EnemyKind::Gaunt,
                            pos: Vec2::new(300.0, 200.0),
                        },
                        EnemySeed {
                            kind: EnemyKind::Gaunt,
                            pos: Vec2::new(500.0, 200.0),
                        },
                    ],
                    doors: vec![
                        DoorConfig {
                            trigger: AABB::new(0.0, 250.0, 50.0, 350.0),
                            target: hall,
                            entry_point: Vec2::new(700.0, 300.0),
                            locked_key: None,
                            requires_clear: false,
                        },
                        DoorConfig {
                            trigger: AABB::new(750.0, 250.0, 800.0, 350.0),
                            target: reliquary,
                            entry_point: Vec2::new(80.0, 300.0),
                            locked_key: None,
                            requires_clear: true,
                        },
                    ],
                },
                RoomConfig {
                    id: armory,
                    name: "Armory".into(),
                    background: "gothic_hall".into(),
                    objective: "Speak with the Commissar in the armory".into(),
                    spawn_points: vec![Vec2::new(200.0, 200.0), Vec2::new(600.0, 400.0)],
                    npcs: vec![NpcConfig {
                        kind: NpcKind::Commissar,
                        name: "Commissar Yarrick".into(),
                        pos: Vec2::new(400.0, 300.0),
                        quest: Some(
                            "Drive the hive from the side chamber, then bring the fight \
                             to whatever commands it."
                                .into(),
                        ),
                    }],
                    enemies: Vec::new(),
                    doors: vec![DoorConfig {
                        trigger: AABB::new(750.0, 250.0, 800.0, 350.0),
                        target: hall,
                        entry_point: Vec2::new(80.0, 300.0),
                        locked_key: None,
                        requires_clear: false,
                    }],
                },
                RoomConfig {
                    id: reliquary,
                    name: "Reliquary".into(),
                    background: "gothic_hall".into(),
                    objective: "Slay the Hive Tyrant in the reliquary".into(),
                    spawn_points: vec![Vec2::new(200.0, 150.0), Vec2::new(600.0, 450.0)],
                    npcs: Vec::new(),
                    enemies: vec![EnemySeed {
                        kind: EnemyKind::HiveTyrant,
                        pos: Vec2::new(400.0, 300.0),
                    }],
                    doors: vec![DoorConfig {
                        trigger: AABB::new(0.0, 250.0, 50.0, 350.0),
                        target: chamber,
                        entry_point: Vec2::new(700.0, 300.0),
                        locked_key: None,
                        requires_clear: false,
                    }],
                },
            ],
        }
    }

    /// Parses a configuration from RON text and validates it.
    pub fn from_ron_str(text: &str) -> Result<Self, SimError> {
        let config: Self =
            ron::from_str(text).map_err(|e| SimError::Config(format!("parse error: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration file from disk.
    pub fn load(path: &std::path::Path) -> Result<Self, SimError> {
        let text = std::fs::read_to_string(path)?;
        tracing::info!(path = %path.display(), "configuration loaded");
        Self::from_ron_str(&text)
    }

    /// Serializes the configuration to RON text.
    pub fn to_ron_string(&self) -> Result<String, SimError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| SimError::Config(format!("serialize error: {e}")))
    }

    /// Checks structural invariants: at least one room, a valid start room,
    /// no dangling door targets, sane tunables.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.rooms.is_empty() {
            return Err(SimError::Config("no rooms defined".into()));
        }
        if self.sprite_scale <= 0.0 {
            return Err(SimError::Config("sprite_scale must be positive".into()));
        }
        if self.victory_kills == 0 {
            return Err(SimError::Config("victory_kills must be positive".into()));
        }
        let ids: Vec<RoomId> = self.rooms.iter().map(|r| r.id).collect();
        if !ids.contains(&self.start_room) {
            return Err(SimError::Config(format!(
                "start room {:?} is not defined",
                self.start_room
            )));
        }
        for room in &self.rooms {
            if ids.iter().filter(|id| **id == room.id).count() > 1 {
                return Err(SimError::Config(format!(
                    "duplicate room id {:?}",
                    room.id
                )));
            }
            for door in &room.doors {
                if !ids.contains(&door.target) {
                    return Err(SimError::Config(format!(
                        "door in {:?} targets unknown room {:?}",
                        room.id, door.target
                    )));
                }
            }
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::campaign()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_campaign_is_valid() {
        let config = GameConfig::campaign();
        assert!(config.validate().is_ok());
        assert_eq!(config.rooms.len(), 4);
    }

    #[test]
    fn test_campaign_has_boss_room_behind_gate() {
        let config = GameConfig::campaign();
        let chamber = &config.rooms[1];
        assert!(chamber.doors.iter().any(|d| d.requires_clear));

        let reliquary = &config.rooms[3];
        assert!(reliquary.enemies.iter().any(|e| e.kind.is_boss()));
    }

    #[test]
    fn test_ron_round_trip() {
        let config = GameConfig::campaign();
        let text = config.to_ron_string().expect("serialize");
        let parsed = GameConfig::from_ron_str(&text).expect("parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_invalid_ron_is_config_error() {
        let result = GameConfig::from_ron_str("not ron at all {{{");
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_empty_rooms() {
        let mut config = GameConfig::campaign();
        config.rooms.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_start_room() {
        let mut config = GameConfig::campaign();
        config.start_room = RoomId::new(99);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_dangling_door() {
        let mut config = GameConfig::campaign();
        config.rooms[0].doors[0].target = RoomId::new(99);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_duplicate_room_ids() {
        let mut config = GameConfig::campaign();
        let duplicate = config.rooms[0].clone();
        config.rooms.push(duplicate);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_scale() {
        let mut config = GameConfig::campaign();
        config.sprite_scale = 0.0;
        assert!(config.validate().is_err());
    }
}
