//! The game session and its fixed-order frame update loop.
//!
//! One [`GameSession::tick`] runs to completion before the next begins; the
//! session is the sole writer of simulation state within a tick. The step
//! order is a contract (input, AI, combat, pickups, transition, purge/spawn,
//! snapshot): pickups consumed in the same tick as a room transition still
//! register before the transition purges room state.

use serde::Serialize;

use hivebreak_common::SimError;

use crate::ai;
use crate::assets::{PlaceholderCatalog, SpriteCatalog, SpriteKey};
use crate::combat::{CombatSystem, FireOutcome, HitTarget, MeleeOutcome};
use crate::config::GameConfig;
use crate::dialogue::DialogueBox;
use crate::enemy::Enemy;
use crate::events::{EventBus, GameEvent};
use crate::input::{InputEvent, InputQueue, PlayerIntent};
use crate::npc::Npc;
use crate::pickup::{PickupEffect, PickupManager};
use crate::player::Player;
use crate::room::{Door, Room, RoomManager};
use crate::snapshot::{
    BossView, DialogueView, EnemyView, HudView, NpcView, PickupView, PlayerView, ProjectileView,
    Snapshot,
};
use crate::spawn::{SpawnRng, WaveDirector};

/// Phase of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SessionPhase {
    /// The world is simulating
    Running,
    /// Frozen by the player
    Paused,
    /// The player died
    GameOver,
    /// The kill goal was reached
    Victory,
}

impl SessionPhase {
    /// Whether world updates should run.
    #[must_use]
    pub const fn should_update_world(self) -> bool {
        matches!(self, Self::Running)
    }

    /// Whether the session has ended.
    #[must_use]
    pub const fn is_over(self) -> bool {
        matches!(self, Self::GameOver | Self::Victory)
    }
}

/// The authoritative game session.
#[derive(Debug)]
pub struct GameSession {
    config: GameConfig,
    catalog: PlaceholderCatalog,
    phase: SessionPhase,
    ticks: u64,
    rng: SpawnRng,
    input: InputQueue,
    player: Player,
    rooms: RoomManager,
    combat: CombatSystem,
    pickups: PickupManager,
    waves: WaveDirector,
    dialogue: DialogueBox,
    events: EventBus,
    kills: u32,
    quit_requested: bool,
    fullscreen_requested: bool,
}

impl GameSession {
    /// Builds a session from a validated configuration and a world seed.
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, SimError> {
        config.validate()?;
        let catalog = PlaceholderCatalog::new(config.sprite_scale);

        let mut rooms = RoomManager::new();
        for room_config in &config.rooms {
            let mut room = Room::new(
                room_config.id,
                room_config.name.clone(),
                room_config.background.clone(),
                config.bounds,
                room_config.objective.clone(),
            );
            for point in &room_config.spawn_points {
                room.add_spawn_point(*point);
            }
            for door_config in &room_config.doors {
                let mut door = Door::new(
                    door_config.trigger,
                    door_config.target,
                    door_config.entry_point,
                );
                if let Some(key) = &door_config.locked_key {
                    door = door.locked_with(key.clone());
                }
                if door_config.requires_clear {
                    door = door.gated();
                }
                room.add_door(door);
            }
            for npc_config in &room_config.npcs {
                let mut npc = Npc::new(
                    npc_config.kind,
                    npc_config.name.clone(),
                    npc_config.pos,
                    room_config.id,
                );
                if let Some(quest) = &npc_config.quest {
                    npc = npc.with_quest(quest.clone());
                }
                let info = catalog.sprite(SpriteKey::Npc(npc_config.kind));
                npc.entity.set_size(info.width, info.height);
                room.npcs.push(npc);
            }
            for seed_config in &room_config.enemies {
                let info = catalog.sprite(SpriteKey::Enemy(seed_config.kind));
                room.enemies.push(Enemy::with_size(
                    seed_config.kind,
                    seed_config.pos,
                    room_config.id,
                    info.width,
                    info.height,
                ));
            }
            rooms.add_room(room)?;
        }
        rooms.validate()?;
        rooms.set_current(config.start_room)?;
        rooms.current_mut()?.mark_visited();

        let mut player = Player::new(config.player_spawn, config.start_room, &config.player);
        let info = catalog.sprite(SpriteKey::Player);
        player.entity.set_size(info.width, info.height);

        let combat = CombatSystem::new(config.combat.clone());
        let pickups = PickupManager::new(config.pickups.max_active, config.pickups.lifetime_ticks);
        let waves = WaveDirector::new(
            config.waves.rules.clone(),
            config.waves.spawn_every_kills,
            config.waves.pickup_every_kills,
            config.waves.max_alive_per_room,
            config.waves.batch_size,
        );

        let events = EventBus::default();
        events.publish(GameEvent::RoomEntered {
            room: config.start_room,
        });
        tracing::info!(seed, rooms = config.rooms.len(), "session created");

        Ok(Self {
            config,
            catalog,
            phase: SessionPhase::Running,
            ticks: 0,
            rng: SpawnRng::new(seed),
            input: InputQueue::new(),
            player,
            rooms,
            combat,
            pickups,
            waves,
            dialogue: DialogueBox::new(),
            events,
            kills: 0,
            quit_requested: false,
            fullscreen_requested: false,
        })
    }

    /// Builds a session on the built-in campaign.
    pub fn with_campaign(seed: u64) -> Result<Self, SimError> {
        Self::new(GameConfig::campaign(), seed)
    }

    /// Current session phase.
    #[must_use]
    pub const fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Ticks elapsed.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Running kill total.
    #[must_use]
    pub const fn kills(&self) -> u32 {
        self.kills
    }

    /// The player.
    #[must_use]
    pub const fn player(&self) -> &Player {
        &self.player
    }

    /// The feedback event bus; the shell drains it once per frame.
    #[must_use]
    pub const fn events(&self) -> &EventBus {
        &self.events
    }

    /// The configuration in effect.
    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Whether the player asked to quit.
    #[must_use]
    pub const fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Takes a pending fullscreen-toggle request, if any.
    pub fn take_fullscreen_request(&mut self) -> bool {
        std::mem::take(&mut self.fullscreen_requested)
    }

    /// Enqueues an input event for the next tick.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Runs one simulation tick and returns the snapshot for presentation.
    pub fn tick(&mut self) -> Snapshot {
        let intent = self.input.drain_intent();

        if intent.quit {
            self.quit_requested = true;
        }
        if intent.fullscreen {
            self.fullscreen_requested = true;
        }
        if intent.pause {
            self.phase = match self.phase {
                SessionPhase::Running => SessionPhase::Paused,
                SessionPhase::Paused => SessionPhase::Running,
                other => other,
            };
        }

        if self.phase.should_update_world() {
            self.step_world(&intent);
        }

        self.ticks += 1;
        self.capture_snapshot()
    }

    /// One full world step in the fixed pipeline order.
    fn step_world(&mut self, intent: &PlayerIntent) {
        let bounds = self.config.bounds;

        // Timers advance first, so "cooldown elapsed" is as of this tick.
        if let Some(weapon) = self.player.tick_timers() {
            self.events.publish(GameEvent::ReloadFinished { weapon });
        }
        {
            let Ok(room) = self.rooms.current_mut() else {
                debug_assert!(false, "no current room");
                return;
            };
            for npc in &mut room.npcs {
                npc.tick();
            }
            room.tick_doors();
        }

        // (1) Apply queued input. Dialogue captures everything except the
        // interact key, which closes it.
        let in_dialogue = self.dialogue.is_active();
        if in_dialogue {
            if intent.interact {
                let _ = self.dialogue.close();
                self.events.publish(GameEvent::DialogueEnded);
            }
        } else {
            self.player.move_along(intent.move_axis, &bounds);
            if intent.next_weapon {
                self.player.cycle_weapon();
            }
            if intent.reload && self.combat.start_reload(&mut self.player) {
                self.events.publish(GameEvent::ReloadStarted {
                    weapon: self.player.weapon(),
                });
            }
            if intent.interact {
                let player_pos = self.player.entity.pos;
                let Ok(room) = self.rooms.current_mut() else {
                    debug_assert!(false, "no current room");
                    return;
                };
                if let Some(npc) = room.npcs.iter_mut().find(|n| n.can_interact(player_pos)) {
                    let line = npc.interact();
                    self.events.publish(GameEvent::DialogueStarted {
                        speaker: line.speaker.clone(),
                    });
                    self.dialogue.open(line);
                }
            }
        }
        let want_fire = intent.fire && !in_dialogue;
        let want_melee = intent.melee && !in_dialogue;

        // (2) Advance enemy AI and movement.
        let player_pos = self.player.entity.pos;
        let player_alive = self.player.is_alive();
        let report = {
            let Ok(room) = self.rooms.current_mut() else {
                debug_assert!(false, "no current room");
                return;
            };
            ai::update_room(
                &mut room.enemies,
                player_pos,
                player_alive,
                &bounds,
                &mut self.rng,
            )
        };
        for (entity_id, phase) in report.phases_entered.iter().copied() {
            self.events
                .publish(GameEvent::BossPhaseChanged { entity_id, phase });
        }

        // (3) Resolve combat.
        if want_fire {
            match self.combat.fire_ranged(&mut self.player) {
                FireOutcome::Fired(weapon) => {
                    self.events.publish(GameEvent::ShotFired { weapon });
                }
                FireOutcome::OutOfAmmo(weapon) => {
                    self.events.publish(GameEvent::OutOfAmmo { weapon });
                }
                FireOutcome::CoolingDown | FireOutcome::Reloading => {}
            }
        }
        if want_melee {
            let outcome = {
                let Ok(room) = self.rooms.current_mut() else {
                    debug_assert!(false, "no current room");
                    return;
                };
                self.combat.melee_attack(&mut self.player, &mut room.enemies)
            };
            if let MeleeOutcome::Swung(hits) = outcome {
                if !hits.is_empty() {
                    self.events.publish(GameEvent::MeleeStruck {
                        targets: hits.len() as u32,
                    });
                }
            }
        }

        let ai_hits = self.combat.apply_intents(&report.intents, &mut self.player);
        if ai_hits.damage > 0 {
            self.events.publish(GameEvent::PlayerDamaged {
                amount: ai_hits.damage,
                remaining: self.player.entity.health.current(),
            });
        }

        self.combat.step_projectiles(&bounds);
        let records = {
            let Ok(room) = self.rooms.current_mut() else {
                debug_assert!(false, "no current room");
                return;
            };
            self.combat.resolve_hits(&mut room.enemies, &mut self.player)
        };
        for record in &records {
            if record.target == HitTarget::Player {
                self.events.publish(GameEvent::PlayerDamaged {
                    amount: record.damage,
                    remaining: self.player.entity.health.current(),
                });
            }
        }

        // Boss summons join the roster after combat so they cannot be struck
        // before they exist.
        if !report.summons.is_empty() {
            let Ok(room) = self.rooms.current_mut() else {
                debug_assert!(false, "no current room");
                return;
            };
            let room_id = room.id();
            let mut alive = room.alive_enemies();
            for request in &report.summons {
                let placed = self.waves.place_summons(
                    request.kind,
                    request.count,
                    request.origin,
                    alive,
                    &bounds,
                    &mut self.rng,
                );
                for (kind, pos) in placed {
                    let info = self.catalog.sprite(SpriteKey::Enemy(kind));
                    room.enemies
                        .push(Enemy::with_size(kind, pos, room_id, info.width, info.height));
                    alive += 1;
                }
            }
        }

        // (4) Pickup consumption.
        self.pickups.update();
        for (pickup_id, kind, effect) in self.pickups.consume_overlapping(&mut self.player) {
            if effect != PickupEffect::None {
                self.events
                    .publish(GameEvent::PickupCollected { pickup_id, kind });
            }
        }

        // (5) Room transition: atomic, with transients purged in the same
        // tick. Pickups above already registered.
        if let Some(request) = self.rooms.check_transition(&self.player.entity.hitbox()) {
            self.combat.clear_projectiles();
            self.pickups.clear();
            match self.rooms.transition(request, &mut self.player) {
                Ok(room) => {
                    self.events.publish(GameEvent::RoomEntered { room: room.id() });
                }
                Err(error) => {
                    debug_assert!(false, "transition failed: {error}");
                    tracing::warn!(%error, "transition failed");
                }
            }
        }

        // (6) Purge the dead, award kills, run spawn triggers.
        let killed = {
            let Ok(room) = self.rooms.current_mut() else {
                debug_assert!(false, "no current room");
                return;
            };
            room.purge_dead()
        };
        for (entity_id, kind) in &killed {
            self.kills += 1;
            self.events.publish(GameEvent::EnemySlain {
                entity_id: *entity_id,
                kind: *kind,
                total_kills: self.kills,
            });
        }
        if !killed.is_empty() {
            if let Ok(room) = self.rooms.current() {
                if room.is_cleared() {
                    self.events.publish(GameEvent::RoomCleared { room: room.id() });
                }
            }
        }

        let plan = {
            let Ok(room) = self.rooms.current() else {
                debug_assert!(false, "no current room");
                return;
            };
            let alive = room.alive_enemies();
            self.waves.on_kills(self.kills, alive, &bounds, &mut self.rng)
        };
        if !plan.enemies.is_empty() {
            let Ok(room) = self.rooms.current_mut() else {
                debug_assert!(false, "no current room");
                return;
            };
            let room_id = room.id();
            for (kind, pos) in plan.enemies.iter().copied() {
                let info = self.catalog.sprite(SpriteKey::Enemy(kind));
                room.enemies
                    .push(Enemy::with_size(kind, pos, room_id, info.width, info.height));
            }
            self.events.publish(GameEvent::WaveSpawned {
                count: plan.enemies.len() as u32,
            });
        }
        if !plan.pickups.is_empty() {
            let spawn_points = self
                .rooms
                .current()
                .map(|room| room.spawn_points().to_vec())
                .unwrap_or_default();
            for kind in plan.pickups.iter().copied() {
                if let Some(pickup_id) = self.pickups.try_spawn(kind, &spawn_points, &mut self.rng)
                {
                    self.events
                        .publish(GameEvent::PickupSpawned { pickup_id, kind });
                }
            }
        }
        self.pickups.purge_inactive();

        // Terminal checks close the tick.
        if !self.player.is_alive() {
            self.phase = SessionPhase::GameOver;
            self.events.publish(GameEvent::PlayerDied);
            tracing::info!(kills = self.kills, "session over: player died");
        } else if self.kills >= self.config.victory_kills {
            self.phase = SessionPhase::Victory;
            self.events.publish(GameEvent::Victory);
            tracing::info!(kills = self.kills, "session over: victory");
        }
    }

    /// (7) Captures the immutable snapshot for presentation.
    fn capture_snapshot(&self) -> Snapshot {
        let room = self.rooms.current().ok();
        let player_pos = self.player.entity.pos;

        let enemies: Vec<EnemyView> = room
            .map(|room| {
                room.enemies
                    .iter()
                    .map(|enemy| EnemyView {
                        id: enemy.entity.id(),
                        kind: enemy.kind(),
                        pos: enemy.entity.pos,
                        width: enemy.entity.width(),
                        height: enemy.entity.height(),
                        facing: enemy.entity.facing,
                        health: enemy.entity.health.current(),
                        max_health: enemy.entity.health.max(),
                        ai: enemy.ai,
                        stealthed: enemy.stealthed,
                        boss_phase: enemy
                            .boss
                            .as_ref()
                            .map(|boss| boss.phase().name.to_string()),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let npcs: Vec<NpcView> = room
            .map(|room| {
                room.npcs
                    .iter()
                    .map(|npc| NpcView {
                        id: npc.entity.id(),
                        kind: npc.kind(),
                        name: npc.name().to_string(),
                        pos: npc.entity.pos,
                        can_interact: npc.can_interact(player_pos),
                        quest_pending: npc.has_quest() && !npc.quest_delivered(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let projectiles: Vec<ProjectileView> = self
            .combat
            .projectiles()
            .iter()
            .map(|projectile| ProjectileView {
                id: projectile.id(),
                faction: projectile.faction(),
                pos: projectile.pos,
                vel: projectile.vel,
                radius: projectile.radius(),
            })
            .collect();

        let pickups: Vec<PickupView> = self
            .pickups
            .pickups()
            .iter()
            .filter(|pickup| pickup.is_active())
            .map(|pickup| PickupView {
                id: pickup.id(),
                kind: pickup.kind,
                pos: pickup.pos,
                value: pickup.value,
            })
            .collect();

        let boss = room.and_then(|room| {
            room.enemies
                .iter()
                .find(|enemy| enemy.kind().is_boss() && enemy.is_alive())
                .map(|enemy| BossView {
                    name: enemy.kind().display_name().to_string(),
                    health: enemy.entity.health.current(),
                    max_health: enemy.entity.health.max(),
                    phase: enemy
                        .boss
                        .as_ref()
                        .map(|boss| boss.phase().name.to_string())
                        .unwrap_or_default(),
                })
        });

        let dialogue = self.dialogue.current().map(|line| DialogueView {
            speaker: line.speaker.clone(),
            text: line.text.clone(),
            kind: line.kind,
        });

        Snapshot {
            tick: self.ticks,
            phase: self.phase,
            room: room.map_or(self.config.start_room, Room::id),
            player: PlayerView {
                pos: self.player.entity.pos,
                width: self.player.entity.width(),
                height: self.player.entity.height(),
                facing: self.player.entity.facing,
                health: self.player.entity.health.current(),
                max_health: self.player.entity.health.max(),
                armor: self.player.armor(),
                weapon: self.player.weapon(),
                ammo: self.player.active_ammo(),
                capacity: self.player.weapon().capacity(),
                reloading: self.player.is_reloading(),
            },
            enemies,
            projectiles,
            pickups,
            npcs,
            hud: HudView {
                kills: self.kills,
                victory_kills: self.config.victory_kills,
                objective: room.map_or_else(String::new, |room| room.objective().to_string()),
                room_name: room.map_or_else(String::new, |room| room.name().to_string()),
                dialogue,
                boss,
            },
        }
    }
}
