//! Event bus decoupling the simulation from presentation feedback.
//!
//! The sim publishes; the shell drains once per frame for sound cues, HUD
//! messages, and the like. Nothing in the simulation ever reads these back.

use crossbeam_channel::{bounded, Receiver, Sender};
use hivebreak_common::{EntityId, PickupId, RoomId};
use serde::Serialize;

use crate::combat::Weapon;
use crate::enemy::EnemyKind;
use crate::pickup::PickupKind;

/// Feedback events emitted by the simulation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    /// The player took damage
    PlayerDamaged {
        /// Damage applied after armor
        amount: i32,
        /// Health remaining
        remaining: i32,
    },
    /// The player died
    PlayerDied,
    /// An enemy was killed
    EnemySlain {
        /// The enemy
        entity_id: EntityId,
        /// Its kind
        kind: EnemyKind,
        /// Running kill total
        total_kills: u32,
    },
    /// A shot was fired
    ShotFired {
        /// Weapon used
        weapon: Weapon,
    },
    /// Fire was requested on an empty magazine (UI hint, not an error)
    OutOfAmmo {
        /// Weapon that clicked empty
        weapon: Weapon,
    },
    /// A reload began
    ReloadStarted {
        /// Weapon being reloaded
        weapon: Weapon,
    },
    /// A reload finished
    ReloadFinished {
        /// Weapon now at capacity
        weapon: Weapon,
    },
    /// A melee swing connected
    MeleeStruck {
        /// Number of enemies hit in the swing
        targets: u32,
    },
    /// A pickup appeared
    PickupSpawned {
        /// The pickup
        pickup_id: PickupId,
        /// Its kind
        kind: PickupKind,
    },
    /// A pickup was consumed
    PickupCollected {
        /// The pickup
        pickup_id: PickupId,
        /// Its kind
        kind: PickupKind,
    },
    /// The player entered a room
    RoomEntered {
        /// The room
        room: RoomId,
    },
    /// Every enemy in the current room is dead
    RoomCleared {
        /// The room
        room: RoomId,
    },
    /// An enemy wave spawned
    WaveSpawned {
        /// Number of enemies added
        count: u32,
    },
    /// A boss entered a new phase
    BossPhaseChanged {
        /// The boss
        entity_id: EntityId,
        /// New phase name
        phase: &'static str,
    },
    /// Dialogue opened
    DialogueStarted {
        /// Speaker name
        speaker: String,
    },
    /// Dialogue closed
    DialogueEnded,
    /// The kill goal was reached
    Victory,
}

/// Event bus for broadcasting simulation events to the shell.
#[derive(Debug)]
pub struct EventBus {
    sender: Sender<GameEvent>,
    receiver: Receiver<GameEvent>,
    capacity: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

impl EventBus {
    /// Creates a new event bus with the given capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self {
            sender,
            receiver,
            capacity,
        }
    }

    /// Publishes an event. Non-blocking: if the bus is full the event is
    /// dropped rather than stalling the tick.
    pub fn publish(&self, event: GameEvent) {
        let _ = self.sender.try_send(event);
    }

    /// Drains all pending events.
    pub fn drain(&self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.receiver.try_recv() {
            events.push(event);
        }
        events
    }

    /// Number of pending events.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Channel capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Creates a new sender handle for publishing events.
    #[must_use]
    pub fn sender(&self) -> Sender<GameEvent> {
        self.sender.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_and_drain() {
        let bus = EventBus::new(16);
        bus.publish(GameEvent::Victory);
        bus.publish(GameEvent::DialogueEnded);

        assert_eq!(bus.pending_count(), 2);
        let events = bus.drain();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], GameEvent::Victory);
        assert_eq!(bus.pending_count(), 0);
    }

    #[test]
    fn test_full_bus_drops_instead_of_blocking() {
        let bus = EventBus::new(1);
        bus.publish(GameEvent::Victory);
        bus.publish(GameEvent::DialogueEnded); // dropped

        let events = bus.drain();
        assert_eq!(events, vec![GameEvent::Victory]);
    }
}
