//! Error types for Hivebreak.

use thiserror::Error;

use crate::RoomId;

/// Top-level error type for simulation operations.
///
/// Gameplay no-ops (firing with no ammo, melee on cooldown) are not errors
/// and never appear here; this taxonomy covers programmer mistakes surfaced
/// at construction and registration boundaries.
#[derive(Debug, Error)]
pub enum SimError {
    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// Room registry errors
    #[error("Room error: {0}")]
    Room(#[from] RoomTopologyError),

    /// IO errors (configuration loading only)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Room registry and topology errors.
#[derive(Debug, Error)]
pub enum RoomTopologyError {
    /// Room not found
    #[error("Room not found: {0:?}")]
    NotFound(RoomId),

    /// Room already registered
    #[error("Room already registered: {0:?}")]
    AlreadyRegistered(RoomId),

    /// Door targets a room missing from the registry
    #[error("Door in {from:?} targets unknown room {target:?}")]
    DanglingDoor {
        /// Room containing the door
        from: RoomId,
        /// The missing target
        target: RoomId,
    },

    /// No current room set
    #[error("No current room")]
    NoCurrentRoom,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RoomTopologyError::NotFound(RoomId::new(3));
        assert!(err.to_string().contains("not found"));

        let err: SimError = RoomTopologyError::NoCurrentRoom.into();
        assert!(matches!(err, SimError::Room(_)));
    }
}
