//! # Hivebreak Common
//!
//! Shared types for the Hivebreak simulation:
//! - ID newtypes for entities, rooms, projectiles, and pickups
//! - The top-level error taxonomy

pub mod error;
pub mod ids;

pub use error::{RoomTopologyError, SimError};
pub use ids::{EntityId, PickupId, ProjectileId, RoomId};
