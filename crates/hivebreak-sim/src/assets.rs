//! The asset surface the simulation consumes.
//!
//! The real sprite loader lives in the shell; the sim only needs a renderable
//! handle and hitbox dimensions per entity kind. The placeholder catalog is
//! deterministic and never fails, so a missing asset can never reach the
//! simulation as an error.

use crate::combat::Weapon;
use crate::enemy::EnemyKind;
use crate::npc::NpcKind;
use crate::pickup::PickupKind;

/// Key identifying what an entity looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteKey {
    /// The player character
    Player,
    /// An enemy of a given kind
    Enemy(EnemyKind),
    /// An NPC of a given kind
    Npc(NpcKind),
    /// A pickup of a given kind
    Pickup(PickupKind),
    /// A projectile fired by a weapon (None for enemy projectiles)
    Projectile(Option<Weapon>),
}

/// A renderable handle plus the hitbox dimensions the sim should use.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteInfo {
    /// Opaque handle the renderer understands (asset path or placeholder tag)
    pub handle: String,
    /// Hitbox width in world units
    pub width: f32,
    /// Hitbox height in world units
    pub height: f32,
}

/// Source of sprites and hitbox dimensions.
pub trait SpriteCatalog {
    /// Resolves a sprite key. Must always return something renderable; a
    /// missing asset resolves to a placeholder, never an error.
    fn sprite(&self, key: SpriteKey) -> SpriteInfo;
}

/// Deterministic placeholder catalog.
///
/// Hitbox dimensions come from the stat profiles, scaled by the configured
/// global factor; handles are stable placeholder tags.
#[derive(Debug, Clone)]
pub struct PlaceholderCatalog {
    scale: f32,
}

impl PlaceholderCatalog {
    /// Creates a catalog with the given global sprite scale.
    #[must_use]
    pub fn new(scale: f32) -> Self {
        Self {
            scale: if scale > 0.0 { scale } else { 1.0 },
        }
    }
}

impl Default for PlaceholderCatalog {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl SpriteCatalog for PlaceholderCatalog {
    fn sprite(&self, key: SpriteKey) -> SpriteInfo {
        let (tag, width, height) = match key {
            SpriteKey::Player => ("placeholder/player".to_string(), 50.0, 70.0),
            SpriteKey::Enemy(kind) => {
                let profile = kind.profile();
                (
                    format!("placeholder/enemy/{}", kind.display_name()),
                    profile.width,
                    profile.height,
                )
            }
            SpriteKey::Npc(kind) => (
                format!("placeholder/npc/{}", kind.display_name()),
                40.0,
                70.0,
            ),
            SpriteKey::Pickup(kind) => (
                format!("placeholder/pickup/{}", kind.display_name()),
                40.0,
                40.0,
            ),
            SpriteKey::Projectile(weapon) => (
                match weapon {
                    Some(w) => format!("placeholder/projectile/{}", w.display_name()),
                    None => "placeholder/projectile/bio".to_string(),
                },
                10.0,
                10.0,
            ),
        };
        SpriteInfo {
            handle: tag,
            width: width * self.scale,
            height: height * self.scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_is_deterministic() {
        let catalog = PlaceholderCatalog::default();
        let a = catalog.sprite(SpriteKey::Enemy(EnemyKind::Carnifex));
        let b = catalog.sprite(SpriteKey::Enemy(EnemyKind::Carnifex));
        assert_eq!(a, b);
    }

    #[test]
    fn test_enemy_dimensions_match_profile() {
        let catalog = PlaceholderCatalog::default();
        let info = catalog.sprite(SpriteKey::Enemy(EnemyKind::Gaunt));
        let profile = EnemyKind::Gaunt.profile();
        assert_eq!(info.width, profile.width);
        assert_eq!(info.height, profile.height);
    }

    #[test]
    fn test_scale_applies() {
        let catalog = PlaceholderCatalog::new(2.0);
        let info = catalog.sprite(SpriteKey::Player);
        assert_eq!(info.width, 100.0);
        assert_eq!(info.height, 140.0);
    }

    #[test]
    fn test_invalid_scale_falls_back() {
        let catalog = PlaceholderCatalog::new(0.0);
        let info = catalog.sprite(SpriteKey::Player);
        assert_eq!(info.width, 50.0);
    }

    #[test]
    fn test_every_key_resolves() {
        let catalog = PlaceholderCatalog::default();
        for kind in EnemyKind::all() {
            assert!(!catalog.sprite(SpriteKey::Enemy(kind)).handle.is_empty());
        }
        for kind in NpcKind::all() {
            assert!(!catalog.sprite(SpriteKey::Npc(kind)).handle.is_empty());
        }
    }
}
