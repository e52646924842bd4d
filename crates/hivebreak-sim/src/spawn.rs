//! Progress-based enemy wave and pickup-drop direction.
//!
//! Pacing is keyed to player progress (kill counts and room entry), never to
//! wall-clock time, so a replayed input script reproduces the same waves.

use serde::{Deserialize, Serialize};

use crate::enemy::EnemyKind;
use crate::input::Vec2;
use crate::physics::Bounds;
use crate::pickup::PickupKind;

/// Simple LCG random number generator for deterministic simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnRng {
    state: u64,
}

impl SpawnRng {
    /// Create a new RNG with seed.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Get next random u64.
    pub fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        self.state
    }

    /// Get random f32 in [0, 1).
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
    }

    /// Get random value in range [min, max].
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }

    /// Get random u32 in range [min, max].
    pub fn range_u32(&mut self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        min + (self.next_u64() % u64::from(max - min + 1)) as u32
    }

    /// Bernoulli draw with probability `p`.
    pub fn chance(&mut self, p: f32) -> bool {
        self.next_f32() < p
    }

    /// Choose random item from slice.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            let idx = (self.next_u64() % items.len() as u64) as usize;
            Some(&items[idx])
        }
    }
}

/// Rule for one enemy kind in the wave table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveRule {
    /// Kind to spawn
    pub kind: EnemyKind,
    /// Relative draw weight
    pub weight: f32,
    /// Kill count required before this kind appears
    pub min_kills: u32,
}

impl WaveRule {
    /// Creates a wave rule.
    #[must_use]
    pub const fn new(kind: EnemyKind, weight: f32, min_kills: u32) -> Self {
        Self {
            kind,
            weight,
            min_kills,
        }
    }
}

/// What the director wants spawned this tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WavePlan {
    /// Enemies to add to the current room
    pub enemies: Vec<(EnemyKind, Vec2)>,
    /// Pickup drops earned by kill milestones
    pub pickups: Vec<PickupKind>,
}

impl WavePlan {
    /// Whether the plan spawns nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty() && self.pickups.is_empty()
    }
}

/// Progress-based wave director.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveDirector {
    rules: Vec<WaveRule>,
    /// Kills between reinforcement waves
    spawn_every_kills: u32,
    /// Kills between pickup drops
    pickup_every_kills: u32,
    /// Hard cap of live enemies per room
    max_alive_per_room: usize,
    /// Wave size range
    batch_size: (u32, u32),
    next_wave_at: u32,
    next_pickup_at: u32,
}

impl WaveDirector {
    /// Creates a director with the given pacing.
    #[must_use]
    pub fn new(
        rules: Vec<WaveRule>,
        spawn_every_kills: u32,
        pickup_every_kills: u32,
        max_alive_per_room: usize,
        batch_size: (u32, u32),
    ) -> Self {
        Self {
            rules,
            spawn_every_kills: spawn_every_kills.max(1),
            pickup_every_kills: pickup_every_kills.max(1),
            max_alive_per_room,
            batch_size,
            next_wave_at: spawn_every_kills.max(1),
            next_pickup_at: pickup_every_kills.max(1),
        }
    }

    /// The default wave table for the campaign.
    #[must_use]
    pub fn default_rules() -> Vec<WaveRule> {
        vec![
            WaveRule::new(EnemyKind::Gaunt, 3.0, 0),
            WaveRule::new(EnemyKind::Genestealer, 3.0, 0),
            WaveRule::new(EnemyKind::Warrior, 2.0, 3),
            WaveRule::new(EnemyKind::Lictor, 1.0, 5),
            WaveRule::new(EnemyKind::Zoanthrope, 1.0, 8),
            WaveRule::new(EnemyKind::Carnifex, 0.5, 12),
            WaveRule::new(EnemyKind::Mawloc, 0.5, 15),
        ]
    }

    /// Maximum live enemies the director tolerates in one room.
    #[must_use]
    pub const fn max_alive_per_room(&self) -> usize {
        self.max_alive_per_room
    }

    /// Reacts to the running kill total, producing reinforcements and drops.
    ///
    /// `alive_in_room` gates reinforcements; pickup milestones are never
    /// gated.
    pub fn on_kills(
        &mut self,
        total_kills: u32,
        alive_in_room: usize,
        bounds: &Bounds,
        rng: &mut SpawnRng,
    ) -> WavePlan {
        let mut plan = WavePlan::default();

        while total_kills >= self.next_wave_at {
            self.next_wave_at += self.spawn_every_kills;

            let headroom = self
                .max_alive_per_room
                .saturating_sub(alive_in_room + plan.enemies.len());
            if headroom == 0 {
                tracing::debug!(total_kills, "wave suppressed, room at capacity");
                continue;
            }
            let count = rng
                .range_u32(self.batch_size.0, self.batch_size.1)
                .min(headroom as u32);
            for _ in 0..count {
                if let Some(kind) = self.draw_kind(total_kills, rng) {
                    plan.enemies.push((kind, edge_position(bounds, rng)));
                }
            }
        }

        while total_kills >= self.next_pickup_at {
            self.next_pickup_at += self.pickup_every_kills;
            plan.pickups.push(draw_pickup_kind(rng));
        }

        if !plan.is_empty() {
            tracing::debug!(
                enemies = plan.enemies.len(),
                pickups = plan.pickups.len(),
                total_kills,
                "wave plan issued"
            );
        }
        plan
    }

    /// Places a boss summon brood in a ring around the summoner.
    pub fn place_summons(
        &self,
        kind: EnemyKind,
        count: u32,
        origin: Vec2,
        alive_in_room: usize,
        bounds: &Bounds,
        rng: &mut SpawnRng,
    ) -> Vec<(EnemyKind, Vec2)> {
        let headroom = self.max_alive_per_room.saturating_sub(alive_in_room);
        let count = count.min(headroom as u32);
        (0..count)
            .map(|i| {
                let angle =
                    (i as f32 / count.max(1) as f32) * std::f32::consts::TAU + rng.range(0.0, 0.5);
                let offset = Vec2::new(angle.cos(), angle.sin()) * 90.0;
                (kind, bounds.clamp_center(origin + offset, 1.0, 1.0))
            })
            .collect()
    }

    /// Weighted draw over the rules unlocked at this kill count.
    fn draw_kind(&self, total_kills: u32, rng: &mut SpawnRng) -> Option<EnemyKind> {
        let eligible: Vec<&WaveRule> = self
            .rules
            .iter()
            .filter(|r| total_kills >= r.min_kills)
            .collect();
        let total_weight: f32 = eligible.iter().map(|r| r.weight).sum();
        if total_weight <= 0.0 {
            return None;
        }
        let mut roll = rng.range(0.0, total_weight);
        for rule in &eligible {
            roll -= rule.weight;
            if roll <= 0.0 {
                return Some(rule.kind);
            }
        }
        eligible.last().map(|r| r.kind)
    }
}

/// Random position on one of the four room edges, as the original reinforcement
/// placement does.
fn edge_position(bounds: &Bounds, rng: &mut SpawnRng) -> Vec2 {
    let margin = 50.0;
    match rng.range_u32(0, 3) {
        0 => Vec2::new(rng.range(margin, bounds.width - margin), 0.0),
        1 => Vec2::new(bounds.width, rng.range(margin, bounds.height - margin)),
        2 => Vec2::new(rng.range(margin, bounds.width - margin), bounds.height),
        _ => Vec2::new(0.0, rng.range(margin, bounds.height - margin)),
    }
}

/// Milestone drop table: mostly ammo, sometimes health, rarely armor.
fn draw_pickup_kind(rng: &mut SpawnRng) -> PickupKind {
    let roll = rng.next_f32();
    if roll < 0.5 {
        PickupKind::Ammo
    } else if roll < 0.85 {
        PickupKind::Health
    } else {
        PickupKind::Armor
    }
}
