//! Boss phase state: health-threshold phases and fixed ability rotations.
//!
//! A boss cycles through an ordered list of abilities while attacking; the
//! cycle is fixed (never random) so encounters replay identically. Phases are
//! entered by health threshold and are monotonic: a boss never returns to an
//! earlier phase.

use serde::Serialize;

use crate::enemy::EnemyKind;

/// An ability slot in a boss rotation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum BossAbility {
    /// Area blast centered on the boss with linear distance falloff.
    AreaBlast {
        /// Display name of the ability
        name: &'static str,
        /// Damage at the center
        damage: i32,
        /// Effect radius
        radius: f32,
    },
    /// Summons a brood of lesser enemies around the boss.
    Summon {
        /// Display name of the ability
        name: &'static str,
        /// Kind to summon
        kind: EnemyKind,
        /// Number summoned
        count: u32,
    },
    /// Recovery slot: no effect.
    Rest,
}

impl BossAbility {
    /// Display name of the ability.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::AreaBlast { name, .. } | Self::Summon { name, .. } => *name,
            Self::Rest => "Rest",
        }
    }
}

/// One step of a boss rotation: an ability and how long the boss stays in it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RotationStep {
    /// Ability fired when the step begins
    pub ability: BossAbility,
    /// Step duration in ticks
    pub duration: u32,
}

impl RotationStep {
    /// Creates a rotation step.
    #[must_use]
    pub const fn new(ability: BossAbility, duration: u32) -> Self {
        Self { ability, duration }
    }
}

/// A health-threshold phase of a boss fight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BossPhase {
    /// Display name of the phase
    pub name: &'static str,
    /// Health percentage at or below which this phase activates
    pub health_threshold: f32,
    /// Damage multiplier while this phase is active
    pub damage_mult: f32,
    /// Speed multiplier while this phase is active
    pub speed_mult: f32,
    /// Ability rotation cycled while attacking in this phase
    pub rotation: Vec<RotationStep>,
}

/// Outcome of one boss tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BossTick {
    /// Ability whose step began this tick, if any
    pub fired: Option<BossAbility>,
    /// Name of the phase entered this tick, if a transition happened
    pub phase_entered: Option<&'static str>,
}

/// Runtime phase state of a boss.
#[derive(Debug, Clone, Serialize)]
pub struct BossState {
    phases: Vec<BossPhase>,
    phase_index: usize,
    step_index: usize,
    step_timer: u32,
    started: bool,
}

impl BossState {
    /// Builds the phase script for a boss kind.
    ///
    /// Non-boss kinds get a single passive phase with an empty rotation.
    #[must_use]
    pub fn for_kind(kind: EnemyKind) -> Self {
        let phases = match kind {
            EnemyKind::HiveTyrant => vec![
                BossPhase {
                    name: "Normal",
                    health_threshold: 100.0,
                    damage_mult: 1.0,
                    speed_mult: 1.0,
                    rotation: vec![
                        RotationStep::new(
                            BossAbility::AreaBlast {
                                name: "Psychic Scream",
                                damage: 30,
                                radius: 200.0,
                            },
                            300,
                        ),
                        RotationStep::new(BossAbility::Rest, 100),
                        RotationStep::new(
                            BossAbility::Summon {
                                name: "Summon Guards",
                                kind: EnemyKind::Gaunt,
                                count: 2,
                            },
                            200,
                        ),
                        RotationStep::new(BossAbility::Rest, 100),
                    ],
                },
                BossPhase {
                    name: "Enraged",
                    health_threshold: 50.0,
                    damage_mult: 2.0,
                    speed_mult: 1.5,
                    rotation: vec![
                        RotationStep::new(
                            BossAbility::AreaBlast {
                                name: "Psychic Storm",
                                damage: 40,
                                radius: 300.0,
                            },
                            240,
                        ),
                        RotationStep::new(BossAbility::Rest, 80),
                        RotationStep::new(
                            BossAbility::Summon {
                                name: "Mass Summon",
                                kind: EnemyKind::Gaunt,
                                count: 4,
                            },
                            200,
                        ),
                        RotationStep::new(BossAbility::Rest, 80),
                    ],
                },
                BossPhase {
                    name: "Final",
                    health_threshold: 25.0,
                    damage_mult: 2.0,
                    speed_mult: 1.5,
                    rotation: vec![
                        RotationStep::new(
                            BossAbility::AreaBlast {
                                name: "Psychic Apocalypse",
                                damage: 60,
                                radius: 400.0,
                            },
                            200,
                        ),
                        RotationStep::new(BossAbility::Rest, 60),
                        RotationStep::new(
                            BossAbility::Summon {
                                name: "Endless Swarm",
                                kind: EnemyKind::Gaunt,
                                count: 6,
                            },
                            200,
                        ),
                        RotationStep::new(BossAbility::Rest, 60),
                    ],
                },
            ],
            EnemyKind::Swarmlord => vec![
                BossPhase {
                    name: "Normal",
                    health_threshold: 100.0,
                    damage_mult: 1.0,
                    speed_mult: 1.0,
                    rotation: vec![
                        RotationStep::new(
                            BossAbility::AreaBlast {
                                name: "Bone Sword Sweep",
                                damage: 40,
                                radius: 150.0,
                            },
                            200,
                        ),
                        RotationStep::new(BossAbility::Rest, 100),
                        RotationStep::new(
                            BossAbility::Summon {
                                name: "Hive Guard Summon",
                                kind: EnemyKind::Warrior,
                                count: 2,
                            },
                            150,
                        ),
                        RotationStep::new(BossAbility::Rest, 100),
                    ],
                },
                BossPhase {
                    name: "Enraged",
                    health_threshold: 60.0,
                    damage_mult: 2.0,
                    speed_mult: 1.5,
                    rotation: vec![
                        RotationStep::new(
                            BossAbility::AreaBlast {
                                name: "Bone Sword Storm",
                                damage: 60,
                                radius: 200.0,
                            },
                            160,
                        ),
                        RotationStep::new(BossAbility::Rest, 80),
                        RotationStep::new(
                            BossAbility::Summon {
                                name: "Tyrant Guard Summon",
                                kind: EnemyKind::Carnifex,
                                count: 1,
                            },
                            150,
                        ),
                        RotationStep::new(BossAbility::Rest, 80),
                    ],
                },
                BossPhase {
                    name: "Final",
                    health_threshold: 30.0,
                    damage_mult: 2.0,
                    speed_mult: 1.5,
                    rotation: vec![
                        RotationStep::new(
                            BossAbility::AreaBlast {
                                name: "Bone Sword Apocalypse",
                                damage: 80,
                                radius: 250.0,
                            },
                            160,
                        ),
                        RotationStep::new(BossAbility::Rest, 60),
                        RotationStep::new(
                            BossAbility::Summon {
                                name: "Hive Guard Summon",
                                kind: EnemyKind::Warrior,
                                count: 3,
                            },
                            150,
                        ),
                        RotationStep::new(BossAbility::Rest, 60),
                    ],
                },
            ],
            _ => vec![BossPhase {
                name: "Normal",
                health_threshold: 100.0,
                damage_mult: 1.0,
                speed_mult: 1.0,
                rotation: Vec::new(),
            }],
        };

        Self {
            phases,
            phase_index: 0,
            step_index: 0,
            step_timer: 0,
            started: false,
        }
    }

    /// The currently active phase.
    #[must_use]
    pub fn phase(&self) -> &BossPhase {
        &self.phases[self.phase_index]
    }

    /// Name of the current rotation step's ability.
    #[must_use]
    pub fn current_ability_name(&self) -> &'static str {
        self.phase()
            .rotation
            .get(self.step_index)
            .map_or("Rest", |step| step.ability.name())
    }

    /// Advances phase and rotation state by one tick.
    ///
    /// `health_fraction` is in [0, 1]. A phase transition resets the rotation.
    /// An ability fires exactly once, on the tick its step begins.
    pub fn advance(&mut self, health_fraction: f32) -> BossTick {
        let mut outcome = BossTick::default();

        // Phase transitions are monotonic: only ever forward.
        let health_pct = health_fraction * 100.0;
        while self.phase_index + 1 < self.phases.len()
            && health_pct <= self.phases[self.phase_index + 1].health_threshold
        {
            self.phase_index += 1;
            self.step_index = 0;
            self.step_timer = 0;
            self.started = false;
            outcome.phase_entered = Some(self.phases[self.phase_index].name);
            tracing::info!(phase = self.phases[self.phase_index].name, "boss phase entered");
        }

        let rotation_len = self.phase().rotation.len();
        if rotation_len == 0 {
            return outcome;
        }

        if !self.started {
            // Enter the first step of the (possibly new) rotation.
            self.started = true;
            let step = &self.phases[self.phase_index].rotation[self.step_index];
            self.step_timer = step.duration;
            outcome.fired = Some(step.ability.clone());
            return outcome;
        }

        self.step_timer = self.step_timer.saturating_sub(1);
        if self.step_timer == 0 {
            self.step_index = (self.step_index + 1) % rotation_len;
            let step = &self.phases[self.phase_index].rotation[self.step_index];
            self.step_timer = step.duration;
            outcome.fired = Some(step.ability.clone());
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_is_cyclic_not_random() {
        let mut state = BossState::for_kind(EnemyKind::HiveTyrant);

        let mut fired_names = Vec::new();
        // Run enough ticks to cycle the Normal rotation twice.
        for _ in 0..1500 {
            if let Some(ability) = state.advance(1.0).fired {
                fired_names.push(ability.name());
            }
        }

        let cycle = [
            "Psychic Scream",
            "Rest",
            "Summon Guards",
            "Rest",
        ];
        assert!(fired_names.len() >= cycle.len() * 2);
        for (i, name) in fired_names.iter().enumerate() {
            assert_eq!(*name, cycle[i % cycle.len()]);
        }
    }

    #[test]
    fn test_expiring_step_advances_to_next_not_back() {
        let mut state = BossState::for_kind(EnemyKind::HiveTyrant);

        // First tick fires the opening blast.
        let first = state.advance(1.0).fired.expect("opening ability");
        assert_eq!(first.name(), "Psychic Scream");

        // Run the step's full duration out; the next fired ability must be
        // the recovery slot, not the blast again.
        let mut next = None;
        for _ in 0..300 {
            if let Some(ability) = state.advance(1.0).fired {
                next = Some(ability);
                break;
            }
        }
        assert_eq!(next.expect("next step").name(), "Rest");
    }

    #[test]
    fn test_phase_transition_at_threshold() {
        let mut state = BossState::for_kind(EnemyKind::HiveTyrant);
        assert_eq!(state.phase().name, "Normal");

        let outcome = state.advance(0.5);
        assert_eq!(outcome.phase_entered, Some("Enraged"));
        assert_eq!(state.phase().name, "Enraged");
        assert!((state.phase().damage_mult - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_phase_transitions_are_monotonic() {
        let mut state = BossState::for_kind(EnemyKind::HiveTyrant);

        state.advance(0.4);
        assert_eq!(state.phase().name, "Enraged");

        // Health back above the threshold does not revert the phase.
        state.advance(0.9);
        assert_eq!(state.phase().name, "Enraged");
    }

    #[test]
    fn test_deep_damage_skips_to_final() {
        let mut state = BossState::for_kind(EnemyKind::Swarmlord);

        let outcome = state.advance(0.1);
        assert_eq!(outcome.phase_entered, Some("Final"));
        assert_eq!(state.phase().name, "Final");
    }

    #[test]
    fn test_phase_transition_restarts_rotation() {
        let mut state = BossState::for_kind(EnemyKind::HiveTyrant);

        // Burn into the middle of the Normal rotation.
        for _ in 0..350 {
            state.advance(1.0);
        }

        let outcome = state.advance(0.45);
        assert_eq!(outcome.phase_entered, Some("Enraged"));
        // The new rotation restarts from its first step.
        let fired = outcome.fired.expect("rotation restart");
        assert_eq!(fired.name(), "Psychic Storm");
    }

    #[test]
    fn test_non_boss_kind_is_inert() {
        let mut state = BossState::for_kind(EnemyKind::Gaunt);
        for _ in 0..100 {
            let outcome = state.advance(0.1);
            assert!(outcome.fired.is_none());
        }
    }
}
