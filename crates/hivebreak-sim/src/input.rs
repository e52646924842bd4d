//! Input handling for player controls.
//!
//! This module provides the input abstraction between the shell (windowing,
//! keyboard) and the simulation: discrete input events are enqueued from the
//! outside and drained exactly once per tick into a [`PlayerIntent`].

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// 2D vector for positions and directions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
}

impl Vec2 {
    /// Zero vector.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Unit vector pointing up (screen coordinates).
    pub const UP: Self = Self { x: 0.0, y: -1.0 };

    /// Unit vector pointing down.
    pub const DOWN: Self = Self { x: 0.0, y: 1.0 };

    /// Unit vector pointing left.
    pub const LEFT: Self = Self { x: -1.0, y: 0.0 };

    /// Unit vector pointing right.
    pub const RIGHT: Self = Self { x: 1.0, y: 0.0 };

    /// Creates a new Vec2.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the length (magnitude) of the vector.
    #[must_use]
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Returns a normalized (unit length) version of the vector.
    /// Returns the zero vector if the vector has zero length.
    #[must_use]
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self {
                x: self.x / len,
                y: self.y / len,
            }
        } else {
            Self::ZERO
        }
    }

    /// Dot product of two vectors.
    #[must_use]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Scale the vector by a scalar.
    #[must_use]
    pub fn scale(self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }

    /// Distance between two points.
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        (self - other).length()
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self::Output {
        self.scale(rhs)
    }
}

impl std::ops::AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

/// A discrete input event delivered by the shell.
///
/// Events are queued between ticks and consumed at the start of the next tick
/// (step 1 of the update order); they never mutate simulation state directly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Movement axis for this tick. The vector is clamped to unit length.
    Move(Vec2),
    /// Fire the active ranged weapon.
    Fire,
    /// Swing a melee attack.
    Melee,
    /// Reload the active weapon.
    Reload,
    /// Cycle to the next weapon.
    NextWeapon,
    /// Interact with a nearby NPC (opens, advances, or closes dialogue).
    Interact,
    /// Toggle pause.
    Pause,
    /// Toggle fullscreen. The simulation only records the request; the shell
    /// owns the actual window state.
    FullscreenToggle,
    /// Quit the game.
    Quit,
}

/// FIFO queue of pending input events.
#[derive(Debug, Default)]
pub struct InputQueue {
    events: VecDeque<InputEvent>,
}

impl InputQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueues an event for the next tick.
    pub fn push(&mut self, event: InputEvent) {
        self.events.push_back(event);
    }

    /// Returns the number of pending events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns whether the queue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drains all pending events into a per-tick intent.
    pub fn drain_intent(&mut self) -> PlayerIntent {
        let mut intent = PlayerIntent::default();
        while let Some(event) = self.events.pop_front() {
            intent.absorb(event);
        }
        intent
    }
}

/// The player's collected intent for a single tick.
///
/// Multiple events of the same kind within one tick collapse into a single
/// action; the last movement axis wins.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerIntent {
    /// Movement axis, unit length or zero.
    pub move_axis: Vec2,
    /// Fire requested.
    pub fire: bool,
    /// Melee requested.
    pub melee: bool,
    /// Reload requested.
    pub reload: bool,
    /// Weapon cycle requested.
    pub next_weapon: bool,
    /// Interaction requested.
    pub interact: bool,
    /// Pause toggle requested.
    pub pause: bool,
    /// Fullscreen toggle requested.
    pub fullscreen: bool,
    /// Quit requested.
    pub quit: bool,
}

impl PlayerIntent {
    /// Folds a single event into this intent.
    fn absorb(&mut self, event: InputEvent) {
        match event {
            InputEvent::Move(axis) => {
                let len = axis.length();
                self.move_axis = if len > 1.0 { axis.normalized() } else { axis };
            }
            InputEvent::Fire => self.fire = true,
            InputEvent::Melee => self.melee = true,
            InputEvent::Reload => self.reload = true,
            InputEvent::NextWeapon => self.next_weapon = true,
            InputEvent::Interact => self.interact = true,
            InputEvent::Pause => self.pause = true,
            InputEvent::FullscreenToggle => self.fullscreen = true,
            InputEvent::Quit => self.quit = true,
        }
    }
}
