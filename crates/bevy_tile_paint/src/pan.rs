//! Pan gesture with inertia for the tile set and scene views

use bevy_log::debug;
use bevy_math::Vec2;
use serde::{Deserialize, Serialize};

/// Inertia settings of a pan gesture
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PanSettings {
    /// Fraction of the velocity kept after one second of inertia
    pub friction: f32,
    /// Speed (pixels per second) under which the view stops
    pub min_inertia_speed: f32,
}

impl Default for PanSettings {
    fn default() -> Self {
        Self {
            friction: 0.04,
            min_inertia_speed: 30.0,
        }
    }
}

/// Current phase of a pan gesture
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PanState {
    #[default]
    Idle,
    /// The pointer is down and drags the view
    Tracking { last_position: Vec2, velocity: Vec2 },
    /// The pointer was released while moving: the view keeps sliding
    Inertia { velocity: Vec2 },
    Ended,
}

/// Pan gesture recognizer, owned by the view it moves.
///
/// Pointer handlers and the frame update return the displacement to apply to the view.
#[derive(Debug, Clone, Default)]
pub struct PanGesture {
    settings: PanSettings,
    state: PanState,
}

impl PanGesture {
    pub fn new(settings: PanSettings) -> Self {
        Self {
            settings,
            state: PanState::Idle,
        }
    }

    pub fn settings(&self) -> &PanSettings {
        &self.settings
    }

    pub fn state(&self) -> PanState {
        self.state
    }

    /// True while the view is dragged or sliding
    pub fn is_active(&self) -> bool {
        matches!(self.state, PanState::Tracking { .. } | PanState::Inertia { .. })
    }

    /// Start tracking. Stops any inertia of a previous gesture.
    pub fn pointer_down(&mut self, position: Vec2) {
        self.state = PanState::Tracking {
            last_position: position,
            velocity: Vec2::ZERO,
        };
    }

    /// Displacement since the last pointer position. `elapsed` is in seconds.
    pub fn pointer_move(&mut self, position: Vec2, elapsed: f32) -> Vec2 {
        let PanState::Tracking {
            last_position,
            velocity,
        } = &mut self.state
        else {
            return Vec2::ZERO;
        };
        let delta = position - *last_position;
        if elapsed > 0.0 {
            *velocity = delta / elapsed;
        }
        *last_position = position;
        delta
    }

    /// Release the pointer: slide if it was moving fast enough, stop otherwise
    pub fn pointer_up(&mut self) {
        if let PanState::Tracking { velocity, .. } = self.state {
            let fast = velocity.is_finite() && velocity.length() >= self.settings.min_inertia_speed;
            self.state = if fast {
                debug!("Pan inertia at {:?} px/s", velocity);
                PanState::Inertia { velocity }
            } else {
                PanState::Ended
            };
        }
    }

    /// Advance inertia by `elapsed` seconds and return the displacement
    pub fn update(&mut self, elapsed: f32) -> Vec2 {
        let PanState::Inertia { velocity } = self.state else {
            return Vec2::ZERO;
        };
        if elapsed <= 0.0 {
            return Vec2::ZERO;
        }
        let displacement = velocity * elapsed;
        let velocity = velocity * self.settings.friction.clamp(0.0, 1.0).powf(elapsed);
        self.state = if velocity.length() < self.settings.min_inertia_speed {
            PanState::Ended
        } else {
            PanState::Inertia { velocity }
        };
        displacement
    }

    /// Back to idle, dropping any inertia
    pub fn cancel(&mut self) {
        self.state = PanState::Idle;
    }
}
