//=========================================================================
// Motion Body
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::settings::Settings;

//=== MotionState =========================================================

/// Coarse motion state, used for logging and rendering hints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MotionState {
    #[default]
    Idle,
    Running,
    Jumping,
    Falling,
}

//=== MotionBody ==========================================================

/// Vertical velocity and grounded flag of a moving entity.
///
/// Horizontal motion is input-driven each frame and not integrated.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotionBody {
    velocity_y: f32,
    grounded: bool,
    state: MotionState,
}

impl MotionBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn velocity_y(&self) -> f32 {
        self.velocity_y
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn state(&self) -> MotionState {
        self.state
    }

    /// `true` while moving upward; grounding is skipped in this phase.
    pub fn is_rising(&self) -> bool {
        self.velocity_y < 0.0
    }

    /// Integrates gravity for one frame, capped at the max fall speed.
    /// Grounded bodies keep a zero velocity.
    pub fn integrate(&mut self, settings: &Settings) {
        if self.grounded {
            self.velocity_y = 0.0;
            return;
        }
        self.velocity_y = (self.velocity_y + settings.gravity).min(settings.max_fall_speed);
    }

    /// Starts a jump. Returns `false` when airborne.
    pub fn jump(&mut self, force: f32) -> bool {
        if !self.grounded {
            return false;
        }
        self.velocity_y = -force;
        self.grounded = false;
        self.state = MotionState::Jumping;
        true
    }

    /// Transition into grounded: zero vertical velocity, neutral state.
    ///
    /// Returns `true` on the first frame of contact.
    pub fn land(&mut self) -> bool {
        let first = !self.grounded;
        self.grounded = true;
        self.velocity_y = 0.0;
        if first {
            self.state = MotionState::Idle;
        }
        first
    }

    /// Leaves the ground without jumping (walked off an edge).
    pub fn lose_ground(&mut self) {
        self.grounded = false;
    }

    /// Ceiling hit while rising.
    pub fn stop_rising(&mut self) {
        if self.velocity_y < 0.0 {
            self.velocity_y = 0.0;
        }
    }

    /// Derives the motion state from this frame's horizontal displacement.
    pub fn update_state(&mut self, dx: f32) {
        self.state = if !self.grounded {
            if self.velocity_y < 0.0 {
                MotionState::Jumping
            } else {
                MotionState::Falling
            }
        } else if dx != 0.0 {
            MotionState::Running
        } else {
            MotionState::Idle
        };
    }

    /// Clears all motion, used when respawning.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
