//=========================================================================
// Motion
//=========================================================================
//
// Per-entity, per-frame movement resolution and grounding.
//
// Architecture:
//   MovementContext::capture()   (snapshot under the spatial lock)
//     → correct_displacement()   (validate, axis-separated stepping)
//     → move_entity() commit     (bounds / MovementEffect, re-parent)
//   GroundContext::capture()
//     → GroundProbe::find_floor() (zones, windows, play-area fallback)
//
//=========================================================================

//=== Module Declarations =================================================

mod body;
mod grounding;
mod resolver;

//=== Public API ==========================================================

pub use body::{MotionBody, MotionState};
pub use grounding::{GroundContext, GroundProbe};
pub use resolver::{correct_displacement, move_entity, MoveOutcome, MovementContext};
