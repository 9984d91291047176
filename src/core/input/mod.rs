//=========================================================================
// Input
//=========================================================================
//
// Keyboard and mouse handling on the logic thread.
//
// Components:
// - `event`: platform-neutral input events
// - `state_tracker`: held keys/buttons, per-frame transitions, pointer
// - `controls`: key bindings and the `InputSource` polling interface
//
//=========================================================================

//=== Module Declarations =================================================

pub mod controls;
pub mod event;
mod state_tracker;

//=== Public API ==========================================================

pub use controls::{Control, ControlMap, ControlState, InputSource, PointerState};
pub use event::{InputEvent, KeyCode, MouseButton};
pub use state_tracker::StateTracker;
