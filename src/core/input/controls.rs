//=========================================================================
// Controls
//=========================================================================
//
// Maps physical keys to game controls and exposes them through the
// `InputSource` polling interface.
//
// Architecture:
//   KeyCode → ControlMap (HashMap) → Control
//   StateTracker + ControlMap → ControlState: InputSource
//
// Several keys may drive the same control; a control is down while any
// of its keys is held.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

//=== Internal Dependencies ===============================================

use super::event::{InputEvent, KeyCode, MouseButton};
use super::state_tracker::StateTracker;
use crate::core::geometry::Vec2;

//=== Control =============================================================

/// Game-level control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    MoveLeft,
    MoveRight,
    Jump,
    /// Brings back the most recently minimized window.
    Restore,
    /// Reloads the current stage.
    Restart,
}

//=== PointerState ========================================================

/// Pointer snapshot for window manipulation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    pub position: Vec2,
    pub left_pressed: bool,
    pub left_down: bool,
    pub left_released: bool,
    pub right_pressed: bool,
}

//=== InputSource =========================================================

/// Polled input, consumed once per frame by the game.
pub trait InputSource {
    fn is_down(&self, control: Control) -> bool;
    fn was_pressed(&self, control: Control) -> bool;
    fn pointer(&self) -> PointerState;
}

//=== ControlMap ==========================================================

/// Key → control bindings.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlMap {
    bindings: HashMap<KeyCode, Control>,
}

impl ControlMap {
    /// Creates an empty map.
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Binds `key` to `control`, replacing any previous binding of `key`.
    pub fn bind(&mut self, key: KeyCode, control: Control) {
        self.bindings.insert(key, control);
    }

    pub fn unbind(&mut self, key: KeyCode) {
        self.bindings.remove(&key);
    }

    pub fn control_for(&self, key: KeyCode) -> Option<Control> {
        self.bindings.get(&key).copied()
    }

    /// All keys bound to `control`.
    pub fn keys_for(&self, control: Control) -> impl Iterator<Item = KeyCode> + '_ {
        self.bindings
            .iter()
            .filter(move |(_, c)| **c == control)
            .map(|(&k, _)| k)
    }
}

impl Default for ControlMap {
    /// Arrows or A/D to walk, Space/W/Up to jump, Z to restore, R to restart.
    fn default() -> Self {
        let mut map = Self::empty();
        map.bind(KeyCode::ArrowLeft, Control::MoveLeft);
        map.bind(KeyCode::KeyA, Control::MoveLeft);
        map.bind(KeyCode::ArrowRight, Control::MoveRight);
        map.bind(KeyCode::KeyD, Control::MoveRight);
        map.bind(KeyCode::Space, Control::Jump);
        map.bind(KeyCode::KeyW, Control::Jump);
        map.bind(KeyCode::ArrowUp, Control::Jump);
        map.bind(KeyCode::KeyZ, Control::Restore);
        map.bind(KeyCode::KeyR, Control::Restart);
        map
    }
}

//=== ControlState ========================================================

/// Tracker plus bindings; the concrete `InputSource` fed by the platform.
#[derive(Debug, Default)]
pub struct ControlState {
    tracker: StateTracker,
    map: ControlMap,
}

impl ControlState {
    pub fn new(map: ControlMap) -> Self {
        Self {
            tracker: StateTracker::new(),
            map,
        }
    }

    pub fn map_mut(&mut self) -> &mut ControlMap {
        &mut self.map
    }

    pub fn tracker(&self) -> &StateTracker {
        &self.tracker
    }

    /// Feeds one frame of input batches.
    pub fn update<'a>(&mut self, batches: impl IntoIterator<Item = &'a [InputEvent]>) {
        self.tracker.begin_frame();
        for batch in batches {
            self.tracker.process_events(batch);
        }
        self.tracker.finalize_frame();
    }
}

impl InputSource for ControlState {
    fn is_down(&self, control: Control) -> bool {
        self.map.keys_for(control).any(|k| self.tracker.is_key_down(k))
    }

    fn was_pressed(&self, control: Control) -> bool {
        self.map.keys_for(control).any(|k| self.tracker.is_key_pressed(k))
    }

    fn pointer(&self) -> PointerState {
        PointerState {
            position: self.tracker.mouse_position(),
            left_pressed: self.tracker.is_button_pressed(MouseButton::Left),
            left_down: self.tracker.is_button_down(MouseButton::Left),
            left_released: self.tracker.is_button_released(MouseButton::Left),
            right_pressed: self.tracker.is_button_pressed(MouseButton::Right),
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
