//=========================================================================
// Input Events
//=========================================================================
//
// Platform-neutral keyboard and mouse events.
//
// Event Flow:
// ```text
// Platform Layer (winit)
//         ↓
//    InputEvent (this module)
//         ↓
//    StateTracker (held / pressed / released, pointer)
//         ↓
//    ControlState (game controls)
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::hash::{Hash, Hasher};

//=== MouseButton =========================================================

/// Physical mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Drags windows.
    Left,
    /// Minimizes windows.
    Right,
    Middle,
    /// Side buttons and anything else.
    Other,
}

//=== KeyCode =============================================================

/// Physical key location (layout independent).
///
/// Covers the keys the default control map uses plus a few common ones
/// for custom bindings. Anything else arrives as `Unidentified` and is
/// dropped by the platform layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    //--- Letters ----------------------------------------------------------
    KeyA,
    KeyD,
    KeyR,
    KeyS,
    KeyW,
    KeyZ,

    //--- Arrows -----------------------------------------------------------
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    ArrowUp,

    //--- Special ----------------------------------------------------------
    Space,
    Enter,
    Escape,
    Backspace,

    Unidentified,
}

//=== InputEvent ==========================================================

/// Low-level input event.
///
/// `MouseMoved` events compare and hash equal regardless of coordinates so
/// a frame buffer can coalesce them (last position wins).
#[derive(Debug, Clone, Copy)]
pub enum InputEvent {
    KeyDown(KeyCode),
    KeyUp(KeyCode),
    MouseButtonDown(MouseButton),
    MouseButtonUp(MouseButton),
    /// Cursor position in stage coordinates (pixels, top-left origin).
    MouseMoved { x: f32, y: f32 },
}

impl InputEvent {
    /// `true` for events whose order matters (keys, buttons).
    pub fn is_discrete(&self) -> bool {
        !matches!(self, Self::MouseMoved { .. })
    }
}

//--- Trait Implementations -----------------------------------------------

impl PartialEq for InputEvent {
    fn eq(&self, other: &Self) -> bool {
        use InputEvent::*;
        match (self, other) {
            (KeyDown(a), KeyDown(b)) | (KeyUp(a), KeyUp(b)) => a == b,
            (MouseButtonDown(a), MouseButtonDown(b)) | (MouseButtonUp(a), MouseButtonUp(b)) => a == b,
            (MouseMoved { .. }, MouseMoved { .. }) => true,
            _ => false,
        }
    }
}

impl Eq for InputEvent {}

impl Hash for InputEvent {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::KeyDown(key) | Self::KeyUp(key) => key.hash(state),
            Self::MouseButtonDown(button) | Self::MouseButtonUp(button) => button.hash(state),
            Self::MouseMoved { .. } => {}
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
