//=========================================================================
// Drag Controller
//=========================================================================
//
// Direct window manipulation with the pointer.
//
//   left press    → Activated; starts a move (movable, parentless) or a
//                   resize (resizable, grabbed at the bottom-right grip)
//   left held     → Moved / Resized toward the pointer
//   right press   → Minimized (minimizable)
//
// Output is plain `SurfaceEvent`s, applied through the same path as
// notifications from an external display surface.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::entity::{Capability, EntityId};
use crate::core::geometry::{Rect, Vec2};
use crate::core::input::PointerState;
use crate::core::spatial::SpatialManager;
use crate::core::surface::SurfaceEvent;

/// Square at a window's bottom-right corner that starts a resize.
const RESIZE_GRIP: f32 = 16.0;

/// Smallest size a resize drag requests.
const MIN_DRAG_SIZE: f32 = 1.0;

//=== Drag State ==========================================================

#[derive(Debug, Clone, Copy, PartialEq)]
enum DragMode {
    /// Pointer offset from the window origin.
    Move { grab: Vec2 },
    Resize { start_size: Vec2, press: Vec2 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Drag {
    window: EntityId,
    mode: DragMode,
    last_target: Vec2,
}

#[derive(Debug, Clone, Copy)]
struct Hit {
    id: EntityId,
    bounds: Rect,
    capability: Capability,
    parented: bool,
}

//=== DragController ======================================================

#[derive(Debug, Default)]
pub struct DragController {
    active: Option<Drag>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Window currently being dragged.
    pub fn dragged(&self) -> Option<EntityId> {
        self.active.map(|d| d.window)
    }

    pub fn cancel(&mut self) {
        self.active = None;
    }

    /// Turns this frame's pointer state into surface events.
    pub fn update(&mut self, pointer: PointerState, spatial: &SpatialManager) -> Vec<SurfaceEvent> {
        let mut events = Vec::new();

        if pointer.right_pressed {
            if let Some(hit) = pick(spatial, pointer.position) {
                if hit.capability == Capability::Minimizable {
                    events.push(SurfaceEvent::Minimized(hit.id));
                }
            }
        }

        if pointer.left_pressed {
            self.active = pick(spatial, pointer.position).and_then(|hit| {
                events.push(SurfaceEvent::Activated(hit.id));
                begin(hit, pointer.position)
            });
        } else if let Some(drag) = self.active.as_mut() {
            if pointer.left_down {
                if let Some(event) = follow(drag, pointer.position) {
                    events.push(event);
                }
            }
        }

        if pointer.left_released || !pointer.left_down {
            self.active = None;
        }
        events
    }
}

//--- Helpers ---------------------------------------------------------------

fn pick(spatial: &SpatialManager, point: Vec2) -> Option<Hit> {
    spatial.read(|stack| {
        let id = stack.front_window_at_point(point)?;
        let entity = stack.get(id)?;
        Some(Hit {
            id,
            bounds: entity.bounds(),
            capability: entity.capability(),
            parented: entity.parent().is_some(),
        })
    })
}

fn begin(hit: Hit, point: Vec2) -> Option<Drag> {
    let grip = Rect::new(
        hit.bounds.right() - RESIZE_GRIP,
        hit.bounds.bottom() - RESIZE_GRIP,
        RESIZE_GRIP,
        RESIZE_GRIP,
    );

    let mode = if hit.capability == Capability::Resizable && grip.contains_point(point) {
        DragMode::Resize {
            start_size: hit.bounds.size(),
            press: point,
        }
    } else if hit.capability == Capability::Movable && !hit.parented {
        DragMode::Move {
            grab: point - hit.bounds.position(),
        }
    } else {
        return None;
    };

    let last_target = match mode {
        DragMode::Move { .. } => hit.bounds.position(),
        DragMode::Resize { start_size, .. } => start_size,
    };
    Some(Drag {
        window: hit.id,
        mode,
        last_target,
    })
}

fn follow(drag: &mut Drag, point: Vec2) -> Option<SurfaceEvent> {
    let target = match drag.mode {
        DragMode::Move { grab } => point - grab,
        DragMode::Resize { start_size, press } => {
            let size = start_size + (point - press);
            Vec2::new(size.x.max(MIN_DRAG_SIZE), size.y.max(MIN_DRAG_SIZE))
        }
    };
    if target == drag.last_target {
        return None;
    }
    drag.last_target = target;

    Some(match drag.mode {
        DragMode::Move { .. } => SurfaceEvent::Moved {
            id: drag.window,
            position: target,
        },
        DragMode::Resize { .. } => SurfaceEvent::Resized {
            id: drag.window,
            size: target,
        },
    })
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn press(x: f32, y: f32) -> PointerState {
        PointerState {
            position: Vec2::new(x, y),
            left_pressed: true,
            left_down: true,
            ..Default::default()
        }
    }

    fn hold(x: f32, y: f32) -> PointerState {
        PointerState {
            position: Vec2::new(x, y),
            left_down: true,
            ..Default::default()
        }
    }

    #[test]
    fn dragging_movable_window_emits_moves() {
        let spatial = SpatialManager::new(5.0);
        let w = spatial.register_window(Rect::new(100.0, 100.0, 300.0, 200.0), Capability::Movable);
        let mut drag = DragController::new();

        assert_eq!(drag.update(press(150.0, 120.0), &spatial), vec![SurfaceEvent::Activated(w)]);
        assert_eq!(drag.dragged(), Some(w));

        let events = drag.update(hold(170.0, 130.0), &spatial);
        assert_eq!(
            events,
            vec![SurfaceEvent::Moved {
                id: w,
                position: Vec2::new(120.0, 110.0)
            }]
        );

        assert!(drag.update(hold(170.0, 130.0), &spatial).is_empty());
        drag.update(PointerState::default(), &spatial);
        assert_eq!(drag.dragged(), None);
    }

    #[test]
    fn grip_starts_resize() {
        let spatial = SpatialManager::new(5.0);
        let w = spatial.register_window(Rect::new(100.0, 100.0, 200.0, 200.0), Capability::Resizable);
        let mut drag = DragController::new();

        drag.update(press(295.0, 295.0), &spatial);
        let events = drag.update(hold(395.0, 295.0), &spatial);

        assert_eq!(
            events,
            vec![SurfaceEvent::Resized {
                id: w,
                size: Vec2::new(300.0, 200.0)
            }]
        );
    }

    #[test]
    fn fixed_window_only_activates() {
        let spatial = SpatialManager::new(5.0);
        let w = spatial.register_window(Rect::new(0.0, 0.0, 200.0, 200.0), Capability::None);
        let mut drag = DragController::new();

        assert_eq!(drag.update(press(50.0, 50.0), &spatial), vec![SurfaceEvent::Activated(w)]);
        assert_eq!(drag.dragged(), None);
        assert!(drag.update(hold(80.0, 80.0), &spatial).is_empty());
    }

    #[test]
    fn right_click_minimizes_only_minimizable() {
        let spatial = SpatialManager::new(5.0);
        let m = spatial.register_window(Rect::new(0.0, 0.0, 200.0, 200.0), Capability::Minimizable);
        spatial.register_window(Rect::new(300.0, 0.0, 200.0, 200.0), Capability::None);
        let mut drag = DragController::new();

        let right = |x: f32| PointerState {
            position: Vec2::new(x, 50.0),
            right_pressed: true,
            ..Default::default()
        };

        assert_eq!(drag.update(right(50.0), &spatial), vec![SurfaceEvent::Minimized(m)]);
        assert!(drag.update(right(350.0), &spatial).is_empty());
    }

    #[test]
    fn parented_movable_window_is_not_dragged() {
        let spatial = SpatialManager::new(5.0);
        spatial.register_window(Rect::new(0.0, 0.0, 400.0, 400.0), Capability::None);
        let inner = spatial.register_window(Rect::new(50.0, 50.0, 100.0, 100.0), Capability::Movable);
        spatial.refresh_containment();
        let mut drag = DragController::new();

        assert_eq!(drag.update(press(60.0, 60.0), &spatial), vec![SurfaceEvent::Activated(inner)]);
        assert_eq!(drag.dragged(), None);
    }
}
