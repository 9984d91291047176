//=========================================================================
// Display Surface
//=========================================================================
//
// Both directions of the boundary between the game and whatever shows
// the windows on screen.
//
//   outbound: RenderSurface receives EntityViews back to front each frame
//   inbound:  SurfaceEvents (window moved, resized, closed, ...) are queued
//             through SurfaceReporter and drained at frame start
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::Sender;
use log::{trace, warn};

//=== Internal Dependencies ===============================================

use crate::core::entity::{EntityId, EntityView};
use crate::core::geometry::Vec2;
use crate::core::platform_bridge::PlatformEvent;

//=== SurfaceEvent ========================================================

/// Notification about a window, from a display surface or the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceEvent {
    /// Window top-left moved to `position`.
    Moved { id: EntityId, position: Vec2 },
    /// Window size changed to `size`.
    Resized { id: EntityId, size: Vec2 },
    /// Window was focused / clicked.
    Activated(EntityId),
    Closed(EntityId),
    Minimized(EntityId),
    Restored(EntityId),
}

//=== SurfaceReporter =====================================================

/// Cloneable handle for external producers of surface events.
///
/// Safe to use from any thread; events reach the logic thread in the
/// order they were reported.
#[derive(Debug, Clone)]
pub struct SurfaceReporter {
    sender: Sender<PlatformEvent>,
}

impl SurfaceReporter {
    pub(crate) fn new(sender: Sender<PlatformEvent>) -> Self {
        Self { sender }
    }

    /// Queues an event. Returns `false` if the logic thread has exited.
    pub fn report(&self, event: SurfaceEvent) -> bool {
        if self.sender.send(PlatformEvent::Surface(event)).is_err() {
            warn!(target: "platform", "Surface event dropped, channel disconnected: {:?}", event);
            return false;
        }
        true
    }
}

//=== RenderSurface =======================================================

/// Receives the visible world once per frame, back to front.
pub trait RenderSurface: Send {
    fn begin_frame(&mut self, _frame: u64) {}

    fn draw(&mut self, view: &EntityView);

    fn end_frame(&mut self) {}
}

//=== TraceSurface ========================================================

/// Default surface: logs each frame at `trace` level.
#[derive(Debug, Default)]
pub struct TraceSurface {
    frame: u64,
    drawn: usize,
}

impl TraceSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entities drawn in the last completed or current frame.
    pub fn drawn(&self) -> usize {
        self.drawn
    }
}

impl RenderSurface for TraceSurface {
    fn begin_frame(&mut self, frame: u64) {
        self.frame = frame;
        self.drawn = 0;
    }

    fn draw(&mut self, view: &EntityView) {
        self.drawn += 1;
        trace!(target: "render", "{:?} {} at {:?} z={:?}", view.kind, view.id, view.bounds, view.z_index);
    }

    fn end_frame(&mut self) {
        trace!(target: "render", "Frame {} drew {} entities", self.frame, self.drawn);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
