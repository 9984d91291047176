//=========================================================================
// Platform Bridge
//=========================================================================
//
// Bridges the platform layer (winit) and external surface producers with
// the logic thread.
//
// Components:
// - `interface`: event types and error definitions (the contract)
// - `event_collector`: logic-side draining and batching
//
//=========================================================================

//=== Module Declarations =================================================

pub(crate) mod event_collector;
pub(crate) mod interface;

//=== Internal API ========================================================

pub(crate) use event_collector::{EventCollector, TickControl};
pub use interface::PlatformError;
pub(crate) use interface::PlatformEvent;
