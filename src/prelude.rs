//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use windowhop::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine
pub use crate::engine::{Engine, EngineBuilder};
pub use crate::PlatformError;

// Geometry and entities
pub use crate::core::entity::{Capability, EntityId, EntityKind, EntityView};
pub use crate::core::geometry::{Rect, Vec2};

// Stages and tuning
pub use crate::core::settings::Settings;
pub use crate::core::stage::{StageDefinition, StageError, WindowSpec};

// Game
pub use crate::core::game::{Game, GameStatus};
pub use crate::core::input::{Control, ControlMap, InputSource, KeyCode, MouseButton, PointerState};

// Spatial state
pub use crate::core::spatial::{MovableRegion, SpatialManager};

// Surfaces
pub use crate::core::surface::{RenderSurface, SurfaceEvent, SurfaceReporter, TraceSurface};
