//=========================================================================
// Windowhop Library Root
//=========================================================================
//
// A platformer whose level geometry is a stack of nested, movable
// windows.
//
// Responsibilities:
// - Expose the engine facade (`EngineBuilder`, `Engine`)
// - Expose `core` (geometry, spatial model, effects, motion, game) for
//   headless use and custom surfaces
// - Keep the Winit platform layer private
//
// Typical usage:
// ```no_run
// use windowhop::prelude::*;
//
// let stage = StageDefinition::new(
//     "intro",
//     Rect::new(0.0, 0.0, 800.0, 600.0),
//     Rect::new(20.0, 540.0, 40.0, 40.0),
//     Rect::new(700.0, 540.0, 40.0, 40.0),
// );
// EngineBuilder::new(vec![stage]).build()?.run()?;
// # Ok::<(), Box<dyn std::error::Error>>(())
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------

pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` owns the OS window and event loop and is not part of the
// public API.
//
mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use crate::core::platform_bridge::PlatformError;
pub use engine::{Engine, EngineBuilder};
