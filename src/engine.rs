//=========================================================================
// Engine
//=========================================================================
//
// Entry point: builds the game from stage definitions and runs it.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──run()──>  [Runtime]
//         │                          │
//         ├─ with_tps()              ├─ spatial()  / reporter()
//         ├─ with_channel_capacity() └─ run(): spawns logic thread,
//         ├─ with_settings()                  runs platform,
//         ├─ with_controls()                  blocks until exit
//         └─ with_surface()
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;

use crossbeam_channel::{bounded, Receiver, Sender};
use log::{error, info};

//=== Internal Dependencies ===============================================

use crate::core::game::Game;
use crate::core::geometry::Vec2;
use crate::core::input::{ControlMap, ControlState};
use crate::core::platform_bridge::{PlatformError, PlatformEvent};
use crate::core::settings::Settings;
use crate::core::spatial::SpatialManager;
use crate::core::stage::{StageDefinition, StageError};
use crate::core::surface::{RenderSurface, SurfaceReporter, TraceSurface};
use crate::core::CoreSystemsOrchestrator;
use crate::platform::Platform;

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **TPS**: 60.0 (logic updates per second)
/// - **Channel capacity**: 128 events
/// - **Settings**: [`Settings::default`]
/// - **Controls**: [`ControlMap::default`]
/// - **Surface**: [`TraceSurface`] (logs draw calls)
///
/// # Examples
///
/// ```no_run
/// use windowhop::EngineBuilder;
/// use windowhop::core::entity::Capability;
/// use windowhop::core::geometry::Rect;
/// use windowhop::core::stage::StageDefinition;
///
/// let stage = StageDefinition::new(
///     "first",
///     Rect::new(0.0, 0.0, 800.0, 600.0),
///     Rect::new(20.0, 540.0, 40.0, 40.0),
///     Rect::new(700.0, 540.0, 40.0, 40.0),
/// )
/// .with_window(Rect::new(200.0, 300.0, 300.0, 200.0), Capability::Movable);
///
/// EngineBuilder::new(vec![stage])
///     .with_tps(120.0)
///     .build()
///     .expect("valid stages")
///     .run()
///     .expect("platform available");
/// ```
pub struct EngineBuilder {
    stages: Vec<StageDefinition>,
    tps: f64,
    channel_capacity: usize,
    settings: Settings,
    controls: ControlMap,
    surface: Option<Box<dyn RenderSurface>>,
}

impl EngineBuilder {
    pub fn new(stages: Vec<StageDefinition>) -> Self {
        Self {
            stages,
            tps: 60.0,
            channel_capacity: 128,
            settings: Settings::default(),
            controls: ControlMap::default(),
            surface: None,
        }
    }

    /// Sets the target ticks per second for the logic thread.
    ///
    /// # Panics
    ///
    /// Panics if `tps <= 0.0`.
    pub fn with_tps(mut self, tps: f64) -> Self {
        assert!(tps > 0.0, "TPS must be positive, got {}", tps);
        self.tps = tps;
        self
    }

    /// Sets the channel capacity for platform → core communication.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Replaces the default key bindings.
    pub fn with_controls(mut self, controls: ControlMap) -> Self {
        self.controls = controls;
        self
    }

    /// Sets where frames are drawn.
    pub fn with_surface(mut self, surface: impl RenderSurface + 'static) -> Self {
        self.surface = Some(Box::new(surface));
        self
    }

    /// Validates the stages and loads the first one.
    ///
    /// # Errors
    ///
    /// Returns [`StageError`] if there are no stages or any stage is
    /// invalid.
    pub fn build(self) -> Result<Engine, StageError> {
        info!(
            target: "stage",
            "Building engine (TPS: {}, channel: {}, stages: {})",
            self.tps,
            self.channel_capacity,
            self.stages.len()
        );

        let game = Game::new(self.stages, self.settings)?;
        let inner_size = game
            .spatial()
            .read(|s| s.play_area())
            .map_or(Vec2::new(800.0, 600.0), |area| area.size());
        let (sender, receiver) = bounded(self.channel_capacity);
        let surface = self.surface.unwrap_or_else(|| Box::new(TraceSurface::new()));

        Ok(Engine {
            spatial: Arc::clone(game.spatial()),
            orchestrator: CoreSystemsOrchestrator::new(game, ControlState::new(self.controls), surface),
            inner_size,
            tps: self.tps,
            sender,
            receiver,
        })
    }
}

//=== Engine ==============================================================

/// Windowhop runtime.
///
/// # Architecture
///
/// ```text
/// Engine (Main Thread)
///   ├─► CoreSystemsOrchestrator (Logic Thread @ TPS)
///   │     └─► Game: input, surface events, player, effects, goal
///   │
///   └─► Platform (Event Loop)
///         └─► Window, Input Polling
///
/// Communication: bounded channel (PlatformEvent)
/// Shared state:  Arc<SpatialManager>
/// ```
pub struct Engine {
    spatial: Arc<SpatialManager>,
    orchestrator: CoreSystemsOrchestrator,
    inner_size: Vec2,
    tps: f64,
    sender: Sender<PlatformEvent>,
    receiver: Receiver<PlatformEvent>,
}

impl Engine {
    /// Shared spatial state, readable from any thread.
    pub fn spatial(&self) -> Arc<SpatialManager> {
        Arc::clone(&self.spatial)
    }

    /// Handle for reporting window geometry changes from other threads.
    pub fn reporter(&self) -> SurfaceReporter {
        SurfaceReporter::new(self.sender.clone())
    }

    /// Runs the engine and blocks until the window closes.
    ///
    /// # Lifecycle
    ///
    /// 1. Spawns the logic thread at the configured TPS
    /// 2. Runs the platform event loop (blocks here)
    /// 3. On close: platform sends `WindowClosed`, logic thread exits
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the event loop cannot start or fails.
    /// The logic thread is still shut down and joined in that case.
    pub fn run(self) -> Result<(), PlatformError> {
        info!(target: "platform", "Starting engine runtime (TPS: {})", self.tps);

        let Self {
            orchestrator,
            inner_size,
            tps,
            sender,
            receiver,
            ..
        } = self;

        let core_handle = orchestrator.spawn_core_thread(receiver, tps);
        info!(target: "platform", "Core logic thread spawned");

        let result = Platform::new(sender.clone(), inner_size).run();
        if let Err(e) = &result {
            error!(target: "platform", "Platform error: {}", e);
            let _ = sender.send(PlatformEvent::WindowClosed);
        }
        drop(sender);

        match core_handle.join() {
            Ok(()) => info!(target: "platform", "Core thread terminated cleanly"),
            Err(e) => error!(target: "platform", "Core thread panicked: {:?}", e),
        }

        info!(target: "platform", "Engine shutdown complete");
        result
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::{Capability, EntityKind};
    use crate::core::geometry::Rect;
    use crate::core::surface::SurfaceEvent;

    fn stages() -> Vec<StageDefinition> {
        vec![StageDefinition::new(
            "test",
            Rect::new(0.0, 0.0, 640.0, 480.0),
            Rect::new(10.0, 440.0, 40.0, 40.0),
            Rect::new(500.0, 440.0, 40.0, 40.0),
        )
        .with_window(Rect::new(100.0, 100.0, 200.0, 200.0), Capability::Movable)]
    }

    //=====================================================================
    // EngineBuilder Tests
    //=====================================================================

    #[test]
    fn builder_defaults() {
        let builder = EngineBuilder::new(stages());
        assert_eq!(builder.tps, 60.0);
        assert_eq!(builder.channel_capacity, 128);
        assert_eq!(builder.settings, Settings::default());
        assert!(builder.surface.is_none());
    }

    #[test]
    fn builder_with_tps() {
        let builder = EngineBuilder::new(stages()).with_tps(120.0);
        assert_eq!(builder.tps, 120.0);
    }

    #[test]
    #[should_panic(expected = "TPS must be positive")]
    fn builder_with_tps_panics_on_zero() {
        EngineBuilder::new(stages()).with_tps(0.0);
    }

    #[test]
    #[should_panic(expected = "TPS must be positive")]
    fn builder_with_tps_panics_on_negative() {
        EngineBuilder::new(stages()).with_tps(-60.0);
    }

    #[test]
    fn builder_with_channel_capacity() {
        let builder = EngineBuilder::new(stages()).with_channel_capacity(256);
        assert_eq!(builder.channel_capacity, 256);
    }

    #[test]
    #[should_panic(expected = "Channel capacity must be positive")]
    fn builder_with_channel_capacity_panics_on_zero() {
        EngineBuilder::new(stages()).with_channel_capacity(0);
    }

    #[test]
    fn build_rejects_empty_stage_list() {
        assert!(matches!(EngineBuilder::new(Vec::new()).build(), Err(StageError::NoStages)));
    }

    #[test]
    fn build_sizes_window_to_play_area() {
        let engine = EngineBuilder::new(stages())
            .with_tps(120.0)
            .with_surface(TraceSurface::new())
            .build()
            .unwrap();

        assert_eq!(engine.tps, 120.0);
        assert_eq!(engine.inner_size, Vec2::new(640.0, 480.0));
        assert_eq!(engine.spatial().read(|s| s.window_count()), 1);
        assert_eq!(engine.spatial().read(|s| s.entities_of_kind(EntityKind::Player).len()), 1);
    }

    #[test]
    fn reporter_feeds_engine_channel() {
        let engine = EngineBuilder::new(stages()).build().unwrap();
        let window = engine.spatial().read(|s| s.z_order()[0]);

        assert!(engine.reporter().report(SurfaceEvent::Activated(window)));
        match engine.receiver.try_recv() {
            Ok(PlatformEvent::Surface(SurfaceEvent::Activated(id))) => assert_eq!(id, window),
            other => panic!("Expected surface event, got {:?}", other),
        }
    }
}
