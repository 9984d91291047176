//=========================================================================
// Core Systems Orchestrator
//=========================================================================
//
// Runs the game on the logic (non-platform) thread at a fixed tick rate.
//
// Architecture:
//   Receiver<PlatformEvent>
//     → EventCollector      (bounded drain, shutdown detection)
//     → ControlState        (input batches → held/pressed controls)
//     → Game::update()      (surface events, player, effects, goal)
//     → Game::render()      (views → RenderSurface)
//     → sleep out the remaining frame budget
//
// The platform thread only talks to this loop through the channel; the
// spatial state is shared separately through `Arc<SpatialManager>`.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod effects;
pub mod entity;
pub mod game;
pub mod geometry;
pub mod input;
pub mod motion;
pub(crate) mod platform_bridge;
pub mod settings;
pub mod spatial;
pub mod stage;
pub mod surface;

//=== External Dependencies ===============================================

use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::Receiver;
use log::info;

//=== Internal Dependencies ===============================================

use game::{Game, GameStatus};
use input::ControlState;
use platform_bridge::{EventCollector, PlatformEvent, TickControl};
use surface::RenderSurface;

//=== CoreSystemsOrchestrator =============================================

/// Owns the game and everything it needs on the logic thread.
pub(crate) struct CoreSystemsOrchestrator {
    game: Game,
    controls: ControlState,
    surface: Box<dyn RenderSurface>,
}

impl CoreSystemsOrchestrator {
    pub(crate) fn new(game: Game, controls: ControlState, surface: Box<dyn RenderSurface>) -> Self {
        Self {
            game,
            controls,
            surface,
        }
    }

    /// Spawns the logic thread ticking at `tps`.
    ///
    /// Each tick:
    ///  1. Drains platform events (exits on close or disconnect)
    ///  2. Feeds input batches to the control state
    ///  3. Updates and renders the game
    ///  4. Sleeps to maintain fixed pacing
    pub(crate) fn spawn_core_thread(
        self,
        receiver: Receiver<PlatformEvent>,
        tps: f64,
    ) -> thread::JoinHandle<()> {
        let frame_duration = Duration::from_secs_f64(1.0 / tps);

        thread::spawn(move || {
            let Self {
                mut game,
                mut controls,
                mut surface,
            } = self;
            let mut collector = EventCollector::new(receiver);
            let mut last_status = game.status();

            loop {
                let frame_start = Instant::now();

                if collector.collect_frame() == TickControl::Exit {
                    info!(target: "platform", "Core thread exiting");
                    break;
                }

                controls.update(collector.batches().iter().map(Vec::as_slice));
                let status = game.update(&controls, collector.take_surface_events());
                game.render(surface.as_mut());

                if status != last_status {
                    if status == GameStatus::Cleared {
                        info!(target: "stage", "Game cleared");
                    }
                    last_status = status;
                }

                let elapsed = frame_start.elapsed();
                if elapsed < frame_duration {
                    thread::sleep(frame_duration - elapsed);
                }
            }
        })
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::{Capability, EntityKind, EntityView};
    use crate::core::geometry::{Rect, Vec2};
    use crate::core::input::{InputEvent, KeyCode};
    use crate::core::settings::Settings;
    use crate::core::stage::StageDefinition;
    use crate::core::surface::SurfaceEvent;
    use crossbeam_channel::unbounded;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedRecorder {
        frames: Arc<Mutex<u64>>,
    }

    impl RenderSurface for SharedRecorder {
        fn begin_frame(&mut self, frame: u64) {
            if let Ok(mut f) = self.frames.lock() {
                *f = frame;
            }
        }

        fn draw(&mut self, _view: &EntityView) {}
    }

    fn game() -> Game {
        let stage = StageDefinition::new(
            "loop",
            Rect::new(0.0, 0.0, 800.0, 600.0),
            Rect::new(100.0, 560.0, 40.0, 40.0),
            Rect::new(700.0, 560.0, 40.0, 40.0),
        )
        .with_window(Rect::new(200.0, 100.0, 200.0, 200.0), Capability::Movable);
        Game::new(vec![stage], Settings::default()).unwrap()
    }

    #[test]
    fn core_thread_runs_until_window_closed() {
        let game = game();
        let spatial = game.spatial().clone();
        let window = spatial.read(|s| s.z_order()[0]);
        let recorder = SharedRecorder::default();
        let frames = recorder.frames.clone();

        let orchestrator = CoreSystemsOrchestrator::new(game, ControlState::default(), Box::new(recorder));
        let (tx, rx) = unbounded();
        let handle = orchestrator.spawn_core_thread(rx, 240.0);

        tx.send(PlatformEvent::Inputs {
            discrete: vec![InputEvent::KeyDown(KeyCode::KeyD)],
            continuous: vec![],
        })
        .unwrap();
        tx.send(PlatformEvent::Surface(SurfaceEvent::Moved {
            id: window,
            position: Vec2::new(250.0, 100.0),
        }))
        .unwrap();

        thread::sleep(Duration::from_millis(100));
        tx.send(PlatformEvent::WindowClosed).unwrap();
        handle.join().unwrap();

        assert!(*frames.lock().unwrap() > 0);
        assert_eq!(spatial.bounds(window).map(|b| b.x), Some(250.0));
        let player = spatial.read(|s| s.entities_of_kind(EntityKind::Player)[0]);
        assert!(spatial.bounds(player).is_some_and(|b| b.x > 100.0));
    }

    #[test]
    fn core_thread_exits_on_disconnect() {
        let orchestrator =
            CoreSystemsOrchestrator::new(game(), ControlState::default(), Box::new(SharedRecorder::default()));
        let (tx, rx) = unbounded::<PlatformEvent>();
        let handle = orchestrator.spawn_core_thread(rx, 240.0);

        drop(tx);
        assert!(handle.join().is_ok());
    }
}
