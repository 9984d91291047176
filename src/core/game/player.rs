//=========================================================================
// Player Controller
//=========================================================================
//
// Per-frame player update:
//   input → jump / gravity → move_entity() → ceiling check
//     → grounding (skipped while rising) → snap to floor → motion state
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== Internal Dependencies ===============================================

use crate::core::entity::EntityId;
use crate::core::geometry::Vec2;
use crate::core::input::{Control, InputSource};
use crate::core::motion::{move_entity, GroundContext, GroundProbe, MotionBody, MoveOutcome};
use crate::core::settings::Settings;
use crate::core::spatial::SpatialManager;

//=== PlayerController ====================================================

#[derive(Debug)]
pub struct PlayerController {
    id: EntityId,
    body: MotionBody,
    probe: GroundProbe,
}

impl PlayerController {
    pub fn new(id: EntityId, settings: &Settings) -> Self {
        Self {
            id,
            body: MotionBody::new(),
            probe: GroundProbe::from_settings(settings),
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn body(&self) -> &MotionBody {
        &self.body
    }

    pub fn respawn(&mut self) {
        self.body.reset();
    }

    /// Runs one frame. Returns `None` if the player entity is gone.
    pub fn update(
        &mut self,
        spatial: &SpatialManager,
        input: &impl InputSource,
        settings: &Settings,
    ) -> Option<MoveOutcome> {
        let mut dx = 0.0;
        if input.is_down(Control::MoveLeft) {
            dx -= settings.move_speed;
        }
        if input.is_down(Control::MoveRight) {
            dx += settings.move_speed;
        }

        if input.was_pressed(Control::Jump) && self.body.jump(settings.jump_force) {
            debug!(target: "motion", "Player {} jumped", self.id);
        }
        self.body.integrate(settings);

        let mut outcome = move_entity(spatial, self.id, Vec2::new(dx, self.body.velocity_y()))?;

        if outcome.blocked_y && self.body.is_rising() {
            self.body.stop_rising();
        }

        if self.body.is_rising() {
            self.body.lose_ground();
        } else {
            let ctx = GroundContext::capture(spatial);
            let fallen = outcome.applied.y.max(0.0);
            let floor = self
                .probe
                .find_floor(&ctx, outcome.bounds, outcome.parent.is_some(), fallen);

            match floor {
                Some(floor) => {
                    if outcome.bounds.bottom() != floor {
                        outcome.bounds.y = floor - outcome.bounds.h;
                        spatial.write(|s| s.set_bounds(self.id, outcome.bounds));
                    }
                    if self.body.land() {
                        debug!(target: "motion", "Player {} landed at y={}", self.id, floor);
                    }
                }
                None => self.body.lose_ground(),
            }
        }

        self.body.update_state(outcome.applied.x);
        Some(outcome)
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
    use crate::core::input::PointerState;

    struct Held(Vec<Control>);

    impl InputSource for Held {
        fn is_down(&self, control: Control) -> bool {
            self.0.contains(&control)
        }

        fn was_pressed(&self, _control: Control) -> bool {
            false
        }

        fn pointer(&self) -> PointerState {
            PointerState::default()
        }
    }

    #[test]
    fn falling_player_keeps_velocity_when_changing_window() {
        let settings = Settings::default();
        let spatial = SpatialManager::new(settings.adjacency_tolerance);
        let a = spatial.register_window(Rect::new(0.0, 0.0, 300.0, 400.0), Capability::None);
        let b = spatial.register_window(Rect::new(300.0, 0.0, 300.0, 400.0), Capability::None);
        let id = spatial.spawn_entity(EntityKind::Player, Rect::new(240.0, 20.0, 40.0, 40.0));
        spatial.write(|s| s.set_parent(id, Some(a)));

        let mut player = PlayerController::new(id, &settings);
        let input = Held(vec![Control::MoveRight]);

        let mut handoff = None;
        for _ in 0..10 {
            let before = player.body().velocity_y();
            let outcome = player.update(&spatial, &input, &settings).unwrap();
            if outcome.parent == Some(b) {
                handoff = Some(before);
                break;
            }
            assert_eq!(outcome.parent, Some(a));
        }

        let before = handoff.expect("player should reach the second window");
        assert!(before > 0.0);
        assert!(!player.body().is_grounded());
        assert_eq!(
            player.body().velocity_y(),
            (before + settings.gravity).min(settings.max_fall_speed)
        );
    }

    #[test]
    fn player_lands_on_parent_bottom() {
        let settings = Settings::default();
        let spatial = SpatialManager::new(settings.adjacency_tolerance);
        let w = spatial.register_window(Rect::new(0.0, 0.0, 300.0, 200.0), Capability::None);
        let id = spatial.spawn_entity(EntityKind::Player, Rect::new(100.0, 100.0, 40.0, 40.0));
        spatial.write(|s| s.set_parent(id, Some(w)));

        let mut player = PlayerController::new(id, &settings);
        for _ in 0..60 {
            player.update(&spatial, &Held(Vec::new()), &settings);
        }

        assert!(player.body().is_grounded());
        assert_eq!(player.body().velocity_y(), 0.0);
        assert_eq!(spatial.bounds(id).map(|b| b.bottom()), Some(200.0));
    }
}
