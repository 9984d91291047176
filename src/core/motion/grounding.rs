//=========================================================================
// Grounding
//=========================================================================
//
// Finds the floor under an entity's feet from the Z-ordered window stack.
//
// The feet band spans from the entity's bottom edge upward over the
// distance fallen this frame, padded by the ground tolerance on both
// sides, so fast falls cannot tunnel through a floor.
//
// Search order:
//   1. no-entry zone top edges
//   2. windows
//        parentless: front-most window overlapping the feet, top edge
//        parented:   per segment, front-most window overlapping it,
//                    bottom edge; highest floor across segments
//   3. play-area bottom
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::geometry::Rect;
use crate::core::settings::Settings;
use crate::core::spatial::SpatialManager;

//=== GroundContext =======================================================

/// Visible geometry relevant to grounding, snapshotted once per query.
#[derive(Debug, Clone, Default)]
pub struct GroundContext {
    /// Visible window bounds, front-most first.
    windows: Vec<Rect>,
    zones: Vec<Rect>,
    play_area: Option<Rect>,
}

impl GroundContext {
    pub fn capture(spatial: &SpatialManager) -> Self {
        spatial.read(|stack| Self {
            windows: stack.visible_windows().into_iter().rev().map(|(_, b)| b).collect(),
            zones: stack.no_entry_zones(),
            play_area: stack.play_area(),
        })
    }
}

//=== GroundProbe =========================================================

/// Floor search parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundProbe {
    tolerance: f32,
    segments: usize,
}

impl GroundProbe {
    pub fn new(tolerance: f32, segments: usize) -> Self {
        Self {
            tolerance,
            segments: segments.max(1),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.ground_tolerance, settings.ground_segments)
    }

    /// Y coordinate of the floor under `bounds`, if any.
    ///
    /// `fallen` is the downward distance covered this frame.
    pub fn find_floor(&self, ctx: &GroundContext, bounds: Rect, parented: bool, fallen: f32) -> Option<f32> {
        let fallen = fallen.max(0.0);
        let feet = Rect::new(
            bounds.x,
            bounds.bottom() - fallen - self.tolerance,
            bounds.w,
            fallen + 2.0 * self.tolerance,
        );
        let in_band = |y: f32| y >= feet.top() && y <= feet.bottom();

        let zone_floor = ctx
            .zones
            .iter()
            .filter(|z| z.overlaps_x(&feet) && in_band(z.top()))
            .map(|z| z.top())
            .reduce(f32::min);
        if zone_floor.is_some() {
            return zone_floor;
        }

        let window_floor = if parented {
            self.segmented_floor(ctx, &feet, in_band)
        } else {
            ctx.windows
                .iter()
                .find(|w| touches(w, &feet))
                .map(|w| w.top())
                .filter(|&top| in_band(top))
        };
        if window_floor.is_some() {
            return window_floor;
        }

        ctx.play_area.map(|area| area.bottom()).filter(|&bottom| in_band(bottom))
    }

    fn segmented_floor(&self, ctx: &GroundContext, feet: &Rect, in_band: impl Fn(f32) -> bool) -> Option<f32> {
        let width = feet.w / self.segments as f32;

        (0..self.segments)
            .filter_map(|i| {
                let segment = Rect::new(feet.x + width * i as f32, feet.y, width, feet.h);
                let decider = ctx.windows.iter().find(|w| touches(w, &segment))?;
                in_band(decider.bottom()).then_some(decider.bottom())
            })
            .reduce(f32::min)
    }
}

/// Positive horizontal overlap, vertical spans touching or overlapping.
fn touches(window: &Rect, feet: &Rect) -> bool {
    window.overlaps_x(feet) && window.top() <= feet.bottom() && feet.top() <= window.bottom()
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::{Capability, EntityKind};

    fn probe() -> GroundProbe {
        GroundProbe::new(2.0, 4)
    }

    #[test]
    fn front_window_occludes_higher_back_window() {
        let spatial = SpatialManager::new(5.0);
        spatial.register_window(Rect::new(0.0, 380.0, 600.0, 220.0), Capability::None);
        spatial.register_window(Rect::new(0.0, 400.0, 600.0, 200.0), Capability::None);

        let ctx = GroundContext::capture(&spatial);
        let player = Rect::new(100.0, 360.0, 40.0, 40.0);

        assert_eq!(probe().find_floor(&ctx, player, false, 5.0), Some(400.0));
    }

    #[test]
    fn parented_entity_stands_on_window_bottom() {
        let spatial = SpatialManager::new(5.0);
        spatial.register_window(Rect::new(0.0, 0.0, 300.0, 200.0), Capability::None);

        let ctx = GroundContext::capture(&spatial);
        let player = Rect::new(100.0, 160.0, 40.0, 40.0);

        assert_eq!(probe().find_floor(&ctx, player, true, 0.0), Some(200.0));
        assert_eq!(probe().find_floor(&ctx, player.translate(0.0, -20.0), true, 0.0), None);
    }

    #[test]
    fn partially_occluded_feet_still_find_floor() {
        let spatial = SpatialManager::new(5.0);
        spatial.register_window(Rect::new(0.0, 0.0, 300.0, 200.0), Capability::None);
        // Covers the right half of the feet; its bottom is far below.
        spatial.register_window(Rect::new(120.0, 150.0, 200.0, 300.0), Capability::None);

        let ctx = GroundContext::capture(&spatial);
        let player = Rect::new(100.0, 160.0, 40.0, 40.0);

        assert_eq!(probe().find_floor(&ctx, player, true, 0.0), Some(200.0));
    }

    #[test]
    fn fully_occluded_feet_have_no_window_floor() {
        let spatial = SpatialManager::new(5.0);
        spatial.register_window(Rect::new(0.0, 0.0, 300.0, 200.0), Capability::None);
        spatial.register_window(Rect::new(50.0, 150.0, 200.0, 300.0), Capability::None);

        let ctx = GroundContext::capture(&spatial);
        let player = Rect::new(100.0, 160.0, 40.0, 40.0);

        assert_eq!(probe().find_floor(&ctx, player, true, 0.0), None);
    }

    #[test]
    fn zone_top_is_checked_first() {
        let spatial = SpatialManager::new(5.0);
        spatial.register_zone(Rect::new(0.0, 300.0, 100.0, 20.0));
        spatial.register_window(Rect::new(0.0, 300.0, 400.0, 100.0), Capability::None);

        let ctx = GroundContext::capture(&spatial);
        let player = Rect::new(50.0, 259.0, 40.0, 40.0);

        assert_eq!(probe().find_floor(&ctx, player, false, 0.0), Some(300.0));
    }

    #[test]
    fn fast_fall_does_not_tunnel() {
        let spatial = SpatialManager::new(5.0);
        spatial.register_window(Rect::new(0.0, 300.0, 400.0, 100.0), Capability::None);

        let ctx = GroundContext::capture(&spatial);
        // Bottom went from 295 to 310 this frame.
        let player = Rect::new(50.0, 270.0, 40.0, 40.0);

        assert_eq!(probe().find_floor(&ctx, player, false, 15.0), Some(300.0));
    }

    #[test]
    fn play_area_bottom_is_the_fallback() {
        let spatial = SpatialManager::new(5.0);
        spatial.set_play_area(Some(Rect::new(0.0, 0.0, 800.0, 600.0)));
        spatial.spawn_entity(EntityKind::Player, Rect::new(0.0, 560.0, 40.0, 40.0));

        let ctx = GroundContext::capture(&spatial);

        assert_eq!(probe().find_floor(&ctx, Rect::new(0.0, 560.0, 40.0, 40.0), false, 0.0), Some(600.0));
        assert_eq!(probe().find_floor(&ctx, Rect::new(0.0, 500.0, 40.0, 40.0), false, 0.0), None);
    }
}
