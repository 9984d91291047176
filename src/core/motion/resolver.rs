//=========================================================================
// Movement Resolver
//=========================================================================
//
// Turns a wanted displacement into a validated one and commits it.
//
// Validation of a proposed rectangle:
//   - never intersects a no-entry zone (nor may any carried descendant)
//   - parented: every probe point lies inside the parent's movable region
//   - parentless: lies inside the play area, when one is configured
//
// Invalid proposals are corrected one axis at a time: X first with Y held
// at zero, then Y with the corrected X, each stepping one pixel toward
// zero until the proposal validates.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, trace};

//=== Internal Dependencies ===============================================

use crate::core::effects::MovementEffect;
use crate::core::effects::EffectKind;
use crate::core::entity::{EntityId, EntityKind};
use crate::core::geometry::{step_toward_zero, Rect, Vec2};
use crate::core::spatial::{MovableRegion, SpatialManager, WindowStack};

//=== MovementContext =====================================================

/// Snapshot of everything a move needs, taken in one critical section.
#[derive(Debug, Clone)]
pub struct MovementContext {
    id: EntityId,
    kind: EntityKind,
    bounds: Rect,
    parent: Option<EntityId>,
    region: Option<MovableRegion>,
    zones: Vec<Rect>,
    play_area: Option<Rect>,
    carried: Vec<Rect>,
    /// Window that rejects movement effects; it never moves.
    fixed: bool,
}

impl MovementContext {
    /// Captures the context for `id`; `None` if the entity is unknown.
    ///
    /// The movable region is built after the lock is released.
    pub fn capture(spatial: &SpatialManager, id: EntityId) -> Option<Self> {
        let (context, region_inputs, tolerance) = spatial.read(|stack| {
            let entity = stack.get(id)?;
            let parent = entity.parent();
            let carried = if entity.kind() == EntityKind::Window {
                stack.descendants(id).into_iter().filter_map(|d| stack.bounds(d)).collect()
            } else {
                Vec::new()
            };

            let context = Self {
                id,
                kind: entity.kind(),
                bounds: entity.bounds(),
                parent,
                region: None,
                zones: stack.no_entry_zones(),
                play_area: stack.play_area(),
                carried,
                fixed: entity.kind() == EntityKind::Window && !entity.accepts(EffectKind::Movement),
            };
            let inputs = parent.and_then(|p| stack.region_inputs(p));
            Some((context, inputs, stack.adjacency_tolerance()))
        })?;

        let region = region_inputs.map(|(base, others)| MovableRegion::compute(base, &others, tolerance));
        Some(Self { region, ..context })
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    pub fn region(&self) -> Option<&MovableRegion> {
        self.region.as_ref()
    }

    /// Validates the current bounds translated by `delta`.
    pub fn is_valid(&self, delta: Vec2) -> bool {
        let proposed = self.bounds.translate(delta.x, delta.y);

        let hits_zone = |rect: &Rect| self.zones.iter().any(|z| z.intersects(rect));
        if hits_zone(&proposed) {
            return false;
        }
        if self.carried.iter().any(|c| hits_zone(&c.translate(delta.x, delta.y))) {
            return false;
        }

        match &self.region {
            Some(region) => region.contains(&proposed),
            None => self.play_area.map_or(true, |area| area.contains_rect(&proposed)),
        }
    }
}

//=== Correction ==========================================================

/// Largest acceptable displacement toward `wanted`, found by axis-separated
/// stepping. Zero when even staying put does not validate.
pub fn correct_displacement(ctx: &MovementContext, wanted: Vec2) -> Vec2 {
    if ctx.is_valid(wanted) {
        return wanted;
    }

    let mut dx = wanted.x;
    while dx != 0.0 && !ctx.is_valid(Vec2::new(dx, 0.0)) {
        dx = step_toward_zero(dx);
    }

    let mut dy = wanted.y;
    while dy != 0.0 && !ctx.is_valid(Vec2::new(dx, dy)) {
        dy = step_toward_zero(dy);
    }

    let corrected = Vec2::new(dx, dy);
    if ctx.is_valid(corrected) {
        corrected
    } else {
        Vec2::ZERO
    }
}

//=== MoveOutcome =========================================================

/// Result of a committed move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveOutcome {
    pub bounds: Rect,
    pub applied: Vec2,
    pub blocked_x: bool,
    pub blocked_y: bool,
    pub parent: Option<EntityId>,
}

//=== Commit ==============================================================

/// Resolves and commits a move of `id` by `wanted`.
///
/// Windows move through a `MovementEffect` so their contents follow, then
/// re-derive their parent. Other entities are re-parented from their new
/// bounds. Returns `None` for unknown ids.
pub fn move_entity(spatial: &SpatialManager, id: EntityId, wanted: Vec2) -> Option<MoveOutcome> {
    let ctx = MovementContext::capture(spatial, id)?;
    let applied = if ctx.fixed {
        Vec2::ZERO
    } else {
        correct_displacement(&ctx, wanted)
    };
    let target = ctx.bounds.translate(applied.x, applied.y);

    let (bounds, parent) = spatial.write(|stack| {
        if ctx.kind == EntityKind::Window {
            MovementEffect::with_displacement(applied).apply(ctx.id, stack);
            stack.check_potential_parent_window(ctx.id);
        } else {
            stack.set_bounds(ctx.id, target);
            reparent(stack, ctx.id, &target);
        }
        (stack.bounds(ctx.id).unwrap_or(target), stack.parent(ctx.id))
    });

    trace!(target: "motion", "{} wanted {:?}, applied {:?}", id, wanted, applied);

    Some(MoveOutcome {
        bounds,
        applied,
        blocked_x: applied.x != wanted.x,
        blocked_y: applied.y != wanted.y,
        parent,
    })
}

/// Parentless entities adopt a window that fully contains them; parented
/// ones migrate to whichever window `top_window_at` now picks.
fn reparent(stack: &mut WindowStack, id: EntityId, bounds: &Rect) {
    match stack.parent(id) {
        None => {
            if let Some(window) = stack.window_fully_containing(bounds) {
                debug!(target: "motion", "{} entered window {}", id, window);
                stack.set_parent(id, Some(window));
            }
        }
        Some(current) => {
            if let Some(next) = stack.top_window_at(bounds, Some(current)) {
                if next != current {
                    debug!(target: "motion", "{} migrated {} -> {}", id, current, next);
                    stack.set_parent(id, Some(next));
                }
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
