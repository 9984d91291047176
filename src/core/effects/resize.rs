//=========================================================================
// Resize Effect
//=========================================================================
//
// Scales a target relative to sizes captured when each entity was first
// seen by the effect, so a sequence of scale updates never compounds.
//
// Per entity the effect keeps:
//   size   - reference size (the entity's size when it entered its container)
//   offset - position relative to its direct parent, unscaled
//
// Applying scale `s`:
//   root:  size = ref.size * s                 (origin fixed)
//   child: pos  = parent.pos + ref.offset * s
//          size = ref.size * s                 (windows, goals)
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::{HashMap, HashSet};

use log::{debug, trace, warn};

//=== Internal Dependencies ===============================================

use super::{direct_children, EffectKind};
use crate::core::entity::{EntityId, EntityKind};
use crate::core::geometry::{step_toward_zero, Rect, Vec2};
use crate::core::spatial::WindowStack;

//=== Reference ===========================================================

#[derive(Debug, Clone, Copy, PartialEq)]
struct Reference {
    size: Vec2,
    offset: Vec2,
}

//=== ResizeEffect ========================================================

/// Scale transform relative to captured reference sizes.
#[derive(Debug, Clone)]
pub struct ResizeEffect {
    references: HashMap<EntityId, Reference>,
    scale: Vec2,
    applied: Vec2,
    min_size: Vec2,
    dirty: bool,
}

impl ResizeEffect {
    /// Creates an effect at scale 1.0. Windows never shrink below `min_size`.
    pub fn new(min_size: Vec2) -> Self {
        Self {
            references: HashMap::new(),
            scale: Vec2::ONE,
            applied: Vec2::ONE,
            min_size,
            dirty: false,
        }
    }

    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    /// Updates the scale factor. Non-positive components are ignored.
    pub fn set_scale(&mut self, scale: Vec2) {
        if scale.x <= 0.0 || scale.y <= 0.0 {
            return;
        }
        if scale != self.scale {
            self.scale = scale;
            self.dirty = true;
        }
    }

    /// Active while a scale change has not been applied yet.
    pub fn is_active(&self) -> bool {
        self.dirty
    }

    /// Reference size captured for `id`, if registered.
    pub fn reference_size(&self, id: EntityId) -> Option<Vec2> {
        self.references.get(&id).map(|r| r.size)
    }

    /// Captures `target` as a root. Later calls for the same id are ignored.
    pub fn register(&mut self, target: EntityId, stack: &WindowStack) {
        if self.references.contains_key(&target) {
            return;
        }
        if let Some(e) = stack.get(target) {
            self.references.insert(
                target,
                Reference {
                    size: e.reference_size(),
                    offset: Vec2::ZERO,
                },
            );
        }
    }

    /// Scales `target` and repositions its subtree.
    ///
    /// No entity may end up inside a no-entry zone. A scale that would put
    /// one there is walked back toward the last applied scale, one pixel of
    /// root size at a time, X first. Returns the number of entities updated.
    pub fn apply(&mut self, target: EntityId, stack: &mut WindowStack) -> usize {
        let accepts = stack.get(target).is_some_and(|e| e.accepts(EffectKind::Resize));
        if !accepts {
            return 0;
        }
        self.register(target, stack);
        self.capture_subtree(target, stack);

        let Some(root_ref) = self.references.get(&target).copied() else { return 0 };
        let Some(root_bounds) = stack.bounds(target) else { return 0 };

        // Clamp the scale once at the root so the subtree stays proportional.
        let is_window = stack.get(target).is_some_and(|e| e.kind() == EntityKind::Window);
        let wanted = if is_window {
            Vec2::new(
                self.scale.x.max(self.min_size.x / root_ref.size.x.max(f32::EPSILON)),
                self.scale.y.max(self.min_size.y / root_ref.size.y.max(f32::EPSILON)),
            )
        } else {
            self.scale
        };

        self.dirty = false;
        let Some(scale) = self.admissible_scale(target, root_bounds, root_ref.size, wanted, stack) else {
            warn!(target: "effects", "Resize of {} blocked by a no-entry zone", target);
            self.scale = self.applied;
            return 0;
        };
        if scale != wanted {
            debug!(target: "effects", "Resize of {} limited to {:?} by a no-entry zone", target, scale);
            self.scale = scale;
        }

        let layout = self.layout(target, root_bounds, root_ref.size, scale, stack);
        for &(id, rect) in &layout {
            stack.set_bounds(id, rect);
        }
        trace!(target: "effects", "Resized {} and {} contained (scale {:?})", target, layout.len() - 1, scale);

        self.applied = scale;
        layout.len()
    }

    /// Scale closest to `wanted` whose layout stays clear of every zone.
    ///
    /// `None` when even the applied scale is not clear.
    fn admissible_scale(
        &self,
        root: EntityId,
        origin: Rect,
        reference: Vec2,
        wanted: Vec2,
        stack: &WindowStack,
    ) -> Option<Vec2> {
        let zones = stack.no_entry_zones();
        if zones.is_empty() {
            return Some(wanted);
        }

        let divisor = Vec2::new(reference.x.max(f32::EPSILON), reference.y.max(f32::EPSILON));
        let scale_for = |grow: Vec2| {
            Vec2::new(
                self.applied.x + grow.x / divisor.x,
                self.applied.y + grow.y / divisor.y,
            )
        };
        let clear = |scale: Vec2| {
            self.layout(root, origin, reference, scale, stack)
                .iter()
                .all(|(_, rect)| !zones.iter().any(|z| z.intersects(rect)))
        };

        if clear(wanted) {
            return Some(wanted);
        }

        let full = Vec2::new(
            (wanted.x - self.applied.x) * reference.x,
            (wanted.y - self.applied.y) * reference.y,
        );

        let mut dx = full.x;
        while dx != 0.0 && !clear(scale_for(Vec2::new(dx, 0.0))) {
            dx = step_toward_zero(dx);
        }

        let mut dy = full.y;
        while dy != 0.0 && !clear(scale_for(Vec2::new(dx, dy))) {
            dy = step_toward_zero(dy);
        }

        let scale = scale_for(Vec2::new(dx, dy));
        clear(scale).then_some(scale)
    }

    /// Bounds of `root` and its subtree at `scale`, root first.
    ///
    /// Computed without touching the stack.
    fn layout(
        &self,
        root: EntityId,
        origin: Rect,
        reference: Vec2,
        scale: Vec2,
        stack: &WindowStack,
    ) -> Vec<(EntityId, Rect)> {
        let root_rect = origin.with_size(Vec2::new(reference.x * scale.x, reference.y * scale.y));
        let mut out = vec![(root, root_rect)];
        let mut frontier = vec![(root, root_rect)];

        while let Some((node, node_rect)) = frontier.pop() {
            for child in direct_children(stack, node) {
                let Some(captured) = self.references.get(&child).copied() else { continue };
                let Some(entity) = stack.get(child) else { continue };

                let size = if entity.kind().scales_with_container() {
                    Vec2::new(captured.size.x * scale.x, captured.size.y * scale.y)
                } else {
                    entity.bounds().size()
                };
                let rect = Rect::new(
                    node_rect.x + captured.offset.x * scale.x,
                    node_rect.y + captured.offset.y * scale.y,
                    size.x,
                    size.y,
                );
                out.push((child, rect));
                frontier.push((child, rect));
            }
        }
        out
    }

    /// Records references for entities seen for the first time, before
    /// anything in the subtree moves. Entities that left the subtree are
    /// forgotten; players re-record their offset since they walk freely.
    fn capture_subtree(&mut self, root: EntityId, stack: &WindowStack) {
        let members: HashSet<EntityId> = stack.descendants(root).into_iter().collect();
        self.references.retain(|id, _| *id == root || members.contains(id));

        let applied = self.applied;
        let mut frontier = vec![root];
        while let Some(node) = frontier.pop() {
            let Some(node_bounds) = stack.bounds(node) else { continue };

            for child in direct_children(stack, node) {
                let Some(entity) = stack.get(child) else { continue };
                let captured = Reference {
                    size: entity.reference_size(),
                    offset: Vec2::new(
                        (entity.bounds().x - node_bounds.x) / applied.x,
                        (entity.bounds().y - node_bounds.y) / applied.y,
                    ),
                };

                if entity.kind().scales_with_container() {
                    self.references.entry(child).or_insert(captured);
                } else {
                    let reference = self.references.entry(child).or_insert(captured);
                    reference.offset = captured.offset;
                }
                frontier.push(child);
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::Capability;

    const MIN: Vec2 = Vec2::new(40.0, 40.0);

    #[test]
    fn scale_one_restores_reference_size() {
        let mut stack = WindowStack::new(5.0);
        let w = stack.register_window(Rect::new(100.0, 100.0, 200.0, 200.0), Capability::Resizable);
        let mut effect = ResizeEffect::new(MIN);
        effect.register(w, &stack);

        effect.set_scale(Vec2::new(1.5, 1.0));
        effect.apply(w, &mut stack);
        assert_eq!(stack.bounds(w), Some(Rect::new(100.0, 100.0, 300.0, 200.0)));

        effect.set_scale(Vec2::new(1.0, 1.0));
        effect.apply(w, &mut stack);
        assert_eq!(stack.bounds(w), Some(Rect::new(100.0, 100.0, 200.0, 200.0)));
        assert_eq!(effect.reference_size(w), Some(Vec2::new(200.0, 200.0)));
    }

    #[test]
    fn repeated_scales_do_not_compound() {
        let mut stack = WindowStack::new(5.0);
        let w = stack.register_window(Rect::new(0.0, 0.0, 100.0, 100.0), Capability::Resizable);
        let mut effect = ResizeEffect::new(MIN);

        for s in [2.0, 0.5, 3.0, 1.25] {
            effect.set_scale(Vec2::new(s, s));
            effect.apply(w, &mut stack);
        }

        assert_eq!(stack.bounds(w), Some(Rect::new(0.0, 0.0, 125.0, 125.0)));
    }

    #[test]
    fn children_scale_about_parent_origin() {
        let mut stack = WindowStack::new(5.0);
        let w = stack.register_window(Rect::new(100.0, 100.0, 200.0, 200.0), Capability::Resizable);
        let inner = stack.register_window(Rect::new(120.0, 140.0, 50.0, 50.0), Capability::None);
        stack.refresh_containment();
        assert_eq!(stack.parent(inner), Some(w));

        let mut effect = ResizeEffect::new(MIN);
        effect.set_scale(Vec2::new(2.0, 1.0));
        assert_eq!(effect.apply(w, &mut stack), 2);
        assert_eq!(stack.bounds(inner), Some(Rect::new(140.0, 140.0, 100.0, 50.0)));

        effect.set_scale(Vec2::ONE);
        effect.apply(w, &mut stack);
        assert_eq!(stack.bounds(inner), Some(Rect::new(120.0, 140.0, 50.0, 50.0)));
    }

    #[test]
    fn player_keeps_its_size() {
        let mut stack = WindowStack::new(5.0);
        let w = stack.register_window(Rect::new(0.0, 0.0, 200.0, 200.0), Capability::Resizable);
        let player = stack.spawn_entity(EntityKind::Player, Rect::new(100.0, 50.0, 40.0, 40.0));
        stack.set_parent(player, Some(w));

        let mut effect = ResizeEffect::new(MIN);
        effect.set_scale(Vec2::new(0.5, 1.0));
        effect.apply(w, &mut stack);

        assert_eq!(stack.bounds(player), Some(Rect::new(50.0, 50.0, 40.0, 40.0)));
    }

    #[test]
    fn window_clamped_to_minimum_size() {
        let mut stack = WindowStack::new(5.0);
        let w = stack.register_window(Rect::new(0.0, 0.0, 200.0, 100.0), Capability::Resizable);

        let mut effect = ResizeEffect::new(MIN);
        effect.set_scale(Vec2::new(0.1, 0.1));
        effect.apply(w, &mut stack);

        assert_eq!(stack.bounds(w), Some(Rect::new(0.0, 0.0, 40.0, 40.0)));
    }

    #[test]
    fn movable_window_rejects_resize() {
        let mut stack = WindowStack::new(5.0);
        let w = stack.register_window(Rect::new(0.0, 0.0, 200.0, 100.0), Capability::Movable);

        let mut effect = ResizeEffect::new(MIN);
        effect.set_scale(Vec2::new(2.0, 2.0));
        assert_eq!(effect.apply(w, &mut stack), 0);
        assert!(effect.is_active());
    }

    #[test]
    fn growth_stops_short_of_no_entry_zone() {
        let mut stack = WindowStack::new(5.0);
        let w = stack.register_window(Rect::new(100.0, 100.0, 200.0, 200.0), Capability::Resizable);
        let player = stack.spawn_entity(EntityKind::Player, Rect::new(250.0, 260.0, 40.0, 40.0));
        stack.set_parent(player, Some(w));
        let zone = Rect::new(410.0, 430.0, 10.0, 10.0);
        stack.register_zone(zone);

        let mut effect = ResizeEffect::new(MIN);
        effect.set_scale(Vec2::new(2.0, 2.0));
        assert_eq!(effect.apply(w, &mut stack), 2);

        let window = stack.bounds(w).unwrap();
        let carried = stack.bounds(player).unwrap();
        assert!(!window.intersects(&zone));
        assert!(!carried.intersects(&zone));
        assert_eq!(window.w, 400.0);
        assert!(window.h > 200.0 && window.bottom() <= zone.top());
        assert!(!effect.is_active());
        assert_eq!(effect.scale().x, 2.0);
        assert!(effect.scale().y < 2.0);
    }

    #[test]
    fn resize_blocked_at_current_size_keeps_bounds() {
        let mut stack = WindowStack::new(5.0);
        let w = stack.register_window(Rect::new(0.0, 0.0, 100.0, 100.0), Capability::Resizable);
        stack.register_zone(Rect::new(100.0, 0.0, 10.0, 10.0));
        stack.register_zone(Rect::new(0.0, 100.0, 10.0, 10.0));

        let mut effect = ResizeEffect::new(MIN);
        effect.set_scale(Vec2::new(1.5, 1.5));

        assert_eq!(effect.apply(w, &mut stack), 1);
        assert_eq!(stack.bounds(w), Some(Rect::new(0.0, 0.0, 100.0, 100.0)));
        assert_eq!(effect.scale(), Vec2::ONE);
        assert!(!effect.is_active());
    }

    #[test]
    fn non_positive_scale_is_ignored() {
        let mut effect = ResizeEffect::new(MIN);
        effect.set_scale(Vec2::new(0.0, 1.0));
        assert_eq!(effect.scale(), Vec2::ONE);
        assert!(!effect.is_active());
    }
}
