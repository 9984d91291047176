//=========================================================================
// Movement Effect
//=========================================================================

//=== External Dependencies ===============================================

use log::trace;

//=== Internal Dependencies ===============================================

use super::{direct_children, EffectKind};
use crate::core::entity::EntityId;
use crate::core::geometry::Vec2;
use crate::core::spatial::WindowStack;

//=== MovementEffect ======================================================

/// Translates a target and everything it contains by a displacement.
///
/// Active iff the displacement is non-zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MovementEffect {
    displacement: Vec2,
}

impl MovementEffect {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_displacement(displacement: Vec2) -> Self {
        Self { displacement }
    }

    pub fn displacement(&self) -> Vec2 {
        self.displacement
    }

    pub fn set_displacement(&mut self, displacement: Vec2) {
        self.displacement = displacement;
    }

    pub fn is_active(&self) -> bool {
        !self.displacement.is_zero()
    }

    /// Moves `target` and cascades to its direct children.
    ///
    /// Does nothing when inactive or when `target` does not accept movement.
    /// Returns the number of entities moved.
    pub fn apply(&self, target: EntityId, stack: &mut WindowStack) -> usize {
        if !self.is_active() {
            return 0;
        }
        let accepts = stack.get(target).is_some_and(|e| e.accepts(EffectKind::Movement));
        if !accepts {
            return 0;
        }
        self.cascade(target, stack)
    }

    fn cascade(&self, node: EntityId, stack: &mut WindowStack) -> usize {
        let Some(bounds) = stack.bounds(node) else { return 0 };
        stack.set_bounds(node, bounds.translate(self.displacement.x, self.displacement.y));
        trace!(target: "effects", "Moved {} by {:?}", node, self.displacement);

        let mut moved = 1;
        for child in direct_children(stack, node) {
            moved += self.cascade(child, stack);
        }
        moved
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

    fn nested() -> (WindowStack, EntityId, EntityId, EntityId) {
        let mut stack = WindowStack::new(5.0);
        let root = stack.register_window(Rect::new(0.0, 0.0, 500.0, 500.0), Capability::Movable);
        let child = stack.register_window(Rect::new(10.0, 10.0, 300.0, 300.0), Capability::None);
        let grandchild = stack.register_window(Rect::new(20.0, 20.0, 50.0, 50.0), Capability::None);
        stack.refresh_containment();
        (stack, root, child, grandchild)
    }

    #[test]
    fn inactive_effect_is_noop() {
        let (mut stack, root, _, _) = nested();
        assert_eq!(MovementEffect::new().apply(root, &mut stack), 0);
        assert_eq!(stack.bounds(root), Some(Rect::new(0.0, 0.0, 500.0, 500.0)));
    }

    #[test]
    fn grandchild_moves_exactly_once() {
        let (mut stack, root, child, grandchild) = nested();
        assert_eq!(stack.parent(grandchild), Some(child));

        let effect = MovementEffect::with_displacement(Vec2::new(10.0, -5.0));
        assert_eq!(effect.apply(root, &mut stack), 3);

        assert_eq!(stack.bounds(root), Some(Rect::new(10.0, -5.0, 500.0, 500.0)));
        assert_eq!(stack.bounds(child), Some(Rect::new(20.0, 5.0, 300.0, 300.0)));
        assert_eq!(stack.bounds(grandchild), Some(Rect::new(30.0, 15.0, 50.0, 50.0)));
    }

    #[test]
    fn stale_child_entry_is_not_moved() {
        let (mut stack, root, child, grandchild) = nested();
        // Grandchild is listed under `child`, never under `root`, so forcing
        // a stale membership on root must not reach it twice.
        if let Some(e) = stack.get_mut(root) {
            e.children.insert(grandchild);
        }

        MovementEffect::with_displacement(Vec2::new(1.0, 0.0)).apply(root, &mut stack);

        assert_eq!(stack.parent(grandchild), Some(child));
        assert_eq!(stack.bounds(grandchild), Some(Rect::new(21.0, 20.0, 50.0, 50.0)));
    }

    #[test]
    fn parentless_fixed_window_rejects_movement() {
        let mut stack = WindowStack::new(5.0);
        let w = stack.register_window(Rect::new(0.0, 0.0, 100.0, 100.0), Capability::Resizable);

        let moved = MovementEffect::with_displacement(Vec2::new(3.0, 3.0)).apply(w, &mut stack);

        assert_eq!(moved, 0);
        assert_eq!(stack.bounds(w), Some(Rect::new(0.0, 0.0, 100.0, 100.0)));
    }

    #[test]
    fn contained_player_is_carried() {
        let mut stack = WindowStack::new(5.0);
        let w = stack.register_window(Rect::new(0.0, 0.0, 300.0, 200.0), Capability::Movable);
        let player = stack.spawn_entity(EntityKind::Player, Rect::new(10.0, 10.0, 40.0, 40.0));
        stack.set_parent(player, Some(w));

        MovementEffect::with_displacement(Vec2::new(0.0, 25.0)).apply(w, &mut stack);

        assert_eq!(stack.bounds(player), Some(Rect::new(10.0, 35.0, 40.0, 40.0)));
    }
}
