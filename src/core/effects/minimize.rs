//=========================================================================
// Minimize Effect
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== Internal Dependencies ===============================================

use super::{direct_children, EffectKind};
use crate::core::entity::EntityId;
use crate::core::spatial::WindowStack;

//=== MinimizeEffect ======================================================

/// One-shot effect that hides a window together with the windows it contains.
///
/// Contained entities that cannot hide (player, goal) are detached instead
/// and left where they are.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MinimizeEffect {
    spent: bool,
}

impl MinimizeEffect {
    pub fn new() -> Self {
        Self::default()
    }

    /// Active until it has fired once.
    pub fn is_active(&self) -> bool {
        !self.spent
    }

    /// Hides `target` and its window subtree.
    ///
    /// Returns the ids that were hidden, target first.
    pub fn apply(&mut self, target: EntityId, stack: &mut WindowStack) -> Vec<EntityId> {
        if self.spent {
            return Vec::new();
        }
        let accepts = stack
            .get(target)
            .is_some_and(|e| e.kind().can_hide() && !e.is_minimized() && e.accepts(EffectKind::Minimize));
        if !accepts {
            return Vec::new();
        }

        let mut hidden = Vec::new();
        Self::cascade(target, stack, &mut hidden);
        self.spent = true;

        debug!(target: "effects", "Minimized {} ({} windows hidden)", target, hidden.len());
        hidden
    }

    fn cascade(node: EntityId, stack: &mut WindowStack, hidden: &mut Vec<EntityId>) {
        let children = direct_children(stack, node);
        hidden.push(node);

        for child in children {
            let can_hide = stack.get(child).is_some_and(|e| e.kind().can_hide());
            if can_hide {
                Self::cascade(child, stack, hidden);
            } else {
                stack.detach(child);
            }
        }
        stack.hide(node);
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

    #[test]
    fn minimize_hides_window_subtree_and_detaches_player() {
        let mut stack = WindowStack::new(5.0);
        let w = stack.register_window(Rect::new(0.0, 0.0, 400.0, 400.0), Capability::Minimizable);
        let inner = stack.register_window(Rect::new(10.0, 10.0, 100.0, 100.0), Capability::None);
        let player = stack.spawn_entity(EntityKind::Player, Rect::new(200.0, 200.0, 40.0, 40.0));
        stack.refresh_containment();
        stack.set_parent(player, Some(w));

        let mut effect = MinimizeEffect::new();
        let hidden = effect.apply(w, &mut stack);

        assert_eq!(hidden.first(), Some(&w));
        assert!(hidden.contains(&inner));
        assert!(stack.get(w).is_some_and(|e| e.is_minimized()));
        assert!(stack.get(inner).is_some_and(|e| e.is_minimized()));
        assert!(stack.get(player).is_some_and(|e| !e.is_minimized()));
        assert_eq!(stack.parent(player), None);
        assert_eq!(stack.bounds(player), Some(Rect::new(200.0, 200.0, 40.0, 40.0)));
    }

    #[test]
    fn minimize_fires_once() {
        let mut stack = WindowStack::new(5.0);
        let w = stack.register_window(Rect::new(0.0, 0.0, 400.0, 400.0), Capability::Minimizable);

        let mut effect = MinimizeEffect::new();
        assert!(effect.is_active());
        assert_eq!(effect.apply(w, &mut stack), vec![w]);
        assert!(!effect.is_active());

        stack.restore(w);
        assert!(effect.apply(w, &mut stack).is_empty());
    }

    #[test]
    fn fixed_window_cannot_be_minimized() {
        let mut stack = WindowStack::new(5.0);
        let w = stack.register_window(Rect::new(0.0, 0.0, 400.0, 400.0), Capability::Movable);

        assert!(MinimizeEffect::new().apply(w, &mut stack).is_empty());
        assert!(stack.get(w).is_some_and(|e| !e.is_minimized()));
    }
}
