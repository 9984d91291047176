//=========================================================================
// Effect Model
//=========================================================================
//
// Stateful transforms applied to an entity and cascaded one hop at a
// time through the containment tree.
//
// Architecture:
//   Effect::apply(target)
//     ├─ target.accepts(kind)?        (parent present, or capability)
//     ├─ transform target
//     └─ for child with child.parent == target → recurse
//
// Grandchildren are reached only through their own parent, so a single
// application never transforms the same entity twice.
//
//=========================================================================

//=== Module Declarations =================================================

mod minimize;
mod movement;
mod resize;

//=== Public API ==========================================================

pub use minimize::MinimizeEffect;
pub use movement::MovementEffect;
pub use resize::ResizeEffect;

//=== Internal Dependencies ===============================================

use crate::core::entity::EntityId;
use crate::core::spatial::WindowStack;

//=== EffectKind ==========================================================

/// Discriminant used by capability checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    Movement,
    Resize,
    Minimize,
}

//=== Effect ==============================================================

/// Closed set of transform effects.
#[derive(Debug, Clone)]
pub enum Effect {
    Movement(MovementEffect),
    Resize(ResizeEffect),
    Minimize(MinimizeEffect),
}

impl Effect {
    pub fn kind(&self) -> EffectKind {
        match self {
            Effect::Movement(_) => EffectKind::Movement,
            Effect::Resize(_) => EffectKind::Resize,
            Effect::Minimize(_) => EffectKind::Minimize,
        }
    }

    pub fn is_active(&self) -> bool {
        match self {
            Effect::Movement(e) => e.is_active(),
            Effect::Resize(e) => e.is_active(),
            Effect::Minimize(e) => e.is_active(),
        }
    }

    /// Applies the effect to `target` and its contained subtree.
    ///
    /// Returns the number of entities transformed.
    pub fn apply(&mut self, target: EntityId, stack: &mut WindowStack) -> usize {
        match self {
            Effect::Movement(e) => e.apply(target, stack),
            Effect::Resize(e) => e.apply(target, stack),
            Effect::Minimize(e) => e.apply(target, stack).len(),
        }
    }
}

impl From<MovementEffect> for Effect {
    fn from(effect: MovementEffect) -> Self {
        Effect::Movement(effect)
    }
}

impl From<ResizeEffect> for Effect {
    fn from(effect: ResizeEffect) -> Self {
        Effect::Resize(effect)
    }
}

impl From<MinimizeEffect> for Effect {
    fn from(effect: MinimizeEffect) -> Self {
        Effect::Minimize(effect)
    }
}

//--- Shared Helpers -------------------------------------------------------

/// Children of `parent` whose recorded parent is exactly `parent`.
pub(crate) fn direct_children(stack: &WindowStack, parent: EntityId) -> Vec<EntityId> {
    stack
        .get(parent)
        .map(|e| {
            e.children()
                .filter(|&c| stack.parent(c) == Some(parent))
                .collect()
        })
        .unwrap_or_default()
}

//=========================================================================
// Unit Tests
//=========================================================================
