//=========================================================================
// Spatial Entities
//=========================================================================
//
// Plain data for every rectangle that participates in the world.
//
// Architecture:
//   Entity { bounds, parent, children, capability, minimized, reference_size }
//     └─ owned by WindowStack, addressed by EntityId
//
// Parent/child edges are derived geometrically every frame; nothing in
// game logic sets them explicitly.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::BTreeSet;
use std::fmt;

//=== Internal Dependencies ===============================================

use super::effects::EffectKind;
use super::geometry::{Rect, Vec2};

//=== EntityId ============================================================

/// Stable handle to an entity owned by the spatial manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub(crate) u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

//=== EntityKind ==========================================================

/// What an entity is. Closed set; behavior is matched, never downcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Level geometry with a Z-order rank.
    Window,
    /// The player character.
    Player,
    /// Stage exit.
    Goal,
    /// Rectangle no entity may overlap; its top edge is solid ground.
    NoEntryZone,
}

impl EntityKind {
    /// Whether a resize cascade changes this entity's size (not only its offset).
    pub fn scales_with_container(self) -> bool {
        matches!(self, EntityKind::Window | EntityKind::Goal)
    }

    /// Whether a minimize cascade hides this entity instead of detaching it.
    pub fn can_hide(self) -> bool {
        matches!(self, EntityKind::Window)
    }
}

//=== Capability ==========================================================

/// What a parentless entity may have done to it directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Capability {
    #[default]
    None,
    Movable,
    Resizable,
    Minimizable,
}

impl Capability {
    /// The effect kind this capability admits.
    pub fn admits(self, kind: EffectKind) -> bool {
        matches!(
            (self, kind),
            (Capability::Movable, EffectKind::Movement)
                | (Capability::Resizable, EffectKind::Resize)
                | (Capability::Minimizable, EffectKind::Minimize)
        )
    }
}

//=== Entity ==============================================================

/// A rectangle in the world plus its containment links.
#[derive(Debug, Clone)]
pub struct Entity {
    pub(crate) id: EntityId,
    pub(crate) kind: EntityKind,
    pub(crate) bounds: Rect,
    pub(crate) capability: Capability,
    pub(crate) parent: Option<EntityId>,
    pub(crate) children: BTreeSet<EntityId>,
    pub(crate) minimized: bool,
    pub(crate) reference_size: Vec2,
}

impl Entity {
    pub(crate) fn new(id: EntityId, kind: EntityKind, bounds: Rect, capability: Capability) -> Self {
        Self {
            id,
            kind,
            bounds,
            capability,
            parent: None,
            children: BTreeSet::new(),
            minimized: false,
            reference_size: bounds.size(),
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn capability(&self) -> Capability {
        self.capability
    }

    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    pub fn children(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.children.iter().copied()
    }

    pub fn is_minimized(&self) -> bool {
        self.minimized
    }

    /// Size captured when this entity last entered a container.
    pub fn reference_size(&self) -> Vec2 {
        self.reference_size
    }

    /// Acceptance rule: relayed effects are always accepted by a child;
    /// a parentless entity accepts only what its capability admits.
    pub fn accepts(&self, kind: EffectKind) -> bool {
        self.parent.is_some() || self.capability.admits(kind)
    }
}

//=== EntityView ==========================================================

/// Read-only snapshot handed to render surfaces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityView {
    pub id: EntityId,
    pub kind: EntityKind,
    pub bounds: Rect,
    pub capability: Capability,
    pub z_index: Option<usize>,
    pub parent: Option<EntityId>,
}

//=========================================================================
// Unit Tests
//=========================================================================
