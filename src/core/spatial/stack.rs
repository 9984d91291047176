//=========================================================================
// Window Stack
//=========================================================================
//
// Unlocked spatial state: entity arena, Z-ordered window list, no-entry
// zones and the top-level play area, plus every geometric query over them.
//
// Architecture:
//   entities: HashMap<EntityId, Entity>
//   z_order:  Vec<EntityId>   (windows only, index 0 = back, last = front)
//   zones:    Vec<EntityId>   (no-entry zones, never parented)
//
// `SpatialManager` wraps this in a mutex; everything here assumes the
// caller already holds exclusive access.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::{HashMap, HashSet};

use log::{debug, trace, warn};

//=== Internal Dependencies ===============================================

use super::region::MovableRegion;
use crate::core::entity::{Capability, Entity, EntityId, EntityKind, EntityView};
use crate::core::geometry::{Rect, Vec2};

/// Slack when comparing bottom edges in the top-window tie-break.
const EDGE_EPSILON: f32 = 0.5;

//=== WindowStack =========================================================

/// Z-ordered window registry and containment graph.
#[derive(Debug)]
pub struct WindowStack {
    entities: HashMap<EntityId, Entity>,
    z_order: Vec<EntityId>,
    zones: Vec<EntityId>,
    play_area: Option<Rect>,
    adjacency_tolerance: f32,
    next_id: u32,
}

impl WindowStack {
    //--- Construction -----------------------------------------------------

    pub fn new(adjacency_tolerance: f32) -> Self {
        Self {
            entities: HashMap::new(),
            z_order: Vec::new(),
            zones: Vec::new(),
            play_area: None,
            adjacency_tolerance,
            next_id: 1,
        }
    }

    fn spawn(&mut self, kind: EntityKind, bounds: Rect, capability: Capability) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.entities.insert(id, Entity::new(id, kind, bounds, capability));
        id
    }

    //--- Registration -----------------------------------------------------

    /// Appends a new window at the front of the Z-order.
    pub fn register_window(&mut self, bounds: Rect, capability: Capability) -> EntityId {
        let id = self.spawn(EntityKind::Window, bounds, capability);
        self.z_order.push(id);
        debug!(target: "spatial", "Registered window {} at z={} ({:?})", id, self.z_order.len() - 1, bounds);
        id
    }

    /// Removes a window, releasing its parent link and orphaning its children.
    ///
    /// Returns `false` if `id` is not a registered window.
    pub fn unregister_window(&mut self, id: EntityId) -> bool {
        let Some(pos) = self.z_order.iter().position(|&w| w == id) else {
            return false;
        };
        self.z_order.remove(pos);
        self.remove_entity(id);
        debug!(target: "spatial", "Unregistered window {}", id);
        true
    }

    /// Registers a no-entry zone.
    pub fn register_zone(&mut self, bounds: Rect) -> EntityId {
        let id = self.spawn(EntityKind::NoEntryZone, bounds, Capability::None);
        self.zones.push(id);
        id
    }

    /// Registers a free entity (player, goal) that is not part of the Z-order.
    pub fn spawn_entity(&mut self, kind: EntityKind, bounds: Rect) -> EntityId {
        debug_assert!(
            !matches!(kind, EntityKind::Window | EntityKind::NoEntryZone),
            "windows and zones have dedicated registration"
        );
        self.spawn(kind, bounds, Capability::None)
    }

    /// Removes any entity, cleaning up both directions of its links.
    pub fn remove_entity(&mut self, id: EntityId) -> Option<Entity> {
        self.set_parent(id, None);
        self.z_order.retain(|&w| w != id);
        self.zones.retain(|&z| z != id);

        let entity = self.entities.remove(&id)?;
        for child in &entity.children {
            if let Some(c) = self.entities.get_mut(child) {
                if c.parent == Some(id) {
                    c.parent = None;
                }
            }
        }
        Some(entity)
    }

    /// Removes every window, zone and goal, keeping players (unparented).
    pub fn clear_stage(&mut self) {
        let doomed: Vec<EntityId> = self
            .entities
            .values()
            .filter(|e| e.kind != EntityKind::Player)
            .map(|e| e.id)
            .collect();

        for id in doomed {
            self.remove_entity(id);
        }
        self.play_area = None;
    }

    //--- Accessors --------------------------------------------------------

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    pub fn bounds(&self, id: EntityId) -> Option<Rect> {
        self.entities.get(&id).map(|e| e.bounds)
    }

    pub fn parent(&self, id: EntityId) -> Option<EntityId> {
        self.entities.get(&id).and_then(|e| e.parent)
    }

    /// Overwrites an entity's bounds. Unknown ids are ignored.
    pub fn set_bounds(&mut self, id: EntityId, bounds: Rect) {
        if let Some(e) = self.entities.get_mut(&id) {
            e.bounds = bounds;
        }
    }

    pub fn play_area(&self) -> Option<Rect> {
        self.play_area
    }

    pub fn set_play_area(&mut self, area: Option<Rect>) {
        self.play_area = area;
    }

    pub fn adjacency_tolerance(&self) -> f32 {
        self.adjacency_tolerance
    }

    /// Window ids back to front.
    pub fn z_order(&self) -> &[EntityId] {
        &self.z_order
    }

    pub fn window_count(&self) -> usize {
        self.z_order.len()
    }

    /// Current Z rank (0 = back).
    pub fn window_z_index(&self, id: EntityId) -> Option<usize> {
        self.z_order.iter().position(|&w| w == id)
    }

    pub fn no_entry_zones(&self) -> Vec<Rect> {
        self.zones.iter().filter_map(|&z| self.bounds(z)).collect()
    }

    pub fn entities_of_kind(&self, kind: EntityKind) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self
            .entities
            .values()
            .filter(|e| e.kind == kind)
            .map(|e| e.id)
            .collect();
        ids.sort();
        ids
    }

    fn is_visible_window(&self, id: EntityId) -> bool {
        self.entities
            .get(&id)
            .is_some_and(|e| e.kind == EntityKind::Window && !e.minimized)
    }

    /// Visible windows back to front with their bounds.
    pub fn visible_windows(&self) -> Vec<(EntityId, Rect)> {
        self.z_order
            .iter()
            .filter_map(|&id| {
                let e = self.entities.get(&id)?;
                (!e.minimized).then_some((id, e.bounds))
            })
            .collect()
    }

    //--- Containment Links -------------------------------------------------

    /// Sets or clears `child`'s parent, keeping both sides of the edge in sync.
    ///
    /// Entering a new container captures the child's current size as its
    /// reference size. Self-parenting and unknown parents clear the link.
    pub fn set_parent(&mut self, child: EntityId, parent: Option<EntityId>) {
        let Some(old) = self.entities.get(&child).map(|e| e.parent) else {
            return;
        };

        let parent = parent.filter(|&p| p != child && self.entities.contains_key(&p));
        if old == parent {
            return;
        }

        if let Some(old_parent) = old.and_then(|p| self.entities.get_mut(&p)) {
            old_parent.children.remove(&child);
        }
        if let Some(new_parent) = parent.and_then(|p| self.entities.get_mut(&p)) {
            new_parent.children.insert(child);
        }

        if let Some(e) = self.entities.get_mut(&child) {
            e.parent = parent;
            if parent.is_some() {
                e.reference_size = e.bounds.size();
            }
        }

        trace!(target: "spatial", "Parent of {} changed: {:?} -> {:?}", child, old, parent);
    }

    /// Clears `id`'s parent link.
    pub fn detach(&mut self, id: EntityId) {
        self.set_parent(id, None);
    }

    /// Returns `true` if `ancestor` appears on `id`'s parent chain.
    pub fn is_ancestor(&self, ancestor: EntityId, id: EntityId) -> bool {
        let mut current = self.parent(id);
        let mut hops = 0;
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            hops += 1;
            if hops > self.entities.len() {
                warn!(target: "spatial", "Parent chain of {} does not terminate", id);
                return false;
            }
            current = self.parent(p);
        }
        false
    }

    /// All descendants of `id` in breadth-first order (excluding `id`).
    pub fn descendants(&self, id: EntityId) -> Vec<EntityId> {
        let mut out = Vec::new();
        let mut seen = HashSet::from([id]);
        let mut frontier = vec![id];

        while let Some(next) = frontier.pop() {
            let Some(e) = self.entities.get(&next) else { continue };
            for child in e.children() {
                let is_direct = self.parent(child) == Some(next);
                if is_direct && seen.insert(child) {
                    out.push(child);
                    frontier.push(child);
                }
            }
        }
        out
    }

    //=====================================================================
    // Queries
    //=====================================================================

    /// Visible windows overlapping `rect`, front-most first.
    pub fn intersecting_windows(&self, rect: &Rect) -> Vec<EntityId> {
        self.z_order
            .iter()
            .rev()
            .copied()
            .filter(|&id| self.is_visible_window(id))
            .filter(|&id| self.bounds(id).is_some_and(|b| b.intersects(rect)))
            .collect()
    }

    /// Front-most visible window whose bounds contain `rect`.
    pub fn window_fully_containing(&self, rect: &Rect) -> Option<EntityId> {
        self.window_fully_containing_except(rect, None)
    }

    pub(crate) fn window_fully_containing_except(
        &self,
        rect: &Rect,
        except: Option<EntityId>,
    ) -> Option<EntityId> {
        self.z_order
            .iter()
            .rev()
            .copied()
            .filter(|&id| Some(id) != except && self.is_visible_window(id))
            .find(|&id| self.bounds(id).is_some_and(|b| b.contains_rect(rect)))
    }

    /// Front-most visible window containing point `p`.
    pub fn front_window_at_point(&self, p: Vec2) -> Option<EntityId> {
        self.z_order
            .iter()
            .rev()
            .copied()
            .filter(|&id| self.is_visible_window(id))
            .find(|&id| self.bounds(id).is_some_and(|b| b.contains_point(p)))
    }

    /// Picks the window an entity with bounds `rect` should belong to.
    ///
    /// Each of the five sample points (corners + center) nominates the
    /// front-most window containing it. Among the nominees, those whose
    /// bottom edge is no lower than the current parent's bottom are
    /// preferred; the highest Z-index wins within the preferred set, or
    /// across all nominees when none is preferred.
    pub fn top_window_at(&self, rect: &Rect, current_parent: Option<EntityId>) -> Option<EntityId> {
        let mut nominees: Vec<(usize, EntityId)> = Vec::with_capacity(5);
        for p in rect.sample_points() {
            let Some(id) = self.front_window_at_point(p) else { continue };
            let Some(z) = self.window_z_index(id) else { continue };
            if !nominees.iter().any(|&(_, n)| n == id) {
                nominees.push((z, id));
            }
        }

        let floor = current_parent
            .filter(|&p| self.is_visible_window(p))
            .and_then(|p| self.bounds(p))
            .map(|b| b.bottom());

        let preferred = floor.and_then(|floor| {
            nominees
                .iter()
                .filter(|&&(_, id)| self.bounds(id).is_some_and(|b| b.bottom() <= floor + EDGE_EPSILON))
                .max_by_key(|&&(z, _)| z)
                .copied()
        });

        preferred
            .or_else(|| nominees.iter().max_by_key(|&&(z, _)| z).copied())
            .map(|(_, id)| id)
    }

    /// Region a child of `window` may move within, computed in place.
    pub fn calculate_movable_region(&self, window: EntityId) -> MovableRegion {
        match self.region_inputs(window) {
            Some((base, others)) => MovableRegion::compute(base, &others, self.adjacency_tolerance),
            None => MovableRegion::default(),
        }
    }

    /// Base bounds and the other visible windows' bounds for region building.
    pub(crate) fn region_inputs(&self, window: EntityId) -> Option<(Rect, Vec<Rect>)> {
        if !self.is_visible_window(window) {
            return None;
        }
        let base = self.bounds(window)?;
        let others = self
            .visible_windows()
            .into_iter()
            .filter(|&(id, _)| id != window)
            .map(|(_, b)| b)
            .collect();
        Some((base, others))
    }

    //=====================================================================
    // Parent Resolution
    //=====================================================================

    /// Re-derives a window's parent from geometry.
    ///
    /// The closest window behind it that contains it becomes its parent.
    /// Failing that, it adopts every window in front of it that it fully
    /// contains, unless that window already has a closer parent.
    pub fn check_potential_parent_window(&mut self, window: EntityId) {
        let Some(z) = self.window_z_index(window) else { return };
        let Some(bounds) = self.bounds(window) else { return };

        if !self.is_visible_window(window) {
            self.detach(window);
            return;
        }

        let container = self.z_order[..z]
            .iter()
            .rev()
            .copied()
            .filter(|&id| self.is_visible_window(id))
            .find(|&id| self.bounds(id).is_some_and(|b| b.contains_rect(&bounds)));

        if let Some(parent) = container {
            if self.parent(window) != Some(parent) {
                debug!(target: "spatial", "Window {} now inside {}", window, parent);
            }
            self.set_parent(window, Some(parent));
            return;
        }

        self.detach(window);

        let adoptees: Vec<EntityId> = self.z_order[z + 1..]
            .iter()
            .copied()
            .filter(|&id| self.is_visible_window(id))
            .filter(|&id| self.bounds(id).is_some_and(|b| bounds.contains_rect(&b)))
            .filter(|&id| match self.parent(id).and_then(|p| self.window_z_index(p)) {
                Some(parent_z) => parent_z < z,
                None => true,
            })
            .collect();

        for child in adoptees {
            if self.parent(child) != Some(window) {
                debug!(target: "spatial", "Window {} adopted {}", window, child);
            }
            self.set_parent(child, Some(window));
        }
    }

    /// Per-frame containment pass.
    ///
    /// Windows re-derive their parent back to front; goals attach to the
    /// front-most window containing them; players keep their parent only
    /// while they remain inside its movable region.
    pub fn refresh_containment(&mut self) {
        let windows = self.z_order.clone();
        for id in windows {
            self.check_potential_parent_window(id);
        }

        for goal in self.entities_of_kind(EntityKind::Goal) {
            let Some(bounds) = self.bounds(goal) else { continue };
            let container = self.window_fully_containing(&bounds);
            self.set_parent(goal, container);
        }

        for player in self.entities_of_kind(EntityKind::Player) {
            let Some(parent) = self.parent(player) else { continue };
            let Some(bounds) = self.bounds(player) else { continue };
            if !self.calculate_movable_region(parent).contains(&bounds) {
                debug!(target: "spatial", "Player {} left region of {}", player, parent);
                self.detach(player);
            }
        }
    }

    //=====================================================================
    // Z-Order Manipulation
    //=====================================================================

    /// Moves a parentless window and its contained window subtree to the
    /// front, preserving their relative order.
    ///
    /// Returns the moved ids back to front; empty if nothing moved.
    pub fn bring_window_to_front(&mut self, window: EntityId) -> Vec<EntityId> {
        if self.window_z_index(window).is_none() || self.parent(window).is_some() {
            return Vec::new();
        }

        let mut subtree: HashSet<EntityId> = self.descendants(window).into_iter().collect();
        subtree.insert(window);

        let (moved, rest): (Vec<EntityId>, Vec<EntityId>) =
            self.z_order.iter().copied().partition(|id| subtree.contains(id));

        self.z_order = rest;
        self.z_order.extend_from_slice(&moved);
        debug!(target: "spatial", "Raised {} ({} windows)", window, moved.len());
        moved
    }

    /// Activation from a display surface. Child windows keep following
    /// their parent's order, so activating one changes nothing.
    pub fn handle_window_activation(&mut self, window: EntityId) -> Vec<EntityId> {
        self.bring_window_to_front(window)
    }

    //--- Visibility ---------------------------------------------------------

    /// Hides a window and drops its parent link.
    pub(crate) fn hide(&mut self, id: EntityId) {
        self.detach(id);
        if let Some(e) = self.entities.get_mut(&id) {
            e.minimized = true;
        }
    }

    /// Makes a minimized window visible again at the front of the stack.
    pub fn restore(&mut self, id: EntityId) -> bool {
        let Some(e) = self.entities.get_mut(&id) else { return false };
        if !e.minimized {
            return false;
        }
        e.minimized = false;
        self.bring_window_to_front(id);
        self.check_potential_parent_window(id);
        true
    }

    //--- Rendering ----------------------------------------------------------

    /// Views of all visible entities in draw order: windows back to front,
    /// then zones, goals and players.
    pub fn views(&self) -> Vec<EntityView> {
        let view = |e: &Entity| EntityView {
            id: e.id,
            kind: e.kind,
            bounds: e.bounds,
            capability: e.capability,
            z_index: self.window_z_index(e.id),
            parent: e.parent,
        };

        let mut out: Vec<EntityView> = self
            .z_order
            .iter()
            .filter_map(|id| self.entities.get(id))
            .filter(|e| !e.minimized)
            .map(view)
            .collect();

        for kind in [EntityKind::NoEntryZone, EntityKind::Goal, EntityKind::Player] {
            for id in self.entities_of_kind(kind) {
                if let Some(e) = self.entities.get(&id) {
                    out.push(view(e));
                }
            }
        }
        out
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
