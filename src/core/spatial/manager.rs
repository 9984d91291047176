//=========================================================================
// Spatial Manager
//=========================================================================
//
// Thread-safe facade over `WindowStack`.
//
// Every list mutation and every multi-step query runs under one mutex.
// Expensive work (movable-region building) copies what it needs under the
// lock and computes after releasing it.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::{Mutex, MutexGuard, PoisonError};

//=== Internal Dependencies ===============================================

use super::region::MovableRegion;
use super::stack::WindowStack;
use crate::core::effects::Effect;
use crate::core::entity::{Capability, EntityId, EntityKind, EntityView};
use crate::core::geometry::Rect;

//=== SpatialManager ======================================================

/// Shared, lock-guarded owner of the window stack.
///
/// Share across threads with `Arc<SpatialManager>`; all methods take
/// `&self`. Queries never fail: unknown ids yield `None` or empty results.
#[derive(Debug)]
pub struct SpatialManager {
    state: Mutex<WindowStack>,
    adjacency_tolerance: f32,
}

impl SpatialManager {
    //--- Construction -----------------------------------------------------

    pub fn new(adjacency_tolerance: f32) -> Self {
        Self {
            state: Mutex::new(WindowStack::new(adjacency_tolerance)),
            adjacency_tolerance,
        }
    }

    //--- Lock Access --------------------------------------------------------

    /// Acquires the stack. A panic on another thread does not leave the
    /// geometry unusable; the next frame heals any half-applied change.
    fn lock(&self) -> MutexGuard<'_, WindowStack> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs a read-only multi-step query under the lock.
    pub fn read<R>(&self, f: impl FnOnce(&WindowStack) -> R) -> R {
        f(&self.lock())
    }

    /// Runs a mutation under the lock.
    pub fn write<R>(&self, f: impl FnOnce(&mut WindowStack) -> R) -> R {
        f(&mut self.lock())
    }

    //--- Registration -----------------------------------------------------

    pub fn register_window(&self, bounds: Rect, capability: Capability) -> EntityId {
        self.lock().register_window(bounds, capability)
    }

    pub fn unregister_window(&self, id: EntityId) -> bool {
        self.lock().unregister_window(id)
    }

    pub fn register_zone(&self, bounds: Rect) -> EntityId {
        self.lock().register_zone(bounds)
    }

    pub fn spawn_entity(&self, kind: EntityKind, bounds: Rect) -> EntityId {
        self.lock().spawn_entity(kind, bounds)
    }

    pub fn set_play_area(&self, area: Option<Rect>) {
        self.lock().set_play_area(area);
    }

    //--- Queries ------------------------------------------------------------

    pub fn bounds(&self, id: EntityId) -> Option<Rect> {
        self.lock().bounds(id)
    }

    pub fn parent(&self, id: EntityId) -> Option<EntityId> {
        self.lock().parent(id)
    }

    pub fn window_z_index(&self, id: EntityId) -> Option<usize> {
        self.lock().window_z_index(id)
    }

    pub fn intersecting_windows(&self, rect: &Rect) -> Vec<EntityId> {
        self.lock().intersecting_windows(rect)
    }

    pub fn window_fully_containing(&self, rect: &Rect) -> Option<EntityId> {
        self.lock().window_fully_containing(rect)
    }

    pub fn top_window_at(&self, rect: &Rect, current_parent: Option<EntityId>) -> Option<EntityId> {
        self.lock().top_window_at(rect, current_parent)
    }

    /// Movable region of `window`, built from a snapshot taken under the lock.
    pub fn calculate_movable_region(&self, window: EntityId) -> MovableRegion {
        let inputs = self.lock().region_inputs(window);
        match inputs {
            Some((base, others)) => MovableRegion::compute(base, &others, self.adjacency_tolerance),
            None => MovableRegion::default(),
        }
    }

    /// Render views in draw order.
    pub fn views(&self) -> Vec<EntityView> {
        self.lock().views()
    }

    //--- Mutation -----------------------------------------------------------

    pub fn check_potential_parent_window(&self, window: EntityId) {
        self.lock().check_potential_parent_window(window);
    }

    pub fn refresh_containment(&self) {
        self.lock().refresh_containment();
    }

    pub fn bring_window_to_front(&self, window: EntityId) -> Vec<EntityId> {
        self.lock().bring_window_to_front(window)
    }

    pub fn handle_window_activation(&self, window: EntityId) -> Vec<EntityId> {
        self.lock().handle_window_activation(window)
    }

    /// Applies an effect to `target` and its subtree in one critical section.
    pub fn apply_effect(&self, target: EntityId, effect: &mut Effect) -> usize {
        effect.apply(target, &mut self.lock())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::effects::MovementEffect;
    use crate::core::geometry::Vec2;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn region_snapshot_matches_in_place_computation() {
        let manager = SpatialManager::new(5.0);
        let a = manager.register_window(Rect::new(0.0, 0.0, 300.0, 200.0), Capability::None);
        manager.register_window(Rect::new(300.0, 0.0, 300.0, 200.0), Capability::None);

        let snapshot = manager.calculate_movable_region(a);
        let in_place = manager.read(|s| s.calculate_movable_region(a));

        assert_eq!(snapshot, in_place);
        assert_eq!(snapshot.rects().len(), 2);
    }

    #[test]
    fn unknown_ids_degrade_to_no_match() {
        let manager = SpatialManager::new(5.0);
        let ghost = EntityId(42);

        assert!(manager.bounds(ghost).is_none());
        assert!(manager.window_z_index(ghost).is_none());
        assert!(manager.calculate_movable_region(ghost).is_empty());
        assert!(manager.bring_window_to_front(ghost).is_empty());
        assert!(!manager.unregister_window(ghost));
    }

    #[test]
    fn concurrent_registration_keeps_total_order() {
        let manager = Arc::new(SpatialManager::new(5.0));

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let manager = Arc::clone(&manager);
                thread::spawn(move || {
                    for i in 0..25 {
                        let x = (t * 100 + i) as f32;
                        manager.register_window(Rect::new(x, 0.0, 10.0, 10.0), Capability::None);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let order = manager.read(|s| s.z_order().to_vec());
        assert_eq!(order.len(), 100);
        for (rank, id) in order.iter().enumerate() {
            assert_eq!(manager.window_z_index(*id), Some(rank));
        }
    }

    #[test]
    fn apply_effect_moves_subtree() {
        let manager = SpatialManager::new(5.0);
        let w = manager.register_window(Rect::new(0.0, 0.0, 300.0, 300.0), Capability::Movable);
        let inner = manager.register_window(Rect::new(10.0, 10.0, 30.0, 30.0), Capability::None);
        manager.refresh_containment();

        let mut effect = Effect::from(MovementEffect::with_displacement(Vec2::new(5.0, 5.0)));
        assert_eq!(manager.apply_effect(w, &mut effect), 2);
        assert_eq!(manager.bounds(inner), Some(Rect::new(15.0, 15.0, 30.0, 30.0)));
    }
}
