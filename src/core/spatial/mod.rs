//=========================================================================
// Spatial System
//=========================================================================
//
// Authoritative Z-ordered window list and every containment query.
//
// Architecture:
//   SpatialManager (Mutex, shared via Arc)
//     └─ WindowStack (entities, z_order, zones, play area)
//          └─ MovableRegion (computed from snapshots)
//
// Flow per frame:
//   drain surface events → resolver queries → commit bounds
//     → refresh_containment() → effects cascade down the tree
//
//=========================================================================

//=== Module Declarations =================================================

mod manager;
mod region;
mod stack;

//=== Public API ==========================================================

pub use manager::SpatialManager;
pub use region::MovableRegion;
pub use stack::WindowStack;
