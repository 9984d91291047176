//=========================================================================
// Stages
//=========================================================================
//
// Declarative stage layouts and their validation.
//
// A stage lists its windows back to front; registration order becomes the
// initial Z-order. Containment between them is derived from geometry when
// the stage loads, never declared.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

//=== Internal Dependencies ===============================================

use crate::core::entity::Capability;
use crate::core::geometry::Rect;

//=== WindowSpec ==========================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowSpec {
    pub bounds: Rect,
    pub capability: Capability,
}

//=== StageDefinition =====================================================

/// Layout of one stage.
#[derive(Debug, Clone, PartialEq)]
pub struct StageDefinition {
    pub name: String,
    pub play_area: Rect,
    /// Player bounds at stage start.
    pub spawn: Rect,
    pub goal: Rect,
    /// Back to front.
    pub windows: Vec<WindowSpec>,
    pub no_entry: Vec<Rect>,
}

impl StageDefinition {
    pub fn new(name: impl Into<String>, play_area: Rect, spawn: Rect, goal: Rect) -> Self {
        Self {
            name: name.into(),
            play_area,
            spawn,
            goal,
            windows: Vec::new(),
            no_entry: Vec::new(),
        }
    }

    /// Adds a window in front of the ones already listed.
    pub fn with_window(mut self, bounds: Rect, capability: Capability) -> Self {
        self.windows.push(WindowSpec { bounds, capability });
        self
    }

    pub fn with_zone(mut self, bounds: Rect) -> Self {
        self.no_entry.push(bounds);
        self
    }

    /// Checks that the layout can be loaded.
    pub fn validate(&self) -> Result<(), StageError> {
        let stage = self.name.clone();

        if !has_area(&self.play_area) {
            return Err(StageError::EmptyPlayArea { stage });
        }
        if !has_area(&self.spawn) || !self.play_area.contains_rect(&self.spawn) {
            return Err(StageError::OutsidePlayArea { stage, what: "spawn" });
        }
        if !has_area(&self.goal) || !self.play_area.contains_rect(&self.goal) {
            return Err(StageError::OutsidePlayArea { stage, what: "goal" });
        }
        if let Some(index) = self.windows.iter().position(|w| !has_area(&w.bounds)) {
            return Err(StageError::DegenerateWindow { stage, index });
        }
        if self.no_entry.iter().any(|z| z.intersects(&self.spawn)) {
            return Err(StageError::SpawnBlocked { stage });
        }
        Ok(())
    }
}

fn has_area(rect: &Rect) -> bool {
    rect.w > 0.0 && rect.h > 0.0
}

//=== StageError ==========================================================

/// Stage loading and validation errors.
#[derive(Debug, Clone, PartialEq)]
pub enum StageError {
    /// No stages were supplied.
    NoStages,

    /// Requested stage index does not exist.
    IndexOutOfRange { index: usize, count: usize },

    EmptyPlayArea { stage: String },

    /// Spawn or goal is empty or leaves the play area.
    OutsidePlayArea { stage: String, what: &'static str },

    DegenerateWindow { stage: String, index: usize },

    /// Spawn overlaps a no-entry zone.
    SpawnBlocked { stage: String },
}

impl fmt::Display for StageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoStages => write!(f, "No stages defined"),
            Self::IndexOutOfRange { index, count } => {
                write!(f, "Stage index {} out of range ({} stages)", index, count)
            }
            Self::EmptyPlayArea { stage } => write!(f, "Stage '{}': play area has no area", stage),
            Self::OutsidePlayArea { stage, what } => {
                write!(f, "Stage '{}': {} must lie inside the play area", stage, what)
            }
            Self::DegenerateWindow { stage, index } => {
                write!(f, "Stage '{}': window {} has no area", stage, index)
            }
            Self::SpawnBlocked { stage } => write!(f, "Stage '{}': spawn overlaps a no-entry zone", stage),
        }
    }
}

impl std::error::Error for StageError {}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn stage() -> StageDefinition {
        StageDefinition::new(
            "test",
            Rect::new(0.0, 0.0, 800.0, 600.0),
            Rect::new(10.0, 10.0, 40.0, 40.0),
            Rect::new(700.0, 500.0, 40.0, 40.0),
        )
    }

    #[test]
    fn valid_stage_passes() {
        let s = stage()
            .with_window(Rect::new(0.0, 0.0, 300.0, 200.0), Capability::Movable)
            .with_zone(Rect::new(400.0, 400.0, 50.0, 50.0));
        assert_eq!(s.validate(), Ok(()));
        assert_eq!(s.windows.len(), 1);
    }

    #[test]
    fn goal_outside_play_area_is_rejected() {
        let mut s = stage();
        s.goal = Rect::new(790.0, 0.0, 40.0, 40.0);
        assert_eq!(
            s.validate(),
            Err(StageError::OutsidePlayArea { stage: "test".into(), what: "goal" })
        );
    }

    #[test]
    fn degenerate_window_reports_index() {
        let s = stage()
            .with_window(Rect::new(0.0, 0.0, 300.0, 200.0), Capability::None)
            .with_window(Rect::new(0.0, 0.0, 0.0, 200.0), Capability::None);
        assert_eq!(s.validate(), Err(StageError::DegenerateWindow { stage: "test".into(), index: 1 }));
    }

    #[test]
    fn blocked_spawn_is_rejected() {
        let s = stage().with_zone(Rect::new(0.0, 0.0, 30.0, 30.0));
        assert!(matches!(s.validate(), Err(StageError::SpawnBlocked { .. })));
    }

    #[test]
    fn error_messages_name_the_stage() {
        let err = StageError::IndexOutOfRange { index: 5, count: 2 };
        assert_eq!(err.to_string(), "Stage index 5 out of range (2 stages)");
    }
}
