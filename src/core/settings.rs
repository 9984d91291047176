//=========================================================================
// Settings
//=========================================================================
//
// Session-wide tuning constants (movement feel, tolerances, limits).
//
// Built once through the fluent setters and handed to the game by value;
// nothing mutates it while a session runs.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::geometry::Vec2;

//=== Settings ============================================================

/// Tuning constants shared by the resolver, effects and player controller.
///
/// # Default Values
///
/// - **move_speed**: 5.0 px/frame
/// - **gravity**: 0.6 px/frame²
/// - **jump_force**: 12.0 px/frame
/// - **max_fall_speed**: 15.0 px/frame
/// - **adjacency_tolerance**: 5.0 px
/// - **ground_tolerance**: 2.0 px
/// - **ground_segments**: 4
/// - **min_window_size**: 40×40 px
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    pub move_speed: f32,
    pub gravity: f32,
    pub jump_force: f32,
    pub max_fall_speed: f32,
    pub adjacency_tolerance: f32,
    pub ground_tolerance: f32,
    pub ground_segments: usize,
    pub min_window_size: Vec2,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            gravity: 0.6,
            jump_force: 12.0,
            max_fall_speed: 15.0,
            adjacency_tolerance: 5.0,
            ground_tolerance: 2.0,
            ground_segments: 4,
            min_window_size: Vec2::new(40.0, 40.0),
        }
    }
}

impl Settings {
    /// # Panics
    ///
    /// Panics if `speed` is negative.
    pub fn with_move_speed(mut self, speed: f32) -> Self {
        assert!(speed >= 0.0, "Move speed must be non-negative, got {}", speed);
        self.move_speed = speed;
        self
    }

    /// # Panics
    ///
    /// Panics if `gravity <= 0.0`.
    pub fn with_gravity(mut self, gravity: f32) -> Self {
        assert!(gravity > 0.0, "Gravity must be positive, got {}", gravity);
        self.gravity = gravity;
        self
    }

    /// # Panics
    ///
    /// Panics if `force` is negative.
    pub fn with_jump_force(mut self, force: f32) -> Self {
        assert!(force >= 0.0, "Jump force must be non-negative, got {}", force);
        self.jump_force = force;
        self
    }

    /// # Panics
    ///
    /// Panics if `speed <= 0.0`.
    pub fn with_max_fall_speed(mut self, speed: f32) -> Self {
        assert!(speed > 0.0, "Max fall speed must be positive, got {}", speed);
        self.max_fall_speed = speed;
        self
    }

    /// Distance within which facing window edges count as touching.
    ///
    /// # Panics
    ///
    /// Panics if `tolerance` is negative.
    pub fn with_adjacency_tolerance(mut self, tolerance: f32) -> Self {
        assert!(tolerance >= 0.0, "Adjacency tolerance must be non-negative");
        self.adjacency_tolerance = tolerance;
        self
    }

    /// Slack around the feet when searching for a floor.
    ///
    /// # Panics
    ///
    /// Panics if `tolerance` is negative.
    pub fn with_ground_tolerance(mut self, tolerance: f32) -> Self {
        assert!(tolerance >= 0.0, "Ground tolerance must be non-negative");
        self.ground_tolerance = tolerance;
        self
    }

    /// # Panics
    ///
    /// Panics if `segments == 0`.
    pub fn with_ground_segments(mut self, segments: usize) -> Self {
        assert!(segments > 0, "Ground segments must be positive");
        self.ground_segments = segments;
        self
    }

    /// # Panics
    ///
    /// Panics if either component is not positive.
    pub fn with_min_window_size(mut self, size: Vec2) -> Self {
        assert!(size.x > 0.0 && size.y > 0.0, "Minimum window size must be positive, got {:?}", size);
        self.min_window_size = size;
        self
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = Settings::default();
        assert_eq!(s.ground_segments, 4);
        assert_eq!(s.adjacency_tolerance, 5.0);
        assert_eq!(s.min_window_size, Vec2::new(40.0, 40.0));
    }

    #[test]
    fn setters_chain() {
        let s = Settings::default().with_gravity(1.0).with_ground_segments(8).with_move_speed(3.0);
        assert_eq!(s.gravity, 1.0);
        assert_eq!(s.ground_segments, 8);
        assert_eq!(s.move_speed, 3.0);
    }

    #[test]
    #[should_panic(expected = "Gravity must be positive")]
    fn zero_gravity_panics() {
        Settings::default().with_gravity(0.0);
    }

    #[test]
    #[should_panic(expected = "Ground segments must be positive")]
    fn zero_segments_panics() {
        Settings::default().with_ground_segments(0);
    }
}
