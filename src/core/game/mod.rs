//=========================================================================
// Game
//=========================================================================
//
// Stage progression and the fixed per-frame update.
//
// Frame order:
//   1. restart request
//   2. surface events (external, then pointer drags)
//   3. restore request
//   4. player (input → resolver → grounding)
//   5. active resize effects
//   6. containment refresh
//   7. goal check → next stage / cleared
//
// Game owns no geometry itself; everything spatial goes through the
// shared `SpatialManager`.
//
//=========================================================================

//=== Module Declarations =================================================

mod drag;
mod player;

//=== Public API ==========================================================

pub use drag::DragController;
pub use player::PlayerController;

//=== External Dependencies ===============================================

use std::collections::BTreeMap;
use std::sync::Arc;

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use crate::core::effects::{Effect, MinimizeEffect, ResizeEffect};
use crate::core::effects::EffectKind;
use crate::core::entity::{EntityId, EntityKind};
use crate::core::geometry::Vec2;
use crate::core::input::{Control, InputSource};
use crate::core::motion::move_entity;
use crate::core::settings::Settings;
use crate::core::spatial::SpatialManager;
use crate::core::stage::{StageDefinition, StageError};
use crate::core::surface::{RenderSurface, SurfaceEvent};

//=== GameStatus ==========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Playing { stage: usize },
    /// Last stage's goal was reached.
    Cleared,
}

//=== Game ================================================================

pub struct Game {
    spatial: Arc<SpatialManager>,
    settings: Settings,
    stages: Vec<StageDefinition>,
    current: usize,
    status: GameStatus,

    player: PlayerController,
    goal: Option<EntityId>,
    drag: DragController,

    /// One resize effect per window that has been resized this stage.
    resize_effects: BTreeMap<EntityId, Effect>,
    /// Hidden groups, oldest first; each group lists its target first.
    minimized: Vec<Vec<EntityId>>,
    frame: u64,
}

impl Game {
    /// Validates every stage and loads the first one.
    pub fn new(stages: Vec<StageDefinition>, settings: Settings) -> Result<Self, StageError> {
        let first = stages.first().ok_or(StageError::NoStages)?;
        for stage in &stages {
            stage.validate()?;
        }

        let spatial = Arc::new(SpatialManager::new(settings.adjacency_tolerance));
        let player_id = spatial.spawn_entity(EntityKind::Player, first.spawn);

        let mut game = Self {
            spatial,
            settings,
            stages,
            current: 0,
            status: GameStatus::Playing { stage: 0 },
            player: PlayerController::new(player_id, &settings),
            goal: None,
            drag: DragController::new(),
            resize_effects: BTreeMap::new(),
            minimized: Vec::new(),
            frame: 0,
        };
        game.load_stage(0)?;
        Ok(game)
    }

    //--- Accessors --------------------------------------------------------

    pub fn spatial(&self) -> &Arc<SpatialManager> {
        &self.spatial
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn current_stage(&self) -> usize {
        self.current
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    pub fn player(&self) -> &PlayerController {
        &self.player
    }

    pub fn player_id(&self) -> EntityId {
        self.player.id()
    }

    pub fn goal_id(&self) -> Option<EntityId> {
        self.goal
    }

    //=====================================================================
    // Stage Lifecycle
    //=====================================================================

    /// Replaces the world with stage `index`.
    ///
    /// An out-of-range index is reported and leaves the current stage
    /// untouched.
    pub fn load_stage(&mut self, index: usize) -> Result<(), StageError> {
        let Some(stage) = self.stages.get(index) else {
            warn!(target: "stage", "Stage {} does not exist ({} stages)", index, self.stages.len());
            return Err(StageError::IndexOutOfRange {
                index,
                count: self.stages.len(),
            });
        };

        info!(
            target: "stage",
            "Loading stage {} '{}' ({} windows, {} zones)",
            index,
            stage.name,
            stage.windows.len(),
            stage.no_entry.len()
        );

        let player = self.player.id();
        let goal = self.spatial.write(|s| {
            s.clear_stage();
            s.set_play_area(Some(stage.play_area));
            for window in &stage.windows {
                s.register_window(window.bounds, window.capability);
            }
            for zone in &stage.no_entry {
                s.register_zone(*zone);
            }
            let goal = s.spawn_entity(EntityKind::Goal, stage.goal);

            s.set_bounds(player, stage.spawn);
            s.detach(player);
            s.refresh_containment();
            let home = s.window_fully_containing(&stage.spawn);
            s.set_parent(player, home);
            goal
        });

        self.goal = Some(goal);
        self.current = index;
        self.status = GameStatus::Playing { stage: index };
        self.player.respawn();
        self.drag.cancel();
        self.resize_effects.clear();
        self.minimized.clear();
        Ok(())
    }

    /// Reloads the current stage.
    pub fn restart(&mut self) {
        info!(target: "stage", "Restarting stage {}", self.current);
        if let Err(e) = self.load_stage(self.current) {
            warn!(target: "stage", "Restart failed: {}", e);
        }
    }

    fn advance(&mut self) {
        let next = self.current + 1;
        if next < self.stages.len() {
            info!(target: "stage", "Stage {} cleared", self.current);
            if let Err(e) = self.load_stage(next) {
                warn!(target: "stage", "Could not advance: {}", e);
            }
        } else {
            info!(target: "stage", "All {} stages cleared", self.stages.len());
            self.status = GameStatus::Cleared;
        }
    }

    //=====================================================================
    // Frame Update
    //=====================================================================

    /// Runs one frame and returns the resulting status.
    pub fn update(
        &mut self,
        input: &impl InputSource,
        surface_events: impl IntoIterator<Item = SurfaceEvent>,
    ) -> GameStatus {
        if self.status == GameStatus::Cleared {
            return self.status;
        }
        if input.was_pressed(Control::Restart) {
            self.restart();
            return self.status;
        }

        for event in surface_events {
            self.apply_surface_event(event);
        }
        for event in self.drag.update(input.pointer(), &self.spatial) {
            self.apply_surface_event(event);
        }
        if input.was_pressed(Control::Restore) {
            self.restore_last();
        }

        self.player.update(&self.spatial, input, &self.settings);

        for (&id, effect) in self.resize_effects.iter_mut() {
            if effect.is_active() {
                self.spatial.apply_effect(id, effect);
            }
        }
        self.spatial.refresh_containment();

        if self.goal_reached() {
            self.advance();
        }
        self.status
    }

    /// Draws every visible entity back to front.
    pub fn render(&mut self, surface: &mut dyn RenderSurface) {
        self.frame += 1;
        let views = self.spatial.views();

        surface.begin_frame(self.frame);
        for view in &views {
            surface.draw(view);
        }
        surface.end_frame();
    }

    //--- Surface Events ---------------------------------------------------

    /// Applies one window notification.
    pub fn apply_surface_event(&mut self, event: SurfaceEvent) {
        let id = match event {
            SurfaceEvent::Moved { id, .. }
            | SurfaceEvent::Resized { id, .. }
            | SurfaceEvent::Activated(id)
            | SurfaceEvent::Closed(id)
            | SurfaceEvent::Minimized(id)
            | SurfaceEvent::Restored(id) => id,
        };
        let is_window = self
            .spatial
            .read(|s| s.get(id).is_some_and(|e| e.kind() == EntityKind::Window));
        if !is_window {
            warn!(target: "stage", "Ignoring {:?}: {} is not a window", event, id);
            return;
        }

        match event {
            SurfaceEvent::Moved { id, position } => {
                if let Some(bounds) = self.spatial.bounds(id) {
                    move_entity(&self.spatial, id, position - bounds.position());
                }
            }
            SurfaceEvent::Resized { id, size } => self.resize_window(id, size),
            SurfaceEvent::Activated(id) => {
                self.spatial.handle_window_activation(id);
            }
            SurfaceEvent::Closed(id) => self.close_window(id),
            SurfaceEvent::Minimized(id) => self.minimize(id),
            SurfaceEvent::Restored(id) => self.restore(id),
        }
    }

    fn resize_window(&mut self, id: EntityId, size: Vec2) {
        let resizable = self
            .spatial
            .read(|s| s.get(id).is_some_and(|e| e.accepts(EffectKind::Resize)));
        if !resizable {
            debug!(target: "effects", "{} does not accept resizing", id);
            return;
        }

        let min_size = self.settings.min_window_size;
        let effect = self
            .resize_effects
            .entry(id)
            .or_insert_with(|| Effect::from(ResizeEffect::new(min_size)));

        let Effect::Resize(resize) = effect else { return };
        self.spatial.read(|s| resize.register(id, s));

        match resize.reference_size(id) {
            Some(reference) if reference.x > 0.0 && reference.y > 0.0 => {
                resize.set_scale(Vec2::new(size.x / reference.x, size.y / reference.y));
            }
            _ => warn!(target: "effects", "No reference size for {}", id),
        }
    }

    fn close_window(&mut self, id: EntityId) {
        if !self.spatial.unregister_window(id) {
            return;
        }
        self.resize_effects.remove(&id);
        for group in &mut self.minimized {
            group.retain(|&w| w != id);
        }
        self.minimized.retain(|group| !group.is_empty());
        if self.drag.dragged() == Some(id) {
            self.drag.cancel();
        }
        debug!(target: "stage", "Window {} closed", id);
    }

    fn minimize(&mut self, id: EntityId) {
        let hidden = self.spatial.write(|s| MinimizeEffect::new().apply(id, s));
        if hidden.is_empty() {
            debug!(target: "effects", "Window {} cannot be minimized", id);
            return;
        }
        if self.drag.dragged().is_some_and(|d| hidden.contains(&d)) {
            self.drag.cancel();
        }
        self.minimized.push(hidden);
    }

    /// Restores the group `id` was minimized with, or just `id`.
    fn restore(&mut self, id: EntityId) {
        let group = match self.minimized.iter().position(|g| g.first() == Some(&id)) {
            Some(index) => self.minimized.remove(index),
            None => vec![id],
        };
        self.restore_group(&group);
    }

    /// Restores the most recently minimized group.
    pub fn restore_last(&mut self) -> bool {
        match self.minimized.pop() {
            Some(group) => {
                self.restore_group(&group);
                true
            }
            None => false,
        }
    }

    fn restore_group(&self, group: &[EntityId]) {
        let restored = self
            .spatial
            .write(|s| group.iter().filter(|&&w| s.restore(w)).count());
        debug!(target: "effects", "Restored {} of {} windows", restored, group.len());
    }

    //--- Goal ---------------------------------------------------------------

    /// Player overlaps the goal and no window above the goal's layer covers
    /// the overlap.
    fn goal_reached(&self) -> bool {
        let Some(goal) = self.goal else { return false };
        let player = self.player.id();

        self.spatial.read(|s| {
            let (Some(p), Some(g)) = (s.bounds(player), s.bounds(goal)) else {
                return false;
            };
            let Some(overlap) = p.intersection(&g) else {
                return false;
            };
            let layer = s.parent(goal).and_then(|w| s.window_z_index(w));

            s.intersecting_windows(&overlap)
                .into_iter()
                .filter_map(|w| s.window_z_index(w))
                .all(|z| layer.is_some_and(|l| z <= l))
        })
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
