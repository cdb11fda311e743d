//! Level controller: owns the actor and the loaded level, sequences level
//! loads, runs the death freeze, the rewind state machine and trigger pickups.
//!
//! `physics_tick` runs at the fixed rate and `process_frame` once per
//! presentation frame. A frame that advances a load phase or is frozen by a
//! death does nothing else.

use rwd_core::InputSource;

use crate::actor::{clips, Actor, StepContext};
use crate::collision::Aabb;
use crate::config::GameConfig;
use crate::level::{LevelSource, LoadedLevel, LockColor, TriggerKind};
use crate::presentation::{Presentation, SoundId};
use crate::raycast::ColliderId;
use crate::snapshot::{RewindRecorder, TimeDirection};

/// Level loading advances one phase per presentation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPhase {
    #[default]
    Ready,
    /// Detach the actor and drop the old level.
    Phase1,
    /// Instantiate the new level.
    Phase2,
    /// Reset coin counters, spawn the actor, compute camera bounds.
    Phase3,
    /// Clear rewind history and reveal.
    Complete,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    LevelLoaded { level: String },
    CoinCollected { coins_left: u32 },
    KeyCollected(LockColor),
    LocksOpened { color: LockColor, count: usize },
    PlayerDied,
    PlayerRespawned,
    CreditsReached,
    RewindStarted,
    RewindStopped,
}

pub struct GameController<L: LevelSource> {
    config: GameConfig,
    levels: L,
    actor: Actor,
    level: Option<LoadedLevel>,
    level_visible: bool,
    current_level: String,
    previous_level: String,
    phase: LoadPhase,
    recorder: RewindRecorder,
    elapsed_time: f64,
    frame_counter: u64,
    death_release_frame: u64,
    coins_collected: u32,
    coins_left: u32,
    total_coins_collected: u32,
    coins_collectable: u32,
    camera_bounds: Option<Aabb>,
}

impl<L: LevelSource> GameController<L> {
    /// Create a controller and arm the load of `start_level`.
    pub fn new(config: GameConfig, levels: L, start_level: &str) -> Self {
        let mut actor = Actor::new(&config.actor, ColliderId::PLAYER);
        actor.visible = false;
        let recorder = RewindRecorder::new(config.reverse_limit);

        let mut controller = Self {
            config,
            levels,
            actor,
            level: None,
            level_visible: false,
            current_level: String::new(),
            previous_level: String::new(),
            phase: LoadPhase::Ready,
            recorder,
            elapsed_time: 0.0,
            frame_counter: 0,
            death_release_frame: 0,
            coins_collected: 0,
            coins_left: 0,
            total_coins_collected: 0,
            coins_collectable: 0,
            camera_bounds: None,
        };
        controller.load_level(start_level);
        controller
    }

    /// Start loading `name`. Leaving a level banks its collected coins.
    /// Loading the current level again (a respawn) banks nothing.
    pub fn load_level(&mut self, name: &str) {
        if name != self.current_level {
            self.total_coins_collected += self.coins_collected;
            self.previous_level = std::mem::replace(&mut self.current_level, name.to_string());
        }
        log::info!("Loading level '{}'", name);

        self.phase = LoadPhase::Phase1;
        self.actor.visible = false;
        self.level_visible = false;
    }

    pub fn reload_level(&mut self) {
        let name = self.current_level.clone();
        self.load_level(&name);
    }

    /// One fixed physics tick of the actor against the loaded level, followed
    /// by trigger checks.
    pub fn physics_tick(&mut self, dt: f32, presentation: &mut dyn Presentation) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if !self.actor.attached {
            return events;
        }
        let Some(level) = self.level.as_mut() else {
            return events;
        };

        let mut ctx = StepContext {
            raycaster: &level.world,
            presentation: &mut *presentation,
        };
        self.actor.physics_tick(dt, &mut ctx);

        if self.actor.state.lifecycle.dying {
            return events;
        }
        let entered: Vec<(usize, TriggerKind)> = level
            .entered_triggers(&self.actor.aabb())
            .into_iter()
            .map(|i| (i, level.triggers[i].kind.clone()))
            .collect();
        for (index, kind) in entered {
            self.handle_trigger(index, kind, presentation, &mut events);
        }
        events
    }

    fn handle_trigger(
        &mut self,
        index: usize,
        kind: TriggerKind,
        presentation: &mut dyn Presentation,
        events: &mut Vec<GameEvent>,
    ) {
        if self.actor.state.lifecycle.dying {
            return;
        }
        match kind {
            TriggerKind::Credits => {
                log::info!("Credits zone reached");
                events.push(GameEvent::CreditsReached);
            }
            TriggerKind::Coin => {
                presentation.play_sound(SoundId::CollectCoin);
                self.deactivate_trigger(index);
                self.coins_collected += 1;
                self.coins_left = self.coins_left.saturating_sub(1);
                events.push(GameEvent::CoinCollected {
                    coins_left: self.coins_left,
                });
            }
            TriggerKind::Death => self.kill_actor(presentation, events),
            TriggerKind::Key(color) => {
                presentation.play_sound(SoundId::CollectKey);
                self.deactivate_trigger(index);
                events.push(GameEvent::KeyCollected(color));
                let count = self
                    .level
                    .as_mut()
                    .map_or(0, |level| level.open_locks(color));
                log::info!("{:?} key opened {} locks", color, count);
                events.push(GameEvent::LocksOpened { color, count });
            }
            TriggerKind::LoadLevel(target) => self.load_level(&target),
        }
    }

    fn deactivate_trigger(&mut self, index: usize) {
        if let Some(trigger) = self
            .level
            .as_mut()
            .and_then(|level| level.triggers.get_mut(index))
        {
            trigger.active = false;
        }
    }

    fn kill_actor(&mut self, presentation: &mut dyn Presentation, events: &mut Vec<GameEvent>) {
        if self.actor.state.lifecycle.dying {
            return;
        }
        presentation.play_sound(SoundId::PlayerDeath);
        self.death_release_frame = self
            .frame_counter
            .saturating_add(self.config.death_freeze_frames);

        self.actor.reset(presentation);
        self.actor.state.lifecycle.dying = true;
        self.actor.state.modes.freeze();
        self.actor.play_animation(clips::DEATH, presentation);

        log::info!(
            "Player died at frame {}, respawn at frame {}",
            self.frame_counter,
            self.death_release_frame
        );
        events.push(GameEvent::PlayerDied);
    }

    /// One presentation frame: load phases, death freeze, then rewind or
    /// record, then the actor's own input poll.
    pub fn process_frame(
        &mut self,
        dt: f64,
        input: &dyn InputSource,
        presentation: &mut dyn Presentation,
    ) -> Result<Vec<GameEvent>, String> {
        let mut events = Vec::new();
        self.elapsed_time += dt;
        self.frame_counter += 1;

        let loading = match self.phase {
            LoadPhase::Ready => false,
            LoadPhase::Phase1 => {
                self.load_phase1(presentation);
                self.phase = LoadPhase::Phase2;
                true
            }
            LoadPhase::Phase2 => {
                self.load_phase2()?;
                self.phase = LoadPhase::Phase3;
                true
            }
            LoadPhase::Phase3 => {
                self.load_phase3();
                self.phase = LoadPhase::Complete;
                true
            }
            LoadPhase::Complete => {
                self.load_complete();
                self.phase = LoadPhase::Ready;
                events.push(GameEvent::LevelLoaded {
                    level: self.current_level.clone(),
                });
                true
            }
        };
        // Load frames skip death and rewind, but a placed actor still polls.
        if loading {
            if self.actor.attached {
                self.actor.process(input);
            }
            return Ok(events);
        }

        if self.actor.state.lifecycle.dying {
            if self.frame_counter >= self.death_release_frame {
                self.reload_level();
                self.actor.state.lifecycle.dying = false;
                self.actor.state.modes.thaw();
                events.push(GameEvent::PlayerRespawned);
            }
            return Ok(events);
        }

        let was = self.recorder.direction();
        self.recorder
            .frame(input.rewind_held(), &mut self.actor, presentation);
        match (was, self.recorder.direction()) {
            (TimeDirection::Forward, TimeDirection::Rewinding) => {
                events.push(GameEvent::RewindStarted)
            }
            (TimeDirection::Rewinding, TimeDirection::Forward) => {
                events.push(GameEvent::RewindStopped)
            }
            _ => {}
        }

        if self.actor.attached {
            self.actor.process(input);
        }
        Ok(events)
    }

    fn load_phase1(&mut self, presentation: &mut dyn Presentation) {
        self.actor.attached = false;
        self.actor.reset(presentation);
        self.level = None;
    }

    fn load_phase2(&mut self) -> Result<(), String> {
        let file = self.levels.load_level(&self.current_level)?;
        let level = LoadedLevel::instantiate(&self.current_level, file);
        log::info!(
            "Level '{}' instantiated: {} solid cells, {} triggers, {} locks",
            level.name,
            level.world.grid.solid_count(),
            level.triggers.len(),
            level.locks.len()
        );
        self.level = Some(level);
        Ok(())
    }

    fn load_phase3(&mut self) {
        let Some(level) = self.level.as_ref() else {
            log::warn!("Level '{}' missing in load phase 3", self.current_level);
            return;
        };
        self.coins_collected = 0;
        self.coins_left = level.coin_total;
        if self.previous_level != self.current_level {
            self.coins_collectable += level.coin_total;
        }

        self.actor.state.position = level.spawn;
        self.actor.attached = true;
        self.camera_bounds = Some(level.camera_bounds);
    }

    fn load_complete(&mut self) {
        self.recorder.buffer.clear();
        self.level_visible = true;
        self.actor.visible = true;
        log::info!("Level '{}' ready", self.current_level);
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn actor_mut(&mut self) -> &mut Actor {
        &mut self.actor
    }

    pub fn level(&self) -> Option<&LoadedLevel> {
        self.level.as_ref()
    }

    pub fn is_level_visible(&self) -> bool {
        self.level_visible
    }

    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    pub fn current_level(&self) -> &str {
        &self.current_level
    }

    pub fn previous_level(&self) -> &str {
        &self.previous_level
    }

    pub fn camera_bounds(&self) -> Option<Aabb> {
        self.camera_bounds
    }

    pub fn elapsed_time(&self) -> f64 {
        self.elapsed_time
    }

    pub fn frame_counter(&self) -> u64 {
        self.frame_counter
    }

    pub fn coins_collected(&self) -> u32 {
        self.coins_collected
    }

    pub fn coins_left(&self) -> u32 {
        self.coins_left
    }

    pub fn total_coins_collected(&self) -> u32 {
        self.total_coins_collected
    }

    pub fn coins_collectable(&self) -> u32 {
        self.coins_collectable
    }

    pub fn rewind_direction(&self) -> TimeDirection {
        self.recorder.direction()
    }

    pub fn snapshot_count(&self) -> usize {
        self.recorder.buffer.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{GridCell, GridOrigin};
    use crate::level::{KeyPlacement, LevelFile, LevelPoint, LockPlacement, ZoneKind, ZonePlacement};
    use crate::presentation::RecordingPresentation;
    use glam::Vec2;
    use rwd_core::{Action, InputState};
    use std::collections::HashMap;

    const DT: f32 = 1.0 / 60.0;

    type Levels = HashMap<String, LevelFile>;

    /// 20x12 cells of 16px with a floor on row 10; spawn stands on it.
    fn flat_level(id: &str) -> LevelFile {
        LevelFile {
            version: "0.1".to_string(),
            level_id: id.to_string(),
            cell_size: 16,
            origin: GridOrigin::default(),
            width: 20,
            height: 12,
            solids: (0..20).map(|x| GridCell { x, y: 10 }).collect(),
            spawn: LevelPoint { x: 40.0, y: 152.0 },
            camera_bounds: None,
            coins: Vec::new(),
            keys: Vec::new(),
            locks: Vec::new(),
            zones: Vec::new(),
            pickup_half_extent: 4.0,
        }
    }

    fn zone_at_spawn(kind: ZoneKind) -> ZonePlacement {
        ZonePlacement {
            kind,
            x: 36.0,
            y: 144.0,
            width: 8.0,
            height: 8.0,
        }
    }

    fn controller_with(levels: Vec<LevelFile>, config: GameConfig) -> GameController<Levels> {
        let start = levels[0].level_id.clone();
        let map = levels
            .into_iter()
            .map(|level| (level.level_id.clone(), level))
            .collect();
        GameController::new(config, map, &start)
    }

    fn controller(levels: Vec<LevelFile>) -> GameController<Levels> {
        controller_with(levels, GameConfig::default())
    }

    /// One presentation frame with exactly one physics tick.
    fn frame(
        controller: &mut GameController<Levels>,
        input: &InputState,
        presentation: &mut RecordingPresentation,
    ) -> Vec<GameEvent> {
        let mut events = controller.physics_tick(DT, presentation);
        events.extend(
            controller
                .process_frame(DT as f64, input, presentation)
                .expect("frame should succeed"),
        );
        events
    }

    fn finish_loading(
        controller: &mut GameController<Levels>,
        presentation: &mut RecordingPresentation,
    ) -> Vec<GameEvent> {
        let idle = InputState::new();
        let mut events = Vec::new();
        for _ in 0..4 {
            events.extend(frame(controller, &idle, presentation));
        }
        assert_eq!(controller.phase(), LoadPhase::Ready);
        events
    }

    #[test]
    fn load_phases_advance_one_per_frame() {
        let mut presentation = RecordingPresentation::default();
        let idle = InputState::new();
        let mut controller = controller(vec![flat_level("one")]);
        assert_eq!(controller.phase(), LoadPhase::Phase1);
        assert_eq!(controller.current_level(), "one");

        frame(&mut controller, &idle, &mut presentation);
        assert_eq!(controller.phase(), LoadPhase::Phase2);
        assert!(controller.level().is_none());
        assert!(!controller.actor().attached);

        frame(&mut controller, &idle, &mut presentation);
        assert_eq!(controller.phase(), LoadPhase::Phase3);
        assert!(controller.level().is_some());
        assert!(!controller.actor().attached);

        frame(&mut controller, &idle, &mut presentation);
        assert_eq!(controller.phase(), LoadPhase::Complete);
        assert!(controller.actor().attached);
        assert_eq!(controller.actor().state.position, Vec2::new(40.0, 152.0));
        assert!(!controller.actor().visible);
        let bounds = controller.camera_bounds().expect("bounds after phase 3");
        assert_eq!(bounds.max(), Vec2::new(320.0, 192.0));

        let events = frame(&mut controller, &idle, &mut presentation);
        assert_eq!(controller.phase(), LoadPhase::Ready);
        assert!(controller.actor().visible);
        assert!(controller.is_level_visible());
        assert_eq!(controller.snapshot_count(), 0);
        assert_eq!(
            events,
            vec![GameEvent::LevelLoaded {
                level: "one".to_string()
            }]
        );

        frame(&mut controller, &idle, &mut presentation);
        assert_eq!(controller.snapshot_count(), 1);
        assert_eq!(controller.frame_counter(), 5);
        assert!((controller.elapsed_time() - 5.0 / 60.0).abs() < 1e-6);
    }

    #[test]
    fn load_completion_clears_history() {
        let mut presentation = RecordingPresentation::default();
        let idle = InputState::new();
        let mut controller = controller(vec![flat_level("one")]);
        finish_loading(&mut controller, &mut presentation);
        for _ in 0..10 {
            frame(&mut controller, &idle, &mut presentation);
        }
        assert_eq!(controller.snapshot_count(), 10);

        controller.reload_level();
        finish_loading(&mut controller, &mut presentation);
        assert_eq!(controller.snapshot_count(), 0);
    }

    #[test]
    fn missing_level_fails_in_phase_two() {
        let mut presentation = RecordingPresentation::default();
        let idle = InputState::new();
        let mut controller = controller(vec![flat_level("one")]);
        controller.load_level("nowhere");

        controller
            .process_frame(DT as f64, &idle, &mut presentation)
            .expect("phase 1 cannot fail");
        let err = controller
            .process_frame(DT as f64, &idle, &mut presentation)
            .expect_err("unknown level should fail");
        assert!(err.contains("nowhere"));
        assert_eq!(controller.phase(), LoadPhase::Phase2);
    }

    #[test]
    fn coins_are_collected_once() {
        let mut presentation = RecordingPresentation::default();
        let idle = InputState::new();
        let mut level = flat_level("one");
        level.coins = vec![
            LevelPoint { x: 40.0, y: 150.0 },
            LevelPoint { x: 200.0, y: 150.0 },
        ];
        let mut controller = controller(vec![level]);

        let events = finish_loading(&mut controller, &mut presentation);
        assert!(events.contains(&GameEvent::CoinCollected { coins_left: 1 }));
        assert_eq!(controller.coins_collected(), 1);
        assert_eq!(controller.coins_left(), 1);
        let level = controller.level().expect("level loaded");
        assert_eq!(level.coins_remaining(), controller.coins_left());
        assert_eq!(controller.coins_collectable(), 2);
        assert_eq!(presentation.sounds(), vec![SoundId::CollectCoin]);

        for _ in 0..5 {
            frame(&mut controller, &idle, &mut presentation);
        }
        assert_eq!(controller.coins_collected(), 1);
    }

    #[test]
    fn key_opens_matching_locks_only() {
        let mut presentation = RecordingPresentation::default();
        let mut level = flat_level("one");
        level.keys = vec![KeyPlacement {
            color: LockColor::Gold,
            x: 40.0,
            y: 150.0,
        }];
        level.locks = vec![
            LockPlacement {
                color: LockColor::Gold,
                x: 8,
                y: 8,
                width: 1,
                height: 2,
            },
            LockPlacement {
                color: LockColor::Gold,
                x: 12,
                y: 9,
                width: 1,
                height: 1,
            },
            LockPlacement {
                color: LockColor::Silver,
                x: 15,
                y: 9,
                width: 1,
                height: 1,
            },
        ];
        let mut controller = controller(vec![level]);

        let events = finish_loading(&mut controller, &mut presentation);

        assert!(events.contains(&GameEvent::KeyCollected(LockColor::Gold)));
        assert!(events.contains(&GameEvent::LocksOpened {
            color: LockColor::Gold,
            count: 2
        }));
        assert_eq!(presentation.sounds(), vec![SoundId::CollectKey]);
        let level = controller.level().expect("level loaded");
        assert_eq!(level.world.bodies().len(), 1);
        assert_eq!(level.locks[0].color, LockColor::Silver);
    }

    #[test]
    fn death_freezes_then_reloads() {
        let mut presentation = RecordingPresentation::default();
        let idle = InputState::new();
        let mut level = flat_level("one");
        level.zones = vec![zone_at_spawn(ZoneKind::Death)];
        let config = GameConfig {
            death_freeze_frames: 5,
            ..GameConfig::default()
        };
        let mut controller = controller_with(vec![level], config);
        let idle_frames = |controller: &mut GameController<Levels>,
                           presentation: &mut RecordingPresentation| {
            for _ in 0..3 {
                frame(controller, &idle, presentation);
            }
        };
        idle_frames(&mut controller, &mut presentation);

        // First tick with the actor placed lands it in the zone.
        let mut events = controller.physics_tick(DT, &mut presentation);
        assert_eq!(events, vec![GameEvent::PlayerDied]);
        let death_frame = controller.frame_counter();
        let actor = controller.actor();
        assert!(actor.state.lifecycle.dying);
        assert!(!actor.state.modes.input_enabled && !actor.state.modes.collision_enabled);
        assert_eq!(actor.state.velocity, Vec2::ZERO);
        assert_eq!(actor.state.animation.clip_name, clips::DEATH);
        assert_eq!(presentation.sounds(), vec![SoundId::PlayerDeath]);

        events.extend(
            controller
                .process_frame(DT as f64, &idle, &mut presentation)
                .expect("complete phase"),
        );
        while controller.frame_counter() < death_frame + 4 {
            frame(&mut controller, &idle, &mut presentation);
            assert!(controller.actor().state.lifecycle.dying);
            assert_eq!(controller.actor().state.position, Vec2::new(40.0, 152.0));
        }

        let events = frame(&mut controller, &idle, &mut presentation);
        assert_eq!(controller.frame_counter(), death_frame + 5);
        assert_eq!(events, vec![GameEvent::PlayerRespawned]);
        let actor = controller.actor();
        assert!(!actor.state.lifecycle.dying);
        assert!(actor.state.modes.input_enabled && actor.state.modes.collision_enabled);
        assert_eq!(controller.phase(), LoadPhase::Phase1);
        assert_eq!(controller.previous_level(), "");
    }

    #[test]
    fn dying_actor_ignores_triggers() {
        let mut presentation = RecordingPresentation::default();
        let mut level = flat_level("one");
        level.zones = vec![zone_at_spawn(ZoneKind::Death)];
        level.coins = vec![LevelPoint { x: 40.0, y: 150.0 }];
        let mut controller = controller(vec![level]);
        let idle = InputState::new();
        for _ in 0..3 {
            frame(&mut controller, &idle, &mut presentation);
        }

        let events = controller.physics_tick(DT, &mut presentation);

        // The coin precedes the zone in trigger order; the zone kills, and
        // nothing after it in the same tick is handled.
        assert_eq!(
            events,
            vec![GameEvent::CoinCollected { coins_left: 0 }, GameEvent::PlayerDied]
        );
        let events = controller.physics_tick(DT, &mut presentation);
        assert!(events.is_empty());
    }

    #[test]
    fn load_level_zone_switches_levels_and_banks_coins() {
        let mut presentation = RecordingPresentation::default();
        let mut one = flat_level("one");
        one.coins = vec![LevelPoint { x: 40.0, y: 150.0 }];
        one.zones = vec![ZonePlacement {
            kind: ZoneKind::LoadLevel {
                level: "two".to_string(),
            },
            x: 100.0,
            y: 144.0,
            width: 8.0,
            height: 16.0,
        }];
        let mut two = flat_level("two");
        two.coins = vec![
            LevelPoint { x: 200.0, y: 100.0 },
            LevelPoint { x: 220.0, y: 100.0 },
        ];
        let mut controller = controller(vec![one, two]);
        finish_loading(&mut controller, &mut presentation);
        assert_eq!(controller.coins_collected(), 1);

        let mut right = InputState::new();
        right.press(Action::MoveRight);
        for _ in 0..120 {
            frame(&mut controller, &right, &mut presentation);
            if controller.current_level() == "two" {
                break;
            }
        }
        assert_eq!(controller.current_level(), "two");
        assert_eq!(controller.previous_level(), "one");
        assert_eq!(controller.total_coins_collected(), 1);

        finish_loading(&mut controller, &mut presentation);
        assert_eq!(controller.coins_collected(), 0);
        assert_eq!(controller.coins_left(), 2);
        assert_eq!(controller.coins_collectable(), 3);
    }

    #[test]
    fn credits_zone_is_reported() {
        let mut presentation = RecordingPresentation::default();
        let mut level = flat_level("one");
        level.zones = vec![zone_at_spawn(ZoneKind::Credits)];
        let mut controller = controller(vec![level]);
        let events = finish_loading(&mut controller, &mut presentation);
        assert!(events.contains(&GameEvent::CreditsReached));
    }

    #[test]
    fn rewind_replays_history_backwards() {
        let mut presentation = RecordingPresentation::default();
        let mut controller = controller(vec![flat_level("one")]);
        finish_loading(&mut controller, &mut presentation);

        let mut right = InputState::new();
        right.press(Action::MoveRight);
        let mut positions = Vec::new();
        for _ in 0..20 {
            frame(&mut controller, &right, &mut presentation);
            positions.push(controller.actor().state.position);
        }
        assert!(positions[19].x > positions[0].x);

        let mut rewind = InputState::new();
        rewind.press(Action::Rewind);
        let events = frame(&mut controller, &rewind, &mut presentation);
        assert_eq!(events, vec![GameEvent::RewindStarted]);
        assert!(!controller.actor().is_processing());
        assert_eq!(controller.actor().state.position, positions[19]);

        for back in 1..10 {
            frame(&mut controller, &rewind, &mut presentation);
            assert_eq!(controller.actor().state.position, positions[19 - back]);
        }
        assert_eq!(controller.rewind_direction(), TimeDirection::Rewinding);
        assert_eq!(controller.snapshot_count(), 10);

        let held_at = controller.actor().state.position;
        let events = frame(&mut controller, &InputState::new(), &mut presentation);
        assert_eq!(events, vec![GameEvent::RewindStopped]);
        assert!(controller.actor().is_processing());
        assert_eq!(controller.actor().state.position, held_at);
        assert_eq!(controller.snapshot_count(), 11);
    }

    #[test]
    fn jump_pressed_on_the_reveal_frame_is_polled() {
        let mut presentation = RecordingPresentation::default();
        let idle = InputState::new();
        let mut controller = controller(vec![flat_level("one")]);
        for _ in 0..3 {
            frame(&mut controller, &idle, &mut presentation);
        }
        assert_eq!(controller.phase(), LoadPhase::Complete);

        let mut jump = InputState::new();
        jump.press(Action::Jump);
        let events = frame(&mut controller, &jump, &mut presentation);
        assert!(events.contains(&GameEvent::LevelLoaded {
            level: "one".to_string()
        }));
        assert!(controller.actor().state.intent.jump_queued);

        frame(&mut controller, &jump, &mut presentation);
        assert_eq!(controller.actor().state.jump_count, 1);
        assert!(controller.actor().state.velocity.y < 0.0);
        assert!(presentation.sounds().contains(&SoundId::Jump));
    }

    #[test]
    fn oversized_death_freeze_saturates() {
        let mut presentation = RecordingPresentation::default();
        let idle = InputState::new();
        let mut level = flat_level("one");
        level.zones = vec![zone_at_spawn(ZoneKind::Death)];
        let config = GameConfig {
            death_freeze_frames: u64::MAX,
            ..GameConfig::default()
        };
        let mut controller = controller_with(vec![level], config);
        for _ in 0..3 {
            frame(&mut controller, &idle, &mut presentation);
        }

        let events = controller.physics_tick(DT, &mut presentation);
        assert_eq!(events, vec![GameEvent::PlayerDied]);
        for _ in 0..10 {
            let events = frame(&mut controller, &idle, &mut presentation);
            assert!(!events.contains(&GameEvent::PlayerRespawned));
        }
        assert!(controller.actor().state.lifecycle.dying);
    }
}
