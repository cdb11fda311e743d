//! Frame-accurate rewind.
//!
//! While time runs forward the actor's full state is captured once per
//! presentation frame into a bounded history. Holding rewind suspends the
//! actor and pops that history newest-first, restoring one frame per frame.

use std::collections::VecDeque;

use crate::actor::{Actor, ActorState};
use crate::presentation::Presentation;

/// One frame of actor state.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    state: ActorState,
}

impl Snapshot {
    pub fn capture(actor: &Actor) -> Self {
        Self {
            state: actor.state.clone(),
        }
    }

    pub fn state(&self) -> &ActorState {
        &self.state
    }

    /// Write this frame back onto `actor`. `dying` is never rewound: a death
    /// in progress stays in progress.
    pub fn restore_onto(&self, actor: &mut Actor, presentation: &mut dyn Presentation) {
        let dying = actor.state.lifecycle.dying;
        actor.state = self.state.clone();
        actor.state.lifecycle.dying = dying;

        let animation = &actor.state.animation;
        presentation.play_animation(&animation.clip_name);
        presentation.set_animation_frame(animation.frame_index);
    }
}

/// Bounded history holding at most `reverse_limit - 1` snapshots.
#[derive(Debug, Clone)]
pub struct RewindBuffer {
    snapshots: VecDeque<Snapshot>,
    reverse_limit: usize,
}

impl RewindBuffer {
    pub fn new(reverse_limit: usize) -> Self {
        Self {
            snapshots: VecDeque::new(),
            reverse_limit,
        }
    }

    pub fn capacity(&self) -> usize {
        self.reverse_limit.saturating_sub(1)
    }

    /// Append, evicting from the front once the history is full.
    pub fn record(&mut self, snapshot: Snapshot) {
        let capacity = self.capacity();
        if capacity == 0 {
            return;
        }
        while self.snapshots.len() >= capacity {
            self.snapshots.pop_front();
        }
        self.snapshots.push_back(snapshot);
    }

    pub fn pop_newest(&mut self) -> Option<Snapshot> {
        self.snapshots.pop_back()
    }

    pub fn oldest(&self) -> Option<&Snapshot> {
        self.snapshots.front()
    }

    pub fn newest(&self) -> Option<&Snapshot> {
        self.snapshots.back()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeDirection {
    #[default]
    Forward,
    Rewinding,
}

/// What one recorder frame did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewindOutcome {
    Recorded,
    Restored,
    /// Rewinding with nothing left to restore.
    Exhausted,
}

#[derive(Debug, Clone)]
pub struct RewindRecorder {
    pub buffer: RewindBuffer,
    direction: TimeDirection,
}

impl RewindRecorder {
    pub fn new(reverse_limit: usize) -> Self {
        Self {
            buffer: RewindBuffer::new(reverse_limit),
            direction: TimeDirection::Forward,
        }
    }

    pub fn direction(&self) -> TimeDirection {
        self.direction
    }

    /// Run one presentation frame of the rewind state machine.
    pub fn frame(
        &mut self,
        rewind_held: bool,
        actor: &mut Actor,
        presentation: &mut dyn Presentation,
    ) -> RewindOutcome {
        if rewind_held {
            if self.direction == TimeDirection::Forward {
                self.direction = TimeDirection::Rewinding;
                actor.set_processing(false);
                log::debug!("Rewind started with {} snapshots", self.buffer.len());
            }
            return match self.buffer.pop_newest() {
                Some(snapshot) => {
                    snapshot.restore_onto(actor, presentation);
                    RewindOutcome::Restored
                }
                None => RewindOutcome::Exhausted,
            };
        }

        if self.direction == TimeDirection::Rewinding {
            self.direction = TimeDirection::Forward;
            actor.set_processing(true);
            log::debug!("Rewind stopped with {} snapshots left", self.buffer.len());
        }
        self.buffer.record(Snapshot::capture(actor));
        RewindOutcome::Recorded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{clips, ActorConfig, AxisContact};
    use crate::presentation::{PresentationEvent, RecordingPresentation};
    use crate::raycast::ColliderId;
    use glam::Vec2;

    fn actor() -> Actor {
        Actor::new(&ActorConfig::default(), ColliderId::PLAYER)
    }

    fn frame_marked(actor: &mut Actor, frame: u32) {
        actor.state.position = Vec2::new(frame as f32, 0.0);
    }

    #[test]
    fn restore_reproduces_state_except_dying() {
        let mut presentation = RecordingPresentation::default();
        let mut actor = actor();
        actor.state.position = Vec2::new(12.0, 34.0);
        actor.state.velocity = Vec2::new(-50.0, 80.0);
        actor.state.jump_count = 1;
        actor.state.intent.jump_held = true;
        actor.state.collisions.current.y = AxisContact::Positive;
        actor.state.tuning.gravity = 321.0;
        actor.state.facing_left = true;
        actor.state.animation.play(clips::RUN);
        actor.state.animation.seek(2);
        let snapshot = Snapshot::capture(&actor);

        let mut other = actor.clone();
        other.state.position = Vec2::ZERO;
        other.state.velocity = Vec2::ZERO;
        other.state.jump_count = 2;
        other.state.tuning.gravity = 1.0;
        other.state.modes.freeze();
        other.state.lifecycle.dying = true;
        other.state.animation.play(clips::DEATH);

        snapshot.restore_onto(&mut other, &mut presentation);

        let mut expected = actor.state.clone();
        expected.lifecycle.dying = true;
        assert_eq!(other.state, expected);
        assert_eq!(
            presentation.events,
            vec![
                PresentationEvent::Animation(clips::RUN.to_string()),
                PresentationEvent::AnimationFrame(2),
            ]
        );
    }

    #[test]
    fn restore_does_not_revive_a_living_actor_into_death() {
        let mut presentation = RecordingPresentation::default();
        let mut actor = actor();
        actor.state.lifecycle.dying = true;
        let snapshot = Snapshot::capture(&actor);

        actor.state.lifecycle.dying = false;
        snapshot.restore_onto(&mut actor, &mut presentation);
        assert!(!actor.state.lifecycle.dying);
    }

    #[test]
    fn buffer_keeps_newest_limit_minus_one() {
        let reverse_limit = 5;
        let mut buffer = RewindBuffer::new(reverse_limit);
        let mut actor = actor();

        let frames = 12;
        for frame in 0..frames {
            frame_marked(&mut actor, frame);
            buffer.record(Snapshot::capture(&actor));
            assert!(buffer.len() <= reverse_limit - 1);
        }

        assert_eq!(buffer.len(), 4);
        let oldest = buffer.oldest().expect("buffer should be full");
        assert_eq!(
            oldest.state().position.x,
            (frames - (reverse_limit as u32 - 1)) as f32
        );
        let newest = buffer.newest().expect("buffer should be full");
        assert_eq!(newest.state().position.x, (frames - 1) as f32);
    }

    #[test]
    fn huge_limit_grows_on_demand() {
        let mut buffer = RewindBuffer::new(usize::MAX);
        assert_eq!(buffer.capacity(), usize::MAX - 1);
        buffer.record(Snapshot::capture(&actor()));
        buffer.record(Snapshot::capture(&actor()));
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn tiny_limits_record_nothing() {
        for reverse_limit in [0, 1] {
            let mut buffer = RewindBuffer::new(reverse_limit);
            buffer.record(Snapshot::capture(&actor()));
            assert!(buffer.is_empty());
            assert_eq!(buffer.capacity(), 0);
        }
    }

    #[test]
    fn recorder_rewinds_newest_first_and_suspends_actor() {
        let mut presentation = RecordingPresentation::default();
        let mut recorder = RewindRecorder::new(300);
        let mut actor = actor();

        for frame in 0..3 {
            frame_marked(&mut actor, frame);
            assert_eq!(
                recorder.frame(false, &mut actor, &mut presentation),
                RewindOutcome::Recorded
            );
        }
        frame_marked(&mut actor, 99);

        let outcome = recorder.frame(true, &mut actor, &mut presentation);
        assert_eq!(outcome, RewindOutcome::Restored);
        assert_eq!(recorder.direction(), TimeDirection::Rewinding);
        assert!(!actor.is_processing());
        assert_eq!(actor.state.position.x, 2.0);

        recorder.frame(true, &mut actor, &mut presentation);
        assert_eq!(actor.state.position.x, 1.0);
        recorder.frame(true, &mut actor, &mut presentation);
        assert_eq!(actor.state.position.x, 0.0);

        assert_eq!(
            recorder.frame(true, &mut actor, &mut presentation),
            RewindOutcome::Exhausted
        );
        assert_eq!(actor.state.position.x, 0.0);

        assert_eq!(
            recorder.frame(false, &mut actor, &mut presentation),
            RewindOutcome::Recorded
        );
        assert_eq!(recorder.direction(), TimeDirection::Forward);
        assert!(actor.is_processing());
        assert_eq!(recorder.buffer.len(), 1);
    }

    #[test]
    fn rewinding_empty_history_is_idle() {
        let mut presentation = RecordingPresentation::default();
        let mut recorder = RewindRecorder::new(300);
        let mut actor = actor();
        let before = actor.state.clone();

        let outcome = recorder.frame(true, &mut actor, &mut presentation);

        assert_eq!(outcome, RewindOutcome::Exhausted);
        assert_eq!(actor.state, before);
        assert!(presentation.events.is_empty());
    }
}
