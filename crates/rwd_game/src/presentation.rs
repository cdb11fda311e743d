//! Fire-and-forget presentation side effects.
//!
//! Gameplay never reads anything back from here. The authoritative animation
//! cursor lives in the actor's state (so it can be snapshotted); these calls
//! only tell the host what to show and play.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundId {
    Jump,
    CollectCoin,
    CollectKey,
    PlayerDeath,
}

pub trait Presentation {
    fn play_sound(&mut self, sound: SoundId);
    fn play_animation(&mut self, clip: &str);
    fn set_animation_frame(&mut self, frame: usize);
}

/// Headless host: side effects go to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogPresentation;

impl Presentation for LogPresentation {
    fn play_sound(&mut self, sound: SoundId) {
        log::debug!("sound: {:?}", sound);
    }

    fn play_animation(&mut self, clip: &str) {
        log::trace!("animation: {}", clip);
    }

    fn set_animation_frame(&mut self, frame: usize) {
        log::trace!("animation frame: {}", frame);
    }
}

/// One recorded side effect, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresentationEvent {
    Sound(SoundId),
    Animation(String),
    AnimationFrame(usize),
}

/// Host that remembers every call. Used by tests and replay diagnostics.
#[derive(Debug, Default, Clone)]
pub struct RecordingPresentation {
    pub events: Vec<PresentationEvent>,
}

impl RecordingPresentation {
    pub fn sounds(&self) -> Vec<SoundId> {
        self.events
            .iter()
            .filter_map(|event| match event {
                PresentationEvent::Sound(sound) => Some(*sound),
                _ => None,
            })
            .collect()
    }

    pub fn last_animation(&self) -> Option<&str> {
        self.events.iter().rev().find_map(|event| match event {
            PresentationEvent::Animation(clip) => Some(clip.as_str()),
            _ => None,
        })
    }
}

impl Presentation for RecordingPresentation {
    fn play_sound(&mut self, sound: SoundId) {
        self.events.push(PresentationEvent::Sound(sound));
    }

    fn play_animation(&mut self, clip: &str) {
        self.events.push(PresentationEvent::Animation(clip.to_string()));
    }

    fn set_animation_frame(&mut self, frame: usize) {
        self.events.push(PresentationEvent::AnimationFrame(frame));
    }
}
