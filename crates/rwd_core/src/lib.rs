pub mod animation;
pub mod input;
pub mod time;

pub use animation::{AnimationClip, AnimationFrame, AnimationState};
pub use input::{Action, InputSource, InputState};
pub use time::FixedStepClock;
