//! Headless runner: plays a recorded input replay through a full session and
//! logs what happened.
//!
//! Startup loads the game config, animation clips and the replay from the
//! `assets/` tree; levels are read from `assets/levels/<name>.json` on demand.
//! Any load failure aborts with the failing path in the message.

use std::path::Path;

use rwd_core::animation::load_animation_file;
use rwd_game::actor::clips;
use rwd_game::config::load_config_from_path;
use rwd_game::replay::load_replay_from_path;
use rwd_game::{GameEvent, LevelDirectory, LogPresentation, Session};

const CONFIG_PATH: &str = "assets/config/game.json";
const LEVELS_DIR: &str = "assets/levels";
const START_LEVEL: &str = "level_01";
const REPLAY_PATH: &str = "assets/replays/demo.json";
const ANIMATION_PATH: &str = "assets/animations/player.json";

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Rewind headless runner starting...");

    let config = load_config_from_path(Path::new(CONFIG_PATH))
        .unwrap_or_else(|err| panic!("Failed to load config '{}': {}", CONFIG_PATH, err));
    let animations = load_animation_file(Path::new(ANIMATION_PATH))
        .unwrap_or_else(|err| panic!("Failed to load animations '{}': {}", ANIMATION_PATH, err));
    let missing = animations.missing_clips(&[
        clips::IDLE,
        clips::RUN,
        clips::JUMP,
        clips::FALL,
        clips::DEATH,
    ]);
    if !missing.is_empty() {
        log::warn!("Animation file '{}' lacks clips {:?}", ANIMATION_PATH, missing);
    }
    let replay = load_replay_from_path(Path::new(REPLAY_PATH))
        .unwrap_or_else(|err| panic!("Failed to load replay '{}': {}", REPLAY_PATH, err));

    log::info!(
        "Replay: {} frames at {:.2}ms, physics at {:.2}ms, rewind history {} frames",
        replay.frame_count(),
        replay.frame_dt * 1000.0,
        config.fixed_dt * 1000.0,
        config.reverse_limit
    );

    let mut session =
        Session::new(config, LevelDirectory::new(LEVELS_DIR), START_LEVEL).with_clips(animations);
    let mut presentation = LogPresentation;

    for (frame, input) in replay.expanded_inputs().iter().enumerate() {
        let events = session
            .frame(replay.frame_dt, input, &mut presentation)
            .unwrap_or_else(|err| panic!("Replay aborted at frame {}: {}", frame, err));
        for event in events {
            match event {
                GameEvent::CreditsReached => {
                    log::info!("Frame {}: credits reached, stopping replay", frame);
                    report(&session);
                    return;
                }
                other => log::info!("Frame {}: {:?}", frame, other),
            }
        }
    }

    report(&session);
}

fn report<L: rwd_game::LevelSource>(session: &Session<L>) {
    let controller = &session.controller;
    let state = &controller.actor().state;
    log::info!(
        "Finished in level '{}' after {} frames ({:.2}s, {} physics ticks)",
        controller.current_level(),
        controller.frame_counter(),
        controller.elapsed_time(),
        session.clock.fixed_step_count
    );
    log::info!(
        "Actor at ({:.2}, {:.2}) moving ({:.2}, {:.2}), jumps used {}, clip '{}' frame {}",
        state.position.x,
        state.position.y,
        state.velocity.x,
        state.velocity.y,
        state.jump_count,
        state.animation.clip_name,
        state.animation.frame_index
    );
    log::info!(
        "Coins: {} this level ({} still out), {} banked, {} collectable; {} snapshots held",
        controller.coins_collected(),
        controller.level().map_or(0, |level| level.coins_remaining()),
        controller.total_coins_collected(),
        controller.coins_collectable(),
        controller.snapshot_count()
    );
}
