//! Earthling Run - headless runner
//!
//! Plays sessions with a simple autopilot so the core can be exercised and
//! profiled without a renderer. Usage: `earthling-run [config.json] [highscores.json]`

#[cfg(not(target_arch = "wasm32"))]
use earthling_run::{
    GameConfig, GameSession, HighScores,
    audio::NullAudio,
    input::InputConsumer,
    platform::NullPresenter,
    services::LocalServices,
    sim::{EntityKind, GameState, MenuCommand, Role},
};
#[cfg(not(target_arch = "wasm32"))]
use glam::Vec2;

/// Frames per second of the simulated display
#[cfg(not(target_arch = "wasm32"))]
const FRAME_DT: f32 = 1.0 / 60.0;
/// Give up on a run after this many frames (5 minutes)
#[cfg(not(target_arch = "wasm32"))]
const MAX_FRAMES: u32 = 60 * 300;
#[cfg(not(target_arch = "wasm32"))]
const GAMES: u32 = 3;
/// Horizontal gap at which the autopilot reacts to the next enemy
#[cfg(not(target_arch = "wasm32"))]
const REACT_DISTANCE: f32 = 3.0;

#[cfg(not(target_arch = "wasm32"))]
type Session = GameSession<LocalServices, NullPresenter, NullAudio>;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Earthling Run (headless) starting...");

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => match GameConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{}", e);
                std::process::exit(1);
            }
        },
        None => GameConfig::default(),
    };
    let scores_path = args.next();

    let high_scores = scores_path
        .as_deref()
        .map(HighScores::load)
        .unwrap_or_default();
    let screen = config.viewport.screen;
    let layout = config.viewport.layout;

    let mut session: Session = match GameSession::new(
        config,
        LocalServices::with_high_scores(high_scores),
        NullPresenter::default(),
        NullAudio,
    ) {
        Ok(session) => session,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    for game in 1..=GAMES {
        session.handle_command(MenuCommand::Start);
        let frames = play(&mut session, layout, screen);
        match session.last_summary() {
            Some(summary) => log::info!(
                "Game {}: score {} after {:.1}s ({} jumps, {} stomps)",
                game,
                summary.score,
                frames as f32 * FRAME_DT,
                summary.jumps,
                summary.power_stomps
            ),
            None => log::info!("Game {}: still running after {} frames", game, frames),
        }
        if session.state() != GameState::Over {
            session.handle_command(MenuCommand::About);
        }
    }

    session.handle_command(MenuCommand::Leaderboard);
    session.handle_command(MenuCommand::Achievements);

    if let Some(path) = scores_path {
        if let Err(e) = session.services().high_scores.save(&path) {
            log::error!("Failed to save high scores to {}: {}", path, e);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The core is a library; a web front end drives it directly
}

/// Run one session until game over, returning the number of frames played
#[cfg(not(target_arch = "wasm32"))]
fn play(session: &mut Session, layout: Vec2, screen: Vec2) -> u32 {
    let jump_at = to_screen(Vec2::new(layout.x * 0.75, layout.y * 0.1), layout, screen);
    let dodge_at = to_screen(Vec2::new(layout.x * 0.25, layout.y * 0.1), layout, screen);
    let mut dodging = false;

    for frame in 0..MAX_FRAMES {
        if session.state() != GameState::Running {
            return frame;
        }

        match nearest_enemy(session) {
            Some((gap, flying)) if gap < REACT_DISTANCE && gap > -1.0 => {
                if flying && !dodging {
                    session.pointer_down(dodge_at.x, dodge_at.y, 1, 0);
                    dodging = true;
                } else if !flying && session.runner().is_some_and(|r| !r.is_jumping()) {
                    session.pointer_down(jump_at.x, jump_at.y, 0, 0);
                }
            }
            _ => {
                if dodging {
                    session.pointer_up(dodge_at.x, dodge_at.y, 1, 0);
                    dodging = false;
                }
            }
        }

        session.advance(FRAME_DT);
    }
    MAX_FRAMES
}

/// Horizontal gap to the closest enemy ahead and whether it flies
#[cfg(not(target_arch = "wasm32"))]
fn nearest_enemy(session: &Session) -> Option<(f32, bool)> {
    let runner = session.world().body(session.runner()?.body)?;
    session
        .registry()
        .ids()
        .into_iter()
        .filter(|id| session.registry().role_of(*id) == Some(Role::Enemy))
        .filter_map(|id| {
            let body = session.world().body(id)?;
            let flying = match session.registry().get(id)?.kind {
                EntityKind::Enemy(kind) => kind.is_flying(),
                _ => false,
            };
            let gap = (body.pos.x - body.half_extents.x) - runner.max_x();
            Some((gap, flying))
        })
        .min_by(|a, b| a.0.total_cmp(&b.0))
}

/// Layout point to integer screen pixels (origin top-left)
#[cfg(not(target_arch = "wasm32"))]
fn to_screen(point: Vec2, layout: Vec2, screen: Vec2) -> glam::IVec2 {
    let scale = screen / layout;
    glam::IVec2::new(
        (point.x * scale.x) as i32,
        ((layout.y - point.y) * scale.y) as i32,
    )
}
