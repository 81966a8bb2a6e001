//! Session lifecycle state
//!
//! Four states and the rules for moving between them. Side effects of a
//! transition (rebuilding the world, menus, difficulty reset) are carried out
//! by the session; this module only decides which transition applies.

use serde::{Deserialize, Serialize};

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameState {
    /// Active gameplay
    Running,
    /// Gameplay frozen, waiting for resume
    Paused,
    /// Main menu (also the pre-game state)
    #[default]
    Over,
    /// About screen
    About,
}

/// Commands the UI layer dispatches into the core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MenuCommand {
    Start,
    Pause,
    Resume,
    About,
    Leaderboard,
    Achievements,
    Share,
    ToggleSound,
    ToggleMusic,
}

/// A lifecycle change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Over -> Running: fresh world, runner and enemy
    Start,
    /// Running -> Paused
    Pause,
    /// Paused -> Running
    Resume,
    /// Running -> Over after the runner was hit
    GameOver,
    /// Over -> About
    About,
    /// Anything else -> Over via the about control
    GiveUp,
}

impl Transition {
    /// State the session is in once the transition completes
    pub fn target(self) -> GameState {
        match self {
            Transition::Start | Transition::Resume => GameState::Running,
            Transition::Pause => GameState::Paused,
            Transition::GameOver | Transition::GiveUp => GameState::Over,
            Transition::About => GameState::About,
        }
    }
}

impl GameState {
    /// Lifecycle transition for a menu command, if it has one here
    ///
    /// Commands without lifecycle meaning (leaderboard, share, toggles)
    /// always map to `None`.
    pub fn transition_for(self, command: MenuCommand) -> Option<Transition> {
        match (self, command) {
            (GameState::Over, MenuCommand::Start) => Some(Transition::Start),
            (GameState::Running, MenuCommand::Pause) => Some(Transition::Pause),
            (GameState::Paused, MenuCommand::Resume) => Some(Transition::Resume),
            (GameState::Over, MenuCommand::About) => Some(Transition::About),
            (_, MenuCommand::About) => Some(Transition::GiveUp),
            _ => None,
        }
    }

    /// Transition caused by the runner being hit
    pub fn on_runner_hit(self) -> Option<Transition> {
        match self {
            GameState::Running => Some(Transition::GameOver),
            _ => None,
        }
    }

    /// Whether physics advances in this state
    pub fn simulates(self) -> bool {
        self != GameState::Paused
    }

    /// Whether running time, score and difficulty advance in this state
    pub fn is_running(self) -> bool {
        self == GameState::Running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_over() {
        assert_eq!(GameState::default(), GameState::Over);
    }

    #[test]
    fn test_start_only_from_over() {
        assert_eq!(
            GameState::Over.transition_for(MenuCommand::Start),
            Some(Transition::Start)
        );
        for state in [GameState::Running, GameState::Paused, GameState::About] {
            assert_eq!(state.transition_for(MenuCommand::Start), None);
        }
    }

    #[test]
    fn test_pause_resume_toggle() {
        let t = GameState::Running.transition_for(MenuCommand::Pause).unwrap();
        assert_eq!(t.target(), GameState::Paused);
        let t = GameState::Paused.transition_for(MenuCommand::Resume).unwrap();
        assert_eq!(t.target(), GameState::Running);

        assert_eq!(GameState::Paused.transition_for(MenuCommand::Pause), None);
        assert_eq!(GameState::Over.transition_for(MenuCommand::Resume), None);
    }

    #[test]
    fn test_about_from_over_else_give_up() {
        assert_eq!(
            GameState::Over.transition_for(MenuCommand::About),
            Some(Transition::About)
        );
        for state in [GameState::Running, GameState::Paused, GameState::About] {
            let t = state.transition_for(MenuCommand::About).unwrap();
            assert_eq!(t, Transition::GiveUp);
            assert_eq!(t.target(), GameState::Over);
        }
    }

    #[test]
    fn test_hit_only_ends_running_game() {
        assert_eq!(
            GameState::Running.on_runner_hit(),
            Some(Transition::GameOver)
        );
        assert_eq!(GameState::Over.on_runner_hit(), None);
        assert_eq!(GameState::Paused.on_runner_hit(), None);
    }

    #[test]
    fn test_side_commands_have_no_transition() {
        for cmd in [
            MenuCommand::Leaderboard,
            MenuCommand::Achievements,
            MenuCommand::Share,
            MenuCommand::ToggleSound,
            MenuCommand::ToggleMusic,
        ] {
            assert_eq!(GameState::Over.transition_for(cmd), None);
            assert_eq!(GameState::Running.transition_for(cmd), None);
        }
    }
}
