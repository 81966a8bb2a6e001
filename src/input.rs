//! Pointer input mapping
//!
//! A press first hit-tests the menu controls visible in the current state.
//! Only a press that misses every control can become a gameplay command, and
//! only while running: right half jumps, left half dodges until that same
//! pointer is released.

use glam::Vec2;

use crate::platform::{Rect, Viewport};
use crate::sim::{GameState, MenuCommand};

/// Hit-testable menu buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuControl {
    Start,
    Leaderboard,
    About,
    Share,
    Achievements,
    Pause,
    Sound,
    Music,
}

impl MenuControl {
    /// Command a press on this control dispatches in the given state
    pub fn command(self, state: GameState) -> MenuCommand {
        match self {
            MenuControl::Start => MenuCommand::Start,
            MenuControl::Leaderboard => MenuCommand::Leaderboard,
            MenuControl::About => MenuCommand::About,
            MenuControl::Share => MenuCommand::Share,
            MenuControl::Achievements => MenuCommand::Achievements,
            // One button, two faces
            MenuControl::Pause if state == GameState::Running => MenuCommand::Pause,
            MenuControl::Pause => MenuCommand::Resume,
            MenuControl::Sound => MenuCommand::ToggleSound,
            MenuControl::Music => MenuCommand::ToggleMusic,
        }
    }
}

/// Gameplay meaning of a press or release
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameplayCommand {
    Jump,
    Dodge,
    DodgeRelease,
}

/// How a pointer event was interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerOutcome {
    Menu(MenuControl),
    Gameplay(GameplayCommand),
    Ignored,
}

/// Rectangles of every control and overlay, in layout coordinates (y up)
#[derive(Debug, Clone, PartialEq)]
pub struct MenuLayout {
    pub size: Vec2,
    pub start: Rect,
    pub leaderboard: Rect,
    pub about: Rect,
    pub share: Rect,
    pub achievements: Rect,
    pub pause: Rect,
    pub sound: Rect,
    pub music: Rect,
    pub score: Rect,
    pub game_label: Rect,
    pub about_label: Rect,
    pub paused_label: Rect,
    pub tutorial_left: Rect,
    pub tutorial_right: Rect,
    pub left_half: Rect,
    pub right_half: Rect,
}

const OVER_CONTROLS: &[MenuControl] = &[
    MenuControl::Start,
    MenuControl::Leaderboard,
    MenuControl::About,
    MenuControl::Share,
    MenuControl::Achievements,
    MenuControl::Sound,
    MenuControl::Music,
];

const PLAY_CONTROLS: &[MenuControl] = &[MenuControl::Pause, MenuControl::Sound, MenuControl::Music];

const ABOUT_CONTROLS: &[MenuControl] = &[MenuControl::About, MenuControl::Sound, MenuControl::Music];

impl MenuLayout {
    pub fn new(size: Vec2) -> Self {
        let (w, h) = (size.x, size.y);
        let icon = h / 10.0;
        let big = w / 4.0;
        let tutorial = h / 4.0;

        Self {
            size,
            start: Rect::new(w * 3.0 / 16.0, h / 4.0, big, big),
            leaderboard: Rect::new(w * 9.0 / 16.0, h / 4.0, big, big),
            about: Rect::new(w * 23.0 / 25.0, h * 11.0 / 20.0, icon, icon),
            share: Rect::new(w / 64.0, h / 2.0, icon, icon),
            achievements: Rect::new(w * 23.0 / 25.0, h * 8.0 / 20.0, icon, icon),
            pause: Rect::new(w / 64.0, h / 2.0, icon, icon),
            sound: Rect::new(w / 64.0, h * 13.0 / 20.0, icon, icon),
            music: Rect::new(w / 64.0, h * 4.0 / 5.0, icon, icon),
            score: Rect::new(w * 47.0 / 64.0, h * 57.0 / 64.0, w / 4.0, h / 8.0),
            game_label: Rect::new(0.0, h * 7.0 / 8.0, w, h / 4.0),
            about_label: Rect::new(0.0, h * 5.0 / 8.0, w, h / 4.0),
            paused_label: Rect::new(0.0, h * 7.0 / 8.0, w, h / 4.0),
            tutorial_left: Rect::new(w / 4.0 - tutorial / 2.0, h * 9.0 / 20.0, tutorial, tutorial),
            tutorial_right: Rect::new(
                w * 3.0 / 4.0 - tutorial / 2.0,
                h * 9.0 / 20.0,
                tutorial,
                tutorial,
            ),
            left_half: Rect::new(0.0, 0.0, w / 2.0, h),
            right_half: Rect::new(w / 2.0, 0.0, w / 2.0, h),
        }
    }

    pub fn bounds(&self, control: MenuControl) -> Rect {
        match control {
            MenuControl::Start => self.start,
            MenuControl::Leaderboard => self.leaderboard,
            MenuControl::About => self.about,
            MenuControl::Share => self.share,
            MenuControl::Achievements => self.achievements,
            MenuControl::Pause => self.pause,
            MenuControl::Sound => self.sound,
            MenuControl::Music => self.music,
        }
    }

    /// Controls that accept presses in the given state
    ///
    /// Sound and music are always live. OVER offers start, leaderboard and
    /// about, plus share and achievements. RUNNING and PAUSED only take the
    /// pause control. ABOUT takes about, which is the way back to the menu.
    pub fn visible_controls(state: GameState) -> &'static [MenuControl] {
        match state {
            GameState::Over => OVER_CONTROLS,
            GameState::Running | GameState::Paused => PLAY_CONTROLS,
            GameState::About => ABOUT_CONTROLS,
        }
    }

    /// First visible control containing the point
    pub fn hit_test(&self, state: GameState, point: Vec2) -> Option<MenuControl> {
        Self::visible_controls(state)
            .iter()
            .copied()
            .find(|&c| self.bounds(c).contains(point))
    }
}

/// Pointer state carried between press and release
#[derive(Debug, Clone, Default)]
pub struct InputMapper {
    /// Pointer whose press started the current dodge
    dodge_pointer: Option<u32>,
}

impl InputMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget any in-flight dodge (new session)
    pub fn reset(&mut self) {
        self.dodge_pointer = None;
    }

    pub fn dodge_pointer(&self) -> Option<u32> {
        self.dodge_pointer
    }

    /// Interpret a press given in screen pixels
    pub fn pointer_down(
        &mut self,
        screen: Vec2,
        pointer: u32,
        state: GameState,
        viewport: &impl Viewport,
        layout: &MenuLayout,
    ) -> PointerOutcome {
        let point = viewport.unproject(screen.x, screen.y);

        if let Some(control) = layout.hit_test(state, point) {
            return PointerOutcome::Menu(control);
        }

        if !state.is_running() {
            return PointerOutcome::Ignored;
        }

        if layout.right_half.contains(point) {
            PointerOutcome::Gameplay(GameplayCommand::Jump)
        } else if layout.left_half.contains(point) {
            self.dodge_pointer = Some(pointer);
            PointerOutcome::Gameplay(GameplayCommand::Dodge)
        } else {
            PointerOutcome::Ignored
        }
    }

    /// Interpret a release; only the pointer that started a dodge ends it
    pub fn pointer_up(&mut self, pointer: u32, state: GameState) -> PointerOutcome {
        if !state.is_running() || self.dodge_pointer != Some(pointer) {
            return PointerOutcome::Ignored;
        }
        self.dodge_pointer = None;
        PointerOutcome::Gameplay(GameplayCommand::DodgeRelease)
    }
}

/// Receives raw pointer events from the platform layer
pub trait InputConsumer {
    /// Returns whether the event was consumed
    fn pointer_down(&mut self, x: i32, y: i32, pointer: u32, button: u32) -> bool;

    /// Returns whether the event was consumed
    fn pointer_up(&mut self, x: i32, y: i32, pointer: u32, button: u32) -> bool;
}
