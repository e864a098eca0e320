//! Presentation collaborator
//!
//! The controller pushes screen changes and live HUD values through
//! [`Presenter`]; the page (or a test) pushes [`UiCommand`]s back.

use crate::sim::{CharacterKind, PowerUpKind};

/// Top-level screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Playing,
    Paused,
    GameOver,
}

impl Screen {
    /// DOM id of the element shown for this screen
    pub fn element_id(&self) -> &'static str {
        match self {
            Screen::Menu => "startScreen",
            Screen::Playing => "gameUI",
            Screen::Paused => "pauseScreen",
            Screen::GameOver => "gameOverScreen",
        }
    }

    pub const ALL: [Screen; 4] = [Screen::Menu, Screen::Playing, Screen::Paused, Screen::GameOver];
}

/// Inputs forwarded from the page into the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    Start,
    Jump,
    Pause,
    Resume,
    Menu,
    Restart,
    SelectCharacter(CharacterKind),
}

impl UiCommand {
    /// Keyboard shortcuts: Space jumps, Escape pauses
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            " " | "Space" | "Spacebar" => Some(UiCommand::Jump),
            "Escape" | "Esc" => Some(UiCommand::Pause),
            _ => None,
        }
    }
}

/// Active power-up shown in the HUD
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerUpIndicator {
    pub kind: PowerUpKind,
    /// Remaining duration, 0 - 100
    pub percent: f32,
}

pub trait Presenter {
    fn show_screen(&mut self, screen: Screen);

    fn update_score(&mut self, score: u64);

    /// `None` hides the indicator
    fn update_power_up(&mut self, indicator: Option<PowerUpIndicator>);

    fn show_game_over(&mut self, score: u64, best: u64);
}

/// Presenter that drops everything (headless runs)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn show_screen(&mut self, _screen: Screen) {}

    fn update_score(&mut self, _score: u64) {}

    fn update_power_up(&mut self, _indicator: Option<PowerUpIndicator>) {}

    fn show_game_over(&mut self, _score: u64, _best: u64) {}
}
