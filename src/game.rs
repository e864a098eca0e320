//! Game state controller
//!
//! Owns the top-level phase machine and the loop driver, runs simulation ticks
//! while playing, and keeps the collaborators (storage, presenter, audio) in
//! sync. Invalid transitions are ignored and reported as `false`.

use crate::audio::{AudioSink, Silent};
use crate::best_score::BestScore;
use crate::persistence::{KeyValueStore, MemoryStore};
use crate::platform::{FrameToken, LoopDriver};
use crate::settings::{Settings, TickMode};
use crate::sim::particles;
use crate::sim::{
    CharacterKind, EndCause, GameEvent, GameState, Playfield, TickInput, TickOutcome, tick,
};
use crate::ui::{NullPresenter, PowerUpIndicator, Presenter, Screen, UiCommand};

/// Top-level phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Menu,
    Playing,
    Paused,
    GameOver,
}

impl GamePhase {
    pub fn screen(&self) -> Screen {
        match self {
            GamePhase::Menu => Screen::Menu,
            GamePhase::Playing => Screen::Playing,
            GamePhase::Paused => Screen::Paused,
            GamePhase::GameOver => Screen::GameOver,
        }
    }
}

/// Everything outside the core the controller talks to
pub struct Collaborators {
    pub storage: Box<dyn KeyValueStore>,
    pub presenter: Box<dyn Presenter>,
    pub audio: Box<dyn AudioSink>,
}

impl Collaborators {
    /// In-memory storage, no UI, no sound
    pub fn headless() -> Self {
        Self {
            storage: Box::new(MemoryStore::new()),
            presenter: Box::new(NullPresenter),
            audio: Box::new(Silent),
        }
    }
}

pub struct Game {
    phase: GamePhase,
    state: GameState,
    best: BestScore,
    settings: Settings,
    /// Applied to every new run and to the live one
    playfield: Playfield,
    driver: LoopDriver,
    /// Input collected since the last tick
    pending: TickInput,
    autopilot: bool,
    base_seed: u64,
    runs: u64,
    /// Last values pushed to the presenter
    shown_score: Option<u64>,
    indicator_visible: bool,
    collab: Collaborators,
}

impl Game {
    /// Load settings and best score, then show the menu
    pub fn new(seed: u64, mut collab: Collaborators) -> Self {
        let settings = Settings::load(collab.storage.as_ref());
        let best = BestScore::load(collab.storage.as_ref());
        collab.audio.set_volume(settings.effective_volume());
        collab.presenter.show_screen(Screen::Menu);

        let playfield = Playfield::default();
        let state = GameState::new(seed, playfield).with_character(settings.character);

        Self {
            phase: GamePhase::Menu,
            state,
            best,
            driver: LoopDriver::new(settings.tick_mode),
            settings,
            playfield,
            pending: TickInput::default(),
            autopilot: false,
            base_seed: seed,
            runs: 0,
            shown_score: None,
            indicator_visible: false,
            collab,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn best_score(&self) -> u64 {
        self.best.get()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn playfield(&self) -> Playfield {
        self.playfield
    }

    pub fn storage(&self) -> &dyn KeyValueStore {
        self.collab.storage.as_ref()
    }

    /// Token of the active tick loop, `None` when not playing
    pub fn frame_token(&self) -> Option<FrameToken> {
        self.driver.current()
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        self.autopilot = enabled;
        log::info!("Autopilot: {}", enabled);
    }

    // === Transitions ===

    /// Fresh run from the menu or the game-over screen
    pub fn start(&mut self) -> bool {
        if !matches!(self.phase, GamePhase::Menu | GamePhase::GameOver) {
            log::debug!("Ignoring start from {:?}", self.phase);
            return false;
        }

        self.reset();
        self.phase = GamePhase::Playing;
        self.driver.start();
        self.collab.presenter.show_screen(Screen::Playing);
        self.sync_hud();
        log::info!(
            "Run {} started (seed {}, {})",
            self.runs,
            self.state.seed,
            self.state.character.as_str()
        );
        true
    }

    pub fn pause(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            log::debug!("Ignoring pause from {:?}", self.phase);
            return false;
        }

        self.driver.stop();
        self.phase = GamePhase::Paused;
        self.collab.presenter.show_screen(Screen::Paused);
        log::info!("Paused at score {}", self.state.score);
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.phase != GamePhase::Paused {
            log::debug!("Ignoring resume from {:?}", self.phase);
            return false;
        }

        self.phase = GamePhase::Playing;
        self.driver.start();
        self.collab.presenter.show_screen(Screen::Playing);
        log::info!("Resumed");
        true
    }

    pub fn return_to_menu(&mut self) -> bool {
        if self.phase == GamePhase::Menu {
            log::debug!("Already in menu");
            return false;
        }

        self.driver.stop();
        self.pending = TickInput::default();
        self.phase = GamePhase::Menu;
        self.collab.presenter.show_screen(Screen::Menu);
        log::info!("Returned to menu");
        true
    }

    /// Stop ticking and settle the best score
    fn end(&mut self, cause: EndCause) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }

        self.driver.stop();
        self.phase = GamePhase::GameOver;

        let score = self.state.score;
        if self.best.submit(score, self.collab.storage.as_mut()) {
            particles::celebration_burst(&mut self.state);
        }
        self.collab
            .presenter
            .show_game_over(score, self.best.get());
        self.collab.presenter.show_screen(Screen::GameOver);
        log::info!(
            "Game over ({:?}): score {}, best {}",
            cause,
            score,
            self.best.get()
        );
        true
    }

    // === Input ===

    /// Queue a jump for the next tick. Only while playing.
    pub fn request_jump(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        self.pending.jump = true;
        self.collab.audio.play_jump_cue();
        true
    }

    pub fn handle(&mut self, command: UiCommand) -> bool {
        match command {
            UiCommand::Start | UiCommand::Restart => self.start(),
            UiCommand::Jump => self.request_jump(),
            UiCommand::Pause => self.pause(),
            UiCommand::Resume => self.resume(),
            UiCommand::Menu => self.return_to_menu(),
            UiCommand::SelectCharacter(kind) => {
                self.select_character(kind);
                true
            }
        }
    }

    /// Cosmetic only; takes effect on the next run
    pub fn select_character(&mut self, character: CharacterKind) {
        if self.settings.character == character {
            return;
        }
        self.settings.character = character;
        if self.phase == GamePhase::Menu {
            self.state.character = character;
        }
        self.settings.save(self.collab.storage.as_mut());
        log::info!("Character: {}", character.as_str());
    }

    pub fn tick_mode(&self) -> TickMode {
        self.driver.mode()
    }

    pub fn set_tick_mode(&mut self, mode: TickMode) {
        self.settings.tick_mode = mode;
        self.driver.set_mode(mode);
        self.settings.save(self.collab.storage.as_mut());
        log::info!("Tick mode: {}", mode.as_str());
    }

    /// New viewport size, clamped. Generation reads it from the next tick on.
    pub fn resize(&mut self, width: f32, height: f32) {
        let playfield = Playfield::new(width, height);
        if playfield == self.playfield {
            return;
        }
        log::info!("Playfield resized to {}x{}", playfield.width, playfield.height);
        self.playfield = playfield;
        self.state.playfield = playfield;
    }

    // === Loop ===

    /// Run the ticks due for one display frame. Returns how many ran; zero
    /// for a stale token, which the caller must take as a signal to stop.
    pub fn frame(&mut self, token: FrameToken, now_ms: f64) -> u32 {
        let due = self.driver.advance(token, now_ms);
        let mut ran = 0;
        for _ in 0..due {
            if !self.tick_once() {
                break;
            }
            ran += 1;
        }
        ran
    }

    /// Advance one tick if playing. Returns false when nothing ran.
    pub fn tick_once(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }

        let mut input = std::mem::take(&mut self.pending);
        input.autopilot = self.autopilot;
        let outcome = tick(&mut self.state, &input);

        for event in self.state.drain_events() {
            match event {
                GameEvent::PowerUpCollected { kind, replaced } => {
                    log::info!("Power-up: {} (replaced {:?})", kind.display_name(), replaced)
                }
                GameEvent::PowerUpExpired(kind) => log::info!("{} wore off", kind.display_name()),
                _ => {}
            }
        }
        self.sync_hud();

        if let TickOutcome::Ended(cause) = outcome {
            self.end(cause);
        }
        true
    }

    /// Fresh run state from the current playfield and settings
    fn reset(&mut self) {
        self.runs += 1;
        let seed = self.base_seed.wrapping_add(self.runs);
        let mut state = GameState::new(seed, self.playfield).with_character(self.settings.character);
        state.max_particles = self.settings.effective_max_particles();
        self.state = state;
        self.pending = TickInput::default();
        self.shown_score = None;
        self.indicator_visible = true;
    }

    /// Push score and power-up indicator changes to the presenter
    fn sync_hud(&mut self) {
        if self.shown_score != Some(self.state.score) {
            self.shown_score = Some(self.state.score);
            self.collab.presenter.update_score(self.state.score);
        }

        match self.state.effect.active() {
            Some(effect) => {
                self.indicator_visible = true;
                self.collab.presenter.update_power_up(Some(PowerUpIndicator {
                    kind: effect.kind,
                    percent: self.state.effect.remaining_fraction() * 100.0,
                }));
            }
            None if self.indicator_visible => {
                self.indicator_visible = false;
                self.collab.presenter.update_power_up(None);
            }
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::best_score::STORAGE_KEY;
    use crate::consts::*;
    use crate::sim::PowerUpKind;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[derive(Default)]
    struct Log {
        screens: Vec<Screen>,
        scores: Vec<u64>,
        power_ups: Vec<Option<PowerUpIndicator>>,
        game_overs: Vec<(u64, u64)>,
    }

    struct RecordingPresenter(Rc<RefCell<Log>>);

    impl Presenter for RecordingPresenter {
        fn show_screen(&mut self, screen: Screen) {
            self.0.borrow_mut().screens.push(screen);
        }

        fn update_score(&mut self, score: u64) {
            self.0.borrow_mut().scores.push(score);
        }

        fn update_power_up(&mut self, indicator: Option<PowerUpIndicator>) {
            self.0.borrow_mut().power_ups.push(indicator);
        }

        fn show_game_over(&mut self, score: u64, best: u64) {
            self.0.borrow_mut().game_overs.push((score, best));
        }
    }

    struct CountingAudio(Rc<Cell<u32>>);

    impl AudioSink for CountingAudio {
        fn play_jump_cue(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    struct Harness {
        game: Game,
        log: Rc<RefCell<Log>>,
        beeps: Rc<Cell<u32>>,
    }

    fn harness_with(storage: MemoryStore) -> Harness {
        let log = Rc::new(RefCell::new(Log::default()));
        let beeps = Rc::new(Cell::new(0));
        let collab = Collaborators {
            storage: Box::new(storage),
            presenter: Box::new(RecordingPresenter(log.clone())),
            audio: Box::new(CountingAudio(beeps.clone())),
        };
        Harness {
            game: Game::new(99, collab),
            log,
            beeps,
        }
    }

    fn harness() -> Harness {
        harness_with(MemoryStore::new())
    }

    /// Tick with no input until the player drops out of the playfield
    fn fall_to_game_over(game: &mut Game) {
        for _ in 0..1000 {
            if !game.tick_once() {
                break;
            }
        }
        assert_eq!(game.phase(), GamePhase::GameOver);
    }

    #[test]
    fn test_starts_in_menu() {
        let h = harness();
        assert_eq!(h.game.phase(), GamePhase::Menu);
        assert_eq!(h.log.borrow().screens, vec![Screen::Menu]);
        assert_eq!(h.game.frame_token(), None);
    }

    #[test]
    fn test_invalid_transitions_are_ignored() {
        let mut h = harness();
        assert!(!h.game.pause());
        assert!(!h.game.resume());
        assert!(!h.game.return_to_menu());
        assert!(!h.game.request_jump());
        assert!(!h.game.tick_once());
        assert_eq!(h.game.phase(), GamePhase::Menu);
        assert_eq!(h.beeps.get(), 0);

        assert!(h.game.start());
        assert!(!h.game.start(), "start is not valid while playing");
        assert!(!h.game.resume());
        assert_eq!(h.game.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_pause_halts_ticks_and_stales_token() {
        let mut h = harness();
        h.game.start();
        let token = h.game.frame_token().unwrap();
        assert_eq!(h.game.frame(token, 0.0), 1);

        assert!(h.game.pause());
        let frozen = h.game.state().time_ticks;
        let y = h.game.state().player.pos.y;
        assert_eq!(h.game.frame(token, 100.0), 0);
        assert!(!h.game.tick_once());
        assert_eq!(h.game.state().time_ticks, frozen);
        assert_eq!(h.game.state().player.pos.y, y);

        assert!(h.game.resume());
        let resumed = h.game.frame_token().unwrap();
        assert_ne!(resumed, token);
        assert_eq!(h.game.frame(token, 116.0), 0);
        assert_eq!(h.game.frame(resumed, 116.0), 1);
        assert_eq!(
            h.log.borrow().screens,
            vec![Screen::Menu, Screen::Playing, Screen::Paused, Screen::Playing]
        );
    }

    #[test]
    fn test_menu_from_paused_stops_driver() {
        let mut h = harness();
        h.game.start();
        let token = h.game.frame_token().unwrap();
        h.game.pause();
        assert!(h.game.return_to_menu());
        assert_eq!(h.game.phase(), GamePhase::Menu);
        assert_eq!(h.game.frame_token(), None);
        assert_eq!(h.game.frame(token, 50.0), 0);
        assert!(!h.game.resume());
    }

    #[test]
    fn test_jump_is_queued_for_next_tick() {
        let mut h = harness();
        h.game.start();
        assert!(h.game.request_jump());
        assert_eq!(h.beeps.get(), 1);
        assert!(h.game.tick_once());
        assert_eq!(h.game.state().player.velocity, JUMP_VELOCITY + GRAVITY);

        // Consumed: the next tick falls normally
        h.game.tick_once();
        assert!((h.game.state().player.velocity - (JUMP_VELOCITY + 2.0 * GRAVITY)).abs() < 1e-5);
    }

    #[test]
    fn test_game_over_records_new_best() {
        let mut h = harness();
        h.game.start();
        h.game.state.score = 7;
        fall_to_game_over(&mut h.game);

        assert_eq!(h.game.best_score(), 7);
        assert_eq!(h.game.storage().get_int(STORAGE_KEY), 7);
        assert_eq!(h.log.borrow().game_overs, vec![(7, 7)]);
        assert_eq!(h.log.borrow().screens.last(), Some(&Screen::GameOver));
        assert_eq!(h.game.frame_token(), None);
        // Game-over debris plus the celebration confetti
        assert!(h.game.state().particles.len() >= 50);
    }

    #[test]
    fn test_lower_score_keeps_best() {
        let mut h = harness_with(MemoryStore::new().with_entry(STORAGE_KEY, "12"));
        assert_eq!(h.game.best_score(), 12);

        h.game.start();
        h.game.state.score = 12;
        fall_to_game_over(&mut h.game);
        assert_eq!(h.game.best_score(), 12);
        assert_eq!(h.log.borrow().game_overs, vec![(12, 12)]);

        h.game.handle(UiCommand::Restart);
        h.game.state.score = 4;
        fall_to_game_over(&mut h.game);
        assert_eq!(h.game.best_score(), 12);
        assert_eq!(h.game.storage().get_int(STORAGE_KEY), 12);
    }

    #[test]
    fn test_restart_fully_resets() {
        let mut h = harness();
        h.game.start();
        h.game.state.effect.acquire(PowerUpKind::Shield);
        for _ in 0..20 {
            h.game.request_jump();
            h.game.tick_once();
        }
        h.game.state.score = 3;
        h.game.state.player.pos.y = -50.0;
        h.game.tick_once();
        assert_eq!(h.game.phase(), GamePhase::GameOver);

        assert!(h.game.handle(UiCommand::Restart));
        let s = h.game.state();
        assert_eq!(h.game.phase(), GamePhase::Playing);
        assert_eq!(s.score, 0);
        assert_eq!(s.time_ticks, 0);
        assert_eq!(s.player.pos.y, 300.0);
        assert_eq!(s.player.velocity, 0.0);
        assert_eq!(s.player.rotation, 0.0);
        let xs: Vec<f32> = s.obstacles.iter().map(|o| o.x).collect();
        assert_eq!(xs, vec![800.0, 1100.0, 1400.0]);
        assert!(s.obstacles.iter().all(|o| !o.passed));
        assert!(s.power_ups.is_empty());
        assert!(s.particles.is_empty());
        assert!(s.effect.active().is_none());
        assert_eq!(h.log.borrow().scores.last(), Some(&0));
    }

    #[test]
    fn test_restart_invalidates_previous_token() {
        let mut h = harness();
        h.game.start();
        let first = h.game.frame_token().unwrap();
        fall_to_game_over(&mut h.game);
        h.game.start();
        let second = h.game.frame_token().unwrap();
        assert_ne!(first, second);
        assert_eq!(h.game.frame(first, 10.0), 0);
    }

    #[test]
    fn test_power_up_indicator_updates_and_hides() {
        let mut h = harness();
        h.game.start();
        h.game.state.effect.acquire(PowerUpKind::Shield);
        for _ in 0..POWER_UP_DURATION_TICKS {
            h.game.state.player.pos.y = 300.0;
            h.game.state.player.velocity = -GRAVITY;
            h.game.state.power_ups.clear();
            assert!(h.game.tick_once());
        }
        assert_eq!(h.game.phase(), GamePhase::Playing);

        let log = h.log.borrow();
        let first = log.power_ups.iter().flatten().next().copied().unwrap();
        assert_eq!(first.kind, PowerUpKind::Shield);
        assert!((first.percent - 299.0 / 3.0).abs() < 1e-3);
        assert_eq!(log.power_ups.last(), Some(&None));
    }

    #[test]
    fn test_character_selection_persists_for_next_run() {
        let mut h = harness();
        h.game.handle(UiCommand::SelectCharacter(CharacterKind::Ice));
        assert_eq!(h.game.settings().character, CharacterKind::Ice);
        assert!(h.game.storage().get(Settings::STORAGE_KEY).unwrap().is_some());

        h.game.start();
        assert_eq!(h.game.state().character, CharacterKind::Ice);

        let reloaded = Settings::load(h.game.storage());
        assert_eq!(reloaded.character, CharacterKind::Ice);
    }

    #[test]
    fn test_per_frame_mode_runs_one_tick_per_frame() {
        let mut h = harness();
        assert_eq!(h.game.tick_mode(), TickMode::Fixed);
        h.game.set_tick_mode(TickMode::PerFrame);
        assert_eq!(h.game.tick_mode(), TickMode::PerFrame);
        assert_eq!(Settings::load(h.game.storage()).tick_mode, TickMode::PerFrame);

        h.game.start();
        let token = h.game.frame_token().unwrap();
        assert_eq!(h.game.frame(token, 0.0), 1);
        // A long stall still advances a single tick
        assert_eq!(h.game.frame(token, 500.0), 1);
        assert_eq!(h.game.state().time_ticks, 2);
    }

    #[test]
    fn test_resize_applies_to_generation() {
        let mut h = harness();
        h.game.resize(2000.0, 300.0);
        assert_eq!(h.game.playfield(), Playfield::new(800.0, 300.0));

        h.game.resize(400.0, 300.0);
        h.game.start();
        let s = h.game.state();
        assert_eq!(s.obstacles[0].x, 400.0);
        // Degenerate height: every gap collapses to the centered value
        assert!(s.obstacles.iter().all(|o| o.gap_top == 60.0));
        assert_eq!(s.player.pos.y, 150.0);
    }

    #[test]
    fn test_autopilot_survives_a_while() {
        let mut h = harness();
        h.game.set_autopilot(true);
        h.game.start();
        for _ in 0..600 {
            assert!(h.game.tick_once());
        }
        assert_eq!(h.game.phase(), GamePhase::Playing);
        assert!(h.game.state().score >= 2);
    }

    #[test]
    fn test_failing_storage_does_not_block_play() {
        let mut h = harness_with(MemoryStore::read_only());
        h.game.select_character(CharacterKind::Fire);
        h.game.start();
        h.game.state.score = 2;
        fall_to_game_over(&mut h.game);
        assert_eq!(h.game.best_score(), 2);
        assert!(h.game.start());
    }
}
