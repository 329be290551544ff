use crate::theme::Theme;
use crossterm::event::{KeyCode, KeyEvent};
use std::time::Instant;
use treebuild_core::{Difficulty, PuzzlePiece, PuzzleSession, SessionState};

/// Result of handling a key press
pub enum AppAction {
    Continue,
    Quit,
}

/// Which part of the game screen has keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// The board: the blank tree to fill in
    Tree,
    /// The tray: the row of unplaced shuffled pieces
    Tray,
}

/// The main application state
pub struct App {
    /// The puzzle session driven by this UI
    pub session: PuzzleSession,
    /// Color theme
    pub theme: Theme,
    /// Current keyboard focus
    pub focus: Focus,
    /// Index into the board's populated-slot list
    pub cursor: usize,
    /// Index into the unplaced piece row
    pub tray_cursor: usize,
    /// The picked-up piece (its original slot), if any
    pub selected_piece: Option<usize>,
    /// Highlighted row on the start menu
    pub menu_selection: usize,
    /// Transient status message
    pub message: Option<String>,
    /// Frames until the message clears
    message_timer: u32,
    /// When the current puzzle started
    pub started: Instant,
    /// When the puzzle was solved; freezes the clock on the win screen
    finished: Option<Instant>,
    /// Frame counter, drives the win confetti
    pub frame: u64,
    /// One-shot generation seed from the command line
    seed: Option<u64>,
    /// Whether the dark theme is active
    dark: bool,
}

impl App {
    pub fn new(difficulty: Option<Difficulty>, seed: Option<u64>, dark: bool) -> Self {
        let mut app = Self {
            session: PuzzleSession::new(),
            theme: if dark { Theme::dark() } else { Theme::light() },
            focus: Focus::Tray,
            cursor: 0,
            tray_cursor: 0,
            selected_piece: None,
            menu_selection: 0,
            message: None,
            message_timer: 0,
            started: Instant::now(),
            finished: None,
            frame: 0,
            seed,
            dark,
        };
        if let Some(difficulty) = difficulty {
            app.start_game(difficulty);
        }
        app
    }

    /// Generate a puzzle and move to the game screen.
    fn start_game(&mut self, difficulty: Difficulty) {
        // The three fixed difficulties always satisfy the generator's
        // constraints, so a failure here is a programming error.
        match self.seed.take() {
            Some(seed) => self
                .session
                .new_puzzle_seeded(difficulty, seed)
                .expect("fixed difficulties are always satisfiable"),
            None => self
                .session
                .new_puzzle(difficulty)
                .expect("fixed difficulties are always satisfiable"),
        }
        self.focus = Focus::Tray;
        self.cursor = 0;
        self.tray_cursor = 0;
        self.selected_piece = None;
        self.message = None;
        self.started = Instant::now();
        self.finished = None;
    }

    /// Populated structural slots, ascending (row by row, left to right)
    pub fn populated_slots(&self) -> Vec<usize> {
        self.session
            .board()
            .map(|board| board.populated_slots().collect())
            .unwrap_or_default()
    }

    /// Pieces still in the tray, presentation order
    pub fn unplaced(&self) -> Vec<PuzzlePiece> {
        self.session.unplaced()
    }

    /// Seconds since the puzzle started, formatted MM:SS
    pub fn elapsed_string(&self) -> String {
        let end = self.finished.unwrap_or_else(Instant::now);
        let secs = end.duration_since(self.started).as_secs();
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }

    /// Advance animations and expire messages. Called on every tick.
    pub fn tick(&mut self) {
        self.frame = self.frame.wrapping_add(1);
        if self.message_timer > 0 {
            self.message_timer -= 1;
            if self.message_timer == 0 {
                self.message = None;
            }
        }
    }

    fn flash(&mut self, text: String) {
        self.message = Some(text);
        self.message_timer = 20;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        match self.session.state() {
            SessionState::Start => self.handle_start_key(key),
            SessionState::Playing => self.handle_game_key(key),
            SessionState::Won => self.handle_win_key(key),
            SessionState::Quit => AppAction::Quit,
        }
    }

    fn handle_start_key(&mut self, key: KeyEvent) -> AppAction {
        let levels = Difficulty::all_levels();
        match key.code {
            KeyCode::Up => {
                self.menu_selection = self.menu_selection.saturating_sub(1);
            }
            KeyCode::Down => {
                self.menu_selection = (self.menu_selection + 1).min(levels.len() - 1);
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.start_game(levels[self.menu_selection]);
            }
            KeyCode::Char(c @ '1'..='3') => {
                let index = c as usize - '1' as usize;
                self.menu_selection = index;
                self.start_game(levels[index]);
            }
            KeyCode::Char('q') | KeyCode::Esc => {
                self.session.quit();
                return AppAction::Quit;
            }
            _ => {}
        }
        AppAction::Continue
    }

    fn handle_game_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char('q') => {
                self.session.quit();
                return AppAction::Quit;
            }
            KeyCode::Esc => {
                if self.selected_piece.take().is_none() {
                    self.session.to_start();
                }
            }
            KeyCode::Tab => {
                self.focus = match self.focus {
                    Focus::Tree => Focus::Tray,
                    Focus::Tray => Focus::Tree,
                };
            }
            KeyCode::Char('r') => {
                self.session.reset();
                self.selected_piece = None;
                self.tray_cursor = 0;
            }
            KeyCode::Char('n') => {
                if let Some(difficulty) = self.session.difficulty() {
                    self.start_game(difficulty);
                }
            }
            KeyCode::Char('t') => {
                self.dark = !self.dark;
                self.theme = if self.dark {
                    Theme::dark()
                } else {
                    Theme::light()
                };
            }
            KeyCode::Left => self.move_cursor(-1),
            KeyCode::Right => self.move_cursor(1),
            KeyCode::Up => self.move_to_parent(),
            KeyCode::Down => self.move_to_child(),
            KeyCode::Enter | KeyCode::Char(' ') => self.activate(),
            _ => {}
        }
        AppAction::Continue
    }

    fn handle_win_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char('q') => {
                self.session.quit();
                return AppAction::Quit;
            }
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Esc => {
                self.session.to_start();
            }
            _ => {}
        }
        AppAction::Continue
    }

    fn move_cursor(&mut self, delta: isize) {
        match self.focus {
            Focus::Tree => {
                let len = self.populated_slots().len();
                if len > 0 {
                    let next = self.cursor as isize + delta;
                    self.cursor = next.rem_euclid(len as isize) as usize;
                }
            }
            Focus::Tray => {
                let len = self.unplaced().len();
                if len > 0 {
                    let next = self.tray_cursor as isize + delta;
                    self.tray_cursor = next.rem_euclid(len as isize) as usize;
                }
            }
        }
    }

    /// Jump the board cursor to the parent slot
    fn move_to_parent(&mut self) {
        if self.focus != Focus::Tree {
            return;
        }
        let slots = self.populated_slots();
        let Some(&slot) = slots.get(self.cursor) else {
            return;
        };
        if slot == 0 {
            return;
        }
        let parent = (slot - 1) / 2;
        if let Some(index) = slots.iter().position(|&s| s == parent) {
            self.cursor = index;
        }
    }

    /// Jump the board cursor to a child slot, preferring the left one
    fn move_to_child(&mut self) {
        if self.focus != Focus::Tree {
            return;
        }
        let slots = self.populated_slots();
        let Some(&slot) = slots.get(self.cursor) else {
            return;
        };
        for child in [2 * slot + 1, 2 * slot + 2] {
            if let Some(index) = slots.iter().position(|&s| s == child) {
                self.cursor = index;
                return;
            }
        }
    }

    /// Enter on the focused element: pick up, place, or clear.
    fn activate(&mut self) {
        match self.focus {
            Focus::Tray => {
                let unplaced = self.unplaced();
                if let Some(piece) = unplaced.get(self.tray_cursor) {
                    self.selected_piece = Some(piece.original_slot);
                    self.focus = Focus::Tree;
                }
            }
            Focus::Tree => {
                let slots = self.populated_slots();
                let Some(&slot) = slots.get(self.cursor) else {
                    return;
                };
                match self.selected_piece.take() {
                    Some(piece) => {
                        if let Err(err) = self.session.place(slot, piece) {
                            self.selected_piece = Some(piece);
                            self.flash(err.to_string());
                        } else if self.session.is_won() {
                            self.finished = Some(Instant::now());
                        } else {
                            self.focus = Focus::Tray;
                        }
                    }
                    None => {
                        if let Err(err) = self.session.clear(slot) {
                            self.flash(err.to_string());
                        }
                    }
                }
                self.clamp_tray_cursor();
            }
        }
    }

    /// Keep the tray cursor inside the pool after it shrinks or grows.
    fn clamp_tray_cursor(&mut self) {
        let len = self.unplaced().len();
        if len == 0 {
            self.tray_cursor = 0;
        } else if self.tray_cursor >= len {
            self.tray_cursor = len - 1;
        }
    }
}
