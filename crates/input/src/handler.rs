//! Held-key handler for terminal environments.
//!
//! Sideways keys repeat after a delay (DAS) at a fixed rate (ARR). The hurry
//! key is a hold: pressing it hurries the piece, releasing it eases back to
//! resting speed. Terminals that do not emit key release events are covered by
//! a timeout.

use std::time::Instant;

use arrayvec::ArrayVec;
use crossterm::event::KeyCode;

use crate::types::BoardCommand;

/// Delay before a held sideways key starts repeating.
pub const DEFAULT_DAS_MS: u32 = 170;

/// Interval between sideways repeats once DAS has elapsed.
pub const DEFAULT_ARR_MS: u32 = 50;

// A single tap must not read as a sustained hold when releases never arrive.
const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u32 = 150;

/// Held sideways direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalDirection {
    Left,
    Right,
    None,
}

impl HorizontalDirection {
    fn command(self) -> Option<BoardCommand> {
        match self {
            HorizontalDirection::Left => Some(BoardCommand::MoveLeft),
            HorizontalDirection::Right => Some(BoardCommand::MoveRight),
            HorizontalDirection::None => None,
        }
    }
}

fn is_left(code: KeyCode) -> bool {
    matches!(code, KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Char('h') | KeyCode::Char('H'))
}

fn is_right(code: KeyCode) -> bool {
    matches!(code, KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Char('l') | KeyCode::Char('L'))
}

fn is_hurry(code: KeyCode) -> bool {
    matches!(code, KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Char('j') | KeyCode::Char('J'))
}

#[derive(Debug, Clone)]
pub struct InputHandler {
    horizontal: HorizontalDirection,
    hurry_held: bool,
    last_key_time: Instant,
    das_timer: u32,
    arr_accumulator: u32,
    das_delay: u32,
    arr_rate: u32,
    key_release_timeout_ms: u32,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::with_config(DEFAULT_DAS_MS, DEFAULT_ARR_MS)
    }

    pub fn with_config(das_delay: u32, arr_rate: u32) -> Self {
        Self {
            horizontal: HorizontalDirection::None,
            hurry_held: false,
            last_key_time: Instant::now(),
            das_timer: 0,
            arr_accumulator: 0,
            das_delay,
            arr_rate: arr_rate.max(1),
            key_release_timeout_ms: DEFAULT_KEY_RELEASE_TIMEOUT_MS,
        }
    }

    pub fn with_key_release_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.key_release_timeout_ms = timeout_ms;
        self
    }

    pub fn key_release_timeout_ms(&self) -> u32 {
        self.key_release_timeout_ms
    }

    pub fn is_hurrying(&self) -> bool {
        self.hurry_held
    }

    /// Track a press of a held key. Returns the command for a fresh press;
    /// repeats of an already-held key return `None`.
    pub fn handle_key_press(&mut self, code: KeyCode) -> Option<BoardCommand> {
        let direction = if is_left(code) {
            HorizontalDirection::Left
        } else if is_right(code) {
            HorizontalDirection::Right
        } else if is_hurry(code) {
            self.last_key_time = Instant::now();
            if self.hurry_held {
                return None;
            }
            self.hurry_held = true;
            return Some(BoardCommand::Hurry);
        } else {
            return None;
        };

        self.last_key_time = Instant::now();
        if self.horizontal == direction {
            return None;
        }
        self.horizontal = direction;
        self.das_timer = 0;
        self.arr_accumulator = 0;
        direction.command()
    }

    /// Track a release. Letting go of hurry yields `Ease`.
    pub fn handle_key_release(&mut self, code: KeyCode) -> Option<BoardCommand> {
        if (is_left(code) && self.horizontal == HorizontalDirection::Left)
            || (is_right(code) && self.horizontal == HorizontalDirection::Right)
        {
            self.release_horizontal();
        } else if is_hurry(code) && self.hurry_held {
            self.hurry_held = false;
            return Some(BoardCommand::Ease);
        }
        None
    }

    /// Advance held-key timers, returning sideways repeats and any `Ease`
    /// produced by the release timeout.
    pub fn update(&mut self, elapsed_ms: u32) -> ArrayVec<BoardCommand, 32> {
        let mut commands = ArrayVec::<BoardCommand, 32>::new();

        let idle_ms = self.last_key_time.elapsed().as_millis() as u32;
        if idle_ms > self.key_release_timeout_ms {
            self.release_horizontal();
            if self.hurry_held {
                self.hurry_held = false;
                let _ = commands.try_push(BoardCommand::Ease);
            }
        }

        let Some(repeat) = self.horizontal.command() else {
            return commands;
        };

        let prev_das = self.das_timer;
        self.das_timer = self.das_timer.saturating_add(elapsed_ms);
        if self.das_timer >= self.das_delay {
            let excess = if prev_das < self.das_delay {
                self.das_timer - self.das_delay
            } else {
                elapsed_ms
            };
            self.arr_accumulator += excess;
            while self.arr_accumulator >= self.arr_rate {
                let _ = commands.try_push(repeat);
                self.arr_accumulator -= self.arr_rate;
            }
        }

        commands
    }

    /// Forget every held key, e.g. on pause.
    pub fn reset(&mut self) {
        self.release_horizontal();
        self.hurry_held = false;
        self.last_key_time = Instant::now();
    }

    fn release_horizontal(&mut self) {
        self.horizontal = HorizontalDirection::None;
        self.das_timer = 0;
        self.arr_accumulator = 0;
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
