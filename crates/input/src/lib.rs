//! Terminal input module (board-facing).
//!
//! Maps `crossterm` key events onto [`crate::types::BoardCommand`]s and
//! tracks held keys for terminals that never report key releases: a held
//! hurry key eases off again once no key event has arrived for a while.

pub mod handler;
pub mod map;

pub use cubetris_types as types;

pub use handler::InputHandler;
pub use map::{handle_key_event, should_pause, should_quit};
