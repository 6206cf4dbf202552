//! Terminal board renderer.
//!
//! A small rendering layer for playing in a terminal: the view draws a
//! `BoardSnapshot` into a framebuffer and the renderer flushes that buffer
//! through crossterm. The board itself stays in `core`; nothing here mutates
//! it.

pub mod fb;
pub mod feed;
pub mod game_view;
pub mod renderer;

pub use cubetris_core as core;
pub use cubetris_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use feed::{cue_for, EventFeed, FeedEntry};
pub use game_view::{AnchorY, BoardView, Layout, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
