//! Cubetris (workspace facade crate).
//!
//! Re-exports the workspace crates as `cubetris::{core, input, term, types}`;
//! the implementation lives in dedicated crates under `crates/`.

pub use cubetris_core as core;
pub use cubetris_input as input;
pub use cubetris_term as term;
pub use cubetris_types as types;
