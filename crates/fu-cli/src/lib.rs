//! Host side of `fiber_unfold`: image and curve input, output export and
//! logging setup for the command-line tool.

pub mod export;
pub mod input;
pub mod logger;
pub mod plot;
pub mod unfold;

pub use unfold::{UnfoldArgs, run_unfold};
