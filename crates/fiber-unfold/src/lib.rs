//! Umbrella crate for the `fiber-unfold` workspace.
//!
//! Re-exports the raster primitives of `fu-core` and the unfolding pipeline
//! of `fu-fiber`.

pub use fu_core::*;
pub use fu_fiber::*;
