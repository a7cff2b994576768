//! Fiber unfolding: straighten curved fibers traced on a raster.
//!
//! Pipeline per curve:
//! - Densify the polyline to points one arc-length unit apart.
//! - Fit a 5-point least-squares line at each interior point and take its
//!   normal, aligning signs with the previous normal.
//! - Sample every channel along each normal segment into a ribbon image
//!   with one column per point, and keep the column maximum as profile.
//!
//! Curves too short for a normal window are skipped. [`group_fibers`] lays out
//! the ribbons of a run stacked into one image per channel.

mod config;
mod curve;
mod montage;
mod normals;
mod pipeline;
mod ribbon;

pub use config::UnfoldConfig;
pub use curve::{Curve, DEFAULT_INTERVAL, MAX_DENSE_POINTS, densify, densify_with_interval};
pub use montage::{Montage, MontageLayout, MontageSlot, group_fibers};
pub use normals::{
    FALLBACK_NORMAL, NormalSample, WINDOW, estimate_normal, estimate_normals, normal_from_slope,
    window_slope,
};
pub use pipeline::{FiberExtractor, UnfoldedFiber, extract};
pub use ribbon::{Ribbon, resample, unfold_channel};
