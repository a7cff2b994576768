//! Raster primitives for fiber unfolding.
//!
//! ## Image Views and Stride
//! [`Image`] owns a contiguous row-major buffer. [`ImageView`] borrows one
//! with an element stride (not byte stride) that may exceed the width, so
//! host buffers with row padding can be wrapped without copying.
//!
//! ## Sampling Coordinates
//! Integer coordinates refer to pixel centers. Nearest-neighbor rounds to the
//! closest index; bilinear and bicubic use the floor-based 2x2 and 4x4
//! neighborhoods. Bicubic uses the Catmull-Rom kernel and returns source
//! pixels unchanged at integer coordinates.
//!
//! ## Border Modes
//! Every tap outside the image is resolved by a [`BorderMode`]: clamp to the
//! edge, constant fill, or reflect-101.
//!
//! ## Rasters
//! [`RasterSource`] is the narrow capability the unfolding pipeline consumes.
//! [`Raster`] is the in-memory implementation: equally sized `f32` channels,
//! the source [`BitDepth`], spatial [`Calibration`] and a sampling policy.

mod border;
mod error;
mod geom;
mod image;
mod raster;
mod sample;

pub use border::{BorderMode, ParseBorderModeError, map_index};
pub use error::Error;
pub use geom::{Point2f, Vec2f};
pub use image::{Image, ImageView};
pub use raster::{BitDepth, Calibration, Raster, RasterSource};
pub use sample::{
    Interpolation, ParseInterpolationError, sample_bicubic_f32, sample_bilinear_f32,
    sample_nearest_f32,
};
