use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use fiber_unfold::{BitDepth, Curve, Point2f, Raster};
use image::DynamicImage;
use serde::Deserialize;

/// Curves file: `{ "curves": [ { "points": [[x, y], ...] }, ... ] }`.
#[derive(Debug, Deserialize)]
pub struct CurvesFile {
    pub curves: Vec<CurveDto>,
}

#[derive(Debug, Deserialize)]
pub struct CurveDto {
    pub points: Vec<[f32; 2]>,
}

/// Loads `path` with the `image` crate and splits it into channels.
pub fn load_raster(path: &Path) -> Result<Raster> {
    ensure_file_exists(path, "input")?;
    let dyn_img =
        image::open(path).with_context(|| format!("opening input image {}", path.display()))?;
    raster_from_dynamic(dyn_img)
        .with_context(|| format!("constructing raster from {}", path.display()))
}

/// Gray images give one channel, color images one channel per color.
/// Alpha is dropped.
pub fn raster_from_dynamic(img: DynamicImage) -> Result<Raster> {
    let (w, h) = (img.width() as usize, img.height() as usize);

    let raster = match img {
        DynamicImage::ImageLuma8(buf) => {
            Raster::from_interleaved(w, h, 1, buf.as_raw(), BitDepth::U8)
        }
        DynamicImage::ImageLumaA8(_) => {
            let buf = img.to_luma8();
            Raster::from_interleaved(w, h, 1, buf.as_raw(), BitDepth::U8)
        }
        DynamicImage::ImageRgb8(buf) => {
            Raster::from_interleaved(w, h, 3, buf.as_raw(), BitDepth::U8)
        }
        DynamicImage::ImageRgba8(_) => {
            let buf = img.to_rgb8();
            Raster::from_interleaved(w, h, 3, buf.as_raw(), BitDepth::U8)
        }
        DynamicImage::ImageLuma16(buf) => {
            Raster::from_interleaved(w, h, 1, buf.as_raw(), BitDepth::U16)
        }
        DynamicImage::ImageLumaA16(_) => {
            let buf = img.to_luma16();
            Raster::from_interleaved(w, h, 1, buf.as_raw(), BitDepth::U16)
        }
        DynamicImage::ImageRgb16(buf) => {
            Raster::from_interleaved(w, h, 3, buf.as_raw(), BitDepth::U16)
        }
        DynamicImage::ImageRgba16(_) => {
            let buf = img.to_rgb16();
            Raster::from_interleaved(w, h, 3, buf.as_raw(), BitDepth::U16)
        }
        DynamicImage::ImageRgb32F(buf) => {
            Raster::from_interleaved(w, h, 3, buf.as_raw(), BitDepth::F32)
        }
        other => {
            let buf = other.to_rgb32f();
            Raster::from_interleaved(w, h, 3, buf.as_raw(), BitDepth::F32)
        }
    };
    Ok(raster?)
}

/// Reads and validates the curves file. Empty point lists are rejected with
/// the offending 1-based curve number.
pub fn load_curves(path: &Path) -> Result<Vec<Curve>> {
    ensure_file_exists(path, "curves")?;
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    parse_curves(&data).with_context(|| format!("parsing curves json {}", path.display()))
}

pub fn parse_curves(data: &[u8]) -> Result<Vec<Curve>> {
    let file: CurvesFile = serde_json::from_slice(data)?;
    file.curves
        .into_iter()
        .enumerate()
        .map(|(i, dto)| {
            let points: Vec<Point2f> = dto
                .points
                .iter()
                .map(|&[x, y]| Point2f::new(x, y))
                .collect();
            Curve::new(points).with_context(|| format!("curve #{}", i + 1))
        })
        .collect()
}

fn ensure_file_exists(path: &Path, what: &str) -> Result<()> {
    if !path.exists() {
        bail!("{} file does not exist: {}", what, path.display());
    }
    if !path.is_file() {
        bail!("{} path is not a file: {}", what, path.display());
    }
    Ok(())
}
