use core::fmt;
use core::str::FromStr;

use crate::border::BorderMode;
use crate::image::ImageView;

/// Continuous-coordinate interpolation scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interpolation {
    Nearest,
    Bilinear,
    /// 4x4 Catmull-Rom kernel.
    #[default]
    Bicubic,
}

impl Interpolation {
    pub fn sample<T: Copy + Into<f32>>(
        self,
        img: &ImageView<'_, T>,
        x: f32,
        y: f32,
        border: BorderMode<f32>,
    ) -> f32 {
        match self {
            Self::Nearest => sample_nearest_f32(img, x, y, border),
            Self::Bilinear => sample_bilinear_f32(img, x, y, border),
            Self::Bicubic => sample_bicubic_f32(img, x, y, border),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseInterpolationError(String);

impl fmt::Display for ParseInterpolationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown interpolation '{}' (expected nearest, bilinear or bicubic)",
            self.0
        )
    }
}

impl std::error::Error for ParseInterpolationError {}

impl FromStr for Interpolation {
    type Err = ParseInterpolationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nearest" | "none" => Ok(Self::Nearest),
            "bilinear" => Ok(Self::Bilinear),
            "bicubic" => Ok(Self::Bicubic),
            _ => Err(ParseInterpolationError(s.to_owned())),
        }
    }
}

// Sampling an image with no pixels yields the constant fill, or 0 for the
// index-mapping border modes.
fn empty_value(border: &BorderMode<f32>) -> f32 {
    match border {
        BorderMode::Constant(v) => *v,
        _ => 0.0,
    }
}

// Below this magnitude `floor(v) as isize` plus the kernel reach cannot
// overflow, and f32 still resolves fractions.
const SAFE_COORD: f32 = (1u32 << 24) as f32;

// Moves a coordinate into a range where integer tap arithmetic is safe
// without changing which pixels the border mode resolves the taps to.
//
// Clamp and constant taps beyond `[-2, len + 1]` all resolve to the same
// edge or fill, so the coordinate is clamped there. Reflect101 is periodic
// and far coordinates are reduced by the period, which is exact since f32
// values that large are integers. `None` when the coordinate has no
// position: NaN, or infinity under reflection.
fn bounded_coord(v: f32, len: usize, border: &BorderMode<f32>) -> Option<f32> {
    if v.is_nan() {
        return None;
    }
    if v.abs() < SAFE_COORD {
        return Some(v);
    }
    match border {
        BorderMode::Reflect101 if len > 1 => {
            if v.is_infinite() {
                return None;
            }
            let period = (2 * len - 2) as f64;
            Some(f64::from(v).rem_euclid(period) as f32)
        }
        _ => Some(v.clamp(-2.0, len as f32 + 1.0)),
    }
}

// Bounded `(x, y)` for `img`, or the fill value when either has no position.
fn bounded_xy<T>(
    img: &ImageView<'_, T>,
    x: f32,
    y: f32,
    border: &BorderMode<f32>,
) -> Result<(f32, f32), f32> {
    match (
        bounded_coord(x, img.width(), border),
        bounded_coord(y, img.height(), border),
    ) {
        (Some(x), Some(y)) => Ok((x, y)),
        _ => Err(empty_value(border)),
    }
}

pub fn sample_nearest_f32<T: Copy + Into<f32>>(
    img: &ImageView<'_, T>,
    x: f32,
    y: f32,
    border: BorderMode<f32>,
) -> f32 {
    if img.is_empty() {
        return empty_value(&border);
    }
    let (x, y) = match bounded_xy(img, x, y, &border) {
        Ok(xy) => xy,
        Err(fill) => return fill,
    };
    pixel_f32(img, x.round() as isize, y.round() as isize, &border)
}

pub fn sample_bilinear_f32<T: Copy + Into<f32>>(
    img: &ImageView<'_, T>,
    x: f32,
    y: f32,
    border: BorderMode<f32>,
) -> f32 {
    if img.is_empty() {
        return empty_value(&border);
    }
    let (x, y) = match bounded_xy(img, x, y, &border) {
        Ok(xy) => xy,
        Err(fill) => return fill,
    };

    let x0 = x.floor() as isize;
    let y0 = y.floor() as isize;
    let dx = x - x0 as f32;
    let dy = y - y0 as f32;

    let p00 = pixel_f32(img, x0, y0, &border);
    let p10 = pixel_f32(img, x0 + 1, y0, &border);
    let p01 = pixel_f32(img, x0, y0 + 1, &border);
    let p11 = pixel_f32(img, x0 + 1, y0 + 1, &border);

    let top = p00 * (1.0 - dx) + p10 * dx;
    let bottom = p01 * (1.0 - dx) + p11 * dx;
    top * (1.0 - dy) + bottom * dy
}

/// Bicubic interpolation over the floor-based 4x4 neighborhood
/// `[x0-1, x0+2] x [y0-1, y0+2]`.
///
/// At integer coordinates the kernel weights are `(0, 1, 0, 0)`, so the
/// source pixel is returned unchanged. The result may overshoot the local
/// min/max near sharp edges.
///
/// Coordinates of any magnitude follow the border mode. A NaN coordinate,
/// or an infinite one under [`BorderMode::Reflect101`], reads as the
/// constant fill (0 for the other modes), the same as an empty image.
pub fn sample_bicubic_f32<T: Copy + Into<f32>>(
    img: &ImageView<'_, T>,
    x: f32,
    y: f32,
    border: BorderMode<f32>,
) -> f32 {
    if img.is_empty() {
        return empty_value(&border);
    }
    let (x, y) = match bounded_xy(img, x, y, &border) {
        Ok(xy) => xy,
        Err(fill) => return fill,
    };

    let x0 = x.floor() as isize;
    let y0 = y.floor() as isize;
    let wx = cubic_weights(x - x0 as f32);
    let wy = cubic_weights(y - y0 as f32);

    let mut acc = 0.0f32;
    for (j, wyj) in wy.iter().enumerate() {
        if *wyj == 0.0 {
            continue;
        }
        let yy = y0 - 1 + j as isize;
        let mut row = 0.0f32;
        for (i, wxi) in wx.iter().enumerate() {
            if *wxi == 0.0 {
                continue;
            }
            row += wxi * pixel_f32(img, x0 - 1 + i as isize, yy, &border);
        }
        acc += wyj * row;
    }
    acc
}

const CUBIC_A: f32 = 0.5;

// Catmull-Rom kernel for taps at distances `1 + t`, `t`, `1 - t`, `2 - t`.
fn cubic_weights(t: f32) -> [f32; 4] {
    [
        cubic(1.0 + t),
        cubic(t),
        cubic(1.0 - t),
        cubic(2.0 - t),
    ]
}

fn cubic(x: f32) -> f32 {
    let x = x.abs();
    if x < 1.0 {
        x * x * (x * (2.0 - CUBIC_A) + (CUBIC_A - 3.0)) + 1.0
    } else if x < 2.0 {
        CUBIC_A * (-x * x * x + 5.0 * x * x - 8.0 * x + 4.0)
    } else {
        0.0
    }
}

fn pixel_f32<T: Copy + Into<f32>>(
    img: &ImageView<'_, T>,
    x: isize,
    y: isize,
    border: &BorderMode<f32>,
) -> f32 {
    match (border.map(x, img.width()), border.map(y, img.height())) {
        // SAFETY: `map` only returns indices in `[0, len)`.
        (Some(xi), Some(yi)) => unsafe { (*img.get_unchecked(xi, yi)).into() },
        _ => empty_value(border),
    }
}
