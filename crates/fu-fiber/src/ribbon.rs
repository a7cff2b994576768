#[cfg(feature = "parallel")]
use rayon::prelude::*;

use fu_core::{Image, RasterSource};

use crate::normals::NormalSample;

/// Straightened fiber: one ribbon image and one profile per channel.
#[derive(Debug, Clone, PartialEq)]
pub struct Ribbon {
    /// Per channel, `samples.len()` columns by `2 * radius + 1` rows. Row
    /// `y` holds the offset `y - radius` along the normal.
    pub images: Vec<Image<f32>>,
    /// Per channel, the maximum of each ribbon column.
    pub profiles: Vec<Vec<f32>>,
    /// Physical position of each column along the fiber.
    pub abscissa: Vec<f32>,
}

/// Samples `raster` along every normal segment `p + s * n`, `s ∈ [-radius, radius]`.
///
/// Column `x` of each ribbon corresponds to `samples[x]`; its profile value is
/// the column maximum, which tolerates the intensity ridge sitting slightly
/// off the drawn centerline.
pub fn resample<R>(
    raster: &R,
    samples: &[NormalSample],
    radius: usize,
    pixel_spacing: f32,
) -> Ribbon
where
    R: RasterSource + Sync + ?Sized,
{
    let channels = raster.channel_count();

    #[cfg(feature = "parallel")]
    let per_channel: Vec<(Image<f32>, Vec<f32>)> = (0..channels)
        .into_par_iter()
        .map(|c| unfold_channel(raster, c, samples, radius))
        .collect();
    #[cfg(not(feature = "parallel"))]
    let per_channel: Vec<(Image<f32>, Vec<f32>)> = (0..channels)
        .map(|c| unfold_channel(raster, c, samples, radius))
        .collect();

    let (images, profiles) = per_channel.into_iter().unzip();
    let abscissa = (0..samples.len())
        .map(|x| x as f32 * pixel_spacing)
        .collect();

    Ribbon {
        images,
        profiles,
        abscissa,
    }
}

/// Ribbon image and column-max profile of a single channel.
pub fn unfold_channel<R>(
    raster: &R,
    channel: usize,
    samples: &[NormalSample],
    radius: usize,
) -> (Image<f32>, Vec<f32>)
where
    R: RasterSource + ?Sized,
{
    let cols = samples.len();
    let rows = 2 * radius + 1;
    let r = radius as isize;

    let mut image = Image::new_fill(cols, rows, 0.0f32);
    let data = image.data_mut();
    let mut profile = vec![f32::NEG_INFINITY; cols];

    for (x, s) in samples.iter().enumerate() {
        for (y, off) in (-r..=r).enumerate() {
            let p = s.point + off as f32 * s.normal;
            let v = raster.sample(channel, p.x, p.y);
            data[y * cols + x] = v;
            if v > profile[x] {
                profile[x] = v;
            }
        }
    }

    (image, profile)
}
