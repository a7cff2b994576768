use crate::Error;
use crate::border::BorderMode;
use crate::image::{Image, ImageView};
use crate::sample::Interpolation;

/// Continuous-coordinate access to a multi-channel raster.
///
/// This is the only capability the unfolding pipeline needs from its host.
/// Implementations must return a defined value for every coordinate,
/// including coordinates outside the image.
pub trait RasterSource {
    fn width(&self) -> usize;

    fn height(&self) -> usize;

    fn channel_count(&self) -> usize;

    /// Physical size of one pixel along x, in calibration units.
    fn pixel_spacing(&self) -> f32 {
        1.0
    }

    /// Interpolated value of `channel` at pixel-center coordinates `(x, y)`.
    fn sample(&self, channel: usize, x: f32, y: f32) -> f32;
}

/// Storage depth of the source pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BitDepth {
    U8,
    U16,
    #[default]
    F32,
}

impl BitDepth {
    pub fn bits(self) -> u32 {
        match self {
            Self::U8 => 8,
            Self::U16 => 16,
            Self::F32 => 32,
        }
    }

    /// Representable value range, `None` for floating point.
    pub fn range(self) -> Option<(f32, f32)> {
        match self {
            Self::U8 => Some((0.0, u8::MAX as f32)),
            Self::U16 => Some((0.0, u16::MAX as f32)),
            Self::F32 => None,
        }
    }

    pub fn clamp(self, v: f32) -> f32 {
        match self.range() {
            Some((lo, hi)) => v.clamp(lo, hi),
            None => v,
        }
    }
}

/// Spatial calibration of a raster.
#[derive(Debug, Clone, PartialEq)]
pub struct Calibration {
    pub pixel_spacing: f32,
    pub unit: String,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            pixel_spacing: 1.0,
            unit: "pixel".to_owned(),
        }
    }
}

/// In-memory multi-channel raster.
///
/// Channels are stored as `f32` regardless of [`BitDepth`]; the depth is kept
/// so sampled values can be clamped to the source range and exporters can
/// write results back at the original depth.
#[derive(Debug, Clone)]
pub struct Raster {
    width: usize,
    height: usize,
    channels: Vec<Image<f32>>,
    depth: BitDepth,
    calibration: Calibration,
    interpolation: Interpolation,
    border: BorderMode<f32>,
}

impl Raster {
    pub fn from_channels(channels: Vec<Image<f32>>, depth: BitDepth) -> Result<Self, Error> {
        let first = channels.first().ok_or(Error::EmptyRaster)?;
        let (width, height) = (first.width(), first.height());

        for (channel, img) in channels.iter().enumerate() {
            if img.width() != width || img.height() != height {
                return Err(Error::ChannelSizeMismatch {
                    channel,
                    width: img.width(),
                    height: img.height(),
                    expected_width: width,
                    expected_height: height,
                });
            }
        }

        Ok(Self {
            width,
            height,
            channels,
            depth,
            calibration: Calibration::default(),
            interpolation: Interpolation::default(),
            border: BorderMode::Clamp,
        })
    }

    pub fn from_u8_channels(channels: &[ImageView<'_, u8>]) -> Result<Self, Error> {
        Self::from_channels(channels.iter().map(|c| c.to_f32()).collect(), BitDepth::U8)
    }

    pub fn from_u16_channels(channels: &[ImageView<'_, u16>]) -> Result<Self, Error> {
        Self::from_channels(
            channels.iter().map(|c| c.to_f32()).collect(),
            BitDepth::U16,
        )
    }

    /// Splits an interleaved buffer (`RGBRGB...`) into `n_channels` planes.
    pub fn from_interleaved<T: Copy + Into<f32>>(
        width: usize,
        height: usize,
        n_channels: usize,
        data: &[T],
        depth: BitDepth,
    ) -> Result<Self, Error> {
        if n_channels == 0 {
            return Err(Error::EmptyRaster);
        }
        let expected = width
            .checked_mul(height)
            .and_then(|v| v.checked_mul(n_channels))
            .ok_or(Error::SizeMismatch {
                expected: usize::MAX,
                actual: data.len(),
            })?;
        if data.len() != expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }

        let planes = (0..n_channels)
            .map(|c| {
                let plane = data
                    .iter()
                    .skip(c)
                    .step_by(n_channels)
                    .map(|&v| v.into())
                    .collect();
                Image::from_vec(width, height, plane)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_channels(planes, depth)
    }

    pub fn with_calibration(mut self, calibration: Calibration) -> Result<Self, Error> {
        let spacing = calibration.pixel_spacing;
        if !(spacing.is_finite() && spacing > 0.0) {
            return Err(Error::InvalidPixelSpacing(spacing));
        }
        self.calibration = calibration;
        Ok(self)
    }

    pub fn with_sampling(mut self, interpolation: Interpolation, border: BorderMode<f32>) -> Self {
        self.interpolation = interpolation;
        self.border = border;
        self
    }

    pub fn channel(&self, c: usize) -> Option<&Image<f32>> {
        self.channels.get(c)
    }

    pub fn channels(&self) -> &[Image<f32>] {
        &self.channels
    }

    pub fn depth(&self) -> BitDepth {
        self.depth
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    pub fn border(&self) -> BorderMode<f32> {
        self.border
    }
}

impl RasterSource for Raster {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn channel_count(&self) -> usize {
        self.channels.len()
    }

    fn pixel_spacing(&self) -> f32 {
        self.calibration.pixel_spacing
    }

    /// Unknown channels read as `0`.
    fn sample(&self, channel: usize, x: f32, y: f32) -> f32 {
        let Some(img) = self.channels.get(channel) else {
            return 0.0;
        };
        let v = self
            .interpolation
            .sample(&img.as_view(), x, y, self.border);
        self.depth.clamp(v)
    }
}
