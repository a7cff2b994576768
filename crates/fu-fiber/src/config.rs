use fu_core::Error;

use crate::curve::DEFAULT_INTERVAL;

/// Parameters fixed for one extraction run.
#[derive(Debug, Clone, PartialEq)]
pub struct UnfoldConfig {
    /// Half-width, in pixels, of the cross-section sampled around the
    /// centerline. Ribbons are `2 * radius + 1` rows high.
    pub radius: usize,
    /// Physical size of one ribbon column. `None` takes the raster's
    /// calibration.
    pub pixel_spacing: Option<f32>,
    /// Arc-length step used to densify curves.
    pub interval: f32,
}

impl Default for UnfoldConfig {
    fn default() -> Self {
        Self {
            radius: 4,
            pixel_spacing: None,
            interval: DEFAULT_INTERVAL,
        }
    }
}

impl UnfoldConfig {
    /// Default configuration with a caller-supplied signed radius, rejecting
    /// `radius <= 0`.
    pub fn with_radius(radius: i64) -> Result<Self, Error> {
        let radius = usize::try_from(radius)
            .ok()
            .filter(|&r| r > 0)
            .ok_or(Error::InvalidRadius(radius))?;
        Ok(Self {
            radius,
            ..Self::default()
        })
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.radius == 0 {
            return Err(Error::InvalidRadius(0));
        }
        if let Some(spacing) = self.pixel_spacing {
            validate_spacing(spacing)?;
        }
        if !(self.interval.is_finite() && self.interval > 0.0) {
            return Err(Error::InvalidInterval(self.interval));
        }
        Ok(())
    }

    /// Ribbon height in pixels.
    pub fn rows(&self) -> usize {
        2 * self.radius + 1
    }
}

pub(crate) fn validate_spacing(spacing: f32) -> Result<f32, Error> {
    if spacing.is_finite() && spacing > 0.0 {
        Ok(spacing)
    } else {
        Err(Error::InvalidPixelSpacing(spacing))
    }
}

#[cfg(test)]
mod tests {
    use super::UnfoldConfig;
    use fu_core::Error;

    #[test]
    fn signed_radius_must_be_positive() {
        assert_eq!(UnfoldConfig::with_radius(0), Err(Error::InvalidRadius(0)));
        assert_eq!(UnfoldConfig::with_radius(-3), Err(Error::InvalidRadius(-3)));

        let cfg = UnfoldConfig::with_radius(2).expect("positive radius");
        assert_eq!(cfg.radius, 2);
        assert_eq!(cfg.rows(), 5);
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn validate_checks_every_field() {
        let cfg = UnfoldConfig {
            radius: 0,
            ..UnfoldConfig::default()
        };
        assert_eq!(cfg.validate(), Err(Error::InvalidRadius(0)));

        let cfg = UnfoldConfig {
            pixel_spacing: Some(-0.1),
            ..UnfoldConfig::default()
        };
        assert_eq!(cfg.validate(), Err(Error::InvalidPixelSpacing(-0.1)));

        let cfg = UnfoldConfig {
            interval: f32::INFINITY,
            ..UnfoldConfig::default()
        };
        assert_eq!(cfg.validate(), Err(Error::InvalidInterval(f32::INFINITY)));

        assert_eq!(UnfoldConfig::default().radius, 4);
    }
}
