#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, instrument};

use fu_core::{Error, Image, RasterSource};

use crate::config::{UnfoldConfig, validate_spacing};
use crate::curve::{Curve, densify_with_interval};
use crate::normals::{NormalSample, estimate_normals};
use crate::ribbon::{Ribbon, resample};

/// Unfolding result for one input curve.
#[derive(Debug, Clone, PartialEq)]
pub struct UnfoldedFiber {
    /// Position of the source curve in the input slice.
    pub curve_index: usize,
    /// Centerline points and normals, one per ribbon column.
    pub samples: Vec<NormalSample>,
    /// Per channel ribbon, `samples.len()` x `2 * radius + 1`.
    pub ribbons: Vec<Image<f32>>,
    /// Per channel column-max profile.
    pub profiles: Vec<Vec<f32>>,
    /// Physical position of each column along the fiber.
    pub abscissa: Vec<f32>,
}

impl UnfoldedFiber {
    /// Number of ribbon columns.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn channel_count(&self) -> usize {
        self.ribbons.len()
    }

    /// Ribbon height, `2 * radius + 1`.
    pub fn rows(&self) -> usize {
        self.ribbons.first().map_or(0, Image::height)
    }

    /// 1-based display label, `"Fiber #n"`.
    pub fn title(&self) -> String {
        format!("Fiber #{}", self.curve_index + 1)
    }
}

/// Runs densification, normal estimation and resampling over a batch of
/// curves.
#[derive(Debug, Clone)]
pub struct FiberExtractor {
    cfg: UnfoldConfig,
}

impl FiberExtractor {
    pub fn new(cfg: UnfoldConfig) -> Result<Self, Error> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    pub fn config(&self) -> &UnfoldConfig {
        &self.cfg
    }

    /// Unfolds every curve, in input order.
    ///
    /// Curves too short for a 5-point normal window are skipped, so the
    /// result may hold fewer records than `curves`; use
    /// [`UnfoldedFiber::curve_index`] to match them back.
    #[instrument(skip_all, fields(curves = curves.len(), radius = self.cfg.radius))]
    pub fn extract<R>(&self, raster: &R, curves: &[Curve]) -> Result<Vec<UnfoldedFiber>, Error>
    where
        R: RasterSource + Sync + ?Sized,
    {
        let spacing = self.resolve_spacing(raster)?;

        #[cfg(feature = "parallel")]
        let fibers: Vec<UnfoldedFiber> = curves
            .par_iter()
            .enumerate()
            .filter_map(|(i, curve)| self.unfold(raster, curve, i, spacing))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let fibers: Vec<UnfoldedFiber> = curves
            .iter()
            .enumerate()
            .filter_map(|(i, curve)| self.unfold(raster, curve, i, spacing))
            .collect();

        debug!(
            extracted = fibers.len(),
            skipped = curves.len() - fibers.len(),
            "fiber extraction finished"
        );
        Ok(fibers)
    }

    /// Unfolds a single curve; `Ok(None)` when the curve is degenerate.
    pub fn extract_one<R>(
        &self,
        raster: &R,
        curve: &Curve,
        curve_index: usize,
    ) -> Result<Option<UnfoldedFiber>, Error>
    where
        R: RasterSource + Sync + ?Sized,
    {
        let spacing = self.resolve_spacing(raster)?;
        Ok(self.unfold(raster, curve, curve_index, spacing))
    }

    fn resolve_spacing<R>(&self, raster: &R) -> Result<f32, Error>
    where
        R: RasterSource + ?Sized,
    {
        validate_spacing(self.cfg.pixel_spacing.unwrap_or_else(|| raster.pixel_spacing()))
    }

    fn unfold<R>(
        &self,
        raster: &R,
        curve: &Curve,
        curve_index: usize,
        spacing: f32,
    ) -> Option<UnfoldedFiber>
    where
        R: RasterSource + Sync + ?Sized,
    {
        // Interval was validated with the config.
        let points = densify_with_interval(curve, self.cfg.interval).ok()?;
        let samples = estimate_normals(&points);
        if samples.is_empty() {
            debug!(
                curve = curve_index,
                dense_points = points.len(),
                "curve too short to unfold, skipping"
            );
            return None;
        }

        let Ribbon {
            images,
            profiles,
            abscissa,
        } = resample(raster, &samples, self.cfg.radius, spacing);

        debug!(
            curve = curve_index,
            columns = samples.len(),
            channels = images.len(),
            "fiber unfolded"
        );
        Some(UnfoldedFiber {
            curve_index,
            samples,
            ribbons: images,
            profiles,
            abscissa,
        })
    }
}

/// Validates `cfg` and unfolds `curves` from `raster`.
pub fn extract<R>(
    raster: &R,
    curves: &[Curve],
    cfg: &UnfoldConfig,
) -> Result<Vec<UnfoldedFiber>, Error>
where
    R: RasterSource + Sync + ?Sized,
{
    FiberExtractor::new(cfg.clone())?.extract(raster, curves)
}

#[cfg(test)]
mod tests {
    use super::{FiberExtractor, extract};
    use crate::config::UnfoldConfig;
    use crate::curve::Curve;
    use fu_core::{BitDepth, Calibration, Error, Image, Point2f, Raster, RasterSource};

    /// 64x24 background of 0 with a one-pixel line of 100 on row 12.
    fn line_raster() -> Raster {
        let mut img = Image::new_fill(64, 24, 0u8);
        for v in img.row_mut(12) {
            *v = 100;
        }
        Raster::from_u8_channels(&[img.as_view()]).expect("valid raster")
    }

    /// Host-side raster that only knows how to evaluate a formula.
    struct Analytic;

    impl RasterSource for Analytic {
        fn width(&self) -> usize {
            100
        }

        fn height(&self) -> usize {
            100
        }

        fn channel_count(&self) -> usize {
            2
        }

        fn pixel_spacing(&self) -> f32 {
            0.5
        }

        fn sample(&self, channel: usize, x: f32, y: f32) -> f32 {
            (channel + 1) as f32 * (x + y)
        }
    }

    #[test]
    fn straight_line_at_constant_intensity() {
        let raster = line_raster()
            .with_calibration(Calibration {
                pixel_spacing: 0.34,
                unit: "µm".to_owned(),
            })
            .expect("valid calibration");
        let curve = Curve::line(Point2f::new(5.0, 12.0), Point2f::new(54.0, 12.0));
        let cfg = UnfoldConfig::with_radius(2).expect("valid radius");

        let fibers = extract(&raster, &[curve], &cfg).expect("valid config");
        assert_eq!(fibers.len(), 1);

        let fiber = &fibers[0];
        assert_eq!(fiber.curve_index, 0);
        assert_eq!(fiber.len(), 46);
        assert_eq!(fiber.rows(), 5);
        assert_eq!(fiber.profiles, vec![vec![100.0; 46]]);

        let expected: Vec<f32> = (0..46).map(|x| x as f32 * 0.34).collect();
        assert_eq!(fiber.abscissa, expected);

        // Centre row is the line itself, the others the background.
        let ribbon = &fiber.ribbons[0];
        assert_eq!(ribbon.row(2), &[100.0; 46][..]);
        assert_eq!(ribbon.row(0), &[0.0; 46][..]);
        assert_eq!(ribbon.row(4), &[0.0; 46][..]);
    }

    #[test]
    fn degenerate_curves_are_skipped_without_error() {
        let raster = line_raster();
        let curves = vec![
            Curve::from_xy(&[[3.0, 3.0]]).expect("valid curve"),
            Curve::line(Point2f::new(10.0, 12.0), Point2f::new(30.0, 12.0)),
            Curve::line(Point2f::new(10.0, 5.0), Point2f::new(13.0, 5.0)),
            Curve::from_xy(&[[8.0, 8.0], [8.0, 8.0]]).expect("valid curve"),
            Curve::line(Point2f::new(40.0, 20.0), Point2f::new(40.0, 2.0)),
        ];

        let fibers = extract(&raster, &curves, &UnfoldConfig::default()).expect("valid config");
        let indices: Vec<usize> = fibers.iter().map(|f| f.curve_index).collect();
        assert_eq!(indices, vec![1, 4]);
        assert_eq!(fibers[0].len(), 17);
        assert_eq!(fibers[1].len(), 15);
        assert_eq!(fibers[1].title(), "Fiber #5");
    }

    #[test]
    fn vertical_fiber_samples_across_columns() {
        let mut img = Image::new_fill(32, 40, 0.0f32);
        for y in 0..40 {
            *img.get_mut(16, y).expect("in bounds") = 7.0;
        }
        let raster = Raster::from_channels(vec![img], BitDepth::F32).expect("valid raster");
        let curve = Curve::line(Point2f::new(16.0, 4.0), Point2f::new(16.0, 30.0));

        let fibers = extract(&raster, &[curve], &UnfoldConfig::default()).expect("valid config");
        let fiber = &fibers[0];
        assert!(fiber.samples.iter().all(|s| s.normal.x == 1.0 && s.normal.y == 0.0));
        assert_eq!(fiber.ribbons[0].row(4), &[7.0; 23][..]);
        assert_eq!(fiber.profiles[0], vec![7.0; 23]);
    }

    #[test]
    fn configuration_errors_are_reported_before_any_work() {
        let raster = line_raster();
        let curve = Curve::line(Point2f::new(5.0, 12.0), Point2f::new(54.0, 12.0));

        let cfg = UnfoldConfig {
            radius: 0,
            ..UnfoldConfig::default()
        };
        assert_eq!(
            extract(&raster, &[curve.clone()], &cfg),
            Err(Error::InvalidRadius(0))
        );

        let cfg = UnfoldConfig {
            pixel_spacing: Some(f32::NAN),
            ..UnfoldConfig::default()
        };
        assert!(matches!(
            FiberExtractor::new(cfg),
            Err(Error::InvalidPixelSpacing(_))
        ));
    }

    #[test]
    fn custom_raster_sources_and_spacing_override() {
        let curve = Curve::line(Point2f::new(10.0, 10.0), Point2f::new(20.0, 10.0));
        let extractor = FiberExtractor::new(UnfoldConfig {
            radius: 1,
            ..UnfoldConfig::default()
        })
        .expect("valid config");

        let fiber = extractor
            .extract_one(&Analytic, &curve, 3)
            .expect("valid spacing")
            .expect("long enough");
        assert_eq!(fiber.curve_index, 3);
        assert_eq!(fiber.channel_count(), 2);
        assert_eq!(fiber.abscissa[..3], [0.0, 0.5, 1.0]);
        // Max over the column sits on the far side of the normal.
        assert_eq!(fiber.profiles[0][0], 12.0 + 11.0);
        assert_eq!(fiber.profiles[1][0], 2.0 * (12.0 + 11.0));

        let overridden = FiberExtractor::new(UnfoldConfig {
            radius: 1,
            pixel_spacing: Some(2.0),
            ..UnfoldConfig::default()
        })
        .expect("valid config")
        .extract(&Analytic, &[curve])
        .expect("valid spacing");
        assert_eq!(overridden[0].abscissa[..3], [0.0, 2.0, 4.0]);

        let short = Curve::line(Point2f::new(0.0, 0.0), Point2f::new(2.0, 0.0));
        assert_eq!(extractor.extract_one(&Analytic, &short, 0), Ok(None));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_extraction_keeps_input_order_around_skipped_curves() {
        let extractor = FiberExtractor::new(UnfoldConfig {
            radius: 2,
            ..UnfoldConfig::default()
        })
        .expect("valid config");

        // Even indices are long enough, odd ones collapse below the window.
        let curves: Vec<Curve> = (0..64)
            .map(|i| {
                let y = 5.0 + (i % 40) as f32;
                let len = if i % 2 == 0 { 10.0 + i as f32 } else { 2.0 };
                Curve::line(Point2f::new(3.0, y), Point2f::new(3.0 + len, y))
            })
            .collect();

        let fibers = extractor.extract(&Analytic, &curves).expect("valid spacing");
        let indices: Vec<usize> = fibers.iter().map(|f| f.curve_index).collect();
        let expected: Vec<usize> = (0..64).step_by(2).collect();
        assert_eq!(indices, expected);

        for fiber in &fibers {
            let one = extractor
                .extract_one(&Analytic, &curves[fiber.curve_index], fiber.curve_index)
                .expect("valid spacing")
                .expect("long enough");
            assert_eq!(fiber, &one);
        }
    }
}
