use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use fiber_unfold::{
    BorderMode, Calibration, FiberExtractor, Interpolation, MontageLayout, Raster, RasterSource,
    UnfoldConfig, UnfoldedFiber, group_fibers,
};
use tracing::{info, warn};

use crate::export::{
    FiberSummary, MontageSummary, RunSummary, ensure_output_dir, export_fiber, export_montage,
    write_json,
};
use crate::input::{load_curves, load_raster};

#[derive(Args, Debug, Clone)]
pub struct UnfoldArgs {
    /// Multi-channel input image (gray or RGB, 8/16-bit or float)
    #[arg(long, required = true)]
    pub input: PathBuf,
    /// JSON file with the fiber centerlines
    #[arg(long, required = true)]
    pub curves: PathBuf,
    /// Existing output directory
    #[arg(long, required = true)]
    pub out: PathBuf,
    /// Half-width of the unfolded ribbon, in pixels
    #[arg(long, default_value_t = 4, allow_negative_numbers = true)]
    pub radius: i64,
    /// Physical size of one pixel; defaults to 1
    #[arg(long)]
    pub pixel_spacing: Option<f32>,
    /// Unit label of the pixel spacing
    #[arg(long)]
    pub unit: Option<String>,
    #[arg(long, default_value = "bicubic")]
    pub interpolation: Interpolation,
    /// clamp, reflect, zero or constant:<value>
    #[arg(long, default_value = "clamp")]
    pub border: BorderMode<f32>,
    /// Skip the grouped montage output
    #[arg(long)]
    pub no_group: bool,
    #[arg(long, default_value_t = 5)]
    pub group_margin: usize,
    #[arg(long, default_value_t = 20)]
    pub group_label_space: usize,
    #[arg(long, default_value_t = 5)]
    pub group_fiber_space: usize,
}

impl UnfoldArgs {
    fn layout(&self) -> MontageLayout {
        MontageLayout {
            margin: self.group_margin,
            label_space: self.group_label_space,
            fiber_space: self.group_fiber_space,
        }
    }

    fn calibration(&self) -> Calibration {
        let default = Calibration::default();
        Calibration {
            pixel_spacing: self.pixel_spacing.unwrap_or(default.pixel_spacing),
            unit: self.unit.clone().unwrap_or(default.unit),
        }
    }
}

/// Loads inputs, unfolds every curve and writes all outputs into `args.out`.
/// Returns the extracted fibers.
pub fn run_unfold(args: &UnfoldArgs) -> Result<Vec<UnfoldedFiber>> {
    ensure_output_dir(&args.out)?;
    let cfg = UnfoldConfig::with_radius(args.radius).context("invalid --radius")?;

    let raster = load_raster(&args.input)?
        .with_calibration(args.calibration())
        .context("invalid --pixel-spacing")?
        .with_sampling(args.interpolation, args.border);
    let curves = load_curves(&args.curves)?;

    info!(
        input = %args.input.display(),
        width = raster.width(),
        height = raster.height(),
        channels = raster.channel_count(),
        depth = raster.depth().bits(),
        interpolation = ?raster.interpolation(),
        border = ?raster.border(),
        curves = curves.len(),
        "loaded inputs"
    );

    let extractor = FiberExtractor::new(cfg)?;
    let fibers = extractor.extract(&raster, &curves)?;
    if fibers.is_empty() {
        warn!(
            curves = curves.len(),
            "no fiber could be extracted; curves need at least 5 pixels of length"
        );
    }

    write_outputs(args, &raster, extractor.config().radius, curves.len(), &fibers)?;
    Ok(fibers)
}

fn write_outputs(
    args: &UnfoldArgs,
    raster: &Raster,
    radius: usize,
    n_curves: usize,
    fibers: &[UnfoldedFiber],
) -> Result<()> {
    let dir: &Path = &args.out;
    let unit = &raster.calibration().unit;

    for fiber in fibers {
        let written = export_fiber(dir, fiber, raster.depth(), unit)
            .with_context(|| format!("exporting {}", fiber.title()))?;
        info!(fiber = %fiber.title(), files = written.len(), "fiber exported");
    }

    let mut montage_summary = None;
    if !args.no_group && !fibers.is_empty() {
        let montage = group_fibers(fibers, args.layout(), 0.0).context("grouping fibers")?;
        let written = export_montage(dir, &montage, raster.depth())?;
        info!(
            width = montage.width(),
            height = montage.height(),
            files = written.len(),
            "montage exported"
        );
        montage_summary = Some(MontageSummary::from_montage(&montage));
    }

    let summary = RunSummary {
        input: args.input.display().to_string(),
        radius,
        pixel_spacing: raster.calibration().pixel_spacing,
        unit: unit.clone(),
        curves: n_curves,
        fibers: fibers.iter().map(FiberSummary::from_fiber).collect(),
        montage: montage_summary,
    };
    write_json(&dir.join("summary.json"), &summary)
}

#[cfg(test)]
mod tests {
    use super::{UnfoldArgs, run_unfold};
    use clap::Parser;
    use image::{GrayImage, Luma};
    use std::fs;
    use std::path::Path;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: UnfoldArgs,
    }

    fn args(input: &Path, curves: &Path, out: &Path, extra: &[&str]) -> UnfoldArgs {
        let mut argv = vec![
            "fiber_unfold".to_owned(),
            "--input".to_owned(),
            input.display().to_string(),
            "--curves".to_owned(),
            curves.display().to_string(),
            "--out".to_owned(),
            out.display().to_string(),
        ];
        argv.extend(extra.iter().map(|s| (*s).to_owned()));
        Harness::parse_from(argv).args
    }

    /// 64x24 image with a bright line on row 12 and a curves file with one
    /// horizontal curve on it plus one too-short curve.
    fn fixture(dir: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
        let img = GrayImage::from_fn(64, 24, |_, y| Luma([if y == 12 { 100 } else { 0 }]));
        let input = dir.join("line.png");
        img.save(&input).expect("save fixture");

        let curves = dir.join("curves.json");
        fs::write(
            &curves,
            r#"{ "curves": [
                { "points": [[5, 12], [54, 12]] },
                { "points": [[3, 3], [4, 3]] }
            ] }"#,
        )
        .expect("write curves");
        (input, curves)
    }

    #[test]
    fn unfold_writes_every_output() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (input, curves) = fixture(dir.path());
        let out = dir.path().join("out");
        fs::create_dir(&out).expect("mkdir");

        let a = args(
            &input,
            &curves,
            &out,
            &["--radius", "2", "--pixel-spacing", "0.5", "--unit", "um"],
        );
        let fibers = run_unfold(&a).expect("run");
        assert_eq!(fibers.len(), 1);
        assert_eq!(fibers[0].len(), 46);

        for name in [
            "fiber_1_c1.png",
            "profiles_1.csv",
            "profiles_1.png",
            "fibers_c1.png",
            "summary.json",
        ] {
            assert!(out.join(name).is_file(), "{name} missing");
        }

        let csv = fs::read_to_string(out.join("profiles_1.csv")).expect("csv");
        assert!(csv.starts_with("length_um,c1\n0,100\n0.5,100\n"), "{csv}");

        let montage = image::open(out.join("fibers_c1.png"))
            .expect("montage png")
            .into_luma8();
        assert_eq!(montage.dimensions(), (46 + 30, 5 + 10));
        assert_eq!(montage.get_pixel(25, 7).0, [100]);

        let summary: serde_json::Value =
            serde_json::from_slice(&fs::read(out.join("summary.json")).expect("summary"))
                .expect("valid json");
        assert_eq!(summary["curves"], 2);
        assert_eq!(summary["radius"], 2);
        assert_eq!(summary["unit"], "um");
        assert_eq!(summary["fibers"][0]["samples"], 46);
        assert_eq!(summary["montage"]["slots"][0]["label"], "#1");
        assert_eq!(
            summary["montage"]["slots"][0]["label_anchor"],
            serde_json::json!([0, 5 + 2 + 8])
        );
    }

    #[test]
    fn no_group_skips_the_montage() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (input, curves) = fixture(dir.path());

        let a = args(&input, &curves, dir.path(), &["--no-group"]);
        run_unfold(&a).expect("run");
        assert!(dir.path().join("profiles_1.csv").is_file());
        assert!(!dir.path().join("fibers_c1.png").exists());

        let summary: serde_json::Value =
            serde_json::from_slice(&fs::read(dir.path().join("summary.json")).expect("summary"))
                .expect("valid json");
        assert!(summary["montage"].is_null());
    }

    #[test]
    fn invalid_radius_and_missing_output_dir_are_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (input, curves) = fixture(dir.path());

        let a = args(&input, &curves, dir.path(), &["--radius", "0"]);
        let err = run_unfold(&a).expect_err("radius 0");
        assert!(format!("{err:#}").contains("radius"), "{err:#}");

        let a = args(&input, &curves, &dir.path().join("missing"), &[]);
        let err = run_unfold(&a).expect_err("missing dir");
        assert!(err.to_string().contains("does not exist"));
    }
}
