//! Example: unfold a synthetic curved fiber.
//!
//! Renders a two-channel image with a bright circular arc (channel 1) and a
//! dimmer, dashed copy of it (channel 2), traces the arc with a coarse
//! polyline and unfolds it. Column profiles are written to a JSON file and a
//! short summary is printed to stdout.
//!
//! Run from the workspace root:
//!   cargo run -p fiber-unfold --example unfold_synthetic -- --help
//!   cargo run -p fiber-unfold --example unfold_synthetic -- --radius 6

use std::f32::consts::PI;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use fiber_unfold::{Curve, FiberExtractor, Image, Point2f, Raster, UnfoldConfig};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(about = "Unfold a synthetic arc-shaped fiber and dump its profiles")]
struct Args {
    /// Image side length in pixels
    #[arg(long, default_value_t = 256)]
    size: usize,

    /// Arc radius in pixels
    #[arg(long, default_value_t = 80.0)]
    arc_radius: f32,

    /// Half-width of the unfolded ribbon
    #[arg(long, default_value_t = 4)]
    radius: i64,

    /// Number of vertices of the traced polyline
    #[arg(long, default_value_t = 12)]
    vertices: usize,

    /// Output JSON path
    #[arg(long, default_value = "unfold_synthetic.json")]
    out: String,
}

#[derive(Serialize)]
struct ProfileDto {
    channel: usize,
    length: Vec<f32>,
    max: Vec<f32>,
}

#[derive(Serialize)]
struct FiberResult {
    fiber: String,
    columns: usize,
    rows: usize,
    elapsed_ms: f64,
    profiles: Vec<ProfileDto>,
}

fn render_arc(size: usize, radius: f32) -> Result<Raster> {
    let c = size as f32 / 2.0;
    let mut solid = vec![0u8; size * size];
    let mut dashed = vec![0u8; size * size];

    for y in 0..size {
        for x in 0..size {
            let dx = x as f32 - c;
            let dy = y as f32 - c;
            let d = (dx.hypot(dy) - radius).abs();
            if d < 1.5 && dy <= 0.0 {
                solid[y * size + x] = 200;
                let a = dy.atan2(dx);
                if ((a * 20.0 / PI).floor() as i64) % 2 == 0 {
                    dashed[y * size + x] = 120;
                }
            }
        }
    }

    let solid = Image::from_vec(size, size, solid).context("building channel 1")?;
    let dashed = Image::from_vec(size, size, dashed).context("building channel 2")?;
    Raster::from_u8_channels(&[solid.as_view(), dashed.as_view()]).context("building raster")
}

fn trace_arc(size: usize, radius: f32, vertices: usize) -> Result<Curve> {
    let c = size as f32 / 2.0;
    let n = vertices.max(2);
    let points = (0..n)
        .map(|k| {
            let a = PI + PI * k as f32 / (n - 1) as f32;
            Point2f::new(c + radius * a.cos(), c + radius * a.sin())
        })
        .collect();
    Curve::new(points).context("tracing arc")
}

fn main() -> Result<()> {
    let args = Args::parse();

    let raster = render_arc(args.size, args.arc_radius)?;
    let curve = trace_arc(args.size, args.arc_radius, args.vertices)?;
    let cfg = UnfoldConfig::with_radius(args.radius).context("invalid radius")?;
    let extractor = FiberExtractor::new(cfg)?;

    println!(
        "raster {0}x{0}, {1} channels, curve of {2} vertices ({3:.1} px)",
        args.size,
        raster.channels().len(),
        curve.vertex_count(),
        curve.length()
    );

    let t0 = Instant::now();
    let fibers = extractor.extract(&raster, &[curve])?;
    let elapsed_ms = t0.elapsed().as_secs_f64() * 1e3;

    let results: Vec<FiberResult> = fibers
        .iter()
        .map(|f| {
            println!(
                "  {}: {} columns x {} rows ({elapsed_ms:.2} ms)",
                f.title(),
                f.len(),
                f.rows()
            );
            FiberResult {
                fiber: f.title(),
                columns: f.len(),
                rows: f.rows(),
                elapsed_ms,
                profiles: f
                    .profiles
                    .iter()
                    .enumerate()
                    .map(|(c, p)| ProfileDto {
                        channel: c + 1,
                        length: f.abscissa.clone(),
                        max: p.clone(),
                    })
                    .collect(),
            }
        })
        .collect();

    let out_file =
        std::fs::File::create(&args.out).with_context(|| format!("creating {}", args.out))?;
    serde_json::to_writer_pretty(out_file, &results)
        .with_context(|| format!("writing JSON to {}", args.out))?;

    println!("results written to {}", args.out);
    Ok(())
}
