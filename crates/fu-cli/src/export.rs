use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use fiber_unfold::{BitDepth, Image, Montage, MontageSlot, UnfoldedFiber};
use image::{GrayImage, ImageBuffer, Luma};
use serde::Serialize;

use crate::plot::save_profile_plot;

#[derive(Debug, Serialize)]
pub struct FiberSummary {
    /// 1-based fiber number, as used in file names and labels.
    pub fiber: usize,
    pub curve_index: usize,
    pub samples: usize,
    pub profile_max: Vec<f32>,
}

#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub input: String,
    pub radius: usize,
    pub pixel_spacing: f32,
    pub unit: String,
    pub curves: usize,
    pub fibers: Vec<FiberSummary>,
    /// Present when the grouped output was written.
    pub montage: Option<MontageSummary>,
}

/// Layout of the `fibers_c{c}.png` images, for drawing or reading labels.
#[derive(Debug, Serialize)]
pub struct MontageSummary {
    pub width: usize,
    pub height: usize,
    pub slots: Vec<SlotSummary>,
}

#[derive(Debug, Serialize)]
pub struct SlotSummary {
    pub fiber: usize,
    pub curve_index: usize,
    pub label: String,
    pub x0: usize,
    pub y0: usize,
    pub label_anchor: [usize; 2],
}

impl MontageSummary {
    pub fn from_montage(montage: &Montage) -> Self {
        Self {
            width: montage.width(),
            height: montage.height(),
            slots: montage.slots.iter().map(SlotSummary::from_slot).collect(),
        }
    }
}

impl SlotSummary {
    fn from_slot(slot: &MontageSlot) -> Self {
        Self {
            fiber: slot.curve_index + 1,
            curve_index: slot.curve_index,
            label: slot.label.clone(),
            x0: slot.x0,
            y0: slot.y0,
            label_anchor: [slot.label_anchor.0, slot.label_anchor.1],
        }
    }
}

impl FiberSummary {
    pub fn from_fiber(fiber: &UnfoldedFiber) -> Self {
        Self {
            fiber: fiber.curve_index + 1,
            curve_index: fiber.curve_index,
            samples: fiber.len(),
            profile_max: fiber
                .profiles
                .iter()
                .map(|p| p.iter().copied().fold(f32::NEG_INFINITY, f32::max))
                .collect(),
        }
    }
}

/// The output path must already exist and be a directory.
pub fn ensure_output_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("output directory does not exist: {}", path.display());
    }
    if !path.is_dir() {
        bail!("output path is not a directory: {}", path.display());
    }
    Ok(())
}

/// Writes ribbons, the profile table and the profile plot of one fiber,
/// returns the files written.
pub fn export_fiber(
    dir: &Path,
    fiber: &UnfoldedFiber,
    depth: BitDepth,
    unit: &str,
) -> Result<Vec<PathBuf>> {
    let n = fiber.curve_index + 1;
    let mut written = Vec::with_capacity(fiber.channel_count() + 2);

    for (c, ribbon) in fiber.ribbons.iter().enumerate() {
        let path = dir.join(format!("fiber_{n}_c{}.png", c + 1));
        save_channel(&path, ribbon, depth)?;
        written.push(path);
    }

    let path = dir.join(format!("profiles_{n}.csv"));
    write_profiles_csv(&path, fiber, unit)?;
    written.push(path);

    let path = dir.join(format!("profiles_{n}.png"));
    save_profile_plot(&path, fiber)?;
    written.push(path);

    Ok(written)
}

/// Writes one `fibers_c{c}.png` per montage channel.
pub fn export_montage(dir: &Path, montage: &Montage, depth: BitDepth) -> Result<Vec<PathBuf>> {
    montage
        .channels
        .iter()
        .enumerate()
        .map(|(c, img)| {
            let path = dir.join(format!("fibers_c{}.png", c + 1));
            save_channel(&path, img, depth)?;
            Ok(path)
        })
        .collect()
}

/// Columns `length_<unit>, c1, c2, ...`, one row per ribbon column.
pub fn write_profiles_csv(path: &Path, fiber: &UnfoldedFiber, unit: &str) -> Result<()> {
    let file = fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut out = BufWriter::new(file);

    write!(out, "length_{unit}").context("writing csv header")?;
    for c in 1..=fiber.channel_count() {
        write!(out, ",c{c}").context("writing csv header")?;
    }
    writeln!(out).context("writing csv header")?;

    for (x, len) in fiber.abscissa.iter().enumerate() {
        write!(out, "{len}").context("writing csv row")?;
        for profile in &fiber.profiles {
            write!(out, ",{}", profile[x]).context("writing csv row")?;
        }
        writeln!(out).context("writing csv row")?;
    }
    out.flush()
        .with_context(|| format!("flushing {}", path.display()))
}

pub fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value).context("serializing json")?;
    fs::write(path, bytes).with_context(|| format!("writing json {}", path.display()))
}

/// Saves a single channel at its source depth: 8-bit and 16-bit gray as is,
/// float data min/max scaled to 8 bits.
pub fn save_channel(path: &Path, img: &Image<f32>, depth: BitDepth) -> Result<()> {
    let (w, h) = (img.width() as u32, img.height() as u32);
    match depth {
        BitDepth::U8 => {
            let data = img
                .data()
                .iter()
                .map(|&v| v.round().clamp(0.0, 255.0) as u8)
                .collect();
            save_gray8(path, w, h, data)
        }
        BitDepth::U16 => {
            let data: Vec<u16> = img
                .data()
                .iter()
                .map(|&v| v.round().clamp(0.0, 65535.0) as u16)
                .collect();
            let gray: ImageBuffer<Luma<u16>, Vec<u16>> = ImageBuffer::from_raw(w, h, data)
                .context("constructing 16-bit image from raw samples")?;
            gray.save(path)
                .with_context(|| format!("saving image {}", path.display()))
        }
        BitDepth::F32 => save_gray8(path, w, h, f32_to_u8_vis(img.data())),
    }
}

fn save_gray8(path: &Path, width: u32, height: u32, data: Vec<u8>) -> Result<()> {
    let gray = GrayImage::from_raw(width, height, data)
        .context("constructing GrayImage from raw bytes")?;
    gray.save(path)
        .with_context(|| format!("saving image {}", path.display()))
}

fn f32_to_u8_vis(data: &[f32]) -> Vec<u8> {
    if data.is_empty() {
        return Vec::new();
    }

    let (min_v, max_v) = data
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

    if (max_v - min_v).abs() < 1e-12 {
        return vec![0u8; data.len()];
    }

    let scale = 255.0 / (max_v - min_v);
    data.iter()
        .map(|&v| ((v - min_v) * scale).round().clamp(0.0, 255.0) as u8)
        .collect()
}
