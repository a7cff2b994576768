//! Grouped layout: every unfolded fiber of a run stacked into one image per
//! channel, with room on the left for a `#n` label.

use fu_core::{Error, Image};

use crate::pipeline::UnfoldedFiber;

/// Spacing of the grouped output, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MontageLayout {
    /// Horizontal margin on both sides of the ribbons.
    pub margin: usize,
    /// Extra space left of the ribbons reserved for labels.
    pub label_space: usize,
    /// Vertical space above and below each ribbon.
    pub fiber_space: usize,
}

impl Default for MontageLayout {
    fn default() -> Self {
        Self {
            margin: 5,
            label_space: 20,
            fiber_space: 5,
        }
    }
}

/// Where one fiber landed in the montage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MontageSlot {
    pub curve_index: usize,
    /// Top-left corner of the ribbon.
    pub x0: usize,
    pub y0: usize,
    /// Baseline position for the label text.
    pub label_anchor: (usize, usize),
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Montage {
    /// One image per channel.
    pub channels: Vec<Image<f32>>,
    pub slots: Vec<MontageSlot>,
}

impl Montage {
    pub fn width(&self) -> usize {
        self.channels.first().map_or(0, Image::width)
    }

    pub fn height(&self) -> usize {
        self.channels.first().map_or(0, Image::height)
    }
}

/// Stacks `fibers` top to bottom on a `background`-filled canvas.
///
/// All fibers must share the same ribbon height and channel count. An empty
/// input gives an empty montage.
pub fn group_fibers(
    fibers: &[UnfoldedFiber],
    layout: MontageLayout,
    background: f32,
) -> Result<Montage, Error> {
    let Some(first) = fibers.first() else {
        return Ok(Montage {
            channels: Vec::new(),
            slots: Vec::new(),
        });
    };

    let rows = first.rows();
    let n_channels = first.channel_count();
    for fiber in fibers {
        if fiber.rows() != rows {
            return Err(Error::SizeMismatch {
                expected: rows,
                actual: fiber.rows(),
            });
        }
        if fiber.channel_count() != n_channels {
            return Err(Error::SizeMismatch {
                expected: n_channels,
                actual: fiber.channel_count(),
            });
        }
    }

    let radius = rows / 2;
    let max_len = fibers.iter().map(UnfoldedFiber::len).max().unwrap_or(0);
    let pitch = rows + 2 * layout.fiber_space;
    let width = max_len + 2 * layout.margin + layout.label_space;
    let height = fibers.len() * pitch;
    let x0 = layout.margin + layout.label_space;

    let mut channels = vec![Image::new_fill(width, height, background); n_channels];
    let mut slots = Vec::with_capacity(fibers.len());

    for (i, fiber) in fibers.iter().enumerate() {
        let y0 = i * pitch + layout.fiber_space;
        for (canvas, ribbon) in channels.iter_mut().zip(&fiber.ribbons) {
            canvas.paste(&ribbon.as_view(), x0, y0)?;
        }
        slots.push(MontageSlot {
            curve_index: fiber.curve_index,
            x0,
            y0,
            label_anchor: (0, y0 + radius + 8),
            label: format!("#{}", fiber.curve_index + 1),
        });
    }

    Ok(Montage { channels, slots })
}
