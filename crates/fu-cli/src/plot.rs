//! Line plots of fiber profiles: length along the fiber on x, intensity on
//! y, one color per channel.

use std::path::Path;

use anyhow::{Context, Result};
use fiber_unfold::UnfoldedFiber;
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;

pub const PLOT_WIDTH: u32 = 400;
pub const PLOT_HEIGHT: u32 = 240;
const MARGIN: f32 = 30.0;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const AXIS: Rgb<u8> = Rgb([0, 0, 0]);
const CHANNEL_COLORS: [Rgb<u8>; 4] = [
    Rgb([220, 30, 30]),
    Rgb([30, 160, 30]),
    Rgb([30, 60, 220]),
    Rgb([200, 120, 0]),
];

pub fn channel_color(c: usize) -> Rgb<u8> {
    CHANNEL_COLORS[c % CHANNEL_COLORS.len()]
}

/// Renders every profile of `fiber` on shared axes. Non-finite values break
/// the line; a flat profile is drawn at mid-height.
pub fn render_profile_plot(fiber: &UnfoldedFiber) -> RgbImage {
    let mut img = RgbImage::from_pixel(PLOT_WIDTH, PLOT_HEIGHT, BACKGROUND);
    let (left, top) = (MARGIN, MARGIN);
    let right = PLOT_WIDTH as f32 - MARGIN;
    let bottom = PLOT_HEIGHT as f32 - MARGIN;

    draw_line_segment_mut(&mut img, (left, top), (left, bottom), AXIS);
    draw_line_segment_mut(&mut img, (left, bottom), (right, bottom), AXIS);

    let Some((lo, hi)) = finite_range(fiber.profiles.iter().flatten().copied()) else {
        return img;
    };
    let (a0, a1) = finite_range(fiber.abscissa.iter().copied()).unwrap_or((0.0, 0.0));

    let px = |a: f32| {
        if a1 > a0 {
            left + (a - a0) / (a1 - a0) * (right - left)
        } else {
            left
        }
    };
    let py = |v: f32| {
        if hi > lo {
            bottom - (v - lo) / (hi - lo) * (bottom - top)
        } else {
            (top + bottom) / 2.0
        }
    };

    for (c, profile) in fiber.profiles.iter().enumerate() {
        let color = channel_color(c);
        let points: Vec<Option<(f32, f32)>> = fiber
            .abscissa
            .iter()
            .zip(profile)
            .map(|(&a, &v)| (a.is_finite() && v.is_finite()).then(|| (px(a), py(v))))
            .collect();
        for w in points.windows(2) {
            if let (Some(p), Some(q)) = (w[0], w[1]) {
                draw_line_segment_mut(&mut img, p, q, color);
            }
        }
    }
    img
}

pub fn save_profile_plot(path: &Path, fiber: &UnfoldedFiber) -> Result<()> {
    render_profile_plot(fiber)
        .save(path)
        .with_context(|| format!("saving profile plot {}", path.display()))
}

fn finite_range(values: impl Iterator<Item = f32>) -> Option<(f32, f32)> {
    values
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

#[cfg(test)]
mod tests {
    use super::{PLOT_HEIGHT, PLOT_WIDTH, channel_color, render_profile_plot};
    use fiber_unfold::{Image, NormalSample, Point2f, UnfoldedFiber, Vec2f};
    use image::Rgb;

    fn fiber(profiles: Vec<Vec<f32>>) -> UnfoldedFiber {
        let len = profiles[0].len();
        UnfoldedFiber {
            curve_index: 0,
            samples: (0..len)
                .map(|i| NormalSample {
                    index: i + 2,
                    point: Point2f::new(i as f32, 0.0),
                    normal: Vec2f::new(0.0, 1.0),
                })
                .collect(),
            ribbons: profiles.iter().map(|_| Image::new_fill(len, 3, 0.0)).collect(),
            profiles,
            abscissa: (0..len).map(|x| x as f32 * 0.5).collect(),
        }
    }

    #[test]
    fn flat_profile_is_drawn_at_mid_height() {
        let img = render_profile_plot(&fiber(vec![vec![7.0; 3]]));

        assert_eq!(img.dimensions(), (PLOT_WIDTH, PLOT_HEIGHT));
        assert_eq!(*img.get_pixel(200, 120), channel_color(0));
        assert_eq!(*img.get_pixel(30, 60), Rgb([0, 0, 0]));
        assert_eq!(*img.get_pixel(200, 210), Rgb([0, 0, 0]));
        assert_eq!(*img.get_pixel(5, 5), Rgb([255, 255, 255]));
    }

    #[test]
    fn channels_span_the_shared_value_range() {
        // Channel 1 sits at the minimum, channel 2 at the maximum.
        let img = render_profile_plot(&fiber(vec![vec![0.0; 5], vec![10.0; 5]]));

        assert_eq!(*img.get_pixel(200, 210), channel_color(0));
        assert_eq!(*img.get_pixel(200, 30), channel_color(1));
    }

    #[test]
    fn non_finite_profiles_leave_only_the_axes() {
        let img = render_profile_plot(&fiber(vec![vec![f32::NAN; 4]]));
        assert!(img.pixels().all(|p| *p != channel_color(0)));
    }
}
