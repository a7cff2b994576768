//! Local normal field along a densified centerline.
//!
//! At each interior point a line is fitted by least squares through the
//! 5-point window centered on it. The normal of that line is defined only up
//! to sign, so consecutive normals are aligned greedily: a normal pointing
//! against its predecessor is negated.
//!
//! The greedy alignment is a heuristic. It keeps the field continuous along
//! smooth fibers but can still flip at cusps or near-180° turns, where the
//! local fit has no stable orientation.

use fu_core::{Point2f, Vec2f};

/// Number of points in the least-squares window.
pub const WINDOW: usize = 5;

const HALF_WINDOW: usize = WINDOW / 2;

/// Normal used when the window is vertical and the slope is undefined.
pub const FALLBACK_NORMAL: Vec2f = Vec2f::new(1.0, 0.0);

/// A centerline point with its unit normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalSample {
    /// Index of `point` in the densified sequence.
    pub index: usize,
    pub point: Point2f,
    pub normal: Vec2f,
}

/// Least-squares slope `dy/dx` of the line through `window`.
///
/// Computes `(nΣxy − ΣxΣy) / (nΣx² − (Σx)²)` on mean-centered coordinates,
/// which is the same quantity without cancellation at large coordinates.
/// Returns NaN when all x are equal.
pub fn window_slope(window: &[Point2f]) -> f64 {
    let n = window.len() as f64;
    let mx = window.iter().map(|p| f64::from(p.x)).sum::<f64>() / n;
    let my = window.iter().map(|p| f64::from(p.y)).sum::<f64>() / n;

    let (sxy, sxx) = window.iter().fold((0.0f64, 0.0f64), |(sxy, sxx), p| {
        let dx = f64::from(p.x) - mx;
        let dy = f64::from(p.y) - my;
        (sxy + dx * dy, sxx + dx * dx)
    });

    sxy / sxx
}

/// Unit normal `(-m, 1) / sqrt(1 + m²)` of a line with slope `m`, or
/// [`FALLBACK_NORMAL`] when the slope is not finite.
pub fn normal_from_slope(slope: f64) -> Vec2f {
    if !slope.is_finite() {
        return FALLBACK_NORMAL;
    }
    let h = slope.hypot(1.0);
    Vec2f::new((-slope / h) as f32, (1.0 / h) as f32)
}

/// Unoriented normal at interior index `i`, `None` when the 5-point window
/// centered on `i` does not fit inside `points`.
pub fn estimate_normal(points: &[Point2f], i: usize) -> Option<Vec2f> {
    if i < HALF_WINDOW || i + HALF_WINDOW >= points.len() {
        return None;
    }
    let window = &points[i - HALF_WINDOW..=i + HALF_WINDOW];
    Some(normal_from_slope(window_slope(window)))
}

/// Oriented normals at every interior point, in curve order.
///
/// Returns an empty vector for fewer than [`WINDOW`] points.
pub fn estimate_normals(points: &[Point2f]) -> Vec<NormalSample> {
    if points.len() < WINDOW {
        return Vec::new();
    }

    let mut out: Vec<NormalSample> = Vec::with_capacity(points.len() - 2 * HALF_WINDOW);
    for i in HALF_WINDOW..points.len() - HALF_WINDOW {
        let Some(mut normal) = estimate_normal(points, i) else {
            continue;
        };
        if let Some(prev) = out.last()
            && normal.dot(prev.normal) < 0.0
        {
            normal = -normal;
        }
        out.push(NormalSample {
            index: i,
            point: points[i],
            normal,
        });
    }
    out
}
