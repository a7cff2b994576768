use fu_core::{Error, Point2f};

/// Default spacing, in pixels, between consecutive densified points.
pub const DEFAULT_INTERVAL: f32 = 1.0;

// Curves shorter than this are treated as a single point.
const MIN_LENGTH: f64 = 1e-6;

/// Upper bound on the number of densified points per curve. Curves that
/// would exceed it collapse to their first vertex like a degenerate curve.
pub const MAX_DENSE_POINTS: usize = 1 << 24;

/// User-drawn fiber centerline: a straight line, a polyline or a freehand
/// path given by its vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    points: Vec<Point2f>,
}

impl Curve {
    pub fn new(points: Vec<Point2f>) -> Result<Self, Error> {
        if points.is_empty() {
            return Err(Error::EmptyCurve);
        }
        if let Some(index) = points
            .iter()
            .position(|p| !(p.x.is_finite() && p.y.is_finite()))
        {
            return Err(Error::NonFiniteVertex { index });
        }
        Ok(Self { points })
    }

    pub fn from_xy(xy: &[[f32; 2]]) -> Result<Self, Error> {
        Self::new(xy.iter().map(|&[x, y]| Point2f::new(x, y)).collect())
    }

    /// Straight segment between two points.
    pub fn line(a: Point2f, b: Point2f) -> Self {
        Self { points: vec![a, b] }
    }

    pub fn points(&self) -> &[Point2f] {
        &self.points
    }

    pub fn vertex_count(&self) -> usize {
        self.points.len()
    }

    /// Total arc length of the polyline.
    pub fn length(&self) -> f32 {
        self.points
            .windows(2)
            .map(|w| segment_length(w[0], w[1]))
            .sum::<f64>() as f32
    }
}

/// Densifies `curve` at [`DEFAULT_INTERVAL`].
pub fn densify(curve: &Curve) -> Vec<Point2f> {
    resample_arc_length(curve.points(), f64::from(DEFAULT_INTERVAL))
}

/// Resamples `curve` at approximately `interval` units of arc length.
///
/// The step is adjusted to `L / round(L / interval)` so that the first and
/// last points are the curve endpoints. A single-vertex or zero-length curve
/// yields its first vertex only, and so does a curve whose length is not
/// finite or would need more than [`MAX_DENSE_POINTS`] points.
pub fn densify_with_interval(curve: &Curve, interval: f32) -> Result<Vec<Point2f>, Error> {
    if !(interval.is_finite() && interval > 0.0) {
        return Err(Error::InvalidInterval(interval));
    }
    Ok(resample_arc_length(curve.points(), f64::from(interval)))
}

fn resample_arc_length(pts: &[Point2f], interval: f64) -> Vec<Point2f> {
    let total: f64 = pts.windows(2).map(|w| segment_length(w[0], w[1])).sum();
    let steps = (total / interval).round();
    if pts.len() < 2
        || total.is_nan()
        || total < MIN_LENGTH
        || steps >= MAX_DENSE_POINTS as f64
    {
        return pts.first().copied().into_iter().collect();
    }

    let n = (steps as usize).max(1);
    let step = total / n as f64;

    let mut out = Vec::with_capacity(n + 1);
    out.push(pts[0]);

    let mut seg = 0usize;
    let mut seg_start = 0.0f64;
    for k in 1..n {
        let s = k as f64 * step;
        while seg + 2 < pts.len() && s > seg_start + segment_length(pts[seg], pts[seg + 1]) {
            seg_start += segment_length(pts[seg], pts[seg + 1]);
            seg += 1;
        }
        out.push(point_along(pts[seg], pts[seg + 1], s - seg_start));
    }

    out.push(pts[pts.len() - 1]);
    out
}

fn segment_length(a: Point2f, b: Point2f) -> f64 {
    let dx = f64::from(b.x) - f64::from(a.x);
    let dy = f64::from(b.y) - f64::from(a.y);
    dx.hypot(dy)
}

// Point at arc length `d` from `a` towards `b`; the direction is normalized
// per component so axis-aligned segments land on exact coordinates.
fn point_along(a: Point2f, b: Point2f, d: f64) -> Point2f {
    let len = segment_length(a, b);
    if len <= 0.0 {
        return a;
    }
    let d = d.clamp(0.0, len);
    let ux = (f64::from(b.x) - f64::from(a.x)) / len;
    let uy = (f64::from(b.y) - f64::from(a.y)) / len;
    Point2f::new(
        (f64::from(a.x) + ux * d) as f32,
        (f64::from(a.y) + uy * d) as f32,
    )
}
