use core::ops::{Add, Mul, Neg, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point2f {
    pub x: f32,
    pub y: f32,
}

impl Point2f {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Self) -> f32 {
        (other - self).norm()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2f {
    pub x: f32,
    pub y: f32,
}

impl Vec2f {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn dot(self, rhs: Self) -> f32 {
        self.x * rhs.x + self.y * rhs.y
    }

    pub fn norm(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction; the zero vector maps to itself.
    pub fn normalize(self) -> Self {
        let n = self.norm();
        if n == 0.0 { Self::default() } else { self * (1.0 / n) }
    }
}

impl Add<Vec2f> for Point2f {
    type Output = Point2f;

    fn add(self, rhs: Vec2f) -> Self::Output {
        Point2f::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub<Point2f> for Point2f {
    type Output = Vec2f;

    fn sub(self, rhs: Point2f) -> Self::Output {
        Vec2f::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Vec2f {
    type Output = Vec2f;

    fn neg(self) -> Self::Output {
        Vec2f::new(-self.x, -self.y)
    }
}

impl Mul<f32> for Vec2f {
    type Output = Vec2f;

    fn mul(self, rhs: f32) -> Self::Output {
        Vec2f::new(self.x * rhs, self.y * rhs)
    }
}

impl Mul<Vec2f> for f32 {
    type Output = Vec2f;

    fn mul(self, rhs: Vec2f) -> Self::Output {
        rhs * self
    }
}

#[cfg(test)]
mod tests {
    use super::{Point2f, Vec2f};

    #[test]
    fn dot_norm_and_negation() {
        let v = Vec2f::new(3.0, -4.0);

        assert_eq!(v.dot(Vec2f::new(4.0, 3.0)), 0.0);
        assert_eq!(v.norm(), 5.0);
        assert_eq!(-v, Vec2f::new(-3.0, 4.0));
    }

    #[test]
    fn normalize_handles_zero_vector() {
        let n = Vec2f::new(0.0, 2.5).normalize();
        assert_eq!(n, Vec2f::new(0.0, 1.0));
        assert_eq!(Vec2f::default().normalize(), Vec2f::default());
    }

    #[test]
    fn point_offsets_and_distance() {
        let a = Point2f::new(1.0, 1.0);
        let b = Point2f::new(4.0, 5.0);

        assert!((a.distance(b) - 5.0).abs() < 1e-6);
        assert_eq!(a + (b - a), b);
        assert_eq!(b - a, Vec2f::new(3.0, 4.0));
        assert_eq!(a + 2.0 * Vec2f::new(0.5, -1.0), Point2f::new(2.0, -1.0));
    }
}
