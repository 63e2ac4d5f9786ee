use std::ops::{Add, Mul, Sub};

use serde::Serialize;

/// Immutable 2D coordinate. Arithmetic always yields a new value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Vector2D {
    pub x: f64,
    pub y: f64,
}

impl Vector2D {
    pub const ZERO: Vector2D = Vector2D { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Vector2D) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl Add for Vector2D {
    type Output = Vector2D;

    fn add(self, rhs: Vector2D) -> Vector2D {
        Vector2D::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector2D {
    type Output = Vector2D;

    fn sub(self, rhs: Vector2D) -> Vector2D {
        Vector2D::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vector2D {
    type Output = Vector2D;

    fn mul(self, rhs: f64) -> Vector2D {
        Vector2D::new(self.x * rhs, self.y * rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic_leaves_operands_untouched() {
        let a = Vector2D::new(1.0, 2.0);
        let b = Vector2D::new(3.0, -4.0);
        assert_eq!(a + b, Vector2D::new(4.0, -2.0));
        assert_eq!(b - a, Vector2D::new(2.0, -6.0));
        assert_eq!(a * 2.0, Vector2D::new(2.0, 4.0));
        assert_eq!(a, Vector2D::new(1.0, 2.0));
    }

    #[test]
    fn distance_is_euclidean_and_symmetric() {
        let a = Vector2D::new(0.0, 0.0);
        let b = Vector2D::new(3.0, 4.0);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(b.distance(a), 5.0);
        assert_eq!(a.distance(a), 0.0);
    }
}
