use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

/// 2D vector used for positions, velocities and directions.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vector2D {
    pub x: f64,
    pub y: f64,
}

impl Vector2D {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };
    pub const UNIT_X: Self = Self { x: 1.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns `true` if both components are numerically zero.
    #[inline]
    pub fn is_zero(self) -> bool {
        self.length_sq() < f64::MIN_POSITIVE
    }

    #[inline]
    pub fn length(self) -> f64 {
        self.length_sq().sqrt()
    }

    #[inline]
    pub fn length_sq(self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    #[inline]
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// z component of the 3D cross product.
    #[inline]
    pub fn cross(self, other: Self) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// +1 if `other` lies counter-clockwise of `self`, -1 otherwise.
    #[inline]
    pub fn turn_sign(self, other: Self) -> f64 {
        if self.cross(other) >= 0.0 { 1.0 } else { -1.0 }
    }

    /// Vector perpendicular to this one (rotated a quarter turn counter-clockwise).
    #[inline]
    pub fn perp(self) -> Self {
        Self::new(-self.y, self.x)
    }

    /// Unit vector in the same direction, or zero for a zero vector.
    pub fn normalized(self) -> Self {
        let length = self.length();
        if length > f64::EPSILON {
            self / length
        } else {
            Self::ZERO
        }
    }

    /// Caps the length of the vector at `max`.
    pub fn truncated(self, max: f64) -> Self {
        if self.length() > max {
            self.normalized() * max
        } else {
            self
        }
    }

    /// Rotates the vector by `angle` radians (counter-clockwise positive).
    pub fn rotated(self, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    #[inline]
    pub fn distance(self, other: Self) -> f64 {
        (other - self).length()
    }

    #[inline]
    pub fn distance_sq(self, other: Self) -> f64 {
        (other - self).length_sq()
    }
}

impl Add for Vector2D {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vector2D {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vector2D {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vector2D {
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f64> for Vector2D {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl MulAssign<f64> for Vector2D {
    fn mul_assign(&mut self, rhs: f64) {
        self.x *= rhs;
        self.y *= rhs;
    }
}

impl Div<f64> for Vector2D {
    type Output = Self;
    fn div(self, rhs: f64) -> Self {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Vector2D {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl fmt::Display for Vector2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_caps_length() {
        let v = Vector2D::new(3.0, 4.0).truncated(2.5);
        assert!((v.length() - 2.5).abs() < 1e-12);
        assert_eq!(Vector2D::new(1.0, 0.0).truncated(2.0), Vector2D::new(1.0, 0.0));
    }

    #[test]
    fn normalizing_zero_stays_zero() {
        assert_eq!(Vector2D::ZERO.normalized(), Vector2D::ZERO);
    }

    #[test]
    fn turn_sign_follows_counter_clockwise_convention() {
        let facing = Vector2D::UNIT_X;
        assert_eq!(facing.turn_sign(Vector2D::new(0.0, 1.0)), 1.0);
        assert_eq!(facing.turn_sign(Vector2D::new(0.0, -1.0)), -1.0);
    }

    #[test]
    fn perp_is_orthogonal() {
        let v = Vector2D::new(2.0, 5.0);
        assert_eq!(v.dot(v.perp()), 0.0);
    }
}
