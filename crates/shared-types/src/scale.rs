//! # Scalable Quantities
//!
//! Affine functions of the scale parameter `k`. Every size, shape and
//! repetition count that must stay symbolic until a concrete `k` is chosen is
//! expressed with these types.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

use crate::errors::ScaleError;
use crate::position::Shape2D;

/// `value(k) = slope * k + offset`.
///
/// Equality, ordering and hashing are structural on `(slope, offset)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LinearFunction {
    pub slope: i64,
    pub offset: i64,
}

impl LinearFunction {
    pub const fn new(slope: i64, offset: i64) -> Self {
        Self { slope, offset }
    }

    /// A function that does not depend on `k`.
    pub const fn constant(offset: i64) -> Self {
        Self { slope: 0, offset }
    }

    /// Evaluate the function for the given scale parameter.
    pub fn eval(&self, k: u32) -> i64 {
        self.slope * i64::from(k) + self.offset
    }

    pub fn is_constant(&self) -> bool {
        self.slope == 0
    }

    /// Exact integer division of both coefficients.
    ///
    /// Fails if `divisor` is not strictly positive or if either coefficient is
    /// not a multiple of it.
    pub fn divide_by(&self, divisor: i64) -> Result<Self, ScaleError> {
        if divisor <= 0 {
            return Err(ScaleError::NonPositiveDivisor { divisor });
        }
        if self.slope % divisor != 0 || self.offset % divisor != 0 {
            return Err(ScaleError::NotDivisible {
                function: self.to_string(),
                divisor,
            });
        }
        Ok(Self::new(self.slope / divisor, self.offset / divisor))
    }
}

impl fmt::Display for LinearFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.slope == 0 {
            return write!(f, "{}", self.offset);
        }
        match self.offset {
            0 => write!(f, "{}k", self.slope),
            o if o < 0 => write!(f, "{}k - {}", self.slope, -o),
            o => write!(f, "{}k + {}", self.slope, o),
        }
    }
}

impl Add for LinearFunction {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.slope + rhs.slope, self.offset + rhs.offset)
    }
}

impl Add<i64> for LinearFunction {
    type Output = Self;

    fn add(self, rhs: i64) -> Self {
        Self::new(self.slope, self.offset + rhs)
    }
}

impl Sub for LinearFunction {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.slope - rhs.slope, self.offset - rhs.offset)
    }
}

impl Sub<i64> for LinearFunction {
    type Output = Self;

    fn sub(self, rhs: i64) -> Self {
        Self::new(self.slope, self.offset - rhs)
    }
}

impl Mul<i64> for LinearFunction {
    type Output = Self;

    fn mul(self, rhs: i64) -> Self {
        Self::new(self.slope * rhs, self.offset * rhs)
    }
}

impl Mul<LinearFunction> for i64 {
    type Output = LinearFunction;

    fn mul(self, rhs: LinearFunction) -> LinearFunction {
        rhs * self
    }
}

impl Neg for LinearFunction {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.slope, -self.offset)
    }
}

impl Sum for LinearFunction {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, f| acc + f)
    }
}

impl<'a> Sum<&'a LinearFunction> for LinearFunction {
    fn sum<I: Iterator<Item = &'a LinearFunction>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, f| acc + *f)
    }
}

/// A pair of scalable quantities, one per spatial axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scalable2D {
    pub x: LinearFunction,
    pub y: LinearFunction,
}

impl Scalable2D {
    pub const fn new(x: LinearFunction, y: LinearFunction) -> Self {
        Self { x, y }
    }

    pub fn to_shape_2d(&self, k: u32) -> Shape2D {
        Shape2D::new(self.x.eval(k), self.y.eval(k))
    }
}

impl fmt::Display for Scalable2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Mul<i64> for Scalable2D {
    type Output = Self;

    fn mul(self, rhs: i64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Add<i64> for Scalable2D {
    type Output = Self;

    fn add(self, rhs: i64) -> Self {
        Self::new(self.x + rhs, self.y + rhs)
    }
}
