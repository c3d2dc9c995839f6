//! Compile-time unit safety for wind-site quantities.
//!
//! Keeps wind speeds, lengths, angles and power from being mixed up in the
//! field and siting code. Every wrapper is `#[repr(transparent)]` over `f64`.
//!
//! # Usage
//!
//! ```
//! use windsite_core::units::{Degrees, Meters, MetersPerSecond};
//!
//! let u = MetersPerSecond(10.0);
//! let slower = u - MetersPerSecond(1.5);
//! assert_eq!(slower.value(), 8.5);
//!
//! // This would NOT compile - different units
//! // let wrong = u + Meters(80.0);
//!
//! // Compass bearing to the mathematical wake-axis angle
//! let theta = Degrees(270.0).wake_axis_angle();
//! assert!(theta.value().abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Macro to implement common arithmetic operations for unit types
macro_rules! impl_unit_ops {
    ($type:ty, $unit_name:literal) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Neg for $type {
            type Output = Self;
            fn neg(self) -> Self::Output {
                Self(-self.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Mul<$type> for f64 {
            type Output = $type;
            fn mul(self, rhs: $type) -> Self::Output {
                <$type>::new(self * rhs.0)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl Div<$type> for $type {
            type Output = f64;
            fn div(self, rhs: $type) -> Self::Output {
                self.0 / rhs.0
            }
        }

        impl std::fmt::Display for $type {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{:.4} {}", self.0, $unit_name)
            }
        }

        impl $type {
            /// Create a new value
            #[inline]
            pub const fn new(value: f64) -> Self {
                Self(value)
            }

            /// Get the raw numeric value
            #[inline]
            pub const fn value(self) -> f64 {
                self.0
            }

            /// Check if value is finite
            #[inline]
            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }

            /// Minimum of two values
            #[inline]
            pub fn min(self, other: Self) -> Self {
                Self(self.0.min(other.0))
            }

            /// Maximum of two values
            #[inline]
            pub fn max(self, other: Self) -> Self {
                Self(self.0.max(other.0))
            }
        }

        impl std::iter::Sum for $type {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                Self(iter.map(|x| x.0).sum())
            }
        }
    };
}

/// Wind speed in meters per second (m/s)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct MetersPerSecond(pub f64);

impl_unit_ops!(MetersPerSecond, "m/s");

/// Length in meters (m)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Meters(pub f64);

impl_unit_ops!(Meters, "m");

/// Turbine electrical output in kilowatts (kW)
///
/// The unit of the power-curve table. Interference coefficients are absolute
/// losses in the same unit.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Kilowatts(pub f64);

impl_unit_ops!(Kilowatts, "kW");

/// Angle in radians, counter-clockwise from east
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Radians(pub f64);

impl_unit_ops!(Radians, "rad");

/// Compass bearing in degrees (0 = north, 90 = east), the direction the wind
/// blows *from*
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Degrees(pub f64);

impl_unit_ops!(Degrees, "deg");

impl Degrees {
    /// Wrap the bearing into `[0, 360)`.
    pub fn normalized(self) -> Self {
        let wrapped = self.0.rem_euclid(360.0);
        // rem_euclid can round up to exactly 360.0 for tiny negative inputs
        Self(if wrapped >= 360.0 { 0.0 } else { wrapped })
    }

    /// Angle of the downstream wake axis in the mathematical convention:
    /// `θ = radians(270 − wd)`.
    ///
    /// A westerly wind (`wd = 270`) flows toward +x, so `θ = 0`.
    pub fn wake_axis_angle(self) -> Radians {
        Radians((270.0 - self.0).to_radians())
    }
}

impl Radians {
    /// Sine and cosine of the angle, in that order
    #[inline]
    pub fn sin_cos(self) -> (f64, f64) {
        self.0.sin_cos()
    }
}
