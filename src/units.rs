//! Newtype wrappers for the physical quantities used in emission accounting.
//!
//! Wrapping raw `f64`s stops quantities of different dimensions being mixed up by accident.
//! Multiplying and dividing units produces the expected derived unit (e.g. energy multiplied by
//! intensity gives a mass).
use float_cmp::{ApproxEq, F64Margin};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, Sub};

/// Number of kWh in one MWh
pub const KWH_PER_MWH: f64 = 1000.0;

/// Number of grams in one kilogram
pub const GRAMS_PER_KILOGRAM: f64 = 1000.0;

/// Define a unit type wrapping an `f64`
macro_rules! unit_struct {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub f64);

        impl $name {
            /// Create a new value
            pub const fn new(value: f64) -> Self {
                Self(value)
            }

            /// Get the underlying `f64`
            pub const fn value(&self) -> f64 {
                self.0
            }

            /// Whether the value is neither infinite nor NaN
            pub fn is_finite(&self) -> bool {
                self.0.is_finite()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl Add for $name {
            type Output = $name;

            fn add(self, rhs: $name) -> $name {
                $name(self.0 + rhs.0)
            }
        }

        impl AddAssign for $name {
            fn add_assign(&mut self, rhs: $name) {
                self.0 += rhs.0;
            }
        }

        impl Sub for $name {
            type Output = $name;

            fn sub(self, rhs: $name) -> $name {
                $name(self.0 - rhs.0)
            }
        }

        impl Mul<Dimensionless> for $name {
            type Output = $name;

            fn mul(self, rhs: Dimensionless) -> $name {
                $name(self.0 * rhs.0)
            }
        }

        impl Div<Dimensionless> for $name {
            type Output = $name;

            fn div(self, rhs: Dimensionless) -> $name {
                $name(self.0 / rhs.0)
            }
        }

        impl Sum for $name {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                $name(iter.map(|x| x.0).sum())
            }
        }

        impl ApproxEq for $name {
            type Margin = F64Margin;

            fn approx_eq<T: Into<Self::Margin>>(self, other: Self, margin: T) -> bool {
                self.0.approx_eq(other.0, margin)
            }
        }
    };
}

/// Implement `Mul` in both directions, giving the specified output unit
macro_rules! impl_mul {
    ($lhs:ident, $rhs:ident, $out:ident) => {
        impl Mul<$rhs> for $lhs {
            type Output = $out;

            fn mul(self, rhs: $rhs) -> $out {
                $out(self.0 * rhs.0)
            }
        }

        impl Mul<$lhs> for $rhs {
            type Output = $out;

            fn mul(self, rhs: $lhs) -> $out {
                $out(self.0 * rhs.0)
            }
        }
    };
}

/// Implement `Div`, giving the specified output unit
macro_rules! impl_div {
    ($lhs:ident, $rhs:ident, $out:ident) => {
        impl Div<$rhs> for $lhs {
            type Output = $out;

            fn div(self, rhs: $rhs) -> $out {
                $out(self.0 / rhs.0)
            }
        }
    };
}

// NB: Dimensionless is defined by hand as the macro refers to it
/// A quantity without units (e.g. a share of production)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dimensionless(pub f64);

impl Dimensionless {
    /// Create a new value
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    /// Get the underlying `f64`
    pub const fn value(&self) -> f64 {
        self.0
    }

    /// Whether the value is neither infinite nor NaN
    pub fn is_finite(&self) -> bool {
        self.0.is_finite()
    }
}

impl fmt::Display for Dimensionless {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Add for Dimensionless {
    type Output = Dimensionless;

    fn add(self, rhs: Dimensionless) -> Dimensionless {
        Dimensionless(self.0 + rhs.0)
    }
}

impl AddAssign for Dimensionless {
    fn add_assign(&mut self, rhs: Dimensionless) {
        self.0 += rhs.0;
    }
}

impl Sub for Dimensionless {
    type Output = Dimensionless;

    fn sub(self, rhs: Dimensionless) -> Dimensionless {
        Dimensionless(self.0 - rhs.0)
    }
}

impl Mul for Dimensionless {
    type Output = Dimensionless;

    fn mul(self, rhs: Dimensionless) -> Dimensionless {
        Dimensionless(self.0 * rhs.0)
    }
}

impl Div for Dimensionless {
    type Output = Dimensionless;

    fn div(self, rhs: Dimensionless) -> Dimensionless {
        Dimensionless(self.0 / rhs.0)
    }
}

impl Sum for Dimensionless {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Dimensionless(iter.map(|x| x.0).sum())
    }
}

impl ApproxEq for Dimensionless {
    type Margin = F64Margin;

    fn approx_eq<T: Into<Self::Margin>>(self, other: Self, margin: T) -> bool {
        self.0.approx_eq(other.0, margin)
    }
}

unit_struct!(
    /// Electrical power in MW
    Megawatts
);
unit_struct!(
    /// Energy in MWh
    MegawattHours
);
unit_struct!(
    /// Energy in kWh
    KilowattHours
);
unit_struct!(
    /// Emission intensity in g CO2(-equivalent) per kWh
    GramsPerKilowattHour
);
unit_struct!(
    /// Mass of CO2(-equivalent) in grams
    Grams
);
unit_struct!(
    /// Mass of CO2(-equivalent) in kilograms
    Kilograms
);

impl_mul!(KilowattHours, GramsPerKilowattHour, Grams);
impl_div!(Grams, KilowattHours, GramsPerKilowattHour);

impl MegawattHours {
    /// Convert to kWh
    pub fn to_kilowatt_hours(self) -> KilowattHours {
        KilowattHours(self.0 * KWH_PER_MWH)
    }
}

impl Grams {
    /// Convert to kg
    pub fn to_kilograms(self) -> Kilograms {
        Kilograms(self.0 / GRAMS_PER_KILOGRAM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn energy_times_intensity_is_mass() {
        let mass = KilowattHours(2.0) * GramsPerKilowattHour(150.0);
        assert_eq!(mass, Grams(300.0));
        assert_eq!(GramsPerKilowattHour(150.0) * KilowattHours(2.0), mass);
    }

    #[test]
    fn mass_over_energy_is_intensity() {
        assert_eq!(
            Grams(300.0) / KilowattHours(2.0),
            GramsPerKilowattHour(150.0)
        );
    }

    #[test]
    fn conversions() {
        assert_eq!(MegawattHours(1.5).to_kilowatt_hours(), KilowattHours(1500.0));
        assert_eq!(Grams(2500.0).to_kilograms(), Kilograms(2.5));
    }

    #[test]
    fn scale_by_dimensionless() {
        assert_approx_eq!(
            GramsPerKilowattHour,
            GramsPerKilowattHour(100.0) / Dimensionless(0.8),
            GramsPerKilowattHour(125.0)
        );
        assert_eq!(
            KilowattHours(10.0) * Dimensionless(0.5),
            KilowattHours(5.0)
        );
    }

    #[test]
    fn sum_units() {
        let total: Kilograms = [Kilograms(1.0), Kilograms(2.5)].into_iter().sum();
        assert_eq!(total, Kilograms(3.5));
    }
}
