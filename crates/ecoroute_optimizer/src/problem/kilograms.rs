use std::{
    iter::Sum,
    ops::{Add, AddAssign},
};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Engine demand units per kilogram.
pub const SCALE_DEMAND: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize, Serialize, JsonSchema)]
pub struct Kilograms(f64);

impl Kilograms {
    pub const ZERO: Kilograms = Kilograms(0.0);

    pub fn new(value: f64) -> Self {
        Kilograms(value)
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Integral demand units, `round(kg * SCALE_DEMAND)`.
    pub fn to_units(&self) -> i64 {
        (self.0 * SCALE_DEMAND).round() as i64
    }

    pub fn from_units(units: i64) -> Self {
        Kilograms(units as f64 / SCALE_DEMAND)
    }
}

impl From<f64> for Kilograms {
    fn from(value: f64) -> Self {
        Kilograms::new(value)
    }
}

impl Add for Kilograms {
    type Output = Kilograms;

    fn add(self, other: Kilograms) -> Kilograms {
        Kilograms(self.0 + other.0)
    }
}

impl AddAssign for Kilograms {
    fn add_assign(&mut self, other: Kilograms) {
        self.0 += other.0;
    }
}

impl Sum for Kilograms {
    fn sum<I: Iterator<Item = Kilograms>>(iter: I) -> Kilograms {
        iter.fold(Kilograms::ZERO, |acc, x| acc + x)
    }
}
