// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use super::flags::EdgeFlags;
use super::{IntEncodedValue, OutOfRangeError};

/// Describes a quantized decimal [encoded value](crate::ev) before it is
/// registered in a [FlagsLayout](super::FlagsLayout).
///
/// A stored integer `v` represents the real value `min_value + v / factor`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecimalSpec<'a> {
    pub name: &'a str,
    pub bits: u32,
    pub min_value: f64,

    /// Amount of store units per one real unit. Must be finite and positive.
    pub factor: f64,

    /// Reserve the largest store value for [f64::INFINITY].
    pub use_maximum_as_infinity: bool,

    pub two_directions: bool,
}

impl<'a> DecimalSpec<'a> {
    pub const fn new(name: &'a str, bits: u32, factor: f64) -> Self {
        Self {
            name,
            bits,
            min_value: 0.0,
            factor,
            use_maximum_as_infinity: false,
            two_directions: false,
        }
    }

    pub const fn with_two_directions(mut self) -> Self {
        self.two_directions = true;
        self
    }

    pub const fn with_infinity(mut self) -> Self {
        self.use_maximum_as_infinity = true;
        self
    }
}

/// Fixed-width, quantized decimal field inside [EdgeFlags].
#[derive(Debug, Clone, PartialEq)]
pub struct DecimalEncodedValue {
    int: IntEncodedValue,
    min_value: f64,
    factor: f64,
    use_maximum_as_infinity: bool,
}

impl DecimalEncodedValue {
    pub(crate) fn new(int: IntEncodedValue, spec: &DecimalSpec<'_>) -> Self {
        Self {
            int,
            min_value: spec.min_value,
            factor: spec.factor,
            use_maximum_as_infinity: spec.use_maximum_as_infinity,
        }
    }

    pub fn name(&self) -> &str {
        self.int.name()
    }

    pub fn bits(&self) -> u32 {
        self.int.bits()
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    pub fn min_value(&self) -> f64 {
        self.min_value
    }

    pub fn is_two_directional(&self) -> bool {
        self.int.is_two_directional()
    }

    /// Largest store value which represents a finite number.
    fn max_finite_raw(&self) -> u32 {
        if self.use_maximum_as_infinity {
            self.int.raw_max() - 1
        } else {
            self.int.raw_max()
        }
    }

    /// The largest finite value which can be stored in this field.
    pub fn max_storable_value(&self) -> f64 {
        self.min_value + self.max_finite_raw() as f64 / self.factor
    }

    /// Brings `value` into the storable range of this field:
    /// values above [max_storable_value](Self::max_storable_value) become the maximum
    /// (or stay infinite if the field can represent infinity),
    /// values below the minimum (and NaN) become the minimum.
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            self.min_value
        } else if value == f64::INFINITY && self.use_maximum_as_infinity {
            f64::INFINITY
        } else {
            value.min(self.max_storable_value()).max(self.min_value)
        }
    }

    pub fn set_decimal(
        &self,
        reverse: bool,
        flags: &mut EdgeFlags,
        value: f64,
    ) -> Result<(), OutOfRangeError> {
        if value == f64::INFINITY && self.use_maximum_as_infinity {
            self.int.write_raw(reverse, flags, self.int.raw_max());
            return Ok(());
        }

        let raw = ((value - self.min_value) * self.factor).round();
        if !(raw >= 0.0 && raw <= self.max_finite_raw() as f64) {
            return Err(OutOfRangeError {
                name: self.name().to_string(),
                value,
                min: self.min_value,
                max: self.max_storable_value(),
            });
        }

        self.int.write_raw(reverse, flags, raw as u32);
        Ok(())
    }

    pub fn get_decimal(&self, reverse: bool, flags: &EdgeFlags) -> f64 {
        let raw = self.int.read_raw(reverse, flags);
        if self.use_maximum_as_infinity && raw == self.int.raw_max() {
            f64::INFINITY
        } else {
            self.min_value + raw as f64 / self.factor
        }
    }
}
