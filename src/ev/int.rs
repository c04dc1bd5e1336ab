// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use super::flags::{EdgeFlags, Slot};
use super::OutOfRangeError;

/// Describes an integer [encoded value](crate::ev) before it is
/// registered in a [FlagsLayout](super::FlagsLayout).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntSpec<'a> {
    /// Unique name of the field.
    pub name: &'a str,

    /// Width of the field (of a single direction), between 1 and [MAX_BITS](super::MAX_BITS).
    pub bits: u32,

    /// Value represented by a stored zero. The field holds values from
    /// `min_value` up to `min_value + 2^bits - 1`.
    pub min_value: i32,

    /// Reading the field in the reverse direction returns the negated value.
    /// Requires `two_directions == false` and `min_value < 0`; the range
    /// is then limited to `min_value..=-min_value`.
    pub negate_reverse: bool,

    /// Store independent values for the forward and reverse direction.
    pub two_directions: bool,
}

impl<'a> IntSpec<'a> {
    /// Unsigned, single-direction integer field.
    pub const fn new(name: &'a str, bits: u32) -> Self {
        Self {
            name,
            bits,
            min_value: 0,
            negate_reverse: false,
            two_directions: false,
        }
    }

    /// Signed field which flips its sign when traversed backwards,
    /// e.g. a grade. With `bits == 5` the range is `-15..=15`.
    pub const fn signed(name: &'a str, bits: u32) -> Self {
        Self {
            name,
            bits,
            min_value: if bits >= 2 {
                -((1i32 << (bits - 1)) - 1)
            } else {
                0
            },
            negate_reverse: true,
            two_directions: false,
        }
    }

    pub const fn with_two_directions(mut self) -> Self {
        self.two_directions = true;
        self
    }

    pub const fn with_min_value(mut self, min_value: i32) -> Self {
        self.min_value = min_value;
        self
    }
}

/// Fixed-width integer field inside [EdgeFlags].
///
/// Created exclusively through [FlagsLayout::int](super::FlagsLayout::int),
/// which assigns its (never changing) position in the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntEncodedValue {
    name: String,
    bits: u32,
    min_value: i32,
    max_value: i32,
    negate_reverse: bool,
    forward: Slot,
    backward: Option<Slot>,
}

impl IntEncodedValue {
    pub(crate) fn new(
        spec: &IntSpec<'_>,
        max_value: i32,
        forward: Slot,
        backward: Option<Slot>,
    ) -> Self {
        Self {
            name: spec.name.to_string(),
            bits: spec.bits,
            min_value: spec.min_value,
            max_value,
            negate_reverse: spec.negate_reverse,
            forward,
            backward,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bits(&self) -> u32 {
        self.bits
    }

    pub fn min_int(&self) -> i32 {
        self.min_value
    }

    pub fn max_int(&self) -> i32 {
        self.max_value
    }

    pub fn is_two_directional(&self) -> bool {
        self.backward.is_some()
    }

    /// Stores `value` in the record. If the field is not two-directional,
    /// `reverse` only matters for [IntSpec::negate_reverse] fields.
    pub fn set_int(
        &self,
        reverse: bool,
        flags: &mut EdgeFlags,
        value: i32,
    ) -> Result<(), OutOfRangeError> {
        if value < self.min_value || value > self.max_value {
            return Err(OutOfRangeError {
                name: self.name.clone(),
                value: value as f64,
                min: self.min_value as f64,
                max: self.max_value as f64,
            });
        }

        let value = if self.negate_reverse && reverse {
            -value
        } else {
            value
        };

        self.write_raw(reverse, flags, (value as i64 - self.min_value as i64) as u32);
        Ok(())
    }

    pub fn get_int(&self, reverse: bool, flags: &EdgeFlags) -> i32 {
        let value = (self.read_raw(reverse, flags) as i64 + self.min_value as i64) as i32;
        if self.negate_reverse && reverse {
            -value
        } else {
            value
        }
    }

    #[inline]
    fn slot(&self, reverse: bool) -> &Slot {
        match (reverse, &self.backward) {
            (true, Some(backward)) => backward,
            _ => &self.forward,
        }
    }

    /// Raw (store-space) write, bypassing the range check.
    pub(crate) fn write_raw(&self, reverse: bool, flags: &mut EdgeFlags, raw: u32) {
        self.slot(reverse).write(flags, raw)
    }

    pub(crate) fn read_raw(&self, reverse: bool, flags: &EdgeFlags) -> u32 {
        self.slot(reverse).read(flags)
    }

    /// Largest value in store-space, `2^bits - 1`.
    pub(crate) fn raw_max(&self) -> u32 {
        self.forward.mask
    }
}
