// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::HashSet;

use super::enums::bits_for;
use super::flags::{EdgeFlags, Slot};
use super::{
    BooleanEncodedValue, ConfigError, DecimalEncodedValue, DecimalSpec, EncodedEnum,
    EnumEncodedValue, IntEncodedValue, IntSpec, MAX_BITS,
};

/// Assigns bit positions to [encoded values](crate::ev) inside [EdgeFlags].
///
/// The layout is the single registration point of all fields of a record:
/// every field is validated and gets its offset exactly once, when it is created.
/// Fields are packed in registration order and never straddle a word boundary.
#[derive(Debug, Default, Clone)]
pub struct FlagsLayout {
    names: HashSet<String>,
    next_word: usize,
    next_shift: u32,
}

impl FlagsLayout {
    /// Number of words in records created by this layout.
    pub fn words(&self) -> usize {
        if self.next_shift == 0 {
            self.next_word
        } else {
            self.next_word + 1
        }
    }

    /// Total number of bits allocated by all fields, including padding
    /// at word boundaries.
    pub fn used_bits(&self) -> usize {
        self.next_word * 32 + self.next_shift as usize
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Creates a zeroed record with space for all fields registered so far.
    pub fn create_flags(&self) -> EdgeFlags {
        EdgeFlags::new(self.words())
    }

    pub fn int(&mut self, spec: IntSpec<'_>) -> Result<IntEncodedValue, ConfigError> {
        let max_value = Self::validate_int(&spec)?;
        self.register(spec.name)?;
        Ok(self.allocate_int(&spec, max_value))
    }

    pub fn decimal(&mut self, spec: DecimalSpec<'_>) -> Result<DecimalEncodedValue, ConfigError> {
        if !spec.factor.is_finite() || spec.factor <= 0.0 {
            return Err(ConfigError::InvalidFactor {
                name: spec.name.to_string(),
                factor: spec.factor,
            });
        }
        if !spec.min_value.is_finite() {
            return Err(ConfigError::InvalidRange {
                name: spec.name.to_string(),
                reason: "minimum value must be finite",
            });
        }
        if spec.use_maximum_as_infinity && spec.bits == 1 {
            return Err(ConfigError::InvalidRange {
                name: spec.name.to_string(),
                reason: "a 1-bit field can't reserve its maximum for infinity",
            });
        }

        let int_spec = IntSpec {
            name: spec.name,
            bits: spec.bits,
            min_value: 0,
            negate_reverse: false,
            two_directions: spec.two_directions,
        };
        let max_value = Self::validate_int(&int_spec)?;
        self.register(spec.name)?;
        let int = self.allocate_int(&int_spec, max_value);
        Ok(DecimalEncodedValue::new(int, &spec))
    }

    pub fn boolean(
        &mut self,
        name: &str,
        two_directions: bool,
    ) -> Result<BooleanEncodedValue, ConfigError> {
        let spec = IntSpec {
            two_directions,
            ..IntSpec::new(name, 1)
        };
        self.int(spec).map(BooleanEncodedValue::new)
    }

    /// Registers an enum field with the smallest possible width.
    pub fn enumeration<E: EncodedEnum>(
        &mut self,
        name: &str,
        two_directions: bool,
    ) -> Result<EnumEncodedValue<E>, ConfigError> {
        self.enumeration_with_bits(name, bits_for(E::VALUES.len()), two_directions)
    }

    /// Registers an enum field with an explicit width, which must be able to hold
    /// the ordinals of all constants.
    pub fn enumeration_with_bits<E: EncodedEnum>(
        &mut self,
        name: &str,
        bits: u32,
        two_directions: bool,
    ) -> Result<EnumEncodedValue<E>, ConfigError> {
        let count = E::VALUES.len();
        if count == 0 {
            return Err(ConfigError::EmptyEnum(name.to_string()));
        }

        let needed = bits_for(count);
        if bits != 0 && bits < needed {
            return Err(ConfigError::EnumTooNarrow {
                name: name.to_string(),
                bits,
                count,
                needed,
            });
        }

        let spec = IntSpec {
            two_directions,
            ..IntSpec::new(name, bits)
        };
        self.int(spec).map(EnumEncodedValue::new)
    }

    /// Checks the descriptor and returns the largest storable value.
    fn validate_int(spec: &IntSpec<'_>) -> Result<i32, ConfigError> {
        if spec.bits == 0 {
            return Err(ConfigError::ZeroWidth(spec.name.to_string()));
        }
        if spec.bits > MAX_BITS {
            return Err(ConfigError::TooWide {
                name: spec.name.to_string(),
                bits: spec.bits,
            });
        }

        let max_value = spec.min_value as i64 + ((1i64 << spec.bits) - 1);
        if max_value > i32::MAX as i64 {
            return Err(ConfigError::InvalidRange {
                name: spec.name.to_string(),
                reason: "maximum value overflows a 32-bit integer",
            });
        }

        if !spec.negate_reverse {
            return Ok(max_value as i32);
        }

        if spec.two_directions {
            return Err(ConfigError::InvalidRange {
                name: spec.name.to_string(),
                reason: "negate_reverse can't be combined with two directions",
            });
        }
        if spec.min_value >= 0 || -(spec.min_value as i64) > max_value {
            return Err(ConfigError::InvalidRange {
                name: spec.name.to_string(),
                reason: "negate_reverse requires a range symmetric around zero",
            });
        }
        Ok(-spec.min_value)
    }

    fn register(&mut self, name: &str) -> Result<(), ConfigError> {
        if !self.names.insert(name.to_string()) {
            return Err(ConfigError::DuplicateName(name.to_string()));
        }
        Ok(())
    }

    fn allocate_int(&mut self, spec: &IntSpec<'_>, max_value: i32) -> IntEncodedValue {
        let forward = self.allocate(spec.bits);
        let backward = if spec.two_directions {
            Some(self.allocate(spec.bits))
        } else {
            None
        };
        IntEncodedValue::new(spec, max_value, forward, backward)
    }

    fn allocate(&mut self, bits: u32) -> Slot {
        debug_assert!(bits > 0 && bits <= MAX_BITS);
        if self.next_shift + bits > 32 {
            self.next_word += 1;
            self.next_shift = 0;
        }

        let slot = Slot::new(self.next_word, self.next_shift, bits);
        self.next_shift += bits;
        if self.next_shift == 32 {
            self.next_word += 1;
            self.next_shift = 0;
        }
        slot
    }
}
