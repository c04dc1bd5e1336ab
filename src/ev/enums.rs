// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::marker::PhantomData;

use super::flags::EdgeFlags;
use super::{IntEncodedValue, OutOfRangeError};

/// Closed, ordered set of constants which can be stored in an [EnumEncodedValue].
///
/// Implementations are expected to be field-less enums, with [EncodedEnum::VALUES]
/// listing every variant in declaration order, and [EncodedEnum::ordinal] returning
/// the index of a variant in [EncodedEnum::VALUES] (usually `self as usize`).
pub trait EncodedEnum: Copy + PartialEq + std::fmt::Debug + 'static {
    const VALUES: &'static [Self];

    fn ordinal(self) -> usize;
}

/// Returns the minimum amount of bits required to store `count` distinct values
/// (`ceil(log2(count))`, but at least 1).
pub fn bits_for(count: usize) -> u32 {
    if count <= 2 {
        1
    } else {
        usize::BITS - (count - 1).leading_zeros()
    }
}

/// Field inside [EdgeFlags] storing the ordinal of an [EncodedEnum] constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumEncodedValue<E: EncodedEnum> {
    int: IntEncodedValue,
    _marker: PhantomData<fn() -> E>,
}

impl<E: EncodedEnum> EnumEncodedValue<E> {
    pub(crate) fn new(int: IntEncodedValue) -> Self {
        Self {
            int,
            _marker: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        self.int.name()
    }

    pub fn bits(&self) -> u32 {
        self.int.bits()
    }

    pub fn values(&self) -> &'static [E] {
        E::VALUES
    }

    pub fn set_enum(
        &self,
        reverse: bool,
        flags: &mut EdgeFlags,
        value: E,
    ) -> Result<(), OutOfRangeError> {
        self.int.set_int(reverse, flags, value.ordinal() as i32)
    }

    /// Reads a constant from the record. Ordinals without a corresponding constant
    /// (only possible in fields wider than necessary) decode to the first constant.
    pub fn get_enum(&self, reverse: bool, flags: &EdgeFlags) -> E {
        let ordinal = self.int.get_int(reverse, flags) as usize;
        E::VALUES.get(ordinal).copied().unwrap_or(E::VALUES[0])
    }
}

#[cfg(test)]
mod tests {
    use super::super::{ConfigError, FlagsLayout};
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Surface {
        Paved,
        Gravel,
        Dirt,
        Sand,
        Grass,
    }

    impl EncodedEnum for Surface {
        const VALUES: &'static [Self] = &[
            Self::Paved,
            Self::Gravel,
            Self::Dirt,
            Self::Sand,
            Self::Grass,
        ];

        fn ordinal(self) -> usize {
            self as usize
        }
    }

    #[test]
    fn bits_for_counts() {
        assert_eq!(bits_for(1), 1);
        assert_eq!(bits_for(2), 1);
        assert_eq!(bits_for(3), 2);
        assert_eq!(bits_for(4), 2);
        assert_eq!(bits_for(5), 3);
        assert_eq!(bits_for(8), 3);
        assert_eq!(bits_for(9), 4);
        assert_eq!(bits_for(256), 8);
    }

    #[test]
    fn every_constant_round_trips() {
        let mut layout = FlagsLayout::default();
        let ev = layout.enumeration::<Surface>("surface", true).unwrap();
        let mut flags = layout.create_flags();
        assert_eq!(ev.bits(), 3);

        for &v in Surface::VALUES {
            ev.set_enum(false, &mut flags, v).unwrap();
            ev.set_enum(true, &mut flags, Surface::Grass).unwrap();
            assert_eq!(ev.get_enum(false, &flags), v);
            assert_eq!(ev.get_enum(true, &flags), Surface::Grass);
        }

        ev.set_enum(true, &mut flags, Surface::Paved).unwrap();
        assert_eq!(ev.get_enum(true, &flags), Surface::Paved);
        assert_eq!(ev.get_enum(false, &flags), Surface::Grass);
    }

    #[test]
    fn default_record_decodes_to_first_constant() {
        let mut layout = FlagsLayout::default();
        let ev = layout.enumeration::<Surface>("surface", false).unwrap();
        assert_eq!(ev.get_enum(false, &layout.create_flags()), Surface::Paved);
    }

    #[test]
    fn explicit_width() {
        let mut layout = FlagsLayout::default();
        let ev = layout
            .enumeration_with_bits::<Surface>("surface", 5, false)
            .unwrap();
        assert_eq!(ev.bits(), 5);

        assert_eq!(
            layout.enumeration_with_bits::<Surface>("too_narrow", 2, false),
            Err(ConfigError::EnumTooNarrow {
                name: "too_narrow".to_string(),
                bits: 2,
                count: 5,
                needed: 3,
            }),
        );
    }
}
