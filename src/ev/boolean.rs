// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use super::flags::EdgeFlags;
use super::IntEncodedValue;

/// Single-bit field inside [EdgeFlags].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BooleanEncodedValue(IntEncodedValue);

impl BooleanEncodedValue {
    pub(crate) fn new(int: IntEncodedValue) -> Self {
        debug_assert_eq!(int.bits(), 1);
        Self(int)
    }

    pub fn name(&self) -> &str {
        self.0.name()
    }

    pub fn is_two_directional(&self) -> bool {
        self.0.is_two_directional()
    }

    pub fn set_bool(&self, reverse: bool, flags: &mut EdgeFlags, value: bool) {
        self.0.write_raw(reverse, flags, value as u32)
    }

    pub fn get_bool(&self, reverse: bool, flags: &EdgeFlags) -> bool {
        self.0.read_raw(reverse, flags) == 1
    }
}

#[cfg(test)]
mod tests {
    use super::super::FlagsLayout;

    #[test]
    fn round_trip() {
        let mut layout = FlagsLayout::default();
        let shared = layout.boolean("roundabout", false).unwrap();
        let access = layout.boolean("access", true).unwrap();
        let mut flags = layout.create_flags();

        assert!(!shared.get_bool(false, &flags));
        shared.set_bool(true, &mut flags, true);
        assert!(shared.get_bool(false, &flags));
        assert!(shared.get_bool(true, &flags));

        access.set_bool(false, &mut flags, true);
        assert!(access.get_bool(false, &flags));
        assert!(!access.get_bool(true, &flags));
        access.set_bool(true, &mut flags, true);
        access.set_bool(false, &mut flags, false);
        assert!(!access.get_bool(false, &flags));
        assert!(access.get_bool(true, &flags));
        assert!(shared.get_bool(false, &flags));
    }
}
