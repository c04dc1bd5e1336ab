// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

/// Opaque, fixed-size record of machine words holding packed
/// [encoded values](crate::ev) of a single edge (or turn).
///
/// The record doesn't know which fields live inside it - interpretation is
/// entirely up to the [FlagsLayout](super::FlagsLayout) which created it.
/// Reading a record with descriptors from a different layout silently
/// returns garbage.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EdgeFlags(Box<[u32]>);

impl EdgeFlags {
    /// Creates a zeroed record with the provided amount of words.
    pub fn new(words: usize) -> Self {
        Self(vec![0; words].into_boxed_slice())
    }

    /// Wraps raw words, e.g. after reading them back from persistent storage.
    pub fn from_words(words: Vec<u32>) -> Self {
        Self(words.into_boxed_slice())
    }

    pub fn words(&self) -> &[u32] {
        &self.0
    }

    /// Returns true if no bit is set in the record.
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&w| w == 0)
    }
}

/// Position of one independently-addressable bit range inside [EdgeFlags].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Slot {
    pub(crate) word: usize,
    pub(crate) shift: u32,
    pub(crate) mask: u32,
}

impl Slot {
    pub(crate) fn new(word: usize, shift: u32, bits: u32) -> Self {
        debug_assert!(bits > 0 && bits < 32);
        debug_assert!(shift + bits <= 32);
        Self {
            word,
            shift,
            mask: (1u32 << bits) - 1,
        }
    }

    #[inline]
    pub(crate) fn read(&self, flags: &EdgeFlags) -> u32 {
        (flags.0[self.word] >> self.shift) & self.mask
    }

    #[inline]
    pub(crate) fn write(&self, flags: &mut EdgeFlags, value: u32) {
        debug_assert!(value <= self.mask);
        let w = &mut flags.0[self.word];
        *w = (*w & !(self.mask << self.shift)) | ((value & self.mask) << self.shift);
    }
}
