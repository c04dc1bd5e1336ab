// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use super::MAX_BITS;

/// Errors which can occur when describing [encoded values](crate::ev) or
/// validating configuration objects.
///
/// All of these are construction-time errors - they should abort the setup
/// of a graph, as nothing sensible can be encoded with an invalid layout.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0}: field width must be at least 1 bit")]
    ZeroWidth(String),

    #[error("{name}: field width {bits} exceeds the maximum of {MAX_BITS} bits")]
    TooWide { name: String, bits: u32 },

    #[error("{name}: {bits} bits can't hold {count} enum constants (at least {needed} bits needed)")]
    EnumTooNarrow {
        name: String,
        bits: u32,
        count: usize,
        needed: u32,
    },

    #[error("{0}: enum has no constants")]
    EmptyEnum(String),

    #[error("{0}: field is already registered")]
    DuplicateName(String),

    #[error("{name}: invalid range: {reason}")]
    InvalidRange { name: String, reason: &'static str },

    #[error("{name}: factor must be finite and positive, got {factor}")]
    InvalidFactor { name: String, factor: f64 },

    #[error("invalid turn cost configuration: {0}")]
    TurnCosts(&'static str),

    #[error("invalid junction cost configuration: {0}")]
    JunctionCosts(&'static str),
}

/// A value can't be stored in an encoded value, as it falls outside
/// of the field's storable range.
///
/// This is a contract violation of the caller - values must be validated
/// (or clamped, see [DecimalEncodedValue::clamp](super::DecimalEncodedValue::clamp))
/// against the field's domain before writing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{name}: value {value} outside of the storable range {min}..={max}")]
pub struct OutOfRangeError {
    pub name: String,
    pub value: f64,
    pub min: f64,
    pub max: f64,
}
