// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Encoded values - fixed-width, direction-aware bit fields packed into
//! per-edge [EdgeFlags] records.
//!
//! Every field is created by a [FlagsLayout], which validates its description
//! and assigns its position in the record. Once created, a field descriptor
//! is immutable and holds no reference to any record, so the same descriptor
//! may be used to read many records concurrently.
//!
//! ```
//! use turncost::ev::{FlagsLayout, IntSpec};
//!
//! let mut layout = FlagsLayout::default();
//! let lanes = layout.int(IntSpec::new("lanes", 3).with_two_directions()).unwrap();
//! let mut flags = layout.create_flags();
//!
//! lanes.set_int(false, &mut flags, 2).unwrap();
//! lanes.set_int(true, &mut flags, 1).unwrap();
//! assert_eq!(lanes.get_int(false, &flags), 2);
//! assert_eq!(lanes.get_int(true, &flags), 1);
//! assert!(lanes.set_int(false, &mut flags, 8).is_err());
//! ```

mod boolean;
mod decimal;
mod enums;
mod error;
mod flags;
mod int;
mod layout;
mod road_class;

pub use boolean::BooleanEncodedValue;
pub use decimal::{DecimalEncodedValue, DecimalSpec};
pub use enums::{bits_for, EncodedEnum, EnumEncodedValue};
pub use error::{ConfigError, OutOfRangeError};
pub use flags::EdgeFlags;
pub use int::{IntEncodedValue, IntSpec};
pub use layout::FlagsLayout;
pub use road_class::RoadClass;

/// Maximum width of a single field (of a single direction), in bits.
pub const MAX_BITS: u32 = 31;
