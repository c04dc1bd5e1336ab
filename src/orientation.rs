// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::ev::{
    BooleanEncodedValue, ConfigError, DecimalEncodedValue, DecimalSpec, EdgeFlags, FlagsLayout,
    OutOfRangeError,
};
use crate::{azimuth, Point};

/// Width of the bearing field, per direction.
pub const ORIENTATION_BITS: u32 = 9;

/// Store units per degree - 512 steps over the full circle, ≈0.7° resolution.
const FACTOR: f64 = (1u32 << ORIENTATION_BITS) as f64 / 360.0;

/// Per-edge, per-direction bearing, stored in [EdgeFlags].
///
/// The bearing of a direction is the heading (degrees clockwise from north)
/// with which that direction *arrives* at its final node:
/// - forward (`reverse == false`): the bearing of the last geometry segment,
///   arriving at the edge's adjacent node;
/// - reverse (`reverse == true`): the bearing of the first geometry segment
///   travelled backwards, arriving at the edge's base node.
///
/// The heading with which a direction *leaves* its starting node is thus the bearing
/// of the opposite direction, rotated by 180°.
///
/// A zeroed record means "no orientation known" - a separate flag marks
/// directions with an encoded bearing, as 0° is a perfectly valid heading.
#[derive(Debug, Clone, PartialEq)]
pub struct Orientation {
    bearing: DecimalEncodedValue,
    known: BooleanEncodedValue,
}

impl Orientation {
    pub const KEY: &'static str = "orientation";

    /// Registers the orientation fields in a layout.
    pub fn register(layout: &mut FlagsLayout) -> Result<Self, ConfigError> {
        let bearing = layout
            .decimal(DecimalSpec::new(Self::KEY, ORIENTATION_BITS, FACTOR).with_two_directions())?;
        let known = layout.boolean("orientation_known", true)?;
        Ok(Self { bearing, known })
    }

    /// Derives both bearings from an edge geometry (ordered from the base to the adjacent node)
    /// and stores them in `flags`.
    ///
    /// Geometries without at least two distinct points don't have a bearing;
    /// in that case the record is left untouched and `false` is returned.
    pub fn encode(
        &self,
        geometry: &[Point],
        flags: &mut EdgeFlags,
    ) -> Result<bool, OutOfRangeError> {
        let last = geometry
            .windows(2)
            .rev()
            .find(|pair| !pair[0].same_position(&pair[1]));
        let first = geometry
            .windows(2)
            .find(|pair| !pair[0].same_position(&pair[1]));

        let (last, first) = match (last, first) {
            (Some(last), Some(first)) => (last, first),
            _ => {
                log::debug!(
                    "geometry with {} point(s) has no distinct segment - orientation unknown",
                    geometry.len()
                );
                return Ok(false);
            }
        };

        let forward = azimuth(last[0].lat, last[0].lon, last[1].lat, last[1].lon);
        let backward = azimuth(first[1].lat, first[1].lon, first[0].lat, first[0].lon);

        self.set(false, flags, forward)?;
        self.set(true, flags, backward)?;
        Ok(true)
    }

    fn set(
        &self,
        reverse: bool,
        flags: &mut EdgeFlags,
        bearing: f64,
    ) -> Result<(), OutOfRangeError> {
        // Bearings just below 360° quantize to the full circle - store them as north
        let bearing = if (bearing * FACTOR).round() >= (1u32 << ORIENTATION_BITS) as f64 {
            0.0
        } else {
            bearing
        };

        self.bearing.set_decimal(reverse, flags, bearing)?;
        self.known.set_bool(reverse, flags, true);
        Ok(())
    }

    /// Returns the stored bearing (in degrees, `[0, 360)`) of the given direction,
    /// or `None` if the bearing is unknown.
    pub fn get(&self, reverse: bool, flags: &EdgeFlags) -> Option<f64> {
        if self.known.get_bool(reverse, flags) {
            Some(self.bearing.get_decimal(reverse, flags))
        } else {
            None
        }
    }

    /// Angular resolution of the stored bearings, in degrees.
    pub fn resolution(&self) -> f64 {
        1.0 / FACTOR
    }
}
