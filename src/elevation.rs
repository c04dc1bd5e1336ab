// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::ev::{ConfigError, EdgeFlags, FlagsLayout, IntEncodedValue, IntSpec, OutOfRangeError};
use crate::{earth_distance, Point};

/// Source of terrain heights, e.g. a decoded set of elevation raster tiles.
pub trait ElevationProvider: Sync {
    /// Returns the height (in meters above sea level) at the given position,
    /// or `None` if no data covers it.
    fn height(&self, lat: f64, lon: f64) -> Option<f64>;
}

/// [ElevationProvider] without any data.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NoElevation;

impl ElevationProvider for NoElevation {
    fn height(&self, _lat: f64, _lon: f64) -> Option<f64> {
        None
    }
}

impl<F: Fn(f64, f64) -> Option<f64> + Sync> ElevationProvider for F {
    fn height(&self, lat: f64, lon: f64) -> Option<f64> {
        self(lat, lon)
    }
}

/// Fills the elevation of every point of a geometry.
pub fn add_elevation<E: ElevationProvider + ?Sized>(provider: &E, geometry: &mut [Point]) {
    for p in geometry.iter_mut() {
        p.ele = provider.height(p.lat, p.lon);
    }
}

/// Average grade of an edge in whole percent, stored as a signed
/// field which flips its sign in the reverse direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slope(IntEncodedValue);

impl Slope {
    pub const KEY: &'static str = "average_slope";

    pub fn register(layout: &mut FlagsLayout) -> Result<Self, ConfigError> {
        layout.int(IntSpec::signed(Self::KEY, 5)).map(Self)
    }

    /// Computes the average grade from the first and last point of the geometry
    /// and stores it in `flags`, clamped to the field's range.
    ///
    /// Geometries without elevation at both ends, or without length, get a zero grade
    /// (a zeroed record would otherwise decode to the field's minimum) and `false`
    /// is returned.
    pub fn encode(
        &self,
        geometry: &[Point],
        flags: &mut EdgeFlags,
    ) -> Result<bool, OutOfRangeError> {
        let grade = Self::average_grade(geometry);
        let clamped = grade
            .unwrap_or(0.0)
            .clamp(self.0.min_int() as f64, self.0.max_int() as f64) as i32;
        self.0.set_int(false, flags, clamped)?;
        Ok(grade.is_some())
    }

    fn average_grade(geometry: &[Point]) -> Option<f64> {
        let start_ele = geometry.first()?.ele?;
        let end_ele = geometry.last()?.ele?;

        let length: f64 = geometry
            .windows(2)
            .map(|pair| earth_distance(pair[0].lat, pair[0].lon, pair[1].lat, pair[1].lon))
            .sum();

        if length < 1.0 {
            None
        } else {
            Some((100.0 * (end_ele - start_ele) / length).round())
        }
    }

    /// Returns the grade (in percent) in the given direction of travel.
    pub fn get(&self, reverse: bool, flags: &EdgeFlags) -> i32 {
        self.0.get_int(reverse, flags)
    }
}
