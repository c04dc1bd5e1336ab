// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

/// Mean radius of Earth, in meters.
/// Source: https://en.wikipedia.org/wiki/Earth_radius#Arithmetic_mean_radius
const EARTH_RADIUS: f64 = 6_371_008.8;

/// Mean diameter of Earth, in meters.
/// Source: https://en.wikipedia.org/wiki/Earth_radius#Arithmetic_mean_radius
const EARTH_DIAMETER: f64 = EARTH_RADIUS + EARTH_RADIUS;

/// Calculates the great-circle distance between two lat-lon positions
/// on Earth using the `haversine formula <https://en.wikipedia.org/wiki/Haversine_formula>`_.
/// Returns the result in meters.
pub fn earth_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1 = lat1.to_radians();
    let lon1 = lon1.to_radians();
    let lat2 = lat2.to_radians();
    let lon2 = lon2.to_radians();

    let sin_dlat_half = ((lat2 - lat1) * 0.5).sin();
    let sin_dlon_half = ((lon2 - lon1) * 0.5).sin();

    let h = sin_dlat_half * sin_dlat_half + lat1.cos() * lat2.cos() * sin_dlon_half * sin_dlon_half;

    EARTH_DIAMETER * h.sqrt().asin()
}

/// Calculates the initial great-circle bearing (forward azimuth) when travelling
/// from the first to the second position. Returns degrees clockwise from north,
/// in the range `[0, 360)`.
pub fn azimuth(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1 = lat1.to_radians();
    let lat2 = lat2.to_radians();
    let dlon = (lon2 - lon1).to_radians();

    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();

    let deg = y.atan2(x).to_degrees();
    if deg < 0.0 {
        // -0.0 + 360 must not become 360
        (deg + 360.0) % 360.0
    } else {
        deg
    }
}

/// Brings an angle (in degrees) into the `(-180, 180]` range.
pub fn normalize_angle(deg: f64) -> f64 {
    let a = deg % 360.0;
    if a > 180.0 {
        a - 360.0
    } else if a <= -180.0 {
        a + 360.0
    } else {
        a
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! assert_almost_eq {
        ($a:expr, $b:expr, $eps:expr) => {
            assert!(
                (($a - $b).abs() < $eps),
                "assertion failed: {} ≈ {}",
                $a,
                $b
            )
        };
    }

    #[test]
    fn distance() {
        // One degree along a meridian and along the equator
        assert_almost_eq!(earth_distance(0.0, 0.0, 1.0, 0.0), 111_195.08, 0.01);
        assert_almost_eq!(earth_distance(0.0, 0.0, 0.0, 1.0), 111_195.08, 0.01);

        // Warsaw Centralna -> Warsaw Wschodnia
        assert_almost_eq!(earth_distance(52.2288, 21.0034, 52.2518, 21.0523), 4_198.5, 1.0);
        assert_eq!(earth_distance(10.0, 10.0, 10.0, 10.0), 0.0);
    }

    #[test]
    fn cardinal_azimuths() {
        assert_almost_eq!(azimuth(0.0, 0.0, 1.0, 0.0), 0.0, 1e-9);
        assert_almost_eq!(azimuth(0.0, 0.0, 0.0, 1.0), 90.0, 1e-9);
        assert_almost_eq!(azimuth(0.0, 0.0, -1.0, 0.0), 180.0, 1e-9);
        assert_almost_eq!(azimuth(0.0, 0.0, 0.0, -1.0), 270.0, 1e-9);
    }

    #[test]
    fn azimuth_is_spherical() {
        // Along the 60th parallel, the great circle leaves slightly north of east
        let a = azimuth(60.0, 0.0, 60.0, 10.0);
        assert!(a > 80.0 && a < 90.0, "{a}");

        // San Francisco, 18th St eastwards
        assert_almost_eq!(azimuth(37.76083, -122.43613, 37.7609, -122.43503), 85.4, 0.5);
    }

    #[test]
    fn normalization() {
        assert_eq!(normalize_angle(0.0), 0.0);
        assert_eq!(normalize_angle(180.0), 180.0);
        assert_eq!(normalize_angle(-180.0), 180.0);
        assert_eq!(normalize_angle(270.0), -90.0);
        assert_eq!(normalize_angle(-270.0), 90.0);
        assert_eq!(normalize_angle(540.0), 180.0);
        assert_eq!(normalize_angle(-10.0), -10.0);
        assert_eq!(normalize_angle(359.0), -1.0);
    }
}
