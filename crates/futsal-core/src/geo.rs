//! Great-circle distance on a spherical Earth.

use crate::types::Coordinate;

/// Mean Earth radius used for every distance in the workspace.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two points in kilometers.
#[must_use]
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding can push h a hair above 1.0 for antipodal points.
    let c = 2.0 * h.sqrt().min(1.0).asin();
    EARTH_RADIUS_KM * c
}

/// Inclusive radius check: a point exactly `radius_km` away is inside.
#[must_use]
pub fn within_radius(center: Coordinate, point: Coordinate, radius_km: f64) -> bool {
    haversine_km(center, point) <= radius_km
}

#[cfg(test)]
mod tests {
    use super::*;

    const JAMSIL: Coordinate = Coordinate {
        latitude: 37.5133,
        longitude: 127.1001,
    };
    const GANGNAM: Coordinate = Coordinate {
        latitude: 37.4979,
        longitude: 127.0276,
    };

    #[test]
    fn distance_to_self_is_zero() {
        assert!(haversine_km(JAMSIL, JAMSIL).abs() < 1e-9);
    }

    #[test]
    fn distance_is_symmetric() {
        let ab = haversine_km(JAMSIL, GANGNAM);
        let ba = haversine_km(GANGNAM, JAMSIL);
        assert!((ab - ba).abs() < 1e-9, "ab={ab} ba={ba}");
    }

    #[test]
    fn jamsil_to_gangnam_is_about_six_and_a_half_km() {
        let d = haversine_km(JAMSIL, GANGNAM);
        assert!(d > 6.0 && d < 7.0, "got {d}");
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let d = haversine_km(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 0.0));
        assert!((d - 111.19).abs() < 0.01, "got {d}");
    }

    #[test]
    fn distance_grows_along_a_fixed_bearing() {
        let origin = Coordinate::new(37.5, 127.0);
        let mut previous = 0.0;
        for step in 1..=20 {
            let point = Coordinate::new(37.5 + f64::from(step) * 0.05, 127.0 + f64::from(step) * 0.05);
            let d = haversine_km(origin, point);
            assert!(d > previous, "step {step}: {d} <= {previous}");
            previous = d;
        }
    }

    #[test]
    fn antipodal_points_are_half_the_circumference() {
        let d = haversine_km(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 180.0));
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn radius_boundary_is_inclusive() {
        let limit = haversine_km(JAMSIL, GANGNAM);
        assert!(within_radius(JAMSIL, GANGNAM, limit));
        assert!(!within_radius(JAMSIL, GANGNAM, limit - 0.01));
    }
}
