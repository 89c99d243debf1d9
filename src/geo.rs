//! Great-circle distance helpers.

use crate::coord::RoundedCoord;

const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Compute haversine distance between two points in meters.
pub fn haversine_distance(lat1_deg: f64, lon1_deg: f64, lat2_deg: f64, lon2_deg: f64) -> f64 {
    let lat1 = lat1_deg.to_radians();
    let lat2 = lat2_deg.to_radians();
    let delta_lat = (lat2_deg - lat1_deg).to_radians();
    let delta_lon = (lon2_deg - lon1_deg).to_radians();

    let a =
        (delta_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// Length of a candidate edge in meters: the sum of consecutive great-circle
/// distances across `start, pillars…, end`. Raw value; degenerate and NaN
/// handling happens in edge assembly.
pub fn way_length(start: RoundedCoord, pillars: &[RoundedCoord], end: RoundedCoord) -> f64 {
    let mut distance = 0.0;
    let mut previous = start;
    for &pillar in pillars {
        distance += haversine_distance(previous.lat(), previous.lon(), pillar.lat(), pillar.lon());
        previous = pillar;
    }
    distance + haversine_distance(previous.lat(), previous.lon(), end.lat(), end.lon())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_equator_degree() {
        // One degree of longitude at the equator is ~111.2 km.
        let d = haversine_distance(0.0, 0.0, 0.0, 1.0);
        assert!((d - 111_195.0).abs() < 100.0, "got {d}");
    }

    #[test]
    fn test_haversine_zero_for_same_point() {
        let d = haversine_distance(10.5, 106.7, 10.5, 106.7);
        assert_eq!(d, 0.0);
    }

    #[test]
    fn test_way_length_sums_pillars() {
        let start = RoundedCoord::new(0.0, 0.0);
        let mid = RoundedCoord::new(0.0, 0.5);
        let end = RoundedCoord::new(0.0, 1.0);
        let direct = way_length(start, &[], end);
        let via = way_length(start, &[mid], end);
        // Along the equator the two-leg path has the same length as the
        // direct one.
        assert!((direct - via).abs() < 1e-6);
        assert!(direct > 100_000.0);
    }

    #[test]
    fn test_way_length_empty_pillars_is_direct() {
        let start = RoundedCoord::new(10.0, 106.0);
        let end = RoundedCoord::new(10.1, 106.1);
        let expected = haversine_distance(10.0, 106.0, 10.1, 106.1);
        assert_eq!(way_length(start, &[], end), expected);
    }
}
