use crate::models::Coordinates;
use geo::{GeodesicDistance, Point};

pub const METERS_PER_MILE: f64 = 1609.344;

/// Great-circle distance in statute miles on the WGS-84 ellipsoid
/// (Karney's geodesic), not a spherical or flat-plane approximation.
pub fn geodesic_miles(a: Coordinates, b: Coordinates) -> f64 {
    let a = Point::new(a.lon, a.lat);
    let b = Point::new(b.lon, b.lat);
    a.geodesic_distance(&b) / METERS_PER_MILE
}
