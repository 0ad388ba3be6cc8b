//! Nearest-customer resolution
//!
//! A linear scan over the eligible records. Distances live only in the
//! returned [`Nearest`], the table itself is never touched.

use crate::distance::geodesic_miles;
use crate::models::{Coordinates, CustomerRecord};

#[derive(Debug, Clone, Copy)]
pub struct Nearest<'a> {
    pub customer: &'a CustomerRecord,
    pub distance_miles: f64,
}

/// Closest eligible record to `point`, or `None` when no record has both
/// coordinates. Ties on exactly equal distance go to the smaller customer id.
pub fn nearest<'a, I>(point: Coordinates, records: I) -> Option<Nearest<'a>>
where
    I: IntoIterator<Item = &'a CustomerRecord>,
{
    records
        .into_iter()
        .filter_map(|customer| {
            let distance_miles = geodesic_miles(point, customer.coordinates()?);
            // Non-finite distances never take part in the minimum
            distance_miles.is_finite().then_some(Nearest {
                customer,
                distance_miles,
            })
        })
        .reduce(|best, candidate| {
            let closer = candidate.distance_miles < best.distance_miles;
            let tie_wins = candidate.distance_miles == best.distance_miles
                && candidate.customer.customer_id < best.customer.customer_id;
            if closer || tie_wins {
                candidate
            } else {
                best
            }
        })
}
