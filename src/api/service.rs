//! Request pipeline: geocode, resolve nearest, format link
//!
//! Shared by the HTTP handlers and the `lookup` binary.

use crate::db::CustomerDb;
use crate::geocode::{GeocodeError, Geocoder};
use crate::link::LinkGenerator;
use crate::models::{Coordinates, CustomerRecord};
use crate::resolver;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

// ============================================================================
// Data Structures
// ============================================================================

#[derive(Debug, Clone)]
pub struct CustomerMatch {
    pub customer: CustomerRecord,
    pub distance_miles: f64,
    pub link: String,
    pub query: String,
    pub location: Coordinates,
}

#[derive(Debug, Error)]
pub enum FindError {
    #[error("no address given")]
    MissingAddress,
    #[error("could not geocode '{0}'")]
    GeocodeFailed(String),
    #[error("no customers with known coordinates")]
    NoEligibleCustomers,
    #[error(transparent)]
    Upstream(anyhow::Error),
}

/// Form input: either a single free-text address or its parts.
#[derive(Debug, Clone, Default)]
pub struct AddressQuery {
    pub address: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

impl AddressQuery {
    pub fn single(address: &str) -> Self {
        Self {
            address: Some(address.to_string()),
            ..Default::default()
        }
    }

    /// The text sent to the geocoder. A non-blank `address` wins, otherwise
    /// the non-blank parts are joined with ", ".
    pub fn to_text(&self) -> Option<String> {
        if let Some(address) = self.address.as_deref().map(str::trim) {
            if !address.is_empty() {
                return Some(address.to_string());
            }
        }

        let parts: Vec<&str> = [&self.street, &self.city, &self.state]
            .into_iter()
            .filter_map(|p| p.as_deref().map(str::trim))
            .filter(|p| !p.is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

// ============================================================================
// Customer Finder
// ============================================================================

pub struct CustomerFinder {
    customers: CustomerDb,
    geocoder: Arc<dyn Geocoder>,
    links: Arc<dyn LinkGenerator>,
}

impl CustomerFinder {
    pub fn new(customers: CustomerDb, geocoder: Arc<dyn Geocoder>, links: Arc<dyn LinkGenerator>) -> Self {
        Self {
            customers,
            geocoder,
            links,
        }
    }

    pub fn customers(&self) -> &CustomerDb {
        &self.customers
    }

    pub async fn find_nearest(&self, query: &AddressQuery) -> Result<CustomerMatch, FindError> {
        let text = query.to_text().ok_or(FindError::MissingAddress)?;

        let location = match self.geocoder.geocode(&text).await {
            Ok(location) => location,
            Err(GeocodeError::NotFound) => return Err(FindError::GeocodeFailed(text)),
            Err(GeocodeError::Upstream(e)) => return Err(FindError::Upstream(e)),
        };

        let nearest = resolver::nearest(location, self.customers.records())
            .ok_or(FindError::NoEligibleCustomers)?;

        info!(
            "Nearest customer to '{}' ({:.5}, {:.5}): {} at {:.2} mi",
            text, location.lat, location.lon, nearest.customer.customer_id, nearest.distance_miles
        );

        Ok(CustomerMatch {
            customer: nearest.customer.clone(),
            distance_miles: nearest.distance_miles,
            link: self.links.link(nearest.customer.customer_id),
            query: text,
            location,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::link::LinkTemplate;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Geocoder returning a fixed answer and counting calls
    pub struct FixedGeocoder {
        pub answer: Option<Coordinates>,
        pub fail: bool,
        pub calls: AtomicUsize,
    }

    impl FixedGeocoder {
        pub fn found(lat: f64, lon: f64) -> Self {
            Self {
                answer: Some(Coordinates::new(lat, lon)),
                fail: false,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn not_found() -> Self {
            Self {
                answer: None,
                fail: false,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn failing() -> Self {
            Self {
                answer: None,
                fail: true,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Geocoder for FixedGeocoder {
        async fn geocode(&self, _address: &str) -> Result<Coordinates, GeocodeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(anyhow::anyhow!("connection refused").into());
            }
            self.answer.ok_or(GeocodeError::NotFound)
        }
    }

    pub fn customer(id: i64, lat: Option<f64>, lon: Option<f64>) -> CustomerRecord {
        CustomerRecord {
            customer_id: id,
            name: format!("Customer {}", id),
            address: format!("{} Main St", id),
            city: "Denver".into(),
            state: "CO".into(),
            region: "CustomerDB-CO".into(),
            latitude: lat,
            longitude: lon,
        }
    }

    pub fn finder(records: Vec<CustomerRecord>, geocoder: Arc<FixedGeocoder>) -> CustomerFinder {
        CustomerFinder::new(CustomerDb::new(records), geocoder, Arc::new(LinkTemplate::default()))
    }

    #[test]
    fn test_address_text() {
        let q = AddressQuery {
            address: None,
            street: Some(" 1 Main St ".into()),
            city: Some("Denver".into()),
            state: Some("CO".into()),
        };
        assert_eq!(q.to_text().unwrap(), "1 Main St, Denver, CO");

        let q = AddressQuery {
            street: Some("1 Main St".into()),
            city: Some("".into()),
            state: Some("CO".into()),
            ..Default::default()
        };
        assert_eq!(q.to_text().unwrap(), "1 Main St, CO");

        let q = AddressQuery {
            address: Some("500 Lake Shore Dr, Chicago".into()),
            street: Some("ignored".into()),
            ..Default::default()
        };
        assert_eq!(q.to_text().unwrap(), "500 Lake Shore Dr, Chicago");

        let q = AddressQuery {
            address: Some("   ".into()),
            ..Default::default()
        };
        assert!(q.to_text().is_none());
    }

    #[tokio::test]
    async fn test_find_nearest() {
        let geocoder = Arc::new(FixedGeocoder::found(40.0, -73.0));
        let finder = finder(
            vec![
                customer(20, Some(40.0001), Some(-73.0001)),
                customer(10, Some(40.0), Some(-73.0)),
            ],
            geocoder,
        );

        let found = finder.find_nearest(&AddressQuery::single("somewhere")).await.unwrap();
        assert_eq!(found.customer.customer_id, 10);
        assert!(found.distance_miles < 1e-9);
        assert!(found.link.contains("V:10~"));
        assert_eq!(found.query, "somewhere");
    }

    #[tokio::test]
    async fn test_geocode_failure_short_circuits() {
        let geocoder = Arc::new(FixedGeocoder::not_found());
        let finder = finder(vec![customer(1, Some(40.0), Some(-73.0))], geocoder.clone());

        let err = finder.find_nearest(&AddressQuery::single("nowhere")).await.unwrap_err();
        assert!(matches!(err, FindError::GeocodeFailed(ref a) if a == "nowhere"));
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_address_skips_geocoder() {
        let geocoder = Arc::new(FixedGeocoder::found(40.0, -73.0));
        let finder = finder(vec![customer(1, Some(40.0), Some(-73.0))], geocoder.clone());

        let err = finder.find_nearest(&AddressQuery::default()).await.unwrap_err();
        assert!(matches!(err, FindError::MissingAddress));
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_no_eligible_customers() {
        let geocoder = Arc::new(FixedGeocoder::found(40.0, -73.0));
        let finder = finder(
            vec![customer(1, None, Some(-73.0)), customer(2, Some(40.0), None)],
            geocoder,
        );

        let err = finder.find_nearest(&AddressQuery::single("x")).await.unwrap_err();
        assert!(matches!(err, FindError::NoEligibleCustomers));
    }

    #[tokio::test]
    async fn test_upstream_error() {
        let finder = finder(vec![customer(1, Some(40.0), Some(-73.0))], Arc::new(FixedGeocoder::failing()));
        let err = finder.find_nearest(&AddressQuery::single("x")).await.unwrap_err();
        assert!(matches!(err, FindError::Upstream(_)));
    }
}
