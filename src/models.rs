use serde::Deserialize;

/// Raw row from a regional customer export
#[derive(Debug, Deserialize)]
pub struct CsvRecord {
    #[serde(rename = "Customer ID", alias = "CustomerID")]
    pub customer_id: String,
    #[serde(rename = "Customer Name", default)]
    pub name: String,
    #[serde(rename = "Address", default)]
    pub address: String,
    #[serde(rename = "City", default)]
    pub city: String,
    #[serde(rename = "State", default)]
    pub state: String,
    #[serde(rename = "Latitude", default, deserialize_with = "csv::invalid_option")]
    pub latitude: Option<f64>,
    #[serde(rename = "Longitude", default, deserialize_with = "csv::invalid_option")]
    pub longitude: Option<f64>,
}

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Finite, latitude within [-90, 90] and longitude within [-180, 180].
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && self.lat.abs() <= 90.0
            && self.lon.abs() <= 180.0
    }
}

/// Customer as held in the in-memory table
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerRecord {
    pub customer_id: i64,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub region: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl CustomerRecord {
    /// Both coordinates present and valid. Records without them never
    /// take part in a nearest-customer search.
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)).filter(Coordinates::is_valid),
            _ => None,
        }
    }

    /// Both coordinates present but unusable, e.g. swapped or out of range.
    pub fn has_invalid_coordinates(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some() && self.coordinates().is_none()
    }

    pub fn is_eligible(&self) -> bool {
        self.coordinates().is_some()
    }
}

impl CsvRecord {
    pub fn to_customer(&self, region: &str) -> anyhow::Result<CustomerRecord> {
        let customer_id = self
            .customer_id
            .trim()
            .parse::<i64>()
            .map_err(|e| anyhow::anyhow!("invalid customer id '{}': {}", self.customer_id, e))?;

        Ok(CustomerRecord {
            customer_id,
            name: self.name.clone(),
            address: self.address.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            region: region.to_string(),
            latitude: self.latitude,
            longitude: self.longitude,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(lat: Option<f64>, lon: Option<f64>) -> CustomerRecord {
        CustomerRecord {
            customer_id: 1,
            name: "Acme".into(),
            address: "1 Main St".into(),
            city: "Denver".into(),
            state: "CO".into(),
            region: "CustomerDB-CO".into(),
            latitude: lat,
            longitude: lon,
        }
    }

    #[test]
    fn test_eligibility() {
        assert!(record(Some(39.7), Some(-104.9)).is_eligible());
        assert!(!record(None, Some(-104.9)).is_eligible());
        assert!(!record(Some(39.7), None).is_eligible());
        assert!(!record(Some(f64::NAN), Some(-104.9)).is_eligible());
    }

    #[test]
    fn test_out_of_range_coordinates_not_eligible() {
        // Latitude and longitude swapped in the export
        let swapped = record(Some(-104.99), Some(39.74));
        assert!(!swapped.is_eligible());
        assert!(swapped.has_invalid_coordinates());

        assert!(!record(Some(39.7), Some(200.0)).is_eligible());
        assert!(record(Some(-90.0), Some(180.0)).is_eligible());
        assert!(!record(None, Some(-104.9)).has_invalid_coordinates());
    }

    #[test]
    fn test_customer_id_must_be_integer() {
        let raw = CsvRecord {
            customer_id: " 4521 ".into(),
            name: String::new(),
            address: String::new(),
            city: String::new(),
            state: String::new(),
            latitude: None,
            longitude: None,
        };
        assert_eq!(raw.to_customer("CO").unwrap().customer_id, 4521);

        let raw = CsvRecord {
            customer_id: "abc".into(),
            ..raw
        };
        assert!(raw.to_customer("CO").is_err());
    }
}
