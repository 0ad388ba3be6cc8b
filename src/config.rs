//! Command-line and environment configuration shared by the binaries

use crate::geocode::{GeoapifyGeocoder, DEFAULT_GEOAPIFY_URL};
use crate::link::{LinkTemplate, DEFAULT_LINK_TEMPLATE};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use std::time::Duration;

/// Customer data, geocoder and link options
#[derive(Args, Debug, Clone)]
pub struct ResolverArgs {
    /// Regional customer exports to load and union
    #[arg(
        long = "customer-db",
        env = "CUSTOMER_DB_FILES",
        value_delimiter = ',',
        default_value = "CustomerDB-CO.csv,CustomerDB-IL.csv"
    )]
    pub customer_db: Vec<PathBuf>,

    /// Geoapify API key
    #[arg(long, env = "GEOAPIFY_API_KEY", hide_env_values = true)]
    pub geoapify_api_key: String,

    /// Geoapify geocoding endpoint
    #[arg(long, env = "GEOAPIFY_URL", default_value = DEFAULT_GEOAPIFY_URL)]
    pub geoapify_url: String,

    /// Request timeout for the geocoding call (no timeout when unset)
    #[arg(long, env = "GEOCODE_TIMEOUT_SECS")]
    pub geocode_timeout_secs: Option<u64>,

    /// Dashboard deep link, `{customer_id}` is replaced by the customer id
    #[arg(long, env = "DASHBOARD_LINK_TEMPLATE", default_value = DEFAULT_LINK_TEMPLATE)]
    pub link_template: String,
}

impl ResolverArgs {
    pub fn geocoder(&self) -> Result<GeoapifyGeocoder> {
        GeoapifyGeocoder::new(
            &self.geoapify_url,
            &self.geoapify_api_key,
            self.geocode_timeout_secs.map(Duration::from_secs),
        )
    }

    pub fn link_template(&self) -> Result<LinkTemplate> {
        LinkTemplate::new(&self.link_template)
    }
}
