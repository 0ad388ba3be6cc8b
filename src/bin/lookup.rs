//! One-shot nearest-customer lookup from the command line
//!
//! Run: ./target/release/lookup --address "1600 Main St, Denver, CO"

use anyhow::{Context, Result};
use clap::Parser;
use nearest_customer::{
    api::{
        handlers::{error_status, CustomerResponse},
        service::{AddressQuery, CustomerFinder, FindError},
    },
    config::ResolverArgs,
    db::CustomerDb,
};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "lookup")]
#[command(about = "Print the customer nearest to an address")]
struct Args {
    /// Free-text address to geocode
    #[arg(long)]
    address: String,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    resolver: ResolverArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()))
        .init();

    let args = Args::parse();

    let customers = CustomerDb::load(&args.resolver.customer_db).context("failed to load customer tables")?;
    let finder = CustomerFinder::new(
        customers,
        Arc::new(args.resolver.geocoder()?),
        Arc::new(args.resolver.link_template()?),
    );

    match finder.find_nearest(&AddressQuery::single(&args.address)).await {
        Ok(found) if args.json => {
            println!("{}", serde_json::to_string_pretty(&CustomerResponse::from(found))?);
            Ok(())
        }
        Ok(found) => {
            let c = &found.customer;
            println!("Address:   {} ({:.5}, {:.5})", found.query, found.location.lat, found.location.lon);
            println!("Customer:  {} - {}", c.customer_id, c.name);
            println!("Location:  {}, {}, {} [{}]", c.address, c.city, c.state, c.region);
            println!("Distance:  {:.2} miles", found.distance_miles);
            println!("Dashboard: {}", found.link);
            Ok(())
        }
        Err(e) => {
            if let FindError::Upstream(inner) = &e {
                tracing::error!("Lookup failed: {:#}", inner);
            }
            let (_, message) = error_status(&e);
            anyhow::bail!(message)
        }
    }
}
