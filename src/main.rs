//! Nearest-customer HTTP server
//!
//! Loads the regional customer exports once, then answers address lookups.
//!
//! Usage:
//!   ./target/release/nearest_customer [options]
//!
//! Options (each also readable from the environment):
//!   --port PORT               PORT, default 5000
//!   --bind ADDR               BIND_ADDR, default 0.0.0.0
//!   --customer-db A,B         CUSTOMER_DB_FILES
//!   --geoapify-api-key KEY    GEOAPIFY_API_KEY
//!   --link-template URL       DASHBOARD_LINK_TEMPLATE
//!
//! Endpoints:
//!   GET  /               - Search form
//!   POST /find_customer  - Nearest customer (HTML, or JSON with Accept: application/json)
//!   GET  /health         - Health check

use anyhow::{Context, Result};
use clap::Parser;
use nearest_customer::{
    api::{self, CustomerFinder},
    config::ResolverArgs,
    db::CustomerDb,
};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "nearest_customer")]
#[command(about = "Find the customer nearest to a street address")]
struct Args {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value = "5000")]
    port: u16,

    /// Interface to bind
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0")]
    bind: IpAddr,

    #[command(flatten)]
    resolver: ResolverArgs,
}

fn print_banner(addr: SocketAddr, customers: &CustomerDb) {
    println!("============================================================");
    println!("              NEAREST CUSTOMER LOOKUP SERVER");
    println!("============================================================");
    println!();
    println!("  Listening: http://{}", addr);
    println!("  Customers: {} ({} with coordinates)", customers.len(), customers.eligible_count());
    println!();
    println!("Endpoints:");
    println!("  GET  /               Search form");
    println!("  POST /find_customer  Nearest customer");
    println!("  GET  /health         Health check");
    println!();
    println!("============================================================");
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .init();

    let args = Args::parse();

    let customers = CustomerDb::load(&args.resolver.customer_db).context("failed to load customer tables")?;
    let geocoder = args.resolver.geocoder()?;
    let links = args.resolver.link_template()?;

    let addr = SocketAddr::new(args.bind, args.port);
    print_banner(addr, &customers);

    let finder = Arc::new(CustomerFinder::new(customers, Arc::new(geocoder), Arc::new(links)));
    let app = api::router(finder);

    tracing::info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
