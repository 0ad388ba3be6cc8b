//! In-memory customer table
//!
//! Loaded once at startup from the regional exports and shared read-only
//! by every request.

use crate::models::{CsvRecord, CustomerRecord};
use csv::{ReaderBuilder, Trim};
use std::collections::HashSet;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Column names every export must carry. The id column has two spellings.
const ID_COLUMNS: [&str; 2] = ["Customer ID", "CustomerID"];
const REQUIRED_COLUMNS: [&str; 6] = ["Customer Name", "Address", "City", "State", "Latitude", "Longitude"];

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed customer table {source_name}: {source}")]
    Csv {
        source_name: String,
        #[source]
        source: csv::Error,
    },
    #[error("customer table {source_name} is missing required column '{column}'")]
    MissingRequiredColumn { source_name: String, column: String },
}

#[derive(Debug, Clone, Default)]
pub struct CustomerDb {
    records: Arc<[CustomerRecord]>,
}

impl CustomerDb {
    pub fn new(records: Vec<CustomerRecord>) -> Self {
        Self {
            records: records.into(),
        }
    }

    /// Load and union the given regional exports. The region label of each
    /// record is the file stem of its source.
    pub fn load<P: AsRef<Path>>(paths: &[P]) -> Result<Self, LoadError> {
        let mut builder = Builder::default();
        for path in paths {
            let path = path.as_ref();
            let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            let region = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            info!("Reading customer table {:?}", path);
            builder.add_table(&region, file)?;
        }
        Ok(builder.finish())
    }

    /// Load a single table from any reader, labelled with `region`.
    pub fn from_reader<R: Read>(region: &str, reader: R) -> Result<Self, LoadError> {
        let mut builder = Builder::default();
        builder.add_table(region, reader)?;
        Ok(builder.finish())
    }

    pub fn records(&self) -> &[CustomerRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn eligible_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_eligible()).count()
    }
}

#[derive(Default)]
struct Builder {
    records: Vec<CustomerRecord>,
    seen_ids: HashSet<i64>,
}

impl Builder {
    fn add_table<R: Read>(&mut self, region: &str, reader: R) -> Result<(), LoadError> {
        let csv_err = |source| LoadError::Csv {
            source_name: region.to_string(),
            source,
        };

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(reader);

        let headers = reader.headers().map_err(csv_err)?.clone();
        info!("{} columns: {:?}", region, headers.iter().collect::<Vec<_>>());
        check_columns(region, &headers)?;

        let mut loaded = 0;
        let mut eligible = 0;
        for (i, row) in reader.deserialize::<CsvRecord>().enumerate() {
            // Header is line 1
            let line = i + 2;
            let row = match row {
                Ok(row) => row,
                Err(e) => {
                    warn!("{} line {}: skipping unreadable row: {}", region, line, e);
                    continue;
                }
            };
            let customer = match row.to_customer(region) {
                Ok(customer) => customer,
                Err(e) => {
                    warn!("{} line {}: skipping row: {}", region, line, e);
                    continue;
                }
            };
            if !self.seen_ids.insert(customer.customer_id) {
                warn!(
                    "{} line {}: duplicate customer id {}, keeping the first occurrence",
                    region, line, customer.customer_id
                );
                continue;
            }
            if customer.has_invalid_coordinates() {
                warn!(
                    "{} line {}: customer {} has out-of-range coordinates ({:?}, {:?}), treating as missing",
                    region, line, customer.customer_id, customer.latitude, customer.longitude
                );
            } else if customer.is_eligible() {
                eligible += 1;
            }
            loaded += 1;
            self.records.push(customer);
        }

        info!("Loaded {} customers from {} ({} with coordinates)", loaded, region, eligible);
        Ok(())
    }

    fn finish(self) -> CustomerDb {
        CustomerDb::new(self.records)
    }
}

fn check_columns(region: &str, headers: &csv::StringRecord) -> Result<(), LoadError> {
    let has = |name: &str| headers.iter().any(|h| h == name);
    let missing = |column: &str| LoadError::MissingRequiredColumn {
        source_name: region.to_string(),
        column: column.to_string(),
    };

    if !ID_COLUMNS.into_iter().any(|c| has(c)) {
        return Err(missing(ID_COLUMNS[0]));
    }
    for column in REQUIRED_COLUMNS {
        if !has(column) {
            return Err(missing(column));
        }
    }
    Ok(())
}
