use log::{Log, Metadata, Record};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Simple logger implementation
pub struct SimpleLogger;

impl Log for SimpleLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        println!("[{}] {}", record.level(), record.args());
    }

    fn flush(&self) {}
}

/// The logical datasets handled by the pipeline, in processing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    Users,
    Cards,
    Stores,
    Products,
    Orders,
    DateEvents,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 6] = [
        DatasetKind::Users,
        DatasetKind::Cards,
        DatasetKind::Stores,
        DatasetKind::Products,
        DatasetKind::Orders,
        DatasetKind::DateEvents,
    ];

    /// Name of the destination table the cleaned dataset replaces.
    pub fn destination(&self) -> &'static str {
        match self {
            DatasetKind::Users => "dim_users",
            DatasetKind::Cards => "dim_card_details",
            DatasetKind::Stores => "dim_store_details",
            DatasetKind::Products => "dim_products",
            DatasetKind::Orders => "orders_table",
            DatasetKind::DateEvents => "dim_date_times",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DatasetKind::Users => "users",
            DatasetKind::Cards => "cards",
            DatasetKind::Stores => "stores",
            DatasetKind::Products => "products",
            DatasetKind::Orders => "orders",
            DatasetKind::DateEvents => "date_events",
        };
        f.write_str(name)
    }
}

/// File format for exported copies of cleaned tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
    Parquet,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Parquet => "parquet",
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_is_the_default_export_format() {
        assert_eq!(OutputFormat::default(), OutputFormat::Csv);
        assert_eq!(OutputFormat::default().extension(), "csv");
    }

    #[test]
    fn destinations_follow_processing_order() {
        let destinations: Vec<&str> = DatasetKind::ALL.iter().map(|kind| kind.destination()).collect();
        assert_eq!(
            destinations,
            vec![
                "dim_users",
                "dim_card_details",
                "dim_store_details",
                "dim_products",
                "orders_table",
                "dim_date_times",
            ]
        );
    }
}
