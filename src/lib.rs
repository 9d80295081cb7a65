pub mod columns;
pub mod config;
pub mod error;
pub mod extract;
pub mod load;
pub mod pipeline;
pub mod structs;
pub mod table;
pub mod transform;
pub mod validators;

// Re-export public API
pub use config::PipelineConfig;
pub use error::{PipelineError, Result};
pub use load::{FileLoader, Loader, SqliteLoader, write_csv, write_json, write_parquet};
pub use pipeline::{ConfiguredSources, DatasetSource, Pipeline, RunSummary};
pub use structs::{DatasetKind, OutputFormat, SimpleLogger};
pub use table::{Cell, Column, Table};
pub use transform::{
    clean, clean_cards, clean_date_events, clean_orders, clean_products, clean_stores,
    clean_users,
};
