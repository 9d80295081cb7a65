//! Orchestration: extract each dataset, clean it, and load it.

use crate::config::{ObjectStoreConfig, PipelineConfig};
use crate::error::Result;
use crate::extract::{
    HttpObjectStore, LocalObjectStore, ObjectStore, PageDirectory, PdfDocument, SqliteSource,
    StoreApi, TableSource, fetch_date_events, fetch_object, fetch_pdf_table,
};
use crate::load::Loader;
use crate::structs::DatasetKind;
use crate::table::Table;
use crate::transform::clean;
use log::{error, info, warn};
use reqwest::blocking::Client;
use std::path::Path;

/// Column of the card details PDF whose values contain spaces.
const CARD_PROVIDER_COLUMN: &str = "card_provider";

/// Produces the raw table for a dataset kind.
pub trait DatasetSource {
    fn extract(&self, kind: DatasetKind) -> Result<Table>;
}

/// The production sources, built from a [`PipelineConfig`].
pub struct ConfiguredSources {
    database: SqliteSource,
    stores: StoreApi,
    objects: Box<dyn ObjectStore>,
    cards: PdfDocument,
    http: Client,
    config: PipelineConfig,
}

impl ConfiguredSources {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let objects: Box<dyn ObjectStore> = match &config.object_store {
            ObjectStoreConfig::Local { root } => Box::new(LocalObjectStore::new(root.clone())),
            ObjectStoreConfig::Http { url_template } => {
                Box::new(HttpObjectStore::new(url_template.clone()))
            }
        };

        let http = Client::new();
        Ok(Self {
            database: SqliteSource::new(config.source_database.path.clone()),
            stores: StoreApi::new(&config.api)?,
            objects,
            cards: PdfDocument::new(http.clone()).with_text_column(CARD_PROVIDER_COLUMN),
            http,
            config,
        })
    }
}

impl DatasetSource for ConfiguredSources {
    fn extract(&self, kind: DatasetKind) -> Result<Table> {
        let sources = &self.config.sources;
        match kind {
            DatasetKind::Users => self.database.fetch_table(&sources.users_table),
            DatasetKind::Orders => self.database.fetch_table(&sources.orders_table),
            DatasetKind::Cards if Path::new(&sources.card_details_pdf).is_dir() => {
                fetch_pdf_table(&PageDirectory, &sources.card_details_pdf)
            }
            DatasetKind::Cards => fetch_pdf_table(&self.cards, &sources.card_details_pdf),
            DatasetKind::Stores => self.stores.fetch_stores(),
            DatasetKind::Products => fetch_object(
                self.objects.as_ref(),
                &sources.products.bucket,
                &sources.products.key,
            ),
            DatasetKind::DateEvents => fetch_date_events(&self.http, &sources.date_details_url),
        }
    }
}

/// Outcome of a pipeline run.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RunSummary {
    /// Datasets loaded, with the number of rows kept.
    pub loaded: Vec<(DatasetKind, usize)>,
    /// Datasets whose extraction failed.
    pub skipped: Vec<DatasetKind>,
}

/// Runs extract, clean and load for each requested dataset, in order.
pub struct Pipeline<S> {
    source: S,
    loaders: Vec<Box<dyn Loader>>,
}

impl<S: DatasetSource> Pipeline<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            loaders: Vec::new(),
        }
    }

    pub fn with_loader(mut self, loader: Box<dyn Loader>) -> Self {
        self.loaders.push(loader);
        self
    }

    /// Runs the pipeline for `kinds`.
    ///
    /// A dataset whose extraction fails is logged and skipped. Cleaning and
    /// load failures stop the run.
    ///
    /// # Errors
    /// Returns `PipelineError::MissingColumn` when an extracted table lacks a
    /// column its recipe needs, or any error raised by a loader.
    pub fn run(&mut self, kinds: &[DatasetKind]) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        for &kind in kinds {
            info!("Extracting {}", kind);
            let raw = match self.source.extract(kind) {
                Ok(table) => table,
                Err(e) => {
                    error!("Extraction of {} failed: {}", kind, e);
                    summary.skipped.push(kind);
                    continue;
                }
            };
            let raw_rows = raw.num_rows();

            let cleaned = clean(kind, raw)?;
            info!(
                "Cleaned {}: {} of {} rows kept",
                kind,
                cleaned.num_rows(),
                raw_rows
            );
            if cleaned.num_rows() == 0 {
                warn!("No {} rows survived cleaning", kind);
            }

            for loader in &mut self.loaders {
                loader.store(&cleaned, kind.destination())?;
            }
            info!("Loaded {} into {}", kind, kind.destination());
            summary.loaded.push((kind, cleaned.num_rows()));
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use crate::table::Column;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    struct MockSource(HashMap<DatasetKind, Table>);

    impl DatasetSource for MockSource {
        fn extract(&self, kind: DatasetKind) -> Result<Table> {
            self.0
                .get(&kind)
                .cloned()
                .ok_or_else(|| PipelineError::Data(format!("no {} source", kind)))
        }
    }

    #[derive(Clone, Default)]
    struct RecordingLoader(Rc<RefCell<Vec<(String, usize)>>>);

    impl Loader for RecordingLoader {
        fn store(&mut self, table: &Table, name: &str) -> Result<usize> {
            self.0.borrow_mut().push((name.to_string(), table.num_rows()));
            Ok(table.num_rows())
        }
    }

    fn date_events() -> Table {
        Table::try_from_columns(vec![
            Column::from_text("timestamp", ["22:00:06", "bad"]),
            Column::from_text("month", ["9", "2"]),
            Column::from_text("year", ["2012", "1997"]),
            Column::from_text("day", ["19", "25"]),
        ])
        .unwrap()
    }

    #[test]
    fn failed_extraction_is_skipped() {
        let source = MockSource(HashMap::from([(DatasetKind::DateEvents, date_events())]));
        let loader = RecordingLoader::default();
        let mut pipeline = Pipeline::new(source).with_loader(Box::new(loader.clone()));

        let summary = pipeline
            .run(&[DatasetKind::Users, DatasetKind::DateEvents])
            .unwrap();

        assert_eq!(summary.skipped, vec![DatasetKind::Users]);
        assert_eq!(summary.loaded, vec![(DatasetKind::DateEvents, 1)]);
        assert_eq!(
            *loader.0.borrow(),
            vec![("dim_date_times".to_string(), 1)]
        );
    }

    #[test]
    fn schema_mismatch_stops_the_run() {
        let wrong = Table::try_from_columns(vec![Column::from_text("x", ["1"])]).unwrap();
        let source = MockSource(HashMap::from([(DatasetKind::Cards, wrong)]));
        let mut pipeline = Pipeline::new(source);

        let err = pipeline.run(&[DatasetKind::Cards]).unwrap_err();
        assert!(matches!(err, PipelineError::MissingColumn { .. }));
    }
}
