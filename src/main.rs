use clap::Parser;
use lib::{
    ConfiguredSources, DatasetKind, FileLoader, OutputFormat, Pipeline, PipelineConfig,
    PipelineError, SimpleLogger, SqliteLoader,
};
use log::debug;
use std::path::PathBuf;
use std::time::Instant;

static LOGGER: SimpleLogger = SimpleLogger;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// YAML configuration file with database, API and storage settings
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Datasets to process (e.g., users,orders). If not specified, processes all datasets.
    #[arg(short, long, value_delimiter = ',')]
    datasets: Vec<DatasetKind>,

    /// Also write each cleaned table to this directory (overrides the config file)
    #[arg(short, long)]
    export_dir: Option<PathBuf>,

    /// File format for exported tables
    #[arg(long)]
    format: Option<OutputFormat>,

    /// Log level for output
    #[arg(long, default_value = "false")]
    debug: bool,
}

fn main() -> Result<(), PipelineError> {
    // Initialize timer and logger
    let total_start = Instant::now();
    log::set_logger(&LOGGER)
        .map_err(|e| PipelineError::Data(format!("Logger already set: {}", e)))?;

    // Acquire CLI args
    let args = Args::parse();
    if args.debug {
        log::set_max_level(log::LevelFilter::Debug);
    } else {
        log::set_max_level(log::LevelFilter::Info);
    }
    let kinds = if args.datasets.is_empty() {
        DatasetKind::ALL.to_vec()
    } else {
        args.datasets.clone()
    };

    println!("Centraliser! Retail Data Pipeline");
    debug!("Config file: {}", args.config.display());
    let config = PipelineConfig::from_file(&args.config)?;

    let export = match (args.export_dir, &config.export) {
        (Some(dir), export) => Some((
            dir,
            args.format
                .or(export.as_ref().map(|e| e.format))
                .unwrap_or_default(),
        )),
        (None, Some(export)) => Some((export.dir.clone(), args.format.unwrap_or(export.format))),
        (None, None) => None,
    };

    let destination = config.destination_database.path.clone();
    debug!("Destination database: {}", destination.display());
    let mut pipeline = Pipeline::new(ConfiguredSources::new(config)?)
        .with_loader(Box::new(SqliteLoader::open(&destination)?));
    if let Some((dir, format)) = export {
        println!("Exporting {:?} copies to {}", format, dir.display());
        pipeline = pipeline.with_loader(Box::new(FileLoader::new(dir, format)?));
    }

    // Run the pipeline
    let names: Vec<String> = kinds.iter().map(|kind| kind.to_string()).collect();
    println!("Processing datasets: {}", names.join(","));
    let processing_start = Instant::now();
    let summary = pipeline.run(&kinds)?;
    println!(
        "Data processing completed in {:.2?}",
        processing_start.elapsed()
    );

    // Show summary
    for (kind, rows) in &summary.loaded {
        println!("  {} -> {} ({} rows)", kind, kind.destination(), rows);
    }
    for kind in &summary.skipped {
        println!("  {} skipped (extraction failed)", kind);
    }

    println!(
        "\nPipeline completed in {:.2?} | {} loaded, {} skipped",
        total_start.elapsed(),
        summary.loaded.len(),
        summary.skipped.len()
    );
    Ok(())
}
