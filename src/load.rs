use crate::error::{PipelineError, Result};
use crate::extract::quote_identifier;
use crate::structs::OutputFormat;
use crate::table::Table;
use arrow_array::{ArrayRef, RecordBatch, StringArray};
use arrow_schema::{DataType, Field, Schema};
use csv::Writer;
use log::debug;
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;
use rusqlite::{Connection, params_from_iter};
use serde_json::{Map, Value};
use std::{
    fs::{self, File},
    path::{Path, PathBuf},
    sync::Arc,
};

/// A destination for cleaned tables.
pub trait Loader {
    /// Replaces the destination table `name` with `table`.
    ///
    /// Returns the number of rows written.
    fn store(&mut self, table: &Table, name: &str) -> Result<usize>;
}

/// Loads tables into a SQLite database, dropping and recreating each table.
pub struct SqliteLoader {
    conn: Connection,
}

impl SqliteLoader {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            conn: Connection::open(path)?,
        })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl Loader for SqliteLoader {
    fn store(&mut self, table: &Table, name: &str) -> Result<usize> {
        if table.num_columns() == 0 {
            return Err(PipelineError::Data(format!(
                "Cannot store table {} without columns",
                name
            )));
        }

        let quoted = quote_identifier(name);
        let columns: Vec<String> = table
            .column_names()
            .into_iter()
            .map(|column| format!("{} TEXT", quote_identifier(column)))
            .collect();
        let placeholders = vec!["?"; table.num_columns()].join(", ");

        let tx = self.conn.transaction()?;
        tx.execute(&format!("DROP TABLE IF EXISTS {}", quoted), [])?;
        tx.execute(
            &format!("CREATE TABLE {} ({})", quoted, columns.join(", ")),
            [],
        )?;
        {
            let mut insert =
                tx.prepare(&format!("INSERT INTO {} VALUES ({})", quoted, placeholders))?;
            for row in table.rows() {
                insert.execute(params_from_iter(row.iter().map(|cell| cell.render())))?;
            }
        }
        tx.commit()?;

        debug!("Stored {} rows in {}", table.num_rows(), name);
        Ok(table.num_rows())
    }
}

/// Writes each table to `<dir>/<name>.<ext>`, replacing any existing file.
pub struct FileLoader {
    dir: PathBuf,
    format: OutputFormat,
}

impl FileLoader {
    pub fn new(dir: impl Into<PathBuf>, format: OutputFormat) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir, format })
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", name, self.format.extension()))
    }
}

impl Loader for FileLoader {
    fn store(&mut self, table: &Table, name: &str) -> Result<usize> {
        let path = self.path_for(name);
        match self.format {
            OutputFormat::Csv => write_csv(table, &path)?,
            OutputFormat::Json => write_json(table, &path)?,
            OutputFormat::Parquet => write_parquet(table, &path)?,
        }
        debug!("Wrote {} rows to {}", table.num_rows(), path.display());
        Ok(table.num_rows())
    }
}

/// Writes a table to a CSV file with a header row.
///
/// # Errors
/// Returns error if file cannot be created or written to.
pub fn write_csv(table: &Table, output_path: &Path) -> Result<()> {
    let file = File::create(output_path)?;
    let mut writer = Writer::from_writer(file);

    writer.write_record(table.column_names())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(|cell| cell.to_string()))?;
    }

    writer.flush()?;
    Ok(())
}

/// Writes a table to a pretty-formatted JSON array of row objects.
///
/// Invalid cells are written as `null`.
///
/// # Errors
/// Returns error if file cannot be created or serialization fails.
pub fn write_json(table: &Table, output_path: &Path) -> Result<()> {
    let names = table.column_names();
    let rows: Vec<Value> = table
        .rows()
        .map(|row| {
            let object: Map<String, Value> = names
                .iter()
                .zip(row)
                .map(|(name, cell)| {
                    let value = cell.render().map_or(Value::Null, Value::String);
                    (name.to_string(), value)
                })
                .collect();
            Value::Object(object)
        })
        .collect();

    let file = File::create(output_path)?;
    serde_json::to_writer_pretty(file, &rows)?;
    Ok(())
}

/// Writes a table to a Parquet file with one nullable Utf8 column per table column.
///
/// # Errors
/// Returns error if file cannot be created, the table has no columns, or Arrow operations fail.
pub fn write_parquet(table: &Table, output_path: &Path) -> Result<()> {
    let schema = Arc::new(Schema::new(
        table
            .columns()
            .iter()
            .map(|column| Field::new(column.name.as_str(), DataType::Utf8, true))
            .collect::<Vec<_>>(),
    ));

    let arrays: Vec<ArrayRef> = table
        .columns()
        .iter()
        .map(|column| {
            let values: StringArray = column.cells.iter().map(|cell| cell.render()).collect();
            Arc::new(values) as ArrayRef
        })
        .collect();

    let batch = RecordBatch::try_new(schema.clone(), arrays)?;

    let file = File::create(output_path)?;
    let props = WriterProperties::builder().build();
    let mut writer = ArrowWriter::try_new(file, schema, Some(props))?;
    writer.write(&batch)?;
    writer.close()?;

    Ok(())
}
