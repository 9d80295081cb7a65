//! Extraction adapters.
//!
//! Each adapter turns one kind of raw source into a [`Table`]. Nulls at the
//! source (SQL `NULL`, JSON `null`, NA strings in CSV and PDF text) become
//! [`Cell::Invalid`].

use crate::config::ApiConfig;
use crate::error::{PipelineError, Result};
use crate::table::{Cell, Column, Table};
use log::{debug, warn};
use lopdf::Document;
use regex::Regex;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use serde_json::{Map, Value};
use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::sync::LazyLock;

/// Field values read as missing, the same set pandas treats as NA by default.
pub const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

static COLUMN_GAP_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\t|\s{2,}").expect("Invalid column gap regex"));

/// Maps a raw text field to a cell, turning NA strings into `Invalid`.
pub fn field_cell(field: &str) -> Cell {
    if NA_VALUES.contains(&field) {
        Cell::Invalid
    } else {
        Cell::text(field)
    }
}

/// A relational source of named tables.
pub trait TableSource {
    fn list_tables(&self) -> Result<Vec<String>>;

    fn fetch_table(&self, name: &str) -> Result<Table>;
}

/// Reads tables from a SQLite database file, read only.
pub struct SqliteSource {
    path: PathBuf,
}

impl SqliteSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn open(&self) -> Result<Connection> {
        Ok(Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY,
        )?)
    }
}

pub(crate) fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn sql_cell(value: ValueRef<'_>) -> Cell {
    match value {
        ValueRef::Null => Cell::Invalid,
        ValueRef::Integer(n) => Cell::Text(n.to_string()),
        ValueRef::Real(f) => Cell::Text(f.to_string()),
        ValueRef::Text(t) | ValueRef::Blob(t) => {
            Cell::Text(String::from_utf8_lossy(t).into_owned())
        }
    }
}

impl TableSource for SqliteSource {
    fn list_tables(&self) -> Result<Vec<String>> {
        let conn = self.open()?;
        let mut stmt = conn.prepare(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(names)
    }

    fn fetch_table(&self, name: &str) -> Result<Table> {
        debug!("Reading table {} from {}", name, self.path.display());
        let conn = self.open()?;
        let mut stmt = conn.prepare(&format!("SELECT * FROM {}", quote_identifier(name)))?;
        let headers: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        let width = headers.len();

        let mut rows = Vec::new();
        let mut result_rows = stmt.query([])?;
        while let Some(row) = result_rows.next()? {
            let mut cells = Vec::with_capacity(width);
            for index in 0..width {
                cells.push(sql_cell(row.get_ref(index)?));
            }
            rows.push(cells);
        }

        Table::from_rows(headers, rows)
    }
}

/// Parses CSV with a header row into a table.
///
/// Blank header names become `Unnamed: <position>`, which is how an exported
/// row index usually shows up. Empty and NA fields (see [`NA_VALUES`]) become
/// `Invalid`.
pub fn read_csv<R: Read>(reader: R) -> Result<Table> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(position, name)| {
            if name.trim().is_empty() {
                format!("Unnamed: {}", position)
            } else {
                name.to_string()
            }
        })
        .collect();

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        rows.push(record.iter().map(field_cell).collect());
    }

    Table::from_rows(headers, rows)
}

/// Extracts the tables printed on every page of a PDF document.
pub trait PdfTableReader {
    /// Returns one table per page, in page order.
    fn read_pages(&self, location: &str) -> Result<Vec<Table>>;
}

/// Reads a PDF whose page tables were exported as one CSV file per page.
///
/// `location` is the directory holding the page files; pages are ordered by
/// file name.
pub struct PageDirectory;

impl PdfTableReader for PageDirectory {
    fn read_pages(&self, location: &str) -> Result<Vec<Table>> {
        let mut pages: Vec<PathBuf> = fs::read_dir(location)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "csv"))
            .collect();
        pages.sort();

        pages
            .iter()
            .map(|path| read_csv(fs::File::open(path)?))
            .collect()
    }
}

/// Reads tables from the text layer of a PDF document.
///
/// `location` is a file path or an `http(s)` URL. Each text line of a page is
/// a row; the first line of the document is the header and is skipped when a
/// later page repeats it.
pub struct PdfDocument {
    client: Client,
    text_column: Option<String>,
}

impl PdfDocument {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            text_column: None,
        }
    }

    /// Names the column that absorbs extra words when a row has more
    /// whitespace separated tokens than the header has columns.
    pub fn with_text_column(mut self, name: impl Into<String>) -> Self {
        self.text_column = Some(name.into());
        self
    }

    fn load(&self, location: &str) -> Result<Document> {
        if location.starts_with("http://") || location.starts_with("https://") {
            debug!("Downloading PDF {}", location);
            let bytes = self.client.get(location).send()?.error_for_status()?.bytes()?;
            Ok(Document::load_mem(&bytes)?)
        } else {
            Ok(Document::load(location)?)
        }
    }
}

impl PdfTableReader for PdfDocument {
    fn read_pages(&self, location: &str) -> Result<Vec<Table>> {
        let document = self.load(location)?;
        let mut header = Vec::new();
        let mut tables = Vec::new();
        for page_number in document.get_pages().into_keys() {
            let text = document.extract_text(&[page_number])?;
            tables.push(page_text_to_table(
                &text,
                &mut header,
                self.text_column.as_deref(),
            )?);
        }
        Ok(tables)
    }
}

fn split_line(line: &str) -> Vec<&str> {
    let fields: Vec<&str> = COLUMN_GAP_REGEX.split(line.trim()).collect();
    if fields.len() > 1 {
        fields
    } else {
        line.split_whitespace().collect()
    }
}

/// Splits a row into exactly `width` cells.
///
/// Rows separated by tabs or wide gaps are taken as they are. Otherwise the
/// row is split on single whitespace; surplus tokens are joined into the
/// column at `text_index` (the last column by default), and missing trailing
/// fields are `Invalid`.
fn split_row(line: &str, width: usize, text_index: Option<usize>) -> Vec<Cell> {
    let gapped: Vec<&str> = COLUMN_GAP_REGEX.split(line.trim()).collect();
    if gapped.len() == width {
        return gapped.into_iter().map(field_cell).collect();
    }

    let tokens: Vec<&str> = line.split_whitespace().collect();
    let mut cells: Vec<Cell> = if tokens.len() > width {
        let at = text_index.unwrap_or(width - 1);
        let surplus = tokens.len() - width;
        let mut cells: Vec<Cell> = tokens[..at].iter().copied().map(field_cell).collect();
        cells.push(field_cell(&tokens[at..=at + surplus].join(" ")));
        cells.extend(tokens[at + surplus + 1..].iter().copied().map(field_cell));
        cells
    } else {
        tokens.into_iter().map(field_cell).collect()
    };
    cells.resize(width, Cell::Invalid);
    cells
}

/// Turns the extracted text of one PDF page into a table.
///
/// When `header` is empty the page's first line fills it. Lines equal to the
/// header are skipped, so pages that repeat it do not add a row.
///
/// # Errors
/// Returns `PipelineError::Data` if no header has been seen yet and the page
/// has no text, and `PipelineError::MissingColumn` if `text_column` is not a
/// header name.
pub fn page_text_to_table(
    text: &str,
    header: &mut Vec<String>,
    text_column: Option<&str>,
) -> Result<Table> {
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());
    if header.is_empty() {
        let first = lines
            .next()
            .ok_or_else(|| PipelineError::Data("PDF page has no header row".to_string()))?;
        *header = split_line(first).into_iter().map(str::to_string).collect();
    }

    let text_index = match text_column {
        Some(name) => Some(
            header
                .iter()
                .position(|column| column == name)
                .ok_or_else(|| PipelineError::missing_column(name))?,
        ),
        None => None,
    };

    let mut rows = Vec::new();
    for line in lines {
        if split_line(line) == *header {
            continue;
        }
        rows.push(split_row(line, header.len(), text_index));
    }
    if rows.is_empty() {
        warn!("PDF page has no data rows");
    }

    Table::from_rows(header.clone(), rows)
}

/// Reads every page of the PDF at `location` and stacks the pages into one table.
pub fn fetch_pdf_table(reader: &impl PdfTableReader, location: &str) -> Result<Table> {
    let pages = reader.read_pages(location)?;
    debug!("Read {} pages from {}", pages.len(), location);
    Ok(Table::concat(pages))
}

/// Bucket/key addressed object storage.
pub trait ObjectStore {
    fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>>;
}

/// Objects stored as files under `{root}/{bucket}/{key}`.
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self, bucket: &str, key: &str) -> PathBuf {
        self.root.join(bucket).join(key)
    }
}

impl ObjectStore for LocalObjectStore {
    fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let path = self.path(bucket, key);
        debug!("Reading object {}", path.display());
        Ok(fs::read(path)?)
    }
}

/// Objects fetched over HTTP from a URL template with `{bucket}` and `{key}`.
pub struct HttpObjectStore {
    client: Client,
    url_template: String,
}

impl HttpObjectStore {
    pub fn new(url_template: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url_template: url_template.into(),
        }
    }

    pub fn url(&self, bucket: &str, key: &str) -> String {
        self.url_template
            .replace("{bucket}", bucket)
            .replace("{key}", key)
    }
}

impl ObjectStore for HttpObjectStore {
    fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let url = self.url(bucket, key);
        debug!("Downloading object {}", url);
        let response = self.client.get(&url).send()?.error_for_status()?;
        Ok(response.bytes()?.to_vec())
    }
}

/// Downloads a CSV object and parses it into a table.
pub fn fetch_object(store: &dyn ObjectStore, bucket: &str, key: &str) -> Result<Table> {
    let bytes = store.get(bucket, key)?;
    read_csv(bytes.as_slice())
}

fn json_cell(value: Value) -> Cell {
    match value {
        Value::Null => Cell::Invalid,
        Value::String(text) => Cell::Text(text),
        other => Cell::Text(other.to_string()),
    }
}

/// Builds a table from JSON records.
///
/// Columns appear in order of first appearance across records; a record
/// without a field contributes `Invalid` to that column.
pub fn records_to_table(records: Vec<Map<String, Value>>) -> Result<Table> {
    let mut names: Vec<String> = Vec::new();
    for record in &records {
        for name in record.keys() {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
    }

    let rows = records
        .into_iter()
        .map(|mut record| {
            names
                .iter()
                .map(|name| record.remove(name).map_or(Cell::Invalid, json_cell))
                .collect()
        })
        .collect();

    Table::from_rows(names, rows)
}

/// Client for the paginated stores API.
pub struct StoreApi {
    client: Client,
    number_stores_url: String,
    store_details_url: String,
}

impl StoreApi {
    /// Builds a client sending `config.key` as `x-api-key` on every request.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&config.key)
            .map_err(|e| PipelineError::Data(format!("Invalid API key header: {}", e)))?;
        headers.insert("x-api-key", key);
        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            number_stores_url: config.number_stores_url.clone(),
            store_details_url: config.store_details_url.trim_end_matches('/').to_string(),
        })
    }

    fn get_json(&self, url: &str) -> Result<Value> {
        debug!("GET {}", url);
        Ok(self.client.get(url).send()?.error_for_status()?.json()?)
    }

    /// Reads the `number_stores` field of the count endpoint.
    pub fn fetch_store_count(&self) -> Result<usize> {
        let body = self.get_json(&self.number_stores_url)?;
        store_count(&body)
    }

    pub fn fetch_store(&self, index: usize) -> Result<Map<String, Value>> {
        let url = format!("{}/{}", self.store_details_url, index);
        match self.get_json(&url)? {
            Value::Object(record) => Ok(record),
            other => Err(PipelineError::Data(format!(
                "Store {} is not a JSON object: {}",
                index, other
            ))),
        }
    }

    /// Fetches stores `0..count` and gathers them into one table.
    pub fn fetch_stores(&self) -> Result<Table> {
        let count = self.fetch_store_count()?;
        debug!("Fetching {} stores", count);
        let records = (0..count)
            .map(|index| self.fetch_store(index))
            .collect::<Result<Vec<_>>>()?;
        records_to_table(records)
    }
}

fn store_count(body: &Value) -> Result<usize> {
    body.get("number_stores")
        .and_then(Value::as_u64)
        .map(|count| count as usize)
        .ok_or_else(|| PipelineError::Data(format!("Missing number_stores in {}", body)))
}

/// Downloads the date events document and turns it into a table.
pub fn fetch_date_events(client: &Client, endpoint: &str) -> Result<Table> {
    debug!("GET {}", endpoint);
    let body: Value = client.get(endpoint).send()?.error_for_status()?.json()?;
    date_events_from_json(body)
}

fn row_order(key: &str) -> (u8, u64, String) {
    match key.parse::<u64>() {
        Ok(position) => (0, position, String::new()),
        Err(_) => (1, 0, key.to_string()),
    }
}

/// Inverts `{field: {row: value}}` into columns.
///
/// Fields keep their document order. Rows are the union of row keys across
/// fields, numeric keys first in numeric order; a field missing a row gets
/// `Invalid` there.
pub fn date_events_from_json(body: Value) -> Result<Table> {
    let Value::Object(fields) = body else {
        return Err(PipelineError::Data(
            "Date events document is not a JSON object".to_string(),
        ));
    };

    let mut row_keys: Vec<String> = Vec::new();
    let mut field_maps = Vec::with_capacity(fields.len());
    for (name, values) in fields {
        let Value::Object(values) = values else {
            return Err(PipelineError::Data(format!(
                "Date events field {} is not a JSON object",
                name
            )));
        };
        for key in values.keys() {
            if !row_keys.contains(key) {
                row_keys.push(key.clone());
            }
        }
        field_maps.push((name, values));
    }
    row_keys.sort_by_key(|key| row_order(key));

    let columns = field_maps
        .into_iter()
        .map(|(name, mut values)| {
            let cells = row_keys
                .iter()
                .map(|key| values.remove(key).map_or(Cell::Invalid, json_cell))
                .collect();
            Column::new(name, cells)
        })
        .collect();

    Table::try_from_columns(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn csv_blank_header_becomes_unnamed() {
        let data = ",product_name,weight\n0,Tea,100g\n1,,2kg\n";
        let table = read_csv(data.as_bytes()).unwrap();
        assert_eq!(table.column_names(), vec!["Unnamed: 0", "product_name", "weight"]);
        assert_eq!(
            table.column("product_name").unwrap().cells,
            vec![Cell::text("Tea"), Cell::Invalid]
        );
    }

    #[test]
    fn csv_na_strings_become_invalid() {
        let data = "a,b\nN/A,x\nNaN,y\nNULL,z\nnan,NA\nkept,#N/A\n";
        let table = read_csv(data.as_bytes()).unwrap();
        assert_eq!(
            table.column("a").unwrap().cells,
            vec![
                Cell::Invalid,
                Cell::Invalid,
                Cell::Invalid,
                Cell::Invalid,
                Cell::text("kept"),
            ]
        );
        assert_eq!(table.column("b").unwrap().cells[3], Cell::Invalid);
        assert_eq!(table.column("b").unwrap().cells[4], Cell::Invalid);
        assert_eq!(field_cell(" N/A"), Cell::text(" N/A"));
    }

    const CARD_HEADER: &str = "card_number expiry_date card_provider date_payment_confirmed";

    #[test]
    fn page_text_rows_absorb_surplus_words() {
        let text = format!(
            "{}\n30060773296197 09/26 Diners Club / Carte Blanche 2015-11-25\n\n\
             4971858637664481 08/25 VISA 16 digit NULL\n",
            CARD_HEADER
        );
        let mut header = Vec::new();
        let table = page_text_to_table(&text, &mut header, Some("card_provider")).unwrap();

        assert_eq!(header.len(), 4);
        assert_eq!(table.num_rows(), 2);
        assert_eq!(
            table.column("card_provider").unwrap().cells,
            vec![
                Cell::text("Diners Club / Carte Blanche"),
                Cell::text("VISA 16 digit"),
            ]
        );
        assert_eq!(
            table.column("date_payment_confirmed").unwrap().cells,
            vec![Cell::text("2015-11-25"), Cell::Invalid]
        );
    }

    #[test]
    fn page_text_wide_gaps_separate_columns() {
        let text = "name  provider  year\nAnn Lee  Bank of Test  2001\nshort\n";
        let mut header = Vec::new();
        let table = page_text_to_table(text, &mut header, None).unwrap();

        assert_eq!(table.column_names(), vec!["name", "provider", "year"]);
        assert_eq!(
            table.column("provider").unwrap().cells,
            vec![Cell::text("Bank of Test"), Cell::Invalid]
        );
        assert_eq!(
            table.column("name").unwrap().cells,
            vec![Cell::text("Ann Lee"), Cell::text("short")]
        );
    }

    #[test]
    fn later_pages_reuse_and_skip_the_header() {
        let mut header = Vec::new();
        page_text_to_table(
            &format!("{}\n1111111111111 01/25 VISA 2001-01-01\n", CARD_HEADER),
            &mut header,
            Some("card_provider"),
        )
        .unwrap();

        let repeated = page_text_to_table(
            &format!("{}\n2222222222222 02/25 Maestro 2002-02-02\n", CARD_HEADER),
            &mut header,
            Some("card_provider"),
        )
        .unwrap();
        assert_eq!(repeated.num_rows(), 1);

        let bare = page_text_to_table(
            "3333333333333 03/25 JCB 15 digit 2003-03-03\n",
            &mut header,
            Some("card_provider"),
        )
        .unwrap();
        assert_eq!(bare.num_rows(), 1);
        assert_eq!(bare.column("card_provider").unwrap().cells[0], Cell::text("JCB 15 digit"));
    }

    #[test]
    fn unknown_text_column_is_an_error() {
        let mut header = Vec::new();
        let err = page_text_to_table("a b\n1 2\n", &mut header, Some("c")).unwrap_err();
        assert!(matches!(err, PipelineError::MissingColumn { ref column } if column == "c"));
    }

    fn write_pdf(path: &std::path::Path, pages: &[&[&str]]) {
        use lopdf::content::{Content, Operation};
        use lopdf::{Object, Stream, dictionary};

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for lines in pages {
            let mut operations = Vec::new();
            for (index, line) in lines.iter().enumerate() {
                operations.push(Operation::new("BT", vec![]));
                operations.push(Operation::new("Tf", vec!["F1".into(), 10.into()]));
                operations.push(Operation::new(
                    "Td",
                    vec![40.into(), (800 - 14 * index as i64).into()],
                ));
                operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
                operations.push(Operation::new("ET", vec![]));
            }
            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.save(path).unwrap();
    }

    #[test]
    fn pdf_pages_are_read_into_one_table() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("card_details.pdf");
        write_pdf(
            &path,
            &[
                &[CARD_HEADER, "30060773296197 09/26 Diners Club / Carte Blanche 2015-11-25"],
                &[CARD_HEADER, "349624180933183 10/23 American Express 2001-06-18"],
            ],
        );

        let reader = PdfDocument::new(Client::new()).with_text_column("card_provider");
        let table = fetch_pdf_table(&reader, &path.to_string_lossy()).unwrap();
        assert_eq!(table.num_rows(), 2);
        assert_eq!(
            table.column("card_number").unwrap().cells,
            vec![Cell::text("30060773296197"), Cell::text("349624180933183")]
        );
        assert_eq!(
            table.column("card_provider").unwrap().cells[1],
            Cell::text("American Express")
        );
    }

    #[test]
    fn date_events_are_inverted_into_columns() {
        let body = json!({
            "timestamp": {"0": "22:00:06", "1": "17:24:46", "10": "09:00:00", "2": "NULL"},
            "month": {"0": "9", "1": "2", "2": "4", "10": "1"},
            "year": {"0": "2012", "1": "1997", "2": "1994"},
        });

        let table = date_events_from_json(body).unwrap();
        assert_eq!(table.column_names(), vec!["timestamp", "month", "year"]);
        assert_eq!(table.num_rows(), 4);
        assert_eq!(
            table.column("timestamp").unwrap().cells,
            vec![
                Cell::text("22:00:06"),
                Cell::text("17:24:46"),
                Cell::text("NULL"),
                Cell::text("09:00:00"),
            ]
        );
        assert_eq!(table.column("year").unwrap().cells[3], Cell::Invalid);
    }

    #[test]
    fn date_events_must_be_an_object() {
        assert!(date_events_from_json(json!([1, 2])).is_err());
        assert!(date_events_from_json(json!({"year": 1})).is_err());
    }

    #[test]
    fn store_records_union_columns() {
        let records = vec![
            json!({"index": 0, "address": "N/A", "lat": null}),
            json!({"index": 1, "address": "1 High St", "staff_numbers": "12"}),
        ]
        .into_iter()
        .map(|value| match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        })
        .collect();

        let table = records_to_table(records).unwrap();
        assert_eq!(
            table.column_names(),
            vec!["index", "address", "lat", "staff_numbers"]
        );
        assert_eq!(
            table.column("index").unwrap().cells,
            vec![Cell::text("0"), Cell::text("1")]
        );
        assert_eq!(
            table.column("lat").unwrap().cells,
            vec![Cell::Invalid, Cell::Invalid]
        );
        assert_eq!(
            table.column("staff_numbers").unwrap().cells,
            vec![Cell::Invalid, Cell::text("12")]
        );
    }

    #[test]
    fn store_count_field() {
        assert_eq!(store_count(&json!({"statusCode": 200, "number_stores": 451})).unwrap(), 451);
        assert!(store_count(&json!({"statusCode": 200})).is_err());
    }

    #[test]
    fn http_object_url_template() {
        let store = HttpObjectStore::new("https://{bucket}.s3.eu-west-1.amazonaws.com/{key}");
        assert_eq!(
            store.url("data-handling-public", "products.csv"),
            "https://data-handling-public.s3.eu-west-1.amazonaws.com/products.csv"
        );
    }

    #[test]
    fn identifiers_are_quoted() {
        assert_eq!(quote_identifier("orders_table"), "\"orders_table\"");
        assert_eq!(quote_identifier("a\"b"), "\"a\"\"b\"");
    }
}
