use crate::columns::{
    clean_address, clean_card_number, clean_continent, clean_country_code, clean_dates,
    clean_day, clean_email, clean_latitude, clean_longitude, clean_month, clean_non_numeric,
    clean_phone_number, clean_staff_numbers, clean_store_type, clean_weight, clean_year,
    clear_nulls, replace_in_column,
};
use crate::error::Result;
use crate::structs::DatasetKind;
use crate::table::Table;
use crate::validators::PHONE_PREFIX_REGEX;
use log::debug;

const USER_COLUMNS: &[&str] = &[
    "date_of_birth",
    "email_address",
    "address",
    "join_date",
    "country_code",
    "phone_number",
    "first_name",
    "country",
];

const CARD_COLUMNS: &[&str] = &["card_number", "date_payment_confirmed"];

const PRODUCT_COLUMNS: &[&str] = &[
    "category",
    "product_price",
    "removed",
    "date_added",
    "weight",
    "Unnamed: 0",
];

const ORDER_DROPPED_COLUMNS: &[&str] = &["level_0", "first_name", "last_name", "1"];

const STORE_COLUMNS: &[&str] = &[
    "lat",
    "address",
    "longitude",
    "locality",
    "latitude",
    "store_code",
    "staff_numbers",
    "opening_date",
    "store_type",
    "continent",
    "country_code",
];

const DATE_EVENT_COLUMNS: &[&str] = &["timestamp", "year", "month", "day"];

/// Columns a raw dataset of `kind` must carry before it can be cleaned.
pub fn required_columns(kind: DatasetKind) -> &'static [&'static str] {
    match kind {
        DatasetKind::Users => USER_COLUMNS,
        DatasetKind::Cards => CARD_COLUMNS,
        DatasetKind::Stores => STORE_COLUMNS,
        DatasetKind::Products => PRODUCT_COLUMNS,
        DatasetKind::Orders => ORDER_DROPPED_COLUMNS,
        DatasetKind::DateEvents => DATE_EVENT_COLUMNS,
    }
}

/// Runs the cleaning recipe for `kind` on `table`.
///
/// # Errors
///
/// Returns `PipelineError::MissingColumn` if `table` lacks a column the
/// recipe touches. The table is not modified in that case.
pub fn clean(kind: DatasetKind, table: Table) -> Result<Table> {
    match kind {
        DatasetKind::Users => clean_users(table),
        DatasetKind::Cards => clean_cards(table),
        DatasetKind::Stores => clean_stores(table),
        DatasetKind::Products => clean_products(table),
        DatasetKind::Orders => clean_orders(table),
        DatasetKind::DateEvents => clean_date_events(table),
    }
}

fn compact(kind: DatasetKind, table: &mut Table) {
    let before = table.num_rows();
    let removed = table.compact();
    debug!(
        "Compacted {}: {} rows in, {} removed, {} kept",
        kind,
        before,
        removed,
        table.num_rows()
    );
}

/// Cleans the legacy users table.
///
/// Birth and join dates are parsed, e-mail addresses repaired and checked,
/// addresses flattened, phone prefixes rewritten, and `NULL` placeholders in
/// names and countries marked invalid.
pub fn clean_users(mut table: Table) -> Result<Table> {
    table.require_columns(USER_COLUMNS)?;
    debug!("Cleaning {} user rows", table.num_rows());

    clean_dates(&mut table, "date_of_birth")?;
    clean_email(&mut table)?;
    clean_address(&mut table)?;
    clean_dates(&mut table, "join_date")?;
    clean_country_code(&mut table)?;
    clean_phone_number(&mut table, &PHONE_PREFIX_REGEX)?;
    clear_nulls(&mut table, "first_name")?;
    clear_nulls(&mut table, "country")?;
    clear_nulls(&mut table, "country_code")?;

    compact(DatasetKind::Users, &mut table);
    Ok(table)
}

/// Cleans card details read from the PDF export.
pub fn clean_cards(mut table: Table) -> Result<Table> {
    table.require_columns(CARD_COLUMNS)?;
    debug!("Cleaning {} card rows", table.num_rows());

    clean_card_number(&mut table)?;
    clean_dates(&mut table, "date_payment_confirmed")?;

    compact(DatasetKind::Cards, &mut table);
    Ok(table)
}

/// Cleans the products CSV.
///
/// Rows are compacted once before weights are converted and again after the
/// CSV index column is dropped.
pub fn clean_products(mut table: Table) -> Result<Table> {
    table.require_columns(PRODUCT_COLUMNS)?;
    debug!("Cleaning {} product rows", table.num_rows());

    clean_non_numeric(&mut table, "category")?;
    replace_in_column(&mut table, "product_price", "£", "")?;
    clean_non_numeric(&mut table, "removed")?;
    clean_dates(&mut table, "date_added")?;
    compact(DatasetKind::Products, &mut table);

    clean_weight(&mut table)?;
    table.drop_columns(&["Unnamed: 0"])?;
    compact(DatasetKind::Products, &mut table);
    Ok(table)
}

/// Drops identifier columns that do not belong in the orders table.
///
/// No values are validated and no rows are removed.
pub fn clean_orders(mut table: Table) -> Result<Table> {
    table.drop_columns(ORDER_DROPPED_COLUMNS)?;
    debug!(
        "Projected orders to {} columns over {} rows",
        table.num_columns(),
        table.num_rows()
    );
    Ok(table)
}

/// Cleans store details gathered from the stores API.
pub fn clean_stores(mut table: Table) -> Result<Table> {
    table.require_columns(STORE_COLUMNS)?;
    debug!("Cleaning {} store rows", table.num_rows());

    table.drop_columns(&["lat"])?;
    clean_address(&mut table)?;
    clean_longitude(&mut table)?;
    clean_non_numeric(&mut table, "locality")?;
    clean_latitude(&mut table)?;
    clear_nulls(&mut table, "store_code")?;
    clean_staff_numbers(&mut table)?;
    clear_nulls(&mut table, "staff_numbers")?;
    clean_dates(&mut table, "opening_date")?;
    clean_store_type(&mut table)?;
    clean_continent(&mut table)?;
    clean_country_code(&mut table)?;

    compact(DatasetKind::Stores, &mut table);
    Ok(table)
}

/// Cleans sale timestamps and their year, month and day parts.
pub fn clean_date_events(mut table: Table) -> Result<Table> {
    table.require_columns(DATE_EVENT_COLUMNS)?;
    debug!("Cleaning {} date event rows", table.num_rows());

    clean_dates(&mut table, "timestamp")?;
    clean_year(&mut table)?;
    clean_month(&mut table)?;
    clean_day(&mut table)?;

    compact(DatasetKind::DateEvents, &mut table);
    Ok(table)
}
