//! Column cleaners.
//!
//! Each cleaner runs one or more field validators over a named column and
//! writes the results back in place. A missing column is an error; a bad
//! value never is.

use crate::error::Result;
use crate::table::{Cell, Table};
use crate::validators;
use log::debug;
use regex::Regex;

/// Applies `rule` to every text cell of `column`.
///
/// # Errors
/// Returns `PipelineError::MissingColumn` if the table has no such column.
pub fn apply_rule<F>(table: &mut Table, column: &str, rule: F) -> Result<()>
where
    F: Fn(&str) -> Cell,
{
    let target = table.column_mut(column)?;
    let before = target.invalid_count();
    target.map_text(rule);
    let marked = target.invalid_count() - before;
    if marked > 0 {
        debug!("Marked {} invalid values in column {}", marked, column);
    }
    Ok(())
}

/// Parses every text cell of `column` as a date, date-time or time.
pub fn clean_dates(table: &mut Table, column: &str) -> Result<()> {
    apply_rule(table, column, validators::parse_date)
}

pub fn clear_nulls(table: &mut Table, column: &str) -> Result<()> {
    apply_rule(table, column, validators::clear_null)
}

pub fn replace_in_column(table: &mut Table, column: &str, from: &str, to: &str) -> Result<()> {
    apply_rule(table, column, |value| validators::replace_text(value, from, to))
}

/// Marks values holding more than one digit in a column meant to be plain text.
pub fn clean_non_numeric(table: &mut Table, column: &str) -> Result<()> {
    apply_rule(table, column, validators::check_non_numeric)
}

pub fn clean_email(table: &mut Table) -> Result<()> {
    apply_rule(table, "email_address", validators::check_email)
}

/// Joins multi-line addresses into one line.
pub fn clean_address(table: &mut Table) -> Result<()> {
    replace_in_column(table, "address", "\n", " ")
}

pub fn clean_longitude(table: &mut Table) -> Result<()> {
    apply_rule(table, "longitude", validators::check_longitude)
}

pub fn clean_latitude(table: &mut Table) -> Result<()> {
    apply_rule(table, "latitude", validators::check_latitude)
}

pub fn clean_card_number(table: &mut Table) -> Result<()> {
    apply_rule(table, "card_number", validators::check_card_number)
}

pub fn clean_phone_number(table: &mut Table, prefix: &Regex) -> Result<()> {
    apply_rule(table, "phone_number", |value| {
        validators::normalize_phone_prefix(value, prefix)
    })
}

/// Converts weights to kilograms, then rejects anything not shaped like a weight.
pub fn clean_weight(table: &mut Table) -> Result<()> {
    apply_rule(table, "weight", validators::convert_to_kg)?;
    apply_rule(table, "weight", validators::check_weight_format)
}

pub fn clean_year(table: &mut Table) -> Result<()> {
    apply_rule(table, "year", validators::check_year)
}

pub fn clean_month(table: &mut Table) -> Result<()> {
    apply_rule(table, "month", validators::check_month)
}

pub fn clean_day(table: &mut Table) -> Result<()> {
    apply_rule(table, "day", validators::check_day)
}

pub fn clean_store_type(table: &mut Table) -> Result<()> {
    apply_rule(table, "store_type", validators::check_store_type)
}

pub fn clean_staff_numbers(table: &mut Table) -> Result<()> {
    apply_rule(table, "staff_numbers", validators::strip_staff_letters)
}

/// Removes the stray `ee` prefix from continent names.
pub fn clean_continent(table: &mut Table) -> Result<()> {
    replace_in_column(table, "continent", "ee", "")
}

pub fn clean_country_code(table: &mut Table) -> Result<()> {
    replace_in_column(table, "country_code", "GG", "G")
}
