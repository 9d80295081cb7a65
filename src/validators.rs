//! Field validators.
//!
//! Every function here takes a single raw value and returns either the
//! normalised value or [`Cell::Invalid`]. None of them fail: malformed input
//! always ends up as a value or the marker.

use crate::table::Cell;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use std::sync::LazyLock;

/// Country prefixes rewritten in UK, German and North American numbers.
pub const PHONE_PREFIX_PATTERN: &str = r"\+44\(0\)|\+1|\+49\(0\)";

/// Kilograms per avoirdupois ounce.
const OUNCE_IN_KG: f64 = 0.0283495;

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y %B %d",
    "%B %Y %d",
    "%d %B %Y",
    "%B %d %Y",
    "%B %d, %Y",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%Y.%m.%d",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M"];

static LONGITUDE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\+|-)?(?:180(?:(?:\.0{1,6})?)|(?:[0-9]|[1-9][0-9]|1[0-7][0-9])(?:(?:\.[0-9]{1,6})?))$",
    )
    .expect("Invalid longitude regex")
});

static LATITUDE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\+|-)?(?:90(?:(?:\.0{1,6})?)|(?:[0-9]|[1-8][0-9])(?:(?:\.[0-9]{1,6})?))$")
        .expect("Invalid latitude regex")
});

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^[\w!#$%&'*+/=?`{|}~^-]+(?:\.[\w!#$%&'*+/=?`{|}~^-]+)*@(?:[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?\.)+[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?$"#,
    )
    .expect("Invalid email regex")
});

/// Default regex for [`normalize_phone_prefix`].
pub static PHONE_PREFIX_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PHONE_PREFIX_PATTERN).expect("Invalid phone prefix regex"));

static MULTIPACK_WEIGHT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d+\s*x\s*\d+(g|kg|ml|oz)").expect("Invalid multipack weight regex")
});

static WEIGHT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(g|kg|ml|oz)").expect("Invalid weight regex"));

static STORE_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9]{10}$").expect("Invalid store code regex"));

static LETTER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-zA-Z]").expect("Invalid letter regex"));

/// Parses a free-text date, date-time or time of day.
///
/// Formats are tried in order: date-times (including RFC 3339), dates, then
/// bare times. Month names may be full or abbreviated.
pub fn parse_date(value: &str) -> Cell {
    let value = value.trim();

    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Cell::DateTime(datetime.naive_utc());
    }
    if let Some(datetime) = DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
    {
        return Cell::DateTime(datetime);
    }
    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
    {
        return Cell::Date(date);
    }
    if let Some(time) = TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(value, format).ok())
    {
        return Cell::Time(time);
    }

    Cell::Invalid
}

fn keep_if(value: &str, valid: bool) -> Cell {
    if valid {
        Cell::text(value)
    } else {
        Cell::Invalid
    }
}

/// Decimal degrees in [-180, 180] with at most six fractional digits.
pub fn check_longitude(value: &str) -> Cell {
    keep_if(value, LONGITUDE_REGEX.is_match(value))
}

/// Decimal degrees in [-90, 90] with at most six fractional digits.
pub fn check_latitude(value: &str) -> Cell {
    keep_if(value, LATITUDE_REGEX.is_match(value))
}

/// Repairs a doubled `@@` and checks the address shape.
pub fn check_email(value: &str) -> Cell {
    let email = value.replace("@@", "@");
    if EMAIL_REGEX.is_match(&email) {
        Cell::Text(email)
    } else {
        Cell::Invalid
    }
}

/// Rejects card numbers printed with ten characters or fewer.
pub fn check_card_number(value: &str) -> Cell {
    keep_if(value, value.chars().count() > 10)
}

/// Rewrites an international prefix to its trunk digit and strips punctuation.
///
/// Numbers starting with `+44` or `+49` have every `prefix` match replaced by
/// `0`; numbers starting with `+1` by `1`. Parentheses, periods and spaces are
/// then removed from the whole number.
pub fn normalize_phone_prefix(value: &str, prefix: &Regex) -> Cell {
    let matched = prefix.is_match(value);
    let rewritten = if matched && (value.starts_with("+44") || value.starts_with("+49")) {
        prefix.replace_all(value, "0").into_owned()
    } else if matched && value.starts_with("+1") {
        prefix.replace_all(value, "1").into_owned()
    } else {
        value.to_string()
    };

    Cell::Text(
        rewritten
            .chars()
            .filter(|c| !matches!(c, '(' | ')' | '.' | ' '))
            .collect(),
    )
}

fn parse_number(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
}

fn multipack_kg(value: &str) -> Option<f64> {
    let mut parts = value.split('x');
    let (count, each) = match (parts.next(), parts.next(), parts.next()) {
        (Some(count), Some(each), None) => (count, each),
        _ => return None,
    };
    let count = parse_number(count)?;
    let each = parse_number(&each.replace('.', "").replace('g', ""))?;
    Some(count * each / 1000.0)
}

/// Converts a weight with a unit suffix to kilograms, formatted as `<number>kg`.
///
/// Gram and ounce values have every period removed before conversion, so
/// `"1.000g"` reads as 1000 grams. Millilitres convert one to one with grams.
/// Values already in `kg` are returned unchanged; values with no known unit
/// become `0kg`.
pub fn convert_to_kg(value: &str) -> Cell {
    if value.contains("kg") {
        return Cell::text(value);
    }

    let kilograms = if value.contains("ml") {
        parse_number(&value.replace("ml", "")).map(|ml| ml / 1000.0)
    } else if value.contains('x') && value.contains('g') {
        multipack_kg(value)
    } else if value.contains('g') && !value.contains('k') {
        parse_number(&value.replace('g', "").replace('.', "")).map(|g| g / 1000.0)
    } else if value.contains("oz") {
        parse_number(&value.replace("oz", "").replace('.', "")).map(|oz| oz * OUNCE_IN_KG)
    } else {
        Some(0.0)
    };

    match kilograms {
        Some(kg) => Cell::Text(format!("{}kg", kg)),
        None => Cell::Invalid,
    }
}

/// Accepts `<n><unit>` or `<n> x <m><unit>` anywhere in the value.
pub fn check_weight_format(value: &str) -> Cell {
    keep_if(
        value,
        MULTIPACK_WEIGHT_REGEX.is_match(value) || WEIGHT_REGEX.is_match(value),
    )
}

pub fn check_year(value: &str) -> Cell {
    keep_if(value, value.chars().count() == 4)
}

pub fn check_month(value: &str) -> Cell {
    let valid = !value.is_empty()
        && value.chars().all(|c| c.is_ascii_digit())
        && value.parse::<u64>().is_ok_and(|month| month <= 12);
    keep_if(value, valid)
}

pub fn check_day(value: &str) -> Cell {
    keep_if(value, value.trim().parse::<i64>().is_ok_and(|day| day <= 31))
}

/// Rejects ten-character store codes that leaked into the type column, and
/// the `NULL`/`N/A` placeholders.
pub fn check_store_type(value: &str) -> Cell {
    if STORE_CODE_REGEX.is_match(value) {
        return Cell::Invalid;
    }
    clear_null(value)
}

/// Rejects text containing more than one digit.
pub fn check_non_numeric(value: &str) -> Cell {
    keep_if(value, value.chars().filter(char::is_ascii_digit).count() <= 1)
}

/// Blanks out letters in a staff count; four blanks in a row become `NULL`.
pub fn strip_staff_letters(value: &str) -> Cell {
    Cell::Text(LETTER_REGEX.replace_all(value, " ").replace("    ", "NULL"))
}

/// Turns the literal `NULL` and `N/A` placeholders into the marker.
pub fn clear_null(value: &str) -> Cell {
    keep_if(value, !matches!(value, "NULL" | "N/A"))
}

pub fn replace_text(value: &str, from: &str, to: &str) -> Cell {
    Cell::Text(value.replace(from, to))
}
