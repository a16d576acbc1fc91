//! Loading the Brent `Date,Price` CSV into an [`ObservedSeries`].

use crate::core::{Cadence, ObservedSeries};
use crate::error::{AnalysisError, Result};
use chrono::NaiveDate;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::info;

/// Date layouts found in the published Brent price files.
const DATE_FORMATS: [&str; 4] = ["%d-%b-%y", "%b %d, %Y", "%Y-%m-%d", "%d-%b-%Y"];

/// Parse a date in any of the accepted layouts (`20-May-87`,
/// `Apr 22, 2020`, `2020-04-22`).
pub fn parse_date(text: &str) -> Result<NaiveDate> {
    let text = text.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .ok_or_else(|| AnalysisError::Parse(format!("unrecognized date '{text}'")))
}

/// Load a price CSV from disk.
///
/// See [`read_price_csv`] for the accepted layout.
pub fn load_price_csv<P: AsRef<Path>>(path: P, cadence: Cadence) -> Result<ObservedSeries> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let series = read_price_csv(BufReader::new(file), cadence)?;
    info!(
        path = %path.display(),
        observations = series.len(),
        first = ?series.first_date(),
        last = ?series.last_date(),
        "price series loaded"
    );
    Ok(series)
}

/// Read a CSV with `Date` and `Price` columns (header names are
/// case-insensitive, other columns are ignored).
///
/// Rows are sorted by date before the series is built, so the usual
/// validation applies: duplicate dates fail with `Timestamp`, an empty or
/// non-finite price with `MissingValues`, and gaps beyond the cadence with
/// `MissingDates`.
pub fn read_price_csv<R: Read>(reader: R, cadence: Cadence) -> Result<ObservedSeries> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or_else(|| AnalysisError::Parse(format!("missing '{name}' column")))
    };
    let (date_col, price_col) = (column("Date")?, column("Price")?);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let date = parse_date(record.get(date_col).unwrap_or_default())?;
        let price = match record.get(price_col).unwrap_or_default() {
            "" => return Err(AnalysisError::MissingValues),
            text => text
                .parse::<f64>()
                .map_err(|e| AnalysisError::Parse(format!("price '{text}' on {date}: {e}")))?,
        };
        rows.push((date, price));
    }
    if rows.is_empty() {
        return Err(AnalysisError::EmptyData);
    }

    rows.sort_by_key(|&(date, _)| date);
    let (dates, values): (Vec<_>, Vec<_>) = rows.into_iter().unzip();
    ObservedSeries::with_cadence(dates, values, cadence)
}
