//! Market data collaborators: download, query files, tables and export.

pub mod export;
pub mod query_file;
pub mod table;
pub mod yahoo;

use time::macros::format_description;
use time::Date;

pub use table::{Bar, Field, PriceSeries, PriceTable, ReturnStats, ReturnsTable};
pub use yahoo::{download, Download, FetchError, PriceSource, YahooSource};

/// Parse `YYYY-MM-DD`.
pub fn parse_date(s: &str) -> Result<Date, time::error::Parse> {
    Date::parse(s.trim(), format_description!("[year]-[month]-[day]"))
}

/// Split free-form ticker input on whitespace and commas. Duplicates are
/// dropped, first occurrence wins.
pub fn parse_tickers(s: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for t in s.split(|c: char| c.is_whitespace() || c == ',') {
        let t = t.trim().to_uppercase();
        if !t.is_empty() && !out.contains(&t) {
            out.push(t);
        }
    }
    out
}

/// A validated download request. The end date is exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceRequest {
    pub tickers: Vec<String>,
    pub start: Date,
    pub end: Date,
}

impl PriceRequest {
    pub fn new(tickers: Vec<String>, start: Date, end: Date) -> Result<Self, FetchError> {
        if tickers.is_empty() {
            return Err(FetchError::NoTickers);
        }
        if start >= end {
            return Err(FetchError::InvalidRange { start, end });
        }
        Ok(Self { tickers, start, end })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn tickers_collapse_separators() {
        assert_eq!(parse_tickers("  aapl   msft,spy  AAPL "), vec!["AAPL", "MSFT", "SPY"]);
        assert!(parse_tickers("   ").is_empty());
    }

    #[test]
    fn dates_parse_iso() {
        assert_eq!(parse_date("2024-02-29").unwrap(), date!(2024 - 02 - 29));
        assert!(parse_date("2023-02-29").is_err());
        assert!(parse_date("02/01/2024").is_err());
    }

    #[test]
    fn request_rejects_empty_and_backwards() {
        let (a, b) = (date!(2024 - 01 - 01), date!(2024 - 06 - 01));
        assert!(matches!(PriceRequest::new(vec![], a, b), Err(FetchError::NoTickers)));
        assert!(matches!(
            PriceRequest::new(vec!["SPY".into()], b, a),
            Err(FetchError::InvalidRange { .. })
        ));
        assert!(PriceRequest::new(vec!["SPY".into()], a, b).is_ok());
    }
}
