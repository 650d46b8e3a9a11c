// src/market/table.rs
use std::collections::BTreeSet;
use std::fmt;

use time::{Date, Month};

/// Price fields in the order the column index lists them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    AdjClose,
    Close,
    High,
    Low,
    Open,
    Volume,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::AdjClose,
        Field::Close,
        Field::High,
        Field::Low,
        Field::Open,
        Field::Volume,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Field::AdjClose => "Adj Close",
            Field::Close => "Close",
            Field::High => "High",
            Field::Low => "Low",
            Field::Open => "Open",
            Field::Volume => "Volume",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One trading day for one ticker. Missing values stay `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bar {
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub adj_close: Option<f64>,
    pub volume: Option<f64>,
}

impl Bar {
    pub fn get(&self, field: Field) -> Option<f64> {
        match field {
            Field::AdjClose => self.adj_close,
            Field::Close => self.close,
            Field::High => self.high,
            Field::Low => self.low,
            Field::Open => self.open,
            Field::Volume => self.volume,
        }
    }
}

/// Downloaded history of a single ticker.
#[derive(Debug, Clone, Default)]
pub struct PriceSeries {
    pub ticker: String,
    pub bars: Vec<(Date, Bar)>,
}

/// Prices of several tickers aligned on the union of their trading days.
#[derive(Debug, Clone, Default)]
pub struct PriceTable {
    dates: Vec<Date>,
    tickers: Vec<String>,
    // cells[ticker][date]
    cells: Vec<Vec<Option<Bar>>>,
}

impl PriceTable {
    pub fn from_series(series: Vec<PriceSeries>) -> Self {
        let dates: Vec<Date> = series
            .iter()
            .flat_map(|s| s.bars.iter().map(|(d, _)| *d))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut tickers: Vec<String> = Vec::new();
        let mut cells: Vec<Vec<Option<Bar>>> = Vec::new();
        for s in series {
            let idx = match tickers.iter().position(|t| *t == s.ticker) {
                Some(i) => i,
                None => {
                    tickers.push(s.ticker.clone());
                    cells.push(vec![None; dates.len()]);
                    tickers.len() - 1
                }
            };
            for (date, bar) in s.bars {
                if let Ok(pos) = dates.binary_search(&date) {
                    cells[idx][pos] = Some(bar);
                }
            }
        }

        Self { dates, tickers, cells }
    }

    pub fn dates(&self) -> &[Date] { &self.dates }

    pub fn tickers(&self) -> &[String] { &self.tickers }

    /// Number of rows (trading days).
    pub fn len(&self) -> usize { self.dates.len() }

    pub fn is_empty(&self) -> bool { self.dates.is_empty() }

    /// The (field, ticker) column index.
    pub fn columns(&self) -> Vec<(Field, &str)> {
        Field::ALL
            .iter()
            .flat_map(|f| self.tickers.iter().map(move |t| (*f, t.as_str())))
            .collect()
    }

    pub fn column(&self, field: Field, ticker: &str) -> Option<Vec<Option<f64>>> {
        let idx = self.tickers.iter().position(|t| t == ticker)?;
        Some(self.cells[idx].iter().map(|c| c.and_then(|b| b.get(field))).collect())
    }

    /// Calendar-month means of `field`, one row per month from the first to
    /// the last trading day. Months without a value hold `None`.
    pub fn monthly_means(&self, field: Field) -> (Vec<Date>, Vec<Vec<Option<f64>>>) {
        let (Some(first), Some(last)) = (self.dates.first(), self.dates.last()) else {
            return (Vec::new(), Vec::new());
        };

        let mut periods = Vec::new();
        let mut rows = Vec::new();
        let (mut year, mut month) = (first.year(), first.month());
        loop {
            if let Some(end) = month_end(year, month) {
                let in_month: Vec<usize> = self
                    .dates
                    .iter()
                    .enumerate()
                    .filter(|(_, d)| d.year() == year && d.month() == month)
                    .map(|(i, _)| i)
                    .collect();
                let row = self
                    .cells
                    .iter()
                    .map(|col| {
                        let vals: Vec<f64> = in_month
                            .iter()
                            .filter_map(|&i| col[i].and_then(|b| b.get(field)))
                            .filter(|v| v.is_finite())
                            .collect();
                        if vals.is_empty() { None } else { Some(mean(&vals)) }
                    })
                    .collect();
                periods.push(end);
                rows.push(row);
            }
            if (year, month) == (last.year(), last.month()) {
                break;
            }
            if month == Month::December {
                year += 1;
            }
            month = month.next();
        }
        (periods, rows)
    }

    /// Month-over-month percent change of monthly mean adjusted closes.
    /// Rows with any missing value are dropped, so the first month never
    /// appears.
    pub fn monthly_returns(&self) -> ReturnsTable {
        let (periods, means) = self.monthly_means(Field::AdjClose);

        let mut out = ReturnsTable { tickers: self.tickers.clone(), ..Default::default() };
        for i in 1..means.len() {
            let row: Option<Vec<f64>> = means[i]
                .iter()
                .zip(&means[i - 1])
                .map(|(cur, prev)| match (cur, prev) {
                    (Some(c), Some(p)) if *p != 0.0 => Some(c / p - 1.0),
                    _ => None,
                })
                .collect();
            if let Some(row) = row {
                out.periods.push(periods[i]);
                out.rows.push(row);
            }
        }
        out
    }
}

fn month_end(year: i32, month: Month) -> Option<Date> {
    let (ny, nm) = if month == Month::December { (year + 1, Month::January) } else { (year, month.next()) };
    Date::from_calendar_date(ny, nm, 1).ok()?.previous_day()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReturnsTable {
    pub periods: Vec<Date>,
    pub tickers: Vec<String>,
    // rows[period][ticker]
    pub rows: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStats {
    pub ticker: String,
    pub mean: f64,
    /// Sample standard deviation (n - 1).
    pub std: f64,
}

impl ReturnsTable {
    pub fn is_empty(&self) -> bool { self.rows.is_empty() }

    pub fn stats(&self) -> Vec<ReturnStats> {
        self.tickers
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let vals: Vec<f64> = self.rows.iter().map(|r| r[i]).collect();
                ReturnStats { ticker: t.clone(), mean: mean(&vals), std: sample_std(&vals) }
            })
            .collect()
    }
}

fn mean(vals: &[f64]) -> f64 {
    if vals.is_empty() {
        return f64::NAN;
    }
    vals.iter().sum::<f64>() / vals.len() as f64
}

fn sample_std(vals: &[f64]) -> f64 {
    if vals.len() < 2 {
        return f64::NAN;
    }
    let m = mean(vals);
    let var = vals.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (vals.len() - 1) as f64;
    var.sqrt()
}
