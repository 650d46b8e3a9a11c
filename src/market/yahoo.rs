//! Yahoo Finance v8 chart API.
//!
//! One request per ticker; the results are merged into a [`PriceTable`].
//! Tickers that fail are reported back to the caller instead of aborting
//! the whole download, unless nothing at all could be fetched.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use thiserror::Error;
use time::{Date, OffsetDateTime};
use tracing::{debug, info, warn};

use crate::defaults::Defaults;
use crate::market::table::{Bar, PriceSeries, PriceTable};
use crate::market::PriceRequest;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("no tickers given")]
    NoTickers,
    #[error("invalid date range: {start} is not before {end}")]
    InvalidRange { start: Date, end: Date },
    #[error("invalid chart url '{0}'")]
    BaseUrl(String),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{ticker}: HTTP {status}")]
    Status { ticker: String, status: u16 },
    #[error("{ticker}: {code} - {description}")]
    Api { ticker: String, code: String, description: String },
    #[error("{ticker}: could not parse response: {source}")]
    Parse { ticker: String, source: serde_json::Error },
    #[error("{0}: no price data returned")]
    Empty(String),
    #[error("no data could be downloaded for {0}")]
    NoData(String),
}

/// Anything that can deliver the daily history of one ticker.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch_series(&self, ticker: &str, start: Date, end: Date) -> Result<PriceSeries, FetchError>;
}

/// Table plus the tickers that could not be fetched.
#[derive(Debug)]
pub struct Download {
    pub table: PriceTable,
    pub failed: Vec<(String, FetchError)>,
}

pub async fn download(source: &dyn PriceSource, request: &PriceRequest) -> Result<Download, FetchError> {
    info!(tickers = ?request.tickers, start = %request.start, end = %request.end, "downloading prices");

    let mut series = Vec::with_capacity(request.tickers.len());
    let mut failed = Vec::new();
    for ticker in &request.tickers {
        match source.fetch_series(ticker, request.start, request.end).await {
            Ok(s) if !s.bars.is_empty() => series.push(s),
            Ok(_) => failed.push((ticker.clone(), FetchError::Empty(ticker.clone()))),
            Err(e) => {
                warn!(ticker = %ticker, "fetch failed: {e}");
                failed.push((ticker.clone(), e));
            }
        }
    }

    if series.is_empty() {
        return Err(FetchError::NoData(request.tickers.join(" ")));
    }
    let table = PriceTable::from_series(series);
    info!(rows = table.len(), failed = failed.len(), "download complete");
    Ok(Download { table, failed })
}

#[derive(Debug, Clone)]
pub struct YahooSource {
    client: Client,
    base_url: Url,
}

impl YahooSource {
    pub fn new() -> Result<Self, FetchError> {
        Self::with_base_url(Defaults::YAHOO_CHART_URL)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self, FetchError> {
        let base_url = Url::parse(base_url).map_err(|e| FetchError::BaseUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(FetchError::BaseUrl(base_url.into()));
        }
        let client = Client::builder()
            .user_agent(Defaults::USER_AGENT)
            .timeout(Duration::from_secs(Defaults::HTTP_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client, base_url })
    }

    /// `<base>/<ticker>`, with the ticker escaped as a single path segment.
    fn chart_url(&self, ticker: &str) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::BaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push(ticker);
        Ok(url)
    }
}

#[async_trait]
impl PriceSource for YahooSource {
    async fn fetch_series(&self, ticker: &str, start: Date, end: Date) -> Result<PriceSeries, FetchError> {
        let period1 = start.midnight().assume_utc().unix_timestamp();
        let period2 = end.midnight().assume_utc().unix_timestamp();
        let url = self.chart_url(ticker)?;
        debug!(%url, period1, period2, "fetching chart");

        let response = self
            .client
            .get(url)
            .query(&[
                ("period1", period1.to_string()),
                ("period2", period2.to_string()),
                ("interval", "1d".to_string()),
                ("events", "history".to_string()),
                ("includeAdjustedClose", "true".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(ticker, %status, bytes = body.len(), "chart response");

        // Yahoo reports unknown symbols as 404 with a chart.error payload.
        match parse_chart(ticker, &body) {
            Err(FetchError::Parse { .. }) if !status.is_success() => {
                Err(FetchError::Status { ticker: ticker.to_string(), status: status.as_u16() })
            }
            other => other,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: Option<ChartMeta>,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteBlock>,
    adjclose: Option<Vec<AdjCloseBlock>>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteBlock {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
    volume: Option<Vec<Option<f64>>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseBlock {
    adjclose: Option<Vec<Option<f64>>>,
}

fn at(v: &Option<Vec<Option<f64>>>, i: usize) -> Option<f64> {
    v.as_ref().and_then(|v| v.get(i).copied().flatten())
}

/// Turn a chart response body into a series. Timestamps are shifted by the
/// exchange offset so each bar lands on its local trading day.
pub(crate) fn parse_chart(ticker: &str, body: &str) -> Result<PriceSeries, FetchError> {
    let response: ChartResponse = serde_json::from_str(body)
        .map_err(|source| FetchError::Parse { ticker: ticker.to_string(), source })?;

    if let Some(err) = response.chart.error {
        return Err(FetchError::Api {
            ticker: ticker.to_string(),
            code: err.code,
            description: err.description,
        });
    }

    let result = response
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| FetchError::Empty(ticker.to_string()))?;

    let offset = result.meta.as_ref().and_then(|m| m.gmtoffset).unwrap_or(0);
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let adj = result
        .indicators
        .adjclose
        .and_then(|a| a.into_iter().next())
        .and_then(|a| a.adjclose);

    let mut bars: Vec<(Date, Bar)> = Vec::new();
    for (i, ts) in result.timestamp.unwrap_or_default().into_iter().enumerate() {
        let Ok(dt) = OffsetDateTime::from_unix_timestamp(ts + offset) else {
            continue;
        };
        let bar = Bar {
            open: at(&quote.open, i),
            high: at(&quote.high, i),
            low: at(&quote.low, i),
            close: at(&quote.close, i),
            adj_close: at(&adj, i).or_else(|| at(&quote.close, i)),
            volume: at(&quote.volume, i),
        };
        bars.push((dt.date(), bar));
    }
    bars.sort_by_key(|(d, _)| *d);
    bars.dedup_by_key(|(d, _)| *d);

    Ok(PriceSeries { ticker: ticker.to_string(), bars })
}
