//! Historical price retrieval

use crate::error::{AdvisorError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use yahoo_finance_api as yahoo;

/// One daily price observation
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Ohlcv {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// An ordered series of daily price observations for one ticker.
///
/// Dates are strictly increasing. An empty series signals "no data for the
/// requested range" rather than an error; the caller decides what that
/// means.
#[derive(Debug, Clone)]
pub struct PriceSeries {
    pub symbol: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    rows: Vec<Ohlcv>,
}

impl PriceSeries {
    /// Construct a series, sorting rows by date and dropping duplicate
    /// timestamps to uphold the strictly-increasing invariant.
    pub fn new(
        symbol: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        mut rows: Vec<Ohlcv>,
    ) -> Self {
        rows.sort_by_key(|row| row.timestamp);
        rows.dedup_by_key(|row| row.timestamp);
        Self {
            symbol: symbol.into(),
            start,
            end,
            rows,
        }
    }

    /// All observations, ascending by date
    pub fn rows(&self) -> &[Ohlcv] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Closing prices, ascending by date
    pub fn closes(&self) -> Vec<f64> {
        self.rows.iter().map(|row| row.close).collect()
    }

    /// The most recent `n` observations
    pub fn tail(&self, n: usize) -> &[Ohlcv] {
        let skip = self.rows.len().saturating_sub(n);
        &self.rows[skip..]
    }

    /// Render the most recent `n` observations as a fixed-width table for
    /// use inside a prompt.
    pub fn tail_table(&self, n: usize) -> String {
        let mut table = format!(
            "{:<12} {:>10} {:>10} {:>10} {:>10} {:>12}\n",
            "Date", "Open", "High", "Low", "Close", "Volume"
        );
        for row in self.tail(n) {
            table.push_str(&format!(
                "{:<12} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>12}\n",
                row.timestamp.format("%Y-%m-%d"),
                row.open,
                row.high,
                row.low,
                row.close,
                row.volume
            ));
        }
        table
    }
}

/// Trait seam over the historical price data source
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Fetch daily observations for `symbol` over `[start, end]`.
    ///
    /// Returns an empty series when the source has no data for the range.
    async fn fetch(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<PriceSeries>;
}

/// Yahoo Finance price source
#[derive(Debug, Clone, Default)]
pub struct YahooPriceSource {}

impl YahooPriceSource {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl PriceSource for YahooPriceSource {
    async fn fetch(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<PriceSeries> {
        let provider = yahoo::YahooConnector::new()
            .map_err(|e| AdvisorError::Provider(format!("Yahoo Finance error: {e}")))?;

        // Convert chrono DateTime to time OffsetDateTime
        let start_odt = OffsetDateTime::from_unix_timestamp(start.timestamp())
            .map_err(|e| AdvisorError::Provider(format!("Invalid start timestamp: {e}")))?;
        let end_odt = OffsetDateTime::from_unix_timestamp(end.timestamp())
            .map_err(|e| AdvisorError::Provider(format!("Invalid end timestamp: {e}")))?;

        let response = provider
            .get_quote_history(symbol, start_odt, end_odt)
            .await
            .map_err(|e| AdvisorError::Provider(format!("Yahoo Finance error: {e}")))?;

        let quotes = response
            .quotes()
            .map_err(|e| AdvisorError::Provider(format!("Yahoo Finance error: {e}")))?;

        let rows = quotes
            .iter()
            .map(|q| Ohlcv {
                timestamp: DateTime::from_timestamp(q.timestamp as i64, 0).unwrap_or_else(Utc::now),
                open: q.open,
                high: q.high,
                low: q.low,
                close: q.close,
                volume: q.volume,
            })
            .collect();

        Ok(PriceSeries::new(symbol, start, end, rows))
    }
}
