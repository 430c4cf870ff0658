//! Chart data preparation
//!
//! The core does not render anything; it prepares an opaque handle with the
//! close-price line and range metadata, ready for whatever charting backend
//! the presentation layer uses.

use crate::prices::PriceSeries;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One point of the close-price line
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ChartPoint {
    pub timestamp: DateTime<Utc>,
    pub close: f64,
}

/// Opaque chart handle built from a price series' close column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartData {
    pub symbol: String,
    pub title: String,
    pub points: Vec<ChartPoint>,
    pub min_price: f64,
    pub max_price: f64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl ChartData {
    /// Build chart data from a price series; `None` when the series is
    /// empty.
    pub fn from_series(series: &PriceSeries) -> Option<Self> {
        if series.is_empty() {
            return None;
        }

        let points: Vec<ChartPoint> = series
            .rows()
            .iter()
            .map(|row| ChartPoint {
                timestamp: row.timestamp,
                close: row.close,
            })
            .collect();

        let min_price = points.iter().map(|p| p.close).fold(f64::INFINITY, f64::min);
        let max_price = points
            .iter()
            .map(|p| p.close)
            .fold(f64::NEG_INFINITY, f64::max);

        let title = format!(
            "{} 주가 추이 ({} ~ {})",
            series.symbol,
            series.start.format("%Y-%m-%d"),
            series.end.format("%Y-%m-%d")
        );

        Some(Self {
            symbol: series.symbol.clone(),
            title,
            points,
            min_price,
            max_price,
            start_date: series.start,
            end_date: series.end,
        })
    }
}
