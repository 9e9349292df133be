//! Trend projection over daily sales.
//!
//! The projection algorithm sits behind [`TrendModel`]; [`LinearTrend`] is
//! the built-in implementation.

mod linear;
pub mod utility;

pub use linear::{DEFAULT_INTERVAL_WIDTH, LinearTrend};

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

use crate::error::Result;
use crate::record::SalesTable;

/// One observed `(date, value)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Projected value with its uncertainty band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub yhat: f64,
    pub yhat_lower: f64,
    pub yhat_upper: f64,
}

pub trait TrendModel {
    /// Returns a point for every observed date plus one per day for
    /// `horizon_days` after the last one. `history` must be chronological.
    fn project(&self, history: &[SeriesPoint], horizon_days: u32) -> Result<Vec<ForecastPoint>>;
}

/// Daily `TotalPrice` sums in chronological order.
pub fn daily_series(table: &SalesTable) -> Vec<SeriesPoint> {
    let mut days: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for r in table {
        *days.entry(r.date).or_default() += r.total_price();
    }
    days.into_iter()
        .map(|(date, value)| SeriesPoint { date, value })
        .collect()
}

/// Projects daily sales `horizon_days` past the last date in `table`.
#[tracing::instrument(skip(table, model), fields(rows = table.len()))]
pub fn forecast(
    table: &SalesTable,
    horizon_days: u32,
    model: &dyn TrendModel,
) -> Result<Vec<ForecastPoint>> {
    let history = daily_series(table);
    let projected = model.project(&history, horizon_days)?;
    info!(
        observed_days = history.len(),
        points = projected.len(),
        "Forecast computed"
    );
    Ok(projected)
}
