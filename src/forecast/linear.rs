use chrono::Days;

use super::utility::{mean, normal_quantile, stddev};
use super::{ForecastPoint, SeriesPoint, TrendModel};
use crate::error::{Result, SalesError};

/// Width of the uncertainty band when none is configured.
pub const DEFAULT_INTERVAL_WIDTH: f64 = 0.8;

/// Least-squares straight line over day offsets, with a normal band sized
/// from the residual spread.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearTrend {
    interval_width: f64,
}

impl Default for LinearTrend {
    fn default() -> Self {
        LinearTrend {
            interval_width: DEFAULT_INTERVAL_WIDTH,
        }
    }
}

impl LinearTrend {
    /// `interval_width` is the band's coverage, strictly between 0 and 1.
    pub fn new(interval_width: f64) -> Result<Self> {
        if !(interval_width > 0.0 && interval_width < 1.0) {
            return Err(SalesError::Config {
                key: "interval_width",
                value: interval_width.to_string(),
            });
        }
        Ok(LinearTrend { interval_width })
    }

    pub fn interval_width(&self) -> f64 {
        self.interval_width
    }
}

impl TrendModel for LinearTrend {
    fn project(&self, history: &[SeriesPoint], horizon_days: u32) -> Result<Vec<ForecastPoint>> {
        let (first, last) = match (history.first(), history.last()) {
            (Some(f), Some(l)) => (f.date, l.date),
            _ => return Err(SalesError::EmptyResult("forecast")),
        };

        let offsets: Vec<f64> = history
            .iter()
            .map(|p| (p.date - first).num_days() as f64)
            .collect();
        let values: Vec<f64> = history.iter().map(|p| p.value).collect();

        let mean_t = mean(&offsets);
        let mean_y = mean(&values);
        let sxx: f64 = offsets.iter().map(|t| (t - mean_t).powi(2)).sum();
        let sxy: f64 = offsets
            .iter()
            .zip(&values)
            .map(|(t, y)| (t - mean_t) * (y - mean_y))
            .sum();

        let slope = if sxx == 0.0 { 0.0 } else { sxy / sxx };
        let intercept = mean_y - slope * mean_t;
        let fit = |t: f64| intercept + slope * t;

        let residuals: Vec<f64> = offsets.iter().zip(&values).map(|(t, y)| y - fit(*t)).collect();
        let half_width = normal_quantile(0.5 + self.interval_width / 2.0)
            * stddev(&residuals, mean(&residuals));

        let point = |date, t: f64| {
            let yhat = fit(t);
            ForecastPoint {
                date,
                yhat,
                yhat_lower: yhat - half_width,
                yhat_upper: yhat + half_width,
            }
        };

        let last_offset = (last - first).num_days() as f64;
        let mut out: Vec<ForecastPoint> = history
            .iter()
            .zip(&offsets)
            .map(|(p, t)| point(p.date, *t))
            .collect();
        for k in 1..=horizon_days {
            let Some(date) = last.checked_add_days(Days::new(k as u64)) else {
                break;
            };
            out.push(point(date, last_offset + k as f64));
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_perfect_line_has_zero_band() {
        let history: Vec<_> = (0..5)
            .map(|i| SeriesPoint {
                date: day(1 + i),
                value: 10.0 + 2.0 * i as f64,
            })
            .collect();

        let points = LinearTrend::default().project(&history, 3).unwrap();

        assert_eq!(points.len(), 8);
        let next = points[5];
        assert_eq!(next.date, day(6));
        assert!((next.yhat - 20.0).abs() < 1e-9);
        assert!((next.yhat_upper - next.yhat_lower).abs() < 1e-9);
    }

    #[test]
    fn test_band_contains_prediction() {
        let values = [100.0, 140.0, 90.0, 160.0, 120.0, 150.0];
        let history: Vec<_> = values
            .iter()
            .enumerate()
            .map(|(i, v)| SeriesPoint {
                date: day(1 + i as u32),
                value: *v,
            })
            .collect();

        let points = LinearTrend::default().project(&history, 30).unwrap();

        assert_eq!(points.len(), 36);
        for p in &points {
            assert!(p.yhat_lower < p.yhat && p.yhat < p.yhat_upper);
        }
        assert!(points.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn test_single_point_is_flat() {
        let history = [SeriesPoint {
            date: day(1),
            value: 42.0,
        }];

        let points = LinearTrend::default().project(&history, 2).unwrap();
        assert!(points.iter().all(|p| p.yhat == 42.0));
    }

    #[test]
    fn test_wider_interval_gives_wider_band() {
        let history: Vec<_> = [5.0, 9.0, 4.0, 8.0]
            .iter()
            .enumerate()
            .map(|(i, v)| SeriesPoint {
                date: day(1 + i as u32),
                value: *v,
            })
            .collect();

        let narrow = LinearTrend::new(0.5).unwrap().project(&history, 0).unwrap();
        let wide = LinearTrend::new(0.95).unwrap().project(&history, 0).unwrap();
        let width = |p: &ForecastPoint| p.yhat_upper - p.yhat_lower;
        assert!(width(&wide[0]) > width(&narrow[0]));
    }

    #[test]
    fn test_invalid_interval_width() {
        assert!(LinearTrend::new(0.0).is_err());
        assert!(LinearTrend::new(1.0).is_err());
        assert!(LinearTrend::new(f64::NAN).is_err());
    }

    #[test]
    fn test_empty_history() {
        let err = LinearTrend::default().project(&[], 10).unwrap_err();
        assert!(matches!(err, SalesError::EmptyResult(_)));
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }
}
