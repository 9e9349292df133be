//! Dashboard queries over a cleaned [`SalesTable`].
//!
//! Every function here is pure. [`build_report`] assembles all of them for
//! one filter selection and is the boundary where empty-result errors become
//! placeholders instead of failures.

pub mod export;
pub mod filter;
pub mod group;
pub mod insights;
pub mod kpi;

use serde::Serialize;
use tracing::{debug, warn};

use crate::record::SalesTable;

pub use export::{ExportFile, export_csv};
pub use filter::{SalesFilter, filter};
pub use group::{
    Dimension, GroupTotal, MonthlyTotal, group_sum_by_dimension, group_sum_by_month, top_n,
};
pub use insights::{Insights, derive_insights};
pub use kpi::{Kpis, compute_kpis};

/// Shown when a selection leaves nothing to summarise.
pub const EMPTY_SELECTION_NOTICE: &str = "No sales match the current filters.";

/// Everything the dashboard renders for one filter selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    /// Over the whole table, independent of the selection.
    pub kpis: Kpis,
    pub selection: SalesFilter,
    pub filtered_rows: usize,
    pub monthly_trend: Vec<MonthlyTotal>,
    pub sales_by_category: Vec<GroupTotal>,
    pub sales_by_region: Vec<GroupTotal>,
    /// Percent of filtered sales per region.
    pub region_share: Vec<(String, f64)>,
    pub top_products: Vec<GroupTotal>,
    pub insights: Option<Insights>,
    pub notice: Option<String>,
}

/// Computes the full dashboard for `selection`.
///
/// Never fails: an empty selection produces empty series, `insights: None`
/// and a notice.
pub fn build_report(table: &SalesTable, selection: &SalesFilter, top: usize) -> DashboardReport {
    let filtered = filter(table, selection);
    debug!(
        total_rows = table.len(),
        filtered_rows = filtered.len(),
        "Selection applied"
    );

    let sales_by_region = group_sum_by_dimension(&filtered, Dimension::Region);

    let (insights, notice) = match derive_insights(&filtered) {
        Ok(i) => (Some(i), None),
        Err(e) => {
            warn!(error = %e, "Insights unavailable for selection");
            (None, Some(EMPTY_SELECTION_NOTICE.to_string()))
        }
    };

    DashboardReport {
        kpis: compute_kpis(table),
        selection: selection.clone(),
        filtered_rows: filtered.len(),
        monthly_trend: group_sum_by_month(&filtered),
        sales_by_category: group_sum_by_dimension(&filtered, Dimension::Category),
        region_share: group::share_of_total(&sales_by_region),
        sales_by_region,
        top_products: top_n(&filtered, Dimension::Product, top),
        insights,
        notice,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::SalesRecord;
    use chrono::NaiveDate;

    #[test]
    fn test_report_for_full_selection() {
        let table = sample_table();
        let selection = SalesFilter::select_all(&table).unwrap();

        let report = build_report(&table, &selection, 5);

        assert_eq!(report.filtered_rows, 3);
        assert_eq!(report.kpis.total_sales, 330.0);
        assert_eq!(report.monthly_trend.len(), 2);
        assert_eq!(report.top_products[0].key, "X");
        assert!(report.insights.is_some());
        assert!(report.notice.is_none());
    }

    #[test]
    fn test_kpis_ignore_selection() {
        let table = sample_table();
        let mut selection = SalesFilter::select_all(&table).unwrap();
        selection.regions.retain(|r| r == "North");

        let report = build_report(&table, &selection, 5);

        assert_eq!(report.filtered_rows, 1);
        assert_eq!(report.kpis.total_sales, 330.0);
        assert_eq!(report.sales_by_region.len(), 1);
    }

    #[test]
    fn test_empty_selection_gives_placeholder() {
        let table = sample_table();
        let mut selection = SalesFilter::select_all(&table).unwrap();
        selection.categories.clear();

        let report = build_report(&table, &selection, 5);

        assert_eq!(report.filtered_rows, 0);
        assert!(report.monthly_trend.is_empty());
        assert!(report.top_products.is_empty());
        assert!(report.insights.is_none());
        assert_eq!(report.notice.as_deref(), Some(EMPTY_SELECTION_NOTICE));
    }

    fn sample_table() -> SalesTable {
        let d = |m, d| NaiveDate::from_ymd_opt(2025, m, d).unwrap();
        SalesTable::new(vec![
            SalesRecord::new(d(1, 5), "North", "A", "X", 2, 100.0, "I1"),
            SalesRecord::new(d(1, 10), "South", "B", "Y", 1, 50.0, "I2"),
            SalesRecord::new(d(2, 1), "South", "B", "Y", 1, 80.0, "I3"),
        ])
    }
}
