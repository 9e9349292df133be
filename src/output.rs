//! Rendering of dashboard data for the terminal, JSON, and CSV.

use csv::WriterBuilder;
use serde::Serialize;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{Result, SalesError};
use crate::forecast::ForecastPoint;
use crate::report::DashboardReport;

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty<T: std::fmt::Debug>(value: &T) {
    debug!("{:#?}", value);
}

/// Logs a value as pretty-printed JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Whole currency units with thousands separators, e.g. `₹1,234,568`.
pub fn format_currency(amount: f64) -> String {
    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{sign}₹{}", group_thousands(rounded.abs() as u64))
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Text lines for every dashboard section, in display order.
pub fn render_report(report: &DashboardReport) -> Vec<String> {
    let k = &report.kpis;
    let mut lines = vec![
        "Smart Sales Insights".to_string(),
        format!("Total Sales: {}", format_currency(k.total_sales)),
        format!("Total Quantity: {}", k.total_quantity),
        format!("Number of Orders: {}", k.order_count),
        format!("Avg Order Value: {}", format_currency(k.avg_order_value)),
        format!(
            "Selection: {} to {}, {} row(s)",
            report.selection.start, report.selection.end, report.filtered_rows
        ),
    ];

    if let Some(notice) = &report.notice {
        lines.push(notice.clone());
    }

    lines.push("Monthly Sales Trend".to_string());
    lines.extend(
        report
            .monthly_trend
            .iter()
            .map(|m| format!("  {}: {}", m.label(), format_currency(m.total))),
    );

    lines.push("Sales by Category".to_string());
    lines.extend(
        report
            .sales_by_category
            .iter()
            .map(|g| format!("  {}: {}", g.key, format_currency(g.total))),
    );

    lines.push("Region-wise Sales Share".to_string());
    lines.extend(
        report
            .region_share
            .iter()
            .map(|(region, pct)| format!("  {region}: {pct:.1}%")),
    );

    lines.push(format!("Top {} Products by Revenue", report.top_products.len()));
    lines.extend(
        report
            .top_products
            .iter()
            .enumerate()
            .map(|(i, g)| format!("  {}. {}: {}", i + 1, g.key, format_currency(g.total))),
    );

    if let Some(insights) = &report.insights {
        lines.push("Smart Insights".to_string());
        lines.extend(insights.summary_lines().into_iter().map(|l| format!("  {l}")));
    }

    lines
}

/// Logs the rendered report one line at a time.
pub fn print_report(report: &DashboardReport) {
    for line in render_report(report) {
        info!("{}", line);
    }
}

/// Writes forecast points as `date,yhat,yhat_lower,yhat_upper` CSV.
pub fn write_forecast(path: &Path, points: &[ForecastPoint]) -> Result<()> {
    debug!(path = %path.display(), points = points.len(), "Writing forecast CSV");

    let file = File::create(path).map_err(|e| SalesError::write(path, e))?;
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);

    for point in points {
        writer.serialize(point)?;
    }
    writer.flush().map_err(|e| SalesError::write(path, e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{SalesRecord, SalesTable};
    use crate::report::{SalesFilter, build_report};
    use chrono::NaiveDate;
    use std::fs;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "₹0");
        assert_eq!(format_currency(999.4), "₹999");
        assert_eq!(format_currency(1000.0), "₹1,000");
        assert_eq!(format_currency(1234567.5), "₹1,234,568");
        assert_eq!(format_currency(-2500.0), "-₹2,500");
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&SalesTable::default());
    }

    #[test]
    fn test_print_json_report() {
        let table = sample_table();
        let report = build_report(&table, &SalesFilter::select_all(&table).unwrap(), 5);
        print_json(&report).unwrap();
    }

    #[test]
    fn test_render_report_sections() {
        let table = sample_table();
        let report = build_report(&table, &SalesFilter::select_all(&table).unwrap(), 5);

        let lines = render_report(&report);
        assert!(lines.contains(&"Total Sales: ₹250".to_string()));
        assert!(lines.contains(&"Avg Order Value: ₹125".to_string()));
        assert!(lines.contains(&"  January 2025: ₹250".to_string()));
        assert!(lines.contains(&"  North: 80.0%".to_string()));
        assert!(lines.contains(&"  1. X: ₹200".to_string()));
        assert!(lines.iter().any(|l| l.contains("Best Performing Region: North")));
    }

    #[test]
    fn test_render_empty_selection_shows_notice() {
        let table = sample_table();
        let mut selection = SalesFilter::select_all(&table).unwrap();
        selection.regions.clear();

        let lines = render_report(&build_report(&table, &selection, 5));
        assert!(lines.contains(&crate::report::EMPTY_SELECTION_NOTICE.to_string()));
        assert!(!lines.iter().any(|l| l.contains("Smart Insights")));
    }

    #[test]
    fn test_write_forecast() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("forecast.csv");
        let points = [ForecastPoint {
            date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            yhat: 10.0,
            yhat_lower: 8.0,
            yhat_upper: 12.0,
        }];

        write_forecast(&path, &points).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "date,yhat,yhat_lower,yhat_upper\n2025-07-01,10.0,8.0,12.0\n"
        );
    }

    fn sample_table() -> SalesTable {
        let day = |d| NaiveDate::from_ymd_opt(2025, 1, d).unwrap();
        SalesTable::new(vec![
            SalesRecord::new(day(5), "North", "A", "X", 2, 100.0, "I1"),
            SalesRecord::new(day(10), "South", "B", "Y", 1, 50.0, "I2"),
        ])
    }
}
