use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashSet;

use crate::record::{SalesRecord, SalesTable};

/// Sidebar selection. An empty region or category list selects nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SalesFilter {
    pub regions: Vec<String>,
    pub categories: Vec<String>,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl SalesFilter {
    /// The default selection: every region and category, full date range.
    /// `None` for an empty table.
    pub fn select_all(table: &SalesTable) -> Option<Self> {
        let (start, end) = table.date_range()?;
        Some(SalesFilter {
            regions: unique_regions(table),
            categories: unique_categories(table),
            start,
            end,
        })
    }
}

/// Keeps rows matching region, category and the inclusive date range.
pub fn filter(table: &SalesTable, selection: &SalesFilter) -> SalesTable {
    let regions: HashSet<&str> = selection.regions.iter().map(String::as_str).collect();
    let categories: HashSet<&str> = selection.categories.iter().map(String::as_str).collect();

    table
        .iter()
        .filter(|r| {
            regions.contains(r.region.as_str())
                && categories.contains(r.category.as_str())
                && selection.start <= r.date
                && r.date <= selection.end
        })
        .cloned()
        .collect()
}

/// Distinct regions in first-seen order.
pub fn unique_regions(table: &SalesTable) -> Vec<String> {
    unique_by(table, |r| &r.region)
}

/// Distinct categories in first-seen order.
pub fn unique_categories(table: &SalesTable) -> Vec<String> {
    unique_by(table, |r| &r.category)
}

fn unique_by<F>(table: &SalesTable, key: F) -> Vec<String>
where
    F: Fn(&SalesRecord) -> &String,
{
    let mut seen = HashSet::new();
    table
        .iter()
        .map(key)
        .filter(|k| seen.insert(k.as_str()))
        .cloned()
        .collect()
}
