//! Grouped `TotalPrice` sums (the chart and table data).

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use crate::record::{SalesRecord, SalesTable};

/// Column a table can be grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Dimension {
    Region,
    Category,
    Product,
}

impl Dimension {
    pub fn key<'a>(&self, record: &'a SalesRecord) -> &'a str {
        match self {
            Dimension::Region => &record.region,
            Dimension::Category => &record.category,
            Dimension::Product => &record.product,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dimension::Region => "Region",
            Dimension::Category => "Category",
            Dimension::Product => "Product",
        };
        f.write_str(name)
    }
}

impl FromStr for Dimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "region" => Ok(Dimension::Region),
            "category" => Ok(Dimension::Category),
            "product" => Ok(Dimension::Product),
            other => Err(format!(
                "unknown dimension {other:?} (expected region, category or product)"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupTotal {
    pub key: String,
    pub total: f64,
}

/// Sum for one calendar month; `month` is the first day of that month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTotal {
    pub month: NaiveDate,
    pub total: f64,
}

impl MonthlyTotal {
    /// e.g. `January 2025`.
    pub fn label(&self) -> String {
        self.month.format("%B %Y").to_string()
    }
}

/// Monthly sums in chronological order.
pub fn group_sum_by_month(table: &SalesTable) -> Vec<MonthlyTotal> {
    let mut months: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for r in table {
        *months.entry(month_start(r.date)).or_default() += r.total_price();
    }
    months
        .into_iter()
        .map(|(month, total)| MonthlyTotal { month, total })
        .collect()
}

/// Sums per distinct value of `dimension`, in first-seen order.
pub fn group_sum_by_dimension(table: &SalesTable, dimension: Dimension) -> Vec<GroupTotal> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<GroupTotal> = Vec::new();

    for r in table {
        let key = dimension.key(r);
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push(GroupTotal {
                key: key.to_string(),
                total: 0.0,
            });
            groups.len() - 1
        });
        groups[slot].total += r.total_price();
    }

    groups
}

/// The `n` largest groups, descending. Ties keep first-seen order.
pub fn top_n(table: &SalesTable, dimension: Dimension, n: usize) -> Vec<GroupTotal> {
    let mut groups = group_sum_by_dimension(table, dimension);
    // sort_by is stable
    groups.sort_by(|a, b| b.total.total_cmp(&a.total));
    groups.truncate(n);
    groups
}

/// Each group's percentage of the summed total. All zeros if the total is zero.
pub fn share_of_total(groups: &[GroupTotal]) -> Vec<(String, f64)> {
    let total: f64 = groups.iter().map(|g| g.total).sum();
    groups
        .iter()
        .map(|g| {
            let pct = if total == 0.0 {
                0.0
            } else {
                g.total / total * 100.0
            };
            (g.key.clone(), pct)
        })
        .collect()
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}
