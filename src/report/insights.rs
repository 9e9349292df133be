use serde::Serialize;

use super::group::{Dimension, GroupTotal, group_sum_by_dimension, group_sum_by_month};
use crate::error::{Result, SalesError};
use crate::record::SalesTable;

/// Headline findings for the insight box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insights {
    pub best_region: String,
    pub worst_category: String,
    /// Rendered as `January 2025`.
    pub peak_month: String,
    pub top_product: String,
}

impl Insights {
    pub fn summary_lines(&self) -> Vec<String> {
        vec![
            format!("Best Performing Region: {}", self.best_region),
            format!("Worst Performing Category: {}", self.worst_category),
            format!("Peak Sales Month: {}", self.peak_month),
            format!(
                "Tip: Increase stock of top-selling product `{}`.",
                self.top_product
            ),
        ]
    }
}

/// Best region, worst category, peak month and top product by `TotalPrice`.
/// Ties resolve to the first-seen group (earliest month for the peak).
///
/// # Errors
///
/// [`SalesError::EmptyResult`] for an empty table.
pub fn derive_insights(table: &SalesTable) -> Result<Insights> {
    if table.is_empty() {
        return Err(SalesError::EmptyResult("insights"));
    }

    let regions = group_sum_by_dimension(table, Dimension::Region);
    let categories = group_sum_by_dimension(table, Dimension::Category);
    let products = group_sum_by_dimension(table, Dimension::Product);

    let peak = group_sum_by_month(table)
        .into_iter()
        .reduce(|best, m| if m.total > best.total { m } else { best })
        .ok_or(SalesError::EmptyResult("peak month"))?;

    Ok(Insights {
        best_region: max_key(&regions).ok_or(SalesError::EmptyResult("best region"))?,
        worst_category: min_key(&categories).ok_or(SalesError::EmptyResult("worst category"))?,
        peak_month: peak.label(),
        top_product: max_key(&products).ok_or(SalesError::EmptyResult("top product"))?,
    })
}

fn max_key(groups: &[GroupTotal]) -> Option<String> {
    groups
        .iter()
        .reduce(|best, g| if g.total > best.total { g } else { best })
        .map(|g| g.key.clone())
}

fn min_key(groups: &[GroupTotal]) -> Option<String> {
    groups
        .iter()
        .reduce(|best, g| if g.total < best.total { g } else { best })
        .map(|g| g.key.clone())
}
