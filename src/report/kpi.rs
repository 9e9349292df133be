use serde::Serialize;
use std::collections::HashSet;
use tracing::warn;

use crate::record::SalesTable;

/// Headline metrics shown on the KPI cards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Kpis {
    pub total_sales: f64,
    /// Saturates at `u64::MAX`.
    pub total_quantity: u64,
    pub order_count: usize,
    /// Zero when there are no orders.
    pub avg_order_value: f64,
}

/// Computes totals over every row; an order is a distinct `InvoiceID`.
pub fn compute_kpis(table: &SalesTable) -> Kpis {
    let mut invoices = HashSet::new();
    let mut total_sales = 0.0;
    let mut total_quantity = 0u64;

    for r in table {
        total_sales += r.total_price();
        total_quantity = total_quantity.checked_add(r.quantity).unwrap_or_else(|| {
            warn!("Total quantity overflowed, saturating");
            u64::MAX
        });
        invoices.insert(r.invoice_id.as_str());
    }

    let order_count = invoices.len();
    let avg_order_value = if order_count == 0 {
        0.0
    } else {
        total_sales / order_count as f64
    };

    Kpis {
        total_sales,
        total_quantity,
        order_count,
        avg_order_value,
    }
}
