//! # Dashboard Aggregation
//!
//! Reduces the full sales, products and sale-line collections into the
//! counters shown on the home screen.
//!
//! ## Reduction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sales ──────┬──► today_sales      Σ total, non-cancelled, in today    │
//! │              ├──► month_sales      Σ total, non-cancelled, in month    │
//! │              └──► pending_payments Σ total, status = pending           │
//! │                                                                         │
//! │  products ──────► low_stock_items  #(current_stock ≤ min_stock or 5)   │
//! │                                                                         │
//! │  sale_items ────► top_selling      group month lines by product,       │
//! │  (+ products)                      Σ quantity, stable sort desc, top 3 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! "Today" and "this month" are half-open calendar ranges computed in the
//! shop's UTC offset, see [`CalendarWindow`].

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Product, Sale, SaleItem, SaleStatus};
use crate::TOP_SELLING_LIMIT;

// =============================================================================
// Calendar Window
// =============================================================================

/// Day and month boundaries for one instant, as UTC instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarWindow {
    pub day_start: DateTime<Utc>,
    pub day_end: DateTime<Utc>,
    pub month_start: DateTime<Utc>,
    pub month_end: DateTime<Utc>,
}

impl CalendarWindow {
    /// Builds the window containing `now` as seen from `offset`.
    pub fn new(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        let today = now.with_timezone(&offset).date_naive();
        let month_first = first_of_month(today);
        let next_month_first = first_of_month(month_first + Duration::days(32));

        CalendarWindow {
            day_start: local_midnight(today, offset),
            day_end: local_midnight(today + Duration::days(1), offset),
            month_start: local_midnight(month_first, offset),
            month_end: local_midnight(next_month_first, offset),
        }
    }

    pub fn in_today(&self, ts: DateTime<Utc>) -> bool {
        self.day_start <= ts && ts < self.day_end
    }

    pub fn in_month(&self, ts: DateTime<Utc>) -> bool {
        self.month_start <= ts && ts < self.month_end
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.day0() as i64)
}

fn local_midnight(date: NaiveDate, offset: FixedOffset) -> DateTime<Utc> {
    let local = date.and_time(NaiveTime::MIN);
    Utc.from_utc_datetime(&(local - Duration::seconds(offset.local_minus_utc() as i64)))
}

// =============================================================================
// Summary Types
// =============================================================================

/// A best-selling product for the current month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TopProduct {
    pub product_id: String,
    /// `None` when the product is no longer in the catalog.
    pub name: Option<String>,
    pub sku: Option<String>,
    pub quantity_sold: i64,
    pub revenue: Money,
}

/// Home screen counters.
///
/// `Default` is the all-zero summary shown when loading fails.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DashboardSummary {
    pub today_sales: Money,
    pub month_sales: Money,
    pub low_stock_items: usize,
    /// No service-order collection exists yet; always 0.
    pub active_service_orders: usize,
    pub pending_payments: Money,
    pub top_selling_products: Vec<TopProduct>,
}

impl DashboardSummary {
    pub fn fallback() -> Self {
        DashboardSummary::default()
    }
}

// =============================================================================
// Reducer
// =============================================================================

/// Computes the dashboard from the full collections.
pub fn summarize(
    sales: &[Sale],
    products: &[Product],
    sale_items: &[SaleItem],
    window: &CalendarWindow,
) -> DashboardSummary {
    let mut today_sales = Money::zero();
    let mut month_sales = Money::zero();
    let mut pending_payments = Money::zero();

    for sale in sales {
        if sale.status == SaleStatus::Pending {
            pending_payments += sale.total;
        }
        if sale.status == SaleStatus::Cancelled {
            continue;
        }
        if window.in_today(sale.created_at) {
            today_sales += sale.total;
        }
        if window.in_month(sale.created_at) {
            month_sales += sale.total;
        }
    }

    let low_stock_items = products.iter().filter(|p| p.is_low_stock()).count();

    DashboardSummary {
        today_sales,
        month_sales,
        low_stock_items,
        active_service_orders: 0,
        pending_payments,
        top_selling_products: top_selling(sales, products, sale_items, window, TOP_SELLING_LIMIT),
    }
}

/// Groups this month's sale lines by product and returns the `limit` best.
///
/// Lines of a known sale take the sale's timestamp and are skipped if it was
/// cancelled; orphan lines fall back to their own `created_at`. Equal
/// quantities keep first-seen order.
pub fn top_selling(
    sales: &[Sale],
    products: &[Product],
    sale_items: &[SaleItem],
    window: &CalendarWindow,
    limit: usize,
) -> Vec<TopProduct> {
    let sales_by_id: HashMap<&str, &Sale> = sales.iter().map(|s| (s.id.as_str(), s)).collect();
    let products_by_id: HashMap<&str, &Product> =
        products.iter().map(|p| (p.id.as_str(), p)).collect();

    let mut groups: Vec<TopProduct> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for item in sale_items {
        let sold_at = match sales_by_id.get(item.sale_id.as_str()) {
            Some(sale) if sale.status == SaleStatus::Cancelled => continue,
            Some(sale) => Some(sale.created_at),
            None => item.created_at,
        };
        if !sold_at.is_some_and(|ts| window.in_month(ts)) {
            continue;
        }

        let slot = *index.entry(item.product_id.as_str()).or_insert_with(|| {
            let product = products_by_id.get(item.product_id.as_str());
            groups.push(TopProduct {
                product_id: item.product_id.clone(),
                name: product.map(|p| p.name.clone()),
                sku: product.map(|p| p.sku.clone()),
                quantity_sold: 0,
                revenue: Money::zero(),
            });
            groups.len() - 1
        });

        let group = &mut groups[slot];
        group.quantity_sold += item.quantity;
        group.revenue += if item.line_total.is_zero() {
            item.unit_price.multiply_quantity(item.quantity)
        } else {
            item.line_total
        };
    }

    // sort_by is stable
    groups.sort_by(|a, b| b.quantity_sold.cmp(&a.quantity_sold));
    groups.truncate(limit);
    groups
}

// =============================================================================
// Unit Tests
// =============================================================================
