//! # Dashboard Command
//!
//! ```text
//! load_dashboard
//!    │
//!    ├── products ─┐
//!    ├── sales ────┼── fetched concurrently (cached)
//!    ├── sale_items┘
//!    │        │
//!    │        ├── any failure ──► warn! + all-zero summary
//!    │        ▼
//!    └── rueda_core::dashboard::summarize(.., CalendarWindow(now, offset))
//! ```

use chrono::{DateTime, Utc};
use rueda_core::dashboard::{summarize, CalendarWindow, DashboardSummary};
use tracing::{debug, warn};

use crate::state::{ApiState, ConfigState};

/// Loads the home screen counters. Never fails.
pub async fn load_dashboard(api: &ApiState, config: &ConfigState) -> DashboardSummary {
    load_dashboard_at(api, config, Utc::now()).await
}

/// [`load_dashboard`] with an explicit clock.
pub async fn load_dashboard_at(
    api: &ApiState,
    config: &ConfigState,
    now: DateTime<Utc>,
) -> DashboardSummary {
    debug!("load_dashboard command");

    let fetched = tokio::try_join!(api.products(), api.sales(), api.sale_items());
    let (products, sales, sale_items) = match fetched {
        Ok(collections) => collections,
        Err(e) => {
            warn!(error = %e, "Dashboard data unavailable, showing empty summary");
            return DashboardSummary::fallback();
        }
    };

    let window = CalendarWindow::new(now, config.offset());
    summarize(&sales, &products, &sale_items, &window)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{app_at, app_with, product_json};
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use chrono::TimeZone;
    use rueda_core::Money;
    use serde_json::json;

    fn backend() -> Router {
        Router::new()
            .route(
                "/products",
                get(|| async {
                    Json(json!([
                        product_json("A", "Casco", 80.0, 2),
                        product_json("B", "Cadena", 12.0, 20),
                        product_json("C", "Freno", 10.0, 5),
                        product_json("D", "Llanta", 30.0, 40),
                    ]))
                }),
            )
            .route(
                "/sales",
                get(|| async {
                    Json(json!([
                        // 20 May 09:00 Caracas
                        {"id": 1, "total": 100.0, "paymentMethod": "cash",
                         "status": "completed", "createdAt": "2026-05-20T13:00:00Z"},
                        // 21 May 02:00 UTC is still 20 May 22:00 in Caracas
                        {"id": 2, "total": 50.0, "paymentMethod": "card",
                         "status": "completed", "createdAt": "2026-05-21T02:00:00Z"},
                        {"id": 3, "total": 25.0, "paymentMethod": "credit",
                         "status": "pending", "createdAt": "2026-05-02T15:00:00Z"},
                        {"id": 4, "total": 999.0, "paymentMethod": "cash",
                         "status": "cancelled", "createdAt": "2026-05-20T14:00:00Z"},
                        {"id": 5, "total": 70.0, "paymentMethod": "cash",
                         "status": "completed", "createdAt": "2026-04-28T15:00:00Z"}
                    ]))
                }),
            )
            .route(
                "/sale_items",
                get(|| async {
                    Json(json!([
                        {"id": 1, "saleId": 1, "productId": "A", "quantity": 5, "unitPrice": 10, "lineTotal": 50},
                        {"id": 2, "saleId": 1, "productId": "B", "quantity": 9, "unitPrice": 5, "lineTotal": 45},
                        {"id": 3, "saleId": 2, "productId": "C", "quantity": 2, "unitPrice": 10, "lineTotal": 20},
                        {"id": 4, "saleId": 3, "productId": "D", "quantity": 9, "unitPrice": 2, "lineTotal": 18},
                        {"id": 5, "saleId": 5, "productId": "C", "quantity": 50, "unitPrice": 1, "lineTotal": 50}
                    ]))
                }),
            )
    }

    #[tokio::test]
    async fn test_dashboard_summary() {
        let app = app_with(backend()).await;
        let now = Utc.with_ymd_and_hms(2026, 5, 21, 1, 0, 0).unwrap();

        let summary = load_dashboard_at(&app.api, &app.config, now).await;

        assert_eq!(summary.today_sales, Money::from_cents(15_000));
        assert_eq!(summary.month_sales, Money::from_cents(17_500));
        assert_eq!(summary.pending_payments, Money::from_cents(2_500));
        // A (2 <= 5) and C (5 <= 5)
        assert_eq!(summary.low_stock_items, 2);
        assert_eq!(summary.active_service_orders, 0);

        let top: Vec<&str> = summary
            .top_selling_products
            .iter()
            .map(|t| t.product_id.as_str())
            .collect();
        assert_eq!(top, vec!["B", "D", "A"]);
        assert_eq!(summary.top_selling_products[0].name.as_deref(), Some("Cadena"));
    }

    #[tokio::test]
    async fn test_fetch_failure_yields_fallback() {
        let failing = Router::new()
            .route("/products", get(|| async { Json(json!([])) }))
            .route("/sales", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
            .route("/sale_items", get(|| async { Json(json!([])) }));
        let app = app_with(failing).await;

        let summary = load_dashboard(&app.api, &app.config).await;
        assert_eq!(summary, DashboardSummary::fallback());
    }

    #[tokio::test]
    async fn test_unreachable_backend_yields_fallback() {
        let app = app_at("http://127.0.0.1:9/api").await;
        let summary = load_dashboard(&app.api, &app.config).await;
        assert_eq!(summary, DashboardSummary::fallback());
    }
}
