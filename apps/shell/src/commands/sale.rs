//! # Sale Commands
//!
//! ## Checkout Flow
//! ```text
//! checkout(method)
//!    │
//!    ├── session.require(Sell)          ── no login / wrong role ──► Err
//!    ├── cart.checkout_request(method)  ── empty / credit w/o client ──► Err
//!    ├── POST /sales                    ── backend error ──► Err (cart kept)
//!    ├── sold lines taken out of the cart  ── store write fails ──► warn, sale kept
//!    ├── POS session: sales_count + 1, sales_total + total
//!    └── invalidate sales, sale_items, products, clients
//! ```

use rueda_api::keys;
use rueda_core::{Money, PaymentMethod, Permission, Sale};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::CommandResult;
use crate::state::{ApiState, CartStore, ConfigState, PosSession, SessionState};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptItem {
    pub name: String,
    pub sku: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub line_total: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub sale_id: String,
    pub store_name: String,
    pub cashier: String,
    pub client: Option<String>,
    pub items: Vec<ReceiptItem>,
    pub subtotal: Money,
    pub discount: Money,
    pub total: Money,
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub sale: Sale,
    pub receipt: Receipt,
    pub session: Option<PosSession>,
}

/// Sells the current cart.
///
/// ## Errors
/// - `UNAUTHORIZED` / `PERMISSION_DENIED` without a user allowed to sell
/// - `BUSINESS_LOGIC` for an empty cart, or a credit sale with no client
/// - Backend errors; the cart is left intact so the sale can be retried
///
/// Lines added to the cart while the sale was being posted stay in it.
pub async fn checkout(
    api: &ApiState,
    cart: &CartStore,
    session: &SessionState,
    config: &ConfigState,
    payment_method: PaymentMethod,
) -> CommandResult<CheckoutResponse> {
    debug!(?payment_method, "checkout command");
    let cashier = session.require(Permission::Sell).await?;

    let (request, snapshot) = cart
        .with_cart(|c| c.checkout_request(payment_method).map(|r| (r, c.clone())))
        .await?;

    let sale = api.client().create_sale(&request).await?;
    info!(sale_id = %sale.id, total = %sale.total, ?payment_method, "Sale recorded");

    // The sale exists on the backend; local write failures must not hide it
    if let Err(e) = cart.settle(&snapshot).await {
        warn!(sale_id = %sale.id, error = %e, "Could not save the cart after checkout");
    }
    if let Err(e) = session.record_sale(sale.total).await {
        warn!(error = %e, "Could not update POS session totals");
    }

    api.invalidate(&[keys::SALES, keys::SALE_ITEMS, keys::PRODUCTS, keys::CLIENTS]);

    let receipt = Receipt {
        sale_id: sale.id.clone(),
        store_name: config.store_name.clone(),
        cashier: cashier.label().to_string(),
        client: snapshot.client().map(|c| c.name.clone()),
        items: snapshot
            .items()
            .iter()
            .map(|i| ReceiptItem {
                name: i.name.clone(),
                sku: i.sku.clone(),
                quantity: i.quantity,
                unit_price: i.unit_price,
                line_total: i.line_total(),
            })
            .collect(),
        subtotal: request.subtotal,
        discount: request.discount,
        total: request.total,
        payment_method,
    };

    Ok(CheckoutResponse {
        sale,
        receipt,
        session: session.pos_session().await,
    })
}

/// Sales history, newest first.
pub async fn list_sales(api: &ApiState) -> CommandResult<Vec<Sale>> {
    debug!("list_sales command");
    let mut sales = api.sales().await?;
    sales.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(sales)
}
