//! # Cart
//!
//! The point-of-sale cart session: line items, selected client, discounts and
//! notes. Pure state machine; persistence and change notification live in the
//! shell's `CartStore`.
//!
//! ## Cart Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Operations                                │
//! │                                                                         │
//! │  add_item(product) ─────────► new line (qty 1) or qty + 1              │
//! │                               ✗ OutOfStock / InsufficientStock         │
//! │                                                                         │
//! │  set_quantity(id, n) ───────► n ≤ 0 removes, n > ceiling rejected      │
//! │                                                                         │
//! │  remove_item(id) ───────────► idempotent                               │
//! │                                                                         │
//! │  set_item_discount / set_global_discount ──► clamped to [0, 100]       │
//! │                                                                         │
//! │  clear() ───────────────────► back to Cart::default()                  │
//! │                                                                         │
//! │  Every failed operation leaves the cart exactly as it was.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Totals
//! ```text
//! line_total = (unit_price × qty) − item_discount%   (rounded to the cent)
//! subtotal   = Σ line_total
//! total      = subtotal − global_discount%
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Client, PaymentMethod, Percent, Product};

// =============================================================================
// Cart Item
// =============================================================================

/// A line in the cart.
///
/// Name, SKU and price are frozen when the product is first added;
/// `stock_ceiling` is refreshed whenever the product is read again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartItem {
    pub product_id: String,
    pub sku: String,
    pub name: String,
    pub unit_price: Money,
    pub quantity: i64,
    /// Stock at the time of the last product read.
    pub stock_ceiling: i64,
    #[serde(default)]
    pub discount: Percent,
}

impl CartItem {
    /// Creates a quantity-1 line from a product.
    pub fn from_product(product: &Product) -> Self {
        CartItem {
            product_id: product.id.clone(),
            sku: product.sku.clone(),
            name: product.name.clone(),
            unit_price: product.sale_price,
            quantity: 1,
            stock_ceiling: product.current_stock,
            discount: Percent::zero(),
        }
    }

    /// unit_price × quantity, before discount.
    pub fn gross_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }

    pub fn discount_amount(&self) -> Money {
        self.gross_total().percentage_of(self.discount)
    }

    /// Line price after the item discount.
    pub fn line_total(&self) -> Money {
        self.gross_total().apply_percentage_discount(self.discount)
    }

    fn insufficient(&self, requested: i64) -> CoreError {
        CoreError::InsufficientStock {
            product_id: self.product_id.clone(),
            name: self.name.clone(),
            available: self.stock_ceiling,
            requested,
        }
    }
}

// =============================================================================
// Client Reference
// =============================================================================

/// The client attached to a cart. Only what checkout and display need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ClientRef {
    pub id: String,
    pub name: String,
    pub document: String,
}

impl From<&Client> for ClientRef {
    fn from(client: &Client) -> Self {
        ClientRef {
            id: client.id.clone(),
            name: client.name.clone(),
            document: client.document_label(),
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The cart session.
///
/// ## Invariants
/// - Items are unique by `product_id`, kept in the order they were added
/// - Every item has `1 <= quantity <= stock_ceiling` as of its last stock read
/// - Discounts are within [0, 100] (enforced by [`Percent`])
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Cart {
    items: Vec<CartItem>,
    client: Option<ClientRef>,
    global_discount: Percent,
    notes: String,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// Adds one unit of a product.
    ///
    /// ## Behavior
    /// - Already in cart: quantity + 1, unless that exceeds the product's
    ///   current stock (`InsufficientStock`)
    /// - Not in cart: new line with quantity 1, unless stock ≤ 0 (`OutOfStock`)
    pub fn add_item(&mut self, product: &Product) -> CoreResult<()> {
        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product.id) {
            let requested = item.quantity + 1;
            if requested > product.current_stock {
                return Err(CoreError::InsufficientStock {
                    product_id: product.id.clone(),
                    name: item.name.clone(),
                    available: product.current_stock,
                    requested,
                });
            }
            item.quantity = requested;
            item.stock_ceiling = product.current_stock;
            return Ok(());
        }

        if product.current_stock <= 0 {
            return Err(CoreError::OutOfStock {
                product_id: product.id.clone(),
                name: product.name.clone(),
            });
        }

        self.items.push(CartItem::from_product(product));
        Ok(())
    }

    /// Removes a line. Returns whether anything was removed; absent ids are fine.
    pub fn remove_item(&mut self, product_id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.product_id != product_id);
        self.items.len() != before
    }

    /// Replaces the quantity of a line.
    ///
    /// - `quantity <= 0` removes the line
    /// - above the stock ceiling fails with `InsufficientStock`
    /// - unknown product fails with `NotInCart`
    pub fn set_quantity(&mut self, product_id: &str, quantity: i64) -> CoreResult<()> {
        if quantity <= 0 {
            self.remove_item(product_id);
            return Ok(());
        }

        let item = self
            .items
            .iter_mut()
            .find(|i| i.product_id == product_id)
            .ok_or_else(|| CoreError::NotInCart(product_id.to_string()))?;

        if quantity > item.stock_ceiling {
            return Err(item.insufficient(quantity));
        }

        item.quantity = quantity;
        Ok(())
    }

    /// Sets a line discount, clamped to [0, 100]. Unknown ids are ignored.
    pub fn set_item_discount(&mut self, product_id: &str, pct: f64) {
        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product_id) {
            item.discount = Percent::from_percentage(pct);
        }
    }

    /// Sets the whole-cart discount, clamped to [0, 100].
    pub fn set_global_discount(&mut self, pct: f64) {
        self.global_discount = Percent::from_percentage(pct);
    }

    pub fn select_client(&mut self, client: Option<ClientRef>) {
        self.client = client;
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    /// Empties items and resets client, discount and notes.
    pub fn clear(&mut self) {
        *self = Cart::default();
    }

    /// Takes out what a completed sale of `sold` removed.
    ///
    /// - Unchanged since `sold` was taken: cleared
    /// - Changed meanwhile: each sold line loses the sold quantity (dropped at
    ///   zero); lines added after the sale stay. If no line is left the cart
    ///   is cleared.
    pub fn settle(&mut self, sold: &Cart) {
        if self == sold {
            self.clear();
            return;
        }

        for line in &sold.items {
            if let Some(item) = self.items.iter_mut().find(|i| i.product_id == line.product_id) {
                item.quantity -= line.quantity;
            }
        }
        self.items.retain(|i| i.quantity > 0);

        if self.items.is_empty() {
            self.clear();
        }
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn item(&self, product_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.product_id == product_id)
    }

    pub fn client(&self) -> Option<&ClientRef> {
        self.client.as_ref()
    }

    pub fn global_discount(&self) -> Percent {
        self.global_discount
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// Number of distinct lines.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Units across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Σ of discounted line totals.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Amount taken off by the global discount.
    pub fn global_discount_amount(&self) -> Money {
        self.subtotal().percentage_of(self.global_discount)
    }

    /// Subtotal minus the global discount.
    pub fn total(&self) -> Money {
        self.subtotal().apply_percentage_discount(self.global_discount)
    }

    pub fn totals(&self) -> CartTotals {
        CartTotals::from(self)
    }

    /// Builds the `/sales` body for this cart.
    ///
    /// ## Errors
    /// - `EmptyCart` when there is nothing to sell
    /// - `ClientRequired` for credit sales without a client
    pub fn checkout_request(&self, payment_method: PaymentMethod) -> CoreResult<CheckoutRequest> {
        if self.is_empty() {
            return Err(CoreError::EmptyCart);
        }
        if payment_method.is_credit() && self.client.is_none() {
            return Err(CoreError::ClientRequired);
        }

        let notes = self.notes.trim();
        Ok(CheckoutRequest {
            client_id: self.client.as_ref().map(|c| c.id.clone()),
            items: self
                .items
                .iter()
                .map(|i| CheckoutLine {
                    product_id: i.product_id.clone(),
                    quantity: i.quantity,
                    unit_price: i.unit_price,
                    discount_percent: i.discount.percentage(),
                    line_total: i.line_total(),
                })
                .collect(),
            subtotal: self.subtotal(),
            discount_percent: self.global_discount.percentage(),
            discount: self.global_discount_amount(),
            total: self.total(),
            payment_method,
            notes: (!notes.is_empty()).then(|| notes.to_string()),
        })
    }
}

// =============================================================================
// Totals & Checkout DTOs
// =============================================================================

/// Cart totals summary for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: i64,
    pub subtotal: Money,
    pub discount: Money,
    pub total: Money,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            item_count: cart.item_count(),
            total_quantity: cart.total_quantity(),
            subtotal: cart.subtotal(),
            discount: cart.global_discount_amount(),
            total: cart.total(),
        }
    }
}

/// Body of `POST /sales`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CheckoutRequest {
    pub client_id: Option<String>,
    pub items: Vec<CheckoutLine>,
    #[serde(with = "crate::money::decimal")]
    #[ts(type = "number")]
    pub subtotal: Money,
    pub discount_percent: f64,
    #[serde(with = "crate::money::decimal")]
    #[ts(type = "number")]
    pub discount: Money,
    #[serde(with = "crate::money::decimal")]
    #[ts(type = "number")]
    pub total: Money,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CheckoutLine {
    pub product_id: String,
    pub quantity: i64,
    #[serde(with = "crate::money::decimal")]
    #[ts(type = "number")]
    pub unit_price: Money,
    pub discount_percent: f64,
    #[serde(with = "crate::money::decimal")]
    #[ts(type = "number")]
    pub line_total: Money,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_product(id: &str, price_cents: i64, stock: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Producto {}", id),
            sku: format!("SKU-{}", id),
            category: None,
            sale_price: Money::from_cents(price_cents),
            cost_price: Money::zero(),
            current_stock: stock,
            min_stock: None,
            max_stock: None,
            brand: None,
            model: None,
            is_active: true,
        }
    }

    #[test]
    fn test_add_item_new_and_existing() {
        let mut cart = Cart::new();
        let product = test_product("1", 999, 5);

        cart.add_item(&product).unwrap();
        cart.add_item(&product).unwrap();

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total_quantity(), 2);
        assert_eq!(cart.subtotal().cents(), 1998);
    }

    #[test]
    fn test_add_item_out_of_stock() {
        let mut cart = Cart::new();
        let err = cart.add_item(&test_product("1", 999, 0)).unwrap_err();
        assert!(matches!(err, CoreError::OutOfStock { .. }));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_item_beyond_stock_leaves_state_unchanged() {
        let mut cart = Cart::new();
        let product = test_product("1", 1000, 2);
        cart.add_item(&product).unwrap();
        cart.add_item(&product).unwrap();
        let before = cart.clone();

        let err = cart.add_item(&product).unwrap_err();
        assert_eq!(
            err,
            CoreError::InsufficientStock {
                product_id: "1".to_string(),
                name: "Producto 1".to_string(),
                available: 2,
                requested: 3,
            }
        );
        assert_eq!(cart, before);
    }

    #[test]
    fn test_add_refreshes_stock_ceiling() {
        let mut cart = Cart::new();
        cart.add_item(&test_product("1", 1000, 2)).unwrap();
        cart.add_item(&test_product("1", 1000, 8)).unwrap();
        assert_eq!(cart.item("1").unwrap().stock_ceiling, 8);
        assert!(cart.set_quantity("1", 8).is_ok());
    }

    #[test]
    fn test_items_keep_insertion_order() {
        let mut cart = Cart::new();
        for id in ["c", "a", "b"] {
            cart.add_item(&test_product(id, 100, 3)).unwrap();
        }
        cart.add_item(&test_product("a", 100, 3)).unwrap();
        let ids: Vec<&str> = cart.items().iter().map(|i| i.product_id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_remove_item_is_idempotent() {
        let mut cart = Cart::new();
        cart.add_item(&test_product("1", 100, 1)).unwrap();
        assert!(cart.remove_item("1"));
        assert!(!cart.remove_item("1"));
        assert!(!cart.remove_item("never-added"));
    }

    #[test]
    fn test_set_quantity_zero_or_negative_removes() {
        for qty in [0, -4] {
            let mut cart = Cart::new();
            cart.add_item(&test_product("1", 100, 3)).unwrap();
            cart.set_quantity("1", qty).unwrap();
            assert!(cart.item("1").is_none());
        }
        // absent id with qty 0 is still fine
        assert!(Cart::new().set_quantity("ghost", 0).is_ok());
    }

    #[test]
    fn test_set_quantity_above_ceiling_rejected() {
        let mut cart = Cart::new();
        cart.add_item(&test_product("1", 100, 3)).unwrap();
        let err = cart.set_quantity("1", 4).unwrap_err();
        assert!(matches!(err, CoreError::InsufficientStock { available: 3, requested: 4, .. }));
        assert_eq!(cart.item("1").unwrap().quantity, 1);

        cart.set_quantity("1", 3).unwrap();
        assert_eq!(cart.item("1").unwrap().quantity, 3);
    }

    #[test]
    fn test_set_quantity_unknown_item() {
        let mut cart = Cart::new();
        assert_eq!(
            cart.set_quantity("ghost", 2).unwrap_err(),
            CoreError::NotInCart("ghost".to_string())
        );
    }

    #[test]
    fn test_discounts_are_clamped() {
        let mut cart = Cart::new();
        cart.add_item(&test_product("1", 10_000, 3)).unwrap();

        cart.set_item_discount("1", 250.0);
        assert_eq!(cart.item("1").unwrap().discount, Percent::full());
        cart.set_item_discount("1", -10.0);
        assert_eq!(cart.item("1").unwrap().discount, Percent::zero());

        cart.set_global_discount(101.0);
        assert_eq!(cart.global_discount(), Percent::full());
        assert!(cart.total().is_zero());
    }

    #[test]
    fn test_subtotal_is_sum_of_discounted_lines() {
        let mut cart = Cart::new();
        let a = test_product("a", 4_599, 10);
        let b = test_product("b", 1_250, 10);
        let c = test_product("c", 333, 10);

        for _ in 0..3 {
            cart.add_item(&a).unwrap();
        }
        cart.add_item(&b).unwrap();
        for _ in 0..7 {
            cart.add_item(&c).unwrap();
        }
        cart.set_item_discount("a", 10.0);
        cart.set_item_discount("c", 33.3);

        let expected: Money = [
            Money::from_cents(4_599 * 3).apply_percentage_discount(Percent::from_bps(1000)),
            Money::from_cents(1_250),
            Money::from_cents(333 * 7).apply_percentage_discount(Percent::from_bps(3330)),
        ]
        .iter()
        .sum();
        assert_eq!(cart.subtotal(), expected);
    }

    #[test]
    fn test_total_applies_global_discount() {
        let mut cart = Cart::new();
        let product = test_product("1", 10_000, 5);
        cart.add_item(&product).unwrap();
        cart.add_item(&product).unwrap();
        cart.set_item_discount("1", 10.0); // 200.00 → 180.00
        cart.set_global_discount(5.0); // 180.00 → 171.00

        let totals = cart.totals();
        assert_eq!(totals.subtotal.cents(), 18_000);
        assert_eq!(totals.discount.cents(), 900);
        assert_eq!(totals.total.cents(), 17_100);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut cart = Cart::new();
        cart.add_item(&test_product("1", 999, 5)).unwrap();
        cart.select_client(Some(ClientRef {
            id: "c1".into(),
            name: "Ana".into(),
            document: "V-1".into(),
        }));
        cart.set_global_discount(10.0);
        cart.set_notes("entregar el viernes");

        cart.clear();
        assert_eq!(cart, Cart::default());
        assert!(cart.total().is_zero());
    }

    #[test]
    fn test_settle_keeps_lines_added_after_sale() {
        let mut cart = Cart::new();
        cart.add_item(&test_product("A", 1000, 5)).unwrap();
        cart.set_notes("entregar");
        let sold = cart.clone();

        let mut untouched = cart.clone();
        untouched.settle(&sold);
        assert_eq!(untouched, Cart::default());

        cart.add_item(&test_product("A", 1000, 5)).unwrap();
        cart.add_item(&test_product("B", 500, 5)).unwrap();
        cart.settle(&sold);

        assert_eq!(cart.item("A").unwrap().quantity, 1);
        assert_eq!(cart.item("B").unwrap().quantity, 1);
        assert_eq!(cart.notes(), "entregar");

        let mut only_sold = sold.clone();
        only_sold.set_notes("otra nota");
        only_sold.settle(&sold);
        assert_eq!(only_sold, Cart::default());
    }

    #[test]
    fn test_checkout_request() {
        let mut cart = Cart::new();
        assert_eq!(
            cart.checkout_request(PaymentMethod::Cash).unwrap_err(),
            CoreError::EmptyCart
        );

        cart.add_item(&test_product("1", 2_500, 5)).unwrap();
        assert_eq!(
            cart.checkout_request(PaymentMethod::Credit).unwrap_err(),
            CoreError::ClientRequired
        );

        cart.set_notes("   ");
        let request = cart.checkout_request(PaymentMethod::Cash).unwrap();
        assert_eq!(request.items.len(), 1);
        assert_eq!(request.total.cents(), 2_500);
        assert!(request.notes.is_none());
        assert!(request.client_id.is_none());

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["total"], serde_json::json!(25.0));
        assert_eq!(json["paymentMethod"], "cash");
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut cart = Cart::new();
        cart.add_item(&test_product("1", 1_999, 4)).unwrap();
        cart.set_item_discount("1", 12.5);
        cart.set_notes("cliente frecuente");

        let json = serde_json::to_string(&cart).unwrap();
        let restored: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, cart);
    }
}
