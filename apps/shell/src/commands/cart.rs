//! # Cart Commands
//!
//! Commands for cart manipulation. All of them go through [`CartStore`], so
//! every change is persisted and published to subscribers.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Cart  │────►│ Checkout │────►│   Sale   │       │
//! │  │  Cart    │     │          │     │          │     │ recorded │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                                  │             │
//! │                   add_to_cart                        cart cleared       │
//! │                   update_cart_item                  (sale.rs)           │
//! │                   set_*_discount                                        │
//! │                   select_client                                         │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                   clear_cart ──────────────────────► (back to empty)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rueda_core::{Cart, CartTotals, ClientRef};
use serde::Serialize;
use tracing::debug;

use crate::error::{CommandError, CommandResult};
use crate::state::{ApiState, CartStore};

/// Cart response including items and totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    #[serde(flatten)]
    pub cart: Cart,
    pub totals: CartTotals,
}

impl From<&Cart> for CartResponse {
    fn from(cart: &Cart) -> Self {
        CartResponse {
            cart: cart.clone(),
            totals: cart.totals(),
        }
    }
}

/// Gets the current cart contents.
pub async fn get_cart(cart: &CartStore) -> CartResponse {
    debug!("get_cart command");
    cart.with_cart(|c| CartResponse::from(c)).await
}

/// Adds one unit of a product to the cart.
///
/// ## Behavior
/// - The product is read fresh from the backend, so the stock ceiling is
///   current (the cached list may be up to one refresh interval old)
/// - Already in cart: quantity + 1 (fails past the stock)
/// - Not in cart: added with quantity 1, price frozen
pub async fn add_to_cart(
    api: &ApiState,
    cart: &CartStore,
    product_id: &str,
) -> CommandResult<CartResponse> {
    debug!(product_id = %product_id, "add_to_cart command");

    let product = api
        .client()
        .get_product(product_id)
        .await
        .map_err(|e| CommandError::from_lookup(e, "Product", product_id))?;

    if !product.is_active {
        return Err(CommandError::validation("Product is not available for sale"));
    }

    cart.update(|c| -> CommandResult<CartResponse> {
        c.add_item(&product)?;
        Ok(CartResponse::from(&*c))
    })
    .await
}

/// Sets the quantity of a cart line. 0 or less removes it.
pub async fn update_cart_item(
    cart: &CartStore,
    product_id: &str,
    quantity: i64,
) -> CommandResult<CartResponse> {
    debug!(product_id = %product_id, quantity, "update_cart_item command");

    cart.update(|c| -> CommandResult<CartResponse> {
        c.set_quantity(product_id, quantity)?;
        Ok(CartResponse::from(&*c))
    })
    .await
}

/// Removes a line. Removing a product that is not in the cart is a no-op.
pub async fn remove_from_cart(cart: &CartStore, product_id: &str) -> CommandResult<CartResponse> {
    debug!(product_id = %product_id, "remove_from_cart command");

    cart.update(|c| -> CommandResult<CartResponse> {
        c.remove_item(product_id);
        Ok(CartResponse::from(&*c))
    })
    .await
}

/// Sets a line discount, clamped to 0..=100 %.
pub async fn set_item_discount(
    cart: &CartStore,
    product_id: &str,
    percent: f64,
) -> CommandResult<CartResponse> {
    debug!(product_id = %product_id, percent, "set_item_discount command");

    cart.update(|c| -> CommandResult<CartResponse> {
        c.set_item_discount(product_id, percent);
        Ok(CartResponse::from(&*c))
    })
    .await
}

/// Sets the discount applied to the whole subtotal, clamped to 0..=100 %.
pub async fn set_global_discount(cart: &CartStore, percent: f64) -> CommandResult<CartResponse> {
    debug!(percent, "set_global_discount command");

    cart.update(|c| -> CommandResult<CartResponse> {
        c.set_global_discount(percent);
        Ok(CartResponse::from(&*c))
    })
    .await
}

/// Attaches a client to the cart, or detaches it with `None`.
pub async fn select_client(
    api: &ApiState,
    cart: &CartStore,
    client_id: Option<&str>,
) -> CommandResult<CartResponse> {
    debug!(client_id = ?client_id, "select_client command");

    let client = match client_id {
        Some(id) => {
            let client = api
                .client()
                .get_client(id)
                .await
                .map_err(|e| CommandError::from_lookup(e, "Client", id))?;
            Some(ClientRef::from(&client))
        }
        None => None,
    };

    cart.update(|c| -> CommandResult<CartResponse> {
        c.select_client(client);
        Ok(CartResponse::from(&*c))
    })
    .await
}

pub async fn set_notes(cart: &CartStore, notes: &str) -> CommandResult<CartResponse> {
    debug!("set_notes command");

    cart.update(|c| -> CommandResult<CartResponse> {
        c.set_notes(notes);
        Ok(CartResponse::from(&*c))
    })
    .await
}

/// Empties the cart and resets client, discount and notes.
pub async fn clear_cart(cart: &CartStore) -> CommandResult<CartResponse> {
    debug!("clear_cart command");

    cart.update(|c| -> CommandResult<CartResponse> {
        c.clear();
        Ok(CartResponse::from(&*c))
    })
    .await
}
