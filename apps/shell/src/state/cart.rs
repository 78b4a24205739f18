//! # Cart Store
//!
//! The single owner of the current cart session.
//!
//! ## Thread Safety
//! The cart is wrapped in `Arc<Mutex<T>>` because:
//! 1. Multiple commands may access/modify the cart
//! 2. Only one command should modify the cart at a time
//! 3. The snapshot write happens while the lock is held, so the stored blob
//!    always matches the in-memory cart
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Store Operations                                │
//! │                                                                         │
//! │  update(|cart| cart.add_item(&product))                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  lock ──► clone ──► apply f ──► Err? ──► unchanged, return Err          │
//! │                         │                                               │
//! │                         ▼ Ok                                            │
//! │                changed? ── no ──► return                                │
//! │                         │                                               │
//! │                         ▼ yes                                           │
//! │         persist "cart" (empty cart ⇒ remove key)                        │
//! │                         │                                               │
//! │                         ▼                                               │
//! │             commit ──► watch::send ──► every subscribe() receiver       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use rueda_core::Cart;
use rueda_store::{SnapshotKey, SnapshotRepository, StoreError, StoreResult};
use tokio::sync::{watch, Mutex};
use tracing::debug;

/// Owned cart service with write-through persistence and change notifications.
#[derive(Debug, Clone)]
pub struct CartStore {
    cart: Arc<Mutex<Cart>>,
    changes: Arc<watch::Sender<Cart>>,
    snapshots: SnapshotRepository,
}

impl CartStore {
    /// Restores the cart saved under `cart`, or starts empty.
    pub async fn load(snapshots: SnapshotRepository) -> StoreResult<Self> {
        let cart: Cart = snapshots
            .get_json(SnapshotKey::Cart)
            .await?
            .unwrap_or_default();
        debug!(items = cart.item_count(), "Cart restored");

        let (changes, _) = watch::channel(cart.clone());
        Ok(CartStore {
            cart: Arc::new(Mutex::new(cart)),
            changes: Arc::new(changes),
            snapshots,
        })
    }

    /// A copy of the current cart.
    pub async fn snapshot(&self) -> Cart {
        self.cart.lock().await.clone()
    }

    /// Executes a function with read access to the cart.
    pub async fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.cart.lock().await;
        f(&cart)
    }

    /// Applies `f` to the cart, persists the result and notifies subscribers.
    ///
    /// When `f` fails, or the snapshot cannot be written, the cart stays as it
    /// was.
    pub async fn update<F, R, E>(&self, f: F) -> Result<R, E>
    where
        F: FnOnce(&mut Cart) -> Result<R, E>,
        E: From<StoreError>,
    {
        let mut cart = self.cart.lock().await;
        let mut next = cart.clone();
        let result = f(&mut next)?;

        if next != *cart {
            self.persist(&next).await?;
            *cart = next;
            self.changes.send_replace(cart.clone());
        }
        Ok(result)
    }

    /// Removes what a completed sale took out of the cart (see [`Cart::settle`]).
    ///
    /// Unlike [`CartStore::update`], the in-memory cart is committed even when
    /// the snapshot write fails. The write error is returned.
    pub async fn settle(&self, sold: &Cart) -> StoreResult<()> {
        let mut cart = self.cart.lock().await;
        let mut next = cart.clone();
        next.settle(sold);
        if next == *cart {
            return Ok(());
        }

        let persisted = self.persist(&next).await;
        *cart = next;
        self.changes.send_replace(cart.clone());
        persisted
    }

    /// Receives the cart after every committed change.
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.changes.subscribe()
    }

    /// Replaces the in-memory cart with the stored snapshot.
    pub async fn reload(&self) -> StoreResult<Cart> {
        let mut cart = self.cart.lock().await;
        let stored: Cart = self
            .snapshots
            .get_json(SnapshotKey::Cart)
            .await?
            .unwrap_or_default();
        if stored != *cart {
            *cart = stored;
            self.changes.send_replace(cart.clone());
        }
        Ok(cart.clone())
    }

    async fn persist(&self, cart: &Cart) -> StoreResult<()> {
        if *cart == Cart::default() {
            self.snapshots.remove(SnapshotKey::Cart).await?;
        } else {
            self.snapshots.put_json(SnapshotKey::Cart, cart).await?;
        }
        Ok(())
    }
}
