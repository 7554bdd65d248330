//! In-memory cart state and the handle consumers use to read and mutate it.
//!
//! The current cart is an `Arc<Cart>` published through a `tokio::sync::watch`
//! channel. Every mutation builds a new cart and swaps it in, so a snapshot
//! obtained from [`CartHandle::products`] never changes underneath its reader.

use std::sync::Arc;

use marketplace_cart_core::{Cart, NewLineItem};
use tokio::sync::watch;
use tracing::debug;

/// State published on the watch channel.
#[derive(Debug, Clone, Default)]
pub(crate) struct CartState {
    pub(crate) cart: Arc<Cart>,
    /// Number of mutations applied since the provider started.
    ///
    /// Zero means the in-memory cart still matches what was loaded.
    pub(crate) revision: u64,
    /// Whether the initial load from storage has finished.
    pub(crate) loaded: bool,
}

/// Cloneable access to the cart: the current snapshot plus its mutations.
///
/// Mutations apply synchronously and return whether the cart changed.
/// Persistence happens in the background and is not awaited.
#[derive(Debug, Clone)]
pub struct CartHandle {
    tx: Arc<watch::Sender<CartState>>,
}

impl CartHandle {
    pub(crate) fn new() -> Self {
        let (tx, _rx) = watch::channel(CartState::default());
        Self { tx: Arc::new(tx) }
    }

    pub(crate) fn receiver(&self) -> watch::Receiver<CartState> {
        self.tx.subscribe()
    }

    /// Current cart snapshot.
    #[must_use]
    pub fn products(&self) -> Arc<Cart> {
        Arc::clone(&self.tx.borrow().cart)
    }

    /// Add one unit of a product.
    ///
    /// A product already in the cart gets its quantity bumped by one; its
    /// stored title, image and price are kept. A new product is appended with
    /// quantity 1, unless its price could not be persisted.
    pub fn add_to_cart(&self, item: NewLineItem) -> bool {
        let id = item.id.clone();
        let changed = self.mutate(|cart| cart.add(item));
        debug!(product_id = %id, changed, "add_to_cart");
        changed
    }

    /// Add one unit of a product already in the cart. No-op if absent.
    pub fn increment(&self, id: impl AsRef<str>) -> bool {
        let id = id.as_ref();
        let changed = self.mutate(|cart| cart.increment(id));
        debug!(product_id = id, changed, "increment");
        changed
    }

    /// Remove one unit of a product, dropping the line when it reaches zero.
    /// No-op if absent.
    pub fn decrement(&self, id: impl AsRef<str>) -> bool {
        let id = id.as_ref();
        let changed = self.mutate(|cart| cart.decrement(id));
        debug!(product_id = id, changed, "decrement");
        changed
    }

    /// Watch for new cart snapshots.
    #[must_use]
    pub fn subscribe(&self) -> CartWatcher {
        CartWatcher {
            rx: self.tx.subscribe(),
        }
    }

    /// Whether the initial load from storage has finished.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.tx.borrow().loaded
    }

    /// Wait until the initial load from storage has finished.
    ///
    /// Waiting is optional: the cart is usable (empty) before the load
    /// completes. Returns immediately if the load already finished, whether it
    /// succeeded or not.
    pub async fn loaded(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in `self`, so the channel cannot close here.
        let _ = rx.wait_for(|state| state.loaded).await;
    }

    fn mutate(&self, apply: impl FnOnce(&mut Cart) -> bool) -> bool {
        self.tx.send_if_modified(|state| {
            let mut next = Cart::clone(&state.cart);
            if !apply(&mut next) {
                return false;
            }
            state.cart = Arc::new(next);
            state.revision += 1;
            true
        })
    }

    /// Install the cart read from storage.
    ///
    /// The loaded cart only replaces the in-memory one if no mutation has been
    /// applied yet. Returns `false` if it was discarded.
    pub(crate) fn install_loaded(&self, cart: Cart) -> bool {
        let mut installed = false;
        self.tx.send_modify(|state| {
            state.loaded = true;
            if state.revision == 0 {
                state.cart = Arc::new(cart);
                installed = true;
            }
        });
        installed
    }

    /// Mark the initial load finished without installing anything.
    pub(crate) fn finish_loading(&self) {
        self.tx.send_modify(|state| state.loaded = true);
    }
}

/// Observer of cart snapshots.
#[derive(Debug, Clone)]
pub struct CartWatcher {
    rx: watch::Receiver<CartState>,
}

impl CartWatcher {
    /// Current cart snapshot, marking it as seen.
    #[must_use]
    pub fn products(&mut self) -> Arc<Cart> {
        Arc::clone(&self.rx.borrow_and_update().cart)
    }

    /// Wait for a snapshot newer than the last one seen.
    ///
    /// Returns `None` once the cart store is gone.
    pub async fn changed(&mut self) -> Option<Arc<Cart>> {
        self.rx.changed().await.ok()?;
        Some(self.products())
    }
}
