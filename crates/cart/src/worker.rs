//! Background task that loads the stored cart and persists new snapshots.
//!
//! The worker first reads the snapshot stored under [`STORAGE_KEY`], then
//! writes every newer snapshot it observes. Snapshots published while a write
//! is in flight are coalesced: only the newest one is written next.

use std::sync::Arc;

use marketplace_cart_core::{Cart, decode_cart, encode_cart};
use tokio::sync::{oneshot, watch};
use tracing::{debug, error, info, instrument, warn};

use crate::STORAGE_KEY;
use crate::error::CartError;
use crate::storage::KeyValueStore;
use crate::store::{CartHandle, CartState};

pub(crate) struct Worker {
    pub(crate) handle: CartHandle,
    pub(crate) store: Arc<dyn KeyValueStore>,
    pub(crate) rx: watch::Receiver<CartState>,
    pub(crate) shutdown: oneshot::Receiver<()>,
}

impl Worker {
    /// Run until shutdown is requested or the provider is dropped.
    ///
    /// Returns the outcome of the initial load; write failures are logged and
    /// retried with the next snapshot.
    pub(crate) async fn run(mut self) -> Result<(), CartError> {
        let outcome = self.hydrate().await;

        // Revision 0 is whatever storage already holds.
        let mut persisted = 0;
        loop {
            tokio::select! {
                changed = self.rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                _ = &mut self.shutdown => break,
            }
            persisted = self.persist_latest(persisted).await;
        }

        persisted = self.persist_latest(persisted).await;
        debug!(revision = persisted, "Cart worker stopped");
        outcome
    }

    async fn hydrate(&self) -> Result<(), CartError> {
        match load(self.store.as_ref()).await {
            Ok(Some(cart)) => {
                let items = cart.len();
                if self.handle.install_loaded(cart) {
                    info!(items, "Restored cart from storage");
                } else {
                    warn!(items, "Cart changed before load finished, discarding stored snapshot");
                }
                Ok(())
            }
            Ok(None) => {
                self.handle.finish_loading();
                debug!("No stored cart, starting empty");
                Ok(())
            }
            Err(e) => {
                self.handle.finish_loading();
                error!(error = %e, "Failed to load stored cart");
                Err(e)
            }
        }
    }

    /// Write the newest snapshot if it is newer than `persisted`.
    ///
    /// Returns the revision now in storage.
    async fn persist_latest(&mut self, persisted: u64) -> u64 {
        let (cart, revision) = {
            let state = self.rx.borrow_and_update();
            (Arc::clone(&state.cart), state.revision)
        };
        if revision == persisted {
            return persisted;
        }

        match save(self.store.as_ref(), &cart).await {
            Ok(()) => {
                debug!(revision, items = cart.len(), "Persisted cart");
                revision
            }
            Err(e) => {
                error!(error = %e, revision, "Failed to persist cart");
                persisted
            }
        }
    }
}

#[instrument(skip_all, fields(key = STORAGE_KEY))]
async fn load(store: &dyn KeyValueStore) -> Result<Option<Cart>, CartError> {
    let Some(raw) = store.get(STORAGE_KEY).await? else {
        return Ok(None);
    };
    Ok(Some(decode_cart(&raw)?))
}

#[instrument(skip_all, fields(key = STORAGE_KEY))]
async fn save(store: &dyn KeyValueStore, cart: &Cart) -> Result<(), CartError> {
    let raw = encode_cart(cart)?;
    store.set(STORAGE_KEY, &raw).await?;
    Ok(())
}
