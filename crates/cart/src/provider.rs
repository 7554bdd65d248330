//! Provider scope and the `use_cart` access function.
//!
//! A [`CartProvider`] owns the cart for an application session: it starts the
//! background worker that restores and persists the cart, and installs its
//! [`CartHandle`] as the current cart for code running inside
//! [`CartProvider::scope`]. Code anywhere below that scope calls [`use_cart`]
//! instead of threading the handle through every layer.
//!
//! The current cart is a tokio task-local, so tasks spawned from inside a
//! scope do not inherit it; pass them a handle from [`CartProvider::handle`]
//! or wrap them in their own scope.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::error::CartError;
use crate::storage::KeyValueStore;
use crate::store::CartHandle;
use crate::worker::Worker;

tokio::task_local! {
    static CURRENT_CART: CartHandle;
}

/// Owner of the cart for an application session.
pub struct CartProvider {
    handle: CartHandle,
    shutdown: oneshot::Sender<()>,
    worker: JoinHandle<Result<(), CartError>>,
}

impl CartProvider {
    /// Create the cart and start restoring it from `store`.
    ///
    /// Returns immediately; the cart is empty until the stored snapshot has
    /// been read. Await [`CartProvider::loaded`] to wait for it.
    ///
    /// Dropping the provider without calling [`CartProvider::shutdown`] stops
    /// the worker after a final write, without reporting its outcome.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn start<S>(store: S) -> Self
    where
        S: KeyValueStore + 'static,
    {
        Self::start_shared(Arc::new(store))
    }

    /// Like [`CartProvider::start`], for a store that is already shared.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn start_shared(store: Arc<dyn KeyValueStore>) -> Self {
        let handle = CartHandle::new();
        let (shutdown, shutdown_rx) = oneshot::channel();

        let worker = Worker {
            handle: handle.clone(),
            rx: handle.receiver(),
            store,
            shutdown: shutdown_rx,
        };
        let worker = tokio::spawn(worker.run());
        debug!("Cart provider started");

        Self {
            handle,
            shutdown,
            worker,
        }
    }

    /// Handle for explicit context passing.
    #[must_use]
    pub fn handle(&self) -> CartHandle {
        self.handle.clone()
    }

    /// Wait until the stored cart has been read.
    pub async fn loaded(&self) {
        self.handle.loaded().await;
    }

    /// Run `future` with this provider's cart as the current cart.
    pub async fn scope<F>(&self, future: F) -> F::Output
    where
        F: Future,
    {
        CURRENT_CART.scope(self.handle.clone(), future).await
    }

    /// Run `f` with this provider's cart as the current cart.
    pub fn sync_scope<R>(&self, f: impl FnOnce() -> R) -> R {
        CURRENT_CART.sync_scope(self.handle.clone(), f)
    }

    /// Stop the worker after writing any snapshot not yet persisted.
    ///
    /// # Errors
    ///
    /// Returns the error that made the initial load fail (unreadable store or
    /// malformed snapshot), or `CartError::WorkerFailed` if the worker panicked
    /// or was cancelled.
    pub async fn shutdown(self) -> Result<(), CartError> {
        let Self {
            handle: _,
            shutdown,
            worker,
        } = self;

        // The worker may already have stopped if its task was cancelled.
        let _ = shutdown.send(());
        let outcome = worker.await.map_err(CartError::WorkerFailed)?;
        info!("Cart provider shut down");
        outcome
    }
}

impl std::fmt::Debug for CartProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartProvider")
            .field("handle", &self.handle)
            .field("worker_finished", &self.worker.is_finished())
            .finish_non_exhaustive()
    }
}

/// Current cart, or `CartError::OutsideProvider` outside a provider scope.
///
/// # Errors
///
/// Returns `CartError::OutsideProvider` if no [`CartProvider`] scope is active
/// on the current task.
pub fn try_use_cart() -> Result<CartHandle, CartError> {
    CURRENT_CART
        .try_with(CartHandle::clone)
        .map_err(|_| CartError::OutsideProvider)
}

/// Current cart.
///
/// # Panics
///
/// Panics if called outside [`CartProvider::scope`] or
/// [`CartProvider::sync_scope`]. Accessing the cart without a provider is a
/// wiring mistake, not a recoverable condition.
#[must_use]
#[track_caller]
pub fn use_cart() -> CartHandle {
    match try_use_cart() {
        Ok(handle) => handle,
        Err(e) => panic!("{e}"),
    }
}
