//! Single-flight coalescing of tile decodes.
//!
//! The first caller to miss on an address becomes the leader and owns an
//! [`InFlightGuard`]. Later callers for the same address subscribe to the
//! leader's broadcast channel and receive the same outcome.
//!
//! ```text
//! Request A ─┐
//!            │                          fetch + decode
//! Request B ─┼──► RequestCoalescer ───► (leader only)
//!            │          │                     │
//! Request C ─┘          ▼                     ▼
//!                 [A, B, C all receive the same outcome]
//! ```
//!
//! If the leader is dropped before completing, the guard removes the
//! in-flight slot and closes the channel. Waiters observe the close and
//! register again, so one of them takes over.

use crate::coord::TileAddress;
use crate::decode::VectorTile;
use crate::error::TileError;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::debug;

/// Outcome shared between a leader and its waiters.
pub(crate) type DecodeOutcome = Result<Arc<VectorTile>, TileError>;

/// What a caller should do after registering interest in an address.
pub(crate) enum Registration<'a> {
    /// The tile was stored while the in-flight table was locked
    Cached(Arc<VectorTile>),
    /// No decode in flight; the caller must produce the outcome
    Leader(InFlightGuard<'a>),
    /// Another caller is decoding; wait on the receiver
    Waiter(broadcast::Receiver<DecodeOutcome>),
}

/// Tracks in-flight decodes, one broadcast channel per address.
#[derive(Default)]
pub(crate) struct RequestCoalescer {
    in_flight: Mutex<HashMap<TileAddress, broadcast::Sender<DecodeOutcome>>>,
    abandoned: AtomicU64,
}

impl RequestCoalescer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Registers interest in `address`.
    ///
    /// `lookup` runs with the in-flight table locked. A leader stores its tile
    /// before releasing its slot, so a caller that raced past the first store
    /// check still sees the tile here instead of starting a second decode.
    pub(crate) fn register<F>(&self, address: TileAddress, lookup: F) -> Registration<'_>
    where
        F: FnOnce() -> Option<Arc<VectorTile>>,
    {
        let mut in_flight = self.in_flight.lock();

        if let Some(tx) = in_flight.get(&address) {
            debug!(tile = %address, "Coalescing request onto in-flight decode");
            return Registration::Waiter(tx.subscribe());
        }

        if let Some(tile) = lookup() {
            return Registration::Cached(tile);
        }

        // A single outcome is ever sent per channel.
        let (tx, _rx) = broadcast::channel(1);
        in_flight.insert(address, tx.clone());
        debug!(
            tile = %address,
            in_flight_count = in_flight.len(),
            "New decode - leading"
        );

        Registration::Leader(InFlightGuard {
            coalescer: self,
            address,
            sender: Some(tx),
        })
    }

    /// Number of addresses with a decode in flight.
    pub(crate) fn in_flight_count(&self) -> usize {
        self.in_flight.lock().len()
    }

    /// Number of leaders dropped without completing.
    pub(crate) fn abandoned_count(&self) -> u64 {
        self.abandoned.load(Ordering::Relaxed)
    }

    fn release(&self, address: &TileAddress) {
        self.in_flight.lock().remove(address);
    }
}

/// Leadership of one in-flight decode.
///
/// Dropping the guard without calling [`InFlightGuard::complete`] frees the
/// slot and wakes every waiter with a closed channel.
pub(crate) struct InFlightGuard<'a> {
    coalescer: &'a RequestCoalescer,
    address: TileAddress,
    sender: Option<broadcast::Sender<DecodeOutcome>>,
}

impl InFlightGuard<'_> {
    /// Releases the slot and hands `outcome` to every waiter.
    ///
    /// Returns the number of waiters that were subscribed.
    pub(crate) fn complete(mut self, outcome: DecodeOutcome) -> usize {
        self.coalescer.release(&self.address);

        let Some(tx) = self.sender.take() else {
            return 0;
        };

        let waiters = tx.receiver_count();
        // No receivers is fine: nobody coalesced onto this decode.
        let _ = tx.send(outcome);

        if waiters > 0 {
            debug!(tile = %self.address, waiters, "Broadcast decode outcome");
        }
        waiters
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if self.sender.take().is_some() {
            self.coalescer.release(&self.address);
            self.coalescer.abandoned.fetch_add(1, Ordering::Relaxed);
            debug!(tile = %self.address, "In-flight decode abandoned");
        }
    }
}
