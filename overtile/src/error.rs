//! Error taxonomy for tile requests.
//!
//! Every failure is local to one request. Errors are `Clone` so a single
//! outcome can be handed to every caller coalesced onto the same work.

use crate::coord::{CoordError, TileAddress};
use crate::decode::DecodeError;
use crate::storage::StorageError;
use thiserror::Error;

/// Errors returned by the tile engine and decode cache.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TileError {
    /// Storage holds no tile at the resolved address
    #[error("No tile at {0}")]
    NotFound(TileAddress),

    /// Payload could not be decoded
    #[error("Failed to decode tile {address}: {source}")]
    Decode {
        address: TileAddress,
        #[source]
        source: DecodeError,
    },

    /// Requested address violates `x, y < 2^zoom`
    #[error("Invalid tile address: {0}")]
    InvalidAddress(#[source] CoordError),

    /// Projection math failed while building the overzoom window
    #[error("Projection error: {0}")]
    Projection(#[source] CoordError),

    /// Storage backend failed, including caller-imposed timeouts
    #[error("Failed to fetch tile {address}: {source}")]
    Storage {
        address: TileAddress,
        #[source]
        source: StorageError,
    },

    /// Source advertises no maximum zoom and overzoom policy is fail-fast
    #[error("Source has no maximum zoom and the overzoom policy requires one")]
    MaxZoomUnknown,

    /// Work for this address was abandoned before producing a result
    #[error("Decode of tile {0} was cancelled")]
    Cancelled(TileAddress),
}

impl TileError {
    /// True for the "draw nothing here" outcome.
    pub fn is_not_found(&self) -> bool {
        matches!(self, TileError::NotFound(_))
    }
}
