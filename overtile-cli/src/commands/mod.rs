//! Subcommand handlers.
//!
//! - [`tile`] - resolve a tile through the engine
//! - [`info`] - show source metadata
//! - [`locate`] - map a coordinate to a tile address
//! - [`extract`] - copy one raw tile to a file

pub mod extract;
pub mod info;
pub mod locate;
pub mod tile;
