//! SQLite backend for the Proninos friend registry.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! thread without blocking the async runtime. Every write runs in its own
//! transaction together with the denormalized values it refreshes.

mod address;
mod catalog;
mod code;
mod contact;
mod contribution;
mod encode;
mod friend;
mod party;
mod registry;
mod schema;
mod store;
mod sync;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
