//! Core types and trait definitions for the Proninos friend registry.
//!
//! This crate is free of database dependencies. It owns the record shapes,
//! the derivation rules for display strings, search text and friend codes,
//! and the [`store::FriendStore`] abstraction that backends implement.

#![allow(async_fn_in_trait)]

pub mod address;
pub mod catalog;
pub mod code;
pub mod contact;
pub mod contribution;
pub mod entity;
pub mod error;
pub mod friend;
pub mod party;
pub mod rfc;
pub mod store;
pub mod text;
pub mod validate;

pub use error::{Error, Result};
