//! Az Clothes storefront library.
//!
//! Everything around the cart state machine: configuration, the snapshot
//! store, the catalog and order collaborators, the [`state::CartSession`]
//! shell that owns a shopper's cart, and the page controllers that drive it.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod controllers;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod store;

pub use error::{AppError, Result};
pub use state::CartSession;
