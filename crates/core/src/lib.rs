//! Az Clothes Core - cart state machine and shared types.
//!
//! This crate is used by:
//! - `storefront` - Controllers, collaborators and the persisted cart session
//! - `cli` - Command-line driver for a file-backed cart
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! persistence, no HTTP clients. Every cart mutation goes through
//! [`cart::transition`], which is total over [`cart::CartAction`]; callers
//! decide what to do with the resulting state (persist it, render it).
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, slugs, emails, prices and payment methods
//! - [`cart`] - Cart state, actions, pricing aggregation and the checkout stage graph

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use cart::{
    CartAction, CartItem, CartState, CheckoutStage, CheckoutStep, OrderSummary, ShippingAddress,
    subtotal, transition,
};
pub use types::*;
