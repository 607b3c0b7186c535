//! Page controllers.
//!
//! Each controller borrows the shopper's [`CartSession`](crate::state::CartSession)
//! for the duration of one request, together with the collaborators it needs.
//!
//! - `cart` - Cart page and add-to-cart
//! - `checkout` - Shipping, payment, review and place order
//! - `account` - Sign out

pub mod account;
pub mod cart;
pub mod checkout;

pub use account::AccountController;
pub use cart::{CartController, CartItemView, CartView};
pub use checkout::{CheckoutController, PaymentForm, PlacedOrder, ReviewView, ShippingForm};
