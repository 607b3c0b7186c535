//! Cart actions and the transition function.

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{CartItem, CartState, ShippingAddress};
use crate::types::{PaymentMethod, Slug};

/// Everything a view can ask the cart to do.
///
/// Actions use the `{"type": ..., "payload": ...}` envelope. Any `type` this
/// build does not know deserializes to [`CartAction::Unknown`], which leaves
/// the cart untouched, so newer clients can send actions older ones ignore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "payload")]
pub enum CartAction {
    /// Insert the item, or overwrite the line with the same slug in place.
    ///
    /// The quantity is taken as-is; callers compute increments and check
    /// stock before dispatching.
    #[serde(rename = "CART_ADD_ITEM")]
    AddItem(CartItem),
    /// Drop the line with this slug. Absent slugs are a no-op.
    #[serde(rename = "CART_REMOVE_ITEM")]
    RemoveItem {
        slug: Slug,
    },
    /// Empty the lines but keep the address and payment method.
    #[serde(rename = "CART_CLEAR_ITEMS")]
    ClearItems,
    #[serde(rename = "SAVE_SHIPPING_ADDRESS")]
    SaveShippingAddress(ShippingAddress),
    #[serde(rename = "SAVE_PAYMENT_METHOD")]
    SavePaymentMethod(PaymentMethod),
    /// Back to the empty cart (logout).
    #[serde(rename = "CART_RESET")]
    Reset,
    /// An action type this build does not handle. Its payload is dropped.
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

/// Wire envelope, read before the `type` is known.
#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    payload: Value,
}

#[derive(Deserialize)]
struct RemovePayload {
    slug: Slug,
}

impl<'de> Deserialize<'de> for CartAction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let Envelope { kind, payload } = Envelope::deserialize(deserializer)?;

        let action = match kind.as_str() {
            "CART_ADD_ITEM" => Self::AddItem(from_payload(payload)?),
            "CART_REMOVE_ITEM" => {
                let RemovePayload { slug } = from_payload(payload)?;
                Self::RemoveItem { slug }
            }
            "CART_CLEAR_ITEMS" => Self::ClearItems,
            "SAVE_SHIPPING_ADDRESS" => Self::SaveShippingAddress(from_payload(payload)?),
            "SAVE_PAYMENT_METHOD" => Self::SavePaymentMethod(from_payload(payload)?),
            "CART_RESET" => Self::Reset,
            _ => Self::Unknown,
        };
        Ok(action)
    }
}

fn from_payload<T: DeserializeOwned, E: de::Error>(payload: Value) -> Result<T, E> {
    serde_json::from_value(payload).map_err(E::custom)
}

impl CartAction {
    /// Remove the line holding `item`.
    #[must_use]
    pub fn remove(item: &CartItem) -> Self {
        Self::RemoveItem {
            slug: item.slug.clone(),
        }
    }

    /// Whether applying this action can change the cart.
    #[must_use]
    pub const fn is_mutating(&self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Wire name of the action, for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::AddItem(_) => "CART_ADD_ITEM",
            Self::RemoveItem { .. } => "CART_REMOVE_ITEM",
            Self::ClearItems => "CART_CLEAR_ITEMS",
            Self::SaveShippingAddress(_) => "SAVE_SHIPPING_ADDRESS",
            Self::SavePaymentMethod(_) => "SAVE_PAYMENT_METHOD",
            Self::Reset => "CART_RESET",
            Self::Unknown => "UNKNOWN",
        }
    }
}

/// Compute the cart that results from applying `action` to `state`.
///
/// Total and pure: no action fails and nothing outside the returned value
/// changes.
#[must_use]
pub fn transition(mut state: CartState, action: CartAction) -> CartState {
    state.apply(action);
    state
}

impl CartState {
    /// Apply `action` in place. See [`transition`].
    pub fn apply(&mut self, action: CartAction) {
        match action {
            CartAction::AddItem(item) => {
                match self.cart_items.iter_mut().find(|line| line.slug == item.slug) {
                    Some(line) => *line = item,
                    None => self.cart_items.push(item),
                }
            }
            CartAction::RemoveItem { slug } => {
                self.cart_items.retain(|line| line.slug != slug);
            }
            CartAction::ClearItems => self.cart_items.clear(),
            CartAction::SaveShippingAddress(address) => self.shipping_address = address,
            CartAction::SavePaymentMethod(method) => self.payment_method = method,
            CartAction::Reset => *self = Self::default(),
            CartAction::Unknown => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::{address, item};
    use super::*;

    fn cart(items: Vec<CartItem>) -> CartState {
        CartState {
            cart_items: items,
            ..CartState::default()
        }
    }

    fn slugs(state: &CartState) -> Vec<&str> {
        state.cart_items.iter().map(|i| i.slug.as_str()).collect()
    }

    #[test]
    fn test_add_new_item_appends() {
        let state = cart(vec![item("free-shirt", 70, 1)]);
        let next = transition(state, CartAction::AddItem(item("fit-pants", 90, 1)));

        assert_eq!(slugs(&next), ["free-shirt", "fit-pants"]);
    }

    #[test]
    fn test_add_existing_item_replaces_in_place() {
        let state = cart(vec![
            item("free-shirt", 70, 1),
            item("fit-pants", 90, 1),
            item("golf-pants", 90, 1),
        ]);
        let next = transition(state, CartAction::AddItem(item("fit-pants", 90, 4)));

        assert_eq!(slugs(&next), ["free-shirt", "fit-pants", "golf-pants"]);
        assert_eq!(next.cart_items[1].quantity, 4);
    }

    #[test]
    fn test_add_overwrites_rather_than_increments() {
        let state = cart(vec![item("free-shirt", 70, 3)]);
        let next = transition(state, CartAction::AddItem(item("free-shirt", 70, 1)));

        assert_eq!(next.cart_items.len(), 1);
        assert_eq!(next.cart_items[0].quantity, 1);
    }

    #[test]
    fn test_add_with_renamed_product_still_matches_by_slug() {
        let state = cart(vec![item("free-shirt", 70, 1), item("fit-pants", 90, 1)]);
        let mut renamed = item("fit-pants", 95, 2);
        renamed.name = "Fit Pants (new season)".to_owned();

        let next = transition(state, CartAction::AddItem(renamed.clone()));

        assert_eq!(next.cart_items, vec![item("free-shirt", 70, 1), renamed]);
    }

    #[test]
    fn test_remove_item() {
        let state = cart(vec![item("free-shirt", 70, 1), item("fit-pants", 90, 1)]);
        let next = transition(state, CartAction::remove(&item("free-shirt", 0, 1)));

        assert_eq!(slugs(&next), ["fit-pants"]);
    }

    #[test]
    fn test_remove_absent_slug_is_noop() {
        let state = cart(vec![item("free-shirt", 70, 1)]);
        let next = transition(state.clone(), CartAction::remove(&item("golf-pants", 90, 1)));

        assert_eq!(next, state);
    }

    #[test]
    fn test_remove_twice_equals_remove_once() {
        let state = cart(vec![item("free-shirt", 70, 1), item("fit-pants", 90, 1)]);
        let action = CartAction::remove(&item("free-shirt", 70, 1));

        let once = transition(state, action.clone());
        let twice = transition(once.clone(), action);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_clear_items_keeps_checkout_details() {
        let state = CartState {
            cart_items: vec![item("free-shirt", 70, 1)],
            shipping_address: address(),
            payment_method: PaymentMethod::from("Stripe"),
        };
        let next = transition(state, CartAction::ClearItems);

        assert!(next.cart_items.is_empty());
        assert_eq!(next.shipping_address, address());
        assert_eq!(next.payment_method.as_str(), "Stripe");
    }

    #[test]
    fn test_save_shipping_and_payment() {
        let next = transition(
            CartState::default(),
            CartAction::SaveShippingAddress(address()),
        );
        let next = transition(next, CartAction::SavePaymentMethod("PayPal".into()));

        assert_eq!(next.shipping_address, address());
        assert_eq!(next.payment_method.as_str(), "PayPal");
    }

    #[test]
    fn test_reset_restores_default() {
        let state = CartState {
            cart_items: vec![item("free-shirt", 70, 1)],
            shipping_address: address(),
            payment_method: PaymentMethod::from("PayPal"),
        };

        assert_eq!(transition(state, CartAction::Reset), CartState::default());
    }

    #[test]
    fn test_unknown_action_is_identity() {
        let state = cart(vec![item("free-shirt", 70, 1)]);
        let next = transition(state.clone(), CartAction::Unknown);

        assert_eq!(next, state);
        assert!(!CartAction::Unknown.is_mutating());
    }

    #[test]
    fn test_unknown_action_type_deserializes() {
        let action: Result<CartAction, _> = serde_json::from_str(r#"{"type":"CART_APPLY_COUPON"}"#);
        assert_eq!(action.ok(), Some(CartAction::Unknown));
    }

    #[test]
    fn test_unknown_action_with_payload_deserializes() {
        let payload_last: Result<CartAction, _> =
            serde_json::from_str(r#"{"type":"CART_APPLY_COUPON","payload":{"code":"X"}}"#);
        let payload_first: Result<CartAction, _> =
            serde_json::from_str(r#"{"payload":["a",1],"type":"CART_APPLY_COUPON"}"#);

        assert_eq!(payload_last.ok(), Some(CartAction::Unknown));
        assert_eq!(payload_first.ok(), Some(CartAction::Unknown));
    }

    #[test]
    fn test_known_action_with_bad_payload_is_rejected() {
        let action: Result<CartAction, _> =
            serde_json::from_str(r#"{"type":"CART_REMOVE_ITEM","payload":{"name":"Free Shirt"}}"#);
        assert!(action.is_err());
    }

    #[test]
    fn test_action_round_trips_through_envelope() {
        let action = CartAction::AddItem(item("free-shirt", 70, 2));
        let json = serde_json::to_string(&action).unwrap_or_default();

        assert!(json.starts_with(r#"{"type":"CART_ADD_ITEM","payload":"#));
        let back: Result<CartAction, _> = serde_json::from_str(&json);
        assert_eq!(back.ok(), Some(action));
    }

    #[test]
    fn test_action_envelope() {
        let json = r#"{"type":"CART_REMOVE_ITEM","payload":{"slug":"free-shirt","name":"Free Shirt","quantity":2}}"#;
        let action: Result<CartAction, _> = serde_json::from_str(json);

        assert_eq!(action.ok(), Some(CartAction::remove(&item("free-shirt", 70, 1))));

        let clear: Result<CartAction, _> = serde_json::from_str(r#"{"type":"CART_CLEAR_ITEMS"}"#);
        assert_eq!(clear.ok(), Some(CartAction::ClearItems));
    }
}
