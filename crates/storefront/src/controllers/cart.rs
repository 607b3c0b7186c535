//! Cart page and add-to-cart handlers.
//!
//! Every quantity change is checked against the catalog's live stock before
//! it reaches the cart.

use tracing::instrument;

use az_clothes_core::{CartAction, CartItem, Price, ProductId, Slug, subtotal};

use crate::error::{AppError, FormErrors, Result};
use crate::services::ProductCatalog;
use crate::state::CartSession;
use crate::store::CartStore;

/// Cart line display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItemView {
    pub slug: Slug,
    pub name: String,
    pub image: String,
    pub quantity: u32,
    pub price: Price,
    pub line_total: Price,
    /// Upper bound of the quantity selector.
    pub max_quantity: u32,
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        Self {
            slug: item.slug.clone(),
            name: item.name.clone(),
            image: item.image.clone(),
            quantity: item.quantity,
            price: item.price,
            line_total: item.line_total(),
            max_quantity: item.count_in_stock,
        }
    }
}

/// Cart page display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    /// Total units, shown on the cart badge.
    pub item_count: u32,
    /// Unrounded sum of line totals.
    pub subtotal: Price,
}

impl CartView {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Cart operations for one shopper.
pub struct CartController<'a, S, C> {
    session: &'a mut CartSession<S>,
    catalog: &'a C,
}

impl<'a, S: CartStore, C: ProductCatalog> CartController<'a, S, C> {
    pub const fn new(session: &'a mut CartSession<S>, catalog: &'a C) -> Self {
        Self { session, catalog }
    }

    /// Add one more unit of `slug` to the cart.
    ///
    /// # Errors
    ///
    /// Returns `AppError::OutOfStock` if the catalog cannot cover the new
    /// quantity, or a catalog error if the product cannot be looked up.
    #[instrument(skip_all, fields(slug = %slug))]
    pub async fn add_product(&mut self, slug: &Slug) -> Result<CartView> {
        let product = self.catalog.product(slug).await?;
        let quantity = self
            .session
            .state()
            .find(slug)
            .map_or(1, |existing| existing.quantity.saturating_add(1));

        let available = self.check_stock(slug, &product.id, quantity).await?;

        let mut item = product.to_cart_item(quantity);
        item.count_in_stock = available;
        self.session.dispatch(CartAction::AddItem(item));

        tracing::info!(quantity, "Added to cart");
        Ok(self.view())
    }

    /// Set the quantity of a line already in the cart.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for a zero quantity,
    /// `AppError::ItemNotInCart` if `slug` is not in the cart, and
    /// `AppError::OutOfStock` if the catalog cannot cover `quantity`.
    #[instrument(skip_all, fields(slug = %slug, quantity = quantity))]
    pub async fn update_quantity(&mut self, slug: &Slug, quantity: u32) -> Result<CartView> {
        if quantity == 0 {
            let mut errors = FormErrors::default();
            errors.push("quantity", "Quantity must be at least 1");
            return Err(errors.into());
        }

        let item = self
            .session
            .state()
            .find(slug)
            .cloned()
            .ok_or_else(|| AppError::ItemNotInCart(slug.clone()))?;

        let id = match &item.id {
            Some(id) => id.clone(),
            None => self.catalog.product(slug).await?.id,
        };
        let available = self.check_stock(slug, &id, quantity).await?;

        let mut updated = item.with_quantity(quantity);
        updated.id = Some(id);
        updated.count_in_stock = available;
        self.session.dispatch(CartAction::AddItem(updated));

        Ok(self.view())
    }

    /// Remove a line from the cart.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ItemNotInCart` if `slug` is not in the cart.
    #[instrument(skip_all, fields(slug = %slug))]
    pub fn remove(&mut self, slug: &Slug) -> Result<CartView> {
        let action = self
            .session
            .state()
            .find(slug)
            .map(CartAction::remove)
            .ok_or_else(|| AppError::ItemNotInCart(slug.clone()))?;

        self.session.dispatch(action);
        Ok(self.view())
    }

    /// Current cart page contents.
    #[must_use]
    pub fn view(&self) -> CartView {
        let state = self.session.state();
        CartView {
            items: state.cart_items.iter().map(CartItemView::from).collect(),
            item_count: state.item_count(),
            subtotal: subtotal(&state.cart_items),
        }
    }

    /// Live stock for `id`, if it covers `requested`.
    async fn check_stock(&self, slug: &Slug, id: &ProductId, requested: u32) -> Result<u32> {
        let available = self.catalog.current_stock(id).await?;
        if available < requested {
            tracing::info!(requested, available, "Insufficient stock");
            return Err(AppError::OutOfStock {
                slug: slug.clone(),
                requested,
                available,
            });
        }
        Ok(available)
    }
}
