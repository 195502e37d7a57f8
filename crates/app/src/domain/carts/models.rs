//! Cart Models

use serde::{Deserialize, Serialize};

use crate::domain::{
    carts::errors::CartError,
    orders::{
        models::{CustomerDetails, NewOrder, OrderItem, OrderItems, OrderUuid},
        pricing::DeliveryPolicy,
    },
    products::models::{Product, ProductUuid},
};

/// One product line in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product: ProductUuid,
    pub name: String,
    pub price: u64,
    pub quantity: u32,
    pub image_url: Option<String>,
}

/// Shopping cart held by the client until checkout.
///
/// Serializes to the same shape the storefront keeps in browser storage.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add one unit of a product, returning the line's new quantity.
    pub fn add_product(&mut self, product: &Product) -> u32 {
        if let Some(line) = self.line_mut(product.uuid) {
            line.quantity = line.quantity.saturating_add(1);

            return line.quantity;
        }

        self.lines.push(CartLine {
            product: product.uuid,
            name: product.name.clone(),
            price: product.price,
            quantity: 1,
            image_url: product.image_url.clone(),
        });

        1
    }

    /// Set a line's quantity; zero removes the line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotInCart`] when the product has no line.
    pub fn update_quantity(&mut self, product: ProductUuid, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return if self.remove(product) {
                Ok(())
            } else {
                Err(CartError::NotInCart(product))
            };
        }

        let line = self
            .line_mut(product)
            .ok_or(CartError::NotInCart(product))?;

        line.quantity = quantity;

        Ok(())
    }

    /// Drop a product's line. Returns whether one existed.
    pub fn remove(&mut self, product: ProductUuid) -> bool {
        let before = self.lines.len();

        self.lines.retain(|line| line.product != product);

        self.lines.len() != before
    }

    #[must_use]
    pub fn subtotal(&self) -> u64 {
        self.lines.iter().fold(0_u64, |sum, line| {
            sum.saturating_add(line.price.saturating_mul(u64::from(line.quantity)))
        })
    }

    /// Subtotal plus delivery. An empty cart costs nothing.
    #[must_use]
    pub fn total(&self, delivery: &DeliveryPolicy) -> u64 {
        if self.is_empty() {
            return 0;
        }

        let subtotal = self.subtotal();

        subtotal.saturating_add(delivery.fee_for(subtotal))
    }

    /// Units across every line.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0_u32, |count, line| count.saturating_add(line.quantity))
    }

    /// Turn the cart into a checkout payload.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Empty`] for a cart without lines.
    pub fn checkout(
        self,
        customer: CustomerDetails,
        delivery: &DeliveryPolicy,
    ) -> Result<NewOrder, CartError> {
        if self.is_empty() {
            return Err(CartError::Empty);
        }

        let total_amount = self.total(delivery);

        let items = self
            .lines
            .into_iter()
            .map(|line| OrderItem {
                id: line.product,
                name: line.name,
                price: line.price,
                quantity: line.quantity,
            })
            .collect::<Vec<_>>();

        Ok(NewOrder {
            uuid: OrderUuid::new(),
            customer,
            items: OrderItems::new(items),
            total_amount: Some(total_amount),
        })
    }

    fn line_mut(&mut self, product: ProductUuid) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| line.product == product)
    }
}
