//! Cart errors.

use thiserror::Error;

use crate::domain::products::models::ProductUuid;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("cart is empty")]
    Empty,

    #[error("product {0} is not in the cart")]
    NotInCart(ProductUuid),
}
