//! Orders service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::{orders::models::OrderStatus, products::models::ProductUuid};

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("product {0} not found")]
    ProductNotFound(ProductUuid),

    #[error("not enough stock for {name}: {available} available, {requested} requested")]
    InsufficientStock {
        product: ProductUuid,
        name: String,
        available: u32,
        requested: u32,
    },

    #[error("order not found")]
    NotFound,

    #[error("cannot move a {from} order to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("authentication required")]
    Unauthenticated,

    #[error("not allowed")]
    Forbidden,

    #[error("order already exists")]
    AlreadyExists,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for OrdersServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
