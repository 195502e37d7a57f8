//! Orders

pub mod errors;
pub mod models;
pub mod pricing;
mod repositories;
pub mod service;
mod validation;

pub use errors::OrdersServiceError;
pub use service::*;
