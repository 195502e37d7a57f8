//! Order Errors

use salvo::http::StatusError;
use tracing::error;

use storefront_app::domain::orders::OrdersServiceError;

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::Validation(message) => StatusError::bad_request().brief(message),
        error @ (OrdersServiceError::InsufficientStock { .. }
        | OrdersServiceError::InvalidTransition { .. }) => {
            StatusError::bad_request().brief(error.to_string())
        }
        OrdersServiceError::InvalidReference
        | OrdersServiceError::MissingRequiredData
        | OrdersServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid order payload")
        }
        OrdersServiceError::ProductNotFound(product) => {
            StatusError::not_found().brief(format!("Product {product} not found"))
        }
        OrdersServiceError::NotFound => StatusError::not_found().brief("Order not found"),
        OrdersServiceError::AlreadyExists => StatusError::conflict().brief("Order already exists"),
        OrdersServiceError::Unauthenticated => {
            StatusError::unauthorized().brief("Authentication required")
        }
        OrdersServiceError::Forbidden => StatusError::forbidden().brief("Not allowed"),
        OrdersServiceError::Sql(source) => {
            error!("order storage failure: {source}");

            StatusError::internal_server_error()
        }
    }
}

/// Metrics label for a checkout the service refused, if it was refused on its merits.
pub(crate) fn rejection_reason(error: &OrdersServiceError) -> Option<&'static str> {
    match error {
        OrdersServiceError::Validation(_) => Some("validation"),
        OrdersServiceError::ProductNotFound(_) => Some("product_not_found"),
        OrdersServiceError::InsufficientStock { .. } => Some("insufficient_stock"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;
    use storefront_app::domain::{orders::models::OrderStatus, products::models::ProductUuid};

    use super::*;

    #[test]
    fn insufficient_stock_is_a_bad_request_naming_availability() {
        let error = into_status_error(OrdersServiceError::InsufficientStock {
            product: ProductUuid::new(),
            name: "Dash Camera".to_string(),
            available: 1,
            requested: 2,
        });

        assert_eq!(error.code, StatusCode::BAD_REQUEST);
        assert!(
            error.brief.contains("Dash Camera") && error.brief.contains("1 available"),
            "brief should name the product and availability: {}",
            error.brief
        );
    }

    #[test]
    fn invalid_transition_is_a_bad_request() {
        let error = into_status_error(OrdersServiceError::InvalidTransition {
            from: OrderStatus::Cancelled,
            to: OrderStatus::New,
        });

        assert_eq!(error.code, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn auth_failures_map_to_401_and_403() {
        assert_eq!(
            into_status_error(OrdersServiceError::Unauthenticated).code,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            into_status_error(OrdersServiceError::Forbidden).code,
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn unknown_product_is_not_found() {
        let error = into_status_error(OrdersServiceError::ProductNotFound(ProductUuid::new()));

        assert_eq!(error.code, StatusCode::NOT_FOUND);
    }

    #[test]
    fn only_checkout_refusals_carry_a_rejection_reason() {
        assert_eq!(
            rejection_reason(&OrdersServiceError::Validation("x".to_string())),
            Some("validation")
        );
        assert_eq!(rejection_reason(&OrdersServiceError::NotFound), None);
    }
}
