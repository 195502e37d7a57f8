//! Checkout payload validation.

use crate::domain::orders::{errors::OrdersServiceError, models::NewOrder};

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Check a checkout payload before touching storage.
///
/// Returns the client-supplied total once every rule passes.
pub(crate) fn validate_new_order(order: &NewOrder) -> Result<u64, OrdersServiceError> {
    let customer = &order.customer;

    let missing = [
        ("customer_name", customer.name.as_str()),
        ("customer_email", customer.email.as_str()),
        ("customer_phone", customer.phone.as_str()),
    ]
    .into_iter()
    .find(|(_, value)| is_blank(value));

    if let Some((field, _)) = missing {
        return Err(OrdersServiceError::Validation(format!("{field} is required")));
    }

    if order.items.is_empty() {
        return Err(OrdersServiceError::Validation(
            "order must contain at least one item".to_string(),
        ));
    }

    let Some(total_amount) = order.total_amount else {
        return Err(OrdersServiceError::Validation(
            "total_amount is required".to_string(),
        ));
    };

    if i64::try_from(total_amount).is_err() {
        return Err(OrdersServiceError::Validation(
            "total_amount is out of range".to_string(),
        ));
    }

    if let Some(item) = order.items.iter().find(|item| item.quantity == 0) {
        return Err(OrdersServiceError::Validation(format!(
            "quantity for {} must be greater than zero",
            item.name
        )));
    }

    if order.items.subtotal().is_none() {
        return Err(OrdersServiceError::Validation(
            "order total is out of range".to_string(),
        ));
    }

    Ok(total_amount)
}

#[cfg(test)]
mod tests {
    use crate::domain::{
        orders::models::{CustomerDetails, OrderItem, OrderItems, OrderUuid},
        products::models::ProductUuid,
    };

    use super::*;

    fn valid_order() -> NewOrder {
        NewOrder {
            uuid: OrderUuid::new(),
            customer: CustomerDetails {
                name: "Ann".to_string(),
                email: "ann@example.com".to_string(),
                phone: "+100000000".to_string(),
                address: None,
                comment: None,
            },
            items: OrderItems::new(vec![OrderItem {
                id: ProductUuid::new(),
                name: "Widget".to_string(),
                price: 1_000,
                quantity: 1,
            }]),
            total_amount: Some(51_000),
        }
    }

    fn assert_validation(order: &NewOrder, expected: &str) {
        let result = validate_new_order(order);

        assert!(
            matches!(&result, Err(OrdersServiceError::Validation(message)) if message == expected),
            "expected Validation({expected}), got {result:?}"
        );
    }

    #[test]
    fn valid_order_returns_total() {
        assert!(matches!(validate_new_order(&valid_order()), Ok(51_000)));
    }

    #[test]
    fn blank_customer_fields_are_rejected_in_order() {
        let mut order = valid_order();
        order.customer.email = "  ".to_string();
        order.customer.phone = String::new();

        assert_validation(&order, "customer_email is required");
    }

    #[test]
    fn empty_items_are_rejected() {
        let mut order = valid_order();
        order.items = OrderItems::default();

        assert_validation(&order, "order must contain at least one item");
    }

    #[test]
    fn missing_total_is_rejected() {
        let mut order = valid_order();
        order.total_amount = None;

        assert_validation(&order, "total_amount is required");
    }

    #[test]
    fn total_beyond_storage_range_is_rejected() {
        let mut order = valid_order();
        order.total_amount = Some(u64::MAX);

        assert_validation(&order, "total_amount is out of range");

        order.total_amount = Some(i64::MAX.unsigned_abs());

        assert!(
            validate_new_order(&order).is_ok(),
            "the largest storable total is accepted"
        );
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let mut order = valid_order();
        order.items = OrderItems::new(vec![OrderItem {
            id: ProductUuid::new(),
            name: "Cable".to_string(),
            price: 10,
            quantity: 0,
        }]);

        assert_validation(&order, "quantity for Cable must be greater than zero");
    }
}
