//! Test Helpers

use crate::{
    auth::{AdminUuid, Identity, NewAdmin, NewUser, UserUuid},
    domain::{
        orders::{
            models::{CustomerDetails, NewOrder, OrderItem, OrderItems, OrderUuid},
            pricing::DeliveryPolicy,
        },
        products::{
            ProductsService,
            models::{NewProduct, Product, ProductStatus, ProductUuid},
        },
    },
    test::TestContext,
};

pub(crate) fn new_product(name: &str, price: u64, stock: u32) -> NewProduct {
    NewProduct {
        uuid: ProductUuid::new(),
        name: name.to_string(),
        description: String::new(),
        price,
        stock,
        category_uuid: None,
        status: ProductStatus::Active,
        popular: false,
        features: smallvec::SmallVec::new(),
        image_url: None,
    }
}

pub(crate) async fn create_product(ctx: &TestContext, name: &str, price: u64, stock: u32) -> Product {
    ctx.products
        .create_product(new_product(name, price, stock))
        .await
        .expect("Failed to create test product")
}

pub(crate) fn new_user(email: &str) -> NewUser {
    NewUser {
        uuid: UserUuid::new(),
        email: email.to_string(),
        full_name: "Ann Example".to_string(),
        phone: None,
    }
}

pub(crate) fn new_admin(email: &str) -> NewAdmin {
    NewAdmin {
        uuid: AdminUuid::new(),
        email: email.to_string(),
        name: "Store Manager".to_string(),
    }
}

pub(crate) fn admin() -> Identity {
    Identity::Admin(AdminUuid::new())
}

pub(crate) fn customer(email: &str) -> CustomerDetails {
    CustomerDetails {
        name: "Ann Example".to_string(),
        email: email.to_string(),
        phone: "+10000000000".to_string(),
        address: Some("1 Main Street".to_string()),
        comment: None,
    }
}

pub(crate) fn item(product: &Product, quantity: u32) -> OrderItem {
    OrderItem {
        id: product.uuid,
        name: product.name.clone(),
        price: product.price,
        quantity,
    }
}

/// Checkout payload whose total matches its items plus default delivery.
pub(crate) fn new_order(items: Vec<OrderItem>) -> NewOrder {
    let items = OrderItems::new(items);
    let total_amount = items
        .subtotal()
        .and_then(|subtotal| DeliveryPolicy::default().total_for(subtotal));

    NewOrder {
        uuid: OrderUuid::new(),
        customer: customer("ann@example.com"),
        items,
        total_amount,
    }
}
