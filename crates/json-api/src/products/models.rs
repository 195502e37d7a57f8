//! Product request and response bodies.

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::products::models::{
    CategoryUuid, NewProduct, Product, ProductStatus, ProductUpdate, ProductUuid,
};

/// Catalog visibility
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ProductStatusBody {
    #[default]
    Active,
    Inactive,
}

impl From<ProductStatusBody> for ProductStatus {
    fn from(status: ProductStatusBody) -> Self {
        match status {
            ProductStatusBody::Active => ProductStatus::Active,
            ProductStatusBody::Inactive => ProductStatus::Inactive,
        }
    }
}

impl From<ProductStatus> for ProductStatusBody {
    fn from(status: ProductStatus) -> Self {
        match status {
            ProductStatus::Active => ProductStatusBody::Active,
            ProductStatus::Inactive => ProductStatusBody::Inactive,
        }
    }
}

/// Product Request
///
/// Shared by create and update; admin edits replace every field.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductRequest {
    /// Client-chosen identifier, generated when absent (create only)
    #[serde(default)]
    pub uuid: Option<Uuid>,

    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Unit price in minor units
    pub price: u64,

    /// Units on hand
    pub stock: u32,

    #[serde(default)]
    pub category_uuid: Option<Uuid>,

    #[serde(default)]
    pub status: ProductStatusBody,

    #[serde(default)]
    pub popular: bool,

    #[serde(default)]
    pub features: Vec<String>,

    #[serde(default)]
    pub image_url: Option<String>,
}

impl From<ProductRequest> for NewProduct {
    fn from(request: ProductRequest) -> Self {
        NewProduct {
            uuid: request
                .uuid
                .map_or_else(ProductUuid::new, ProductUuid::from_uuid),
            name: request.name,
            description: request.description,
            price: request.price,
            stock: request.stock,
            category_uuid: request.category_uuid.map(CategoryUuid::from_uuid),
            status: request.status.into(),
            popular: request.popular,
            features: request.features.into_iter().collect(),
            image_url: request.image_url,
        }
    }
}

impl From<ProductRequest> for ProductUpdate {
    fn from(request: ProductRequest) -> Self {
        ProductUpdate {
            name: request.name,
            description: request.description,
            price: request.price,
            stock: request.stock,
            category_uuid: request.category_uuid.map(CategoryUuid::from_uuid),
            status: request.status.into(),
            popular: request.popular,
            features: request.features.into_iter().collect(),
            image_url: request.image_url,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductResponse {
    /// The unique identifier of the product
    pub uuid: Uuid,

    pub name: String,

    pub description: String,

    /// The price of the product in minor units
    pub price: u64,

    /// Units currently in stock
    pub stock: u32,

    pub category_uuid: Option<Uuid>,

    pub status: ProductStatusBody,

    pub popular: bool,

    /// Marketing bullet points, in display order
    pub features: Vec<String>,

    pub image_url: Option<String>,

    /// The date and time the product was created
    pub created_at: String,

    /// The date and time the product was last updated
    pub updated_at: String,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        ProductResponse {
            uuid: product.uuid.into(),
            name: product.name,
            description: product.description,
            price: product.price,
            stock: product.stock,
            category_uuid: product.category_uuid.map(Into::into),
            status: product.status.into(),
            popular: product.popular,
            features: product.features.into_vec(),
            image_url: product.image_url,
            created_at: product.created_at.to_string(),
            updated_at: product.updated_at.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductsResponse {
    /// The list of products
    pub products: Vec<ProductResponse>,
}

impl FromIterator<Product> for ProductsResponse {
    fn from_iter<I: IntoIterator<Item = Product>>(products: I) -> Self {
        Self {
            products: products.into_iter().map(Into::into).collect(),
        }
    }
}
