//! Product Models

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use crate::uuids::TypedUuid;

/// Product UUID
pub type ProductUuid = TypedUuid<Product>;

/// Category marker
#[derive(Debug)]
pub struct Category;

/// Category UUID
pub type CategoryUuid = TypedUuid<Category>;

/// Ordered list of marketing bullet points shown on a product page.
pub type ProductFeatures = SmallVec<[String; 4]>;

/// Catalog visibility of a product.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    #[default]
    Active,
    Inactive,
}

impl ProductStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown product status `{0}`")]
pub struct UnknownProductStatus(pub String);

impl FromStr for ProductStatus {
    type Err = UnknownProductStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            other => Err(UnknownProductStatus(other.to_string())),
        }
    }
}

/// Product Model
#[derive(Debug, Clone)]
pub struct Product {
    pub uuid: ProductUuid,
    pub name: String,
    pub description: String,
    pub price: u64,
    pub stock: u32,
    pub category_uuid: Option<CategoryUuid>,
    pub status: ProductStatus,
    pub popular: bool,
    pub features: ProductFeatures,
    pub image_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// New Product Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub name: String,
    pub description: String,
    pub price: u64,
    pub stock: u32,
    pub category_uuid: Option<CategoryUuid>,
    pub status: ProductStatus,
    pub popular: bool,
    pub features: ProductFeatures,
    pub image_url: Option<String>,
}

/// Product Update Model
///
/// Admin edits replace every editable field, including the stock level.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductUpdate {
    pub name: String,
    pub description: String,
    pub price: u64,
    pub stock: u32,
    pub category_uuid: Option<CategoryUuid>,
    pub status: ProductStatus,
    pub popular: bool,
    pub features: ProductFeatures,
    pub image_url: Option<String>,
}

/// Locked stock row read while an order is being placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockLevel {
    pub uuid: ProductUuid,
    pub name: String,
    pub price: u64,
    pub stock: u32,
}
