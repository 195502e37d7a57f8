//! Products service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::products::{
        errors::ProductsServiceError,
        models::{NewProduct, Product, ProductUpdate, ProductUuid},
        repository::PgProductsRepository,
    },
};

/// Maximum number of products returned by the popular listing.
pub const POPULAR_PRODUCTS_LIMIT: i64 = 8;

#[derive(Debug, Clone)]
pub struct PgProductsService {
    db: Db,
    repository: PgProductsRepository,
}

impl PgProductsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgProductsRepository::new(),
        }
    }
}

#[async_trait]
impl ProductsService for PgProductsService {
    async fn list_products(&self) -> Result<Vec<Product>, ProductsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let products = self.repository.list_products(&mut tx).await?;

        tx.commit().await?;

        Ok(products)
    }

    async fn list_popular_products(&self) -> Result<Vec<Product>, ProductsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let products = self
            .repository
            .list_popular_products(&mut tx, POPULAR_PRODUCTS_LIMIT)
            .await?;

        tx.commit().await?;

        Ok(products)
    }

    async fn list_all_products(&self) -> Result<Vec<Product>, ProductsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let products = self.repository.list_all_products(&mut tx).await?;

        tx.commit().await?;

        Ok(products)
    }

    async fn get_product(&self, product: ProductUuid) -> Result<Product, ProductsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let product = self.repository.get_product(&mut tx, product).await?;

        tx.commit().await?;

        Ok(product)
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product, ProductsServiceError> {
        if product.name.trim().is_empty() {
            return Err(ProductsServiceError::MissingRequiredData);
        }

        let mut tx = self.db.begin_transaction().await?;

        let created = self.repository.create_product(&mut tx, &product).await?;

        tx.commit().await?;

        tracing::info!(product_uuid = %created.uuid, stock = created.stock, "created product");

        Ok(created)
    }

    async fn update_product(
        &self,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<Product, ProductsServiceError> {
        if update.name.trim().is_empty() {
            return Err(ProductsServiceError::MissingRequiredData);
        }

        let mut tx = self.db.begin_transaction().await?;

        // Same row lock order placement takes, so a stock set never interleaves with a checkout.
        self.repository
            .lock_product(&mut tx, product)
            .await?
            .ok_or(ProductsServiceError::NotFound)?;

        let updated = self
            .repository
            .update_product(&mut tx, product, &update)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_product(&self, product: ProductUuid) -> Result<(), ProductsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let rows_affected = self.repository.delete_product(&mut tx, product).await?;

        if rows_affected == 0 {
            return Err(ProductsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Active products for the storefront, popular ones first.
    async fn list_products(&self) -> Result<Vec<Product>, ProductsServiceError>;

    /// A short list of active products flagged as popular.
    async fn list_popular_products(&self) -> Result<Vec<Product>, ProductsServiceError>;

    /// Every non-deleted product regardless of status, newest first.
    async fn list_all_products(&self) -> Result<Vec<Product>, ProductsServiceError>;

    /// Retrieve a single product.
    async fn get_product(&self, product: ProductUuid) -> Result<Product, ProductsServiceError>;

    /// Creates a new product.
    async fn create_product(&self, product: NewProduct) -> Result<Product, ProductsServiceError>;

    /// Replaces the editable fields of a product, stock level included.
    async fn update_product(
        &self,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<Product, ProductsServiceError>;

    /// Soft-deletes a product.
    async fn delete_product(&self, product: ProductUuid) -> Result<(), ProductsServiceError>;
}

#[cfg(test)]
mod tests {
    use smallvec::smallvec;
    use testresult::TestResult;

    use crate::{
        domain::products::models::{ProductStatus, ProductUpdate},
        test::{TestContext, helpers::new_product},
    };

    use super::*;

    fn update_from(product: &Product) -> ProductUpdate {
        ProductUpdate {
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            stock: product.stock,
            category_uuid: product.category_uuid,
            status: product.status,
            popular: product.popular,
            features: product.features.clone(),
            image_url: product.image_url.clone(),
        }
    }

    #[tokio::test]
    async fn create_product_persists_every_field() -> TestResult {
        let ctx = TestContext::new().await;

        let mut new = new_product("Dash Camera", 4_990, 12);
        new.features = smallvec!["1080p".to_string(), "Night mode".to_string()];
        new.image_url = Some("/images/dashcam.png".to_string());

        let product = ctx.products.create_product(new.clone()).await?;

        assert_eq!(product.uuid, new.uuid);
        assert_eq!(product.name, "Dash Camera");
        assert_eq!(product.price, 4_990);
        assert_eq!(product.stock, 12);
        assert_eq!(product.status, ProductStatus::Active);
        assert_eq!(product.features.as_slice(), ["1080p", "Night mode"]);
        assert_eq!(product.image_url.as_deref(), Some("/images/dashcam.png"));
        assert!(product.deleted_at.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn create_product_duplicate_uuid_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;
        let new = new_product("Phone Mount", 990, 3);

        ctx.products.create_product(new.clone()).await?;

        let result = ctx.products.create_product(new).await;

        assert!(
            matches!(result, Err(ProductsServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn create_product_blank_name_returns_missing_required_data() {
        let ctx = TestContext::new().await;

        let result = ctx.products.create_product(new_product("  ", 100, 1)).await;

        assert!(
            matches!(result, Err(ProductsServiceError::MissingRequiredData)),
            "expected MissingRequiredData, got {result:?}"
        );
    }

    #[tokio::test]
    async fn create_product_unknown_category_returns_invalid_reference() {
        let ctx = TestContext::new().await;

        let mut new = new_product("Charger", 1_500, 4);
        new.category_uuid = Some(crate::domain::products::models::CategoryUuid::new());

        let result = ctx.products.create_product(new).await;

        assert!(
            matches!(result, Err(ProductsServiceError::InvalidReference)),
            "expected InvalidReference, got {result:?}"
        );
    }

    #[tokio::test]
    async fn get_product_unknown_uuid_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.products.get_product(ProductUuid::new()).await;

        assert!(
            matches!(result, Err(ProductsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn list_products_hides_inactive_and_orders_popular_first() -> TestResult {
        let ctx = TestContext::new().await;

        let plain = ctx.products.create_product(new_product("Alpha", 100, 1)).await?;

        let mut popular = new_product("Zulu", 100, 1);
        popular.popular = true;
        let popular = ctx.products.create_product(popular).await?;

        let mut hidden = new_product("Hidden", 100, 1);
        hidden.status = ProductStatus::Inactive;
        let hidden = ctx.products.create_product(hidden).await?;

        let listed: Vec<ProductUuid> = ctx
            .products
            .list_products()
            .await?
            .iter()
            .map(|product| product.uuid)
            .collect();

        assert_eq!(listed, vec![popular.uuid, plain.uuid]);

        let everything = ctx.products.list_all_products().await?;

        assert!(
            everything.iter().any(|product| product.uuid == hidden.uuid),
            "admin listing should include inactive products"
        );

        let popular_only = ctx.products.list_popular_products().await?;

        assert_eq!(popular_only.len(), 1, "only one popular product exists");

        Ok(())
    }

    #[tokio::test]
    async fn update_product_replaces_stock_and_price() -> TestResult {
        let ctx = TestContext::new().await;

        let product = ctx.products.create_product(new_product("Hub", 500, 5)).await?;

        let mut update = update_from(&product);
        update.price = 750;
        update.stock = 40;

        let updated = ctx.products.update_product(product.uuid, update).await?;

        assert_eq!(updated.price, 750);
        assert_eq!(updated.stock, 40);

        Ok(())
    }

    #[tokio::test]
    async fn update_product_unknown_uuid_returns_not_found() -> TestResult {
        let ctx = TestContext::new().await;

        let product = ctx.products.create_product(new_product("Hub", 500, 5)).await?;

        let result = ctx
            .products
            .update_product(ProductUuid::new(), update_from(&product))
            .await;

        assert!(
            matches!(result, Err(ProductsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn delete_product_hides_it_from_reads() -> TestResult {
        let ctx = TestContext::new().await;

        let product = ctx.products.create_product(new_product("Cable", 300, 2)).await?;

        ctx.products.delete_product(product.uuid).await?;

        let result = ctx.products.get_product(product.uuid).await;

        assert!(
            matches!(result, Err(ProductsServiceError::NotFound)),
            "expected NotFound after deletion, got {result:?}"
        );

        let second = ctx.products.delete_product(product.uuid).await;

        assert!(
            matches!(second, Err(ProductsServiceError::NotFound)),
            "expected NotFound on repeated deletion, got {second:?}"
        );

        Ok(())
    }
}
