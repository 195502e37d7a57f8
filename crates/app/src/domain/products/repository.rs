//! Products Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{
    FromRow, Postgres, Row, Transaction,
    postgres::{PgArguments, PgRow},
    query::QueryAs,
    query, query_as, query_scalar,
    types::Json,
};
use uuid::Uuid;

use crate::{
    database::{decode_quantity, encode_amount, encode_quantity, try_get_amount, try_get_quantity},
    domain::products::models::{
        CategoryUuid, NewProduct, Product, ProductFeatures, ProductStatus, ProductUpdate,
        ProductUuid, StockLevel,
    },
};

const LIST_PRODUCTS_SQL: &str = include_str!("sql/list_products.sql");
const LIST_POPULAR_PRODUCTS_SQL: &str = include_str!("sql/list_popular_products.sql");
const LIST_ALL_PRODUCTS_SQL: &str = include_str!("sql/list_all_products.sql");
const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");
const CREATE_PRODUCT_SQL: &str = include_str!("sql/create_product.sql");
const UPDATE_PRODUCT_SQL: &str = include_str!("sql/update_product.sql");
const DELETE_PRODUCT_SQL: &str = include_str!("sql/delete_product.sql");
const LOCK_PRODUCT_SQL: &str = include_str!("sql/lock_product.sql");
const LOCK_STOCK_SQL: &str = include_str!("sql/lock_stock.sql");
const DECREMENT_STOCK_SQL: &str = include_str!("sql/decrement_stock.sql");
const INCREMENT_STOCK_SQL: &str = include_str!("sql/increment_stock.sql");

/// Editable product columns, bound in `$2..=$10` order.
struct ProductFields<'a> {
    name: &'a str,
    description: &'a str,
    price: u64,
    stock: u32,
    category_uuid: Option<CategoryUuid>,
    status: ProductStatus,
    popular: bool,
    features: &'a ProductFeatures,
    image_url: Option<&'a str>,
}

impl<'a> From<&'a NewProduct> for ProductFields<'a> {
    fn from(product: &'a NewProduct) -> Self {
        Self {
            name: &product.name,
            description: &product.description,
            price: product.price,
            stock: product.stock,
            category_uuid: product.category_uuid,
            status: product.status,
            popular: product.popular,
            features: &product.features,
            image_url: product.image_url.as_deref(),
        }
    }
}

impl<'a> From<&'a ProductUpdate> for ProductFields<'a> {
    fn from(update: &'a ProductUpdate) -> Self {
        Self {
            name: &update.name,
            description: &update.description,
            price: update.price,
            stock: update.stock,
            category_uuid: update.category_uuid,
            status: update.status,
            popular: update.popular,
            features: &update.features,
            image_url: update.image_url.as_deref(),
        }
    }
}

impl<'a> ProductFields<'a> {
    fn bind<'q>(
        &self,
        statement: QueryAs<'q, Postgres, Product, PgArguments>,
    ) -> Result<QueryAs<'q, Postgres, Product, PgArguments>, sqlx::Error>
    where
        'a: 'q,
    {
        Ok(statement
            .bind(self.name)
            .bind(self.description)
            .bind(encode_amount(self.price)?)
            .bind(encode_quantity(self.stock)?)
            .bind(self.category_uuid.map(CategoryUuid::into_uuid))
            .bind(self.status.as_str())
            .bind(self.popular)
            .bind(Json(self.features))
            .bind(self.image_url))
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgProductsRepository;

impl PgProductsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<Product>, sqlx::Error> {
        query_as::<Postgres, Product>(LIST_PRODUCTS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn list_popular_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        limit: i64,
    ) -> Result<Vec<Product>, sqlx::Error> {
        query_as::<Postgres, Product>(LIST_POPULAR_PRODUCTS_SQL)
            .bind(limit)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn list_all_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<Product>, sqlx::Error> {
        query_as::<Postgres, Product>(LIST_ALL_PRODUCTS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<Product, sqlx::Error> {
        query_as::<Postgres, Product>(GET_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: &NewProduct,
    ) -> Result<Product, sqlx::Error> {
        let statement =
            query_as::<Postgres, Product>(CREATE_PRODUCT_SQL).bind(product.uuid.into_uuid());

        ProductFields::from(product)
            .bind(statement)?
            .fetch_one(&mut **tx)
            .await
    }

    /// Takes the row lock shared with order placement; `None` when the product is gone.
    pub(crate) async fn lock_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<Option<ProductUuid>, sqlx::Error> {
        query_scalar::<Postgres, Uuid>(LOCK_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_optional(&mut **tx)
            .await
            .map(|uuid| uuid.map(ProductUuid::from_uuid))
    }

    pub(crate) async fn update_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        update: &ProductUpdate,
    ) -> Result<Product, sqlx::Error> {
        let statement = query_as::<Postgres, Product>(UPDATE_PRODUCT_SQL).bind(product.into_uuid());

        ProductFields::from(update)
            .bind(statement)?
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Lock the stock rows of every listed product, in uuid order.
    ///
    /// Products that do not exist (or were deleted) are simply absent from the result.
    pub(crate) async fn lock_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        products: &[ProductUuid],
    ) -> Result<Vec<StockLevel>, sqlx::Error> {
        let uuids: Vec<Uuid> = products.iter().copied().map(ProductUuid::into_uuid).collect();

        query_as::<Postgres, StockLevel>(LOCK_STOCK_SQL)
            .bind(uuids)
            .fetch_all(&mut **tx)
            .await
    }

    /// Remove `quantity` units when at least that many are available.
    ///
    /// Returns the remaining stock, or `None` when the product lacks the units.
    pub(crate) async fn decrement_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<Option<u32>, sqlx::Error> {
        query_scalar::<Postgres, i32>(DECREMENT_STOCK_SQL)
            .bind(product.into_uuid())
            .bind(encode_quantity(quantity)?)
            .fetch_optional(&mut **tx)
            .await?
            .map(|stock| decode_quantity(stock, "stock"))
            .transpose()
    }

    /// Return `quantity` units to the product, deleted or not.
    ///
    /// Returns the new stock, or `None` when the row no longer exists.
    pub(crate) async fn increment_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<Option<u32>, sqlx::Error> {
        query_scalar::<Postgres, i32>(INCREMENT_STOCK_SQL)
            .bind(product.into_uuid())
            .bind(encode_quantity(quantity)?)
            .fetch_optional(&mut **tx)
            .await?
            .map(|stock| decode_quantity(stock, "stock"))
            .transpose()
    }
}

impl<'r> FromRow<'r, PgRow> for Product {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status: String = row.try_get("status")?;

        let status = status
            .parse::<ProductStatus>()
            .map_err(|error| sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: Box::new(error),
            })?;

        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            price: try_get_amount(row, "price")?,
            stock: try_get_quantity(row, "stock")?,
            category_uuid: row
                .try_get::<Option<Uuid>, _>("category_uuid")?
                .map(CategoryUuid::from_uuid),
            status,
            popular: row.try_get("popular")?,
            features: row.try_get::<Json<ProductFeatures>, _>("features")?.0,
            image_url: row.try_get("image_url")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for StockLevel {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            price: try_get_amount(row, "price")?,
            stock: try_get_quantity(row, "stock")?,
        })
    }
}
