//! Product service - catalog use cases over the generic repository.

use std::time::Duration;

use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use tokio_util::sync::CancellationToken;
use validator::Validate;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use common::{AppError, AppResult};
use domain::{
    BrandListSpecification, Pagination, Product, ProductPayload, ProductSpecParams,
    ProductSpecification, TypeListSpecification,
};

use crate::repository::{GenericRepository, Repository, StoreContext};

/// Product service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProductService: Send + Sync {
    /// One page of products with the total count of matching rows
    async fn list_products(&self, params: ProductSpecParams) -> AppResult<Pagination<Product>>;

    /// Product by id, `None` when it does not exist
    async fn get_product(&self, id: i32) -> AppResult<Option<Product>>;

    /// Insert a new product and return it with its assigned id
    async fn create_product(&self, payload: ProductPayload) -> AppResult<Product>;

    /// Replace every field of an existing product
    async fn update_product(&self, id: i32, payload: ProductPayload) -> AppResult<()>;

    /// Remove a product
    async fn delete_product(&self, id: i32) -> AppResult<()>;

    /// Distinct brand names
    async fn list_brands(&self) -> AppResult<Vec<String>>;

    /// Distinct product types
    async fn list_types(&self) -> AppResult<Vec<String>>;

    /// Store connectivity check
    async fn ping(&self) -> AppResult<()>;
}

/// [`ProductService`] backed by a SeaORM connection.
///
/// Each call opens its own repository, so staged changes never leak between
/// requests. Store calls are cancelled when `shutdown` fires.
pub struct ProductManager {
    db: DatabaseConnection,
    query_timeout: Option<Duration>,
    shutdown: CancellationToken,
}

impl ProductManager {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            query_timeout: None,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_query_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.query_timeout = timeout;
        self
    }

    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }

    fn repository(&self) -> Repository<Product> {
        let context = StoreContext::new(self.db.clone())
            .with_cancellation(self.shutdown.child_token())
            .with_timeout(self.query_timeout);
        Repository::new(context)
    }
}

#[async_trait]
impl ProductService for ProductManager {
    async fn list_products(&self, params: ProductSpecParams) -> AppResult<Pagination<Product>> {
        let repo = self.repository();
        let spec = ProductSpecification::new(&params);

        let data = repo.get_all_with_specification(&*spec).await?;
        let total_count = repo.count(&*spec).await?;

        Ok(Pagination::new(
            params.page_index(),
            params.page_size(),
            total_count,
            data,
        ))
    }

    async fn get_product(&self, id: i32) -> AppResult<Option<Product>> {
        self.repository().get_by_id(id).await
    }

    async fn create_product(&self, payload: ProductPayload) -> AppResult<Product> {
        payload.validate()?;

        let mut repo = self.repository();
        repo.create(payload.into_product(0));

        if !repo.commit().await? {
            return Err(AppError::persistence_no_op("Problem creating product"));
        }

        repo.inserted()
            .first()
            .cloned()
            .ok_or_else(|| AppError::internal("insert returned no product"))
    }

    async fn update_product(&self, id: i32, payload: ProductPayload) -> AppResult<()> {
        payload.validate()?;

        let mut repo = self.repository();
        if !repo.exists(id).await? {
            return Err(AppError::precondition_failed(format!(
                "Cannot update product {}: it does not exist",
                id
            )));
        }

        repo.update(payload.into_product(id));

        if !repo.commit().await? {
            return Err(AppError::persistence_no_op("Problem updating the product"));
        }
        Ok(())
    }

    async fn delete_product(&self, id: i32) -> AppResult<()> {
        let mut repo = self.repository();
        let product = repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Product {}", id)))?;

        repo.delete(product);

        if !repo.commit().await? {
            return Err(AppError::persistence_no_op("Problem deleting the product"));
        }
        Ok(())
    }

    async fn list_brands(&self) -> AppResult<Vec<String>> {
        let spec = BrandListSpecification::new();
        self.repository().get_all_projected(&*spec).await
    }

    async fn list_types(&self) -> AppResult<Vec<String>> {
        let spec = TypeListSpecification::new();
        self.repository().get_all_projected(&*spec).await
    }

    async fn ping(&self) -> AppResult<()> {
        let context = StoreContext::new(self.db.clone()).with_timeout(self.query_timeout);
        context
            .run("ping", async {
                self.db.ping().await.map_err(AppError::from)
            })
            .await
    }
}
