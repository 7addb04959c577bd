use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{CatalogError, CatalogResult, EntityKind};
use crate::models::{CreateProduct, Product, UpdateProduct};
use crate::repository::CatalogStore;

pub struct ProductService<S: CatalogStore> {
    store: Arc<S>,
}

impl<S: CatalogStore> Clone for ProductService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: CatalogStore> ProductService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    async fn ensure_category(&self, categoria_id: Uuid) -> CatalogResult<()> {
        match self.store.get_category(categoria_id).await? {
            Some(_) => Ok(()),
            None => Err(CatalogError::missing(EntityKind::Category, categoria_id)),
        }
    }

    /// Creates a product under an existing category.
    #[instrument(skip(self, input), fields(category_id = %input.categoria_id))]
    pub async fn create(&self, input: CreateProduct) -> CatalogResult<Product> {
        input.validate()?;
        self.ensure_category(input.categoria_id).await?;
        self.store.create_product(input).await
    }

    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get(&self, id: Uuid) -> CatalogResult<Product> {
        self.store
            .get_product(id)
            .await?
            .ok_or(CatalogError::not_found(EntityKind::Product, id))
    }

    pub async fn list(&self) -> CatalogResult<Vec<Product>> {
        self.store.list_products().await
    }

    /// Applies a partial update. An unknown product is reported before a bad
    /// `categoria_id`; a new `categoria_id` must name an existing category.
    #[instrument(skip(self, input), fields(product_id = %id))]
    pub async fn update(&self, id: Uuid, input: UpdateProduct) -> CatalogResult<Product> {
        input.validate()?;
        self.get(id).await?;
        if let Some(categoria_id) = input.categoria_id {
            self.ensure_category(categoria_id).await?;
        }
        self.store.update_product(id, input).await
    }

    /// Deletes a product that has no stock records.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete(&self, id: Uuid) -> CatalogResult<()> {
        self.get(id).await?;

        if self.store.count_stock_for_product(id).await? > 0 {
            return Err(CatalogError::in_use(
                EntityKind::Product,
                id,
                EntityKind::Stock,
            ));
        }

        if self.store.delete_product(id).await? {
            Ok(())
        } else {
            Err(CatalogError::not_found(EntityKind::Product, id))
        }
    }
}
