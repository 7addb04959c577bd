use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{CatalogError, CatalogResult, EntityKind};
use crate::models::{CreateStock, Stock, UpdateStock};
use crate::repository::CatalogStore;

pub struct StockService<S: CatalogStore> {
    store: Arc<S>,
}

impl<S: CatalogStore> Clone for StockService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: CatalogStore> StockService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Creates a stock record. The product's own quantity is left untouched.
    #[instrument(skip(self, input), fields(product_id = %input.produto_id))]
    pub async fn create(&self, input: CreateStock) -> CatalogResult<Stock> {
        input.validate()?;
        if self.store.get_product(input.produto_id).await?.is_none() {
            return Err(CatalogError::missing(EntityKind::Product, input.produto_id));
        }
        self.store.create_stock(input).await
    }

    #[instrument(skip(self), fields(stock_id = %id))]
    pub async fn get(&self, id: Uuid) -> CatalogResult<Stock> {
        self.store
            .get_stock(id)
            .await?
            .ok_or(CatalogError::not_found(EntityKind::Stock, id))
    }

    pub async fn list(&self) -> CatalogResult<Vec<Stock>> {
        self.store.list_stock().await
    }

    /// Sets the record's quantity and copies it onto the owning product.
    #[instrument(skip(self, input), fields(stock_id = %id, quantidade = input.quantidade))]
    pub async fn update(&self, id: Uuid, input: UpdateStock) -> CatalogResult<Stock> {
        input.validate()?;
        self.store.update_stock_quantity(id, input.quantidade).await
    }

    /// Deletes a stock record. The product's quantity keeps its last value.
    #[instrument(skip(self), fields(stock_id = %id))]
    pub async fn delete(&self, id: Uuid) -> CatalogResult<()> {
        if self.store.delete_stock(id).await? {
            Ok(())
        } else {
            Err(CatalogError::not_found(EntityKind::Stock, id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockCatalogStore;
    use mockall::predicate::eq;

    #[tokio::test]
    async fn test_create_for_unknown_product_is_invalid_reference() {
        let produto_id = Uuid::now_v7();
        let mut store = MockCatalogStore::new();
        store
            .expect_get_product()
            .with(eq(produto_id))
            .returning(|_| Ok(None));
        store.expect_create_stock().never();

        let service = StockService::new(Arc::new(store));
        let result = service
            .create(CreateStock {
                produto_id,
                quantidade: 10,
            })
            .await;

        assert!(matches!(
            result,
            Err(CatalogError::MissingReference { entity: EntityKind::Product, .. })
        ));
    }

    #[tokio::test]
    async fn test_update_forwards_quantity() {
        let id = Uuid::now_v7();
        let mut store = MockCatalogStore::new();
        store
            .expect_update_stock_quantity()
            .with(eq(id), eq(30))
            .times(1)
            .returning(|id, quantidade| {
                let mut stock = Stock::new(CreateStock {
                    produto_id: Uuid::now_v7(),
                    quantidade,
                });
                stock.id = id;
                Ok(stock)
            });

        let service = StockService::new(Arc::new(store));
        let stock = service
            .update(id, UpdateStock { quantidade: 30 })
            .await
            .unwrap();

        assert_eq!(stock.quantidade, 30);
    }

    #[tokio::test]
    async fn test_update_rejects_negative_quantity() {
        let mut store = MockCatalogStore::new();
        store.expect_update_stock_quantity().never();

        let service = StockService::new(Arc::new(store));
        let result = service
            .update(Uuid::now_v7(), UpdateStock { quantidade: -1 })
            .await;

        assert!(matches!(result, Err(CatalogError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_absent_is_not_found() {
        let mut store = MockCatalogStore::new();
        store.expect_delete_stock().returning(|_| Ok(false));

        let service = StockService::new(Arc::new(store));
        let result = service.delete(Uuid::now_v7()).await;

        assert!(matches!(
            result,
            Err(CatalogError::NotFound { entity: EntityKind::Stock, .. })
        ));
    }
}
