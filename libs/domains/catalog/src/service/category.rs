use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{CatalogError, CatalogResult, EntityKind};
use crate::models::{Category, CreateCategory, UpdateCategory};
use crate::repository::CatalogStore;

pub struct CategoryService<S: CatalogStore> {
    store: Arc<S>,
}

impl<S: CatalogStore> Clone for CategoryService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: CatalogStore> CategoryService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    #[instrument(skip(self, input), fields(nome = %input.nome))]
    pub async fn create(&self, input: CreateCategory) -> CatalogResult<Category> {
        input.validate()?;
        self.store.create_category(input).await
    }

    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn get(&self, id: Uuid) -> CatalogResult<Category> {
        self.store
            .get_category(id)
            .await?
            .ok_or(CatalogError::not_found(EntityKind::Category, id))
    }

    pub async fn list(&self) -> CatalogResult<Vec<Category>> {
        self.store.list_categories().await
    }

    #[instrument(skip(self, input), fields(category_id = %id))]
    pub async fn update(&self, id: Uuid, input: UpdateCategory) -> CatalogResult<Category> {
        input.validate()?;
        self.store.update_category(id, input).await
    }

    /// Deletes a category that no product references.
    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn delete(&self, id: Uuid) -> CatalogResult<()> {
        self.get(id).await?;

        if self.store.count_products_in_category(id).await? > 0 {
            return Err(CatalogError::in_use(
                EntityKind::Category,
                id,
                EntityKind::Product,
            ));
        }

        // The store re-checks dependents under lock; a concurrent delete shows up as `false`.
        if self.store.delete_category(id).await? {
            Ok(())
        } else {
            Err(CatalogError::not_found(EntityKind::Category, id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockCatalogStore;
    use chrono::Utc;
    use mockall::predicate::eq;

    fn category(id: Uuid) -> Category {
        let now = Utc::now();
        Category {
            id,
            nome: "Eletrônicos".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_create_rejects_blank_nome_without_touching_store() {
        let store = MockCatalogStore::new();
        let service = CategoryService::new(Arc::new(store));

        let result = service
            .create(CreateCategory {
                nome: " ".to_string(),
            })
            .await;

        assert!(matches!(result, Err(CatalogError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_in_use_never_calls_store_delete() {
        let id = Uuid::now_v7();
        let mut store = MockCatalogStore::new();
        store
            .expect_get_category()
            .with(eq(id))
            .returning(|id| Ok(Some(category(id))));
        store
            .expect_count_products_in_category()
            .with(eq(id))
            .returning(|_| Ok(2));
        store.expect_delete_category().never();

        let service = CategoryService::new(Arc::new(store));
        let result = service.delete(id).await;

        assert!(matches!(
            result,
            Err(CatalogError::InUse {
                entity: EntityKind::Category,
                dependent: EntityKind::Product,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_delete_missing_category_is_not_found() {
        let mut store = MockCatalogStore::new();
        store.expect_get_category().returning(|_| Ok(None));

        let service = CategoryService::new(Arc::new(store));
        let result = service.delete(Uuid::now_v7()).await;

        assert!(matches!(result, Err(CatalogError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_lost_race_reports_not_found() {
        let mut store = MockCatalogStore::new();
        store
            .expect_get_category()
            .returning(|id| Ok(Some(category(id))));
        store
            .expect_count_products_in_category()
            .returning(|_| Ok(0));
        store.expect_delete_category().returning(|_| Ok(false));

        let service = CategoryService::new(Arc::new(store));
        let result = service.delete(Uuid::now_v7()).await;

        assert!(matches!(result, Err(CatalogError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let mut store = MockCatalogStore::new();
        store
            .expect_list_categories()
            .returning(|| Err(CatalogError::StoreUnavailable("connection refused".into())));

        let service = CategoryService::new(Arc::new(store));
        let result = service.list().await;

        assert!(matches!(result, Err(CatalogError::StoreUnavailable(msg)) if msg == "connection refused"));
    }
}
