use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{CatalogError, CatalogResult, EntityKind};
use crate::models::{
    Category, CreateCategory, CreateProduct, CreateStock, Product, Stock, UpdateCategory,
    UpdateProduct,
};

/// Persistence for the three catalog tables.
///
/// Every method is atomic. Methods that write a child row re-check the parent
/// inside the same unit of work, and delete methods re-check dependents, so a
/// concurrent delete can never leave a dangling reference. Lists return rows in
/// creation order.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn create_category(&self, input: CreateCategory) -> CatalogResult<Category>;

    async fn get_category(&self, id: Uuid) -> CatalogResult<Option<Category>>;

    async fn list_categories(&self) -> CatalogResult<Vec<Category>>;

    async fn update_category(&self, id: Uuid, input: UpdateCategory) -> CatalogResult<Category>;

    /// Returns `Ok(false)` when absent, `InUse` when a product still references it.
    async fn delete_category(&self, id: Uuid) -> CatalogResult<bool>;

    async fn count_products_in_category(&self, category_id: Uuid) -> CatalogResult<u64>;

    /// Fails with `MissingReference` when the category is gone.
    async fn create_product(&self, input: CreateProduct) -> CatalogResult<Product>;

    async fn get_product(&self, id: Uuid) -> CatalogResult<Option<Product>>;

    async fn list_products(&self) -> CatalogResult<Vec<Product>>;

    /// Re-checks the category when `categoria_id` changes.
    async fn update_product(&self, id: Uuid, input: UpdateProduct) -> CatalogResult<Product>;

    /// Returns `Ok(false)` when absent, `InUse` when a stock record still references it.
    async fn delete_product(&self, id: Uuid) -> CatalogResult<bool>;

    async fn count_stock_for_product(&self, product_id: Uuid) -> CatalogResult<u64>;

    /// Fails with `MissingReference` when the product is gone.
    async fn create_stock(&self, input: CreateStock) -> CatalogResult<Stock>;

    async fn get_stock(&self, id: Uuid) -> CatalogResult<Option<Stock>>;

    async fn list_stock(&self) -> CatalogResult<Vec<Stock>>;

    /// Sets the record's quantity and copies it onto the owning product in one unit of work.
    async fn update_stock_quantity(&self, id: Uuid, quantidade: i32) -> CatalogResult<Stock>;

    async fn delete_stock(&self, id: Uuid) -> CatalogResult<bool>;
}

#[derive(Debug, Default)]
struct Tables {
    categories: Vec<Category>,
    products: Vec<Product>,
    stock: Vec<Stock>,
}

/// In-memory implementation of CatalogStore (for development/testing).
///
/// One lock guards all tables, so every operation sees and leaves a consistent snapshot.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCatalogStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn create_category(&self, input: CreateCategory) -> CatalogResult<Category> {
        let category = Category::new(input);
        self.tables.write().await.categories.push(category.clone());

        tracing::info!(category_id = %category.id, "Created category");
        Ok(category)
    }

    async fn get_category(&self, id: Uuid) -> CatalogResult<Option<Category>> {
        let tables = self.tables.read().await;
        Ok(tables.categories.iter().find(|c| c.id == id).cloned())
    }

    async fn list_categories(&self) -> CatalogResult<Vec<Category>> {
        Ok(self.tables.read().await.categories.clone())
    }

    async fn update_category(&self, id: Uuid, input: UpdateCategory) -> CatalogResult<Category> {
        let mut tables = self.tables.write().await;
        let category = tables
            .categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(CatalogError::not_found(EntityKind::Category, id))?;

        category.apply_update(input);

        tracing::info!(category_id = %id, "Updated category");
        Ok(category.clone())
    }

    async fn delete_category(&self, id: Uuid) -> CatalogResult<bool> {
        let mut tables = self.tables.write().await;

        let Some(index) = tables.categories.iter().position(|c| c.id == id) else {
            return Ok(false);
        };
        if tables.products.iter().any(|p| p.categoria_id == id) {
            return Err(CatalogError::in_use(
                EntityKind::Category,
                id,
                EntityKind::Product,
            ));
        }

        tables.categories.remove(index);
        tracing::info!(category_id = %id, "Deleted category");
        Ok(true)
    }

    async fn count_products_in_category(&self, category_id: Uuid) -> CatalogResult<u64> {
        let tables = self.tables.read().await;
        Ok(tables
            .products
            .iter()
            .filter(|p| p.categoria_id == category_id)
            .count() as u64)
    }

    async fn create_product(&self, input: CreateProduct) -> CatalogResult<Product> {
        let mut tables = self.tables.write().await;

        if !tables.categories.iter().any(|c| c.id == input.categoria_id) {
            return Err(CatalogError::missing(
                EntityKind::Category,
                input.categoria_id,
            ));
        }

        let product = Product::new(input);
        tables.products.push(product.clone());

        tracing::info!(product_id = %product.id, category_id = %product.categoria_id, "Created product");
        Ok(product)
    }

    async fn get_product(&self, id: Uuid) -> CatalogResult<Option<Product>> {
        let tables = self.tables.read().await;
        Ok(tables.products.iter().find(|p| p.id == id).cloned())
    }

    async fn list_products(&self) -> CatalogResult<Vec<Product>> {
        Ok(self.tables.read().await.products.clone())
    }

    async fn update_product(&self, id: Uuid, input: UpdateProduct) -> CatalogResult<Product> {
        let mut tables = self.tables.write().await;
        let Tables {
            categories,
            products,
            ..
        } = &mut *tables;

        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(CatalogError::not_found(EntityKind::Product, id))?;

        if let Some(categoria_id) = input.categoria_id {
            if !categories.iter().any(|c| c.id == categoria_id) {
                return Err(CatalogError::missing(EntityKind::Category, categoria_id));
            }
        }

        product.apply_update(input);

        tracing::info!(product_id = %id, "Updated product");
        Ok(product.clone())
    }

    async fn delete_product(&self, id: Uuid) -> CatalogResult<bool> {
        let mut tables = self.tables.write().await;

        let Some(index) = tables.products.iter().position(|p| p.id == id) else {
            return Ok(false);
        };
        if tables.stock.iter().any(|s| s.produto_id == id) {
            return Err(CatalogError::in_use(
                EntityKind::Product,
                id,
                EntityKind::Stock,
            ));
        }

        tables.products.remove(index);
        tracing::info!(product_id = %id, "Deleted product");
        Ok(true)
    }

    async fn count_stock_for_product(&self, product_id: Uuid) -> CatalogResult<u64> {
        let tables = self.tables.read().await;
        Ok(tables
            .stock
            .iter()
            .filter(|s| s.produto_id == product_id)
            .count() as u64)
    }

    async fn create_stock(&self, input: CreateStock) -> CatalogResult<Stock> {
        let mut tables = self.tables.write().await;

        if !tables.products.iter().any(|p| p.id == input.produto_id) {
            return Err(CatalogError::missing(EntityKind::Product, input.produto_id));
        }

        let stock = Stock::new(input);
        tables.stock.push(stock.clone());

        tracing::info!(stock_id = %stock.id, product_id = %stock.produto_id, "Created stock record");
        Ok(stock)
    }

    async fn get_stock(&self, id: Uuid) -> CatalogResult<Option<Stock>> {
        let tables = self.tables.read().await;
        Ok(tables.stock.iter().find(|s| s.id == id).cloned())
    }

    async fn list_stock(&self) -> CatalogResult<Vec<Stock>> {
        Ok(self.tables.read().await.stock.clone())
    }

    async fn update_stock_quantity(&self, id: Uuid, quantidade: i32) -> CatalogResult<Stock> {
        let mut tables = self.tables.write().await;
        let Tables {
            products, stock, ..
        } = &mut *tables;

        let record = stock
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(CatalogError::not_found(EntityKind::Stock, id))?;

        // Products with stock cannot be deleted, so the owner is always present.
        let product = products
            .iter_mut()
            .find(|p| p.id == record.produto_id)
            .ok_or(CatalogError::missing(EntityKind::Product, record.produto_id))?;

        let now = Utc::now();
        record.quantidade = quantidade;
        record.updated_at = now;
        product.quantidade = quantidade;
        product.updated_at = now;

        tracing::info!(stock_id = %id, product_id = %product.id, quantidade, "Updated stock quantity");
        Ok(record.clone())
    }

    async fn delete_stock(&self, id: Uuid) -> CatalogResult<bool> {
        let mut tables = self.tables.write().await;

        let Some(index) = tables.stock.iter().position(|s| s.id == id) else {
            return Ok(false);
        };

        tables.stock.remove(index);
        tracing::info!(stock_id = %id, "Deleted stock record");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seed(store: &InMemoryCatalogStore) -> (Category, Product) {
        let category = store
            .create_category(CreateCategory {
                nome: "Eletrônicos".to_string(),
            })
            .await
            .unwrap();
        let product = store
            .create_product(CreateProduct {
                nome: "Celular".to_string(),
                preco: 1200.0,
                quantidade: 50,
                categoria_id: category.id,
            })
            .await
            .unwrap();
        (category, product)
    }

    #[tokio::test]
    async fn test_lists_keep_insertion_order() {
        let store = InMemoryCatalogStore::new();
        for nome in ["Livros", "Brinquedos", "Ferramentas"] {
            store
                .create_category(CreateCategory {
                    nome: nome.to_string(),
                })
                .await
                .unwrap();
        }

        let names: Vec<_> = store
            .list_categories()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.nome)
            .collect();
        assert_eq!(names, ["Livros", "Brinquedos", "Ferramentas"]);
    }

    #[tokio::test]
    async fn test_update_category_applies_partial_update() {
        let store = InMemoryCatalogStore::new();
        let (category, _) = seed(&store).await;

        let unchanged = store
            .update_category(category.id, UpdateCategory::default())
            .await
            .unwrap();
        assert_eq!(unchanged.nome, "Eletrônicos");

        let renamed = store
            .update_category(
                category.id,
                UpdateCategory {
                    nome: Some("Eletrodomésticos".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.nome, "Eletrodomésticos");
        assert_eq!(
            store.get_category(category.id).await.unwrap().unwrap().nome,
            "Eletrodomésticos"
        );

        let result = store
            .update_category(Uuid::now_v7(), UpdateCategory::default())
            .await;
        assert!(matches!(result, Err(CatalogError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_create_product_requires_category() {
        let store = InMemoryCatalogStore::new();
        let missing = Uuid::now_v7();

        let result = store
            .create_product(CreateProduct {
                nome: "Celular".to_string(),
                preco: 10.0,
                quantidade: 1,
                categoria_id: missing,
            })
            .await;

        assert!(matches!(
            result,
            Err(CatalogError::MissingReference { entity: EntityKind::Category, id }) if id == missing
        ));
        assert!(store.list_products().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_category_in_use_is_vetoed() {
        let store = InMemoryCatalogStore::new();
        let (category, _) = seed(&store).await;

        let result = store.delete_category(category.id).await;
        assert!(matches!(result, Err(CatalogError::InUse { .. })));
        assert!(store.get_category(category.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_update_stock_reconciles_product() {
        let store = InMemoryCatalogStore::new();
        let (_, product) = seed(&store).await;
        let stock = store
            .create_stock(CreateStock {
                produto_id: product.id,
                quantidade: 50,
            })
            .await
            .unwrap();

        let updated = store.update_stock_quantity(stock.id, 30).await.unwrap();
        assert_eq!(updated.quantidade, 30);

        let product = store.get_product(product.id).await.unwrap().unwrap();
        assert_eq!(product.quantidade, 30);
    }

    #[tokio::test]
    async fn test_delete_stock_leaves_product_quantity() {
        let store = InMemoryCatalogStore::new();
        let (_, product) = seed(&store).await;
        let stock = store
            .create_stock(CreateStock {
                produto_id: product.id,
                quantidade: 7,
            })
            .await
            .unwrap();

        assert!(store.delete_stock(stock.id).await.unwrap());
        assert!(!store.delete_stock(stock.id).await.unwrap());

        let product = store.get_product(product.id).await.unwrap().unwrap();
        assert_eq!(product.quantidade, 50);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_delete_and_insert_never_orphan() {
        let store = InMemoryCatalogStore::new();
        let category = store
            .create_category(CreateCategory {
                nome: "Livros".to_string(),
            })
            .await
            .unwrap();
        let categoria_id = category.id;

        let mut handles = Vec::new();
        for i in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .create_product(CreateProduct {
                        nome: format!("Livro {i}"),
                        preco: 10.0,
                        quantidade: 1,
                        categoria_id,
                    })
                    .await
                    .is_ok()
            }));
        }
        let deleted = {
            let store = store.clone();
            tokio::spawn(async move { store.delete_category(categoria_id).await })
        };

        let mut inserted = 0;
        for handle in handles {
            if handle.await.unwrap() {
                inserted += 1;
            }
        }

        match deleted.await.unwrap() {
            Ok(true) => {
                let products = store.list_products().await.unwrap();
                assert!(products.iter().all(|p| p.categoria_id != categoria_id));
                assert_eq!(products.len(), inserted);
                assert_eq!(inserted, 0);
            }
            Err(CatalogError::InUse { .. }) => {
                assert!(inserted > 0);
                assert!(store.get_category(categoria_id).await.unwrap().is_some());
            }
            other => panic!("unexpected delete result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_update_product_to_missing_category_changes_nothing() {
        let store = InMemoryCatalogStore::new();
        let (category, product) = seed(&store).await;

        let result = store
            .update_product(
                product.id,
                UpdateProduct {
                    nome: Some("Smartphone".to_string()),
                    categoria_id: Some(Uuid::now_v7()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(CatalogError::MissingReference { .. })));
        let unchanged = store.get_product(product.id).await.unwrap().unwrap();
        assert_eq!(unchanged.nome, "Celular");
        assert_eq!(unchanged.categoria_id, category.id);
    }
}
