use async_trait::async_trait;
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    entity::{category, product, stock},
    error::{CatalogError, CatalogResult, EntityKind},
    models::{
        Category, CreateCategory, CreateProduct, CreateStock, Product, Stock, UpdateCategory,
        UpdateProduct,
    },
    repository::CatalogStore,
};

/// Postgres implementation of CatalogStore.
///
/// Writes that depend on another row run in a transaction that locks that row:
/// `FOR SHARE` on the parent before a child insert, `FOR UPDATE` on the row
/// before a delete. The foreign keys are declared `RESTRICT`, so a violation
/// that still slips through is mapped to the same domain error.
#[derive(Debug, Clone)]
pub struct PgCatalogStore {
    db: DatabaseConnection,
}

impl PgCatalogStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

fn store_error(err: DbErr) -> CatalogError {
    tracing::warn!(error = %err, "Database error");
    CatalogError::StoreUnavailable(err.to_string())
}

fn is_foreign_key_violation(err: &DbErr) -> bool {
    matches!(
        err.sql_err(),
        Some(SqlErr::ForeignKeyConstraintViolation(_))
    )
}

/// Maps an insert/update failure, treating an FK violation as a missing parent.
fn write_error(err: DbErr, parent: EntityKind, parent_id: Uuid) -> CatalogError {
    if is_foreign_key_violation(&err) {
        CatalogError::missing(parent, parent_id)
    } else {
        store_error(err)
    }
}

/// Maps a delete failure, treating an FK violation as a remaining dependent.
fn delete_error(err: DbErr, entity: EntityKind, id: Uuid, dependent: EntityKind) -> CatalogError {
    if is_foreign_key_violation(&err) {
        CatalogError::in_use(entity, id, dependent)
    } else {
        store_error(err)
    }
}

fn product_active_model(product: &Product) -> product::ActiveModel {
    product::ActiveModel {
        id: Set(product.id),
        nome: Set(product.nome.clone()),
        preco: Set(product.preco),
        quantidade: Set(product.quantidade),
        categoria_id: Set(product.categoria_id),
        created_at: Set(product.created_at.into()),
        updated_at: Set(product.updated_at.into()),
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn create_category(&self, input: CreateCategory) -> CatalogResult<Category> {
        let active_model: category::ActiveModel = input.into();
        let model = active_model.insert(&self.db).await.map_err(store_error)?;

        tracing::info!(category_id = %model.id, "Created category");
        Ok(model.into())
    }

    async fn get_category(&self, id: Uuid) -> CatalogResult<Option<Category>> {
        let model = category::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(store_error)?;

        Ok(model.map(Into::into))
    }

    async fn list_categories(&self) -> CatalogResult<Vec<Category>> {
        let models = category::Entity::find()
            .order_by_asc(category::Column::CreatedAt)
            .order_by_asc(category::Column::Id)
            .all(&self.db)
            .await
            .map_err(store_error)?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn update_category(&self, id: Uuid, input: UpdateCategory) -> CatalogResult<Category> {
        let txn = self.db.begin().await.map_err(store_error)?;

        let model = category::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(store_error)?
            .ok_or(CatalogError::not_found(EntityKind::Category, id))?;

        let mut category: Category = model.into();
        category.apply_update(input);

        let active_model = category::ActiveModel {
            id: Set(category.id),
            nome: Set(category.nome.clone()),
            created_at: Set(category.created_at.into()),
            updated_at: Set(category.updated_at.into()),
        };
        let updated = active_model.update(&txn).await.map_err(store_error)?;
        txn.commit().await.map_err(store_error)?;

        tracing::info!(category_id = %id, "Updated category");
        Ok(updated.into())
    }

    async fn delete_category(&self, id: Uuid) -> CatalogResult<bool> {
        let txn = self.db.begin().await.map_err(store_error)?;

        let exists = category::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(store_error)?
            .is_some();
        if !exists {
            return Ok(false);
        }

        let dependents = product::Entity::find()
            .filter(product::Column::CategoriaId.eq(id))
            .count(&txn)
            .await
            .map_err(store_error)?;
        if dependents > 0 {
            return Err(CatalogError::in_use(
                EntityKind::Category,
                id,
                EntityKind::Product,
            ));
        }

        let result = category::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| delete_error(e, EntityKind::Category, id, EntityKind::Product))?;
        txn.commit().await.map_err(store_error)?;

        tracing::info!(category_id = %id, "Deleted category");
        Ok(result.rows_affected > 0)
    }

    async fn count_products_in_category(&self, category_id: Uuid) -> CatalogResult<u64> {
        product::Entity::find()
            .filter(product::Column::CategoriaId.eq(category_id))
            .count(&self.db)
            .await
            .map_err(store_error)
    }

    async fn create_product(&self, input: CreateProduct) -> CatalogResult<Product> {
        let categoria_id = input.categoria_id;
        let txn = self.db.begin().await.map_err(store_error)?;

        let parent = category::Entity::find_by_id(categoria_id)
            .lock_shared()
            .one(&txn)
            .await
            .map_err(store_error)?;
        if parent.is_none() {
            return Err(CatalogError::missing(EntityKind::Category, categoria_id));
        }

        let active_model: product::ActiveModel = input.into();
        let model = active_model
            .insert(&txn)
            .await
            .map_err(|e| write_error(e, EntityKind::Category, categoria_id))?;
        txn.commit().await.map_err(store_error)?;

        tracing::info!(product_id = %model.id, category_id = %categoria_id, "Created product");
        Ok(model.into())
    }

    async fn get_product(&self, id: Uuid) -> CatalogResult<Option<Product>> {
        let model = product::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(store_error)?;

        Ok(model.map(Into::into))
    }

    async fn list_products(&self) -> CatalogResult<Vec<Product>> {
        let models = product::Entity::find()
            .order_by_asc(product::Column::CreatedAt)
            .order_by_asc(product::Column::Id)
            .all(&self.db)
            .await
            .map_err(store_error)?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn update_product(&self, id: Uuid, input: UpdateProduct) -> CatalogResult<Product> {
        let txn = self.db.begin().await.map_err(store_error)?;

        let model = product::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(store_error)?
            .ok_or(CatalogError::not_found(EntityKind::Product, id))?;

        if let Some(categoria_id) = input.categoria_id {
            if categoria_id != model.categoria_id {
                let parent = category::Entity::find_by_id(categoria_id)
                    .lock_shared()
                    .one(&txn)
                    .await
                    .map_err(store_error)?;
                if parent.is_none() {
                    return Err(CatalogError::missing(EntityKind::Category, categoria_id));
                }
            }
        }

        let mut product: Product = model.into();
        product.apply_update(input);

        let updated = product_active_model(&product)
            .update(&txn)
            .await
            .map_err(|e| write_error(e, EntityKind::Category, product.categoria_id))?;
        txn.commit().await.map_err(store_error)?;

        tracing::info!(product_id = %id, "Updated product");
        Ok(updated.into())
    }

    async fn delete_product(&self, id: Uuid) -> CatalogResult<bool> {
        let txn = self.db.begin().await.map_err(store_error)?;

        let exists = product::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(store_error)?
            .is_some();
        if !exists {
            return Ok(false);
        }

        let dependents = stock::Entity::find()
            .filter(stock::Column::ProdutoId.eq(id))
            .count(&txn)
            .await
            .map_err(store_error)?;
        if dependents > 0 {
            return Err(CatalogError::in_use(
                EntityKind::Product,
                id,
                EntityKind::Stock,
            ));
        }

        let result = product::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| delete_error(e, EntityKind::Product, id, EntityKind::Stock))?;
        txn.commit().await.map_err(store_error)?;

        tracing::info!(product_id = %id, "Deleted product");
        Ok(result.rows_affected > 0)
    }

    async fn count_stock_for_product(&self, product_id: Uuid) -> CatalogResult<u64> {
        stock::Entity::find()
            .filter(stock::Column::ProdutoId.eq(product_id))
            .count(&self.db)
            .await
            .map_err(store_error)
    }

    async fn create_stock(&self, input: CreateStock) -> CatalogResult<Stock> {
        let produto_id = input.produto_id;
        let txn = self.db.begin().await.map_err(store_error)?;

        let parent = product::Entity::find_by_id(produto_id)
            .lock_shared()
            .one(&txn)
            .await
            .map_err(store_error)?;
        if parent.is_none() {
            return Err(CatalogError::missing(EntityKind::Product, produto_id));
        }

        let active_model: stock::ActiveModel = input.into();
        let model = active_model
            .insert(&txn)
            .await
            .map_err(|e| write_error(e, EntityKind::Product, produto_id))?;
        txn.commit().await.map_err(store_error)?;

        tracing::info!(stock_id = %model.id, product_id = %produto_id, "Created stock record");
        Ok(model.into())
    }

    async fn get_stock(&self, id: Uuid) -> CatalogResult<Option<Stock>> {
        let model = stock::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(store_error)?;

        Ok(model.map(Into::into))
    }

    async fn list_stock(&self) -> CatalogResult<Vec<Stock>> {
        let models = stock::Entity::find()
            .order_by_asc(stock::Column::CreatedAt)
            .order_by_asc(stock::Column::Id)
            .all(&self.db)
            .await
            .map_err(store_error)?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn update_stock_quantity(&self, id: Uuid, quantidade: i32) -> CatalogResult<Stock> {
        let txn = self.db.begin().await.map_err(store_error)?;

        let model = stock::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(store_error)?
            .ok_or(CatalogError::not_found(EntityKind::Stock, id))?;
        let produto_id = model.produto_id;

        let now: sea_orm::prelude::DateTimeWithTimeZone = Utc::now().into();
        let mut active_model: stock::ActiveModel = model.into();
        active_model.quantidade = Set(quantidade);
        active_model.updated_at = Set(now);
        let updated = active_model.update(&txn).await.map_err(store_error)?;

        product::Entity::update_many()
            .col_expr(product::Column::Quantidade, Expr::value(quantidade))
            .col_expr(product::Column::UpdatedAt, Expr::value(now))
            .filter(product::Column::Id.eq(produto_id))
            .exec(&txn)
            .await
            .map_err(store_error)?;
        txn.commit().await.map_err(store_error)?;

        tracing::info!(stock_id = %id, product_id = %produto_id, quantidade, "Updated stock quantity");
        Ok(updated.into())
    }

    async fn delete_stock(&self, id: Uuid) -> CatalogResult<bool> {
        let result = stock::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(store_error)?;

        if result.rows_affected > 0 {
            tracing::info!(stock_id = %id, "Deleted stock record");
        }
        Ok(result.rows_affected > 0)
    }
}
