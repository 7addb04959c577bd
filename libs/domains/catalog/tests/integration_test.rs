//! Integration tests for the Postgres catalog store
//!
//! These run against a real PostgreSQL started through testcontainers, so the
//! transactions, row locks and foreign keys are the ones production uses.
//! Run with `cargo test -- --ignored` on a machine with Docker.

use domain_catalog::*;
use futures::future::join_all;
use test_utils::{TestDataBuilder, TestDatabase, assertions::*};

async fn seed(store: &PgCatalogStore, builder: &TestDataBuilder) -> (Category, Product) {
    let category = store
        .create_category(CreateCategory {
            nome: builder.name("categoria", "main"),
        })
        .await
        .unwrap();
    let product = store
        .create_product(CreateProduct {
            nome: builder.name("produto", "main"),
            preco: 1200.0,
            quantidade: 50,
            categoria_id: category.id,
        })
        .await
        .unwrap();
    (category, product)
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_create_and_get_round_trip() {
    let db = TestDatabase::new().await;
    let store = PgCatalogStore::new(db.connection());
    let builder = TestDataBuilder::from_test_name("create_and_get");

    let (category, product) = seed(&store, &builder).await;

    let fetched = assert_some(
        store.get_product(product.id).await.unwrap(),
        "product should exist",
    );
    assert_uuid_eq(fetched.categoria_id, category.id, "categoria_id");
    assert_eq!(fetched.preco, 1200.0);
    assert_eq!(fetched.quantidade, 50);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_missing_parent_is_rejected() {
    let db = TestDatabase::new().await;
    let store = PgCatalogStore::new(db.connection());
    let builder = TestDataBuilder::from_test_name("missing_parent");

    let result = store
        .create_product(CreateProduct {
            nome: builder.name("produto", "orphan"),
            preco: 1.0,
            quantidade: 1,
            categoria_id: builder.missing_id(1),
        })
        .await;
    assert!(matches!(result, Err(CatalogError::MissingReference { .. })));

    let result = store
        .create_stock(CreateStock {
            produto_id: builder.missing_id(2),
            quantidade: 1,
        })
        .await;
    assert!(matches!(result, Err(CatalogError::MissingReference { .. })));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_referenced_rows_cannot_be_deleted() {
    let db = TestDatabase::new().await;
    let store = PgCatalogStore::new(db.connection());
    let builder = TestDataBuilder::from_test_name("referenced_rows");

    let (category, product) = seed(&store, &builder).await;
    let stock = store
        .create_stock(CreateStock {
            produto_id: product.id,
            quantidade: 10,
        })
        .await
        .unwrap();

    assert!(matches!(
        store.delete_category(category.id).await,
        Err(CatalogError::InUse { .. })
    ));
    assert!(matches!(
        store.delete_product(product.id).await,
        Err(CatalogError::InUse { .. })
    ));

    assert!(store.delete_stock(stock.id).await.unwrap());
    assert!(store.delete_product(product.id).await.unwrap());
    assert!(store.delete_category(category.id).await.unwrap());
    assert!(!store.delete_category(category.id).await.unwrap());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_stock_update_reconciles_product_in_one_transaction() {
    let db = TestDatabase::new().await;
    let store = PgCatalogStore::new(db.connection());
    let builder = TestDataBuilder::from_test_name("stock_reconcile");

    let (_, product) = seed(&store, &builder).await;
    let stock = store
        .create_stock(CreateStock {
            produto_id: product.id,
            quantidade: 50,
        })
        .await
        .unwrap();

    store.update_stock_quantity(stock.id, 30).await.unwrap();

    let product = assert_some(store.get_product(product.id).await.unwrap(), "product");
    assert_eq!(product.quantidade, 30);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_concurrent_delete_and_insert_never_orphan() {
    let db = TestDatabase::new().await;
    let store = PgCatalogStore::new(db.connection());
    let builder = TestDataBuilder::from_test_name("concurrent_orphan");

    let category = store
        .create_category(CreateCategory {
            nome: builder.name("categoria", "race"),
        })
        .await
        .unwrap();
    let categoria_id = category.id;

    let inserts = (0..8).map(|i| {
        let store = store.clone();
        let nome = builder.name("produto", &i.to_string());
        async move {
            store
                .create_product(CreateProduct {
                    nome,
                    preco: 1.0,
                    quantidade: 1,
                    categoria_id,
                })
                .await
        }
    });
    let delete = {
        let store = store.clone();
        async move { store.delete_category(categoria_id).await }
    };

    let (inserted, deleted) = tokio::join!(join_all(inserts), delete);
    let inserted = inserted.into_iter().filter(Result::is_ok).count();

    // Either the delete won and every insert failed, or some insert won and the delete was vetoed.
    match deleted {
        Ok(true) => assert_eq!(inserted, 0),
        Err(CatalogError::InUse { .. }) => assert!(inserted > 0),
        other => panic!("unexpected delete result: {other:?}"),
    }

    let products = store.list_products().await.unwrap();
    let categories = store.list_categories().await.unwrap();
    for product in products {
        assert!(categories.iter().any(|c| c.id == product.categoria_id));
    }
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_lists_are_ordered_by_creation() {
    let db = TestDatabase::new().await;
    let store = PgCatalogStore::new(db.connection());
    let builder = TestDataBuilder::from_test_name("list_order");

    let mut created = Vec::new();
    for i in 0..3 {
        let category = store
            .create_category(CreateCategory {
                nome: builder.name("categoria", &i.to_string()),
            })
            .await
            .unwrap();
        created.push(category.id);
    }

    let listed: Vec<_> = store
        .list_categories()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(listed, created);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_update_category_persists_new_nome() {
    let db = TestDatabase::new().await;
    let store = PgCatalogStore::new(db.connection());
    let builder = TestDataBuilder::from_test_name("update_category");

    let category = store
        .create_category(CreateCategory {
            nome: builder.name("categoria", "old"),
        })
        .await
        .unwrap();

    let unchanged = store
        .update_category(category.id, UpdateCategory::default())
        .await
        .unwrap();
    assert_eq!(unchanged.nome, category.nome);

    let renamed = store
        .update_category(
            category.id,
            UpdateCategory {
                nome: Some(builder.name("categoria", "new")),
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.nome, builder.name("categoria", "new"));

    let fetched = assert_some(store.get_category(category.id).await.unwrap(), "category");
    assert_eq!(fetched.nome, builder.name("categoria", "new"));

    let result = store
        .update_category(builder.missing_id(1), UpdateCategory::default())
        .await;
    assert!(matches!(result, Err(CatalogError::NotFound { .. })));
}
