//! Shared test utilities for the catalog crates
//!
//! - `TestDatabase`: PostgreSQL container with the catalog schema migrated (feature: "postgres")
//! - `TestDataBuilder`: deterministic names and ids derived from the test name
//! - `assertions`: small assertion helpers
//!
//! ```rust,no_run
//! use test_utils::{TestDatabase, TestDataBuilder};
//!
//! #[tokio::test]
//! async fn my_postgres_test() {
//!     let db = TestDatabase::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_postgres_test");
//!     let nome = builder.name("categoria", "main");
//! }
//! ```

use uuid::Uuid;

#[cfg(feature = "postgres")]
mod postgres;

#[cfg(feature = "postgres")]
pub use postgres::TestDatabase;

/// Builder for reproducible test data
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seeds the builder from a hash of the test name.
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_create_product");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// A deterministic id, handy as a reference to a row that does not exist.
    pub fn missing_id(&self, n: u64) -> Uuid {
        Uuid::from_u64_pair(self.seed, n)
    }

    /// A unique, readable name, e.g. `test-categoria-12345-main`.
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let name = TestDataBuilder::new(7).name("produto", "main");
    /// assert_eq!(name, "test-produto-7-main");
    /// ```
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }
}

/// Test assertion helpers
pub mod assertions {
    use uuid::Uuid;

    pub fn assert_uuid_eq(actual: Uuid, expected: Uuid, context: &str) {
        assert_eq!(
            actual, expected,
            "{}: expected UUID {}, got {}",
            context, expected, actual
        );
    }

    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }
}
