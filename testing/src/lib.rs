//! # Catalog Testing
//!
//! Testing utilities and helpers for the product catalog client.
//!
//! This crate provides:
//! - A scripted in-memory [`CatalogApi`](catalog_core::environment::CatalogApi)
//! - Product fixtures
//! - Property-based testing strategies
//! - A Given-When-Then harness for reducers
//!
//! ## Example
//!
//! ```ignore
//! use catalog_testing::{MockCatalogApi, sample_products};
//! use catalog_runtime::ProductListModel;
//! use std::sync::Arc;
//!
//! #[tokio::test]
//! async fn test_list_loads() {
//!     let api = Arc::new(MockCatalogApi::with_products(sample_products()));
//!     let mut list = ProductListModel::new(api);
//!
//!     list.load();
//!     while list.snapshot().is_loading {
//!         list.changed().await;
//!     }
//!
//!     assert_eq!(list.snapshot().items.len(), sample_products().len());
//! }
//! ```

pub mod mock_api;

/// Product fixtures
pub mod fixtures {
    use catalog_core::{Product, ProductId};

    /// Build a product with the fields the pipeline looks at
    #[must_use]
    pub fn product(id: u64, title: &str, category: &str, price: f64) -> Product {
        Product::new(ProductId::new(id), title, category).with_price(price)
    }

    /// A small catalog spanning several categories.
    ///
    /// Titles mix upper and lower case, two products share a price, and one
    /// has no price at all.
    #[must_use]
    pub fn sample_products() -> Vec<Product> {
        vec![
            product(1, "iPhone 9", "smartphones", 549.0)
                .with_brand("Apple")
                .with_rating(4.69)
                .with_stock(94),
            product(2, "Samsung Universe 9", "smartphones", 1249.0)
                .with_brand("Samsung")
                .with_stock(36),
            product(3, "Red Lipstick", "beauty", 12.99)
                .with_description("Bold color with a creamy finish")
                .with_stock(0),
            product(4, "Eyeshadow Palette with Mirror", "beauty", 19.99),
            product(5, "Annibale Colombo Sofa", "furniture", 2499.99),
            product(6, "Chanel Coco Noir Eau De", "fragrances", 129.99),
            product(7, "apple airpods", "mobile-accessories", 129.99),
            Product::new(ProductId::new(8), "Bamboo Spatula", "kitchen-accessories"),
        ]
    }
}

/// Property-based testing utilities using proptest.
pub mod properties {
    use catalog_core::{ALL_CATEGORIES, Product, ProductId, QueryDescriptor, SortKey};
    use proptest::prelude::*;

    /// Categories drawn from a small pool so filters actually match
    pub const CATEGORIES: [&str; 4] = ["beauty", "smartphones", "furniture", "Beauty"];

    /// Any sort key
    pub fn arb_sort_key() -> impl Strategy<Value = SortKey> {
        prop::sample::select(SortKey::ALL.to_vec())
    }

    /// A product with a short mixed-case title and an optional price
    pub fn arb_product() -> impl Strategy<Value = Product> {
        (
            1u64..10_000,
            "[a-zA-ZéÉèàçÅ ]{0,12}",
            prop::sample::select(CATEGORIES.to_vec()),
            prop::option::of(0.0f64..5_000.0),
        )
            .prop_map(|(id, title, category, price)| {
                let mut product = Product::new(ProductId::new(id), title, category);
                product.price = price;
                product
            })
    }

    /// Up to 40 products with distinct ids
    pub fn arb_products() -> impl Strategy<Value = Vec<Product>> {
        prop::collection::vec(arb_product(), 0..40).prop_map(|products| {
            products
                .into_iter()
                .enumerate()
                .map(|(index, mut product)| {
                    product.id = ProductId::new(index as u64 + 1);
                    product
                })
                .collect()
        })
    }

    /// Any query over the category pool, including `"all"`
    pub fn arb_query() -> impl Strategy<Value = QueryDescriptor> {
        let category = prop_oneof![
            Just(ALL_CATEGORIES.to_string()),
            prop::sample::select(CATEGORIES.to_vec()).prop_map(str::to_string),
        ];

        ("[a-zA-Z ]{0,3}", category, arb_sort_key()).prop_map(|(search_text, category, sort_key)| {
            QueryDescriptor::default()
                .with_search_text(search_text)
                .with_category(category)
                .with_sort_key(sort_key)
        })
    }
}

// Re-export commonly used items
pub use fixtures::{product, sample_products};
pub use mock_api::{ApiCall, Gate, MockCatalogApi};
pub use reducer_test::ReducerTest;
