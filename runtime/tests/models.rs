//! Product list and detail models against the in-memory catalog API

#![allow(clippy::unwrap_used)] // Tests can unwrap

use catalog_core::{CatalogError, ErrorKind, Product, ProductId, SearchScope, SortKey};
use catalog_core::PipelineConfig;
use catalog_runtime::{ProductDetailModel, ProductDetailView, ProductListModel, ProductListView};
use catalog_testing::{ApiCall, MockCatalogApi, sample_products};
use std::sync::Arc;
use std::time::Duration;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("catalog_runtime=debug")
        .with_test_writer()
        .try_init();
}

fn ids(items: &[Product]) -> Vec<u64> {
    items.iter().map(|p| p.id.get()).collect()
}

async fn loaded_list(list: &mut ProductListModel) -> ProductListView {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let view = list.snapshot();
            if !view.is_loading {
                return view;
            }
            assert!(list.changed().await);
        }
    })
    .await
    .unwrap()
}

async fn loaded_detail(detail: &mut ProductDetailModel) -> ProductDetailView {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let view = detail.snapshot();
            if !view.is_loading {
                return view;
            }
            assert!(detail.changed().await);
        }
    })
    .await
    .unwrap()
}

// ---------------------------------------------------------------------------
// Product list
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_list_is_idle_until_loaded() {
    let api = Arc::new(MockCatalogApi::with_products(sample_products()));
    let mut list = ProductListModel::new(api.clone());

    let view = list.snapshot();
    assert!(!view.is_loading);
    assert!(view.items.is_empty());
    assert!(view.error.is_none());
    assert_eq!(api.call_count(), 0);
}

#[tokio::test]
async fn test_list_loads_sorted_by_name() {
    init_tracing();
    let api = Arc::new(MockCatalogApi::with_products(sample_products()));
    let mut list = ProductListModel::new(api.clone());

    list.load();
    assert!(list.snapshot().is_loading);

    let view = loaded_list(&mut list).await;
    assert!(view.error.is_none());
    assert_eq!(ids(&view.items), vec![5, 7, 8, 6, 4, 1, 3, 2]);
    assert_eq!(
        view.categories,
        vec![
            "all",
            "smartphones",
            "beauty",
            "furniture",
            "fragrances",
            "mobile-accessories",
            "kitchen-accessories",
        ]
    );
    assert_eq!(api.calls(), vec![ApiCall::Products]);
}

#[tokio::test]
async fn test_query_changes_never_refetch() {
    let api = Arc::new(MockCatalogApi::with_products(sample_products()));
    let mut list = ProductListModel::new(api.clone());
    list.load();
    loaded_list(&mut list).await;

    list.set_category("smartphones");
    list.set_sort_key(SortKey::PriceDesc);
    assert_eq!(ids(&list.snapshot().items), vec![2, 1]);

    list.set_category("all");
    list.set_search_text("  LIP ");
    assert_eq!(ids(&list.snapshot().items), vec![3]);

    list.reset_query();
    let view = list.snapshot();
    assert!(view.query.is_default());
    assert_eq!(view.items.len(), sample_products().len());

    assert_eq!(api.call_count(), 1);
}

#[tokio::test]
async fn test_price_sorts_treat_missing_price_as_zero() {
    let api = Arc::new(MockCatalogApi::with_products(sample_products()));
    let mut list = ProductListModel::new(api);
    list.load();
    loaded_list(&mut list).await;

    list.set_sort_key(SortKey::PriceAsc);
    assert_eq!(ids(&list.snapshot().items), vec![8, 3, 4, 6, 7, 1, 2, 5]);

    // 6 and 7 share a price and keep their input order.
    list.set_sort_key(SortKey::PriceDesc);
    assert_eq!(ids(&list.snapshot().items), vec![5, 2, 1, 6, 7, 4, 3, 8]);
}

#[tokio::test]
async fn test_query_set_before_load_applies_to_fetched_items() {
    let api = Arc::new(MockCatalogApi::with_products(sample_products()));
    let mut list = ProductListModel::new(api);

    list.set_category("beauty");
    list.load();

    let view = loaded_list(&mut list).await;
    assert_eq!(view.query.category, "beauty");
    assert_eq!(ids(&view.items), vec![4, 3]);
}

#[tokio::test]
async fn test_description_search_scope() {
    let api = Arc::new(MockCatalogApi::with_products(sample_products()));
    let config = PipelineConfig::default().with_search_scope(SearchScope::TitleAndDescription);
    let mut list = ProductListModel::with_config(api, config);
    list.load();
    loaded_list(&mut list).await;

    list.set_search_text("creamy");
    assert_eq!(ids(&list.snapshot().items), vec![3]);
}

#[tokio::test]
async fn test_list_failure_then_retry() {
    init_tracing();
    let api = Arc::new(MockCatalogApi::with_products(sample_products()));
    api.fail_next(
        ApiCall::Products,
        CatalogError::Network("connection reset".to_string()),
    );
    let mut list = ProductListModel::new(api.clone());

    list.load();
    let view = loaded_list(&mut list).await;
    let error = view.error.unwrap();
    assert_eq!(error.kind, ErrorKind::Network);
    assert!(view.items.is_empty());

    list.retry();
    let view = loaded_list(&mut list).await;
    assert!(view.error.is_none());
    assert_eq!(view.items.len(), sample_products().len());
    assert_eq!(api.call_count(), 2);
}

#[tokio::test]
async fn test_reload_replaces_collection() {
    let api = Arc::new(MockCatalogApi::with_products(sample_products()));
    let mut list = ProductListModel::new(api.clone());
    list.load();
    loaded_list(&mut list).await;
    list.set_category("beauty");

    api.set_products(vec![catalog_testing::product(99, "Blush", "beauty", 8.0)]);
    list.load();

    let view = loaded_list(&mut list).await;
    assert_eq!(ids(&view.items), vec![99]);
    assert_eq!(view.categories, vec!["all", "beauty"]);
}

#[tokio::test]
async fn test_disposed_list_ignores_late_response() {
    let api = Arc::new(MockCatalogApi::with_products(sample_products()));
    let gate = api.hold(ApiCall::Products);
    let mut list = ProductListModel::new(api);

    list.load();
    assert!(list.snapshot().is_loading);

    list.dispose();
    gate.release();

    let changed = tokio::time::timeout(Duration::from_millis(100), list.changed()).await;
    assert!(changed.is_err(), "no transition expected after dispose");
    assert!(list.snapshot().items.is_empty());
}

// ---------------------------------------------------------------------------
// Product detail
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_detail_loads_product() {
    let api = Arc::new(MockCatalogApi::with_products(sample_products()));
    let mut detail = ProductDetailModel::new(api);

    detail.show(ProductId::new(1));
    assert!(detail.snapshot().is_loading);

    let view = loaded_detail(&mut detail).await;
    assert_eq!(view.product.unwrap().title, "iPhone 9");
    assert!(view.error.is_none());
}

#[tokio::test]
async fn test_detail_distinguishes_not_found_from_network_failure() {
    init_tracing();
    let api = Arc::new(MockCatalogApi::with_products(sample_products()));
    let mut detail = ProductDetailModel::new(api.clone());

    detail.show(ProductId::new(404));
    let missing = loaded_detail(&mut detail).await.error.unwrap();
    assert!(missing.is_not_found());
    assert_eq!(missing.kind, ErrorKind::NotFound);

    api.fail_next(
        ApiCall::Product(ProductId::new(1)),
        CatalogError::Network("offline".to_string()),
    );
    detail.show(ProductId::new(1));
    let offline = loaded_detail(&mut detail).await.error.unwrap();
    assert!(!offline.is_not_found());
    assert_eq!(offline.kind, ErrorKind::Network);

    detail.retry();
    let view = loaded_detail(&mut detail).await;
    assert_eq!(view.product.map(|p| p.id), Some(ProductId::new(1)));
}

#[tokio::test]
async fn test_invalid_route_id_fails_without_request() {
    let api = Arc::new(MockCatalogApi::with_products(sample_products()));
    let mut detail = ProductDetailModel::new(api.clone());

    for raw in ["", "abc", "0", "-3", "1.5"] {
        detail.show_raw(raw);
        let view = detail.snapshot();
        assert!(!view.is_loading, "{raw:?} should fail synchronously");
        assert_eq!(view.error.map(|e| e.kind), Some(ErrorKind::Validation));
        assert_eq!(detail.current_id(), None);
    }

    assert_eq!(api.call_count(), 0);

    detail.show_raw("6");
    let view = loaded_detail(&mut detail).await;
    assert_eq!(view.product.unwrap().title, "Chanel Coco Noir Eau De");
}

#[tokio::test]
async fn test_switching_product_discards_previous_fetch() {
    let api = Arc::new(MockCatalogApi::with_products(sample_products()));
    let gate = api.hold(ApiCall::Product(ProductId::new(1)));
    let mut detail = ProductDetailModel::new(api.clone());

    detail.show(ProductId::new(1));
    detail.show(ProductId::new(2));
    gate.release();

    let view = loaded_detail(&mut detail).await;
    assert_eq!(view.product.map(|p| p.id), Some(ProductId::new(2)));

    tokio::time::sleep(Duration::from_millis(50)).await;
    let view = detail.snapshot();
    assert_eq!(view.product.map(|p| p.id), Some(ProductId::new(2)));
}

#[tokio::test]
async fn test_showing_loaded_product_again_does_not_refetch() {
    let api = Arc::new(MockCatalogApi::with_products(sample_products()));
    let mut detail = ProductDetailModel::new(api.clone());

    detail.show(ProductId::new(3));
    loaded_detail(&mut detail).await;
    detail.show(ProductId::new(3));

    assert!(!detail.snapshot().is_loading);
    assert_eq!(api.calls(), vec![ApiCall::Product(ProductId::new(3))]);
}
