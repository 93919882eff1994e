//! Catalog browser binary
//!
//! Drives the product list and detail models against the live catalog API
//! and prints what a screen would render.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use catalog_api::CatalogClient;
use catalog_core::environment::CatalogApi;
use catalog_core::{ALL_CATEGORIES, Product, SortKey};
use catalog_runtime::{ProductDetailModel, ProductDetailView, ProductListModel, ProductListView};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;

use config::AppConfig;

/// Upper bound on how long the demo waits for one screen to load
const LOAD_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Parser, Debug)]
#[command(name = "catalog-browser", about = "Browse the product catalog from a terminal")]
struct Args {
    /// Case-insensitive search text
    #[arg(long, default_value = "")]
    search: String,

    /// Category to show, or "all"
    #[arg(long, default_value = ALL_CATEGORIES)]
    category: String,

    /// Sort order: name-asc, price-asc or price-desc
    #[arg(long, default_value_t = SortKey::NameAsc)]
    sort: SortKey,

    /// Rows to print from the list
    #[arg(long, default_value_t = 10)]
    limit: usize,

    /// Product id to open on the detail screen, as it would appear in a route
    #[arg(long)]
    show: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = AppConfig::from_env();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(api_url = %config.api_url, list_limit = config.list_limit, "Starting catalog browser");

    let client = CatalogClient::with_config(config.client_config())
        .context("failed to create catalog client")?;
    let api: Arc<dyn CatalogApi> = Arc::new(client);

    let mut list = ProductListModel::with_config(Arc::clone(&api), config.pipeline_config());
    list.load();
    let view = wait_for_list(&mut list).await?;
    if let Some(error) = view.error {
        bail!("could not load products: {error} ({})", error.detail);
    }

    list.set_category(args.category);
    list.set_search_text(args.search);
    list.set_sort_key(args.sort);
    print_list(&list.snapshot(), args.limit);

    let Some(raw_id) = args.show else {
        return Ok(());
    };

    let mut detail = ProductDetailModel::new(api);
    detail.show_raw(&raw_id);
    let view = wait_for_detail(&mut detail).await?;
    print_detail(&raw_id, &view);

    Ok(())
}

async fn wait_for_list(list: &mut ProductListModel) -> anyhow::Result<ProductListView> {
    tokio::time::timeout(LOAD_TIMEOUT, async {
        loop {
            let view = list.snapshot();
            if !view.is_loading || !list.changed().await {
                return view;
            }
        }
    })
    .await
    .context("timed out loading products")
}

async fn wait_for_detail(detail: &mut ProductDetailModel) -> anyhow::Result<ProductDetailView> {
    tokio::time::timeout(LOAD_TIMEOUT, async {
        loop {
            let view = detail.snapshot();
            if !view.is_loading || !detail.changed().await {
                return view;
            }
        }
    })
    .await
    .context("timed out loading product")
}

fn print_list(view: &ProductListView, limit: usize) {
    println!(
        "=== {} products (category: {}, search: {:?}, sort: {}) ===",
        view.items.len(),
        view.query.category,
        view.query.search_text,
        view.query.sort_key
    );
    for product in view.items.iter().take(limit) {
        println!("{}", list_row(product));
    }
    if view.items.len() > limit {
        println!("  ... {} more", view.items.len() - limit);
    }
    println!("\nCategories: {}", view.categories.join(", "));
}

fn list_row(product: &Product) -> String {
    let price = product
        .price
        .map_or_else(|| "n/a".to_string(), |p| format!("${p:.2}"));
    let stock = match product.in_stock() {
        Some(true) => "in stock",
        Some(false) => "out of stock",
        None => "",
    };
    format!(
        "  #{:<4} {:<40} {:>10}  {:<20} {}",
        product.id, product.title, price, product.category, stock
    )
}

fn print_detail(raw_id: &str, view: &ProductDetailView) {
    println!("\n=== Product {raw_id} ===");

    if let Some(error) = &view.error {
        // The detail screen shows different copy for a missing product.
        if error.is_not_found() {
            println!("No product with id {raw_id}.");
        } else {
            println!("{error}");
        }
        return;
    }

    let Some(product) = &view.product else {
        return;
    };

    println!("{}", product.title);
    if let Some(brand) = &product.brand {
        println!("Brand:    {brand}");
    }
    println!("Category: {}", product.category);
    if let Some(price) = product.price {
        match product.discounted_price() {
            Some(discounted) => println!("Price:    ${price:.2} (now ${discounted:.2})"),
            None => println!("Price:    ${price:.2}"),
        }
    }
    if let Some(rating) = product.rating {
        println!("Rating:   {rating:.1} / 5 ({} reviews)", product.reviews.len());
    }
    if let Some(stock) = product.stock {
        println!("Stock:    {stock}");
    }
    for line in [
        &product.warranty_information,
        &product.shipping_information,
        &product.return_policy,
    ]
    .into_iter()
    .flatten()
    {
        println!("          {line}");
    }
    if !product.description.is_empty() {
        println!("\n{}", product.description);
    }
}
