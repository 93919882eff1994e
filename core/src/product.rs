//! Product data model as returned by the catalog API.
//!
//! The API is not schema-guaranteed, so the deserialization boundary is
//! strict about identity (`id` is required) and lenient about everything a
//! screen can live without. Absent data stays absent: a missing `stock` is
//! `None`, never `0`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::CatalogError;

/// Unique identifier of a product within one collection fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u64);

impl ProductId {
    /// Create a product id
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw id value
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProductId {
    type Err = CatalogError;

    /// Parse a route-style id (`"42"`).
    ///
    /// Empty, non-numeric and zero ids are rejected as
    /// [`CatalogError::Validation`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(CatalogError::Validation("Product id is missing".to_string()));
        }

        match trimmed.parse::<u64>() {
            Ok(0) | Err(_) => Err(CatalogError::Validation(format!(
                "Invalid product id: {trimmed:?}"
            ))),
            Ok(id) => Ok(Self(id)),
        }
    }
}

/// A customer review attached to a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// Star rating given by the reviewer
    #[serde(default, deserialize_with = "lenient::rating")]
    pub rating: Option<f64>,
    /// Free-text comment
    #[serde(default)]
    pub comment: String,
    /// When the review was written
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub date: Option<DateTime<Utc>>,
    /// Reviewer display name
    #[serde(default)]
    pub reviewer_name: Option<String>,
    /// Reviewer email
    #[serde(default)]
    pub reviewer_email: Option<String>,
}

/// One catalog item.
///
/// Immutable once fetched. A different view of the catalog is always a new
/// fetch or a projection, never an edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique id
    pub id: ProductId,
    /// Display title
    #[serde(default)]
    pub title: String,
    /// Long description
    #[serde(default)]
    pub description: String,
    /// Category slug from the API's enumeration
    #[serde(default)]
    pub category: String,
    /// Unit price, `None` when absent, not numeric or negative
    #[serde(default, deserialize_with = "lenient::price")]
    pub price: Option<f64>,
    /// Average rating in `[0, 5]`
    #[serde(default, deserialize_with = "lenient::rating")]
    pub rating: Option<f64>,
    /// Units in stock, `None` when unknown
    #[serde(default, deserialize_with = "lenient::count")]
    pub stock: Option<u32>,
    /// Brand name
    #[serde(default)]
    pub brand: Option<String>,
    /// Thumbnail URI
    #[serde(default)]
    pub thumbnail: String,
    /// Gallery image URIs, in display order
    #[serde(default)]
    pub images: Vec<String>,

    /// Discount in percent, within `[0, 100]`
    #[serde(default, deserialize_with = "lenient::percentage")]
    pub discount_percentage: Option<f64>,
    /// Free-form tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Stock keeping unit
    #[serde(default)]
    pub sku: Option<String>,
    /// Availability label (e.g. "In Stock", "Low Stock")
    #[serde(default)]
    pub availability_status: Option<String>,
    /// Warranty text
    #[serde(default)]
    pub warranty_information: Option<String>,
    /// Shipping text
    #[serde(default)]
    pub shipping_information: Option<String>,
    /// Return policy text
    #[serde(default)]
    pub return_policy: Option<String>,
    /// Minimum quantity per order
    #[serde(default, deserialize_with = "lenient::count")]
    pub minimum_order_quantity: Option<u32>,
    /// Customer reviews
    #[serde(default)]
    pub reviews: Vec<Review>,
}

impl Product {
    /// Create a product with the identifying fields set and everything else
    /// absent.
    #[must_use]
    pub fn new(id: ProductId, title: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: String::new(),
            category: category.into(),
            price: None,
            rating: None,
            stock: None,
            brand: None,
            thumbnail: String::new(),
            images: Vec::new(),
            discount_percentage: None,
            tags: Vec::new(),
            sku: None,
            availability_status: None,
            warranty_information: None,
            shipping_information: None,
            return_policy: None,
            minimum_order_quantity: None,
            reviews: Vec::new(),
        }
    }

    /// Builder: Set price
    #[must_use]
    pub const fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    /// Builder: Set description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Builder: Set rating
    #[must_use]
    pub const fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Builder: Set stock
    #[must_use]
    pub const fn with_stock(mut self, stock: u32) -> Self {
        self.stock = Some(stock);
        self
    }

    /// Builder: Set brand
    #[must_use]
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    /// Price for ordering purposes. Missing or non-finite prices count as zero.
    #[must_use]
    pub fn price_or_zero(&self) -> f64 {
        self.price.filter(|p| p.is_finite()).unwrap_or(0.0)
    }

    /// Whether the product can be ordered, or `None` when stock is unknown.
    #[must_use]
    pub fn in_stock(&self) -> Option<bool> {
        self.stock.map(|stock| stock > 0)
    }

    /// Price after `discount_percentage`, when both are known.
    #[must_use]
    pub fn discounted_price(&self) -> Option<f64> {
        let price = self.price?;
        let discount = self.discount_percentage?.clamp(0.0, 100.0);
        Some(price * (100.0 - discount) / 100.0)
    }
}

/// Envelope returned by the list, search and category endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    /// Products in this page
    pub products: Vec<Product>,
    /// Total number of matching products on the server
    #[serde(default)]
    pub total: u64,
    /// Offset of this page
    #[serde(default)]
    pub skip: u64,
    /// Requested page size
    #[serde(default)]
    pub limit: u64,
}

/// Field deserializers that turn unusable values into `None` instead of
/// failing the whole product.
mod lenient {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn as_decimal(value: &Value) -> Option<f64> {
        let parsed = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        parsed.filter(|n| n.is_finite())
    }

    fn bounded<'de, D>(deserializer: D, min: f64, max: f64) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(as_decimal(&value).filter(|n| (min..=max).contains(n)))
    }

    pub fn price<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        bounded(deserializer, 0.0, f64::MAX)
    }

    pub fn rating<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        bounded(deserializer, 0.0, 5.0)
    }

    pub fn percentage<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        bounded(deserializer, 0.0, 100.0)
    }

    pub fn count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let parsed = match &value {
            Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
            Value::String(s) => s.trim().parse::<u32>().ok(),
            _ => None,
        };
        Ok(parsed)
    }

    pub fn timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(value
            .as_str()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc)))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code

    use super::*;

    #[test]
    fn test_deserialize_full_product() {
        let json = r#"{
            "id": 1,
            "title": "Essence Mascara Lash Princess",
            "description": "A popular mascara.",
            "category": "beauty",
            "price": 9.99,
            "discountPercentage": 7.17,
            "rating": 4.94,
            "stock": 5,
            "tags": ["beauty", "mascara"],
            "brand": "Essence",
            "sku": "RCH45Q1A",
            "warrantyInformation": "1 month warranty",
            "shippingInformation": "Ships in 1 month",
            "availabilityStatus": "Low Stock",
            "reviews": [{
                "rating": 2,
                "comment": "Very unhappy with my purchase!",
                "date": "2024-05-23T08:56:21.618Z",
                "reviewerName": "John Doe",
                "reviewerEmail": "john.doe@x.dummyjson.com"
            }],
            "returnPolicy": "30 days return policy",
            "minimumOrderQuantity": 24,
            "images": ["https://cdn.example.com/1.png"],
            "thumbnail": "https://cdn.example.com/thumb.png"
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();

        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.category, "beauty");
        assert_eq!(product.price, Some(9.99));
        assert_eq!(product.stock, Some(5));
        assert_eq!(product.brand.as_deref(), Some("Essence"));
        assert_eq!(product.minimum_order_quantity, Some(24));
        assert_eq!(product.return_policy.as_deref(), Some("30 days return policy"));
        assert_eq!(product.reviews.len(), 1);
        assert!(product.reviews[0].date.is_some());
        assert_eq!(product.images.len(), 1);
    }

    #[test]
    fn test_missing_optional_fields_stay_absent() {
        let product: Product = serde_json::from_str(r#"{"id": 5, "title": "Bare"}"#).unwrap();

        assert_eq!(product.stock, None);
        assert_eq!(product.price, None);
        assert_eq!(product.brand, None);
        assert_eq!(product.warranty_information, None);
        assert_eq!(product.in_stock(), None);
        assert!(product.images.is_empty());
        assert!(product.category.is_empty());
    }

    #[test]
    fn test_malformed_numbers_become_none() {
        let product: Product = serde_json::from_str(
            r#"{"id": 6, "title": "Odd", "price": "n/a", "rating": null, "stock": -3}"#,
        )
        .unwrap();

        assert_eq!(product.price, None);
        assert_eq!(product.rating, None);
        assert_eq!(product.stock, None);
        assert!((product.price_or_zero() - 0.0).abs() < f64::EPSILON);

        let product: Product = serde_json::from_str(
            r#"{"id": 1, "price": -50, "rating": 9.5, "discountPercentage": 120,
                "reviews": [{"rating": -1, "comment": "?"}]}"#,
        )
        .unwrap();

        assert_eq!(product.price, None);
        assert_eq!(product.rating, None);
        assert_eq!(product.discount_percentage, None);
        assert_eq!(product.reviews[0].rating, None);
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let product: Product = serde_json::from_str(
            r#"{"id": 2, "price": 0, "rating": 5, "discountPercentage": 100}"#,
        )
        .unwrap();

        assert_eq!(product.price, Some(0.0));
        assert_eq!(product.rating, Some(5.0));
        assert_eq!(product.discount_percentage, Some(100.0));
    }

    #[test]
    fn test_numeric_strings_are_accepted() {
        let product: Product =
            serde_json::from_str(r#"{"id": 7, "price": "19.5", "stock": "12"}"#).unwrap();

        assert_eq!(product.price, Some(19.5));
        assert_eq!(product.stock, Some(12));
    }

    #[test]
    fn test_missing_id_is_an_error() {
        let result = serde_json::from_str::<Product>(r#"{"title": "No id"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_product_id_parsing() {
        assert_eq!("42".parse::<ProductId>().unwrap(), ProductId::new(42));
        assert_eq!(" 7 ".parse::<ProductId>().unwrap(), ProductId::new(7));
        assert!(matches!("".parse::<ProductId>(), Err(CatalogError::Validation(_))));
        assert!(matches!("abc".parse::<ProductId>(), Err(CatalogError::Validation(_))));
        assert!(matches!("0".parse::<ProductId>(), Err(CatalogError::Validation(_))));
    }

    #[test]
    fn test_discounted_price() {
        let mut product = Product::new(ProductId::new(1), "Thing", "misc").with_price(200.0);
        assert_eq!(product.discounted_price(), None);

        product.discount_percentage = Some(25.0);
        let discounted = product.discounted_price().unwrap();
        assert!((discounted - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_page_envelope() {
        let page: ProductPage = serde_json::from_str(
            r#"{"products": [{"id": 1}, {"id": 2}], "total": 194, "skip": 0, "limit": 2}"#,
        )
        .unwrap();

        assert_eq!(page.products.len(), 2);
        assert_eq!(page.total, 194);
        assert_eq!(page.limit, 2);
    }
}
