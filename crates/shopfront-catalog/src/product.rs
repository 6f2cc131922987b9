//! Product records
//!
//! A [`Product`] is an opaque commerce payload keyed by [`ProductId`] and
//! joined across sources by `name`. Only `id` and `name` are required when
//! deserializing; everything else is display data passed through as-is.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::borrow::Borrow;
use std::fmt;

/// Stable product identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a product id
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow as str
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ProductId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A sellable item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Stable identifier
    pub id: ProductId,
    /// Display name, also the join key between sources
    pub name: String,
    /// Unit price
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// Long description
    #[serde(default)]
    pub description: String,
    /// Human-readable dimensions
    #[serde(default)]
    pub dimensions: String,
    /// Human-readable weight
    #[serde(default)]
    pub weight: String,
    /// Grid filter category
    #[serde(default)]
    pub category: String,
    /// Image references (local assets for static records)
    #[serde(default)]
    pub images: Vec<String>,
    /// Any other attributes, kept verbatim
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Product {
    /// Create a product with only the required fields set
    #[must_use]
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price: None,
            description: String::new(),
            dimensions: String::new(),
            weight: String::new(),
            category: String::new(),
            images: Vec::new(),
            attributes: Map::new(),
        }
    }

    /// With price
    #[inline]
    #[must_use]
    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    /// With category
    #[inline]
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// With description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// With image references
    #[inline]
    #[must_use]
    pub fn with_images<I, S>(mut self, images: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.images = images.into_iter().map(Into::into).collect();
        self
    }

    /// Price formatted for display, e.g. `$34.00`
    #[must_use]
    pub fn display_price(&self) -> String {
        match self.price {
            Some(price) => format!("${price:.2}"),
            None => "-".to_string(),
        }
    }

    /// First image, used as the grid thumbnail
    #[inline]
    #[must_use]
    pub fn thumbnail(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// A product as delivered by the remote endpoint
///
/// Carries the optional `featured` flag. Only the JSON literal `true` marks a
/// record as featured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteProduct {
    /// Product payload
    #[serde(flatten)]
    pub product: Product,
    /// Remote featured flag
    #[serde(default, deserialize_with = "strict_true")]
    pub featured: bool,
}

impl RemoteProduct {
    /// Wrap a product as an unflagged remote record
    #[inline]
    #[must_use]
    pub fn new(product: Product) -> Self {
        Self {
            product,
            featured: false,
        }
    }

    /// Mark as featured
    #[inline]
    #[must_use]
    pub fn featured(mut self) -> Self {
        self.featured = true;
        self
    }

    /// Join key
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.product.name
    }
}

impl From<Product> for RemoteProduct {
    fn from(product: Product) -> Self {
        Self::new(product)
    }
}

fn strict_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value == Value::Bool(true))
}
