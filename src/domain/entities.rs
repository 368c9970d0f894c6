//! Domain entities. Pure data structures for the core business.
//!
//! No HTTP/IO types here; these are mapped from adapters.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A category record as the backend stores it: flat, with an optional
/// parent reference. The nested form lives in [`crate::domain::tree`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    /// None denotes a root (top-level) category.
    #[serde(
        default,
        rename = "parentCategory",
        alias = "parentId",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent: Option<ParentRef>,
}

impl Category {
    /// Resolved parent id, regardless of whether the backend populated the
    /// parent as a plain id or an embedded object.
    pub fn parent_id(&self) -> Option<&str> {
        self.parent.as_ref().map(ParentRef::id)
    }
}

/// The backend sometimes returns the parent as a bare id string and
/// sometimes as a populated category object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParentRef {
    Id(String),
    Embedded {
        #[serde(rename = "_id", alias = "id")]
        id: String,
    },
}

impl ParentRef {
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) => id,
            Self::Embedded { id } => id,
        }
    }
}

/// Create/update payload for a category. The id is assigned by the backend.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryDraft {
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Serialized as null for root categories, matching the backend contract.
    #[serde(rename = "parentCategory")]
    pub parent_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub sku: String,
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub base_price: Decimal,
    /// Deepest selected category id (from the 3-level cascading pick).
    #[serde(default)]
    pub primary_category: Option<String>,
    pub pack_options: Vec<PackOption>,
    #[serde(default)]
    pub images: Vec<String>,
    pub stock: Stock,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub meta_title: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
}

fn default_true() -> bool {
    true
}

/// A purchasable unit/quantity/price combination (e.g. "5 kg box").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackOption {
    pub unit: String,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stock {
    pub level: u32,
    pub status: StockStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
}

impl StockStatus {
    pub const ALL: [Self; 3] = [Self::InStock, Self::LowStock, Self::OutOfStock];

    pub fn label(self) -> &'static str {
        match self {
            Self::InStock => "In stock",
            Self::LowStock => "Low stock",
            Self::OutOfStock => "Out of stock",
        }
    }
}

/// Create/update payload for a product. Blank image entries must already be
/// filtered out by the form layer before this is built.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub sku: String,
    pub slug: String,
    pub name: String,
    pub brand: String,
    pub description: String,
    pub short_description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub base_price: Decimal,
    pub primary_category: Option<String>,
    pub pack_options: Vec<PackOption>,
    pub images: Vec<String>,
    pub stock: Stock,
    pub is_featured: bool,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
}

/// Orders are created by customers; the admin console only reads them,
/// edits status/notes, and deletes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// Human-readable order number.
    pub order_id: String,
    pub customer_info: CustomerInfo,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub order_total: Decimal,
    pub status: OrderStatus,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub shipping_address: Option<ShippingAddress>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    #[serde(default)]
    pub line1: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub country: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub sku: String,
    #[serde(default)]
    pub name: Option<String>,
    pub quantity: u32,
    /// The pack the customer picked for this line.
    #[serde(default)]
    pub pack: Option<PackOption>,
}

/// Known backend statuses, with a tolerant arm so an unrecognized value
/// survives a read-modify-write cycle instead of failing the list view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    #[serde(untagged)]
    Other(String),
}

impl OrderStatus {
    pub const KNOWN: [Self; 5] = [
        Self::Pending,
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
            Self::Other(s) => s,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The principal returned by the session-check and login endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUser {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub email: String,
    pub role: String,
}

/// A managed storefront user (read/status/delete only from this console).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedUser {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub email: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Persisted authentication state.
///
/// `is_initialized` distinguishes "never checked" from "checked and logged
/// out". It flips to true after the first status check resolves and is only
/// cleared by an explicit state reset, but it is never trusted from storage
/// alone: the status check still runs once per process.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionState {
    pub user: Option<AdminUser>,
    pub is_logged_in: bool,
    pub is_initialized: bool,
}
