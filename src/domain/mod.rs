//! Core domain layer. No external I/O dependencies.
//!
//! Entities and business rules live here. Dependencies flow inward.

pub mod entities;
pub mod errors;
pub mod selection;
pub mod tree;

pub use entities::{
    AdminUser, Category, CategoryDraft, CustomerInfo, ManagedUser, Order, OrderItem, OrderStatus,
    PackOption, ParentRef, Product, ProductDraft, SessionState, ShippingAddress, Stock,
    StockStatus,
};
pub use errors::DomainError;
pub use selection::{CategoryCascade, MAX_LEVELS};
pub use tree::{build_tree, flatten, CategoryNode};
