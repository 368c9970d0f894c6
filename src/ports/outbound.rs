//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{
    AdminUser, Category, CategoryDraft, DomainError, ManagedUser, Order, OrderStatus, Product,
    ProductDraft, SessionState,
};

/// Admin authentication endpoints.
#[async_trait::async_trait]
pub trait AuthApi: Send + Sync {
    /// POST /admin-auth/login. Returns the principal on success; the role
    /// check is the caller's concern.
    async fn login(&self, email: &str, password: &str) -> Result<AdminUser, DomainError>;

    /// POST /admin-auth/logout. Invalidates the server session.
    async fn logout(&self) -> Result<(), DomainError>;

    /// GET /admin-auth/me. The once-per-session status check.
    async fn me(&self) -> Result<AdminUser, DomainError>;
}

/// Category endpoints. The flat listing is the single source of records;
/// the nested tree is built locally by `domain::tree::build_tree`.
#[async_trait::async_trait]
pub trait CategoryApi: Send + Sync {
    /// GET /category: flat records, backend sibling order.
    async fn list(&self) -> Result<Vec<Category>, DomainError>;

    /// GET /category/parent-categories: root categories only.
    async fn parents(&self) -> Result<Vec<Category>, DomainError>;

    /// POST /category.
    async fn create(&self, draft: &CategoryDraft) -> Result<Category, DomainError>;

    /// PUT /category/{id}.
    async fn update(&self, id: &str, draft: &CategoryDraft) -> Result<Category, DomainError>;

    /// DELETE /category/{id}. Deleting a node with children is a
    /// user-confirmed, backend-enforced operation.
    async fn delete(&self, id: &str) -> Result<(), DomainError>;
}

/// Product endpoints.
#[async_trait::async_trait]
pub trait ProductApi: Send + Sync {
    async fn list(&self) -> Result<Vec<Product>, DomainError>;
    async fn create(&self, draft: &ProductDraft) -> Result<Product, DomainError>;
    async fn update(&self, id: &str, draft: &ProductDraft) -> Result<Product, DomainError>;
    async fn delete(&self, id: &str) -> Result<(), DomainError>;
}

/// Order endpoints. Orders originate elsewhere; this console reads,
/// patches status/notes, and deletes.
#[async_trait::async_trait]
pub trait OrderApi: Send + Sync {
    async fn list(&self) -> Result<Vec<Order>, DomainError>;

    /// PUT /order/{id}/status with `{status, notes}`.
    async fn update_status(
        &self,
        id: &str,
        status: &OrderStatus,
        notes: Option<&str>,
    ) -> Result<Order, DomainError>;

    async fn delete(&self, id: &str) -> Result<(), DomainError>;
}

/// Storefront user endpoints.
#[async_trait::async_trait]
pub trait UserApi: Send + Sync {
    async fn list(&self) -> Result<Vec<ManagedUser>, DomainError>;

    /// PUT /users/{id}/status.
    async fn update_status(&self, id: &str, is_active: bool) -> Result<ManagedUser, DomainError>;

    async fn delete(&self, id: &str) -> Result<(), DomainError>;
}

/// Session persistence port. One encrypted blob, rehydrated at startup.
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    /// Load persisted state. Must fail closed: any storage or decryption
    /// problem yields the default (unchecked) state, never an error the
    /// caller has to handle.
    async fn load(&self) -> SessionState;

    /// Persist state after a transition.
    async fn save(&self, state: &SessionState) -> Result<(), DomainError>;

    /// Drop the blob entirely (401 global signal, explicit state reset).
    /// A later `load` returns the default state.
    async fn reset(&self) -> Result<(), DomainError>;
}
