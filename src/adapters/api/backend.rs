//! Backend adapter. Implements the outbound API ports over RestClient.
//!
//! One method per consumed endpoint. Envelope differences are handled by
//! the normalize module; errors are already DomainError at this layer.

use crate::adapters::api::{client::RestClient, normalize};
use crate::domain::{
    AdminUser, Category, CategoryDraft, DomainError, ManagedUser, Order, OrderStatus, Product,
    ProductDraft,
};
use crate::ports::{AuthApi, CategoryApi, OrderApi, ProductApi, UserApi};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

/// The admin backend, seen through its REST surface.
pub struct BackendApi {
    client: Arc<RestClient>,
}

impl BackendApi {
    pub fn new(client: Arc<RestClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AuthApi for BackendApi {
    async fn login(&self, email: &str, password: &str) -> Result<AdminUser, DomainError> {
        let body = json!({ "email": email, "password": password });
        let response = self.client.post("/admin-auth/login", &body).await?;
        normalize::extract_item(response, "user")
    }

    async fn logout(&self) -> Result<(), DomainError> {
        self.client.post_empty("/admin-auth/logout").await?;
        Ok(())
    }

    async fn me(&self) -> Result<AdminUser, DomainError> {
        let response = self.client.get("/admin-auth/me").await?;
        normalize::extract_item(response, "user")
    }
}

#[async_trait]
impl CategoryApi for BackendApi {
    async fn list(&self) -> Result<Vec<Category>, DomainError> {
        let response = self.client.get("/category").await?;
        normalize::extract_list(response, "categories")
    }

    async fn parents(&self) -> Result<Vec<Category>, DomainError> {
        let response = self.client.get("/category/parent-categories").await?;
        normalize::extract_list(response, "categories")
    }

    async fn create(&self, draft: &CategoryDraft) -> Result<Category, DomainError> {
        let response = self.client.post("/category", draft).await?;
        normalize::extract_item(response, "category")
    }

    async fn update(&self, id: &str, draft: &CategoryDraft) -> Result<Category, DomainError> {
        let response = self.client.put(&format!("/category/{}", id), draft).await?;
        normalize::extract_item(response, "category")
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        self.client.delete(&format!("/category/{}", id)).await?;
        Ok(())
    }
}

#[async_trait]
impl ProductApi for BackendApi {
    async fn list(&self) -> Result<Vec<Product>, DomainError> {
        let response = self.client.get("/products").await?;
        normalize::extract_list(response, "products")
    }

    async fn create(&self, draft: &ProductDraft) -> Result<Product, DomainError> {
        let response = self.client.post("/products", draft).await?;
        normalize::extract_item(response, "product")
    }

    async fn update(&self, id: &str, draft: &ProductDraft) -> Result<Product, DomainError> {
        let response = self.client.put(&format!("/products/{}", id), draft).await?;
        normalize::extract_item(response, "product")
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        self.client.delete(&format!("/products/{}", id)).await?;
        Ok(())
    }
}

#[async_trait]
impl OrderApi for BackendApi {
    async fn list(&self) -> Result<Vec<Order>, DomainError> {
        let response = self.client.get("/order").await?;
        normalize::extract_list(response, "orders")
    }

    async fn update_status(
        &self,
        id: &str,
        status: &OrderStatus,
        notes: Option<&str>,
    ) -> Result<Order, DomainError> {
        let body = json!({ "status": status, "notes": notes });
        let response = self
            .client
            .put(&format!("/order/{}/status", id), &body)
            .await?;
        normalize::extract_item(response, "order")
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        self.client.delete(&format!("/order/{}", id)).await?;
        Ok(())
    }
}

#[async_trait]
impl UserApi for BackendApi {
    async fn list(&self) -> Result<Vec<ManagedUser>, DomainError> {
        let response = self.client.get("/users").await?;
        normalize::extract_list(response, "users")
    }

    async fn update_status(&self, id: &str, is_active: bool) -> Result<ManagedUser, DomainError> {
        let body = json!({ "isActive": is_active });
        let response = self
            .client
            .put(&format!("/users/{}/status", id), &body)
            .await?;
        normalize::extract_item(response, "user")
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        self.client.delete(&format!("/users/{}", id)).await?;
        Ok(())
    }
}
