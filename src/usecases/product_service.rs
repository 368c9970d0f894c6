//! Product use cases: cached list with optimistic id-keyed patching.
//!
//! Every mutation is a full round trip; the in-memory list is patched from
//! the response (create prepends, update replaces, delete removes) so the
//! list screen stays current without an extra refetch.

use crate::domain::{DomainError, Product, ProductDraft};
use crate::ports::ProductApi;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

pub struct ProductService {
    api: Arc<dyn ProductApi>,
    list: RwLock<Vec<Product>>,
}

impl ProductService {
    pub fn new(api: Arc<dyn ProductApi>) -> Self {
        Self {
            api,
            list: RwLock::new(Vec::new()),
        }
    }

    pub async fn refresh(&self) -> Result<(), DomainError> {
        let products = self.api.list().await?;
        info!(count = products.len(), "refreshed products");
        *self.list.write().await = products;
        Ok(())
    }

    pub async fn list(&self) -> Vec<Product> {
        self.list.read().await.clone()
    }

    pub async fn count(&self) -> usize {
        self.list.read().await.len()
    }

    pub async fn create(&self, draft: ProductDraft) -> Result<Product, DomainError> {
        let created = self.api.create(&draft).await?;
        info!(id = %created.id, sku = %created.sku, "product created");
        self.list.write().await.insert(0, created.clone());
        Ok(created)
    }

    pub async fn update(&self, id: &str, draft: ProductDraft) -> Result<Product, DomainError> {
        let updated = self.api.update(id, &draft).await?;
        info!(id = %updated.id, "product updated");
        let mut list = self.list.write().await;
        if let Some(slot) = list.iter_mut().find(|p| p.id == updated.id) {
            *slot = updated.clone();
        }
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<(), DomainError> {
        self.api.delete(id).await?;
        info!(id, "product deleted");
        self.list.write().await.retain(|p| p.id != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PackOption, Stock, StockStatus};
    use rust_decimal::Decimal;
    use std::sync::Mutex;

    fn product(id: &str, name: &str) -> Product {
        Product {
            id: id.to_string(),
            sku: format!("SKU-{id}"),
            slug: name.to_lowercase(),
            name: name.to_string(),
            brand: String::new(),
            description: String::new(),
            short_description: String::new(),
            base_price: Decimal::new(100, 1),
            primary_category: None,
            pack_options: vec![PackOption {
                unit: "kg".into(),
                quantity: 1,
                price: Decimal::new(100, 1),
            }],
            images: Vec::new(),
            stock: Stock {
                level: 5,
                status: StockStatus::InStock,
            },
            is_featured: false,
            is_active: true,
            meta_title: None,
            meta_description: None,
        }
    }

    fn draft(name: &str) -> ProductDraft {
        let p = product("ignored", name);
        ProductDraft {
            sku: p.sku,
            slug: p.slug,
            name: p.name,
            brand: p.brand,
            description: p.description,
            short_description: p.short_description,
            base_price: p.base_price,
            primary_category: None,
            pack_options: p.pack_options,
            images: Vec::new(),
            stock: p.stock,
            is_featured: false,
            is_active: true,
            meta_title: None,
            meta_description: None,
        }
    }

    struct FakeApi {
        products: Mutex<Vec<Product>>,
        next_id: Mutex<u32>,
    }

    impl FakeApi {
        fn with(products: Vec<Product>) -> Arc<Self> {
            Arc::new(Self {
                products: Mutex::new(products),
                next_id: Mutex::new(100),
            })
        }
    }

    #[async_trait::async_trait]
    impl ProductApi for FakeApi {
        async fn list(&self) -> Result<Vec<Product>, DomainError> {
            Ok(self.products.lock().unwrap().clone())
        }

        async fn create(&self, draft: &ProductDraft) -> Result<Product, DomainError> {
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            let mut created = product(&next.to_string(), &draft.name);
            created.sku = draft.sku.clone();
            self.products.lock().unwrap().push(created.clone());
            Ok(created)
        }

        async fn update(&self, id: &str, draft: &ProductDraft) -> Result<Product, DomainError> {
            let mut products = self.products.lock().unwrap();
            let slot = products
                .iter_mut()
                .find(|p| p.id == id)
                .ok_or(DomainError::Api {
                    status: 404,
                    message: "product not found".into(),
                })?;
            slot.name = draft.name.clone();
            Ok(slot.clone())
        }

        async fn delete(&self, id: &str) -> Result<(), DomainError> {
            self.products.lock().unwrap().retain(|p| p.id != id);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_create_prepends_to_cached_list() {
        let api = FakeApi::with(vec![product("1", "Old")]);
        let service = ProductService::new(api);
        service.refresh().await.unwrap();

        service.create(draft("New")).await.unwrap();

        let list = service.list().await;
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].name, "New");
    }

    #[tokio::test]
    async fn test_update_replaces_by_id() {
        let api = FakeApi::with(vec![product("1", "Old"), product("2", "Other")]);
        let service = ProductService::new(api);
        service.refresh().await.unwrap();

        service.update("1", draft("Renamed")).await.unwrap();

        let list = service.list().await;
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].name, "Renamed");
        assert_eq!(list[1].name, "Other");
    }

    #[tokio::test]
    async fn test_delete_removes_by_id() {
        let api = FakeApi::with(vec![product("1", "A"), product("2", "B")]);
        let service = ProductService::new(api);
        service.refresh().await.unwrap();

        service.delete("1").await.unwrap();

        let list = service.list().await;
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, "2");
    }
}
