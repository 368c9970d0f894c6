//! Order use cases. Orders are created by customers; this console reads,
//! edits status/notes, and deletes.

use crate::domain::{DomainError, Order, OrderStatus};
use crate::ports::OrderApi;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

pub struct OrderService {
    api: Arc<dyn OrderApi>,
    list: RwLock<Vec<Order>>,
}

impl OrderService {
    pub fn new(api: Arc<dyn OrderApi>) -> Self {
        Self {
            api,
            list: RwLock::new(Vec::new()),
        }
    }

    pub async fn refresh(&self) -> Result<(), DomainError> {
        let orders = self.api.list().await?;
        info!(count = orders.len(), "refreshed orders");
        *self.list.write().await = orders;
        Ok(())
    }

    pub async fn list(&self) -> Vec<Order> {
        self.list.read().await.clone()
    }

    pub async fn count(&self) -> usize {
        self.list.read().await.len()
    }

    /// Change status, preserving the order's current notes.
    pub async fn set_status(&self, id: &str, status: OrderStatus) -> Result<Order, DomainError> {
        let notes = self.current_notes(id).await;
        self.patch(id, status, notes).await
    }

    /// Change notes, preserving the order's current status.
    pub async fn set_notes(&self, id: &str, notes: String) -> Result<Order, DomainError> {
        let status = {
            let list = self.list.read().await;
            list.iter()
                .find(|o| o.id == id)
                .map(|o| o.status.clone())
                .ok_or(DomainError::Input(format!("unknown order {id}")))?
        };
        self.patch(id, status, Some(notes)).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), DomainError> {
        self.api.delete(id).await?;
        info!(id, "order deleted");
        self.list.write().await.retain(|o| o.id != id);
        Ok(())
    }

    async fn current_notes(&self, id: &str) -> Option<String> {
        let list = self.list.read().await;
        list.iter().find(|o| o.id == id).and_then(|o| o.notes.clone())
    }

    async fn patch(
        &self,
        id: &str,
        status: OrderStatus,
        notes: Option<String>,
    ) -> Result<Order, DomainError> {
        let updated = self.api.update_status(id, &status, notes.as_deref()).await?;
        info!(id = %updated.id, status = %updated.status, "order updated");
        let mut list = self.list.write().await;
        if let Some(slot) = list.iter_mut().find(|o| o.id == updated.id) {
            *slot = updated.clone();
        }
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CustomerInfo;
    use rust_decimal::Decimal;
    use std::sync::Mutex;

    fn order(id: &str, status: OrderStatus, notes: Option<&str>) -> Order {
        Order {
            id: id.to_string(),
            order_id: format!("WS-{id}"),
            customer_info: CustomerInfo {
                name: "Ada".into(),
                email: "ada@example.com".into(),
                company_name: None,
                shipping_address: None,
            },
            items: Vec::new(),
            order_total: Decimal::new(1999, 2),
            status,
            notes: notes.map(str::to_string),
            created_at: None,
        }
    }

    struct FakeApi {
        orders: Mutex<Vec<Order>>,
    }

    #[async_trait::async_trait]
    impl OrderApi for FakeApi {
        async fn list(&self) -> Result<Vec<Order>, DomainError> {
            Ok(self.orders.lock().unwrap().clone())
        }

        async fn update_status(
            &self,
            id: &str,
            status: &OrderStatus,
            notes: Option<&str>,
        ) -> Result<Order, DomainError> {
            let mut orders = self.orders.lock().unwrap();
            let slot = orders
                .iter_mut()
                .find(|o| o.id == id)
                .ok_or(DomainError::Api {
                    status: 404,
                    message: "order not found".into(),
                })?;
            slot.status = status.clone();
            slot.notes = notes.map(str::to_string);
            Ok(slot.clone())
        }

        async fn delete(&self, id: &str) -> Result<(), DomainError> {
            self.orders.lock().unwrap().retain(|o| o.id != id);
            Ok(())
        }
    }

    fn service(orders: Vec<Order>) -> OrderService {
        OrderService::new(Arc::new(FakeApi {
            orders: Mutex::new(orders),
        }))
    }

    #[tokio::test]
    async fn test_set_status_preserves_notes() {
        let service = service(vec![order("1", OrderStatus::Pending, Some("fragile"))]);
        service.refresh().await.unwrap();

        let updated = service.set_status("1", OrderStatus::Shipped).await.unwrap();

        assert_eq!(updated.status, OrderStatus::Shipped);
        assert_eq!(updated.notes.as_deref(), Some("fragile"));
    }

    #[tokio::test]
    async fn test_set_notes_preserves_status() {
        let service = service(vec![order("1", OrderStatus::Processing, None)]);
        service.refresh().await.unwrap();

        let updated = service.set_notes("1", "call first".into()).await.unwrap();

        assert_eq!(updated.status, OrderStatus::Processing);
        assert_eq!(updated.notes.as_deref(), Some("call first"));
        // Cached list patched in place.
        assert_eq!(service.list().await[0].notes.as_deref(), Some("call first"));
    }

    #[tokio::test]
    async fn test_delete_removes_from_cache() {
        let service = service(vec![
            order("1", OrderStatus::Pending, None),
            order("2", OrderStatus::Delivered, None),
        ]);
        service.refresh().await.unwrap();

        service.delete("1").await.unwrap();
        assert_eq!(service.count().await, 1);
        assert_eq!(service.list().await[0].id, "2");
    }

    #[tokio::test]
    async fn test_unknown_backend_status_survives_roundtrip() {
        let custom = OrderStatus::Other("on_hold".into());
        let service = service(vec![order("1", custom.clone(), None)]);
        service.refresh().await.unwrap();

        let updated = service.set_notes("1", "check stock".into()).await.unwrap();
        assert_eq!(updated.status, custom);
    }
}
