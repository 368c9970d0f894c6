//! Storefront user management: list, toggle active status, delete.

use crate::domain::{DomainError, ManagedUser};
use crate::ports::UserApi;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

pub struct UserService {
    api: Arc<dyn UserApi>,
    list: RwLock<Vec<ManagedUser>>,
}

impl UserService {
    pub fn new(api: Arc<dyn UserApi>) -> Self {
        Self {
            api,
            list: RwLock::new(Vec::new()),
        }
    }

    pub async fn refresh(&self) -> Result<(), DomainError> {
        let users = self.api.list().await?;
        info!(count = users.len(), "refreshed users");
        *self.list.write().await = users;
        Ok(())
    }

    pub async fn list(&self) -> Vec<ManagedUser> {
        self.list.read().await.clone()
    }

    /// Flip a user's active flag.
    pub async fn toggle_status(&self, id: &str) -> Result<ManagedUser, DomainError> {
        let target = {
            let list = self.list.read().await;
            list.iter()
                .find(|u| u.id == id)
                .map(|u| !u.is_active)
                .ok_or(DomainError::Input(format!("unknown user {id}")))?
        };
        let updated = self.api.update_status(id, target).await?;
        info!(id = %updated.id, is_active = updated.is_active, "user status updated");
        let mut list = self.list.write().await;
        if let Some(slot) = list.iter_mut().find(|u| u.id == updated.id) {
            *slot = updated.clone();
        }
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<(), DomainError> {
        self.api.delete(id).await?;
        info!(id, "user deleted");
        self.list.write().await.retain(|u| u.id != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn user(id: &str, active: bool) -> ManagedUser {
        ManagedUser {
            id: id.to_string(),
            name: "Grace".into(),
            email: format!("{id}@example.com"),
            is_active: active,
        }
    }

    struct FakeApi {
        users: Mutex<Vec<ManagedUser>>,
    }

    #[async_trait::async_trait]
    impl UserApi for FakeApi {
        async fn list(&self) -> Result<Vec<ManagedUser>, DomainError> {
            Ok(self.users.lock().unwrap().clone())
        }

        async fn update_status(
            &self,
            id: &str,
            is_active: bool,
        ) -> Result<ManagedUser, DomainError> {
            let mut users = self.users.lock().unwrap();
            let slot = users
                .iter_mut()
                .find(|u| u.id == id)
                .ok_or(DomainError::Api {
                    status: 404,
                    message: "user not found".into(),
                })?;
            slot.is_active = is_active;
            Ok(slot.clone())
        }

        async fn delete(&self, id: &str) -> Result<(), DomainError> {
            self.users.lock().unwrap().retain(|u| u.id != id);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_toggle_flips_active_flag() {
        let service = UserService::new(Arc::new(FakeApi {
            users: Mutex::new(vec![user("1", true)]),
        }));
        service.refresh().await.unwrap();

        let updated = service.toggle_status("1").await.unwrap();
        assert!(!updated.is_active);
        assert!(!service.list().await[0].is_active);

        let updated = service.toggle_status("1").await.unwrap();
        assert!(updated.is_active);
    }

    #[tokio::test]
    async fn test_delete_removes_user() {
        let service = UserService::new(Arc::new(FakeApi {
            users: Mutex::new(vec![user("1", true), user("2", false)]),
        }));
        service.refresh().await.unwrap();

        service.delete("2").await.unwrap();
        let list = service.list().await;
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, "1");
    }
}
