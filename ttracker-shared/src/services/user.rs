/// User service

use std::sync::Arc;

use super::ServiceResult;
use crate::models::CreateUser;
use crate::storage::UserStorage;

/// User provisioning
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStorage>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStorage>) -> Self {
        Self { store }
    }

    /// Creates a user
    ///
    /// Does not check for an existing user; see [`UserService::exists`].
    pub async fn create(&self, data: CreateUser) -> ServiceResult<()> {
        let cognito_id = data.cognito_id.clone();
        self.store.create_user(data).await?;
        tracing::info!(cognito_id = %cognito_id, "User provisioned");
        Ok(())
    }

    /// Checks whether a user exists for an external identity
    pub async fn exists(&self, cognito_id: &str) -> ServiceResult<bool> {
        Ok(self.store.user_exists(cognito_id).await?)
    }
}
