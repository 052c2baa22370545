use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// Process-local credential store keyed by normalized email.
///
/// Enforces the same uniqueness contract as the Postgres table. Contents are
/// lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<EmailAddress, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> UserError {
        UserError::DatabaseError("user store lock poisoned".to_string())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.write().map_err(|_| Self::poisoned())?;

        if users.contains_key(&user.email) {
            return Err(UserError::Conflict(user.email.to_string()));
        }

        users.insert(user.email.clone(), user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let users = self.users.read().map_err(|_| Self::poisoned())?;

        Ok(users.values().find(|user| user.id == *id).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        let users = self.users.read().map_err(|_| Self::poisoned())?;

        Ok(users.get(email).cloned())
    }
}
