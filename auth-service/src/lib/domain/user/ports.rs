use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::user::models::AccessToken;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::PublicUser;
use crate::domain::user::models::SignupCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;

/// Port for authentication use cases.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new account.
    ///
    /// # Arguments
    /// * `command` - Raw email and plaintext password
    ///
    /// # Returns
    /// Sanitized view of the created user
    ///
    /// # Errors
    /// * `InvalidEmail` - Email empty or missing `@` after normalization
    /// * `WeakPassword` - Password shorter than the configured minimum
    /// * `Conflict` - Email is already registered
    /// * `Password` / `DatabaseError` - Infrastructure failure, propagated as is
    async fn signup(&self, command: SignupCommand) -> Result<PublicUser, UserError>;

    /// Exchange credentials for an access token.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email, wrong password or empty input
    /// * `Password` / `DatabaseError` / `Token` - Infrastructure failure
    async fn login(&self, command: LoginCommand) -> Result<AccessToken, UserError>;

    /// Validate a presented access token and return its subject.
    ///
    /// # Errors
    /// * `Token` - Malformed, forged or expired token
    async fn authenticate(&self, token: &str) -> Result<UserId, UserError>;

    /// Retrieve a user by identifier.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn get_user(&self, id: &UserId) -> Result<PublicUser, UserError>;
}

/// Persistence operations for credential records.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist new user to storage.
    ///
    /// # Arguments
    /// * `user` - User entity to create
    ///
    /// # Returns
    /// Created user entity
    ///
    /// # Errors
    /// * `Conflict` - Email is already registered (including lost races)
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: User) -> Result<User, UserError>;

    /// Retrieve user by identifier.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve user by normalized email address.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError>;
}

/// Source of the current instant.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;
}
