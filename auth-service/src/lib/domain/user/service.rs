use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use auth::JwtError;

use crate::domain::user::models::AccessToken;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::PublicUser;
use crate::domain::user::models::SignupCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::EmailError;
use crate::user::errors::UserError;
use crate::user::ports::AuthServicePort;
use crate::user::ports::Clock;
use crate::user::ports::UserRepository;

/// Minimum password length when none is configured.
pub const DEFAULT_PASSWORD_MIN_LENGTH: usize = 6;

/// Domain service implementing signup and login.
///
/// Concrete implementation of AuthServicePort with dependency injection.
/// Holds no mutable state; password work is moved off the async executor.
pub struct AuthService<UR, C>
where
    UR: UserRepository,
    C: Clock,
{
    repository: Arc<UR>,
    clock: Arc<C>,
    authenticator: Arc<Authenticator>,
    password_min_length: usize,
}

impl<UR, C> AuthService<UR, C>
where
    UR: UserRepository,
    C: Clock,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Credential store implementation
    /// * `clock` - Time source for timestamps and token validity
    /// * `authenticator` - Password hashing and token signing
    /// * `password_min_length` - Minimum accepted password length at signup
    ///
    /// # Returns
    /// Configured auth service instance
    pub fn new(
        repository: Arc<UR>,
        clock: Arc<C>,
        authenticator: Arc<Authenticator>,
        password_min_length: usize,
    ) -> Self {
        Self {
            repository,
            clock,
            authenticator,
            password_min_length,
        }
    }

    async fn hash_password(&self, password: String) -> Result<String, UserError> {
        let authenticator = Arc::clone(&self.authenticator);

        tokio::task::spawn_blocking(move || authenticator.hash_password(&password))
            .await
            .map_err(|e| UserError::Unknown(format!("Password hashing task failed: {}", e)))?
            .map_err(UserError::from)
    }

    async fn verify_and_issue(
        &self,
        user: User,
        password: String,
    ) -> Result<AccessToken, UserError> {
        let authenticator = Arc::clone(&self.authenticator);
        let subject = user.id.to_string();
        let now = self.clock.now();

        let result = tokio::task::spawn_blocking(move || {
            authenticator.authenticate(&password, &user.password_hash, &subject, now)
        })
        .await
        .map_err(|e| UserError::Unknown(format!("Password verification task failed: {}", e)))??;

        Ok(AccessToken {
            token: result.access_token,
            expires_in: self.authenticator.token_ttl().num_seconds(),
        })
    }

    async fn reject(&self, password: String) -> UserError {
        let authenticator = Arc::clone(&self.authenticator);

        match tokio::task::spawn_blocking(move || authenticator.reject(&password)).await {
            Ok(err) => err.into(),
            Err(e) => UserError::Unknown(format!("Password verification task failed: {}", e)),
        }
    }
}

#[async_trait]
impl<UR, C> AuthServicePort for AuthService<UR, C>
where
    UR: UserRepository,
    C: Clock,
{
    async fn signup(&self, command: SignupCommand) -> Result<PublicUser, UserError> {
        let email = EmailAddress::new(&command.email)?;

        if command.password.chars().count() < self.password_min_length {
            return Err(UserError::WeakPassword {
                min: self.password_min_length,
            });
        }

        if self.repository.find_by_email(&email).await?.is_some() {
            return Err(UserError::Conflict(email.to_string()));
        }

        let password_hash = self.hash_password(command.password).await?;

        let now = self.clock.now();
        let user = User {
            id: UserId::new(),
            email,
            password_hash,
            created_at: now,
            updated_at: now,
        };

        let created_user = self.repository.create(user).await?;
        tracing::info!(user_id = %created_user.id, "User registered");

        Ok(created_user.into())
    }

    async fn login(&self, command: LoginCommand) -> Result<AccessToken, UserError> {
        let email = EmailAddress::new(&command.email);
        if command.password.is_empty() || email == Err(EmailError::Empty) {
            return Err(UserError::InvalidCredentials);
        }

        // An address without '@' cannot be registered, so treat it as unknown
        let user = match email {
            Ok(email) => self.repository.find_by_email(&email).await?,
            Err(_) => None,
        };

        let Some(user) = user else {
            tracing::debug!("Login rejected: unknown account");
            return Err(self.reject(command.password).await);
        };

        let user_id = user.id;
        self.verify_and_issue(user, command.password)
            .await
            .inspect(|_| tracing::info!(user_id = %user_id, "User logged in"))
            .inspect_err(|e| {
                if *e == UserError::InvalidCredentials {
                    tracing::debug!(user_id = %user_id, "Login rejected: wrong password");
                }
            })
    }

    async fn authenticate(&self, token: &str) -> Result<UserId, UserError> {
        let claims = self
            .authenticator
            .validate_token(token, self.clock.now())?;

        UserId::from_string(&claims.sub).map_err(|_| UserError::Token(JwtError::MalformedToken))
    }

    async fn get_user(&self, id: &UserId) -> Result<PublicUser, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .map(PublicUser::from)
            .ok_or(UserError::NotFound(id.to_string()))
    }
}
