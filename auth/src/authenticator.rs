use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::TokenCodec;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

const DECOY_PASSWORD: &str = "decoy-password";

/// Authentication coordinator combining password verification and token issuance.
///
/// Holds the signing secret, the token lifetime and the password work factor.
/// All of it is fixed at construction, so one instance can be shared by any
/// number of concurrent callers.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_codec: TokenCodec,
    token_ttl: Duration,
    decoy_hash: String,
}

/// Result of successful authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticationResult {
    /// Signed access token
    pub access_token: String,
}

/// Authentication operation errors.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for token signing
    /// * `token_ttl` - Lifetime of issued tokens
    ///
    /// # Returns
    /// Configured Authenticator instance using the default password cost
    ///
    /// # Errors
    /// * `HashingFailed` - The decoy hash could not be computed
    pub fn new(jwt_secret: &[u8], token_ttl: Duration) -> Result<Self, PasswordError> {
        Self::with_hasher(jwt_secret, token_ttl, PasswordHasher::new())
    }

    /// Create an authenticator with a specific password hasher.
    ///
    /// Hashes the decoy password up front so that `reject` costs one
    /// verification from the very first call.
    pub fn with_hasher(
        jwt_secret: &[u8],
        token_ttl: Duration,
        hasher: PasswordHasher,
    ) -> Result<Self, PasswordError> {
        let decoy_hash = hasher.hash(DECOY_PASSWORD)?;

        Ok(Self {
            password_hasher: hasher,
            token_codec: TokenCodec::new(jwt_secret),
            token_ttl,
            decoy_hash,
        })
    }

    /// Lifetime of tokens issued by this authenticator.
    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `EmptyPassword` - Password has zero length
    /// * `HashingFailed` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Check a password against a stored hash.
    ///
    /// # Returns
    /// True if the password matches
    ///
    /// # Errors
    /// * `VerificationFailed` - Stored hash is malformed
    pub fn verify_password(
        &self,
        password: &str,
        stored_hash: &str,
    ) -> Result<bool, PasswordError> {
        self.password_hasher.verify(password, stored_hash)
    }

    /// Verify credentials and generate an access token.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `subject` - Subject to place in the token
    /// * `now` - Issuance instant
    ///
    /// # Returns
    /// AuthenticationResult with access token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Password verification failed
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        subject: &str,
        now: DateTime<Utc>,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        // Verify password
        let is_valid = self.password_hasher.verify(password, stored_hash)?;

        if !is_valid {
            return Err(AuthenticationError::InvalidCredentials);
        }

        // Generate token
        Ok(self.issue_token(subject, now)?)
    }

    /// Burn the same work as a real verification, then reject.
    ///
    /// Used when no account exists for the presented identity so that the
    /// caller cannot tell that case apart from a wrong password by timing.
    /// Always returns `InvalidCredentials`.
    pub fn reject(&self, password: &str) -> AuthenticationError {
        let _ = self.password_hasher.verify(password, &self.decoy_hash);

        AuthenticationError::InvalidCredentials
    }

    /// Generate a token without password verification.
    ///
    /// # Errors
    /// * `InvalidClaims` - Empty subject or non-positive lifetime
    pub fn issue_token(
        &self,
        subject: &str,
        now: DateTime<Utc>,
    ) -> Result<AuthenticationResult, JwtError> {
        let access_token = self.token_codec.encode(subject, self.token_ttl, now)?;

        Ok(AuthenticationResult { access_token })
    }

    /// Validate and decode a token.
    ///
    /// # Errors
    /// * `MalformedToken`, `InvalidSignature`, `ExpiredToken`
    pub fn validate_token(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, JwtError> {
        self.token_codec.decode(token, now)
    }
}
