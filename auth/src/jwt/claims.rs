use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::errors::JwtError;

/// Claims carried inside an access token.
///
/// Field order is the wire order of the payload: `sub`, `iat`, `exp`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user identifier)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Build claims for a subject valid for `ttl` starting at `now`.
    ///
    /// # Arguments
    /// * `subject` - Non-empty subject identifier
    /// * `ttl` - Token lifetime, at least one whole second
    /// * `now` - Issuance instant
    ///
    /// # Errors
    /// * `InvalidClaims` - Empty subject or non-positive lifetime
    pub fn new(
        subject: impl Into<String>,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<Self, JwtError> {
        let sub = subject.into();
        if sub.is_empty() {
            return Err(JwtError::InvalidClaims("empty subject".to_string()));
        }

        let ttl_seconds = ttl.num_seconds();
        if ttl_seconds <= 0 {
            return Err(JwtError::InvalidClaims("invalid ttl".to_string()));
        }

        let iat = now.timestamp();
        let exp = iat
            .checked_add(ttl_seconds)
            .ok_or_else(|| JwtError::InvalidClaims("ttl overflows timestamp".to_string()))?;

        Ok(Self { sub, iat, exp })
    }

    /// Check if token is expired.
    ///
    /// A token stops being valid at the second named by `exp`.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        // Inclusive on purpose: a token presented at exactly `exp` is already expired
        current_timestamp >= self.exp
    }

    /// Expiration as a UTC instant.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(seconds: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(seconds, 0).unwrap()
    }

    #[test]
    fn test_new_claims() {
        let claims = Claims::new("user123", Duration::minutes(15), at(1_700_000_000)).unwrap();

        assert_eq!(claims.sub, "user123");
        assert_eq!(claims.iat, 1_700_000_000);
        assert_eq!(claims.exp, 1_700_000_900);
    }

    #[test]
    fn test_new_claims_rejects_empty_subject() {
        let result = Claims::new("", Duration::minutes(15), at(1_700_000_000));
        assert!(matches!(result, Err(JwtError::InvalidClaims(_))));
    }

    #[test]
    fn test_new_claims_rejects_non_positive_ttl() {
        let now = at(1_700_000_000);

        assert!(matches!(
            Claims::new("user123", Duration::zero(), now),
            Err(JwtError::InvalidClaims(_))
        ));
        assert!(matches!(
            Claims::new("user123", Duration::seconds(-5), now),
            Err(JwtError::InvalidClaims(_))
        ));
        // Sub-second lifetimes would yield exp == iat
        assert!(matches!(
            Claims::new("user123", Duration::milliseconds(500), now),
            Err(JwtError::InvalidClaims(_))
        ));
    }

    #[test]
    fn test_is_expired() {
        let claims = Claims {
            sub: "user123".to_string(),
            iat: 900,
            exp: 1000,
        };

        assert!(!claims.is_expired(999)); // Not expired
        assert!(claims.is_expired(1000)); // Exactly at expiration
        assert!(claims.is_expired(1001)); // Expired
    }

    #[test]
    fn test_payload_field_order() {
        let claims = Claims::new("u1", Duration::seconds(900), at(1_700_000_000)).unwrap();
        let json = serde_json::to_string(&claims).unwrap();

        assert_eq!(json, r#"{"sub":"u1","iat":1700000000,"exp":1700000900}"#);
    }
}
