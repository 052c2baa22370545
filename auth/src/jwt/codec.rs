use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use hmac::Hmac;
use hmac::Mac;
use sha2::Sha256;

use super::claims::Claims;
use super::errors::JwtError;

type HmacSha256 = Hmac<Sha256>;

/// Encoded header segment, base64url of `{"alg":"HS256","typ":"JWT"}`.
///
/// Only ever emitted, never parsed: the algorithm is fixed and the header
/// takes part in verification solely as signed bytes.
pub const HEADER_SEGMENT: &str = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9";

/// Compact signed token codec (HS256).
///
/// Produces `<header>.<payload>.<signature>` where every segment is base64url
/// without padding and the signature is HMAC-SHA256 over `<header>.<payload>`.
pub struct TokenCodec {
    secret: Vec<u8>,
}

impl TokenCodec {
    /// Create a codec bound to a signing secret.
    ///
    /// # Arguments
    /// * `secret` - HMAC key; hosts enforce at least 32 bytes
    ///
    /// # Security Notes
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8]) -> Self {
        Self {
            secret: secret.to_vec(),
        }
    }

    /// Issue a token for `subject` valid from `now` for `ttl`.
    ///
    /// # Arguments
    /// * `subject` - Non-empty subject identifier
    /// * `ttl` - Token lifetime (whole seconds, strictly positive)
    /// * `now` - Issuance instant
    ///
    /// # Returns
    /// Compact token string
    ///
    /// # Errors
    /// * `InvalidClaims` - Empty subject or non-positive lifetime
    /// * `EncodingFailed` - Payload serialization or keying failed
    pub fn encode(
        &self,
        subject: &str,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<String, JwtError> {
        let claims = Claims::new(subject, ttl, now)?;
        let payload =
            serde_json::to_vec(&claims).map_err(|e| JwtError::EncodingFailed(e.to_string()))?;

        let mut token = String::with_capacity(HEADER_SEGMENT.len() + payload.len() * 2 + 48);
        token.push_str(HEADER_SEGMENT);
        token.push('.');
        URL_SAFE_NO_PAD.encode_string(&payload, &mut token);

        let signature = self.sign(&token)?;
        token.push('.');
        token.push_str(&signature);

        Ok(token)
    }

    /// Verify a token and return its claims.
    ///
    /// The signature is checked before the payload is decoded and before
    /// expiry is looked at.
    ///
    /// # Arguments
    /// * `token` - Compact token string
    /// * `now` - Instant the token is presented at
    ///
    /// # Errors
    /// * `MalformedToken` - Wrong segment layout, bad base64 or bad JSON payload
    /// * `InvalidSignature` - Signature does not match under this secret
    /// * `ExpiredToken` - `now` is at or past the `exp` claim
    pub fn decode(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, JwtError> {
        let mut segments = token.split('.');
        let (header, payload, signature) = match (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) {
            (Some(h), Some(p), Some(s), None)
                if !h.is_empty() && !p.is_empty() && !s.is_empty() =>
            {
                (h, p, s)
            }
            _ => return Err(JwtError::MalformedToken),
        };

        let signing_input = &token[..header.len() + 1 + payload.len()];
        self.verify(signing_input, signature)?;

        let payload = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| JwtError::MalformedToken)?;
        let claims: Claims =
            serde_json::from_slice(&payload).map_err(|_| JwtError::MalformedToken)?;

        if claims.is_expired(now.timestamp()) {
            return Err(JwtError::ExpiredToken);
        }

        Ok(claims)
    }

    fn keyed_mac(&self) -> Result<HmacSha256, hmac::digest::InvalidLength> {
        HmacSha256::new_from_slice(&self.secret)
    }

    fn sign(&self, signing_input: &str) -> Result<String, JwtError> {
        let mut mac = self
            .keyed_mac()
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))?;
        mac.update(signing_input.as_bytes());

        Ok(URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes()))
    }

    // `verify_slice` compares in constant time.
    fn verify(&self, signing_input: &str, signature: &str) -> Result<(), JwtError> {
        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| JwtError::InvalidSignature)?;

        let mut mac = self.keyed_mac().map_err(|_| JwtError::InvalidSignature)?;
        mac.update(signing_input.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| JwtError::InvalidSignature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"s3cr3t-key-at-least-32-bytes-long";

    fn at(seconds: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(seconds, 0).unwrap()
    }

    fn signed_token(codec: &TokenCodec, header: &str, payload_json: &str) -> String {
        let unsigned = format!("{}.{}", header, URL_SAFE_NO_PAD.encode(payload_json));
        let signature = codec.sign(&unsigned).unwrap();
        format!("{}.{}", unsigned, signature)
    }

    #[test]
    fn test_header_segment_matches_constant_json() {
        assert_eq!(
            HEADER_SEGMENT,
            URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#)
        );
    }

    #[test]
    fn test_encode_is_byte_exact() {
        let codec = TokenCodec::new(SECRET);

        let token = codec
            .encode("u1", Duration::seconds(900), at(1_700_000_000))
            .expect("Failed to encode token");

        assert_eq!(
            token,
            "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9\
             .eyJzdWIiOiJ1MSIsImlhdCI6MTcwMDAwMDAwMCwiZXhwIjoxNzAwMDAwOTAwfQ\
             .HiP2NYocww5bzjI0FUto049Yv3Ct_lOkh7UGaNt9MLs"
        );
    }

    #[test]
    fn test_encode_and_decode() {
        let codec = TokenCodec::new(SECRET);

        let token = codec
            .encode("u1", Duration::seconds(900), at(1_700_000_000))
            .expect("Failed to encode token");
        let claims = codec
            .decode(&token, at(1_700_000_500))
            .expect("Failed to decode token");

        assert_eq!(claims.sub, "u1");
        assert_eq!(claims.iat, 1_700_000_000);
        assert_eq!(claims.exp, 1_700_000_900);
    }

    #[test]
    fn test_decode_within_validity_window() {
        let codec = TokenCodec::new(SECRET);
        let token = codec
            .encode("user123", Duration::seconds(60), at(1_000))
            .unwrap();

        assert!(codec.decode(&token, at(1_000)).is_ok());
        assert!(codec.decode(&token, at(1_059)).is_ok());
        assert_eq!(codec.decode(&token, at(1_060)), Err(JwtError::ExpiredToken));
    }

    #[test]
    fn test_decode_expired_token() {
        let codec = TokenCodec::new(SECRET);
        let token = codec
            .encode("u1", Duration::seconds(900), at(1_700_000_000))
            .unwrap();

        let result = codec.decode(&token, at(1_700_001_000));
        assert_eq!(result, Err(JwtError::ExpiredToken));
    }

    #[test]
    fn test_encode_rejects_invalid_claims() {
        let codec = TokenCodec::new(SECRET);

        assert!(matches!(
            codec.encode("", Duration::seconds(900), at(0)),
            Err(JwtError::InvalidClaims(_))
        ));
        assert!(matches!(
            codec.encode("u1", Duration::zero(), at(0)),
            Err(JwtError::InvalidClaims(_))
        ));
    }

    #[test]
    fn test_decode_with_wrong_secret() {
        let codec1 = TokenCodec::new(b"secret1_at_least_32_bytes_long_key!");
        let codec2 = TokenCodec::new(b"secret2_at_least_32_bytes_long_key!");

        let token = codec1
            .encode("user123", Duration::minutes(15), at(1_700_000_000))
            .unwrap();

        let result = codec2.decode(&token, at(1_700_000_001));
        assert_eq!(result, Err(JwtError::InvalidSignature));
    }

    #[test]
    fn test_any_signature_bit_flip_is_rejected() {
        let codec = TokenCodec::new(SECRET);
        let token = codec
            .encode("u1", Duration::seconds(900), at(1_700_000_000))
            .unwrap();
        let (unsigned, signature) = token.rsplit_once('.').unwrap();
        let signature = URL_SAFE_NO_PAD.decode(signature).unwrap();

        for bit in 0..signature.len() * 8 {
            let mut tampered = signature.clone();
            tampered[bit / 8] ^= 1 << (bit % 8);
            let forged = format!("{}.{}", unsigned, URL_SAFE_NO_PAD.encode(&tampered));

            assert_eq!(
                codec.decode(&forged, at(1_700_000_001)),
                Err(JwtError::InvalidSignature),
                "bit {} flip accepted",
                bit
            );
        }
    }

    #[test]
    fn test_signature_checked_before_expiry() {
        let codec = TokenCodec::new(SECRET);
        let other = TokenCodec::new(b"another_secret_at_least_32_bytes_long");
        let forged = other
            .encode("u1", Duration::seconds(900), at(1_700_000_000))
            .unwrap();

        // Both forged-and-expired and forged-and-fresh fail on the signature
        assert_eq!(
            codec.decode(&forged, at(1_800_000_000)),
            Err(JwtError::InvalidSignature)
        );
        assert_eq!(
            codec.decode(&forged, at(1_700_000_001)),
            Err(JwtError::InvalidSignature)
        );
    }

    #[test]
    fn test_header_is_never_interpreted() {
        let codec = TokenCodec::new(SECRET);
        let token = codec
            .encode("u1", Duration::seconds(900), at(1_700_000_000))
            .unwrap();
        let mut parts: Vec<&str> = token.split('.').collect();
        let none_header = URL_SAFE_NO_PAD.encode(r#"{"alg":"none","typ":"JWT"}"#);
        parts[0] = &none_header;

        let result = codec.decode(&parts.join("."), at(1_700_000_001));
        assert_eq!(result, Err(JwtError::InvalidSignature));
    }

    #[test]
    fn test_decode_malformed_layout() {
        let codec = TokenCodec::new(SECRET);
        let now = at(1_700_000_001);

        for token in [
            "",
            "onlyone",
            "two.segments",
            "four.segments.are.toomany",
            ".payload.signature",
            "header..signature",
            "header.payload.",
        ] {
            assert_eq!(
                codec.decode(token, now),
                Err(JwtError::MalformedToken),
                "{:?} accepted",
                token
            );
        }
    }

    #[test]
    fn test_decode_signed_but_garbled_payload() {
        let codec = TokenCodec::new(SECRET);
        let now = at(1_700_000_001);

        let not_json = signed_token(&codec, HEADER_SEGMENT, "not json");
        assert_eq!(codec.decode(&not_json, now), Err(JwtError::MalformedToken));

        let missing_exp = signed_token(&codec, HEADER_SEGMENT, r#"{"sub":"u1","iat":1}"#);
        assert_eq!(
            codec.decode(&missing_exp, now),
            Err(JwtError::MalformedToken)
        );

        let bad_base64 = format!("{}.%%%", HEADER_SEGMENT);
        let signature = codec.sign(&bad_base64).unwrap();
        let token = format!("{}.{}", bad_base64, signature);
        assert_eq!(codec.decode(&token, now), Err(JwtError::MalformedToken));
    }

    #[test]
    fn test_decode_invalid_token() {
        let codec = TokenCodec::new(SECRET);

        let result = codec.decode("invalid.token.here", at(0));
        assert_eq!(result, Err(JwtError::InvalidSignature));
    }
}
