// JWT token issuance and verification service

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind as JwtErrorKind, Algorithm, DecodingKey, EncodingKey, Header,
    Validation,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Session tokens live six hours unless configured otherwise
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 6;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userID")]
    pub user_id: i32,
    pub exp: i64, // expiration timestamp
    pub iat: i64, // issued at timestamp
}

/// Token failure kinds
///
/// Callers outside this module see every verification failure as the same
/// `Unauthorized` response; the variants exist for logging and tests.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,

    #[error("invalid token signature")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("token is missing a required claim")]
    MissingClaim,

    #[error("token signing failed: {0}")]
    Signing(String),

    #[error("token service misconfigured: {0}")]
    Configuration(String),
}

/// A freshly signed token and the instant it stops being valid
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Token service for JWT operations
///
/// Keys are derived once from the configured secret and never change.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl_seconds", &self.ttl.num_seconds())
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// Create a TokenService from a signing secret and token lifetime
    pub fn new(secret: &str, ttl: Duration) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::Configuration("signing secret is empty".to_string()));
        }
        if ttl <= Duration::zero() {
            return Err(TokenError::Configuration("token lifetime must be positive".to_string()));
        }

        // Expiry is checked against an explicit clock in `verify_at`.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        })
    }

    /// Create a TokenService with the default six hour lifetime
    pub fn with_default_ttl(secret: &str) -> Result<Self, TokenError> {
        Self::new(secret, Duration::hours(DEFAULT_TOKEN_TTL_HOURS))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `user_id` valid from now until now + ttl
    pub fn issue(&self, user_id: i32) -> Result<IssuedToken, TokenError> {
        self.issue_at(user_id, Utc::now())
    }

    /// Issue a token as if the current time were `issued_at`
    pub fn issue_at(&self, user_id: i32, issued_at: DateTime<Utc>) -> Result<IssuedToken, TokenError> {
        let iat = issued_at.timestamp();
        let exp = iat + self.ttl.num_seconds();

        let claims = Claims { user_id, exp, iat };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        tracing::info!(user_id, "Issued session token");

        let expires_at = Utc
            .timestamp_opt(exp, 0)
            .single()
            .ok_or_else(|| TokenError::Signing(format!("expiry {} out of range", exp)))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Verify a token and return the user id it was issued for
    pub fn verify(&self, token: &str) -> Result<i32, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token against an explicit clock
    ///
    /// A token is rejected once `now` reaches its `exp` claim.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<i32, TokenError> {
        let claims = self.decode_claims(token)?;

        if now.timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(claims.user_id)
    }

    /// Decode and check the signature without applying the expiry rule
    pub fn decode_claims(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                JwtErrorKind::InvalidSignature => TokenError::InvalidSignature,
                JwtErrorKind::ExpiredSignature => TokenError::Expired,
                JwtErrorKind::MissingRequiredClaim(_) | JwtErrorKind::Json(_) => TokenError::MissingClaim,
                _ => TokenError::Malformed,
            })
    }
}
