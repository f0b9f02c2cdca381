//! HS256 JWT issuance and verification.

use chrono::Utc;
use jsonwebtoken::{
  Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Tokens are valid for two hours from issuance.
pub const TOKEN_TTL_SECS: i64 = 2 * 60 * 60;

/// Claims embedded in every admin token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
  /// Subject — the administrator's username.
  pub sub: String,
  /// Issued-at (Unix timestamp).
  pub iat: i64,
  /// Expiration (Unix timestamp).
  pub exp: i64,
}

/// Issue a signed token for `username`, expiring `ttl_secs` from now.
pub fn issue(username: &str, secret: &str, ttl_secs: i64) -> Result<String, AuthError> {
  let now = Utc::now().timestamp();
  let claims = Claims {
    sub: username.to_string(),
    iat: now,
    exp: now + ttl_secs,
  };

  jsonwebtoken::encode(
    &Header::new(Algorithm::HS256),
    &claims,
    &EncodingKey::from_secret(secret.as_bytes()),
  )
  .map_err(|_| AuthError::TokenInvalid)
}

/// Decode and verify a token's signature and expiry.
pub fn verify(token: &str, secret: &str) -> Result<Claims, AuthError> {
  let mut validation = Validation::new(Algorithm::HS256);
  validation.leeway = 0;
  validation.set_required_spec_claims(&["sub", "exp", "iat"]);

  jsonwebtoken::decode::<Claims>(
    token,
    &DecodingKey::from_secret(secret.as_bytes()),
    &validation,
  )
  .map(|data| data.claims)
  .map_err(|e| match e.kind() {
    jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
    _ => AuthError::TokenInvalid,
  })
}
