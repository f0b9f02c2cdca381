//! Error type for `poisk-auth`.
//!
//! Variants exist for logging; the API boundary collapses all of them into
//! one uniform 401 so a caller cannot distinguish "unknown username" from
//! "wrong password" or "expired token" from "forged token".

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
  #[error("invalid credentials")]
  InvalidCredentials,

  #[error("token expired")]
  TokenExpired,

  #[error("invalid token")]
  TokenInvalid,
}
