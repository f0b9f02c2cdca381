//! [`AuthGate`] — login and token verification over an injected roster.

use argon2::{Argon2, PasswordHash, PasswordVerifier};

use crate::{
  error::AuthError,
  roster::CredentialStore,
  token::{self, Claims, TOKEN_TTL_SECS},
};

/// The authentication gate: exchanges credentials for a signed token and
/// validates tokens on protected operations.
pub struct AuthGate {
  roster:         Box<dyn CredentialStore>,
  secret:         String,
  token_ttl_secs: i64,
}

impl AuthGate {
  pub fn new(roster: impl CredentialStore + 'static, secret: impl Into<String>) -> Self {
    Self {
      roster:         Box::new(roster),
      secret:         secret.into(),
      token_ttl_secs: TOKEN_TTL_SECS,
    }
  }

  /// Override the token lifetime; used by tests.
  pub fn with_token_ttl(mut self, ttl_secs: i64) -> Self {
    self.token_ttl_secs = ttl_secs;
    self
  }

  /// Check `password` against the roster entry for `username` and issue a
  /// token on success.
  ///
  /// Unknown username and wrong password both return
  /// [`AuthError::InvalidCredentials`] — the caller learns nothing about
  /// which usernames exist.
  pub fn login(&self, username: &str, password: &str) -> Result<String, AuthError> {
    let credential = self
      .roster
      .find_by_username(username)
      .ok_or(AuthError::InvalidCredentials)?;

    let parsed_hash = PasswordHash::new(&credential.password_hash)
      .map_err(|_| AuthError::InvalidCredentials)?;

    Argon2::default()
      .verify_password(password.as_bytes(), &parsed_hash)
      .map_err(|_| AuthError::InvalidCredentials)?;

    token::issue(username, &self.secret, self.token_ttl_secs)
  }

  /// Validate a token's signature and expiry and return its claims.
  pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
    token::verify(token, &self.secret)
  }
}
