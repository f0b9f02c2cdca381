//! The administrator roster.

/// One roster entry. The password is an argon2 PHC string
/// (`$argon2id$v=19$…`), never plaintext.
#[derive(Debug, Clone)]
pub struct AdminCredential {
  pub username:      String,
  pub password_hash: String,
}

/// Where administrator credentials come from.
///
/// The production implementation is a fixed list loaded from config;
/// swapping in a directory-backed store later only requires implementing
/// this trait.
pub trait CredentialStore: Send + Sync {
  fn find_by_username(&self, username: &str) -> Option<&AdminCredential>;
}

/// A fixed in-memory roster, loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct FixedRoster {
  admins: Vec<AdminCredential>,
}

impl FixedRoster {
  pub fn new(admins: Vec<AdminCredential>) -> Self {
    Self { admins }
  }
}

impl CredentialStore for FixedRoster {
  fn find_by_username(&self, username: &str) -> Option<&AdminCredential> {
    self.admins.iter().find(|a| a.username == username)
  }
}
