//! Authentication gate for Poisk admin operations.
//!
//! Exchanges roster credentials for a short-lived signed token and
//! validates that token on protected operations. The roster is an
//! injectable [`CredentialStore`] so the fixed administrator list can be
//! swapped for a real identity provider without touching the token logic.

pub mod error;
pub mod gate;
pub mod roster;
pub mod token;

pub use error::AuthError;
pub use gate::AuthGate;
pub use roster::{AdminCredential, CredentialStore, FixedRoster};
pub use token::Claims;
