//! Admin login gate for the gallery.
//!
//! The credential list is a convenience gate for a static site, not a
//! security boundary. Swap [`CredentialVerifier`] for a real backend when
//! one exists.

pub mod credentials;
pub mod session;

pub use credentials::{CredentialVerifier, StaticCredentials};
pub use session::AdminSession;
