//! Identity and session handling.
//!
//! - `identity.rs`: account creation and credential verification
//! - `session.rs`: encrypted session cookie plus the `CurrentUser`
//!   request guard

pub mod identity;
pub mod session;

pub use identity::{IdentityGateway, RegisterOutcome};
pub use session::CurrentUser;
