//! Auth-domain identifiers, scopes, claims, and credential models.

pub mod claims;
pub mod id;
pub mod scope;
pub mod token;

pub use claims::Claims;
pub use id::*;
pub use scope::*;
pub use token::{credential::*, secret::*};
