//! Identity-provider descriptors (data) and the [`IdentityProvider`] seam (behavior).
//!
//! `descriptor` exposes validated endpoint metadata (`ProviderDescriptor`) with HTTPS-only
//! endpoints outside loopback hosts. `identity` defines the trait the login broker drives to
//! start an Authorization Code + PKCE session and turn the returned code into a [`Principal`].

pub mod descriptor;
pub mod identity;
pub mod principal;

pub use descriptor::*;
pub use identity::*;
pub use principal::*;
