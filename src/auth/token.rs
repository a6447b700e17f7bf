//! Credential strings and the secrets used to produce them.

pub mod credential;
pub mod secret;
