//! OAuth 2.0 login that mints short-lived HS256 credentials, plus a small in-memory employee
//! roster served over axum.
//!
//! The pieces compose bottom-up:
//!
//! - [`issuer`] signs and verifies credentials for a [`issuer::SecurityContext`].
//! - [`provider`], [`oauth`], and [`login`] run the Authorization Code + PKCE handshake and
//!   resolve the user's profile.
//! - [`store`] keeps employee records behind a lock.
//! - [`server`] exposes all of it over HTTP; [`settings`] and [`obs`] wire the binary.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod error;
#[cfg(feature = "reqwest")] pub mod http;
pub mod issuer;
pub mod login;
#[cfg(feature = "reqwest")] pub mod oauth;
pub mod obs;
pub mod provider;
pub mod server;
pub mod settings;
pub mod store;

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};
