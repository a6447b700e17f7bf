//! HTTP surface: the login callback and the employee CRUD routes.
//!
//! | Route | Handler |
//! | --- | --- |
//! | `GET /api/v1/auth/login` | 303 redirect to the provider's authorize URL |
//! | `GET /api/v1/auth/success` | provider callback; returns `{message, jwt, user}` |
//! | `POST /api/v1/auth/verify` | checks a credential and reports its subject and claims |
//! | `GET, POST /api/v1/employees` | list / create |
//! | `GET, PUT, DELETE /api/v1/employees/{id}` | fetch / replace / remove |
//!
//! Employee routes require `Authorization: Bearer <credential>` unless protection is disabled.

mod auth;
mod employees;
mod error;
mod guard;

pub use error::ApiError;

// crates.io
use axum::{
	Router, middleware,
	routing::{get, post},
};
use tokio::net::TcpListener;
// self
use crate::{
	_prelude::*,
	error::TransportError,
	issuer::TokenIssuer,
	login::LoginBroker,
	store::EmployeeStore,
};

/// Shared handles injected into every handler.
#[derive(Clone)]
pub struct AppState {
	issuer: Arc<TokenIssuer>,
	store: Arc<dyn EmployeeStore>,
	login: Arc<LoginBroker>,
	protect_employees: bool,
}
impl AppState {
	/// Bundles the service components; employee routes start out protected.
	pub fn new(
		issuer: Arc<TokenIssuer>,
		store: Arc<dyn EmployeeStore>,
		login: Arc<LoginBroker>,
	) -> Self {
		Self { issuer, store, login, protect_employees: true }
	}

	/// Toggles the bearer requirement on the employee routes.
	pub fn protect_employees(mut self, enabled: bool) -> Self {
		self.protect_employees = enabled;

		self
	}
}
impl Debug for AppState {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AppState")
			.field("issuer", &self.issuer)
			.field("login", &self.login)
			.field("protect_employees", &self.protect_employees)
			.finish_non_exhaustive()
	}
}

/// Builds the service router.
pub fn router(state: AppState) -> Router {
	let employees = Router::new()
		.route("/api/v1/employees", get(employees::list).post(employees::create))
		.route(
			"/api/v1/employees/{id}",
			get(employees::fetch).put(employees::update).delete(employees::remove),
		)
		.route_layer(middleware::from_fn_with_state(state.clone(), guard::require_bearer));

	Router::new()
		.route("/api/v1/auth/login", get(auth::login))
		.route("/api/v1/auth/success", get(auth::success))
		.route("/api/v1/auth/verify", post(auth::verify))
		.merge(employees)
		.with_state(state)
}

/// Serves [`router`] on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<()>
where
	F: 'static + Future<Output = ()> + Send,
{
	if let Ok(addr) = listener.local_addr() {
		tracing::info!(%addr, "listening");
	}

	axum::serve(listener, router(state))
		.with_graceful_shutdown(shutdown)
		.await
		.map_err(|e| TransportError::Io(e).into())
}
