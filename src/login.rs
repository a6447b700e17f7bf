//! Login broker that pairs provider callbacks with the sessions that started them.

pub mod session;

pub use session::*;

// self
use crate::{
	_prelude::*,
	obs::{self, FlowKind, FlowOutcome},
	provider::{IdentityProvider, Principal},
};

/// How long a started login may wait for its callback.
pub const DEFAULT_SESSION_TTL: Duration = Duration::minutes(10);
/// Pending logins kept before the oldest are evicted.
pub const DEFAULT_MAX_PENDING: usize = 1_024;

/// Keeps pending [`AuthorizationSession`]s keyed by their `state` and completes them once.
pub struct LoginBroker {
	provider: Arc<dyn IdentityProvider>,
	pending: Mutex<HashMap<String, AuthorizationSession>>,
	session_ttl: Duration,
	max_pending: usize,
}
impl LoginBroker {
	/// Creates a broker that drives `provider` with the [`DEFAULT_SESSION_TTL`].
	pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
		Self {
			provider,
			pending: Mutex::default(),
			session_ttl: DEFAULT_SESSION_TTL,
			max_pending: DEFAULT_MAX_PENDING,
		}
	}

	/// Overrides how long pending sessions remain valid.
	pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
		self.session_ttl = ttl;

		self
	}

	/// Caps the number of pending logins; at least one is always kept.
	pub fn with_max_pending(mut self, max_pending: usize) -> Self {
		self.max_pending = max_pending.max(1);

		self
	}

	/// Provider driven by this broker.
	pub fn provider(&self) -> &dyn IdentityProvider {
		self.provider.as_ref()
	}

	/// Number of logins waiting for their callback.
	pub fn pending_len(&self) -> usize {
		self.pending.lock().len()
	}

	/// Starts a login and remembers its session until the callback arrives.
	///
	/// Once the pending map is full, the oldest session is evicted to make room.
	pub fn begin(&self) -> Result<AuthorizationSession> {
		let session = self.provider.start_session()?;
		let mut pending = self.pending.lock();

		prune_expired(&mut pending, OffsetDateTime::now_utc(), self.session_ttl);

		while pending.len() >= self.max_pending {
			let Some(oldest) = pending
				.iter()
				.min_by_key(|(_, session)| session.created_at)
				.map(|(state, _)| state.clone())
			else {
				break;
			};

			pending.remove(&oldest);
			tracing::debug!("pending login evicted");
		}

		pending.insert(session.state.clone(), session.clone());

		tracing::debug!(provider = %self.provider.descriptor().id, pending = pending.len(), "login started");

		Ok(session)
	}

	/// Consumes the session matching `state` and authenticates `code` against the provider.
	///
	/// Each state is accepted at most once; unknown or expired states yield
	/// [`Error::InvalidGrant`].
	pub async fn complete(&self, state: &str, code: &str) -> Result<Principal> {
		const KIND: FlowKind = FlowKind::Login;

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = obs::instrument_flow(KIND, "complete", async {
			let session = self.take_session(state, OffsetDateTime::now_utc())?;

			self.provider.authenticate(session, code.to_owned()).await
		})
		.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(e) => {
				tracing::warn!(error = %e, "login failed");
				obs::record_flow_outcome(KIND, FlowOutcome::Failure);
			},
		}

		result
	}

	/// Drops the session matching `state`, if any, after the provider reported a failure.
	pub fn abandon(&self, state: &str) -> bool {
		let removed = self.pending.lock().remove(state).is_some();

		if removed {
			obs::record_flow_outcome(FlowKind::Login, FlowOutcome::Failure);
		}

		removed
	}

	fn take_session(&self, state: &str, now: OffsetDateTime) -> Result<AuthorizationSession> {
		let mut pending = self.pending.lock();

		prune_expired(&mut pending, now, self.session_ttl);

		pending
			.remove(state)
			.ok_or_else(|| Error::InvalidGrant { reason: "Login state is unknown or expired".into() })
	}
}
impl Debug for LoginBroker {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("LoginBroker")
			.field("provider", &self.provider.descriptor().id)
			.field("pending", &self.pending_len())
			.field("session_ttl", &self.session_ttl)
			.field("max_pending", &self.max_pending)
			.finish()
	}
}

fn prune_expired(
	pending: &mut HashMap<String, AuthorizationSession>,
	now: OffsetDateTime,
	ttl: Duration,
) {
	pending.retain(|_, session| !session.is_expired_at(now, ttl));
}
