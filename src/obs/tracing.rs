// crates.io
use tracing::{Instrument, Span, instrument::Instrumented};
use tracing_subscriber::EnvFilter;
// self
use crate::{_prelude::*, error::ConfigError, obs::FlowKind};

/// Creates a span tagged with the provided flow kind + stage.
pub fn flow_span(kind: FlowKind, stage: &'static str) -> Span {
	tracing::info_span!("oauth2_roster.flow", flow = kind.as_str(), stage)
}

/// Instruments an async block without holding a span guard across `.await` points.
pub fn instrument_flow<Fut>(kind: FlowKind, stage: &'static str, fut: Fut) -> Instrumented<Fut>
where
	Fut: Future,
{
	fut.instrument(flow_span(kind, stage))
}

/// Installs the global `fmt` subscriber.
///
/// `RUST_LOG` takes precedence over `default_filter` when it is set.
pub fn init_tracing(default_filter: &str) -> Result<(), ConfigError> {
	let filter = match EnvFilter::try_from_default_env() {
		Ok(filter) => filter,
		Err(_) => EnvFilter::try_new(default_filter)
			.map_err(|e| ConfigError::invalid_value("log_filter", e.to_string()))?,
	};

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.try_init()
		.map_err(|e| ConfigError::TracingInit { reason: e.to_string() })
}
