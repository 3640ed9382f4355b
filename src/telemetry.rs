//! # Telemetry
//!
//! Tracing setup and per-request correlation. The server middleware tags
//! every request with a trace id and stores it in task-local scope, so the
//! problem+json error responses can echo the id back to the client without
//! threading it through every call.

use std::sync::Once;

use log::LevelFilter;
use thiserror::Error;
use tokio::task_local;
use tracing_log::LogTracer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::{SubscriberInitExt, TryInitError},
};

use crate::config::AppConfig;

/// Correlation metadata for one in-flight request.
#[derive(Debug, Clone)]
pub struct TraceContext {
    pub trace_id: String,
}

task_local! {
    static REQUEST_TRACE: TraceContext;
}

#[derive(Debug, Error)]
pub enum TelemetryInitError {
    #[error("failed to install tracing subscriber: {0}")]
    Subscriber(#[from] TryInitError),
}

static INIT: Once = Once::new();

/// Installs the global subscriber once; later calls are no-ops. `log::`
/// records from dependencies are bridged into tracing, and the filter falls
/// back to the configured level when `RUST_LOG` is unset. Output is JSON
/// unless the profile asks for `pretty`.
pub fn init_tracing(config: &AppConfig) -> Result<(), TelemetryInitError> {
    let mut result = Ok(());
    INIT.call_once(|| {
        // A logger may already be registered (tests, embedding code); that
        // only costs us the log bridge, not tracing itself.
        let _ = LogTracer::builder()
            .with_max_level(LevelFilter::Trace)
            .init();

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
        let output = match config.log_format.as_str() {
            "pretty" => fmt::layer().pretty().boxed(),
            _ => fmt::layer().json().boxed(),
        };

        result = tracing_subscriber::registry()
            .with(filter)
            .with(output)
            .try_init()
            .map_err(TelemetryInitError::Subscriber);
    });
    result
}

/// Runs `future` with `context` available through task-local storage.
pub async fn with_trace_context<Fut, R>(context: TraceContext, future: Fut) -> R
where
    Fut: std::future::Future<Output = R>,
{
    REQUEST_TRACE.scope(context, future).await
}

/// The trace id of the current request, if the task runs inside one.
pub fn current_trace_id() -> Option<String> {
    REQUEST_TRACE.try_with(|ctx| ctx.trace_id.clone()).ok()
}
