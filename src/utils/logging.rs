//! Logging setup.
//!
//! Installs a global `tracing` subscriber with a compact formatter. The filter comes from
//! `RUST_LOG` and otherwise defaults to `info` with HTTP client internals kept at `warn`.
//! Events emitted through the `log` facade are captured by the same subscriber.

use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

const DEFAULT_FILTER: &str = "info,hyper=warn,hyper_util=warn,reqwest=warn";

type SetupResult = Result<(), Box<dyn std::error::Error + Send + Sync + 'static>>;

/// Logs to stdout
pub fn setup_logging() -> SetupResult {
	setup_logging_with_writer(std::io::stdout, true)
}

/// Logs to a custom writer, e.g. a file or a test buffer
pub fn setup_logging_with_writer<W>(writer: W, ansi: bool) -> SetupResult
where
	W: for<'writer> fmt::MakeWriter<'writer> + Send + Sync + 'static,
{
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

	tracing_subscriber::registry()
		.with(filter)
		.with(
			fmt::layer()
				.with_writer(writer)
				.event_format(
					fmt::format()
						.with_level(true)
						.with_target(true)
						.with_thread_ids(false)
						.with_thread_names(false)
						.with_ansi(ansi)
						.compact(),
				),
		)
		.try_init()?;
	Ok(())
}
