//! Logger

// Imports
use {
	std::{fs, io, path::Path, sync::Mutex},
	tracing_subscriber::{prelude::*, EnvFilter},
};

/// Default filter for stderr, when `RUST_LOG` isn't set
const DEFAULT_STDERR_FILTER: &str = "info";

/// Default filter for the log file, when `RUST_LOG_FILE` isn't set
const DEFAULT_FILE_FILTER: &str = "debug";

/// Initializes the logger.
///
/// Logs to stderr, filtered by `RUST_LOG`, and, if `log_file` is given,
/// additionally to that file, filtered by `RUST_LOG_FILE`.
///
/// Any messages logged with [`pre_init`] are replayed afterwards.
pub fn init(log_file: Option<&Path>, log_file_append: bool) {
	let stderr_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_STDERR_FILTER));
	let stderr_layer = tracing_subscriber::fmt::layer()
		.with_writer(io::stderr)
		.with_filter(stderr_filter);

	// Note: We can't log the error yet, so we keep it until the logger exists
	let (file_layer, file_err) = match log_file.map(|path| self::open_log_file(path, log_file_append)) {
		Some(Ok(file)) => {
			let file_filter =
				EnvFilter::try_from_env("RUST_LOG_FILE").unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILE_FILTER));
			let layer = tracing_subscriber::fmt::layer()
				.with_ansi(false)
				.with_writer(Mutex::new(file))
				.with_filter(file_filter);
			(Some(layer), None)
		},
		Some(Err(err)) => (None, Some(err)),
		None => (None, None),
	};

	if let Err(err) = tracing_subscriber::registry()
		.with(stderr_layer)
		.with(file_layer)
		.try_init()
	{
		eprintln!("Unable to initialize logger: {err}");
		return;
	}

	if let Some(err) = file_err {
		tracing::warn!(?log_file, %err, "Unable to open log file, logging only to stderr");
	}

	for msg in pre_init::take() {
		tracing::debug!("{msg}");
	}
}

/// Opens the log file
fn open_log_file(path: &Path, append: bool) -> Result<fs::File, io::Error> {
	fs::OpenOptions::new()
		.create(true)
		.write(true)
		.append(append)
		.truncate(!append)
		.open(path)
}

/// Logging before the logger is initialized
pub mod pre_init {
	// Imports
	use std::sync::Mutex;

	/// Messages waiting for the logger
	static PENDING: Mutex<Vec<String>> = Mutex::new(Vec::new());

	/// Queues a debug message to be logged once the logger is initialized
	pub fn debug(msg: impl Into<String>) {
		PENDING
			.lock()
			.unwrap_or_else(|poisoned| poisoned.into_inner())
			.push(msg.into());
	}

	/// Takes all pending messages
	pub(super) fn take() -> Vec<String> {
		std::mem::take(&mut *PENDING.lock().unwrap_or_else(|poisoned| poisoned.into_inner()))
	}
}
