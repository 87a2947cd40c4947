//! Arguments

// Imports
use {
	novasim::{AlgorithmKind, FitStrategy, PolicyKind},
	std::path::PathBuf,
};

/// Arguments
#[derive(Debug)]
#[derive(clap::Parser)]
pub struct Args {
	/// Log file
	///
	/// Specifies a file to perform verbose logging to.
	/// You can use `RUST_LOG_FILE` to set filtering options
	#[clap(long = "log-file")]
	pub log_file: Option<PathBuf>,

	/// Whether to append to the log file
	#[clap(long = "log-file-append")]
	pub log_file_append: bool,

	/// Sub-command
	#[clap(subcommand)]
	pub sub_cmd: SubCmd,
}

/// Sub-command
#[derive(Debug)]
#[derive(clap::Subcommand)]
pub enum SubCmd {
	/// Simulates CPU scheduling of a process roster
	Schedule(ScheduleArgs),

	/// Simulates page replacement over a reference string
	Replace(ReplaceArgs),

	/// Runs an allocation script against paged memory
	Paging(PagingArgs),

	/// Runs an allocation script against contiguous memory
	Contiguous(ContiguousArgs),
}

/// Schedule arguments
#[derive(Debug)]
#[derive(clap::Args)]
pub struct ScheduleArgs {
	/// Process roster file
	pub input_file: PathBuf,

	/// Scheduling policy
	#[clap(long = "policy", value_enum, default_value = "fcfs")]
	pub policy: PolicyKind,

	/// Time quantum, for round robin
	#[clap(long = "quantum", default_value_t = 2)]
	pub quantum: u64,

	/// Real time to wait between ticks (in milliseconds)
	#[clap(long = "tick-interval-ms", default_value_t = 0)]
	pub tick_interval_ms: u64,

	/// Output file
	#[clap(long = "output")]
	pub output_file: Option<PathBuf>,
}

/// Replace arguments
#[derive(Debug)]
#[derive(clap::Args)]
pub struct ReplaceArgs {
	/// Reference string, such as `7,0,1,2,0`
	#[clap(long = "references")]
	pub references: String,

	/// Number of frames
	#[clap(long = "frames")]
	pub frames: usize,

	/// Replacement algorithm
	#[clap(long = "algorithm", value_enum, default_value = "fifo")]
	pub algorithm: AlgorithmKind,

	/// Output file
	#[clap(long = "output")]
	pub output_file: Option<PathBuf>,
}

/// Paging arguments
#[derive(Debug)]
#[derive(clap::Args)]
pub struct PagingArgs {
	/// Config file
	pub config_file: PathBuf,

	/// Output file
	#[clap(long = "output")]
	pub output_file: Option<PathBuf>,
}

/// Contiguous arguments
#[derive(Debug)]
#[derive(clap::Args)]
pub struct ContiguousArgs {
	/// Config file
	pub config_file: PathBuf,

	/// Fit strategy
	#[clap(long = "strategy", value_enum, default_value = "first-fit")]
	pub strategy: FitStrategy,

	/// Output file
	#[clap(long = "output")]
	pub output_file: Option<PathBuf>,
}
