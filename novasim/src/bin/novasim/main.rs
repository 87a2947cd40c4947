//! NovaOS simulator (`novasim`)

// Modules
mod args;
mod config;

// Imports
use {
	self::{
		args::{Args, ContiguousArgs, PagingArgs, ReplaceArgs, ScheduleArgs, SubCmd},
		config::{ContiguousConfig, Layout, PagingConfig, Request, ScheduleConfig},
	},
	anyhow::Context,
	clap::Parser,
	itertools::Itertools,
	novasim::{
		data::{self, ContiguousData, PagingData, RequestData},
		replacement,
		AllocationError,
		BlockList,
		FixedPartitions,
		PagedMemory,
		Policy,
		Simulation,
		Simulator,
	},
	novasim_util::logger,
	std::{fs, io, path::Path, time::Duration},
};

fn main() -> Result<(), anyhow::Error> {
	// Get arguments
	let args = Args::parse();
	logger::pre_init::debug(format!("Args: {args:?}"));

	// Initialize logging
	logger::init(args.log_file.as_deref(), args.log_file_append);

	match args.sub_cmd {
		SubCmd::Schedule(cmd_args) => self::schedule(cmd_args),
		SubCmd::Replace(cmd_args) => self::replace(cmd_args),
		SubCmd::Paging(cmd_args) => self::paging(cmd_args),
		SubCmd::Contiguous(cmd_args) => self::contiguous(cmd_args),
	}
}

/// Runs the `schedule` sub-command
fn schedule(args: ScheduleArgs) -> Result<(), anyhow::Error> {
	let config = self::read_config::<ScheduleConfig>(&args.input_file)?;
	tracing::debug!(processes = config.processes.len(), "Read process roster");

	let policy = args.policy.build(args.quantum).context("Invalid policy")?;
	let mut simulation = Simulation::new(&config.processes, policy).context("Unable to create simulation")?;

	let debug_output_period =
		Duration::try_from_secs_f64(config.debug_output_period_secs).context("Invalid debug output period")?;
	let mut sim = Simulator::new(Duration::from_millis(args.tick_interval_ms), debug_output_period);
	let output = sim.run(&mut simulation);

	let policy_name = simulation.policy().name();
	tracing::info!(
		policy = policy_name,
		avg_waiting_time = output.metrics.avg_waiting_time,
		avg_turnaround_time = output.metrics.avg_turnaround_time,
		throughput = output.metrics.throughput,
		"Finished simulation"
	);

	self::write_output(args.output_file.as_deref(), &data::ScheduleData::new(policy_name, &output))
}

/// Runs the `replace` sub-command
fn replace(args: ReplaceArgs) -> Result<(), anyhow::Error> {
	let references =
		replacement::parse_reference_string(&args.references).context("Unable to parse reference string")?;
	let report = args
		.algorithm
		.simulate(args.frames, &references)
		.context("Unable to simulate page replacement")?;

	for step in &report.steps {
		tracing::debug!(
			"#{} {} {:?}: [{}]",
			step.step,
			step.page,
			step.result,
			step.frames.iter().join(", ")
		);
	}
	tracing::info!(
		policy = report.policy,
		hit_ratio = report.statistics.hit_ratio,
		miss_ratio = report.statistics.miss_ratio,
		"Finished simulation"
	);

	self::write_output(args.output_file.as_deref(), &report)
}

/// Runs the `paging` sub-command
fn paging(args: PagingArgs) -> Result<(), anyhow::Error> {
	let config = self::read_config::<PagingConfig>(&args.config_file)?;
	let mut memory = PagedMemory::new(config.total_memory, config.page_size).context("Invalid paged memory")?;

	let steps = config
		.requests
		.into_iter()
		.map(|request| {
			let res = match request {
				Request::Allocate { process_id, size } => memory.allocate(process_id, size).map(|_| ()),
				Request::Deallocate { process_id } => memory.deallocate(process_id).map(|_| ()),
			};
			let error = res.err().map(|err| {
				tracing::warn!(?request, "Request rejected: {err}");
				err.to_string()
			});

			RequestData {
				request,
				error,
				memory: PagingData::from(&memory),
			}
		})
		.collect::<Vec<_>>();

	self::write_output(args.output_file.as_deref(), &steps)
}

/// Runs the `contiguous` sub-command
fn contiguous(args: ContiguousArgs) -> Result<(), anyhow::Error> {
	let config = self::read_config::<ContiguousConfig>(&args.config_file)?;
	let strategy = args.strategy;

	let steps = match config.layout {
		Layout::Variable { total_memory } => self::run_requests(
			&config.requests,
			BlockList::new(total_memory).context("Invalid memory")?,
			|blocks, request| match request {
				Request::Allocate { process_id, size } => blocks.allocate(strategy, size, process_id),
				Request::Deallocate { process_id } => Ok(blocks.deallocate(process_id)),
			},
		),
		Layout::Fixed { partitions } => self::run_requests(
			&config.requests,
			FixedPartitions::new(partitions).context("Invalid partitions")?,
			|partitions, request| match request {
				Request::Allocate { process_id, size } => partitions.allocate(strategy, size, process_id),
				Request::Deallocate { process_id } => partitions.deallocate(process_id),
			},
		),
	};

	self::write_output(args.output_file.as_deref(), &steps)
}

/// Applies all `requests` in order, starting from `memory`.
///
/// Rejected requests leave memory as it was.
fn run_requests<M>(
	requests: &[Request],
	mut memory: M,
	mut apply: impl FnMut(&M, Request) -> Result<M, AllocationError>,
) -> Vec<RequestData<Request, ContiguousData>>
where
	for<'a> ContiguousData: From<&'a M>,
{
	requests
		.iter()
		.map(|&request| {
			let error = match apply(&memory, request) {
				Ok(next) => {
					memory = next;
					None
				},
				Err(err) => {
					tracing::warn!(?request, capacity_exhausted = err.is_capacity_exhausted(), "Request rejected: {err}");
					Some(err.to_string())
				},
			};

			RequestData {
				request,
				error,
				memory: ContiguousData::from(&memory),
			}
		})
		.collect()
}

/// Reads and parses a json config file
fn read_config<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, anyhow::Error> {
	let file = fs::File::open(path).with_context(|| format!("Unable to open config file {path:?}"))?;
	serde_json::from_reader(io::BufReader::new(file)).with_context(|| format!("Unable to parse config file {path:?}"))
}

/// Writes `data` as json to `output_path`, or to stdout if none
fn write_output<T: serde::Serialize>(output_path: Option<&Path>, data: &T) -> Result<(), anyhow::Error> {
	match output_path {
		Some(output_path) => {
			let output_file = fs::File::create(output_path).context("Unable to create output file")?;
			serde_json::to_writer(output_file, data).context("Unable to write to output file")?;
		},
		None => serde_json::to_writer_pretty(io::stdout().lock(), data).context("Unable to write to stdout")?,
	}

	Ok(())
}
