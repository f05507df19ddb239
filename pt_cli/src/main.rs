use std::io::IsTerminal;
use std::path::Path;
use std::process;

use clap::CommandFactory;
use clap::Parser;
use owo_colors::OwoColorize;
use pt_cli::PtCli;
use pt_core::FileIdentity;
use pt_core::ProcessOptions;
use pt_core::Processor;
use pt_core::PtConfig;
use pt_core::PtResult;
use pt_core::resolver::canonical_path;
use tokio::io::AsyncWrite;
use tokio::io::AsyncWriteExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

/// Environment variable holding the log filter, e.g. `PT_LOG=pt_core=trace`.
const LOG_ENV: &str = "PT_LOG";

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = PtCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	init_tracing(args.verbose, use_color);

	if args.input_path().is_none() && std::io::stdin().is_terminal() {
		eprintln!("{} No input source", colored!("error:", red));
		eprintln!();
		eprintln!("{}", PtCli::command().render_usage());
		eprintln!("Pass a file to process or pipe text to stdin. Run `pt --help` for details.");
		process::exit(1);
	}

	if let Err(e) = run(&args) {
		match e.downcast::<pt_core::PtError>() {
			Ok(pt_err) => {
				let report: miette::Report = (*pt_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

fn init_tracing(verbose: bool, use_color: bool) {
	let level = if verbose {
		LevelFilter::DEBUG
	} else {
		LevelFilter::WARN
	};
	let filter = EnvFilter::builder()
		.with_default_directive(level.into())
		.with_env_var(LOG_ENV)
		.from_env_lossy();

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.try_init()
		.ok();
}

fn run(args: &PtCli) -> Result<(), Box<dyn std::error::Error>> {
	let root = std::env::current_dir()?;
	let options = resolve_options(args, &root)?;
	let processor = Processor::new(options)?;

	let runtime = tokio::runtime::Builder::new_current_thread().build()?;
	runtime.block_on(process_input(args, &processor, &root))?;

	Ok(())
}

/// Layer the config file and command line flags over the defaults.
fn resolve_options(args: &PtCli, root: &Path) -> PtResult<ProcessOptions> {
	let config = match &args.config {
		Some(path) => Some(PtConfig::load_file(path)?),
		None => PtConfig::load(root)?,
	};

	let mut options = ProcessOptions::default();
	if let Some(config) = &config {
		tracing::debug!(?config, "loaded config");
		options = options.with_config(config);
	}

	if let Some(start) = &args.start {
		options.start.clone_from(start);
	}
	if let Some(end) = &args.end {
		options.end.clone_from(end);
	}
	if let Some(prefix) = &args.prefix {
		options.prefix.clone_from(prefix);
	}

	Ok(options)
}

async fn process_input(args: &PtCli, processor: &Processor, root: &Path) -> PtResult<()> {
	let mut sink: Box<dyn AsyncWrite + Unpin> = match &args.out {
		Some(path) => Box::new(tokio::fs::File::create(path).await?),
		None => Box::new(tokio::io::stdout()),
	};

	let result = match args.input_path() {
		Some(path) => processor.run_path(path, &mut sink).await,
		None => {
			let identity = FileIdentity::anonymous(canonical_path(root).await);
			processor
				.run(Box::pin(tokio::io::stdin()), identity, &mut sink)
				.await
		}
	};

	// Keep whatever was produced before a failure, but report the
	// processing error ahead of a failed flush.
	let flushed = sink.flush().await;
	result?;
	flushed?;

	Ok(())
}
