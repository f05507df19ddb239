use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Import and export fragments between text documents while streaming them.",
	long_about = "pt scans its input for directives wrapped in delimiters (`<!--` and `-->` by \
	              default) and replaces each one with computed content while the input is \
	              read.\n\nDirectives:\n  pt:import <file>         Insert the processed file\n  \
	              pt:import <file> <name>  Insert an export of the file\n  pt:export <name>         \
	              Capture text until `end`\n  pt:end                   Close the capture\n\nA \
	              `package:path` reference resolves `path` inside `node_modules/package`. \
	              Without an input file pt reads from stdin."
)]
pub struct PtCli {
	/// File to process. Reads from stdin when omitted.
	#[arg(value_name = "INPUT")]
	pub input: Option<PathBuf>,

	/// File to process. Takes precedence over the positional argument.
	#[arg(long = "in", short = 'i', value_name = "INPUT")]
	pub input_flag: Option<PathBuf>,

	/// Write the result to this file instead of stdout.
	#[arg(long, short, value_name = "OUTPUT")]
	pub out: Option<PathBuf>,

	/// Delimiter opening a directive region.
	#[arg(long, value_name = "DELIMITER")]
	pub start: Option<String>,

	/// Delimiter closing a directive region.
	#[arg(long, value_name = "DELIMITER")]
	pub end: Option<String>,

	/// Text a directive must begin with. Pass an empty string to treat every
	/// delimited region as a directive.
	#[arg(long)]
	pub prefix: Option<String>,

	/// Path to a config file. Defaults to `pt.toml`, `.pt.toml` or
	/// `.config/pt.toml` in the current directory.
	#[arg(long, value_name = "FILE")]
	pub config: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, default_value_t = false)]
	pub no_color: bool,
}

impl PtCli {
	/// The input file given with `--in`, or else positionally.
	pub fn input_path(&self) -> Option<&PathBuf> {
		self.input_flag.as_ref().or(self.input.as_ref())
	}
}
