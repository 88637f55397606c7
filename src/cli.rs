use std::path::PathBuf;

use palc::{Parser, Subcommand};

use crate::Config;

pub const USAGE: &str = "\
Usage: pgt <COMMAND>

Commands:
  run <file> [--debug] [--unchecked]   Interpret a source file
  build <file> [-o <name>] [--debug]   Compile a source file to a native executable through C
  help                                 Print this message
  version                              Print the version
";

#[derive(Parser)]
#[command(name = "pgt", after_long_help = "Interpreter and C compiler for the PGT scripting language.")]
pub struct Cli {
	#[command(subcommand)]
	pub mode: Mode,
}

#[derive(Subcommand, Debug)]
pub enum Mode {
	/// Interpret a source file
	Run {
		path:      PathBuf,
		/// Trace definitions, writes, calls and imports on stderr
		#[arg(long)]
		debug:     bool,
		/// Skip semantic analysis
		#[arg(long)]
		unchecked: bool,
	},
	/// Compile a source file to a native executable through C
	Build {
		path:   PathBuf,
		/// Executable name, defaults to the source file name
		#[arg(short, long)]
		output: Option<PathBuf>,
		#[arg(long)]
		debug:  bool,
	},
	/// Print usage
	Help,
	/// Print the version
	Version,
}

impl Mode {
	pub fn config(&self) -> Config {
		let mut config = Config::default();
		match self {
			Mode::Run { debug, unchecked, .. } => {
				config.debug = *debug;
				config.check = !unchecked;
			}
			Mode::Build { debug, .. } => config.debug = *debug,
			Mode::Help | Mode::Version => {}
		}
		config
	}
}

pub fn version() -> String { format!("pgt {}", env!("CARGO_PKG_VERSION")) }
