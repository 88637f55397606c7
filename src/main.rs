use std::process::ExitCode;

use palc::Parser;
use pgt::{Pgt, cli::*};
use tracing::Level;

fn main() -> ExitCode {
	let mode = Cli::parse().mode;
	let config = mode.config();

	tracing_subscriber::fmt()
		.with_writer(std::io::stderr)
		.with_max_level(if config.debug { Level::DEBUG } else { Level::WARN })
		.with_target(false)
		.init();

	let pgt = Pgt::new(config);
	let result = match mode {
		Mode::Run { path, .. } => pgt.run_file(&path),
		Mode::Build { path, output, .. } => pgt.build_file(&path, output).map(|binary| {
			println!("Built {}", binary.display());
		}),
		Mode::Help => {
			print!("{USAGE}");
			Ok(())
		}
		Mode::Version => {
			println!("{}", version());
			Ok(())
		}
	};

	match result {
		Ok(()) => ExitCode::SUCCESS,
		Err(e) => {
			eprint!("{}", e.report());
			ExitCode::FAILURE
		}
	}
}
