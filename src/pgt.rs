use std::{
	fs::{read_to_string, write},
	io::{self, BufRead, Write},
	path::{Path, PathBuf},
	process::Command,
	sync::Arc,
};

use anyhow::Context;
use tracing::debug;

use crate::{
	Config, PgtError,
	analyzer::Analyzer,
	codegen::CodeGen,
	import::ImportResolver,
	interpreter::Interpreter,
	parser::{Parser, check_structure},
	scanner::Scanner,
	statement::Program,
};

/// Pgt drives a source file through every phase.
#[derive(Debug, Clone, Default)]
pub struct Pgt {
	config: Config,
}

impl Pgt {
	pub fn new(config: Config) -> Self { Self { config } }

	pub fn config(&self) -> &Config { &self.config }

	/// Run the file at `path` against the process's stdin and stdout.
	pub fn run_file<P: AsRef<Path>>(&self, path: P) -> Result<(), PgtError> {
		self.run_with(path, io::stdin().lock(), io::stdout().lock()).map(drop)
	}

	/// Run the file at `path`, returning the output once the program finishes.
	pub fn run_with<P: AsRef<Path>, R: BufRead, W: Write>(&self, path: P, input: R, output: W) -> Result<W, PgtError> {
		let program = self.load(path.as_ref())?;
		self.execute(&program, input, output)
	}

	/// Run source text that has no file of its own. Imports resolve against the
	/// current directory.
	pub fn run_source<R: BufRead, W: Write>(&self, source: &str, input: R, output: W) -> Result<W, PgtError> {
		let program = self.prepare(source, None, Path::new(""))?;
		self.execute(&program, input, output)
	}

	/// Compile the file at `path` to a native executable, `output` defaults to
	/// the file name without its extension. Returns the executable's path.
	pub fn build_file<P: AsRef<Path>>(&self, path: P, output: Option<PathBuf>) -> Result<PathBuf, PgtError> {
		let path = path.as_ref();
		let program = self.load(path)?;
		let code = CodeGen::generate(&program);

		let binary = match output {
			Some(output) => output,
			None => PathBuf::from(path.file_stem().context("Source path has no file name")?),
		};
		let c_file = binary.with_extension("c");
		write(&c_file, code).with_context(|| format!("Failed write generated C to {}", c_file.display()))?;
		debug!(c_file = %c_file.display(), compiler = %self.config.c_compiler, "compiling");

		let compiled = Command::new(&self.config.c_compiler)
			.arg(&c_file)
			.arg("-o")
			.arg(&binary)
			.output()
			.map_err(|e| PgtError::BuildError(format!("failed to run '{}': {e}", self.config.c_compiler)))?;
		if !compiled.status.success() {
			return Err(PgtError::BuildError(format!(
				"'{}' exited with {}\n{}",
				self.config.c_compiler,
				compiled.status,
				String::from_utf8_lossy(&compiled.stderr).trim_end()
			)));
		}
		Ok(binary)
	}

	/// Read, parse, resolve imports and check the file at `path`.
	pub fn load(&self, path: &Path) -> Result<Program, PgtError> {
		let source =
			read_to_string(path).with_context(|| format!("Failed open source file {}", path.display()))?;
		let file: Arc<str> = path.display().to_string().into();
		self.prepare(&source, Some(file), path)
	}
}

impl Pgt {
	fn prepare(&self, source: &str, file: Option<Arc<str>>, path: &Path) -> Result<Program, PgtError> {
		let tokens = Scanner::new(source).scan_tokens();
		debug!(tokens = tokens.len(), "scanned");
		let program = Parser::new(tokens).with_file(file).parse()?;
		check_structure(&program)?;

		let program = ImportResolver::new().resolve(program, path)?;
		debug!(items = program.items.len(), "resolved imports");

		if self.config.check {
			Analyzer::new().analyze(&program)?;
		} else {
			debug!("semantic analysis skipped");
		}
		Ok(program)
	}

	fn execute<R: BufRead, W: Write>(&self, program: &Program, input: R, output: W) -> Result<W, PgtError> {
		let mut interpreter = Interpreter::new(input, output).with_max_call_depth(self.config.max_call_depth);
		interpreter.run(program)?;
		let mut output = interpreter.into_output();
		output.flush().context("Failed flush output")?;
		Ok(output)
	}
}
