pub mod analyzer;
pub mod import;
pub mod interpreter;
pub mod parser;

use std::fmt::{Display, Write};

use crate::location::SourceLocation;

/// PgtError is the top-level error type for the PGT interpreter.
#[derive(thiserror::Error, Debug)]
pub enum PgtError {
	/// Failures outside the language itself, e.g. reading the source file
	#[error("Internal error: {0:#}")]
	InternalError(#[from] anyhow::Error),
	#[error(transparent)]
	SyntaxError(#[from] parser::SyntaxError),
	#[error(transparent)]
	SemanticError(#[from] analyzer::SemanticError),
	#[error(transparent)]
	RuntimeError(#[from] interpreter::RuntimeError),
	#[error(transparent)]
	ImportError(#[from] import::ImportError),
	/// The C compiler rejected generated code or could not be started
	#[error("Build error: {0}")]
	BuildError(String),
}

impl PgtError {
	pub fn location(&self) -> Option<&SourceLocation> {
		match self {
			PgtError::SyntaxError(e) => Some(&e.location),
			PgtError::SemanticError(e) => Some(&e.location),
			PgtError::RuntimeError(e) => Some(&e.location),
			PgtError::ImportError(e) => Some(&e.location),
			PgtError::InternalError(_) | PgtError::BuildError(_) => None,
		}
	}

	/// Call stack captured when a runtime error was raised, outermost first.
	pub fn traceback(&self) -> &[SourceLocation] {
		match self {
			PgtError::RuntimeError(e) => &e.traceback,
			_ => &[],
		}
	}

	/// Render the message, its location and the call chain.
	///
	/// ``` text
	/// Error: Runtime error: Undefined variable: y
	///   at main.pgt:7:12
	/// Traceback (most recent call last):
	///   1. main.pgt:3:1
	///   2. main.pgt:6:1
	/// ```
	pub fn report(&self) -> String {
		let mut report = format!("Error: {self}\n");
		if let Some(location) = self.location().filter(|location| location.is_known()) {
			let _ = writeln!(report, "  at {location}");
		}
		let traceback = self.traceback();
		if !traceback.is_empty() {
			report.push_str("Traceback (most recent call last):\n");
			for (index, location) in traceback.iter().enumerate() {
				let _ = writeln!(report, "  {}. {location}", index + 1);
			}
		}
		report
	}
}

/// What an undefined name was expected to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
	Variable,
	Function,
}

impl Display for NameKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			NameKind::Variable => write!(f, "variable"),
			NameKind::Function => write!(f, "function"),
		}
	}
}
