use super::NameKind;
use crate::location::SourceLocation;

/// A failure during execution, with the call stack at the throw site.
#[derive(thiserror::Error, Debug)]
#[error("Runtime error: {type}")]
pub struct RuntimeError {
	pub location:  SourceLocation,
	/// Live activations when the error was raised, innermost last.
	pub traceback: Vec<SourceLocation>,
	pub r#type:    RuntimeErrorType,
}

impl RuntimeError {
	pub fn new(location: SourceLocation, traceback: Vec<SourceLocation>, r#type: RuntimeErrorType) -> Self {
		Self { location, traceback, r#type }
	}
}

/// Errors that can occur during interpretation
#[derive(thiserror::Error, Debug)]
pub enum RuntimeErrorType {
	#[error("Undefined {kind}: {name}")]
	Undefined { name: String, kind: NameKind },
	#[error("Type error: {0}")]
	Type(String),
	#[error("Function '{name}' expects {expected} arguments, got {found}")]
	ArityMismatch { name: String, expected: usize, found: usize },
	/// A file operation failed, `path` is the path as the program gave it.
	#[error("Failed to {operation} file '{path}': {source}")]
	Io { operation: &'static str, path: String, source: std::io::Error },
	#[error("Maximum call depth of {0} exceeded")]
	CallDepthExceeded(usize),
	/// Reading console input failed
	#[error("Failed to read input: {0}")]
	Input(#[source] std::io::Error),
	/// Writing program output failed
	#[error("Failed to write output: {0}")]
	Output(#[source] std::io::Error),
}
