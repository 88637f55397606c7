use crate::location::SourceLocation;

/// A malformed token sequence or a missing structural marker. Fatal to the file.
#[derive(thiserror::Error, Debug)]
#[error("Syntax error: {type}")]
pub struct SyntaxError {
	pub location: SourceLocation,
	pub r#type:   SyntaxErrorType,
}

impl SyntaxError {
	pub fn new(location: SourceLocation, r#type: SyntaxErrorType) -> Self { Self { location, r#type } }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SyntaxErrorType {
	/// `what` describes the expected token and its context, e.g. `')' after print arguments`.
	Expected { what: String, found: String },
	/// An identifier used like `name::file`, usually a typo of a file operation.
	UnknownFileOperation(String),
	InvalidNumber(String),
	UnknownFormat(String),
	/// The cursor stopped advancing inside the named construct.
	Stalled(&'static str),
	MissingPackageMain,
	MissingReturnZero,
	MissingMain,
	MissingReturnOne,
}

impl std::fmt::Display for SyntaxErrorType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		use SyntaxErrorType::*;
		match self {
			Expected { what, found } => {
				write!(f, "Expected {what}, got '{found}'")
			}
			UnknownFileOperation(name) => {
				write!(f, "Unknown file operation '{name}'. Did you mean 'create', 'write', 'read', 'close' or 'delete'?")
			}
			InvalidNumber(text) => {
				write!(f, "Invalid number literal '{text}'")
			}
			UnknownFormat(tag) => {
				write!(f, "Unknown format '{tag}', expected '{{int}}', '{{float}}' or '{{string}}'")
			}
			Stalled(construct) => {
				write!(f, "Parser made no progress in {construct}")
			}
			MissingPackageMain => {
				write!(f, "Program must start with 'package main'")
			}
			MissingReturnZero => {
				write!(f, "Program must end with 'return 0'")
			}
			MissingMain => {
				write!(f, "Program has no 'main' function")
			}
			MissingReturnOne => {
				write!(f, "Function 'main' must contain 'return 1'")
			}
		}
	}
}
