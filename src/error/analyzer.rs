use super::NameKind;
use crate::location::SourceLocation;

/// A static violation found before execution begins.
#[derive(thiserror::Error, Debug)]
#[error("Semantic error: {type}")]
pub struct SemanticError {
	pub location: SourceLocation,
	pub r#type:   SemanticErrorType,
}

impl SemanticError {
	pub fn new(location: SourceLocation, r#type: SemanticErrorType) -> Self { Self { location, r#type } }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SemanticErrorType {
	#[error("Undefined {kind}: {name}")]
	Undefined { name: String, kind: NameKind },
	#[error("Type error: {0}")]
	Type(String),
	#[error("Function '{0}' already declared")]
	DuplicateFunction(String),
	#[error("Function '{name}' expects {expected} arguments, got {found}")]
	ArityMismatch { name: String, expected: usize, found: usize },
}
