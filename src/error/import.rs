use crate::location::SourceLocation;

/// A `from ... import ...` that cannot be satisfied.
#[derive(thiserror::Error, Debug)]
#[error("Import error: {type}")]
pub struct ImportError {
	pub location: SourceLocation,
	pub r#type:   ImportErrorType,
}

impl ImportError {
	pub fn new(location: SourceLocation, r#type: ImportErrorType) -> Self { Self { location, r#type } }
}

#[derive(thiserror::Error, Debug)]
pub enum ImportErrorType {
	#[error("Cannot read '{path}': {source}")]
	NotFound { path: String, source: std::io::Error },
	#[error("Cyclic import of '{0}'")]
	Cycle(String),
	#[error("'{name}' is not a function in '{path}'")]
	MissingName { name: String, path: String },
}
