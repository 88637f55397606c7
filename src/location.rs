use std::{fmt::Display, sync::Arc};

/// Where a token or AST node came from.
///
/// Every node that can fail at analysis or run time carries one, runtime
/// errors additionally keep a copy of the live call stack made of these.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceLocation {
	/// 1-indexed line.
	pub line:   usize,
	/// 1-indexed column, char offset within the line.
	pub column: usize,
	/// The source file, absent for in-memory sources.
	pub file:   Option<Arc<str>>,
}

impl SourceLocation {
	pub fn new(line: usize, column: usize, file: Option<Arc<str>>) -> Self { Self { line, column, file } }

	/// Whether the location points somewhere real.
	pub fn is_known(&self) -> bool { self.line > 0 }
}

impl Display for SourceLocation {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match &self.file {
			Some(file) => write!(f, "{file}:{}:{}", self.line, self.column),
			None => write!(f, "line {}, column {}", self.line, self.column),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn display_with_and_without_file() {
		assert_eq!(SourceLocation::new(3, 7, None).to_string(), "line 3, column 7");
		assert_eq!(SourceLocation::new(3, 7, Some("main.pgt".into())).to_string(), "main.pgt:3:7");
		assert!(!SourceLocation::default().is_known());
	}
}
