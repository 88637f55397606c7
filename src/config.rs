/// Compiler used by `build` when `$CC` is not set.
pub const DEFAULT_C_COMPILER: &str = "cc";

/// Runtime switches for a single `run` or `build`.
#[derive(Debug, Clone)]
pub struct Config {
	/// Emit the debug trace.
	pub debug:          bool,
	/// Run the semantic analyzer before executing. Turned off by `run --unchecked`.
	pub check:          bool,
	/// Bound on nested calls, unbounded when `None`.
	pub max_call_depth: Option<usize>,
	pub c_compiler:     String,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			debug:          false,
			check:          true,
			max_call_depth: None,
			c_compiler:     std::env::var("CC").unwrap_or_else(|_| DEFAULT_C_COMPILER.to_string()),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_check_and_allow_unbounded_recursion() {
		let config = Config::default();
		assert!(config.check);
		assert!(!config.debug);
		assert_eq!(config.max_call_depth, None);
		assert!(!config.c_compiler.is_empty());
	}
}
