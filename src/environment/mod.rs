use std::collections::HashMap;

use crate::interpreter::value::Value;

/// A flat name → value table. The interpreter keeps one for globals and
/// one per function activation.
#[derive(Default, Debug, Clone)]
pub struct Environment {
	variables: HashMap<String, Value>,
}

impl Environment {
	pub fn new() -> Self { Self { variables: HashMap::new() } }

	/// Bind `name`, replacing any previous value.
	pub fn define(&mut self, name: &str, value: Value) {
		match self.variables.get_mut(name) {
			Some(slot) => *slot = value,
			None => {
				self.variables.insert(name.to_string(), value);
			}
		}
	}

	pub fn get(&self, name: &str) -> Option<&Value> { self.variables.get(name) }

	pub fn contains(&self, name: &str) -> bool { self.variables.contains_key(name) }

	pub fn len(&self) -> usize { self.variables.len() }

	pub fn is_empty(&self) -> bool { self.variables.is_empty() }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn define_replaces() {
		let mut environment = Environment::new();
		environment.define("x", Value::Int(1));
		environment.define("x", Value::Str("one".into()));
		assert_eq!(environment.get("x"), Some(&Value::Str("one".into())));
		assert_eq!(environment.len(), 1);
		assert!(!environment.contains("y"));
	}
}
