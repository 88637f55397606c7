//! Symbol tables for the semantic analyzer.

use std::{collections::HashMap, fmt::Display};

use crate::{
	location::SourceLocation,
	parser::expression::LiteralValue,
	statement::{FormatTag, TypeName},
};

/// The static type lattice. `Unknown` is the least informative point and
/// defers checks to run time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarType {
	Int,
	Float,
	String,
	Unknown,
}

impl VarType {
	pub fn of_literal(literal: &LiteralValue) -> Self {
		match literal {
			LiteralValue::Int(_) => VarType::Int,
			LiteralValue::Float(_) => VarType::Float,
			LiteralValue::Str(_) => VarType::String,
		}
	}

	/// `self` unless it is `Unknown`.
	pub fn or(self, fallback: VarType) -> Self {
		match self {
			VarType::Unknown => fallback,
			known => known,
		}
	}

	pub fn is_known(&self) -> bool { *self != VarType::Unknown }
}

impl From<TypeName> for VarType {
	fn from(type_name: TypeName) -> Self {
		match type_name {
			TypeName::Int => VarType::Int,
			TypeName::Float => VarType::Float,
			TypeName::String => VarType::String,
		}
	}
}

impl From<FormatTag> for VarType {
	fn from(format: FormatTag) -> Self {
		match format {
			FormatTag::Int => VarType::Int,
			FormatTag::Float => VarType::Float,
			FormatTag::String => VarType::String,
		}
	}
}

impl Display for VarType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(match self {
			VarType::Int => "int",
			VarType::Float => "float",
			VarType::String => "string",
			VarType::Unknown => "unknown",
		})
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableInfo {
	pub var_type:    VarType,
	pub location:    SourceLocation,
	pub initialized: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionInfo {
	pub param_types: Vec<VarType>,
	/// Functions hand results back through globals, so this stays `Unknown`.
	pub return_type: VarType,
	pub location:    SourceLocation,
}

impl FunctionInfo {
	pub fn arity(&self) -> usize { self.param_types.len() }
}

/// Global table plus a stack of block scopes, innermost last.
#[derive(Debug, Default)]
pub struct ScopeStack {
	globals: HashMap<String, VariableInfo>,
	scopes:  Vec<HashMap<String, VariableInfo>>,
}

impl ScopeStack {
	pub fn new() -> Self { Self::default() }

	pub fn push(&mut self) { self.scopes.push(HashMap::new()); }

	pub fn pop(&mut self) { self.scopes.pop(); }

	pub fn depth(&self) -> usize { self.scopes.len() }

	/// Declare `name` in the innermost scope, or in the global table outside
	/// any block. A name that is already visible is not shadowed: its type is
	/// refined if it was `Unknown`.
	pub fn declare(&mut self, name: &str, var_type: VarType, location: &SourceLocation) {
		if let Some(existing) = self.lookup_mut(name) {
			if !existing.var_type.is_known() {
				existing.var_type = var_type;
			}
			return;
		}
		let info = VariableInfo { var_type, location: location.clone(), initialized: false };
		match self.scopes.last_mut() {
			Some(scope) => scope.insert(name.to_string(), info),
			None => self.globals.insert(name.to_string(), info),
		};
	}

	/// Look `name` up innermost scope first, then the globals.
	pub fn lookup(&self, name: &str) -> Option<&VariableInfo> {
		self.scopes.iter().rev().find_map(|scope| scope.get(name)).or_else(|| self.globals.get(name))
	}

	pub fn lookup_mut(&mut self, name: &str) -> Option<&mut VariableInfo> {
		if let Some(scope) = self.scopes.iter_mut().rev().find(|scope| scope.contains_key(name)) {
			return scope.get_mut(name);
		}
		self.globals.get_mut(name)
	}

	pub fn global(&self, name: &str) -> Option<&VariableInfo> { self.globals.get(name) }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn inner_scopes_do_not_leak() {
		let location = SourceLocation::default();
		let mut scopes = ScopeStack::new();
		scopes.declare("g", VarType::Int, &location);
		scopes.push();
		scopes.declare("a", VarType::Float, &location);
		scopes.push();
		scopes.declare("b", VarType::String, &location);
		assert_eq!(scopes.lookup("a").map(|v| v.var_type), Some(VarType::Float));
		assert_eq!(scopes.lookup("g").map(|v| v.var_type), Some(VarType::Int));
		scopes.pop();
		assert!(scopes.lookup("b").is_none());
		assert_eq!(scopes.depth(), 1);
	}

	#[test]
	fn redeclaring_a_visible_name_refines_unknown() {
		let location = SourceLocation::default();
		let mut scopes = ScopeStack::new();
		scopes.declare("g", VarType::Unknown, &location);
		scopes.push();
		scopes.declare("g", VarType::Float, &location);
		scopes.declare("g", VarType::String, &location);
		scopes.pop();
		assert_eq!(scopes.global("g").map(|v| v.var_type), Some(VarType::Float));
	}

	#[test]
	fn unknown_falls_back() {
		assert_eq!(VarType::Unknown.or(VarType::Int), VarType::Int);
		assert_eq!(VarType::Float.or(VarType::Int), VarType::Float);
	}
}
