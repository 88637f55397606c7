//! Two-pass static checker.
//!
//! Pass 1 registers every function signature and global name so calls and
//! global references may appear before their declaration. Pass 2 walks each
//! function body, inferring types over the [`VarType`] lattice, resolving
//! names through a [`ScopeStack`] and checking call arity.
//!
//! Every block (a function body, `then`, `else`) opens its own scope and
//! pre-declares the names it assigns, so a name may be read before the
//! assignment that introduces it in the same block. Names assigned in `then`
//! are invisible in `else` and after the `if`.

pub mod scope;

use std::collections::{HashMap, hash_map::Entry};

pub use scope::{FunctionInfo, ScopeStack, VarType, VariableInfo};
use tracing::debug;

use crate::{
	error::{
		NameKind,
		analyzer::{SemanticError, SemanticErrorType},
	},
	location::SourceLocation,
	parser::expression::{BinaryOperator, Expression},
	statement::{Function, Program, Statement},
};

#[derive(Debug, Default)]
pub struct Analyzer {
	functions: HashMap<String, FunctionInfo>,
	scopes:    ScopeStack,
}

impl Analyzer {
	pub fn new() -> Self { Self::default() }

	pub fn analyze(&mut self, program: &Program) -> Result<(), SemanticError> {
		self.register(program)?;

		for item in &program.items {
			match item {
				Statement::FunctionDef(function) => self.function(function)?,
				Statement::VarDecl { name, expr, .. } => self.assignment(name, expr)?,
				_ => {}
			}
		}
		Ok(())
	}

	pub fn function_info(&self, name: &str) -> Option<&FunctionInfo> { self.functions.get(name) }

	pub fn global(&self, name: &str) -> Option<&VariableInfo> { self.scopes.global(name) }
}

impl Analyzer {
	/// Pass 1: function signatures and global names.
	fn register(&mut self, program: &Program) -> Result<(), SemanticError> {
		for item in &program.items {
			match item {
				Statement::FunctionDef(function) => match self.functions.entry(function.name.clone()) {
					Entry::Occupied(_) => {
						return Err(SemanticError::new(
							function.location.clone(),
							SemanticErrorType::DuplicateFunction(function.name.clone()),
						));
					}
					Entry::Vacant(entry) => {
						entry.insert(FunctionInfo {
							param_types: vec![VarType::Unknown; function.arity()],
							return_type: VarType::Unknown,
							location:    function.location.clone(),
						});
					}
				},
				Statement::VarDecl { name, type_name, expr, location } => {
					let inferred = self.expression_type(expr).unwrap_or(VarType::Unknown);
					self.scopes.declare(name, inferred.or((*type_name).into()), location);
				}
				_ => {}
			}
		}
		debug!(functions = self.functions.len(), "registered function signatures");
		Ok(())
	}

	fn function(&mut self, function: &Function) -> Result<(), SemanticError> {
		self.scopes.push();
		for parameter in &function.parameters {
			self.scopes.declare(&parameter.name, VarType::Unknown, &function.location);
			self.mark_initialized(&parameter.name);
		}
		let result = self.statements(&function.body);
		self.scopes.pop();
		result
	}

	/// A nested block with its own scope.
	fn block(&mut self, statements: &[Statement]) -> Result<(), SemanticError> {
		self.scopes.push();
		let result = self.statements(statements);
		self.scopes.pop();
		result
	}

	fn statements(&mut self, statements: &[Statement]) -> Result<(), SemanticError> {
		for statement in statements {
			match statement {
				Statement::VarDecl { name, type_name, expr, location } => {
					let inferred = self.expression_type(expr).unwrap_or(VarType::Unknown);
					self.scopes.declare(name, inferred.or((*type_name).into()), location);
				}
				Statement::Input { var_name, format, location, .. } => {
					self.scopes.declare(var_name, (*format).into(), location);
				}
				_ => {}
			}
		}

		for statement in statements {
			self.statement(statement)?;
		}
		Ok(())
	}

	fn statement(&mut self, statement: &Statement) -> Result<(), SemanticError> {
		match statement {
			Statement::VarDecl { name, expr, .. } => self.assignment(name, expr),
			Statement::Print { args, .. } => {
				for arg in args {
					self.expression_type(arg)?;
				}
				Ok(())
			}
			Statement::Input { var_name, .. } => {
				self.mark_initialized(var_name);
				Ok(())
			}
			Statement::Conect { func_name, args, location } => self.call(func_name, args, location),
			Statement::If { condition, then_body, else_body, .. } => {
				self.expression_type(condition)?;
				self.block(then_body)?;
				self.block(else_body)
			}
			Statement::FileOp { operation, path, data, location } => {
				let path_type = self.expression_type(path)?;
				if path_type.is_known() && path_type != VarType::String {
					return Err(SemanticError::new(
						location.clone(),
						SemanticErrorType::Type(format!("{}::file expects a string path, got {path_type}", operation.name())),
					));
				}
				if let Some(data) = data {
					self.expression_type(data)?;
				}
				Ok(())
			}
			Statement::FunctionDef(_) | Statement::Import { .. } => Ok(()),
		}
	}

	/// A known type is never narrowed again: which assignment runs last is
	/// only decided at runtime.
	fn assignment(&mut self, name: &str, expr: &Expression) -> Result<(), SemanticError> {
		let inferred = self.expression_type(expr)?;
		if let Some(variable) = self.scopes.lookup_mut(name) {
			if !variable.var_type.is_known() {
				variable.var_type = inferred;
			}
			variable.initialized = true;
		}
		Ok(())
	}

	fn call(&mut self, name: &str, args: &[Expression], location: &SourceLocation) -> Result<(), SemanticError> {
		let Some(function) = self.functions.get(name) else {
			return Err(SemanticError::new(
				location.clone(),
				SemanticErrorType::Undefined { name: name.to_string(), kind: NameKind::Function },
			));
		};
		if function.arity() != args.len() {
			return Err(SemanticError::new(
				location.clone(),
				SemanticErrorType::ArityMismatch { name: name.to_string(), expected: function.arity(), found: args.len() },
			));
		}
		for arg in args {
			self.expression_type(arg)?;
		}
		Ok(())
	}

	fn mark_initialized(&mut self, name: &str) {
		if let Some(variable) = self.scopes.lookup_mut(name) {
			variable.initialized = true;
		}
	}

	/// Infer the type of an expression, failing on undefined names and on
	/// arithmetic other than `+` applied to a string.
	fn expression_type(&self, expr: &Expression) -> Result<VarType, SemanticError> {
		match expr {
			Expression::Literal(literal) => Ok(VarType::of_literal(literal)),
			Expression::Identifier { name, location } => self.scopes.lookup(name).map(|v| v.var_type).ok_or_else(|| {
				SemanticError::new(location.clone(), SemanticErrorType::Undefined { name: name.clone(), kind: NameKind::Variable })
			}),
			Expression::Binary { op, left, right, location } => {
				let (left, right) = (self.expression_type(left)?, self.expression_type(right)?);
				if op.is_comparison() {
					return Ok(VarType::Int);
				}
				if left == VarType::String || right == VarType::String {
					if *op == BinaryOperator::Add {
						return Ok(VarType::String);
					}
					return Err(SemanticError::new(
						location.clone(),
						SemanticErrorType::Type(format!("cannot apply '{op}' to {left} and {right}")),
					));
				}
				Ok(match (left, right) {
					(VarType::Unknown, _) | (_, VarType::Unknown) => VarType::Unknown,
					(VarType::Float, _) | (_, VarType::Float) => VarType::Float,
					_ => VarType::Int,
				})
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{parser::Parser, scanner::Scanner};

	fn analyze(input: &str) -> Result<Analyzer, SemanticErrorType> {
		let program = Parser::new(Scanner::new(input).scan_tokens()).parse().unwrap();
		let mut analyzer = Analyzer::new();
		analyzer.analyze(&program).map(|_| analyzer).map_err(|e| e.r#type)
	}

	fn main_with(body: &str) -> Result<Analyzer, SemanticErrorType> { analyze(&format!("function(main()){{ {body} }}")) }

	#[test]
	fn accepts_well_formed_program() {
		let source = r#"
			total + int = 0
			function(add(a + int, b + int)){ total + int = a + b }
			function(main()){
				add(1, 2)
				print(total)
				cout(name, "{string}")
				print("hi " + name)
			}
		"#;
		assert!(analyze(source).is_ok());
	}

	#[test]
	fn duplicate_function_is_rejected() {
		assert_eq!(
			analyze("function(f()){} function(f()){}").unwrap_err(),
			SemanticErrorType::DuplicateFunction("f".into())
		);
	}

	#[test]
	fn undefined_function_is_rejected() {
		assert_eq!(
			main_with("missing(1)").unwrap_err(),
			SemanticErrorType::Undefined { name: "missing".into(), kind: NameKind::Function }
		);
	}

	#[test]
	fn arity_mismatch_is_rejected() {
		let error = analyze("function(f(a + int)){} function(main()){ f(1, 2) }").unwrap_err();
		assert_eq!(error, SemanticErrorType::ArityMismatch { name: "f".into(), expected: 1, found: 2 });
		assert_eq!(error.to_string(), "Function 'f' expects 1 arguments, got 2");
	}

	#[test]
	fn undefined_variable_is_rejected() {
		assert_eq!(
			main_with("print(y)").unwrap_err(),
			SemanticErrorType::Undefined { name: "y".into(), kind: NameKind::Variable }
		);
	}

	#[test]
	fn forward_reference_within_a_function_resolves() {
		assert!(main_with("print(later) later + int = 1").is_ok());
	}

	#[test]
	fn calls_may_precede_declarations() {
		assert!(analyze("function(main()){ helper() } function(helper()){}").is_ok());
	}

	#[test]
	fn then_names_are_invisible_in_else() {
		assert_eq!(
			main_with("if (1) { a + int = 1 } else { print(a) }").unwrap_err(),
			SemanticErrorType::Undefined { name: "a".into(), kind: NameKind::Variable }
		);
		assert!(main_with("if (1) { a + int = 1 } print(a)").is_err());
	}

	#[test]
	fn assignment_in_branch_updates_outer_name() {
		assert!(main_with("a + int = 0 if (1) { a + int = 2 } print(a)").is_ok());
	}

	#[test]
	fn infers_types() {
		let analyzer = analyze(
			r#"
			i + int = 1 + 2
			f + float = 1 + 2.5
			s + string = "a" + 1
			c + string = 1 < 2
			d + int = 0
		"#,
		)
		.unwrap();
		let type_of = |name| analyzer.global(name).map(|v| v.var_type);
		assert_eq!(type_of("i"), Some(VarType::Int));
		assert_eq!(type_of("f"), Some(VarType::Float));
		assert_eq!(type_of("s"), Some(VarType::String));
		assert_eq!(type_of("c"), Some(VarType::Int));
		assert!(analyzer.global("d").unwrap().initialized);
	}

	#[test]
	fn unknown_parameters_defer_checks() {
		let analyzer = analyze("r + int = 0 function(f(a + int)){ r + int = a * 2 }").unwrap();
		assert_eq!(analyzer.global("r").map(|v| v.var_type), Some(VarType::Int));
		let f = analyzer.function_info("f").unwrap();
		assert_eq!(f.arity(), 1);
		assert_eq!(f.return_type, VarType::Unknown);
	}

	#[test]
	fn assignments_elsewhere_do_not_retype_a_global() {
		let source = r#"
			msg + int = 0
			function(setmsg()){ msg + string = "x" }
			function(main()){ r + int = msg * 2 print(r) }
		"#;
		let analyzer = analyze(source).unwrap();
		assert_eq!(analyzer.global("msg").map(|v| v.var_type), Some(VarType::Int));

		let reordered = r#"
			function(main()){ r + int = msg * 2 }
			function(setmsg()){ msg + string = "x" }
			msg + int = 0
		"#;
		assert!(analyze(reordered).is_ok());
	}

	#[test]
	fn string_arithmetic_other_than_add_is_a_type_error() {
		assert!(matches!(main_with(r#"x + int = "a" - 1"#).unwrap_err(), SemanticErrorType::Type(_)));
		assert!(matches!(main_with(r#"x + string = "a" * "b""#).unwrap_err(), SemanticErrorType::Type(_)));
	}

	#[test]
	fn input_declares_its_variable() {
		assert!(main_with(r#"cout(age, "{int}") x + int = age + 1"#).is_ok());
	}

	#[test]
	fn file_path_must_be_a_string() {
		assert!(matches!(main_with("delete::file(42)").unwrap_err(), SemanticErrorType::Type(_)));
		assert!(main_with(r#"p + string = "out.txt" write::file(p, 1)"#).is_ok());
	}
}
