//! Translation of a checked program into a single C source file.
//!
//! Every value is a tagged `pgt_value` handled by a small runtime emitted in
//! front of the program, so the generated code keeps the interpreter's
//! dynamic typing: promotion to float, string concatenation, division by
//! zero yielding zero and the comparison rules.
//!
//! Globals become file-scope variables initialized at the start of the C
//! `main`, user functions become `fn_<name>` (the PGT `main` is `pgt_main`)
//! and variables become `v_<name>`. A function pre-declares every name it
//! assigns that is neither a parameter nor a global, which mirrors the
//! interpreter's rule that assigning to an existing global writes the global.

use std::collections::HashSet;

use tracing::debug;

use crate::{
	parser::expression::{BinaryOperator, Expression, LiteralValue},
	statement::{FileOperation, FormatTag, Function, Program, Statement},
};

const RUNTIME: &str = include_str!("runtime.c");
const INDENT: &str = "    ";

#[derive(Debug, Default)]
pub struct CodeGen {
	code:    String,
	depth:   usize,
	globals: HashSet<String>,
}

impl CodeGen {
	/// Emit the C translation unit for `program`.
	pub fn generate(program: &Program) -> String { Self::default().emit(program) }
}

impl CodeGen {
	fn emit(mut self, program: &Program) -> String {
		let globals: Vec<(&String, &Expression)> = program
			.items
			.iter()
			.filter_map(|item| match item {
				Statement::VarDecl { name, expr, .. } => Some((name, expr)),
				_ => None,
			})
			.collect();
		self.globals = globals.iter().map(|(name, _)| (*name).clone()).collect();

		self.code.push_str(RUNTIME);
		self.line("");

		let mut declared = HashSet::new();
		for (name, _) in &globals {
			if declared.insert(name.as_str()) {
				self.line(format!("static pgt_value {};", variable(name)));
			}
		}
		if !declared.is_empty() {
			self.line("");
		}

		for function in program.functions() {
			self.line(format!("{};", signature(function)));
		}
		self.line("");

		for function in program.functions() {
			self.function(function);
		}

		self.line("int main(void) {");
		self.depth += 1;
		for (name, expr) in &globals {
			let value = self.expression(expr);
			self.line(format!("{} = {value};", variable(name)));
		}
		if program.function("main").is_some() {
			self.line("pgt_main();");
		}
		self.line("return 0;");
		self.depth -= 1;
		self.line("}");

		debug!(bytes = self.code.len(), "generated C source");
		self.code
	}

	fn line(&mut self, text: impl AsRef<str>) {
		let text = text.as_ref();
		if !text.is_empty() {
			self.code.push_str(&INDENT.repeat(self.depth));
			self.code.push_str(text);
		}
		self.code.push('\n');
	}

	fn function(&mut self, function: &Function) {
		self.line(format!("{} {{", signature(function)));
		self.depth += 1;

		let parameters: HashSet<&str> = function.parameters.iter().map(|p| p.name.as_str()).collect();
		let mut locals = Vec::new();
		assigned_names(&function.body, &mut locals);
		let mut seen = HashSet::new();
		for name in locals {
			if !parameters.contains(name) && !self.globals.contains(name) && seen.insert(name) {
				self.line(format!("pgt_value {} = pgt_none();", variable(name)));
			}
		}

		self.statements(&function.body);
		self.depth -= 1;
		self.line("}");
		self.line("");
	}

	fn statements(&mut self, statements: &[Statement]) {
		for statement in statements {
			self.statement(statement);
		}
	}

	fn statement(&mut self, statement: &Statement) {
		match statement {
			Statement::VarDecl { name, expr, .. } => {
				let value = self.expression(expr);
				self.line(format!("{} = {value};", variable(name)));
			}
			Statement::Print { args, .. } => {
				for arg in args {
					let value = self.expression(arg);
					self.line(format!("pgt_print({value});"));
				}
				self.line("putchar('\\n');");
			}
			Statement::Input { var_name, format, prompt, .. } => {
				let format = match format {
					FormatTag::Int => 'i',
					FormatTag::Float => 'f',
					FormatTag::String => 's',
				};
				self.line(format!("{} = pgt_input('{format}', {});", variable(var_name), string_literal(prompt)));
			}
			Statement::Conect { func_name, args, .. } => {
				let args: Vec<String> = args.iter().map(|arg| self.expression(arg)).collect();
				self.line(format!("{}({});", function_name(func_name), args.join(", ")));
			}
			Statement::If { condition, then_body, else_body, .. } => {
				let condition = self.expression(condition);
				self.line(format!("if (pgt_truthy({condition})) {{"));
				self.depth += 1;
				self.statements(then_body);
				self.depth -= 1;
				if else_body.is_empty() {
					self.line("}");
				} else {
					self.line("} else {");
					self.depth += 1;
					self.statements(else_body);
					self.depth -= 1;
					self.line("}");
				}
			}
			Statement::FileOp { operation, path, data, .. } => {
				let path = self.expression(path);
				match (operation, data) {
					(FileOperation::Write, Some(data)) => {
						let data = self.expression(data);
						self.line(format!("pgt_file_write({path}, {data});"));
					}
					(FileOperation::Write, None) => self.line(format!("pgt_file_write({path}, pgt_str(\"\"));")),
					(operation, _) => self.line(format!("pgt_file_{}({path});", operation.name())),
				}
			}
			Statement::FunctionDef(_) | Statement::Import { .. } => {}
		}
	}

	fn expression(&self, expr: &Expression) -> String {
		match expr {
			Expression::Literal(LiteralValue::Int(n)) if *n == i64::MIN => "pgt_int(-9223372036854775807LL - 1)".to_string(),
			Expression::Literal(LiteralValue::Int(n)) => format!("pgt_int({n}LL)"),
			Expression::Literal(LiteralValue::Float(n)) => format!("pgt_float({n:?})"),
			Expression::Literal(LiteralValue::Str(s)) => format!("pgt_str({})", string_literal(s)),
			Expression::Identifier { name, .. } => variable(name),
			Expression::Binary { op, left, right, .. } => {
				let (left, right) = (self.expression(left), self.expression(right));
				match op {
					BinaryOperator::Add => format!("pgt_arith('+', {left}, {right})"),
					BinaryOperator::Subtract => format!("pgt_arith('-', {left}, {right})"),
					BinaryOperator::Multiply => format!("pgt_arith('*', {left}, {right})"),
					BinaryOperator::Divide => format!("pgt_arith('/', {left}, {right})"),
					BinaryOperator::Greater => format!("pgt_compare('>', {left}, {right})"),
					BinaryOperator::GreaterEqual => format!("pgt_compare('G', {left}, {right})"),
					BinaryOperator::Less => format!("pgt_compare('<', {left}, {right})"),
					BinaryOperator::LessEqual => format!("pgt_compare('L', {left}, {right})"),
					BinaryOperator::Equal => format!("pgt_compare('=', {left}, {right})"),
					BinaryOperator::NotEqual => format!("pgt_compare('!', {left}, {right})"),
				}
			}
		}
	}
}

/// Names assigned by `=` or `cout` anywhere in `statements`, in order.
fn assigned_names<'a>(statements: &'a [Statement], names: &mut Vec<&'a str>) {
	for statement in statements {
		match statement {
			Statement::VarDecl { name, .. } => names.push(name),
			Statement::Input { var_name, .. } => names.push(var_name),
			Statement::If { then_body, else_body, .. } => {
				assigned_names(then_body, names);
				assigned_names(else_body, names);
			}
			_ => {}
		}
	}
}

fn signature(function: &Function) -> String {
	let parameters: Vec<String> = function.parameters.iter().map(|p| format!("pgt_value {}", variable(&p.name))).collect();
	let parameters = if parameters.is_empty() { "void".to_string() } else { parameters.join(", ") };
	format!("static void {}({parameters})", function_name(&function.name))
}

fn function_name(name: &str) -> String {
	if name == "main" { "pgt_main".to_string() } else { format!("fn_{name}") }
}

fn variable(name: &str) -> String { format!("v_{name}") }

/// Quote `text` as a C string literal.
pub fn string_literal(text: &str) -> String {
	let mut quoted = String::with_capacity(text.len() + 2);
	quoted.push('"');
	for c in text.chars() {
		match c {
			'"' => quoted.push_str("\\\""),
			'\\' => quoted.push_str("\\\\"),
			'\n' => quoted.push_str("\\n"),
			'\t' => quoted.push_str("\\t"),
			'\r' => quoted.push_str("\\r"),
			'?' => quoted.push_str("\\?"),
			c if c.is_ascii_control() => quoted.push_str(&format!("\\{:03o}", c as u32)),
			c => quoted.push(c),
		}
	}
	quoted.push('"');
	quoted
}
