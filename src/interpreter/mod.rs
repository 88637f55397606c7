//! PGT tree-walking interpreter.
//!
//! [`Interpreter::run`] registers every top-level function, evaluates the
//! global variable declarations in order and then calls `main` if it exists.
//!
//! Each call gets a fresh [`Frame`] of locals seeded from its parameters.
//! Writes follow a single rule: a name that already exists in the global
//! table is written there, anything else goes to the current frame. Reads
//! check the frame first, then the globals.
//!
//! A stack of declaration locations mirrors the live activations. It is only
//! used for diagnostics: every [`RuntimeError`] carries a copy of it.

pub mod value;

use std::{
	collections::HashMap,
	fs::{self, OpenOptions},
	io::{BufRead, Write},
	rc::Rc,
};

use tracing::debug;
use value::Value;

use crate::{
	environment::Environment,
	error::{
		NameKind,
		interpreter::{RuntimeError, RuntimeErrorType},
	},
	location::SourceLocation,
	parser::expression::Expression,
	statement::{FileOperation, FormatTag, Function, Program, Statement},
};

/// One function activation.
#[derive(Debug, Default)]
pub struct Frame {
	locals: Environment,
}

/// Interpreter that executes PGT programs, reading console input from `R`
/// and writing program output to `W`.
pub struct Interpreter<R, W> {
	input:          R,
	/// Unread rest of a console line after a `{int}` or `{float}` read.
	pending:        Option<String>,
	output:         W,
	globals:        Environment,
	functions:      HashMap<String, Rc<Function>>,
	/// Declaration locations of the live activations, innermost last.
	call_stack:     Vec<SourceLocation>,
	max_call_depth: Option<usize>,
}

impl<R: BufRead, W: Write> Interpreter<R, W> {
	pub fn new(input: R, output: W) -> Self {
		Self {
			input,
			pending: None,
			output,
			globals: Environment::new(),
			functions: HashMap::new(),
			call_stack: Vec::new(),
			max_call_depth: None,
		}
	}

	/// Turn runaway recursion into [`RuntimeErrorType::CallDepthExceeded`].
	pub fn with_max_call_depth(mut self, max_call_depth: Option<usize>) -> Self {
		self.max_call_depth = max_call_depth;
		self
	}

	pub fn globals(&self) -> &Environment { &self.globals }

	pub fn output(&self) -> &W { &self.output }

	pub fn into_output(self) -> W { self.output }

	pub fn run(&mut self, program: &Program) -> Result<(), RuntimeError> {
		for item in &program.items {
			match item {
				Statement::FunctionDef(function) => {
					debug!("defined function {} with {} params", function.name, function.arity());
					self.functions.insert(function.name.clone(), Rc::new(function.clone()));
				}
				Statement::VarDecl { name, expr, .. } => {
					let value = self.evaluate(expr, &Frame::default())?;
					debug!("global var {name} = {value}");
					self.globals.define(name, value);
				}
				_ => {}
			}
		}

		if self.functions.contains_key("main") {
			self.call("main", Vec::new(), &program.end)?;
		}
		self.output.flush().map_err(|e| self.error(&program.end, RuntimeErrorType::Output(e)))
	}

	/// Call `name` with already evaluated arguments.
	pub fn call(&mut self, name: &str, args: Vec<Value>, call_site: &SourceLocation) -> Result<(), RuntimeError> {
		let Some(function) = self.functions.get(name).cloned() else {
			return Err(self.error(call_site, RuntimeErrorType::Undefined { name: name.to_string(), kind: NameKind::Function }));
		};
		if function.arity() != args.len() {
			return Err(self.error(call_site, RuntimeErrorType::ArityMismatch {
				name:     name.to_string(),
				expected: function.arity(),
				found:    args.len(),
			}));
		}
		if let Some(limit) = self.max_call_depth.filter(|limit| self.call_stack.len() >= *limit) {
			return Err(self.error(call_site, RuntimeErrorType::CallDepthExceeded(limit)));
		}

		debug!("calling {name} with {} args", args.len());
		let mut frame = Frame::default();
		for (parameter, value) in function.parameters.iter().zip(args) {
			frame.locals.define(&parameter.name, value);
		}

		self.call_stack.push(function.location.clone());
		let result = self.execute_block(&function.body, &mut frame);
		self.call_stack.pop();
		result
	}
}

/// Statements
impl<R: BufRead, W: Write> Interpreter<R, W> {
	fn execute_block(&mut self, statements: &[Statement], frame: &mut Frame) -> Result<(), RuntimeError> {
		for statement in statements {
			self.execute(statement, frame)?;
		}
		Ok(())
	}

	fn execute(&mut self, statement: &Statement, frame: &mut Frame) -> Result<(), RuntimeError> {
		match statement {
			Statement::VarDecl { name, expr, .. } => {
				let value = self.evaluate(expr, frame)?;
				self.assign(name, value, frame);
			}
			Statement::Print { args, formats, location, .. } => {
				let mut line = String::new();
				for (arg, format) in args.iter().zip(formats) {
					line.push_str(&self.evaluate(arg, frame)?.formatted(*format));
				}
				line.push('\n');
				self.write_output(line.as_bytes(), location)?;
			}
			Statement::Input { var_name, format, prompt, location } => {
				let value = self.read_input(*format, prompt, location)?;
				debug!("input saved to {var_name} = {value}");
				self.assign(var_name, value, frame);
			}
			Statement::Conect { func_name, args, location } => {
				let args = args.iter().map(|arg| self.evaluate(arg, frame)).collect::<Result<Vec<_>, _>>()?;
				self.call(func_name, args, location)?;
			}
			Statement::If { condition, then_body, else_body, .. } => {
				if self.evaluate(condition, frame)?.to_bool() {
					self.execute_block(then_body, frame)?;
				} else {
					self.execute_block(else_body, frame)?;
				}
			}
			Statement::FileOp { operation, path, data, location } => {
				let path = match self.evaluate(path, frame)? {
					Value::Str(path) => path,
					other => {
						return Err(self.error(
							location,
							RuntimeErrorType::Type(format!(
								"{}::file expects a string path, got {}",
								operation.name(),
								other.type_name()
							)),
						));
					}
				};
				let data = data.as_ref().map(|data| self.evaluate(data, frame)).transpose()?;
				self.file_operation(*operation, &path, data, location)?;
			}
			Statement::FunctionDef(_) | Statement::Import { .. } => {}
		}
		Ok(())
	}

	/// Write to the global if it exists, otherwise bind in the current frame.
	fn assign(&mut self, name: &str, value: Value, frame: &mut Frame) {
		if self.globals.contains(name) {
			debug!("set global var {name} = {value}");
			self.globals.define(name, value);
		} else {
			debug!("set local var {name} = {value}");
			frame.locals.define(name, value);
		}
	}

	fn read_input(&mut self, format: FormatTag, prompt: &str, location: &SourceLocation) -> Result<Value, RuntimeError> {
		self.write_output(prompt.as_bytes(), location)?;
		self.output.flush().map_err(|e| self.error(location, RuntimeErrorType::Output(e)))?;

		Ok(match format {
			FormatTag::Int => Value::Int(self.read_word(location)?.unwrap_or(0)),
			FormatTag::Float => Value::Float(self.read_word(location)?.unwrap_or(0.0)),
			FormatTag::String => {
				let line = match self.pending.take() {
					Some(rest) if !rest.is_empty() => Some(rest),
					_ => self.read_line(location)?,
				};
				Value::Str(line.unwrap_or_default())
			}
		})
	}

	/// Read the next whitespace-separated word, crossing line breaks. A word
	/// that does not parse discards the rest of its line.
	fn read_word<T: std::str::FromStr>(&mut self, location: &SourceLocation) -> Result<Option<T>, RuntimeError> {
		loop {
			let line = match self.pending.take() {
				Some(rest) => rest,
				None => match self.read_line(location)? {
					Some(line) => line,
					None => return Ok(None),
				},
			};
			let line = line.trim_start();
			if line.is_empty() {
				continue;
			}
			let end = line.find(char::is_whitespace).unwrap_or(line.len());
			let (word, rest) = line.split_at(end);
			let value = word.parse().ok();
			if value.is_some() {
				self.pending = Some(rest.to_string());
			}
			return Ok(value);
		}
	}

	/// One console line without its terminator, `None` at end of input.
	fn read_line(&mut self, location: &SourceLocation) -> Result<Option<String>, RuntimeError> {
		let mut line = String::new();
		let read = self.input.read_line(&mut line).map_err(|e| self.error(location, RuntimeErrorType::Input(e)))?;
		if read == 0 {
			return Ok(None);
		}
		if line.ends_with('\n') {
			line.pop();
			if line.ends_with('\r') {
				line.pop();
			}
		}
		Ok(Some(line))
	}

	fn file_operation(
		&mut self,
		operation: FileOperation,
		path: &str,
		data: Option<Value>,
		location: &SourceLocation,
	) -> Result<(), RuntimeError> {
		let io_error =
			|this: &Self, source| this.error(location, RuntimeErrorType::Io { operation: operation.name(), path: path.to_string(), source });

		debug!("{}::file({path})", operation.name());
		match operation {
			FileOperation::Create => {
				fs::File::create(path).map_err(|e| io_error(self, e))?;
			}
			FileOperation::Write => {
				let mut file =
					OpenOptions::new().create(true).append(true).open(path).map_err(|e| io_error(self, e))?;
				if let Some(data) = data {
					file.write_all(data.to_string().as_bytes()).map_err(|e| io_error(self, e))?;
				}
			}
			FileOperation::Read => {
				let mut contents = fs::read_to_string(path).map_err(|e| io_error(self, e))?;
				if !contents.ends_with('\n') {
					contents.push('\n');
				}
				self.write_output(contents.as_bytes(), location)?;
			}
			FileOperation::Close => {}
			FileOperation::Delete => {
				fs::remove_file(path).map_err(|e| io_error(self, e))?;
			}
		}
		Ok(())
	}

	fn write_output(&mut self, bytes: &[u8], location: &SourceLocation) -> Result<(), RuntimeError> {
		self.output.write_all(bytes).map_err(|e| self.error(location, RuntimeErrorType::Output(e)))
	}
}

/// Expressions
impl<R: BufRead, W: Write> Interpreter<R, W> {
	/// Evaluate the given expression and return its value.
	fn evaluate(&self, expr: &Expression, frame: &Frame) -> Result<Value, RuntimeError> {
		match expr {
			Expression::Literal(literal) => Ok(literal.into()),
			Expression::Identifier { name, location } => {
				frame.locals.get(name).or_else(|| self.globals.get(name)).cloned().ok_or_else(|| {
					self.error(location, RuntimeErrorType::Undefined { name: name.clone(), kind: NameKind::Variable })
				})
			}
			Expression::Binary { op, left, right, location } => {
				let left = self.evaluate(left, frame)?;
				let right = self.evaluate(right, frame)?;
				left.binary_op(*op, &right).ok_or_else(|| {
					self.error(
						location,
						RuntimeErrorType::Type(format!(
							"cannot apply '{op}' to {} and {}",
							left.type_name(),
							right.type_name()
						)),
					)
				})
			}
		}
	}

	fn error(&self, location: &SourceLocation, r#type: RuntimeErrorType) -> RuntimeError {
		RuntimeError::new(location.clone(), self.call_stack.clone(), r#type)
	}
}

#[cfg(test)]
mod tests {
	use std::io::Cursor;

	use super::*;
	use crate::{parser::Parser, scanner::Scanner};

	type TestInterpreter = Interpreter<Cursor<Vec<u8>>, Vec<u8>>;

	fn interpreter(source: &str, stdin: &str) -> (TestInterpreter, Result<(), RuntimeError>) {
		let program = Parser::new(Scanner::new(source).scan_tokens()).parse().unwrap();
		let mut interpreter = Interpreter::new(Cursor::new(stdin.as_bytes().to_vec()), Vec::new());
		let result = interpreter.run(&program);
		(interpreter, result)
	}

	/// Run `body` as the body of `main` and return the output.
	fn run_main(body: &str) -> String {
		let (interpreter, result) = interpreter(&format!("function(main()){{ {body} }}"), "");
		result.unwrap();
		String::from_utf8(interpreter.into_output()).unwrap()
	}

	fn run_error(source: &str) -> RuntimeError { interpreter(source, "").1.unwrap_err() }

	#[test]
	fn test_print() {
		assert_eq!(run_main("x + int = 2 print(x)"), "2\n");
		assert_eq!(run_main(r#"print("a", 1, "b")"#), "a1b\n");
		assert_eq!(run_main("printg(1) println(2.5)"), "1\n2.500000\n");
		assert_eq!(run_main(r#"print(7, "{float}")"#), "7\n");
		assert_eq!(run_main("print()"), "\n");
	}

	#[test]
	fn test_arithmetic() {
		assert_eq!(run_main("print(7 / 2) print(7 / 0) print(7.0 / 0) print(1 + 2 * 3 - 4)"), "3\n0\n0.000000\n3\n");
		assert_eq!(run_main(r#"print("n=" + 4 / 2)"#), "n=2\n");
	}

	#[test]
	fn test_comparison() {
		assert_eq!(run_main(r#"print("abc" < "abd") print("abc" == "abc") print(2 >= 3)"#), "1\n1\n0\n");
	}

	#[test]
	fn test_if_else() {
		assert_eq!(run_main(r#"if (1 == 1) { print("yes") } else { print("no") }"#), "yes\n");
		assert_eq!(run_main(r#"if ("") { print("yes") } else { print("no") }"#), "no\n");
		assert_eq!(run_main("x + int = 0 if (1) { x + int = 5 } print(x)"), "5\n");
	}

	#[test]
	fn test_global_write_rule() {
		let source = r#"
			result + int = 0
			function(produce(n + int)){ result + int = n * 10 local + int = 1 }
			function(consume()){ print(result) }
			function(main()){ produce(4) consume() }
		"#;
		let (interpreter, result) = interpreter(source, "");
		result.unwrap();
		assert_eq!(String::from_utf8_lossy(interpreter.output()), "40\n");
		assert_eq!(interpreter.globals().get("result"), Some(&Value::Int(40)));
		assert!(!interpreter.globals().contains("local"));
	}

	#[test]
	fn test_locals_do_not_leak_between_calls() {
		let error = run_error("function(set()){ x + int = 1 } function(main()){ set() print(x) }");
		assert!(matches!(error.r#type, RuntimeErrorType::Undefined { ref name, kind: NameKind::Variable } if name == "x"));
	}

	#[test]
	fn test_input() {
		let source = r#"function(main()){
			cout(age, "{int}", "Age? ")
			cout(weight, "{float}")
			cout(name, "{string}")
			cout(input, "{int}")
			print(age + 1, " ", weight, " ", name, input)
		}"#;
		let (interpreter, result) = interpreter(source, "41\nheavy\nAda Lovelace\r\n");
		result.unwrap();
		assert_eq!(String::from_utf8_lossy(interpreter.output()), "Age? > > > 42 0.000000 Ada Lovelace0\n");
	}

	#[test]
	fn test_numeric_input_reads_one_word() {
		let source = r#"function(main()){
			cout(a, "{int}")
			cout(b, "{int}")
			cout(c, "{float}")
			cout(rest, "{string}")
			cout(next, "{string}")
			print(a + b, "|", c, "|", rest, "|", next)
		}"#;
		let (interpreter, result) = interpreter(source, "41 1\n\n  2.5 and more\nlast\n");
		result.unwrap();
		assert_eq!(String::from_utf8_lossy(interpreter.output()), "> > > > > 42|2.500000| and more|last\n");
	}

	#[test]
	fn test_bad_number_discards_its_line() {
		let source = r#"function(main()){
			cout(a, "{int}", "")
			cout(b, "{int}", "")
			print(a, " ", b)
		}"#;
		let (interpreter, result) = interpreter(source, "oops 5\n7\n");
		result.unwrap();
		assert_eq!(String::from_utf8_lossy(interpreter.output()), "0 7\n");
	}

	#[test]
	fn test_undefined_variable_has_traceback() {
		let source = "function(inner()){\n print(missing)\n}\nfunction(main()){\n inner()\n}";
		let error = run_error(source);
		assert!(matches!(error.r#type, RuntimeErrorType::Undefined { ref name, .. } if name == "missing"));
		assert_eq!(error.location.line, 2);
		let lines: Vec<usize> = error.traceback.iter().map(|location| location.line).collect();
		assert_eq!(lines, vec![4, 1]);
	}

	#[test]
	fn test_unchecked_call_errors() {
		let error = run_error("function(main()){ nothing() }");
		assert!(matches!(error.r#type, RuntimeErrorType::Undefined { kind: NameKind::Function, .. }));

		let error = run_error("function(f(a + int)){} function(main()){ f() }");
		assert!(matches!(error.r#type, RuntimeErrorType::ArityMismatch { expected: 1, found: 0, .. }));
	}

	#[test]
	fn test_type_errors() {
		let error = run_error(r#"function(main()){ x + int = "a" - 1 }"#);
		assert_eq!(error.r#type.to_string(), "Type error: cannot apply '-' to string and int");

		let error = run_error("function(main()){ read::file(1) }");
		assert!(matches!(error.r#type, RuntimeErrorType::Type(_)));
	}

	#[test]
	fn test_call_depth_limit() {
		let program = Parser::new(Scanner::new("function(main()){ main() }").scan_tokens()).parse().unwrap();
		let mut interpreter = Interpreter::new(Cursor::new(Vec::new()), Vec::new()).with_max_call_depth(Some(16));
		let error = interpreter.run(&program).unwrap_err();
		assert!(matches!(error.r#type, RuntimeErrorType::CallDepthExceeded(16)));
		assert_eq!(error.traceback.len(), 16);
	}

	#[test]
	fn test_top_level_statements_are_ignored() {
		let (interpreter, result) = interpreter("print(1) x + int = 2", "");
		result.unwrap();
		assert!(interpreter.output().is_empty());
		assert_eq!(interpreter.globals().get("x"), Some(&Value::Int(2)));
	}
}
