//! The `Scanner` works on the lexical grammar, its alphabet is characters.
//! The `Parser` works on the syntactic grammar, its alphabet is tokens.
//!
//! |Name|Operators|Associates
//! --|--|--
//! Comparison|== != < > <= >=|Left
//! Term|+ -|Left
//! Factor|* /|Left
//!
//! Grammar:
//!
//! ``` BNF
//! program    → ( package | import | function | var-decl | return | statement )* ;
//! package    → "package" IDENTIFIER ;
//! import     → "from" ( STRING | IDENTIFIER ) "import" name ( "," name )* ;
//! function   → "function" "(" IDENTIFIER header ;
//! header     → "(" params? ")" ")" block
//!            | "(" params? ")" block ")"
//!            | ( "," params )? ")" block ;
//! params     → param ( "," param )* ;
//! param      → IDENTIFIER "+" type ;
//! block      → "{" statement* "}" ;
//! statement  → var-decl | print | input | if | file-op | call | conect | return ;
//! var-decl   → IDENTIFIER "+" type "=" expression ;
//! print      → ( "print" | "printg" | "println" ) "(" ( expression ( "," FORMAT )? "," ? )* ")" ;
//! input      → "cout" "(" ( IDENTIFIER | "input" ) "," FORMAT ( "," STRING )? ")" ;
//! if         → "if" "(" expression ")" block ( "else" block )? ;
//! file-op    → ( "create" | "write" | "read" | "close" | "delete" ) "::" "file" "(" expression ( "," expression )? ")" ;
//! call       → IDENTIFIER "(" arguments? ")" ;
//! conect     → "conect" "(" ( STRING | IDENTIFIER ) ( "," arguments )? ")" ;
//! return     → "return" expression? ;
//! expression → comparison ;
//! comparison → term ( ( "==" | "!=" | ">" | ">=" | "<" | "<=" ) term )* ;
//! term       → factor ( ( "-" | "+" ) factor )* ;
//! factor     → primary ( ( "/" | "*" ) primary )* ;
//! primary    → NUMBER | STRING | IDENTIFIER | "input" ;
//! ```
//!
//! `return` never produces a node. `package main`, a top-level `return 0`
//! and a `return 1` directly inside a function are recorded as flags on the result so
//! the driver can check the program's structure.

pub mod expression;

use std::sync::Arc;

use TokenType::*;
use tracing::{debug, warn};

use crate::{
	error::parser::{SyntaxError, SyntaxErrorType},
	location::SourceLocation,
	parser::expression::{BinaryOperator, Expression, LiteralValue},
	scanner::{Token, TokenType},
	statement::{FileOperation, FormatTag, Function, Parameter, Program, Statement, TypeName},
};

/// Iterations without progress tolerated at top level.
const PROGRAM_STALL_BUDGET: usize = 1000;
/// Iterations without progress tolerated inside a body.
const BLOCK_STALL_BUDGET: usize = 100;

const DEFAULT_PROMPT: &str = "> ";

/// Counts loop iterations that leave the cursor where it was.
struct StallGuard {
	construct: &'static str,
	budget:    usize,
	last:      Option<usize>,
	stalls:    usize,
}

impl StallGuard {
	fn new(construct: &'static str, budget: usize) -> Self { Self { construct, budget, last: None, stalls: 0 } }

	fn check(&mut self, cursor: usize, location: impl FnOnce() -> SourceLocation) -> Result<(), SyntaxError> {
		if self.last == Some(cursor) {
			self.stalls += 1;
			if self.stalls > self.budget {
				return Err(SyntaxError::new(location(), SyntaxErrorType::Stalled(self.construct)));
			}
		} else {
			self.stalls = 0;
		}
		self.last = Some(cursor);
		Ok(())
	}
}

/// Recursive-descent parser producing a [`Program`].
pub struct Parser {
	/// The tokens to parse, always terminated by `Eof`.
	tokens:           Vec<Token>,
	cursor:           usize,
	file:             Option<Arc<str>>,
	has_package_main: bool,
	has_return_zero:  bool,
	/// `return 1` seen directly in the current function's body.
	seen_return_one:  bool,
	/// `if` bodies entered inside the current function.
	nesting:          usize,
}

impl Parser {
	pub fn new(mut tokens: Vec<Token>) -> Self {
		if tokens.last().is_none_or(|token| token.r#type != Eof) {
			let (line, column) = tokens.last().map_or((1, 1), |token| (token.line, token.column));
			tokens.push(Token::new(Eof, "", line, column));
		}
		Self {
			tokens,
			cursor: 0,
			file: None,
			has_package_main: false,
			has_return_zero: false,
			seen_return_one: false,
			nesting: 0,
		}
	}

	/// Attach a file name to every location produced.
	pub fn with_file(mut self, file: Option<Arc<str>>) -> Self {
		self.file = file;
		self
	}

	pub fn parse(mut self) -> Result<Program, SyntaxError> {
		let mut items = Vec::new();
		let mut guard = StallGuard::new("program", PROGRAM_STALL_BUDGET);

		while self.peek().r#type != Eof {
			guard.check(self.cursor, || self.location())?;

			match self.peek().r#type {
				Package => self.package(),
				From => items.push(self.import()?),
				Function => items.push(Statement::FunctionDef(self.function()?)),
				Return => {
					if let Some(Expression::Literal(LiteralValue::Int(0))) = self.return_marker() {
						self.has_return_zero = true;
					}
				}
				_ => self.statement_or_skip(&mut items)?,
			}
		}

		let end = self.location();
		Ok(Program { items, has_package_main: self.has_package_main, has_return_zero: self.has_return_zero, end })
	}
}

/// Statements
impl Parser {
	fn package(&mut self) {
		self.advance(); // package
		let name = self.peek();
		let (is_main, at_end) = (name.r#type == Identifier && name.lexeme == "main", name.r#type == Eof);
		self.has_package_main |= is_main;
		if !at_end {
			self.advance();
		}
	}

	fn import(&mut self) -> Result<Statement, SyntaxError> {
		let location = self.location();
		self.advance(); // from

		let file_path = self.name("module path after 'from'")?;
		self.consume(Import, "'import' after module path")?;

		let mut import_names = vec![self.name("function name after 'import'")?];
		while self.peek().r#type == Comma {
			self.advance();
			import_names.push(self.name("function name after ','")?);
		}

		debug!("import {} from {file_path}", import_names.join(", "));
		Ok(Statement::Import { file_path, import_names, location })
	}

	fn function(&mut self) -> Result<Function, SyntaxError> {
		let location = self.location();
		self.advance(); // function
		self.consume(LeftParen, "'(' after 'function'")?;
		let name = self.consume(Identifier, "function name")?.lexeme;

		let mut parameters = Vec::new();
		let wrapped_parameters = match self.peek().r#type {
			LeftParen => {
				self.advance();
				if self.peek().r#type != RightParen {
					parameters = self.parameters()?;
				}
				self.consume(RightParen, "')' after parameters")?;
				true
			}
			Comma => {
				self.advance();
				parameters = self.parameters()?;
				false
			}
			_ => false,
		};

		self.seen_return_one = false;
		self.nesting = 0;
		let body = if wrapped_parameters && self.peek().r#type == LeftBrace {
			// function(name(params){ ... })
			let body = self.block("function body")?;
			self.consume(RightParen, "')' after function body")?;
			body
		} else {
			self.consume(RightParen, "')' after function header")?;
			self.block("function body")?
		};
		let has_return_one = std::mem::take(&mut self.seen_return_one);

		debug!("defined function {name} with {} params", parameters.len());
		Ok(Function { name, parameters, body, location, has_return_one })
	}

	fn parameters(&mut self) -> Result<Vec<Parameter>, SyntaxError> {
		let mut parameters = Vec::new();
		loop {
			let name = self.consume(Identifier, "parameter name")?.lexeme;
			self.consume(Plus, "'+' after parameter name")?;
			let type_name = self.type_name()?;
			parameters.push(Parameter { name, type_name });
			if self.peek().r#type != Comma {
				return Ok(parameters);
			}
			self.advance();
		}
	}

	/// `{ statement* }`. Unparseable tokens are skipped.
	fn block(&mut self, construct: &'static str) -> Result<Vec<Statement>, SyntaxError> {
		self.consume(LeftBrace, &format!("'{{' before {construct}"))?;

		let mut statements = Vec::new();
		let mut guard = StallGuard::new(construct, BLOCK_STALL_BUDGET);
		while !matches!(self.peek().r#type, RightBrace | Eof) {
			guard.check(self.cursor, || self.location())?;
			self.statement_or_skip(&mut statements)?;
		}

		self.consume(RightBrace, &format!("'}}' after {construct}"))?;
		Ok(statements)
	}

	fn statement_or_skip(&mut self, statements: &mut Vec<Statement>) -> Result<(), SyntaxError> {
		let start = self.cursor;
		match self.statement()? {
			Some(statement) => statements.push(statement),
			None if self.cursor == start => {
				let token = self.advance();
				warn!(line = token.line, column = token.column, "skipping unexpected token {} '{}'", token.r#type, token.lexeme);
			}
			None => {}
		}
		Ok(())
	}

	/// Parse one statement. `Ok(None)` means nothing was produced, either a
	/// `return` was consumed or the current token starts no statement.
	fn statement(&mut self) -> Result<Option<Statement>, SyntaxError> {
		let next = self.peek_next().r#type;
		let statement = match self.peek().r#type {
			Cout => self.input()?,
			r#type if r#type.is_print() => self.print()?,
			If => self.if_statement()?,
			r#type if r#type.is_file_operation() && next == ColonColon => self.file_operation()?,
			Identifier if next == Plus => self.var_declaration()?,
			Identifier if next == LeftParen => self.call()?,
			Identifier if next == ColonColon => {
				let token = self.peek();
				return Err(SyntaxError::new(self.location(), SyntaxErrorType::UnknownFileOperation(token.lexeme.clone())));
			}
			Conect => self.conect()?,
			Return => {
				if let Some(Expression::Literal(LiteralValue::Int(1))) = self.return_marker() {
					self.seen_return_one |= self.nesting == 0;
				}
				return Ok(None);
			}
			_ => return Ok(None),
		};
		Ok(Some(statement))
	}

	/// Consume `return` and its optional value. A value that does not parse
	/// belongs to the next statement, the cursor is rewound to right after
	/// `return`.
	fn return_marker(&mut self) -> Option<Expression> {
		self.advance(); // return
		if !matches!(self.peek().r#type, Number | StringLiteral | Identifier | Input) {
			return None;
		}
		let start = self.cursor;
		match self.expression() {
			Ok(value) => Some(value),
			Err(e) => {
				debug!("bare return, {e}");
				self.cursor = start;
				None
			}
		}
	}

	fn var_declaration(&mut self) -> Result<Statement, SyntaxError> {
		let location = self.location();
		let name = self.advance().lexeme;
		self.advance(); // +
		let type_name = self.type_name()?;
		self.consume(Equal, "'=' after variable type")?;
		let expr = self.expression()?;
		Ok(Statement::VarDecl { name, type_name, expr, location })
	}

	fn print(&mut self) -> Result<Statement, SyntaxError> {
		let location = self.location();
		let suppress_newline = self.advance().r#type == Printg;
		self.consume(LeftParen, "'(' after print")?;

		let mut args = Vec::new();
		let mut formats = Vec::new();
		while self.peek().r#type != RightParen {
			args.push(self.expression()?);
			formats.push(None);

			if self.peek().r#type != Comma {
				break;
			}
			self.advance();

			let token = self.peek();
			if token.r#type == StringLiteral && FormatTag::looks_like_tag(&token.lexeme) {
				let tag = self.format_tag()?;
				if let Some(slot) = formats.last_mut() {
					*slot = Some(tag);
				}
				if self.peek().r#type != Comma {
					break;
				}
				self.advance();
			}
		}

		self.consume(RightParen, "')' after print arguments")?;
		Ok(Statement::Print { args, formats, suppress_newline, location })
	}

	fn input(&mut self) -> Result<Statement, SyntaxError> {
		let location = self.location();
		self.advance(); // cout
		self.consume(LeftParen, "'(' after 'cout'")?;

		let var_name = match self.peek().r#type {
			Identifier | Input => self.advance().lexeme,
			_ => return Err(self.expected("variable name in 'cout'")),
		};
		self.consume(Comma, "',' after input variable")?;
		if self.peek().r#type != StringLiteral {
			return Err(self.expected("format string in 'cout'"));
		}
		let format = self.format_tag()?;

		let mut prompt = DEFAULT_PROMPT.to_string();
		if self.peek().r#type == Comma {
			self.advance();
			prompt = self.consume(StringLiteral, "prompt string")?.lexeme;
		}

		self.consume(RightParen, "')' after 'cout' arguments")?;
		Ok(Statement::Input { var_name, format, prompt, location })
	}

	fn if_statement(&mut self) -> Result<Statement, SyntaxError> {
		let location = self.location();
		self.advance(); // if
		self.consume(LeftParen, "'(' after 'if'")?;
		let condition = self.expression()?;
		self.consume(RightParen, "')' after if condition")?;

		self.nesting += 1;
		let bodies = self.if_bodies();
		self.nesting -= 1;
		let (then_body, else_body) = bodies?;

		Ok(Statement::If { condition, then_body, else_body, location })
	}

	fn if_bodies(&mut self) -> Result<(Vec<Statement>, Vec<Statement>), SyntaxError> {
		let then_body = self.block("if body")?;
		let else_body = if self.peek().r#type == Else {
			self.advance();
			self.block("else body")?
		} else {
			Vec::new()
		};
		Ok((then_body, else_body))
	}

	fn file_operation(&mut self) -> Result<Statement, SyntaxError> {
		let location = self.location();
		let operation = match self.advance().r#type {
			Create => FileOperation::Create,
			Write => FileOperation::Write,
			Read => FileOperation::Read,
			Close => FileOperation::Close,
			_ => FileOperation::Delete,
		};
		self.consume(ColonColon, "'::' after file operation")?;
		self.consume(File, "'file' after '::'")?;
		self.consume(LeftParen, "'(' after 'file'")?;

		let path = self.expression()?;
		let mut data = None;
		if operation == FileOperation::Write && self.peek().r#type == Comma {
			self.advance();
			data = Some(self.expression()?);
		}

		self.consume(RightParen, "')' after file operation arguments")?;
		Ok(Statement::FileOp { operation, path, data, location })
	}

	fn call(&mut self) -> Result<Statement, SyntaxError> {
		let location = self.location();
		let func_name = self.advance().lexeme;
		self.advance(); // (

		let mut args = Vec::new();
		if self.peek().r#type != RightParen {
			args = self.arguments()?;
		}

		self.consume(RightParen, "')' after call arguments")?;
		Ok(Statement::Conect { func_name, args, location })
	}

	fn conect(&mut self) -> Result<Statement, SyntaxError> {
		let location = self.location();
		self.advance(); // conect
		self.consume(LeftParen, "'(' after 'conect'")?;
		let func_name = self.name("function name in 'conect'")?;

		let mut args = Vec::new();
		if self.peek().r#type == Comma {
			self.advance();
			args = self.arguments()?;
		}

		self.consume(RightParen, "')' after 'conect' arguments")?;
		Ok(Statement::Conect { func_name, args, location })
	}

	fn arguments(&mut self) -> Result<Vec<Expression>, SyntaxError> {
		let mut args = vec![self.expression()?];
		while self.peek().r#type == Comma {
			self.advance();
			args.push(self.expression()?);
		}
		Ok(args)
	}
}

/// Expressions
impl Parser {
	fn expression(&mut self) -> Result<Expression, SyntaxError> { self.comparison() }

	fn comparison(&mut self) -> Result<Expression, SyntaxError> {
		let mut expression = self.term()?;
		while matches!(self.peek().r#type, Greater | GreaterEqual | Less | LessEqual | EqualEqual | BangEqual) {
			let (op, location) = self.operator();
			expression = Expression::binary(expression, op, self.term()?, location);
		}
		Ok(expression)
	}

	fn term(&mut self) -> Result<Expression, SyntaxError> {
		let mut expression = self.factor()?;
		while matches!(self.peek().r#type, Plus | Minus) {
			let (op, location) = self.operator();
			expression = Expression::binary(expression, op, self.factor()?, location);
		}
		Ok(expression)
	}

	fn factor(&mut self) -> Result<Expression, SyntaxError> {
		let mut expression = self.primary()?;
		while matches!(self.peek().r#type, Star | Slash) {
			let (op, location) = self.operator();
			expression = Expression::binary(expression, op, self.primary()?, location);
		}
		Ok(expression)
	}

	fn primary(&mut self) -> Result<Expression, SyntaxError> {
		let location = self.location();
		match self.peek().r#type {
			Number => {
				let token = self.advance();
				LiteralValue::parse_number(&token.lexeme)
					.map(Expression::Literal)
					.ok_or_else(|| SyntaxError::new(location, SyntaxErrorType::InvalidNumber(token.lexeme)))
			}
			StringLiteral => Ok(Expression::Literal(LiteralValue::Str(self.advance().lexeme))),
			Identifier | Input => Ok(Expression::identifier(self.advance().lexeme, location)),
			_ => Err(self.expected("expression")),
		}
	}

	/// Consume a binary operator token, the caller has matched it already.
	fn operator(&mut self) -> (BinaryOperator, SourceLocation) {
		let location = self.location();
		let token = self.advance();
		(BinaryOperator::from_token(token.r#type).unwrap_or(BinaryOperator::Equal), location)
	}
}

/// Token helpers
impl Parser {
	/// Peek at the current token.
	fn peek(&self) -> &Token { &self.tokens[self.cursor.min(self.tokens.len() - 1)] }

	/// Peek one token past the current one.
	fn peek_next(&self) -> &Token { &self.tokens[(self.cursor + 1).min(self.tokens.len() - 1)] }

	/// Advance to the next token, staying on `Eof` once reached.
	fn advance(&mut self) -> Token {
		let token = self.peek().clone();
		if token.r#type != Eof {
			self.cursor += 1;
		}
		token
	}

	fn location(&self) -> SourceLocation {
		let token = self.peek();
		SourceLocation::new(token.line, token.column, self.file.clone())
	}

	fn consume(&mut self, r#type: TokenType, what: &str) -> Result<Token, SyntaxError> {
		if self.peek().r#type == r#type {
			return Ok(self.advance());
		}
		Err(self.expected(what))
	}

	fn expected(&self, what: &str) -> SyntaxError {
		let token = self.peek();
		let found = if token.r#type == Eof { token.r#type.to_string() } else { token.lexeme.clone() };
		SyntaxError::new(self.location(), SyntaxErrorType::Expected { what: what.to_string(), found })
	}

	/// A name given either bare or quoted.
	fn name(&mut self, what: &str) -> Result<String, SyntaxError> {
		match self.peek().r#type {
			Identifier | StringLiteral => Ok(self.advance().lexeme),
			_ => Err(self.expected(what)),
		}
	}

	fn type_name(&mut self) -> Result<TypeName, SyntaxError> {
		let type_name = match self.peek().r#type {
			IntType => TypeName::Int,
			FloatType => TypeName::Float,
			StringType => TypeName::String,
			_ => return Err(self.expected("type name 'int', 'float' or 'string'")),
		};
		self.advance();
		Ok(type_name)
	}

	/// Consume a string literal holding a format tag.
	fn format_tag(&mut self) -> Result<FormatTag, SyntaxError> {
		let location = self.location();
		let token = self.advance();
		FormatTag::parse(&token.lexeme).ok_or_else(|| SyntaxError::new(location, SyntaxErrorType::UnknownFormat(token.lexeme)))
	}
}

/// Check the markers every entry file must carry: `package main`, a
/// `main` function containing `return 1` and a trailing `return 0`.
pub fn check_structure(program: &Program) -> Result<(), SyntaxError> {
	let start = SourceLocation::new(1, 1, program.end.file.clone());
	if !program.has_package_main {
		return Err(SyntaxError::new(start, SyntaxErrorType::MissingPackageMain));
	}
	if !program.has_return_zero {
		return Err(SyntaxError::new(program.end.clone(), SyntaxErrorType::MissingReturnZero));
	}
	let Some(main) = program.function("main") else {
		return Err(SyntaxError::new(program.end.clone(), SyntaxErrorType::MissingMain));
	};
	if !main.has_return_one {
		return Err(SyntaxError::new(main.location.clone(), SyntaxErrorType::MissingReturnOne));
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::scanner::Scanner;

	fn program(input: &str) -> Program { Parser::new(Scanner::new(input).scan_tokens()).parse().unwrap() }

	fn parse(input: &str, equals: &str) {
		let rendered = program(input).items.iter().map(|item| item.to_string()).collect::<Vec<_>>().join(" ");
		assert_eq!(rendered, equals);
	}

	fn parse_error(input: &str) -> SyntaxErrorType {
		Parser::new(Scanner::new(input).scan_tokens()).parse().unwrap_err().r#type
	}

	/// Wrap statements in `main` and return the rendered body.
	fn body(statements: &str, equals: &str) {
		parse(&format!("function(main()){{ {statements} }}"), &format!("(function main () ({equals}))"));
	}

	#[test]
	fn parse_expressions() {
		body("x + int = 1 + 2 * 3", "(var x:int (+ 1 (* 2 3)))");
		body("x + int = 1 + 2 * 3 / 4 - 5", "(var x:int (- (+ 1 (/ (* 2 3) 4)) 5))");
		body("x + float = 8 - 800.5 * a", "(var x:float (- 8 (* 800.5 a)))");
	}

	#[test]
	fn parse_comparison() {
		body("x + int = 1 < 2", "(var x:int (< 1 2))");
		body("x + int = 1 == 2 == 3", "(var x:int (== (== 1 2) 3))");
		body("x + int = 1 + 2 != 3 - 4", "(var x:int (!= (+ 1 2) (- 3 4)))");
		body("x + int = a >= b <= c", "(var x:int (<= (>= a b) c))");
	}

	#[test]
	fn parse_literals() {
		body("x + int = 42", "(var x:int 42)");
		body("x + float = 3.25", "(var x:float 3.25)");
		body("x + float = .5", "(var x:float 0.5)");
		body("x + int = -3", "(var x:int -3)");
		body(r#"x + string = "hi""#, r#"(var x:string "hi")"#);
		body("x + int = input", "(var x:int input)");
	}

	#[test]
	fn invalid_number_is_a_syntax_error() {
		assert_eq!(parse_error("function(main()){ x + float = 1.2.3 }"), SyntaxErrorType::InvalidNumber("1.2.3".into()));
	}

	#[test]
	fn parse_function_headers() {
		parse("function(main()){}", "(function main () ())");
		parse("function(add(a + int, b + float)){}", "(function add (a:int b:float) ())");
		parse("function(add, a + int, b + string){}", "(function add (a:int b:string) ())");
		parse("function(main(){ print(1) })", "(function main () ((print 1)))");
		parse("function(greet){}", "(function greet () ())");
	}

	#[test]
	fn parse_print() {
		body("print(x)", "(print x)");
		body(r#"print("a", x, "{int}", y)"#, r#"(print "a" x{int} y)"#);
		body(r#"println(x, "{float}")"#, "(print x{float})");
		body("printg(1, 2)", "(printg 1 2)");
		body("print()", "(print )");
	}

	#[test]
	fn parse_print_rejects_unknown_format() {
		assert_eq!(parse_error(r#"function(main()){ print(x, "{bool}") }"#), SyntaxErrorType::UnknownFormat("{bool}".into()));
	}

	#[test]
	fn parse_input() {
		body(r#"cout(input, "{int}")"#, r#"(input input{int} "> ")"#);
		body(r#"cout(name, "{string}", "Name: ")"#, r#"(input name{string} "Name: ")"#);
	}

	#[test]
	fn parse_calls() {
		body("greet()", "(call greet ())");
		body("add(1, x + 2)", "(call add (1 (+ x 2)))");
		body(r#"conect("add", 1, 2)"#, "(call add (1 2))");
		body("conect(greet)", "(call greet ())");
	}

	#[test]
	fn parse_if_else() {
		body(r#"if (1 == 1) { print("yes") } else { print("no") }"#, r#"(if (== 1 1) ((print "yes")) ((print "no")))"#);
		body("if (x) { y + int = 1 }", "(if x ((var y:int 1)) ())");
	}

	#[test]
	fn parse_file_operations() {
		body(r#"create::file("a.txt")"#, r#"(create::file "a.txt")"#);
		body(r#"write::file(path, "data" + x)"#, r#"(write::file path (+ "data" x))"#);
		body("read::file(path) close::file(path) delete::file(path)", "(read::file path) (close::file path) (delete::file path)");
	}

	#[test]
	fn parse_import() {
		parse(r#"from "lib/math" import add, sub"#, r#"(import "lib/math" (add sub))"#);
		parse("from utils import helper", r#"(import "utils" (helper))"#);
	}

	#[test]
	fn parse_global_variables() {
		parse("package main count + int = 0 function(main()){}", "(var count:int 0) (function main () ())");
	}

	#[test]
	fn records_structure_markers() {
		let program = program("package main function(main()){ return 1 } return 0");
		assert!(program.has_package_main);
		assert!(program.has_return_zero);
		assert!(program.function("main").unwrap().has_return_one);
		assert!(check_structure(&program).is_ok());

		let program = self::program("package other function(main()){ return 0 } return 1");
		assert!(!program.has_package_main);
		assert!(!program.has_return_zero);
		assert!(!program.function("main").unwrap().has_return_one);
	}

	#[test]
	fn only_direct_return_one_counts() {
		let program = program("function(main()){ if (1) { return 1 } else { return 1 } }");
		assert!(!program.function("main").unwrap().has_return_one);
		let program = self::program("function(main()){ if (1) { print(1) } return 1 }");
		assert!(program.function("main").unwrap().has_return_one);
	}

	#[test]
	fn bare_return_leaves_next_statement_intact() {
		parse(
			"function(helper()){ print(1) return\n x + int = 2 }",
			"(function helper () ((print 1) (var x:int 2)))",
		);
		body("return x print(x)", "(print x)");
		let program = program("function(main()){ return\n total + int = 1 return 1 }");
		assert!(program.function("main").unwrap().has_return_one);
	}

	#[test]
	fn stall_guard_gives_up_after_budget() {
		let location = || SourceLocation::new(4, 2, None);
		let mut guard = StallGuard::new("if body", 3);
		assert!(guard.check(10, location).is_ok());
		for _ in 0..3 {
			assert!(guard.check(10, location).is_ok());
		}
		let error = guard.check(10, location).unwrap_err();
		assert_eq!(error.r#type, SyntaxErrorType::Stalled("if body"));
		assert_eq!((error.location.line, error.location.column), (4, 2));

		// progress resets the count
		let mut guard = StallGuard::new("program", 1);
		for cursor in [0, 0, 1, 1, 2, 2] {
			assert!(guard.check(cursor, location).is_ok());
		}
	}

	#[test]
	fn check_structure_reports_first_missing_marker() {
		let check = |input: &str| check_structure(&program(input)).unwrap_err().r#type;
		assert_eq!(check("function(main()){ return 1 } return 0"), SyntaxErrorType::MissingPackageMain);
		assert_eq!(check("package main function(main()){ return 1 }"), SyntaxErrorType::MissingReturnZero);
		assert_eq!(check("package main function(other()){ return 1 } return 0"), SyntaxErrorType::MissingMain);
		assert_eq!(check("package main function(main()){ print(1) } return 0"), SyntaxErrorType::MissingReturnOne);
	}

	#[test]
	fn skips_unparseable_tokens_in_bodies() {
		body("= 5 print(1) > else", "(print 1)");
	}

	#[test]
	fn misspelled_file_operation_is_reported() {
		assert_eq!(
			parse_error(r#"function(main()){ wirte::file("a", "b") }"#),
			SyntaxErrorType::UnknownFileOperation("wirte".into())
		);
	}

	#[test]
	fn missing_paren_is_reported_with_location() {
		let error = Parser::new(Scanner::new("function(main()){\n  print(1\n}").scan_tokens()).parse().unwrap_err();
		assert_eq!(error.r#type, SyntaxErrorType::Expected { what: "')' after print arguments".into(), found: "}".into() });
		assert_eq!((error.location.line, error.location.column), (3, 1));
	}

	#[test]
	fn unterminated_body_is_reported() {
		assert!(matches!(
			parse_error("function(main()){ print(1)"),
			SyntaxErrorType::Expected { found, .. } if found == "end of input"
		));
	}

	#[test]
	fn locations_carry_file_name() {
		let program =
			Parser::new(Scanner::new("package main\nx + int = 1").scan_tokens()).with_file(Some("a.pgt".into())).parse().unwrap();
		assert_eq!(program.items[0].location().to_string(), "a.pgt:2:1");
	}
}
