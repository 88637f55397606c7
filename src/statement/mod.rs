//! Statement AST nodes and the parsed program.
//!
//! Statements only appear at top level or inside function and `if` bodies,
//! there is no block statement of its own.

use std::fmt::Display;

use crate::{location::SourceLocation, parser::expression::Expression};

/// A parsed source file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
	pub items:            Vec<Statement>,
	/// `package main` appeared at top level.
	pub has_package_main: bool,
	/// `return 0` appeared at top level.
	pub has_return_zero:  bool,
	/// Location of the end of input.
	pub end:              SourceLocation,
}

impl Program {
	pub fn functions(&self) -> impl Iterator<Item = &Function> {
		self.items.iter().filter_map(|item| match item {
			Statement::FunctionDef(function) => Some(function),
			_ => None,
		})
	}

	pub fn function(&self, name: &str) -> Option<&Function> { self.functions().find(|f| f.name == name) }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
	pub name:           String,
	pub parameters:     Vec<Parameter>,
	pub body:           Vec<Statement>,
	pub location:       SourceLocation,
	/// `return 1` appeared directly in the body, outside any `if`.
	pub has_return_one: bool,
}

impl Function {
	pub fn arity(&self) -> usize { self.parameters.len() }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
	pub name:      String,
	pub type_name: TypeName,
}

/// A statement in PGT.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
	FunctionDef(Function),
	/// `name + type = expr`, also used to reassign.
	VarDecl {
		name:      String,
		type_name: TypeName,
		expr:      Expression,
		location:  SourceLocation,
	},
	Print {
		args:             Vec<Expression>,
		/// One slot per argument.
		formats:          Vec<Option<FormatTag>>,
		suppress_newline: bool,
		location:         SourceLocation,
	},
	Input {
		var_name: String,
		format:   FormatTag,
		prompt:   String,
		location: SourceLocation,
	},
	/// A call, either `name(args)` or `conect(name, args)`.
	Conect {
		func_name: String,
		args:      Vec<Expression>,
		location:  SourceLocation,
	},
	Import {
		file_path:    String,
		import_names: Vec<String>,
		location:     SourceLocation,
	},
	If {
		condition: Expression,
		then_body: Vec<Statement>,
		else_body: Vec<Statement>,
		location:  SourceLocation,
	},
	FileOp {
		operation: FileOperation,
		path:      Expression,
		/// Only `write` carries data.
		data:      Option<Expression>,
		location:  SourceLocation,
	},
}

impl Statement {
	pub fn location(&self) -> &SourceLocation {
		match self {
			Statement::FunctionDef(function) => &function.location,
			Statement::VarDecl { location, .. }
			| Statement::Print { location, .. }
			| Statement::Input { location, .. }
			| Statement::Conect { location, .. }
			| Statement::Import { location, .. }
			| Statement::If { location, .. }
			| Statement::FileOp { location, .. } => location,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOperation {
	Create,
	Write,
	Read,
	Close,
	Delete,
}

impl FileOperation {
	pub fn name(&self) -> &'static str {
		match self {
			FileOperation::Create => "create",
			FileOperation::Write => "write",
			FileOperation::Read => "read",
			FileOperation::Close => "close",
			FileOperation::Delete => "delete",
		}
	}
}

/// `{int}`, `{float}` or `{string}` in print and input statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatTag {
	Int,
	Float,
	String,
}

impl FormatTag {
	/// Parse the braced form, e.g. `{int}`.
	pub fn parse(tag: &str) -> Option<Self> {
		match tag {
			"{int}" => Some(FormatTag::Int),
			"{float}" => Some(FormatTag::Float),
			"{string}" => Some(FormatTag::String),
			_ => None,
		}
	}

	/// Whether a string literal looks like a format tag at all.
	pub fn looks_like_tag(text: &str) -> bool { text.len() > 2 && text.starts_with('{') && text.ends_with('}') }
}

/// The declared type in `name + type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeName {
	Int,
	Float,
	String,
}

impl Display for TypeName {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(match self {
			TypeName::Int => "int",
			TypeName::Float => "float",
			TypeName::String => "string",
		})
	}
}

impl Display for FormatTag {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(match self {
			FormatTag::Int => "{int}",
			FormatTag::Float => "{float}",
			FormatTag::String => "{string}",
		})
	}
}

fn join<T: Display>(items: &[T]) -> String {
	items.iter().map(|item| item.to_string()).collect::<Vec<_>>().join(" ")
}

/// S-expression rendering, used by parser tests.
impl Display for Statement {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Statement::FunctionDef(function) => {
				let params = function.parameters.iter().map(|p| format!("{}:{}", p.name, p.type_name)).collect::<Vec<_>>();
				write!(f, "(function {} ({}) ({}))", function.name, params.join(" "), join(&function.body))
			}
			Statement::VarDecl { name, type_name, expr, .. } => write!(f, "(var {name}:{type_name} {expr})"),
			Statement::Print { args, formats, suppress_newline, .. } => {
				let args = args
					.iter()
					.zip(formats)
					.map(|(arg, format)| match format {
						Some(format) => format!("{arg}{format}"),
						None => arg.to_string(),
					})
					.collect::<Vec<_>>();
				let keyword = if *suppress_newline { "printg" } else { "print" };
				write!(f, "({keyword} {})", args.join(" "))
			}
			Statement::Input { var_name, format, prompt, .. } => write!(f, "(input {var_name}{format} {prompt:?})"),
			Statement::Conect { func_name, args, .. } => write!(f, "(call {func_name} ({}))", join(args)),
			Statement::Import { file_path, import_names, .. } => {
				write!(f, "(import {file_path:?} ({}))", import_names.join(" "))
			}
			Statement::If { condition, then_body, else_body, .. } => {
				write!(f, "(if {condition} ({}) ({}))", join(then_body), join(else_body))
			}
			Statement::FileOp { operation, path, data, .. } => match data {
				Some(data) => write!(f, "({}::file {path} {data})", operation.name()),
				None => write!(f, "({}::file {path})", operation.name()),
			},
		}
	}
}
