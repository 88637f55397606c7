//! Expression AST nodes
//!
//! PGT expressions are flat: literals, variable references and binary
//! operators. Calls are statements, never operands.

use std::fmt::Display;

use Expression::*;

use crate::{location::SourceLocation, scanner::TokenType};

/// Expression AST nodes
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
	Literal(LiteralValue),
	Identifier { name: String, location: SourceLocation },
	Binary { op: BinaryOperator, left: Box<Expression>, right: Box<Expression>, location: SourceLocation },
}

impl Expression {
	pub fn identifier(name: impl Into<String>, location: SourceLocation) -> Self {
		Identifier { name: name.into(), location }
	}

	pub fn binary(left: Expression, op: BinaryOperator, right: Expression, location: SourceLocation) -> Self {
		Binary { op, left: Box::new(left), right: Box::new(right), location }
	}
}

/// Literal values in the AST
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
	Int(i64),
	Float(f64),
	Str(String),
}

impl LiteralValue {
	/// Convert numeric literal text. Anything containing a `.` is a float.
	pub fn parse_number(text: &str) -> Option<Self> {
		if text.contains('.') {
			text.parse().ok().map(LiteralValue::Float)
		} else {
			text.parse().ok().map(LiteralValue::Int)
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
	Add,
	Subtract,
	Multiply,
	Divide,
	Greater,
	GreaterEqual,
	Less,
	LessEqual,
	Equal,
	NotEqual,
}

impl BinaryOperator {
	pub fn from_token(r#type: TokenType) -> Option<Self> {
		Some(match r#type {
			TokenType::Plus => Self::Add,
			TokenType::Minus => Self::Subtract,
			TokenType::Star => Self::Multiply,
			TokenType::Slash => Self::Divide,
			TokenType::Greater => Self::Greater,
			TokenType::GreaterEqual => Self::GreaterEqual,
			TokenType::Less => Self::Less,
			TokenType::LessEqual => Self::LessEqual,
			TokenType::EqualEqual => Self::Equal,
			TokenType::BangEqual => Self::NotEqual,
			_ => return None,
		})
	}

	/// Comparison and equality operators, which always produce `0` or `1`.
	pub fn is_comparison(&self) -> bool { !self.is_arithmetic() }

	pub fn is_arithmetic(&self) -> bool { matches!(self, Self::Add | Self::Subtract | Self::Multiply | Self::Divide) }

	pub fn symbol(&self) -> &'static str {
		match self {
			Self::Add => "+",
			Self::Subtract => "-",
			Self::Multiply => "*",
			Self::Divide => "/",
			Self::Greater => ">",
			Self::GreaterEqual => ">=",
			Self::Less => "<",
			Self::LessEqual => "<=",
			Self::Equal => "==",
			Self::NotEqual => "!=",
		}
	}
}

impl Display for BinaryOperator {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(self.symbol()) }
}

impl Display for LiteralValue {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			LiteralValue::Int(n) => write!(f, "{n}"),
			LiteralValue::Float(n) => write!(f, "{n:?}"),
			LiteralValue::Str(s) => write!(f, "\"{s}\""),
		}
	}
}

impl Display for Expression {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Literal(lit) => write!(f, "{lit}"),
			Identifier { name, .. } => write!(f, "{name}"),
			Binary { op, left, right, .. } => write!(f, "({op} {left} {right})"),
		}
	}
}
