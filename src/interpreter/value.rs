use std::fmt::Display;

use Value::*;

use crate::{
	parser::expression::{BinaryOperator, LiteralValue},
	statement::FormatTag,
};

/// Value represents a runtime value in PGT.
///
/// `None` is the uninitialized state, it is never produced by a literal.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
	Int(i64),
	Float(f64),
	Str(String),
	#[default]
	None,
}

impl From<&LiteralValue> for Value {
	fn from(literal: &LiteralValue) -> Self {
		match literal {
			LiteralValue::Int(n) => Int(*n),
			LiteralValue::Float(n) => Float(*n),
			LiteralValue::Str(s) => Str(s.clone()),
		}
	}
}

impl Display for Value {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Int(n) => write!(f, "{n}"),
			Float(n) => write!(f, "{n:.6}"),
			Str(s) => f.write_str(s),
			None => Ok(()),
		}
	}
}

impl Value {
	pub fn type_name(&self) -> &'static str {
		match self {
			Int(_) => "int",
			Float(_) => "float",
			Str(_) => "string",
			None => "none",
		}
	}

	/// Determines if the value is considered "true" in an `if` condition.
	pub fn to_bool(&self) -> bool {
		match self {
			Int(n) => *n != 0,
			Float(n) => *n != 0.0,
			Str(s) => !s.is_empty(),
			None => false,
		}
	}

	/// Render for `print`. A tag that does not match the value's type is ignored.
	pub fn formatted(&self, format: Option<FormatTag>) -> String {
		match (format, self) {
			(Some(FormatTag::Int), Int(n)) => n.to_string(),
			(Some(FormatTag::Float), Float(n)) => format!("{n:.6}"),
			(Some(FormatTag::String), Str(s)) => s.clone(),
			_ => self.to_string(),
		}
	}

	/// Performs a binary operation between two values, `None` if the operand
	/// types do not support it.
	pub fn binary_op(&self, op: BinaryOperator, right: &Self) -> Option<Value> {
		if op.is_comparison() {
			return Some(Int(self.compare(op, right) as i64));
		}

		match (self, right) {
			(None, _) | (_, None) => Option::None,
			(Str(_), _) | (_, Str(_)) if op == BinaryOperator::Add => Some(Str(format!("{self}{right}"))),
			(Str(_), _) | (_, Str(_)) => Option::None,
			(Int(l), Int(r)) => Some(Int(integer_arithmetic(op, *l, *r))),
			_ => Some(Float(float_arithmetic(op, self.as_f64()?, right.as_f64()?))),
		}
	}

	/// Two strings compare lexically. If either side is a string or `None`
	/// both sides are stringified first, otherwise both compare as floats.
	fn compare(&self, op: BinaryOperator, right: &Self) -> bool {
		match (self, right) {
			(Str(l), Str(r)) => compare(op, l.as_str(), r.as_str()),
			(Str(_) | None, _) | (_, Str(_) | None) => compare(op, self.to_string().as_str(), right.to_string().as_str()),
			_ => compare(op, &self.as_f64().unwrap_or_default(), &right.as_f64().unwrap_or_default()),
		}
	}

	fn as_f64(&self) -> Option<f64> {
		match self {
			Int(n) => Some(*n as f64),
			Float(n) => Some(*n),
			_ => Option::None,
		}
	}
}

fn compare<T: PartialOrd + ?Sized>(op: BinaryOperator, left: &T, right: &T) -> bool {
	match op {
		BinaryOperator::Greater => left > right,
		BinaryOperator::GreaterEqual => left >= right,
		BinaryOperator::Less => left < right,
		BinaryOperator::LessEqual => left <= right,
		BinaryOperator::Equal => left == right,
		BinaryOperator::NotEqual => left != right,
		_ => false,
	}
}

/// Wrapping integer arithmetic, division by zero yields `0`.
fn integer_arithmetic(op: BinaryOperator, left: i64, right: i64) -> i64 {
	match op {
		BinaryOperator::Add => left.wrapping_add(right),
		BinaryOperator::Subtract => left.wrapping_sub(right),
		BinaryOperator::Multiply => left.wrapping_mul(right),
		_ if right == 0 => 0,
		_ => left.wrapping_div(right),
	}
}

/// Float arithmetic, division by zero yields `0.0`.
fn float_arithmetic(op: BinaryOperator, left: f64, right: f64) -> f64 {
	match op {
		BinaryOperator::Add => left + right,
		BinaryOperator::Subtract => left - right,
		BinaryOperator::Multiply => left * right,
		_ if right == 0.0 => 0.0,
		_ => left / right,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::parser::expression::BinaryOperator::*;

	fn op(left: Value, op: BinaryOperator, right: Value) -> Option<Value> { left.binary_op(op, &right) }

	#[test]
	fn integer_division_truncates() {
		assert_eq!(op(Int(7), Divide, Int(2)), Some(Int(3)));
		assert_eq!(op(Int(-7), Divide, Int(2)), Some(Int(-3)));
		assert_eq!(op(Int(7), Divide, Int(0)), Some(Int(0)));
		assert_eq!(op(Int(i64::MIN), Divide, Int(-1)), Some(Int(i64::MIN)));
	}

	#[test]
	fn float_promotion() {
		assert_eq!(op(Int(1), Add, Float(0.5)), Some(Float(1.5)));
		assert_eq!(op(Float(3.0), Subtract, Int(1)), Some(Float(2.0)));
		assert_eq!(op(Float(1.5), Multiply, Float(2.0)), Some(Float(3.0)));
		assert_eq!(op(Int(1), Divide, Float(0.0)), Some(Float(0.0)));
		assert_eq!(op(Float(1.0), Divide, Int(0)), Some(Float(0.0)));
	}

	#[test]
	fn integer_overflow_wraps() {
		assert_eq!(op(Int(i64::MAX), Add, Int(1)), Some(Int(i64::MIN)));
	}

	#[test]
	fn string_concatenation() {
		assert_eq!(op(Str("a".into()), Add, Str("b".into())), Some(Str("ab".into())));
		assert_eq!(op(Str("n=".into()), Add, Int(3)), Some(Str("n=3".into())));
		assert_eq!(op(Float(1.5), Add, Str("!".into())), Some(Str("1.500000!".into())));
		assert_eq!(op(Str("a".into()), Subtract, Int(1)), Option::None);
	}

	#[test]
	fn none_in_arithmetic_is_rejected() {
		assert_eq!(op(None, Add, Int(1)), Option::None);
		assert_eq!(op(Str("a".into()), Add, None), Option::None);
	}

	#[test]
	fn comparisons() {
		assert_eq!(op(Str("abc".into()), Less, Str("abd".into())), Some(Int(1)));
		assert_eq!(op(Str("abc".into()), Equal, Str("abc".into())), Some(Int(1)));
		assert_eq!(op(Int(2), Greater, Float(1.5)), Some(Int(1)));
		assert_eq!(op(Int(2), Equal, Float(2.0)), Some(Int(1)));
		assert_eq!(op(Int(10), Less, Int(9)), Some(Int(0)));
		// mixed string and number compare as text
		assert_eq!(op(Int(10), Less, Str("9".into())), Some(Int(1)));
		assert_eq!(op(None, Equal, Str("".into())), Some(Int(1)));
		assert_eq!(op(None, NotEqual, Int(0)), Some(Int(1)));
	}

	#[test]
	fn truthiness() {
		assert!(Int(-1).to_bool());
		assert!(!Int(0).to_bool());
		assert!(!Float(0.0).to_bool());
		assert!(Str(" ".into()).to_bool());
		assert!(!Str("".into()).to_bool());
		assert!(!None.to_bool());
	}

	#[test]
	fn display() {
		assert_eq!(Int(-42).to_string(), "-42");
		assert_eq!(Float(2.5).to_string(), "2.500000");
		assert_eq!(Str("hi".into()).to_string(), "hi");
		assert_eq!(None.to_string(), "");
		assert_eq!(Int(3).formatted(Some(FormatTag::Float)), "3");
		assert_eq!(Float(0.1).formatted(Some(FormatTag::Float)), "0.100000");
	}
}
