//! Turns PGT source text into tokens.
//!
//! The scanner is lazy: [`Scanner::next_token`] produces one token per call
//! and never backtracks across a token it already committed. The parser wants
//! the whole sequence up front, so [`Scanner::scan_tokens`] materializes it.
//!
//! Whitespace and `//` comments are skipped. Characters that cannot start any
//! token are skipped with a warning instead of failing the scan, so scanning
//! itself never fails; malformed numbers surface later when the parser
//! converts them.
//!
//! String literals may span lines:
//!
//! ``` text
//! print("
//!     first line
//!
//!     third line
//! ")
//! ```
//!
//! The newline and indentation right after the opening quote are dropped, as
//! is the newline and indentation right before the closing quote. A `"` only
//! closes the literal when the next non-blank character could follow an
//! expression (`)`, `,`, an operator, a keyword, end of input...), otherwise
//! it is part of the text.
mod token;

use std::{iter::Peekable, str::CharIndices};

use TokenType::*;
pub use token::*;
use tracing::warn;

/// Default cap on characters consumed by one string literal.
pub const STRING_SCAN_LIMIT: usize = 1 << 20;

/// A scanner for PGT source code
pub struct Scanner<'a> {
	/// User input source code
	source:        &'a str,
	/// User input source code iterator
	source_iter:   Peekable<CharIndices<'a>>,
	/// Points at the beginning of the current lexeme
	start:         usize,
	/// Points at the character currently being considered
	cursor:        usize,
	/// Line of the character at `cursor`.
	line:          usize,
	/// Column of the character at `cursor`.
	column:        usize,
	/// Whether the previously emitted token can end an operand.
	after_operand: bool,
	/// Set once `Eof` has been produced.
	finished:      bool,
	/// Characters a string literal may consume before it is cut off.
	string_limit:  usize,
}

impl<'a> Scanner<'a> {
	pub fn new(source: &'a str) -> Self {
		let source_iter = source.char_indices().peekable();

		Self {
			source,
			source_iter,
			start: 0,
			cursor: 0,
			line: 1,
			column: 1,
			after_operand: false,
			finished: false,
			string_limit: STRING_SCAN_LIMIT,
		}
	}

	pub fn with_string_limit(mut self, string_limit: usize) -> Self {
		self.string_limit = string_limit;
		self
	}

	/// Scan all tokens from the source code, the last one is always `Eof`.
	pub fn scan_tokens(mut self) -> Vec<Token> {
		let mut tokens = Vec::new();
		loop {
			let token = self.next_token();
			let done = token.r#type == Eof;
			tokens.push(token);
			if done {
				return tokens;
			}
		}
	}

	/// Produce the next token. Once the input is exhausted every call returns `Eof`.
	pub fn next_token(&mut self) -> Token {
		loop {
			let Some(&(index, next_char)) = self.source_iter.peek() else {
				self.finished = true;
				return Token::new(Eof, "", self.line, self.column);
			};
			// We are at the beginning of the next lexeme.
			self.start = index;
			self.cursor = index;
			let (line, column) = (self.line, self.column);

			#[rustfmt::skip]
			let r#type = match next_char {
				c if c.is_whitespace() => { self.advance(); continue; }
				'/' if self.peek_second() == Some('/') => {
					while self.peek().is_some_and(|c| c != '\n') { self.advance(); }
					continue;
				}
				'(' => { self.advance(); LeftParen }
				')' => { self.advance(); RightParen }
				'{' => { self.advance(); LeftBrace }
				'}' => { self.advance(); RightBrace }
				',' => { self.advance(); Comma }
				'+' => { self.advance(); Plus }
				'*' => { self.advance(); Star }
				'/' => { self.advance(); Slash }
				'-' if !self.after_operand && self.peek_second().is_some_and(|c| c.is_ascii_digit() || c == '.') => {
					self.number()
				}
				'-' => { self.advance(); Minus }
				'=' => { self.advance(); if self.match_next('=') { EqualEqual } else { Equal } }
				'>' => { self.advance(); if self.match_next('=') { GreaterEqual } else { Greater } }
				'<' => { self.advance(); if self.match_next('=') { LessEqual } else { Less } }
				'!' if self.peek_second() == Some('=') => { self.advance(); self.advance(); BangEqual }
				':' if self.peek_second() == Some(':') => { self.advance(); self.advance(); ColonColon }
				'"' => {
					self.advance();
					let value = self.string(line);
					return self.emit(Token::new(StringLiteral, value, line, column));
				}
				c if c.is_ascii_digit() || c == '.' => self.number(),
				c if c.is_alphabetic() || c == '_' => self.identifier(),
				c => {
					warn!(line, column, "skipping unexpected character '{c}'");
					self.advance();
					continue;
				}
			};

			let lexeme = &self.source[self.start..self.cursor];
			return self.emit(Token::new(r#type, lexeme, line, column));
		}
	}
}

impl Scanner<'_> {
	fn emit(&mut self, token: Token) -> Token {
		self.after_operand = token.ends_operand();
		token
	}

	/// Match the next character if it is the expected one
	fn match_next(&mut self, expected: char) -> bool {
		matches!(self.peek(), Some(c) if c == expected && { self.advance(); true })
	}

	/// Advance to the next character
	fn advance(&mut self) -> Option<char> {
		let (i, c) = self.source_iter.next()?;
		self.cursor = i + c.len_utf8();
		if c == '\n' {
			self.line += 1;
			self.column = 1;
		} else {
			self.column += 1;
		}
		Some(c)
	}

	/// Peek the current character
	fn peek(&mut self) -> Option<char> { self.source_iter.peek().map(|&(_, c)| c) }

	/// Peek the second character ahead
	fn peek_second(&self) -> Option<char> {
		let mut it = self.source_iter.clone();
		it.next()?;
		it.peek().map(|&(_, c)| c)
	}

	/// Scan a number literal: optional leading `-` or `.`, then digits and dots.
	fn number(&mut self) -> TokenType {
		if matches!(self.peek(), Some('-' | '.')) {
			self.advance();
		}
		while self.peek().is_some_and(|c| c.is_ascii_digit() || c == '.') {
			self.advance();
		}
		Number
	}

	/// Scan an identifier or keyword
	fn identifier(&mut self) -> TokenType {
		while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
			self.advance();
		}
		TokenType::keyword_or_identifier(&self.source[self.start..self.cursor])
	}

	/// Scan the body of a string literal, the opening quote is already consumed.
	fn string(&mut self, line: usize) -> String {
		let mut value = String::new();

		if matches!(self.peek(), Some('\n' | '\r')) {
			self.match_next('\r');
			self.match_next('\n');
			while matches!(self.peek(), Some(' ' | '\t')) {
				self.advance();
			}
		}

		let mut scanned = 0;
		loop {
			if scanned == self.string_limit {
				warn!(line, "string literal exceeds {} characters, terminating it", self.string_limit);
				break;
			}
			scanned += 1;
			match self.peek() {
				None => {
					warn!(line, "unterminated string literal");
					break;
				}
				Some('"') => {
					self.advance();
					if self.quote_closes_string() {
						break;
					}
					value.push('"');
				}
				Some(c) => {
					self.advance();
					value.push(c);
				}
			}
		}

		trim_closing_indentation(&mut value);
		value
	}

	/// Whether a quote that was just consumed ends the literal.
	fn quote_closes_string(&self) -> bool {
		let next = self.source_iter.clone().map(|(_, c)| c).find(|c| !c.is_whitespace());
		match next {
			None => true,
			Some(c) => {
				matches!(c, ')' | ',' | ';' | '}' | '{' | '+' | '-' | '*' | '/' | '<' | '>' | '=' | '!' | ':')
					|| c.is_alphabetic()
					|| c == '_'
			}
		}
	}
}

impl Iterator for Scanner<'_> {
	type Item = Token;

	/// Yields tokens up to and including `Eof`.
	fn next(&mut self) -> Option<Token> {
		if self.finished {
			return None;
		}
		Some(self.next_token())
	}
}

/// Drop a trailing newline plus indentation that precedes the closing quote.
fn trim_closing_indentation(value: &mut String) {
	let trimmed = value.trim_end_matches([' ', '\t']);
	if let Some(without_newline) = trimmed.strip_suffix('\n') {
		let len = without_newline.strip_suffix('\r').unwrap_or(without_newline).len();
		value.truncate(len);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn types(input: &str) -> Vec<TokenType> { Scanner::new(input).scan_tokens().into_iter().map(|t| t.r#type).collect() }

	fn strings(input: &str) -> Vec<String> {
		Scanner::new(input).scan_tokens().into_iter().filter(|t| t.r#type == StringLiteral).map(|t| t.lexeme).collect()
	}

	#[test]
	fn scan_empty() {
		assert_eq!(types(""), vec![Eof]);
		assert_eq!(types("   \n\t "), vec![Eof]);
		assert_eq!(types("// only a comment"), vec![Eof]);
	}

	#[test]
	fn scan_operators() {
		assert_eq!(types("( ) { } , + * / ="), vec![
			LeftParen, RightParen, LeftBrace, RightBrace, Comma, Plus, Star, Slash, Equal, Eof
		]);
		assert_eq!(types("== != > >= < <= ::"), vec![
			EqualEqual, BangEqual, Greater, GreaterEqual, Less, LessEqual, ColonColon, Eof
		]);
	}

	#[test]
	fn scan_keywords() {
		assert_eq!(types("package function print printg println return conect"), vec![
			Package, Function, Print, Printg, Println, Return, Conect, Eof
		]);
		assert_eq!(types("input cout if else from import"), vec![Input, Cout, If, Else, From, Import, Eof]);
		assert_eq!(types("create write read close delete file int float string"), vec![
			Create, Write, Read, Close, Delete, File, IntType, FloatType, StringType, Eof
		]);
		assert_eq!(types("main _name printer x1"), vec![Identifier, Identifier, Identifier, Identifier, Eof]);
	}

	#[test]
	fn scan_numbers() {
		let tokens = Scanner::new("42 3.14 .5").scan_tokens();
		let lexemes: Vec<&str> = tokens.iter().map(|t| t.lexeme.as_str()).collect();
		assert_eq!(lexemes, vec!["42", "3.14", ".5", ""]);
		assert!(tokens[..3].iter().all(|t| t.r#type == Number));

		let tokens = Scanner::new("= -7").scan_tokens();
		assert_eq!(tokens[1].r#type, Number);
		assert_eq!(tokens[1].lexeme, "-7");
	}

	#[test]
	fn minus_after_operand_is_subtraction() {
		assert_eq!(types("5-3"), vec![Number, Minus, Number, Eof]);
		assert_eq!(types("x -1"), vec![Identifier, Minus, Number, Eof]);
		assert_eq!(types("x = -1"), vec![Identifier, Equal, Number, Eof]);
		assert_eq!(types("(-2)"), vec![LeftParen, Number, RightParen, Eof]);
	}

	#[test]
	fn scan_file_operation() {
		assert_eq!(types(r#"write::file("a.txt", x)"#), vec![
			Write, ColonColon, File, LeftParen, StringLiteral, Comma, Identifier, RightParen, Eof
		]);
	}

	#[test]
	fn unexpected_characters_are_skipped() {
		assert_eq!(types("x ; @ ! y"), vec![Identifier, Identifier, Eof]);
		assert_eq!(types("a : b"), vec![Identifier, Identifier, Eof]);
	}

	#[test]
	fn scan_simple_strings() {
		assert_eq!(strings(r#"print("hello world")"#), vec!["hello world"]);
		assert_eq!(strings(r#"print("")"#), vec![""]);
		assert_eq!(strings(r#"x + string = "abc" print(x)"#), vec!["abc"]);
		assert_eq!(strings(r#"if ("abc" < "abd") {"#), vec!["abc", "abd"]);
	}

	#[test]
	fn scan_multiline_string() {
		let source = "print(\"\n    first\n\n    third\n    \")";
		assert_eq!(strings(source), vec!["first\n\n    third"]);
	}

	#[test]
	fn scan_string_with_inner_quotes() {
		assert_eq!(strings(r#"print("say "1" 2 end")"#), vec![r#"say "1" 2 end"#]);
		assert_eq!(strings(r#"print("quote: "" .")"#), vec![r#"quote: "" ."#]);
	}

	#[test]
	fn unterminated_string_ends_at_eof() {
		let tokens = Scanner::new("print(\"never closed\n").scan_tokens();
		assert_eq!(tokens[2].r#type, StringLiteral);
		assert_eq!(tokens[2].lexeme, "never closed");
		assert_eq!(tokens.last().map(|t| t.r#type), Some(Eof));
	}

	#[test]
	fn overlong_string_is_cut_off() {
		let tokens = Scanner::new(r#"x + string = "abcdefghij" print(x)"#).with_string_limit(4).scan_tokens();
		assert_eq!((tokens[3].r#type, tokens[3].lexeme.as_str()), (StringLiteral, "abcd"));
		assert_eq!(tokens.last().map(|t| t.r#type), Some(Eof));

		let long = "a".repeat(STRING_SCAN_LIMIT + 10);
		let tokens = Scanner::new(&format!("\"{long}\"")).scan_tokens();
		assert_eq!(tokens[0].lexeme.len(), STRING_SCAN_LIMIT);
	}

	#[test]
	fn tracks_lines_and_columns() {
		let tokens = Scanner::new("package main\n  x + int = 1").scan_tokens();
		assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
		assert_eq!((tokens[1].line, tokens[1].column), (1, 9));
		assert_eq!((tokens[2].line, tokens[2].column), (2, 3));
		assert_eq!((tokens[5].line, tokens[5].column), (2, 11));
		assert_eq!((tokens[6].line, tokens[6].column), (2, 13));
	}

	#[test]
	fn lines_advance_inside_strings() {
		let tokens = Scanner::new("\"a\nb\" x").scan_tokens();
		assert_eq!(tokens[1].r#type, Identifier);
		assert_eq!(tokens[1].line, 2);
	}

	#[test]
	fn iterator_stops_after_eof() {
		let collected: Vec<Token> = Scanner::new("a b").collect();
		assert_eq!(collected.len(), 3);
		assert_eq!(collected[2].r#type, Eof);
	}
}
