use std::fmt::Display;

/// A token produced by the scanner
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
	pub r#type: TokenType,
	/// Token text. For string literals this is the processed content without quotes.
	pub lexeme: String,
	pub line:   usize,
	pub column: usize,
}

impl Token {
	pub fn new(r#type: TokenType, lexeme: impl Into<String>, line: usize, column: usize) -> Self {
		Self { r#type, lexeme: lexeme.into(), line, column }
	}

	/// Whether this token can end an operand, used to tell `a -1` from `a - 1`.
	pub fn ends_operand(&self) -> bool {
		matches!(self.r#type, TokenType::Number | TokenType::StringLiteral | TokenType::Identifier | TokenType::Input | TokenType::RightParen)
	}
}

/// The different kinds of tokens in PGT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
	/// Left parenthesis `(`.
	LeftParen,
	/// Right parenthesis `)`.
	RightParen,
	/// Left brace `{`.
	LeftBrace,
	/// Right brace `}`.
	RightBrace,
	/// Comma `,`.
	Comma,
	/// Plus `+`, also the type separator in `name + int`.
	Plus,
	/// Minus `-`.
	Minus,
	/// Asterisk `*`.
	Star,
	/// Slash `/`.
	Slash,
	/// Equal `=`.
	Equal,
	/// Equal equal `==`.
	EqualEqual,
	/// Bang equal `!=`.
	BangEqual,
	/// Greater than `>`.
	Greater,
	/// Greater than or equal `>=`.
	GreaterEqual,
	/// Less than `<`.
	Less,
	/// Less than or equal `<=`.
	LessEqual,
	/// Path separator `::` in `write::file`.
	ColonColon,
	/// Identifier, e.g. variable or function name.
	Identifier,
	/// String literal, e.g. `"hello"`.
	StringLiteral,
	/// Number literal, e.g. `12`, `-3`, `.5`.
	Number,
	Package,
	Function,
	Print,
	/// `print` variant that historically suppressed the newline.
	Printg,
	Println,
	Return,
	/// Call by name.
	Conect,
	/// The default input variable name.
	Input,
	/// Console input statement.
	Cout,
	If,
	Else,
	From,
	Import,
	Create,
	Write,
	Read,
	Close,
	Delete,
	File,
	/// Primitive type `int`.
	IntType,
	/// Primitive type `float`.
	FloatType,
	/// Primitive type `string`.
	StringType,
	/// End of input.
	Eof,
}

impl TokenType {
	pub fn keyword_or_identifier(value: &str) -> Self {
		match value {
			"package" => TokenType::Package,
			"function" => TokenType::Function,
			"print" => TokenType::Print,
			"printg" => TokenType::Printg,
			"println" => TokenType::Println,
			"return" => TokenType::Return,
			"conect" => TokenType::Conect,
			"input" => TokenType::Input,
			"cout" => TokenType::Cout,
			"if" => TokenType::If,
			"else" => TokenType::Else,
			"from" => TokenType::From,
			"import" => TokenType::Import,
			"create" => TokenType::Create,
			"write" => TokenType::Write,
			"read" => TokenType::Read,
			"close" => TokenType::Close,
			"delete" => TokenType::Delete,
			"file" => TokenType::File,
			"int" => TokenType::IntType,
			"float" => TokenType::FloatType,
			"string" => TokenType::StringType,
			_ => TokenType::Identifier,
		}
	}

	pub fn is_print(&self) -> bool { matches!(self, TokenType::Print | TokenType::Printg | TokenType::Println) }

	pub fn is_file_operation(&self) -> bool {
		matches!(self, TokenType::Create | TokenType::Write | TokenType::Read | TokenType::Close | TokenType::Delete)
	}
}

impl Display for TokenType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		use TokenType::*;
		#[rustfmt::skip]
		let text = match self {
			LeftParen => "'('", RightParen => "')'", LeftBrace => "'{'", RightBrace => "'}'",
			Comma => "','", Plus => "'+'", Minus => "'-'", Star => "'*'", Slash => "'/'",
			Equal => "'='", EqualEqual => "'=='", BangEqual => "'!='",
			Greater => "'>'", GreaterEqual => "'>='", Less => "'<'", LessEqual => "'<='",
			ColonColon => "'::'",
			Identifier => "identifier", StringLiteral => "string literal", Number => "number",
			Package => "'package'", Function => "'function'", Print => "'print'", Printg => "'printg'",
			Println => "'println'", Return => "'return'", Conect => "'conect'", Input => "'input'",
			Cout => "'cout'", If => "'if'", Else => "'else'", From => "'from'", Import => "'import'",
			Create => "'create'", Write => "'write'", Read => "'read'", Close => "'close'",
			Delete => "'delete'", File => "'file'", IntType => "'int'", FloatType => "'float'", StringType => "'string'",
			Eof => "end of input",
		};
		f.write_str(text)
	}
}
