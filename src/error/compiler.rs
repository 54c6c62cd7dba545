use std::fmt;
use super::AsmError;

#[derive(Debug, Clone, PartialEq)]
pub enum CompilerError {
	/// Mnemonic missing from the opcode table
	UnknownOpcode { line: usize, opcode: String },
	Arity {
		line: usize,
		opcode: &'static str,
		expected: usize,
		got: usize,
	},
	/// A destination operand was a numeric literal
	ExpectedRegister { line: usize, token: String },
	/// The operand lexer could not make sense of a slice
	Token { line: usize, slice: String },
	MalformedLabel { line: usize },
}

impl fmt::Display for CompilerError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::UnknownOpcode { line, opcode } => write!(f, "line {}: unknown opcode '{}'", line, opcode),
			Self::Arity { line, opcode, expected, got } => write!(
				f,
				"line {}: '{}' takes {} operand(s), got {}",
				line, opcode, expected, got
			),
			Self::ExpectedRegister { line, token } => {
				write!(f, "line {}: expected a register, got '{}'", line, token)
			}
			Self::Token { line, slice } => write!(f, "line {}: unexpected input '{}'", line, slice),
			Self::MalformedLabel { line } => write!(f, "line {}: malformed label", line),
		}
	}
}

impl std::error::Error for CompilerError {}

impl AsmError for CompilerError {}

macro_rules! compiler_error {
	($e:expr) => {
		return Err($e)
	};
}

pub(crate) use compiler_error;

pub type CompilerResult<O = ()> = Result<O, CompilerError>;
