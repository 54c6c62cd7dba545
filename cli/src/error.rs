use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum CLIError {
	ExternalError(String, String),
	UnkownArgument(String),
	InsufficientArguments,
	InvalidLimit(String),
	NotFound(String),
}

impl fmt::Display for CLIError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::ExternalError(kind, why) => write!(f, "{}: {}", kind, why),
			Self::UnkownArgument(arg) => write!(f, "unknown argument '{}'", arg),
			Self::InsufficientArguments => write!(f, "usage: asmvm <run|build|exec> <file> [--trace] [--limit N | --no-limit]"),
			Self::InvalidLimit(arg) => write!(f, "'{}' is not a valid step limit", arg),
			Self::NotFound(file) => write!(f, "{} not found", file),
		}
	}
}

/// Wrap any library error, keeping its type name for the report
pub fn external<E: asmvm::AsmError>(kind: &str, e: E) -> CLIError {
	CLIError::ExternalError(kind.into(), e.to_string())
}

pub type CLIResult<O=()> = Result<O, CLIError>;
