use std::fmt;

pub mod compiler;
pub mod fileio;
pub mod runtime;

use compiler::CompilerError;
use runtime::RuntimeError;

/// Marker implemented by every error the crate hands back to callers.
pub trait AsmError: fmt::Debug + fmt::Display {}

/// Failure of a whole compile-and-run call.
#[derive(Debug, Clone, PartialEq)]
pub enum InterpretError {
    Compiler(CompilerError),
    Runtime(RuntimeError),
}

impl From<CompilerError> for InterpretError {
    fn from(e: CompilerError) -> Self {
        Self::Compiler(e)
    }
}

impl From<RuntimeError> for InterpretError {
    fn from(e: RuntimeError) -> Self {
        Self::Runtime(e)
    }
}

impl fmt::Display for InterpretError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compiler(e) => write!(f, "compile error: {}", e),
            Self::Runtime(e) => write!(f, "runtime error: {}", e),
        }
    }
}

impl std::error::Error for InterpretError {}

impl AsmError for InterpretError {}

pub type InterpretResult<O> = Result<O, InterpretError>;
