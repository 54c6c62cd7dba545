use std::fmt;
use super::AsmError;

#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeError {
    /// A register was read before anything was written to it
    UninitializedRegister(String),
    UnknownLabel(String),
    /// `ret` with an empty call stack
    StackUnderflow,
    DivisionByZero,
    /// A conditional jump ran before any `cmp`
    NoComparison,
    StepLimitExceeded(u64),
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UninitializedRegister(r) => write!(f, "register '{}' read before it was set", r),
            Self::UnknownLabel(l) => write!(f, "unknown label '{}'", l),
            Self::StackUnderflow => write!(f, "ret with an empty call stack"),
            Self::DivisionByZero => write!(f, "division by zero"),
            Self::NoComparison => write!(f, "conditional jump without a preceding cmp"),
            Self::StepLimitExceeded(n) => write!(f, "step limit of {} instructions exceeded", n),
        }
    }
}

impl std::error::Error for RuntimeError {}

impl AsmError for RuntimeError {}

macro_rules! runtime_error {
    ($e:expr) => {
        return Err($e)
    };
}

pub(crate) use runtime_error;

pub type RuntimeResult<T = ()> = Result<T, RuntimeError>;

#[test]
fn runtime_error_only_returns() {
    fn underflow() -> RuntimeResult<isize> {
        runtime_error!(RuntimeError::StackUnderflow)
    }
    assert_eq!(underflow(), Err(RuntimeError::StackUnderflow));
}
