mod compiler;
mod config;
mod error;
mod program;
mod runtime;
pub mod fileio;
pub mod instruction;
pub mod scanner;

pub use compiler::Compiler;
pub use config::{Config, DEFAULT_STEP_LIMIT};
pub use error::{
    compiler::{CompilerError, CompilerResult},
    fileio::{FileIOError, FileIOResult, MalformedHeaderError},
    runtime::{RuntimeError, RuntimeResult},
    AsmError, InterpretError, InterpretResult,
};
pub use instruction::Instruction;
pub use program::Program;
pub use runtime::{floor_div, Outcome, Registers, Runtime};

pub const ASMVM_VER: &str = env!("CARGO_PKG_VERSION");

/// Clean `source` and compile it without running it
pub fn compile_source(source: &str) -> CompilerResult<Program> {
    let mut compiler = Compiler::new();
    compiler.compile(&scanner::lines(source))?;
    Ok(compiler.finish())
}

/// Compile and run `source` with the default [Config]
pub fn interpret(source: &str) -> InterpretResult<Outcome> {
    interpret_with(source, Config::default())
}

pub fn interpret_with(source: &str, config: Config) -> InterpretResult<Outcome> {
    let program = compile_source(source)?;
    let mut runtime = Runtime::new(program, config);
    Ok(runtime.exec()?)
}
