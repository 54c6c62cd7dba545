mod error;
use error::*;
use std::{env::Args, fs::{OpenOptions, read, read_to_string}, io::{ErrorKind, Write}, process};
use colored::Colorize;
use asmvm::{fileio, Config, Outcome, Program, Runtime};

fn main() {
	match cli() {
		Ok(Some(outcome)) => match outcome.output() {
			Some(output) => println!("{}", output),
			None => {
				println!("{}", Outcome::SENTINEL);
				process::exit(2)
			}
		},
		// `build` has nothing to print
		Ok(None) => {}
		Err(e) => {
			eprintln!("{} {}", "error:".red().bold(), e);
			process::exit(1)
		}
	}
}

/// Run the requested command, `None` when there is no program outcome to report
fn cli() -> CLIResult<Option<Outcome>> {
	let mut args = std::env::args();
	args.next(); // Ignore program name
	let command = args.next().ok_or(CLIError::InsufficientArguments)?;
	let file = args.next().ok_or(CLIError::InsufficientArguments)?;
	match command.as_str() {
		"run" => {
			let config = config(args)?;
			let source = read_source(&file)?;
			asmvm::interpret_with(&source, config)
				.map(Some)
				.map_err(|e| external("InterpretError", e))
		}
		"build" => {
			let source = read_source(&file)?;
			let program = asmvm::compile_source(&source).map_err(|e| external("CompilerError", e))?;
			let image = fileio::ser(&program).map_err(|e| external("FileIOError", e))?;
			let (save_as, _) = file.rsplit_once(".").unwrap_or((file.as_str(), ""));
			let save_as = format!("{}.asmc", save_as);
			let mut out = OpenOptions::new()
				.write(true)
				.truncate(true)
				.create(true)
				.open(&save_as)
				.map_err(io_error)?;
			out.write_all(&image).map_err(io_error)?;
			eprintln!("{} {} ({} instructions)", "wrote".green(), save_as, program.len());
			Ok(None)
		}
		"exec" => {
			let config = config(args)?;
			let image = match read(&file) {
				Ok(b) => b,
				Err(e) if e.kind() == ErrorKind::NotFound => return Err(CLIError::NotFound(file)),
				Err(e) => return Err(io_error(e)),
			};
			let program: Program = fileio::de(&image).map_err(|e| external("FileIOError", e))?;
			let mut runtime = Runtime::new(program, config);
			runtime.exec().map(Some).map_err(|e| external("RuntimeError", e))
		}
		_ => Err(CLIError::UnkownArgument(command)),
	}
}

/// Parse the trailing run flags
fn config(mut args: Args) -> CLIResult<Config> {
	let mut config = Config::default();
	while let Some(arg) = args.next() {
		match arg.as_str() {
			"--trace" => config = config.with_trace(true),
			"--no-limit" => config = config.with_step_limit(None),
			"--limit" => {
				let n = args.next().ok_or(CLIError::InsufficientArguments)?;
				let limit = n.parse::<u64>().map_err(|_| CLIError::InvalidLimit(n))?;
				config = config.with_step_limit(Some(limit));
			}
			_ => return Err(CLIError::UnkownArgument(arg)),
		}
	}
	Ok(config)
}

fn read_source(file: &str) -> CLIResult<String> {
	match read_to_string(file) {
		Ok(s) => Ok(s),
		Err(e) => match e.kind() {
			ErrorKind::NotFound => Err(CLIError::NotFound(file.to_string())),
			_ => Err(io_error(e)),
		},
	}
}

fn io_error(e: std::io::Error) -> CLIError {
	CLIError::ExternalError("io::Error".into(), e.to_string())
}
