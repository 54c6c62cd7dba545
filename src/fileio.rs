use crate::{error::fileio::*, Program, ASMVM_VER};

const ASMVMPROGRAM: &'static str = "ASMVMPROGRAM\n";
const PROGEND: &'static str = "\nPROGEND";

/// Encode a compiled program as a versioned image
pub fn ser(program: &Program) -> FileIOResult<Vec<u8>> {
	let mut output = vec![];
	output.extend(format!("{}{}\n", ASMVMPROGRAM, ASMVM_VER).as_bytes()); // Program header
	let body = bincode::serialize(program).map_err(|e| FileIOError::Encode(e.to_string()))?;
	output.extend(body);
	output.extend(PROGEND.as_bytes()); // Indicate end of program
	Ok(output)
}

pub fn de(input: &[u8]) -> FileIOResult<Program> {
	let mut input = input;

	consume(&mut input, ASMVMPROGRAM, MalformedHeaderError::AsmProgramDecl)?;

	let newline = input
		.iter()
		.position(|b| *b == b'\n')
		.ok_or(FileIOError::MalformedHeader(MalformedHeaderError::Version))?;
	let version = String::from_utf8_lossy(&input[..newline]).to_string();
	if version != ASMVM_VER {
		return Err(FileIOError::VersionMismatch(version))
	}
	input = &input[newline + 1..];

	// Advances `input` past the decoded program
	let program: Program = bincode::deserialize_from(&mut input)
		.map_err(|e| FileIOError::Decode(e.to_string()))?;

	consume(&mut input, PROGEND, MalformedHeaderError::ProgEnd)?;

	// Labels hold the index before their target, so -1 is the lowest valid one
	let len = program.len() as isize;
	if let Some((label, ip)) = program.labels.iter().find(|(_, ip)| !(-1..len).contains(*ip)) {
		return Err(FileIOError::LabelOutOfRange(label.clone(), *ip))
	}
	Ok(program)
}

fn consume(input: &mut &[u8], expected: &str, kind: MalformedHeaderError) -> FileIOResult<()> {
	match input.strip_prefix(expected.as_bytes()) {
		Some(rest) => {
			*input = rest;
			Ok(())
		}
		None => Err(FileIOError::MalformedHeader(kind)),
	}
}
