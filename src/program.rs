use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::Instruction;

/// Output of the compiler. Never mutated while it runs.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
	pub instructions: Vec<Instruction>,
	/// Label name to the index of the instruction *before* the label, `-1` at the top.
	pub labels: HashMap<String, isize>,
}

impl Program {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.instructions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.instructions.is_empty()
	}

	pub fn label(&self, name: &str) -> Option<isize> {
		self.labels.get(name).copied()
	}

	/// Instruction at `ip`, or `None` once the pointer has left the program.
	pub fn fetch(&self, ip: isize) -> Option<&Instruction> {
		usize::try_from(ip).ok().and_then(|idx| self.instructions.get(idx))
	}
}

#[test]
fn fetch_out_of_bounds() {
	let program = Program {
		instructions: vec![Instruction::End],
		..Default::default()
	};
	assert_eq!(program.fetch(0), Some(&Instruction::End));
	assert_eq!(program.fetch(1), None);
	assert_eq!(program.fetch(-1), None);
}
