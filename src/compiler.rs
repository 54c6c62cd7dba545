use std::collections::HashMap;

use logos::Logos;

use crate::{
    error::compiler::*,
    instruction::{Instruction, MsgPart, Opcode, Operand},
    scanner::{Line, TokenKind},
    Program,
};

/// An operand as written, before it is given a role by its opcode.
#[derive(Clone, Debug, PartialEq)]
enum Arg {
    Text(String),
    Word(String),
}

#[derive(Debug, Default, Clone)]
pub struct Compiler {
    pub instructions: Vec<Instruction>,
    pub labels: HashMap<String, isize>,
    /// Source line currently being compiled, for error reports
    line: usize,
}

impl Compiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode every line, appending instructions and recording labels
    pub fn compile(&mut self, lines: &[Line<'_>]) -> CompilerResult {
        for line in lines {
            self.line(line)?;
        }
        Ok(())
    }

    pub fn finish(self) -> Program {
        Program {
            instructions: self.instructions,
            labels: self.labels,
        }
    }

    fn line(&mut self, line: &Line<'_>) -> CompilerResult {
        self.line = line.number;
        // Split on the first whitespace run only, `msg` literals keep their spaces
        let (head, rest) = match line.text.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line.text, ""),
        };

        if let Some(name) = head.strip_suffix(':') {
            return self.declare_label(name, rest);
        }
        let instruction = self.decode(head, rest)?;
        self.emit(instruction);
        Ok(())
    }

    /// Bind `name` to the index of the last instruction emitted so far.
    /// The runtime bumps the pointer after every jump, so execution resumes
    /// at the first instruction following the label.
    pub(crate) fn declare_label(&mut self, name: &str, rest: &str) -> CompilerResult {
        if name.is_empty() || !rest.is_empty() {
            compiler_error!(CompilerError::MalformedLabel { line: self.line })
        }
        // Redeclaring a label overwrites the earlier one
        self.labels
            .insert(name.to_string(), self.instructions.len() as isize - 1);
        Ok(())
    }

    pub(crate) fn emit(&mut self, instruction: Instruction) {
        self.instructions.push(instruction)
    }

    /// Turn a mnemonic and its operand string into an [Instruction]
    pub(crate) fn decode(&self, mnemonic: &str, rest: &str) -> CompilerResult<Instruction> {
        let opcode = match Opcode::lookup(mnemonic) {
            Some(op) => op,
            None => compiler_error!(CompilerError::UnknownOpcode {
                line: self.line,
                opcode: mnemonic.to_string(),
            }),
        };
        let args = self.arguments(rest)?;
        if let Some(expected) = opcode.arity() {
            if args.len() != expected {
                compiler_error!(CompilerError::Arity {
                    line: self.line,
                    opcode: opcode.mnemonic(),
                    expected,
                    got: args.len(),
                })
            }
        }

        Ok(match opcode {
            Opcode::Mov => Instruction::Mov(self.register(&args[0])?, self.operand(&args[1])?),
            Opcode::Inc => Instruction::Inc(self.register(&args[0])?),
            Opcode::Dec => Instruction::Dec(self.register(&args[0])?),
            Opcode::Arith(op) => {
                Instruction::Arith(op, self.register(&args[0])?, self.operand(&args[1])?)
            }
            Opcode::Cmp => Instruction::Cmp(self.operand(&args[0])?, self.operand(&args[1])?),
            Opcode::Jmp => Instruction::Jmp(self.word(&args[0])?),
            Opcode::Jump(cond) => Instruction::Jump(cond, self.word(&args[0])?),
            Opcode::Call => Instruction::Call(self.word(&args[0])?),
            Opcode::Ret => Instruction::Ret,
            Opcode::End => Instruction::End,
            Opcode::Msg => Instruction::Msg(
                args.into_iter()
                    .map(|arg| match arg {
                        Arg::Text(text) => MsgPart::Text(text),
                        Arg::Word(word) => MsgPart::Value(Operand::classify(&word)),
                    })
                    .collect(),
            ),
        })
    }

    /// Split a comma separated operand list. Commas inside quoted literals
    /// are part of the literal.
    fn arguments(&self, rest: &str) -> CompilerResult<Vec<Arg>> {
        let mut lexer = TokenKind::lexer(rest);
        let mut args = vec![];
        let mut expect_arg = true;
        while let Some(token) = lexer.next() {
            match (token, expect_arg) {
                (TokenKind::Comma, false) => expect_arg = true,
                (TokenKind::Text(text), true) => {
                    args.push(Arg::Text(text));
                    expect_arg = false;
                }
                (TokenKind::Word, true) => {
                    args.push(Arg::Word(lexer.slice().to_string()));
                    expect_arg = false;
                }
                _ => compiler_error!(CompilerError::Token {
                    line: self.line,
                    slice: lexer.slice().to_string(),
                }),
            }
        }
        // Dangling comma
        if expect_arg && !args.is_empty() {
            compiler_error!(CompilerError::Token {
                line: self.line,
                slice: ",".into(),
            })
        }
        Ok(args)
    }

    fn word(&self, arg: &Arg) -> CompilerResult<String> {
        match arg {
            Arg::Word(w) => Ok(w.clone()),
            Arg::Text(t) => compiler_error!(CompilerError::Token {
                line: self.line,
                slice: format!("'{}'", t),
            }),
        }
    }

    fn operand(&self, arg: &Arg) -> CompilerResult<Operand> {
        Ok(Operand::classify(&self.word(arg)?))
    }

    /// An operand that must name a register, i.e. a write destination
    fn register(&self, arg: &Arg) -> CompilerResult<String> {
        match self.operand(arg)? {
            Operand::Register(r) => Ok(r),
            Operand::Literal(n) => compiler_error!(CompilerError::ExpectedRegister {
                line: self.line,
                token: n.to_string(),
            }),
        }
    }
}
