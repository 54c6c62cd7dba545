/*
    R(x): value of register `x`
    V(x): R(x) if `x` is a register, x itself if it is a literal
    IP  : instruction pointer
    L(l): index stored for label `l`
    CMP : last comparison pair (x, y)
*/
use std::{collections::HashMap, fmt};

use lazy_static::lazy_static;
use maplit::hashmap;
use serde::{Deserialize, Serialize};

/// A register name or a numeric literal, interchangeable in any source position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operand {
    Literal(i64),
    Register(String),
}

impl Operand {
    /// Anything that parses as a number is a literal, everything else names a register.
    pub fn classify(token: &str) -> Self {
        match token.parse::<i64>() {
            Ok(n) => Self::Literal(n),
            Err(_) => Self::Register(token.to_string()),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(n) => write!(f, "{}", n),
            Self::Register(r) => write!(f, "{}", r),
        }
    }
}

/// One piece of a `msg` template.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MsgPart {
    Text(String),
    Value(Operand),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl Condition {
    pub fn holds(self, x: i64, y: i64) -> bool {
        match self {
            Self::Eq => x == y,
            Self::Ne => x != y,
            Self::Gt => x > y,
            Self::Ge => x >= y,
            Self::Lt => x < y,
            Self::Le => x <= y,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

/// Opcode mnemonics, before their operands are decoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Opcode {
    Mov,
    Inc,
    Dec,
    Arith(ArithOp),
    Cmp,
    Jmp,
    Jump(Condition),
    Call,
    Ret,
    Msg,
    End,
}

lazy_static! {
    static ref OPCODES: HashMap<&'static str, Opcode> = hashmap! {
        "mov" => Opcode::Mov,
        "inc" => Opcode::Inc,
        "dec" => Opcode::Dec,
        "add" => Opcode::Arith(ArithOp::Add),
        "sub" => Opcode::Arith(ArithOp::Sub),
        "mul" => Opcode::Arith(ArithOp::Mul),
        "div" => Opcode::Arith(ArithOp::Div),
        "cmp" => Opcode::Cmp,
        "jmp" => Opcode::Jmp,
        "je" => Opcode::Jump(Condition::Eq),
        "jne" => Opcode::Jump(Condition::Ne),
        "jg" => Opcode::Jump(Condition::Gt),
        "jge" => Opcode::Jump(Condition::Ge),
        "jl" => Opcode::Jump(Condition::Lt),
        "jle" => Opcode::Jump(Condition::Le),
        "call" => Opcode::Call,
        "ret" => Opcode::Ret,
        "msg" => Opcode::Msg,
        "end" => Opcode::End,
    };
}

impl Opcode {
    pub fn lookup(mnemonic: &str) -> Option<Self> {
        OPCODES.get(mnemonic).copied()
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::Mov => "mov",
            Self::Inc => "inc",
            Self::Dec => "dec",
            Self::Arith(ArithOp::Add) => "add",
            Self::Arith(ArithOp::Sub) => "sub",
            Self::Arith(ArithOp::Mul) => "mul",
            Self::Arith(ArithOp::Div) => "div",
            Self::Cmp => "cmp",
            Self::Jmp => "jmp",
            Self::Jump(Condition::Eq) => "je",
            Self::Jump(Condition::Ne) => "jne",
            Self::Jump(Condition::Gt) => "jg",
            Self::Jump(Condition::Ge) => "jge",
            Self::Jump(Condition::Lt) => "jl",
            Self::Jump(Condition::Le) => "jle",
            Self::Call => "call",
            Self::Ret => "ret",
            Self::Msg => "msg",
            Self::End => "end",
        }
    }

    /// Number of operands, `None` for the variadic `msg`.
    pub fn arity(self) -> Option<usize> {
        match self {
            Self::Ret | Self::End => Some(0),
            Self::Inc | Self::Dec | Self::Jmp | Self::Jump(_) | Self::Call => Some(1),
            Self::Mov | Self::Arith(_) | Self::Cmp => Some(2),
            Self::Msg => None,
        }
    }
}

/// A decoded instruction. Operands are parsed once, at compile time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
    Mov(String, Operand),                // R(a) = V(b)
    Inc(String),                         // R(a) = R(a) + 1
    Dec(String),                         // R(a) = R(a) - 1
    Arith(ArithOp, String, Operand),     // R(a) = R(a) op V(b), div floors
    Cmp(Operand, Operand),               // CMP = (V(a), V(b))
    Jmp(String),                         // IP = L(l)
    Jump(Condition, String),             // if CMP satisfies cond then IP = L(l)
    Call(String),                        // push IP; IP = L(l)
    Ret,                                 // IP = pop
    Msg(Vec<MsgPart>),                   // output = concat of parts
    End,                                 // halt
}

impl Instruction {
    pub fn opcode(&self) -> Opcode {
        match self {
            Self::Mov(..) => Opcode::Mov,
            Self::Inc(_) => Opcode::Inc,
            Self::Dec(_) => Opcode::Dec,
            Self::Arith(op, ..) => Opcode::Arith(*op),
            Self::Cmp(..) => Opcode::Cmp,
            Self::Jmp(_) => Opcode::Jmp,
            Self::Jump(cond, _) => Opcode::Jump(*cond),
            Self::Call(_) => Opcode::Call,
            Self::Ret => Opcode::Ret,
            Self::Msg(_) => Opcode::Msg,
            Self::End => Opcode::End,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = self.opcode().mnemonic();
        match self {
            Self::Mov(r, v) | Self::Arith(_, r, v) => write!(f, "{} {}, {}", op, r, v),
            Self::Inc(r) | Self::Dec(r) => write!(f, "{} {}", op, r),
            Self::Cmp(a, b) => write!(f, "{} {}, {}", op, a, b),
            Self::Jmp(l) | Self::Jump(_, l) | Self::Call(l) => write!(f, "{} {}", op, l),
            Self::Ret | Self::End => write!(f, "{}", op),
            Self::Msg(parts) => {
                let parts = parts
                    .iter()
                    .map(|p| match p {
                        MsgPart::Text(t) => format!("'{}'", t),
                        MsgPart::Value(v) => v.to_string(),
                    })
                    .collect::<Vec<_>>();
                write!(f, "{} {}", op, parts.join(", "))
            }
        }
    }
}
