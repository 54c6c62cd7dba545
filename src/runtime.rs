/*
    # Virtual Machine
    A compiled [Program] is executed by a fetch-execute loop. Each step fetches the instruction at
    the pointer, executes it, then bumps the pointer by one, jumps included. Jumps therefore land
    on the index *before* their target, which is what the compiler stores for every label.

    ## Termination
    `end` sets the halt flag and the loop returns the output buffer. A pointer outside the program
    ends the run with [Outcome::Runoff]. Everything else that goes wrong is a [RuntimeError].
*/

use std::rc::Rc;

use colored::Colorize;

use crate::{
    error::runtime::*,
    instruction::{ArithOp, Instruction, MsgPart, Operand},
    Config, Program,
};

mod state;
pub use state::*;

pub struct Runtime {
    pub program: Rc<Program>,
    pub config: Config,
    pub registers: Registers,
    /// Operands of the last `cmp`
    pub cmp: Option<(i64, i64)>,
    pub stack: Vec<isize>,
    pub ip: isize,
    pub end: bool,
    pub output: String,
    /// Instructions executed so far
    pub steps: u64,
}

impl Runtime {
    pub fn new(program: Program, config: Config) -> Self {
        Self {
            program: Rc::new(program),
            config,
            registers: Registers::default(),
            cmp: None,
            stack: vec![],
            ip: 0,
            end: false,
            output: String::new(),
            steps: 0,
        }
    }

    pub fn exec(&mut self) -> RuntimeResult<Outcome> {
        let program = Rc::clone(&self.program);
        while !self.end {
            let instruction = match program.fetch(self.ip) {
                Some(i) => i,
                None => return Ok(Outcome::Runoff),
            };
            if let Some(limit) = self.config.step_limit {
                if self.steps >= limit {
                    runtime_error!(RuntimeError::StepLimitExceeded(limit))
                }
            }
            if self.config.trace {
                eprintln!("{}", format!("{:>5} | {}", self.ip, instruction).as_str().dimmed());
            }
            self.execute(instruction)?;
            self.steps += 1;
            // A pointer that cannot advance has left the program
            self.ip = match self.ip.checked_add(1) {
                Some(ip) => ip,
                None => return Ok(Outcome::Runoff),
            };
        }
        Ok(Outcome::Halted(self.output.clone()))
    }

    /// Apply a single instruction to the machine state
    pub fn execute(&mut self, instruction: &Instruction) -> RuntimeResult {
        match instruction {
            Instruction::Mov(r, v) => {
                let v = self.value(v)?;
                self.set_reg(r, v);
            }
            Instruction::Inc(r) => {
                let v = self.get_reg(r)?;
                self.set_reg(r, v.wrapping_add(1));
            }
            Instruction::Dec(r) => {
                let v = self.get_reg(r)?;
                self.set_reg(r, v.wrapping_sub(1));
            }
            Instruction::Arith(op, r, v) => {
                let lhs = self.get_reg(r)?;
                let rhs = self.value(v)?;
                self.set_reg(r, arith(*op, lhs, rhs)?);
            }
            Instruction::Cmp(a, b) => {
                let x = self.value(a)?;
                let y = self.value(b)?;
                self.set_cmp(x, y);
            }
            Instruction::Jmp(label) => {
                let to = self.label(label)?;
                self.set_pointer(to);
            }
            Instruction::Jump(cond, label) => {
                let (x, y) = self.get_cmp()?;
                if cond.holds(x, y) {
                    let to = self.label(label)?;
                    self.set_pointer(to);
                }
            }
            Instruction::Call(label) => {
                let to = self.label(label)?;
                self.push_pointer(to);
            }
            Instruction::Ret => {
                let to = self.pop_pointer()?;
                self.set_pointer(to);
            }
            Instruction::Msg(parts) => {
                let mut message = String::new();
                for part in parts {
                    match part {
                        MsgPart::Text(text) => message.push_str(text),
                        MsgPart::Value(v) => message.push_str(&self.value(v)?.to_string()),
                    }
                }
                self.set_output(message);
            }
            Instruction::End => self.set_end(),
        }
        Ok(())
    }

    /// Resolve a literal-or-register operand
    fn value(&self, operand: &Operand) -> RuntimeResult<i64> {
        match operand {
            Operand::Literal(n) => Ok(*n),
            Operand::Register(r) => self.get_reg(r),
        }
    }

    pub fn get_reg(&self, register: &str) -> RuntimeResult<i64> {
        self.registers.get(register)
    }

    pub fn set_reg(&mut self, register: &str, value: i64) {
        self.registers.set(register, value)
    }

    pub fn set_cmp(&mut self, x: i64, y: i64) {
        self.cmp = Some((x, y));
    }

    pub fn get_cmp(&self) -> RuntimeResult<(i64, i64)> {
        match self.cmp {
            Some(pair) => Ok(pair),
            None => runtime_error!(RuntimeError::NoComparison),
        }
    }

    pub fn set_output(&mut self, output: String) {
        self.output = output;
    }

    pub fn set_pointer(&mut self, ip: isize) {
        self.ip = ip;
    }

    /// Save the current pointer and move to `ip`
    pub fn push_pointer(&mut self, ip: isize) {
        self.stack.push(self.ip);
        self.ip = ip;
    }

    pub fn pop_pointer(&mut self) -> RuntimeResult<isize> {
        match self.stack.pop() {
            Some(ip) => Ok(ip),
            None => runtime_error!(RuntimeError::StackUnderflow),
        }
    }

    pub fn label(&self, name: &str) -> RuntimeResult<isize> {
        match self.program.label(name) {
            Some(ip) => Ok(ip),
            None => runtime_error!(RuntimeError::UnknownLabel(name.to_string())),
        }
    }

    pub fn set_end(&mut self) {
        self.end = true;
    }
}

fn arith(op: ArithOp, lhs: i64, rhs: i64) -> RuntimeResult<i64> {
    Ok(match op {
        ArithOp::Add => lhs.wrapping_add(rhs),
        ArithOp::Sub => lhs.wrapping_sub(rhs),
        ArithOp::Mul => lhs.wrapping_mul(rhs),
        ArithOp::Div => floor_div(lhs, rhs)?,
    })
}

/// Integer division rounding toward negative infinity
pub fn floor_div(lhs: i64, rhs: i64) -> RuntimeResult<i64> {
    if rhs == 0 {
        runtime_error!(RuntimeError::DivisionByZero)
    }
    let quotient = lhs.wrapping_div(rhs);
    if lhs.wrapping_rem(rhs) != 0 && ((lhs < 0) != (rhs < 0)) {
        Ok(quotient - 1)
    } else {
        Ok(quotient)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{compile_source, instruction::Condition};
    use maplit::hashmap;

    pub(crate) mod util {
        use super::*;

        pub fn runtime(source: &str) -> Runtime {
            Runtime::new(compile_source(source).unwrap(), Config::default())
        }

        /// Run to completion and hand back the machine for inspection
        pub fn run(source: &str) -> (RuntimeResult<Outcome>, Runtime) {
            let mut runtime = runtime(source);
            let outcome = runtime.exec();
            (outcome, runtime)
        }

        pub fn registers(map: std::collections::HashMap<&str, i64>) -> Registers {
            map.into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect::<std::collections::HashMap<_, _>>()
                .into()
        }

        #[macro_export]
        macro_rules! arith_test {
            ($op:literal, $x:expr, $y:expr, $expected:expr) => {
                let source = format!("mov a, {}\n{} a, {}\nend", $x, $op, $y);
                let (outcome, runtime) = util::run(&source);
                assert_eq!(outcome, Ok(Outcome::Halted(String::new())));
                assert_eq!(runtime.registers, util::registers(hashmap! { "a" => $expected }));
            };
        }

        #[macro_export]
        macro_rules! jump_test {
            ($op:literal, $x:expr, $y:expr) => {{
                let source = format!(
                    "cmp {}, {}\n{} yes\nmsg 'no'\nend\nyes:\nmsg 'yes'\nend",
                    $x, $y, $op
                );
                let (outcome, _) = util::run(&source);
                outcome.unwrap() == Outcome::Halted("yes".into())
            }};
        }
    }

    use crate::{arith_test, jump_test};
    use util::*;

    #[test]
    fn add() {
        arith_test!("add", 5, 3, 8);
        arith_test!("add", -5, 3, -2);
    }

    #[test]
    fn sub() {
        arith_test!("sub", 5, 8, -3);
    }

    #[test]
    fn mul() {
        arith_test!("mul", -4, 6, -24);
    }

    #[test]
    fn div_floors() {
        arith_test!("div", -7, 2, -4);
        arith_test!("div", 7, -2, -4);
        arith_test!("div", -7, -2, 3);
        arith_test!("div", 7, 2, 3);
        arith_test!("div", -8, 2, -4);
    }

    #[test]
    fn floor_div_direct() {
        assert_eq!(floor_div(-1, 3), Ok(-1));
        assert_eq!(floor_div(0, -3), Ok(0));
        assert_eq!(floor_div(1, 0), Err(RuntimeError::DivisionByZero));
    }

    #[test]
    fn div_by_zero_register() {
        let (outcome, _) = run("mov a, 1\nmov b, 0\ndiv a, b\nend");
        assert_eq!(outcome, Err(RuntimeError::DivisionByZero));
    }

    #[test]
    fn mov_inc_dec() {
        let (outcome, runtime) = run("mov a, 2\nmov b, a\ninc a\ndec b\ndec b\nend");
        assert!(outcome.is_ok());
        assert_eq!(runtime.registers, registers(hashmap! { "a" => 3, "b" => 0 }));
    }

    #[test]
    fn cmp_stores_pair() {
        let (_, runtime) = run("mov x, 4\ncmp x, 9\nend");
        assert_eq!(runtime.cmp, Some((4, 9)));
    }

    #[test]
    fn conditional_jumps() {
        assert!(jump_test!("je", 3, 3));
        assert!(!jump_test!("je", 3, 4));
        assert!(jump_test!("jne", 3, 4));
        assert!(!jump_test!("jne", 3, 3));
        assert!(jump_test!("jg", 4, 3));
        assert!(!jump_test!("jg", 3, 3));
        assert!(jump_test!("jge", 3, 3));
        assert!(!jump_test!("jge", 2, 3));
        assert!(jump_test!("jl", -1, 0));
        assert!(!jump_test!("jl", 0, 0));
        assert!(jump_test!("jle", 0, 0));
        assert!(!jump_test!("jle", 1, 0));
    }

    #[test]
    fn complementary_jumps_exclusive() {
        for (x, y) in [(1, 2), (2, 1), (5, 5)] {
            assert_ne!(jump_test!("jg", x, y), jump_test!("jle", x, y));
            assert_ne!(jump_test!("jl", x, y), jump_test!("jge", x, y));
            assert_ne!(jump_test!("je", x, y), jump_test!("jne", x, y));
        }
    }

    #[test]
    fn jump_to_top_label() {
        // `top` resolves to -1 so the jump resumes at instruction 0
        let (outcome, runtime) = run("top:\ninc n\ncmp n, 3\njl top\nend");
        assert_eq!(outcome, Err(RuntimeError::UninitializedRegister("n".into())));
        assert_eq!(runtime.ip, 0);

        let (outcome, runtime) = run("mov n, 0\ntop:\ninc n\ncmp n, 3\njl top\nend");
        assert!(outcome.is_ok());
        assert_eq!(runtime.registers, registers(hashmap! { "n" => 3 }));
    }

    #[test]
    fn last_msg_wins() {
        let (outcome, _) = run("msg 'first'\nmsg 'second'\nend\nmsg 'unreachable'");
        assert_eq!(outcome, Ok(Outcome::Halted("second".into())));
    }

    #[test]
    fn end_without_msg() {
        assert_eq!(run("end").0, Ok(Outcome::Halted(String::new())));
    }

    #[test]
    fn msg_concatenation() {
        let (outcome, _) = run("mov a, 6\nmsg 'Result: ', a\nend");
        assert_eq!(outcome, Ok(Outcome::Halted("Result: 6".into())));
        let (outcome, _) = run("mov a, -2\nmsg a, 'x', 7, ' y '\nend");
        assert_eq!(outcome, Ok(Outcome::Halted("-2x7 y ".into())));
    }

    #[test]
    fn runoff() {
        let (outcome, runtime) = run("mov a, 1\ninc a");
        assert_eq!(outcome, Ok(Outcome::Runoff));
        assert_eq!(outcome.unwrap().to_string(), "-1");
        assert_eq!(runtime.ip, 2);
        assert_eq!(run("").0, Ok(Outcome::Runoff));
    }

    #[test]
    fn uninitialized_register() {
        assert_eq!(
            run("add a, 1\nend").0,
            Err(RuntimeError::UninitializedRegister("a".into()))
        );
        assert_eq!(
            run("mov a, 1\nmsg a, b\nend").0,
            Err(RuntimeError::UninitializedRegister("b".into()))
        );
    }

    #[test]
    fn unknown_label() {
        assert_eq!(run("jmp nowhere\nend").0, Err(RuntimeError::UnknownLabel("nowhere".into())));
        // Untaken jumps never resolve their label
        assert!(run("cmp 1, 2\nje nowhere\nend").0.is_ok());
    }

    #[test]
    fn call_unknown_label() {
        let (outcome, runtime) = run("call missing\nend");
        assert_eq!(outcome, Err(RuntimeError::UnknownLabel("missing".into())));
        assert!(runtime.stack.is_empty());
    }

    #[test]
    fn pointer_at_isize_max_runs_off() {
        let mut program = compile_source("jmp far\nend").unwrap();
        program.labels.insert("far".into(), isize::MAX);
        let mut runtime = Runtime::new(program, Config::default());
        assert_eq!(runtime.exec(), Ok(Outcome::Runoff));
        assert_eq!(runtime.ip, isize::MAX);
    }

    #[test]
    fn trace_does_not_change_outcome() {
        let source = "mov a, 2\nmul a, 21\nmsg 'a = ', a\nend";
        let mut traced = Runtime::new(
            compile_source(source).unwrap(),
            Config::default().with_trace(true),
        );
        let outcome = traced.exec().unwrap();
        assert_eq!(outcome.output(), Some("a = 42"));
        assert_eq!(traced.steps, 4);
        assert_eq!(Outcome::Runoff.output(), None);
    }

    #[test]
    fn stack_underflow() {
        assert_eq!(run("ret\nend").0, Err(RuntimeError::StackUnderflow));
    }

    #[test]
    fn jump_before_cmp() {
        assert_eq!(run("x:\njne x\nend").0, Err(RuntimeError::NoComparison));
    }

    #[test]
    fn step_limit() {
        let mut runtime = Runtime::new(
            compile_source("spin:\njmp spin").unwrap(),
            Config::default().with_step_limit(Some(50)),
        );
        assert_eq!(runtime.exec(), Err(RuntimeError::StepLimitExceeded(50)));
        assert_eq!(runtime.steps, 50);
    }

    #[test]
    fn call_pushes_and_ret_pops() {
        let mut runtime = runtime("f:\nend");
        runtime.ip = 7;
        runtime.execute(&Instruction::Call("f".into())).unwrap();
        assert_eq!((runtime.ip, runtime.stack.clone()), (-1, vec![7]));
        runtime.execute(&Instruction::Ret).unwrap();
        assert_eq!((runtime.ip, runtime.stack.clone()), (7, vec![]));
    }

    #[test]
    fn nested_calls_return_in_reverse() {
        let source = "
            call f1
            msg 'done ', a
            end
        f1:
            mov a, 1
            call f2
            mul a, 10
            add a, 3
            ret
        f2:
            mul a, 10
            add a, 2
            ret
        ";
        let (outcome, runtime) = run(source);
        assert_eq!(outcome, Ok(Outcome::Halted("done 123".into())));
        assert!(runtime.stack.is_empty());
    }

    #[test]
    fn nested_call_pointer_order() {
        let mut runtime = runtime("call f1\nend\nf1:\ncall f2\nret\nf2:\nret");
        let mut trail = vec![];
        while !runtime.end {
            let instruction = runtime.program.fetch(runtime.ip).cloned().unwrap();
            runtime.execute(&instruction).unwrap();
            runtime.ip += 1;
            trail.push(runtime.ip);
        }
        // call f1 -> f1 body, call f2 -> f2 body, ret -> f1, ret -> top, end
        assert_eq!(trail, vec![2, 4, 3, 1, 2]);
    }

    #[test]
    fn jump_with_condition_enum() {
        let mut runtime = runtime("here:\nend");
        runtime.set_cmp(2, 1);
        runtime.ip = 5;
        runtime
            .execute(&Instruction::Jump(Condition::Gt, "here".into()))
            .unwrap();
        assert_eq!(runtime.ip, -1);
    }
}
