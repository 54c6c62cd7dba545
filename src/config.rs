/// Instructions a run may execute before it is treated as an endless loop
pub const DEFAULT_STEP_LIMIT: u64 = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// `None` lets a program loop forever
    pub step_limit: Option<u64>,
    /// Print every executed instruction to stderr
    pub trace: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            step_limit: Some(DEFAULT_STEP_LIMIT),
            trace: false,
        }
    }
}

impl Config {
    pub fn with_step_limit(self, step_limit: Option<u64>) -> Self {
        Self { step_limit, ..self }
    }

    pub fn with_trace(self, trace: bool) -> Self {
        Self { trace, ..self }
    }
}
