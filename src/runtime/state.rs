use std::{collections::HashMap, fmt};

use crate::error::runtime::*;

/// Register file. Entries appear on first write.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Registers(HashMap<String, i64>);

impl Registers {
    pub fn get(&self, name: &str) -> RuntimeResult<i64> {
        match self.0.get(name) {
            Some(v) => Ok(*v),
            None => runtime_error!(RuntimeError::UninitializedRegister(name.to_string())),
        }
    }

    pub fn set(&mut self, name: &str, value: i64) {
        match self.0.get_mut(name) {
            Some(slot) => *slot = value,
            None => {
                self.0.insert(name.to_string(), value);
            }
        }
    }
}

impl From<HashMap<String, i64>> for Registers {
    fn from(map: HashMap<String, i64>) -> Self {
        Self(map)
    }
}

/// How a run ended
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// `end` executed, carrying the last `msg` output
    Halted(String),
    /// The pointer left the program without reaching `end`
    Runoff,
}

impl Outcome {
    /// Value reported for [Outcome::Runoff]
    pub const SENTINEL: i64 = -1;

    pub fn output(&self) -> Option<&str> {
        match self {
            Self::Halted(output) => Some(output),
            Self::Runoff => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Halted(output) => write!(f, "{}", output),
            Self::Runoff => write!(f, "{}", Self::SENTINEL),
        }
    }
}
