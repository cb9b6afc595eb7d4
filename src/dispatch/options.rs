use std::fmt;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Backend aggressiveness, clamped to the 0-3 range the contract allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum OptLevel {
    O0,
    O1,
    O2,
    O3,
}

impl OptLevel {
    pub fn as_int(self) -> i32 {
        match self {
            OptLevel::O0 => 0,
            OptLevel::O1 => 1,
            OptLevel::O2 => 2,
            OptLevel::O3 => 3,
        }
    }
}

impl From<i32> for OptLevel {
    fn from(level: i32) -> Self {
        match level {
            i32::MIN..=0 => OptLevel::O0,
            1 => OptLevel::O1,
            2 => OptLevel::O2,
            _ => OptLevel::O3,
        }
    }
}

impl From<OptLevel> for i32 {
    fn from(level: OptLevel) -> Self {
        level.as_int()
    }
}

impl fmt::Display for OptLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "O{}", self.as_int())
    }
}

/// Compilation mode requested at decoration time.
///
/// A closed variant instead of a mode string; `"auto"` is accepted as a
/// configuration spelling of [`Mode::Object`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Full dynamic-object semantics: attribute lookup, dynamic typing, the
    /// namespace fallback chain.
    #[default]
    #[serde(alias = "auto")]
    Object,
    /// Pure fixed-width integer arithmetic/comparison/branch code.
    Int,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Object => write!(f, "object"),
            Mode::Int => write!(f, "int"),
        }
    }
}

/// Decoration-time configuration.
///
/// `vectorize`, `inline`, and `parallel` are recorded for the backend's
/// benefit but not consumed by the bridge itself. `lazy` is reserved:
/// dispatch is always lazy-on-first-call regardless of its value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JitOptions {
    pub opt_level: OptLevel,
    pub vectorize: bool,
    pub inline: bool,
    pub parallel: bool,
    pub lazy: bool,
    pub mode: Mode,
}

impl Default for JitOptions {
    fn default() -> Self {
        Self {
            opt_level: OptLevel::O3,
            vectorize: true,
            inline: true,
            parallel: false,
            lazy: false,
            mode: Mode::Object,
        }
    }
}

impl JitOptions {
    /// Parses options from a JSON object, e.g. `{"opt_level": 2, "mode": "int"}`.
    /// Unspecified fields keep their defaults.
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("parse jit options")
    }
}
