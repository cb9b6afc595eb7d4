use std::fmt;

use crate::func::FuncDef;
use crate::isa;

/// Why a function cannot be handed to the native backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Generator/coroutine/async-generator flag set, or a generator/await
    /// opcode present in the stream.
    Generator,
    /// try/except/raise/with machinery present in the stream.
    Exception,
}

impl Rejection {
    pub fn as_str(self) -> &'static str {
        match self {
            Rejection::Generator => "generator",
            Rejection::Exception => "exception",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decides whether a function may be compiled at all.
///
/// Flag bits are checked first: a generator, coroutine, or async generator is
/// rejected without looking at its code, since no partial compilation is
/// attempted. Otherwise the full instruction stream is scanned once in order
/// and the first opcode found in either unsupported category decides the
/// rejection reason.
pub fn check(func: &FuncDef) -> Result<(), Rejection> {
    let mask = isa::FLAG_GENERATOR | isa::FLAG_COROUTINE | isa::FLAG_ASYNC_GENERATOR;
    if func.flags & mask != 0 {
        return Err(Rejection::Generator);
    }

    for instr in &func.instrs {
        if isa::GENERATOR_OPCODES.contains(&instr.opcode) {
            return Err(Rejection::Generator);
        }
        if isa::EXCEPTION_OPCODES.contains(&instr.opcode) {
            return Err(Rejection::Exception);
        }
    }

    Ok(())
}
