//! Host function-definition surface.
//!
//! The host interpreter hands the bridge one [`FuncDef`] per decorated
//! definition: flag bits, the disassembled instruction stream, constant and
//! name tables, live bindings, closure cells, and the declared slot counts.

use serde::{Deserialize, Serialize};

use crate::ns::{ClosureCell, Namespace};
use crate::val::Val;

/// Operand metadata attached to a raw disassembled instruction.
///
/// Only integer operands (jump targets in particular) survive extraction;
/// every other kind normalizes to zero and must be resolved by the backend
/// through the constant/name tables instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum RawOperand {
    #[default]
    None,
    /// Resolved integer operand: a jump-target offset or a literal integer.
    Int(i64),
    /// Symbolic operand (name, constant repr, ...) opaque to the bridge.
    Sym(String),
}

/// One instruction as disassembled by the host, before pseudo-instruction
/// stripping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawInstr {
    pub opcode: u16,
    /// Raw numeric argument; `None` for argumentless opcodes.
    pub arg: Option<u32>,
    pub operand: RawOperand,
    pub offset: u32,
}

impl RawInstr {
    pub fn new(opcode: u16, arg: impl Into<Option<u32>>, offset: u32) -> Self {
        Self {
            opcode,
            arg: arg.into(),
            operand: RawOperand::None,
            offset,
        }
    }

    pub fn with_operand(mut self, operand: RawOperand) -> Self {
        self.operand = operand;
        self
    }
}

/// Everything the host's definition facility knows about one function.
///
/// `globals`, `builtins`, and `cells` are live handles, not copies: the host
/// keeps mutating them after the definition is handed over.
#[derive(Debug, Clone)]
pub struct FuncDef {
    pub name: String,
    /// Code-object flag bits, see [`crate::isa`].
    pub flags: u32,
    /// Full disassembled stream, pseudo-instructions included.
    pub instrs: Vec<RawInstr>,
    pub consts: Vec<Val>,
    /// Referenced-symbol table, index-aligned with instruction `arg` fields.
    pub names: Vec<String>,
    /// Mutable namespace of the defining scope.
    pub globals: Namespace,
    /// Read-only fallback namespace consulted after a globals miss.
    pub builtins: Namespace,
    /// Captured cells from enclosing scopes, in free-variable order.
    pub cells: Vec<ClosureCell>,
    pub param_count: u16,
    /// Plain local-variable count, excluding cell and free slots.
    pub n_locals: u16,
    pub n_cellvars: u16,
    pub n_freevars: u16,
}

impl FuncDef {
    /// Total slot span: locals plus cell vars plus free vars.
    pub fn total_slots(&self) -> u16 {
        self.n_locals + self.n_cellvars + self.n_freevars
    }
}
