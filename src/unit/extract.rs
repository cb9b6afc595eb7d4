use serde::{Deserialize, Serialize};

use crate::func::{FuncDef, RawOperand};
use crate::isa;
use crate::ns::{ClosureCell, Namespace};
use crate::val::Val;

/// One extracted instruction. Pseudo-instructions are already stripped and
/// non-integer operands normalized to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instr {
    pub opcode: u16,
    /// Raw numeric argument; zero when the opcode has none.
    pub arg: u32,
    /// Resolved jump-target offset or integer operand; zero for every other
    /// operand kind. The backend resolves those through the name/constant
    /// tables, never through this field.
    pub argval: i64,
    pub offset: u32,
}

/// Self-contained description of one function, frozen at extraction time
/// except for the live globals/builtins/cell handles.
#[derive(Debug, Clone)]
pub struct CompilationUnit {
    /// Instructions in execution order.
    pub instrs: Vec<Instr>,
    /// Constant pool, index-addressed exactly as the instructions reference
    /// it. Heterogeneous and opaque to the bridge.
    pub consts: Vec<Val>,
    /// Symbol table for attribute/global lookups, index-aligned with
    /// instruction `arg` fields.
    pub names: Vec<String>,
    /// Live handle into the defining scope. Never snapshotted.
    pub globals: Namespace,
    /// Read-only fallback namespace, consulted after a globals miss.
    pub builtins: Namespace,
    /// Captured cells; each cell's current value is read at call time.
    pub cells: Vec<ClosureCell>,
    /// Backend symbol key.
    pub name: String,
    pub param_count: u16,
    /// Plain locals only, so the backend can separate true locals from
    /// cell/free slots.
    pub n_locals: u16,
    /// locals + cell vars + free vars, fixed at extraction.
    pub total_slots: u16,
}

/// Builds a [`CompilationUnit`] from an eligible function.
///
/// Extraction never fails: a missing `arg` and any non-integer operand both
/// degrade to zero rather than erroring. Only the instruction and constant/
/// name tables are copied; bindings and cells are shared with the host.
pub fn extract(func: &FuncDef) -> CompilationUnit {
    let mut instrs = Vec::with_capacity(func.instrs.len());
    for raw in &func.instrs {
        if isa::is_pseudo(raw.opcode) {
            continue;
        }
        let argval = match &raw.operand {
            RawOperand::Int(v) => *v,
            RawOperand::None | RawOperand::Sym(_) => 0,
        };
        instrs.push(Instr {
            opcode: raw.opcode,
            arg: raw.arg.unwrap_or(0),
            argval,
            offset: raw.offset,
        });
    }

    CompilationUnit {
        instrs,
        consts: func.consts.clone(),
        names: func.names.clone(),
        globals: func.globals.clone(),
        builtins: func.builtins.clone(),
        cells: func.cells.clone(),
        name: func.name.clone(),
        param_count: func.param_count,
        n_locals: func.n_locals,
        total_slots: func.total_slots(),
    }
}
