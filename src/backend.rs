//! Native-backend contract.
//!
//! The code generator is an external collaborator: it consumes a compilation
//! unit shaped for one of the two modes and hands back native entry points
//! keyed by function name and parameter count. One backend instance exists
//! per dispatch wrapper and is never shared between wrappers.

use std::sync::Arc;

use anyhow::Result;

use crate::dispatch::OptLevel;
use crate::ns::{ClosureCell, Namespace};
use crate::unit::{CompilationUnit, Instr};
use crate::val::Val;

/// Native entry point produced by the backend.
pub type NativeFn = Arc<dyn Fn(&[Val]) -> Result<Val> + Send + Sync>;

/// The original interpreted callable; the permanent fallback target.
pub type HostFn = Arc<dyn Fn(&[Val]) -> Result<Val> + Send + Sync>;

/// Object-mode compile request: full dynamic-object semantics, including the
/// globals/builtins lookup chain and closure cells.
///
/// `n_locals` is the raw local count, distinct from `total_slots`, so the
/// backend can separate true locals from cell/free slots.
pub struct ObjectRequest<'a> {
    pub instrs: &'a [Instr],
    pub consts: &'a [Val],
    pub names: &'a [String],
    pub globals: &'a Namespace,
    pub builtins: &'a Namespace,
    pub cells: &'a [ClosureCell],
    pub name: &'a str,
    pub param_count: u16,
    pub total_slots: u16,
    pub n_locals: u16,
}

impl<'a> ObjectRequest<'a> {
    pub fn from_unit(unit: &'a CompilationUnit) -> Self {
        Self {
            instrs: &unit.instrs,
            consts: &unit.consts,
            names: &unit.names,
            globals: &unit.globals,
            builtins: &unit.builtins,
            cells: &unit.cells,
            name: &unit.name,
            param_count: unit.param_count,
            total_slots: unit.total_slots,
            n_locals: unit.n_locals,
        }
    }
}

/// Integer-mode compile request: instructions and constants only, no name
/// tables, bindings, or cells.
///
/// The function's entire observable behavior must be fixed-width integer
/// arithmetic, comparison, and branching. That is an unchecked precondition
/// of this mode, not something verified at runtime: a violating function
/// compiles to silently wrong code.
pub struct IntRequest<'a> {
    pub instrs: &'a [Instr],
    pub consts: &'a [Val],
    pub name: &'a str,
    pub param_count: u16,
    pub total_slots: u16,
}

impl<'a> IntRequest<'a> {
    pub fn from_unit(unit: &'a CompilationUnit) -> Self {
        Self {
            instrs: &unit.instrs,
            consts: &unit.consts,
            name: &unit.name,
            param_count: unit.param_count,
            total_slots: unit.total_slots,
        }
    }
}

/// Contract the dispatch layer drives.
pub trait Backend {
    /// Applies backend aggressiveness. Called once, before any compile
    /// request.
    fn configure(&mut self, opt_level: OptLevel);

    /// Compiles with full dynamic-object semantics. `false` means the unit
    /// was refused; the wrapper falls back permanently.
    fn compile_object(&mut self, req: ObjectRequest<'_>) -> bool;

    /// Compiles restricted fixed-width integer code. `false` means the unit
    /// was refused.
    fn compile_int(&mut self, req: IntRequest<'_>) -> bool;

    /// Entry point for a previously successful object-mode compile.
    fn get_callable(&self, name: &str, param_count: u16) -> Option<NativeFn>;

    /// Entry point for a previously successful integer-mode compile.
    fn get_int_callable(&self, name: &str, param_count: u16) -> Option<NativeFn>;
}
