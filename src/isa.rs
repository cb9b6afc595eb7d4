//! Host instruction-set contract.
//!
//! The host interpreter's bytecode format is an external, versioned contract:
//! the bridge treats instructions as opaque beyond the handful of opcodes it
//! must recognize by name. Everything in this module tracks [`ISA_VERSION`]
//! and must be revisited together whenever the host bumps it.

use once_cell::sync::Lazy;
use rustc_hash::FxHashSet;

/// Instruction-set revision these constants and tables were written against.
pub const ISA_VERSION: u32 = 311;

// Code-object flag bits. Any of the three marks the whole function as
// uncompilable, independent of its instruction stream.
pub const FLAG_GENERATOR: u32 = 0x20;
pub const FLAG_COROUTINE: u32 = 0x80;
pub const FLAG_ASYNC_GENERATOR: u32 = 0x200;

// Pseudo-instruction: inline-cache placeholder emitted by the host's adaptive
// interpreter. Stripped before extraction.
pub const CACHE: u16 = 0;

pub const POP_TOP: u16 = 1;
pub const NOP: u16 = 9;
pub const UNARY_NEGATIVE: u16 = 11;
pub const UNARY_NOT: u16 = 12;
pub const PUSH_EXC_INFO: u16 = 35;
pub const CHECK_EXC_MATCH: u16 = 36;
pub const WITH_EXCEPT_START: u16 = 49;
pub const GET_AITER: u16 = 50;
pub const GET_ANEXT: u16 = 51;
pub const BEFORE_WITH: u16 = 53;
pub const END_ASYNC_FOR: u16 = 54;
pub const GET_ITER: u16 = 68;
pub const GET_YIELD_FROM_ITER: u16 = 69;
pub const GET_AWAITABLE: u16 = 73;
pub const RETURN_GENERATOR: u16 = 75;
pub const RETURN_VALUE: u16 = 83;
pub const YIELD_VALUE: u16 = 86;
pub const ASYNC_GEN_WRAP: u16 = 87;
pub const POP_EXCEPT: u16 = 89;
pub const FOR_ITER: u16 = 93;
pub const LOAD_CONST: u16 = 100;
pub const LOAD_ATTR: u16 = 106;
pub const COMPARE_OP: u16 = 107;
pub const JUMP_FORWARD: u16 = 110;
pub const POP_JUMP_IF_FALSE: u16 = 114;
pub const POP_JUMP_IF_TRUE: u16 = 115;
pub const LOAD_GLOBAL: u16 = 116;
pub const RERAISE: u16 = 119;
pub const BINARY_OP: u16 = 122;
pub const SEND: u16 = 123;
pub const LOAD_FAST: u16 = 124;
pub const STORE_FAST: u16 = 125;
pub const RAISE_VARARGS: u16 = 130;
pub const LOAD_DEREF: u16 = 137;
pub const STORE_DEREF: u16 = 138;
pub const JUMP_BACKWARD: u16 = 140;
pub const RESUME: u16 = 151;
pub const CALL: u16 = 171;

// Retained from earlier contract revisions so stale streams still reject
// instead of slipping past the scan.
pub const GEN_START: u16 = 200;
pub const SETUP_FINALLY: u16 = 201;
pub const POP_BLOCK: u16 = 202;
pub const CLEANUP_THROW: u16 = 203;

/// `BINARY_OP` operand sub-codes.
pub mod binop {
    pub const ADD: u32 = 0;
    pub const FLOOR_DIVIDE: u32 = 2;
    pub const MULTIPLY: u32 = 5;
    pub const REMAINDER: u32 = 6;
    pub const SUBTRACT: u32 = 10;
    pub const TRUE_DIVIDE: u32 = 11;
}

/// `COMPARE_OP` operand sub-codes.
pub mod cmp {
    pub const LT: u32 = 0;
    pub const LE: u32 = 1;
    pub const EQ: u32 = 2;
    pub const NE: u32 = 3;
    pub const GT: u32 = 4;
    pub const GE: u32 = 5;
}

/// Opcodes that imply generator/coroutine control flow: yield, send, the
/// await family, and async-iteration teardown.
pub static GENERATOR_OPCODES: Lazy<FxHashSet<u16>> = Lazy::new(|| {
    [
        YIELD_VALUE,
        RETURN_GENERATOR,
        GEN_START,
        SEND,
        END_ASYNC_FOR,
        GET_AWAITABLE,
        GET_AITER,
        GET_ANEXT,
        GET_YIELD_FROM_ITER,
        ASYNC_GEN_WRAP,
    ]
    .into_iter()
    .collect()
});

/// Opcodes that manipulate exception state: push/pop, match, raise, reraise,
/// cleanup, try/finally setup/teardown, and context-manager enter/exit.
pub static EXCEPTION_OPCODES: Lazy<FxHashSet<u16>> = Lazy::new(|| {
    [
        PUSH_EXC_INFO,
        POP_EXCEPT,
        CHECK_EXC_MATCH,
        RAISE_VARARGS,
        RERAISE,
        CLEANUP_THROW,
        SETUP_FINALLY,
        POP_BLOCK,
        BEFORE_WITH,
        WITH_EXCEPT_START,
    ]
    .into_iter()
    .collect()
});

/// Whether the opcode is a placeholder the adaptive interpreter emits for its
/// own bookkeeping, carrying no semantics of its own.
pub fn is_pseudo(opcode: u16) -> bool {
    opcode == CACHE
}

/// Symbolic name for diagnostics. Unknown opcodes render as `OP_<n>`.
pub fn opname(opcode: u16) -> String {
    let name = match opcode {
        CACHE => "CACHE",
        POP_TOP => "POP_TOP",
        NOP => "NOP",
        UNARY_NEGATIVE => "UNARY_NEGATIVE",
        UNARY_NOT => "UNARY_NOT",
        PUSH_EXC_INFO => "PUSH_EXC_INFO",
        CHECK_EXC_MATCH => "CHECK_EXC_MATCH",
        WITH_EXCEPT_START => "WITH_EXCEPT_START",
        GET_AITER => "GET_AITER",
        GET_ANEXT => "GET_ANEXT",
        BEFORE_WITH => "BEFORE_WITH",
        END_ASYNC_FOR => "END_ASYNC_FOR",
        GET_ITER => "GET_ITER",
        GET_YIELD_FROM_ITER => "GET_YIELD_FROM_ITER",
        GET_AWAITABLE => "GET_AWAITABLE",
        RETURN_GENERATOR => "RETURN_GENERATOR",
        RETURN_VALUE => "RETURN_VALUE",
        YIELD_VALUE => "YIELD_VALUE",
        ASYNC_GEN_WRAP => "ASYNC_GEN_WRAP",
        POP_EXCEPT => "POP_EXCEPT",
        FOR_ITER => "FOR_ITER",
        LOAD_CONST => "LOAD_CONST",
        LOAD_ATTR => "LOAD_ATTR",
        COMPARE_OP => "COMPARE_OP",
        JUMP_FORWARD => "JUMP_FORWARD",
        POP_JUMP_IF_FALSE => "POP_JUMP_IF_FALSE",
        POP_JUMP_IF_TRUE => "POP_JUMP_IF_TRUE",
        LOAD_GLOBAL => "LOAD_GLOBAL",
        RERAISE => "RERAISE",
        BINARY_OP => "BINARY_OP",
        SEND => "SEND",
        LOAD_FAST => "LOAD_FAST",
        STORE_FAST => "STORE_FAST",
        RAISE_VARARGS => "RAISE_VARARGS",
        LOAD_DEREF => "LOAD_DEREF",
        STORE_DEREF => "STORE_DEREF",
        JUMP_BACKWARD => "JUMP_BACKWARD",
        RESUME => "RESUME",
        CALL => "CALL",
        GEN_START => "GEN_START",
        SETUP_FINALLY => "SETUP_FINALLY",
        POP_BLOCK => "POP_BLOCK",
        CLEANUP_THROW => "CLEANUP_THROW",
        _ => return format!("OP_{}", opcode),
    };
    name.to_string()
}
