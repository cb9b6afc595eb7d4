use crate::analysis::{Rejection, check};
use crate::func::{FuncDef, RawInstr};
use crate::isa;
use crate::ns::Namespace;
use crate::val::Val;

fn plain_def(flags: u32, instrs: Vec<RawInstr>) -> FuncDef {
    FuncDef {
        name: "probe".to_string(),
        flags,
        instrs,
        consts: vec![Val::Int(1)],
        names: Vec::new(),
        globals: Namespace::new(),
        builtins: Namespace::new(),
        cells: Vec::new(),
        param_count: 1,
        n_locals: 1,
        n_cellvars: 0,
        n_freevars: 0,
    }
}

fn straight_line() -> Vec<RawInstr> {
    vec![
        RawInstr::new(isa::RESUME, 0, 0),
        RawInstr::new(isa::LOAD_FAST, 0, 2),
        RawInstr::new(isa::RETURN_VALUE, None, 4),
    ]
}

#[test]
fn accepts_straight_line_function() {
    assert_eq!(check(&plain_def(0, straight_line())), Ok(()));
}

#[test]
fn generator_flag_rejects_without_scanning() {
    // The stream is clean; the flag alone must reject.
    assert_eq!(
        check(&plain_def(isa::FLAG_GENERATOR, straight_line())),
        Err(Rejection::Generator)
    );
    assert_eq!(
        check(&plain_def(isa::FLAG_COROUTINE, straight_line())),
        Err(Rejection::Generator)
    );
    assert_eq!(
        check(&plain_def(isa::FLAG_ASYNC_GENERATOR, straight_line())),
        Err(Rejection::Generator)
    );
}

#[test]
fn yield_opcode_rejects_as_generator() {
    let instrs = vec![
        RawInstr::new(isa::RESUME, 0, 0),
        RawInstr::new(isa::YIELD_VALUE, None, 2),
        RawInstr::new(isa::RETURN_VALUE, None, 4),
    ];
    assert_eq!(check(&plain_def(0, instrs)), Err(Rejection::Generator));
}

#[test]
fn await_family_rejects_as_generator() {
    for opcode in [isa::GET_AWAITABLE, isa::GET_AITER, isa::GET_ANEXT, isa::SEND] {
        let instrs = vec![RawInstr::new(opcode, 0, 0)];
        assert_eq!(check(&plain_def(0, instrs)), Err(Rejection::Generator), "{}", isa::opname(opcode));
    }
}

#[test]
fn exception_machinery_rejects_as_exception() {
    for opcode in [
        isa::PUSH_EXC_INFO,
        isa::POP_EXCEPT,
        isa::RAISE_VARARGS,
        isa::RERAISE,
        isa::BEFORE_WITH,
        isa::WITH_EXCEPT_START,
    ] {
        let instrs = vec![
            RawInstr::new(isa::RESUME, 0, 0),
            RawInstr::new(opcode, None, 2),
        ];
        assert_eq!(check(&plain_def(0, instrs)), Err(Rejection::Exception), "{}", isa::opname(opcode));
    }
}

#[test]
fn legacy_contract_opcodes_still_reject() {
    let instrs = vec![RawInstr::new(isa::SETUP_FINALLY, 4, 0)];
    assert_eq!(check(&plain_def(0, instrs)), Err(Rejection::Exception));

    let instrs = vec![RawInstr::new(isa::GEN_START, None, 0)];
    assert_eq!(check(&plain_def(0, instrs)), Err(Rejection::Generator));
}

#[test]
fn first_match_in_scan_order_wins() {
    // Exception opcode appears before the yield: scan order decides.
    let instrs = vec![
        RawInstr::new(isa::PUSH_EXC_INFO, None, 0),
        RawInstr::new(isa::YIELD_VALUE, None, 2),
    ];
    assert_eq!(check(&plain_def(0, instrs)), Err(Rejection::Exception));

    let instrs = vec![
        RawInstr::new(isa::YIELD_VALUE, None, 0),
        RawInstr::new(isa::PUSH_EXC_INFO, None, 2),
    ];
    assert_eq!(check(&plain_def(0, instrs)), Err(Rejection::Generator));
}

#[test]
fn cache_placeholders_do_not_affect_eligibility() {
    let instrs = vec![
        RawInstr::new(isa::RESUME, 0, 0),
        RawInstr::new(isa::CACHE, None, 2),
        RawInstr::new(isa::CACHE, None, 4),
        RawInstr::new(isa::RETURN_VALUE, None, 6),
    ];
    assert_eq!(check(&plain_def(0, instrs)), Ok(()));
}
