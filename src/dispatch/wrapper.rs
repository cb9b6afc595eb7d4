use std::sync::Mutex;

use anyhow::Result;
use tracing::{debug, warn};

use crate::analysis::{self, Rejection};
use crate::backend::{Backend, HostFn, IntRequest, NativeFn, ObjectRequest};
use crate::func::FuncDef;
use crate::unit::{self, CompilationUnit};
use crate::val::Val;

use super::options::{JitOptions, Mode};

/// Structured record of a static rejection, carried alongside the warning
/// emitted when the decorator declines a function.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub function: String,
    pub reason: Rejection,
}

/// Where a wrapper currently is in its lifecycle.
///
/// `Compiled` and `FallbackPermanent` are terminal. A runtime fault on the
/// compiled path is recovered per call and does not leave `Compiled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Uncompiled,
    Compiling,
    Compiled,
    FallbackPermanent,
}

enum State {
    Uncompiled,
    Compiling,
    Compiled(NativeFn),
    Fallback,
}

impl State {
    fn stage(&self) -> Stage {
        match self {
            State::Uncompiled => Stage::Uncompiled,
            State::Compiling => Stage::Compiling,
            State::Compiled(_) => Stage::Compiled,
            State::Fallback => Stage::FallbackPermanent,
        }
    }
}

struct Inner<B> {
    backend: B,
    state: State,
}

/// The callable substituted for a decorated definition.
///
/// Owns exactly one compilation unit, one mode, the backend instance, and a
/// permanent reference to the original callable. Compilation happens lazily
/// on the first call; the check-and-transition runs under a per-wrapper lock
/// so concurrent first calls invoke the backend once total.
pub struct JitFn<B: Backend> {
    unit: CompilationUnit,
    options: JitOptions,
    original: HostFn,
    inner: Mutex<Inner<B>>,
}

impl<B: Backend> JitFn<B> {
    fn new(unit: CompilationUnit, options: JitOptions, original: HostFn, backend: B) -> Self {
        Self {
            unit,
            options,
            original,
            inner: Mutex::new(Inner {
                backend,
                state: State::Uncompiled,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.unit.name
    }

    pub fn param_count(&self) -> u16 {
        self.unit.param_count
    }

    pub fn mode(&self) -> Mode {
        self.options.mode
    }

    pub fn options(&self) -> &JitOptions {
        &self.options
    }

    pub fn unit(&self) -> &CompilationUnit {
        &self.unit
    }

    pub fn stage(&self) -> Stage {
        self.inner.lock().unwrap().state.stage()
    }

    /// Invokes the function with the original arguments.
    ///
    /// First call drives the backend; afterwards the cached entry point is
    /// invoked directly. A fault in the compiled code retries the same
    /// invocation against the original callable without touching the cached
    /// state, so the next call still takes the compiled path.
    pub fn call(&self, args: &[Val]) -> Result<Val> {
        match self.entry_point() {
            Some(native) => match native(args) {
                Ok(val) => Ok(val),
                Err(err) => {
                    debug!(
                        function = %self.unit.name,
                        error = %err,
                        "compiled call faulted; retrying interpreted"
                    );
                    (self.original)(args)
                }
            },
            None => (self.original)(args),
        }
    }

    /// Runs the lazy memoized compile transition and returns the cached
    /// entry point when the wrapper is (now) in the compiled state.
    fn entry_point(&self) -> Option<NativeFn> {
        let mut inner = self.inner.lock().unwrap();
        match &inner.state {
            State::Compiled(native) => return Some(native.clone()),
            State::Fallback => return None,
            // Unreachable while every transition happens under the lock;
            // route to the original rather than guess.
            State::Compiling => return None,
            State::Uncompiled => {}
        }

        inner.state = State::Compiling;
        let compiled = match self.options.mode {
            Mode::Object => inner.backend.compile_object(ObjectRequest::from_unit(&self.unit)),
            Mode::Int => inner.backend.compile_int(IntRequest::from_unit(&self.unit)),
        };
        if !compiled {
            debug!(
                function = %self.unit.name,
                mode = %self.options.mode,
                "backend refused unit; falling back permanently"
            );
            inner.state = State::Fallback;
            return None;
        }

        let native = match self.options.mode {
            Mode::Object => inner.backend.get_callable(&self.unit.name, self.unit.param_count),
            Mode::Int => inner
                .backend
                .get_int_callable(&self.unit.name, self.unit.param_count),
        };
        match native {
            Some(native) => {
                inner.state = State::Compiled(native.clone());
                Some(native)
            }
            None => {
                debug!(
                    function = %self.unit.name,
                    "backend reported success but produced no entry point; falling back permanently"
                );
                inner.state = State::Fallback;
                None
            }
        }
    }
}

/// Public result of decorating a definition: either a dispatching wrapper or
/// the untouched original. Both shapes expose the same call surface, so a
/// rejected function is indistinguishable from a compiled one at the call
/// site.
pub enum JitCallable<B: Backend> {
    Jit(JitFn<B>),
    Passthrough {
        original: HostFn,
        name: String,
        param_count: u16,
        diagnostic: Diagnostic,
    },
}

impl<B: Backend> JitCallable<B> {
    pub fn call(&self, args: &[Val]) -> Result<Val> {
        match self {
            JitCallable::Jit(wrapper) => wrapper.call(args),
            JitCallable::Passthrough { original, .. } => original(args),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            JitCallable::Jit(wrapper) => wrapper.name(),
            JitCallable::Passthrough { name, .. } => name,
        }
    }

    pub fn param_count(&self) -> u16 {
        match self {
            JitCallable::Jit(wrapper) => wrapper.param_count(),
            JitCallable::Passthrough { param_count, .. } => *param_count,
        }
    }

    /// The static-rejection record, if decoration declined this function.
    pub fn rejection(&self) -> Option<&Diagnostic> {
        match self {
            JitCallable::Jit(_) => None,
            JitCallable::Passthrough { diagnostic, .. } => Some(diagnostic),
        }
    }

    pub fn stage(&self) -> Stage {
        match self {
            JitCallable::Jit(wrapper) => wrapper.stage(),
            JitCallable::Passthrough { .. } => Stage::FallbackPermanent,
        }
    }

    pub fn as_jit(&self) -> Option<&JitFn<B>> {
        match self {
            JitCallable::Jit(wrapper) => Some(wrapper),
            JitCallable::Passthrough { .. } => None,
        }
    }
}

/// Decorates one function definition.
///
/// An ineligible function comes back as a passthrough around the original
/// callable with exactly one warning emitted. Otherwise the unit is
/// extracted eagerly, the backend is configured with the requested opt
/// level, and compilation waits for the first call.
pub fn jit<B: Backend>(
    func: &FuncDef,
    original: HostFn,
    mut backend: B,
    options: JitOptions,
) -> JitCallable<B> {
    if let Err(reason) = analysis::check(func) {
        warn!(
            function = %func.name,
            reason = %reason,
            "function cannot be jit-compiled; decorator has no effect"
        );
        return JitCallable::Passthrough {
            original,
            name: func.name.clone(),
            param_count: func.param_count,
            diagnostic: Diagnostic {
                function: func.name.clone(),
                reason,
            },
        };
    }

    backend.configure(options.opt_level);
    let unit = unit::extract(func);
    JitCallable::Jit(JitFn::new(unit, options, original, backend))
}
