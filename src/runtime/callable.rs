use crate::language::ast::Stmt;
use crate::runtime::{
    control::FlowSignal, environment::Environment, error::RuntimeResult, value::Value,
};
use std::fmt;

/// Statement executor that function bodies run on.
pub trait Evaluator {
    /// Runs `statements` in order against `environment`, stopping at the
    /// first signal or fault and handing it back unchanged.
    fn execute_block(
        &mut self,
        statements: &[Stmt],
        environment: Environment,
    ) -> RuntimeResult<Option<FlowSignal>>;
}

/// Anything invocable from a call expression.
///
/// Callers check `arity` before `call`; implementations assume the argument
/// count already matches.
pub trait Callable {
    fn name(&self) -> &str;
    fn arity(&self) -> usize;
    fn call(&self, evaluator: &mut dyn Evaluator, arguments: Vec<Value>) -> RuntimeResult<Value>;
}

pub type NativeFn = fn(&mut dyn Evaluator, Vec<Value>) -> RuntimeResult<Value>;

pub struct NativeFunction {
    name: String,
    arity: usize,
    function: NativeFn,
}

impl NativeFunction {
    pub fn new(name: impl Into<String>, arity: usize, function: NativeFn) -> Self {
        Self {
            name: name.into(),
            arity,
            function,
        }
    }
}

impl Callable for NativeFunction {
    fn name(&self) -> &str {
        &self.name
    }

    fn arity(&self) -> usize {
        self.arity
    }

    fn call(&self, evaluator: &mut dyn Evaluator, arguments: Vec<Value>) -> RuntimeResult<Value> {
        (self.function)(evaluator, arguments)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish()
    }
}

impl fmt::Display for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native fn {}>", self.name)
    }
}
