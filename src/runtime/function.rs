use crate::language::ast::FunctionDecl;
use crate::runtime::{
    callable::{Callable, Evaluator},
    control::FlowSignal,
    environment::Environment,
    error::{RuntimeError, RuntimeResult},
    value::{Instance, Value},
};
use std::fmt;
use std::rc::Rc;
use tracing::trace;

/// A function declaration paired with the environment it was declared in.
pub struct UserFunction {
    declaration: Rc<FunctionDecl>,
    closure: Environment,
}

impl UserFunction {
    pub fn new(declaration: Rc<FunctionDecl>, closure: Environment) -> Self {
        Self {
            declaration,
            closure,
        }
    }

    pub fn declaration(&self) -> &Rc<FunctionDecl> {
        &self.declaration
    }

    pub fn closure(&self) -> &Environment {
        &self.closure
    }

    /// Returns a copy of this function whose closure gains a `this` scope.
    /// `self` is left untouched, so one method can be bound to many receivers.
    pub fn bind(&self, instance: Rc<Instance>) -> UserFunction {
        trace!(
            function = %self.declaration.name.name,
            receiver = %instance.class_name,
            "binding method"
        );
        let environment = Environment::with_enclosing(&self.closure);
        environment.define("this", Value::Instance(instance));
        UserFunction::new(Rc::clone(&self.declaration), environment)
    }
}

impl Callable for UserFunction {
    fn name(&self) -> &str {
        &self.declaration.name.name
    }

    fn arity(&self) -> usize {
        self.declaration.params.len()
    }

    #[tracing::instrument(level = "trace", skip_all, fields(function = %self.declaration.name.name))]
    fn call(&self, evaluator: &mut dyn Evaluator, arguments: Vec<Value>) -> RuntimeResult<Value> {
        let environment = Environment::with_enclosing(&self.closure);
        for (param, argument) in self.declaration.params.iter().zip(arguments) {
            environment.define(param.name.clone(), argument);
        }

        match evaluator.execute_block(&self.declaration.body, environment)? {
            None => Ok(Value::Nil),
            Some(FlowSignal::Return { value, .. }) => Ok(value),
            Some(FlowSignal::Break(keyword)) => {
                tracing::debug!(span = %keyword.span, "break escaped function body");
                Err(RuntimeError::LeakedSignal {
                    signal: "break",
                    boundary: "loop",
                    span: keyword.span,
                })
            }
        }
    }
}

impl fmt::Debug for UserFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserFunction")
            .field("name", &self.declaration.name.name)
            .field("arity", &self.arity())
            .finish()
    }
}

impl fmt::Display for UserFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<fn {}>", self.declaration.name.name)
    }
}
