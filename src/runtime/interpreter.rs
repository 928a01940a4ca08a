use crate::language::{
    ast::*,
    span::{Span, Spanned},
};
use crate::runtime::{
    callable::{Callable, Evaluator, NativeFunction},
    control::FlowSignal,
    environment::Environment,
    error::{RuntimeError, RuntimeResult},
    function::UserFunction,
    stack::ensure_sufficient_stack,
    value::Value,
};
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

pub const DEFAULT_MAX_CALL_DEPTH: usize = 256;
const MAX_CALL_DEPTH_VAR: &str = "LOX_MAX_CALL_DEPTH";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InterpreterConfig {
    pub max_call_depth: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }
}

impl InterpreterConfig {
    /// Reads overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(raw) = lookup(MAX_CALL_DEPTH_VAR) {
            match raw.trim().parse::<usize>() {
                Ok(depth) if depth > 0 => config.max_call_depth = depth,
                _ => warn!(
                    value = %raw,
                    default = DEFAULT_MAX_CALL_DEPTH,
                    "ignoring invalid LOX_MAX_CALL_DEPTH"
                ),
            }
        }
        config
    }

    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }
}

pub struct Interpreter {
    config: InterpreterConfig,
    globals: Environment,
    env: Environment,
    call_depth: usize,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_config(InterpreterConfig::default())
    }

    pub fn with_config(config: InterpreterConfig) -> Self {
        let globals = Environment::new();
        globals.define(
            "clock",
            Value::Native(Rc::new(NativeFunction::new("clock", 0, native_clock))),
        );
        Self {
            config,
            env: globals.clone(),
            globals,
            call_depth: 0,
        }
    }

    pub fn globals(&self) -> &Environment {
        &self.globals
    }

    pub fn config(&self) -> InterpreterConfig {
        self.config
    }

    /// Runs a whole program in the global scope.
    pub fn interpret(&mut self, statements: &[Stmt]) -> RuntimeResult<()> {
        for statement in statements {
            if let Some(flow) = self.execute(statement)? {
                return Err(leaked(flow));
            }
        }
        Ok(())
    }

    pub fn execute(&mut self, statement: &Stmt) -> RuntimeResult<Option<FlowSignal>> {
        match statement {
            Stmt::Expression(expr) => {
                self.evaluate(expr)?;
                Ok(None)
            }
            Stmt::Var { name, initializer } => {
                let value = match initializer {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                self.env.define(name.name.clone(), value);
                Ok(None)
            }
            Stmt::Block(statements) => {
                let scope = Environment::with_enclosing(&self.env);
                self.execute_block(statements, scope)
            }
            Stmt::Function(declaration) => {
                let function = UserFunction::new(Rc::clone(declaration), self.env.clone());
                self.env
                    .define(declaration.name.name.clone(), Value::Function(Rc::new(function)));
                Ok(None)
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch)
                } else {
                    Ok(None)
                }
            }
            Stmt::While { condition, body } => {
                while self.evaluate(condition)?.is_truthy() {
                    match self.execute(body)? {
                        None => {}
                        Some(FlowSignal::Break(_)) => break,
                        Some(flow @ FlowSignal::Return { .. }) => return Ok(Some(flow)),
                    }
                }
                Ok(None)
            }
            Stmt::Return { keyword, value } => {
                let value = match value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                Ok(Some(FlowSignal::Return {
                    value,
                    keyword: keyword.clone(),
                }))
            }
            Stmt::Break { keyword } => Ok(Some(FlowSignal::Break(keyword.clone()))),
        }
    }

    pub fn evaluate(&mut self, expr: &Expr) -> RuntimeResult<Value> {
        match expr {
            Expr::Literal(literal) => Ok(match literal {
                Literal::Nil => Value::Nil,
                Literal::Bool(b) => Value::Bool(*b),
                Literal::Number(n) => Value::Number(*n),
                Literal::String(s) => Value::String(s.clone()),
            }),
            Expr::Variable(name) | Expr::This(name) => self.env.get(name),
            Expr::Assign { name, value } => {
                let value = self.evaluate(value)?;
                self.env.assign(name, value.clone())?;
                Ok(value)
            }
            Expr::Binary { left, op, right } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                eval_binary(op, left, right)
            }
            Expr::Call {
                callee,
                arguments,
                span,
            } => {
                let callee = self.evaluate(callee)?;
                let arguments = arguments
                    .iter()
                    .map(|argument| self.evaluate(argument))
                    .collect::<RuntimeResult<Vec<_>>>()?;
                self.call_value(callee, arguments, *span)
            }
            Expr::Get { object, name } => match self.evaluate(object)? {
                Value::Instance(instance) => instance.get(name),
                _ => Err(RuntimeError::NotAnInstance { span: name.span }),
            },
            Expr::Set {
                object,
                name,
                value,
            } => {
                let Value::Instance(instance) = self.evaluate(object)? else {
                    return Err(RuntimeError::NotAnInstance { span: name.span });
                };
                let value = self.evaluate(value)?;
                instance.set(name.name.clone(), value.clone());
                Ok(value)
            }
        }
    }

    /// Checks arity and call depth, then invokes `callee`.
    pub fn call_value(
        &mut self,
        callee: Value,
        arguments: Vec<Value>,
        span: Span,
    ) -> RuntimeResult<Value> {
        let callable: Rc<dyn Callable> = match callee {
            Value::Function(function) => function as Rc<dyn Callable>,
            Value::Native(native) => native as Rc<dyn Callable>,
            other => {
                return Err(RuntimeError::NotCallable {
                    type_name: other.type_name(),
                    span,
                })
            }
        };
        if arguments.len() != callable.arity() {
            return Err(RuntimeError::ArityMismatch {
                name: callable.name().to_string(),
                expected: callable.arity(),
                received: arguments.len(),
                span,
            });
        }
        if self.call_depth >= self.config.max_call_depth {
            debug!(depth = self.call_depth, function = callable.name(), "call depth limit hit");
            return Err(RuntimeError::StackOverflow {
                limit: self.config.max_call_depth,
                span,
            });
        }

        self.call_depth += 1;
        let result = ensure_sufficient_stack(|| callable.call(self, arguments));
        self.call_depth -= 1;
        result
    }

    fn run_statements(&mut self, statements: &[Stmt]) -> RuntimeResult<Option<FlowSignal>> {
        for statement in statements {
            if let Some(flow) = self.execute(statement)? {
                return Ok(Some(flow));
            }
        }
        Ok(None)
    }
}

impl Evaluator for Interpreter {
    fn execute_block(
        &mut self,
        statements: &[Stmt],
        environment: Environment,
    ) -> RuntimeResult<Option<FlowSignal>> {
        let previous = std::mem::replace(&mut self.env, environment);
        let result = self.run_statements(statements);
        self.env = previous;
        result
    }
}

fn leaked(flow: FlowSignal) -> RuntimeError {
    let (boundary, span) = match &flow {
        FlowSignal::Return { keyword, .. } => ("function", keyword.span),
        FlowSignal::Break(keyword) => ("loop", keyword.span),
    };
    warn!(signal = flow.keyword(), "control signal reached top level");
    RuntimeError::LeakedSignal {
        signal: flow.keyword(),
        boundary,
        span,
    }
}

fn eval_binary(op: &Spanned<BinaryOp>, left: Value, right: Value) -> RuntimeResult<Value> {
    match (op.node, left, right) {
        (op_kind, Value::Number(a), Value::Number(b)) => Ok(eval_numeric(op_kind, a, b)),
        (BinaryOp::Equal, left, right) => Ok(Value::Bool(left == right)),
        (BinaryOp::NotEqual, left, right) => Ok(Value::Bool(left != right)),
        (BinaryOp::Add, Value::String(a), Value::String(b)) => Ok(Value::String(a + &b)),
        (BinaryOp::Add, left, right) => Err(RuntimeError::TypeMismatch {
            message: format!(
                "Operands must be two numbers or two strings, found {} and {}.",
                left.type_name(),
                right.type_name()
            ),
            span: op.span,
        }),
        (op_kind, left, right) => Err(RuntimeError::TypeMismatch {
            message: format!(
                "Operands of `{}` must be numbers, found {} and {}.",
                op_kind.symbol(),
                left.type_name(),
                right.type_name()
            ),
            span: op.span,
        }),
    }
}

fn eval_numeric(op: BinaryOp, a: f64, b: f64) -> Value {
    match op {
        BinaryOp::Add => Value::Number(a + b),
        BinaryOp::Subtract => Value::Number(a - b),
        BinaryOp::Multiply => Value::Number(a * b),
        BinaryOp::Divide => Value::Number(a / b),
        BinaryOp::Less => Value::Bool(a < b),
        BinaryOp::LessEqual => Value::Bool(a <= b),
        BinaryOp::Greater => Value::Bool(a > b),
        BinaryOp::GreaterEqual => Value::Bool(a >= b),
        BinaryOp::Equal => Value::Bool(a == b),
        BinaryOp::NotEqual => Value::Bool(a != b),
    }
}

fn native_clock(_: &mut dyn Evaluator, _: Vec<Value>) -> RuntimeResult<Value> {
    let seconds = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs_f64())
        .unwrap_or_default();
    Ok(Value::Number(seconds))
}
