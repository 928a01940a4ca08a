use crate::language::span::Span;
use thiserror::Error;

pub type RuntimeResult<T> = Result<T, RuntimeError>;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum RuntimeError {
    #[error("Undefined variable '{name}'.")]
    UndefinedVariable { name: String, span: Span },
    #[error("Undefined property '{name}'.")]
    UndefinedProperty { name: String, span: Span },
    #[error("Expected {expected} arguments but got {received}.")]
    ArityMismatch {
        name: String,
        expected: usize,
        received: usize,
        span: Span,
    },
    #[error("Can only call functions, not {type_name}.")]
    NotCallable { type_name: &'static str, span: Span },
    #[error("Only instances have properties.")]
    NotAnInstance { span: Span },
    #[error("{message}")]
    TypeMismatch { message: String, span: Span },
    #[error("Stack overflow: call depth exceeded {limit}.")]
    StackOverflow { limit: usize, span: Span },
    #[error("Internal error: `{signal}` escaped its enclosing {boundary}.")]
    LeakedSignal {
        signal: &'static str,
        boundary: &'static str,
        span: Span,
    },
}

impl RuntimeError {
    pub fn span(&self) -> Span {
        match self {
            RuntimeError::UndefinedVariable { span, .. }
            | RuntimeError::UndefinedProperty { span, .. }
            | RuntimeError::ArityMismatch { span, .. }
            | RuntimeError::NotCallable { span, .. }
            | RuntimeError::NotAnInstance { span }
            | RuntimeError::TypeMismatch { span, .. }
            | RuntimeError::StackOverflow { span, .. }
            | RuntimeError::LeakedSignal { span, .. } => *span,
        }
    }

    /// Short text for the source label under the offending span.
    pub fn label(&self) -> String {
        match self {
            RuntimeError::UndefinedVariable { name, .. } => format!("`{name}` is not defined"),
            RuntimeError::UndefinedProperty { name, .. } => format!("no field `{name}`"),
            RuntimeError::ArityMismatch { name, expected, .. } => {
                format!("`{name}` takes {expected} arguments")
            }
            RuntimeError::NotCallable { type_name, .. } => format!("this is a {type_name}"),
            RuntimeError::NotAnInstance { .. } => "not an instance".into(),
            RuntimeError::TypeMismatch { .. } => "invalid operands".into(),
            RuntimeError::StackOverflow { .. } => "call made here".into(),
            RuntimeError::LeakedSignal { signal, .. } => format!("`{signal}` raised here"),
        }
    }

    /// True for faults caused by a malformed program tree rather than by the
    /// running program.
    pub fn is_internal(&self) -> bool {
        matches!(self, RuntimeError::LeakedSignal { .. })
    }
}
