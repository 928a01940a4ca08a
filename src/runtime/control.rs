use crate::language::ast::Identifier;
use crate::runtime::value::Value;

/// Non-error unwinding out of statement evaluation.
///
/// Statements complete with `Ok(None)`, unwind with `Ok(Some(signal))` and
/// fail with `Err(..)`. `Return` is consumed by the nearest call boundary,
/// `Break` by the nearest loop.
#[derive(Clone, Debug, PartialEq)]
pub enum FlowSignal {
    /// `keyword` locates the `return` for diagnostics only.
    Return { value: Value, keyword: Identifier },
    /// Carries the `break` keyword for diagnostics only.
    Break(Identifier),
}

impl FlowSignal {
    pub fn keyword(&self) -> &'static str {
        match self {
            FlowSignal::Return { .. } => "return",
            FlowSignal::Break(_) => "break",
        }
    }
}
