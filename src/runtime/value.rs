use crate::language::ast::Identifier;
use crate::runtime::{
    callable::NativeFunction,
    error::{RuntimeError, RuntimeResult},
    function::UserFunction,
};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

#[derive(Clone, Debug)]
pub enum Value {
    Nil,
    Bool(bool),
    Number(f64),
    String(String),
    Function(Rc<UserFunction>),
    Native(Rc<NativeFunction>),
    Instance(Rc<Instance>),
}

impl Value {
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::Bool(b) => *b,
            _ => true,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Function(_) | Value::Native(_) => "function",
            Value::Instance(_) => "instance",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Native(a), Value::Native(b)) => Rc::ptr_eq(a, b),
            (Value::Instance(a), Value::Instance(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Number(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "{v}"),
            Value::Function(function) => write!(f, "{function}"),
            Value::Native(native) => write!(f, "{native}"),
            Value::Instance(instance) => write!(f, "{instance}"),
        }
    }
}

/// Receiver object for bound methods.
#[derive(Debug)]
pub struct Instance {
    pub class_name: String,
    fields: RefCell<HashMap<String, Value>>,
}

impl Instance {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            fields: RefCell::new(HashMap::new()),
        }
    }

    pub fn get(&self, name: &Identifier) -> RuntimeResult<Value> {
        self.fields
            .borrow()
            .get(&name.name)
            .cloned()
            .ok_or_else(|| RuntimeError::UndefinedProperty {
                name: name.name.clone(),
                span: name.span,
            })
    }

    pub fn set(&self, name: impl Into<String>, value: Value) {
        self.fields.borrow_mut().insert(name.into(), value);
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} instance", self.class_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::span::Span;

    #[test]
    fn only_nil_and_false_are_falsey() {
        assert!(!Value::Nil.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(Value::Number(0.0).is_truthy());
        assert!(Value::String(String::new()).is_truthy());
    }

    #[test]
    fn whole_numbers_display_without_fraction() {
        assert_eq!(Value::Number(5.0).to_string(), "5");
        assert_eq!(Value::Number(2.5).to_string(), "2.5");
        assert_eq!(Value::Nil.to_string(), "nil");
    }

    #[test]
    fn instances_compare_by_identity() {
        let a = Rc::new(Instance::new("Point"));
        let b = Rc::new(Instance::new("Point"));
        assert_eq!(Value::Instance(a.clone()), Value::Instance(a.clone()));
        assert_ne!(Value::Instance(a), Value::Instance(b));
    }

    #[test]
    fn missing_field_is_undefined_property() {
        let instance = Instance::new("Point");
        instance.set("x", Value::Number(1.0));
        let x = Identifier::new("x", Span::default());
        assert_eq!(instance.get(&x).unwrap(), Value::Number(1.0));
        let y = Identifier::new("y", Span::new(4, 5));
        assert!(matches!(
            instance.get(&y),
            Err(RuntimeError::UndefinedProperty { span, .. }) if span == Span::new(4, 5)
        ));
        assert_eq!(instance.to_string(), "Point instance");
    }
}
