use crate::language::span::{Span, Spanned};
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Identifier {
    pub name: String,
    pub span: Span,
}

impl Identifier {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

/// A parsed function or method declaration.
///
/// Runtime functions hold it behind an `Rc`, so every value created from the
/// same declaration (including bound methods) points at the same node.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionDecl {
    pub name: Identifier,
    pub params: Vec<Identifier>,
    pub body: Vec<Stmt>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    Expression(Expr),
    Var {
        name: Identifier,
        initializer: Option<Expr>,
    },
    Block(Vec<Stmt>),
    Function(Rc<FunctionDecl>),
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    While {
        condition: Expr,
        body: Box<Stmt>,
    },
    Return {
        keyword: Identifier,
        value: Option<Expr>,
    },
    Break {
        keyword: Identifier,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Nil,
    Bool(bool),
    Number(f64),
    String(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Equal,
    NotEqual,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Less => "<",
            BinaryOp::LessEqual => "<=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEqual => ">=",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Literal(Literal),
    Variable(Identifier),
    Assign {
        name: Identifier,
        value: Box<Expr>,
    },
    Binary {
        left: Box<Expr>,
        op: Spanned<BinaryOp>,
        right: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        arguments: Vec<Expr>,
        span: Span,
    },
    Get {
        object: Box<Expr>,
        name: Identifier,
    },
    Set {
        object: Box<Expr>,
        name: Identifier,
        value: Box<Expr>,
    },
    This(Identifier),
}
