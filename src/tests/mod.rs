//! Program-level tests. Programs are assembled directly as syntax trees.

mod methods;

use crate::language::{
    ast::{BinaryOp, Expr, FunctionDecl, Identifier, Literal, Stmt},
    span::{Span, Spanned},
};
use crate::runtime::{Interpreter, RuntimeResult, Value};
use std::rc::Rc;

pub(crate) fn ident(name: &str) -> Identifier {
    Identifier::new(name, Span::default())
}

pub(crate) fn ident_at(name: &str, start: usize) -> Identifier {
    Identifier::new(name, Span::new(start, start + name.len()))
}

pub(crate) fn num(n: f64) -> Expr {
    Expr::Literal(Literal::Number(n))
}

pub(crate) fn string(s: &str) -> Expr {
    Expr::Literal(Literal::String(s.to_string()))
}

pub(crate) fn boolean(b: bool) -> Expr {
    Expr::Literal(Literal::Bool(b))
}

pub(crate) fn var(name: &str) -> Expr {
    Expr::Variable(ident(name))
}

pub(crate) fn this() -> Expr {
    Expr::This(ident("this"))
}

pub(crate) fn assign(name: &str, value: Expr) -> Expr {
    Expr::Assign {
        name: ident(name),
        value: Box::new(value),
    }
}

pub(crate) fn binary(left: Expr, op: BinaryOp, right: Expr) -> Expr {
    Expr::Binary {
        left: Box::new(left),
        op: Spanned::new(op, Span::default()),
        right: Box::new(right),
    }
}

pub(crate) fn call(name: &str, arguments: Vec<Expr>) -> Expr {
    call_expr(var(name), arguments)
}

pub(crate) fn call_expr(callee: Expr, arguments: Vec<Expr>) -> Expr {
    Expr::Call {
        callee: Box::new(callee),
        arguments,
        span: Span::default(),
    }
}

pub(crate) fn get(object: Expr, name: &str) -> Expr {
    Expr::Get {
        object: Box::new(object),
        name: ident(name),
    }
}

pub(crate) fn set(object: Expr, name: &str, value: Expr) -> Expr {
    Expr::Set {
        object: Box::new(object),
        name: ident(name),
        value: Box::new(value),
    }
}

pub(crate) fn expr(expr: Expr) -> Stmt {
    Stmt::Expression(expr)
}

pub(crate) fn var_decl(name: &str, initializer: Expr) -> Stmt {
    Stmt::Var {
        name: ident(name),
        initializer: Some(initializer),
    }
}

pub(crate) fn block(statements: Vec<Stmt>) -> Stmt {
    Stmt::Block(statements)
}

pub(crate) fn ret(value: Expr) -> Stmt {
    Stmt::Return {
        keyword: ident("return"),
        value: Some(value),
    }
}

pub(crate) fn brk() -> Stmt {
    Stmt::Break {
        keyword: ident("break"),
    }
}

pub(crate) fn if_then(condition: Expr, then_branch: Stmt) -> Stmt {
    Stmt::If {
        condition,
        then_branch: Box::new(then_branch),
        else_branch: None,
    }
}

pub(crate) fn while_loop(condition: Expr, body: Vec<Stmt>) -> Stmt {
    Stmt::While {
        condition,
        body: Box::new(block(body)),
    }
}

pub(crate) fn declaration(name: &str, params: &[&str], body: Vec<Stmt>) -> Rc<FunctionDecl> {
    Rc::new(FunctionDecl {
        name: ident(name),
        params: params.iter().map(|param| ident(param)).collect(),
        body,
    })
}

pub(crate) fn function(name: &str, params: &[&str], body: Vec<Stmt>) -> Stmt {
    Stmt::Function(declaration(name, params, body))
}

/// Runs `program` on a fresh interpreter and returns it for inspection.
pub(crate) fn run(program: &[Stmt]) -> RuntimeResult<Interpreter> {
    let mut interpreter = Interpreter::new();
    interpreter.interpret(program)?;
    Ok(interpreter)
}

pub(crate) fn global(interpreter: &Interpreter, name: &str) -> Value {
    match interpreter.globals().get(&ident(name)) {
        Ok(value) => value,
        Err(err) => panic!("global `{name}` missing: {err}"),
    }
}
