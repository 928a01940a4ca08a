use super::*;
use crate::runtime::{Environment, Instance, RuntimeError, UserFunction};
use pretty_assertions::assert_eq;

/// Declares `describe() { return this.name; }` as an unbound method closed
/// over the interpreter's globals.
fn describe_method(interpreter: &Interpreter) -> UserFunction {
    UserFunction::new(
        declaration("describe", &[], vec![ret(get(this(), "name"))]),
        interpreter.globals().clone(),
    )
}

fn point(name: &str) -> Rc<Instance> {
    let instance = Rc::new(Instance::new("Point"));
    instance.set("name", Value::String(name.to_string()));
    instance
}

fn install(interpreter: &Interpreter, name: &str, function: UserFunction) {
    interpreter
        .globals()
        .define(name, Value::Function(Rc::new(function)));
}

#[test]
fn bound_methods_resolve_their_own_receiver() {
    let mut interpreter = Interpreter::new();
    let method = describe_method(&interpreter);
    install(&interpreter, "on_p1", method.bind(point("p1")));
    install(&interpreter, "on_p2", method.bind(point("p2")));

    interpreter
        .interpret(&[
            var_decl("first", call("on_p1", vec![])),
            var_decl("second", call("on_p2", vec![])),
            var_decl("again", call("on_p1", vec![])),
        ])
        .unwrap();

    assert_eq!(global(&interpreter, "first"), Value::String("p1".into()));
    assert_eq!(global(&interpreter, "second"), Value::String("p2".into()));
    assert_eq!(global(&interpreter, "again"), Value::String("p1".into()));
}

#[test]
fn unbound_method_has_no_receiver() {
    let mut interpreter = Interpreter::new();
    let method = describe_method(&interpreter);
    let _bound = method.bind(point("p1"));
    install(&interpreter, "unbound", method);

    let err = interpreter
        .interpret(&[expr(call("unbound", vec![]))])
        .unwrap_err();
    assert!(matches!(err, RuntimeError::UndefinedVariable { ref name, .. } if name == "this"));
}

#[test]
fn bound_method_writes_through_to_receiver() {
    // rename(n) { this.name = n; }
    let mut interpreter = Interpreter::new();
    let rename = UserFunction::new(
        declaration("rename", &["n"], vec![expr(set(this(), "name", var("n")))]),
        interpreter.globals().clone(),
    );
    let receiver = point("before");
    install(&interpreter, "rename", rename.bind(Rc::clone(&receiver)));

    interpreter
        .interpret(&[expr(call("rename", vec![string("after")]))])
        .unwrap();

    assert_eq!(
        receiver.get(&ident("name")).unwrap(),
        Value::String("after".into())
    );
}

#[test]
fn method_closure_still_sees_enclosing_scope() {
    // A method declared inside a scope holding `greeting` keeps reading it
    // once bound.
    let mut interpreter = Interpreter::new();
    let class_scope = Environment::with_enclosing(interpreter.globals());
    class_scope.define("greeting", Value::String("hello ".into()));
    let greet = UserFunction::new(
        declaration(
            "greet",
            &[],
            vec![ret(binary(
                var("greeting"),
                crate::language::ast::BinaryOp::Add,
                get(this(), "name"),
            ))],
        ),
        class_scope.clone(),
    );
    install(&interpreter, "greet", greet.bind(point("ada")));

    interpreter
        .interpret(&[
            expr(call_expr(var("greet"), vec![])),
            var_decl("said", call("greet", vec![])),
        ])
        .unwrap();
    assert_eq!(global(&interpreter, "said"), Value::String("hello ada".into()));

    class_scope.define("greeting", Value::String("bye ".into()));
    interpreter
        .interpret(&[var_decl("said", call("greet", vec![]))])
        .unwrap();
    assert_eq!(global(&interpreter, "said"), Value::String("bye ada".into()));
}

#[test]
fn property_access_on_non_instance_fails() {
    let err = run(&[var_decl("n", num(1.0)), expr(get(var("n"), "x"))])
        .err()
        .unwrap();
    assert!(matches!(err, RuntimeError::NotAnInstance { .. }));
}
