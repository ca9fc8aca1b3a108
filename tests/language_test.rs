// ABOUTME: End-to-end tests driving the interpreter over whole programs

use veureka::eval::Interpreter;
use veureka::value::Value;

fn last_value(src: &str) -> Value {
    let mut interp = Interpreter::new();
    interp.eval_repl_line(src).unwrap().unwrap_or(Value::Nil)
}

#[test]
fn test_closure_over_let_binding() {
    assert_eq!(last_value("let x = 10  fn f() => x + 1  f()").to_string(), "11");
}

#[test]
fn test_map_over_list_of_squares() {
    assert_eq!(last_value("let a = [1,2,3]  map(a, fn(n)=>n*n)").to_string(), "[1, 4, 9]");
}

#[test]
fn test_recursive_fibonacci_of_ten() {
    let src = "fn fib(n) if n < 2 return n end return fib(n-1)+fib(n-2) end fib(10)";
    assert_eq!(last_value(src).to_string(), "55");
}

#[test]
fn test_class_instantiation_and_method() {
    let src = "class P fn __init__(n) self.n = n end fn g() return self.n end end let p = new P(7) p.g()";
    assert_eq!(last_value(src).to_string(), "7");
}

#[test]
fn test_try_catch_binds_throw_message() {
    let mut interp = Interpreter::new();
    interp
        .run_source("let msg = nil\ntry throw \"bad\" catch e msg = \"caught \" + e end")
        .unwrap();
    assert_eq!(interp.global.get("msg").unwrap().to_string(), "caught bad");
}

#[test]
fn test_const_reassignment_is_rejected_and_value_unchanged() {
    let mut interp = Interpreter::new();
    interp.run_source("const k = 1\nk = 2").unwrap();
    assert_eq!(interp.global.get("k").unwrap().to_string(), "1");
}

#[test]
fn test_range_ascending_and_descending() {
    assert_eq!(last_value("let acc = [] for i in range(3) acc = acc + i end acc").to_string(), "[0, 1, 2]");
    assert_eq!(
        last_value("let acc = [] for i in range(3,0) acc = acc + i end acc").to_string(),
        "[3, 2, 1]"
    );
}

#[test]
fn test_closure_sees_later_mutation_of_captured_environment() {
    let mut interp = Interpreter::new();
    interp.run_source("let x = 1\nfn f() => x\nlet before = f()\nx = 99\nlet after = f()").unwrap();
    assert_eq!(interp.global.get("before").unwrap().to_string(), "1");
    assert_eq!(interp.global.get("after").unwrap().to_string(), "99");
}

#[test]
fn test_try_finally_runs_even_when_catch_does_not_fire() {
    let mut interp = Interpreter::new();
    interp
        .run_source("let log = [] try log = log + 1 catch e log = log + 99 finally log = log + 2 end")
        .unwrap();
    assert_eq!(interp.global.get("log").unwrap().to_string(), "[1, 2]");
}

#[test]
fn test_try_statements_after_catch_do_not_run_as_try_body() {
    let mut interp = Interpreter::new();
    interp
        .run_source("let order = [] try order = order + 1 throw \"x\" catch e order = order + 2 finally order = order + 3 end")
        .unwrap();
    assert_eq!(interp.global.get("order").unwrap().to_string(), "[1, 2, 3]");
}

#[test]
fn test_type_of_every_documented_value_kind() {
    assert_eq!(last_value("type(nil)").to_string(), "nil");
    assert_eq!(last_value("type(1)").to_string(), "number");
    assert_eq!(last_value("type(\"s\")").to_string(), "string");
    assert_eq!(last_value("type(true)").to_string(), "bool");
    assert_eq!(last_value("type([1])").to_string(), "list");
    assert_eq!(last_value("type({a: 1})").to_string(), "map");
    assert_eq!(last_value("type(fn() => 1)").to_string(), "function");
    assert_eq!(last_value("class C end type(C)").to_string(), "class");
    assert_eq!(last_value("class C end type(new C())").to_string(), "instance");
}

#[test]
fn test_bound_method_is_fresh_value_per_access() {
    let mut interp = Interpreter::new();
    interp
        .run_source("class C fn __init__() self.n = 1 end fn m() return self.n end end let c = new C() let m1 = c.m let m2 = c.m")
        .unwrap();
    let v = interp.eval_repl_line("m1() == m2()").unwrap().unwrap();
    assert_eq!(v.to_string(), "true");
}

#[test]
fn test_elif_chain_picks_first_matching_branch() {
    let src = "fn grade(n) if n >= 90 return \"A\" elif n >= 80 return \"B\" else return \"C\" end end [grade(95), grade(85), grade(10)]";
    assert_eq!(last_value(src).to_string(), "[\"A\", \"B\", \"C\"]");
}
