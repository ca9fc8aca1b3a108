// ABOUTME: Tree-walking evaluator: AST nodes to values over lexically scoped environments

use std::cell::RefCell;
use std::rc::Rc;

use crate::ast::{ElseBranch, LiteralKind, Node};
use crate::env::Environment;
use crate::error::VeurekaError;
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::value::{VClass, VFunction, VInstance, Value};

/// Non-local control flow, carried on the interpreter rather than threaded
/// through return types. At most one signal is pending at a time.
#[derive(Clone)]
pub enum Signal {
    None,
    Return(Value),
    Break,
    Continue,
    Throw(String),
}

pub fn diagnostic(msg: &str) {
    eprintln!("!! {}", msg);
}

/// Coerces a value to a number for arithmetic/ordering; anything that isn't
/// already a number is a type error (diagnosed, substituted with 0.0).
pub fn to_number(v: &Value) -> f64 {
    match v {
        Value::Number(n) => *n,
        other => {
            diagnostic(&format!("expected a number, got {}", other.type_name()));
            0.0
        }
    }
}

fn add_values(l: &Value, r: &Value) -> Value {
    match (l, r) {
        (Value::String(_), _) | (_, Value::String(_)) => Value::String(format!("{}{}", l, r)),
        (Value::List(a), Value::List(b)) => {
            let mut items = a.borrow().clone();
            items.extend(b.borrow().iter().cloned());
            Value::list(items)
        }
        (Value::List(a), _) => {
            let mut items = a.borrow().clone();
            items.push(r.clone());
            Value::list(items)
        }
        (_, Value::List(b)) => {
            let mut items = vec![l.clone()];
            items.extend(b.borrow().iter().cloned());
            Value::list(items)
        }
        _ => Value::Number(to_number(l) + to_number(r)),
    }
}

/// Applies a binary operator by its source spelling (`+`, `and`, `==`, ...).
fn apply_binary(op: &str, l: &Value, r: &Value) -> Value {
    match op {
        "+" => add_values(l, r),
        "-" => Value::Number(to_number(l) - to_number(r)),
        "*" => Value::Number(to_number(l) * to_number(r)),
        "/" => {
            let rv = to_number(r);
            if rv == 0.0 {
                diagnostic("division by zero");
                Value::Number(0.0)
            } else {
                Value::Number(to_number(l) / rv)
            }
        }
        "%" => {
            let rv = to_number(r) as i64;
            if rv == 0 {
                diagnostic("modulo by zero");
                Value::Number(0.0)
            } else {
                Value::Number(((to_number(l) as i64) % rv) as f64)
            }
        }
        "**" => Value::Number(to_number(l).powf(to_number(r))),
        "==" => Value::Bool(Value::values_equal(l, r)),
        "!=" => Value::Bool(!Value::values_equal(l, r)),
        "<" => Value::Bool(to_number(l) < to_number(r)),
        "<=" => Value::Bool(to_number(l) <= to_number(r)),
        ">" => Value::Bool(to_number(l) > to_number(r)),
        ">=" => Value::Bool(to_number(l) >= to_number(r)),
        "&" => Value::Number(((to_number(l) as i64) & (to_number(r) as i64)) as f64),
        "|" => Value::Number(((to_number(l) as i64) | (to_number(r) as i64)) as f64),
        "^" => Value::Number(((to_number(l) as i64) ^ (to_number(r) as i64)) as f64),
        "and" => Value::Bool(l.is_truthy() && r.is_truthy()),
        "or" => Value::Bool(l.is_truthy() || r.is_truthy()),
        other => {
            diagnostic(&format!("unknown operator '{}'", other));
            Value::Nil
        }
    }
}

/// Builds a map literal's pairs in declaration order, letting later
/// duplicate keys overwrite earlier ones (never growing the pair list for
/// a repeated key).
fn build_map(keys: &[String], values: Vec<Value>) -> Value {
    let mut pairs: Vec<(String, Value)> = Vec::with_capacity(keys.len());
    for (k, v) in keys.iter().zip(values) {
        if let Some(entry) = pairs.iter_mut().find(|(kk, _)| kk == k) {
            entry.1 = v;
        } else {
            pairs.push((k.clone(), v));
        }
    }
    Value::map(pairs)
}

/// Owns the global environment and the single pending control signal. An
/// `Interpreter` is not reentrant; a host running several isolated scripts
/// creates one per script.
pub struct Interpreter {
    pub global: Rc<Environment>,
    signal: Signal,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        let global = Environment::new();
        crate::builtins::install(&global);
        Interpreter {
            global,
            signal: Signal::None,
        }
    }

    pub fn is_clear(&self) -> bool {
        matches!(self.signal, Signal::None)
    }

    /// Parses and evaluates a whole program against the global environment.
    /// Lexer/parser errors abort the run (tier 1); an uncaught `throw`
    /// reaching the top stops evaluation (tier 3) but is not a Rust error.
    pub fn run_source(&mut self, source: &str) -> Result<(), VeurekaError> {
        let tokens = Lexer::new(source).tokenize();
        let ast = Parser::new(tokens).parse_program()?;
        if let Node::Program(stmts) = ast {
            let global = self.global.clone();
            self.run_block(&stmts, &global);
        }
        self.drain_uncaught_throw();
        Ok(())
    }

    /// REPL-flavored entry point: evaluates each top-level statement of one
    /// input line and returns the last one's value if it should be printed
    /// (an expression statement yielding something other than nil).
    pub fn eval_repl_line(&mut self, source: &str) -> Result<Option<Value>, VeurekaError> {
        let tokens = Lexer::new(source).tokenize();
        let ast = Parser::new(tokens).parse_program()?;
        let stmts = match ast {
            Node::Program(stmts) => stmts,
            _ => Vec::new(),
        };

        let global = self.global.clone();
        let mut last_printable = None;
        for stmt in &stmts {
            let printable = !matches!(stmt, Node::Let { .. } | Node::Fn { .. } | Node::Class { .. });
            let value = self.eval_stmt(stmt, &global);
            if !self.is_clear() {
                last_printable = None;
                break;
            }
            last_printable = if printable { Some(value) } else { None };
        }

        self.drain_uncaught_throw();
        match last_printable {
            Some(v) if !matches!(v, Value::Nil) => Ok(Some(v)),
            _ => Ok(None),
        }
    }

    fn drain_uncaught_throw(&mut self) {
        if let Signal::Throw(msg) = std::mem::replace(&mut self.signal, Signal::None) {
            diagnostic(&format!("uncaught throw: {}", msg));
        }
    }

    /// Runs statements in sequence under `env`, stopping as soon as a signal
    /// (return/break/continue/throw) becomes pending.
    fn run_block(&mut self, stmts: &[Node], env: &Rc<Environment>) {
        for stmt in stmts {
            self.eval_stmt(stmt, env);
            if !self.is_clear() {
                break;
            }
        }
    }

    fn call_function(&mut self, func: Rc<VFunction>, args: Vec<Value>) -> Value {
        let call_env = Environment::with_parent(func.closure.clone());
        for (i, param) in func.params.iter().enumerate() {
            if let Some(v) = args.get(i) {
                call_env.define(param.clone(), v.clone(), false);
            }
        }
        self.run_block(&func.body, &call_env);
        match std::mem::replace(&mut self.signal, Signal::None) {
            Signal::Return(v) => v,
            Signal::Throw(msg) => {
                self.signal = Signal::Throw(msg);
                Value::Nil
            }
            _ => Value::Nil,
        }
    }

    /// Calls any callable value (used both by `Call` nodes and by
    /// higher-order builtins like `map`/`filter`/`reduce`).
    pub fn call_value(&mut self, callee: &Value, args: Vec<Value>) -> Value {
        match callee {
            Value::Function(f) => self.call_function(f.clone(), args),
            Value::NativeFunction(f, _) => f(self, &args),
            other => {
                diagnostic(&format!("value of type {} is not callable", other.type_name()));
                Value::Nil
            }
        }
    }

    fn bind_method(&self, method: &Rc<VFunction>, receiver: Value) -> Value {
        let bound_env = Environment::with_parent(method.closure.clone());
        bound_env.define("self".to_string(), receiver, false);
        Value::Function(Rc::new(VFunction {
            name: method.name.clone(),
            params: method.params.clone(),
            body: method.body.clone(),
            closure: bound_env,
        }))
    }

    fn eval_try(
        &mut self,
        try_body: &[Node],
        catch_name: &Option<String>,
        catch_body: &[Node],
        finally_body: &[Node],
        env: &Rc<Environment>,
    ) -> Value {
        self.run_block(try_body, env);
        let mut pending = std::mem::replace(&mut self.signal, Signal::None);

        let has_catch = catch_name.is_some() || !catch_body.is_empty();
        if let Signal::Throw(msg) = pending.clone() {
            if has_catch {
                let catch_env = match catch_name {
                    Some(name) => {
                        let child = Environment::with_parent(env.clone());
                        child.define(name.clone(), Value::String(msg), false);
                        child
                    }
                    None => env.clone(),
                };
                self.run_block(catch_body, &catch_env);
                pending = std::mem::replace(&mut self.signal, Signal::None);
            }
        }

        self.run_block(finally_body, env);
        if self.is_clear() {
            self.signal = pending;
        }
        Value::Nil
    }

    fn eval_include(&mut self, path: &str) -> Value {
        let candidates = [format!("{}.ver", path), format!("lib/{}.ver", path)];
        let source = candidates.iter().find_map(|c| std::fs::read_to_string(c).ok());

        match source {
            Some(src) => {
                let tokens = Lexer::new(&src).tokenize();
                match Parser::new(tokens).parse_program() {
                    Ok(Node::Program(stmts)) => {
                        let global = self.global.clone();
                        self.run_block(&stmts, &global);
                    }
                    Ok(_) => {}
                    Err(e) => diagnostic(&format!("include '{}': {}", path, e)),
                }
            }
            None => diagnostic(&format!("cannot find include '{}'", path)),
        }
        Value::Nil
    }

    /// Evaluates a single AST node (statement or expression — the grammar
    /// makes no hard distinction; anything that isn't a recognized
    /// statement head is parsed as an expression).
    fn eval_stmt(&mut self, node: &Node, env: &Rc<Environment>) -> Value {
        macro_rules! eval_checked {
            ($n:expr) => {{
                let v = self.eval_stmt($n, env);
                if !self.is_clear() {
                    return Value::Nil;
                }
                v
            }};
        }

        match node {
            Node::Program(stmts) => {
                self.run_block(stmts, env);
                Value::Nil
            }

            Node::Include { path, .. } => self.eval_include(path),

            Node::Let { name, is_const, value, .. } => {
                let v = eval_checked!(value);
                env.define(name.clone(), v, *is_const);
                Value::Nil
            }

            Node::Assign { name, value, .. } => {
                let v = eval_checked!(value);
                if let Err(e) = env.assign(name, v.clone()) {
                    diagnostic(&e);
                }
                v
            }

            Node::CompoundAssign { name, op, value, .. } => {
                let rhs = eval_checked!(value);
                let old = env.get(name).unwrap_or_else(|| {
                    diagnostic(&format!("undefined variable '{}'", name));
                    Value::Nil
                });
                let new_val = apply_binary(op, &old, &rhs);
                if let Err(e) = env.assign(name, new_val.clone()) {
                    diagnostic(&e);
                }
                new_val
            }

            Node::Increment { name, op, prefix, .. } => {
                let old = env.get(name).unwrap_or_else(|| {
                    diagnostic(&format!("undefined variable '{}'", name));
                    Value::Nil
                });
                let delta = if op == "++" { 1.0 } else { -1.0 };
                let new_val = Value::Number(to_number(&old) + delta);
                if let Err(e) = env.assign(name, new_val.clone()) {
                    diagnostic(&e);
                    return old;
                }
                if *prefix {
                    new_val
                } else {
                    old
                }
            }

            Node::BinaryOp { op, left, right, .. } => {
                let l = eval_checked!(left);
                let r = eval_checked!(right);
                apply_binary(op, &l, &r)
            }

            Node::UnaryOp { op, operand, .. } => {
                let v = eval_checked!(operand);
                match op.as_str() {
                    "-" => Value::Number(-to_number(&v)),
                    "not" => Value::Bool(!v.is_truthy()),
                    "~" => Value::Number(!(to_number(&v) as i64) as f64),
                    other => {
                        diagnostic(&format!("unknown unary operator '{}'", other));
                        Value::Nil
                    }
                }
            }

            Node::Literal { kind, .. } => match kind {
                LiteralKind::Number(n) => Value::Number(*n),
                LiteralKind::Str(s) => Value::String(s.clone()),
                LiteralKind::Bool(b) => Value::Bool(*b),
                LiteralKind::Nil => Value::Nil,
            },

            Node::Var { name, .. } => env.get(name).unwrap_or_else(|| {
                diagnostic(&format!("undefined variable '{}'", name));
                Value::Nil
            }),

            Node::SelfExpr { .. } => env.get("self").unwrap_or_else(|| {
                diagnostic("'self' referenced outside a method");
                Value::Nil
            }),

            Node::List { items, .. } => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(eval_checked!(item));
                }
                Value::list(out)
            }

            Node::Map { keys, values, .. } => {
                let mut out = Vec::with_capacity(values.len());
                for v in values {
                    out.push(eval_checked!(v));
                }
                build_map(keys, out)
            }

            Node::Fn { name, params, body, .. } => {
                let func = Rc::new(VFunction {
                    name: name.clone(),
                    params: params.clone(),
                    body: Rc::new(body.clone()),
                    closure: env.clone(),
                });
                let value = Value::Function(func);
                if let Some(n) = name {
                    env.define(n.clone(), value.clone(), false);
                }
                value
            }

            Node::Class { name, methods, .. } => {
                let mut vmethods = Vec::with_capacity(methods.len());
                for m in methods {
                    if let Node::Fn { name: mname, params, body, .. } = m {
                        let mname = mname.clone().unwrap_or_default();
                        let vf = Rc::new(VFunction {
                            name: Some(mname.clone()),
                            params: params.clone(),
                            body: Rc::new(body.clone()),
                            closure: env.clone(),
                        });
                        vmethods.push((mname, vf));
                    }
                }
                let class = Rc::new(VClass {
                    name: name.clone(),
                    methods: vmethods,
                });
                env.define(name.clone(), Value::Class(class.clone()), false);
                Value::Class(class)
            }

            Node::Call { callee, args, .. } => {
                let callee_val = eval_checked!(callee);
                let mut arg_vals = Vec::with_capacity(args.len());
                for a in args {
                    arg_vals.push(eval_checked!(a));
                }
                self.call_value(&callee_val, arg_vals)
            }

            Node::Index { object, index, .. } => {
                let obj = eval_checked!(object);
                let idx = eval_checked!(index);
                match &obj {
                    Value::List(items) => {
                        let items_ref = items.borrow();
                        let i = to_number(&idx) as i64;
                        if i >= 0 && (i as usize) < items_ref.len() {
                            items_ref[i as usize].clone()
                        } else {
                            Value::Nil
                        }
                    }
                    Value::Map(pairs) => {
                        let key = idx.to_string();
                        pairs
                            .borrow()
                            .iter()
                            .find(|(k, _)| k == &key)
                            .map(|(_, v)| v.clone())
                            .unwrap_or(Value::Nil)
                    }
                    other => {
                        diagnostic(&format!("cannot index a {}", other.type_name()));
                        Value::Nil
                    }
                }
            }

            Node::Attr { object, name, .. } => {
                let obj = eval_checked!(object);
                match &obj {
                    Value::Instance(inst) => {
                        let inst_ref = inst.borrow();
                        if let Some((_, v)) = inst_ref.fields.iter().find(|(n, _)| n == name) {
                            return v.clone();
                        }
                        if let Some(method) = inst_ref.class.find_method(name) {
                            return self.bind_method(&method, obj.clone());
                        }
                        diagnostic(&format!("undefined attribute '{}'", name));
                        Value::Nil
                    }
                    other => {
                        diagnostic(&format!("cannot access attribute '{}' on a {}", name, other.type_name()));
                        Value::Nil
                    }
                }
            }

            Node::AttrAssign { object, name, value, .. } => {
                let obj = eval_checked!(object);
                let val = eval_checked!(value);
                match &obj {
                    Value::Instance(inst) => {
                        let mut inst_mut = inst.borrow_mut();
                        if let Some(entry) = inst_mut.fields.iter_mut().find(|(n, _)| n == name) {
                            entry.1 = val.clone();
                        } else {
                            inst_mut.fields.push((name.clone(), val.clone()));
                        }
                        val
                    }
                    other => {
                        diagnostic(&format!("cannot set attribute '{}' on a {}", name, other.type_name()));
                        Value::Nil
                    }
                }
            }

            Node::New { class_name, args, .. } => {
                let class = match env.get(class_name) {
                    Some(Value::Class(c)) => c,
                    _ => {
                        diagnostic(&format!("undefined class '{}'", class_name));
                        return Value::Nil;
                    }
                };
                let instance = Rc::new(RefCell::new(VInstance {
                    class: class.clone(),
                    fields: Vec::new(),
                }));

                if let Some(init) = class.find_method("__init__") {
                    let mut arg_vals = Vec::with_capacity(args.len());
                    for a in args {
                        let v = self.eval_stmt(a, env);
                        if !self.is_clear() {
                            return Value::Instance(instance);
                        }
                        arg_vals.push(v);
                    }
                    let bound_env = Environment::with_parent(init.closure.clone());
                    bound_env.define("self".to_string(), Value::Instance(instance.clone()), false);
                    for (i, p) in init.params.iter().enumerate() {
                        if let Some(v) = arg_vals.get(i) {
                            bound_env.define(p.clone(), v.clone(), false);
                        }
                    }
                    self.run_block(&init.body, &bound_env);
                    if let Signal::Return(_) = self.signal {
                        self.signal = Signal::None;
                    }
                    // A throw inside __init__ is left pending so the enclosing
                    // try/catch still sees it; the instance is constructed
                    // and returned regardless, per the host contract.
                }
                Value::Instance(instance)
            }

            Node::If { cond, then_branch, else_branch, .. } => {
                let c = eval_checked!(cond);
                if c.is_truthy() {
                    self.run_block(then_branch, env);
                } else if let Some(branch) = else_branch {
                    match &**branch {
                        ElseBranch::Block(stmts) => self.run_block(stmts, env),
                        ElseBranch::If(inner) => {
                            self.eval_stmt(inner, env);
                        }
                    }
                }
                Value::Nil
            }

            Node::For { var_name, iterable, body, .. } => {
                let it = eval_checked!(iterable);
                let items = match &it {
                    Value::List(items) => items.borrow().clone(),
                    other => {
                        diagnostic(&format!("cannot iterate a {}", other.type_name()));
                        return Value::Nil;
                    }
                };
                for item in items {
                    let child = Environment::with_parent(env.clone());
                    child.define(var_name.clone(), item, false);
                    self.run_block(body, &child);
                    match self.signal {
                        Signal::Break => {
                            self.signal = Signal::None;
                            break;
                        }
                        Signal::Continue => {
                            self.signal = Signal::None;
                            continue;
                        }
                        Signal::None => {}
                        _ => break,
                    }
                }
                Value::Nil
            }

            Node::While { cond, body, .. } => {
                loop {
                    let c = self.eval_stmt(cond, env);
                    if !self.is_clear() || !c.is_truthy() {
                        break;
                    }
                    self.run_block(body, env);
                    match self.signal {
                        Signal::Break => {
                            self.signal = Signal::None;
                            break;
                        }
                        Signal::Continue => {
                            self.signal = Signal::None;
                        }
                        Signal::None => {}
                        _ => break,
                    }
                }
                Value::Nil
            }

            Node::Return { value, .. } => {
                let v = match value {
                    Some(expr) => self.eval_stmt(expr, env),
                    None => Value::Nil,
                };
                if self.is_clear() {
                    self.signal = Signal::Return(v);
                }
                Value::Nil
            }

            Node::Break { .. } => {
                self.signal = Signal::Break;
                Value::Nil
            }

            Node::Continue { .. } => {
                self.signal = Signal::Continue;
                Value::Nil
            }

            Node::Throw { value, .. } => {
                let v = eval_checked!(value);
                self.signal = Signal::Throw(v.to_string());
                Value::Nil
            }

            Node::Try {
                try_body,
                catch_name,
                catch_body,
                finally_body,
                ..
            } => self.eval_try(try_body, catch_name, catch_body, finally_body, env),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval_expr(src: &str) -> Value {
        let mut interp = Interpreter::new();
        interp.eval_repl_line(src).unwrap().unwrap_or(Value::Nil)
    }

    #[test]
    fn test_arithmetic_and_precedence() {
        assert_eq!(eval_expr("1 + 2 * 3").to_string(), "7");
        assert_eq!(eval_expr("2 ** 3 ** 2").to_string(), "512");
    }

    #[test]
    fn test_string_concat_and_list_append() {
        assert_eq!(eval_expr("\"a\" + \"b\"").to_string(), "ab");
        assert_eq!(eval_expr("[1,2] + 3").to_string(), "[1, 2, 3]");
        assert_eq!(eval_expr("1 + [2,3]").to_string(), "[1, 2, 3]");
    }

    #[test]
    fn test_and_or_return_bool_not_operand() {
        assert!(matches!(eval_expr("1 and 2"), Value::Bool(true)));
        assert!(matches!(eval_expr("0 or nil"), Value::Bool(false)));
    }

    #[test]
    fn test_equality_requires_matching_types() {
        assert!(matches!(eval_expr("1 == \"1\""), Value::Bool(false)));
        assert!(matches!(eval_expr("nil == nil"), Value::Bool(true)));
    }

    #[test]
    fn test_closure_over_outer_let() {
        let mut interp = Interpreter::new();
        let v = interp
            .eval_repl_line("let x = 10  fn f() => x + 1  f()")
            .unwrap()
            .unwrap();
        assert_eq!(v.to_string(), "11");
    }

    #[test]
    fn test_map_builtin_squares_list() {
        let mut interp = Interpreter::new();
        let v = interp
            .eval_repl_line("let a = [1,2,3]  map(a, fn(n)=>n*n)")
            .unwrap()
            .unwrap();
        assert_eq!(v.to_string(), "[1, 4, 9]");
    }

    #[test]
    fn test_recursive_fibonacci() {
        let mut interp = Interpreter::new();
        let v = interp
            .eval_repl_line(
                "fn fib(n) if n < 2 return n end return fib(n-1)+fib(n-2) end fib(10)",
            )
            .unwrap()
            .unwrap();
        assert_eq!(v.to_string(), "55");
    }

    #[test]
    fn test_class_instantiation_and_method_call() {
        let mut interp = Interpreter::new();
        let v = interp
            .eval_repl_line(
                "class P fn __init__(n) self.n = n end fn g() return self.n end end let p = new P(7) p.g()",
            )
            .unwrap()
            .unwrap();
        assert_eq!(v.to_string(), "7");
    }

    #[test]
    fn test_try_catch_binds_stringified_throw() {
        let mut interp = Interpreter::new();
        interp.run_source("let caught = nil\ntry throw \"bad\" catch e caught = e end").unwrap();
        assert_eq!(interp.global.get("caught").unwrap().to_string(), "bad");
    }

    #[test]
    fn test_try_finally_runs_even_without_throw() {
        let mut interp = Interpreter::new();
        interp
            .run_source("let log = [] try log = log + 1 finally log = log + 2 end")
            .unwrap();
        let log = interp.global.get("log").unwrap();
        assert_eq!(log.to_string(), "[1, 2]");
    }

    #[test]
    fn test_const_reassignment_is_diagnosed_and_unchanged() {
        let mut interp = Interpreter::new();
        interp.run_source("const k = 1\nk = 2").unwrap();
        assert_eq!(interp.global.get("k").unwrap().to_string(), "1");
    }

    #[test]
    fn test_for_loop_range_ascending_and_descending() {
        let mut interp = Interpreter::new();
        let out = interp
            .eval_repl_line("let acc = [] for i in range(3) acc = acc + i end acc")
            .unwrap()
            .unwrap();
        assert_eq!(out.to_string(), "[0, 1, 2]");

        let out2 = interp
            .eval_repl_line("let acc2 = [] for i in range(3,0) acc2 = acc2 + i end acc2")
            .unwrap()
            .unwrap();
        assert_eq!(out2.to_string(), "[3, 2, 1]");
    }

    #[test]
    fn test_break_and_continue() {
        let mut interp = Interpreter::new();
        let out = interp
            .eval_repl_line(
                "let acc = [] for i in range(5) if i == 3 break end if i == 1 continue end acc = acc + i end acc",
            )
            .unwrap()
            .unwrap();
        assert_eq!(out.to_string(), "[0, 2]");
    }

    #[test]
    fn test_while_loop() {
        let mut interp = Interpreter::new();
        let out = interp
            .eval_repl_line("let i = 0 let acc = 0 while i < 5 acc = acc + i i = i + 1 end acc")
            .unwrap()
            .unwrap();
        assert_eq!(out.to_string(), "10");
    }

    #[test]
    fn test_increment_prefix_and_postfix() {
        let mut interp = Interpreter::new();
        let out = interp
            .eval_repl_line("let x = 5 let a = x++ let b = ++x [a, b, x]")
            .unwrap()
            .unwrap();
        assert_eq!(out.to_string(), "[5, 7, 7]");
    }

    #[test]
    fn test_undefined_variable_diagnoses_and_yields_nil() {
        assert!(matches!(eval_expr("undefined_name"), Value::Nil));
    }

    #[test]
    fn test_division_by_zero_yields_zero() {
        assert_eq!(eval_expr("1 / 0").to_string(), "0");
    }

    #[test]
    fn test_bitwise_ops() {
        assert_eq!(eval_expr("6 & 3").to_string(), "2");
        assert_eq!(eval_expr("6 | 1").to_string(), "7");
        assert_eq!(eval_expr("5 ^ 1").to_string(), "4");
        assert_eq!(eval_expr("~0").to_string(), "-1");
    }

    #[test]
    fn test_method_binding_prefers_fields_over_methods() {
        let mut interp = Interpreter::new();
        let v = interp
            .eval_repl_line("class C fn __init__() self.m = 99 end fn m() return 1 end end new C().m")
            .unwrap()
            .unwrap();
        assert_eq!(v.to_string(), "99");
    }

    #[test]
    fn test_map_literal_and_index() {
        let mut interp = Interpreter::new();
        let v = interp.eval_repl_line("let m = {a: 1, b: 2} m[\"a\"]").unwrap().unwrap();
        assert_eq!(v.to_string(), "1");
    }

    #[test]
    fn test_list_index_out_of_range_is_nil() {
        assert!(matches!(eval_expr("[1,2][9]"), Value::Nil));
    }
}
