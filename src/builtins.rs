// ABOUTME: Native functions installed into the global environment at startup

use std::io::Write as _;
use std::rc::Rc;

use crate::env::Environment;
use crate::eval::{diagnostic, to_number, Interpreter};
use crate::value::Value;

fn native(env: &Rc<Environment>, name: &'static str, f: impl Fn(&mut Interpreter, &[Value]) -> Value + 'static) {
    env.define(name.to_string(), Value::NativeFunction(Rc::new(f), name), false);
}

/// Registers every native function the language's expression syntax can call.
pub fn install(env: &Rc<Environment>) {
    native(env, "print", |_, args| {
        let line: Vec<String> = args.iter().map(|v| v.to_string()).collect();
        println!("{}", line.join(" "));
        std::io::stdout().flush().ok();
        Value::Nil
    });

    native(env, "len", |_, args| match args.first() {
        Some(Value::String(s)) => Value::Number(s.len() as f64),
        Some(Value::List(items)) => Value::Number(items.borrow().len() as f64),
        Some(Value::Map(pairs)) => Value::Number(pairs.borrow().len() as f64),
        Some(other) => {
            diagnostic(&format!("len() expects a string, list, or map, got {}", other.type_name()));
            Value::Number(0.0)
        }
        None => Value::Number(0.0),
    });

    native(env, "range", |_, args| {
        let (start, stop, step) = match args.len() {
            1 => {
                let stop = to_number(&args[0]);
                let step = if stop <= 0.0 { -1.0 } else { 1.0 };
                (0.0, stop, step)
            }
            2 => {
                let start = to_number(&args[0]);
                let stop = to_number(&args[1]);
                let step = if start >= stop { -1.0 } else { 1.0 };
                (start, stop, step)
            }
            _ => (to_number(&args[0]), to_number(&args[1]), to_number(&args[2])),
        };

        if step == 0.0 {
            diagnostic("range() step must not be zero");
            return Value::list(Vec::new());
        }

        let mut out = Vec::new();
        let mut cur = start;
        if step > 0.0 {
            while cur < stop {
                out.push(Value::Number(cur));
                cur += step;
            }
        } else {
            while cur > stop {
                out.push(Value::Number(cur));
                cur += step;
            }
        }
        Value::list(out)
    });

    native(env, "str", |_, args| match args.first() {
        Some(v) => Value::String(v.to_string()),
        None => Value::String(String::new()),
    });

    native(env, "int", |_, args| match args.first() {
        Some(Value::Number(n)) => Value::Number(n.trunc()),
        Some(Value::String(s)) => Value::Number(s.trim().parse::<f64>().unwrap_or(0.0).trunc()),
        Some(Value::Bool(b)) => Value::Number(if *b { 1.0 } else { 0.0 }),
        _ => Value::Number(0.0),
    });

    native(env, "float", |_, args| match args.first() {
        Some(Value::Number(n)) => Value::Number(*n),
        Some(Value::String(s)) => Value::Number(s.trim().parse::<f64>().unwrap_or(0.0)),
        Some(Value::Bool(b)) => Value::Number(if *b { 1.0 } else { 0.0 }),
        _ => Value::Number(0.0),
    });

    native(env, "type", |_, args| match args.first() {
        Some(v) => Value::String(v.type_name().to_string()),
        None => Value::String("nil".to_string()),
    });

    native(env, "input", |_, args| {
        if let Some(prompt) = args.first() {
            print!("{}", prompt);
            std::io::stdout().flush().ok();
        }
        let mut line = String::new();
        match std::io::stdin().read_line(&mut line) {
            Ok(0) => Value::Nil,
            Ok(_) => Value::String(line.trim_end_matches(['\n', '\r']).to_string()),
            Err(e) => {
                diagnostic(&format!("input() failed: {}", e));
                Value::Nil
            }
        }
    });

    native(env, "map", |interp, args| {
        let (Some(Value::List(items)), Some(f)) = (args.first(), args.get(1)) else {
            diagnostic("map() expects a list and a function");
            return Value::list(Vec::new());
        };
        let snapshot = items.borrow().clone();
        let out = snapshot.into_iter().map(|v| interp.call_value(f, vec![v])).collect();
        Value::list(out)
    });

    native(env, "filter", |interp, args| {
        let (Some(Value::List(items)), Some(f)) = (args.first(), args.get(1)) else {
            diagnostic("filter() expects a list and a function");
            return Value::list(Vec::new());
        };
        let snapshot = items.borrow().clone();
        let out = snapshot
            .into_iter()
            .filter(|v| interp.call_value(f, vec![v.clone()]).is_truthy())
            .collect();
        Value::list(out)
    });

    native(env, "reduce", |interp, args| {
        let Some(Value::List(items)) = args.first() else {
            diagnostic("reduce() expects a list, a function, and an optional seed");
            return Value::Nil;
        };
        let Some(f) = args.get(1) else {
            diagnostic("reduce() expects a function argument");
            return Value::Nil;
        };
        let snapshot = items.borrow().clone();
        let mut iter = snapshot.into_iter();
        let mut acc = match args.get(2) {
            Some(seed) => seed.clone(),
            None => match iter.next() {
                Some(first) => first,
                None => return Value::Nil,
            },
        };
        for item in iter {
            acc = interp.call_value(f, vec![acc, item]);
        }
        acc
    });

    native(env, "sum", |_, args| match args.first() {
        Some(Value::List(items)) => {
            Value::Number(items.borrow().iter().map(to_number).sum())
        }
        _ => {
            diagnostic("sum() expects a list");
            Value::Number(0.0)
        }
    });

    native(env, "max", |_, args| match args.first() {
        Some(Value::List(items)) => items
            .borrow()
            .iter()
            .cloned()
            .fold(None, |best: Option<Value>, v| match best {
                None => Some(v),
                Some(b) if to_number(&v) > to_number(&b) => Some(v),
                Some(b) => Some(b),
            })
            .unwrap_or(Value::Nil),
        _ => {
            diagnostic("max() expects a list");
            Value::Nil
        }
    });

    native(env, "min", |_, args| match args.first() {
        Some(Value::List(items)) => items
            .borrow()
            .iter()
            .cloned()
            .fold(None, |best: Option<Value>, v| match best {
                None => Some(v),
                Some(b) if to_number(&v) < to_number(&b) => Some(v),
                Some(b) => Some(b),
            })
            .unwrap_or(Value::Nil),
        _ => {
            diagnostic("min() expects a list");
            Value::Nil
        }
    });

    native(env, "abs", |_, args| match args.first() {
        Some(v) => Value::Number(to_number(v).abs()),
        None => Value::Number(0.0),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::Interpreter;

    fn eval(src: &str) -> Value {
        let mut interp = Interpreter::new();
        interp.eval_repl_line(src).unwrap().unwrap_or(Value::Nil)
    }

    #[test]
    fn test_len_over_string_list_map() {
        assert_eq!(eval("len(\"hello\")").to_string(), "5");
        assert_eq!(eval("len([1,2,3])").to_string(), "3");
        assert_eq!(eval("len({a: 1})").to_string(), "1");
    }

    #[test]
    fn test_range_one_two_three_args() {
        assert_eq!(eval("range(3)").to_string(), "[0, 1, 2]");
        assert_eq!(eval("range(1, 4)").to_string(), "[1, 2, 3]");
        assert_eq!(eval("range(0, 10, 2)").to_string(), "[0, 2, 4, 6, 8]");
        assert_eq!(eval("range(3, 0)").to_string(), "[3, 2, 1]");
    }

    #[test]
    fn test_str_int_float_type_conversions() {
        assert_eq!(eval("str(5)").to_string(), "5");
        assert_eq!(eval("int(\"42\")").to_string(), "42");
        assert_eq!(eval("float(\"2.5\")").to_string(), "2.5");
        assert_eq!(eval("type(5)").to_string(), "number");
        assert_eq!(eval("type(\"x\")").to_string(), "string");
    }

    #[test]
    fn test_filter_and_reduce() {
        assert_eq!(eval("filter([1,2,3,4], fn(n) => n % 2 == 0)").to_string(), "[2, 4]");
        assert_eq!(eval("reduce([1,2,3,4], fn(a,b) => a + b)").to_string(), "10");
        assert_eq!(eval("reduce([1,2,3], fn(a,b) => a + b, 10)").to_string(), "16");
        assert!(matches!(eval("reduce([], fn(a,b) => a + b)"), Value::Nil));
    }

    #[test]
    fn test_sum_max_min_abs() {
        assert_eq!(eval("sum([1,2,3])").to_string(), "6");
        assert_eq!(eval("max([3,1,4,1,5])").to_string(), "5");
        assert_eq!(eval("min([3,1,4,1,5])").to_string(), "1");
        assert_eq!(eval("abs(-7)").to_string(), "7");
    }
}
