//! Execution of the built-in functions the semantic analyzer already
//! validated the call sites of - arity and argument types are never
//! rechecked here.

use std::io::{self, BufRead, Write};

use co_util::{CoError, InterpreterError, Span};

use crate::value::Value;

fn err(message: impl Into<String>, span: Span) -> CoError {
    CoError::Interpreter(InterpreterError {
        message: message.into(),
        line: span.line,
        column: span.column,
    })
}

pub fn is_builtin(name: &str) -> bool {
    matches!(
        name,
        "print" | "println" | "input" | "reverse" | "len" | "pow" | "typeof" | "toint" | "tofloat" | "tobool"
            | "tostr"
    )
}

pub fn call(name: &str, args: Vec<Value>, span: Span) -> Result<Option<Value>, CoError> {
    match name {
        "print" => {
            print_args(&args);
            io::stdout().flush().ok();
            Ok(None)
        }
        "println" => {
            print_args(&args);
            println!();
            Ok(None)
        }
        "input" => {
            if let Some(prompt) = args.first() {
                print!("{}", prompt);
                io::stdout().flush().ok();
            }
            let mut line = String::new();
            io::stdin()
                .lock()
                .read_line(&mut line)
                .map_err(|e| err(format!("Failed to read input: {}", e), span))?;
            if line.ends_with('\n') {
                line.pop();
                if line.ends_with('\r') {
                    line.pop();
                }
            }
            Ok(Some(Value::Str(line)))
        }
        "reverse" => {
            let s = args[0].as_str().expect("reverse: argument type checked by semantic pass");
            Ok(Some(Value::Str(s.chars().rev().collect())))
        }
        "len" => {
            let s = args[0].as_str().expect("len: argument type checked by semantic pass");
            Ok(Some(Value::Int(s.chars().count() as i64)))
        }
        "pow" => {
            let base = as_f64(&args[0]);
            let exp = as_f64(&args[1]);
            Ok(Some(Value::Float(base.powf(exp))))
        }
        "typeof" => Ok(Some(Value::Str(args[0].type_name().to_string()))),
        "toint" => Ok(Some(Value::Int(to_int(&args[0], span)?))),
        "tofloat" => Ok(Some(Value::Float(to_float(&args[0], span)?))),
        "tobool" => Ok(Some(Value::Bool(to_bool(&args[0], span)?))),
        "tostr" => Ok(Some(Value::Str(args[0].to_string()))),
        _ => unreachable!("builtins::call invoked on a non-builtin name \"{}\"", name),
    }
}

fn print_args(args: &[Value]) {
    let rendered: Vec<String> = args.iter().map(|v| v.to_string()).collect();
    print!("{}", rendered.join(" "));
}

fn as_f64(v: &Value) -> f64 {
    match v {
        Value::Int(i) => *i as f64,
        Value::Float(f) => *f,
        _ => unreachable!("pow: argument type checked by semantic pass"),
    }
}

fn to_int(v: &Value, span: Span) -> Result<i64, CoError> {
    match v {
        Value::Int(i) => Ok(*i),
        Value::Float(f) => Ok(*f as i64),
        Value::Bool(b) => Ok(if *b { 1 } else { 0 }),
        Value::Str(s) => s
            .trim()
            .parse()
            .map_err(|_| err(format!("Cannot convert \"{}\" to int", s), span)),
    }
}

fn to_float(v: &Value, span: Span) -> Result<f64, CoError> {
    match v {
        Value::Int(i) => Ok(*i as f64),
        Value::Float(f) => Ok(*f),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::Str(s) => s
            .trim()
            .parse()
            .map_err(|_| err(format!("Cannot convert \"{}\" to float", s), span)),
    }
}

fn to_bool(v: &Value, span: Span) -> Result<bool, CoError> {
    match v {
        Value::Bool(b) => Ok(*b),
        Value::Int(i) => Ok(*i != 0),
        Value::Float(f) => Ok(*f != 0.0),
        Value::Str(s) => match s.as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(err(format!("Cannot convert \"{}\" to bool", s), span)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use co_util::Span;

    fn span() -> Span {
        Span::point(1, 1)
    }

    #[test]
    fn reverse_reverses_a_string_by_codepoint() {
        let result = call("reverse", vec![Value::Str("abc".into())], span()).unwrap();
        assert_eq!(result, Some(Value::Str("cba".into())));
    }

    #[test]
    fn len_counts_codepoints_not_bytes() {
        let result = call("len", vec![Value::Str("héllo".into())], span()).unwrap();
        assert_eq!(result, Some(Value::Int(5)));
    }

    #[test]
    fn pow_always_returns_a_float() {
        let result = call("pow", vec![Value::Int(2), Value::Int(3)], span()).unwrap();
        assert_eq!(result, Some(Value::Float(8.0)));
    }

    #[test]
    fn toint_rejects_an_unparseable_string() {
        assert!(to_int(&Value::Str("abc".into()), span()).is_err());
    }

    #[test]
    fn tobool_accepts_only_the_literal_spellings() {
        assert!(to_bool(&Value::Str("true".into()), span()).unwrap());
        assert!(to_bool(&Value::Str("TRUE".into()), span()).is_err());
    }
}
