//! Built-in function table: arity and argument-type rules, resolved by
//! name rather than declared like user functions (see §6 of the external
//! interface contract for the full table).

use co_util::{CoError, SemanticError, Span};

use crate::types::Type;

fn err(message: impl Into<String>, span: Span) -> CoError {
    CoError::Semantic(SemanticError {
        message: message.into(),
        line: span.line,
        column: span.column,
    })
}

/// `None` if `name` does not name a built-in.
pub fn return_type(name: &str) -> Option<Option<Type>> {
    Some(match name {
        "print" | "println" => None,
        "input" => Some(Type::Str),
        "reverse" => Some(Type::Str),
        "len" => Some(Type::Int),
        "pow" => Some(Type::Float),
        "typeof" => Some(Type::Str),
        "toint" => Some(Type::Int),
        "tofloat" => Some(Type::Float),
        "tobool" => Some(Type::Bool),
        "tostr" => Some(Type::Str),
        _ => return None,
    })
}

pub fn is_builtin(name: &str) -> bool {
    return_type(name).is_some()
}

pub fn check_call(name: &str, arg_types: &[Type], span: Span) -> Result<(), CoError> {
    match name {
        "typeof" => {
            if arg_types.len() != 1 {
                return Err(err(format!("Function \"{}\" must take 1 argument", name), span));
            }
            Ok(())
        }
        "print" | "println" => Ok(()),
        "input" => {
            if !(arg_types.is_empty() || arg_types.len() == 1) {
                return Err(err(
                    format!("Function \"{}\" must take 0 or 1 argument", name),
                    span,
                ));
            }
            if arg_types.len() == 1 && arg_types[0] != Type::Str {
                return Err(err(
                    format!("The function named \"{}\" can only accept a string argument", name),
                    span,
                ));
            }
            Ok(())
        }
        "reverse" | "len" => {
            if arg_types.len() != 1 {
                return Err(err(format!("Function \"{}\" must take 1 argument", name), span));
            }
            if arg_types[0] != Type::Str {
                return Err(err(
                    format!("The function named \"{}\" can only accept a string argument", name),
                    span,
                ));
            }
            Ok(())
        }
        "pow" => {
            if arg_types.len() != 2 {
                return Err(err(format!("Function \"{}\" must take 2 arguments", name), span));
            }
            let numeric = |t: Type| matches!(t, Type::Int | Type::Float);
            if !numeric(arg_types[0]) || !numeric(arg_types[1]) {
                return Err(err(
                    format!(
                        "The function named \"{}\" can only accept integer or float values as arguments",
                        name
                    ),
                    span,
                ));
            }
            Ok(())
        }
        "toint" | "tofloat" | "tobool" | "tostr" => {
            if arg_types.len() != 1 {
                return Err(err(format!("Function \"{}\" must take 1 argument", name), span));
            }
            Ok(())
        }
        _ => unreachable!("check_call invoked on a non-builtin name \"{}\"", name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use co_util::Span;

    #[test]
    fn pow_rejects_non_numeric_arguments() {
        let span = Span::point(1, 1);
        assert!(check_call("pow", &[Type::Str, Type::Int], span).is_err());
    }

    #[test]
    fn len_requires_exactly_one_string_argument() {
        let span = Span::point(1, 1);
        assert!(check_call("len", &[Type::Str], span).is_ok());
        assert!(check_call("len", &[Type::Int], span).is_err());
    }

    #[test]
    fn input_accepts_zero_or_one_string_argument() {
        let span = Span::point(1, 1);
        assert!(check_call("input", &[], span).is_ok());
        assert!(check_call("input", &[Type::Str], span).is_ok());
    }
}
