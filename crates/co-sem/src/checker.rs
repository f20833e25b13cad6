//! Type rules. Each function takes the operand types already resolved by
//! the analyzer's expression walk and either returns the result type or
//! raises a `SemanticError` pointing at the offending token's position.
//!
//! The rules follow a Java-like lattice: no promotion except int -> float
//! in arithmetic, and no implicit conversion across assignment.

use co_util::{CoError, SemanticError, Span};

use co_par::ast::BinaryOp;

use crate::types::Type;

fn err(message: impl Into<String>, span: Span) -> CoError {
    CoError::Semantic(SemanticError {
        message: message.into(),
        line: span.line,
        column: span.column,
    })
}

pub fn check_unary_not(operand: Type, span: Span) -> Result<Type, CoError> {
    if operand != Type::Bool {
        return Err(err(
            format!("The operator \"not\" cannot be used with the type \"{}\"", operand),
            span,
        ));
    }
    Ok(Type::Bool)
}

pub fn check_unary_sign(op: &str, operand: Type, span: Span) -> Result<Type, CoError> {
    match operand {
        Type::Str | Type::Bool | Type::Range => Err(err(
            format!("The operator \"{}\" cannot be used with the type \"{}\"", op, operand),
            span,
        )),
        Type::Float => Ok(Type::Float),
        Type::Int => Ok(Type::Int),
    }
}

pub fn check_binary_op(op: BinaryOp, left: Type, right: Type, span: Span) -> Result<Type, CoError> {
    match op {
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::IDiv
        | BinaryOp::Mod => check_arithmetic_op(op, left, right, span),
        BinaryOp::Eq | BinaryOp::NotEq => {
            if left != right {
                return Err(err(
                    format!("The types of \"{}\" and \"{}\" cannot be compared", left, right),
                    span,
                ));
            }
            Ok(Type::Bool)
        }
        BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => {
            check_comparison_op(op, left, right, span)
        }
        BinaryOp::And | BinaryOp::Or => {
            if left != Type::Bool && right != Type::Bool {
                return Err(err(
                    format!(
                        "\"{}\" operator cannot be used with \"{}\" and \"{}\"",
                        op_symbol(op), left, right
                    ),
                    span,
                ));
            }
            Ok(Type::Bool)
        }
    }
}

fn check_arithmetic_op(op: BinaryOp, left: Type, right: Type, span: Span) -> Result<Type, CoError> {
    let mismatch = || {
        err(
            format!(
                "\"{}\" operator cannot be used with \"{}\" and \"{}\"",
                op_symbol(op), left, right
            ),
            span,
        )
    };

    if left == Type::Str || right == Type::Str {
        if op == BinaryOp::Add {
            return Ok(Type::Str);
        }
        if op == BinaryOp::Mul && (left == Type::Int || right == Type::Int) {
            return Ok(Type::Str);
        }
        return Err(mismatch());
    }

    if left == Type::Bool || right == Type::Bool {
        return Err(mismatch());
    }

    if left == Type::Float || right == Type::Float {
        if op == BinaryOp::IDiv {
            return Ok(Type::Int);
        }
        return Ok(Type::Float);
    }

    Ok(Type::Int)
}

fn check_comparison_op(op: BinaryOp, left: Type, right: Type, span: Span) -> Result<Type, CoError> {
    if left == Type::Str && right == Type::Str {
        return Ok(Type::Bool);
    }
    if left == Type::Str || right == Type::Str || left == Type::Bool || right == Type::Bool {
        return Err(err(
            format!(
                "\"{}\" operator cannot be used with \"{}\" and \"{}\"",
                op_symbol(op), left, right
            ),
            span,
        ));
    }
    Ok(Type::Bool)
}

fn op_symbol(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "+",
        BinaryOp::Sub => "-",
        BinaryOp::Mul => "*",
        BinaryOp::Div => "/",
        BinaryOp::IDiv => "//",
        BinaryOp::Mod => "%",
        BinaryOp::Eq => "==",
        BinaryOp::NotEq => "!=",
        BinaryOp::Lt => "<",
        BinaryOp::LtEq => "<=",
        BinaryOp::Gt => ">",
        BinaryOp::GtEq => ">=",
        BinaryOp::And => "and",
        BinaryOp::Or => "or",
    }
}

pub fn check_accessor(accessor_type: Type, span: Span) -> Result<(), CoError> {
    if accessor_type != Type::Str {
        return Err(err(
            format!("\"{}\" type cannot be an accessor", accessor_type),
            span,
        ));
    }
    Ok(())
}

pub fn check_index(index_type: Type, span: Span) -> Result<(), CoError> {
    if index_type != Type::Int {
        return Err(err(
            format!("Index of type \"{}\" is not allowed", index_type),
            span,
        ));
    }
    Ok(())
}

pub fn check_assignment(target: Type, value: Type, span: Span) -> Result<(), CoError> {
    if target != value {
        return Err(err(
            format!("Cannot assign \"{}\" to \"{}\"", value, target),
            span,
        ));
    }
    Ok(())
}

pub fn check_accessor_assignment(accessor_type: Type, span: Span) -> Result<(), CoError> {
    if accessor_type == Type::Str {
        return Err(err("Strings are immutable", span));
    }
    Ok(())
}

pub fn check_condition(condition_type: Type, span: Span) -> Result<(), CoError> {
    if condition_type != Type::Bool {
        return Err(err(
            format!("The condition must evaluate to \"bool\", not \"{}\"", condition_type),
            span,
        ));
    }
    Ok(())
}

pub fn check_range_expr(
    start: Type,
    end: Type,
    step: Option<Type>,
    span: Span,
) -> Result<Type, CoError> {
    if start != Type::Int || end != Type::Int {
        return Err(err("The start and the end of the range must be \"int\"", span));
    }
    if let Some(step) = step {
        if step != Type::Int {
            return Err(err("\"step\" of the range must be \"int\"", span));
        }
    }
    Ok(Type::Range)
}

pub fn check_iterable(iterable_type: Type, span: Span) -> Result<(), CoError> {
    if iterable_type != Type::Range && iterable_type != Type::Str {
        return Err(err(
            format!("Cannot iterate over \"{}\"", iterable_type),
            span,
        ));
    }
    Ok(())
}

pub fn check_return(
    func_name: &str,
    declared: Option<Type>,
    returned: Option<Type>,
    span: Span,
) -> Result<(), CoError> {
    if declared != returned {
        let returned_name = returned.map(|t| t.to_string()).unwrap_or_else(|| "nothing".into());
        let declared_name = declared.map(|t| t.to_string()).unwrap_or_else(|| "nothing".into());
        return Err(err(
            format!(
                "Function \"{}\" returns \"{}\" but should return \"{}\"",
                func_name, returned_name, declared_name
            ),
            span,
        ));
    }
    Ok(())
}
