use crate::error::Error;
use crate::value::Value;

//===----------------------------------------------------------------------===//
// Native Functions
//===----------------------------------------------------------------------===//

/// `(+ a b)`
///
/// # Errors
///
/// Returns an `OperandError` unless given exactly two numbers, or when the
/// result overflows.
pub fn add(args: &[Value]) -> Result<Value, Error> {
    let (a, b) = two_numbers("+", args)?;
    a.checked_add(b).map(Value::Number).ok_or_else(|| overflow("+"))
}

/// `(- a b)`
pub fn sub(args: &[Value]) -> Result<Value, Error> {
    let (a, b) = two_numbers("-", args)?;
    a.checked_sub(b).map(Value::Number).ok_or_else(|| overflow("-"))
}

/// `(* a b)`
pub fn mul(args: &[Value]) -> Result<Value, Error> {
    let (a, b) = two_numbers("*", args)?;
    a.checked_mul(b).map(Value::Number).ok_or_else(|| overflow("*"))
}

/// `(/ a b)`, integer division truncating toward zero.
///
/// # Errors
///
/// Returns an `OperandError` on division by zero.
pub fn div(args: &[Value]) -> Result<Value, Error> {
    let (a, b) = two_numbers("/", args)?;
    if b == 0 {
        return Err(Error::OperandError("division by zero".to_string()));
    }
    a.checked_div(b).map(Value::Number).ok_or_else(|| overflow("/"))
}

/// `(= a b)`: structural equality over any two values.
pub fn equal(args: &[Value]) -> Result<Value, Error> {
    match args {
        [a, b] => Ok(Value::bool(a == b)),
        _ => Err(arity_error("=", args.len())),
    }
}

pub fn lt(args: &[Value]) -> Result<Value, Error> {
    let (a, b) = two_numbers("<", args)?;
    Ok(Value::bool(a < b))
}

pub fn le(args: &[Value]) -> Result<Value, Error> {
    let (a, b) = two_numbers("<=", args)?;
    Ok(Value::bool(a <= b))
}

pub fn gt(args: &[Value]) -> Result<Value, Error> {
    let (a, b) = two_numbers(">", args)?;
    Ok(Value::bool(a > b))
}

pub fn ge(args: &[Value]) -> Result<Value, Error> {
    let (a, b) = two_numbers(">=", args)?;
    Ok(Value::bool(a >= b))
}

/// `(list & items)`
pub fn list(args: &[Value]) -> Result<Value, Error> {
    Ok(Value::list(args.to_vec()))
}

//===----------------------------------------------------------------------===//
// Helpers
//===----------------------------------------------------------------------===//

fn two_numbers(name: &str, args: &[Value]) -> Result<(i64, i64), Error> {
    match args {
        [Value::Number(a), Value::Number(b)] => Ok((*a, *b)),
        [a, b] => Err(Error::OperandError(format!(
            "{} expects two numbers, got {} and {}",
            name,
            a.type_name(),
            b.type_name()
        ))),
        _ => Err(arity_error(name, args.len())),
    }
}

fn arity_error(name: &str, got: usize) -> Error {
    Error::OperandError(format!("{} expects 2 arguments, got {}", name, got))
}

fn overflow(name: &str) -> Error {
    Error::OperandError(format!("integer overflow in {}", name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(v: i64) -> Value {
        Value::Number(v)
    }

    #[test]
    fn arithmetic() {
        assert_eq!(add(&[n(1), n(2)]).unwrap(), n(3));
        assert_eq!(sub(&[n(1), n(2)]).unwrap(), n(-1));
        assert_eq!(mul(&[n(6), n(7)]).unwrap(), n(42));
        assert_eq!(div(&[n(7), n(2)]).unwrap(), n(3));
        assert_eq!(div(&[n(-7), n(2)]).unwrap(), n(-3));
    }

    #[test]
    fn rejects_wrong_operands() {
        assert!(matches!(add(&[n(1)]), Err(Error::OperandError(_))));
        assert!(matches!(add(&[n(1), n(2), n(3)]), Err(Error::OperandError(_))));
        assert!(matches!(
            mul(&[n(1), Value::String("2".into())]),
            Err(Error::OperandError(_))
        ));
        assert!(matches!(lt(&[Value::NIL, n(2)]), Err(Error::OperandError(_))));
    }

    #[test]
    fn division_by_zero_and_overflow() {
        assert_eq!(div(&[n(1), n(0)]), Err(Error::OperandError("division by zero".into())));
        assert!(matches!(add(&[n(i64::MAX), n(1)]), Err(Error::OperandError(_))));
        assert!(matches!(div(&[n(i64::MIN), n(-1)]), Err(Error::OperandError(_))));
    }

    #[test]
    fn comparisons_return_literals() {
        assert_eq!(lt(&[n(1), n(2)]).unwrap(), Value::TRUE);
        assert_eq!(ge(&[n(1), n(2)]).unwrap(), Value::FALSE);
        assert_eq!(le(&[n(2), n(2)]).unwrap(), Value::TRUE);
        assert_eq!(gt(&[n(3), n(2)]).unwrap(), Value::TRUE);
        assert_eq!(equal(&[n(2), n(2)]).unwrap(), Value::TRUE);
        assert_eq!(equal(&[n(2), Value::String("2".into())]).unwrap(), Value::FALSE);
    }

    #[test]
    fn list_collects_arguments() {
        assert_eq!(list(&[n(1), n(2)]).unwrap(), Value::list(vec![n(1), n(2)]));
        assert_eq!(list(&[]).unwrap(), Value::list(vec![]));
    }
}
