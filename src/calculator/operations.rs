//! Arithmetic operators
//!
//! Every operator is a pure function of two decimals. Operands are widened to
//! the working precision before the operator runs so that results are rounded
//! once, at the end. Results whose decimal order of magnitude leaves
//! `[-max_exponent, max_exponent]` are rejected, since printing them would
//! mean writing out every digit.

use std::fmt;
use std::str::FromStr;

use dashu::float::DBig;
use dashu::integer::IBig;

use crate::error::{CalcError, Result};

/// Largest integer exponent evaluated exactly by `power`.
const MAX_EXACT_EXPONENT: u32 = 100_000;

/// Newton steps allowed when refining an integer root.
const MAX_NEWTON_STEPS: usize = 64;

/// Working limits for one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumericContext {
    /// Significant digits results are rounded to.
    pub precision: usize,
    /// Largest decimal order of magnitude a value may have, in either direction.
    pub max_exponent: usize,
}

impl NumericContext {
    /// Whether `value` is zero or has an order of magnitude within range.
    pub fn in_range(&self, value: &DBig) -> bool {
        match order_of_magnitude(value) {
            Some(order) => order.unsigned_abs() <= self.max_exponent,
            None => true,
        }
    }

    fn range_text(&self) -> String {
        format!("1e-{} and 1e{}", self.max_exponent, self.max_exponent)
    }

    pub fn out_of_range_operand(&self) -> CalcError {
        CalcError::Validation(format!(
            "Value out of range: magnitude must be between {}",
            self.range_text()
        ))
    }

    fn out_of_range_result(&self) -> CalcError {
        CalcError::Operation(format!(
            "Result out of range: magnitude must be between {}",
            self.range_text()
        ))
    }
}

/// Decimal exponent of the leading digit, `None` for zero.
pub fn order_of_magnitude(value: &DBig) -> Option<isize> {
    let repr = value.repr();
    if repr.is_zero() {
        return None;
    }
    Some(repr.exponent() + repr.digits() as isize - 1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    Root,
    Modulus,
    IntDivide,
    Percent,
    AbsDiff,
}

impl Operation {
    pub const ALL: [Operation; 10] = [
        Operation::Add,
        Operation::Subtract,
        Operation::Multiply,
        Operation::Divide,
        Operation::Power,
        Operation::Root,
        Operation::Modulus,
        Operation::IntDivide,
        Operation::Percent,
        Operation::AbsDiff,
    ];

    /// Look up an operator by its command name, ignoring case.
    pub fn from_command(name: &str) -> Option<Operation> {
        let name = name.trim().to_lowercase();
        Self::ALL.into_iter().find(|op| op.command() == name)
    }

    /// The command typed at the prompt.
    pub fn command(&self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Subtract => "subtract",
            Operation::Multiply => "multiply",
            Operation::Divide => "divide",
            Operation::Power => "power",
            Operation::Root => "root",
            Operation::Modulus => "modulus",
            Operation::IntDivide => "int_divide",
            Operation::Percent => "percent",
            Operation::AbsDiff => "abs_diff",
        }
    }

    /// The name shown in history listings.
    pub fn display_name(&self) -> &'static str {
        match self {
            Operation::Add => "Addition",
            Operation::Subtract => "Subtraction",
            Operation::Multiply => "Multiplication",
            Operation::Divide => "Division",
            Operation::Power => "Power",
            Operation::Root => "Root",
            Operation::Modulus => "Modulus",
            Operation::IntDivide => "Integer Division",
            Operation::Percent => "Percentage",
            Operation::AbsDiff => "Absolute Difference",
        }
    }

    /// Apply the operator at the context's precision (or the operands' own,
    /// if higher).
    pub fn apply(&self, a: &DBig, b: &DBig, ctx: NumericContext) -> Result<DBig> {
        let precision = ctx.precision.max(a.precision()).max(b.precision());
        let a = widen(a, precision);
        let b = widen(b, precision);

        let result = match self {
            Operation::Add => &a + &b,
            Operation::Subtract => &a - &b,
            Operation::Multiply => &a * &b,
            Operation::Divide => {
                ensure_nonzero(&b, "Division by zero is not allowed")?;
                &a / &b
            }
            Operation::Power => power(&a, &b, precision)?,
            Operation::Root => root(&a, &b, precision)?,
            Operation::Modulus => {
                ensure_nonzero(&b, "Modulus by zero is not allowed")?;
                let quotient = (&a / &b).trunc();
                &a - &(&b * &quotient)
            }
            Operation::IntDivide => {
                ensure_nonzero(&b, "Integer division by zero is not allowed")?;
                (&a / &b).trunc()
            }
            Operation::Percent => {
                ensure_nonzero(&b, "Cannot calculate percentage with zero denominator")?;
                &(&a / &b) * &widen(&DBig::from_parts(IBig::from(100u8), 0), precision)
            }
            Operation::AbsDiff => abs(&a - &b),
        };

        if !ctx.in_range(&result) {
            return Err(ctx.out_of_range_result());
        }
        Ok(result)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

fn widen(value: &DBig, precision: usize) -> DBig {
    value.clone().with_precision(precision).value()
}

fn is_zero(value: &DBig) -> bool {
    *value == DBig::ZERO
}

fn is_integer(value: &DBig) -> bool {
    value.trunc() == *value
}

fn abs(value: DBig) -> DBig {
    if value < DBig::ZERO {
        -value
    } else {
        value
    }
}

fn ensure_nonzero(value: &DBig, message: &str) -> Result<()> {
    if is_zero(value) {
        return Err(CalcError::Validation(message.to_string()));
    }
    Ok(())
}

fn power(base: &DBig, exponent: &DBig, precision: usize) -> Result<DBig> {
    if *exponent < DBig::ZERO {
        return Err(CalcError::Validation(
            "Negative exponents not supported".to_string(),
        ));
    }

    if is_integer(exponent) {
        let limit = DBig::from_parts(IBig::from(MAX_EXACT_EXPONENT), 0);
        if *exponent > limit {
            return Err(CalcError::Operation(format!(
                "Exponent too large: {} (limit {})",
                exponent, MAX_EXACT_EXPONENT
            )));
        }
        let exponent: IBig = exponent.to_int().value();
        return Ok(base.powi(exponent));
    }

    if is_zero(base) {
        return Ok(DBig::ZERO);
    }
    if *base < DBig::ZERO {
        return Err(CalcError::Validation(
            "Cannot raise a negative number to a fractional power".to_string(),
        ));
    }
    pow10(log10(base) * to_f64(exponent), precision)
}

fn root(value: &DBig, degree: &DBig, precision: usize) -> Result<DBig> {
    if *value < DBig::ZERO {
        return Err(CalcError::Validation(
            "Cannot calculate root of negative number".to_string(),
        ));
    }
    if is_zero(degree) {
        return Err(CalcError::Validation("Zero root is undefined".to_string()));
    }
    if is_zero(value) {
        return Ok(DBig::ZERO);
    }

    let estimate = pow10(log10(value) / to_f64(degree), precision)?;

    let limit = DBig::from_parts(IBig::from(MAX_EXACT_EXPONENT), 0);
    if is_integer(degree) && *degree > DBig::ZERO && *degree <= limit {
        let degree: IBig = degree.to_int().value();
        return Ok(newton_root(value, degree, estimate, precision));
    }
    Ok(estimate)
}

/// Refine `estimate` towards the `degree`-th root of `value` with
/// x' = ((n - 1) x + value / x^(n - 1)) / n.
fn newton_root(value: &DBig, degree: IBig, estimate: DBig, precision: usize) -> DBig {
    let lower = &degree - IBig::ONE;
    let n = widen(&DBig::from_parts(degree, 0), precision);
    let n_minus_one = widen(&DBig::from_parts(lower.clone(), 0), precision);

    let mut x = estimate;
    for _ in 0..MAX_NEWTON_STEPS {
        if is_zero(&x) {
            break;
        }
        let next = &(&(&n_minus_one * &x) + &(value / &x.powi(lower.clone()))) / &n;
        if next == x {
            break;
        }
        x = next;
    }
    x
}

/// Base-10 logarithm of a positive value, split into order and mantissa so
/// values far outside the `f64` range still work.
fn log10(value: &DBig) -> f64 {
    let repr = value.repr();
    let order = repr.exponent() + repr.digits() as isize - 1;
    let mantissa = DBig::from_parts(repr.significand().clone(), repr.exponent() - order);
    order as f64 + to_f64(&mantissa).log10()
}

/// `10^exponent` at `precision`, built as mantissa times a power of ten.
fn pow10(exponent: f64, precision: usize) -> Result<DBig> {
    // Far beyond any configurable range; keeps the cast below lossless.
    const LIMIT: f64 = 1e15;
    if !exponent.is_finite() || exponent.abs() > LIMIT {
        return Err(CalcError::Operation(format!(
            "Result is not a finite number: 1e{}",
            exponent
        )));
    }
    let order = exponent.floor();
    let mantissa = from_f64(10f64.powf(exponent - order), precision)?;
    Ok(&mantissa * &DBig::from_parts(IBig::ONE, order as isize))
}

fn to_f64(value: &DBig) -> f64 {
    value.to_f64().value()
}

fn from_f64(value: f64, precision: usize) -> Result<DBig> {
    if !value.is_finite() {
        return Err(CalcError::Operation(format!(
            "Result is not a finite number: {}",
            value
        )));
    }
    let parsed = DBig::from_str(&value.to_string())
        .map_err(|e| CalcError::Operation(format!("Cannot represent result {}: {}", value, e)))?;
    Ok(widen(&parsed, precision))
}
