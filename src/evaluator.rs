//! Left-to-right expression evaluation.
//!
//! There is no operator precedence: the running result starts at `0` with a
//! pending `+`, each digit is folded into the result with the pending
//! operator, and any other character replaces the pending operator.
//! `"7/7*4+4-7"` is therefore `((((0+7)/7)*4)+4)-7 = 1`.

/// Evaluates a decoded expression.
///
/// Never fails. An empty expression yields `0`, a trailing operator is
/// ignored, an unrecognised operator leaves the result unchanged, and
/// dividing by `0` yields IEEE infinity or NaN.
pub fn evaluate(expression: &str) -> f64 {
    let mut result = 0.0_f64;
    let mut pending = '+';

    for c in expression.chars() {
        match c.to_digit(10) {
            Some(digit) => {
                let operand = f64::from(digit);
                // Two independent dispatch chains: `+` then `*`, and
                // `-` then `/`. At most one branch fires per digit.
                if pending == '+' {
                    result += operand;
                } else if pending == '*' {
                    result *= operand;
                }
                if pending == '-' {
                    result -= operand;
                } else if pending == '/' {
                    result /= operand;
                }
            }
            None => pending = c,
        }
    }

    result
}
