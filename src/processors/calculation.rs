//! Processor for arithmetic challenges such as `3+5=?`.

use crate::core::errors::CaptchaResult;
use crate::core::traits::{CaptchaProcessor, OcrEngine, ProcessorOptions, bool_option, str_option};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

/// First `digits operator digits` run anywhere in the cleaned text.
///
/// Only the first run is taken; surrounding text and additional terms are
/// ignored. Multi-operator expressions are out of scope.
static EXPRESSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)([+\-*/x×÷])(\d+)").expect("expression pattern is valid"));

/// Character confusions the engine commonly produces on digit glyphs.
const CONFUSIONS: [(char, char); 7] = [
    ('O', '0'),
    ('o', '0'),
    ('l', '1'),
    ('I', '1'),
    ('S', '5'),
    ('Z', '2'),
    ('B', '8'),
];

/// A `digits operator digits` run extracted from engine output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedExpression {
    /// Left operand, a non-negative integer.
    pub lhs: u64,
    /// The operator exactly as it appeared in the cleaned text.
    pub operator: char,
    /// Right operand, a non-negative integer.
    pub rhs: u64,
}

impl ParsedExpression {
    /// Evaluates the expression.
    ///
    /// Division by zero yields positive infinity rather than failing: a
    /// misread divisor should surface as a nonsense value, not an error.
    pub fn evaluate(&self) -> f64 {
        let lhs = self.lhs as f64;
        let rhs = self.rhs as f64;
        match self.operator {
            '+' => lhs + rhs,
            '-' => lhs - rhs,
            '*' | 'x' | '×' => lhs * rhs,
            '/' | '÷' => {
                if self.rhs == 0 {
                    f64::INFINITY
                } else {
                    lhs / rhs
                }
            }
            // The pattern admits no other operator
            _ => unreachable!("unexpected operator {:?}", self.operator),
        }
    }
}

impl std::fmt::Display for ParsedExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.lhs, self.operator, self.rhs)
    }
}

/// Recognizes arithmetic challenges and returns the computed value.
///
/// Engine output is normalized first: literal spaces removed, common digit
/// confusions corrected, `?` and `=` dropped. When no `digits operator
/// digits` run remains, the cleaned text is returned verbatim with no
/// numeric interpretation.
///
/// Options: `return_type` (`"result"` default, or `"expression"` for the
/// matched substring) and `as_int` (default true: integral results are
/// formatted without a decimal point).
pub struct CalculationProcessor {
    engine: Arc<dyn OcrEngine>,
}

impl CalculationProcessor {
    /// Creates a calculation processor backed by the given engine.
    pub fn new(engine: Arc<dyn OcrEngine>) -> Self {
        Self { engine }
    }
}

impl CaptchaProcessor for CalculationProcessor {
    fn name(&self) -> &str {
        "calculation"
    }

    fn process(&self, image: &[u8], options: &ProcessorOptions) -> CaptchaResult<String> {
        let return_type = str_option(options, "return_type", "result")?;
        let as_int = bool_option(options, "as_int", true)?;

        let raw = self.engine.classification(image)?;
        let cleaned = clean_text(&raw);

        match parse_expression(&cleaned) {
            Some(expression) => {
                if return_type == "expression" {
                    Ok(expression.to_string())
                } else {
                    Ok(format_value(expression.evaluate(), as_int))
                }
            }
            // No digit-operator-digit run: hand back the cleaned text
            None => Ok(cleaned),
        }
    }
}

/// Normalizes raw engine output for expression extraction.
fn clean_text(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, ' ' | '?' | '='))
        .map(|c| {
            CONFUSIONS
                .iter()
                .find(|(from, _)| *from == c)
                .map(|(_, to)| *to)
                .unwrap_or(c)
        })
        .collect()
}

/// Extracts the first `digits operator digits` run from cleaned text.
fn parse_expression(cleaned: &str) -> Option<ParsedExpression> {
    let captures = EXPRESSION.captures(cleaned)?;
    Some(ParsedExpression {
        lhs: captures[1].parse().ok()?,
        operator: captures[2].chars().next()?,
        rhs: captures[3].parse().ok()?,
    })
}

/// Formats a computed value per the `as_int` flag.
fn format_value(value: f64, as_int: bool) -> String {
    if value.is_infinite() {
        return value.to_string();
    }
    if value.fract() == 0.0 {
        if as_int {
            format!("{}", value as i64)
        } else {
            format!("{value:.1}")
        }
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn processor(output: &'static str) -> CalculationProcessor {
        CalculationProcessor::new(Arc::new(move |_image: &[u8]| -> CaptchaResult<String> {
            Ok(output.to_string())
        }))
    }

    fn recognize(output: &'static str) -> String {
        processor(output)
            .process(b"img", &ProcessorOptions::new())
            .unwrap()
    }

    #[test]
    fn test_addition() {
        assert_eq!(recognize("3+5"), "8");
    }

    #[test]
    fn test_subtraction_can_go_negative() {
        assert_eq!(recognize("3-5"), "-2");
    }

    #[test]
    fn test_multiplication_variants() {
        assert_eq!(recognize("12*3"), "36");
        assert_eq!(recognize("12x3"), "36");
        assert_eq!(recognize("2×3"), "6");
    }

    #[test]
    fn test_division_keeps_fraction() {
        assert_eq!(recognize("9/2"), "4.5");
        assert_eq!(recognize("9/3"), "3");
        assert_eq!(recognize("8÷2"), "4");
    }

    #[test]
    fn test_division_by_zero_is_infinity() {
        assert_eq!(recognize("7÷0"), "inf");
        assert_eq!(recognize("7/0"), "inf");
    }

    #[test]
    fn test_noise_is_stripped_before_matching() {
        assert_eq!(recognize("3 + 5 = ?"), "8");
    }

    #[test]
    fn test_confusion_corrections() {
        // l0+S reads as 10+5 once corrected
        assert_eq!(recognize("l0+S"), "15");
        assert_eq!(recognize("Z*B"), "16");
    }

    #[test]
    fn test_unparseable_text_returned_cleaned() {
        assert_eq!(recognize("CxA"), "CxA");
        // Cleaning still applies to the fallback
        assert_eq!(recognize("C x A ?"), "CxA");
    }

    #[test]
    fn test_first_run_wins() {
        assert_eq!(recognize("1+2+3"), "3");
    }

    #[test]
    fn test_expression_return_type() {
        let mut options = ProcessorOptions::new();
        options.insert("return_type".to_string(), json!("expression"));

        assert_eq!(processor("3+5=?").process(b"img", &options).unwrap(), "3+5");
        assert_eq!(processor("2×3").process(b"img", &options).unwrap(), "2×3");
    }

    #[test]
    fn test_as_int_false_keeps_decimal_point() {
        let mut options = ProcessorOptions::new();
        options.insert("as_int".to_string(), json!(false));

        assert_eq!(processor("3+5").process(b"img", &options).unwrap(), "8.0");
        assert_eq!(processor("9/2").process(b"img", &options).unwrap(), "4.5");
    }

    #[test]
    fn test_unrecognized_return_type_behaves_as_result() {
        let mut options = ProcessorOptions::new();
        options.insert("return_type".to_string(), json!("everything"));

        assert_eq!(processor("3+5").process(b"img", &options).unwrap(), "8");
    }
}
