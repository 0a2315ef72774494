//! Arithmetic evaluation tool.

use async_trait::async_trait;
use thiserror::Error;

use super::Tool;

#[derive(Debug, Error)]
#[error("Could not evaluate '{expression}': {reason}")]
pub struct EvaluationError {
    pub expression: String,
    pub reason: String,
}

/// Evaluates a mathematical expression with the `meval` crate.
pub struct Calculator;

impl Calculator {
    /// Evaluate an expression, rendering integral results without a decimal
    /// point ("4" rather than "4.0").
    pub fn evaluate(expression: &str) -> Result<String, EvaluationError> {
        let value = meval::eval_str(expression).map_err(|e| EvaluationError {
            expression: expression.to_string(),
            reason: e.to_string(),
        })?;

        if value.fract() == 0.0 && value.abs() < 1e15 {
            Ok(format!("{}", value as i64))
        } else {
            Ok(format!("{}", value))
        }
    }
}

#[async_trait]
impl Tool for Calculator {
    fn name(&self) -> &str {
        "calculator"
    }

    fn description(&self) -> &str {
        "Answers math questions. Input must be a plain mathematical expression, e.g. '12 * (3 + 4)'. Do not pass words, only the expression."
    }

    async fn invoke(&self, input: &str) -> anyhow::Result<String> {
        Ok(Self::evaluate(input.trim())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn evaluates_simple_addition() {
        let result = Calculator.invoke("2+2").await.unwrap();
        assert_eq!(result, "4");
    }

    #[tokio::test]
    async fn evaluates_product_with_whitespace() {
        let result = Calculator.invoke(" 5 * 6 ").await.unwrap();
        assert_eq!(result, "30");
    }

    #[test]
    fn renders_fractional_results_as_is() {
        assert_eq!(Calculator::evaluate("7 / 2").unwrap(), "3.5");
    }

    #[test]
    fn malformed_expression_is_an_evaluation_error() {
        let err = Calculator::evaluate("what is two plus two").unwrap_err();
        assert!(err.expression.contains("two plus two"));
    }
}
