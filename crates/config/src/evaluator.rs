// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Built-in expression evaluator
//!
//! Expressions are result constructors rather than a scripting language:
//!
//! | Source                  | Result                         |
//! |-------------------------|--------------------------------|
//! | `21.5`, `"on"`, `true`  | `Final(literal)`               |
//! | `Result(<literal>)`     | `Final(literal)`               |
//! | `Add(<literal>)`        | `Accumulate(literal)`          |
//! | `Skip()`                | `Skip`                         |
//! | `Abort()`               | `Abort`                        |
//! | `Break()`, `Break(n)`   | `BreakLevels(1)`, `BreakLevels(n)` |
//! | `IncludeSchedule("s")`  | the snippet named `s`          |
//! | `None`                  | nothing, delegate to ancestors |

use regex::Regex;
use rk_core::{ConfigurationError, EvaluationError, Evaluator, Expression, ResultValue, Schedule, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, LazyLock};
use thiserror::Error;

// Constructor call: `Name(args)`
#[allow(clippy::expect_used)]
static CALL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z]+)\s*\((.*)\)$").expect("constant regex pattern is valid")
});

/// Why an expression source could not be turned into a result
#[derive(Debug, Error)]
pub(crate) enum SourceError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error("unknown schedule snippet {0:?}")]
    UnknownSnippet(String),
    #[error("{0}")]
    Malformed(String),
}

/// Evaluates result-constructor expressions against a set of snippets
#[derive(Clone, Default)]
pub struct BuiltinEvaluator {
    snippets: Arc<BTreeMap<String, Arc<Schedule>>>,
}

impl BuiltinEvaluator {
    pub fn new(snippets: BTreeMap<String, Arc<Schedule>>) -> Self {
        Self {
            snippets: Arc::new(snippets),
        }
    }

    pub fn snippet(&self, name: &str) -> Option<&Arc<Schedule>> {
        self.snippets.get(name)
    }

    pub(crate) fn parse(&self, source: &str) -> Result<Option<ResultValue>, SourceError> {
        let source = source.trim();
        if source == "None" {
            return Ok(None);
        }

        let Some(caps) = CALL_PATTERN.captures(source) else {
            return parse_literal(source).map(|v| Some(ResultValue::Final(v)));
        };
        let args = caps[2].trim();

        let result = match &caps[1] {
            "Skip" => no_args("Skip", args).map(|()| ResultValue::Skip)?,
            "Abort" => no_args("Abort", args).map(|()| ResultValue::Abort)?,
            "Break" if args.is_empty() => ResultValue::break_levels(1)?,
            "Break" => {
                let levels = args.parse::<u32>().map_err(|_| {
                    SourceError::Malformed(format!("Break expects a level count, got {:?}", args))
                })?;
                ResultValue::break_levels(levels)?
            }
            "Add" => ResultValue::Accumulate(parse_literal(args)?),
            "Result" => ResultValue::Final(parse_literal(args)?),
            "IncludeSchedule" => {
                let Ok(Value::Text(name)) = parse_literal(args) else {
                    return Err(SourceError::Malformed(format!(
                        "IncludeSchedule expects a quoted snippet name, got {:?}",
                        args
                    )));
                };
                let schedule = self
                    .snippets
                    .get(&name)
                    .ok_or(SourceError::UnknownSnippet(name))?;
                ResultValue::IncludeSchedule(Arc::clone(schedule))
            }
            other => {
                return Err(SourceError::Malformed(format!(
                    "unknown result constructor {:?}",
                    other
                )))
            }
        };
        Ok(Some(result))
    }
}

impl fmt::Debug for BuiltinEvaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuiltinEvaluator")
            .field("snippets", &self.snippets.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Evaluator for BuiltinEvaluator {
    fn evaluate(&self, expression: &Expression) -> Result<Option<ResultValue>, EvaluationError> {
        self.parse(expression.source())
            .map_err(|e| EvaluationError::new(expression.source(), e.to_string()))
    }
}

fn no_args(name: &str, args: &str) -> Result<(), SourceError> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(SourceError::Malformed(format!(
            "{}() takes no arguments, got {:?}",
            name, args
        )))
    }
}

fn parse_literal(s: &str) -> Result<Value, SourceError> {
    let s = s.trim();
    match s {
        "true" => return Ok(Value::Bool(true)),
        "false" => return Ok(Value::Bool(false)),
        _ => {}
    }
    for quote in ['"', '\''] {
        if let Some(text) = s
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return Ok(Value::Text(text.to_string()));
        }
    }
    if let Ok(i) = s.parse::<i64>() {
        return Ok(Value::Int(i));
    }
    match s.parse::<f64>() {
        Ok(f) if f.is_finite() => Ok(Value::Float(f)),
        _ => Err(SourceError::Malformed(format!("not a literal: {:?}", s))),
    }
}

#[cfg(test)]
#[path = "evaluator_tests.rs"]
mod tests;
