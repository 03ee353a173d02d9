// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Path traversal: resolving the single value a schedule prescribes
//!
//! The traversal keeps an explicit worklist of [`RulePath`]s and a cursor
//! into it. Nested schedules and included schedules insert their paths at the
//! cursor, so they are explored before remaining siblings; `BreakLevels`
//! removes not-yet-visited paths behind the cursor. Each queued path carries
//! the chain of schedules included to reach it, and an include already on
//! that chain is skipped.

use crate::actor_type::ValueValidator;
use crate::error::EvaluationError;
use crate::result::ResultValue;
use crate::schedule::{ExprId, Expression, Rule, RulePath, Schedule};
use crate::value::Value;
use chrono::NaiveDateTime;
use std::collections::HashMap;
use std::sync::Arc;

/// Evaluates expression handles into results.
///
/// `Ok(None)` means the expression produced nothing; resolution then falls
/// back to the next ancestor rule carrying an expression or value.
pub trait Evaluator: Send + Sync {
    fn evaluate(&self, expression: &Expression) -> Result<Option<ResultValue>, EvaluationError>;
}

impl<F> Evaluator for F
where
    F: Fn(&Expression) -> Result<Option<ResultValue>, EvaluationError> + Send + Sync,
{
    fn evaluate(&self, expression: &Expression) -> Result<Option<ResultValue>, EvaluationError> {
        self(expression)
    }
}

/// A resolved value and the frontier rule that produced it
#[derive(Debug, Clone)]
pub struct Resolution {
    pub value: Value,
    pub rule: Arc<Rule>,
}

/// Outcome of one resolution run
#[derive(Debug, Clone)]
pub enum ResolveOutcome {
    Resolved(Resolution),
    /// An expression returned `Abort`
    Aborted,
    /// No path produced a final value
    NoResult,
}

impl ResolveOutcome {
    /// Collapses `Aborted` and `NoResult`, which reconciliation treats alike
    pub fn into_resolution(self) -> Option<Resolution> {
        match self {
            ResolveOutcome::Resolved(resolution) => Some(resolution),
            ResolveOutcome::Aborted | ResolveOutcome::NoResult => None,
        }
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            ResolveOutcome::Resolved(resolution) => Some(&resolution.value),
            ResolveOutcome::Aborted | ResolveOutcome::NoResult => None,
        }
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, ResolveOutcome::Aborted)
    }
}

type Evaluated = Result<Option<ResultValue>, EvaluationError>;

/// A queued path and the schedules included on the way to it, outermost first
#[derive(Clone)]
struct Pending {
    path: RulePath,
    includes: Vec<Arc<Schedule>>,
}

/// Resolve `schedule` at `at`.
///
/// Every expression is evaluated at most once per call, failures included.
pub fn resolve(
    schedule: &Arc<Schedule>,
    at: NaiveDateTime,
    evaluator: &dyn Evaluator,
    validator: &dyn ValueValidator,
) -> ResolveOutcome {
    Traversal {
        at,
        evaluator,
        validator,
        memo: HashMap::new(),
    }
    .run(schedule)
}

struct Traversal<'a> {
    at: NaiveDateTime,
    evaluator: &'a dyn Evaluator,
    validator: &'a dyn ValueValidator,
    memo: HashMap<ExprId, Evaluated>,
}

impl Traversal<'_> {
    fn run(&mut self, schedule: &Arc<Schedule>) -> ResolveOutcome {
        tracing::debug!(at = %self.at, schedule = schedule.name(), "resolving");

        let mut paths = Vec::new();
        self.insert_root_paths(&mut paths, 0, schedule, Vec::new());

        let mut accumulated: Option<ResultValue> = None;
        let mut cursor = 0;
        while cursor < paths.len() {
            let Pending { path, includes } = paths[cursor].clone();
            cursor += 1;

            let Some(frontier) = path.frontier() else {
                continue;
            };
            log_path(&path, format_args!("{}", path));

            if let Some(nested) = frontier.sub_schedule() {
                let children: Vec<Pending> = self
                    .matching(nested, &path)
                    .into_iter()
                    .map(|rule| Pending {
                        path: path.extended(rule),
                        includes: includes.clone(),
                    })
                    .collect();
                paths.splice(cursor..cursor, children);
                continue;
            }

            let result = match self.first_result(&path) {
                Some(Ok(result)) => result,
                Some(Err(_)) => {
                    log_path(&path, format_args!("evaluation failed, skipping rule"));
                    continue;
                }
                None => {
                    if path.rules_with_expr_or_value().is_empty() {
                        tracing::warn!(path = %path, "no expression or value defined, skipping rule");
                    } else {
                        tracing::warn!(path = %path, "all expressions returned nothing, skipping rule");
                    }
                    continue;
                }
            };

            match result {
                ResultValue::Skip => {}
                ResultValue::Abort => {
                    tracing::debug!(path = %path, "resolution aborted");
                    return ResolveOutcome::Aborted;
                }
                ResultValue::Final(_) | ResultValue::Accumulate(_) => {
                    let Some(result) = self.validated(&result) else {
                        continue;
                    };
                    let folded = match accumulated.take() {
                        None => result,
                        Some(previous) => match previous.combine(&result) {
                            Ok(folded) => folded,
                            Err(e) => {
                                tracing::error!(
                                    error = %e,
                                    preliminary = %previous,
                                    result = %result,
                                    "can't add result to preliminary one, skipping it"
                                );
                                accumulated = Some(previous);
                                continue;
                            }
                        },
                    };
                    if let ResultValue::Final(value) = folded {
                        tracing::debug!(%value, rule = %frontier, "final result");
                        return ResolveOutcome::Resolved(Resolution {
                            value,
                            rule: Arc::clone(frontier),
                        });
                    }
                    accumulated = Some(folded);
                }
                ResultValue::BreakLevels(levels) => {
                    let prefix_len = path.len().saturating_sub(levels.get() as usize);
                    let before = paths.len();
                    let mut index = 0;
                    paths.retain(|candidate| {
                        let keep = index < cursor || !path.shares_prefix(&candidate.path, prefix_len);
                        index += 1;
                        keep
                    });
                    log_path(
                        &path,
                        format_args!("pruned {} path(s) below level {}", before - paths.len(), prefix_len),
                    );
                }
                ResultValue::IncludeSchedule(other) => {
                    if includes.iter().any(|s| Arc::ptr_eq(s, &other)) {
                        tracing::warn!(
                            path = %path,
                            schedule = other.name(),
                            "schedule is already being included, skipping rule"
                        );
                        continue;
                    }
                    self.insert_root_paths(&mut paths, cursor, &other, includes);
                }
            }
        }

        tracing::debug!("found no result");
        ResolveOutcome::NoResult
    }

    /// Queue the matching rules of `schedule`, reached through `includes`
    fn insert_root_paths(
        &self,
        paths: &mut Vec<Pending>,
        at: usize,
        schedule: &Arc<Schedule>,
        mut includes: Vec<Arc<Schedule>>,
    ) {
        includes.push(Arc::clone(schedule));
        let root = RulePath::new(Arc::clone(schedule));
        let rules = self.matching(schedule, &root);
        paths.splice(
            at..at,
            rules.into_iter().map(|rule| Pending {
                path: root.extended(rule),
                includes: includes.clone(),
            }),
        );
    }

    fn matching(&self, schedule: &Schedule, path: &RulePath) -> Vec<Arc<Rule>> {
        let rules = schedule.matching(self.at);
        log_path(
            path,
            format_args!(
                "{} / {} rules of {} are currently valid",
                rules.len(),
                schedule.rules().len(),
                schedule
            ),
        );
        rules
    }

    /// Scan the path's ancestors deepest first until one yields a result
    fn first_result(&mut self, path: &RulePath) -> Option<Result<ResultValue, EvaluationError>> {
        for rule in path.rules_with_expr_or_value().into_iter().rev() {
            if let Some(expression) = rule.expression() {
                match self.evaluate(path, expression) {
                    Ok(Some(result)) => return Some(Ok(result)),
                    Err(e) => return Some(Err(e)),
                    Ok(None) => {}
                }
            }
            if let Some(value) = rule.value() {
                let result = ResultValue::Final(value.clone());
                log_path(path, format_args!("=> {}", result));
                return Some(Ok(result));
            }
        }
        None
    }

    fn evaluate(&mut self, path: &RulePath, expression: &Expression) -> Evaluated {
        if let Some(cached) = self.memo.get(&expression.id()) {
            log_path(path, format_args!("=> {}  [cache-hit]", DisplayEvaluated(cached)));
            return cached.clone();
        }
        let evaluated = self.evaluator.evaluate(expression);
        if let Err(e) = &evaluated {
            tracing::error!(error = %e, "error while evaluating expression");
        }
        log_path(path, format_args!("=> {}", DisplayEvaluated(&evaluated)));
        self.memo.insert(expression.id(), evaluated.clone());
        evaluated
    }

    fn validated(&self, result: &ResultValue) -> Option<ResultValue> {
        let payload = result.payload()?;
        match self.validator.validate(payload) {
            Ok(value) => Some(result.with_payload(value)),
            Err(e) => {
                tracing::error!(error = %e, "invalid value, skipping rule");
                None
            }
        }
    }
}

struct DisplayEvaluated<'a>(&'a Evaluated);

impl std::fmt::Display for DisplayEvaluated<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Ok(Some(result)) => write!(f, "{}", result),
            Ok(None) => write!(f, "None"),
            Err(e) => write!(f, "error: {}", e.message),
        }
    }
}

fn log_path(path: &RulePath, message: std::fmt::Arguments<'_>) {
    let indent = " ".repeat(3 * path.len().saturating_sub(1));
    tracing::debug!("{}├─ {}", indent, message);
}

#[cfg(test)]
#[path = "resolve_tests.rs"]
mod tests;
