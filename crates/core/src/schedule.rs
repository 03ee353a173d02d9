// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rule tree model
//!
//! A [`Schedule`] is an ordered list of [`Rule`]s. A rule either prescribes a
//! value (a literal, an expression, or both) or nests another schedule. A
//! nesting rule may carry a value or expression of its own, which the rules
//! below it fall back to when they produce nothing.
//!
//! Rules and schedules are shared behind [`Arc`] and compared by identity:
//! two paths are siblings when they descend through the very same rule
//! objects, not through rules that merely look alike.

use crate::predicate::{Always, Predicate};
use crate::value::Value;
use chrono::{NaiveDateTime, NaiveTime};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_EXPR_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of an expression handle, the memoization key during resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprId(u64);

impl fmt::Display for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expr#{}", self.0)
    }
}

/// An opaque expression handle.
///
/// Every call to [`Expression::new`] yields a fresh identity, clones share it.
#[derive(Debug, Clone)]
pub struct Expression {
    id: ExprId,
    source: Arc<str>,
}

impl Expression {
    pub fn new(source: impl Into<String>) -> Self {
        let source: String = source.into();
        Self {
            id: ExprId(NEXT_EXPR_ID.fetch_add(1, Ordering::Relaxed)),
            source: Arc::from(source),
        }
    }

    pub fn id(&self) -> ExprId {
        self.id
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

impl PartialEq for Expression {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Expression {}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

/// What a rule does once its predicate holds
#[derive(Debug, Clone)]
pub enum RuleKind {
    /// Produces a value from its expression or literal
    Value,
    /// Descends into a nested schedule
    SubSchedule(Arc<Schedule>),
}

/// A single conditional node of a schedule
#[derive(Debug, Clone)]
pub struct Rule {
    name: Option<String>,
    predicate: Arc<dyn Predicate>,
    value: Option<Value>,
    expression: Option<Expression>,
    kind: RuleKind,
}

impl Rule {
    /// A value rule with neither literal nor expression yet
    pub fn new(predicate: impl Predicate + 'static) -> Self {
        Self::with_predicate(Arc::new(predicate))
    }

    pub fn with_predicate(predicate: Arc<dyn Predicate>) -> Self {
        Self {
            name: None,
            predicate,
            value: None,
            expression: None,
            kind: RuleKind::Value,
        }
    }

    /// An always-valid rule with a literal value
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::new(Always).with_value(value)
    }

    /// An always-valid rule with an expression
    pub fn evaluating(expression: Expression) -> Self {
        Self::new(Always).with_expression(expression)
    }

    /// An always-valid rule nesting `schedule`
    pub fn nesting(schedule: Arc<Schedule>) -> Self {
        Self::new(Always).with_sub_schedule(schedule)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_expression(mut self, expression: Expression) -> Self {
        self.expression = Some(expression);
        self
    }

    pub fn with_sub_schedule(mut self, schedule: Arc<Schedule>) -> Self {
        self.kind = RuleKind::SubSchedule(schedule);
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn expression(&self) -> Option<&Expression> {
        self.expression.as_ref()
    }

    pub fn kind(&self) -> &RuleKind {
        &self.kind
    }

    pub fn predicate(&self) -> &Arc<dyn Predicate> {
        &self.predicate
    }

    pub fn sub_schedule(&self) -> Option<&Arc<Schedule>> {
        match &self.kind {
            RuleKind::SubSchedule(schedule) => Some(schedule),
            RuleKind::Value => None,
        }
    }

    pub fn has_expr_or_value(&self) -> bool {
        self.expression.is_some() || self.value.is_some()
    }

    pub fn is_valid(&self, at: NaiveDateTime) -> bool {
        self.predicate.is_valid(at)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            return write!(f, "{}", name);
        }
        match (&self.kind, &self.expression, &self.value) {
            (RuleKind::SubSchedule(schedule), _, _) => write!(f, "<{}>", schedule),
            (RuleKind::Value, Some(expr), _) => write!(f, "x={}", expr),
            (RuleKind::Value, None, Some(value)) => write!(f, "v={}", value),
            (RuleKind::Value, None, None) => write!(f, "<empty>"),
        }
    }
}

/// An ordered list of rules
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    name: String,
    rules: Vec<Arc<Rule>>,
}

impl Schedule {
    pub fn new(name: impl Into<String>, rules: Vec<Rule>) -> Self {
        Self::from_shared(name, rules.into_iter().map(Arc::new).collect())
    }

    /// Build from already shared rules, e.g. when splicing lists together
    pub fn from_shared(name: impl Into<String>, rules: Vec<Arc<Rule>>) -> Self {
        Self {
            name: name.into(),
            rules,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rules(&self) -> &[Arc<Rule>] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules valid at `at`, in configured order
    pub fn matching(&self, at: NaiveDateTime) -> Vec<Arc<Rule>> {
        self.rules
            .iter()
            .filter(|rule| rule.is_valid(at))
            .cloned()
            .collect()
    }

    /// Times of day at which this tree must be re-evaluated
    pub fn scheduling_times(&self) -> BTreeSet<NaiveTime> {
        let mut times = BTreeSet::new();
        self.collect_times(&mut times);
        times
    }

    fn collect_times(&self, times: &mut BTreeSet<NaiveTime>) {
        for rule in &self.rules {
            times.extend(rule.predicate.boundaries());
            if let Some(nested) = rule.sub_schedule() {
                nested.collect_times(times);
            }
        }
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Schedule({})", self.name)
    }
}

/// One descent from a root schedule through nested schedules to a frontier rule
#[derive(Debug, Clone)]
pub struct RulePath {
    root: Arc<Schedule>,
    rules: Vec<Arc<Rule>>,
}

impl RulePath {
    pub fn new(root: Arc<Schedule>) -> Self {
        Self {
            root,
            rules: Vec::new(),
        }
    }

    /// A copy of this path with `rule` appended
    pub fn extended(&self, rule: Arc<Rule>) -> Self {
        let mut rules = Vec::with_capacity(self.rules.len() + 1);
        rules.extend(self.rules.iter().cloned());
        rules.push(rule);
        Self {
            root: Arc::clone(&self.root),
            rules,
        }
    }

    pub fn root(&self) -> &Arc<Schedule> {
        &self.root
    }

    pub fn rules(&self) -> &[Arc<Rule>] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn frontier(&self) -> Option<&Arc<Rule>> {
        self.rules.last()
    }

    /// Rules along the path that carry an expression or literal, root first
    pub fn rules_with_expr_or_value(&self) -> Vec<&Arc<Rule>> {
        self.rules
            .iter()
            .filter(|rule| rule.has_expr_or_value())
            .collect()
    }

    /// Whether `other` shares this path's root and its first `prefix_len` rules
    pub fn shares_prefix(&self, other: &RulePath, prefix_len: usize) -> bool {
        if !Arc::ptr_eq(&self.root, &other.root) {
            return false;
        }
        if self.rules.len() < prefix_len || other.rules.len() < prefix_len {
            return false;
        }
        self.rules[..prefix_len]
            .iter()
            .zip(&other.rules[..prefix_len])
            .all(|(a, b)| Arc::ptr_eq(a, b))
    }
}

impl fmt::Display for RulePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: [", self.root.name)?;
        for (i, rule) in self.rules.iter().enumerate() {
            if i > 0 {
                write!(f, " / ")?;
            }
            write!(f, "{}", rule)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
#[path = "schedule_tests.rs"]
mod tests;
