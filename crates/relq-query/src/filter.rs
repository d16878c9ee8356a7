//! Boolean filter tree for the WHERE clause
//!
//! The tree is a group of items emitted verbatim in declaration order:
//! comparisons, AND/OR connectives, and nested groups rendered in
//! parentheses. Open groups live on a stack until they are closed, at which
//! point they are appended to their parent.

use crate::column::{ColumnRef, Scope};
use crate::error::{QueryError, QueryResult};
use crate::statement::ParameterList;
use relq_core::SqlValue;
use std::borrow::Cow;
use std::fmt;

/// Comparison operator of a filter predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    Like,
    IsNull,
    IsNotNull,
}

impl ComparisonOp {
    /// SQL operator text
    pub fn sql(&self) -> &'static str {
        match self {
            ComparisonOp::Equal => "=",
            ComparisonOp::NotEqual => "<>",
            ComparisonOp::LessThan => "<",
            ComparisonOp::LessThanOrEqual => "<=",
            ComparisonOp::GreaterThan => ">",
            ComparisonOp::GreaterThanOrEqual => ">=",
            ComparisonOp::Like => "LIKE",
            ComparisonOp::IsNull => "IS NULL",
            ComparisonOp::IsNotNull => "IS NOT NULL",
        }
    }

    /// False for the null checks, which render without an operand
    pub fn takes_operand(&self) -> bool {
        !matches!(self, ComparisonOp::IsNull | ComparisonOp::IsNotNull)
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql())
    }
}

/// AND / OR between sibling items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Connective {
    And,
    Or,
}

impl Connective {
    pub fn keyword(&self) -> &'static str {
        match self {
            Connective::And => "AND",
            Connective::Or => "OR",
        }
    }
}

/// A single predicate: column, operator, operand
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub column: ColumnRef,
    pub op: ComparisonOp,
    /// Ignored by the null checks
    pub value: SqlValue,
}

impl Comparison {
    /// Render the predicate. With a parameter sink the operand becomes an
    /// `@<index>` placeholder, otherwise an inline literal.
    pub fn render(&self, scope: &Scope<'_>, params: Option<&mut ParameterList>) -> QueryResult<String> {
        let column = scope.qualify(&self.column)?;
        if !self.op.takes_operand() {
            return Ok(format!("{} {}", column, self.op.sql()));
        }

        let operand = match params {
            Some(params) => format!("@{}", params.push(self.value.clone())),
            None => scope.dialect.format_literal(&self.value),
        };
        Ok(format!("{} {} {}", column, self.op.sql(), operand))
    }
}

/// One item of a filter group
#[derive(Debug, Clone, PartialEq)]
pub enum FilterNode {
    Comparison(Comparison),
    Connective(Connective),
    Group(FilterGroup),
}

/// Ordered sequence of filter items
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterGroup {
    pub items: Vec<FilterNode>,
}

impl FilterGroup {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Render the group's items depth-first, joined by single spaces.
    ///
    /// Nested groups are wrapped in parentheses; empty nested groups are
    /// skipped. The group itself is not wrapped. Predicates and connectives
    /// must alternate once empty groups are skipped: a leading, trailing or
    /// doubled connective fails with [`QueryError::DanglingConnective`], two
    /// adjacent predicates with [`QueryError::MissingConnective`].
    pub fn render(
        &self,
        scope: &Scope<'_>,
        mut params: Option<&mut ParameterList>,
    ) -> QueryResult<String> {
        let mut fragments = Vec::with_capacity(self.items.len());
        let mut pending: Option<Connective> = None;
        for item in &self.items {
            let operand = match item {
                FilterNode::Comparison(comparison) => {
                    comparison.render(scope, params.as_deref_mut())?
                }
                FilterNode::Connective(connective) => {
                    if fragments.is_empty() || pending.is_some() {
                        return Err(dangling(*connective));
                    }
                    pending = Some(*connective);
                    fragments.push(connective.keyword().to_string());
                    continue;
                }
                FilterNode::Group(group) => {
                    let inner = group.render(scope, params.as_deref_mut())?;
                    if inner.is_empty() {
                        continue;
                    }
                    format!("({})", inner)
                }
            };
            if !fragments.is_empty() && pending.take().is_none() {
                return Err(QueryError::MissingConnective);
            }
            fragments.push(operand);
        }
        if let Some(connective) = pending {
            return Err(dangling(connective));
        }
        Ok(fragments.join(" "))
    }
}

fn dangling(connective: Connective) -> QueryError {
    QueryError::DanglingConnective {
        connective: connective.keyword().to_string(),
    }
}

/// Handle returned when a group is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupHandle {
    depth: usize,
}

impl GroupHandle {
    /// Nesting depth of the opened group (1 for a group directly under the root)
    pub fn depth(&self) -> usize {
        self.depth
    }
}

/// The WHERE clause under construction
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterTree {
    root: FilterGroup,
    /// Groups opened but not yet closed, innermost last
    open: Vec<FilterGroup>,
    /// Number of `end_group` calls with nothing to close
    unmatched_ends: usize,
}

impl FilterTree {
    pub fn new() -> Self {
        Self::default()
    }

    fn current(&mut self) -> &mut FilterGroup {
        match self.open.last_mut() {
            Some(group) => group,
            None => &mut self.root,
        }
    }

    pub fn push_comparison(&mut self, comparison: Comparison) {
        self.current().items.push(FilterNode::Comparison(comparison));
    }

    pub fn push_connective(&mut self, connective: Connective) {
        self.current().items.push(FilterNode::Connective(connective));
    }

    /// Open a nested group; following items go into it until `end_group`
    pub fn begin_group(&mut self) -> GroupHandle {
        self.open.push(FilterGroup::default());
        GroupHandle {
            depth: self.open.len(),
        }
    }

    /// Close the innermost open group and return to its parent
    pub fn end_group(&mut self) {
        match self.open.pop() {
            Some(group) => self.current().items.push(FilterNode::Group(group)),
            None => self.unmatched_ends += 1,
        }
    }

    /// Number of groups currently open
    pub fn open_depth(&self) -> usize {
        self.open.len()
    }

    /// True when `end_group` was called more often than `begin_group`
    pub fn is_unbalanced(&self) -> bool {
        self.unmatched_ends > 0
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty() && self.open.iter().all(FilterGroup::is_empty)
    }

    /// The tree with any open groups closed
    pub fn closed(&self) -> Cow<'_, FilterGroup> {
        if self.open.is_empty() {
            return Cow::Borrowed(&self.root);
        }

        let mut groups = self.open.clone();
        let mut root = self.root.clone();
        while let Some(group) = groups.pop() {
            let parent = groups.last_mut().unwrap_or(&mut root);
            parent.items.push(FilterNode::Group(group));
        }
        Cow::Owned(root)
    }
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;
