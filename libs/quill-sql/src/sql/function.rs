// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use crate::error::QueryError;

use super::{
    Dialect, ExpressionBuilder, SqlBuilder,
    operator::{FrameUnit, Order},
    table::{Field, Table},
    term::{Term, resolve_is_aggregate},
};

/// A function call: name, ordered arguments, optional schema qualification, and
/// the analytic decorations (OVER clause, window frame, IGNORE NULLS).
///
/// Renders `[SCHEMA.]NAME(arg1,arg2,...)`; arguments render without their own
/// aliases. The OVER clause is emitted only when `window` is set; an `.over()` call
/// with no partition terms still sets it, so `NAME(...) OVER()` is expressible.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    pub args: Vec<Term>,
    pub schema: Option<String>,
    /// Unconditionally aggregate (SUM, COUNT, ...), regardless of arguments.
    pub aggregate: bool,
    pub window: Option<Window>,
    /// Inject `IGNORE NULLS` inside the argument-list parenthesis.
    pub ignore_nulls: bool,
}

/// The OVER-clause state of an analytic function call.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Window {
    pub partition_by: Vec<Term>,
    pub order_by: Vec<(Term, Option<Order>)>,
    pub frame: Option<Frame>,
}

/// A `ROWS`/`RANGE` frame clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub unit: FrameUnit,
    pub start: FrameBound,
    /// When set, renders the `BETWEEN start AND end` form.
    pub end: Option<FrameBound>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameBound {
    UnboundedPreceding,
    UnboundedFollowing,
    CurrentRow,
    Preceding(u64),
    Following(u64),
}

impl FrameBound {
    fn build(&self, builder: &mut SqlBuilder) {
        match self {
            FrameBound::UnboundedPreceding => builder.push_str("UNBOUNDED PRECEDING"),
            FrameBound::UnboundedFollowing => builder.push_str("UNBOUNDED FOLLOWING"),
            FrameBound::CurrentRow => builder.push_str("CURRENT ROW"),
            FrameBound::Preceding(n) => {
                builder.push_str(n.to_string());
                builder.push_str(" PRECEDING");
            }
            FrameBound::Following(n) => {
                builder.push_str(n.to_string());
                builder.push_str(" FOLLOWING");
            }
        }
    }
}

impl FunctionCall {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
            schema: None,
            aggregate: false,
            window: None,
            ignore_nulls: false,
        }
    }

    pub fn arg(mut self, arg: impl Into<Term>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<Term>>) -> Self {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Mark this call as an aggregate regardless of its arguments.
    pub fn aggregate(mut self) -> Self {
        self.aggregate = true;
        self
    }

    /// Add PARTITION BY terms to the OVER clause. Calling with no terms still
    /// arms the clause, so `OVER()` is rendered.
    pub fn over(mut self, partition_by: impl IntoIterator<Item = impl Into<Term>>) -> Self {
        let window = self.window.get_or_insert_with(Window::default);
        window
            .partition_by
            .extend(partition_by.into_iter().map(Into::into));
        self
    }

    /// Add an ORDER BY element to the OVER clause; arms the clause like
    /// [`FunctionCall::over`].
    pub fn orderby(mut self, term: impl Into<Term>, order: Option<Order>) -> Self {
        let window = self.window.get_or_insert_with(Window::default);
        window.order_by.push((term.into(), order));
        self
    }

    /// Set a `ROWS` frame. Specifying a frame twice is a programmer error.
    pub fn rows(self, start: FrameBound, end: Option<FrameBound>) -> Result<Self, QueryError> {
        self.frame(FrameUnit::Rows, start, end)
    }

    /// Set a `RANGE` frame. Specifying a frame twice is a programmer error.
    pub fn range(self, start: FrameBound, end: Option<FrameBound>) -> Result<Self, QueryError> {
        self.frame(FrameUnit::Range, start, end)
    }

    fn frame(
        mut self,
        unit: FrameUnit,
        start: FrameBound,
        end: Option<FrameBound>,
    ) -> Result<Self, QueryError> {
        let window = self.window.get_or_insert_with(Window::default);
        if window.frame.is_some() {
            return Err(QueryError::DuplicateFrame);
        }
        window.frame = Some(Frame { unit, start, end });
        Ok(self)
    }

    pub fn ignore_nulls(mut self) -> Self {
        self.ignore_nulls = true;
        self
    }

    /// Aggregate vote: an aggregate marker wins outright; otherwise the
    /// arguments vote.
    pub(crate) fn is_aggregate(&self) -> Option<bool> {
        if self.aggregate {
            Some(true)
        } else {
            resolve_is_aggregate(self.args.iter().map(Term::is_aggregate))
        }
    }

    pub(crate) fn for_each_field<'a>(&'a self, f: &mut dyn FnMut(&'a Field)) {
        for arg in &self.args {
            arg.for_each_field(f);
        }
        if let Some(window) = &self.window {
            for term in &window.partition_by {
                term.for_each_field(f);
            }
            for (term, _) in &window.order_by {
                term.for_each_field(f);
            }
        }
    }

    pub(crate) fn replace_table(&self, from: &Table, to: &Table) -> FunctionCall {
        FunctionCall {
            name: self.name.clone(),
            args: self.args.iter().map(|a| a.replace_table(from, to)).collect(),
            schema: self.schema.clone(),
            aggregate: self.aggregate,
            window: self.window.as_ref().map(|w| Window {
                partition_by: w
                    .partition_by
                    .iter()
                    .map(|t| t.replace_table(from, to))
                    .collect(),
                order_by: w
                    .order_by
                    .iter()
                    .map(|(t, o)| (t.replace_table(from, to), *o))
                    .collect(),
                frame: w.frame.clone(),
            }),
            ignore_nulls: self.ignore_nulls,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), QueryError> {
        self.args.iter().try_for_each(Term::validate)?;
        if let Some(window) = &self.window {
            window.partition_by.iter().try_for_each(Term::validate)?;
            window
                .order_by
                .iter()
                .try_for_each(|(term, _)| term.validate())?;
        }
        Ok(())
    }

    fn build_over(&self, window: &Window, dialect: &Dialect, builder: &mut SqlBuilder) {
        builder.push_str(" OVER(");
        let mut need_space = false;

        if !window.partition_by.is_empty() {
            builder.push_str("PARTITION BY ");
            builder.push_elems(dialect, &window.partition_by, ",");
            need_space = true;
        }

        if !window.order_by.is_empty() {
            if need_space {
                builder.push_space();
            }
            builder.push_str("ORDER BY ");
            builder.push_iter(window.order_by.iter(), ",", |builder, (term, order)| {
                term.build(dialect, builder);
                if let Some(order) = order {
                    builder.push_space();
                    builder.push_str(order.token());
                }
            });
            need_space = true;
        }

        if let Some(frame) = &window.frame {
            if need_space {
                builder.push_space();
            }
            builder.push_str(frame.unit.token());
            builder.push_space();
            match &frame.end {
                Some(end) => {
                    builder.push_str("BETWEEN ");
                    frame.start.build(builder);
                    builder.push_str(" AND ");
                    end.build(builder);
                }
                None => frame.start.build(builder),
            }
        }

        builder.push(')');
    }
}

impl ExpressionBuilder for FunctionCall {
    fn build(&self, dialect: &Dialect, builder: &mut SqlBuilder) {
        if let Some(schema) = &self.schema {
            builder.push_identifier(schema);
            builder.push('.');
        }
        builder.push_str(&self.name);
        builder.push('(');
        builder.push_elems(dialect, &self.args, ",");
        if self.ignore_nulls {
            if !self.args.is_empty() {
                builder.push_space();
            }
            builder.push_str("IGNORE NULLS");
        }
        builder.push(')');

        if let Some(window) = &self.window {
            self.build_over(window, dialect, builder);
        }
    }
}
