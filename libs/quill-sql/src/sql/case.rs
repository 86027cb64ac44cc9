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
    criterion::Criterion,
    table::{Field, Table},
    term::{Term, resolve_is_aggregate},
};

/// A searched CASE expression: ordered WHEN/THEN branches and an optional ELSE.
///
/// A case with no branches cannot render; it is reported as
/// [`QueryError::EmptyCase`] when the enclosing query is rendered.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Case {
    pub branches: Vec<(Criterion, Term)>,
    pub else_value: Option<Term>,
}

impl Case {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn when(mut self, criterion: Criterion, result: impl Into<Term>) -> Self {
        self.branches.push((criterion, result.into()));
        self
    }

    pub fn else_(mut self, value: impl Into<Term>) -> Self {
        self.else_value = Some(value.into());
        self
    }

    pub(crate) fn is_aggregate(&self) -> Option<bool> {
        resolve_is_aggregate(
            self.branches
                .iter()
                .flat_map(|(criterion, result)| [criterion.is_aggregate(), result.is_aggregate()])
                .chain(self.else_value.as_ref().map(Term::is_aggregate)),
        )
    }

    pub(crate) fn for_each_field<'a>(&'a self, f: &mut dyn FnMut(&'a Field)) {
        for (criterion, result) in &self.branches {
            criterion.for_each_field(f);
            result.for_each_field(f);
        }
        if let Some(else_value) = &self.else_value {
            else_value.for_each_field(f);
        }
    }

    pub(crate) fn replace_table(&self, from: &Table, to: &Table) -> Case {
        Case {
            branches: self
                .branches
                .iter()
                .map(|(criterion, result)| {
                    (
                        criterion.replace_table(from, to),
                        result.replace_table(from, to),
                    )
                })
                .collect(),
            else_value: self
                .else_value
                .as_ref()
                .map(|term| term.replace_table(from, to)),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), QueryError> {
        if self.branches.is_empty() {
            return Err(QueryError::EmptyCase);
        }
        for (criterion, result) in &self.branches {
            criterion.validate()?;
            result.validate()?;
        }
        if let Some(else_value) = &self.else_value {
            else_value.validate()?;
        }
        Ok(())
    }
}

impl ExpressionBuilder for Case {
    fn build(&self, dialect: &Dialect, builder: &mut SqlBuilder) {
        builder.push_str("CASE");
        for (criterion, result) in &self.branches {
            builder.push_str(" WHEN ");
            criterion.build(dialect, builder);
            builder.push_str(" THEN ");
            result.build(dialect, builder);
        }
        if let Some(else_value) = &self.else_value {
            builder.push_str(" ELSE ");
            else_value.build(dialect, builder);
        }
        builder.push_str(" END");
    }
}

#[cfg(test)]
mod tests {
    use super::super::table::Table;
    use super::*;

    fn t() -> Table {
        Table::new("abc")
    }

    #[test]
    fn single_branch() {
        let case = Case::new().when(t().field("foo").eq(1), "a");
        assert_sql!(case, r#"CASE WHEN "foo"=1 THEN 'a' END"#);
    }

    #[test]
    fn branches_render_in_insertion_order() {
        let case = Case::new()
            .when(t().field("foo").eq(1), "a")
            .when(t().field("foo").eq(2), "b")
            .else_("c");
        assert_sql!(
            case,
            r#"CASE WHEN "foo"=1 THEN 'a' WHEN "foo"=2 THEN 'b' ELSE 'c' END"#
        );
    }

    #[test]
    fn cases_nest_in_the_else_branch() {
        let fallback = Case::new().when(t().field("foo").eq(2), "b");
        let case = Case::new()
            .when(t().field("foo").eq(1), "a")
            .else_(fallback);
        assert_sql!(
            case,
            r#"CASE WHEN "foo"=1 THEN 'a' ELSE CASE WHEN "foo"=2 THEN 'b' END END"#
        );
    }

    #[test]
    fn empty_case_fails_validation() {
        assert_eq!(Case::new().validate(), Err(QueryError::EmptyCase));
        assert_eq!(
            Case::new().else_("c").validate(),
            Err(QueryError::EmptyCase)
        );
    }

    #[test]
    fn aggregate_vote_spans_all_branches() {
        use super::super::functions::sum;

        let case = Case::new().when(t().field("foo").eq(1), sum(t().field("bar")));
        assert_eq!(case.is_aggregate(), Some(false));

        let case = Case::new().when(
            Criterion::Basic(
                super::super::operator::Comparator::Eq,
                Term::from(1),
                Term::from(1),
            ),
            sum(t().field("bar")),
        );
        assert_eq!(case.is_aggregate(), Some(true));
    }
}
