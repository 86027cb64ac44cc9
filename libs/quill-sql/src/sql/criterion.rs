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
    operator::{BoolOp, Comparator},
    table::{Field, Table},
    term::{Term, TermKind, resolve_is_aggregate},
};

/// A boolean-valued expression usable in WHERE/HAVING/JOIN-ON/CASE-WHEN.
///
/// `Empty` is the identity element of boolean composition: it is absorbed by
/// `and`, `or`, and `xor` alike, which makes it the natural seed for folds
/// ([`Criterion::all`], [`Criterion::any`]). Negation is an explicit variant
/// rather than a wrapper that intercepts method calls; combining a `Not` simply
/// nests it like any other criterion.
#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
    /// The no-op criterion; renders nothing and is absorbed by composition.
    Empty,
    /// `left <op> right`, e.g. `"age">=18`
    Basic(Comparator, Term, Term),
    /// `left AND|OR|XOR right`
    Complex {
        op: BoolOp,
        left: Box<Criterion>,
        right: Box<Criterion>,
    },
    /// `term [NOT] IN (container)`; the container is a tuple/array of values or
    /// a subquery, always parenthesized
    Contains {
        term: Term,
        container: Term,
        negated: bool,
    },
    /// `term BETWEEN lower AND upper`
    Between {
        term: Term,
        lower: Term,
        upper: Term,
    },
    /// `term IS NULL`
    IsNull(Term),
    /// `term IS NOT NULL`
    NotNull(Term),
    /// `term [NOT] LIKE pattern`
    Like {
        term: Term,
        pattern: Term,
        negated: bool,
    },
    /// `term&value` mask test
    BitwiseAnd(Term, Term),
    /// `NOT criterion`
    Not(Box<Criterion>),
}

impl Criterion {
    /// Conjunction; `Empty` on either side is absorbed.
    pub fn and(self, other: Criterion) -> Criterion {
        Self::combine(BoolOp::And, self, other)
    }

    /// Disjunction; `Empty` on either side is absorbed.
    pub fn or(self, other: Criterion) -> Criterion {
        Self::combine(BoolOp::Or, self, other)
    }

    /// Exclusive or; `Empty` on either side is absorbed.
    pub fn xor(self, other: Criterion) -> Criterion {
        Self::combine(BoolOp::Xor, self, other)
    }

    fn combine(op: BoolOp, left: Criterion, right: Criterion) -> Criterion {
        match (left, right) {
            (Criterion::Empty, rhs) => rhs,
            (lhs, Criterion::Empty) => lhs,
            (lhs, rhs) => Criterion::Complex {
                op,
                left: Box::new(lhs),
                right: Box::new(rhs),
            },
        }
    }

    /// Fold a sequence of criteria into a conjunction. An empty sequence yields
    /// [`Criterion::Empty`].
    pub fn all(criteria: impl IntoIterator<Item = Criterion>) -> Criterion {
        criteria
            .into_iter()
            .fold(Criterion::Empty, |acc, c| acc.and(c))
    }

    /// Fold a sequence of criteria into a disjunction. An empty sequence yields
    /// [`Criterion::Empty`].
    pub fn any(criteria: impl IntoIterator<Item = Criterion>) -> Criterion {
        criteria
            .into_iter()
            .fold(Criterion::Empty, |acc, c| acc.or(c))
    }

    pub fn negate(self) -> Criterion {
        Criterion::Not(Box::new(self))
    }

    pub(crate) fn is_aggregate(&self) -> Option<bool> {
        match self {
            Criterion::Empty => None,
            Criterion::Basic(_, left, right) | Criterion::BitwiseAnd(left, right) => {
                resolve_is_aggregate([left.is_aggregate(), right.is_aggregate()])
            }
            Criterion::Complex { left, right, .. } => {
                resolve_is_aggregate([left.is_aggregate(), right.is_aggregate()])
            }
            Criterion::Contains {
                term, container, ..
            } => resolve_is_aggregate([term.is_aggregate(), container.is_aggregate()]),
            Criterion::Between { term, lower, upper } => resolve_is_aggregate([
                term.is_aggregate(),
                lower.is_aggregate(),
                upper.is_aggregate(),
            ]),
            Criterion::IsNull(term) | Criterion::NotNull(term) => term.is_aggregate(),
            Criterion::Like { term, pattern, .. } => {
                resolve_is_aggregate([term.is_aggregate(), pattern.is_aggregate()])
            }
            Criterion::Not(criterion) => criterion.is_aggregate(),
        }
    }

    pub(crate) fn for_each_field<'a>(&'a self, f: &mut dyn FnMut(&'a Field)) {
        match self {
            Criterion::Empty => {}
            Criterion::Basic(_, left, right) | Criterion::BitwiseAnd(left, right) => {
                left.for_each_field(f);
                right.for_each_field(f);
            }
            Criterion::Complex { left, right, .. } => {
                left.for_each_field(f);
                right.for_each_field(f);
            }
            Criterion::Contains {
                term, container, ..
            } => {
                term.for_each_field(f);
                container.for_each_field(f);
            }
            Criterion::Between { term, lower, upper } => {
                term.for_each_field(f);
                lower.for_each_field(f);
                upper.for_each_field(f);
            }
            Criterion::IsNull(term) | Criterion::NotNull(term) => term.for_each_field(f),
            Criterion::Like { term, pattern, .. } => {
                term.for_each_field(f);
                pattern.for_each_field(f);
            }
            Criterion::Not(criterion) => criterion.for_each_field(f),
        }
    }

    /// A copy with every field bound to `from` rebound to `to`; recurses into
    /// every operand.
    pub fn replace_table(&self, from: &Table, to: &Table) -> Criterion {
        match self {
            Criterion::Empty => Criterion::Empty,
            Criterion::Basic(comparator, left, right) => Criterion::Basic(
                *comparator,
                left.replace_table(from, to),
                right.replace_table(from, to),
            ),
            Criterion::Complex { op, left, right } => Criterion::Complex {
                op: *op,
                left: Box::new(left.replace_table(from, to)),
                right: Box::new(right.replace_table(from, to)),
            },
            Criterion::Contains {
                term,
                container,
                negated,
            } => Criterion::Contains {
                term: term.replace_table(from, to),
                container: container.replace_table(from, to),
                negated: *negated,
            },
            Criterion::Between { term, lower, upper } => Criterion::Between {
                term: term.replace_table(from, to),
                lower: lower.replace_table(from, to),
                upper: upper.replace_table(from, to),
            },
            Criterion::IsNull(term) => Criterion::IsNull(term.replace_table(from, to)),
            Criterion::NotNull(term) => Criterion::NotNull(term.replace_table(from, to)),
            Criterion::Like {
                term,
                pattern,
                negated,
            } => Criterion::Like {
                term: term.replace_table(from, to),
                pattern: pattern.replace_table(from, to),
                negated: *negated,
            },
            Criterion::BitwiseAnd(left, right) => Criterion::BitwiseAnd(
                left.replace_table(from, to),
                right.replace_table(from, to),
            ),
            Criterion::Not(criterion) => {
                Criterion::Not(Box::new(criterion.replace_table(from, to)))
            }
        }
    }

    pub(crate) fn validate(&self) -> Result<(), QueryError> {
        match self {
            Criterion::Empty => Ok(()),
            Criterion::Basic(_, left, right) | Criterion::BitwiseAnd(left, right) => {
                left.validate()?;
                right.validate()
            }
            Criterion::Complex { left, right, .. } => {
                left.validate()?;
                right.validate()
            }
            Criterion::Contains {
                term, container, ..
            } => {
                term.validate()?;
                container.validate()
            }
            Criterion::Between { term, lower, upper } => {
                term.validate()?;
                lower.validate()?;
                upper.validate()
            }
            Criterion::IsNull(term) | Criterion::NotNull(term) => term.validate(),
            Criterion::Like { term, pattern, .. } => {
                term.validate()?;
                pattern.validate()
            }
            Criterion::Not(criterion) => criterion.validate(),
        }
    }

    /// Build a nested criterion, parenthesizing a boolean composition whose
    /// operator differs from `parent_op` (mixed AND/OR/XOR need disambiguation;
    /// same-operator nesting is associative and stays flat).
    fn build_nested(
        &self,
        parent_op: BoolOp,
        dialect: &Dialect,
        builder: &mut SqlBuilder,
    ) {
        match self {
            Criterion::Complex { op, .. } if *op != parent_op => {
                builder.push('(');
                self.build(dialect, builder);
                builder.push(')');
            }
            _ => self.build(dialect, builder),
        }
    }
}

impl ExpressionBuilder for Criterion {
    fn build(&self, dialect: &Dialect, builder: &mut SqlBuilder) {
        match self {
            Criterion::Empty => {}
            Criterion::Basic(comparator, left, right) => {
                left.build(dialect, builder);
                builder.push_str(comparator.token());
                right.build(dialect, builder);
            }
            Criterion::Complex { op, left, right } => {
                left.build_nested(*op, dialect, builder);
                builder.push_space();
                builder.push_str(op.token());
                builder.push_space();
                right.build_nested(*op, dialect, builder);
            }
            Criterion::Contains {
                term,
                container,
                negated,
            } => {
                term.build(dialect, builder);
                builder.push_str(if *negated { " NOT IN (" } else { " IN (" });
                match &container.kind {
                    TermKind::Tuple(elems) | TermKind::Array(elems) => {
                        builder.push_elems(dialect, elems, ",");
                    }
                    TermKind::Subquery(query) => query.build(dialect, builder),
                    _ => container.build(dialect, builder),
                }
                builder.push(')');
            }
            Criterion::Between { term, lower, upper } => {
                term.build(dialect, builder);
                builder.push_str(" BETWEEN ");
                lower.build(dialect, builder);
                builder.push_str(" AND ");
                upper.build(dialect, builder);
            }
            Criterion::IsNull(term) => {
                term.build(dialect, builder);
                builder.push_str(" IS NULL");
            }
            Criterion::NotNull(term) => {
                term.build(dialect, builder);
                builder.push_str(" IS NOT NULL");
            }
            Criterion::Like {
                term,
                pattern,
                negated,
            } => {
                term.build(dialect, builder);
                builder.push_str(if *negated { " NOT LIKE " } else { " LIKE " });
                pattern.build(dialect, builder);
            }
            Criterion::BitwiseAnd(left, right) => {
                left.build(dialect, builder);
                builder.push('&');
                right.build(dialect, builder);
            }
            Criterion::Not(criterion) => {
                builder.push_str("NOT ");
                match criterion.as_ref() {
                    complex @ Criterion::Complex { .. } => {
                        builder.push('(');
                        complex.build(dialect, builder);
                        builder.push(')');
                    }
                    other => other.build(dialect, builder),
                }
            }
        }
    }
}

impl std::ops::BitAnd for Criterion {
    type Output = Criterion;

    fn bitand(self, rhs: Criterion) -> Criterion {
        self.and(rhs)
    }
}

impl std::ops::BitOr for Criterion {
    type Output = Criterion;

    fn bitor(self, rhs: Criterion) -> Criterion {
        self.or(rhs)
    }
}

impl std::ops::BitXor for Criterion {
    type Output = Criterion;

    fn bitxor(self, rhs: Criterion) -> Criterion {
        self.xor(rhs)
    }
}

impl std::ops::Not for Criterion {
    type Output = Criterion;

    fn not(self) -> Criterion {
        self.negate()
    }
}

#[cfg(test)]
mod tests {
    use super::super::query::Query;
    use super::super::table::Table;
    use super::*;

    fn t() -> Table {
        Table::new("abc")
    }

    #[test]
    fn same_operator_nesting_stays_flat() {
        let c = t().field("a").eq(1).and(t().field("b").eq(2)).and(t().field("c").eq(3));
        assert_sql!(c, r#""a"=1 AND "b"=2 AND "c"=3"#);
    }

    #[test]
    fn mixed_operators_parenthesize_the_nested_side() {
        let c = t().field("a").eq(1).or(t().field("b").eq(2)).and(t().field("c").eq(3));
        assert_sql!(c, r#"("a"=1 OR "b"=2) AND "c"=3"#);

        let c = t().field("a").eq(1).and(t().field("b").eq(2).xor(t().field("c").eq(3)));
        assert_sql!(c, r#""a"=1 AND ("b"=2 XOR "c"=3)"#);
    }

    #[test]
    fn empty_criterion_is_absorbed() {
        let c = Criterion::Empty.and(t().field("a").eq(1));
        assert_sql!(c, r#""a"=1"#);

        let c = t().field("a").eq(1).or(Criterion::Empty);
        assert_sql!(c, r#""a"=1"#);

        assert_eq!(Criterion::all([]), Criterion::Empty);
        assert_eq!(Criterion::any([]), Criterion::Empty);
    }

    #[test]
    fn all_and_any_fold() {
        let c = Criterion::all([t().field("a").eq(1), t().field("b").eq(2)]);
        assert_sql!(c, r#""a"=1 AND "b"=2"#);

        let c = Criterion::any([t().field("a").eq(1), t().field("b").eq(2)]);
        assert_sql!(c, r#""a"=1 OR "b"=2"#);
    }

    #[test]
    fn membership() {
        let c = t().field("foo").isin(vec![1, 2, 3]);
        assert_sql!(c, r#""foo" IN (1,2,3)"#);

        let c = t().field("foo").notin(vec!["a", "b"]);
        assert_sql!(c, r#""foo" NOT IN ('a','b')"#);
    }

    #[test]
    fn membership_with_subquery() {
        let other = Table::new("efg");
        let sub = Query::from_(other.clone()).select([other.field("id")]);
        let c = t().field("foo").isin(sub);
        assert_sql!(c, r#""foo" IN (SELECT "id" FROM "efg")"#);
    }

    #[test]
    fn between() {
        let c = t().field("foo").between(1, 5);
        assert_sql!(c, r#""foo" BETWEEN 1 AND 5"#);

        let c = t().field("foo").between("a", "b");
        assert_sql!(c, r#""foo" BETWEEN 'a' AND 'b'"#);
    }

    #[test]
    fn null_checks() {
        assert_sql!(t().field("foo").isnull(), r#""foo" IS NULL"#);
        assert_sql!(t().field("foo").notnull(), r#""foo" IS NOT NULL"#);
    }

    #[test]
    fn like() {
        assert_sql!(t().field("foo").like("ab%"), r#""foo" LIKE 'ab%'"#);
        assert_sql!(t().field("foo").not_like("ab%"), r#""foo" NOT LIKE 'ab%'"#);
    }

    #[test]
    fn bitwise_mask() {
        assert_sql!(t().field("flags").bin_and(4), r#""flags"&4"#);
    }

    #[test]
    fn negation_wraps_composition() {
        let c = !t().field("a").eq(1);
        assert_sql!(c, r#"NOT "a"=1"#);

        let c = !(t().field("a").eq(1).and(t().field("b").eq(2)));
        assert_sql!(c, r#"NOT ("a"=1 AND "b"=2)"#);
    }

    #[test]
    fn negated_criterion_composes_further() {
        // A negated criterion is an ordinary criterion; combining it nests the
        // negation rather than losing it.
        let c = t().field("a").isin(vec![1, 2]).negate().and(t().field("b").eq(3));
        assert_sql!(c, r#"NOT "a" IN (1,2) AND "b"=3"#);
    }
}
