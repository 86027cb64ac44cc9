// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::QueryError;

use super::{
    Dialect, ExpressionBuilder, SqlBuilder,
    arithmetic::ArithmeticExpression,
    case::Case,
    criterion::Criterion,
    function::FunctionCall,
    operator::{ArithOp, Comparator},
    query::QueryBuilder,
    table::{Field, Table},
    value::Value,
};

/// Any expression that produces a SQL value: a literal, a column reference, an
/// arithmetic combination, a function call, a CASE, a boolean criterion used as
/// a value, or a whole subquery.
///
/// A term is an immutable value object: every combining operation takes its
/// operands by value (cloning where the caller wants to reuse a subtree) and
/// returns a new term. Subtrees can therefore be freely shared across queries.
///
/// The optional alias is rendered only where the surrounding clause asks for it
/// (the SELECT list, mainly); nested positions such as function arguments
/// always render the bare expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    pub(crate) kind: TermKind,
    pub(crate) alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TermKind {
    Value(Value),
    Field(Field),
    /// `*` or `"table".*`
    Star(Option<Table>),
    Arithmetic(ArithmeticExpression),
    Function(FunctionCall),
    Case(Box<Case>),
    /// A boolean-valued term, e.g. `SELECT "age">18 FROM ...`
    Criterion(Box<Criterion>),
    Subquery(Box<QueryBuilder>),
    /// `(a,b,c)`
    Tuple(Vec<Term>),
    /// `[a,b,c]`, or `ARRAY[a,b,c]` for the Postgres family
    Array(Vec<Term>),
    /// Unary minus
    Negative(Box<Term>),
}

impl Term {
    pub(crate) fn new(kind: TermKind) -> Self {
        Self { kind, alias: None }
    }

    /// The bare `*` selection.
    pub fn star() -> Self {
        Self::new(TermKind::Star(None))
    }

    pub(crate) fn star_of(table: Table) -> Self {
        Self::new(TermKind::Star(Some(table)))
    }

    /// A tuple literal such as `(1,'a')`.
    pub fn tuple(elems: impl IntoIterator<Item = impl Into<Term>>) -> Self {
        Self::new(TermKind::Tuple(elems.into_iter().map(Into::into).collect()))
    }

    /// An array literal. Also available through `From<Vec<_>>`.
    pub fn array(elems: impl IntoIterator<Item = impl Into<Term>>) -> Self {
        Self::new(TermKind::Array(elems.into_iter().map(Into::into).collect()))
    }

    pub fn as_(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    fn basic(self, comparator: Comparator, rhs: impl Into<Term>) -> Criterion {
        Criterion::Basic(comparator, self, rhs.into())
    }

    pub fn eq(self, rhs: impl Into<Term>) -> Criterion {
        self.basic(Comparator::Eq, rhs)
    }

    pub fn ne(self, rhs: impl Into<Term>) -> Criterion {
        self.basic(Comparator::Ne, rhs)
    }

    pub fn lt(self, rhs: impl Into<Term>) -> Criterion {
        self.basic(Comparator::Lt, rhs)
    }

    pub fn lte(self, rhs: impl Into<Term>) -> Criterion {
        self.basic(Comparator::Lte, rhs)
    }

    pub fn gt(self, rhs: impl Into<Term>) -> Criterion {
        self.basic(Comparator::Gt, rhs)
    }

    pub fn gte(self, rhs: impl Into<Term>) -> Criterion {
        self.basic(Comparator::Gte, rhs)
    }

    /// Membership test: `self IN (container)`. The container may be an array
    /// (`field.isin(vec![1, 2, 3])`), a tuple, or a subquery.
    pub fn isin(self, container: impl Into<Term>) -> Criterion {
        Criterion::Contains {
            term: self,
            container: container.into(),
            negated: false,
        }
    }

    pub fn notin(self, container: impl Into<Term>) -> Criterion {
        Criterion::Contains {
            term: self,
            container: container.into(),
            negated: true,
        }
    }

    pub fn between(self, lower: impl Into<Term>, upper: impl Into<Term>) -> Criterion {
        Criterion::Between {
            term: self,
            lower: lower.into(),
            upper: upper.into(),
        }
    }

    pub fn isnull(self) -> Criterion {
        Criterion::IsNull(self)
    }

    pub fn notnull(self) -> Criterion {
        Criterion::NotNull(self)
    }

    pub fn like(self, pattern: impl Into<Term>) -> Criterion {
        Criterion::Like {
            term: self,
            pattern: pattern.into(),
            negated: false,
        }
    }

    pub fn not_like(self, pattern: impl Into<Term>) -> Criterion {
        Criterion::Like {
            term: self,
            pattern: pattern.into(),
            negated: true,
        }
    }

    /// Bitwise-and mask test: `self&value`.
    pub fn bin_and(self, value: impl Into<Term>) -> Criterion {
        Criterion::BitwiseAnd(self, value.into())
    }

    /// Exponentiation via the `POW` function; most dialects lack a native operator.
    pub fn pow(self, exponent: impl Into<Term>) -> Term {
        FunctionCall::new("POW").arg(self).arg(exponent).into()
    }

    /// Modulo via the `MOD` function; most dialects lack a native operator.
    pub fn modulo(self, divisor: impl Into<Term>) -> Term {
        FunctionCall::new("MOD").arg(self).arg(divisor).into()
    }

    pub(crate) fn arith(op: ArithOp, left: Term, right: Term) -> Term {
        Term::new(TermKind::Arithmetic(ArithmeticExpression {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }))
    }

    /// Three-valued aggregate vote for this term: `Some(true)` when the term is
    /// computed over a group of rows, `Some(false)` when it definitely is not,
    /// `None` when the term has no opinion (pure literals).
    pub fn is_aggregate(&self) -> Option<bool> {
        match &self.kind {
            TermKind::Value(_) | TermKind::Subquery(_) => None,
            TermKind::Field(_) | TermKind::Star(_) => Some(false),
            TermKind::Arithmetic(expr) => expr.is_aggregate(),
            TermKind::Function(function) => function.is_aggregate(),
            TermKind::Case(case) => case.is_aggregate(),
            TermKind::Criterion(criterion) => criterion.is_aggregate(),
            TermKind::Tuple(elems) | TermKind::Array(elems) => {
                resolve_is_aggregate(elems.iter().map(Term::is_aggregate))
            }
            TermKind::Negative(term) => term.is_aggregate(),
        }
    }

    /// Pre-order walk over every field reference in this term, including those
    /// inside nested criteria, functions, and CASE branches. Subqueries are not
    /// descended into; they validate their own references.
    pub(crate) fn for_each_field<'a>(&'a self, f: &mut dyn FnMut(&'a Field)) {
        match &self.kind {
            TermKind::Value(_) | TermKind::Star(_) | TermKind::Subquery(_) => {}
            TermKind::Field(field) => f(field),
            TermKind::Arithmetic(expr) => {
                expr.left.for_each_field(f);
                expr.right.for_each_field(f);
            }
            TermKind::Function(function) => function.for_each_field(f),
            TermKind::Case(case) => case.for_each_field(f),
            TermKind::Criterion(criterion) => criterion.for_each_field(f),
            TermKind::Tuple(elems) | TermKind::Array(elems) => {
                for elem in elems {
                    elem.for_each_field(f);
                }
            }
            TermKind::Negative(term) => term.for_each_field(f),
        }
    }

    /// A copy of this term with every field bound to `from` rebound to `to`.
    /// Useful for retargeting an expression subtree at another table (or at an
    /// aliased copy of the same table).
    pub fn replace_table(&self, from: &Table, to: &Table) -> Term {
        let kind = match &self.kind {
            TermKind::Value(_) | TermKind::Subquery(_) => self.kind.clone(),
            TermKind::Field(field) => TermKind::Field(replace_field_table(field, from, to)),
            TermKind::Star(table) => TermKind::Star(table.as_ref().map(|t| {
                if t == from {
                    to.clone()
                } else {
                    t.clone()
                }
            })),
            TermKind::Arithmetic(expr) => TermKind::Arithmetic(ArithmeticExpression {
                op: expr.op,
                left: Box::new(expr.left.replace_table(from, to)),
                right: Box::new(expr.right.replace_table(from, to)),
            }),
            TermKind::Function(function) => TermKind::Function(function.replace_table(from, to)),
            TermKind::Case(case) => TermKind::Case(Box::new(case.replace_table(from, to))),
            TermKind::Criterion(criterion) => {
                TermKind::Criterion(Box::new(criterion.replace_table(from, to)))
            }
            TermKind::Tuple(elems) => {
                TermKind::Tuple(elems.iter().map(|e| e.replace_table(from, to)).collect())
            }
            TermKind::Array(elems) => {
                TermKind::Array(elems.iter().map(|e| e.replace_table(from, to)).collect())
            }
            TermKind::Negative(term) => {
                TermKind::Negative(Box::new(term.replace_table(from, to)))
            }
        };
        Term {
            kind,
            alias: self.alias.clone(),
        }
    }

    /// Check shape invariants that cannot be expressed in the type system (a
    /// CASE needs at least one branch, nested set queries need matching arity).
    pub(crate) fn validate(&self) -> Result<(), QueryError> {
        match &self.kind {
            TermKind::Value(_) | TermKind::Field(_) | TermKind::Star(_) => Ok(()),
            TermKind::Arithmetic(expr) => {
                expr.left.validate()?;
                expr.right.validate()
            }
            TermKind::Function(function) => function.validate(),
            TermKind::Case(case) => case.validate(),
            TermKind::Criterion(criterion) => criterion.validate(),
            TermKind::Subquery(query) => query.validate(),
            TermKind::Tuple(elems) | TermKind::Array(elems) => {
                elems.iter().try_for_each(Term::validate)
            }
            TermKind::Negative(term) => term.validate(),
        }
    }
}

fn replace_field_table(field: &Field, from: &Table, to: &Table) -> Field {
    match &field.table {
        Some(table) if table == from => Field {
            name: field.name.clone(),
            table: Some(to.clone()),
        },
        _ => field.clone(),
    }
}

/// Fold three-valued aggregate votes: `Some(false)` wins outright, `Some(true)`
/// requires every non-abstaining vote to agree, and all-abstain stays `None`.
/// This is deliberately not an `all()`/`any()` collapse; "no opinion" must
/// propagate through pure-literal expressions distinctly from "not aggregate".
pub(crate) fn resolve_is_aggregate(votes: impl IntoIterator<Item = Option<bool>>) -> Option<bool> {
    let mut result = None;
    for vote in votes {
        match vote {
            Some(false) => return Some(false),
            Some(true) => result = Some(true),
            None => {}
        }
    }
    result
}

impl ExpressionBuilder for Term {
    /// Build the term itself; the alias, if any, is the enclosing clause's
    /// concern.
    fn build(&self, dialect: &Dialect, builder: &mut SqlBuilder) {
        match &self.kind {
            TermKind::Value(value) => value.build(dialect, builder),
            TermKind::Field(field) => field.build(dialect, builder),
            TermKind::Star(table) => match table {
                Some(table) if builder.namespace_enabled() || table.alias.is_some() => {
                    builder.push_identifier(table.qualifier());
                    builder.push_str(".*");
                }
                _ => builder.push('*'),
            },
            TermKind::Arithmetic(expr) => expr.build(dialect, builder),
            TermKind::Function(function) => function.build(dialect, builder),
            TermKind::Case(case) => case.build(dialect, builder),
            TermKind::Criterion(criterion) => criterion.build(dialect, builder),
            TermKind::Subquery(query) => {
                builder.push('(');
                query.build(dialect, builder);
                builder.push(')');
            }
            TermKind::Tuple(elems) => {
                builder.push('(');
                builder.push_elems(dialect, elems, ",");
                builder.push(')');
            }
            TermKind::Array(elems) => {
                if dialect.family.is_postgres_family() {
                    if elems.is_empty() {
                        builder.push_str("'{}'");
                    } else {
                        builder.push_str("ARRAY[");
                        builder.push_elems(dialect, elems, ",");
                        builder.push(']');
                    }
                } else {
                    builder.push('[');
                    builder.push_elems(dialect, elems, ",");
                    builder.push(']');
                }
            }
            TermKind::Negative(term) => {
                builder.push('-');
                term.build(dialect, builder);
            }
        }
    }
}

impl<T: Into<Term>> std::ops::Add<T> for Term {
    type Output = Term;

    fn add(self, rhs: T) -> Term {
        Term::arith(ArithOp::Add, self, rhs.into())
    }
}

impl<T: Into<Term>> std::ops::Sub<T> for Term {
    type Output = Term;

    fn sub(self, rhs: T) -> Term {
        Term::arith(ArithOp::Sub, self, rhs.into())
    }
}

impl<T: Into<Term>> std::ops::Mul<T> for Term {
    type Output = Term;

    fn mul(self, rhs: T) -> Term {
        Term::arith(ArithOp::Mul, self, rhs.into())
    }
}

impl<T: Into<Term>> std::ops::Div<T> for Term {
    type Output = Term;

    fn div(self, rhs: T) -> Term {
        Term::arith(ArithOp::Div, self, rhs.into())
    }
}

impl std::ops::Neg for Term {
    type Output = Term;

    fn neg(self) -> Term {
        Term::new(TermKind::Negative(Box::new(self)))
    }
}

impl From<Value> for Term {
    fn from(value: Value) -> Self {
        Term::new(TermKind::Value(value))
    }
}

impl From<Field> for Term {
    fn from(field: Field) -> Self {
        Term::new(TermKind::Field(field))
    }
}

impl From<FunctionCall> for Term {
    fn from(function: FunctionCall) -> Self {
        Term::new(TermKind::Function(function))
    }
}

impl From<Case> for Term {
    fn from(case: Case) -> Self {
        Term::new(TermKind::Case(Box::new(case)))
    }
}

impl From<Criterion> for Term {
    fn from(criterion: Criterion) -> Self {
        Term::new(TermKind::Criterion(Box::new(criterion)))
    }
}

impl From<QueryBuilder> for Term {
    fn from(query: QueryBuilder) -> Self {
        Term::new(TermKind::Subquery(Box::new(query)))
    }
}

impl<T: Into<Term>> From<Vec<T>> for Term {
    fn from(elems: Vec<T>) -> Self {
        Term::array(elems)
    }
}

impl From<bool> for Term {
    fn from(b: bool) -> Self {
        Value::from(b).into()
    }
}

impl From<i64> for Term {
    fn from(i: i64) -> Self {
        Value::from(i).into()
    }
}

impl From<i32> for Term {
    fn from(i: i32) -> Self {
        Value::from(i).into()
    }
}

impl From<u32> for Term {
    fn from(i: u32) -> Self {
        Value::from(i).into()
    }
}

impl From<f64> for Term {
    fn from(f: f64) -> Self {
        Value::from(f).into()
    }
}

impl From<f32> for Term {
    fn from(f: f32) -> Self {
        Value::from(f).into()
    }
}

impl From<&str> for Term {
    fn from(s: &str) -> Self {
        Value::from(s).into()
    }
}

impl From<String> for Term {
    fn from(s: String) -> Self {
        Value::from(s).into()
    }
}

impl From<NaiveDate> for Term {
    fn from(d: NaiveDate) -> Self {
        Value::from(d).into()
    }
}

impl From<NaiveTime> for Term {
    fn from(t: NaiveTime) -> Self {
        Value::from(t).into()
    }
}

impl From<NaiveDateTime> for Term {
    fn from(ts: NaiveDateTime) -> Self {
        Value::from(ts).into()
    }
}

/// `None` maps to the SQL `NULL` literal.
impl<T: Into<Term>> From<Option<T>> for Term {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(value) => value.into(),
            None => Value::Null.into(),
        }
    }
}

/// Build a `Vec<Term>` from heterogeneous literal values, e.g. a row of
/// INSERT values: `terms![1, "a", true]`.
#[macro_export]
macro_rules! terms {
    ($($value:expr),* $(,)?) => {
        vec![$($crate::sql::Term::from($value)),*]
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str) -> Term {
        Table::new("abc").field(name)
    }

    #[test]
    fn comparison_constructors() {
        assert_sql!(field("foo").eq(1), r#""foo"=1"#);
        assert_sql!(field("foo").ne("a"), r#""foo"<>'a'"#);
        assert_sql!(field("foo").lt(1), r#""foo"<1"#);
        assert_sql!(field("foo").lte(1), r#""foo"<=1"#);
        assert_sql!(field("foo").gt(1), r#""foo">1"#);
        assert_sql!(field("foo").gte(1), r#""foo">=1"#);
    }

    #[test]
    fn constant_wrapping() {
        assert_sql!(Term::from(None::<i64>), "NULL");
        assert_sql!(Term::from(vec![1, 2, 3]), "[1,2,3]");
        assert_sql!(Term::tuple([1, 2]), "(1,2)");
        assert_sql!(field("foo").eq(Term::from(vec!["a", "b"])), r#""foo"=['a','b']"#);
    }

    #[test]
    fn postgres_array_literals() {
        use crate::sql::ExpressionBuilder;

        let dialect = Dialect::postgres();
        assert_eq!(Term::from(vec![1, 2]).to_sql(&dialect), "ARRAY[1,2]");
        assert_eq!(Term::array(Vec::<i64>::new()).to_sql(&dialect), "'{}'");
    }

    #[test]
    fn pow_and_modulo_are_functions() {
        assert_sql!(field("foo").pow(2), r#"POW("foo",2)"#);
        assert_sql!(field("foo").modulo(3), r#"MOD("foo",3)"#);
    }

    #[test]
    fn negative_term() {
        assert_sql!(-field("foo"), r#"-"foo""#);
    }

    #[test]
    fn alias_is_not_rendered_by_the_term_itself() {
        assert_sql!(field("foo").as_("bar"), r#""foo""#);
    }

    #[test]
    fn aggregate_voting() {
        use crate::sql::functions::sum;

        assert_eq!(sum(field("x")).is_aggregate(), Some(true));
        assert_eq!(field("x").is_aggregate(), Some(false));
        assert_eq!(Term::from(1).is_aggregate(), None);
        assert_eq!((field("x") + 1).is_aggregate(), Some(false));
        assert_eq!((Term::from(1) / sum(field("x"))).is_aggregate(), Some(true));
    }

    #[test]
    fn replace_table_rebinds_fields() {
        let old = Table::new("abc");
        let new = Table::new("abc").as_("abc2");

        let criterion = old.field("foo").eq(old.field("bar"));
        let replaced = criterion.replace_table(&old, &new);

        let mut tables = Vec::new();
        replaced.for_each_field(&mut |f| tables.push(f.table.clone().unwrap()));
        assert_eq!(tables, vec![new.clone(), new]);
    }
}
