// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Constructors for common SQL functions.
//!
//! Aggregates carry the aggregate marker so HAVING/validator logic can tell
//! them apart from scalar calls; analytic constructors produce plain calls
//! whose OVER clause the caller arms with [`FunctionCall::over`] or
//! [`FunctionCall::orderby`].

use super::{function::FunctionCall, term::Term};

fn aggregate(name: &str, arg: impl Into<Term>) -> FunctionCall {
    FunctionCall::new(name).arg(arg).aggregate()
}

pub fn sum(term: impl Into<Term>) -> FunctionCall {
    aggregate("SUM", term)
}

pub fn count(term: impl Into<Term>) -> FunctionCall {
    aggregate("COUNT", term)
}

pub fn avg(term: impl Into<Term>) -> FunctionCall {
    aggregate("AVG", term)
}

pub fn min(term: impl Into<Term>) -> FunctionCall {
    aggregate("MIN", term)
}

pub fn max(term: impl Into<Term>) -> FunctionCall {
    aggregate("MAX", term)
}

pub fn coalesce(terms: impl IntoIterator<Item = impl Into<Term>>) -> FunctionCall {
    FunctionCall::new("COALESCE").args(terms)
}

pub fn lower(term: impl Into<Term>) -> FunctionCall {
    FunctionCall::new("LOWER").arg(term)
}

pub fn upper(term: impl Into<Term>) -> FunctionCall {
    FunctionCall::new("UPPER").arg(term)
}

pub fn concat(terms: impl IntoIterator<Item = impl Into<Term>>) -> FunctionCall {
    FunctionCall::new("CONCAT").args(terms)
}

pub fn abs(term: impl Into<Term>) -> FunctionCall {
    FunctionCall::new("ABS").arg(term)
}

pub fn row_number() -> FunctionCall {
    FunctionCall::new("ROW_NUMBER")
}

pub fn rank() -> FunctionCall {
    FunctionCall::new("RANK")
}

pub fn dense_rank() -> FunctionCall {
    FunctionCall::new("DENSE_RANK")
}

pub fn ntile(buckets: u32) -> FunctionCall {
    FunctionCall::new("NTILE").arg(i64::from(buckets))
}

pub fn lag(term: impl Into<Term>) -> FunctionCall {
    FunctionCall::new("LAG").arg(term)
}

pub fn lead(term: impl Into<Term>) -> FunctionCall {
    FunctionCall::new("LEAD").arg(term)
}

pub fn first_value(term: impl Into<Term>) -> FunctionCall {
    FunctionCall::new("FIRST_VALUE").arg(term)
}

pub fn last_value(term: impl Into<Term>) -> FunctionCall {
    FunctionCall::new("LAST_VALUE").arg(term)
}

#[cfg(test)]
mod tests {
    use super::super::table::Table;
    use super::*;

    fn t() -> Table {
        Table::new("abc")
    }

    #[test]
    fn aggregates_carry_the_marker() {
        assert_eq!(sum(t().field("foo")).is_aggregate(), Some(true));
        assert_eq!(count(Term::star()).is_aggregate(), Some(true));
        assert_eq!(lower(t().field("foo")).is_aggregate(), Some(false));
    }

    #[test]
    fn count_star() {
        assert_sql!(count(Term::star()), "COUNT(*)");
    }

    #[test]
    fn variadic_constructors() {
        let f = coalesce([t().field("foo"), Term::from(0)]);
        assert_sql!(f, r#"COALESCE("foo",0)"#);

        let f = concat([t().field("first"), Term::from(" "), t().field("last")]);
        assert_sql!(f, r#"CONCAT("first",' ',"last")"#);
    }

    #[test]
    fn ntile_takes_a_bucket_count() {
        assert_sql!(ntile(4).over([t().field("foo")]), r#"NTILE(4) OVER(PARTITION BY "foo")"#);
    }
}
