// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use super::{Dialect, SqlBuilder};

/// A trait for types that can build themselves into an SQL expression.
///
/// Each constituent of an SQL expression (value, field, criterion, function,
/// whole query, etc.) implements this trait, which can then be used to
/// hierarchically build an SQL string: each node asks its children to build
/// themselves and applies its own syntax (operator, quoting, parentheses)
/// around the results.
pub trait ExpressionBuilder {
    /// Build the SQL expression into the given SQL builder
    fn build(&self, dialect: &Dialect, builder: &mut SqlBuilder);

    /// Build the SQL expression into a string and return it. This is useful for
    /// testing/debugging, where we want to assert on the generated SQL without
    /// going through the whole process of creating an SqlBuilder, building into
    /// it, and extracting the SQL string.
    fn to_sql(&self, dialect: &Dialect) -> String
    where
        Self: Sized,
    {
        let mut builder = SqlBuilder::new(dialect);
        self.build(dialect, &mut builder);
        builder.into_sql()
    }
}

impl<T> ExpressionBuilder for Box<T>
where
    T: ExpressionBuilder,
{
    fn build(&self, dialect: &Dialect, builder: &mut SqlBuilder) {
        self.as_ref().build(dialect, builder)
    }
}

impl<T> ExpressionBuilder for &T
where
    T: ExpressionBuilder,
{
    fn build(&self, dialect: &Dialect, builder: &mut SqlBuilder) {
        (**self).build(dialect, builder)
    }
}
