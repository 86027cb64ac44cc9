// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

#[macro_use]
#[cfg(test)]
mod test_util;

mod arithmetic;
mod case;
mod criterion;
mod dialect;
mod expression_builder;
mod function;
mod operator;
mod sql_builder;
mod table;
mod term;
mod value;

mod query;
mod set_query;

pub mod functions;

pub use arithmetic::ArithmeticExpression;
pub use case::Case;
pub use criterion::Criterion;
pub use dialect::{Dialect, DialectFamily};
pub use expression_builder::ExpressionBuilder;
pub use function::{Frame, FrameBound, FunctionCall, Window};
pub use operator::{
    ArithOp, BoolOp, Comparator, FrameUnit, JoinType, Order, SetOperation,
};
pub use query::{Joiner, Query, QueryBuilder, Source};
pub use set_query::SetQuery;
pub use sql_builder::SqlBuilder;
pub use table::{Field, Table};
pub use term::Term;
pub use value::Value;
