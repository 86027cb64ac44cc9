// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! A programmatic SQL query builder: an in-memory expression tree of SQL
//! constructs (tables, fields, criteria, functions, joins, CASE expressions,
//! set operations) composed through an immutable, chainable API and rendered
//! to dialect-aware SQL text.
//!
//! The central types are [`Term`], the universal expression node, and
//! [`QueryBuilder`], the clause accumulator created through the [`Query`]
//! factory. Every chainable method returns a new builder snapshot, so
//! expression subtrees and partially-built queries can be freely shared:
//!
//! ```
//! use quill_sql::{Dialect, Query, Table};
//!
//! let users = Table::new("users");
//! let q = Query::from_(users.clone())
//!     .select([users.field("id"), users.field("name")])
//!     .where_(users.field("age").gte(18))
//!     .orderby(users.field("name"), None);
//!
//! assert_eq!(
//!     q.to_sql(&Dialect::generic()).unwrap(),
//!     r#"SELECT "id","name" FROM "users" WHERE "age">=18 ORDER BY "name""#
//! );
//! ```
//!
//! This crate never connects to a database and never parses SQL; it only
//! builds and serializes outbound SQL strings. String literals are quoted with
//! single-quote doubling and nothing more, so untrusted text must be sanitized
//! by the caller.

pub mod error;
pub mod sql;

pub use error::QueryError;
pub use sql::{
    Case, Criterion, Dialect, DialectFamily, ExpressionBuilder, Field, FunctionCall, JoinType,
    Order, Query, QueryBuilder, SetQuery, Table, Term, functions,
};
