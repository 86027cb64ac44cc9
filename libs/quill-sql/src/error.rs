// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use thiserror::Error;

/// Errors produced while composing or rendering a query.
///
/// All of these are synchronous and non-retryable: nothing here talks to a
/// database, so every failure is either a call-sequence bug (state and shape
/// errors) or a reference to a table the query doesn't know about.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// A `CASE` expression was rendered with zero `WHEN` branches.
    #[error("CASE expression requires at least one WHEN branch")]
    EmptyCase,

    /// Two sides of a set operation (UNION etc.) select a different number of terms.
    #[error("set operation requires equal select arity ({left} vs {right})")]
    SetArity { left: usize, right: usize },

    /// A field references a table that is not part of the query's FROM/JOIN
    /// sources (or its UPDATE/DELETE target).
    #[error("field \"{field}\" references table \"{table}\", which is not part of the query")]
    FieldReference { field: String, table: String },

    /// A JOIN `ON` criterion does not reference the joined item.
    #[error("JOIN ON criterion does not reference the joined source \"{0}\"")]
    JoinOn(String),

    /// A bare column name was given where no FROM source exists to resolve it against.
    #[error("cannot resolve column \"{0}\" without a FROM source")]
    UnresolvedColumn(String),

    /// An operation incompatible with the builder's current statement kind.
    #[error("cannot {attempted} on a {current} query")]
    ConflictingKind {
        attempted: &'static str,
        current: &'static str,
    },

    /// `INTO` may only be set once per builder.
    #[error("INTO target is already set")]
    DuplicateInto,

    /// `insert`/`columns` requires an `INTO` target.
    #[error("{0} requires an INTO target")]
    MissingInto(&'static str),

    /// `set` requires an `UPDATE` target.
    #[error("SET requires an UPDATE target")]
    MissingUpdate,

    /// MySQL-style `WITH ROLLUP` without any GROUP BY terms.
    #[error("WITH ROLLUP requires at least one GROUP BY term")]
    RollupWithoutGroup,

    /// A window frame was specified twice on the same function.
    #[error("window frame is already specified")]
    DuplicateFrame,

    /// A subquery was referenced for fields before being given an alias.
    #[error("subquery must be aliased (via as_) before its fields can be referenced")]
    UnaliasedSubquery,
}
