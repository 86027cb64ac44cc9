// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

/// Families of SQL dialects. Most rendering is identical across families; a
/// handful of branches (array literal syntax, for one) consult this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialectFamily {
    Generic,
    Postgres,
    MySql,
    ClickHouse,
    Sqlite,
}

impl DialectFamily {
    /// Postgres and its wire-compatible descendants share the `ARRAY[...]`
    /// literal syntax.
    pub fn is_postgres_family(&self) -> bool {
        matches!(self, DialectFamily::Postgres)
    }
}

/// Rendering configuration supplied by a dialect: the identifier quote
/// character and the family tag. This is the ambient context threaded through
/// every [`ExpressionBuilder::build`](super::ExpressionBuilder::build) call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialect {
    /// Character wrapped around identifiers (tables, columns, aliases).
    /// `None` disables identifier quoting entirely.
    pub quote_char: Option<char>,
    pub family: DialectFamily,
}

impl Dialect {
    pub fn new(quote_char: Option<char>, family: DialectFamily) -> Self {
        Self { quote_char, family }
    }

    pub fn generic() -> Self {
        Self::new(Some('"'), DialectFamily::Generic)
    }

    pub fn postgres() -> Self {
        Self::new(Some('"'), DialectFamily::Postgres)
    }

    pub fn mysql() -> Self {
        Self::new(Some('`'), DialectFamily::MySql)
    }

    pub fn clickhouse() -> Self {
        Self::new(Some('"'), DialectFamily::ClickHouse)
    }

    pub fn sqlite() -> Self {
        Self::new(Some('"'), DialectFamily::Sqlite)
    }

    /// The same dialect with identifier quoting turned off.
    pub fn unquoted(mut self) -> Self {
        self.quote_char = None;
        self
    }
}

impl Default for Dialect {
    fn default() -> Self {
        Self::generic()
    }
}
