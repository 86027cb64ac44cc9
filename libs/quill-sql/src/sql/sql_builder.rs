// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::HashSet;

use super::{Dialect, ExpressionBuilder};

/// The string accumulator every expression node builds itself into.
///
/// Besides the raw SQL text it tracks two pieces of per-query rendering state:
/// whether column references must be namespace-qualified (`"table"."col"`
/// instead of `"col"`), and the set of aliases present in the current SELECT
/// list (GROUP BY/ORDER BY elements whose alias matches one may render as the
/// bare alias). Both are scoped with save/restore helpers so that subqueries
/// get their own state.
pub struct SqlBuilder {
    sql: String,
    /// Identifier quote character, taken from the dialect. `None` disables quoting.
    quote_char: Option<char>,
    /// Render column references as `"table"."col"` instead of `"col"`.
    with_namespace: bool,
    /// Aliases of the SELECT list currently being rendered.
    select_aliases: HashSet<String>,
}

impl SqlBuilder {
    pub fn new(dialect: &Dialect) -> Self {
        Self {
            sql: String::new(),
            quote_char: dialect.quote_char,
            with_namespace: false,
            select_aliases: HashSet::new(),
        }
    }

    /// Push a string
    pub fn push_str<T: AsRef<str>>(&mut self, s: T) {
        self.sql.push_str(s.as_ref());
    }

    /// Push a character
    pub fn push(&mut self, c: char) {
        self.sql.push(c);
    }

    /// Push a space. This is a common operation, so it is provided as a separate method.
    pub fn push_space(&mut self) {
        self.sql.push(' ');
    }

    /// Push an identifier (table name, column name, alias), wrapped in the
    /// dialect's quote character. Without the quotes, an identifier with
    /// uppercase letters would be folded to lowercase by most databases.
    pub fn push_identifier<T: AsRef<str>>(&mut self, s: T) {
        match self.quote_char {
            Some(quote) => {
                self.sql.push(quote);
                self.sql.push_str(s.as_ref());
                self.sql.push(quote);
            }
            None => self.sql.push_str(s.as_ref()),
        }
    }

    /// Push a string literal: single-quote wrapped, embedded single quotes
    /// doubled. No other escaping is performed.
    pub fn push_string_literal(&mut self, s: &str) {
        self.sql.push('\'');
        for c in s.chars() {
            if c == '\'' {
                self.sql.push('\'');
            }
            self.sql.push(c);
        }
        self.sql.push('\'');
    }

    /// Push elements of an iterator, separated by `sep`. The `push_elem`
    /// function provides the flexibility to map the elements (compared to
    /// [`SqlBuilder::push_elems`], which assumes that the elements implement
    /// [`ExpressionBuilder`]).
    pub fn push_iter<T>(
        &mut self,
        iter: impl ExactSizeIterator<Item = T>,
        sep: &str,
        push_elem: impl FnMut(&mut Self, T),
    ) {
        let mut push_elem = push_elem;
        let len = iter.len();
        for (i, item) in iter.enumerate() {
            push_elem(self, item);

            if i < len - 1 {
                self.sql.push_str(sep);
            }
        }
    }

    /// Push elements of a slice, separated by `sep`. The elements must
    /// themselves implement `ExpressionBuilder`.
    pub fn push_elems<T: ExpressionBuilder>(&mut self, dialect: &Dialect, elems: &[T], sep: &str) {
        self.push_iter(elems.iter(), sep, |builder, elem| {
            elem.build(dialect, builder);
        });
    }

    pub fn namespace_enabled(&self) -> bool {
        self.with_namespace
    }

    /// Execute the given function with the namespace flag set to `enabled`,
    /// restoring the previous value afterwards. Queries enable it when joins or
    /// multiple FROM sources make bare column names ambiguous; INSERT/UPDATE
    /// column lists disable it.
    pub fn with_namespace<F, R>(&mut self, enabled: bool, func: F) -> R
    where
        F: FnOnce(&mut Self) -> R,
    {
        let cur = self.with_namespace;
        self.with_namespace = enabled;
        let ret = func(self);
        self.with_namespace = cur;
        ret
    }

    pub fn has_select_alias(&self, alias: &str) -> bool {
        self.select_aliases.contains(alias)
    }

    /// Execute the given function with the SELECT-alias set replaced, restoring
    /// the previous set afterwards.
    pub fn with_select_aliases<F, R>(&mut self, aliases: HashSet<String>, func: F) -> R
    where
        F: FnOnce(&mut Self) -> R,
    {
        let cur = std::mem::replace(&mut self.select_aliases, aliases);
        let ret = func(self);
        self.select_aliases = cur;
        ret
    }

    /// Get the SQL string. Calling this method should be the final step in
    /// building an SQL expression, and thus it consumes the builder.
    pub fn into_sql(self) -> String {
        self.sql
    }
}
