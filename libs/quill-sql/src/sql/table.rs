// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use super::{Dialect, ExpressionBuilder, SqlBuilder, term::Term};

/// A table identified by its (name, schema, alias) triple.
///
/// Identity is structural: two `Table::new("x")` values are interchangeable,
/// and a `Field` holds a copy of this triple as a lookup key rather than an
/// owning pointer into the query. Equality and hashing follow from that.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Table {
    pub name: String,
    pub schema: Option<String>,
    pub alias: Option<String>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: None,
            alias: None,
        }
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn as_(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// A reference to a column of this table. Any name is accepted; resolution
    /// against the query's sources happens at render time.
    pub fn field(&self, name: impl Into<String>) -> Term {
        Field {
            name: name.into(),
            table: Some(self.clone()),
        }
        .into()
    }

    /// The `table.*` selection for this table.
    pub fn star(&self) -> Term {
        Term::star_of(self.clone())
    }

    /// The identifier used to qualify this table's columns: the alias when one
    /// is set, the table name otherwise.
    pub fn qualifier(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

impl From<&str> for Table {
    fn from(name: &str) -> Self {
        Table::new(name)
    }
}

impl From<String> for Table {
    fn from(name: String) -> Self {
        Table::new(name)
    }
}

impl ExpressionBuilder for Table {
    /// Build expression of the form `["schema".]"name" ["alias"]`.
    fn build(&self, _dialect: &Dialect, builder: &mut SqlBuilder) {
        if let Some(schema) = &self.schema {
            builder.push_identifier(schema);
            builder.push('.');
        }
        builder.push_identifier(&self.name);
        if let Some(alias) = &self.alias {
            builder.push_space();
            builder.push_identifier(alias);
        }
    }
}

/// A named column reference, optionally bound to a table.
///
/// Rendering qualifies the column with [`Table::qualifier`] only when the
/// surrounding query enabled namespacing (joins, multiple FROM sources, or a
/// subquery source).
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub table: Option<Table>,
}

impl Field {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: None,
        }
    }

    pub fn bound(name: impl Into<String>, table: Table) -> Self {
        Self {
            name: name.into(),
            table: Some(table),
        }
    }
}

impl From<&str> for Field {
    fn from(name: &str) -> Self {
        Field::new(name)
    }
}

impl From<String> for Field {
    fn from(name: String) -> Self {
        Field::new(name)
    }
}

impl ExpressionBuilder for Field {
    fn build(&self, _dialect: &Dialect, builder: &mut SqlBuilder) {
        if builder.namespace_enabled() {
            if let Some(table) = &self.table {
                builder.push_identifier(table.qualifier());
                builder.push('.');
            }
        }
        builder.push_identifier(&self.name);
    }
}
