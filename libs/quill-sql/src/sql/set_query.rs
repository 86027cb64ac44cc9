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
    operator::{Order, SetOperation},
    query::{QueryBuilder, build_ordered},
    term::Term,
};

/// A chain of whole queries combined with set operations (UNION, UNION ALL,
/// INTERSECT, MINUS), carrying its own ORDER BY / LIMIT / OFFSET.
///
/// Every side must select the same number of terms; the mismatch is reported
/// at render time as [`QueryError::SetArity`].
#[derive(Debug, Clone, PartialEq)]
pub struct SetQuery {
    base: QueryBuilder,
    tail: Vec<(SetOperation, QueryBuilder)>,
    orderbys: Vec<(Term, Option<Order>)>,
    limit: Option<u64>,
    offset: Option<u64>,
    alias: Option<String>,
}

impl SetQuery {
    pub(crate) fn new(base: QueryBuilder, operation: SetOperation, other: QueryBuilder) -> Self {
        Self {
            base,
            tail: vec![(operation, other)],
            orderbys: Vec::new(),
            limit: None,
            offset: None,
            alias: None,
        }
    }

    fn append(&self, operation: SetOperation, other: QueryBuilder) -> SetQuery {
        let mut set = self.clone();
        set.tail.push((operation, other));
        set
    }

    pub fn union(&self, other: QueryBuilder) -> SetQuery {
        self.append(SetOperation::Union, other)
    }

    pub fn union_all(&self, other: QueryBuilder) -> SetQuery {
        self.append(SetOperation::UnionAll, other)
    }

    pub fn intersect(&self, other: QueryBuilder) -> SetQuery {
        self.append(SetOperation::Intersect, other)
    }

    pub fn minus(&self, other: QueryBuilder) -> SetQuery {
        self.append(SetOperation::Minus, other)
    }

    /// Add an ORDER BY element applying to the combined result. Elements whose
    /// alias matches a SELECT alias of the first query render as the bare
    /// alias.
    pub fn orderby(&self, term: impl Into<Term>, order: Option<Order>) -> SetQuery {
        let mut set = self.clone();
        set.orderbys.push((term.into(), order));
        set
    }

    pub fn limit(&self, limit: u64) -> SetQuery {
        let mut set = self.clone();
        set.limit = Some(limit);
        set
    }

    pub fn offset(&self, offset: u64) -> SetQuery {
        let mut set = self.clone();
        set.offset = Some(offset);
        set
    }

    /// Alias the combined query for use as a FROM source.
    pub fn as_(&self, alias: impl Into<String>) -> SetQuery {
        let mut set = self.clone();
        set.alias = Some(alias.into());
        set
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub(crate) fn validate(&self) -> Result<(), QueryError> {
        self.base.validate()?;
        let arity = self.base.select_arity();
        for (_, query) in &self.tail {
            query.validate()?;
            if query.select_arity() != arity {
                return Err(QueryError::SetArity {
                    left: arity,
                    right: query.select_arity(),
                });
            }
        }
        Ok(())
    }

    pub fn to_sql(&self, dialect: &Dialect) -> Result<String, QueryError> {
        self.validate()?;

        let mut builder = SqlBuilder::new(dialect);
        ExpressionBuilder::build(self, dialect, &mut builder);
        let sql = builder.into_sql();
        tracing::debug!(%sql, "rendered set query");
        Ok(sql)
    }
}

impl ExpressionBuilder for SetQuery {
    fn build(&self, dialect: &Dialect, builder: &mut SqlBuilder) {
        self.base.build(dialect, builder);
        for (operation, query) in &self.tail {
            builder.push_space();
            builder.push_str(operation.token());
            builder.push_space();
            query.build(dialect, builder);
        }

        builder.with_select_aliases(self.base.select_aliases(), |builder| {
            if !self.orderbys.is_empty() {
                builder.push_str(" ORDER BY ");
                build_ordered(&self.orderbys, dialect, builder);
            }
            if let Some(limit) = self.limit {
                builder.push_str(" LIMIT ");
                builder.push_str(limit.to_string());
            }
            if let Some(offset) = self.offset {
                builder.push_str(" OFFSET ");
                builder.push_str(offset.to_string());
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::super::query::Query;
    use super::super::table::Table;
    use super::*;

    #[test]
    fn union_of_two_selects() {
        let t0 = Table::new("abc");
        let t1 = Table::new("efg");
        let q = Query::from_(t0.clone()).select([t0.field("foo")])
            + Query::from_(t1.clone()).select([t1.field("bar")]);
        assert_query!(q, r#"SELECT "foo" FROM "abc" UNION SELECT "bar" FROM "efg""#);
    }

    #[test]
    fn union_all_via_operator() {
        let t = Table::new("abc");
        let q = Query::from_(t.clone()).select([t.field("foo")])
            * Query::from_(t.clone()).select([t.field("foo")]);
        assert_query!(
            q,
            r#"SELECT "foo" FROM "abc" UNION ALL SELECT "foo" FROM "abc""#
        );
    }

    #[test]
    fn chained_set_operations() {
        let t = Table::new("abc");
        let side = || Query::from_(t.clone()).select([t.field("foo")]);
        let q = side().union(side()).intersect(side()).minus(side());
        assert_query!(
            q,
            r#"SELECT "foo" FROM "abc" UNION SELECT "foo" FROM "abc" INTERSECT SELECT "foo" FROM "abc" MINUS SELECT "foo" FROM "abc""#
        );
    }

    #[test]
    fn mismatched_arity_is_an_error() {
        let t0 = Table::new("abc");
        let t1 = Table::new("efg");
        let q = Query::from_(t0.clone()).select([t0.field("foo")]).union(
            Query::from_(t1.clone()).select([t1.field("bar"), t1.field("baz")]),
        );
        assert_eq!(
            q.to_sql(&Dialect::generic()),
            Err(QueryError::SetArity { left: 1, right: 2 })
        );
    }

    #[test]
    fn orderby_uses_select_aliases() {
        let t0 = Table::new("abc");
        let t1 = Table::new("efg");
        let name = t0.field("foo").as_("name");
        let q = Query::from_(t0.clone())
            .select([name.clone()])
            .union(Query::from_(t1.clone()).select([t1.field("bar")]))
            .orderby(name, Some(Order::Asc))
            .limit(10);
        assert_query!(
            q,
            r#"SELECT "foo" "name" FROM "abc" UNION SELECT "bar" FROM "efg" ORDER BY "name" ASC LIMIT 10"#
        );
    }

    #[test]
    fn set_query_as_a_from_source() {
        let t0 = Table::new("abc");
        let set = Query::from_(t0.clone())
            .select([t0.field("foo")])
            .union(Query::from_(t0.clone()).select([t0.field("foo")]))
            .as_("u");
        let q = Query::from_(set).select([Table::new("u").field("foo")]);
        assert_query!(
            q,
            r#"SELECT "u"."foo" FROM (SELECT "foo" FROM "abc" UNION SELECT "foo" FROM "abc") "u""#
        );
    }
}
