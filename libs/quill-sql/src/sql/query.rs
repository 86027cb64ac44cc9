// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! The query builder state machine.
//!
//! A builder accumulates clause state (FROM sources, joins, the SELECT list,
//! criteria trees, grouping, ordering, insert/update payloads) and renders it
//! in fixed clause order. Every chainable method takes `&self`, clones, mutates
//! the clone, and returns it, so builders derived from a shared ancestor never
//! observe each other's later calls.
//!
//! Errors raised mid-chain (conflicting statement kinds, unresolvable columns,
//! invalid join criteria) are recorded in the builder rather than returned from
//! each method; the first one surfaces from [`QueryBuilder::to_sql`]. This
//! keeps chains infallible in signature while preserving fatal, non-retryable
//! semantics.

use std::collections::HashSet;

use crate::error::QueryError;

use super::{
    Dialect, ExpressionBuilder, SqlBuilder,
    criterion::Criterion,
    operator::{JoinType, Order, SetOperation},
    set_query::SetQuery,
    table::{Field, Table},
    term::{Term, TermKind},
    value::Value,
};

/// Entry points for building queries.
pub struct Query;

impl Query {
    /// Start a SELECT (or DELETE, via [`QueryBuilder::delete`]) from a source.
    pub fn from_(source: impl Into<Source>) -> QueryBuilder {
        QueryBuilder::new().from_(source)
    }

    /// Start a SELECT with no FROM source. Only literal terms are legal here;
    /// bare column strings have nothing to resolve against.
    pub fn select(terms: impl IntoIterator<Item = impl Into<Term>>) -> QueryBuilder {
        QueryBuilder::new().select(terms)
    }

    /// Start an INSERT into the given table.
    pub fn into_(table: impl Into<Table>) -> QueryBuilder {
        QueryBuilder::new().into_(table)
    }

    /// Start an UPDATE of the given table.
    pub fn update(table: impl Into<Table>) -> QueryBuilder {
        QueryBuilder::new().update(table)
    }
}

/// Anything usable as a FROM source or JOIN target.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    Table(Table),
    Subquery {
        query: Box<QueryBuilder>,
        alias: Option<String>,
    },
    Set {
        query: Box<SetQuery>,
        alias: Option<String>,
    },
}

impl Source {
    /// The table value that fields of this source bind to: the table itself, or
    /// a synthetic table named after the subquery's alias. `None` for a
    /// subquery that has not been aliased yet.
    pub(crate) fn handle(&self) -> Option<Table> {
        match self {
            Source::Table(table) => Some(table.clone()),
            Source::Subquery {
                alias: Some(alias), ..
            }
            | Source::Set {
                alias: Some(alias), ..
            } => Some(Table::new(alias.clone())),
            _ => None,
        }
    }

    fn describe(&self) -> String {
        match self.handle() {
            Some(table) => table.qualifier().to_owned(),
            None => "subquery".to_owned(),
        }
    }
}

impl From<Table> for Source {
    fn from(table: Table) -> Self {
        Source::Table(table)
    }
}

impl From<&str> for Source {
    fn from(name: &str) -> Self {
        Source::Table(Table::new(name))
    }
}

impl From<String> for Source {
    fn from(name: String) -> Self {
        Source::Table(Table::new(name))
    }
}

impl From<QueryBuilder> for Source {
    fn from(query: QueryBuilder) -> Self {
        let alias = query.alias.clone();
        Source::Subquery {
            query: Box::new(query),
            alias,
        }
    }
}

impl From<SetQuery> for Source {
    fn from(query: SetQuery) -> Self {
        let alias = query.alias().map(str::to_owned);
        Source::Set {
            query: Box::new(query),
            alias,
        }
    }
}

impl ExpressionBuilder for Source {
    fn build(&self, dialect: &Dialect, builder: &mut SqlBuilder) {
        match self {
            Source::Table(table) => table.build(dialect, builder),
            Source::Subquery { query, alias } => {
                builder.push('(');
                query.build(dialect, builder);
                builder.push(')');
                if let Some(alias) = alias {
                    builder.push_space();
                    builder.push_identifier(alias);
                }
            }
            Source::Set { query, alias } => {
                builder.push('(');
                query.build(dialect, builder);
                builder.push(')');
                if let Some(alias) = alias {
                    builder.push_space();
                    builder.push_identifier(alias);
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QueryKind {
    Unset,
    Select,
    Insert,
    Update,
    Delete,
}

impl QueryKind {
    fn name(&self) -> &'static str {
        match self {
            QueryKind::Unset => "new",
            QueryKind::Select => "select",
            QueryKind::Insert => "insert",
            QueryKind::Update => "update",
            QueryKind::Delete => "delete",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum JoinCriterion {
    On(Criterion),
    Using(Vec<String>),
    Cross,
}

#[derive(Debug, Clone, PartialEq)]
struct Join {
    item: Source,
    how: JoinType,
    criterion: JoinCriterion,
}

/// The accumulated state of one statement.
///
/// Renders with [`QueryBuilder::to_sql`]; rendering is idempotent. A builder
/// with no actionable clause renders as the empty string rather than failing,
/// so callers can use emptiness as a cheap "anything to run?" test.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryBuilder {
    kind: QueryKind,
    from: Vec<Source>,
    joins: Vec<Join>,
    selects: Vec<Term>,
    distinct: bool,
    /// Builder-wide star mode: the SELECT list is `*` and further additions are
    /// suppressed.
    select_star: bool,
    /// Tables in per-table star mode (`"t".*` supersedes plain columns of `t`).
    star_tables: HashSet<Table>,
    wheres: Criterion,
    prewheres: Criterion,
    havings: Criterion,
    groupbys: Vec<Term>,
    /// Trailing `ROLLUP(...)` group; repeat calls merge into it.
    rollup_terms: Vec<Term>,
    /// MySQL-style `WITH ROLLUP` suffix over the plain GROUP BY terms.
    mysql_rollup: bool,
    orderbys: Vec<(Term, Option<Order>)>,
    limit: Option<u64>,
    offset: Option<u64>,
    insert_table: Option<Table>,
    insert_ignore: bool,
    columns: Vec<Field>,
    values: Vec<Vec<Term>>,
    update_table: Option<Table>,
    updates: Vec<(Field, Term)>,
    alias: Option<String>,
    /// Counter for auto-assigned `sqN` subquery aliases.
    subquery_count: u64,
    /// First error raised by any chained call; surfaced by `to_sql`.
    error: Option<QueryError>,
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self {
            kind: QueryKind::Unset,
            from: Vec::new(),
            joins: Vec::new(),
            selects: Vec::new(),
            distinct: false,
            select_star: false,
            star_tables: HashSet::new(),
            wheres: Criterion::Empty,
            prewheres: Criterion::Empty,
            havings: Criterion::Empty,
            groupbys: Vec::new(),
            rollup_terms: Vec::new(),
            mysql_rollup: false,
            orderbys: Vec::new(),
            limit: None,
            offset: None,
            insert_table: None,
            insert_ignore: false,
            columns: Vec::new(),
            values: Vec::new(),
            update_table: None,
            updates: Vec::new(),
            alias: None,
            subquery_count: 0,
            error: None,
        }
    }

    fn record(&mut self, error: QueryError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    fn conflict(&mut self, attempted: &'static str) {
        self.record(QueryError::ConflictingKind {
            attempted,
            current: self.kind.name(),
        });
    }

    /// Append a FROM source. Unaliased subquery sources get an `sqN` alias from
    /// the builder's counter.
    pub fn from_(&self, source: impl Into<Source>) -> QueryBuilder {
        let mut query = self.clone();
        match query.kind {
            QueryKind::Unset => query.kind = QueryKind::Select,
            QueryKind::Update => {
                query.conflict("FROM");
                return query;
            }
            _ => {}
        }
        let source = query.auto_alias_subquery(source.into());
        query.from.push(source);
        query
    }

    /// Add terms to the SELECT list. Bare strings resolve to columns of the
    /// first FROM source (`"*"` switches the builder to star mode); everything
    /// else is taken as-is. Star-mode scopes supersede and suppress plain
    /// column selections per table or builder-wide.
    pub fn select(&self, terms: impl IntoIterator<Item = impl Into<Term>>) -> QueryBuilder {
        let mut query = self.clone();
        match query.kind {
            QueryKind::Unset => query.kind = QueryKind::Select,
            QueryKind::Select | QueryKind::Insert => {}
            QueryKind::Update | QueryKind::Delete => {
                query.conflict("SELECT");
                return query;
            }
        }
        for term in terms {
            if let Some(term) = query.resolve_column(term.into()) {
                query.push_select(term);
            }
        }
        query
    }

    pub fn distinct(&self) -> QueryBuilder {
        let mut query = self.clone();
        query.distinct = true;
        query
    }

    /// Switch to a DELETE statement. Legal on a fresh builder or one that only
    /// has FROM sources so far.
    pub fn delete(&self) -> QueryBuilder {
        let mut query = self.clone();
        match query.kind {
            QueryKind::Unset => query.kind = QueryKind::Delete,
            QueryKind::Select if query.selects.is_empty() => query.kind = QueryKind::Delete,
            _ => query.conflict("DELETE"),
        }
        query
    }

    /// Set the INSERT target. May only be set once per builder.
    pub fn into_(&self, table: impl Into<Table>) -> QueryBuilder {
        let mut query = self.clone();
        match query.kind {
            QueryKind::Unset => {
                query.kind = QueryKind::Insert;
                query.insert_table = Some(table.into());
            }
            QueryKind::Insert => query.record(QueryError::DuplicateInto),
            _ => query.conflict("INTO"),
        }
        query
    }

    /// Set the UPDATE target.
    pub fn update(&self, table: impl Into<Table>) -> QueryBuilder {
        let mut query = self.clone();
        match query.kind {
            QueryKind::Unset => {
                query.kind = QueryKind::Update;
                query.update_table = Some(table.into());
            }
            _ => query.conflict("UPDATE"),
        }
        query
    }

    /// Render INSERT as `INSERT IGNORE`.
    pub fn ignore(&self) -> QueryBuilder {
        let mut query = self.clone();
        if query.kind != QueryKind::Insert {
            query.record(QueryError::MissingInto("IGNORE"));
        }
        query.insert_ignore = true;
        query
    }

    /// Set the column list for an INSERT.
    pub fn columns(&self, columns: impl IntoIterator<Item = impl Into<Field>>) -> QueryBuilder {
        let mut query = self.clone();
        if query.insert_table.is_none() {
            query.record(QueryError::MissingInto("COLUMNS"));
            return query;
        }
        query.columns.extend(columns.into_iter().map(Into::into));
        query
    }

    /// Append one row of literal VALUES. Repeat calls accumulate rows.
    pub fn insert(&self, row: impl IntoIterator<Item = impl Into<Term>>) -> QueryBuilder {
        let mut query = self.clone();
        if query.insert_table.is_none() {
            query.record(QueryError::MissingInto("INSERT"));
            return query;
        }
        query.values.push(row.into_iter().map(Into::into).collect());
        query
    }

    /// Accumulate an UPDATE assignment pair.
    pub fn set(&self, field: impl Into<Field>, value: impl Into<Term>) -> QueryBuilder {
        let mut query = self.clone();
        if query.kind != QueryKind::Update {
            query.record(QueryError::MissingUpdate);
            return query;
        }
        query.updates.push((field.into(), value.into()));
        query
    }

    /// AND-fold a criterion into the WHERE root.
    pub fn where_(&self, criterion: Criterion) -> QueryBuilder {
        let mut query = self.clone();
        let root = std::mem::replace(&mut query.wheres, Criterion::Empty);
        query.wheres = root.and(criterion);
        query
    }

    /// AND-fold a criterion into the PREWHERE root (ClickHouse).
    pub fn prewhere(&self, criterion: Criterion) -> QueryBuilder {
        let mut query = self.clone();
        let root = std::mem::replace(&mut query.prewheres, Criterion::Empty);
        query.prewheres = root.and(criterion);
        query
    }

    /// AND-fold a criterion into the HAVING root.
    pub fn having(&self, criterion: Criterion) -> QueryBuilder {
        let mut query = self.clone();
        let root = std::mem::replace(&mut query.havings, Criterion::Empty);
        query.havings = root.and(criterion);
        query
    }

    /// Add GROUP BY terms. Bare strings resolve against the first FROM source.
    pub fn groupby(&self, terms: impl IntoIterator<Item = impl Into<Term>>) -> QueryBuilder {
        let mut query = self.clone();
        for term in terms {
            if let Some(term) = query.resolve_column(term.into()) {
                query.groupbys.push(term);
            }
        }
        query
    }

    /// Merge terms into the trailing `ROLLUP(...)` group.
    pub fn rollup(&self, terms: impl IntoIterator<Item = impl Into<Term>>) -> QueryBuilder {
        let mut query = self.clone();
        for term in terms {
            if let Some(term) = query.resolve_column(term.into()) {
                query.rollup_terms.push(term);
            }
        }
        query
    }

    /// MySQL-style `WITH ROLLUP` over the existing GROUP BY terms; requires at
    /// least one.
    pub fn with_rollup(&self) -> QueryBuilder {
        let mut query = self.clone();
        if query.groupbys.is_empty() {
            query.record(QueryError::RollupWithoutGroup);
            return query;
        }
        query.mysql_rollup = true;
        query
    }

    /// Add an ORDER BY element; the direction is optional.
    pub fn orderby(&self, term: impl Into<Term>, order: Option<Order>) -> QueryBuilder {
        let mut query = self.clone();
        if let Some(term) = query.resolve_column(term.into()) {
            query.orderbys.push((term, order));
        }
        query
    }

    pub fn limit(&self, limit: u64) -> QueryBuilder {
        let mut query = self.clone();
        query.limit = Some(limit);
        query
    }

    pub fn offset(&self, offset: u64) -> QueryBuilder {
        let mut query = self.clone();
        query.offset = Some(offset);
        query
    }

    /// `[offset..offset+limit]` shorthand.
    pub fn slice(&self, offset: u64, limit: u64) -> QueryBuilder {
        self.offset(offset).limit(limit)
    }

    /// Alias this query for use as a subquery.
    pub fn as_(&self, alias: impl Into<String>) -> QueryBuilder {
        let mut query = self.clone();
        query.alias = Some(alias.into());
        query
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// A column of this query when used as a subquery; requires an alias so the
    /// reference has a qualifier to bind to.
    pub fn field(&self, name: impl Into<String>) -> Result<Term, QueryError> {
        match &self.alias {
            Some(alias) => Ok(Field::bound(name, Table::new(alias.clone())).into()),
            None => Err(QueryError::UnaliasedSubquery),
        }
    }

    pub fn join(&self, item: impl Into<Source>) -> Joiner {
        self.joiner(item.into(), JoinType::Inner)
    }

    pub fn left_join(&self, item: impl Into<Source>) -> Joiner {
        self.joiner(item.into(), JoinType::Left)
    }

    pub fn right_join(&self, item: impl Into<Source>) -> Joiner {
        self.joiner(item.into(), JoinType::Right)
    }

    pub fn outer_join(&self, item: impl Into<Source>) -> Joiner {
        self.joiner(item.into(), JoinType::Outer)
    }

    pub fn join_with(&self, item: impl Into<Source>, how: JoinType) -> Joiner {
        self.joiner(item.into(), how)
    }

    /// CROSS JOIN needs no criterion, so there is no intermediate step.
    pub fn cross_join(&self, item: impl Into<Source>) -> QueryBuilder {
        let mut query = self.clone();
        let item = query.prepare_join_item(item.into());
        query.joins.push(Join {
            item,
            how: JoinType::Cross,
            criterion: JoinCriterion::Cross,
        });
        query
    }

    pub fn union(&self, other: QueryBuilder) -> SetQuery {
        SetQuery::new(self.clone(), SetOperation::Union, other)
    }

    pub fn union_all(&self, other: QueryBuilder) -> SetQuery {
        SetQuery::new(self.clone(), SetOperation::UnionAll, other)
    }

    pub fn intersect(&self, other: QueryBuilder) -> SetQuery {
        SetQuery::new(self.clone(), SetOperation::Intersect, other)
    }

    pub fn minus(&self, other: QueryBuilder) -> SetQuery {
        SetQuery::new(self.clone(), SetOperation::Minus, other)
    }

    /// Render to SQL text. Returns the first error recorded while chaining, or
    /// a validation error; an empty builder renders as `Ok("")`.
    pub fn to_sql(&self, dialect: &Dialect) -> Result<String, QueryError> {
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        if !self.is_renderable() {
            return Ok(String::new());
        }
        self.validate()?;

        let mut builder = SqlBuilder::new(dialect);
        ExpressionBuilder::build(self, dialect, &mut builder);
        let sql = builder.into_sql();
        tracing::debug!(%sql, "rendered query");
        Ok(sql)
    }

    pub(crate) fn select_arity(&self) -> usize {
        self.selects.len()
    }

    pub(crate) fn select_aliases(&self) -> HashSet<String> {
        self.selects
            .iter()
            .filter_map(|term| term.alias().map(str::to_owned))
            .collect()
    }

    fn joiner(&self, item: Source, how: JoinType) -> Joiner {
        let mut query = self.clone();
        let item = query.prepare_join_item(item);
        Joiner { query, item, how }
    }

    /// Assign `sqN` to an unaliased subquery source.
    fn auto_alias_subquery(&mut self, source: Source) -> Source {
        let next_alias = |count: &mut u64| {
            let alias = format!("sq{count}");
            *count += 1;
            alias
        };
        match source {
            Source::Subquery { query, alias: None } => Source::Subquery {
                query,
                alias: Some(next_alias(&mut self.subquery_count)),
            },
            Source::Set { query, alias: None } => Source::Set {
                query,
                alias: Some(next_alias(&mut self.subquery_count)),
            },
            other => other,
        }
    }

    /// Alias an unaliased join target whose table name is already visible, with
    /// a deterministic numbered suffix per duplicate occurrence (`name2`,
    /// `name3`, ...). Criteria built via `on` must reference the aliased
    /// handle; `on_field`/`using` do so automatically.
    fn prepare_join_item(&mut self, item: Source) -> Source {
        let item = self.auto_alias_subquery(item);
        match item {
            Source::Table(table) if table.alias.is_none() => {
                let occurrences = self
                    .source_handles()
                    .iter()
                    .filter(|handle| handle.name == table.name)
                    .count();
                if occurrences > 0 {
                    let alias = format!("{}{}", table.name, occurrences + 1);
                    Source::Table(table.as_(alias))
                } else {
                    Source::Table(table)
                }
            }
            other => other,
        }
    }

    /// Resolve a bare string term into a column of the first FROM source.
    /// Returns `None` (with the error recorded) when there is nothing to
    /// resolve against.
    fn resolve_column(&mut self, term: Term) -> Option<Term> {
        let Term { kind, alias } = term;
        match kind {
            TermKind::Value(Value::String(name)) => {
                if name == "*" {
                    return Some(Term::star());
                }
                match self.from.first().and_then(Source::handle) {
                    Some(table) => Some(Term {
                        kind: TermKind::Field(Field::bound(name, table)),
                        alias,
                    }),
                    None => {
                        self.record(QueryError::UnresolvedColumn(name));
                        None
                    }
                }
            }
            kind => Some(Term { kind, alias }),
        }
    }

    fn push_select(&mut self, term: Term) {
        if self.select_star {
            return;
        }
        match &term.kind {
            TermKind::Star(None) => {
                self.selects.clear();
                self.star_tables.clear();
                self.select_star = true;
                self.selects.push(term);
            }
            TermKind::Star(Some(table)) => {
                if self.star_tables.contains(table) {
                    return;
                }
                self.star_tables.insert(table.clone());
                self.selects.retain(
                    |existing| !matches!(&existing.kind, TermKind::Field(f) if f.table.as_ref() == Some(table)),
                );
                self.selects.push(term);
            }
            TermKind::Field(field)
                if field
                    .table
                    .as_ref()
                    .is_some_and(|table| self.star_tables.contains(table)) => {}
            _ => self.selects.push(term),
        }
    }

    fn source_handles(&self) -> Vec<Table> {
        self.from
            .iter()
            .chain(self.joins.iter().map(|join| &join.item))
            .filter_map(Source::handle)
            .chain(self.insert_table.clone())
            .chain(self.update_table.clone())
            .collect()
    }

    fn is_visible(&self, table: &Table) -> bool {
        self.source_handles()
            .iter()
            .any(|handle| resolves_to(handle, table))
    }

    fn is_renderable(&self) -> bool {
        match self.kind {
            QueryKind::Unset => false,
            QueryKind::Select => !self.selects.is_empty(),
            QueryKind::Insert => {
                self.insert_table.is_some()
                    && (!self.values.is_empty() || !self.selects.is_empty())
            }
            QueryKind::Update => self.update_table.is_some() && !self.updates.is_empty(),
            QueryKind::Delete => !self.from.is_empty(),
        }
    }

    /// The render-time validation pass: term shape invariants first, then the
    /// referential invariant that every table-bound field resolves to a
    /// FROM/JOIN source or the statement's target. Subqueries validate their
    /// own references.
    pub(crate) fn validate(&self) -> Result<(), QueryError> {
        if let Some(error) = &self.error {
            return Err(error.clone());
        }

        self.selects.iter().try_for_each(Term::validate)?;
        self.groupbys.iter().try_for_each(Term::validate)?;
        self.rollup_terms.iter().try_for_each(Term::validate)?;
        self.orderbys
            .iter()
            .try_for_each(|(term, _)| term.validate())?;
        self.values
            .iter()
            .try_for_each(|row| row.iter().try_for_each(Term::validate))?;
        self.updates
            .iter()
            .try_for_each(|(_, value)| value.validate())?;
        self.wheres.validate()?;
        self.prewheres.validate()?;
        self.havings.validate()?;
        for join in &self.joins {
            if let JoinCriterion::On(criterion) = &join.criterion {
                criterion.validate()?;
            }
        }
        for source in self.from.iter().chain(self.joins.iter().map(|join| &join.item)) {
            match source {
                Source::Subquery { query, .. } => query.validate()?,
                Source::Set { query, .. } => query.validate()?,
                Source::Table(_) => {}
            }
        }

        let mut unresolved: Option<QueryError> = None;
        {
            let mut check = |field: &Field| {
                if unresolved.is_none() {
                    if let Some(table) = &field.table {
                        if !self.is_visible(table) {
                            unresolved = Some(QueryError::FieldReference {
                                field: field.name.clone(),
                                table: table.qualifier().to_owned(),
                            });
                        }
                    }
                }
            };
            for term in self
                .selects
                .iter()
                .chain(&self.groupbys)
                .chain(&self.rollup_terms)
            {
                term.for_each_field(&mut check);
            }
            for (term, _) in &self.orderbys {
                term.for_each_field(&mut check);
            }
            self.wheres.for_each_field(&mut check);
            self.prewheres.for_each_field(&mut check);
            self.havings.for_each_field(&mut check);
            for join in &self.joins {
                if let JoinCriterion::On(criterion) = &join.criterion {
                    criterion.for_each_field(&mut check);
                }
            }
            for (_, value) in &self.updates {
                value.for_each_field(&mut check);
            }
        }
        match unresolved {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn build_select(&self, dialect: &Dialect, builder: &mut SqlBuilder) {
        builder.push_str("SELECT ");
        if self.distinct {
            builder.push_str("DISTINCT ");
        }
        builder.push_iter(self.selects.iter(), ",", |builder, term| {
            term.build(dialect, builder);
            if let Some(alias) = term.alias() {
                builder.push_space();
                builder.push_identifier(alias);
            }
        });
        self.build_tail(dialect, builder);
    }

    fn build_insert(&self, dialect: &Dialect, builder: &mut SqlBuilder) {
        builder.push_str("INSERT ");
        if self.insert_ignore {
            builder.push_str("IGNORE ");
        }
        builder.push_str("INTO ");
        if let Some(table) = &self.insert_table {
            table.build(dialect, builder);
        }
        if !self.columns.is_empty() {
            builder.push_str(" (");
            builder.with_namespace(false, |builder| {
                builder.push_iter(self.columns.iter(), ",", |builder, column| {
                    column.build(dialect, builder);
                });
            });
            builder.push(')');
        }

        if !self.values.is_empty() {
            // Literal-values INSERT ends here; no further clauses apply.
            builder.push_str(" VALUES ");
            builder.push_iter(self.values.iter(), ",", |builder, row| {
                builder.push('(');
                builder.push_elems(dialect, row, ",");
                builder.push(')');
            });
        } else if !self.selects.is_empty() {
            builder.push_space();
            self.build_select(dialect, builder);
        }
    }

    fn build_update(&self, dialect: &Dialect, builder: &mut SqlBuilder) {
        builder.push_str("UPDATE ");
        if let Some(table) = &self.update_table {
            table.build(dialect, builder);
        }
        builder.push_str(" SET ");
        builder.push_iter(self.updates.iter(), ",", |builder, (field, value)| {
            field.build(dialect, builder);
            builder.push('=');
            value.build(dialect, builder);
        });
        if self.wheres != Criterion::Empty {
            builder.push_str(" WHERE ");
            self.wheres.build(dialect, builder);
        }
    }

    /// The general clause tail shared by SELECT, DELETE, and INSERT-from-SELECT,
    /// in fixed order: FROM, JOINs, PREWHERE, WHERE, GROUP BY (+ROLLUP),
    /// HAVING, ORDER BY, LIMIT, OFFSET.
    fn build_tail(&self, dialect: &Dialect, builder: &mut SqlBuilder) {
        builder.with_select_aliases(self.select_aliases(), |builder| {
            if !self.from.is_empty() {
                builder.push_str(" FROM ");
                builder.push_elems(dialect, &self.from, ",");
            }

            for join in &self.joins {
                builder.push_space();
                builder.push_str(join.how.token());
                builder.push_space();
                join.item.build(dialect, builder);
                match &join.criterion {
                    JoinCriterion::On(criterion) => {
                        builder.push_str(" ON ");
                        criterion.build(dialect, builder);
                    }
                    JoinCriterion::Using(names) => {
                        builder.push_str(" USING (");
                        builder.push_iter(names.iter(), ",", |builder, name| {
                            builder.push_identifier(name);
                        });
                        builder.push(')');
                    }
                    JoinCriterion::Cross => {}
                }
            }

            if self.prewheres != Criterion::Empty {
                builder.push_str(" PREWHERE ");
                self.prewheres.build(dialect, builder);
            }
            if self.wheres != Criterion::Empty {
                builder.push_str(" WHERE ");
                self.wheres.build(dialect, builder);
            }

            if !self.groupbys.is_empty() || !self.rollup_terms.is_empty() {
                builder.push_str(" GROUP BY ");
                let mut first = true;
                for term in &self.groupbys {
                    if !first {
                        builder.push_str(",");
                    }
                    first = false;
                    build_reference(term, dialect, builder);
                }
                if !self.rollup_terms.is_empty() {
                    if !first {
                        builder.push_str(",");
                    }
                    builder.push_str("ROLLUP(");
                    builder.push_elems(dialect, &self.rollup_terms, ",");
                    builder.push(')');
                }
                if self.mysql_rollup {
                    builder.push_str(" WITH ROLLUP");
                }
            }

            if self.havings != Criterion::Empty {
                builder.push_str(" HAVING ");
                self.havings.build(dialect, builder);
            }

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

/// True when a field bound to `table` may be served by `source`: either the
/// structural triples match, or the field was bound to a bare table whose name
/// matches the source's qualifier.
fn resolves_to(source: &Table, table: &Table) -> bool {
    source == table || source.qualifier() == table.qualifier()
}

/// Render a GROUP BY/ORDER BY element: the bare quoted alias when it matches a
/// SELECT-list alias, the full expression otherwise.
fn build_reference(term: &Term, dialect: &Dialect, builder: &mut SqlBuilder) {
    match term.alias() {
        Some(alias) if builder.has_select_alias(alias) => builder.push_identifier(alias),
        _ => term.build(dialect, builder),
    }
}

/// Render a list of ORDER BY elements with their optional directions.
pub(crate) fn build_ordered(
    elems: &[(Term, Option<Order>)],
    dialect: &Dialect,
    builder: &mut SqlBuilder,
) {
    builder.push_iter(elems.iter(), ",", |builder, (term, order)| {
        build_reference(term, dialect, builder);
        if let Some(order) = order {
            builder.push_space();
            builder.push_str(order.token());
        }
    });
}

impl ExpressionBuilder for QueryBuilder {
    fn build(&self, dialect: &Dialect, builder: &mut SqlBuilder) {
        // Qualify column references only when bare names would be ambiguous.
        let namespace = !self.joins.is_empty()
            || self.from.len() > 1
            || matches!(
                self.from.first(),
                Some(Source::Subquery { .. }) | Some(Source::Set { .. })
            );
        builder.with_namespace(namespace, |builder| match self.kind {
            QueryKind::Unset => {}
            QueryKind::Select => self.build_select(dialect, builder),
            QueryKind::Insert => self.build_insert(dialect, builder),
            QueryKind::Update => self.build_update(dialect, builder),
            QueryKind::Delete => {
                builder.push_str("DELETE");
                self.build_tail(dialect, builder);
            }
        });
    }
}

impl std::ops::Add for QueryBuilder {
    type Output = SetQuery;

    fn add(self, rhs: QueryBuilder) -> SetQuery {
        self.union(rhs)
    }
}

impl std::ops::Mul for QueryBuilder {
    type Output = SetQuery;

    fn mul(self, rhs: QueryBuilder) -> SetQuery {
        self.union_all(rhs)
    }
}

/// The intermediate step of a join: bound to the joined item and join type,
/// waiting for its criterion. Terminal methods validate and return the builder.
#[must_use = "a join contributes nothing until on/on_field/using is called"]
pub struct Joiner {
    query: QueryBuilder,
    item: Source,
    how: JoinType,
}

impl Joiner {
    /// Finish the join with an explicit criterion. The criterion must reference
    /// the joined item (by its aliased handle, for auto-aliased self-joins) and
    /// only tables already visible to the query.
    pub fn on(mut self, criterion: Criterion) -> QueryBuilder {
        if let Err(error) = self.validate_on(&criterion) {
            self.query.record(error);
        }
        self.query.joins.push(Join {
            item: self.item,
            how: self.how,
            criterion: JoinCriterion::On(criterion),
        });
        self.query
    }

    /// Finish the join with an equality AND-chain between same-named columns of
    /// the first FROM source and the joined item.
    pub fn on_field(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> QueryBuilder {
        let left = self.query.from.first().and_then(Source::handle);
        let right = self.item.handle();
        match (left, right) {
            (Some(left), Some(right)) => {
                let criterion = Criterion::all(names.into_iter().map(|name| {
                    let name = name.into();
                    left.field(name.clone()).eq(right.field(name))
                }));
                self.query.joins.push(Join {
                    item: self.item,
                    how: self.how,
                    criterion: JoinCriterion::On(criterion),
                });
            }
            _ => {
                let describe = self.item.describe();
                self.query.record(QueryError::JoinOn(describe));
            }
        }
        self.query
    }

    /// Finish the join with a `USING (...)` column list; no per-field table
    /// validation applies.
    pub fn using(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> QueryBuilder {
        self.query.joins.push(Join {
            item: self.item,
            how: self.how,
            criterion: JoinCriterion::Using(names.into_iter().map(Into::into).collect()),
        });
        self.query
    }

    fn validate_on(&self, criterion: &Criterion) -> Result<(), QueryError> {
        let handle = self.item.handle();
        let mut references_item = false;
        let mut foreign: Option<QueryError> = None;

        criterion.for_each_field(&mut |field| {
            if let Some(table) = &field.table {
                if handle.as_ref().is_some_and(|h| resolves_to(h, table)) {
                    references_item = true;
                } else if !self.query.is_visible(table) && foreign.is_none() {
                    foreign = Some(QueryError::FieldReference {
                        field: field.name.clone(),
                        table: table.qualifier().to_owned(),
                    });
                }
            }
        });

        if let Some(error) = foreign {
            return Err(error);
        }
        if !references_item {
            return Err(QueryError::JoinOn(self.item.describe()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::case::Case;
    use super::super::functions::sum;
    use super::*;
    use crate::terms;

    #[test]
    fn select_columns_by_name() {
        let q = Query::from_(Table::new("abc")).select(["foo", "bar"]);
        assert_query!(q, r#"SELECT "foo","bar" FROM "abc""#);
    }

    #[test]
    fn chaining_never_mutates_the_receiver() {
        let base = Query::from_(Table::new("abc")).select(["foo"]);
        let before = base.to_sql(&Dialect::generic()).unwrap();

        let derived = base.select(["bar"]).where_(Table::new("abc").field("foo").eq(1));
        assert_eq!(base.to_sql(&Dialect::generic()).unwrap(), before);
        assert_query!(
            derived,
            r#"SELECT "foo","bar" FROM "abc" WHERE "foo"=1"#
        );
    }

    #[test]
    fn literal_select_needs_no_table() {
        let q = Query::select([1, 2, 3]);
        assert_query!(q, "SELECT 1,2,3");
    }

    #[test]
    fn string_select_without_from_is_an_error() {
        let q = Query::select([Term::from("foo")]);
        assert_eq!(
            q.to_sql(&Dialect::generic()),
            Err(QueryError::UnresolvedColumn("foo".into()))
        );
    }

    #[test]
    fn empty_builder_renders_empty() {
        assert_query!(QueryBuilder::new(), "");
        assert_query!(Query::from_(Table::new("abc")), "");
        assert_query!(Query::into_(Table::new("abc")), "");
        assert_query!(Query::update(Table::new("abc")), "");
    }

    #[test]
    fn distinct_select() {
        let q = Query::from_(Table::new("abc")).select(["foo"]).distinct();
        assert_query!(q, r#"SELECT DISTINCT "foo" FROM "abc""#);
    }

    #[test]
    fn where_criteria_and_fold() {
        let t = Table::new("abc");
        let q = Query::from_(t.clone())
            .select(["foo"])
            .where_(t.field("a").eq(1))
            .where_(t.field("b").gt(2));
        assert_query!(q, r#"SELECT "foo" FROM "abc" WHERE "a"=1 AND "b">2"#);
    }

    #[test]
    fn star_supersedes_prior_columns() {
        let t = Table::new("abc");
        let q = Query::from_(t.clone())
            .select([t.field("foo")])
            .select([t.star()]);
        assert_query!(q, r#"SELECT * FROM "abc""#);
    }

    #[test]
    fn star_suppresses_later_columns() {
        let t = Table::new("abc");
        let q = Query::from_(t.clone())
            .select([t.star()])
            .select([t.field("foo")]);
        assert_query!(q, r#"SELECT * FROM "abc""#);
    }

    #[test]
    fn table_star_scopes_to_its_table() {
        let t0 = Table::new("abc").as_("t0");
        let t1 = Table::new("efg").as_("t1");
        let q = Query::from_(t0.clone())
            .join(t1.clone())
            .on(t0.field("id").eq(t1.field("id")))
            .select([t0.field("foo"), t1.field("bar")])
            .select([t0.star()]);
        assert_query!(
            q,
            r#"SELECT "t1"."bar","t0".* FROM "abc" "t0" JOIN "efg" "t1" ON "t0"."id"="t1"."id""#
        );
    }

    #[test]
    fn join_enables_namespacing() {
        let t0 = Table::new("abc").as_("t0");
        let t1 = Table::new("efg").as_("t1");
        let q = Query::from_(t0.clone())
            .join(t1.clone())
            .on(t0.field("foo").eq(t1.field("bar")))
            .select(["*"]);
        assert_query!(
            q,
            r#"SELECT * FROM "abc" "t0" JOIN "efg" "t1" ON "t0"."foo"="t1"."bar""#
        );
    }

    #[test]
    fn join_flavors() {
        let t0 = Table::new("abc");
        let t1 = Table::new("efg");
        let q = Query::from_(t0.clone())
            .left_join(t1.clone())
            .on(t0.field("id").eq(t1.field("id")))
            .select([t0.field("foo")]);
        assert_query!(
            q,
            r#"SELECT "abc"."foo" FROM "abc" LEFT JOIN "efg" ON "abc"."id"="efg"."id""#
        );

        let q = Query::from_(t0.clone()).cross_join(t1.clone()).select([t0.field("foo")]);
        assert_query!(q, r#"SELECT "abc"."foo" FROM "abc" CROSS JOIN "efg""#);
    }

    #[test]
    fn join_on_field_builds_the_equality_chain() {
        let t0 = Table::new("abc");
        let t1 = Table::new("efg");
        let q = Query::from_(t0.clone())
            .join(t1)
            .on_field(["id", "kind"])
            .select([t0.field("foo")]);
        assert_query!(
            q,
            r#"SELECT "abc"."foo" FROM "abc" JOIN "efg" ON "abc"."id"="efg"."id" AND "abc"."kind"="efg"."kind""#
        );
    }

    #[test]
    fn join_using() {
        let t0 = Table::new("abc");
        let q = Query::from_(t0.clone())
            .join(Table::new("efg"))
            .using(["id"])
            .select([t0.field("foo")]);
        assert_query!(
            q,
            r#"SELECT "abc"."foo" FROM "abc" JOIN "efg" USING ("id")"#
        );
    }

    #[test]
    fn join_on_must_reference_the_joined_item() {
        let t0 = Table::new("abc");
        let t1 = Table::new("efg");
        let t2 = Table::new("hij");
        let q = Query::from_(t0.clone())
            .join(t1)
            .on(t0.field("foo").eq(t2.field("bar")))
            .select([t0.field("foo")]);
        assert_eq!(
            q.to_sql(&Dialect::generic()),
            Err(QueryError::FieldReference {
                field: "bar".into(),
                table: "hij".into(),
            })
        );

        let q = Query::from_(t0.clone())
            .join(Table::new("efg"))
            .on(t0.field("foo").eq(t0.field("bar")))
            .select([t0.field("foo")]);
        assert_eq!(
            q.to_sql(&Dialect::generic()),
            Err(QueryError::JoinOn("efg".into()))
        );
    }

    #[test]
    fn selecting_an_unjoined_table_is_an_error() {
        let t0 = Table::new("abc");
        let t1 = Table::new("efg");
        let q = Query::from_(t0).select([t1.field("foo")]);
        assert_eq!(
            q.to_sql(&Dialect::generic()),
            Err(QueryError::FieldReference {
                field: "foo".into(),
                table: "efg".into(),
            })
        );
    }

    #[test]
    fn self_join_gets_a_deterministic_alias() {
        let t = Table::new("abc");
        let q = Query::from_(t.clone())
            .join(t.clone())
            .on_field(["id"])
            .select([t.field("foo")]);
        assert_query!(
            q,
            r#"SELECT "abc"."foo" FROM "abc" JOIN "abc" "abc2" ON "abc"."id"="abc2"."id""#
        );

        let q = Query::from_(t.clone())
            .join(t.clone())
            .on_field(["id"])
            .join(t.clone())
            .on_field(["id"])
            .select([t.field("foo")]);
        assert_query!(
            q,
            r#"SELECT "abc"."foo" FROM "abc" JOIN "abc" "abc2" ON "abc"."id"="abc2"."id" JOIN "abc" "abc3" ON "abc"."id"="abc3"."id""#
        );
    }

    #[test]
    fn subquery_source_is_auto_aliased() {
        let t = Table::new("abc");
        let sub = Query::from_(t.clone()).select([t.field("foo")]);
        let q = Query::from_(sub).select([Table::new("sq0").field("foo")]);
        assert_query!(
            q,
            r#"SELECT "sq0"."foo" FROM (SELECT "foo" FROM "abc") "sq0""#
        );
    }

    #[test]
    fn subquery_join_target_is_auto_aliased() {
        let t = Table::new("abc");
        let src = Table::new("efg");
        let sub = Query::from_(src.clone()).select([src.field("id")]);
        let q = Query::from_(t.clone())
            .join(sub)
            .on(t.field("id").eq(Table::new("sq0").field("id")))
            .select([t.field("foo")]);
        assert_query!(
            q,
            r#"SELECT "abc"."foo" FROM "abc" JOIN (SELECT "id" FROM "efg") "sq0" ON "abc"."id"="sq0"."id""#
        );
    }

    #[test]
    fn aliased_subquery_fields() {
        let t = Table::new("abc");
        let sub = Query::from_(t.clone()).select([t.field("foo")]).as_("inner");
        let foo = sub.field("foo").unwrap();
        let q = Query::from_(sub).select([foo]);
        assert_query!(
            q,
            r#"SELECT "inner"."foo" FROM (SELECT "foo" FROM "abc") "inner""#
        );
    }

    #[test]
    fn unaliased_subquery_fields_are_rejected() {
        let sub = Query::from_(Table::new("abc")).select(["foo"]);
        assert_eq!(sub.field("foo"), Err(QueryError::UnaliasedSubquery));
    }

    #[test]
    fn subquery_as_a_select_term() {
        let t = Table::new("abc");
        let sub = Query::from_(t.clone()).select([sum(t.field("qty"))]);
        let q = Query::from_(Table::new("efg")).select([Term::from(sub).as_("total")]);
        assert_query!(
            q,
            r#"SELECT (SELECT SUM("qty") FROM "abc") "total" FROM "efg""#
        );
    }

    #[test]
    fn case_expression_in_the_select_list() {
        let t = Table::new("abc");
        let case = Case::new()
            .when(t.field("foo").gt(0), "pos")
            .else_("neg");
        let q = Query::from_(t.clone()).select([Term::from(case).as_("sign")]);
        assert_query!(
            q,
            r#"SELECT CASE WHEN "foo">0 THEN 'pos' ELSE 'neg' END "sign" FROM "abc""#
        );
    }

    #[test]
    fn groupby_and_having() {
        let t = Table::new("abc");
        let q = Query::from_(t.clone())
            .select([t.field("foo"), sum(t.field("bar")).into()])
            .groupby([t.field("foo")])
            .having(Term::from(sum(t.field("bar"))).gt(10));
        assert_query!(
            q,
            r#"SELECT "foo",SUM("bar") FROM "abc" GROUP BY "foo" HAVING SUM("bar")>10"#
        );
    }

    #[test]
    fn groupby_renders_matching_select_alias() {
        let t = Table::new("abc");
        let bucket = t.field("foo").as_("bucket");
        let q = Query::from_(t.clone())
            .select([bucket.clone(), sum(t.field("bar")).into()])
            .groupby([bucket.clone()])
            .orderby(bucket, Some(Order::Desc));
        assert_query!(
            q,
            r#"SELECT "foo" "bucket",SUM("bar") FROM "abc" GROUP BY "bucket" ORDER BY "bucket" DESC"#
        );
    }

    #[test]
    fn orderby_without_matching_alias_re_renders() {
        let t = Table::new("abc");
        let q = Query::from_(t.clone())
            .select([t.field("foo")])
            .orderby(t.field("bar").as_("b"), None);
        assert_query!(q, r#"SELECT "foo" FROM "abc" ORDER BY "bar""#);
    }

    #[test]
    fn mysql_rollup_needs_group_terms() {
        let t = Table::new("abc");
        let q = Query::from_(t.clone())
            .select([t.field("foo")])
            .groupby([t.field("foo")])
            .with_rollup();
        assert_query!(
            q,
            r#"SELECT "foo" FROM "abc" GROUP BY "foo" WITH ROLLUP"#
        );

        let q = Query::from_(t.clone()).select([t.field("foo")]).with_rollup();
        assert_eq!(
            q.to_sql(&Dialect::generic()),
            Err(QueryError::RollupWithoutGroup)
        );
    }

    #[test]
    fn generic_rollup_merges_repeat_calls() {
        let t = Table::new("abc");
        let q = Query::from_(t.clone())
            .select([t.field("a")])
            .groupby([t.field("a")])
            .rollup([t.field("b")])
            .rollup([t.field("c")]);
        assert_query!(
            q,
            r#"SELECT "a" FROM "abc" GROUP BY "a",ROLLUP("b","c")"#
        );
    }

    #[test]
    fn prewhere_precedes_where() {
        let t = Table::new("abc");
        let q = Query::from_(t.clone())
            .select([t.field("foo")])
            .prewhere(t.field("shard").eq(3))
            .where_(t.field("foo").gt(0));
        assert_query!(
            q,
            r#"SELECT "foo" FROM "abc" PREWHERE "shard"=3 WHERE "foo">0"#
        );
    }

    #[test]
    fn limit_offset_and_slice() {
        let t = Table::new("abc");
        let q = Query::from_(t.clone()).select([t.field("foo")]).limit(10).offset(5);
        assert_query!(q, r#"SELECT "foo" FROM "abc" LIMIT 10 OFFSET 5"#);

        let q = Query::from_(t.clone()).select([t.field("foo")]).slice(5, 10);
        assert_query!(q, r#"SELECT "foo" FROM "abc" LIMIT 10 OFFSET 5"#);
    }

    #[test]
    fn insert_values() {
        let q = Query::into_(Table::new("abc")).insert(terms![1, "a", true]);
        assert_query!(q, r#"INSERT INTO "abc" VALUES (1,'a',true)"#);
    }

    #[test]
    fn insert_rows_accumulate() {
        let q = Query::into_(Table::new("abc"))
            .columns(["foo", "bar"])
            .insert(terms![1, "a"])
            .insert(terms![2, "b"]);
        assert_query!(
            q,
            r#"INSERT INTO "abc" ("foo","bar") VALUES (1,'a'),(2,'b')"#
        );
    }

    #[test]
    fn insert_ignore() {
        let q = Query::into_(Table::new("abc")).ignore().insert(terms![1]);
        assert_query!(q, r#"INSERT IGNORE INTO "abc" VALUES (1)"#);
    }

    #[test]
    fn insert_from_select() {
        let src = Table::new("efg");
        let q = Query::into_(Table::new("abc"))
            .from_(src.clone())
            .select([src.field("foo"), src.field("bar")]);
        assert_query!(
            q,
            r#"INSERT INTO "abc" SELECT "foo","bar" FROM "efg""#
        );
    }

    #[test]
    fn insert_requires_into() {
        let q = QueryBuilder::new().insert(terms![1]);
        assert_eq!(
            q.to_sql(&Dialect::generic()),
            Err(QueryError::MissingInto("INSERT"))
        );
    }

    #[test]
    fn update_set_where() {
        let t = Table::new("abc");
        let q = Query::update(t.clone())
            .set("foo", "bar")
            .set("n", 42)
            .where_(t.field("id").eq(1));
        assert_query!(
            q,
            r#"UPDATE "abc" SET "foo"='bar',"n"=42 WHERE "id"=1"#
        );
    }

    #[test]
    fn set_requires_update() {
        let q = Query::from_(Table::new("abc")).set("foo", 1);
        assert_eq!(q.to_sql(&Dialect::generic()), Err(QueryError::MissingUpdate));
    }

    #[test]
    fn delete_with_criteria() {
        let t = Table::new("abc");
        let q = Query::from_(t.clone()).delete().where_(t.field("id").eq(1));
        assert_query!(q, r#"DELETE FROM "abc" WHERE "id"=1"#);
    }

    #[test]
    fn conflicting_statement_kinds() {
        let q = Query::from_(Table::new("abc")).select(["foo"]).delete();
        assert_eq!(
            q.to_sql(&Dialect::generic()),
            Err(QueryError::ConflictingKind {
                attempted: "DELETE",
                current: "select",
            })
        );

        let q = Query::update(Table::new("abc")).select(["foo"]);
        assert_eq!(
            q.to_sql(&Dialect::generic()),
            Err(QueryError::ConflictingKind {
                attempted: "SELECT",
                current: "update",
            })
        );

        let q = Query::into_(Table::new("abc")).into_(Table::new("efg"));
        assert_eq!(q.to_sql(&Dialect::generic()), Err(QueryError::DuplicateInto));
    }

    #[test]
    fn multiple_from_sources_namespace_fields() {
        let t0 = Table::new("abc");
        let t1 = Table::new("efg");
        let q = Query::from_(t0.clone())
            .from_(t1.clone())
            .select([t0.field("foo"), t1.field("bar")]);
        assert_query!(
            q,
            r#"SELECT "abc"."foo","efg"."bar" FROM "abc","efg""#
        );
    }
}
