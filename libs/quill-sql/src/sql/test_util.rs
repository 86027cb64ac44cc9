#![cfg(test)]

//! Test assertions to check generated SQL.

/// Assert that an [`ExpressionBuilder`](super::ExpressionBuilder) node renders
/// to the expected SQL under the generic dialect.
///
/// # Usage:
/// ```no_run
/// assert_sql!(node, r#""foo"=1"#);
/// ```
macro_rules! assert_sql {
    ($actual:expr, $expected_stmt:expr) => {
        assert_eq!(
            $crate::sql::ExpressionBuilder::to_sql(
                &$actual,
                &$crate::sql::Dialect::generic()
            ),
            $expected_stmt
        );
    };
}

/// Assert that a query (or set query) renders to the expected SQL under the
/// generic dialect. The render entry point is fallible, so this unwraps.
macro_rules! assert_query {
    ($actual:expr, $expected_stmt:expr) => {
        assert_eq!(
            $actual
                .to_sql(&$crate::sql::Dialect::generic())
                .expect("query should render"),
            $expected_stmt
        );
    };
}
