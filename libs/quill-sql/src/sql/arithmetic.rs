// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use super::{
    Dialect, ExpressionBuilder, SqlBuilder,
    operator::ArithOp,
    term::{Term, TermKind, resolve_is_aggregate},
};

/// A binary arithmetic combination of two terms.
///
/// The tree already encodes grouping from construction order, so flattening to
/// text only needs to defeat SQL's own precedence in one place: an operand that
/// is itself an additive (`+`/`-`) expression must be parenthesized when this
/// expression is multiplicative (`*`/`/`). A fixed two-level table, not a
/// parser: `(a+1)*(b-5)` gets both sides parenthesized, `a+1*b-5` gets none.
#[derive(Debug, Clone, PartialEq)]
pub struct ArithmeticExpression {
    pub op: ArithOp,
    pub left: Box<Term>,
    pub right: Box<Term>,
}

impl ArithmeticExpression {
    pub(crate) fn is_aggregate(&self) -> Option<bool> {
        resolve_is_aggregate([self.left.is_aggregate(), self.right.is_aggregate()])
    }

    fn needs_parens(&self, operand: &Term) -> bool {
        self.op.is_multiplicative()
            && matches!(&operand.kind, TermKind::Arithmetic(child) if child.op.is_additive())
    }

    fn build_operand(&self, operand: &Term, dialect: &Dialect, builder: &mut SqlBuilder) {
        if self.needs_parens(operand) {
            builder.push('(');
            operand.build(dialect, builder);
            builder.push(')');
        } else {
            operand.build(dialect, builder);
        }
    }
}

impl ExpressionBuilder for ArithmeticExpression {
    fn build(&self, dialect: &Dialect, builder: &mut SqlBuilder) {
        self.build_operand(&self.left, dialect, builder);
        builder.push_str(self.op.token());
        self.build_operand(&self.right, dialect, builder);
    }
}

#[cfg(test)]
mod tests {
    use super::super::table::Table;
    use super::*;

    fn t() -> Table {
        Table::new("abc")
    }

    #[test]
    fn additive_chains_stay_flat() {
        let expr = t().field("a") + Term::from(1) * t().field("b") - 5;
        assert_sql!(expr, r#""a"+1*"b"-5"#);
    }

    #[test]
    fn additive_operand_of_multiplicative_is_parenthesized() {
        let expr = (t().field("a") + 1) * (t().field("b") - 5);
        assert_sql!(expr, r#"("a"+1)*("b"-5)"#);
    }

    #[test]
    fn same_class_nesting_flattens() {
        let expr = t().field("a") + 1 - (t().field("b") - 5);
        assert_sql!(expr, r#""a"+1-"b"-5"#);

        let expr = t().field("a") / (t().field("b") / 2);
        assert_sql!(expr, r#""a"/"b"/2"#);
    }

    #[test]
    fn multiplicative_operand_of_additive_needs_no_parens() {
        let expr = t().field("a") + t().field("b") * 2;
        assert_sql!(expr, r#""a"+"b"*2"#);
    }
}
