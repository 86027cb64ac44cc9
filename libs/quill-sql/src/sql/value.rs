// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::{Dialect, ExpressionBuilder, SqlBuilder};

/// A scalar literal rendered directly into the SQL text.
///
/// Strings are single-quote wrapped with single-quote doubling as the only
/// escape mechanism; callers must not pass untrusted text as literals without
/// separate sanitization. Dates and times render as ISO-8601 inside the string
/// quoting. Booleans render as bare lowercase `true`/`false`, null as `NULL`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(NaiveDateTime),
}

impl ExpressionBuilder for Value {
    fn build(&self, _dialect: &Dialect, builder: &mut SqlBuilder) {
        match self {
            Value::Null => builder.push_str("NULL"),
            Value::Bool(b) => builder.push_str(if *b { "true" } else { "false" }),
            Value::Int(i) => builder.push_str(i.to_string()),
            Value::Float(f) => builder.push_str(f.to_string()),
            Value::String(s) => builder.push_string_literal(s),
            Value::Date(d) => builder.push_string_literal(&d.format("%Y-%m-%d").to_string()),
            Value::Time(t) => builder.push_string_literal(&t.format("%H:%M:%S%.f").to_string()),
            Value::Timestamp(ts) => {
                builder.push_string_literal(&ts.format("%Y-%m-%dT%H:%M:%S%.f").to_string())
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::Float(f as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<NaiveTime> for Value {
    fn from(t: NaiveTime) -> Self {
        Value::Time(t)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(ts: NaiveDateTime) -> Self {
        Value::Timestamp(ts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_literals() {
        assert_sql!(Value::Null, "NULL");
        assert_sql!(Value::Bool(true), "true");
        assert_sql!(Value::Bool(false), "false");
        assert_sql!(Value::Int(42), "42");
        assert_sql!(Value::Float(1.5), "1.5");
        assert_sql!(Value::String("abc".into()), "'abc'");
    }

    #[test]
    fn string_quote_doubling() {
        assert_sql!(Value::String("it's".into()), "'it''s'");
        assert_sql!(Value::String("''".into()), "''''''");
    }

    #[test]
    fn temporal_literals() {
        let date = NaiveDate::from_ymd_opt(2023, 4, 1).unwrap();
        assert_sql!(Value::Date(date), "'2023-04-01'");

        let ts = date.and_hms_opt(12, 30, 5).unwrap();
        assert_sql!(Value::Timestamp(ts), "'2023-04-01T12:30:05'");
    }
}
