use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::error::{StoreError, StoreResult};

lazy_static! {
    // The two survey tables and their columns. Generic accessors resolve
    // caller-supplied identifiers against this map and only ever substitute
    // the canonical literals into SQL text.
    static ref KNOWN_TABLES: HashMap<&'static str, &'static [&'static str]> = {
        let mut tables: HashMap<&'static str, &'static [&'static str]> = HashMap::new();
        tables.insert("Answer", &["UserID", "QuestionID", "SurveyID", "AnswerText"][..]);
        tables.insert("Question", &["QuestionID", "QuestionText"][..]);
        tables
    };
}

/// Resolve a table name to its canonical literal, case-insensitively.
pub fn table_literal(name: &str) -> StoreResult<&'static str> {
    KNOWN_TABLES
        .keys()
        .copied()
        .find(|known| known.eq_ignore_ascii_case(name))
        .ok_or_else(|| StoreError::UnknownTable(name.to_string()))
}

/// Resolve a column name within a table to its canonical literal.
/// `table` must be a literal previously returned by [`table_literal`].
pub fn column_literal(table: &'static str, column: &str) -> StoreResult<&'static str> {
    KNOWN_TABLES[table]
        .iter()
        .copied()
        .find(|known| known.eq_ignore_ascii_case(column))
        .ok_or_else(|| StoreError::UnknownColumn {
            table,
            column: column.to_string(),
        })
}
