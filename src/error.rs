use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the survey store. All of them propagate straight to the
/// caller; nothing is retried or swallowed. Empty result sets are not errors,
/// only scalar lookups that matched zero rows report `NotFound`.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database file could not be opened (missing, unreadable or locked).
    #[error("cannot open survey database {}: {source}", path.display())]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// A statement failed to prepare or execute.
    #[error("query failed: {0}")]
    Query(#[from] rusqlite::Error),

    /// A table name was rejected by the schema allow-list.
    #[error("table {0:?} is not part of the survey schema")]
    UnknownTable(String),

    /// A column name was rejected by the schema allow-list.
    #[error("table {table} has no column {column:?}")]
    UnknownColumn { table: &'static str, column: String },

    /// A quantitative operation hit an answer that does not parse as an integer.
    #[error("answer {answer:?} for question {question_id} is not numeric")]
    NonNumericAnswer { question_id: i64, answer: String },

    /// A scalar lookup matched zero rows.
    #[error("question {question_id} not found")]
    NotFound { question_id: i64 },
}

pub type StoreResult<T> = Result<T, StoreError>;
