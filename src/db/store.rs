use std::collections::HashSet;
use std::path::{Path, PathBuf};

use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, ToSql};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::db::{connection, schema, stats};
use crate::error::{StoreError, StoreResult};

/// One row of the Answer table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRow {
    pub user_id: i64,
    pub question_id: i64,
    pub survey_id: i64,
    pub answer_text: String,
}

/// Read-only facade over the survey database file.
///
/// Every accessor opens its own connection and drops it before returning, so
/// a store value holds no live resources between calls.
#[derive(Debug, Clone)]
pub struct SurveyStore {
    db_file: PathBuf,
}

impl SurveyStore {
    /// Create a store for `<data_path>/<db_name>.sqlite`.
    pub fn new(data_path: &Path, db_name: &str) -> Self {
        SurveyStore {
            db_file: data_path.join(format!("{}.sqlite", db_name)),
        }
    }

    /// Create a store pointing at the configured database file.
    pub fn from_config(config: &AppConfig) -> Self {
        SurveyStore {
            db_file: config.db_file_path(),
        }
    }

    /// Path of the underlying database file.
    pub fn db_file(&self) -> &Path {
        &self.db_file
    }

    pub(crate) fn connect(&self) -> StoreResult<Connection> {
        connection::open_survey_db(&self.db_file)
    }

    /// Probe whether the expected survey tables exist in the database file.
    pub fn has_expected_schema(&self) -> StoreResult<bool> {
        let conn = self.connect()?;
        connection::verify_schema(&conn)
    }

    /// Fetch every row of an allow-listed table.
    pub fn get_table(&self, table: &str) -> StoreResult<Vec<Vec<Value>>> {
        let table = schema::table_literal(table)?;
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!("SELECT * FROM {}", table))?;
        let column_count = stmt.column_count();
        let rows = stmt
            .query_map([], |row| {
                (0..column_count)
                    .map(|idx| row.get::<_, Value>(idx))
                    .collect::<Result<Vec<Value>, _>>()
            })?
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!("Fetched {} rows from {}", rows.len(), table);
        Ok(rows)
    }

    /// Fetch the rows of `table` whose `column` equals `value`.
    pub fn rows_matching<V: ToSql>(
        &self,
        table: &str,
        column: &str,
        value: V,
    ) -> StoreResult<Vec<Vec<Value>>> {
        let table = schema::table_literal(table)?;
        let column = schema::column_literal(table, column)?;
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!("SELECT * FROM {} WHERE {} = ?1", table, column))?;
        let column_count = stmt.column_count();
        let rows = stmt
            .query_map(params![value], |row| {
                (0..column_count)
                    .map(|idx| row.get::<_, Value>(idx))
                    .collect::<Result<Vec<Value>, _>>()
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// All answer texts recorded for a question, duplicates included.
    pub fn answers_for_question(&self, question_id: i64) -> StoreResult<Vec<String>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare("SELECT AnswerText FROM Answer WHERE QuestionID = ?1")?;
        let answers = stmt
            .query_map(params![question_id], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(answers)
    }

    /// All answer texts across a set of questions.
    pub fn answers_for_questions(&self, question_ids: &[i64]) -> StoreResult<Vec<String>> {
        if question_ids.is_empty() {
            return Ok(Vec::new());
        }
        let conn = self.connect()?;
        let sql = format!(
            "SELECT AnswerText FROM Answer WHERE QuestionID IN ({})",
            placeholders(question_ids.len())
        );
        let mut stmt = conn.prepare(&sql)?;
        let answers = stmt
            .query_map(params_from_iter(question_ids), |row| {
                row.get::<_, String>(0)
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(answers)
    }

    /// Full answer rows for a set of questions.
    pub fn answer_rows_for_questions(&self, question_ids: &[i64]) -> StoreResult<Vec<AnswerRow>> {
        if question_ids.is_empty() {
            return Ok(Vec::new());
        }
        let conn = self.connect()?;
        let sql = format!(
            "SELECT UserID, QuestionID, SurveyID, AnswerText FROM Answer WHERE QuestionID IN ({})",
            placeholders(question_ids.len())
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(question_ids), row_to_answer)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Distinct answer texts for a question, in first-occurrence order.
    pub fn unique_answers(&self, question_id: i64) -> StoreResult<Vec<String>> {
        let answers = self.answers_for_question(question_id)?;
        // Dedup by hand so the scan order survives
        let mut seen = HashSet::new();
        let mut unique = Vec::new();
        for answer in answers {
            if !seen.contains(&answer) {
                seen.insert(answer.clone());
                unique.push(answer);
            }
        }
        Ok(unique)
    }

    /// Distinct survey years in which a question was answered, in
    /// first-occurrence order.
    pub fn survey_years(&self, question_id: i64) -> StoreResult<Vec<i64>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare("SELECT SurveyID FROM Answer WHERE QuestionID = ?1")?;
        let years = stmt
            .query_map(params![question_id], |row| row.get::<_, i64>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        let mut seen = HashSet::new();
        Ok(years.into_iter().filter(|year| seen.insert(*year)).collect())
    }

    /// The set of answer texts a question received in one survey year.
    pub fn answers_in_year(&self, question_id: i64, year: i64) -> StoreResult<HashSet<String>> {
        let conn = self.connect()?;
        let mut stmt =
            conn.prepare("SELECT AnswerText FROM Answer WHERE QuestionID = ?1 AND SurveyID = ?2")?;
        let answers = stmt
            .query_map(params![question_id, year], |row| row.get::<_, String>(0))?
            .collect::<Result<HashSet<_>, _>>()?;
        Ok(answers)
    }

    /// The text of a question; `NotFound` if the id is unknown.
    pub fn question_text(&self, question_id: i64) -> StoreResult<String> {
        let conn = self.connect()?;
        let text = conn
            .query_row(
                "SELECT QuestionText FROM Question WHERE QuestionID = ?1",
                params![question_id],
                |row| row.get(0),
            )
            .optional()?;
        text.ok_or(StoreError::NotFound { question_id })
    }

    /// Number of answer rows recorded for a question.
    pub fn count_for_question(&self, question_id: i64) -> StoreResult<i64> {
        let conn = self.connect()?;
        let count = conn.query_row(
            "SELECT count(UserID) FROM Answer WHERE QuestionID = ?1",
            params![question_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Number of respondents who gave `answer` to a question.
    pub fn count_for_answer(&self, question_id: i64, answer: &str) -> StoreResult<i64> {
        let conn = self.connect()?;
        let count = conn.query_row(
            "SELECT count(UserID) FROM Answer WHERE QuestionID = ?1 AND AnswerText = ?2",
            params![question_id, answer],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Number of answer rows recorded for a question in one survey year.
    pub fn count_for_question_in_year(&self, question_id: i64, year: i64) -> StoreResult<i64> {
        let conn = self.connect()?;
        let count = conn.query_row(
            "SELECT count(UserID) FROM Answer WHERE QuestionID = ?1 AND SurveyID = ?2",
            params![question_id, year],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Number of respondents who gave `answer` to a question in one survey year.
    pub fn count_for_answer_in_year(
        &self,
        question_id: i64,
        answer: &str,
        year: i64,
    ) -> StoreResult<i64> {
        let conn = self.connect()?;
        let count = conn.query_row(
            "SELECT count(UserID) FROM Answer \
             WHERE QuestionID = ?1 AND AnswerText = ?2 AND SurveyID = ?3",
            params![question_id, answer, year],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Answer texts of a quantitative question parsed as integers.
    pub fn quantitative_answers(&self, question_id: i64) -> StoreResult<Vec<i64>> {
        let answers = self.answers_for_question(question_id)?;
        answers
            .into_iter()
            .map(|answer| {
                stats::parse_numeric(&answer).ok_or(StoreError::NonNumericAnswer {
                    question_id,
                    answer,
                })
            })
            .collect()
    }

    /// Mean of a quantitative question's answers, two decimals.
    pub fn average(&self, question_id: i64) -> StoreResult<f64> {
        let values = self.quantitative_answers(question_id)?;
        if values.is_empty() {
            return Err(StoreError::NotFound { question_id });
        }
        let sum: i64 = values.iter().sum();
        Ok(stats::round2(sum as f64 / values.len() as f64))
    }

    /// Histogram of a quantitative question's answers as (counts, bin edges).
    pub fn histogram(&self, question_id: i64, bins: usize) -> StoreResult<(Vec<u64>, Vec<f64>)> {
        let values: Vec<f64> = self
            .quantitative_answers(question_id)?
            .into_iter()
            .map(|value| value as f64)
            .collect();
        Ok(stats::histogram(&values, bins))
    }
}

pub(crate) fn row_to_answer(row: &rusqlite::Row<'_>) -> rusqlite::Result<AnswerRow> {
    Ok(AnswerRow {
        user_id: row.get(0)?,
        question_id: row.get(1)?,
        survey_id: row.get(2)?,
        answer_text: row.get(3)?,
    })
}

/// Comma-separated `?` placeholders for an SQL `IN` list.
pub(crate) fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}
