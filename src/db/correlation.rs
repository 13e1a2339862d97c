use std::collections::HashSet;

use rusqlite::types::Value;
use rusqlite::{params, params_from_iter};

use crate::db::store::{placeholders, row_to_answer, AnswerRow, SurveyStore};
use crate::error::StoreResult;

impl SurveyStore {
    /// Triples (answer to `question_b`, answer to `question_a`, user id) for
    /// every respondent who answered both questions differently. Respondents
    /// present in only one of the two answer sets are excluded.
    ///
    /// Two ordered scans plus an in-memory join on user id, instead of a
    /// correlated subquery per row; [`SurveyStore::diff_answers_subquery`] is
    /// the naive rendition kept for equivalence checks.
    pub fn diff_answers(
        &self,
        question_a: i64,
        question_b: i64,
    ) -> StoreResult<Vec<(String, String, i64)>> {
        let a_rows = self.answers_ordered_by_user(question_a)?;
        let b_rows = self.answers_ordered_by_user(question_b)?;
        let changed = distinct_rows_not_in(&b_rows, &a_rows);
        let triples = join_on_user(&changed, &a_rows);
        log::debug!(
            "Diff of questions {} and {}: {} changed answers across {} respondents of the first",
            question_a,
            question_b,
            triples.len(),
            a_rows.len()
        );
        Ok(triples)
    }

    /// Correlated-subquery rendition of [`SurveyStore::diff_answers`]. Runs
    /// one subquery per scanned row, so only suitable for small datasets.
    pub fn diff_answers_subquery(
        &self,
        question_a: i64,
        question_b: i64,
    ) -> StoreResult<Vec<(String, String, i64)>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT b.AnswerText, \
                    (SELECT a.AnswerText FROM Answer a \
                      WHERE a.UserID = b.UserID AND a.QuestionID = ?1), \
                    b.UserID \
               FROM Answer b \
              WHERE b.QuestionID = ?2 \
                AND b.AnswerText != (SELECT a.AnswerText FROM Answer a \
                                      WHERE a.UserID = b.UserID AND a.QuestionID = ?1) \
              ORDER BY b.UserID",
        )?;
        let triples = stmt
            .query_map(params![question_a, question_b], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(triples)
    }

    /// (answer, user id) pairs for a question, ordered by user id.
    pub fn answers_ordered_by_user(&self, question_id: i64) -> StoreResult<Vec<(String, i64)>> {
        let conn = self.connect()?;
        let mut stmt = conn
            .prepare("SELECT AnswerText, UserID FROM Answer WHERE QuestionID = ?1 ORDER BY UserID")?;
        let rows = stmt
            .query_map(params![question_id], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Number of respondents of `question_a` who also answered `question_b`.
    pub fn count_answering_both(&self, question_a: i64, question_b: i64) -> StoreResult<i64> {
        let conn = self.connect()?;
        let count = conn.query_row(
            "SELECT count(a.UserID) FROM Answer a \
              WHERE a.QuestionID = ?1 \
                AND EXISTS (SELECT 1 FROM Answer b \
                             WHERE b.UserID = a.UserID AND b.QuestionID = ?2)",
            params![question_a, question_b],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Every answer row of every respondent who gave `answer` to `question_id`,
    /// ordered by user id.
    pub fn rows_for_respondents_with_answer(
        &self,
        question_id: i64,
        answer: &str,
    ) -> StoreResult<Vec<AnswerRow>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT UserID, QuestionID, SurveyID, AnswerText FROM Answer \
              WHERE UserID IN (SELECT UserID FROM Answer \
                                WHERE QuestionID = ?1 AND AnswerText = ?2) \
              ORDER BY UserID",
        )?;
        let rows = stmt
            .query_map(params![question_id, answer], row_to_answer)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Like [`SurveyStore::rows_for_respondents_with_answer`], restricted to
    /// the questions in `question_ids`.
    pub fn rows_for_questions_with_answer(
        &self,
        question_ids: &[i64],
        question_id: i64,
        answer: &str,
    ) -> StoreResult<Vec<AnswerRow>> {
        if question_ids.is_empty() {
            return Ok(Vec::new());
        }
        let conn = self.connect()?;
        let sql = format!(
            "SELECT UserID, QuestionID, SurveyID, AnswerText FROM Answer \
              WHERE QuestionID IN ({}) \
                AND UserID IN (SELECT UserID FROM Answer \
                                WHERE QuestionID = ? AND AnswerText = ?) \
              ORDER BY UserID",
            placeholders(question_ids.len())
        );
        let mut stmt = conn.prepare(&sql)?;
        let values = question_ids
            .iter()
            .map(|id| Value::from(*id))
            .chain([Value::from(question_id), Value::from(answer.to_string())]);
        let rows = stmt
            .query_map(params_from_iter(values), row_to_answer)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Per-answer counts for `target_question` over the respondents who gave
    /// `answer` to `filter_question`.
    pub fn answer_counts_filtered_by_answer(
        &self,
        target_question: i64,
        filter_question: i64,
        answer: &str,
    ) -> StoreResult<Vec<(String, i64)>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT DISTINCT AnswerText, count(UserID) OVER (PARTITION BY AnswerText) \
               FROM Answer \
              WHERE QuestionID = ?1 \
                AND UserID IN (SELECT UserID FROM Answer \
                                WHERE QuestionID = ?2 AND AnswerText = ?3) \
              ORDER BY 2 DESC, AnswerText",
        )?;
        let counts = stmt
            .query_map(params![target_question, filter_question, answer], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(counts)
    }
}

/// Distinct rows of `rows` with no identical counterpart in `reference`, in
/// first-occurrence order. Rows match only when both answer and user agree.
fn distinct_rows_not_in(
    rows: &[(String, i64)],
    reference: &[(String, i64)],
) -> Vec<(String, i64)> {
    let reference: HashSet<&(String, i64)> = reference.iter().collect();
    let mut seen = HashSet::new();
    let mut distinct = Vec::new();
    for row in rows {
        if !reference.contains(row) && seen.insert(row) {
            distinct.push(row.clone());
        }
    }
    distinct
}

/// Join each (answer, user) row against every row of `others` with the same
/// user id, producing (answer, other answer, user) triples in `rows` order.
fn join_on_user(
    rows: &[(String, i64)],
    others: &[(String, i64)],
) -> Vec<(String, String, i64)> {
    let mut combined = Vec::new();
    for (answer, user_id) in rows {
        for (other_answer, other_user) in others {
            if other_user == user_id {
                combined.push((answer.clone(), other_answer.clone(), *user_id));
            }
        }
    }
    combined
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, i64)]) -> Vec<(String, i64)> {
        raw.iter().map(|(text, id)| (text.to_string(), *id)).collect()
    }

    #[test]
    fn test_distinct_rows_not_in_requires_both_fields_to_match() {
        let b_rows = pairs(&[("Yes", 1), ("No", 2), ("Yes", 3)]);
        let a_rows = pairs(&[("Yes", 1), ("Yes", 2)]);
        // ("Yes", 3) survives even though some other user answered "Yes"
        assert_eq!(
            distinct_rows_not_in(&b_rows, &a_rows),
            pairs(&[("No", 2), ("Yes", 3)])
        );
    }

    #[test]
    fn test_distinct_rows_not_in_collapses_duplicates_in_order() {
        let b_rows = pairs(&[("No", 2), ("Maybe", 1), ("No", 2)]);
        let a_rows = pairs(&[("Yes", 2)]);
        assert_eq!(
            distinct_rows_not_in(&b_rows, &a_rows),
            pairs(&[("No", 2), ("Maybe", 1)])
        );
    }

    #[test]
    fn test_join_on_user_drops_users_without_counterpart() {
        let changed = pairs(&[("No", 2), ("Yes", 4)]);
        let a_rows = pairs(&[("Yes", 1), ("Yes", 2), ("No", 3)]);
        // User 4 never answered the first question, so only user 2 joins
        assert_eq!(
            join_on_user(&changed, &a_rows),
            vec![("No".to_string(), "Yes".to_string(), 2)]
        );
    }

    #[test]
    fn test_join_on_user_emits_one_triple_per_matching_row() {
        let changed = pairs(&[("No", 2)]);
        let a_rows = pairs(&[("Yes", 2), ("Maybe", 2)]);
        assert_eq!(
            join_on_user(&changed, &a_rows),
            vec![
                ("No".to_string(), "Yes".to_string(), 2),
                ("No".to_string(), "Maybe".to_string(), 2),
            ]
        );
    }

    #[test]
    fn test_identical_answer_sets_produce_no_triples() {
        let rows = pairs(&[("Yes", 1), ("No", 2)]);
        let changed = distinct_rows_not_in(&rows, &rows);
        assert!(changed.is_empty());
        assert!(join_on_user(&changed, &rows).is_empty());
    }
}
