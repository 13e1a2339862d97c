use rusqlite::params;

use crate::db::stats::round2;
use crate::db::store::SurveyStore;
use crate::error::StoreResult;

impl SurveyStore {
    /// Per-answer counts for a question, most common answer first.
    pub fn answers_grouped_by_count(&self, question_id: i64) -> StoreResult<Vec<(String, i64)>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT AnswerText, count(UserID) FROM Answer \
              WHERE QuestionID = ?1 \
              GROUP BY AnswerText \
              ORDER BY count(UserID) DESC, AnswerText",
        )?;
        let counts = stmt
            .query_map(params![question_id], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(counts)
    }

    /// Answers given strictly fewer than `threshold` times.
    pub fn answers_below_threshold(
        &self,
        question_id: i64,
        threshold: i64,
    ) -> StoreResult<Vec<(String, i64)>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT AnswerText, count(UserID) AS total FROM Answer \
              WHERE QuestionID = ?1 \
              GROUP BY AnswerText HAVING total < ?2 \
              ORDER BY total DESC, AnswerText",
        )?;
        let counts = stmt
            .query_map(params![question_id, threshold], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(counts)
    }

    /// Answers given strictly more than `threshold` times.
    pub fn answers_above_threshold(
        &self,
        question_id: i64,
        threshold: i64,
    ) -> StoreResult<Vec<(String, i64)>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT AnswerText, count(UserID) AS total FROM Answer \
              WHERE QuestionID = ?1 \
              GROUP BY AnswerText HAVING total > ?2 \
              ORDER BY total DESC, AnswerText",
        )?;
        let counts = stmt
            .query_map(params![question_id, threshold], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(counts)
    }

    /// (answer, year, count) rows for a question. Rows arrive ordered by
    /// year, then descending count, so each year's rows are contiguous; the
    /// by-year normalizer relies on that.
    pub fn answer_counts_by_year(
        &self,
        question_id: i64,
    ) -> StoreResult<Vec<(String, i64, i64)>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT AnswerText, SurveyID, count(UserID) FROM Answer \
              WHERE QuestionID = ?1 \
              GROUP BY SurveyID, AnswerText \
              ORDER BY SurveyID, count(UserID) DESC, AnswerText",
        )?;
        let counts = stmt
            .query_map(params![question_id], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(counts)
    }

    /// Percentage of respondents per answer for a question, two decimals.
    pub fn answer_distribution(&self, question_id: i64) -> StoreResult<Vec<(String, f64)>> {
        let counts = self.answers_grouped_by_count(question_id)?;
        Ok(normalize(counts))
    }

    /// Percentage of respondents per answer, normalized within each survey
    /// year so that every year's slice sums to roughly 100 on its own.
    pub fn answer_distribution_by_year(
        &self,
        question_id: i64,
    ) -> StoreResult<Vec<(String, i64, f64)>> {
        let counts = self.answer_counts_by_year(question_id)?;
        Ok(normalize_by_year(counts))
    }
}

/// Turn (answer, count) rows into (answer, percentage of the whole).
fn normalize(counts: Vec<(String, i64)>) -> Vec<(String, f64)> {
    let total: i64 = counts.iter().map(|(_, count)| count).sum();
    counts
        .into_iter()
        .map(|(answer, count)| (answer, round2(100.0 * count as f64 / total as f64)))
        .collect()
}

/// Normalize (answer, year, count) rows one year at a time. Each run of rows
/// sharing a year is summed and converted independently, so the input must be
/// contiguous per year, as produced by `answer_counts_by_year`.
fn normalize_by_year(counts: Vec<(String, i64, i64)>) -> Vec<(String, i64, f64)> {
    let mut table = Vec::with_capacity(counts.len());
    for run in counts.chunk_by(|left, right| left.1 == right.1) {
        let total: i64 = run.iter().map(|(_, _, count)| count).sum();
        for (answer, year, count) in run {
            table.push((
                answer.clone(),
                *year,
                round2(100.0 * *count as f64 / total as f64),
            ));
        }
    }
    table
}
