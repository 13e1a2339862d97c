use std::collections::HashSet;

use rusqlite::types::Value;
use rusqlite::Connection;
use tempfile::TempDir;

use survey_data_processor::config::AppConfig;
use survey_data_processor::{AnswerRow, StoreError, SurveyStore};

/// Build a small survey database with known contents:
/// - question 1: Yes/No split 3:1, answered in 2014 and 2016
/// - question 2: repeated texts for dedup checks, 2016 seen before 2014
/// - question 3: quantitative answers "20", "30", "25", "25"
/// - question 4: non-numeric answers
/// - questions 5 and 6: the cross-question diff scenario
fn fixture_store() -> (TempDir, SurveyStore) {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = SurveyStore::new(dir.path(), "survey_fixture");

    let conn =
        Connection::open(dir.path().join("survey_fixture.sqlite")).expect("create fixture db");
    conn.execute_batch(
        "CREATE TABLE Question (
             QuestionID INTEGER PRIMARY KEY,
             QuestionText TEXT NOT NULL
         );
         CREATE TABLE Answer (
             UserID INTEGER NOT NULL,
             QuestionID INTEGER NOT NULL,
             SurveyID INTEGER NOT NULL,
             AnswerText TEXT NOT NULL
         );
         INSERT INTO Question VALUES
             (1, 'Do you currently have a mental health disorder?'),
             (2, 'How often does your mental health affect your work?'),
             (3, 'What is your age?'),
             (4, 'Are you self-employed?'),
             (5, 'Do you have a family history of mental illness?'),
             (6, 'Have you sought treatment for a mental health disorder?');
         INSERT INTO Answer VALUES
             (1, 1, 2014, 'Yes'),
             (2, 1, 2014, 'Yes'),
             (3, 1, 2016, 'Yes'),
             (4, 1, 2016, 'No'),

             (11, 2, 2016, 'Often'),
             (12, 2, 2016, 'Rarely'),
             (13, 2, 2014, 'Often'),
             (14, 2, 2016, 'Never'),
             (15, 2, 2014, 'Rarely'),

             (21, 3, 2017, '20'),
             (22, 3, 2017, '30'),
             (23, 3, 2017, '25'),
             (24, 3, 2017, '25'),

             (31, 4, 2018, 'Yes'),
             (32, 4, 2018, 'No'),

             (41, 5, 2019, 'Yes'),
             (42, 5, 2019, 'Yes'),
             (43, 5, 2019, 'No'),

             (44, 6, 2019, 'No'),
             (41, 6, 2019, 'Yes'),
             (42, 6, 2019, 'No');",
    )
    .expect("seed fixture db");

    (dir, store)
}

#[test]
fn test_distribution_orders_most_common_answer_first() {
    let (_dir, store) = fixture_store();

    let distribution = store.answer_distribution(1).unwrap();
    assert_eq!(
        distribution,
        vec![("Yes".to_string(), 75.0), ("No".to_string(), 25.0)]
    );
}

#[test]
fn test_distribution_sums_to_one_hundred_for_every_question() {
    let (_dir, store) = fixture_store();

    for question_id in [1, 2, 3, 4] {
        let distribution = store.answer_distribution(question_id).unwrap();
        let sum: f64 = distribution.iter().map(|(_, pct)| pct).sum();
        assert!(
            (sum - 100.0).abs() <= 0.1,
            "question {} sums to {}",
            question_id,
            sum
        );
    }
}

#[test]
fn test_yearly_distribution_normalizes_each_year_independently() {
    let (_dir, store) = fixture_store();

    let distribution = store.answer_distribution_by_year(1).unwrap();
    assert_eq!(
        distribution,
        vec![
            ("Yes".to_string(), 2014, 100.0),
            ("No".to_string(), 2016, 50.0),
            ("Yes".to_string(), 2016, 50.0),
        ]
    );

    for year in [2014, 2016] {
        let sum: f64 = distribution
            .iter()
            .filter(|(_, y, _)| *y == year)
            .map(|(_, _, pct)| pct)
            .sum();
        assert!((sum - 100.0).abs() <= 0.1, "year {} sums to {}", year, sum);
    }
}

#[test]
fn test_diff_reports_only_respondents_who_changed_their_answer() {
    let (_dir, store) = fixture_store();

    // User 41 answered both questions identically, user 43 only answered
    // question 5 and user 44 only question 6; only user 42 remains.
    let triples = store.diff_answers(5, 6).unwrap();
    assert_eq!(triples, vec![("No".to_string(), "Yes".to_string(), 42)]);
}

#[test]
fn test_diff_of_a_question_with_itself_is_empty() {
    let (_dir, store) = fixture_store();

    assert!(store.diff_answers(1, 1).unwrap().is_empty());
    assert!(store.diff_answers(5, 5).unwrap().is_empty());
}

#[test]
fn test_diff_matches_the_subquery_oracle() {
    let (_dir, store) = fixture_store();

    assert_eq!(
        store.diff_answers(5, 6).unwrap(),
        store.diff_answers_subquery(5, 6).unwrap()
    );
    assert_eq!(
        store.diff_answers(6, 5).unwrap(),
        store.diff_answers_subquery(6, 5).unwrap()
    );
}

#[test]
fn test_count_answering_both_requires_an_answer_to_each() {
    let (_dir, store) = fixture_store();

    assert_eq!(store.count_answering_both(5, 6).unwrap(), 2);
    assert_eq!(store.count_answering_both(6, 5).unwrap(), 2);
    assert_eq!(store.count_answering_both(1, 5).unwrap(), 0);
}

#[test]
fn test_answers_ordered_by_user_sorts_regardless_of_insertion_order() {
    let (_dir, store) = fixture_store();

    // User 44's row was inserted first
    assert_eq!(
        store.answers_ordered_by_user(6).unwrap(),
        vec![
            ("Yes".to_string(), 41),
            ("No".to_string(), 42),
            ("No".to_string(), 44),
        ]
    );
}

#[test]
fn test_unique_answers_preserve_first_occurrence_order() {
    let (_dir, store) = fixture_store();

    assert_eq!(
        store.unique_answers(2).unwrap(),
        vec!["Often".to_string(), "Rarely".to_string(), "Never".to_string()]
    );
}

#[test]
fn test_survey_years_preserve_first_occurrence_order() {
    let (_dir, store) = fixture_store();

    assert_eq!(store.survey_years(1).unwrap(), vec![2014, 2016]);
    // Question 2 saw 2016 before 2014, so the years are not sorted
    assert_eq!(store.survey_years(2).unwrap(), vec![2016, 2014]);
}

#[test]
fn test_answers_in_year_is_an_unordered_set() {
    let (_dir, store) = fixture_store();

    let expected: HashSet<String> = ["Yes", "No"].iter().map(|s| s.to_string()).collect();
    assert_eq!(store.answers_in_year(1, 2016).unwrap(), expected);

    let only_yes: HashSet<String> = [String::from("Yes")].into_iter().collect();
    assert_eq!(store.answers_in_year(1, 2014).unwrap(), only_yes);
}

#[test]
fn test_answers_across_question_sets() {
    let (_dir, store) = fixture_store();

    assert_eq!(store.answers_for_questions(&[5, 6]).unwrap().len(), 6);
    assert!(store.answers_for_questions(&[]).unwrap().is_empty());

    let rows = store.answer_rows_for_questions(&[3]).unwrap();
    assert_eq!(rows.len(), 4);
    assert!(rows.iter().all(|row| row.question_id == 3));
    assert!(rows.contains(&AnswerRow {
        user_id: 21,
        question_id: 3,
        survey_id: 2017,
        answer_text: "20".to_string(),
    }));
}

#[test]
fn test_count_for_question_agrees_with_grouped_counts() {
    let (_dir, store) = fixture_store();

    for question_id in [1, 2, 3, 4, 5, 6] {
        let total = store.count_for_question(question_id).unwrap();
        let grouped: i64 = store
            .answers_grouped_by_count(question_id)
            .unwrap()
            .iter()
            .map(|(_, count)| count)
            .sum();
        assert_eq!(total, grouped, "question {}", question_id);
    }
}

#[test]
fn test_scalar_counts() {
    let (_dir, store) = fixture_store();

    assert_eq!(store.count_for_answer(1, "Yes").unwrap(), 3);
    assert_eq!(store.count_for_answer(1, "Maybe").unwrap(), 0);
    assert_eq!(store.count_for_question_in_year(1, 2014).unwrap(), 2);
    assert_eq!(store.count_for_answer_in_year(1, "Yes", 2016).unwrap(), 1);
}

#[test]
fn test_thresholds_use_strict_comparisons() {
    let (_dir, store) = fixture_store();

    // "Yes" was given exactly 3 times, so a threshold of 3 excludes it both ways
    assert_eq!(
        store.answers_below_threshold(1, 3).unwrap(),
        vec![("No".to_string(), 1)]
    );
    assert_eq!(
        store.answers_above_threshold(1, 3).unwrap(),
        Vec::<(String, i64)>::new()
    );
    assert_eq!(
        store.answers_above_threshold(1, 1).unwrap(),
        vec![("Yes".to_string(), 3)]
    );
}

#[test]
fn test_rows_for_respondents_with_answer_span_all_their_questions() {
    let (_dir, store) = fixture_store();

    // Users 41 and 42 answered "Yes" to question 5; return everything they said
    let rows = store.rows_for_respondents_with_answer(5, "Yes").unwrap();
    let users: Vec<i64> = rows.iter().map(|row| row.user_id).collect();
    assert_eq!(users, vec![41, 41, 42, 42]);

    let restricted = store.rows_for_questions_with_answer(&[6], 5, "Yes").unwrap();
    assert_eq!(restricted.len(), 2);
    assert!(restricted.iter().all(|row| row.question_id == 6));
    assert!(store
        .rows_for_questions_with_answer(&[], 5, "Yes")
        .unwrap()
        .is_empty());
}

#[test]
fn test_answer_counts_filtered_by_answer() {
    let (_dir, store) = fixture_store();

    // Question 6 answers among the users who said "Yes" to question 5
    assert_eq!(
        store.answer_counts_filtered_by_answer(6, 5, "Yes").unwrap(),
        vec![("No".to_string(), 1), ("Yes".to_string(), 1)]
    );
}

#[test]
fn test_average_rounds_the_mean_of_parsed_answers() {
    let (_dir, store) = fixture_store();

    assert_eq!(store.average(3).unwrap(), 25.0);
    assert_eq!(store.quantitative_answers(3).unwrap(), vec![20, 30, 25, 25]);
}

#[test]
fn test_average_rejects_non_numeric_answers() {
    let (_dir, store) = fixture_store();

    match store.average(4) {
        Err(StoreError::NonNumericAnswer {
            question_id,
            answer,
        }) => {
            assert_eq!(question_id, 4);
            assert_eq!(answer, "Yes");
        }
        other => panic!("expected NonNumericAnswer, got {:?}", other),
    }
}

#[test]
fn test_scalar_lookups_on_unknown_question_are_not_found() {
    let (_dir, store) = fixture_store();

    assert!(matches!(
        store.average(99),
        Err(StoreError::NotFound { question_id: 99 })
    ));
    assert!(matches!(
        store.question_text(99),
        Err(StoreError::NotFound { question_id: 99 })
    ));
}

#[test]
fn test_question_text_lookup() {
    let (_dir, store) = fixture_store();

    assert_eq!(
        store.question_text(5).unwrap(),
        "Do you have a family history of mental illness?"
    );
}

#[test]
fn test_histogram_buckets_quantitative_answers() {
    let (_dir, store) = fixture_store();

    let (counts, edges) = store.histogram(3, 2).unwrap();
    assert_eq!(counts, vec![1, 3]);
    assert_eq!(edges, vec![20.0, 25.0, 30.0]);
}

#[test]
fn test_get_table_accepts_any_casing_of_known_tables() {
    let (_dir, store) = fixture_store();

    assert_eq!(store.get_table("answer").unwrap().len(), 21);
    assert_eq!(store.get_table("QUESTION").unwrap().len(), 6);
}

#[test]
fn test_unknown_identifiers_are_rejected_before_querying() {
    let (_dir, store) = fixture_store();

    assert!(matches!(
        store.get_table("Respondents"),
        Err(StoreError::UnknownTable(_))
    ));
    assert!(matches!(
        store.get_table("Answer; DROP TABLE Answer"),
        Err(StoreError::UnknownTable(_))
    ));
    assert!(matches!(
        store.rows_matching("Answer", "AnswerText OR 1=1", 1),
        Err(StoreError::UnknownColumn { .. })
    ));
}

#[test]
fn test_rows_matching_filters_by_column_value() {
    let (_dir, store) = fixture_store();

    let rows = store.rows_matching("Answer", "userid", 42).unwrap();
    assert_eq!(rows.len(), 2);
    for row in &rows {
        assert_eq!(row[0], Value::Integer(42));
    }

    let questions = store.rows_matching("Question", "QuestionID", 3).unwrap();
    assert_eq!(questions.len(), 1);
    assert_eq!(
        questions[0][1],
        Value::Text("What is your age?".to_string())
    );
}

#[test]
fn test_missing_database_file_is_storage_unavailable() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = SurveyStore::new(dir.path(), "missing");

    match store.answers_for_question(1) {
        Err(StoreError::StorageUnavailable { path, .. }) => {
            assert!(path.ends_with("missing.sqlite"));
        }
        other => panic!("expected StorageUnavailable, got {:?}", other),
    }
}

#[test]
fn test_schema_probe_detects_foreign_databases() {
    let (_dir, store) = fixture_store();
    assert!(store.has_expected_schema().unwrap());

    let dir = tempfile::tempdir().expect("tempdir");
    let conn = Connection::open(dir.path().join("other.sqlite")).expect("create db");
    conn.execute_batch("CREATE TABLE misc (x INTEGER);").unwrap();

    let other = SurveyStore::new(dir.path(), "other");
    assert!(!other.has_expected_schema().unwrap());
}

#[test]
fn test_store_from_config_points_at_the_same_file() {
    let (dir, store) = fixture_store();

    let config = AppConfig {
        data_path: dir.path().to_string_lossy().into_owned(),
        db_name: "survey_fixture".to_string(),
        report_questions: vec![1],
        rare_answer_threshold: 5,
        histogram_bins: 10,
        manifest_path: "report_manifest.json".to_string(),
    };
    let from_config = SurveyStore::from_config(&config);
    assert_eq!(from_config.db_file(), store.db_file());
    assert_eq!(from_config.answer_distribution(1).unwrap().len(), 2);
}
