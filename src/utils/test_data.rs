// src/utils/test_data.rs

use crate::question_catalog::load_question_catalog;
use rand::prelude::*;
use rusqlite::{params, Connection};
use std::error::Error;
use std::fs;
use std::path::Path;

/// Survey editions the demo data spans
pub const SURVEY_YEARS: &[i64] = &[2014, 2016, 2017, 2018, 2019];

/// Create and populate a demo survey database with synthetic respondents.
/// This is the only code in the crate that writes to the database file.
pub fn seed_demo_database(db_file: &Path, users: usize) -> Result<(), Box<dyn Error>> {
    let catalog = load_question_catalog();

    if let Some(parent) = db_file.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let conn = Connection::open(db_file)?;
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS Question (
             QuestionID INTEGER PRIMARY KEY,
             QuestionText TEXT NOT NULL
         );
         CREATE TABLE IF NOT EXISTS Answer (
             UserID INTEGER NOT NULL,
             QuestionID INTEGER NOT NULL,
             SurveyID INTEGER NOT NULL,
             AnswerText TEXT NOT NULL
         );
         DELETE FROM Question;
         DELETE FROM Answer;",
    )?;

    for question in &catalog {
        conn.execute(
            "INSERT INTO Question (QuestionID, QuestionText) VALUES (?1, ?2)",
            params![question.question_id, question.text],
        )?;
    }

    println!("Seeding {} demo respondents...", users);

    let mut rng = rand::thread_rng();

    for user_id in 1..=users as i64 {
        // Each respondent belongs to one survey edition
        let year = SURVEY_YEARS[rng.gen_range(0..SURVEY_YEARS.len())];

        for question in &catalog {
            // Respondents skip some questions, so answer sets differ per question
            if !rng.gen_bool(0.9) {
                continue;
            }

            let answer = question.answers.sample(&mut rng);
            conn.execute(
                "INSERT INTO Answer (UserID, QuestionID, SurveyID, AnswerText) \
                 VALUES (?1, ?2, ?3, ?4)",
                params![user_id, question.question_id, year, answer],
            )?;
        }

        if user_id % 50 == 0 {
            println!("Seeded {} respondents...", user_id);
        }
    }

    log::info!(
        "Seeded demo database at {} with {} respondents",
        db_file.display(),
        users
    );
    println!("Successfully seeded {} demo respondents", users);
    Ok(())
}

/// Remove the demo database file
pub fn clean_demo_database(db_file: &Path) -> Result<(), Box<dyn Error>> {
    if db_file.exists() {
        fs::remove_file(db_file)?;
        log::info!("Removed demo database at {}", db_file.display());
        println!("Removed demo database: {}", db_file.display());
    } else {
        println!("No demo database to clean at: {}", db_file.display());
    }

    Ok(())
}
