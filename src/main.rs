use clap::{Parser, Subcommand};
use std::error::Error;
use std::fs::File;
use std::io::Write;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::prelude::*;
use rusqlite::types::Value;

use survey_data_processor::config::AppConfig;
use survey_data_processor::files::file_manager::{count_files, file_exists, setup_directories};
use survey_data_processor::files::manifest::ReportManifest;
use survey_data_processor::files::report_writer::{
    save_report_file, AnswerCount, AnswerShare, QuestionReport, YearlyAnswerShare,
};
use survey_data_processor::ui::progress::{
    create_progress_bar, print_with_progress, update_progress,
};
use survey_data_processor::utils::test_data;
use survey_data_processor::SurveyStore;

#[derive(Parser)]
#[clap(author, version, about = "Survey Data Processor CLI")]
struct Cli {
    #[clap(subcommand)]
    command: Option<Commands>,

    /// Clean results directories from previous runs before starting
    #[clap(short, long)]
    clean: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the survey questions with their respondent counts
    Questions,

    /// Dump a survey table (Answer or Question)
    Table {
        /// Name of the table to dump
        name: String,
    },

    /// Show the percentage distribution of answers for a question
    Distribution {
        /// Question to analyze
        question_id: i64,

        /// Normalize percentages within each survey year
        #[clap(short, long)]
        by_year: bool,
    },

    /// Show respondents whose answers to two questions differ
    Diff {
        /// First question
        question_a: i64,

        /// Second question
        question_b: i64,
    },

    /// Show the average answer for a quantitative question
    Average {
        /// Question to analyze
        question_id: i64,
    },

    /// Show a histogram of answers for a quantitative question
    Histogram {
        /// Question to analyze
        question_id: i64,
    },

    /// Export JSON reports for the configured question list
    Report,

    /// Create a demo survey database with synthetic respondents
    SeedDemo {
        /// Number of demo respondents to generate
        #[clap(short, long, default_value = "200")]
        users: usize,
    },

    /// Remove the demo survey database
    CleanDemo,
}

fn setup_logger(log_file: &str) -> Result<(), Box<dyn Error>> {
    // Create log file and directory if it doesn't exist
    let log_path = std::path::Path::new(log_file);

    // Create directory if needed
    if let Some(parent) = log_path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // Open log file with append mode
    let file = File::create(log_path)?;

    // Configure env_logger to use the file
    env_logger::Builder::new()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .filter_level(log::LevelFilter::Info) // Set default log level
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {} - {}: {}",
                Local::now().format("%Y-%m-%dT%H:%M:%SZ"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();

    log::info!("Logger initialized");
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Create timestamp for result directory
    let timestamp = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();

    let results_dir = format!("results_{}", timestamp);

    // Setup log file in the results directory
    let log_file = format!("{}/survey_report.log", results_dir);

    // Setup directories and clean if requested
    setup_directories(&results_dir, cli.clean)?;

    // Setup logger after directory is created
    setup_logger(&log_file)?;

    log::info!("Starting Survey Data Processor");

    // Load configuration
    let app_config = AppConfig::from_env_or_file().expect("Failed to load configuration");

    // Determine which command to run - default to listing questions
    let command = cli.command.unwrap_or(Commands::Questions);

    match command {
        Commands::Questions => {
            list_questions(&app_config)?;
        }
        Commands::Table { name } => {
            dump_table(&app_config, &name)?;
        }
        Commands::Distribution {
            question_id,
            by_year,
        } => {
            distribution_phase(&app_config, question_id, by_year)?;
        }
        Commands::Diff {
            question_a,
            question_b,
        } => {
            diff_phase(&app_config, question_a, question_b)?;
        }
        Commands::Average { question_id } => {
            average_phase(&app_config, question_id)?;
        }
        Commands::Histogram { question_id } => {
            histogram_phase(&app_config, question_id)?;
        }
        Commands::Report => {
            report_phase(&app_config, &results_dir)?;
        }
        Commands::SeedDemo { users } => {
            seed_demo(&app_config, users)?;
        }
        Commands::CleanDemo => {
            clean_demo(&app_config)?;
        }
    }

    log::info!("Survey processing completed successfully");
    println!("Survey processing completed successfully");

    Ok(())
}

fn list_questions(config: &AppConfig) -> Result<(), Box<dyn Error>> {
    println!("Survey questions:");
    log::info!("Listing survey questions");

    let store = SurveyStore::from_config(config);

    for row in store.get_table("Question")? {
        if let [Value::Integer(question_id), Value::Text(text)] = row.as_slice() {
            let answers = store.count_for_question(*question_id)?;
            println!("{:>3}  {} ({} answers)", question_id, text, answers);
        }
    }

    Ok(())
}

fn dump_table(config: &AppConfig, name: &str) -> Result<(), Box<dyn Error>> {
    log::info!("Dumping table {}", name);

    let store = SurveyStore::from_config(config);
    let rows = store.get_table(name)?;

    for row in &rows {
        let cells: Vec<String> = row.iter().map(format_value).collect();
        println!("{}", cells.join(" | "));
    }
    println!("{} rows", rows.len());

    Ok(())
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Real(r) => r.to_string(),
        Value::Text(t) => t.clone(),
        Value::Blob(b) => format!("<{} bytes>", b.len()),
    }
}

fn distribution_phase(
    config: &AppConfig,
    question_id: i64,
    by_year: bool,
) -> Result<(), Box<dyn Error>> {
    log::info!("Computing answer distribution for question {}", question_id);

    let store = SurveyStore::from_config(config);
    let text = store.question_text(question_id)?;
    println!("Question {}: {}", question_id, text);

    if by_year {
        for (answer, year, percentage) in store.answer_distribution_by_year(question_id)? {
            println!("{}  {:>6.2}%  {}", year, percentage, answer);
        }
    } else {
        for (answer, percentage) in store.answer_distribution(question_id)? {
            println!("{:>6.2}%  {}", percentage, answer);
        }
    }

    Ok(())
}

fn diff_phase(config: &AppConfig, question_a: i64, question_b: i64) -> Result<(), Box<dyn Error>> {
    log::info!(
        "Comparing answers between questions {} and {}",
        question_a,
        question_b
    );

    let store = SurveyStore::from_config(config);
    let both = store.count_answering_both(question_a, question_b)?;
    let triples = store.diff_answers(question_a, question_b)?;

    println!(
        "{} respondents answered both questions, {} differing answers",
        both,
        triples.len()
    );
    for (answer_b, answer_a, user_id) in triples {
        println!("user {:>5}: {:?} -> {:?}", user_id, answer_a, answer_b);
    }

    Ok(())
}

fn average_phase(config: &AppConfig, question_id: i64) -> Result<(), Box<dyn Error>> {
    log::info!("Computing average for question {}", question_id);

    let store = SurveyStore::from_config(config);
    let text = store.question_text(question_id)?;
    let average = store.average(question_id)?;

    println!("Question {}: {}", question_id, text);
    println!("Average answer: {}", average);

    Ok(())
}

fn histogram_phase(config: &AppConfig, question_id: i64) -> Result<(), Box<dyn Error>> {
    log::info!("Computing histogram for question {}", question_id);

    let store = SurveyStore::from_config(config);
    let text = store.question_text(question_id)?;
    let (counts, edges) = store.histogram(question_id, config.histogram_bins)?;

    println!("Question {}: {}", question_id, text);
    for (idx, count) in counts.iter().enumerate() {
        let closing = if idx + 1 == counts.len() { ']' } else { ')' };
        println!(
            "[{:>8.2}, {:>8.2}{}  {}",
            edges[idx],
            edges[idx + 1],
            closing,
            count
        );
    }

    Ok(())
}

fn report_phase(config: &AppConfig, results_dir: &str) -> Result<(), Box<dyn Error>> {
    println!("Starting Report Phase");
    log::info!("Starting Report Phase");

    let store = SurveyStore::from_config(config);

    // Refuse to report against a database without the survey tables
    if !store.has_expected_schema()? {
        return Err(format!(
            "Database at {} is missing the survey tables; run seed-demo first",
            store.db_file().display()
        )
        .into());
    }

    // Load the manifest of questions reported by earlier runs
    let mut manifest = ReportManifest::load(&config.manifest_path);

    let progress_bar = create_progress_bar("Exporting reports");
    let total = config.report_questions.len() as u64;

    let mut exported = 0;
    let mut skipped = 0;

    for (idx, &question_id) in config.report_questions.iter().enumerate() {
        update_progress(
            &progress_bar,
            &format!("Question {}", question_id),
            idx as u64,
            total,
        );

        if manifest.is_reported(question_id) {
            print_with_progress(
                &progress_bar,
                &format!("Question {} already reported, skipping", question_id),
            );
            log::info!("Question {} already reported, skipping", question_id);
            skipped += 1;
            continue;
        }

        let report = build_question_report(&store, question_id, config.rare_answer_threshold)?;
        let file_path = format!("{}/question_{}.json", results_dir, question_id);
        save_report_file(&file_path, &report)?;

        manifest.add(question_id, report.generated_at.clone(), "exported".to_string());
        log::info!("Exported report for question {} to {}", question_id, file_path);
        exported += 1;
    }

    // Save the manifest so the next run can resume
    manifest.save(&config.manifest_path)?;

    let files = count_files(results_dir, "json")?;
    progress_bar.finish_with_message(format!(
        "Exported {} reports ({} skipped)",
        exported, skipped
    ));

    println!(
        "Exported {} reports ({} skipped), {} report files in {}",
        exported, skipped, files, results_dir
    );

    Ok(())
}

fn build_question_report(
    store: &SurveyStore,
    question_id: i64,
    rare_threshold: i64,
) -> Result<QuestionReport, Box<dyn Error>> {
    let question_text = store.question_text(question_id)?;
    let respondents = store.count_for_question(question_id)?;

    let distribution = store
        .answer_distribution(question_id)?
        .into_iter()
        .map(|(answer, percentage)| AnswerShare { answer, percentage })
        .collect();

    let yearly_distribution = store
        .answer_distribution_by_year(question_id)?
        .into_iter()
        .map(|(answer, year, percentage)| YearlyAnswerShare {
            answer,
            year,
            percentage,
        })
        .collect();

    let rare_answers = store
        .answers_below_threshold(question_id, rare_threshold)?
        .into_iter()
        .map(|(answer, count)| AnswerCount { answer, count })
        .collect();

    Ok(QuestionReport {
        question_id,
        question_text,
        respondents,
        distribution,
        yearly_distribution,
        rare_answers,
        generated_at: Local::now().format("%Y-%m-%dT%H:%M:%S").to_string(),
    })
}

fn seed_demo(config: &AppConfig, users: usize) -> Result<(), Box<dyn Error>> {
    println!("Setting up demo database...");
    log::info!("Setting up demo database");

    let db_file = config.db_file_path();
    if file_exists(&db_file.to_string_lossy()) {
        println!("Overwriting existing database at {}", db_file.display());
    }

    test_data::seed_demo_database(&db_file, users)?;

    log::info!("Demo database setup completed successfully");
    println!("Demo database setup completed successfully");

    Ok(())
}

fn clean_demo(config: &AppConfig) -> Result<(), Box<dyn Error>> {
    println!("Cleaning demo database...");
    log::info!("Cleaning demo database");

    test_data::clean_demo_database(&config.db_file_path())?;

    Ok(())
}
