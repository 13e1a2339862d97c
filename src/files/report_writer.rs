use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::{self, File};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

/// One answer's share of a question's respondents
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AnswerShare {
    pub answer: String,
    pub percentage: f64,
}

/// One answer's share within a single survey year
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct YearlyAnswerShare {
    pub answer: String,
    pub year: i64,
    pub percentage: f64,
}

/// An answer with its raw respondent count
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AnswerCount {
    pub answer: String,
    pub count: i64,
}

/// A question's aggregated report, as exported to JSON
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct QuestionReport {
    pub question_id: i64,
    pub question_text: String,
    pub respondents: i64,
    pub distribution: Vec<AnswerShare>,
    pub yearly_distribution: Vec<YearlyAnswerShare>,
    pub rare_answers: Vec<AnswerCount>,
    pub generated_at: String,
}

/// Save a question report to a JSON file
pub fn save_report_file<P: AsRef<Path>>(
    file_path: P,
    report: &QuestionReport,
) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(report)?;

    let mut file = File::create(file_path)?;
    file.write_all(json.as_bytes())?;

    Ok(())
}

/// Read a question report back from a file
pub fn read_report_file<P: AsRef<Path>>(file_path: P) -> Result<QuestionReport, Box<dyn Error>> {
    let file = File::open(file_path)?;
    let reader = BufReader::new(file);
    let report = serde_json::from_reader(reader)?;

    Ok(report)
}

/// List all report files in a directory
pub fn read_report_files(dir_path: &str) -> Result<Vec<PathBuf>, Box<dyn Error>> {
    let mut report_files = Vec::new();

    for entry in fs::read_dir(dir_path)? {
        let entry = entry?;
        let path = entry.path();

        if path.is_file()
            && path.extension().map_or(false, |ext| ext == "json")
            && path
                .file_name()
                .map_or(false, |name| name != "report_manifest.json")
        {
            report_files.push(path);
        }
    }

    Ok(report_files)
}
